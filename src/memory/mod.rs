//! Index-stable storage primitives backing the graph layer.
pub mod persistent;

pub use persistent::PersistentVec;

/// Strongly-typed index into an arena-style container.
pub trait EntityIndex: Copy + Eq + Default {
    fn new(index: usize) -> Self {
        Self::try_new(index).unwrap()
    }

    fn try_new(index: usize) -> Option<Self>;
    fn index(self) -> usize;
}

/// Macro which provides the common implementation of an n-bit entity reference
///
/// Based on [`cranelift_entity`'s `entity_impl!`](https://docs.rs/cranelift-entity/0.89.2/cranelift_entity/macro.entity_impl.html)
#[macro_export]
macro_rules! entity_impl {
    ($entity:ident, $backing:ty) => {
        impl $crate::memory::EntityIndex for $entity {
            #[inline(always)]
            fn try_new(ix: usize) -> Option<Self> {
                if ix <= (<$backing>::MAX as usize) || (<$backing>::BITS) > usize::BITS {
                    Some($entity(ix as $backing))
                } else {
                    None
                }
            }

            #[inline(always)]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
