//! A vector that keeps indices stable under removal.
//!
//! Removing an element does not shift its successors. Instead the element is
//! deactivated in place and its slot is recorded as a *blank* that later
//! insertions reuse, lowest slot first. This trades memory (tombstoned slots
//! are never compacted away) for index stability, which is what allows the
//! graph layer to store neighbor relations as plain indices.

use std::{
    iter::FusedIterator,
    marker::PhantomData,
    ops::{Index, IndexMut},
};

use thiserror::Error;

use super::EntityIndex;

/// Capability required of elements stored in a [`PersistentVec`].
///
/// Elements are never dropped on removal; they are deactivated in place and
/// their slot is reused by a later insertion.
pub trait Deactivate {
    /// Marks the element as logically absent.
    fn deactivate(&mut self);

    /// Returns whether the element has been deactivated.
    fn is_deactivated(&self) -> bool;
}

/// Error returned when accessing or erasing a slot of a [`PersistentVec`].
///
/// Distinguishes indices that do not exist at all from indices whose slot
/// exists but currently holds a deactivated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("index {index} is out of range (slot count {len})")]
    OutOfBounds { index: usize, len: usize },
    #[error("slot {index} holds a deactivated element")]
    Inactive { index: usize },
}

/// A dynamic array whose live elements keep their index under removal.
///
/// `blanks` lists the deactivated slot positions sorted descending, so the
/// lowest blank sits at the back and [`PersistentVec::insert`] reuses it
/// with a plain `pop` before growing the backing vector.
///
/// # Example
///
/// ```
/// use bondgraph::{PersistentVec, Vertex, VertexIndex};
///
/// let mut vec: PersistentVec<VertexIndex, Vertex<char>> = PersistentVec::new();
/// let a = vec.insert(Vertex::new('a'));
/// let b = vec.insert(Vertex::new('b'));
/// let c = vec.insert(Vertex::new('c'));
///
/// vec.erase(b).unwrap();
/// assert_eq!(vec.len(), 3);
/// assert_eq!(vec.len_active(), 2);
/// assert_eq!(vec.at(c).unwrap().data(), &'c');
///
/// // the blank slot is reused by the next insertion
/// assert_eq!(vec.insert(Vertex::new('d')), b);
/// ```
#[derive(Debug, Clone)]
pub struct PersistentVec<K, V> {
    slots: Vec<V>,
    /// Positions of deactivated slots, descending; the lowest slot is last.
    blanks: Vec<usize>,
    phantom: PhantomData<K>,
}

impl<K, V> PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    /// Creates an empty [`PersistentVec<K, V>`].
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            blanks: Vec::new(),
            phantom: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            blanks: Vec::new(),
            phantom: PhantomData,
        }
    }

    /// Returns the total slot count, including deactivated slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len_active(&self) -> usize {
        self.slots.len() - self.blanks.len()
    }

    /// Returns the number of deactivated slots.
    #[inline]
    pub fn n_deactivated(&self) -> usize {
        self.blanks.len()
    }

    /// Returns whether there are no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns whether there are no live elements.
    #[inline]
    pub fn is_empty_active(&self) -> bool {
        self.slots.len() == self.blanks.len()
    }

    /// Inserts a value, reusing the lowest blank slot if one exists.
    ///
    /// Returns the index of the slot the value now occupies. Amortized
    /// constant time whether or not a blank is reused.
    pub fn insert(&mut self, value: V) -> K {
        match self.blanks.pop() {
            Some(slot) => {
                self.slots[slot] = value;
                K::new(slot)
            }
            None => {
                self.slots.push(value);
                K::new(self.slots.len() - 1)
            }
        }
    }

    /// Deactivates the element at `key` and records its slot for reuse.
    ///
    /// # Errors
    ///
    /// Fails with [`AccessError::OutOfBounds`] when the slot does not exist
    /// and with [`AccessError::Inactive`] when it is already deactivated.
    pub fn erase(&mut self, key: K) -> Result<(), AccessError> {
        let index = key.index();
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AccessError::OutOfBounds { index, len })?;

        if slot.is_deactivated() {
            return Err(AccessError::Inactive { index });
        }

        slot.deactivate();
        let pos = self.blanks.partition_point(|&b| b > index);
        self.blanks.insert(pos, index);
        Ok(())
    }

    /// Erases a contiguous range of raw slot positions.
    ///
    /// Every position in the range must refer to a live element.
    pub fn erase_range(&mut self, range: std::ops::Range<usize>) -> Result<(), AccessError> {
        for index in range {
            self.erase(K::new(index))?;
        }
        Ok(())
    }

    /// Returns whether `key` refers to a live element.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        matches!(self.slots.get(key.index()), Some(slot) if !slot.is_deactivated())
    }

    /// Borrows the live element at `key`, or `None` when the slot is out of
    /// range or deactivated.
    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key.index()).filter(|v| !v.is_deactivated())
    }

    /// Mutably borrows the live element at `key`.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots
            .get_mut(key.index())
            .filter(|v| !v.is_deactivated())
    }

    /// Borrows the live element at `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`AccessError::OutOfBounds`] or [`AccessError::Inactive`],
    /// so callers can tell a stale index from one that never existed.
    pub fn at(&self, key: K) -> Result<&V, AccessError> {
        let index = key.index();
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(AccessError::OutOfBounds { index, len })?;

        if slot.is_deactivated() {
            return Err(AccessError::Inactive { index });
        }
        Ok(slot)
    }

    /// Mutably borrows the live element at `key`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PersistentVec::at`].
    pub fn at_mut(&mut self, key: K) -> Result<&mut V, AccessError> {
        let index = key.index();
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AccessError::OutOfBounds { index, len })?;

        if slot.is_deactivated() {
            return Err(AccessError::Inactive { index });
        }
        Ok(slot)
    }

    /// Raw positional access to all slots, deactivated ones included.
    #[inline]
    pub fn slots(&self) -> &[V] {
        &self.slots
    }

    /// The positions of the deactivated slots, sorted descending.
    #[inline]
    pub fn blanks(&self) -> &[usize] {
        &self.blanks
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.blanks.clear();
    }

    /// Shrink the backing vector to fit the current slots.
    pub fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit()
    }

    /// Consumes the container, returning the raw slot vector.
    pub(crate) fn into_slots(self) -> Vec<V> {
        self.slots
    }

    /// Iterates over the live elements in ascending slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Iterates over the live elements with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    /// Returns an active cursor at the first live slot.
    pub fn cursor(&self) -> ActiveCursor<'_, K, V> {
        self.cursor_at(0)
    }

    /// Returns an active cursor at the given raw position, skipped forward
    /// past any blanks.
    pub fn cursor_at(&self, position: usize) -> ActiveCursor<'_, K, V> {
        ActiveCursor::new(&self.slots, &self.blanks, position)
    }

    /// Returns the past-the-end active cursor.
    pub fn end_cursor(&self) -> ActiveCursor<'_, K, V> {
        self.cursor_at(self.slots.len())
    }
}

impl<K, V> Default for PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Index<K> for PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        self.get(key).expect("invalid or inactive index")
    }
}

impl<K, V> IndexMut<K> for PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.get_mut(key).expect("invalid or inactive index")
    }
}

impl<K, V> FromIterator<V> for PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let slots: Vec<V> = iter.into_iter().collect();
        let blanks = slots
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, v)| v.is_deactivated())
            .map(|(i, _)| i)
            .collect();
        Self {
            slots,
            blanks,
            phantom: PhantomData,
        }
    }
}

/// A traversal position restricted to live slots.
///
/// The cursor tracks a raw slot position together with the sorted blanks
/// list, which lets it advance or retreat by `n` live steps in
/// `O(log blanks)` and compute distances that discount blanks. Cursor
/// comparison considers only the raw position.
///
/// The cursor borrows the container, so any insertion or erasure first
/// requires all cursors to be dropped; stale cursors are a compile error
/// rather than a runtime hazard.
///
/// # Example
///
/// ```
/// use bondgraph::memory::EntityIndex;
/// use bondgraph::{PersistentVec, Vertex, VertexIndex};
///
/// let mut vec: PersistentVec<VertexIndex, Vertex<u32>> =
///     (0..5).map(Vertex::new).collect();
/// vec.erase(VertexIndex::new(2)).unwrap();
///
/// let mut cursor = vec.cursor();
/// cursor.advance(2);
/// assert_eq!(cursor.position(), 3); // skipped the blank at 2
/// assert_eq!(vec.end_cursor().distance(&vec.cursor()), 4);
/// ```
#[derive(Debug)]
pub struct ActiveCursor<'a, K, V> {
    slots: &'a [V],
    blanks: &'a [usize],
    pos: usize,
    phantom: PhantomData<K>,
}

// manual impls to avoid the derive's `V: Clone` bound
impl<'a, K, V> Clone for ActiveCursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for ActiveCursor<'a, K, V> {}

impl<'a, K, V> ActiveCursor<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn new(slots: &'a [V], blanks: &'a [usize], pos: usize) -> Self {
        let mut cursor = Self {
            slots,
            blanks,
            pos,
            phantom: PhantomData,
        };
        cursor.skip_blanks();
        cursor
    }

    fn skip_blanks(&mut self) {
        // blanks are sorted descending, so ascending traversal walks the
        // slice back to front
        let mut i = self.blanks.partition_point(|&b| b > self.pos);
        while i < self.blanks.len() && self.blanks[i] == self.pos {
            self.pos += 1;
            if i == 0 {
                break;
            }
            i -= 1;
        }
    }

    /// The raw slot position, counting blanks.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The index of the referenced slot.
    #[inline]
    pub fn key(&self) -> K {
        K::new(self.pos)
    }

    /// Borrows the referenced element, or `None` at the end position.
    pub fn get(&self) -> Option<&'a V> {
        self.slots.get(self.pos)
    }

    /// Moves the cursor forward by `n` live steps.
    ///
    /// The raw target position is extended past every blank it would land on
    /// or cross; the blanks in the traversed range are counted by binary
    /// search, so this is `O(n_blanks_crossed + log blanks)` rather than a
    /// scan of all skipped slots.
    pub fn advance(&mut self, n: usize) {
        let mut target = self.pos + n;
        let mut i = self.blanks.partition_point(|&b| b >= self.pos);
        while i > 0 && self.blanks[i - 1] <= target {
            target += 1;
            i -= 1;
        }
        self.pos = target;
    }

    /// Moves the cursor backward by `n` live steps.
    ///
    /// Must not retreat past the first live slot.
    pub fn retreat(&mut self, n: usize) {
        let mut target = self.pos - n;
        let mut i = self.blanks.partition_point(|&b| b > self.pos);
        while i < self.blanks.len() && self.blanks[i] >= target {
            target -= 1;
            i += 1;
        }
        self.pos = target;
    }

    /// The number of live elements between `rhs` and `self`.
    ///
    /// Equal to the raw distance minus the number of blanks strictly between
    /// the two positions; negative when `rhs` is ahead of `self`.
    pub fn distance(&self, rhs: &Self) -> isize {
        let below = |pos| self.blanks.len() - self.blanks.partition_point(|&b| b >= pos);
        (self.pos as isize - rhs.pos as isize)
            - (below(self.pos) as isize - below(rhs.pos) as isize)
    }
}

impl<'a, K, V> PartialEq for ActiveCursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<'a, K, V> Eq for ActiveCursor<'a, K, V> {}

impl<'a, K, V> PartialOrd for ActiveCursor<'a, K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, K, V> Ord for ActiveCursor<'a, K, V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl<'a, K, V> Iterator for ActiveCursor<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.slots.len() {
            return None;
        }
        let item = (K::new(self.pos), &self.slots[self.pos]);
        self.advance(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let blanks_ahead = self.blanks.partition_point(|&b| b >= self.pos);
        let remaining = (self.slots.len() - self.pos.min(self.slots.len())) - blanks_ahead;
        (remaining, Some(remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for ActiveCursor<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
}

impl<'a, K, V> FusedIterator for ActiveCursor<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
}

pub struct Iter<'a, K, V> {
    slots: std::iter::Enumerate<std::slice::Iter<'a, V>>,
    len: usize,
    phantom: PhantomData<K>,
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn new(vec: &'a PersistentVec<K, V>) -> Self {
        Self {
            slots: vec.slots.iter().enumerate(),
            len: vec.len_active(),
            phantom: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if !slot.is_deactivated() {
                self.len -= 1;
                return Some((K::new(index), slot));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
}

impl<'a, K, V> IntoIterator for &'a PersistentVec<K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct IterMut<'a, K, V> {
    slots: std::iter::Enumerate<std::slice::IterMut<'a, V>>,
    len: usize,
    phantom: PhantomData<K>,
}

impl<'a, K, V> IterMut<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn new(vec: &'a mut PersistentVec<K, V>) -> Self {
        let len = vec.len_active();
        Self {
            slots: vec.slots.iter_mut().enumerate(),
            len,
            phantom: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    type Item = (K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if !slot.is_deactivated() {
                self.len -= 1;
                return Some((K::new(index), slot));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V>
where
    K: EntityIndex,
    V: Deactivate,
{
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
    struct SlotIndex(u32);

    crate::entity_impl!(SlotIndex, u32);

    fn slot(ix: usize) -> SlotIndex {
        SlotIndex::new(ix)
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Probe {
        value: i32,
        active: bool,
    }

    impl Probe {
        fn new(value: i32) -> Self {
            Self {
                value,
                active: true,
            }
        }
    }

    impl Deactivate for Probe {
        fn deactivate(&mut self) {
            self.active = false;
        }

        fn is_deactivated(&self) -> bool {
            !self.active
        }
    }

    fn probes(values: impl IntoIterator<Item = i32>) -> PersistentVec<SlotIndex, Probe> {
        values.into_iter().map(Probe::new).collect()
    }

    #[test]
    fn blanks_stay_sorted_and_lowest_is_reused() {
        let mut vec = probes(0..6);

        vec.erase(slot(4)).unwrap();
        vec.erase(slot(2)).unwrap();
        assert_eq!(vec.blanks(), &[4, 2]);
        assert_eq!(vec.len(), 6);
        assert_eq!(vec.len_active(), 4);

        assert_eq!(vec.insert(Probe::new(100)), slot(2));
        assert_eq!(vec.blanks(), &[4]);
        assert_eq!(vec.insert(Probe::new(101)), slot(4));
        assert_eq!(vec.insert(Probe::new(102)), slot(6));
        assert_eq!(vec.len_active(), 7);
    }

    #[test]
    fn reuse_order_is_ascending_regardless_of_erase_order() {
        let mut vec = probes(0..8);
        for raw in [5, 1, 6, 3] {
            vec.erase(slot(raw)).unwrap();
        }
        assert_eq!(vec.blanks(), &[6, 5, 3, 1]);

        let reused: Vec<_> = (0..4).map(|i| vec.insert(Probe::new(i)).index()).collect();
        assert_eq!(reused, [1, 3, 5, 6]);
        assert!(vec.blanks().is_empty());
    }

    #[test]
    fn erase_distinguishes_missing_from_inactive() {
        let mut vec = probes(0..3);

        assert_eq!(
            vec.erase(slot(7)),
            Err(AccessError::OutOfBounds { index: 7, len: 3 })
        );

        vec.erase(slot(1)).unwrap();
        assert_eq!(vec.erase(slot(1)), Err(AccessError::Inactive { index: 1 }));
        assert_eq!(vec.at(slot(1)), Err(AccessError::Inactive { index: 1 }));
        assert!(vec.get(slot(1)).is_none());
        assert!(vec.contains(slot(0)));
        assert!(!vec.contains(slot(1)));
    }

    #[test]
    fn iteration_skips_blanks_in_order() {
        let mut vec = probes([5, 1, 7, 8, 3]);
        vec.erase(slot(2)).unwrap();

        let seen: Vec<_> = vec.iter().map(|(k, p)| (k.index(), p.value)).collect();
        assert_eq!(seen, [(0, 5), (1, 1), (3, 8), (4, 3)]);
        assert_eq!(vec.iter().len(), 4);

        vec.erase(slot(1)).unwrap();
        let seen: Vec<_> = vec.iter().map(|(_, p)| p.value).collect();
        assert_eq!(seen, [5, 8, 3]);
    }

    #[test]
    fn cursor_advances_over_blanks() {
        let mut vec = probes([5, 1, 7, 8, 3]);
        vec.erase(slot(2)).unwrap();

        assert_eq!(vec.end_cursor().distance(&vec.cursor()), 4);

        let mut cursor = vec.cursor();
        assert_eq!(cursor.get().map(|p| p.value), Some(5));
        cursor.advance(2);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.get().map(|p| p.value), Some(8));
        cursor.advance(1);
        assert_eq!(cursor.get().map(|p| p.value), Some(3));

        vec.erase(slot(1)).unwrap();
        let mut cursor = vec.cursor();
        cursor.advance(1);
        assert_eq!(cursor.get().map(|p| p.value), Some(8));
        assert_eq!(vec.end_cursor().distance(&vec.cursor()), 3);
    }

    #[test]
    fn cursor_starts_past_leading_blanks() {
        let mut vec = probes(0..4);
        vec.erase(slot(0)).unwrap();
        vec.erase(slot(1)).unwrap();

        assert_eq!(vec.cursor().position(), 2);
        assert_eq!(vec.end_cursor().distance(&vec.cursor()), 2);
    }

    #[test]
    fn cursor_retreat_mirrors_advance() {
        let mut vec = probes(0..8);
        vec.erase(slot(2)).unwrap();
        vec.erase(slot(4)).unwrap();
        vec.erase(slot(5)).unwrap();

        // live slots: 0, 1, 3, 6, 7
        for steps in 0..5 {
            let mut cursor = vec.cursor();
            cursor.advance(steps);
            cursor.retreat(steps);
            assert_eq!(cursor, vec.cursor());
        }

        let mut cursor = vec.cursor();
        cursor.advance(3);
        assert_eq!(cursor.position(), 6);
        cursor.retreat(2);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn cursor_iterates_live_elements() {
        let mut vec = probes([10, 11, 12, 13]);
        vec.erase(slot(1)).unwrap();

        let seen: Vec<_> = vec.cursor().map(|(_, p)| p.value).collect();
        assert_eq!(seen, [10, 12, 13]);
        assert_eq!(vec.cursor().count(), vec.len_active());
    }

    #[test]
    fn from_iter_detects_deactivated_slots() {
        let mut dead = Probe::new(9);
        dead.deactivate();
        let mut vec: PersistentVec<SlotIndex, Probe> =
            [Probe::new(0), dead, Probe::new(2)].into_iter().collect();

        assert_eq!(vec.blanks(), &[1]);
        assert_eq!(vec.len_active(), 2);
        assert_eq!(vec.insert(Probe::new(1)), slot(1));
    }

    #[test]
    fn erase_range_deactivates_each_slot() {
        let mut vec = probes(0..5);
        vec.erase_range(1..3).unwrap();
        assert_eq!(vec.blanks(), &[2, 1]);
        assert_eq!(vec.len_active(), 3);
    }

    proptest! {
        /// Random churn keeps the live set, iteration order and cursor
        /// arithmetic consistent with a naive model.
        #[test]
        fn churn_matches_model(ops in prop::collection::vec(prop_oneof![
            (0..1000i32).prop_map(Some),
            Just(None),
        ], 1..64)) {
            let mut vec: PersistentVec<SlotIndex, Probe> = PersistentVec::new();
            let mut model: Vec<Option<i32>> = Vec::new();

            for op in ops {
                match op {
                    Some(value) => {
                        let key = vec.insert(Probe::new(value));
                        match model.iter().position(Option::is_none) {
                            Some(hole) => {
                                prop_assert_eq!(key.index(), hole);
                                model[hole] = Some(value);
                            }
                            None => {
                                prop_assert_eq!(key.index(), model.len());
                                model.push(Some(value));
                            }
                        }
                    }
                    None => {
                        // erase the live slot with the highest position, if any
                        if let Some(pos) = model.iter().rposition(Option::is_some) {
                            vec.erase(slot(pos)).unwrap();
                            model[pos] = None;
                        }
                    }
                }
            }

            let live: Vec<_> = model
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i, v)))
                .collect();

            let seen: Vec<_> = vec.iter().map(|(k, p)| (k.index(), p.value)).collect();
            prop_assert_eq!(&seen, &live);

            prop_assert_eq!(vec.len_active(), live.len());
            prop_assert_eq!(
                vec.end_cursor().distance(&vec.cursor()),
                live.len() as isize
            );

            let mut cursor = vec.cursor();
            cursor.advance(live.len());
            prop_assert_eq!(cursor, vec.end_cursor());
        }
    }
}
