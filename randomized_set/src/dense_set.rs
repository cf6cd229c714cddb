//! [DenseSet] is the unsynchronized hash set underlying [`RandomizedSet`](crate::RandomizedSet).
use crate::{
    position_index::{Lookup, PositionIndex},
    util::impl_iterator,
};
use core::hash::Hash;
use rand::Rng;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, BuildHasherDefault},
};
use zwohash::ZwoHasher;

/// The hasher used when no other `BuildHasher` is specified.
pub type DefaultBuildHasher = BuildHasherDefault<ZwoHasher>;

/// A hash set whose items are stored gap-free in a `Vec`.
///
/// Every item's slot in the vector is recorded in a hash table, so lookups are O(1) and any slot
/// can be addressed by index. Removal moves the last item into the freed slot ("swap remove"),
/// which keeps the vector dense at the cost of perturbing the order of items. Because the vector
/// is dense, [`choose`](Self::choose) picks each item with equal probability in O(1).
///
/// In `DenseSet<T, S>`, `T: Hash + Eq` is the type of elements of the set and
/// `S: BuildHasher` is used for hashing elements.
#[derive(Clone)]
pub struct DenseSet<T, S = DefaultBuildHasher> {
    positions: PositionIndex,
    items: Vec<T>,
    build_hasher: S,
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for DenseSet<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self).finish()
    }
}

impl<T, S: Default> Default for DenseSet<T, S> {
    fn default() -> Self {
        DenseSet {
            positions: PositionIndex::default(),
            items: Vec::new(),
            build_hasher: S::default(),
        }
    }
}

impl<T> DenseSet<T> {
    /// Returns an empty set using the default hasher.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns an empty set with the specified capacity using the default hasher.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultBuildHasher::default())
    }
}

impl<T, S> DenseSet<T, S> {
    /// Returns an empty set with the provided BuildHasher.
    pub fn with_hasher(build_hasher: S) -> Self {
        DenseSet {
            positions: PositionIndex::default(),
            items: Vec::new(),
            build_hasher,
        }
    }
    /// Returns an empty set with the specified capacity and provided BuildHasher.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        DenseSet {
            positions: PositionIndex::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
            build_hasher,
        }
    }
    /// Removes all items, but keeps the allocated memory.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.items.clear();
    }
    /// Returns the number of items in the set.
    pub fn len(&self) -> usize {
        self.items.len()
    }
    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    /// Returns the item stored in the given slot, if it exists.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
    /// Returns a reference to a slice containing all items in the set.
    ///
    /// The order of items is unspecified once items have been removed.
    pub fn as_slice(&self) -> &[T] {
        &self.items[..]
    }
    /// Converts the set into a `Vec`. The position table is dropped.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
    /// Returns a uniformly chosen item, or `None` if the set is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        Some(&self.items[rng.gen_range(0..self.items.len())])
    }
}

impl<T: Hash, S: BuildHasher> DenseSet<T, S> {
    /// Reserve memory for an extra `additional` items.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
        self.positions.reserve(additional, |index| {
            self.build_hasher.hash_one(&self.items[index])
        });
    }
}

impl<T: Hash + Eq, S: BuildHasher> DenseSet<T, S> {
    /// Inserts an item at the end of the set, unless the set contains an equivalent item already.
    /// Returns `true` if the item was inserted.
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_full(value).1
    }
    /// Inserts an item at the end of the set, unless the set contains an equivalent item already.
    /// Returns the slot of the existing or new item, and `true` if the given item was inserted.
    pub fn insert_full(&mut self, value: T) -> (usize, bool) {
        self.positions.grow_for(self.items.len(), |index| {
            self.build_hasher.hash_one(&self.items[index])
        });
        let hash = self.build_hasher.hash_one(&value);
        match self.positions.find_or_vacant(
            hash,
            |index| self.items[index] == value,
            |index| self.build_hasher.hash_one(&self.items[index]),
        ) {
            Lookup::Found(index) => (index, false),
            Lookup::Vacant(slot) => {
                let new_index = self.items.len();
                slot.record(new_index);
                self.items.push(value);
                (new_index, true)
            }
        }
    }
    /// Returns `true` if the set contains a value equivalent to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_index_of(value).is_some()
    }
    /// Returns the slot of the item equivalent to `value`, if it exists.
    pub fn get_index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        self.positions
            .find(hash, |index| self.items[index].borrow() == value)
    }
    /// Returns a reference to the item in the set equivalent to `value`, if it exists.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_index_of(value).map(|index| &self.items[index])
    }
    /// Removes the last item from the set and returns it, if it exists.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        let hash = self.build_hasher.hash_one(&item);
        let taken = self.positions.take(hash, |index| index == self.items.len());
        assert_eq!(taken, Some(self.items.len()), "popped item had no position entry");
        Some(item)
    }
    /// Removes the item in slot `index`, moving the last item into the freed slot.
    fn swap_remove_finish(&mut self, index: usize) -> T {
        let item = self.items.swap_remove(index);
        if index < self.items.len() {
            let moved_hash = self.build_hasher.hash_one(&self.items[index]);
            self.positions.relocate(moved_hash, self.items.len(), index);
        }
        item
    }
    /// Removes the specified value from the set, if it exists. Returns `true` if an item was removed.
    ///
    /// The last item is put in its place.
    pub fn swap_remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.swap_remove_full(value).is_some()
    }
    /// Removes the specified value from the set and returns it, if it exists.
    ///
    /// The last item is put in its place.
    pub fn swap_take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.swap_remove_full(value).map(|x| x.1)
    }
    /// Removes the specified value from the set and returns its former slot and it, if it exists.
    ///
    /// The last item is put in its place.
    pub fn swap_remove_full<Q>(&mut self, value: &Q) -> Option<(usize, T)>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.build_hasher.hash_one(value);
        let index = self
            .positions
            .take(hash, |index| self.items[index].borrow() == value)?;
        Some((index, self.swap_remove_finish(index)))
    }
    /// Removes the item in the given slot and returns it, if it exists.
    ///
    /// The last item is put in its place.
    pub fn swap_remove_index(&mut self, index: usize) -> Option<T> {
        let hash = self.build_hasher.hash_one(self.items.get(index)?);
        let taken = self.positions.take(hash, |i| i == index);
        assert_eq!(taken, Some(index), "item at {index} had no position entry");
        Some(self.swap_remove_finish(index))
    }
    /// Returns `true` if the set is a subset of `other`.
    ///
    /// The order of elements is ignored.
    pub fn is_subset<S2: BuildHasher>(&self, other: &DenseSet<T, S2>) -> bool {
        self.len() <= other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl<T: Hash + Eq, S1: BuildHasher, S2: BuildHasher> PartialEq<DenseSet<T, S2>>
    for DenseSet<T, S1>
{
    fn eq(&self, other: &DenseSet<T, S2>) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for DenseSet<T, S> {}

/// An iterator that moves out of a set.
///
/// This struct is created by the `into_iter` method on [`DenseSet`].
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}
impl<T> Iterator for IntoIter<T> {
    type Item = T;
    impl_iterator!();
}
impl<T, S> IntoIterator for DenseSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.items.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a DenseSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator that returns references into a set.
///
/// This struct is created by the [`iter`](DenseSet::iter) method on [`DenseSet`].
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, T>,
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    impl_iterator!();
}

impl<T, S> DenseSet<T, S> {
    /// Returns an iterator over the set, yielding items in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.items.iter(),
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher> Extend<T> for DenseSet<T, S> {
    fn extend<IntoIter: IntoIterator<Item = T>>(&mut self, iter: IntoIter) {
        let iter = iter.into_iter();
        let (lower_bound, _) = iter.size_hint();
        self.reserve(lower_bound);
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for DenseSet<T, S> {
    fn from_iter<IntoIter: IntoIterator<Item = T>>(iter: IntoIter) -> Self {
        let mut set = DenseSet::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T: Hash, S: BuildHasher> DenseSet<T, S> {
    #[cfg(test)]
    pub(crate) fn check(&self) {
        assert_eq!(self.positions.len(), self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let hash = self.build_hasher.hash_one(item);
            assert_eq!(self.positions.find(hash, |idx| idx == index), Some(index));
        }
    }
    #[cfg(test)]
    pub(crate) fn force_wide_positions(&mut self) {
        self.positions
            .force_large(|index| self.build_hasher.hash_one(&self.items[index]));
    }
}
