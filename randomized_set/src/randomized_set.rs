//! [RandomizedSet] is a [DenseSet] shared between threads behind a reader/writer lock.
use crate::{dense_set::DefaultBuildHasher, DenseSet, EmptySet};
use core::hash::Hash;
use rand::Rng;
use std::{
    borrow::Borrow,
    hash::BuildHasher,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A concurrent hash set supporting O(1) uniformly random selection.
///
/// All operations take `&self`, so the set can be shared between threads, e.g. via an `Arc` or a
/// scoped thread borrow. Mutations (`add`, `remove`, `clear`, `take_random`) are serialized by an
/// exclusive lock and update the item vector and the position table together, so readers never
/// observe one without the other. Reads (`contains`, `size`, random picks) share the lock and may
/// run in parallel with each other.
///
/// The order in which items are stored is unspecified, removal reorders them.
pub struct RandomizedSet<T, S = DefaultBuildHasher> {
    inner: RwLock<DenseSet<T, S>>,
}

impl<T: std::fmt::Debug, S> std::fmt::Debug for RandomizedSet<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Ok(set) => f.debug_tuple("RandomizedSet").field(&*set).finish(),
            Err(_) => f.write_str("RandomizedSet(<locked>)"),
        }
    }
}

impl<T, S: Default> Default for RandomizedSet<T, S> {
    fn default() -> Self {
        Self::from(DenseSet::default())
    }
}

impl<T, S> From<DenseSet<T, S>> for RandomizedSet<T, S> {
    fn from(set: DenseSet<T, S>) -> Self {
        RandomizedSet {
            inner: RwLock::new(set),
        }
    }
}

impl<T> RandomizedSet<T> {
    /// Returns an empty set using the default hasher.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns an empty set with the specified capacity using the default hasher.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(DenseSet::with_capacity(capacity))
    }
}

impl<T, S> RandomizedSet<T, S> {
    /// Returns an empty set with the provided BuildHasher.
    pub fn with_hasher(build_hasher: S) -> Self {
        Self::from(DenseSet::with_hasher(build_hasher))
    }
    /// Returns an empty set with the specified capacity and provided BuildHasher.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        Self::from(DenseSet::with_capacity_and_hasher(capacity, build_hasher))
    }

    // A poisoned lock means a mutation panicked halfway (e.g. in a user `Hash` impl), leaving the
    // vector and the position table possibly out of sync.
    fn read(&self) -> RwLockReadGuard<'_, DenseSet<T, S>> {
        self.inner.read().expect("randomized set poisoned by a panicking mutation")
    }

    fn write(&self) -> RwLockWriteGuard<'_, DenseSet<T, S>> {
        self.inner.write().expect("randomized set poisoned by a panicking mutation")
    }

    /// Returns the number of items in the set.
    pub fn size(&self) -> usize {
        self.read().len()
    }
    /// Returns the number of items in the set, same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }
    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
    /// Removes all items.
    pub fn clear(&self) {
        let mut set = self.write();
        log::trace!("clearing {} items", set.len());
        set.clear();
    }

    /// Applies `f` to a uniformly chosen item while holding the read lock.
    ///
    /// Use this instead of [`get_random`](Self::get_random) to avoid cloning the item.
    ///
    /// `f` must not call back into the same set. The lock is not re-entrant: a mutation from
    /// within `f` deadlocks, and even a nested read may deadlock when a writer is queued. Return
    /// whatever is needed from `f` and act on it afterwards:
    ///
    /// ```
    /// use randomized_set::RandomizedSet;
    ///
    /// let set = RandomizedSet::new();
    /// set.add(String::from("apple"));
    /// set.add(String::from("kiwi"));
    ///
    /// let len = set.with_random(|fruit| fruit.len()).unwrap();
    /// assert!(len == 5 || len == 4);
    /// set.add(format!("{len}"));
    /// assert_eq!(set.size(), 3);
    /// ```
    pub fn with_random<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, EmptySet> {
        let set = self.read();
        match set.choose(&mut rand::thread_rng()) {
            Some(item) => Ok(f(item)),
            None => {
                log::debug!("random item requested from empty set");
                Err(EmptySet)
            }
        }
    }

    /// Returns a uniformly chosen item drawn using `rng`.
    pub fn get_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T, EmptySet>
    where
        T: Clone,
    {
        let set = self.read();
        match set.choose(rng) {
            Some(item) => Ok(item.clone()),
            None => {
                log::debug!("random item requested from empty set");
                Err(EmptySet)
            }
        }
    }

    /// Returns a uniformly chosen item.
    ///
    /// Every item currently in the set is returned with probability `1 / size()`. The random
    /// source is the calling thread's generator, so concurrent callers don't contend on it.
    pub fn get_random(&self) -> Result<T, EmptySet>
    where
        T: Clone,
    {
        self.get_random_with(&mut rand::thread_rng())
    }

    /// Returns a copy of all items, in unspecified order.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read().as_slice().to_vec()
    }

    /// Returns the underlying set.
    pub fn into_inner(self) -> DenseSet<T, S> {
        self.inner
            .into_inner()
            .expect("randomized set poisoned by a panicking mutation")
    }

    /// Returns mutable access to the underlying set. No locking is needed, as the borrow is
    /// exclusive.
    pub fn get_mut(&mut self) -> &mut DenseSet<T, S> {
        self.inner
            .get_mut()
            .expect("randomized set poisoned by a panicking mutation")
    }
}

impl<T: Hash + Eq, S: BuildHasher> RandomizedSet<T, S> {
    /// Inserts an item, unless the set contains an equivalent item already.
    /// Returns `true` if the item was inserted.
    pub fn add(&self, item: T) -> bool {
        let inserted = self.write().insert(item);
        if inserted {
            log::trace!("added item");
        } else {
            log::debug!("add skipped, set already contains item");
        }
        inserted
    }

    /// Removes the item equivalent to `item`, if it exists. Returns `true` if an item was removed.
    ///
    /// The last stored item takes the place of the removed one.
    pub fn remove<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.write().swap_remove(item);
        if removed {
            log::trace!("removed item");
        } else {
            log::debug!("remove skipped, set does not contain item");
        }
        removed
    }

    /// Returns `true` if the set contains an item equivalent to `item`.
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().contains(item)
    }

    /// Removes a uniformly chosen item and returns it.
    ///
    /// Choosing and removing happen under one exclusive lock, so concurrent callers never
    /// receive the same item.
    pub fn take_random(&self) -> Result<T, EmptySet> {
        let mut set = self.write();
        if set.is_empty() {
            log::debug!("random item requested from empty set");
            return Err(EmptySet);
        }
        let index = rand::thread_rng().gen_range(0..set.len());
        Ok(set
            .swap_remove_index(index)
            .expect("chosen index is within the dense item vector"))
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for RandomizedSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(DenseSet::from_iter(iter))
    }
}

impl<T: Hash + Eq, S: BuildHasher> Extend<T> for RandomizedSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.get_mut().extend(iter)
    }
}
