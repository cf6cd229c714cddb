//! Hash table mapping items to their slot in the dense item vector.
//!
//! The table stores only slot indices. Hashes and equality are computed on demand from the item
//! vector by the caller-supplied closures, so no key is ever stored twice.
use hashbrown::hash_table::{self, HashTable};

#[derive(Debug, Clone)]
pub enum PositionIndex {
    Small(HashTable<u32>),
    Large(HashTable<usize>),
}

/// Result of [`PositionIndex::find_or_vacant`].
#[derive(Debug)]
pub enum Lookup<'a> {
    Found(usize),
    Vacant(VacantSlot<'a>),
}

/// A slot of the index table where no equivalent item is recorded yet.
#[derive(Debug)]
pub enum VacantSlot<'a> {
    Small(hash_table::VacantEntry<'a, u32>),
    Large(hash_table::VacantEntry<'a, usize>),
}

impl Default for PositionIndex {
    fn default() -> Self {
        PositionIndex::Small(HashTable::new())
    }
}

#[inline(always)]
fn small(index: usize) -> u32 {
    u32::try_from(index).expect("position index was not upgraded before storing a large index")
}

impl PositionIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        if u32::try_from(capacity).is_ok() {
            PositionIndex::Small(HashTable::with_capacity(capacity))
        } else {
            PositionIndex::Large(HashTable::with_capacity(capacity))
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        match self {
            PositionIndex::Small(table) => table.len(),
            PositionIndex::Large(table) => table.len(),
        }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        match self {
            PositionIndex::Small(table) => table.clear(),
            PositionIndex::Large(table) => table.clear(),
        }
    }

    #[inline(always)]
    pub fn find(&self, hash: u64, mut eq: impl FnMut(usize) -> bool) -> Option<usize> {
        match self {
            PositionIndex::Small(table) => table
                .find(hash, |&index| eq(index as usize))
                .map(|&index| index as usize),
            PositionIndex::Large(table) => table.find(hash, |&index| eq(index)).copied(),
        }
    }

    /// Looks up an entry, returning either its recorded position or the vacant slot where a
    /// new position can be recorded.
    ///
    /// The caller must have called [`grow_for`](Self::grow_for) with the position it is going to
    /// record.
    #[inline(always)]
    pub fn find_or_vacant(
        &mut self,
        hash: u64,
        mut eq: impl FnMut(usize) -> bool,
        hasher: impl Fn(usize) -> u64,
    ) -> Lookup<'_> {
        match self {
            PositionIndex::Small(table) => match table.entry(
                hash,
                |&index| eq(index as usize),
                |&index| hasher(index as usize),
            ) {
                hash_table::Entry::Occupied(entry) => Lookup::Found(*entry.get() as usize),
                hash_table::Entry::Vacant(entry) => Lookup::Vacant(VacantSlot::Small(entry)),
            },
            PositionIndex::Large(table) => {
                match table.entry(hash, |&index| eq(index), |&index| hasher(index)) {
                    hash_table::Entry::Occupied(entry) => Lookup::Found(*entry.get()),
                    hash_table::Entry::Vacant(entry) => Lookup::Vacant(VacantSlot::Large(entry)),
                }
            }
        }
    }

    /// Removes the matching entry and returns the position it recorded.
    #[inline(always)]
    pub fn take(&mut self, hash: u64, mut eq: impl FnMut(usize) -> bool) -> Option<usize> {
        match self {
            PositionIndex::Small(table) => table
                .find_entry(hash, |&index| eq(index as usize))
                .ok()
                .map(|entry| entry.remove().0 as usize),
            PositionIndex::Large(table) => table
                .find_entry(hash, |&index| eq(index))
                .ok()
                .map(|entry| entry.remove().0),
        }
    }

    /// Rewrites the entry recording position `from` so that it records `to` instead.
    ///
    /// `hash` must be the hash of the item that moved. Panics if no such entry exists, which
    /// means the table and the item vector are out of sync.
    #[inline(always)]
    pub fn relocate(&mut self, hash: u64, from: usize, to: usize) {
        let found = match self {
            PositionIndex::Small(table) => table
                .find_mut(hash, |&index| index as usize == from)
                .map(|index| *index = small(to))
                .is_some(),
            PositionIndex::Large(table) => table
                .find_mut(hash, |&index| index == from)
                .map(|index| *index = to)
                .is_some(),
        };
        assert!(found, "no position entry for moved item at {from}");
    }

    #[inline(always)]
    pub fn is_small(&self) -> bool {
        matches!(self, PositionIndex::Small(_))
    }

    /// Makes sure that `index` can be stored, switching to `usize` storage if needed.
    #[inline(always)]
    pub fn grow_for(&mut self, index: usize, hasher: impl Fn(usize) -> u64) {
        if u32::try_from(index).is_err() && self.is_small() {
            self.grow_cold(hasher)
        }
    }

    /// Switches to `usize` storage regardless of the current length.
    #[cfg(test)]
    pub fn force_large(&mut self, hasher: impl Fn(usize) -> u64) {
        if self.is_small() {
            self.grow_cold(hasher)
        }
    }

    #[inline(never)]
    #[cold]
    fn grow_cold(&mut self, hasher: impl Fn(usize) -> u64) {
        let PositionIndex::Small(old_table) =
            std::mem::replace(self, PositionIndex::Large(HashTable::new()))
        else {
            unreachable!()
        };
        let PositionIndex::Large(new_table) = self else {
            unreachable!()
        };
        log::debug!(
            "upgrading position index with {} entries to wide storage",
            old_table.len()
        );
        new_table.reserve(old_table.len(), |&j| hasher(j));
        for i in old_table {
            new_table.insert_unique(hasher(i as usize), i as usize, |&j| hasher(j));
        }
    }

    #[inline(always)]
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(usize) -> u64) {
        self.grow_for((self.len() + additional).saturating_sub(1), &hasher);
        match self {
            PositionIndex::Small(table) => {
                table.reserve(additional, |&index| hasher(index as usize))
            }
            PositionIndex::Large(table) => table.reserve(additional, |&index| hasher(index)),
        }
    }
}

impl VacantSlot<'_> {
    /// Records `index` as the position of the item this slot was looked up for.
    #[inline(always)]
    pub fn record(self, index: usize) {
        match self {
            VacantSlot::Small(entry) => {
                entry.insert(small(index));
            }
            VacantSlot::Large(entry) => {
                entry.insert(index);
            }
        }
    }
}
