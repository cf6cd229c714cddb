//! [RandomizedSet] is a thread-safe hash set that can return a uniformly random element in O(1).
//!
//! Items are kept in a dense `Vec` without gaps, supplemented by a hashbrown `HashTable` that
//! records the slot of each item (the table only stores indices into the `Vec`). Insertion
//! appends, removal moves the last item into the freed slot, and a random pick draws a uniform
//! index into the `Vec`. All of these are O(1) on average.
//!
//! The unsynchronized structure is available as [DenseSet]. [RandomizedSet] wraps it in a
//! reader/writer lock: `add`, `remove` and `clear` take the lock exclusively, while `contains`,
//! `size` and random picks share it.
//!
//! For small sets (less than 4 billion entries) the position table stores `u32` values, and is
//! upgraded to `usize` values as needed.

mod error;
mod position_index;
#[cfg(test)]
mod test_set;
mod util;

pub use dense_set::{DefaultBuildHasher, DenseSet};
pub use error::EmptySet;
pub use randomized_set::RandomizedSet;

pub mod dense_set;
pub mod randomized_set;
