#![allow(missing_docs)]
use crate::DenseSet;
use indexmap::IndexSet;
use rand::prelude::*;
use std::hash::{BuildHasherDefault, Hash};
use zwohash::ZwoHasher;

type ZwoSet<T> = DenseSet<T, BuildHasherDefault<ZwoHasher>>;

/// Drives a [`DenseSet`] and an `IndexSet` side by side. Both use the same swap-remove
/// discipline, so item positions must agree exactly.
struct CheckedSet<T> {
    dut: ZwoSet<T>,
    ref_set: IndexSet<T>,
}

impl<T: Hash + Eq + Clone + std::fmt::Debug> CheckedSet<T> {
    fn new(wide_positions: bool) -> Self {
        let mut dut = ZwoSet::default();
        if wide_positions {
            dut.force_wide_positions();
        }
        CheckedSet {
            dut,
            ref_set: IndexSet::new(),
        }
    }
    fn get_index(&mut self, index: usize) -> Option<&T> {
        let ref_result = self.ref_set.get_index(index);
        let dut_result = self.dut.get_index(index);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn swap_take(&mut self, value: &T) -> Option<T> {
        let ref_result = self.ref_set.swap_take(value);
        let dut_result = self.dut.swap_take(value);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn get_index_of(&mut self, value: &T) -> Option<usize> {
        let ref_result = self.ref_set.get_index_of(value);
        let dut_result = self.dut.get_index_of(value);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn insert_full(&mut self, value: T) -> (usize, bool) {
        let ref_result = self.ref_set.insert_full(value.clone());
        let dut_result = self.dut.insert_full(value);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn swap_remove_full(&mut self, value: &T) -> Option<(usize, T)> {
        let ref_result = self.ref_set.swap_remove_full(value);
        let dut_result = self.dut.swap_remove_full(value);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn swap_remove_index(&mut self, index: usize) -> Option<T> {
        let ref_result = self.ref_set.swap_remove_index(index);
        let dut_result = self.dut.swap_remove_index(index);
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn pop(&mut self) -> Option<T> {
        let ref_result = self.ref_set.pop();
        let dut_result = self.dut.pop();
        assert_eq!(ref_result, dut_result);
        ref_result
    }
    fn choose(&mut self, rng: &mut impl Rng) -> Option<T> {
        let chosen = self.dut.choose(rng).cloned();
        match &chosen {
            Some(item) => assert!(self.ref_set.contains(item)),
            None => assert!(self.ref_set.is_empty()),
        }
        chosen
    }
    fn clear(&mut self) {
        self.dut.clear();
        self.ref_set.clear();
    }
    fn check(&mut self) {
        self.dut.check();
        assert!(self.ref_set.iter().eq(&self.dut));
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn test_suite<T: Hash + Eq + Clone + std::fmt::Debug, R: Rng + SeedableRng>(
    mut rand_t: impl FnMut(&mut R) -> T,
    wide_positions: bool,
) {
    let mut set: CheckedSet<T> = CheckedSet::new(wide_positions);
    let mut rng = R::seed_from_u64(25);
    let mut max_size = 0;
    let verbosity = 1;
    for _ in 0..5000 {
        weighted_choose! {&mut rng,
            Insert: 1.0 => {
                let item = rand_t(&mut rng);
                let result = set.insert_full(item.clone());
                if verbosity > 0 {
                    println!("inserting {item:?} -> {result:?}");
                }
            },
            InsertPresent: 0.2 => {
                if let Some(item) = set.ref_set.iter().choose(&mut rng).cloned() {
                    let result = set.insert_full(item.clone());
                    assert!(!result.1);
                    if verbosity > 0 {
                        println!("reinserting {item:?} -> {result:?}");
                    }
                }
            },
            GetPresent: 0.5 => {
                if let Some(item) = set.ref_set.iter().choose(&mut rng).cloned() {
                    let result = set.get_index_of(&item);
                    if verbosity > 0 {
                        println!("getting {item:?} -> {result:?}");
                    }
                }
            },
            GetAbsent: 0.3 => {
                let item = rand_t(&mut rng);
                let result = set.get_index_of(&item);
                if verbosity > 0 {
                    println!("getting {item:?} -> {result:?}");
                }
            },
            RemovePresent: 0.4 => {
                if let Some(item) = set.ref_set.iter().choose(&mut rng).cloned() {
                    let result = set.swap_remove_full(&item);
                    if verbosity > 0 {
                        println!("removing {item:?} -> {result:?}");
                    }
                }
            },
            RemoveAbsent: 0.3 => {
                let item = rand_t(&mut rng);
                let result = set.swap_remove_full(&item);
                if verbosity > 0 {
                    println!("removing {item:?} -> {result:?}");
                }
            },
            Take: 0.2 => {
                let item = match set.ref_set.iter().choose(&mut rng).cloned() {
                    Some(item) if rng.gen_bool(0.8) => item,
                    _ => rand_t(&mut rng),
                };
                let result = set.swap_take(&item);
                if verbosity > 0 {
                    println!("taking {item:?} -> {result:?}");
                }
            },
            GetIndex: 0.2 => {
                let len = set.ref_set.len();
                let index = rng.gen_range(0..=len);
                let result = set.get_index(index).cloned();
                if verbosity > 0 {
                    println!("getting index {index:?} -> {result:?}");
                }
            },
            RemoveIndex: 0.2 => {
                let len = set.ref_set.len();
                // try to generate invalid indices sometimes
                let index = rng.gen_range(0..=(len + len.div_ceil(10)));
                let result = set.swap_remove_index(index);
                if verbosity > 0 {
                    println!("removing index {index:?} -> {result:?}");
                }
            },
            Pop: 0.2 => {
                let result = set.pop();
                if verbosity > 0 {
                    println!("popping -> {result:?}");
                }
            },
            Choose: 0.5 => {
                let result = set.choose(&mut rng);
                if verbosity > 0 {
                    println!("choosing -> {result:?}");
                }
            },
            Clear: 0.002 => {
                set.clear();
                if verbosity > 0 {
                    println!("clear");
                }
            },
            Check: 0.15 => {
                set.check();
                if verbosity > 0 {
                    println!("check");
                }
            }
        };
        max_size = std::cmp::max(max_size, set.ref_set.len());
    }
    set.check();
    println!("max size: {max_size}");
}

#[test]
fn test_suite_usize() {
    test_suite::<usize, rand_pcg::Pcg64>(
        |rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS),
        false,
    );
}

#[test]
fn test_suite_usize_wide_positions() {
    // start with usize storage to exercise the large index code
    test_suite::<usize, rand_pcg::Pcg64>(
        |rng| rng.gen::<usize>() >> rng.gen_range(0..usize::BITS),
        true,
    );
}

#[test]
fn test_suite_small_key_space() {
    // lots of collisions between inserted and removed items
    test_suite::<u8, rand_pcg::Pcg64>(|rng| rng.gen_range(0..64), false);
}

#[test]
fn test_suite_string() {
    test_suite::<String, rand_pcg::Pcg64>(|rng| {
        let len = rng.gen_range(1..8);
        String::from_iter((0..len).map(|_| rng.gen_range('a'..'f')))
    }, true);
}

#[test]
fn test_reserve() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(58);
    for size in [10, 50, 100, 200, 500, 1000] {
        let mut set = CheckedSet::<usize>::new(size % 100 == 0);
        set.dut.reserve(size);
        set.ref_set.reserve(size);
        for _ in 0..size + 5 {
            set.insert_full(rng.gen());
        }
        set.check();
    }
}

#[test]
fn test_remove_all_in_random_order() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
    let mut items: Vec<u32> = (0..500).collect();
    let mut set: ZwoSet<u32> = items.iter().copied().collect();
    items.shuffle(&mut rng);
    for (removed, item) in items.iter().enumerate() {
        assert!(set.swap_remove(item));
        assert!(!set.contains(item));
        assert_eq!(set.len(), 500 - removed - 1);
        if removed % 50 == 0 {
            set.check();
        }
    }
    assert!(set.is_empty());
}
