use color_eyre::eyre::ensure;
use rand::{rngs::SmallRng, SeedableRng};
use randomized_set::RandomizedSet;
use std::fmt;

pub struct UniformityReport {
    pub statistic: f64,
    pub bound: f64,
    pub min_count: usize,
    pub max_count: usize,
}

impl UniformityReport {
    pub fn passed(&self) -> bool {
        self.statistic <= self.bound
    }
}

impl fmt::Display for UniformityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chi-square={:.2} bound={:.2} min_count={} max_count={}",
            self.statistic, self.bound, self.min_count, self.max_count
        )
    }
}

/// Pearson's chi-square statistic of `counts` against a uniform distribution.
pub fn chi_square(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Mean plus six standard deviations of the chi-square distribution for `k` categories.
pub fn chi_square_bound(k: usize) -> f64 {
    let df = k.saturating_sub(1) as f64;
    df + 6.0 * (2.0 * df).sqrt()
}

/// Fills a set with `key_space` items, removes every third one and draws `samples` picks from
/// the rest.
pub fn run(key_space: usize, samples: usize, seed: u64) -> color_eyre::Result<UniformityReport> {
    ensure!(samples > 0, "at least one sample is needed");

    let set: RandomizedSet<usize> = (0..key_space).collect();
    // leave the removed slots to be filled by swap-to-end
    for item in (0..key_space).step_by(3).skip(1) {
        set.remove(&item);
    }
    let remaining = set.snapshot();
    let mut bucket = vec![usize::MAX; key_space];
    for (index, &item) in remaining.iter().enumerate() {
        bucket[item] = index;
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut counts = vec![0; remaining.len()];
    for _ in 0..samples {
        let item = set.get_random_with(&mut rng)?;
        ensure!(bucket[item] != usize::MAX, "picked removed item {item}");
        counts[bucket[item]] += 1;
    }

    Ok(UniformityReport {
        statistic: chi_square(&counts),
        bound: chi_square_bound(counts.len()),
        min_count: counts.iter().copied().min().unwrap_or(0),
        max_count: counts.iter().copied().max().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chi_square_of_exact_uniform_is_zero() {
        assert_eq!(chi_square(&[5, 5, 5, 5]), 0.0);
    }

    #[test]
    fn chi_square_detects_skew() {
        let stat = chi_square(&[100, 0, 0, 0]);
        assert!(stat > chi_square_bound(4));
    }

    #[test]
    fn picks_pass() {
        let report = run(30, 60_000, 4).unwrap();
        assert!(report.passed(), "{report}");
        assert!(report.min_count > 0);
    }

    #[test]
    fn single_item_set_passes() {
        let report = run(1, 100, 0).unwrap();
        assert_eq!(report.statistic, 0.0);
        assert!(report.passed());
    }
}
