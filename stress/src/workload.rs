use color_eyre::eyre::{ensure, eyre};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use randomized_set::{EmptySet, RandomizedSet};
use std::{collections::HashSet, fmt};

pub struct WorkloadOptions {
    pub threads: usize,
    pub ops_per_thread: usize,
    pub key_space: u64,
    pub seed: u64,
}

/// Per-thread operation counts. Only successful mutations are counted in `adds` and `removes`.
#[derive(Default, Debug, Clone, Copy)]
pub struct WorkloadReport {
    pub adds: u64,
    pub removes: u64,
    pub lookups: u64,
    pub picks: u64,
    pub empty_picks: u64,
    pub final_size: usize,
}

impl WorkloadReport {
    fn merge(&mut self, other: &WorkloadReport) {
        self.adds += other.adds;
        self.removes += other.removes;
        self.lookups += other.lookups;
        self.picks += other.picks;
        self.empty_picks += other.empty_picks;
    }
}

impl fmt::Display for WorkloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "adds={} removes={} lookups={} picks={} empty_picks={} final_size={}",
            self.adds, self.removes, self.lookups, self.picks, self.empty_picks, self.final_size
        )
    }
}

fn worker(
    set: &RandomizedSet<u64>,
    options: &WorkloadOptions,
    rng: &mut SmallRng,
) -> color_eyre::Result<WorkloadReport> {
    let mut report = WorkloadReport::default();
    for _ in 0..options.ops_per_thread {
        let key = rng.gen_range(0..options.key_space);
        match rng.gen_range(0..8) {
            0..=2 => report.adds += set.add(key) as u64,
            3..=4 => report.removes += set.remove(&key) as u64,
            5 => {
                set.contains(&key);
                report.lookups += 1;
            }
            _ => match set.get_random() {
                Ok(item) => {
                    ensure!(
                        item < options.key_space,
                        "picked item {item} outside of key space"
                    );
                    report.picks += 1;
                }
                Err(EmptySet) => report.empty_picks += 1,
            },
        }
    }
    Ok(report)
}

/// Runs a mixed workload on a shared set and checks that the result is consistent with the
/// successful operations every thread observed.
pub fn run(options: &WorkloadOptions) -> color_eyre::Result<WorkloadReport> {
    let set = RandomizedSet::with_capacity(usize::try_from(options.key_space)?);

    let reports = std::thread::scope(|scope| {
        let mut handles = vec![];
        for index in 0..options.threads {
            let set = &set;
            let mut rng = SmallRng::seed_from_u64(options.seed.wrapping_add(index as u64));
            handles.push(
                std::thread::Builder::new()
                    .name(format!("worker{index}"))
                    .spawn_scoped(scope, move || worker(set, options, &mut rng))?,
            );
        }
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| eyre!("worker thread panicked"))?
            })
            .collect::<color_eyre::Result<Vec<_>>>()
    })?;

    let mut total = WorkloadReport::default();
    for (index, report) in reports.iter().enumerate() {
        log::debug!("worker{index}: {report}");
        total.merge(report);
    }
    total.final_size = set.size();

    let snapshot = set.snapshot();
    let distinct: HashSet<u64> = snapshot.iter().copied().collect();
    ensure!(
        distinct.len() == snapshot.len(),
        "set holds {} items but only {} distinct ones",
        snapshot.len(),
        distinct.len()
    );
    ensure!(
        total.final_size == snapshot.len(),
        "size {} disagrees with snapshot length {}",
        total.final_size,
        snapshot.len()
    );
    ensure!(
        total.adds == total.removes + total.final_size as u64,
        "{} successful adds and {} successful removes leave size {}",
        total.adds,
        total.removes,
        total.final_size
    );
    ensure!(
        snapshot.iter().all(|item| set.contains(item)),
        "snapshot item missing from set"
    );

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_workload_is_consistent() {
        let report = run(&WorkloadOptions {
            threads: 4,
            ops_per_thread: 5_000,
            key_space: 64,
            seed: 9,
        })
        .unwrap();
        assert!(report.final_size <= 64);
        assert!(report.adds >= report.removes);
        assert!(report.picks > 0);
    }

    #[test]
    fn no_threads_leave_set_empty() {
        let report = run(&WorkloadOptions {
            threads: 0,
            ops_per_thread: 10,
            key_space: 8,
            seed: 0,
        })
        .unwrap();
        assert_eq!(report.final_size, 0);
        assert_eq!(report.adds, 0);
    }
}
