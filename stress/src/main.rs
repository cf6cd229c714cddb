//! Stress and uniformity driver for [`randomized_set::RandomizedSet`].
mod uniformity;
mod workload;

use clap::Parser;
use color_eyre::eyre::{bail, ensure};
use serde_json::json;

/// Largest accepted key space. The driver preallocates one slot per key.
const MAX_KEY_SPACE: u64 = 1 << 28;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(short = 't', long, default_value = "8")]
    threads: usize,
    #[clap(short = 'n', long, default_value = "100000")]
    ops: usize,
    #[clap(short = 'k', long, default_value = "1024")]
    key_space: u64,
    #[clap(short = 's', long, default_value = "1000000")]
    samples: usize,
    #[clap(long, default_value = "0")]
    seed: u64,

    #[clap(long)]
    jsonl_output: bool,
}

fn checked_key_space(key_space: u64) -> color_eyre::Result<usize> {
    ensure!(key_space > 0, "key space must not be empty");
    ensure!(
        key_space <= MAX_KEY_SPACE,
        "key space {key_space} exceeds the limit of {MAX_KEY_SPACE}"
    );
    Ok(usize::try_from(key_space)?)
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    rset_logger::setup();

    let key_space = checked_key_space(args.key_space)?;

    log::info!(
        "# Workload: {} threads, {} ops each, {} keys",
        args.threads,
        args.ops,
        args.key_space
    );
    let report = workload::run(&workload::WorkloadOptions {
        threads: args.threads,
        ops_per_thread: args.ops,
        key_space: args.key_space,
        seed: args.seed,
    })?;
    log::info!("{report}");

    log::info!("# Uniformity: {} samples", args.samples);
    let uniformity = uniformity::run(key_space, args.samples, args.seed)?;
    log::info!("{uniformity}");

    if args.jsonl_output {
        println!(
            "{}",
            serde_json::to_string(&json!({
                "threads": args.threads,
                "ops": args.ops,
                "key_space": args.key_space,
                "adds": report.adds,
                "removes": report.removes,
                "picks": report.picks,
                "empty_picks": report.empty_picks,
                "final_size": report.final_size,
                "chi_square": uniformity.statistic,
                "chi_square_bound": uniformity.bound,
            }))?
        );
    }

    if !uniformity.passed() {
        bail!(
            "random picks are not uniform: chi-square {:.2} exceeds {:.2}",
            uniformity.statistic,
            uniformity.bound
        );
    }

    Ok(())
}
