//! Default logging setup for the randomized set tools
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

use std::{fmt, sync::Mutex, time::Instant};

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const THREAD_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Name of the logging thread, falling back to its id for unnamed threads.
struct ThreadLabel(std::thread::Thread);

impl fmt::Display for ThreadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.name() {
            Some(name) => write!(f, "{name:>8}"),
            None => write!(f, "{:>8}", format!("{:?}", self.0.id())),
        }
    }
}

/// Perform the default logging setup used by the randomized set tools
///
/// The filter is read from `RSET_LOG` (defaulting to `info`) and the color choice from
/// `RSET_LOG_STYLE`.
pub fn setup() {
    let start_time = Instant::now();

    let last_target = Mutex::new(String::new());

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("RSET_LOG", "info")
            .write_style("RSET_LOG_STYLE"),
    )
    .format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();
        let thread = ThreadLabel(std::thread::current());

        // a panic while holding the lock only loses the header bookkeeping
        let mut last_target = last_target
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if target != *last_target {
            last_target.clear();
            last_target.push_str(target);

            writeln!(
                buf,
                "{} {}",
                format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
            )?;
        }
        writeln!(
            buf,
            "{} {} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!("{style}{thread}{style:#}", style = THREAD_STYLE),
            format_args!(
                "{style}{level}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    })
    .init();
}
