//! a dual-source system metrics sampler.

use {
    self::cli::{Cli, Command},
    clap::Parser,
    std::{
        io::{self, Write},
        thread,
        time::Duration,
    },
    tracing::level_filters::LevelFilter,
    tracing_subscriber::EnvFilter,
    vitals::{Config, HelperProcess, Metrics, ProcFs, Sampler, SystemClock},
};

mod cli;
mod meter;
mod window;

fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        sampling,
        log_level,
    } = Cli::parse();

    init_tracing(log_level);
    let config = sampling.config();

    match command.unwrap_or_default() {
        Command::Watch { refresh } => window::watch(&config, refresh),
        Command::Metrics { json, once, settle } => {
            metrics(&config, json, once.then(|| Duration::from_millis(settle)))
        }
    }
}

/// logs to stderr, leaving stdout for metrics.
fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// prints samples of kernel counters.
///
/// with a `settle` duration, a baseline is taken and a single sample is printed after it.
fn metrics(config: &Config, json: bool, settle: Option<Duration>) -> anyhow::Result<()> {
    let sampler = Sampler::<_, _, HelperProcess>::fallback_only(
        ProcFs::new(&config.proc_root),
        SystemClock,
    );
    let mut snapshot = sampler.snapshot();

    if let Some(settle) = settle {
        sampler.update(&mut snapshot);
        thread::sleep(settle);
        sampler.update(&mut snapshot);
        return print(snapshot.metrics(), json);
    }

    loop {
        sampler.update(&mut snapshot);
        print(snapshot.metrics(), json)?;
        thread::sleep(config.interval);
    }
}

fn print(metrics: &Metrics, json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut stdout, metrics)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", window::summary(metrics))?;
    }

    stdout.flush().map_err(Into::into)
}
