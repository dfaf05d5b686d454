use {
    clap::{Args, Parser, Subcommand},
    std::{path::PathBuf, time::Duration},
    tracing::level_filters::LevelFilter,
    vitals::Config,
};

/// a dual-source system metrics sampler.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub sampling: Sampling,

    /// the log level, when `RUST_LOG` is not set.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// show a live readout in the terminal. this is the default.
    Watch {
        /// how often the readout is redrawn.
        #[arg(long, value_name = "SECS", default_value = "1", value_parser = parse_secs)]
        refresh: Duration,
    },
    /// sample kernel counters directly, and print them.
    ///
    /// this never consults a helper, so `metrics --json --once` can itself serve as one.
    Metrics {
        /// print json, rather than a summary line.
        #[arg(long)]
        json: bool,
        /// print a single sample, and exit.
        #[arg(long)]
        once: bool,
        /// with `--once`, how long to wait between the baseline and the printed sample.
        #[arg(long, value_name = "MS", default_value_t = 500)]
        settle: u64,
    },
}

#[derive(Debug, Args)]
pub struct Sampling {
    /// the helper to consult before parsing kernel counters.
    ///
    /// defaults to `flux-monitor`, beside this executable.
    #[arg(long, global = true, env = "VITALS_HELPER", value_name = "PATH")]
    helper: Option<PathBuf>,

    /// never consult a helper.
    #[arg(long, global = true, conflicts_with = "helper")]
    no_helper: bool,

    /// how long the helper may run before it is killed.
    #[arg(long, global = true, value_name = "SECS", default_value = "5", value_parser = parse_secs)]
    helper_timeout: Duration,

    /// how often metrics are sampled.
    #[arg(long, global = true, value_name = "SECS", default_value = "3", value_parser = parse_secs)]
    interval: Duration,

    /// where `procfs` is mounted.
    #[arg(long, global = true, value_name = "PATH", default_value = Config::PROC_ROOT)]
    proc_root: PathBuf,
}

// === impl Command ===

impl Default for Command {
    fn default() -> Self {
        Self::Watch {
            refresh: Duration::from_secs(1),
        }
    }
}

// === impl Sampling ===

impl Sampling {
    pub fn config(&self) -> Config {
        let Self {
            helper,
            no_helper,
            helper_timeout,
            interval,
            proc_root,
        } = self;

        let helper = match (no_helper, helper) {
            (true, _) => None,
            (false, Some(helper)) => Some(helper.clone()),
            (false, None) => Config::default_helper(),
        };

        Config {
            helper,
            helper_timeout: *helper_timeout,
            interval: *interval,
            proc_root: proc_root.clone(),
        }
    }
}

fn parse_secs(secs: &str) -> Result<Duration, String> {
    let secs = secs.parse::<f64>().map_err(|e| e.to_string())?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| format!("expected a positive number of seconds, found {secs}"))
}
