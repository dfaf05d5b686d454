use std::{path::PathBuf, time::Duration};

/// how metrics are sampled.
#[derive(Clone, Debug)]
pub struct Config {
    /// the helper to consult first. `None` disables it.
    pub helper: Option<PathBuf>,
    /// how long the helper may run before it is killed.
    pub helper_timeout: Duration,
    /// how often metrics are sampled.
    pub interval: Duration,
    /// where `procfs` is mounted.
    pub proc_root: PathBuf,
}

// === impl Config ===

impl Config {
    /// the helper's file name, expected beside the running executable.
    pub const HELPER: &str = "flux-monitor";
    pub const HELPER_TIMEOUT: Duration = Duration::from_secs(5);
    pub const INTERVAL: Duration = Duration::from_secs(3);
    pub const PROC_ROOT: &str = "/proc";

    /// the default helper location, beside the running executable.
    pub fn default_helper() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        exe.parent().map(|dir| dir.join(Self::HELPER))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helper: Self::default_helper(),
            helper_timeout: Self::HELPER_TIMEOUT,
            interval: Self::INTERVAL,
            proc_root: PathBuf::from(Self::PROC_ROOT),
        }
    }
}
