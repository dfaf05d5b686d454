use {
    crate::{
        config::Config,
        counters::{self, CpuTime, DiskStats, LoadAvg, MemInfo, NetDev, ReadError, Uptime},
        helper::{HelperError, HelperProcess, HelperSource},
        snapshot::{Metrics, Snapshot},
        source::{Clock, Counter, CounterSource, ProcFs, SystemClock},
    },
    std::{iter, str::FromStr},
    tracing::{debug, trace, warn},
};

#[cfg(test)]
mod tests;

/// acquires the system's vitals, updating a [`Snapshot`] in place.
///
/// the external helper is preferred. when it is missing or fails, kernel counters are parsed
/// directly.
pub struct Sampler<S = ProcFs, C = SystemClock, H = HelperProcess> {
    helper: Option<Helper<H>>,
    fallback: Fallback<S, C>,
}

/// a way of acquiring metrics.
trait Acquire {
    /// a name for this strategy, for diagnostics.
    fn name(&self) -> &'static str;

    /// updates the snapshot. on error, the snapshot is left untouched.
    fn acquire(&self, snapshot: &mut Snapshot) -> Result<(), AcquireError>;
}

#[derive(Debug, thiserror::Error)]
enum AcquireError {
    #[error(transparent)]
    Helper(#[from] HelperError),
}

/// acquires metrics from the helper's json emission.
struct Helper<H> {
    source: H,
}

/// acquires metrics by parsing kernel counters.
struct Fallback<S, C> {
    source: S,
    clock: C,
}

// === impl Sampler ===

impl Sampler {
    /// a sampler reading the system's counters, and the helper named by `config`.
    pub fn new(config: &Config) -> Self {
        let helper = config
            .helper
            .as_ref()
            .map(|path| HelperProcess::new(path, config.helper_timeout));

        Self::with_parts(helper, ProcFs::new(&config.proc_root), SystemClock)
    }
}

impl<S, C, H> Sampler<S, C, H> {
    pub fn with_parts(helper: Option<H>, source: S, clock: C) -> Self {
        Self {
            helper: helper.map(|source| Helper { source }),
            fallback: Fallback { source, clock },
        }
    }

    /// a sampler that only ever parses kernel counters.
    pub fn fallback_only(source: S, clock: C) -> Self {
        Self::with_parts(None, source, clock)
    }
}

impl<S, C, H> Sampler<S, C, H>
where
    S: CounterSource,
    C: Clock,
    H: HelperSource,
{
    /// creates a zeroed snapshot for this sampler to update.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.fallback.clock.now())
    }

    /// updates the snapshot with fresh metrics.
    ///
    /// this never fails. a metric that cannot be acquired keeps its previous value.
    pub fn update(&self, snapshot: &mut Snapshot) {
        let Self { helper, fallback } = self;

        let strategies = helper
            .iter()
            .map(|helper| helper as &dyn Acquire)
            .chain(iter::once(fallback as &dyn Acquire));

        for strategy in strategies {
            match strategy.acquire(snapshot) {
                Ok(()) => {
                    trace!(strategy = strategy.name(), "updated snapshot");
                    return;
                }
                Err(AcquireError::Helper(error @ HelperError::Unavailable(_))) => {
                    debug!(%error, "falling back to kernel counters");
                }
                Err(error) => {
                    warn!(strategy = strategy.name(), %error, "falling back to kernel counters");
                }
            }
        }
    }
}

// === impl Helper ===

impl<H: HelperSource> Acquire for Helper<H> {
    fn name(&self) -> &'static str {
        "helper"
    }

    fn acquire(&self, snapshot: &mut Snapshot) -> Result<(), AcquireError> {
        let output = self.source.emit()?;
        let metrics = Metrics::from_json(&output).map_err(HelperError::from)?;

        // the helper's emission is authoritative, and calibration is left to the fallback.
        snapshot.metrics = metrics;
        Ok(())
    }
}

// === impl Fallback ===

impl<S: CounterSource, C: Clock> Acquire for Fallback<S, C> {
    fn name(&self) -> &'static str {
        "counters"
    }

    fn acquire(&self, snapshot: &mut Snapshot) -> Result<(), AcquireError> {
        let Snapshot {
            metrics,
            calibration,
        } = snapshot;

        // every rate in this cycle is derived over the same interval.
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(calibration.last_update);

        if let Some(cpu) = self.read::<CpuTime>(Counter::Stat) {
            metrics.cpu_usage_pct = cpu.usage();
        }

        if let Some(meminfo) = self.read::<MemInfo>(Counter::MemInfo) {
            let usage = meminfo.usage();
            metrics.memory_usage_pct = usage.percentage;
            metrics.memory_used_gb = usage.used_gb;
        }

        if let Some(net_dev) = self.read::<NetDev>(Counter::NetDev) {
            let (rx, tx) = net_dev.totals();
            if let Some(rate) = calibration.net_rx.advance(rx, elapsed) {
                metrics.network_rx_rate = rate;
            }
            if let Some(rate) = calibration.net_tx.advance(tx, elapsed) {
                metrics.network_tx_rate = rate;
            }
        }

        if let Some(diskstats) = self.read::<DiskStats>(Counter::DiskStats) {
            let (read, written) = diskstats.totals();
            if let Some(rate) = calibration.disk_read.advance(read, elapsed) {
                metrics.disk_read_rate = rate;
            }
            if let Some(rate) = calibration.disk_write.advance(written, elapsed) {
                metrics.disk_write_rate = rate;
            }
        }

        if let Some(LoadAvg(load)) = self.read(Counter::LoadAvg) {
            metrics.load_average = load;
        }

        match self.source.entries() {
            Ok(entries) => metrics.process_count = counters::count_processes(entries),
            Err(error) => debug!(%error, "failed to list processes"),
        }

        if let Some(Uptime(seconds)) = self.read(Counter::Uptime) {
            metrics.uptime_seconds = seconds;
        }

        trace!(
            ?elapsed,
            net_rx = calibration.net_rx.get(),
            net_tx = calibration.net_tx.get(),
            disk_read = calibration.disk_read.get(),
            disk_write = calibration.disk_write.get(),
            "sampled kernel counters"
        );
        calibration.last_update = now;
        Ok(())
    }
}

impl<S: CounterSource, C> Fallback<S, C> {
    /// reads a counter, logging and discarding any failure.
    fn read<T>(&self, counter: Counter) -> Option<T>
    where
        T: FromStr<Err = counters::ParseError>,
    {
        counters::read(&self.source, counter)
            .inspect_err(|error: &ReadError| debug!(%error, "skipping metric"))
            .ok()
    }
}
