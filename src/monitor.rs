use {
    crate::{
        helper::HelperSource,
        sampler::Sampler,
        snapshot::Metrics,
        source::{Clock, CounterSource},
    },
    std::{
        io,
        sync::{
            Arc, PoisonError, RwLock,
            atomic::{AtomicBool, Ordering},
        },
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
    tracing::{debug, error},
};

/// samples metrics on a background thread, at a fixed interval.
///
/// the sampler owns its working [`Snapshot`][crate::Snapshot] outright. after each update, a
/// copy of its metrics is published for readers, so a reader never observes a half-written
/// update.
pub struct Monitor {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

/// a handle to the latest published metrics.
#[derive(Clone)]
pub struct Reader {
    shared: Arc<Shared>,
}

struct Shared {
    latest: RwLock<Metrics>,
    stop: AtomicBool,
}

// === impl Monitor ===

impl Monitor {
    /// starts sampling.
    pub fn spawn<S, C, H>(sampler: Sampler<S, C, H>, interval: Duration) -> io::Result<Self>
    where
        S: CounterSource + Send + 'static,
        C: Clock + Send + 'static,
        H: HelperSource + Send + 'static,
    {
        let shared = Arc::new(Shared {
            latest: RwLock::new(Metrics::default()),
            stop: AtomicBool::new(false),
        });

        let worker = thread::Builder::new().name("sampler".to_owned()).spawn({
            let shared = Arc::clone(&shared);
            move || Self::run(sampler, interval, &shared)
        })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    pub fn reader(&self) -> Reader {
        Reader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// returns the latest published metrics.
    pub fn latest(&self) -> Metrics {
        self.shared.latest()
    }

    /// stops sampling, waiting for the current cycle to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.shared.stop.store(true, Ordering::Release);

        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            if worker.join().is_err() {
                error!("sampler thread panicked");
            }
        }
    }

    fn run<S, C, H>(sampler: Sampler<S, C, H>, interval: Duration, shared: &Shared)
    where
        S: CounterSource,
        C: Clock,
        H: HelperSource,
    {
        debug!(?interval, "sampling");
        let mut snapshot = sampler.snapshot();

        while !shared.stop.load(Ordering::Acquire) {
            sampler.update(&mut snapshot);
            *shared
                .latest
                .write()
                .unwrap_or_else(PoisonError::into_inner) = *snapshot.metrics();
            shared.sleep(interval);
        }

        debug!("stopped sampling");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// === impl Reader ===

impl Reader {
    /// returns the latest published metrics.
    pub fn latest(&self) -> Metrics {
        self.shared.latest()
    }
}

// === impl Shared ===

impl Shared {
    fn latest(&self) -> Metrics {
        *self.latest.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// sleeps for `interval`, waking early if asked to stop.
    fn sleep(&self, interval: Duration) {
        let deadline = Instant::now() + interval;
        while !self.stop.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            // parking may wake spuriously, so the deadline is checked again.
            thread::park_timeout(deadline - now);
        }
    }
}
