use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufReader, Cursor, Read},
    path::PathBuf,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

pub use self::{clock::*, procfs::*};

mod clock {
    use super::*;

    pub trait Clock {
        fn now(&self) -> Instant;
    }

    #[derive(Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Instant {
            Instant::now()
        }
    }

    /// a mock clock, moved forward by hand.
    pub struct MockClock {
        now: Mutex<Instant>,
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            let Self { now } = self;

            *now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Default for MockClock {
        fn default() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }
    }

    impl MockClock {
        /// moves the clock forward.
        pub fn advance(&self, by: Duration) {
            let Self { now } = self;

            *now.lock().unwrap_or_else(PoisonError::into_inner) += by;
        }
    }
}

/// abstracts over providers of kernel counters.
mod procfs {
    use super::*;

    /// a kernel-exposed counter file.
    #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
    pub enum Counter {
        /// aggregate and per-cpu time, `/proc/stat`.
        Stat,
        /// memory usage, `/proc/meminfo`.
        MemInfo,
        /// per-interface network counters, `/proc/net/dev`.
        NetDev,
        /// per-device i/o counters, `/proc/diskstats`.
        DiskStats,
        /// `/proc/loadavg`.
        LoadAvg,
        /// `/proc/uptime`.
        Uptime,
    }

    /// a source of kernel counters.
    pub trait CounterSource {
        /// returns a reader over the given counter file.
        fn open(&self, counter: Counter) -> io::Result<impl Read>;

        /// returns the names of the entries in the process listing.
        fn entries(&self) -> io::Result<Vec<String>>;
    }

    /// counters backed by a mounted `procfs`.
    pub struct ProcFs {
        root: PathBuf,
    }

    /// a mock counter source.
    #[derive(Default)]
    pub struct MockProcFs {
        files: Mutex<BTreeMap<Counter, String>>,
        entries: Mutex<Option<Vec<String>>>,
    }

    // === impl Counter ===

    impl Counter {
        /// every counter file, in sampling order.
        pub const ALL: [Counter; 6] = [
            Self::Stat,
            Self::MemInfo,
            Self::NetDev,
            Self::DiskStats,
            Self::LoadAvg,
            Self::Uptime,
        ];

        /// the path of this counter, relative to the `procfs` root.
        pub fn path(self) -> &'static str {
            match self {
                Self::Stat => "stat",
                Self::MemInfo => "meminfo",
                Self::NetDev => "net/dev",
                Self::DiskStats => "diskstats",
                Self::LoadAvg => "loadavg",
                Self::Uptime => "uptime",
            }
        }
    }

    // === impl ProcFs ===

    impl CounterSource for ProcFs {
        fn open(&self, counter: Counter) -> io::Result<impl Read> {
            File::open(self.root.join(counter.path())).map(BufReader::new)
        }

        fn entries(&self) -> io::Result<Vec<String>> {
            fs::read_dir(&self.root)?
                .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
                .collect()
        }
    }

    impl ProcFs {
        /// counters read from a `procfs` mounted at `root`.
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    // === impl MockProcFs ===

    impl CounterSource for MockProcFs {
        fn open(&self, counter: Counter) -> io::Result<impl Read> {
            let Self { files, .. } = self;

            files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&counter)
                .cloned()
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, counter.path()))
        }

        fn entries(&self) -> io::Result<Vec<String>> {
            let Self { entries, .. } = self;

            entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    impl MockProcFs {
        /// sets the contents of a counter file.
        pub fn set(&self, counter: Counter, contents: impl Into<String>) -> &Self {
            self.files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(counter, contents.into());
            self
        }

        /// removes a counter file, so that opening it fails.
        pub fn remove(&self, counter: Counter) -> &Self {
            self.files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&counter);
            self
        }

        /// sets the entries of the process listing.
        pub fn set_entries<I, E>(&self, entries: I) -> &Self
        where
            I: IntoIterator<Item = E>,
            E: Into<String>,
        {
            *self.entries.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(entries.into_iter().map(Into::into).collect());
            self
        }
    }
}
