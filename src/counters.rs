use {
    crate::source::{Counter, CounterSource},
    std::{
        io::{self, Read},
        num::{ParseFloatError, ParseIntError},
        str::FromStr,
    },
};

pub use self::{
    cpu_time::CpuTime,
    diskstats::{Device, DiskStats},
    loadavg::LoadAvg,
    meminfo::{MemInfo, MemoryUsage},
    net_dev::{Interface, NetDev},
    processes::count_processes,
    uptime::Uptime,
    user_hz::UserHz,
};

mod cpu_time;
mod diskstats;
mod loadavg;
mod meminfo;
mod net_dev;
mod processes;
mod uptime;
mod user_hz;


#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("no aggregate cpu entry found")]
    MissingCpu,
    #[error("cpu entry has {found} times, expected at least 7")]
    CpuTime { found: usize },
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },
    #[error("invalid counter value: {0}")]
    Int(#[from] ParseIntError),
    #[error("invalid counter value: {0}")]
    Float(#[from] ParseFloatError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read /proc/{path}: {source}")]
    Io {
        path: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse /proc/{path}: {source}")]
    Parse {
        path: &'static str,
        #[source]
        source: ParseError,
    },
}

/// reads a counter file from the source, and parses it.
pub fn read<T>(source: &impl CounterSource, counter: Counter) -> Result<T, ReadError>
where
    T: FromStr<Err = ParseError>,
{
    let path = counter.path();
    let contents = source
        .open(counter)
        .and_then(|mut reader| {
            let mut contents = String::new();
            reader.read_to_string(&mut contents).map(|_| contents)
        })
        .map_err(|source| ReadError::Io { path, source })?;

    contents
        .parse()
        .map_err(|source| ReadError::Parse { path, source })
}
