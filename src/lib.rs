//! a dual-source system metrics sampler.
//!
//! [`Sampler::update()`] refreshes a [`Snapshot`] of the system's cpu, memory, network, disk,
//! load, process, and uptime figures. an external helper process is consulted first; when it is
//! missing or misbehaves, kernel counters under `/proc` are parsed directly, and cumulative
//! counters are turned into per-second rates.
//!
//! [`Monitor`] runs a sampler on a background thread, publishing [`Metrics`] for readers.

pub use self::{
    config::Config,
    helper::{HelperError, HelperProcess, HelperSource, MockHelper},
    monitor::{Monitor, Reader},
    sampler::Sampler,
    snapshot::{Metrics, Snapshot},
    source::{Clock, Counter, CounterSource, MockClock, MockProcFs, ProcFs, SystemClock},
};

mod config;
mod helper;
mod monitor;
mod rate;
mod sampler;
mod snapshot;
mod source;

/// kernel counter facilities.
///
/// this module provides parsers for the counter files exposed by `/proc`.
pub mod counters;
