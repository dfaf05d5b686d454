//! per-second rates derived from cumulative counters.

use std::time::Duration;

/// the last observed value of a cumulative counter.
///
/// a zero baseline means nothing has been observed yet, so the first sample after startup
/// establishes a baseline instead of reporting its entire cumulative value as a spike.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Baseline(u64);

// === impl Baseline ===

impl Baseline {
    pub fn get(self) -> u64 {
        let Self(last) = self;
        last
    }

    /// stores `total` as the new baseline, returning the rate since the previous one.
    ///
    /// returns `None` if no time has elapsed, in which case the previous rate still stands.
    /// a counter that went backwards (a reset, or a replaced interface) yields a rate of zero.
    pub fn advance(&mut self, total: u64, elapsed: Duration) -> Option<f64> {
        let Self(last) = std::mem::replace(self, Self(total));

        if elapsed.is_zero() {
            return None;
        }

        let rate = match total.checked_sub(last) {
            Some(delta) if last > 0 => delta as f64 / elapsed.as_secs_f64(),
            _ => 0.0,
        };

        Some(rate)
    }
}
