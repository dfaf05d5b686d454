use {
    crate::rate::Baseline,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::time::Instant,
};

/// the system's vitals, as of the last update.
///
/// this is what consumers read. rates are already derived, and should not be re-derived from
/// successive readings.
///
/// the serialized form uses the keys of the helper's json emission. keys missing from that
/// emission are read as zero.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Metrics {
    #[serde(rename = "cpu_usage")]
    pub(crate) cpu_usage_pct: f64,
    #[serde(rename = "memory_usage")]
    pub(crate) memory_usage_pct: f64,
    pub(crate) memory_used_gb: f64,
    pub(crate) network_rx_rate: f64,
    pub(crate) network_tx_rate: f64,
    pub(crate) disk_read_rate: f64,
    pub(crate) disk_write_rate: f64,
    pub(crate) load_average: [f64; 3],
    pub(crate) process_count: u32,
    pub(crate) uptime_seconds: u64,
}

/// the sampler's working state: the latest [`Metrics`], and the baselines needed to derive
/// the next set of rates.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub(crate) metrics: Metrics,
    pub(crate) calibration: Calibration,
}

/// cumulative counters from the previous fallback sample.
#[derive(Clone, Debug)]
pub(crate) struct Calibration {
    /// bytes received.
    pub(crate) net_rx: Baseline,
    /// bytes transmitted.
    pub(crate) net_tx: Baseline,
    /// bytes read from disk.
    pub(crate) disk_read: Baseline,
    /// bytes written to disk.
    pub(crate) disk_write: Baseline,
    /// when the previous fallback sample was taken.
    pub(crate) last_update: Instant,
}

// === impl Metrics ===

impl Metrics {
    /// cpu usage, from 0 to 100.
    pub fn cpu_usage_pct(&self) -> f64 {
        self.cpu_usage_pct
    }

    /// memory usage, from 0 to 100.
    pub fn memory_usage_pct(&self) -> f64 {
        self.memory_usage_pct
    }

    /// memory in use, in gibibytes.
    pub fn memory_used_gb(&self) -> f64 {
        self.memory_used_gb
    }

    /// bytes received per second.
    pub fn network_rx_rate(&self) -> f64 {
        self.network_rx_rate
    }

    /// bytes transmitted per second.
    pub fn network_tx_rate(&self) -> f64 {
        self.network_tx_rate
    }

    /// bytes read from disk per second.
    pub fn disk_read_rate(&self) -> f64 {
        self.disk_read_rate
    }

    /// bytes written to disk per second.
    pub fn disk_write_rate(&self) -> f64 {
        self.disk_write_rate
    }

    /// the 1, 5, and 15 minute load averages.
    pub fn load_average(&self) -> [f64; 3] {
        self.load_average
    }

    pub fn process_count(&self) -> u32 {
        self.process_count
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.uptime_seconds
    }

    /// parses the helper's json emission, which must be a single object.
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json::Error> {
        let object = serde_json::from_slice::<Map<String, Value>>(json)?;
        Self::deserialize(Value::Object(object))
    }
}

// === impl Snapshot ===

impl Snapshot {
    /// a zeroed snapshot, with rates calibrated from `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            metrics: Metrics::default(),
            calibration: Calibration {
                net_rx: Baseline::default(),
                net_tx: Baseline::default(),
                disk_read: Baseline::default(),
                disk_write: Baseline::default(),
                last_update: now,
            },
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_are_zero() {
        let metrics = Metrics::from_json(br#"{"cpu_usage": 42.5, "process_count": 150}"#).unwrap();
        assert_eq!(metrics.cpu_usage_pct(), 42.5);
        assert_eq!(metrics.process_count(), 150);
        assert_eq!(
            metrics,
            Metrics {
                cpu_usage_pct: 42.5,
                process_count: 150,
                ..Metrics::default()
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = br#"{"timestamp": 1700000000, "memory_total": 1, "uptime_seconds": 60}"#;
        let metrics = Metrics::from_json(json).unwrap();
        assert_eq!(metrics.uptime_seconds(), 60);
    }

    #[test]
    fn all_keys() {
        let json = br#"{
            "cpu_usage": 1.5,
            "memory_usage": 2.5,
            "memory_used_gb": 3.5,
            "network_rx_rate": 4.0,
            "network_tx_rate": 5.0,
            "disk_read_rate": 6.0,
            "disk_write_rate": 7.0,
            "load_average": [0.1, 0.2, 0.3],
            "process_count": 8,
            "uptime_seconds": 9
        }"#;
        let metrics = Metrics::from_json(json).unwrap();
        assert_eq!(metrics.memory_usage_pct(), 2.5);
        assert_eq!(metrics.memory_used_gb(), 3.5);
        assert_eq!(metrics.network_rx_rate(), 4.0);
        assert_eq!(metrics.network_tx_rate(), 5.0);
        assert_eq!(metrics.disk_read_rate(), 6.0);
        assert_eq!(metrics.disk_write_rate(), 7.0);
        assert_eq!(metrics.load_average(), [0.1, 0.2, 0.3]);
        assert_eq!(metrics.uptime_seconds(), 9);
    }

    #[test]
    fn serializes_with_helper_keys() {
        let metrics = Metrics {
            cpu_usage_pct: 12.0,
            ..Metrics::default()
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["cpu_usage"], 12.0);
        assert_eq!(json["load_average"], serde_json::json!([0.0, 0.0, 0.0]));
        assert_eq!(Metrics::from_json(json.to_string().as_bytes()).unwrap(), metrics);
    }

    #[test]
    fn malformed() {
        assert!(Metrics::from_json(b"cpu 12%").is_err());
        assert!(Metrics::from_json(br#"{"load_average": [1.0]}"#).is_err());
        assert!(Metrics::from_json(br#"{"process_count": -1}"#).is_err());
        assert!(Metrics::from_json(b"[]").is_err());
        assert!(Metrics::from_json(b"[42.5]").is_err());
        assert!(Metrics::from_json(b"42.5").is_err());
    }
}
