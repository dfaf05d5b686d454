use {super::*, std::collections::BTreeMap};

/// the key-value table exposed by `/proc/meminfo`, in kibibytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    entries: BTreeMap<String, u64>,
}

/// how much memory is in use.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryUsage {
    /// the percentage of total memory that is not available.
    pub percentage: f64,
    /// used memory, in gibibytes.
    pub used_gb: f64,
}

// === impl MemInfo ===

impl MemInfo {
    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    /// computes memory usage from `MemTotal` and `MemAvailable`.
    ///
    /// a missing or zero `MemTotal` yields zero usage.
    pub fn usage(&self) -> MemoryUsage {
        let total = self.get("MemTotal").unwrap_or(0);
        let available = self.get("MemAvailable").unwrap_or(0);
        let used = total.saturating_sub(available);

        let percentage = match total {
            0 => 0.0,
            total => (used as f64 / total as f64) * 100.0,
        };
        let used_gb = used as f64 / 1024.0 / 1024.0;

        MemoryUsage {
            percentage,
            used_gb,
        }
    }
}

impl FromStr for MemInfo {
    type Err = ParseError;
    fn from_str(meminfo: &str) -> Result<Self, Self::Err> {
        let mut entries = BTreeMap::new();

        for line in meminfo.lines() {
            let mut tokens = line.split_whitespace();
            let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
                continue;
            };

            let key = key.strip_suffix(':').unwrap_or(key);
            entries.insert(key.to_owned(), value.parse()?);
        }

        Ok(Self { entries })
    }
}
