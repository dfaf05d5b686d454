use super::*;

/// per-interface counters, from `/proc/net/dev`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NetDev {
    interfaces: Vec<Interface>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interface {
    pub name: String,
    /// bytes received, the 1st counter column.
    pub rx_bytes: u64,
    /// bytes transmitted, the 9th counter column.
    pub tx_bytes: u64,
}

// === impl NetDev ===

impl NetDev {
    /// interfaces that never contribute to throughput totals.
    pub const EXCLUDED: [&str; 3] = ["lo", "docker0", "virbr0"];

    /// the number of header lines preceding the interface rows.
    const HEADER: usize = 2;

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// returns the total bytes received and transmitted, across included interfaces.
    pub fn totals(&self) -> (u64, u64) {
        self.interfaces
            .iter()
            .filter(|Interface { name, .. }| !Self::EXCLUDED.contains(&name.as_str()))
            .fold((0, 0), |(rx, tx), i| {
                (rx.saturating_add(i.rx_bytes), tx.saturating_add(i.tx_bytes))
            })
    }
}

impl FromStr for NetDev {
    type Err = ParseError;
    fn from_str(net_dev: &str) -> Result<Self, Self::Err> {
        let mut interfaces = Vec::new();

        for line in net_dev.lines().skip(Self::HEADER) {
            let Some((name, counters)) = line.split_once(':') else {
                continue;
            };

            let counters = counters.split_whitespace().collect::<Vec<_>>();
            let [rx_bytes, _, _, _, _, _, _, _, tx_bytes, ..] = counters.as_slice() else {
                continue;
            };

            interfaces.push(Interface {
                name: name.trim().to_owned(),
                rx_bytes: rx_bytes.parse()?,
                tx_bytes: tx_bytes.parse()?,
            });
        }

        Ok(Self { interfaces })
    }
}
