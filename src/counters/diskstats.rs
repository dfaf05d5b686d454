use super::*;

/// i/o counters of whole disks, from `/proc/diskstats`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiskStats {
    devices: Vec<Device>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Device {
    pub name: String,
    /// sectors read, the 6th field.
    pub sectors_read: u64,
    /// sectors written, the 10th field.
    pub sectors_written: u64,
}

// === impl DiskStats ===

impl DiskStats {
    /// the kernel always reports sectors in units of 512 bytes, whatever the device's own size.
    pub const SECTOR_SIZE: u64 = 512;

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// returns the total bytes read and written, across whole disks.
    pub fn totals(&self) -> (u64, u64) {
        self.devices.iter().fold((0, 0), |(read, written), d| {
            (
                read.saturating_add(d.sectors_read.saturating_mul(Self::SECTOR_SIZE)),
                written.saturating_add(d.sectors_written.saturating_mul(Self::SECTOR_SIZE)),
            )
        })
    }

    /// returns true for physical disks, excluding their partitions.
    ///
    /// scsi disks number their partitions (`sda1`), nvme namespaces suffix them (`nvme0n1p1`).
    pub fn is_whole_disk(name: &str) -> bool {
        if let Some(namespace) = name.strip_prefix("nvme") {
            !namespace.contains('p')
        } else if name.starts_with("sd") {
            !name.ends_with(|c: char| c.is_ascii_digit())
        } else {
            false
        }
    }
}

impl FromStr for DiskStats {
    type Err = ParseError;
    fn from_str(diskstats: &str) -> Result<Self, Self::Err> {
        let mut devices = Vec::new();

        for line in diskstats.lines() {
            let fields = line.split_whitespace().collect::<Vec<_>>();
            let [_major, _minor, name, _, _, sectors_read, _, _, _, sectors_written, ..] =
                fields.as_slice()
            else {
                continue;
            };

            // partitions and virtual devices are never parsed.
            if !Self::is_whole_disk(name) {
                continue;
            }

            devices.push(Device {
                name: (*name).to_owned(),
                sectors_read: sectors_read.parse()?,
                sectors_written: sectors_written.parse()?,
            });
        }

        Ok(Self { devices })
    }
}
