use super::*;

/// the number of leading times that are accounted for.
const TIMES: usize = 7;

/// how the system's cpus, in aggregate, have spent their time since boot.
///
/// this is the leading "cpu" entry of `/proc/stat`. later columns (steal, guest, guest_nice)
/// are present on newer kernels, and are ignored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    user: UserHz,
    /// time spent in user mode with low priority (nice).
    nice: UserHz,
    /// time spent in system mode.
    system: UserHz,
    /// time spent in the idle task.
    ///
    /// this value should be USER_HZ times the second entry in the /proc/uptime pseudo-file.
    idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, for the following reasons:
    ///   *  the cpu will not wait for i/o to complete; iowait is the time that a task is waiting
    ///      for i/o to complete. when a cpu goes into idle state for outstanding task i/o,
    ///      another task will be scheduled on this cpu.
    ///   *  on a multi-core cpu, the task waiting for i/o to complete is not running on any cpu,
    ///      so the iowait of each cpu is difficult to calculate.
    ///   *  the value in this field may decrease in certain conditions.
    iowait: UserHz,
    /// time servicing interrupts.
    irq: UserHz,
    /// time servicing softirqs.
    softirq: UserHz,
}

// === impl CpuTime ===

impl CpuTime {
    /// returns the percentage of non-idle cpu time.
    ///
    /// NB: these are cumulative counters, so this is the ratio of busy time since boot rather
    /// than the load at this instant. a true instantaneous figure would need the previous
    /// sample's times to difference against.
    pub fn usage(&self) -> f64 {
        let total = self.total();
        if total == UserHz::default() {
            return 0.0;
        }

        let busy = total - self.idle();
        (busy.as_f64() / total.as_f64()) * 100.0
    }

    /// the sum of all accounted times.
    pub fn total(&self) -> UserHz {
        let times: [UserHz; TIMES] = self.clone().into();
        times.into_iter().sum()
    }

    /// time spent idle, including time spent waiting for i/o.
    pub fn idle(&self) -> UserHz {
        let Self { idle, iowait, .. } = *self;
        idle + iowait
    }

    /// parses a single `/proc/stat` line.
    ///
    /// returns `Ok(None)` if this line is not the aggregate cpu entry.
    fn parse_entry(line: &str) -> Result<Option<Self>, ParseError> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("cpu") {
            return Ok(None);
        }

        // later columns vary by kernel version, and are not parsed.
        let times = tokens
            .take(TIMES)
            .map(str::parse::<UserHz>)
            .collect::<Result<Vec<_>, _>>()?;

        times.try_into().map(Some)
    }
}

impl FromStr for CpuTime {
    type Err = ParseError;
    fn from_str(stat: &str) -> Result<Self, Self::Err> {
        for line in stat.lines() {
            if let Some(time) = Self::parse_entry(line)? {
                return Ok(time);
            }
        }

        Err(ParseError::MissingCpu)
    }
}

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = ParseError;
    fn try_from(times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let found = times.len();
        times
            .get(..TIMES)
            .and_then(|times| <[UserHz; TIMES]>::try_from(times).ok())
            .map(Self::from)
            .ok_or(ParseError::CpuTime { found })
    }
}

impl From<[UserHz; TIMES]> for CpuTime {
    fn from([user, nice, system, idle, iowait, irq, softirq]: [UserHz; TIMES]) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }
}

impl From<CpuTime> for [UserHz; TIMES] {
    fn from(
        CpuTime {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }: CpuTime,
    ) -> Self {
        [user, nice, system, idle, iowait, irq, softirq]
    }
}
