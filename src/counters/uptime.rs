use super::*;

/// whole seconds since boot, from `/proc/uptime`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Uptime(pub u64);

// === impl Uptime ===

impl FromStr for Uptime {
    type Err = ParseError;
    fn from_str(uptime: &str) -> Result<Self, Self::Err> {
        let seconds = uptime
            .split_whitespace()
            .next()
            .ok_or(ParseError::MissingField { field: "uptime" })?
            .parse::<f64>()?;

        // truncate, rather than round, to whole seconds.
        Ok(Self(seconds as u64))
    }
}
