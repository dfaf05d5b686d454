use super::*;

/// the 1, 5, and 15 minute load averages, from `/proc/loadavg`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadAvg(pub [f64; 3]);

// === impl LoadAvg ===

impl FromStr for LoadAvg {
    type Err = ParseError;
    fn from_str(loadavg: &str) -> Result<Self, Self::Err> {
        let mut fields = loadavg.split_whitespace();
        let mut next = |field: &'static str| -> Result<f64, ParseError> {
            let value = fields.next().ok_or(ParseError::MissingField { field })?;
            Ok(value.parse()?)
        };

        Ok(Self([next("1m")?, next("5m")?, next("15m")?]))
    }
}
