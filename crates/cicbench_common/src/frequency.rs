//! Clock frequencies with unit parsing, display, and period conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FS_PER_SECOND: f64 = 1e15;

/// A clock frequency stored in Hertz.
///
/// Parses strings like `"100KHz"`, `"50MHz"` or a bare number of Hertz, and
/// converts to a clock period in femtoseconds for the simulation clock.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the clock period in femtoseconds, rounded to the nearest femtosecond.
    ///
    /// Returns `None` for non-positive or non-finite frequencies.
    pub fn period_fs(&self) -> Option<u64> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return None;
        }
        let period = (FS_PER_SECOND / self.0).round();
        if period < 1.0 || period > u64::MAX as f64 {
            return None;
        }
        Some(period as u64)
    }
}

impl Default for Frequency {
    /// 100 kHz, a 10 us clock period.
    fn default() -> Self {
        Self(100_000.0)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (number, scale) = if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = number.trim().parse().map_err(|_| err())?;
        if !value.is_finite() || value <= 0.0 {
            return Err(err());
        }
        Ok(Frequency(value * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_khz() {
        let f: Frequency = "100KHz".parse().unwrap();
        assert_eq!(f.hz(), 100_000.0);
    }

    #[test]
    fn parse_mhz_case_insensitive() {
        let f: Frequency = "50mhz".parse().unwrap();
        assert_eq!(f.hz(), 50_000_000.0);
    }

    #[test]
    fn parse_bare_number() {
        let f: Frequency = "48000".parse().unwrap();
        assert_eq!(f.hz(), 48_000.0);
    }

    #[test]
    fn parse_rejects_garbage_and_zero() {
        assert!("fast".parse::<Frequency>().is_err());
        assert!("0Hz".parse::<Frequency>().is_err());
        assert!("-5KHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn period_of_100khz_is_10us() {
        let f: Frequency = "100KHz".parse().unwrap();
        assert_eq!(f.period_fs(), Some(10_000_000_000));
    }

    #[test]
    fn period_of_invalid_frequency() {
        assert_eq!(Frequency::new(0.0).period_fs(), None);
        assert_eq!(Frequency::new(f64::NAN).period_fs(), None);
    }

    #[test]
    fn display_selects_unit() {
        assert_eq!(Frequency::new(100_000.0).to_string(), "100KHz");
        assert_eq!(Frequency::new(25_000_000.0).to_string(), "25MHz");
        assert_eq!(Frequency::new(500.0).to_string(), "500Hz");
    }

    #[test]
    fn default_is_100khz() {
        assert_eq!(Frequency::default().hz(), 100_000.0);
    }
}
