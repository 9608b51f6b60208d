//! Fixed-period simulation clock.
//!
//! One cycle is a rising edge followed by a falling edge. The clock starts
//! low at time zero; the rising edge of cycle `n` is at `n * period +
//! period / 2` and its falling edge at `(n + 1) * period`. Callers observe
//! the clock only at falling edges, which is where stimulus is written.

use cicbench_common::Frequency;

use crate::error::SimError;
use crate::time::SimTime;

/// A free-running clock with a fixed period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    period_fs: u64,
    cycles: u64,
}

impl Clock {
    /// Creates a clock with the given period in femtoseconds.
    pub fn new(period_fs: u64) -> Result<Self, SimError> {
        if period_fs == 0 {
            return Err(SimError::InvalidClockPeriod { period_fs });
        }
        Ok(Self {
            period_fs,
            cycles: 0,
        })
    }

    /// Creates a clock running at `frequency`.
    pub fn from_frequency(frequency: Frequency) -> Result<Self, SimError> {
        let period_fs = frequency.period_fs().unwrap_or(0);
        Self::new(period_fs)
    }

    /// Returns the number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the time of the most recent falling edge.
    pub fn now(&self) -> SimTime {
        SimTime::from_fs(self.cycles.saturating_mul(self.period_fs))
    }

    /// Completes one cycle and returns the time of its falling edge.
    pub fn tick(&mut self) -> SimTime {
        self.cycles += 1;
        self.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FS_PER_US;

    #[test]
    fn zero_period_rejected() {
        let err = Clock::new(0).unwrap_err();
        assert!(matches!(err, SimError::InvalidClockPeriod { period_fs: 0 }));
    }

    #[test]
    fn from_frequency_100khz() {
        let mut clock = Clock::from_frequency("100KHz".parse().unwrap()).unwrap();
        assert_eq!(clock.tick(), SimTime::from_us(10));
    }

    #[test]
    fn from_invalid_frequency() {
        assert!(Clock::from_frequency(Frequency::new(0.0)).is_err());
    }

    #[test]
    fn tick_advances_one_period() {
        let mut clock = Clock::new(10 * FS_PER_US).unwrap();
        assert_eq!(clock.now(), SimTime::zero());
        assert_eq!(clock.tick(), SimTime::from_us(10));
        assert_eq!(clock.tick(), SimTime::from_us(20));
        assert_eq!(clock.cycles(), 2);
    }

    #[test]
    fn now_saturates_instead_of_overflowing() {
        let mut clock = Clock::new(u64::MAX / 2 + 1).unwrap();
        clock.tick();
        clock.tick();
        assert_eq!(clock.now(), SimTime::from_fs(u64::MAX));
    }
}
