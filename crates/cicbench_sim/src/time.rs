//! Simulation time with femtosecond resolution.
//!
//! The testbench is cycle-based, so there are no delta cycles: time only
//! moves in whole clock half-periods. [`SimTime`] exists so reports can say
//! *when* a scenario finished in the units a hardware engineer expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A point in simulated time, in femtoseconds since the clock started.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Simulation time in femtoseconds.
    pub fs: u64,
}

impl SimTime {
    /// Time zero.
    pub fn zero() -> Self {
        Self { fs: 0 }
    }

    /// Creates a time from femtoseconds.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Creates a time from microseconds.
    pub fn from_us(us: u64) -> Self {
        Self { fs: us * FS_PER_US }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            write!(f, "0 fs")
        } else if fs % FS_PER_S == 0 {
            write!(f, "{} s", fs / FS_PER_S)
        } else if fs % FS_PER_MS == 0 {
            write!(f, "{} ms", fs / FS_PER_MS)
        } else if fs % FS_PER_US == 0 {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs % FS_PER_NS == 0 {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs % FS_PER_PS == 0 {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(SimTime::zero().fs, 0);
        assert_eq!(SimTime::from_us(10).fs, 10 * FS_PER_US);
        assert_eq!(SimTime::from_fs(42).fs, 42);
    }

    #[test]
    fn ordering() {
        assert!(SimTime::from_fs(1) < SimTime::from_us(1));
    }

    #[test]
    fn display_picks_largest_exact_unit() {
        assert_eq!(SimTime::zero().to_string(), "0 fs");
        assert_eq!(SimTime::from_us(10).to_string(), "10 us");
        assert_eq!(SimTime::from_us(41_060).to_string(), "41060 us");
        assert_eq!(SimTime::from_us(2_000).to_string(), "2 ms");
        assert_eq!(SimTime::from_fs(5 * FS_PER_NS).to_string(), "5 ns");
        assert_eq!(SimTime::from_fs(1_500).to_string(), "1500 fs");
        assert_eq!(SimTime::from_fs(3 * FS_PER_S).to_string(), "3 s");
    }

    #[test]
    fn serde_roundtrip() {
        let t = SimTime::from_us(41_060);
        let json = serde_json::to_string(&t).unwrap();
        let back: SimTime = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
