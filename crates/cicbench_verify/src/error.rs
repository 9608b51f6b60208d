//! Error types for verification runs.

use std::path::PathBuf;

use cicbench_sim::SimError;

use crate::bitstream::FormatError;

/// A check on the DUT's observable behaviour did not hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VerifyError {
    /// The largest non-DC spectral bin is not the expected tone bin.
    #[error("dominant bin mismatch: expected bin {expected}, found bin {actual}")]
    DominantBin {
        /// Expected dominant bin index.
        expected: usize,
        /// Observed dominant bin index.
        actual: usize,
    },
    /// The tone bin does not carry the majority of the low-frequency band.
    #[error(
        "energy concentration failed: bin {bin} magnitude {magnitude:.3} does not exceed rest of band {rest:.3}"
    )]
    EnergyConcentration {
        /// The tone bin index.
        bin: usize,
        /// Magnitude of the tone bin.
        magnitude: f64,
        /// Summed magnitude of the other bins in the band.
        rest: f64,
    },
    /// A raw-passthrough debug mode did not reproduce the preset value.
    #[error("loopback mismatch in debug mode {mode}: expected {expected:#04x}, got {actual:#04x}")]
    Loopback {
        /// Debug-mode selector.
        mode: u8,
        /// Expected primary output byte.
        expected: u8,
        /// Observed primary output byte.
        actual: u8,
    },
    /// Too few samples were captured to evaluate the spectrum.
    #[error("insufficient samples: need more than {needed}, captured {got}")]
    InsufficientSamples {
        /// Minimum sample count that must be exceeded.
        needed: usize,
        /// Captured sample count.
        got: usize,
    },
}

/// Any failure while running a bench scenario.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The stimulus fixture could not be read.
    #[error("failed to read fixture '{}': {source}", path.display())]
    Fixture {
        /// Path of the fixture.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The stimulus fixture is malformed.
    #[error("malformed fixture: {0}")]
    Format(#[from] FormatError),
    /// The simulation backend failed.
    #[error(transparent)]
    Sim(#[from] SimError),
    /// A verification check failed.
    #[error(transparent)]
    Verify(#[from] VerifyError),
}
