//! Reconstruction of 15-bit output samples from the two DUT output bytes.
//!
//! The primary byte carries the upper eight bits of the sample. The
//! secondary byte carries the lower seven bits in its upper seven bits, and
//! its bit 0 is the handshake flag that announces a new sample.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value a reconstructed sample can take.
pub const MAX_SAMPLE: u16 = 0x7FFF;

/// A single output sample reconstructed from `(primary, secondary)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSample(u16);

impl OutputSample {
    /// Reconstructs a sample: `primary * 128 + (secondary >> 1)`.
    pub fn reconstruct(primary: u8, secondary: u8) -> Self {
        Self(u16::from(primary) * 128 + u16::from(secondary >> 1))
    }

    /// Wraps a 15-bit value, saturating anything larger at [`MAX_SAMPLE`].
    pub fn saturating(value: u64) -> Self {
        Self(value.min(u64::from(MAX_SAMPLE)) as u16)
    }

    /// Returns the handshake flag carried in bit 0 of the secondary byte.
    pub fn handshake(secondary: u8) -> bool {
        secondary & 1 != 0
    }

    /// Splits the sample back into `(primary, secondary)` bus values with the
    /// given handshake flag in bit 0 of the secondary byte.
    pub fn to_bus(self, handshake: bool) -> (u8, u8) {
        let primary = (self.0 >> 7) as u8;
        let secondary = (((self.0 & 0x7F) as u8) << 1) | u8::from(handshake);
        (primary, secondary)
    }

    /// Returns the 15-bit sample value.
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for OutputSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
