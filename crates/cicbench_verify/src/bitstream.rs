//! Replayable single-bit stimulus sequences.
//!
//! The fixture format is plain text with one integer per line. Blank lines
//! are skipped and surrounding whitespace is ignored; every other line must
//! parse as an integer equal to 0 or 1. Line order is transmission order.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::path::Path;
use std::sync::Arc;

use crate::error::BenchError;

/// A malformed entry in a bitstream fixture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The line does not parse as an integer.
    #[error("line {line}: '{text}' is not an integer")]
    NotAnInteger {
        /// 1-based line number.
        line: usize,
        /// The trimmed line content.
        text: String,
    },
    /// The line is an integer other than 0 or 1.
    #[error("line {line}: {value} is not a bit (expected 0 or 1)")]
    NotABit {
        /// 1-based line number.
        line: usize,
        /// The trimmed line content.
        value: String,
    },
}

fn is_overflow(e: &ParseIntError) -> bool {
    matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
}

fn not_a_bit(line: usize, entry: &str) -> FormatError {
    FormatError::NotABit {
        line,
        value: entry.to_string(),
    }
}

/// An immutable, ordered sequence of stimulus bits.
///
/// Clones share the underlying storage, so every scenario in a run can
/// replay the same stimulus without re-reading the fixture.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitstream {
    bits: Arc<[bool]>,
}

impl Bitstream {
    /// Parses fixture text.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut bits = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.parse::<i64>() {
                Ok(0) => bits.push(false),
                Ok(1) => bits.push(true),
                Ok(_) => return Err(not_a_bit(line, entry)),
                // Too many digits for i64 is still an integer.
                Err(e) if is_overflow(&e) => return Err(not_a_bit(line, entry)),
                Err(_) => {
                    return Err(FormatError::NotAnInteger {
                        line,
                        text: entry.to_string(),
                    })
                }
            }
        }
        Ok(Self { bits: bits.into() })
    }

    /// Reads and parses a fixture file.
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| BenchError::Fixture {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text)?)
    }

    /// Renders the bitstream in fixture format, one bit per line.
    pub fn to_fixture_text(&self) -> String {
        let mut out = String::with_capacity(self.bits.len() * 2);
        for &bit in self.bits.iter() {
            out.push(if bit { '1' } else { '0' });
            out.push('\n');
        }
        out
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the bitstream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bits in transmission order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Iterates over the bits in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Returns the number of one bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl From<Vec<bool>> for Bitstream {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits: bits.into() }
    }
}

impl fmt::Debug for Bitstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitstream({} bits, {} ones)", self.len(), self.ones())
    }
}
