//! Shared wire-level types used across the cicbench testbench.
//!
//! This crate provides the pin-level vocabulary of the CIC decimator under
//! test: the 8-bit input control word with its named fields, the filter-order
//! selector, the 15-bit output sample reconstructed from two output bytes, and
//! clock frequency values.

#![warn(missing_docs)]

pub mod control;
pub mod frequency;
pub mod sample;

pub use control::{ControlWord, FilterOrder, InvalidOrderError};
pub use frequency::{Frequency, ParseFrequencyError};
pub use sample::OutputSample;
