//! Clocked DUT boundary for the cicbench testbench.
//!
//! The verification core talks to the device under test only through the
//! [`Dut`] trait: write the control word and secondary input bus, read the
//! two output bytes, and advance the clock. This crate defines that trait,
//! the cycle-based [`Clock`] and [`SimTime`] it runs on, and [`CicModel`], a
//! software reference implementation of the CIC decimator that satisfies
//! the pin contract.
//!
//! # Modules
//!
//! - `error`: Simulation error types
//! - `time`: Femtosecond-precision simulation time
//! - `clock`: Fixed-period clock with rising/falling edges
//! - `dut`: The pin-level capability trait
//! - `model`: Reference CIC decimator model

#![warn(missing_docs)]

pub mod clock;
pub mod dut;
pub mod error;
pub mod model;
pub mod time;

pub use clock::Clock;
pub use dut::Dut;
pub use error::SimError;
pub use model::{CicModel, DebugMode, ModelConfig};
pub use time::SimTime;
