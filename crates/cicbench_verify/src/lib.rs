//! Verification core of the cicbench CIC decimator testbench.
//!
//! Drives a single-bit modulated stimulus into a clocked [`Dut`](cicbench_sim::Dut)
//! one bit per cycle, reconstructs the serialized output samples from the
//! handshake-qualified output bus, and checks the captured waveform's
//! spectrum and the debug-mode loopback behaviour.
//!
//! # Modules
//!
//! - `bitstream`: Replayable bit sequences and the fixture file format
//! - `synth`: Sigma-delta tone synthesis for fixtures and tests
//! - `driver`: Field-preserving serial data-bit driver
//! - `capture`: Handshake edge detection and the capture buffer
//! - `protocol`: Reset sequencing and the drive-then-sample loop
//! - `spectral`: Magnitude spectrum and dominant-tone checks
//! - `debug_matrix`: Debug-mode selector sweeps with loopback self-check
//! - `suite`: Scenario planning and the fail-fast suite runner
//! - `error`: Verification and bench error types

#![warn(missing_docs)]

pub mod bitstream;
pub mod capture;
pub mod debug_matrix;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod spectral;
pub mod suite;
pub mod synth;

pub use bitstream::{Bitstream, FormatError};
pub use capture::{CaptureBuffer, CaptureEngine, HandshakeDetector, HandshakeState};
pub use debug_matrix::{run_sweep, DebugSweep, LoopbackCheck, ModeOutcome, SweepReport};
pub use driver::SerialDriver;
pub use error::{BenchError, VerifyError};
pub use protocol::{apply_bitstream, ResetSequence};
pub use spectral::{SpectralCheck, SpectralReport, Spectrum};
pub use suite::{
    run_normal_operation, run_suite, NormalReport, NormalScenario, ScenarioOutcome, ScenarioReport,
    SuiteFailure, SuitePlan, SuiteReport,
};
pub use synth::{sigma_delta_multitone, sigma_delta_tone, ToneParams};
