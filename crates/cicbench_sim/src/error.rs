//! Error types for the simulation boundary.
//!
//! Advancing simulated time is the only fallible operation on a DUT: the
//! reference model never fails, but a binding to an external simulator can.

/// Errors that can occur while constructing a clock or advancing a DUT.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A clock was configured with a zero-length period.
    #[error("invalid clock period: {period_fs} fs")]
    InvalidClockPeriod {
        /// The rejected period in femtoseconds.
        period_fs: u64,
    },

    /// The simulation backend reported a failure.
    #[error("simulation backend error: {reason}")]
    Backend {
        /// Description of what the backend reported.
        reason: String,
    },
}
