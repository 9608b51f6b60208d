//! Debug-mode selector sweeps.
//!
//! A sweep fixes the filter order, presets the secondary input bus, and
//! then drives the full stimulus once for every selector 0 through 15. Only
//! the loopback selector has a checked result: the primary output left on
//! the bus after the last bit must equal the preset. Every other selector
//! just has to complete without a protocol or backend failure.

use cicbench_common::control::MAX_DEBUG_MODE;
use cicbench_common::{ControlWord, FilterOrder};
use cicbench_sim::Dut;
use log::{debug, info};
use serde::Serialize;

use crate::bitstream::Bitstream;
use crate::error::{BenchError, VerifyError};
use crate::protocol::apply_bitstream;

/// Expected primary output for a raw-passthrough debug mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LoopbackCheck {
    /// The selector under check.
    pub mode: u8,
    /// Primary output byte expected after the stimulus.
    pub expected: u8,
}

impl LoopbackCheck {
    /// Compares the observed primary byte for `mode` against the expectation.
    ///
    /// Selectors other than the checked one always pass.
    pub fn check(&self, mode: u8, actual: u8) -> Result<(), VerifyError> {
        if mode == self.mode && actual != self.expected {
            return Err(VerifyError::Loopback {
                mode,
                expected: self.expected,
                actual,
            });
        }
        Ok(())
    }
}

/// One sweep over all debug-mode selectors for a fixed filter order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugSweep {
    /// Name used in reports.
    pub name: String,
    /// Filter order under test.
    pub order: FilterOrder,
    /// Value preset on the secondary input bus before the sweep.
    pub secondary_preset: u8,
    /// Cycles to wait after the presets.
    pub settle_cycles: u64,
    /// Optional loopback self-check.
    pub loopback: Option<LoopbackCheck>,
}

/// What one selector produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModeOutcome {
    /// The debug-mode selector.
    pub mode: u8,
    /// Samples captured while driving the stimulus.
    pub captured: usize,
    /// Primary output byte after the last stimulus bit.
    pub final_primary: u8,
}

/// Per-selector results of a completed sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// The sweep name.
    pub name: String,
    /// One entry per selector, in selector order.
    pub outcomes: Vec<ModeOutcome>,
}

impl SweepReport {
    /// Returns the outcome for `mode`, if the sweep reached it.
    pub fn outcome(&self, mode: u8) -> Option<&ModeOutcome> {
        self.outcomes.iter().find(|o| o.mode == mode)
    }
}

/// Runs `sweep` against `dut`, stopping at the first failure.
pub fn run_sweep<D: Dut + ?Sized>(
    dut: &mut D,
    sweep: &DebugSweep,
    bitstream: &Bitstream,
) -> Result<SweepReport, BenchError> {
    info!("debug sweep {} ({})", sweep.name, sweep.order);

    dut.set_enable(true);
    dut.write_control_word(ControlWord::for_order(sweep.order));
    dut.write_secondary_input(sweep.secondary_preset);
    dut.advance_cycles(sweep.settle_cycles)?;

    let mut outcomes = Vec::with_capacity(usize::from(MAX_DEBUG_MODE) + 1);
    for mode in 0..=MAX_DEBUG_MODE {
        let word = dut.read_control_word().with_debug_mode(mode);
        dut.write_control_word(word);

        let buffer = apply_bitstream(dut, bitstream)?;
        let final_primary = dut.read_primary_output();
        debug!(
            "{} mode {mode}: {} samples, primary {final_primary:#04x}",
            sweep.name,
            buffer.len()
        );

        if let Some(loopback) = &sweep.loopback {
            loopback.check(mode, final_primary)?;
        }
        outcomes.push(ModeOutcome {
            mode,
            captured: buffer.len(),
            final_primary,
        });
    }

    Ok(SweepReport {
        name: sweep.name.clone(),
        outcomes,
    })
}
