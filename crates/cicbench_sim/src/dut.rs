//! The pin-level capability interface of the device under test.
//!
//! The verification core never sees how a DUT is simulated. It writes the
//! control word and the secondary input bus, reads the two output bytes, and
//! advances time one clock cycle at a time. A software model, a binding to
//! an HDL simulator, or a hardware-in-the-loop adapter can all sit behind
//! this trait.

use cicbench_common::ControlWord;

use crate::error::SimError;
use crate::time::SimTime;

/// A clocked device under test exposing the decimator's pin contract.
///
/// Time only moves through [`advance_one_cycle`](Dut::advance_one_cycle)
/// and [`advance_cycles`](Dut::advance_cycles). Both return at a falling
/// clock edge, after the DUT has sampled its inputs on the preceding rising
/// edge, so values written between two advances are seen by the DUT on the
/// next rising edge and outputs read after an advance are settled.
pub trait Dut {
    /// Returns the control word currently driven on the input pins.
    fn read_control_word(&self) -> ControlWord;

    /// Drives a new control word onto the input pins.
    fn write_control_word(&mut self, word: ControlWord);

    /// Drives the 8-bit secondary input bus.
    fn write_secondary_input(&mut self, value: u8);

    /// Reads the primary output byte (upper eight sample bits).
    fn read_primary_output(&self) -> u8;

    /// Reads the secondary output byte (lower seven sample bits, handshake in bit 0).
    fn read_secondary_output(&self) -> u8;

    /// Drives the enable line.
    fn set_enable(&mut self, enabled: bool);

    /// Drives the active-low reset line low.
    fn assert_reset(&mut self);

    /// Drives the active-low reset line high.
    fn release_reset(&mut self);

    /// Advances through one rising edge and returns at the following falling edge.
    fn advance_one_cycle(&mut self) -> Result<(), SimError>;

    /// Advances `cycles` full clock cycles.
    fn advance_cycles(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.advance_one_cycle()?;
        }
        Ok(())
    }

    /// Returns the current simulation time.
    fn now(&self) -> SimTime;
}
