//! Serial stimulus driver.
//!
//! One stimulus bit is sent per clock cycle. The driver waits for the
//! falling edge, then rewrites only the data bit of the control word so the
//! order and debug-mode fields set by the scenario survive every write. The
//! DUT samples the new bit on the following rising edge.

use cicbench_common::ControlWord;
use cicbench_sim::{Dut, SimError};

/// Drives stimulus bits into bit 0 of a DUT's control word.
#[derive(Debug, Default)]
pub struct SerialDriver {
    bits_sent: u64,
}

impl SerialDriver {
    /// Creates a driver that has sent nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `word` with its data bit replaced by `bit`.
    pub fn merge(word: ControlWord, bit: bool) -> ControlWord {
        word.with_data_bit(bit)
    }

    /// Waits for the next falling edge, then drives `bit`.
    pub fn drive<D: Dut + ?Sized>(&mut self, dut: &mut D, bit: bool) -> Result<(), SimError> {
        dut.advance_one_cycle()?;
        let word = Self::merge(dut.read_control_word(), bit);
        dut.write_control_word(word);
        self.bits_sent += 1;
        Ok(())
    }

    /// Returns the number of bits driven so far.
    pub fn bits_sent(&self) -> u64 {
        self.bits_sent
    }
}
