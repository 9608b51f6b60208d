//! Reset sequencing and the drive-then-sample loop.

use cicbench_sim::{Dut, SimError};
use log::trace;

use crate::bitstream::Bitstream;
use crate::capture::{CaptureBuffer, CaptureEngine};
use crate::driver::SerialDriver;

/// Enables the DUT and pulses its active-low reset for a fixed number of cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetSequence {
    /// Cycles the reset line is held low.
    pub cycles: u64,
}

impl Default for ResetSequence {
    fn default() -> Self {
        Self { cycles: 10 }
    }
}

impl ResetSequence {
    /// Creates a sequence holding reset for `cycles` cycles.
    pub fn new(cycles: u64) -> Self {
        Self { cycles }
    }

    /// Raises enable, holds reset low for `cycles`, then releases it.
    pub fn apply<D: Dut + ?Sized>(&self, dut: &mut D) -> Result<(), SimError> {
        dut.set_enable(true);
        dut.assert_reset();
        dut.advance_cycles(self.cycles)?;
        dut.release_reset();
        trace!("reset released at {}", dut.now());
        Ok(())
    }
}

/// Drives every bit of `bitstream` into the DUT and captures its output samples.
///
/// Each iteration waits for a falling edge, writes the next data bit, and
/// then reads the outputs the DUT settled on the rising edge just passed.
/// A fresh capture engine is used, so handshake tracking starts in the
/// waiting state on every call.
pub fn apply_bitstream<D: Dut + ?Sized>(
    dut: &mut D,
    bitstream: &Bitstream,
) -> Result<CaptureBuffer, SimError> {
    let mut driver = SerialDriver::new();
    let mut capture = CaptureEngine::new();
    for bit in bitstream.iter() {
        driver.drive(dut, bit)?;
        if let Some(sample) = capture.sample(dut) {
            trace!(
                "sample {} = {} at {}",
                capture.buffer().len() - 1,
                sample,
                dut.now()
            );
        }
    }
    debug_assert_eq!(driver.bits_sent(), bitstream.len() as u64);
    Ok(capture.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cicbench_common::ControlWord;
    use cicbench_sim::SimTime;

    /// Scripted DUT: records data-bit writes and replays a handshake pattern.
    #[derive(Default)]
    struct ScriptedDut {
        word: ControlWord,
        data_writes: Vec<bool>,
        handshake: Vec<u8>,
        cycles: u64,
        enabled: bool,
        reset_low_cycles: u64,
        in_reset: bool,
        events: Vec<&'static str>,
    }

    impl Dut for ScriptedDut {
        fn read_control_word(&self) -> ControlWord {
            self.word
        }
        fn write_control_word(&mut self, word: ControlWord) {
            self.word = word;
            self.data_writes.push(word.data_bit());
        }
        fn write_secondary_input(&mut self, _value: u8) {}
        fn read_primary_output(&self) -> u8 {
            self.cycles as u8
        }
        fn read_secondary_output(&self) -> u8 {
            let index = (self.cycles as usize).saturating_sub(1);
            self.handshake.get(index).copied().unwrap_or(0)
        }
        fn set_enable(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.events.push("enable");
        }
        fn assert_reset(&mut self) {
            self.in_reset = true;
            self.events.push("assert");
        }
        fn release_reset(&mut self) {
            self.in_reset = false;
            self.events.push("release");
        }
        fn advance_one_cycle(&mut self) -> Result<(), SimError> {
            if self.in_reset {
                self.reset_low_cycles += 1;
            }
            self.cycles += 1;
            Ok(())
        }
        fn now(&self) -> SimTime {
            SimTime::from_us(self.cycles * 10)
        }
    }

    /// Fails once a cycle budget is exhausted.
    struct FailingDut {
        budget: u64,
    }

    impl Dut for FailingDut {
        fn read_control_word(&self) -> ControlWord {
            ControlWord::default()
        }
        fn write_control_word(&mut self, _word: ControlWord) {}
        fn write_secondary_input(&mut self, _value: u8) {}
        fn read_primary_output(&self) -> u8 {
            0
        }
        fn read_secondary_output(&self) -> u8 {
            0
        }
        fn set_enable(&mut self, _enabled: bool) {}
        fn assert_reset(&mut self) {}
        fn release_reset(&mut self) {}
        fn advance_one_cycle(&mut self) -> Result<(), SimError> {
            if self.budget == 0 {
                return Err(SimError::Backend {
                    reason: "simulator exited".to_string(),
                });
            }
            self.budget -= 1;
            Ok(())
        }
        fn now(&self) -> SimTime {
            SimTime::zero()
        }
    }

    #[test]
    fn reset_sequence_order_and_length() {
        let mut dut = ScriptedDut::default();
        ResetSequence::new(10).apply(&mut dut).unwrap();
        assert_eq!(dut.events, vec!["enable", "assert", "release"]);
        assert!(dut.enabled);
        assert!(!dut.in_reset);
        assert_eq!(dut.reset_low_cycles, 10);
        assert_eq!(dut.cycles, 10);
    }

    #[test]
    fn one_data_write_per_bit_in_order() {
        let bits = vec![true, true, false, true, false, false, false, true];
        let bitstream = Bitstream::from(bits.clone());
        let mut dut = ScriptedDut::default();
        apply_bitstream(&mut dut, &bitstream).unwrap();
        assert_eq!(dut.cycles, bits.len() as u64);
        assert_eq!(dut.data_writes, bits);
    }

    #[test]
    fn empty_bitstream_drives_nothing() {
        let mut dut = ScriptedDut::default();
        let buffer = apply_bitstream(&mut dut, &Bitstream::from(Vec::new())).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(dut.cycles, 0);
    }

    #[test]
    fn captures_on_handshake_edges_only() {
        let mut dut = ScriptedDut {
            handshake: vec![0, 1, 1, 1, 0, 1],
            ..ScriptedDut::default()
        };
        let buffer = apply_bitstream(&mut dut, &Bitstream::from(vec![false; 6])).unwrap();
        // Primary output mirrors the cycle count: edges land on cycles 2 and 6.
        let values: Vec<u16> = buffer.samples().iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![2 * 128, 6 * 128]);
    }

    #[test]
    fn backend_failure_propagates() {
        let mut dut = FailingDut { budget: 3 };
        let err = apply_bitstream(&mut dut, &Bitstream::from(vec![true; 8])).unwrap_err();
        assert!(matches!(err, SimError::Backend { .. }));
    }
}
