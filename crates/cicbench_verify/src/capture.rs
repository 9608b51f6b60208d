//! Handshake-qualified output capture.
//!
//! The DUT holds its handshake flag high for several cycles after each new
//! sample, so level-sampling the flag would record the same sample many
//! times. [`HandshakeDetector`] is an explicit two-state machine that fires
//! only on the 0 to 1 transition; [`CaptureEngine`] pairs it with the
//! sample reconstruction rule and an append-only [`CaptureBuffer`].

use cicbench_common::OutputSample;
use cicbench_sim::Dut;
use serde::{Deserialize, Serialize};

/// State of the handshake edge detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandshakeState {
    /// The last observed handshake was low; a high reading is a new sample.
    #[default]
    Waiting,
    /// The last observed handshake was high; the sample is already captured.
    JustCaptured,
}

/// Detects rising transitions of the handshake flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandshakeDetector {
    state: HandshakeState,
}

impl HandshakeDetector {
    /// Creates a detector in the `Waiting` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Feeds one cycle's handshake reading and returns `true` on a rising edge.
    pub fn observe(&mut self, handshake: bool) -> bool {
        let (next, fire) = match (self.state, handshake) {
            (HandshakeState::Waiting, true) => (HandshakeState::JustCaptured, true),
            (HandshakeState::JustCaptured, true) => (HandshakeState::JustCaptured, false),
            (_, false) => (HandshakeState::Waiting, false),
        };
        self.state = next;
        fire
    }
}

/// Ordered samples captured during one bitstream application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureBuffer {
    samples: Vec<OutputSample>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of captured samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the captured samples in capture order.
    pub fn samples(&self) -> &[OutputSample] {
        &self.samples
    }

    /// Returns the samples as a real-valued signal.
    pub fn to_signal(&self) -> Vec<f64> {
        self.samples.iter().map(|s| f64::from(s.value())).collect()
    }

    /// Returns the most recent sample, if any.
    pub fn last(&self) -> Option<OutputSample> {
        self.samples.last().copied()
    }

    fn push(&mut self, sample: OutputSample) {
        self.samples.push(sample);
    }
}

impl FromIterator<OutputSample> for CaptureBuffer {
    fn from_iter<I: IntoIterator<Item = OutputSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Reconstructs one sample per handshake rising edge.
#[derive(Debug, Default)]
pub struct CaptureEngine {
    detector: HandshakeDetector,
    buffer: CaptureBuffer,
}

impl CaptureEngine {
    /// Creates an engine with an empty buffer and a `Waiting` detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one cycle's output bytes, returning the sample if one was captured.
    pub fn observe(&mut self, primary: u8, secondary: u8) -> Option<OutputSample> {
        if !self.detector.observe(OutputSample::handshake(secondary)) {
            return None;
        }
        let sample = OutputSample::reconstruct(primary, secondary);
        self.buffer.push(sample);
        Some(sample)
    }

    /// Reads the DUT's settled outputs for this cycle and processes them.
    pub fn sample<D: Dut + ?Sized>(&mut self, dut: &D) -> Option<OutputSample> {
        self.observe(dut.read_primary_output(), dut.read_secondary_output())
    }

    /// Returns the samples captured so far.
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Consumes the engine and returns the capture buffer.
    pub fn finish(self) -> CaptureBuffer {
        self.buffer
    }
}
