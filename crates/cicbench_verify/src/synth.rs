//! Sigma-delta synthesis of single-tone test stimuli.

use std::f64::consts::PI;

use crate::bitstream::Bitstream;

/// Parameters of a synthetic tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneParams {
    /// Number of whole tone periods over the bitstream, i.e. its DFT bin.
    pub tone_bin: usize,
    /// Number of bits to generate.
    pub length: usize,
    /// Tone amplitude as a fraction of full scale.
    pub amplitude: f64,
    /// DC level the tone rides on, as a fraction of full scale.
    pub offset: f64,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            tone_bin: 3,
            length: 4096,
            amplitude: 0.4,
            offset: 0.5,
        }
    }
}

impl ToneParams {
    fn level(&self, n: usize) -> f64 {
        let phase = 2.0 * PI * (self.tone_bin * n) as f64 / self.length as f64;
        self.offset + self.amplitude * phase.sin()
    }
}

/// Encodes a tone as a first-order sigma-delta bitstream.
///
/// The modulator integrates the input level and emits a one whenever the
/// accumulator reaches full scale, subtracting the emitted value. Because
/// a whole number of tone periods fits the stream, the decimated capture
/// of one pass carries the tone at the same bin index.
pub fn sigma_delta_tone(params: &ToneParams) -> Bitstream {
    let mut acc = 0.0_f64;
    let mut bits = Vec::with_capacity(params.length);
    for n in 0..params.length {
        acc += params.level(n);
        let bit = acc >= 1.0;
        if bit {
            acc -= 1.0;
        }
        bits.push(bit);
    }
    Bitstream::from(bits)
}

/// Encodes a sum of tones as a first-order sigma-delta bitstream.
///
/// Each entry is `(bin, amplitude)`; the composite signal is centred on
/// `offset`. The caller is responsible for keeping the composite within
/// `0.0..=1.0`.
pub fn sigma_delta_multitone(length: usize, offset: f64, tones: &[(usize, f64)]) -> Bitstream {
    let mut acc = 0.0_f64;
    let mut bits = Vec::with_capacity(length);
    for n in 0..length {
        let level: f64 = tones
            .iter()
            .map(|&(bin, amplitude)| {
                amplitude * (2.0 * PI * (bin * n) as f64 / length as f64).sin()
            })
            .sum::<f64>()
            + offset;
        acc += level;
        let bit = acc >= 1.0;
        if bit {
            acc -= 1.0;
        }
        bits.push(bit);
    }
    Bitstream::from(bits)
}
