//! Magnitude spectrum of a capture and the dominant-tone checks.
//!
//! Bin 0 is DC and never competes for the dominant bin. A capture of `M`
//! samples yields `M` magnitudes; the energy band is clipped to that length
//! when the capture is shorter than the configured band.
//!
//! The input is always real, so bin `k` and bin `M - k` carry the same
//! magnitude up to rounding. The dominant-bin search only looks at bins
//! `1..=M/2`, so a tone is always reported at its lower bin.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureBuffer;
use crate::error::VerifyError;

/// DFT magnitudes `|X[k]|` of a real-valued signal, indexed by bin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spectrum {
    magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Computes the length-`M` DFT magnitude spectrum of `signal`.
    pub fn of(signal: &[f64]) -> Self {
        if signal.is_empty() {
            return Self {
                magnitudes: Vec::new(),
            };
        }
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(signal.len());
        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buffer);
        let magnitudes = buffer.iter().map(|c| c.norm()).collect();
        Self { magnitudes }
    }

    /// Computes the spectrum of a capture buffer.
    pub fn of_capture(buffer: &CaptureBuffer) -> Self {
        Self::of(&buffer.to_signal())
    }

    /// Returns the number of bins.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Returns `true` if the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Returns every magnitude in bin order.
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Returns the magnitude of `bin`, if present.
    pub fn magnitude(&self, bin: usize) -> Option<f64> {
        self.magnitudes.get(bin).copied()
    }

    /// Returns the index of the largest non-DC bin, preferring the lowest on ties.
    ///
    /// Bins above `M/2` are conjugate images and are not considered.
    pub fn dominant_bin(&self) -> Option<usize> {
        let half = self.magnitudes.len() / 2;
        let mut best: Option<(usize, f64)> = None;
        for (bin, &mag) in self.magnitudes.iter().enumerate().skip(1).take(half) {
            match best {
                Some((_, top)) if mag <= top => {}
                _ => best = Some((bin, mag)),
            }
        }
        best.map(|(bin, _)| bin)
    }

    /// Sums magnitudes over `start..end`, clipped to the spectrum length.
    pub fn band_sum(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.magnitudes.len());
        if start >= end {
            return 0.0;
        }
        self.magnitudes[start..end].iter().sum()
    }
}

/// Thresholds for the normal-operation spectral check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpectralCheck {
    /// Bin that must dominate the non-DC spectrum.
    pub tone_bin: usize,
    /// Exclusive upper bin of the energy band that starts at bin 1.
    pub band_end: usize,
}

impl Default for SpectralCheck {
    fn default() -> Self {
        Self {
            tone_bin: 3,
            band_end: 20,
        }
    }
}

/// Outcome of a passing spectral check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectralReport {
    /// Number of samples the spectrum was computed from.
    pub samples: usize,
    /// Largest non-DC bin.
    pub dominant_bin: usize,
    /// Magnitude of the tone bin.
    pub tone_magnitude: f64,
    /// Summed magnitude of the other bins in the band.
    pub band_rest: f64,
}

impl SpectralCheck {
    /// Checks that the tone bin dominates and holds most of the band's energy.
    pub fn verify(&self, spectrum: &Spectrum) -> Result<SpectralReport, VerifyError> {
        let (Some(dominant_bin), Some(tone_magnitude)) =
            (spectrum.dominant_bin(), spectrum.magnitude(self.tone_bin))
        else {
            return Err(VerifyError::InsufficientSamples {
                needed: self.tone_bin,
                got: spectrum.len(),
            });
        };

        if dominant_bin != self.tone_bin {
            return Err(VerifyError::DominantBin {
                expected: self.tone_bin,
                actual: dominant_bin,
            });
        }

        let band_rest = spectrum.band_sum(1, self.band_end) - tone_magnitude;
        if tone_magnitude <= band_rest {
            return Err(VerifyError::EnergyConcentration {
                bin: self.tone_bin,
                magnitude: tone_magnitude,
                rest: band_rest,
            });
        }

        Ok(SpectralReport {
            samples: spectrum.len(),
            dominant_bin,
            tone_magnitude,
            band_rest,
        })
    }
}
