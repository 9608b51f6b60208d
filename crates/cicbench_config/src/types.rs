//! Configuration types deserialized from `bench.toml`.
//!
//! Every section except `[bench]` is optional; omitted sections reproduce
//! the reference run of the CIC decimator: a 100 kHz clock, a ten-cycle
//! reset, a tone at bin 3, normal operation in both filter orders, and a
//! debug-mode sweep per order with the loopback self-check on the first.

use serde::Deserialize;

/// The top-level configuration parsed from `bench.toml`.
#[derive(Debug, Deserialize)]
pub struct BenchConfig {
    /// Bench metadata.
    pub bench: BenchMeta,
    /// Where the serial stimulus comes from.
    #[serde(default)]
    pub stimulus: StimulusConfig,
    /// Simulation clock settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Reset sequence settings.
    #[serde(default)]
    pub reset: ResetConfig,
    /// Spectral verification thresholds.
    #[serde(default)]
    pub spectral: SpectralConfig,
    /// Reference model parameters.
    #[serde(default)]
    pub model: ModelSection,
    /// Normal-operation scenarios, run in order.
    #[serde(default = "default_scenarios", rename = "scenario")]
    pub scenarios: Vec<ScenarioConfig>,
    /// Debug-mode sweeps, run after the normal-operation scenarios.
    #[serde(default = "default_sweeps", rename = "sweep")]
    pub sweeps: Vec<SweepConfig>,
}

/// Bench metadata required in every `bench.toml`.
#[derive(Debug, Deserialize)]
pub struct BenchMeta {
    /// The bench name.
    pub name: String,
    /// The bench version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// A brief description of the device under test.
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Source of the serial bitstream.
///
/// Uses serde's untagged enum to distinguish a fixture file from a
/// synthetic tone by the keys present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StimulusConfig {
    /// A fixture file with one bit per line, relative to the bench root.
    Fixture {
        /// Path to the fixture file.
        fixture: String,
    },
    /// A sigma-delta modulated tone generated at run time.
    Tone {
        /// DFT bin of the tone over the whole bitstream.
        tone_bin: usize,
        /// Number of bits to generate.
        length: usize,
        /// Tone amplitude as a fraction of full scale.
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },
}

/// Default location of the stimulus fixture.
pub const DEFAULT_FIXTURE: &str = "fixtures/test_bitstream.txt";

fn default_amplitude() -> f64 {
    0.4
}

impl Default for StimulusConfig {
    fn default() -> Self {
        StimulusConfig::Fixture {
            fixture: DEFAULT_FIXTURE.to_string(),
        }
    }
}

/// Simulation clock settings.
#[derive(Debug, Deserialize)]
pub struct ClockConfig {
    /// Clock frequency as a string (e.g., "100KHz"), parsed to [`Frequency`](cicbench_common::Frequency).
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

fn default_frequency() -> String {
    "100KHz".to_string()
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
        }
    }
}

/// Reset sequence settings.
#[derive(Debug, Deserialize)]
pub struct ResetConfig {
    /// Number of clock cycles the active-low reset is held.
    #[serde(default = "default_reset_cycles")]
    pub cycles: u64,
}

fn default_reset_cycles() -> u64 {
    10
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            cycles: default_reset_cycles(),
        }
    }
}

/// Spectral verification thresholds.
#[derive(Debug, Deserialize)]
pub struct SpectralConfig {
    /// Bin that must dominate the non-DC spectrum.
    #[serde(default = "default_tone_bin")]
    pub tone_bin: usize,
    /// Exclusive upper bin of the low-frequency energy band starting at bin 1.
    #[serde(default = "default_band_end")]
    pub band_end: usize,
}

fn default_tone_bin() -> usize {
    3
}

fn default_band_end() -> usize {
    20
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            tone_bin: default_tone_bin(),
            band_end: default_band_end(),
        }
    }
}

/// Reference model parameters.
#[derive(Debug, Deserialize)]
pub struct ModelSection {
    /// Decimation ratio of the first-order filter.
    #[serde(default = "default_decimation_first")]
    pub decimation_first: u32,
    /// Decimation ratio of the second-order filter.
    #[serde(default = "default_decimation_second")]
    pub decimation_second: u32,
}

fn default_decimation_first() -> u32 {
    32
}

fn default_decimation_second() -> u32 {
    16
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            decimation_first: default_decimation_first(),
            decimation_second: default_decimation_second(),
        }
    }
}

/// A normal-operation scenario: reset, drive the bitstream, check the spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario name used in reports and filters.
    pub name: String,
    /// Filter order select (0 = first order, 1 = second order).
    pub order: u8,
}

fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "cic1".to_string(),
            order: 0,
        },
        ScenarioConfig {
            name: "cic2".to_string(),
            order: 1,
        },
    ]
}

/// A debug-mode sweep over selectors 0 through 15.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SweepConfig {
    /// Sweep name used in reports and filters.
    pub name: String,
    /// Filter order select (0 = first order, 1 = second order).
    pub order: u8,
    /// Value preset on the secondary input bus before the sweep.
    #[serde(default = "default_secondary_preset")]
    pub secondary_preset: u8,
    /// Cycles to wait after the presets before the first mode.
    #[serde(default = "default_settle_cycles")]
    pub settle_cycles: u64,
    /// Optional loopback self-check for one selector.
    #[serde(default)]
    pub loopback: Option<LoopbackConfig>,
}

fn default_secondary_preset() -> u8 {
    0xB4
}

fn default_settle_cycles() -> u64 {
    1
}

/// Expected primary output for the raw-passthrough debug mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LoopbackConfig {
    /// The debug-mode selector that loops the secondary input back.
    pub mode: u8,
    /// The primary output byte expected at the end of the stimulus.
    pub expected: u8,
}

fn default_sweeps() -> Vec<SweepConfig> {
    vec![
        SweepConfig {
            name: "debug_cic1".to_string(),
            order: 0,
            secondary_preset: default_secondary_preset(),
            settle_cycles: default_settle_cycles(),
            loopback: Some(LoopbackConfig {
                mode: 4,
                expected: 0xB4,
            }),
        },
        SweepConfig {
            name: "debug_cic2".to_string(),
            order: 1,
            secondary_preset: default_secondary_preset(),
            settle_cycles: default_settle_cycles(),
            loopback: None,
        },
    ]
}
