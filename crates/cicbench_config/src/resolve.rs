//! Resolution of a parsed [`BenchConfig`] into typed, ready-to-run settings.

use crate::error::ConfigError;
use crate::types::{BenchConfig, StimulusConfig};
use cicbench_common::{FilterOrder, Frequency};
use std::path::{Path, PathBuf};

/// A bench configuration with every string and selector parsed into its typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBench {
    /// The bench name.
    pub name: String,
    /// The bench version string.
    pub version: String,
    /// Where the serial stimulus comes from.
    pub stimulus: ResolvedStimulus,
    /// The simulation clock frequency.
    pub clock: Frequency,
    /// Cycles the reset line is held low.
    pub reset_cycles: u64,
    /// Bin that must dominate the spectrum.
    pub tone_bin: usize,
    /// Exclusive upper bin of the energy band.
    pub band_end: usize,
    /// Decimation ratio of the first-order filter.
    pub decimation_first: u32,
    /// Decimation ratio of the second-order filter.
    pub decimation_second: u32,
    /// Normal-operation scenarios in run order.
    pub scenarios: Vec<ResolvedScenario>,
    /// Debug-mode sweeps in run order.
    pub sweeps: Vec<ResolvedSweep>,
}

/// A resolved stimulus source.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStimulus {
    /// A fixture file at an absolute path.
    Fixture(PathBuf),
    /// A synthetic sigma-delta tone.
    Tone {
        /// DFT bin of the tone.
        tone_bin: usize,
        /// Number of bits.
        length: usize,
        /// Amplitude as a fraction of full scale.
        amplitude: f64,
    },
}

/// A resolved normal-operation scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    /// Scenario name.
    pub name: String,
    /// Filter order under test.
    pub order: FilterOrder,
}

/// A resolved debug-mode sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSweep {
    /// Sweep name.
    pub name: String,
    /// Filter order under test.
    pub order: FilterOrder,
    /// Value preset on the secondary input bus.
    pub secondary_preset: u8,
    /// Cycles to wait after the presets.
    pub settle_cycles: u64,
    /// Optional loopback self-check.
    pub loopback: Option<ResolvedLoopback>,
}

/// A resolved loopback self-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLoopback {
    /// Debug-mode selector under check.
    pub mode: u8,
    /// Expected primary output byte.
    pub expected: u8,
}

/// Resolves a validated configuration relative to the bench root directory.
///
/// Relative fixture paths are joined onto `root`; absolute paths are kept.
pub fn resolve_bench(config: &BenchConfig, root: &Path) -> Result<ResolvedBench, ConfigError> {
    let clock = config
        .clock
        .frequency
        .parse::<Frequency>()
        .map_err(|e| ConfigError::ValidationError(format!("clock.frequency: {e}")))?;

    let stimulus = match &config.stimulus {
        StimulusConfig::Fixture { fixture } => {
            let path = Path::new(fixture);
            if path.is_absolute() {
                ResolvedStimulus::Fixture(path.to_path_buf())
            } else {
                ResolvedStimulus::Fixture(root.join(path))
            }
        }
        StimulusConfig::Tone {
            tone_bin,
            length,
            amplitude,
        } => ResolvedStimulus::Tone {
            tone_bin: *tone_bin,
            length: *length,
            amplitude: *amplitude,
        },
    };

    let scenarios = config
        .scenarios
        .iter()
        .map(|s| {
            Ok(ResolvedScenario {
                name: s.name.clone(),
                order: parse_order(&s.name, s.order)?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let sweeps = config
        .sweeps
        .iter()
        .map(|s| {
            Ok(ResolvedSweep {
                name: s.name.clone(),
                order: parse_order(&s.name, s.order)?,
                secondary_preset: s.secondary_preset,
                settle_cycles: s.settle_cycles,
                loopback: s.loopback.map(|l| ResolvedLoopback {
                    mode: l.mode,
                    expected: l.expected,
                }),
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    Ok(ResolvedBench {
        name: config.bench.name.clone(),
        version: config.bench.version.clone(),
        stimulus,
        clock,
        reset_cycles: config.reset.cycles,
        tone_bin: config.spectral.tone_bin,
        band_end: config.spectral.band_end,
        decimation_first: config.model.decimation_first,
        decimation_second: config.model.decimation_second,
        scenarios,
        sweeps,
    })
}

fn parse_order(name: &str, order: u8) -> Result<FilterOrder, ConfigError> {
    FilterOrder::try_from(order).map_err(|e| ConfigError::ValidationError(format!("'{name}': {e}")))
}
