//! Configuration file discovery, loading, and validation.

use crate::error::ConfigError;
use crate::types::{BenchConfig, StimulusConfig};
use cicbench_common::{FilterOrder, Frequency};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of the bench configuration.
pub const CONFIG_FILE_NAME: &str = "bench.toml";

/// Loads and validates a `bench.toml` configuration from a bench directory.
///
/// Reads `<bench_dir>/bench.toml`, parses it, and validates every section.
pub fn load_config(bench_dir: &Path) -> Result<BenchConfig, ConfigError> {
    let config_path = bench_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `bench.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<BenchConfig, ConfigError> {
    let config: BenchConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start` until a directory containing `bench.toml` is found.
pub fn find_bench_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NotFound(start.display().to_string()));
        }
    }
}

/// Validates that required fields are present and values are in range.
fn validate_config(config: &BenchConfig) -> Result<(), ConfigError> {
    if config.bench.name.is_empty() {
        return Err(ConfigError::MissingField("bench.name".to_string()));
    }

    config
        .clock
        .frequency
        .parse::<Frequency>()
        .map_err(|e| ConfigError::ValidationError(format!("clock.frequency: {e}")))?;

    if config.reset.cycles == 0 {
        return Err(ConfigError::ValidationError(
            "reset.cycles must be at least 1".to_string(),
        ));
    }

    let spectral = &config.spectral;
    if spectral.tone_bin == 0 {
        return Err(ConfigError::ValidationError(
            "spectral.tone_bin must be at least 1 (bin 0 is DC)".to_string(),
        ));
    }
    if spectral.band_end <= spectral.tone_bin {
        return Err(ConfigError::ValidationError(format!(
            "spectral.band_end ({}) must be greater than spectral.tone_bin ({})",
            spectral.band_end, spectral.tone_bin
        )));
    }

    for (field, ratio) in [
        ("model.decimation_first", config.model.decimation_first),
        ("model.decimation_second", config.model.decimation_second),
    ] {
        if !(2..=128).contains(&ratio) {
            return Err(ConfigError::ValidationError(format!(
                "{field} must be between 2 and 128, got {ratio}"
            )));
        }
    }

    match &config.stimulus {
        StimulusConfig::Fixture { fixture } => {
            if fixture.is_empty() {
                return Err(ConfigError::MissingField("stimulus.fixture".to_string()));
            }
        }
        StimulusConfig::Tone {
            tone_bin,
            length,
            amplitude,
        } => {
            if *length == 0 {
                return Err(ConfigError::ValidationError(
                    "stimulus.length must be greater than 0".to_string(),
                ));
            }
            if *tone_bin == 0 || *tone_bin >= *length {
                return Err(ConfigError::ValidationError(format!(
                    "stimulus.tone_bin must be in 1..{length}, got {tone_bin}"
                )));
            }
            if !(*amplitude > 0.0 && *amplitude <= 0.5) {
                return Err(ConfigError::ValidationError(format!(
                    "stimulus.amplitude must be in (0, 0.5], got {amplitude}"
                )));
            }
        }
    }

    let mut names = HashSet::new();
    for scenario in &config.scenarios {
        check_name("scenario", &scenario.name, &mut names)?;
        check_order(&scenario.name, scenario.order)?;
    }
    for sweep in &config.sweeps {
        check_name("sweep", &sweep.name, &mut names)?;
        check_order(&sweep.name, sweep.order)?;
        if let Some(loopback) = &sweep.loopback {
            if loopback.mode > cicbench_common::control::MAX_DEBUG_MODE {
                return Err(ConfigError::ValidationError(format!(
                    "sweep '{}': loopback mode {} exceeds 15",
                    sweep.name, loopback.mode
                )));
            }
        }
    }
    Ok(())
}

fn check_name<'a>(
    kind: &str,
    name: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::MissingField(format!("{kind}.name")));
    }
    if !seen.insert(name) {
        return Err(ConfigError::ValidationError(format!(
            "duplicate scenario or sweep name '{name}'"
        )));
    }
    Ok(())
}

fn check_order(name: &str, order: u8) -> Result<(), ConfigError> {
    FilterOrder::try_from(order)
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError(format!("'{name}': {e}")))
}
