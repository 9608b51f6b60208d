//! Shared helpers for CLI commands.
//!
//! Locates and loads `bench.toml`, builds the stimulus, the suite plan, and
//! the reference model from the resolved configuration, and formats status
//! lines.

use std::path::{Path, PathBuf};

use cicbench_common::FilterOrder;
use cicbench_config::{ResolvedBench, ResolvedStimulus};
use cicbench_sim::{CicModel, Clock, ModelConfig};
use cicbench_verify::{
    sigma_delta_tone, Bitstream, DebugSweep, LoopbackCheck, NormalScenario, ResetSequence,
    SpectralCheck, SuitePlan, ToneParams,
};

use crate::GlobalArgs;

/// Loads the bench configuration selected by the global args.
///
/// `--config` may name a configuration file (read directly, its directory
/// becomes the bench root) or a directory containing `bench.toml`. Without
/// it, the nearest `bench.toml` upward from the current directory is used.
pub fn load_bench(
    global: &GlobalArgs,
) -> Result<(PathBuf, ResolvedBench), Box<dyn std::error::Error>> {
    let (root, config) = match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                let content = std::fs::read_to_string(&p)?;
                let config = cicbench_config::load_config_from_str(&content)?;
                let root = p
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."));
                (root, config)
            } else {
                let config = cicbench_config::load_config(&p)?;
                (p, config)
            }
        }
        None => {
            let root = cicbench_config::find_bench_root(&std::env::current_dir()?)?;
            let config = cicbench_config::load_config(&root)?;
            (root, config)
        }
    };
    let bench = cicbench_config::resolve_bench(&config, &root)?;
    Ok((root, bench))
}

/// Builds the stimulus: the override fixture if given, else the configured source.
pub fn build_stimulus(
    bench: &ResolvedBench,
    fixture_override: Option<&Path>,
) -> Result<Bitstream, Box<dyn std::error::Error>> {
    if let Some(path) = fixture_override {
        return Ok(Bitstream::load(path)?);
    }
    match &bench.stimulus {
        ResolvedStimulus::Fixture(path) => Ok(Bitstream::load(path)?),
        ResolvedStimulus::Tone {
            tone_bin,
            length,
            amplitude,
        } => Ok(sigma_delta_tone(&ToneParams {
            tone_bin: *tone_bin,
            length: *length,
            amplitude: *amplitude,
            ..ToneParams::default()
        })),
    }
}

/// Builds the suite plan from the resolved configuration.
pub fn build_plan(bench: &ResolvedBench) -> SuitePlan {
    SuitePlan {
        reset: ResetSequence::new(bench.reset_cycles),
        check: spectral_check(bench),
        scenarios: bench
            .scenarios
            .iter()
            .map(|s| NormalScenario {
                name: s.name.clone(),
                order: s.order,
            })
            .collect(),
        sweeps: bench
            .sweeps
            .iter()
            .map(|s| DebugSweep {
                name: s.name.clone(),
                order: s.order,
                secondary_preset: s.secondary_preset,
                settle_cycles: s.settle_cycles,
                loopback: s.loopback.map(|l| LoopbackCheck {
                    mode: l.mode,
                    expected: l.expected,
                }),
            })
            .collect(),
    }
}

/// Returns the spectral thresholds of the bench.
pub fn spectral_check(bench: &ResolvedBench) -> SpectralCheck {
    SpectralCheck {
        tone_bin: bench.tone_bin,
        band_end: bench.band_end,
    }
}

/// Creates the reference model clocked at the bench frequency.
pub fn build_model(bench: &ResolvedBench) -> Result<CicModel, Box<dyn std::error::Error>> {
    let clock = Clock::from_frequency(bench.clock)?;
    let config = ModelConfig {
        decimation_first: bench.decimation_first,
        decimation_second: bench.decimation_second,
    };
    Ok(CicModel::new(config, clock))
}

/// Decodes an order select value given on the command line.
pub fn parse_order(select: u8) -> Result<FilterOrder, Box<dyn std::error::Error>> {
    Ok(FilterOrder::try_from(select)?)
}

/// Wraps `text` in an ANSI color when color output is enabled.
pub fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cicbench_config::CONFIG_FILE_NAME;
    use std::fs;

    fn global_with(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: 0,
            color: false,
            config,
        }
    }

    fn write_bench(dir: &Path, body: &str) {
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            format!("[bench]\nname = \"t\"\n\n{body}"),
        )
        .unwrap();
    }

    #[test]
    fn load_bench_from_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "");
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (root, bench) = load_bench(&global).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(bench.name, "t");
        assert_eq!(
            bench.stimulus,
            ResolvedStimulus::Fixture(tmp.path().join("fixtures/test_bitstream.txt"))
        );
    }

    #[test]
    fn load_bench_from_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("alt.toml");
        fs::write(&path, "[bench]\nname = \"alt\"\n").unwrap();
        let global = global_with(Some(path.to_string_lossy().to_string()));
        let (root, bench) = load_bench(&global).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(bench.name, "alt");
    }

    #[test]
    fn load_bench_invalid_config_errors() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "[reset]\ncycles = 0\n");
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        assert!(load_bench(&global).is_err());
    }

    #[test]
    fn stimulus_from_tone_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "[stimulus]\ntone_bin = 3\nlength = 512\n");
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (_, bench) = load_bench(&global).unwrap();
        let bits = build_stimulus(&bench, None).unwrap();
        assert_eq!(bits.len(), 512);
    }

    #[test]
    fn stimulus_override_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "[stimulus]\ntone_bin = 3\nlength = 512\n");
        let fixture = tmp.path().join("short.txt");
        fs::write(&fixture, "1\n0\n1\n").unwrap();
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (_, bench) = load_bench(&global).unwrap();
        let bits = build_stimulus(&bench, Some(&fixture)).unwrap();
        assert_eq!(bits.len(), 3);
    }

    #[test]
    fn missing_fixture_errors() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "");
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (_, bench) = load_bench(&global).unwrap();
        let err = build_stimulus(&bench, None).unwrap_err();
        assert!(err.to_string().contains("test_bitstream.txt"));
    }

    #[test]
    fn plan_mirrors_config() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(
            tmp.path(),
            "[reset]\ncycles = 4\n\n[[scenario]]\nname = \"only\"\norder = 1\n",
        );
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (_, bench) = load_bench(&global).unwrap();
        let plan = build_plan(&bench);
        assert_eq!(plan.reset.cycles, 4);
        assert_eq!(plan.scenarios.len(), 1);
        assert_eq!(plan.scenarios[0].order, FilterOrder::Second);
        assert_eq!(plan.sweeps.len(), 2);
        assert_eq!(
            plan.sweeps[0].loopback,
            Some(LoopbackCheck {
                mode: 4,
                expected: 0xB4
            })
        );
    }

    #[test]
    fn model_uses_bench_clock() {
        let tmp = tempfile::tempdir().unwrap();
        write_bench(tmp.path(), "[clock]\nfrequency = \"1MHz\"\n");
        let global = global_with(Some(tmp.path().to_string_lossy().to_string()));
        let (_, bench) = load_bench(&global).unwrap();
        let mut model = build_model(&bench).unwrap();
        use cicbench_sim::Dut;
        model.advance_cycles(3).unwrap();
        assert_eq!(model.now(), cicbench_sim::SimTime::from_us(3));
    }

    #[test]
    fn order_parsing() {
        assert_eq!(parse_order(0).unwrap(), FilterOrder::First);
        assert_eq!(parse_order(1).unwrap(), FilterOrder::Second);
        assert!(parse_order(2).is_err());
    }

    #[test]
    fn paint_respects_color_flag() {
        assert_eq!(paint("PASS", "32", false), "PASS");
        assert_eq!(paint("PASS", "32", true), "\x1b[32mPASS\x1b[0m");
    }
}
