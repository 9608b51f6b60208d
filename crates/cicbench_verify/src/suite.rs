//! Scenario planning and the fail-fast suite runner.
//!
//! A suite runs every normal-operation scenario and then every debug sweep
//! against one DUT, in plan order, without re-creating it between
//! scenarios. Normal-operation scenarios reset the DUT first; sweeps carry
//! on from whatever state the previous scenario left behind. The first
//! failure stops the run.

use std::fmt;

use cicbench_common::{ControlWord, FilterOrder};
use cicbench_sim::{Dut, SimTime};
use log::{debug, info};
use serde::Serialize;

use crate::bitstream::Bitstream;
use crate::capture::CaptureBuffer;
use crate::debug_matrix::{run_sweep, DebugSweep, LoopbackCheck, SweepReport};
use crate::error::BenchError;
use crate::protocol::{apply_bitstream, ResetSequence};
use crate::spectral::{SpectralCheck, SpectralReport, Spectrum};

/// Reset, drive the stimulus once, and check the spectrum of the capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalScenario {
    /// Name used in reports and filters.
    pub name: String,
    /// Filter order under test.
    pub order: FilterOrder,
}

/// Result of a passing normal-operation scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalReport {
    /// The scenario name.
    pub name: String,
    /// Filter order under test.
    pub order: FilterOrder,
    /// Captured output samples.
    pub samples: CaptureBuffer,
    /// Magnitude spectrum of the samples.
    pub spectrum: Spectrum,
    /// Spectral check summary.
    pub spectral: SpectralReport,
}

/// Runs one normal-operation scenario.
///
/// The control word is rewritten wholesale to select `order` with debug
/// mode 0, the DUT is reset, the stimulus is driven, and the capture is
/// checked against `check`.
pub fn run_normal_operation<D: Dut + ?Sized>(
    dut: &mut D,
    scenario: &NormalScenario,
    reset: &ResetSequence,
    bitstream: &Bitstream,
    check: &SpectralCheck,
) -> Result<NormalReport, BenchError> {
    info!("normal operation {} ({})", scenario.name, scenario.order);
    dut.write_control_word(ControlWord::for_order(scenario.order));
    reset.apply(dut)?;

    let samples = apply_bitstream(dut, bitstream)?;
    info!(
        "{}: captured {} samples from {} bits",
        scenario.name,
        samples.len(),
        bitstream.len()
    );

    let spectrum = Spectrum::of_capture(&samples);
    debug!(
        "{}: dominant bin {:?}, bin {} magnitude {:?}",
        scenario.name,
        spectrum.dominant_bin(),
        check.tone_bin,
        spectrum.magnitude(check.tone_bin)
    );
    let spectral = check.verify(&spectrum)?;
    info!(
        "{}: spectral check passed ({:.1} vs {:.1})",
        scenario.name, spectral.tone_magnitude, spectral.band_rest
    );

    Ok(NormalReport {
        name: scenario.name.clone(),
        order: scenario.order,
        samples,
        spectrum,
        spectral,
    })
}

/// The full set of scenarios to run, with shared reset and spectral settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuitePlan {
    /// Reset sequence applied before each normal-operation scenario.
    pub reset: ResetSequence,
    /// Spectral thresholds for normal-operation scenarios.
    pub check: SpectralCheck,
    /// Normal-operation scenarios, run first.
    pub scenarios: Vec<NormalScenario>,
    /// Debug sweeps, run after the scenarios.
    pub sweeps: Vec<DebugSweep>,
}

impl SuitePlan {
    /// The reference run: both filter orders, then a sweep per order with the
    /// loopback check on the first-order sweep.
    pub fn reference() -> Self {
        Self {
            reset: ResetSequence::default(),
            check: SpectralCheck::default(),
            scenarios: vec![
                NormalScenario {
                    name: "cic1".to_string(),
                    order: FilterOrder::First,
                },
                NormalScenario {
                    name: "cic2".to_string(),
                    order: FilterOrder::Second,
                },
            ],
            sweeps: vec![
                DebugSweep {
                    name: "debug_cic1".to_string(),
                    order: FilterOrder::First,
                    secondary_preset: 0xB4,
                    settle_cycles: 1,
                    loopback: Some(LoopbackCheck {
                        mode: 4,
                        expected: 0xB4,
                    }),
                },
                DebugSweep {
                    name: "debug_cic2".to_string(),
                    order: FilterOrder::Second,
                    secondary_preset: 0xB4,
                    settle_cycles: 1,
                    loopback: None,
                },
            ],
        }
    }

    /// Keeps only scenarios named exactly `name` and/or containing `filter`.
    pub fn filtered(mut self, name: Option<&str>, filter: Option<&str>) -> Self {
        let keep = |candidate: &str| {
            let by_name = name.map_or(true, |n| candidate == n);
            let by_filter = filter.map_or(true, |f| candidate.contains(f));
            by_name && by_filter
        };
        self.scenarios.retain(|s| keep(&s.name));
        self.sweeps.retain(|s| keep(&s.name));
        self
    }

    /// Returns the total number of scenarios and sweeps.
    pub fn len(&self) -> usize {
        self.scenarios.len() + self.sweeps.len()
    }

    /// Returns `true` if the plan has nothing to run.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a completed scenario produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// A normal-operation capture and its spectrum.
    Normal(NormalReport),
    /// A debug-mode sweep.
    Sweep(SweepReport),
}

/// A completed scenario and the simulated time it took.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// The scenario name.
    pub name: String,
    /// Simulated time spent in the scenario.
    pub elapsed: SimTime,
    /// The scenario's results.
    pub outcome: ScenarioOutcome,
}

/// Reports of a suite in which every scenario passed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SuiteReport {
    /// One report per scenario, in run order.
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Iterates over the normal-operation reports.
    pub fn normal(&self) -> impl Iterator<Item = &NormalReport> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            ScenarioOutcome::Normal(n) => Some(n),
            ScenarioOutcome::Sweep(_) => None,
        })
    }

    /// Iterates over the sweep reports.
    pub fn sweeps(&self) -> impl Iterator<Item = &SweepReport> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            ScenarioOutcome::Sweep(s) => Some(s),
            ScenarioOutcome::Normal(_) => None,
        })
    }
}

/// The first failing scenario of a suite, with everything that passed before it.
#[derive(Debug)]
pub struct SuiteFailure {
    /// Reports of the scenarios that passed.
    pub completed: Vec<ScenarioReport>,
    /// Name of the failing scenario.
    pub scenario: String,
    /// Why it failed.
    pub error: BenchError,
}

impl fmt::Display for SuiteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario '{}' failed: {}", self.scenario, self.error)
    }
}

impl std::error::Error for SuiteFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Runs every scenario of `plan` against `dut`, stopping at the first failure.
pub fn run_suite<D: Dut + ?Sized>(
    dut: &mut D,
    plan: &SuitePlan,
    bitstream: &Bitstream,
) -> Result<SuiteReport, SuiteFailure> {
    let mut reports = Vec::with_capacity(plan.len());

    for scenario in &plan.scenarios {
        let start = dut.now();
        match run_normal_operation(dut, scenario, &plan.reset, bitstream, &plan.check) {
            Ok(report) => reports.push(ScenarioReport {
                name: scenario.name.clone(),
                elapsed: elapsed_since(dut, start),
                outcome: ScenarioOutcome::Normal(report),
            }),
            Err(error) => {
                return Err(SuiteFailure {
                    completed: reports,
                    scenario: scenario.name.clone(),
                    error,
                })
            }
        }
    }

    for sweep in &plan.sweeps {
        let start = dut.now();
        match run_sweep(dut, sweep, bitstream) {
            Ok(report) => reports.push(ScenarioReport {
                name: sweep.name.clone(),
                elapsed: elapsed_since(dut, start),
                outcome: ScenarioOutcome::Sweep(report),
            }),
            Err(error) => {
                return Err(SuiteFailure {
                    completed: reports,
                    scenario: sweep.name.clone(),
                    error,
                })
            }
        }
    }

    Ok(SuiteReport { reports })
}

fn elapsed_since<D: Dut + ?Sized>(dut: &D, start: SimTime) -> SimTime {
    SimTime::from_fs(dut.now().fs.saturating_sub(start.fs))
}
