//! Integration tests for the reference run against the software CIC model.
//!
//! These tests drive the full suite (reset → stimulus → capture → spectrum,
//! then the debug-mode sweeps) through one `CicModel`, with both the shipped
//! fixture and synthesized tones.

use std::path::PathBuf;

use cicbench_common::FilterOrder;
use cicbench_sim::time::FS_PER_US;
use cicbench_sim::{CicModel, Clock, Dut, ModelConfig, SimTime};
use cicbench_verify::{
    apply_bitstream, run_normal_operation, run_suite, sigma_delta_multitone, sigma_delta_tone,
    BenchError, Bitstream, NormalScenario, ResetSequence, ScenarioOutcome, SpectralCheck,
    SuitePlan, ToneParams, VerifyError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn model() -> CicModel {
    CicModel::new(ModelConfig::default(), Clock::new(10 * FS_PER_US).unwrap())
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/test_bitstream.txt")
}

fn scenario(name: &str, order: FilterOrder) -> NormalScenario {
    NormalScenario {
        name: name.to_string(),
        order,
    }
}

// ---------------------------------------------------------------------------
// Shipped fixture
// ---------------------------------------------------------------------------

#[test]
fn fixture_is_well_formed() {
    let bits = Bitstream::load(&fixture_path()).unwrap();
    assert_eq!(bits.len(), 4096);
    let density = bits.ones() as f64 / bits.len() as f64;
    assert!((density - 0.5).abs() < 0.01);
}

#[test]
fn reference_suite_passes_on_fixture() {
    let bits = Bitstream::load(&fixture_path()).unwrap();
    let mut dut = model();
    let report = run_suite(&mut dut, &SuitePlan::reference(), &bits).unwrap();

    let names: Vec<&str> = report.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cic1", "cic2", "debug_cic1", "debug_cic2"]);

    let normal: Vec<_> = report.normal().collect();
    assert_eq!(normal[0].samples.len(), 128);
    assert_eq!(normal[1].samples.len(), 256);
    for n in &normal {
        assert_eq!(n.spectral.dominant_bin, 3);
        assert!(n.spectral.tone_magnitude > n.spectral.band_rest);
    }

    let sweeps: Vec<_> = report.sweeps().collect();
    assert_eq!(sweeps.len(), 2);
    assert_eq!(sweeps[0].outcomes.len(), 16);
    assert_eq!(sweeps[0].outcome(4).map(|o| o.final_primary), Some(0xB4));
    assert_eq!(sweeps[1].outcomes.len(), 16);
}

#[test]
fn suite_timing_follows_the_clock() {
    let bits = Bitstream::load(&fixture_path()).unwrap();
    let mut dut = model();
    let report = run_suite(&mut dut, &SuitePlan::reference(), &bits).unwrap();

    // Reset plus one pass per normal scenario, settle plus sixteen passes per sweep.
    let normal_cycles = 10 + 4096;
    let sweep_cycles = 1 + 16 * 4096;
    assert_eq!(report.reports[0].elapsed, SimTime::from_us(normal_cycles * 10));
    assert_eq!(report.reports[2].elapsed, SimTime::from_us(sweep_cycles * 10));
    assert_eq!(
        dut.now(),
        SimTime::from_us((2 * normal_cycles + 2 * sweep_cycles) * 10)
    );
    assert!(matches!(report.reports[3].outcome, ScenarioOutcome::Sweep(_)));
}

// ---------------------------------------------------------------------------
// Synthetic tones
// ---------------------------------------------------------------------------

#[test]
fn synthetic_tone_passes_both_orders() {
    let bits = sigma_delta_tone(&ToneParams::default());
    let mut dut = model();
    for (name, order) in [("cic1", FilterOrder::First), ("cic2", FilterOrder::Second)] {
        let report = run_normal_operation(
            &mut dut,
            &scenario(name, order),
            &ResetSequence::default(),
            &bits,
            &SpectralCheck::default(),
        )
        .unwrap();
        assert_eq!(report.order, order);
        assert_eq!(report.spectral.dominant_bin, 3);
    }
}

#[test]
fn spread_tone_fails_energy_concentration() {
    let bits = sigma_delta_multitone(4096, 0.5, &[(3, 0.2), (4, 0.15), (5, 0.15)]);
    let mut dut = model();
    let err = run_normal_operation(
        &mut dut,
        &scenario("cic1", FilterOrder::First),
        &ResetSequence::default(),
        &bits,
        &SpectralCheck::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BenchError::Verify(VerifyError::EnergyConcentration { bin: 3, .. })
    ));
}

#[test]
fn short_stimulus_reports_insufficient_samples() {
    let bits = sigma_delta_tone(&ToneParams {
        length: 64,
        tone_bin: 1,
        ..ToneParams::default()
    });
    let mut dut = model();
    let err = run_normal_operation(
        &mut dut,
        &scenario("cic1", FilterOrder::First),
        &ResetSequence::default(),
        &bits,
        &SpectralCheck::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BenchError::Verify(VerifyError::InsufficientSamples { needed: 3, got: 2 })
    ));
}

#[test]
fn capture_restarts_waiting_on_each_application() {
    let bits = sigma_delta_tone(&ToneParams::default());
    let mut dut = model();
    dut.write_control_word(cicbench_common::ControlWord::for_order(FilterOrder::First));
    ResetSequence::default().apply(&mut dut).unwrap();
    let first = apply_bitstream(&mut dut, &bits).unwrap();
    let second = apply_bitstream(&mut dut, &bits).unwrap();
    assert_eq!(first.len(), 128);
    // The last sample's handshake is still high when the second pass starts,
    // and a fresh detector counts it as a new edge.
    assert_eq!(second.len(), 129);
    assert_eq!(second.samples().first().copied(), first.last());
}

#[test]
fn mismatched_loopback_expectation_fails_sweep() {
    let bits = sigma_delta_tone(&ToneParams::default());
    let mut plan = SuitePlan::reference();
    if let Some(check) = plan.sweeps[0].loopback.as_mut() {
        check.expected = 0x4B;
    }
    let mut dut = model();
    let failure = run_suite(&mut dut, &plan, &bits).unwrap_err();
    assert_eq!(failure.scenario, "debug_cic1");
    assert_eq!(failure.completed.len(), 2);
    assert!(matches!(
        failure.error,
        BenchError::Verify(VerifyError::Loopback {
            mode: 4,
            expected: 0x4B,
            actual: 0xB4
        })
    ));
}
