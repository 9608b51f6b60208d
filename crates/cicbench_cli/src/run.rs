//! `cicbench run`: run the normal-operation scenarios and debug sweeps.
//!
//! Loads the bench configuration, builds the stimulus and the suite plan,
//! optionally narrows the plan by name, then runs it against the reference
//! model. Reports per-scenario status and a summary line, and optionally
//! dumps each normal-operation capture as JSON.

use std::path::Path;

use cicbench_verify::{run_suite, BenchError, ScenarioOutcome, ScenarioReport};

use crate::pipeline::{build_model, build_plan, build_stimulus, load_bench, paint};
use crate::{GlobalArgs, RunArgs};

/// Runs the `cicbench run` command.
///
/// Returns exit code 0 if every selected scenario passes, 1 otherwise.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_root, bench) = load_bench(global)?;

    if !global.quiet {
        eprintln!("   Testing {} v{}", bench.name, bench.version);
    }

    let bitstream = build_stimulus(&bench, args.fixture.as_deref())?;
    let plan = build_plan(&bench).filtered(args.name.as_deref(), args.filter.as_deref());

    if plan.is_empty() {
        if !global.quiet {
            eprintln!("warning: no scenarios match the given filter");
        }
        return Ok(0);
    }

    if !global.quiet {
        eprintln!(
            "   Found {} scenario(s), {} stimulus bits at {}",
            plan.len(),
            bitstream.len(),
            bench.clock
        );
    }

    let mut dut = build_model(&bench)?;
    let (reports, failure) = match run_suite(&mut dut, &plan, &bitstream) {
        Ok(report) => (report.reports, None),
        Err(failure) => (failure.completed, Some((failure.scenario, failure.error))),
    };

    if !global.quiet {
        for report in &reports {
            print_pass(report, global.color);
        }
        if let Some((ref name, ref error)) = failure {
            print_fail(name, error, global.color);
        }
    }

    if let Some(ref dir) = args.dump {
        let written = dump_reports(dir, &reports)?;
        if !global.quiet {
            eprintln!("   Dumped {written} capture(s) to {}", dir.display());
        }
    }

    let passed = reports.len();
    let failed = usize::from(failure.is_some());
    let skipped = plan.len() - passed - failed;

    if !global.quiet {
        eprintln!();
        if skipped > 0 {
            eprintln!(
                "   Result: {passed} passed, {failed} failed, {skipped} not run out of {} scenario(s)",
                plan.len()
            );
        } else {
            eprintln!(
                "   Result: {passed} passed, {failed} failed out of {} scenario(s)",
                plan.len()
            );
        }
    }

    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Writes `<dir>/<name>.json` for every normal-operation report.
fn dump_reports(
    dir: &Path,
    reports: &[ScenarioReport],
) -> Result<usize, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let mut written = 0;
    for report in reports {
        if let ScenarioOutcome::Normal(ref normal) = report.outcome {
            let json = serde_json::to_string_pretty(normal)?;
            std::fs::write(dir.join(format!("{}.json", report.name)), json)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Prints the status line of a passing scenario.
fn print_pass(report: &ScenarioReport, color: bool) {
    let detail = match report.outcome {
        ScenarioOutcome::Normal(ref n) => format!(
            "{} samples, bin {} {:.1} vs {:.1}",
            n.samples.len(),
            n.spectral.dominant_bin,
            n.spectral.tone_magnitude,
            n.spectral.band_rest
        ),
        ScenarioOutcome::Sweep(ref s) => format!("{} debug modes", s.outcomes.len()),
    };
    eprintln!(
        "   {}  {name} ({time}): {detail}",
        paint("PASS", "32", color),
        name = report.name,
        time = report.elapsed,
    );
}

/// Prints the status line of the failing scenario.
fn print_fail(name: &str, error: &BenchError, color: bool) {
    eprintln!("   {}  {name}: {error}", paint("FAIL", "31", color));
}
