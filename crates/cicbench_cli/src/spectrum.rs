//! `cicbench spectrum`: capture once and print the low-frequency spectrum.

use cicbench_common::ControlWord;
use cicbench_sim::Dut;
use cicbench_verify::{apply_bitstream, ResetSequence, Spectrum};

use crate::pipeline::{
    build_model, build_stimulus, load_bench, paint, parse_order, spectral_check,
};
use crate::{GlobalArgs, SpectrumArgs};

/// Runs the `cicbench spectrum` command.
///
/// Prints bins `0..band_end` of the capture's magnitude spectrum to stdout,
/// marking the expected tone bin, followed by the spectral check verdict.
/// Returns exit code 0 if the check passes, 1 otherwise.
pub fn run(args: &SpectrumArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_root, bench) = load_bench(global)?;
    let order = parse_order(args.order)?;
    let bitstream = build_stimulus(&bench, args.fixture.as_deref())?;
    let check = spectral_check(&bench);

    let mut dut = build_model(&bench)?;
    dut.write_control_word(ControlWord::for_order(order));
    ResetSequence::new(bench.reset_cycles).apply(&mut dut)?;
    let samples = apply_bitstream(&mut dut, &bitstream)?;
    let spectrum = Spectrum::of_capture(&samples);

    println!("{order}: {} samples from {} bits", samples.len(), bitstream.len());
    for line in render_bins(&spectrum, check.band_end, check.tone_bin) {
        println!("{line}");
    }

    match check.verify(&spectrum) {
        Ok(report) => {
            if !global.quiet {
                eprintln!(
                    "   {}  bin {} carries {:.1} of {:.1} in bins 1..{}",
                    paint("PASS", "32", global.color),
                    report.dominant_bin,
                    report.tone_magnitude,
                    report.tone_magnitude + report.band_rest,
                    check.band_end
                );
            }
            Ok(0)
        }
        Err(e) => {
            if !global.quiet {
                eprintln!("   {}  {e}", paint("FAIL", "31", global.color));
            }
            Ok(1)
        }
    }
}

/// Formats one line per bin in `0..band_end`, marking `tone_bin` with `*`.
fn render_bins(spectrum: &Spectrum, band_end: usize, tone_bin: usize) -> Vec<String> {
    spectrum
        .magnitudes()
        .iter()
        .take(band_end)
        .enumerate()
        .map(|(bin, mag)| {
            let marker = if bin == tone_bin { '*' } else { ' ' };
            format!("{marker}{bin:>4}  {mag:>14.3}")
        })
        .collect()
}
