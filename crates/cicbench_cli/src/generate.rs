//! `cicbench generate`: write a synthetic sigma-delta tone fixture.

use cicbench_verify::{sigma_delta_tone, ToneParams};

use crate::{GenerateArgs, GlobalArgs};

/// Runs the `cicbench generate` command.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.length == 0 {
        return Err("--length must be greater than 0".into());
    }
    if args.bin == 0 || args.bin >= args.length {
        return Err(format!("--bin must be in 1..{}, got {}", args.length, args.bin).into());
    }
    if !(args.amplitude > 0.0 && args.amplitude <= 0.5) {
        return Err(format!("--amplitude must be in (0, 0.5], got {}", args.amplitude).into());
    }

    let bits = sigma_delta_tone(&ToneParams {
        tone_bin: args.bin,
        length: args.length,
        amplitude: args.amplitude,
        ..ToneParams::default()
    });

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.output, bits.to_fixture_text())?;

    if !global.quiet {
        eprintln!(
            "   Wrote {} bits ({} ones, tone at bin {}) to {}",
            bits.len(),
            bits.ones(),
            args.bin,
            args.output.display()
        );
    }
    Ok(0)
}
