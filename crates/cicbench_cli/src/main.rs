//! cicbench CLI: the command-line interface for the CIC decimator testbench.
//!
//! Provides `cicbench run` for the normal-operation and debug-mode suite,
//! `cicbench spectrum` for inspecting one capture's spectrum, and
//! `cicbench generate` for writing synthetic tone fixtures.

#![warn(missing_docs)]

mod generate;
mod logger;
mod pipeline;
mod run;
mod spectrum;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// cicbench: verification testbench for a CIC decimation filter.
#[derive(Parser, Debug)]
#[command(name = "cicbench", version, about = "CIC decimator testbench")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (`-v` debug, `-vv` per-sample trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `bench.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the normal-operation scenarios and debug-mode sweeps.
    Run(RunArgs),
    /// Capture once and print the low-frequency spectrum.
    Spectrum(SpectrumArgs),
    /// Write a synthetic sigma-delta tone fixture.
    Generate(GenerateArgs),
}

/// Arguments for the `cicbench run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Specific scenario or sweep name to run (optional).
    pub name: Option<String>,

    /// Substring filter for scenario and sweep names.
    #[arg(long)]
    pub filter: Option<String>,

    /// Directory to write one JSON capture per normal-operation scenario.
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Stimulus fixture overriding the one in `bench.toml`.
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

/// Arguments for the `cicbench spectrum` subcommand.
#[derive(Parser, Debug)]
pub struct SpectrumArgs {
    /// Filter order select (0 = first order, 1 = second order).
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub order: u8,

    /// Stimulus fixture overriding the one in `bench.toml`.
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

/// Arguments for the `cicbench generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Path of the fixture file to write.
    #[arg(short, long)]
    pub output: PathBuf,

    /// DFT bin of the tone over the whole bitstream.
    #[arg(long, default_value_t = 3)]
    pub bin: usize,

    /// Number of bits to generate.
    #[arg(long, default_value_t = 4096)]
    pub length: usize,

    /// Tone amplitude as a fraction of full scale.
    #[arg(long, default_value_t = 0.4)]
    pub amplitude: f64,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

impl ColorChoice {
    /// Resolves the choice given whether the output stream is a terminal.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Log verbosity level from repeated `-v` flags.
    pub verbose: u8,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = cli.color.enabled(std::io::stderr().is_terminal());

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    logger::init(global.quiet, global.verbose);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Spectrum(ref args) => spectrum::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_run_default() {
        let cli = Cli::parse_from(["cicbench", "run"]);
        match cli.command {
            Command::Run(ref args) => {
                assert!(args.name.is_none());
                assert!(args.filter.is_none());
                assert!(args.dump.is_none());
                assert!(args.fixture.is_none());
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_with_args() {
        let cli = Cli::parse_from([
            "cicbench",
            "run",
            "cic1",
            "--filter",
            "debug",
            "--dump",
            "out",
            "--fixture",
            "bits.txt",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.name.as_deref(), Some("cic1"));
                assert_eq!(args.filter.as_deref(), Some("debug"));
                assert_eq!(args.dump, Some(PathBuf::from("out")));
                assert_eq!(args.fixture, Some(PathBuf::from("bits.txt")));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_spectrum_order() {
        let cli = Cli::parse_from(["cicbench", "spectrum", "--order", "1"]);
        match cli.command {
            Command::Spectrum(ref args) => {
                assert_eq!(args.order, 1);
                assert!(args.fixture.is_none());
            }
            _ => panic!("expected Spectrum command"),
        }
    }

    #[test]
    fn parse_spectrum_default_order() {
        let cli = Cli::parse_from(["cicbench", "spectrum"]);
        match cli.command {
            Command::Spectrum(ref args) => assert_eq!(args.order, 0),
            _ => panic!("expected Spectrum command"),
        }
    }

    #[test]
    fn parse_spectrum_rejects_bad_order() {
        let result = Cli::try_parse_from(["cicbench", "spectrum", "--order", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::parse_from(["cicbench", "generate", "--output", "bits.txt"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.output, PathBuf::from("bits.txt"));
                assert_eq!(args.bin, 3);
                assert_eq!(args.length, 4096);
                assert_eq!(args.amplitude, 0.4);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "cicbench",
            "generate",
            "-o",
            "tone.txt",
            "--bin",
            "5",
            "--length",
            "2048",
            "--amplitude",
            "0.25",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.bin, 5);
                assert_eq!(args.length, 2048);
                assert_eq!(args.amplitude, 0.25);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_requires_output() {
        assert!(Cli::try_parse_from(["cicbench", "generate"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["cicbench", "--quiet", "--color", "never", "run"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_count() {
        let cli = Cli::parse_from(["cicbench", "-vv", "run"]);
        assert_eq!(cli.verbose, 2);
        let cli = Cli::parse_from(["cicbench", "run", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["cicbench", "--config", "/path/to/bench.toml", "run"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/bench.toml"));
    }

    #[test]
    fn parse_color_always() {
        let cli = Cli::parse_from(["cicbench", "--color", "always", "spectrum"]);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn auto_color_follows_terminal() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}
