//! DPAM VIF Generator CLI
//!
//! Merges a DPAM optional-content settings document into a USB-IF Vendor
//! Information File and writes the combined VIF.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dpam_vif::{GeneratorConfig, NullProgress, ProgressSink, TextProgressBar, VifGenerator};
use tracing_subscriber::EnvFilter;

/// DPAM VIF Generator
#[derive(Parser)]
#[command(name = "dvg")]
#[command(version)]
#[command(about = "Merges DPAM optional-content settings into a USB-IF VIF", long_about = None)]
struct Cli {
    /// Input USB-IF VIF XML file
    #[arg(short = 'i', long)]
    in_vif: PathBuf,

    /// Output path for the generated DPAM VIF
    #[arg(short = 'o', long)]
    out_vif: PathBuf,

    /// DPAM settings XML file
    #[arg(short = 's', long)]
    settings: PathBuf,

    /// Indent string used when writing the output document
    #[arg(long, default_value = "  ")]
    indent: String,

    /// Suppress the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> dpam_vif::Result<()> {
    let config = GeneratorConfig::builder()
        .input_vif(cli.in_vif)
        .output_vif(cli.out_vif)
        .settings(cli.settings)
        .indent(cli.indent)
        .build()?;

    let progress: Box<dyn ProgressSink> = if cli.quiet {
        Box::new(NullProgress)
    } else {
        Box::new(TextProgressBar::default().with_prefix("Generating").with_length(50))
    };

    VifGenerator::with_progress(config, progress).generate()
}
