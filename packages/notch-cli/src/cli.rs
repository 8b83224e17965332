use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ecgnotch",
    version,
    about = "ECG notch filter design and noise-power analysis",
    long_about = "Design IIR and FIR notch filters for narrowband interference in ECG recordings\n\
                  and estimate the noise power each filter stage removes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every filter pipeline over a recording
    Run(RunArgs),
    /// Print the coefficients of one filter design
    Design(DesignArgs),
    /// Print the magnitude spectrum of a recording
    Spectrum(SpectrumArgs),
}

/// Filter design parameters shared by `run` and `design`
///
/// Flags override values read from `--config`.
#[derive(Args, Clone, Default)]
pub struct DesignParams {
    /// JSON analysis configuration
    #[arg(long)]
    pub config: Option<String>,

    /// Sampling rate in Hz
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// The two interference frequencies in Hz
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    pub notches: Option<Vec<f64>>,

    /// 3 dB width of each notch in Hz
    #[arg(long)]
    pub notch_width: Option<f64>,

    /// FIR tap count (odd)
    #[arg(long)]
    pub taps: Option<usize>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Sample file (whitespace-separated amplitudes)
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub design: DesignParams,

    /// Pipelines to run (iir, window, equiripple, freq-sampling); default all
    #[arg(long, num_args = 1..)]
    pub kinds: Option<Vec<String>>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the text noise-power report to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct DesignArgs {
    /// Filter kind: iir, window, equiripple or freq-sampling
    #[arg(long)]
    pub kind: String,

    #[command(flatten)]
    pub design: DesignParams,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct SpectrumArgs {
    /// Sample file (whitespace-separated amplitudes)
    #[arg(long)]
    pub file: String,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 1024.0)]
    pub sample_rate: f64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}
