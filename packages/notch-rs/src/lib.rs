pub mod config;
pub mod error;
pub mod filter;
pub mod fir;
pub mod iir;
pub mod noise;
pub mod pipeline;
pub mod profiling;
pub mod roots;
pub mod samples;
pub mod spectrum;
pub mod types;
pub mod windows;

pub use config::{AnalysisConfig, EquirippleConfig, FrequencySamplingConfig, WindowDesignConfig};
pub use error::{NotchError, Result};
pub use filter::{apply_cascade, convolve, frequency_response, lfilter};
pub use fir::design_pair;
pub use iir::{combine_filters, create_notch_pair, notch_coefficients};
pub use noise::{format_report, noise_power, stage_noise_powers, variance, NoisePowerEntry};
pub use pipeline::{run_all, run_pipeline, run_selected};
pub use samples::{load_samples, parse_samples};
pub use spectrum::calc_freq_spectrum;
pub use types::*;
pub use windows::Window;
