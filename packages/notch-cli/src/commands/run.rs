use crate::cli::RunArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

pub fn execute(args: RunArgs) -> i32 {
    if let Err(msg) = params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let config = match params::build_config(&args.design) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let kinds = match params::parse_kinds(&args.kinds) {
        Ok(k) => k,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let samples = match notch_rs::load_samples(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    if !args.quiet {
        eprintln!("Analyzing {} ({} samples)...", args.file, samples.len());
        eprintln!(
            "  Notches: {} Hz, {} Hz (width {} Hz)",
            config.notches.first, config.notches.second, config.notch_width
        );
        eprintln!(
            "  Sample rate: {} Hz, FIR taps: {}",
            config.sample_rate, config.num_taps
        );
    }

    let report = match notch_rs::run_selected(&samples, &config, &kinds) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    let json = match output::to_json(&report, args.compact) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    if let Err(e) = output::write_output(&json, args.output.as_deref()) {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }

    if let Some(path) = &args.report {
        let text = notch_rs::format_report(&report.noise_powers(), &config.power_unit);
        if let Err(e) = output::write_file(path, &text) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    if !args.quiet {
        if let Some(path) = &args.output {
            eprintln!("Results written to {}", path);
        }
        if let Some(path) = &args.report {
            eprintln!("Noise-power report written to {}", path);
        }
    }

    for failure in &report.failures {
        eprintln!("Pipeline {} failed: {}", failure.kind, failure.error);
    }
    if report.is_complete() {
        exit_codes::SUCCESS
    } else {
        exit_codes::EXECUTION_ERROR
    }
}
