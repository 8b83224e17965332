use crate::cli::DesignArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use notch_rs::{FilterPair, PipelineKind, TransferFunction};
use serde::Serialize;

#[derive(Serialize)]
struct DesignOutput {
    kind: PipelineKind,
    sample_rate: f64,
    filters: FilterPair,
    combined: TransferFunction,
    max_pole_radius: f64,
}

pub fn execute(args: DesignArgs) -> i32 {
    let kind: PipelineKind = match args.kind.parse() {
        Ok(k) => k,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let config = match params::build_config(&args.design) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let filters = match notch_rs::design_pair(kind, &config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Design failed: {}", e);
            return exit_codes::for_error(&e);
        }
    };
    let combined = filters.combined();

    let max_pole_radius = match notch_rs::roots::max_pole_radius(&combined) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Pole analysis failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    let result = DesignOutput {
        kind,
        sample_rate: config.sample_rate,
        filters,
        combined,
        max_pole_radius,
    };

    match output::to_json(&result, args.compact) {
        Ok(json) => match output::write_output(&json, args.output.as_deref()) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_codes::EXECUTION_ERROR
            }
        },
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            exit_codes::EXECUTION_ERROR
        }
    }
}
