use crate::cli::SpectrumArgs;
use crate::exit_codes;
use crate::output;
use crate::params;

pub fn execute(args: SpectrumArgs) -> i32 {
    if let Err(msg) = params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let spectrum = match notch_rs::load_samples(&args.file)
        .and_then(|samples| notch_rs::calc_freq_spectrum(&samples, args.sample_rate))
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    match output::to_json(&spectrum, args.compact) {
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
