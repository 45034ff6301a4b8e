use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use erp_rs::extractor::trials_from_array;
use erp_rs::{extract_finger_epochs, load_signal, load_trials, ErpError, N_FINGERS};
use serde::Serialize;

#[derive(Serialize, Default)]
struct ValidateOutput {
    events: String,
    signal: String,
    n_trials: Option<usize>,
    n_samples: Option<usize>,
    window_length: usize,
    n_discarded: Option<usize>,
    trials_per_finger: Option<[usize; N_FINGERS]>,
    error: Option<String>,
}

/// Load and epoch the inputs, recording as much as is known before any error.
fn inspect(args: &ValidateArgs, report: &mut ValidateOutput) -> Result<(), ErpError> {
    let options = args.input.load_options();
    let table = load_trials(&args.input.events, options)?;
    report.n_trials = Some(table.nrows());

    let signal = load_signal(&args.input.signal, options)?;
    report.n_samples = Some(signal.len());

    let trials = trials_from_array(table.view())?;
    let samples = signal.as_slice().unwrap_or_default();
    let epochs = extract_finger_epochs(&trials, samples, args.input.window())?;
    report.n_discarded = Some(epochs.n_discarded());
    report.trials_per_finger = Some(epochs.trial_counts());

    // Same check the ERP computation makes before averaging
    if let Some(idx) = epochs.trial_counts().iter().position(|&n| n == 0) {
        return Err(ErpError::NoDataForFinger((idx + 1) as u8));
    }
    Ok(())
}

pub fn execute(args: ValidateArgs) -> i32 {
    let mut report = ValidateOutput {
        events: args.input.events.clone(),
        signal: args.input.signal.clone(),
        window_length: args.input.window().window_length(),
        ..Default::default()
    };

    let outcome = inspect(&args, &mut report);
    if let Err(ref e) = outcome {
        report.error = Some(e.to_string());
    }

    if args.json {
        match output::to_json(&report, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
    } else {
        if let Some(n) = report.n_trials {
            println!("Events: {} ({} trials)", report.events, n);
        }
        if let Some(n) = report.n_samples {
            println!("Signal: {} ({} samples)", report.signal, n);
        }
        if let (Some(counts), Some(discarded)) = (report.trials_per_finger, report.n_discarded) {
            println!(
                "Window: {} samples, {} trials out of bounds",
                report.window_length, discarded
            );
            for (idx, n) in counts.iter().enumerate() {
                println!("  Finger{}: {} trials", idx + 1, n);
            }
        }
        if let Some(ref err) = report.error {
            eprintln!("Error: {}", err);
        }
    }

    match outcome {
        Ok(()) => exit_codes::SUCCESS,
        Err(ref e) => exit_codes::for_error(e),
    }
}
