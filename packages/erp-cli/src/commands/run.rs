use crate::cli::RunArgs;
use crate::exit_codes;
use crate::output;
use erp_rs::{analyze_files, ErpPresenter, ErpResult, SvgPlotPresenter, WindowParameters};

pub fn execute(args: RunArgs) -> i32 {
    let window = args.input.window();
    if let Err(e) = window.validate() {
        eprintln!("Error: {}", e);
        return exit_codes::for_error(&e);
    }

    if !args.quiet {
        eprintln!("Computing mean ERP per finger...");
        eprintln!("  Events: {}", args.input.events);
        eprintln!("  Signal: {}", args.input.signal);
        eprintln!(
            "  Window: {} before, {} after onset ({} samples)",
            window.pre_samples,
            window.post_samples,
            window.window_length()
        );
    }

    let result = match analyze_files(
        &args.input.events,
        &args.input.signal,
        window,
        args.input.load_options(),
    ) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    let warning = shape_warning(&result, window);
    match warning {
        Some(ref warning) => eprintln!("Warning: {}", warning),
        None if !args.quiet => eprintln!("  ERP matrix shape: {:?}", result.shape()),
        None => {}
    }

    if let Some(ref plot_path) = args.plot {
        if warning.is_some() {
            eprintln!("Warning: skipping plot of a malformed ERP matrix");
        } else {
            let presenter = SvgPlotPresenter::new(plot_path);
            let plotted = result.matrix().and_then(|erp| presenter.present(erp.view(), window));
            if let Err(e) = plotted {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
            if !args.quiet {
                eprintln!("Plot written to {}", plot_path);
            }
        }
    }

    let rendered = match output::render(&result, args.format, args.compact) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    if let Err(e) = output::write_output(&rendered, args.output.as_deref()) {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }
    if !args.quiet {
        if let Some(ref path) = args.output {
            eprintln!("Results written to {}", path);
        }
    }

    exit_codes::SUCCESS
}

/// A shape other than (5, pre + 1 + post) is reported, not treated as fatal.
pub fn shape_warning(result: &ErpResult, window: WindowParameters) -> Option<String> {
    let expected = window.expected_shape();
    if result.shape() == expected {
        None
    } else {
        Some(format!(
            "unexpected ERP shape {:?}, expected {:?}; check the input data",
            result.shape(),
            expected
        ))
    }
}
