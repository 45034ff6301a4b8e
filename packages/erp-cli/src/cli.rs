use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use erp_rs::{LoadOptions, WindowParameters, DEFAULT_POST_SAMPLES, DEFAULT_PRE_SAMPLES};

#[derive(Parser)]
#[command(
    name = "ecog-erp",
    version,
    about = "Per-finger mean ERP analysis of single-channel ECOG recordings",
    long_about = "Compute the mean event-related potential of each of five fingers from a\n\
                  headerless events table (start, peak, finger) and a headerless signal file\n\
                  sampled at 1 kHz."
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
    /// Compute the per-finger ERP matrix and optionally plot it
    Run(RunArgs),
    /// Check that the input files load and every finger has usable trials
    Validate(ValidateArgs),
}

/// Input files and epoch window, shared by every subcommand
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Events file: start_index,peak_index,finger_id per line
    #[arg(long, default_value = "mini_project_2_data/events_file_ordered.csv")]
    pub events: String,

    /// Signal file; only the first column is used
    #[arg(long, default_value = "mini_project_2_data/brain_data_channel_one.csv")]
    pub signal: String,

    /// Samples (ms) kept before movement onset
    #[arg(long, default_value_t = DEFAULT_PRE_SAMPLES)]
    pub pre: usize,

    /// Samples (ms) kept after movement onset
    #[arg(long, default_value_t = DEFAULT_POST_SAMPLES)]
    pub post: usize,

    /// Field delimiter of both input files (single ASCII character, or "tab")
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

impl InputArgs {
    pub fn window(&self) -> WindowParameters {
        WindowParameters::new(self.pre, self.post)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Render the ERP plot to this SVG file
    #[arg(long)]
    pub plot: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Parse a delimiter argument into a single byte.
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" => return Ok(b'\t'),
        "space" => return Ok(b' '),
        _ => {}
    }

    match s.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "Invalid delimiter '{}': expected a single ASCII character, 'tab' or 'space'",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_delimiter_valid() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
    }

    #[test]
    fn test_parse_delimiter_invalid() {
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["ecog-erp", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.input.window(), WindowParameters::new(200, 1000));
        assert_eq!(args.input.delimiter, b',');
        assert!(args.input.events.ends_with("events_file_ordered.csv"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.plot.is_none());
    }

    #[test]
    fn test_validate_custom_window() {
        let cli = Cli::try_parse_from([
            "ecog-erp", "validate", "--pre", "50", "--post", "100", "--delimiter", "tab",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate subcommand");
        };
        assert_eq!(args.input.window().window_length(), 151);
        assert_eq!(args.input.load_options().delimiter, b'\t');
    }
}
