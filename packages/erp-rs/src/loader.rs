//! Headerless delimited-text readers for the events table and the signal.

use crate::error::{ErpError, Result};
use crate::extractor::{compute_mean_erp_from_arrays, extract_finger_epochs, trials_from_array};
use crate::types::{ErpResult, WindowParameters};
use ndarray::{Array1, Array2};
use std::path::Path;

/// Reader options shared by both input files
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

fn reader_for(path: &Path, options: LoadOptions) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|e| {
            let not_found = matches!(
                e.kind(),
                csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound
            );
            if not_found {
                ErpError::FileNotFound(path.display().to_string())
            } else {
                ErpError::CsvError(e)
            }
        })
}

fn line_of(record: &csv::StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map(|pos| pos.line())
        .unwrap_or(fallback as u64 + 1)
}

/// Integer cell; integral floats such as `500.0` are accepted.
fn parse_integer(field: &str) -> Option<i64> {
    if let Ok(value) = field.parse::<i64>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Load the events file as an `(n_trials, 3)` table of start, peak, finger.
pub fn load_trials<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Array2<i64>> {
    let path = path.as_ref();
    let mut reader = reader_for(path, options)?;
    let mut values = Vec::new();
    let mut n_rows = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = line_of(&record, idx);
        if record.len() != 3 {
            return Err(ErpError::InvalidInputShape(format!(
                "{}:{}: expected 3 columns (start, peak, finger), found {}",
                path.display(),
                line,
                record.len()
            )));
        }

        for field in record.iter() {
            let value = parse_integer(field).ok_or_else(|| {
                ErpError::ParseError(format!(
                    "{}:{}: '{}' is not an integer",
                    path.display(),
                    line,
                    field
                ))
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    log::info!("Loaded {} trials from {}", n_rows, path.display());

    Array2::from_shape_vec((n_rows, 3), values)
        .map_err(|e| ErpError::InvalidInputShape(e.to_string()))
}

/// Load the first column of the signal file as a one-dimensional signal.
pub fn load_signal<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Array1<f64>> {
    let path = path.as_ref();
    let mut reader = reader_for(path, options)?;
    let mut samples = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let field = record.get(0).unwrap_or_default();
        // whitespace-only line
        if record.len() <= 1 && field.is_empty() {
            continue;
        }

        // empty first cell: missing sample, keeps its index
        if field.is_empty() {
            samples.push(f64::NAN);
            continue;
        }

        let sample = field.parse::<f64>().map_err(|_| {
            ErpError::ParseError(format!(
                "{}:{}: '{}' is not a number",
                path.display(),
                line_of(&record, idx),
                field
            ))
        })?;
        samples.push(sample);
    }

    log::info!("Loaded {} samples from {}", samples.len(), path.display());

    Ok(Array1::from(samples))
}

fn check_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ErpError::FileNotFound(path.display().to_string()))
    }
}

/// Load both files and compute the `(5, window_length)` ERP matrix.
///
/// Both paths are checked before either file is read.
pub fn calc_mean_erp_from_files<P: AsRef<Path>, Q: AsRef<Path>>(
    events_path: P,
    signal_path: Q,
    window: WindowParameters,
) -> Result<Array2<f64>> {
    let (events_path, signal_path) = (events_path.as_ref(), signal_path.as_ref());
    check_exists(events_path)?;
    check_exists(signal_path)?;

    let options = LoadOptions::default();
    let trials = load_trials(events_path, options)?;
    let signal = load_signal(signal_path, options)?;

    compute_mean_erp_from_arrays(trials.view(), signal.view().into_dyn(), window)
}

/// Same pipeline as [`calc_mean_erp_from_files`], returning the full report.
pub fn analyze_files<P: AsRef<Path>, Q: AsRef<Path>>(
    events_path: P,
    signal_path: Q,
    window: WindowParameters,
    options: LoadOptions,
) -> Result<ErpResult> {
    let (events_path, signal_path) = (events_path.as_ref(), signal_path.as_ref());
    check_exists(events_path)?;
    check_exists(signal_path)?;

    let table = load_trials(events_path, options)?;
    let signal = load_signal(signal_path, options)?;
    let trials = trials_from_array(table.view())?;
    let samples = signal.as_slice().unwrap_or_default();

    let epochs = extract_finger_epochs(&trials, samples, window)?;
    let erp = epochs.mean_erp()?;

    log::info!("ERP matrix shape: {:?}", erp.dim());

    Ok(ErpResult::new(
        events_path.display().to_string(),
        signal_path.display().to_string(),
        window,
        trials.len(),
        samples.len(),
        epochs.n_discarded(),
        epochs.trial_counts(),
        erp.view(),
    ))
}
