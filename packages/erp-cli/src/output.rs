use clap::ValueEnum;
use erp_rs::ErpResult;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full analysis report
    Json,
    /// ERP matrix only, one row per finger
    Csv,
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| format!("JSON serialization failed: {}", e))
}

/// Matrix rows as headerless CSV, finger id first: `f,v0,v1,...`
pub fn to_matrix_csv(result: &ErpResult) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for (summary, row) in result.fingers.iter().zip(&result.erp_matrix) {
        let record = std::iter::once(summary.finger_id.to_string())
            .chain(row.iter().map(|v| v.to_string()));
        writer
            .write_record(record)
            .map_err(|e| format!("CSV serialization failed: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("CSV serialization failed: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV serialization failed: {}", e))
}

pub fn render(result: &ErpResult, format: OutputFormat, compact: bool) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(result, compact),
        OutputFormat::Csv => to_matrix_csv(result),
    }
}

/// Write rendered output to stdout or a file.
pub fn write_output(contents: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(Path::new(path), contents)
            .map_err(|e| format!("Failed to write output file '{}': {}", path, e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(contents.trim_end().as_bytes())
                .and_then(|_| handle.write_all(b"\n"))
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}
