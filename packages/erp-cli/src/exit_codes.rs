use erp_rs::ErpError;

pub const SUCCESS: i32 = 0;
/// Output could not be written or rendered
pub const EXECUTION_ERROR: i32 = 1;
/// Missing, unreadable or malformed input files
pub const INPUT_ERROR: i32 = 2;
/// Inputs parsed but cannot produce a complete ERP matrix
pub const DATA_ERROR: i32 = 3;

pub fn for_error(err: &ErpError) -> i32 {
    match err {
        ErpError::FileNotFound(_)
        | ErpError::InvalidInputShape(_)
        | ErpError::ParseError(_)
        | ErpError::IoError(_)
        | ErpError::CsvError(_) => INPUT_ERROR,
        ErpError::InvalidFingerId { .. } | ErpError::NoDataForFinger(_) => DATA_ERROR,
        ErpError::PlotError(_) => EXECUTION_ERROR,
    }
}
