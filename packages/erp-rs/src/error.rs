use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErpError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    #[error("Invalid finger id {finger_id} in trial row {row}: expected 1..=5")]
    InvalidFingerId { row: usize, finger_id: i64 },

    #[error("No valid trials for finger {0}")]
    NoDataForFinger(u8),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),
}

pub type Result<T> = std::result::Result<T, ErpError>;
