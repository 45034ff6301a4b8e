pub mod types;
pub mod extractor;
pub mod loader;
pub mod plot;
pub mod error;

pub use types::*;
pub use extractor::{
    compute_mean_erp, compute_mean_erp_from_arrays, extract_finger_epochs, FingerEpochs,
};
pub use loader::{analyze_files, calc_mean_erp_from_files, load_signal, load_trials, LoadOptions};
pub use plot::{ErpPresenter, SvgPlotPresenter};
pub use error::{ErpError, Result};
