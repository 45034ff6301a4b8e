use crate::error::{ErpError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Number of finger classes. Row `i` of an ERP matrix belongs to finger `i + 1`.
pub const N_FINGERS: usize = 5;

/// Default samples kept before movement onset (1 sample = 1 ms).
pub const DEFAULT_PRE_SAMPLES: usize = 200;

/// Default samples kept after movement onset.
pub const DEFAULT_POST_SAMPLES: usize = 1000;

/// Upper bound on `pre_samples` and `post_samples`; keeps `pre + 1 + post`
/// representable as a signed sample offset.
pub const MAX_WINDOW_SAMPLES: usize = (i64::MAX / 2) as usize;

/// One recorded movement event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    /// Movement-onset sample index into the signal
    pub start_index: i64,
    /// Peak sample index. Carried with the record, not used for averaging.
    pub peak_index: i64,
    /// Which finger moved, expected in 1..=5
    pub finger_id: i64,
}

impl Trial {
    pub fn new(start_index: i64, peak_index: i64, finger_id: i64) -> Self {
        Self {
            start_index,
            peak_index,
            finger_id,
        }
    }
}

/// Epoch window around each onset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParameters {
    pub pre_samples: usize,
    pub post_samples: usize,
}

impl WindowParameters {
    pub fn new(pre_samples: usize, post_samples: usize) -> Self {
        Self {
            pre_samples,
            post_samples,
        }
    }

    /// `pre + 1 + post`; the extra sample is the onset itself.
    ///
    /// Saturates for windows that fail [`WindowParameters::validate`].
    pub fn window_length(&self) -> usize {
        self.pre_samples
            .saturating_add(1)
            .saturating_add(self.post_samples)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pre_samples > MAX_WINDOW_SAMPLES || self.post_samples > MAX_WINDOW_SAMPLES {
            return Err(ErpError::InvalidInputShape(format!(
                "window of {} samples before and {} after onset exceeds the limit of {}",
                self.pre_samples, self.post_samples, MAX_WINDOW_SAMPLES
            )));
        }
        Ok(())
    }

    /// Expected ERP matrix shape: one row per finger.
    pub fn expected_shape(&self) -> (usize, usize) {
        (N_FINGERS, self.window_length())
    }

    /// Signed offsets in milliseconds relative to onset, `-pre..=post`.
    pub fn time_axis(&self) -> Vec<i64> {
        (-(self.pre_samples as i64)..=self.post_samples as i64).collect()
    }
}

impl Default for WindowParameters {
    fn default() -> Self {
        Self::new(DEFAULT_PRE_SAMPLES, DEFAULT_POST_SAMPLES)
    }
}

/// Per-finger slice of an analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerSummary {
    pub finger_id: u8,
    pub n_trials: usize,
}

/// Complete result of one ERP analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpResult {
    pub events_file: String,
    pub signal_file: String,
    pub window_parameters: WindowParameters,
    pub n_trials: usize,
    pub n_samples: usize,
    pub n_discarded: usize,
    pub fingers: Vec<FingerSummary>,
    pub erp_matrix: Vec<Vec<f64>>, // [finger × time]
    pub created_at: String,
}

impl ErpResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events_file: String,
        signal_file: String,
        window_parameters: WindowParameters,
        n_trials: usize,
        n_samples: usize,
        n_discarded: usize,
        trial_counts: [usize; N_FINGERS],
        erp: ArrayView2<'_, f64>,
    ) -> Self {
        let fingers = trial_counts
            .iter()
            .enumerate()
            .map(|(idx, &n_trials)| FingerSummary {
                finger_id: (idx + 1) as u8,
                n_trials,
            })
            .collect();

        Self {
            events_file,
            signal_file,
            window_parameters,
            n_trials,
            n_samples,
            n_discarded,
            fingers,
            erp_matrix: erp.outer_iter().map(|row| row.to_vec()).collect(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// (rows, columns) of the stored matrix
    pub fn shape(&self) -> (usize, usize) {
        let cols = self.erp_matrix.first().map_or(0, |row| row.len());
        (self.erp_matrix.len(), cols)
    }

    /// Rebuild the nested rows as a `[finger × time]` matrix.
    pub fn matrix(&self) -> Result<Array2<f64>> {
        let flat: Vec<f64> = self.erp_matrix.iter().flatten().copied().collect();
        Array2::from_shape_vec(self.shape(), flat)
            .map_err(|e| ErpError::InvalidInputShape(e.to_string()))
    }
}
