//! Epoch extraction and per-finger averaging.
//!
//! Each trial contributes the window `[start - pre, start + post + 1)` of the
//! signal to its finger's group. Trials whose window would leave the signal
//! are dropped, never truncated. Each group is then averaged elementwise into
//! one row of a `(5, window_length)` matrix.

use crate::error::{ErpError, Result};
use crate::types::{Trial, WindowParameters, N_FINGERS};
use ndarray::{stack, Array1, Array2, ArrayView1, ArrayView2, ArrayViewD, Axis};

/// Epochs grouped by finger, borrowed from the signal they were cut from.
#[derive(Debug)]
pub struct FingerEpochs<'a> {
    window: WindowParameters,
    slots: [Vec<ArrayView1<'a, f64>>; N_FINGERS],
    n_discarded: usize,
}

impl<'a> FingerEpochs<'a> {
    pub fn window(&self) -> WindowParameters {
        self.window
    }

    /// Contributing epochs per finger, finger 1 first.
    pub fn trial_counts(&self) -> [usize; N_FINGERS] {
        std::array::from_fn(|idx| self.slots[idx].len())
    }

    /// Trials dropped because their window did not fit inside the signal.
    pub fn n_discarded(&self) -> usize {
        self.n_discarded
    }

    /// Mean epoch of one finger.
    ///
    /// Ids outside 1..=5 have no epochs and report `NoDataForFinger` like an
    /// empty group does.
    pub fn finger_mean(&self, finger_id: u8) -> Result<Array1<f64>> {
        let epochs = match finger_id {
            1..=5 => &self.slots[usize::from(finger_id) - 1],
            _ => return Err(ErpError::NoDataForFinger(finger_id)),
        };
        if epochs.is_empty() {
            return Err(ErpError::NoDataForFinger(finger_id));
        }

        // [n_epochs × window_length]
        let block = stack(Axis(0), epochs.as_slice())
            .map_err(|e| ErpError::InvalidInputShape(format!("cannot stack epochs: {}", e)))?;
        block
            .mean_axis(Axis(0))
            .ok_or(ErpError::NoDataForFinger(finger_id))
    }

    /// Stack the five finger means into the `(5, window_length)` ERP matrix.
    pub fn mean_erp(&self) -> Result<Array2<f64>> {
        if let Some(idx) = self.slots.iter().position(|epochs| epochs.is_empty()) {
            return Err(ErpError::NoDataForFinger((idx + 1) as u8));
        }

        let mut erp = Array2::<f64>::zeros(self.window.expected_shape());
        for (idx, mut row) in erp.outer_iter_mut().enumerate() {
            row.assign(&self.finger_mean((idx + 1) as u8)?);
        }
        Ok(erp)
    }
}

/// Reject any trial whose finger id is outside 1..=5, before any slicing.
pub fn validate_finger_ids(trials: &[Trial]) -> Result<()> {
    match trials
        .iter()
        .enumerate()
        .find(|(_, trial)| !(1..=N_FINGERS as i64).contains(&trial.finger_id))
    {
        Some((row, trial)) => Err(ErpError::InvalidFingerId {
            row,
            finger_id: trial.finger_id,
        }),
        None => Ok(()),
    }
}

/// Cut one epoch per in-bounds trial and group them by finger.
pub fn extract_finger_epochs<'a>(
    trials: &[Trial],
    signal: &'a [f64],
    window: WindowParameters,
) -> Result<FingerEpochs<'a>> {
    window.validate()?;
    validate_finger_ids(trials)?;

    let window_length = window.window_length();
    let (pre, post) = (window.pre_samples as i64, window.post_samples as i64);
    let n_samples = signal.len() as i64;
    let mut slots: [Vec<ArrayView1<'a, f64>>; N_FINGERS] = Default::default();
    let mut n_discarded = 0;

    for (row, trial) in trials.iter().enumerate() {
        let window_start = trial.start_index.saturating_sub(pre);
        let window_end = trial.start_index.saturating_add(post).saturating_add(1);

        if window_start < 0 || window_end > n_samples {
            log::debug!(
                "Discarding trial {} (start {}): window [{}, {}) outside signal of {} samples",
                row,
                trial.start_index,
                window_start,
                window_end,
                n_samples
            );
            n_discarded += 1;
            continue;
        }

        let epoch = &signal[window_start as usize..window_end as usize];
        if epoch.len() != window_length {
            n_discarded += 1;
            continue;
        }

        slots[(trial.finger_id - 1) as usize].push(ArrayView1::from(epoch));
    }

    log::info!(
        "Extracted epochs per finger: {:?} ({} trials discarded)",
        slots.iter().map(Vec::len).collect::<Vec<_>>(),
        n_discarded
    );

    Ok(FingerEpochs {
        window,
        slots,
        n_discarded,
    })
}

/// Mean ERP per finger as a `(5, pre + 1 + post)` matrix.
///
/// Fails with `InvalidFingerId` when any trial names a finger outside 1..=5,
/// and with `NoDataForFinger` when a finger ends up with no in-bounds trial.
pub fn compute_mean_erp(
    trials: &[Trial],
    signal: &[f64],
    window: WindowParameters,
) -> Result<Array2<f64>> {
    extract_finger_epochs(trials, signal, window)?.mean_erp()
}

/// Array front-end for [`compute_mean_erp`].
///
/// `trials` must have exactly three columns (start, peak, finger). `signal`
/// may carry any number of length-1 axes, so `(n,)`, `(n, 1)` and `(1, n)`
/// are all accepted.
pub fn compute_mean_erp_from_arrays(
    trials: ArrayView2<'_, i64>,
    signal: ArrayViewD<'_, f64>,
    window: WindowParameters,
) -> Result<Array2<f64>> {
    let trials = trials_from_array(trials)?;
    let signal = squeeze_signal(signal)?;
    compute_mean_erp(&trials, signal.as_slice().unwrap_or_default(), window)
}

/// Convert an `(n, 3)` integer table into trials.
pub fn trials_from_array(table: ArrayView2<'_, i64>) -> Result<Vec<Trial>> {
    if table.ncols() != 3 {
        return Err(ErpError::InvalidInputShape(format!(
            "trial table must have 3 columns (start, peak, finger), got shape {:?}",
            table.shape()
        )));
    }

    Ok(table
        .outer_iter()
        .map(|row| Trial::new(row[0], row[1], row[2]))
        .collect())
}

/// Drop every length-1 axis; exactly one axis may remain.
pub fn squeeze_signal(signal: ArrayViewD<'_, f64>) -> Result<Array1<f64>> {
    let non_unit_axes = signal.shape().iter().filter(|&&len| len != 1).count();
    if non_unit_axes > 1 {
        return Err(ErpError::InvalidInputShape(format!(
            "signal must be one-dimensional after squeezing, got shape {:?}",
            signal.shape()
        )));
    }

    Ok(signal.iter().copied().collect())
}
