use crate::error::{ErpError, Result};
use crate::types::{WindowParameters, N_FINGERS};
use ndarray::ArrayView2;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Line colour per finger, finger 1 first
pub const FINGER_COLORS: [RGBColor; N_FINGERS] = [
    RGBColor(255, 0, 0),
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(255, 165, 0),
    RGBColor(128, 0, 128),
];

pub const PLOT_TITLE: &str = "Mean ERP per Finger";

/// Renders an ERP matrix somewhere outside the computation
pub trait ErpPresenter {
    fn present(&self, erp: ArrayView2<'_, f64>, window: WindowParameters) -> Result<()>;
}

/// Writes the five finger waveforms to an SVG file
#[derive(Debug, Clone)]
pub struct SvgPlotPresenter {
    output: PathBuf,
    size: (u32, u32),
}

impl SvgPlotPresenter {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            size: (1000, 600),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> ErpError {
    ErpError::PlotError(e.to_string())
}

/// Finite min/max over the whole matrix, padded so flat rows stay visible.
fn amplitude_range(erp: ArrayView2<'_, f64>) -> (f64, f64) {
    let (lo, hi) = erp
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

const ONSET_DASHES: usize = 25;

/// Dash segments of the vertical line at t = 0, each followed by an equal gap.
fn onset_dashes(y_min: f64, y_max: f64) -> Vec<[(f64, f64); 2]> {
    let step = (y_max - y_min) / (2 * ONSET_DASHES - 1) as f64;
    (0..ONSET_DASHES)
        .map(|i| {
            let start = y_min + (2 * i) as f64 * step;
            [(0.0, start), (0.0, start + step)]
        })
        .collect()
}

impl ErpPresenter for SvgPlotPresenter {
    fn present(&self, erp: ArrayView2<'_, f64>, window: WindowParameters) -> Result<()> {
        if erp.dim() != window.expected_shape() {
            return Err(ErpError::InvalidInputShape(format!(
                "cannot plot ERP matrix of shape {:?}, expected {:?}",
                erp.dim(),
                window.expected_shape()
            )));
        }

        let time_axis = window.time_axis();
        let x_range = (-(window.pre_samples as f64))..(window.post_samples as f64).max(1.0);
        let (y_min, y_max) = amplitude_range(erp);

        let root = SVGBackend::new(&self.output, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(PLOT_TITLE, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("Time relative to movement onset (ms)")
            .y_desc("ECOG amplitude")
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.3))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(
                onset_dashes(y_min, y_max)
                    .into_iter()
                    .map(|dash| PathElement::new(dash.to_vec(), BLACK.mix(0.6))),
            )
            .map_err(plot_err)?;

        for (idx, row) in erp.outer_iter().enumerate() {
            let color = FINGER_COLORS[idx];
            let points: Vec<(f64, f64)> = time_axis
                .iter()
                .zip(row.iter())
                .filter(|(_, v)| v.is_finite())
                .map(|(&t, &v)| (t as f64, v))
                .collect();

            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(plot_err)?
                .label(format!("Finger{}", idx + 1))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        log::info!("ERP plot written to {}", self.output.display());
        Ok(())
    }
}
