//! Learning-curve charts.
//!
//! [`create_learning_curves_plot`] turns per-fold score matrices into a
//! [`LearningCurvesPlot`]: mean curves for training and validation scores,
//! each inside a shaded band of one standard deviation. The chart is a plain
//! data structure that renders itself to SVG or JSON.
//!
//! # Example
//! ```
//! use feature_prep::visualization::create_learning_curves_plot;
//!
//! let plot = create_learning_curves_plot(
//!     &[10, 20, 40],
//!     &[vec![1.0, 0.9], vec![0.95, 0.95], vec![0.9, 0.92]],
//!     &[vec![0.6, 0.7], vec![0.8, 0.78], vec![0.85, 0.87]],
//!     "nearest centroid",
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(plot.title, "nearest centroid (accuracy=0.860)");
//! assert!(plot.to_svg().starts_with("<svg"));
//! ```

pub mod error;
mod svg;

pub use error::PlotError;

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model_selection::{learning_curve, CvStrategy, Estimator, LearningCurve, TrainSizes};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Y-axis limits used by [`create_learning_curves_plot`] when none are given.
pub const DEFAULT_YLIM: (f64, f64) = (0.55, 1.005);

pub const TRAINING_COLOR: &str = "red";
pub const VALIDATION_COLOR: &str = "green";

/// Shaded area between `lower` and `upper` over `x`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Band {
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub color: String,
    pub alpha: f64,
}

/// Solid line through `(x, y)` with a legend label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: String,
    pub label: String,
}

/// Where the legend goes; `Best` picks the corner covering the fewest points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLocation {
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// A rendered-on-demand learning-curve chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LearningCurvesPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub ylim: (f64, f64),
    pub grid: bool,
    pub legend: LegendLocation,
    pub bands: Vec<Band>,
    pub curves: Vec<Curve>,
}

impl LearningCurvesPlot {
    /// Self-contained SVG document.
    pub fn to_svg(&self) -> String {
        svg::render(self)
    }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<(), PlotError> {
        std::fs::write(path, self.to_svg())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PlotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Per-row mean and population standard deviation.
fn row_stats(scores: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    scores
        .iter()
        .map(|row| {
            let n = row.len() as f64;
            let mean = row.iter().sum::<f64>() / n;
            let var = row.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
            (mean, var.sqrt())
        })
        .unzip()
}

fn check_scores(name: &str, scores: &[Vec<f64>], n_sizes: usize) -> Result<(), PlotError> {
    if scores.len() != n_sizes {
        return Err(PlotError::InvalidData(format!(
            "{} has {} rows for {} training sizes",
            name,
            scores.len(),
            n_sizes
        )));
    }
    if scores.iter().any(|row| row.is_empty()) {
        return Err(PlotError::InvalidData(format!("{} has an empty row", name)));
    }
    Ok(())
}

/// Builds the chart from score matrices of shape `n_sizes x n_folds`.
///
/// The title is suffixed with the mean validation score at the largest
/// training size. `ylim` defaults to [`DEFAULT_YLIM`].
pub fn create_learning_curves_plot(
    train_sizes: &[usize],
    train_scores: &[Vec<f64>],
    test_scores: &[Vec<f64>],
    title: &str,
    ylim: Option<(f64, f64)>,
) -> Result<LearningCurvesPlot, PlotError> {
    if train_sizes.is_empty() {
        return Err(PlotError::InvalidData("no training sizes".to_string()));
    }
    check_scores("train_scores", train_scores, train_sizes.len())?;
    check_scores("test_scores", test_scores, train_sizes.len())?;

    let ylim = ylim.unwrap_or(DEFAULT_YLIM);
    if ylim.0.is_nan() || ylim.1.is_nan() || ylim.0 >= ylim.1 {
        return Err(PlotError::InvalidData(format!(
            "y limits {:?} are not increasing",
            ylim
        )));
    }

    let x: Vec<f64> = train_sizes.iter().map(|&s| s as f64).collect();
    let (train_mean, train_std) = row_stats(train_scores);
    let (test_mean, test_std) = row_stats(test_scores);
    let accuracy = test_mean.last().copied().unwrap_or(f64::NAN);

    let band = |mean: &[f64], std: &[f64], color: &str| Band {
        x: x.clone(),
        lower: mean.iter().zip(std).map(|(m, s)| m - s).collect(),
        upper: mean.iter().zip(std).map(|(m, s)| m + s).collect(),
        color: color.to_string(),
        alpha: 0.1,
    };
    let curve = |mean: Vec<f64>, color: &str, label: &str| Curve {
        x: x.clone(),
        y: mean,
        color: color.to_string(),
        label: label.to_string(),
    };

    Ok(LearningCurvesPlot {
        title: format!("{} (accuracy={:.3})", title, accuracy),
        x_label: "number of tr. examples".to_string(),
        y_label: "score".to_string(),
        ylim,
        grid: true,
        legend: LegendLocation::Best,
        bands: vec![
            band(&train_mean, &train_std, TRAINING_COLOR),
            band(&test_mean, &test_std, VALIDATION_COLOR),
        ],
        curves: vec![
            curve(train_mean, TRAINING_COLOR, "Training score"),
            curve(test_mean, VALIDATION_COLOR, "Cv score"),
        ],
    })
}

impl LearningCurve {
    /// Chart of this curve; see [`create_learning_curves_plot`].
    pub fn plot(&self, title: &str, ylim: Option<(f64, f64)>) -> Result<LearningCurvesPlot, PlotError> {
        create_learning_curves_plot(
            &self.train_sizes,
            &self.train_scores,
            &self.test_scores,
            title,
            ylim,
        )
    }
}

/// Settings for [`plot_learning_curves`].
///
/// Defaults: `ylim = (0.6, 1.0)`, 3-fold cross-validation, ten training sizes
/// from 5% to 100% of the smallest training fold.
#[derive(Clone, Debug, PartialEq)]
pub struct LearningCurveOptions {
    pub ylim: (f64, f64),
    pub cv: CvStrategy,
    pub train_sizes: TrainSizes,
}

impl Default for LearningCurveOptions {
    fn default() -> Self {
        Self {
            ylim: (0.6, 1.0),
            cv: CvStrategy::default(),
            train_sizes: TrainSizes::default(),
        }
    }
}

impl LearningCurveOptions {
    pub fn with_ylim(mut self, ylim: (f64, f64)) -> Self {
        self.ylim = ylim;
        self
    }

    pub fn with_cv<C: Into<CvStrategy>>(mut self, cv: C) -> Self {
        self.cv = cv.into();
        self
    }

    pub fn with_train_sizes(mut self, train_sizes: TrainSizes) -> Self {
        self.train_sizes = train_sizes;
        self
    }
}

/// Computes a learning curve for `estimator` and charts it.
pub fn plot_learning_curves<B, E>(
    estimator: &E,
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    title: &str,
    options: &LearningCurveOptions,
) -> Result<LearningCurvesPlot, PlotError>
where
    B: Backend,
    E: Estimator<B>,
{
    let curve = learning_curve(estimator, x, y, &options.cv, &options.train_sizes)?;
    debug!(title, sizes = ?curve.train_sizes, "plotting learning curves");
    curve.plot(title, Some(options.ylim))
}
