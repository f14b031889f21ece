//! Learning curves of a nearest-centroid classifier
//!
//! Trains a nearest-centroid classifier on prepared features over growing
//! training sets with 3-fold cross-validation, then writes the learning-curve
//! chart as SVG and JSON.
//!
//! Run with: cargo run --example learning_curves

use feature_prep::{
    backend::CpuBackend,
    model_selection::{Estimator, ModelSelectionError},
    preprocessing::{FeaturePreparer, FittedFeaturePreparer, FittedTransformer, Power, Transformer},
    visualization::{plot_learning_curves, LearningCurveOptions},
    Tensor1D, Tensor2D,
};
use std::error::Error;

/// Nearest-centroid classifier over features expanded by a `FeaturePreparer`.
#[derive(Clone)]
struct CentroidClassifier {
    preparer: FeaturePreparer<CpuBackend>,
    state: Option<TrainedCentroids>,
}

#[derive(Clone)]
struct TrainedCentroids {
    preparer: FittedFeaturePreparer<CpuBackend>,
    classes: Vec<f64>,
    centroids: Vec<Vec<f64>>,
}

impl CentroidClassifier {
    fn new(powers: Vec<Power>) -> Self {
        Self {
            preparer: FeaturePreparer::with_powers(powers),
            state: None,
        }
    }
}

impl Estimator<CpuBackend> for CentroidClassifier {
    fn fit(
        &mut self,
        x: &Tensor2D<CpuBackend>,
        y: &Tensor1D<CpuBackend>,
    ) -> Result<(), ModelSelectionError> {
        let preparer = self.preparer.fit(x)?;
        let prepared = preparer.transform(x)?;
        let (rows, cols) = prepared.shape();
        let values = prepared.ravel();
        let labels = y.to_vec();

        let mut classes = labels.clone();
        classes.sort_by(f64::total_cmp);
        classes.dedup();

        let centroids = classes
            .iter()
            .map(|&class| {
                let members: Vec<usize> = (0..rows).filter(|&r| labels[r] == class).collect();
                (0..cols)
                    .map(|c| {
                        members.iter().map(|&r| values[r * cols + c]).sum::<f64>()
                            / members.len() as f64
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();

        self.state = Some(TrainedCentroids {
            preparer,
            classes,
            centroids,
        });
        Ok(())
    }

    fn predict(&self, x: &Tensor2D<CpuBackend>) -> Result<Tensor1D<CpuBackend>, ModelSelectionError> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| ModelSelectionError::Estimator("predict called before fit".to_string()))?;
        let prepared = state.preparer.transform(x)?;
        let (rows, cols) = prepared.shape();
        let values = prepared.ravel();

        let distance = |row: &[f64], centroid: &[f64]| -> f64 {
            row.iter().zip(centroid).map(|(a, b)| (a - b).powi(2)).sum()
        };

        let predictions = (0..rows)
            .map(|r| {
                let row = &values[r * cols..(r + 1) * cols];
                state
                    .centroids
                    .iter()
                    .zip(&state.classes)
                    .min_by(|a, b| distance(row, a.0).total_cmp(&distance(row, b.0)))
                    .map(|(_, &class)| class)
                    .unwrap_or(f64::NAN)
            })
            .collect();
        Ok(Tensor1D::new(predictions))
    }
}

/// Two noisy rings: the class depends on the distance from the origin, which
/// squared features make linearly visible.
fn ring_data(n: usize) -> (Tensor2D<CpuBackend>, Tensor1D<CpuBackend>) {
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let angle = i as f64 * 2.399963;
        let outer = i % 2 == 1;
        let jitter = ((i * 37) % 17) as f64 / 17.0 * 0.4;
        let radius = if outer { 2.0 + jitter } else { 0.6 + jitter };
        rows.push(vec![radius * angle.cos(), radius * angle.sin()]);
        labels.push(if outer { 1.0 } else { 0.0 });
    }
    (Tensor2D::from_rows(&rows), Tensor1D::new(labels))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feature_prep=info".into()),
        )
        .init();

    let (x, y) = ring_data(150);
    let options = LearningCurveOptions::default().with_ylim((0.3, 1.05));

    for (label, powers) in [
        ("raw", vec![Power::Identity]),
        ("squared", vec![Power::Identity, Power::Exponent(2)]),
    ] {
        let estimator = CentroidClassifier::new(powers);
        let plot = plot_learning_curves(&estimator, &x, &y, label, &options)?;
        println!("{}", plot.title);

        let svg_path = std::env::temp_dir().join(format!("learning_curves_{}.svg", label));
        plot.save_svg(&svg_path)?;
        let json_path = std::env::temp_dir().join(format!("learning_curves_{}.json", label));
        std::fs::write(&json_path, plot.to_json()?)?;
        println!("  chart: {}\n  data:  {}", svg_path.display(), json_path.display());
    }

    Ok(())
}
