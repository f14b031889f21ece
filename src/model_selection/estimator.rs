//! The estimator contract consumed by learning curves.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model_selection::error::ModelSelectionError;

/// A supervised model that can be refitted from scratch.
///
/// Learning curves clone the estimator for every fold and training size,
/// so `fit` may assume it starts from the configured, untrained state.
pub trait Estimator<B: Backend>: Clone {
    /// Train on `x` (samples x features) and targets `y`.
    fn fit(&mut self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<(), ModelSelectionError>;

    /// Predict one target per row of `x`.
    fn predict(&self, x: &Tensor2D<B>) -> Result<Tensor1D<B>, ModelSelectionError>;

    /// Fraction of predictions exactly equal to the targets.
    fn score(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<f64, ModelSelectionError> {
        let predicted = self.predict(x)?;
        accuracy(&predicted.to_vec(), &y.to_vec())
    }
}

/// Fraction of positions where `predicted` equals `expected`.
pub fn accuracy(predicted: &[f64], expected: &[f64]) -> Result<f64, ModelSelectionError> {
    if predicted.len() != expected.len() {
        return Err(ModelSelectionError::ShapeMismatch {
            expected: expected.len(),
            got: predicted.len(),
        });
    }
    if expected.is_empty() {
        return Err(ModelSelectionError::InvalidParameter(
            "accuracy of an empty prediction set is undefined".to_string(),
        ));
    }
    let hits = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    Ok(hits as f64 / expected.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    /// Predicts the label seen most often during fit.
    #[derive(Clone, Default)]
    struct MajorityClass {
        label: Option<f64>,
    }

    impl Estimator<CpuBackend> for MajorityClass {
        fn fit(
            &mut self,
            _x: &Tensor2D<CpuBackend>,
            y: &Tensor1D<CpuBackend>,
        ) -> Result<(), ModelSelectionError> {
            let labels = y.to_vec();
            let ones = labels.iter().filter(|&&l| l == 1.0).count();
            self.label = Some(if 2 * ones > labels.len() { 1.0 } else { 0.0 });
            Ok(())
        }

        fn predict(
            &self,
            x: &Tensor2D<CpuBackend>,
        ) -> Result<Tensor1D<CpuBackend>, ModelSelectionError> {
            let label = self
                .label
                .ok_or_else(|| ModelSelectionError::Estimator("not trained".to_string()))?;
            Ok(Tensor1D::new(vec![label; x.nrows()]))
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1.0, 0.0, 1.0, 1.0], &[1.0, 1.0, 1.0, 0.0]).unwrap(), 0.5);
        assert!(matches!(
            accuracy(&[1.0], &[1.0, 0.0]),
            Err(ModelSelectionError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        ));
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_default_score_is_accuracy() {
        let x = Tensor2D::<CpuBackend>::zeros(4, 1);
        let y = Tensor1D::<CpuBackend>::new(vec![1.0, 1.0, 1.0, 0.0]);

        let mut model = MajorityClass::default();
        assert!(model.score(&x, &y).is_err());

        model.fit(&x, &y).unwrap();
        assert_eq!(model.score(&x, &y).unwrap(), 0.75);
    }
}
