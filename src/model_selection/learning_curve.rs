//! Training and validation scores as a function of the training-set size.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model_selection::error::ModelSelectionError;
use crate::model_selection::estimator::Estimator;
use crate::model_selection::split::CvStrategy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Training-set sizes to evaluate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TrainSizes {
    /// Fractions in `(0, 1]` of the smallest training fold.
    Fractions(Vec<f64>),
    /// Row counts, each at most the smallest training fold.
    Absolute(Vec<usize>),
}

impl Default for TrainSizes {
    /// Ten evenly spaced fractions from 0.05 to 1.0.
    fn default() -> Self {
        TrainSizes::linspace(0.05, 1.0, 10)
    }
}

impl TrainSizes {
    /// `num` evenly spaced fractions from `start` to `stop` inclusive.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Self {
        let fractions = match num {
            0 => Vec::new(),
            1 => vec![stop],
            _ => {
                let step = (stop - start) / (num - 1) as f64;
                (0..num)
                    .map(|i| if i + 1 == num { stop } else { start + step * i as f64 })
                    .collect()
            }
        };
        TrainSizes::Fractions(fractions)
    }

    /// Resolves to ascending, distinct row counts given the smallest
    /// training fold size.
    pub fn resolve(&self, n_train: usize) -> Result<Vec<usize>, ModelSelectionError> {
        let mut sizes = match self {
            TrainSizes::Fractions(fractions) => fractions
                .iter()
                .map(|&f| {
                    if f > 0.0 && f <= 1.0 {
                        Ok(((f * n_train as f64).floor() as usize).max(1))
                    } else {
                        Err(ModelSelectionError::InvalidParameter(format!(
                            "train size fraction {} is outside (0, 1]",
                            f
                        )))
                    }
                })
                .collect::<Result<Vec<usize>, _>>()?,
            TrainSizes::Absolute(counts) => {
                if let Some(&bad) = counts.iter().find(|&&c| c == 0 || c > n_train) {
                    return Err(ModelSelectionError::InvalidParameter(format!(
                        "train size {} is outside [1, {}]",
                        bad, n_train
                    )));
                }
                counts.clone()
            }
        };

        sizes.sort_unstable();
        sizes.dedup();
        if sizes.is_empty() {
            return Err(ModelSelectionError::InvalidParameter(
                "no training sizes given".to_string(),
            ));
        }
        Ok(sizes)
    }
}

/// Scores of a learning curve; rows follow `train_sizes`, columns follow folds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningCurve {
    pub train_sizes: Vec<usize>,
    pub train_scores: Vec<Vec<f64>>,
    pub test_scores: Vec<Vec<f64>>,
}

/// Trains a fresh clone of `estimator` on growing prefixes of every training
/// fold and scores it on that prefix and on the fold's test rows.
pub fn learning_curve<B, E>(
    estimator: &E,
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    cv: &CvStrategy,
    train_sizes: &TrainSizes,
) -> Result<LearningCurve, ModelSelectionError>
where
    B: Backend,
    E: Estimator<B>,
{
    let n_samples = x.nrows();
    if y.len() != n_samples {
        return Err(ModelSelectionError::ShapeMismatch {
            expected: n_samples,
            got: y.len(),
        });
    }

    let splits = cv.splits(n_samples)?;
    let smallest_train = splits
        .iter()
        .map(|(train, _)| train.len())
        .min()
        .unwrap_or(0);
    let sizes = train_sizes.resolve(smallest_train)?;

    debug!(
        n_samples,
        n_folds = splits.len(),
        sizes = ?sizes,
        "computing learning curve"
    );

    let mut train_scores = vec![Vec::with_capacity(splits.len()); sizes.len()];
    let mut test_scores = vec![Vec::with_capacity(splits.len()); sizes.len()];

    for (fold, (train, test)) in splits.iter().enumerate() {
        let x_test = x.select_rows(test);
        let y_test = y.select(test);

        for (row, &size) in sizes.iter().enumerate() {
            let subset = &train[..size];
            let x_train = x.select_rows(subset);
            let y_train = y.select(subset);

            let mut model = estimator.clone();
            model.fit(&x_train, &y_train)?;
            let train_score = model.score(&x_train, &y_train)?;
            let test_score = model.score(&x_test, &y_test)?;

            debug!(fold, size, train_score, test_score, "scored learning curve point");
            train_scores[row].push(train_score);
            test_scores[row].push(test_score);
        }
    }

    Ok(LearningCurve {
        train_sizes: sizes,
        train_scores,
        test_scores,
    })
}
