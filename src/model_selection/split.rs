//! Cross-validation splitters.

use crate::model_selection::error::ModelSelectionError;
use serde::{Deserialize, Serialize};

/// A `(train, test)` pair of row indices.
pub type Split = (Vec<usize>, Vec<usize>);

/// K-fold splitter without shuffling.
///
/// Fold `k` is a contiguous block of rows; the first `n_samples % n_splits`
/// folds hold one extra row. The training part of each split is every other
/// row, in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KFold {
    pub n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    pub fn split(&self, n_samples: usize) -> Result<Vec<Split>, ModelSelectionError> {
        if self.n_splits < 2 {
            return Err(ModelSelectionError::InvalidParameter(format!(
                "KFold needs at least 2 splits, got {}",
                self.n_splits
            )));
        }
        if self.n_splits > n_samples {
            return Err(ModelSelectionError::InvalidParameter(format!(
                "cannot split {} samples into {} folds",
                n_samples, self.n_splits
            )));
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let stop = start + size;
            let test: Vec<usize> = (start..stop).collect();
            let train: Vec<usize> = (0..start).chain(stop..n_samples).collect();
            splits.push((train, test));
            start = stop;
        }
        Ok(splits)
    }
}

/// How a learning curve partitions the samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CvStrategy {
    KFold(KFold),
    /// Precomputed `(train, test)` index pairs.
    Splits(Vec<Split>),
}

impl Default for CvStrategy {
    fn default() -> Self {
        CvStrategy::KFold(KFold::new(3))
    }
}

impl From<usize> for CvStrategy {
    fn from(n_splits: usize) -> Self {
        CvStrategy::KFold(KFold::new(n_splits))
    }
}

impl From<KFold> for CvStrategy {
    fn from(kfold: KFold) -> Self {
        CvStrategy::KFold(kfold)
    }
}

impl CvStrategy {
    /// Resolves the strategy into validated splits over `n_samples` rows.
    pub fn splits(&self, n_samples: usize) -> Result<Vec<Split>, ModelSelectionError> {
        match self {
            CvStrategy::KFold(kfold) => kfold.split(n_samples),
            CvStrategy::Splits(splits) => {
                if splits.is_empty() {
                    return Err(ModelSelectionError::InvalidParameter(
                        "no cross-validation splits given".to_string(),
                    ));
                }
                for (i, (train, test)) in splits.iter().enumerate() {
                    if train.is_empty() || test.is_empty() {
                        return Err(ModelSelectionError::InvalidParameter(format!(
                            "split {} has an empty train or test part",
                            i
                        )));
                    }
                    if let Some(&idx) = train.iter().chain(test).find(|&&idx| idx >= n_samples) {
                        return Err(ModelSelectionError::InvalidParameter(format!(
                            "split {} references row {} of {}",
                            i, idx, n_samples
                        )));
                    }
                }
                Ok(splits.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kfold_even() {
        let splits = KFold::new(3).split(6).unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0], (vec![2, 3, 4, 5], vec![0, 1]));
        assert_eq!(splits[1], (vec![0, 1, 4, 5], vec![2, 3]));
        assert_eq!(splits[2], (vec![0, 1, 2, 3], vec![4, 5]));
    }

    #[test]
    fn test_kfold_uneven_front_loads_extra_rows() {
        let splits = KFold::new(3).split(8).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2]);
        assert_eq!(splits[2].1, vec![6, 7]);

        // every row is tested exactly once
        let mut tested: Vec<usize> = splits.iter().flat_map(|(_, t)| t.clone()).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_kfold_invalid() {
        assert!(KFold::new(1).split(10).is_err());
        assert!(KFold::new(5).split(4).is_err());
    }

    #[test]
    fn test_cv_strategy() {
        assert_eq!(CvStrategy::from(4), CvStrategy::KFold(KFold::new(4)));
        assert_eq!(CvStrategy::default(), CvStrategy::KFold(KFold::new(3)));

        let explicit = CvStrategy::Splits(vec![(vec![0, 1], vec![2])]);
        assert_eq!(explicit.splits(3).unwrap().len(), 1);
        assert!(explicit.splits(2).is_err());
        assert!(CvStrategy::Splits(vec![(vec![], vec![0])]).splits(3).is_err());
        assert!(CvStrategy::Splits(Vec::new()).splits(3).is_err());
    }
}
