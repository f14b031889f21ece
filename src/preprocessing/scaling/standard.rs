//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the population
//! standard deviation (ddof = 0). Columns with zero standard deviation are
//! scaled by `1.0`, so a constant column becomes all zeros.
//!
//! # Example
//! ```ignore
//! use feature_prep::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//! use feature_prep::backend::CpuBackend;
//!
//! let scaler = StandardScaler::<CpuBackend>::new()
//!     .with_mean(true)
//!     .with_std(true);
//!
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::warn;

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if `with_mean` is false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature, zero replaced by one (ones if `with_std` is false).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler<B: Backend> {
    config: StandardScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::from_config(StandardScalerConfig::default())
    }

    pub fn from_config(config: StandardScalerConfig) -> Self {
        Self {
            config,
            _backend: PhantomData,
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }
}

impl<B: Backend> Transformer<B> for StandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = if self.config.with_mean {
            data.col_mean()
        } else {
            Tensor1D::zeros(cols)
        };

        let std = if self.config.with_std {
            let std_vec = data.col_std(0).to_vec();
            let constant: Vec<usize> = std_vec
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == 0.0)
                .map(|(idx, _)| idx)
                .collect();
            if !constant.is_empty() {
                warn!(
                    columns = ?constant,
                    "constant columns have zero standard deviation; scaling them by 1"
                );
            }
            Tensor1D::new(
                std_vec
                    .into_iter()
                    .map(|s| if s == 0.0 { 1.0 } else { s })
                    .collect(),
            )
        } else {
            Tensor1D::new(vec![1.0; cols])
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler<B: Backend> {
    config: StandardScalerConfig,
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedStandardScaler<B> {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Tensor1D<B> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Tensor1D<B> {
        &self.std
    }

    fn check_features(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl<B: Backend> FittedTransformer<B> for FittedStandardScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_features(data.ncols())?;

        let mut result = data.clone();
        if self.config.with_mean {
            result = result.sub_row(&self.mean);
        }
        if self.config.with_std {
            result = result.div_row(&self.std);
        }
        Ok(result)
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_features(data.ncols())?;

        let mut result = data.clone();
        if self.config.with_std {
            result = result.mul_row(&self.std);
        }
        if self.config.with_mean {
            result = result.add_row(&self.mean);
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PreprocessingError::InvalidParameter(format!(
                "StandardScaler params hold {} means and {} stds for {} features",
                params.mean.len(),
                params.std.len(),
                params.n_features
            )));
        }

        Ok(Self {
            config: params.config,
            mean: Tensor1D::new(params.mean),
            std: Tensor1D::new(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn create_test_data() -> Tensor2D<CpuBackend> {
        // [[0, 1], [0, 1], [1, 3]]
        Tensor2D::new(vec![0.0, 1.0, 0.0, 1.0, 1.0, 3.0], 3, 2)
    }

    #[test]
    fn test_standard_scaler_fit() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        // Mean: [1/3, 5/3]
        let mean = fitted.mean().to_vec();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();
        let transformed = fitted.transform(&data).unwrap();

        let mean_vals = transformed.col_mean().to_vec();
        let std_vals = transformed.col_std(0).to_vec();

        for c in 0..2 {
            assert!(mean_vals[c].abs() < 1e-10, "mean[{}] = {}", c, mean_vals[c]);
            assert!((std_vals[c] - 1.0).abs() < 1e-10, "std[{}] = {}", c, std_vals[c]);
        }
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let transformed = fitted.transform(&data).unwrap();
        let recovered = fitted.inverse_transform(&transformed).unwrap();

        for (o, r) in data.ravel().iter().zip(recovered.ravel().iter()) {
            assert!((o - r).abs() < 1e-10);
        }
    }

    #[test]
    fn test_standard_scaler_without_mean_or_std() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new()
            .with_mean(false)
            .with_std(false)
            .fit(&data)
            .unwrap();

        assert!(fitted.mean().to_vec().iter().all(|&m| m == 0.0));
        assert!(fitted.std().to_vec().iter().all(|&s| s == 1.0));
        assert_eq!(fitted.transform(&data).unwrap().ravel(), data.ravel());
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let wrong_data = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 1, 3);
        assert!(matches!(
            fitted.transform(&wrong_data),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
        assert!(matches!(
            fitted.inverse_transform(&wrong_data),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 2);
        let result = StandardScaler::<CpuBackend>::new().fit(&data);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_standard_scaler_constant_feature() {
        // Column 0 is constant
        let data = Tensor2D::<CpuBackend>::new(vec![5.0, 1.0, 5.0, 2.0, 5.0, 3.0], 3, 2);
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let std = fitted.std().to_vec();
        assert_eq!(std[0], 1.0);
        assert!((fitted.mean().to_vec()[0] - 5.0).abs() < 1e-12);

        let transformed = fitted.transform(&data).unwrap();
        let constant = transformed.column(0);
        assert!(constant.iter().all(|&v| v == 0.0));
        assert!(transformed.ravel().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_standard_scaler_params_roundtrip() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let restored =
            FittedStandardScaler::<CpuBackend>::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.n_features_in(), 2);
        assert_eq!(
            fitted.transform(&data).unwrap().ravel(),
            restored.transform(&data).unwrap().ravel()
        );
    }

    #[test]
    fn test_standard_scaler_from_inconsistent_params() {
        let params = StandardScalerParams {
            config: StandardScalerConfig::default(),
            mean: vec![0.0],
            std: vec![1.0, 1.0],
            n_features: 2,
        };
        assert!(FittedStandardScaler::<CpuBackend>::from_params(params).is_err());
    }

    #[test]
    fn test_standard_scaler_save_load_file() {
        let data = create_test_data();
        let fitted = StandardScaler::<CpuBackend>::new().fit(&data).unwrap();

        let temp_file = std::env::temp_dir().join("feature_prep_test_standard.bin");
        fitted.save_to_file(&temp_file).unwrap();
        let loaded = FittedStandardScaler::<CpuBackend>::load_from_file(&temp_file).unwrap();

        assert_eq!(loaded.n_features_in(), fitted.n_features_in());
        assert_eq!(
            fitted.transform(&data).unwrap().ravel(),
            loaded.transform(&data).unwrap().ravel()
        );

        std::fs::remove_file(temp_file).ok();
    }
}
