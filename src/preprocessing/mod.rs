//! Data preprocessing transformers.
//!
//! Transformers follow a type-state pattern: an unfitted [`Transformer`]
//! holds hyperparameters, and [`Transformer::fit`] returns a
//! [`FittedTransformer`] holding the learned state.
//!
//! # Design Philosophy
//!
//! - **Type Safety**: only fitted transformers can transform data
//! - **Backend Agnostic**: All transformers work with any `Backend` implementation
//! - **Serializable**: Fitted transformers can be saved and loaded
//!
//! # Available Transformers
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//!
//! ## Feature engineering
//! - [`FeaturePreparer`]: column expansion followed by standardization
//!
//! # Example
//!
//! ```ignore
//! use feature_prep::preprocessing::{FeaturePreparer, FittedFeaturePreparer, Power, Transformer, FittedTransformer};
//! use feature_prep::backend::CpuBackend;
//!
//! let preparer = FeaturePreparer::<CpuBackend>::with_powers([Power::Identity, Power::Exponent(2)]);
//! let fitted = preparer.fit(&training_data)?;
//! let prepared = fitted.transform(&training_data)?;
//!
//! fitted.save_to_file("preparer.bin")?;
//! let loaded = FittedFeaturePreparer::<CpuBackend>::load_from_file("preparer.bin")?;
//! let prepared_test = loaded.transform(&test_data)?;
//! ```

pub mod error;
pub mod feature_engineering;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use error::PreprocessingError;
pub use feature_engineering::{
    normalize_powers, ColumnProfile, FeaturePreparer, FeaturePreparerConfig,
    FeaturePreparerParams, FittedFeaturePreparer, Power,
};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
