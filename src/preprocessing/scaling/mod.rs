//! Scaling transformers for feature normalization.
//!
//! [`StandardScaler`] is the standardization stage of the feature preparer
//! and can also be used on its own.

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
