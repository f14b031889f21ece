//! Feature engineering transformers.
//!
//! This module provides [`FeaturePreparer`], which derives new columns from
//! existing data (powers, pairwise products, log, exp) and standardizes them.

mod powers;
mod preparer;

pub use powers::{normalize_powers, FeaturePreparerConfig, Power};
pub use preparer::{ColumnProfile, FeaturePreparer, FeaturePreparerParams, FittedFeaturePreparer};
