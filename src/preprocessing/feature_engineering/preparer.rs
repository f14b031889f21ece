//! Feature expansion followed by standardization.
//!
//! [`FeaturePreparer`] derives new columns from a feature matrix (integer
//! powers, pairwise products, logarithms, exponentials) and standardizes the
//! expanded matrix with a [`StandardScaler`].
//!
//! Fitting learns three things, all immutable afterwards:
//! - the non-boolean column mask: a column is non-boolean when it has more
//!   than two distinct values in the fitting data. Only non-boolean columns
//!   are raised to powers, logged or exponentiated;
//! - the population standard deviation of every non-boolean raw column, used
//!   to scale the input of the exp branch;
//! - the mean and standard deviation of every expanded column.
//!
//! # Column order
//!
//! Expanded columns are emitted as: original columns (if `1` is configured),
//! each integer exponent in configuration order applied to the non-boolean
//! columns, pairwise products `x[i] * x[j]` for `i` ascending and `j <= i`
//! over all columns, `ln(x + 1)` of the non-boolean columns, then
//! `exp(x / std)` of the non-boolean columns.
//!
//! # Zero standard deviations
//!
//! A zero standard deviation is replaced by `1.0`, both for the exp branch
//! and for the standardization stage. A column that is constant after
//! expansion therefore transforms to all zeros.
//!
//! An expansion that produces a non-finite value (`0^-1`, an overflowing
//! power or exponential) fails with [`PreprocessingError::NumericalError`].
//!
//! # Example
//! ```
//! use feature_prep::backend::{CpuBackend, Tensor2D};
//! use feature_prep::preprocessing::{FeaturePreparer, FittedTransformer, Power, Transformer};
//!
//! let x = Tensor2D::<CpuBackend>::from_rows(&[
//!     vec![0.0, 1.0],
//!     vec![1.0, 2.0],
//!     vec![0.0, 3.0],
//!     vec![1.0, 4.0],
//! ]);
//!
//! let preparer = FeaturePreparer::<CpuBackend>::with_powers([Power::Identity, Power::Exponent(2)]);
//! let fitted = preparer.fit(&x).unwrap();
//!
//! assert_eq!(fitted.non_boolean_mask(), &[false, true]);
//! assert_eq!(fitted.n_features_out(), 3);
//! assert_eq!(fitted.transform(&x).unwrap().shape(), (4, 3));
//! ```

use super::powers::{expansion_plan, normalize_powers, FeaturePreparerConfig, Power};
use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-column facts learned from the raw fitting data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// `true` for columns with more than two distinct values.
    pub non_boolean_mask: Vec<bool>,
    /// Population std of each non-boolean column, zero replaced by one.
    pub original_std: Vec<f64>,
}

impl ColumnProfile {
    fn learn<B: Backend>(data: &Tensor2D<B>) -> Self {
        let (rows, cols) = data.shape();
        let values = data.ravel();

        let non_boolean_mask = (0..cols)
            .map(|c| {
                let column: Vec<f64> = (0..rows).map(|r| values[r * cols + c]).collect();
                count_distinct(column) > 2
            })
            .collect::<Vec<bool>>();

        let mut profile = Self {
            non_boolean_mask,
            original_std: Vec::new(),
        };
        profile.original_std = data
            .select_columns(&profile.non_boolean_indices())
            .col_std(0)
            .to_vec()
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        profile
    }

    /// Indices of the non-boolean columns, ascending.
    pub fn non_boolean_indices(&self) -> Vec<usize> {
        self.non_boolean_mask
            .iter()
            .enumerate()
            .filter(|&(_, &non_boolean)| non_boolean)
            .map(|(idx, _)| idx)
            .collect()
    }
}

fn count_distinct(mut column: Vec<f64>) -> usize {
    column.sort_by(f64::total_cmp);
    column.dedup_by(|a, b| a == b);
    column.len()
}

/// Number of expanded columns for a plan, given input and non-boolean widths.
fn output_width(plan: &[Power], n_features: usize, n_non_boolean: usize) -> usize {
    plan.iter()
        .map(|step| match step {
            Power::Identity => n_features,
            Power::PairwiseProduct => n_features * (n_features + 1) / 2,
            Power::Exponent(_) | Power::Log | Power::Exp => n_non_boolean,
        })
        .sum()
}

/// Runs every step of `plan` on `data` and concatenates the pieces.
///
/// `profile` is `None` before fit; steps that need it fail with
/// [`PreprocessingError::NotFitted`].
fn expand_with<B: Backend>(
    plan: &[Power],
    data: &Tensor2D<B>,
    profile: Option<&ColumnProfile>,
) -> Result<Tensor2D<B>, PreprocessingError> {
    let cols = data.ncols();

    let mut pieces = Vec::with_capacity(plan.len());
    for step in plan {
        let piece = match step {
            Power::Identity => data.clone(),
            Power::PairwiseProduct => {
                let (left, right): (Vec<usize>, Vec<usize>) =
                    (0..cols).flat_map(|i| (0..=i).map(move |j| (i, j))).unzip();
                data.select_columns(&left).mul(&data.select_columns(&right))
            }
            Power::Exponent(p) => {
                let columns = require_profile(profile, step)?.non_boolean_indices();
                let x = data.select_columns(&columns).powi(*p);
                check_finite(&x, &columns, "power")?;
                x
            }
            Power::Log => {
                let columns = require_profile(profile, step)?.non_boolean_indices();
                let x = data.select_columns(&columns);
                check_log_domain(&x, &columns)?;
                x.ln_1p()
            }
            Power::Exp => {
                let profile = require_profile(profile, step)?;
                let columns = profile.non_boolean_indices();
                let std = Tensor1D::new(profile.original_std.clone());
                let x = data.select_columns(&columns).div_row(&std).exp();
                check_finite(&x, &columns, "exp")?;
                x
            }
        };
        pieces.push(piece);
    }

    if pieces.len() == 1 {
        Ok(pieces.remove(0))
    } else {
        Tensor2D::hcat(&pieces)
    }
}

fn require_profile<'a>(
    profile: Option<&'a ColumnProfile>,
    step: &Power,
) -> Result<&'a ColumnProfile, PreprocessingError> {
    profile.ok_or_else(|| not_fitted(step))
}

fn not_fitted(step: &Power) -> PreprocessingError {
    PreprocessingError::NotFitted(format!(
        "`{}` expansion needs the non-boolean column mask learned by fit",
        step
    ))
}

/// `ln(x + 1)` is only defined for `x > -1`.
fn check_log_domain<B: Backend>(
    x: &Tensor2D<B>,
    original_columns: &[usize],
) -> Result<(), PreprocessingError> {
    let width = x.ncols();
    if let Some((idx, v)) = x
        .ravel()
        .into_iter()
        .enumerate()
        .find(|&(_, v)| v <= -1.0)
    {
        return Err(PreprocessingError::NumericalError(format!(
            "log expansion needs values > -1, column {} holds {}",
            original_columns[idx % width],
            v
        )));
    }
    Ok(())
}

/// Rejects NaN input in both the fitting and the transform phase.
fn check_missing<B: Backend>(data: &Tensor2D<B>) -> Result<(), PreprocessingError> {
    let cols = data.ncols();
    if let Some(idx) = data.ravel().iter().position(|v| v.is_nan()) {
        return Err(PreprocessingError::MissingValues(format!(
            "column {} contains NaN",
            idx % cols
        )));
    }
    Ok(())
}

fn check_finite<B: Backend>(
    x: &Tensor2D<B>,
    original_columns: &[usize],
    what: &str,
) -> Result<(), PreprocessingError> {
    let width = x.ncols();
    if let Some(idx) = x.ravel().iter().position(|v| !v.is_finite()) {
        return Err(PreprocessingError::NumericalError(format!(
            "{} expansion of column {} is not finite",
            what,
            original_columns[idx % width]
        )));
    }
    Ok(())
}

/// Column expander and standardizer (unfitted).
///
/// See the [module documentation](self) for the expansion rules.
#[derive(Clone, Debug)]
pub struct FeaturePreparer<B: Backend> {
    powers: Vec<Power>,
    scaler: StandardScaler<B>,
}

impl<B: Backend> Default for FeaturePreparer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> FeaturePreparer<B> {
    /// Identity-only preparer: keeps the columns and standardizes them.
    pub fn new() -> Self {
        Self::with_powers(Vec::new())
    }

    /// Creates a preparer from a powers list; an empty list means identity only.
    pub fn with_powers<I>(powers: I) -> Self
    where
        I: IntoIterator<Item = Power>,
    {
        Self {
            powers: normalize_powers(powers),
            scaler: StandardScaler::new(),
        }
    }

    pub fn from_config(config: FeaturePreparerConfig) -> Self {
        Self::with_powers(config.powers)
    }

    pub fn powers(&self) -> &[Power] {
        &self.powers
    }

    /// Expands `data` without learned state.
    ///
    /// Works for configurations made only of the identity and pairwise
    /// products; any token needing the non-boolean mask fails with
    /// [`PreprocessingError::NotFitted`].
    pub fn expand(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        if let Some(step) = self.powers.iter().find(|p| p.needs_fit()) {
            return Err(not_fitted(step));
        }
        expand_with(&expansion_plan(&self.powers), data, None)
    }

    /// Fits and also returns the expanded fitting matrix.
    fn fit_expanded(
        &self,
        data: &Tensor2D<B>,
    ) -> Result<(FittedFeaturePreparer<B>, Tensor2D<B>), PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit FeaturePreparer on empty data".to_string(),
            ));
        }
        if cols == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit FeaturePreparer on data with no features".to_string(),
            ));
        }
        check_missing(data)?;

        let profile = ColumnProfile::learn(data);
        let plan = expansion_plan(&self.powers);
        let expanded = expand_with(&plan, data, Some(&profile))?;

        if expanded.ncols() == 0 {
            return Err(PreprocessingError::EmptyData(format!(
                "powers {:?} produce no columns: the data has no non-boolean columns",
                self.powers
            )));
        }

        let scaler = self.scaler.fit(&expanded)?;

        debug!(
            n_features_in = cols,
            n_non_boolean = profile.original_std.len(),
            n_features_out = expanded.ncols(),
            "fitted feature preparer"
        );

        let fitted = FittedFeaturePreparer {
            powers: self.powers.clone(),
            profile,
            scaler,
            n_features_in: cols,
        };
        Ok((fitted, expanded))
    }
}

impl<B: Backend> Transformer<B> for FeaturePreparer<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = FeaturePreparerParams;
    type Fitted = FittedFeaturePreparer<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        self.fit_expanded(data).map(|(fitted, _)| fitted)
    }

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (fitted, expanded) = self.fit_expanded(data)?;
        fitted.scaler.transform(&expanded)
    }
}

/// Serializable parameters for a fitted FeaturePreparer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeaturePreparerParams {
    pub powers: Vec<Power>,
    pub profile: ColumnProfile,
    pub scaler: StandardScalerParams,
    pub n_features_in: usize,
}

/// Fitted FeaturePreparer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedFeaturePreparer<B: Backend> {
    powers: Vec<Power>,
    profile: ColumnProfile,
    scaler: FittedStandardScaler<B>,
    n_features_in: usize,
}

impl<B: Backend> FittedFeaturePreparer<B> {
    pub fn powers(&self) -> &[Power] {
        &self.powers
    }

    /// One entry per input column, `true` for non-boolean columns.
    pub fn non_boolean_mask(&self) -> &[bool] {
        &self.profile.non_boolean_mask
    }

    /// Raw std of each non-boolean column, used by the exp branch.
    pub fn original_std(&self) -> &[f64] {
        &self.profile.original_std
    }

    /// The standardization stage fitted on the expanded matrix.
    pub fn scaler(&self) -> &FittedStandardScaler<B> {
        &self.scaler
    }

    pub fn n_features_out(&self) -> usize {
        self.scaler.n_features_in()
    }

    fn check_features(&self, cols: usize) -> Result<(), PreprocessingError> {
        if cols != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }
        Ok(())
    }

    /// Expands `data` with the learned column profile, without standardizing.
    pub fn expand(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        self.check_features(data.ncols())?;
        check_missing(data)?;
        expand_with(&expansion_plan(&self.powers), data, Some(&self.profile))
    }

    /// Names of the expanded columns, aligned with [`FittedTransformer::transform`] output.
    ///
    /// | Expansion | Name |
    /// |-----------|------|
    /// | identity | `name` |
    /// | exponent `p` | `{p}_{name}` |
    /// | pairwise product of columns `i`, `j` | `perm_{name_i}_{name_j}` |
    /// | log | `log_{name}` |
    /// | exp | `exp_{name}` |
    ///
    /// Every expansion kind is named, and the original names appear only when
    /// the identity is configured, so the result always has
    /// [`n_features_out`](Self::n_features_out) entries.
    pub fn expand_column_names<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<String>, PreprocessingError> {
        self.check_features(names.len())?;

        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        let non_boolean: Vec<&str> = self
            .profile
            .non_boolean_indices()
            .into_iter()
            .map(|idx| names[idx])
            .collect();

        let mut out = Vec::with_capacity(self.n_features_out());
        for step in expansion_plan(&self.powers) {
            match step {
                Power::Identity => out.extend(names.iter().map(|n| n.to_string())),
                Power::PairwiseProduct => {
                    for i in 0..names.len() {
                        for j in 0..=i {
                            out.push(format!("perm_{}_{}", names[i], names[j]));
                        }
                    }
                }
                Power::Exponent(_) | Power::Log | Power::Exp => {
                    let prefix = step.token();
                    out.extend(non_boolean.iter().map(|n| format!("{}_{}", prefix, n)));
                }
            }
        }
        Ok(out)
    }
}

impl<B: Backend> FittedTransformer<B> for FittedFeaturePreparer<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = FeaturePreparerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let expanded = self.expand(data)?;
        self.scaler.transform(&expanded)
    }

    /// Undoes the standardization and returns the original columns.
    ///
    /// Only possible when the identity is configured, since the original
    /// columns are then the leading block of the output.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        if !self.powers.contains(&Power::Identity) {
            return Err(PreprocessingError::InvalidParameter(
                "FeaturePreparer can only inverse_transform when the identity power is configured"
                    .to_string(),
            ));
        }
        let unscaled = self.scaler.inverse_transform(data)?;
        let leading: Vec<usize> = (0..self.n_features_in).collect();
        Ok(unscaled.select_columns(&leading))
    }

    fn extract_params(&self) -> Self::Params {
        FeaturePreparerParams {
            powers: self.powers.clone(),
            profile: self.profile.clone(),
            scaler: self.scaler.extract_params(),
            n_features_in: self.n_features_in,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let powers = normalize_powers(params.powers);
        let n_non_boolean = params.profile.non_boolean_indices().len();

        if params.profile.non_boolean_mask.len() != params.n_features_in
            || params.profile.original_std.len() != n_non_boolean
        {
            return Err(PreprocessingError::InvalidParameter(format!(
                "column profile does not describe {} input features",
                params.n_features_in
            )));
        }

        let expected_out = output_width(&expansion_plan(&powers), params.n_features_in, n_non_boolean);
        if params.scaler.n_features != expected_out {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: expected_out,
                got_features: params.scaler.n_features,
            });
        }

        Ok(Self {
            powers,
            profile: params.profile,
            scaler: FittedStandardScaler::from_params(params.scaler)?,
            n_features_in: params.n_features_in,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}
