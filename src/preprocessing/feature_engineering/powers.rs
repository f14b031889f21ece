//! Expansion tokens and the serde-friendly preparer configuration.

use crate::preprocessing::error::PreprocessingError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One entry of a feature preparer's powers list.
///
/// In textual form (config files, command lines) the tokens are integers
/// (`"1"`, `"2"`, `"-1"`, ...), `"perm"`, `"log"` and `"exp"`. The integer `1`
/// always means [`Power::Identity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Power {
    /// Keep the original columns.
    Identity,
    /// Raise every non-boolean column to an integer power other than 1.
    Exponent(i32),
    /// Products of every pair of columns `(i, j)` with `j <= i`.
    PairwiseProduct,
    /// `ln(x + 1)` of every non-boolean column.
    Log,
    /// `exp(x / std)` of every non-boolean column, `std` learned at fit.
    Exp,
}

impl Power {
    /// Integer power token; `1` maps to [`Power::Identity`].
    pub fn exponent(p: i32) -> Self {
        if p == 1 {
            Power::Identity
        } else {
            Power::Exponent(p)
        }
    }

    /// Whether expanding this token needs the column profile learned by fit.
    pub fn needs_fit(&self) -> bool {
        matches!(self, Power::Exponent(_) | Power::Log | Power::Exp)
    }

    /// Textual token, also used as the prefix of generated column names.
    pub fn token(&self) -> String {
        match self {
            Power::Identity => "1".to_string(),
            Power::Exponent(p) => p.to_string(),
            Power::PairwiseProduct => "perm".to_string(),
            Power::Log => "log".to_string(),
            Power::Exp => "exp".to_string(),
        }
    }

    fn normalized(self) -> Self {
        match self {
            Power::Exponent(1) => Power::Identity,
            other => other,
        }
    }
}

impl From<i32> for Power {
    fn from(p: i32) -> Self {
        Power::exponent(p)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl FromStr for Power {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "perm" => Ok(Power::PairwiseProduct),
            "log" => Ok(Power::Log),
            "exp" => Ok(Power::Exp),
            other => other.parse::<i32>().map(Power::exponent).map_err(|_| {
                PreprocessingError::InvalidParameter(format!(
                    "unknown power token `{}` (expected an integer, `perm`, `log` or `exp`)",
                    other
                ))
            }),
        }
    }
}

/// Normalizes a powers list: `Exponent(1)` becomes `Identity` and an empty
/// list becomes `[Identity]`.
pub fn normalize_powers<I>(powers: I) -> Vec<Power>
where
    I: IntoIterator<Item = Power>,
{
    let powers: Vec<Power> = powers.into_iter().map(Power::normalized).collect();
    if powers.is_empty() {
        vec![Power::Identity]
    } else {
        powers
    }
}

/// Orders the configured tokens the way expansion emits columns: identity,
/// integer exponents in configuration order, pairwise products, log, exp.
///
/// Exponents keep their multiplicity; the other tokens are flags.
pub(crate) fn expansion_plan(powers: &[Power]) -> Vec<Power> {
    let mut plan = Vec::new();
    if powers.contains(&Power::Identity) {
        plan.push(Power::Identity);
    }
    plan.extend(
        powers
            .iter()
            .copied()
            .filter(|p| matches!(p, Power::Exponent(_))),
    );
    for flag in [Power::PairwiseProduct, Power::Log, Power::Exp] {
        if powers.contains(&flag) {
            plan.push(flag);
        }
    }
    plan
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PowerToken {
    Int(i64),
    Name(String),
}

impl TryFrom<PowerToken> for Power {
    type Error = PreprocessingError;

    fn try_from(token: PowerToken) -> Result<Self, Self::Error> {
        match token {
            PowerToken::Int(p) => i32::try_from(p).map(Power::exponent).map_err(|_| {
                PreprocessingError::InvalidParameter(format!("power {} is out of range", p))
            }),
            PowerToken::Name(name) => name.parse(),
        }
    }
}

impl From<Power> for PowerToken {
    fn from(power: Power) -> Self {
        match power {
            Power::Identity => PowerToken::Int(1),
            Power::Exponent(p) => PowerToken::Int(i64::from(p)),
            other => PowerToken::Name(other.token()),
        }
    }
}

fn serialize_tokens<S: Serializer>(powers: &[Power], serializer: S) -> Result<S::Ok, S::Error> {
    let tokens: Vec<PowerToken> = powers.iter().copied().map(PowerToken::from).collect();
    tokens.serialize(serializer)
}

fn deserialize_tokens<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Power>, D::Error> {
    Vec::<PowerToken>::deserialize(deserializer)?
        .into_iter()
        .map(|t| Power::try_from(t).map_err(D::Error::custom))
        .collect()
}

/// Configuration for a feature preparer.
///
/// In JSON the powers list mixes integers and names:
///
/// ```
/// use feature_prep::preprocessing::{FeaturePreparerConfig, Power};
///
/// let config = FeaturePreparerConfig::from_json_str(r#"{"powers": [1, 2, "perm", "log"]}"#).unwrap();
/// assert_eq!(
///     config.powers,
///     vec![Power::Identity, Power::Exponent(2), Power::PairwiseProduct, Power::Log]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePreparerConfig {
    /// Expansion tokens; empty means identity only.
    #[serde(
        default,
        serialize_with = "serialize_tokens",
        deserialize_with = "deserialize_tokens"
    )]
    pub powers: Vec<Power>,
}

impl FeaturePreparerConfig {
    /// Parses textual tokens such as `["1", "2", "perm"]`.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, PreprocessingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let powers = tokens
            .into_iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<Power>, _>>()?;
        Ok(Self { powers })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PreprocessingError> {
        serde_json::from_str(json).map_err(|e| {
            PreprocessingError::InvalidParameter(format!("invalid preparer config: {}", e))
        })
    }

    pub fn to_json_string(&self) -> Result<String, PreprocessingError> {
        serde_json::to_string(self).map_err(|e| PreprocessingError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("1".parse::<Power>().unwrap(), Power::Identity);
        assert_eq!("3".parse::<Power>().unwrap(), Power::Exponent(3));
        assert_eq!("-1".parse::<Power>().unwrap(), Power::Exponent(-1));
        assert_eq!("perm".parse::<Power>().unwrap(), Power::PairwiseProduct);
        assert_eq!(" log ".parse::<Power>().unwrap(), Power::Log);
        assert_eq!("exp".parse::<Power>().unwrap(), Power::Exp);
        assert!(matches!(
            "sqrt".parse::<Power>(),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Power::Exponent(2).to_string(), "2");
        assert_eq!(Power::PairwiseProduct.to_string(), "perm");
        assert_eq!(Power::from(1), Power::Identity);
    }

    #[test]
    fn test_normalize_powers() {
        assert_eq!(normalize_powers(Vec::new()), vec![Power::Identity]);
        assert_eq!(
            normalize_powers(vec![Power::Exponent(1), Power::Exponent(2)]),
            vec![Power::Identity, Power::Exponent(2)]
        );
    }

    #[test]
    fn test_expansion_plan_order() {
        let powers = vec![
            Power::Exp,
            Power::Exponent(3),
            Power::Log,
            Power::PairwiseProduct,
            Power::Identity,
            Power::Exponent(2),
            Power::Log,
        ];
        assert_eq!(
            expansion_plan(&powers),
            vec![
                Power::Identity,
                Power::Exponent(3),
                Power::Exponent(2),
                Power::PairwiseProduct,
                Power::Log,
                Power::Exp,
            ]
        );
    }

    #[test]
    fn test_expansion_plan_keeps_duplicate_exponents() {
        let plan = expansion_plan(&[Power::Exponent(2), Power::Exponent(2)]);
        assert_eq!(plan, vec![Power::Exponent(2), Power::Exponent(2)]);
    }

    #[test]
    fn test_config_from_tokens() {
        let config = FeaturePreparerConfig::from_tokens(["1", "2", "exp"]).unwrap();
        assert_eq!(
            config.powers,
            vec![Power::Identity, Power::Exponent(2), Power::Exp]
        );
        assert!(FeaturePreparerConfig::from_tokens(["1", "cube"]).is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = FeaturePreparerConfig {
            powers: vec![Power::Identity, Power::Exponent(-2), Power::PairwiseProduct],
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(json, r#"{"powers":[1,-2,"perm"]}"#);
        assert_eq!(FeaturePreparerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_config_json_defaults_and_errors() {
        let config = FeaturePreparerConfig::from_json_str("{}").unwrap();
        assert!(config.powers.is_empty());

        assert!(FeaturePreparerConfig::from_json_str(r#"{"powers": ["cube"]}"#).is_err());
        assert!(FeaturePreparerConfig::from_json_str(r#"{"powers": [4294967296]}"#).is_err());
    }

    #[test]
    fn test_power_bincode_roundtrip() {
        let powers = vec![Power::Identity, Power::Exponent(3), Power::Exp];
        let bytes = bincode::serialize(&powers).unwrap();
        let back: Vec<Power> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, powers);
    }
}
