//! Search configuration.
//!
//! `SearchConfig` is built once (from TOML, from CLI flags, or both), checked
//! with `validate`, and then passed by reference to every stage. Nothing in
//! the pipeline mutates it.
//!
//! ```
//! use pipeline::SearchConfig;
//! use catalog::Attribute;
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     symmetric = true
//!     top_n = 150
//!
//!     [targets]
//!     speed = { min = 100 }
//!     hp = { min = 0, max = 0 }
//! "#).unwrap();
//!
//! assert!(config.symmetric);
//! assert!(config.targets.get(Attribute::Hp).unwrap().is_exact_zero());
//! ```

use crate::error::ConfigError;
use catalog::{Attribute, AttributeVector, Quality};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// TargetRange
// =============================================================================

/// Inclusive range for one attribute; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl TargetRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: i32) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: i32) -> Self {
        Self::new(None, Some(max))
    }

    pub fn between(min: i32, max: i32) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// The "must be exactly zero" constraint
    pub fn exact_zero() -> Self {
        Self::between(0, 0)
    }

    /// `(0, 0)` is checked per item as well as on the sum, and is left out of the score
    pub fn is_exact_zero(&self) -> bool {
        self.min == Some(0) && self.max == Some(0)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn has_positive_min(&self) -> bool {
        matches!(self.min, Some(min) if min > 0)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{}..{}", min, max),
            (Some(min), None) => write!(f, "{}..", min),
            (None, Some(max)) => write!(f, "..{}", max),
            (None, None) => f.write_str(".."),
        }
    }
}

// =============================================================================
// AttributeTargets
// =============================================================================

/// Target ranges keyed by attribute.
///
/// Attributes without an entry are unconstrained. Ranges open on both sides
/// constrain nothing and are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Attribute, TargetRange>", into = "BTreeMap<Attribute, TargetRange>")]
pub struct AttributeTargets {
    ranges: BTreeMap<Attribute, TargetRange>,
}

impl AttributeTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`
    pub fn with(mut self, attribute: Attribute, range: TargetRange) -> Self {
        self.insert(attribute, range);
        self
    }

    pub fn insert(&mut self, attribute: Attribute, range: TargetRange) {
        if range.is_unbounded() {
            self.ranges.remove(&attribute);
        } else {
            self.ranges.insert(attribute, range);
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&TargetRange> {
        self.ranges.get(&attribute)
    }

    /// Ranges in attribute order
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &TargetRange)> + '_ {
        self.ranges.iter().map(|(&attribute, range)| (attribute, range))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Attributes constrained to exactly zero
    pub fn zero_attributes(&self) -> Vec<Attribute> {
        self.iter()
            .filter(|(_, range)| range.is_exact_zero())
            .map(|(attribute, _)| attribute)
            .collect()
    }

    /// Attributes that count toward a combination's score
    pub fn scored_attributes(&self) -> Vec<Attribute> {
        self.iter()
            .filter(|(_, range)| !range.is_exact_zero())
            .map(|(attribute, _)| attribute)
            .collect()
    }

    /// Attributes with a strictly positive minimum, used by efficiency pruning
    pub fn positive_min_attributes(&self) -> Vec<Attribute> {
        self.iter()
            .filter(|(_, range)| range.has_positive_min())
            .map(|(attribute, _)| attribute)
            .collect()
    }

    /// Whether every constrained attribute of `sums` lies in its range
    pub fn accepts(&self, sums: &AttributeVector) -> bool {
        self.iter().all(|(attribute, range)| range.contains(sums.get(attribute)))
    }

    /// Reject any range whose minimum exceeds its maximum
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (attribute, range) in self.iter() {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(ConfigError::RangeOrderViolation { attribute, min, max });
                }
            }
        }
        Ok(())
    }

    /// Build a range from the two free-text fields a user fills in.
    ///
    /// Empty text leaves that side open; both empty means "no constraint"
    /// (`Ok(None)`).
    pub fn parse_bounds(
        attribute: Attribute,
        min_text: &str,
        max_text: &str,
    ) -> Result<Option<TargetRange>, ConfigError> {
        let parse = |text: &str| -> Result<Option<i32>, ConfigError> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidRangeInput {
                    attribute,
                    value: text.to_string(),
                })
        };

        let range = TargetRange::new(parse(min_text)?, parse(max_text)?);
        if range.is_unbounded() {
            return Ok(None);
        }
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(ConfigError::RangeOrderViolation { attribute, min, max });
            }
        }
        Ok(Some(range))
    }

    /// Parse the compact `MIN..MAX` form (`30..`, `..40`, `0..0`)
    pub fn parse_range_spec(attribute: Attribute, spec: &str) -> Result<Option<TargetRange>, ConfigError> {
        match spec.split_once("..") {
            Some((min_text, max_text)) => Self::parse_bounds(attribute, min_text, max_text),
            // A bare number is an exact value
            None => Self::parse_bounds(attribute, spec, spec),
        }
    }
}

impl From<BTreeMap<Attribute, TargetRange>> for AttributeTargets {
    fn from(ranges: BTreeMap<Attribute, TargetRange>) -> Self {
        let mut targets = AttributeTargets::new();
        for (attribute, range) in ranges {
            targets.insert(attribute, range);
        }
        targets
    }
}

impl From<AttributeTargets> for BTreeMap<Attribute, TargetRange> {
    fn from(targets: AttributeTargets) -> Self {
        targets.ranges
    }
}

// =============================================================================
// SumBucket
// =============================================================================

/// Where a top-tier mark's cached total sits relative to `SumBucket::THRESHOLD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SumBucket {
    #[serde(alias = ">220")]
    Above,
    #[serde(alias = "=220")]
    Equal,
    #[serde(alias = "<220")]
    Below,
}

impl SumBucket {
    pub const THRESHOLD: i32 = 220;

    pub fn matches(self, total_sum: i32) -> bool {
        match self {
            SumBucket::Above => total_sum > Self::THRESHOLD,
            SumBucket::Equal => total_sum == Self::THRESHOLD,
            SumBucket::Below => total_sum < Self::THRESHOLD,
        }
    }
}

impl FromStr for SumBucket {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" | ">220" | ">" => Ok(SumBucket::Above),
            "equal" | "=220" | "=" => Ok(SumBucket::Equal),
            "below" | "<220" | "<" => Ok(SumBucket::Below),
            _ => Err(ConfigError::InvalidBucket(s.to_string())),
        }
    }
}

impl fmt::Display for SumBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            SumBucket::Above => ">",
            SumBucket::Equal => "=",
            SumBucket::Below => "<",
        };
        write!(f, "{}{}", symbol, Self::THRESHOLD)
    }
}

// =============================================================================
// SearchConfig
// =============================================================================

/// Everything a search run needs besides the catalog itself.
///
/// Missing TOML keys fall back to `SearchConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub targets: AttributeTargets,
    /// Creature id whose exclusive marks may be used
    pub owner_filter: Option<String>,
    /// Allowed quality tiers; empty allows all
    pub quality_filter: BTreeSet<Quality>,
    /// Allowed total-sum buckets for top-tier marks; empty disables the check
    pub sum_buckets: BTreeSet<SumBucket>,
    /// Drop marks with any negative attribute
    pub drop_negative: bool,
    /// Only A-A-B combinations
    pub symmetric: bool,
    /// Enforce the limited-to-one id list
    pub use_exclusivity: bool,
    /// Keep only the `top_n` most relevant marks before enumerating (lossy)
    pub improve_efficiency: bool,
    pub top_n: usize,
    /// Skip log rows that are already present instead of appending duplicates
    pub dedup_log: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            targets: AttributeTargets::new(),
            owner_filter: None,
            quality_filter: [Quality::Five].into_iter().collect(),
            sum_buckets: [SumBucket::Above].into_iter().collect(),
            drop_negative: true,
            symmetric: false,
            use_exclusivity: true,
            improve_efficiency: true,
            top_n: 200,
            dedup_log: false,
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Owner filter with blank input treated as absent
    pub fn owner(&self) -> Option<&str> {
        self.owner_filter
            .as_deref()
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.targets.validate()?;
        if self.improve_efficiency && self.top_n == 0 {
            return Err(ConfigError::InvalidTopN);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_range_contains() {
        assert!(TargetRange::at_least(10).contains(10));
        assert!(!TargetRange::at_least(10).contains(9));
        assert!(TargetRange::at_most(-5).contains(-100));
        assert!(TargetRange::between(10, 20).contains(20));
        assert!(!TargetRange::between(10, 20).contains(21));
        assert!(TargetRange::exact_zero().contains(0));
        assert!(!TargetRange::exact_zero().contains(1));
    }

    #[test]
    fn test_parse_bounds_open_sides() {
        let range = AttributeTargets::parse_bounds(Attribute::Speed, "30", "").unwrap();
        assert_eq!(range, Some(TargetRange::at_least(30)));

        let range = AttributeTargets::parse_bounds(Attribute::Speed, " ", "40").unwrap();
        assert_eq!(range, Some(TargetRange::at_most(40)));

        assert_eq!(AttributeTargets::parse_bounds(Attribute::Speed, "", "").unwrap(), None);
    }

    #[test]
    fn test_parse_bounds_rejects_text() {
        let err = AttributeTargets::parse_bounds(Attribute::Hp, "ten", "").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRangeInput { attribute: Attribute::Hp, .. }
        ));
    }

    #[test]
    fn test_parse_bounds_rejects_inverted_range() {
        let err = AttributeTargets::parse_bounds(Attribute::Attack, "50", "10").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RangeOrderViolation { min: 50, max: 10, .. }
        ));
    }

    #[test]
    fn test_parse_range_spec() {
        let parse = |s| AttributeTargets::parse_range_spec(Attribute::Defense, s).unwrap();
        assert_eq!(parse("10..20"), Some(TargetRange::between(10, 20)));
        assert_eq!(parse("0..0"), Some(TargetRange::exact_zero()));
        assert_eq!(parse("..5"), Some(TargetRange::at_most(5)));
        assert_eq!(parse("7"), Some(TargetRange::between(7, 7)));
    }

    #[test]
    fn test_target_attribute_groups() {
        let targets = AttributeTargets::new()
            .with(Attribute::Attack, TargetRange::at_least(50))
            .with(Attribute::Speed, TargetRange::between(10, 90))
            .with(Attribute::Hp, TargetRange::exact_zero())
            .with(Attribute::Defense, TargetRange::default());

        assert_eq!(targets.len(), 3);
        assert_eq!(targets.zero_attributes(), vec![Attribute::Hp]);
        assert_eq!(
            targets.scored_attributes(),
            vec![Attribute::Attack, Attribute::Speed]
        );
        assert_eq!(
            targets.positive_min_attributes(),
            vec![Attribute::Attack, Attribute::Speed]
        );
    }

    #[test]
    fn test_sum_bucket_matches() {
        assert!(SumBucket::Above.matches(221));
        assert!(!SumBucket::Above.matches(220));
        assert!(SumBucket::Equal.matches(220));
        assert!(SumBucket::Below.matches(0));
        assert_eq!(">220".parse::<SumBucket>().unwrap(), SumBucket::Above);
        assert!("~220".parse::<SumBucket>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.top_n, 200);
        assert!(config.quality_filter.contains(&Quality::Five));
        assert!(config.sum_buckets.contains(&SumBucket::Above));
        assert!(config.use_exclusivity);
        assert!(!config.dedup_log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let config = SearchConfig::from_toml_str(
            r#"
            owner_filter = "3021"
            quality_filter = [4, 5]
            sum_buckets = ["above", "=220"]
            improve_efficiency = false

            [targets]
            attack = { min = 10, max = 20 }
            sp_def = { max = 5 }
            "#,
        )
        .unwrap();

        assert_eq!(config.owner(), Some("3021"));
        assert_eq!(config.quality_filter.len(), 2);
        assert!(config.sum_buckets.contains(&SumBucket::Equal));
        assert!(!config.improve_efficiency);
        assert_eq!(
            config.targets.get(Attribute::Attack),
            Some(&TargetRange::between(10, 20))
        );
        assert_eq!(
            config.targets.get(Attribute::SpDef),
            Some(&TargetRange::at_most(5))
        );
        // Untouched keys keep their defaults
        assert_eq!(config.top_n, 200);
    }

    #[test]
    fn test_config_validate_rejects_inverted_toml_range() {
        let config = SearchConfig::from_toml_str("[targets]\nspeed = { min = 9, max = 1 }\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RangeOrderViolation { attribute: Attribute::Speed, .. })
        ));
    }

    #[test]
    fn test_config_rejects_bad_quality() {
        assert!(SearchConfig::from_toml_str("quality_filter = [7]").is_err());
    }

    #[test]
    fn test_blank_owner_is_absent() {
        let config = SearchConfig {
            owner_filter: Some("  ".to_string()),
            ..SearchConfig::default()
        };
        assert_eq!(config.owner(), None);
    }
}
