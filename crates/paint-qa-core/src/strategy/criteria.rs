//! Sharpness levels and the interval rules that classify scores into them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DistortionError, Result};

/// Coarse sharpness grade of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharpnessLevel {
    /// No visible blur.
    #[serde(rename = "Clear")]
    Clear,
    /// Mild blur, recoverable with light sharpening.
    #[serde(rename = "Slight_Blur")]
    SlightBlur,
    /// Noticeable blur, needs deblurring.
    #[serde(rename = "Moderate_Blur")]
    ModerateBlur,
    /// Blur too strong to repair reliably.
    #[serde(rename = "Heavy_Blur")]
    HeavyBlur,
}

impl SharpnessLevel {
    /// All levels, sharpest first.
    pub const ALL: [Self; 4] = [
        Self::Clear,
        Self::SlightBlur,
        Self::ModerateBlur,
        Self::HeavyBlur,
    ];

    /// Canonical name, as used in criteria files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::SlightBlur => "Slight_Blur",
            Self::ModerateBlur => "Moderate_Blur",
            Self::HeavyBlur => "Heavy_Blur",
        }
    }

    /// Multiplicative quality factor attached to plans of this level.
    #[must_use]
    pub const fn quality_penalty(self) -> f64 {
        match self {
            Self::Clear => 1.0,
            Self::SlightBlur => 0.95,
            Self::ModerateBlur => 0.75,
            Self::HeavyBlur => 0.4,
        }
    }
}

impl fmt::Display for SharpnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharpnessLevel {
    type Err = DistortionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| DistortionError::Criteria(format!("unknown sharpness level '{s}'")))
    }
}

/// One inclusive sharpness interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharpnessRule {
    /// Level assigned to scores in the interval.
    pub level: SharpnessLevel,
    /// Inclusive lower bound.
    pub lower_bound: f64,
    /// Inclusive upper bound; may be infinite.
    pub upper_bound: f64,
    /// Free-form note.
    #[serde(default)]
    pub description: String,
}

impl SharpnessRule {
    /// Creates a rule without a description.
    #[must_use]
    pub const fn new(level: SharpnessLevel, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            level,
            lower_bound,
            upper_bound,
            description: String::new(),
        }
    }

    fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    fn contains(&self, score: f64) -> bool {
        self.lower_bound <= score && score <= self.upper_bound
    }
}

/// Classifies sharpness scores; the narrowest matching interval wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SharpnessCriteria {
    rules: Vec<SharpnessRule>,
}

impl SharpnessCriteria {
    /// Builds criteria from rules in any order.
    ///
    /// # Errors
    ///
    /// `Criteria` if a bound is NaN or a lower bound exceeds its upper bound.
    pub fn new(mut rules: Vec<SharpnessRule>) -> Result<Self> {
        for rule in &rules {
            if rule.lower_bound.is_nan() || rule.upper_bound.is_nan() {
                return Err(DistortionError::Criteria(format!(
                    "{} has a NaN bound",
                    rule.level
                )));
            }
            if rule.lower_bound > rule.upper_bound {
                return Err(DistortionError::Criteria(format!(
                    "{}: lower bound {} exceeds upper bound {}",
                    rule.level, rule.lower_bound, rule.upper_bound
                )));
            }
        }
        rules.sort_by(|a, b| {
            a.width()
                .total_cmp(&b.width())
                .then(a.lower_bound.total_cmp(&b.lower_bound))
        });
        Ok(Self { rules })
    }

    /// Rules, narrowest first.
    #[must_use]
    pub fn rules(&self) -> &[SharpnessRule] {
        &self.rules
    }

    /// Level of `score`. Scores outside every interval are `HeavyBlur`.
    #[must_use]
    pub fn classify(&self, score: f64) -> SharpnessLevel {
        self.rules
            .iter()
            .find(|rule| rule.contains(score))
            .map_or(SharpnessLevel::HeavyBlur, |rule| rule.level)
    }
}

impl Default for SharpnessCriteria {
    fn default() -> Self {
        Self {
            rules: vec![
                SharpnessRule::new(SharpnessLevel::ModerateBlur, 8.0, 15.0),
                SharpnessRule::new(SharpnessLevel::HeavyBlur, 0.0, 8.0),
                SharpnessRule::new(SharpnessLevel::SlightBlur, 15.0, 25.0),
                SharpnessRule::new(SharpnessLevel::Clear, 25.0, f64::INFINITY),
            ],
        }
    }
}
