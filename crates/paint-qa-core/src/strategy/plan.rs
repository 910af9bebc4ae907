//! Enhancement plans derived from distortion metrics.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::{SharpnessCriteria, SharpnessLevel};
use crate::domain::DistortionMetrics;

/// Brightness proxy below which the image is brightened.
pub const BRIGHTNESS_LOW: f64 = 0.35;
/// Brightness proxy above which the image is darkened.
pub const BRIGHTNESS_HIGH: f64 = 0.65;
/// Contrast proxy below which local contrast is boosted.
pub const CONTRAST_LOW: f64 = 0.25;
/// Noise variance above which a denoise step is added.
pub const NOISE_HIGH: f64 = 0.5;

/// Kind of enhancement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnhancementOpType {
    /// Bilateral smoothing.
    DenoiseLight,
    /// Median smoothing.
    DenoiseStrong,
    /// Unsharp mask, σ = 1.0.
    SharpenLight,
    /// Unsharp mask, σ = 1.5.
    SharpenMedium,
    /// Laplacian boost.
    Deblur,
    /// Stronger Laplacian boost.
    DeblurAggressive,
    /// Lighten via gamma.
    GammaIncrease,
    /// Darken via gamma.
    GammaDecrease,
    /// Local contrast equalisation.
    Clahe,
    /// Flags the image; does not change pixels.
    MarkAsLowQuality,
}

/// One step of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementOp {
    /// Step kind.
    #[serde(rename = "type")]
    pub op_type: EnhancementOpType,
    /// Requested strength; `None` means the executor default.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub strength: Option<f32>,
}

impl EnhancementOp {
    /// A step with an explicit strength.
    #[must_use]
    pub const fn new(op_type: EnhancementOpType, strength: f32) -> Self {
        Self {
            op_type,
            strength: Some(strength),
        }
    }

    /// A step without a strength.
    #[must_use]
    pub const fn marker(op_type: EnhancementOpType) -> Self {
        Self {
            op_type,
            strength: None,
        }
    }
}

/// Ordered enhancement steps for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementPlan {
    /// Sharpness grade the plan was built for.
    pub sharpness_level: SharpnessLevel,
    /// Steps, applied in order.
    pub ops: Vec<EnhancementOp>,
    /// Quality factor in `(0, 1]`.
    pub quality_penalty: f64,
}

impl EnhancementPlan {
    /// True if the plan flags the image as low quality.
    #[must_use]
    pub fn is_low_quality(&self) -> bool {
        self.ops
            .iter()
            .any(|op| op.op_type == EnhancementOpType::MarkAsLowQuality)
    }

    /// Step kinds in order.
    pub fn op_types(&self) -> impl Iterator<Item = EnhancementOpType> + '_ {
        self.ops.iter().map(|op| op.op_type)
    }
}

/// Builds plans from metrics using sharpness criteria and fixed heuristics.
///
/// Brightness and contrast are approximated from illumination uniformity:
/// `brightness = clamp(1 - U)`, `contrast = clamp(U)`.
#[derive(Debug, Clone, Default)]
pub struct EnhancementPlanner {
    criteria: SharpnessCriteria,
}

impl EnhancementPlanner {
    /// Creates a planner using `criteria`.
    #[must_use]
    pub const fn new(criteria: SharpnessCriteria) -> Self {
        Self { criteria }
    }

    /// The criteria in use.
    #[must_use]
    pub const fn criteria(&self) -> &SharpnessCriteria {
        &self.criteria
    }

    /// Classifies a sharpness score.
    #[must_use]
    pub fn classify_sharpness(&self, score: f64) -> SharpnessLevel {
        self.criteria.classify(score)
    }

    /// Builds the plan for one image.
    #[must_use]
    pub fn build_plan(&self, metrics: &DistortionMetrics) -> EnhancementPlan {
        use EnhancementOpType as Op;

        let level = self.classify_sharpness(metrics.sharpness);
        let brightness = (1.0 - metrics.illumination_uniformity).clamp(0.0, 1.0);
        let contrast = metrics.illumination_uniformity.clamp(0.0, 1.0);
        let noisy = metrics.noise_variance > NOISE_HIGH;
        let low_contrast = contrast < CONTRAST_LOW;

        let gamma = if brightness < BRIGHTNESS_LOW {
            Some(EnhancementOp::new(Op::GammaIncrease, 0.2))
        } else if brightness > BRIGHTNESS_HIGH {
            Some(EnhancementOp::new(Op::GammaDecrease, 0.2))
        } else {
            None
        };
        let clahe = low_contrast.then(|| EnhancementOp::new(Op::Clahe, 1.0));

        let mut ops = Vec::new();
        match level {
            SharpnessLevel::Clear => {
                ops.extend(gamma);
                ops.extend(clahe);
            }
            SharpnessLevel::SlightBlur => {
                if noisy {
                    ops.push(EnhancementOp::new(Op::DenoiseLight, 0.5));
                }
                ops.push(EnhancementOp::new(Op::SharpenLight, 0.5));
                ops.extend(clahe);
            }
            SharpnessLevel::ModerateBlur => {
                if noisy {
                    ops.push(EnhancementOp::new(Op::DenoiseStrong, 0.8));
                }
                ops.push(EnhancementOp::new(Op::Deblur, 0.6));
                ops.push(EnhancementOp::new(Op::SharpenMedium, 0.7));
                ops.extend(clahe);
                ops.extend(gamma);
            }
            SharpnessLevel::HeavyBlur => {
                ops.push(EnhancementOp::marker(Op::MarkAsLowQuality));
                ops.push(EnhancementOp::new(Op::DeblurAggressive, 1.0));
            }
        }

        debug!(
            "Planned {} step(s) for {level} (brightness {brightness:.3}, contrast {contrast:.3})",
            ops.len()
        );
        EnhancementPlan {
            sharpness_level: level,
            ops,
            quality_penalty: level.quality_penalty(),
        }
    }
}
