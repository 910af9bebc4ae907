//! Applies enhancement plans.

use image::DynamicImage;
use tracing::info;

use super::plan::{EnhancementOp, EnhancementOpType, EnhancementPlan};
use crate::domain::Result;
use crate::enhance::{
    run, Clahe, Deblur, DeblurAggressive, DenoiseLight, DenoiseStrong, EnhancementConfig,
    Enhancer, GammaAdjust, Identity, SharpenLight, SharpenMedium,
};

/// Strength used when a step has none (or zero).
pub const DEFAULT_OP_STRENGTH: f32 = 1.0;

/// Builds the enhancer for one plan step.
#[must_use]
pub fn enhancer_for(op: &EnhancementOp) -> Box<dyn Enhancer> {
    let strength = op
        .strength
        .filter(|s| s.abs() > 0.0)
        .unwrap_or(DEFAULT_OP_STRENGTH);

    match op.op_type {
        EnhancementOpType::DenoiseLight => Box::new(DenoiseLight::new(strength)),
        EnhancementOpType::DenoiseStrong => Box::new(DenoiseStrong::new(strength)),
        EnhancementOpType::SharpenLight => Box::new(SharpenLight::new(strength)),
        EnhancementOpType::SharpenMedium => Box::new(SharpenMedium::new(strength)),
        EnhancementOpType::Deblur => Box::new(Deblur::new(strength)),
        EnhancementOpType::DeblurAggressive => Box::new(DeblurAggressive::new(strength)),
        EnhancementOpType::GammaIncrease => Box::new(GammaAdjust::new(strength.abs())),
        EnhancementOpType::GammaDecrease => Box::new(GammaAdjust::new(-strength.abs())),
        EnhancementOpType::Clahe => Box::new(Clahe::new(strength)),
        EnhancementOpType::MarkAsLowQuality => Box::new(Identity),
    }
}

/// Applies every step of `plan` in order and returns the final image.
///
/// The config's resize runs once before the first step; clipping and
/// normalisation run once after the last.
///
/// # Errors
///
/// `InvalidArgument` for an unusable config, or the first step error.
pub fn apply_plan(
    image: &DynamicImage,
    plan: &EnhancementPlan,
    config: &EnhancementConfig,
) -> Result<DynamicImage> {
    config.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Ok(image.clone());
    }

    let mut working = config.prepare(image);
    for op in &plan.ops {
        let enhancer = enhancer_for(op);
        working = run(enhancer.as_ref(), &working, config)?;
    }
    info!(
        "Applied {} step(s) for {} plan",
        plan.ops.len(),
        plan.sharpness_level
    );
    Ok(config.finish(working, image.color()))
}
