//! Enhancement strategy: classify sharpness, plan steps, apply them.

mod criteria;
mod executor;
mod plan;

pub use criteria::{SharpnessCriteria, SharpnessLevel, SharpnessRule};
pub use executor::{apply_plan, enhancer_for, DEFAULT_OP_STRENGTH};
pub use plan::{
    EnhancementOp, EnhancementOpType, EnhancementPlan, EnhancementPlanner, BRIGHTNESS_HIGH,
    BRIGHTNESS_LOW, CONTRAST_LOW, NOISE_HIGH,
};
