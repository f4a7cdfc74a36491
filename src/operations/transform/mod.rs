mod adjust_depth;
mod align_to_pose;
mod normalize;

pub use adjust_depth::AdjustDepth;
pub use align_to_pose::AlignToPose;
pub use normalize::NormalizeGroup;
