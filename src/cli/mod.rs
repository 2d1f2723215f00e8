//! Release workflow driven by the command line

pub mod orchestration;
pub mod plan;

pub use orchestration::{run_release, ReleaseOptions, ReleaseOutcome, ReleaseReport};
pub use plan::{build_plan, PlanStep, ReleasePlan};
