pub mod orchestration;

pub use orchestration::{apply_overrides, plan_with, run_plan_workflow, PlanWorkflowArgs};
