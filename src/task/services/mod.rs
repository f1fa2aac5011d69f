//! Application services for task lifecycle orchestration.

mod lifecycle;
mod pr_description;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    TransitionTaskRequest, UpdateTaskRequest, UpsertPrMetadataRequest,
};
pub use pr_description::{PrDescriptionError, render_pr_description};
