//! When steps for task state transition BDD scenarios.

use super::world::TaskTransitionWorld;
use rstest_bdd_macros::when;
use taskflow::{
    board::drag_notes,
    task::{
        domain::{TaskStatus, TransitionMode},
        services::TransitionTaskRequest,
    },
};

#[when(r#"the task is moved to "{target}" with notes "{notes}""#)]
fn move_with_notes(
    world: &mut TaskTransitionWorld,
    target: String,
    notes: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    world.transition(TransitionTaskRequest::new(task_id, target, notes));
    Ok(())
}

#[when(r#"the task is moved to "{target}" without notes"#)]
fn move_without_notes(world: &mut TaskTransitionWorld, target: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    world.transition(TransitionTaskRequest::new(task_id, target, "   "));
    Ok(())
}

#[when(r#"the task is dragged to "{target}""#)]
fn drag_to(world: &mut TaskTransitionWorld, target: String) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(target.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task_id = world.task()?.id();
    world.transition(
        TransitionTaskRequest::new(task_id, status.as_str(), drag_notes(status))
            .with_mode(TransitionMode::Override),
    );
    Ok(())
}
