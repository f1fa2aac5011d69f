//! Then steps for task state transition BDD scenarios.

use super::world::TaskTransitionWorld;
use rstest_bdd_macros::then;
use taskflow::task::{
    domain::{TaskDomainError, TaskStatus},
    services::TaskLifecycleError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &mut TaskTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.reload()?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the transition is rejected as "{reason}""#)]
fn transition_rejected_as(world: &TaskTransitionWorld, reason: String) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    let matched = match reason.as_str() {
        "missing notes" => matches!(
            result,
            Err(TaskLifecycleError::Domain(TaskDomainError::MissingNotes))
        ),
        "out of sequence" => matches!(
            result,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::OutOfSequence { .. }
            ))
        ),
        "checklist incomplete" => matches!(
            result,
            Err(TaskLifecycleError::Domain(
                TaskDomainError::ChecklistIncomplete { .. }
            ))
        ),
        "invalid status" => matches!(result, Err(TaskLifecycleError::InvalidStatus(_))),
        other => return Err(eyre::eyre!("unknown rejection reason in scenario: {other}")),
    };

    if !matched {
        return Err(eyre::eyre!("expected {reason} rejection, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the latest history notes are "{notes}""#)]
fn latest_history_notes(world: &mut TaskTransitionWorld, notes: String) -> Result<(), eyre::Report> {
    let task = world.reload()?;
    let latest = task
        .latest_history()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;

    if latest.notes() != notes {
        return Err(eyre::eyre!(
            "expected latest notes {notes:?}, found {:?}",
            latest.notes()
        ));
    }
    Ok(())
}

#[then("the history has {count:usize} entries")]
fn history_has_entries(world: &mut TaskTransitionWorld, count: usize) -> Result<(), eyre::Report> {
    let task = world.reload()?;

    if task.history().len() != count {
        return Err(eyre::eyre!(
            "expected {count} history entries, found {}",
            task.history().len()
        ));
    }
    Ok(())
}
