//! Given steps for task state transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskflow::task::{
    domain::TaskStatus,
    services::{CreateTaskRequest, TransitionTaskRequest},
};

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut TaskTransitionWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(title, "Scenario task")),
    )
    .wrap_err("create task for transition scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"the task has been advanced to "{target}""#)]
fn task_advanced_to(world: &mut TaskTransitionWorld, target: String) -> Result<(), eyre::Report> {
    let target_status = TaskStatus::try_from(target.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let mut current = world.task()?.clone();
    while current.status() != target_status {
        let next = current
            .status()
            .next()
            .ok_or_else(|| eyre::eyre!("cannot advance beyond {}", current.status()))?;
        current = run_async(world.service.transition_task(TransitionTaskRequest::new(
            current.id(),
            next.as_str(),
            format!("Ready for {}", next.label()),
        )))
        .wrap_err("advance task in scenario setup")?;
    }
    world.task = Some(current);
    Ok(())
}

#[given("every checklist item is checked")]
fn every_checklist_item_checked(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task = world.task()?.clone();
    for item in task.checklist() {
        run_async(world.service.set_checklist_item(task.id(), item.id(), true))
            .wrap_err("check checklist item in scenario setup")?;
    }
    world.reload()?;
    Ok(())
}
