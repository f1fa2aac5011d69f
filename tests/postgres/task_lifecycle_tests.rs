//! `PostgreSQL` integration tests for task persistence.

use crate::postgres::helpers::{BoxError, TASK_CHILD_TABLES, TaskTestContext, setup_context};
use mockable::DefaultClock;
use rstest::rstest;
use taskflow::task::{
    domain::{
        ChecklistItemId, PrMetadataFields, TaskDomainError, TaskId, TaskStatus, TransitionMode,
        TransitionNotes,
    },
    ports::{TaskRepository, TaskRepositoryError},
    services::{
        CreateTaskRequest, TaskLifecycleError, TransitionTaskRequest, UpdateTaskRequest,
        UpsertPrMetadataRequest,
    },
};

async fn create(context: &TaskTestContext, title: &str) -> Result<TaskId, BoxError> {
    let task = context
        .service
        .create_task(CreateTaskRequest::new(title, "Stored in PostgreSQL"))
        .await?;
    Ok(task.id())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_create_round_trips_related_records() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let created = context
        .service
        .create_task(
            CreateTaskRequest::new("Persist me", "With everything attached").with_pr_metadata(
                PrMetadataFields {
                    ticket_id: Some("TASK-7".to_owned()),
                    ..PrMetadataFields::default()
                },
            ),
        )
        .await?;

    let fetched = context.service.get_task(created.id()).await?;

    assert_eq!(fetched.title(), "Persist me");
    assert_eq!(fetched.status(), TaskStatus::Investigation);
    assert_eq!(fetched.history().len(), 1);
    let checklist_ids: Vec<ChecklistItemId> =
        fetched.checklist().iter().map(|item| item.id()).collect();
    let expected_ids: Vec<ChecklistItemId> =
        created.checklist().iter().map(|item| item.id()).collect();
    assert_eq!(checklist_ids, expected_ids);
    assert_eq!(
        fetched.pr_metadata().map(|metadata| metadata.ticket_id().to_owned()),
        Some("TASK-7".to_owned())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_transition_appends_history_atomically() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let task_id = create(&context, "Workflow").await?;

    context
        .service
        .transition_task(TransitionTaskRequest::new(task_id, "planning", "Scoped"))
        .await?;
    let rejected = context
        .service
        .transition_task(TransitionTaskRequest::new(task_id, "in_review", "Skip ahead"))
        .await;

    assert!(matches!(
        rejected,
        Err(TaskLifecycleError::Domain(TaskDomainError::OutOfSequence { .. }))
    ));
    let stored = context.service.get_task(task_id).await?;
    assert_eq!(stored.status(), TaskStatus::Planning);
    let notes: Vec<String> = stored
        .history_most_recent_first()
        .map(|entry| entry.notes().to_owned())
        .collect();
    assert_eq!(notes.first().map(String::as_str), Some("Scoped"));
    assert_eq!(notes.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_stale_transition_is_rejected_without_history() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let task_id = create(&context, "Contended").await?;
    let mut stale = context.service.get_task(task_id).await?;
    context
        .service
        .transition_task(
            TransitionTaskRequest::new(task_id, "in_testing", "Jumped")
                .with_mode(TransitionMode::Override),
        )
        .await?;

    let change = stale.transition_to(
        TaskStatus::Planning,
        TransitionNotes::new("Late writer")?,
        TransitionMode::Sequential,
        &DefaultClock,
    )?;
    let result = context.repository.record_transition(&change).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::StatusConflict {
            expected: TaskStatus::Investigation,
            actual: TaskStatus::InTesting,
            ..
        })
    ));
    let stored = context.service.get_task(task_id).await?;
    assert_eq!(stored.status(), TaskStatus::InTesting);
    assert_eq!(stored.history().len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_checklist_toggle_is_scoped_to_task() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let owner = context
        .service
        .create_task(CreateTaskRequest::new("Owner", "Has the item"))
        .await?;
    let other_id = create(&context, "Other").await?;
    let item = owner
        .checklist()
        .first()
        .ok_or("template checklist should not be empty")?;

    let foreign = context
        .service
        .set_checklist_item(other_id, item.id(), true)
        .await;
    let toggled = context
        .service
        .set_checklist_item(owner.id(), item.id(), true)
        .await?;

    assert!(matches!(
        foreign,
        Err(TaskLifecycleError::ChecklistItemNotFound { .. })
    ));
    assert!(toggled.checked());
    let stored = context.service.get_task(owner.id()).await?;
    assert_eq!(
        stored.checklist().iter().filter(|entry| entry.checked()).count(),
        1
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_pr_metadata_upsert_keeps_one_row() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let task_id = create(&context, "Metadata").await?;

    let first = context
        .service
        .upsert_pr_metadata(UpsertPrMetadataRequest::new(
            task_id,
            PrMetadataFields {
                description: Some("First draft".to_owned()),
                ..PrMetadataFields::default()
            },
        ))
        .await?;
    let second = context
        .service
        .upsert_pr_metadata(UpsertPrMetadataRequest::new(
            task_id,
            PrMetadataFields {
                testing_plan: Some("Ran the suite".to_owned()),
                ..PrMetadataFields::default()
            },
        ))
        .await?;

    assert_eq!(first.id(), second.id());
    assert_eq!(second.description(), "First draft");
    assert_eq!(second.testing_plan(), "Ran the suite");

    let missing = context
        .service
        .upsert_pr_metadata(UpsertPrMetadataRequest::new(
            TaskId::new(),
            PrMetadataFields::default(),
        ))
        .await;
    assert!(matches!(missing, Err(TaskLifecycleError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_delete_leaves_no_orphan_rows() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let task = context
        .service
        .create_task(
            CreateTaskRequest::new("Cascade", "Owns every kind of row").with_pr_metadata(
                PrMetadataFields {
                    ticket_id: Some("TASK-11".to_owned()),
                    ..PrMetadataFields::default()
                },
            ),
        )
        .await?;
    context
        .service
        .transition_task(TransitionTaskRequest::new(task.id(), "planning", "Scoped"))
        .await?;
    let survivor = create(&context, "Survivor").await?;
    for table in TASK_CHILD_TABLES {
        assert!(context.count_task_rows(table, task.id()).await? > 0, "{table} not seeded");
    }

    context.service.delete_task(task.id()).await?;

    for table in TASK_CHILD_TABLES {
        assert_eq!(context.count_task_rows(table, task.id()).await?, 0, "{table} orphaned");
    }
    assert!(context.count_task_rows("task_status_history", survivor).await? > 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_list_and_delete() -> Result<(), BoxError> {
    let Some(context) = setup_context().await? else {
        return Ok(());
    };
    let older = create(&context, "Older").await?;
    let newer = create(&context, "Newer").await?;

    context
        .service
        .update_task(UpdateTaskRequest::new(older, "Older, renamed", "Edited"))
        .await?;
    let listed: Vec<TaskId> = context
        .service
        .list_tasks()
        .await?
        .iter()
        .map(taskflow::task::domain::Task::id)
        .collect();
    assert_eq!(listed, vec![older, newer]);

    context.service.delete_task(older).await?;
    assert!(context.service.find_task(older).await?.is_none());
    let again = context.service.delete_task(older).await;
    assert!(matches!(again, Err(TaskLifecycleError::NotFound(_))));
    context.service.check_health().await?;
    Ok(())
}
