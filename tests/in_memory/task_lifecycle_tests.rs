//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use taskflow::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PrMetadataFields, Task, TaskDomainError, TaskStatus, TransitionMode},
    services::{
        CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, TransitionTaskRequest,
        UpsertPrMetadataRequest,
    },
};

type TestService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Advances `task` one stage at a time until it reaches `target`.
///
/// # Errors
///
/// Returns an error when any sequential transition is rejected.
async fn advance_to(
    service: &TestService,
    task: Task,
    target: TaskStatus,
) -> Result<Task, eyre::Report> {
    let mut current = task;
    while current.status() != target {
        let next = current
            .status()
            .next()
            .ok_or_else(|| eyre::eyre!("cannot advance past {}", current.status()))?;
        current = service
            .transition_task(TransitionTaskRequest::new(
                current.id(),
                next.as_str(),
                format!("Advancing to {}", next.label()),
            ))
            .await?;
    }
    Ok(current)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_walks_the_full_workflow_once_checklist_is_complete(service: TestService) {
    let created = service
        .create_task(CreateTaskRequest::new(
            "Add audit trail",
            "Record who moved each task",
        ))
        .await
        .expect("task creation should succeed");
    let in_review = advance_to(&service, created, TaskStatus::InReview)
        .await
        .expect("sequential progression should succeed");

    let blocked = service
        .transition_task(TransitionTaskRequest::new(
            in_review.id(),
            "done",
            "Ship it",
        ))
        .await;
    assert!(matches!(
        blocked,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::ChecklistIncomplete { .. }
        ))
    ));

    for item in in_review.checklist() {
        service
            .set_checklist_item(in_review.id(), item.id(), true)
            .await
            .expect("checklist toggle should succeed");
    }
    let done = service
        .transition_task(TransitionTaskRequest::new(
            in_review.id(),
            "done",
            "Ship it",
        ))
        .await
        .expect("completion should succeed once the checklist is complete");

    assert_eq!(done.status(), TaskStatus::Done);
    let statuses: Vec<TaskStatus> = done
        .history_most_recent_first()
        .map(taskflow::task::domain::StatusHistoryEntry::status)
        .collect();
    let mut expected = TaskStatus::ALL.to_vec();
    expected.reverse();
    assert_eq!(statuses, expected);
    assert_eq!(
        done.latest_history().map(|entry| entry.notes().to_owned()),
        Some("Ship it".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn override_moves_are_recorded_in_history(service: TestService) {
    let created = service
        .create_task(CreateTaskRequest::new("Dashboard", "Build the dashboard"))
        .await
        .expect("task creation should succeed");

    let testing = service
        .transition_task(
            TransitionTaskRequest::new(
                created.id(),
                "in_testing",
                "Task moved to In Testing via drag and drop",
            )
            .with_mode(TransitionMode::Override),
        )
        .await
        .expect("override jump should succeed");
    let back = service
        .transition_task(
            TransitionTaskRequest::new(created.id(), "planning", "Needs another design pass")
                .with_mode(TransitionMode::Override),
        )
        .await
        .expect("override regression should succeed");

    assert_eq!(testing.status(), TaskStatus::InTesting);
    assert_eq!(back.status(), TaskStatus::Planning);
    assert_eq!(back.history().len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pr_description_reflects_metadata_and_checklist(service: TestService) {
    let created = service
        .create_task(CreateTaskRequest::new("Billing", "Invoice export"))
        .await
        .expect("task creation should succeed");
    let first_item = created
        .checklist()
        .first()
        .expect("template checklist should not be empty")
        .clone();
    service
        .set_checklist_item(created.id(), first_item.id(), true)
        .await
        .expect("checklist toggle should succeed");
    service
        .upsert_pr_metadata(UpsertPrMetadataRequest::new(
            created.id(),
            PrMetadataFields {
                ticket_id: Some("TASK-42".to_owned()),
                ticket_link: Some("https://tracker.example/TASK-42".to_owned()),
                description: Some("Adds CSV export".to_owned()),
                testing_plan: None,
            },
        ))
        .await
        .expect("metadata upsert should succeed");

    let markdown = service
        .render_pr_description(created.id())
        .await
        .expect("description should render");

    assert!(markdown.contains("Adds CSV export"));
    assert!(markdown.contains("[TASK-42](https://tracker.example/TASK-42)"));
    assert!(markdown.contains(&format!("- [x] {}", first_item.text())));
    assert!(markdown.contains("Explain how these changes were tested"));
}
