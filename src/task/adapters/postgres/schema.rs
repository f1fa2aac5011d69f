//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Current workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status history.
    task_status_history (id) {
        /// History entry identifier.
        id -> Uuid,
        /// Insertion order tie-breaker for entries sharing a timestamp.
        seq -> Int8,
        /// Owning task.
        task_id -> Uuid,
        /// Status that was entered.
        #[max_length = 50]
        status -> Varchar,
        /// Notes submitted with the change.
        notes -> Text,
        /// When the entry was recorded.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pull request checklist items cloned from the template.
    task_pr_checklist_items (id) {
        /// Item identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Template position.
        position -> Int4,
        /// Checklist text.
        text -> Text,
        /// Whether the item is checked.
        checked -> Bool,
    }
}

diesel::table! {
    /// Pull request metadata, one row per task.
    task_pr_metadata (id) {
        /// Metadata identifier.
        id -> Uuid,
        /// Owning task, unique.
        task_id -> Uuid,
        /// External ticket identifier.
        ticket_id -> Text,
        /// External ticket link.
        ticket_link -> Text,
        /// Pull request description.
        description -> Text,
        /// Testing plan.
        testing_plan -> Text,
    }
}

diesel::joinable!(task_status_history -> tasks (task_id));
diesel::joinable!(task_pr_checklist_items -> tasks (task_id));
diesel::joinable!(task_pr_metadata -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    task_status_history,
    task_pr_checklist_items,
    task_pr_metadata,
);
