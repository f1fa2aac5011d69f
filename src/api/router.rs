//! Route table and shared handler state.

use super::handlers;
use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use axum::{
    Router,
    routing::{get, post, put},
};
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by every handler.
pub struct AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    pub(super) service: Arc<TaskLifecycleService<R, C>>,
}

impl<R, C> AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Wraps a lifecycle service for use by the handlers.
    #[must_use]
    pub fn new(service: TaskLifecycleService<R, C>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl<R, C> Clone for AppState<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Builds the HTTP router for the task endpoints.
///
/// Every request is traced through `tower-http`.
#[must_use]
pub fn router<R, C>(service: TaskLifecycleService<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health::<R, C>))
        .route(
            "/tasks",
            get(handlers::list_tasks::<R, C>).post(handlers::create_task::<R, C>),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task::<R, C>)
                .put(handlers::update_task::<R, C>)
                .delete(handlers::delete_task::<R, C>),
        )
        .route(
            "/tasks/{id}/status",
            post(handlers::transition_task::<R, C>),
        )
        .route(
            "/tasks/{id}/checklist/{item_id}",
            put(handlers::set_checklist_item::<R, C>),
        )
        .route(
            "/tasks/{id}/pr-metadata",
            get(handlers::get_pr_metadata::<R, C>).put(handlers::upsert_pr_metadata::<R, C>),
        )
        .route(
            "/tasks/{id}/pr-description",
            get(handlers::pr_description::<R, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(service))
}
