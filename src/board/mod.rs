//! Client-side board and list view state.
//!
//! [`Board`] owns a single [`TaskCache`] keyed by task id and derives the
//! filtered list and the per-status columns from it on every read. Drag
//! and drop moves are applied optimistically, sent as override transitions
//! through a [`TaskApi`], and rolled back when the server refuses them.
//! Background refresh is paused while a drag is in progress.

mod cache;
mod client;
mod filter;
mod history;
mod refresh;
mod view;

pub use cache::{BoardColumn, TaskCache};
pub use client::{ClientError, HttpTaskApi, TaskApi};
pub use filter::{QUERY_PARAM, STATUS_PARAM, StatusFilter, TaskFilter};
pub use history::{HistoryGroup, group_history};
pub use refresh::{DEFAULT_GRACE_PERIOD, DEFAULT_REFRESH_INTERVAL, RefreshGate};
pub use view::{Board, DEFAULT_MOVE_TIMEOUT, MoveOutcome, MoveTicket, drag_notes};
