//! Task tracking for taskflow.
//!
//! Tasks move through a fixed six-stage workflow. Each status change is
//! validated, either sequentially or as an explicit drag-and-drop override,
//! and recorded in an append-only history together with the new status.
//! Every task carries a pull request checklist that gates the move from
//! review to done, plus free-text pull request metadata. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
