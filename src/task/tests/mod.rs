//! Unit tests for task domain rules and lifecycle orchestration.
