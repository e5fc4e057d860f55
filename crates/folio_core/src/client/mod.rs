//! Client-side view state kept consistent with the store.
//!
//! # Responsibility
//! - Track list-view loading state per resource kind.
//! - Re-issue the list query after every mutation (invalidate-and-refetch).
//! - Load dashboard aggregates with a best-effort fallback.
//!
//! # Invariants
//! - Views never patch their data locally; the store's post-mutation state
//!   is always re-read.
//! - A refetch is only issued after the mutation result is observed.

pub mod coordinator;
pub mod dashboard;
pub mod list_view;

pub use coordinator::RefetchCoordinator;
pub use dashboard::{load_dashboard_stats, stats_from_views};
pub use list_view::{ListState, ListView};
