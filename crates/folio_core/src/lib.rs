//! Core resource management for Folio.
//! This crate is the single source of truth for portfolio and experience
//! invariants; presentation layers only call into it.

pub mod aggregates;
pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod session;
pub mod validation;

pub use aggregates::{
    count_label, duration, experience_tenure, format_month_year, listing_count, period_label,
    DashboardStats, ExperienceSummary, Tenure,
};
pub use api::{ApiError, ApiOperation, ApiResult, ApiVerb, ResourceApi, StoreApi};
pub use client::{ListState, ListView, RefetchCoordinator};
pub use config::{AppConfig, ConfigError};
pub use db::{DbError, DbTarget, StoreHandle};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::experience::{Experience, ExperienceInput};
pub use model::portfolio::{Portfolio, PortfolioInput};
pub use model::{Resource, ResourceId, ResourceKind};
pub use repo::{RepoError, RepoResult, ResourceRepository};
pub use session::{EditSession, SessionState, SubmitError};
pub use validation::{ExperienceForm, PortfolioForm, ResourceForm, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
