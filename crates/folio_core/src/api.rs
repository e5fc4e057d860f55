//! Typed query/mutation boundary over the resource store.
//!
//! # Responsibility
//! - Expose list/get/create/update/delete per resource kind.
//! - Map every store failure to `NotFound`, `Validation` or `Unavailable`.
//! - Log internal failure detail; hand callers only a safe message.
//!
//! # Invariants
//! - Storage error text never appears in an `ApiError`.
//! - Each call acquires the shared connection independently; a failure
//!   affects that call only.

use crate::db::StoreHandle;
use crate::model::experience::{Experience, ExperienceInput};
use crate::model::portfolio::{Portfolio, PortfolioInput};
use crate::model::{ResourceId, ResourceKind};
use crate::repo::{
    RepoError, RepoResult, ResourceRepository, SqliteExperienceRepository,
    SqlitePortfolioRepository,
};
use crate::validation::ValidationError;
use log::{debug, error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub type ApiResult<T> = Result<T, ApiError>;

/// Caller-facing error with a safe message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The referenced id does not exist (any more).
    NotFound { kind: ResourceKind },
    /// Input failed schema rules or storage constraints.
    Validation(ValidationError),
    /// Storage is unreachable or failed internally.
    Unavailable,
}

impl ApiError {
    /// Message safe to render in the UI.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { kind } => format!("{} not found", kind.display_name()),
            Self::Validation(err) => format!("Invalid input: {err}"),
            Self::Unavailable => "Storage is unavailable, please try again".to_string(),
        }
    }

    /// Field errors when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } | Self::Unavailable => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl Error for ApiError {}

/// Operation verbs of the closed API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVerb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// One of the ten operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiOperation {
    pub verb: ApiVerb,
    pub kind: ResourceKind,
}

impl ApiOperation {
    pub const fn new(verb: ApiVerb, kind: ResourceKind) -> Self {
        Self { verb, kind }
    }

    /// Stable operation name, e.g. `list_portfolios` or `update_experience`.
    pub fn name(self) -> &'static str {
        use ApiVerb::{Create, Delete, Get, List, Update};
        use ResourceKind::{Experience, Portfolio};
        match (self.verb, self.kind) {
            (List, Portfolio) => "list_portfolios",
            (Get, Portfolio) => "get_portfolio",
            (Create, Portfolio) => "create_portfolio",
            (Update, Portfolio) => "update_portfolio",
            (Delete, Portfolio) => "delete_portfolio",
            (List, Experience) => "list_experiences",
            (Get, Experience) => "get_experience",
            (Create, Experience) => "create_experience",
            (Update, Experience) => "update_experience",
            (Delete, Experience) => "delete_experience",
        }
    }
}

/// Per-kind query/mutation contract consumed by the client layer.
pub trait ResourceApi {
    type Input;
    type Record;

    const KIND: ResourceKind;

    fn list(&self) -> ApiResult<Vec<Self::Record>>;
    fn get(&self, id: ResourceId) -> ApiResult<Self::Record>;
    fn create(&self, input: &Self::Input) -> ApiResult<Self::Record>;
    fn update(&self, id: ResourceId, input: &Self::Input) -> ApiResult<Self::Record>;
    fn delete(&self, id: ResourceId) -> ApiResult<bool>;
}

/// Entry point of the API; owns a reference to the shared store handle.
#[derive(Clone)]
pub struct StoreApi {
    handle: Arc<StoreHandle>,
}

impl StoreApi {
    pub fn new(handle: Arc<StoreHandle>) -> Self {
        Self { handle }
    }

    pub fn portfolios(&self) -> PortfolioApi<'_> {
        PortfolioApi { store: self }
    }

    pub fn experiences(&self) -> ExperienceApi<'_> {
        ExperienceApi { store: self }
    }

    fn run<T>(
        &self,
        op: ApiOperation,
        call: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> ApiResult<T> {
        let started_at = Instant::now();
        match self.handle.with_connection(call) {
            Ok(value) => {
                debug!(
                    "event=api_call module=api op={} status=ok duration_ms={}",
                    op.name(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => Err(map_repo_error(op, err, started_at)),
        }
    }
}

fn map_repo_error(op: ApiOperation, err: RepoError, started_at: Instant) -> ApiError {
    let duration_ms = started_at.elapsed().as_millis();
    let op_name = op.name();
    match err {
        RepoError::NotFound { kind, id } => {
            info!(
                "event=api_call module=api op={op_name} status=not_found id={id} duration_ms={duration_ms}"
            );
            ApiError::NotFound { kind }
        }
        RepoError::Validation(err) => {
            info!(
                "event=api_call module=api op={op_name} status=invalid fields={} duration_ms={duration_ms}",
                err.fields().len()
            );
            ApiError::Validation(err)
        }
        RepoError::Unavailable(err) => {
            error!(
                "event=api_call module=api op={op_name} status=error error_code=store_unavailable duration_ms={duration_ms} error={err}"
            );
            ApiError::Unavailable
        }
        RepoError::Db(err) => {
            error!(
                "event=api_call module=api op={op_name} status=error error_code=store_query_failed duration_ms={duration_ms} error={err}"
            );
            ApiError::Unavailable
        }
        RepoError::InvalidData(message) => {
            error!(
                "event=api_call module=api op={op_name} status=error error_code=invalid_persisted_data duration_ms={duration_ms} error={message}"
            );
            ApiError::Unavailable
        }
    }
}

fn found<T>(record: Option<T>, kind: ResourceKind, id: ResourceId) -> RepoResult<T> {
    record.ok_or(RepoError::NotFound { kind, id })
}

/// Portfolio operations.
#[derive(Clone, Copy)]
pub struct PortfolioApi<'a> {
    store: &'a StoreApi,
}

impl PortfolioApi<'_> {
    fn op(verb: ApiVerb) -> ApiOperation {
        ApiOperation::new(verb, ResourceKind::Portfolio)
    }
}

impl ResourceApi for PortfolioApi<'_> {
    type Input = PortfolioInput;
    type Record = Portfolio;

    const KIND: ResourceKind = ResourceKind::Portfolio;

    fn list(&self) -> ApiResult<Vec<Portfolio>> {
        self.store.run(Self::op(ApiVerb::List), |conn| {
            SqlitePortfolioRepository::new(conn).list_all()
        })
    }

    fn get(&self, id: ResourceId) -> ApiResult<Portfolio> {
        self.store.run(Self::op(ApiVerb::Get), |conn| {
            found(SqlitePortfolioRepository::new(conn).get_by_id(id)?, Self::KIND, id)
        })
    }

    fn create(&self, input: &PortfolioInput) -> ApiResult<Portfolio> {
        self.store.run(Self::op(ApiVerb::Create), |conn| {
            SqlitePortfolioRepository::new(conn).create(input)
        })
    }

    fn update(&self, id: ResourceId, input: &PortfolioInput) -> ApiResult<Portfolio> {
        self.store.run(Self::op(ApiVerb::Update), |conn| {
            SqlitePortfolioRepository::new(conn).update_by_id(id, input)
        })
    }

    fn delete(&self, id: ResourceId) -> ApiResult<bool> {
        self.store.run(Self::op(ApiVerb::Delete), |conn| {
            SqlitePortfolioRepository::new(conn).delete_by_id(id)
        })
    }
}

/// Experience operations.
#[derive(Clone, Copy)]
pub struct ExperienceApi<'a> {
    store: &'a StoreApi,
}

impl ExperienceApi<'_> {
    fn op(verb: ApiVerb) -> ApiOperation {
        ApiOperation::new(verb, ResourceKind::Experience)
    }
}

impl ResourceApi for ExperienceApi<'_> {
    type Input = ExperienceInput;
    type Record = Experience;

    const KIND: ResourceKind = ResourceKind::Experience;

    fn list(&self) -> ApiResult<Vec<Experience>> {
        self.store.run(Self::op(ApiVerb::List), |conn| {
            SqliteExperienceRepository::new(conn).list_all()
        })
    }

    fn get(&self, id: ResourceId) -> ApiResult<Experience> {
        self.store.run(Self::op(ApiVerb::Get), |conn| {
            found(SqliteExperienceRepository::new(conn).get_by_id(id)?, Self::KIND, id)
        })
    }

    fn create(&self, input: &ExperienceInput) -> ApiResult<Experience> {
        self.store.run(Self::op(ApiVerb::Create), |conn| {
            SqliteExperienceRepository::new(conn).create(input)
        })
    }

    fn update(&self, id: ResourceId, input: &ExperienceInput) -> ApiResult<Experience> {
        self.store.run(Self::op(ApiVerb::Update), |conn| {
            SqliteExperienceRepository::new(conn).update_by_id(id, input)
        })
    }

    fn delete(&self, id: ResourceId) -> ApiResult<bool> {
        self.store.run(Self::op(ApiVerb::Delete), |conn| {
            SqliteExperienceRepository::new(conn).delete_by_id(id)
        })
    }
}
