//! Resource store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the per-kind store contract (`ResourceRepository`).
//! - Isolate SQL details from the API and client layers.
//!
//! # Invariants
//! - Write paths normalize and validate input before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Missing ids surface as `NotFound`, distinct from storage failures.

pub mod experience_repo;
pub mod portfolio_repo;

use crate::db::DbError;
use crate::model::{ResourceId, ResourceKind};
use crate::validation::ValidationError;
use chrono::{NaiveDate, Utc};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub use experience_repo::SqliteExperienceRepository;
pub use portfolio_repo::SqlitePortfolioRepository;

const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error for resource persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed schema rules or a storage constraint.
    Validation(ValidationError),
    /// The store connection could not be established.
    Unavailable(DbError),
    /// A statement failed on an established connection.
    Db(DbError),
    NotFound {
        kind: ResourceKind,
        id: ResourceId,
    },
    /// Persisted row cannot be decoded into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Unavailable(err) => write!(f, "store unavailable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unavailable(err) | Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Connection-level failures, as raised by `StoreHandle`.
impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

/// Statement-level failures; constraint violations count as invalid input.
impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::Validation(ValidationError::single(
                "record",
                "Record violates a storage constraint",
            ));
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Per-kind store contract.
///
/// Implementations borrow an open connection; the caller owns connection
/// lifecycle (see `StoreHandle`).
pub trait ResourceRepository {
    type Input;
    type Record;

    /// Persists a new record; the store assigns id and timestamps.
    fn create(&self, input: &Self::Input) -> RepoResult<Self::Record>;
    /// Returns every record in the kind's display order.
    fn list_all(&self) -> RepoResult<Vec<Self::Record>>;
    fn get_by_id(&self, id: ResourceId) -> RepoResult<Option<Self::Record>>;
    /// Replaces all client-editable fields of an existing record.
    fn update_by_id(&self, id: ResourceId, input: &Self::Input) -> RepoResult<Self::Record>;
    /// Hard-deletes one record; a missing id is `NotFound`.
    fn delete_by_id(&self, id: ResourceId) -> RepoResult<bool>;
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn parse_id(value: &str, table: &str) -> RepoResult<ResourceId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id `{value}` in {table}.id")))
}

pub(crate) fn encode_technologies(technologies: &[String]) -> RepoResult<String> {
    serde_json::to_string(technologies)
        .map_err(|err| RepoError::InvalidData(format!("technologies not encodable: {err}")))
}

pub(crate) fn decode_technologies(value: &str, table: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(value).map_err(|err| {
        RepoError::InvalidData(format!("invalid technologies in {table}.technologies: {err}"))
    })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(STORED_DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, STORED_DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
