//! List view state machine: `Idle -> Loading -> Loaded | Error`.

use crate::api::{ApiError, ApiResult};

/// Observable state of one list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<T> {
    /// Not mounted yet; no query issued.
    Idle,
    /// A query is in flight.
    Loading,
    Loaded(Vec<T>),
    Error(ApiError),
}

/// One list query and its latest outcome.
///
/// `begin_fetch` and `complete_fetch` are split so that an asynchronous
/// caller can suspend between issuing the request and observing the
/// response.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    state: ListState<T>,
    fetch_count: u64,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            state: ListState::Idle,
            fetch_count: 0,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Number of completed fetches, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    /// Loaded items, or `None` while idle, loading or failed.
    pub fn items(&self) -> Option<&[T]> {
        match &self.state {
            ListState::Loaded(items) => Some(items),
            ListState::Idle | ListState::Loading | ListState::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.state {
            ListState::Error(err) => Some(err),
            ListState::Idle | ListState::Loading | ListState::Loaded(_) => None,
        }
    }

    /// Marks a list query as issued. Previous data is discarded.
    pub fn begin_fetch(&mut self) {
        self.state = ListState::Loading;
    }

    /// Applies a query response.
    ///
    /// Returns `false` and ignores the response when no fetch is pending.
    pub fn complete_fetch(&mut self, result: ApiResult<Vec<T>>) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.state = match result {
            Ok(items) => ListState::Loaded(items),
            Err(err) => ListState::Error(err),
        };
        self.fetch_count += 1;
        true
    }
}
