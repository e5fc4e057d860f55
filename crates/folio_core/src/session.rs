//! Edit/create session for one resource form.
//!
//! # Responsibility
//! - Decide whether a submit creates a new record or updates the selected
//!   one.
//! - Seed form fields from the selected record and clear them afterwards.
//!
//! # Invariants
//! - While `Editing(id)`, submit always updates `id`; while `Creating`,
//!   submit always creates.
//! - Selecting another record replaces the target and all fields; nothing
//!   from the previous target survives.
//! - Invalid forms never reach the API.

use crate::api::{ApiError, ResourceApi};
use crate::client::RefetchCoordinator;
use crate::model::{Resource, ResourceId};
use crate::validation::{ResourceForm, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whether the form targets a new or an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Creating,
    Editing(ResourceId),
}

/// Failure of one submit attempt; the session keeps its state and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Validation(ValidationError),
    Api(ApiError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Api(err) => Some(err),
        }
    }
}

impl From<ApiError> for SubmitError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

/// Form state plus its create/edit target.
#[derive(Debug, Clone)]
pub struct EditSession<F: ResourceForm> {
    state: SessionState,
    form: F,
}

impl<F: ResourceForm> Default for EditSession<F> {
    fn default() -> Self {
        Self {
            state: SessionState::Creating,
            form: F::default(),
        }
    }
}

impl<F: ResourceForm> EditSession<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable access for field edits made by the operator.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Heading label for the form.
    pub fn mode_label(&self) -> &'static str {
        match self.state {
            SessionState::Creating => "Create",
            SessionState::Editing(_) => "Edit",
        }
    }

    /// Targets `record` and re-seeds every field from it.
    pub fn select_for_edit(&mut self, record: &F::Record) {
        self.state = SessionState::Editing(record.id());
        self.form = F::seed(record);
    }

    /// Drops the target and clears all fields.
    pub fn cancel(&mut self) {
        self.state = SessionState::Creating;
        self.form = F::default();
    }

    /// Validates the form and routes it to create or update.
    ///
    /// On success the session returns to `Creating` with cleared fields and
    /// the coordinator has refetched its list.
    pub fn submit<A>(
        &mut self,
        coordinator: &mut RefetchCoordinator<A>,
    ) -> Result<F::Record, SubmitError>
    where
        A: ResourceApi<Input = F::Input, Record = F::Record>,
    {
        let input = self.form.validate().map_err(SubmitError::Validation)?;
        let saved = match self.state {
            SessionState::Creating => coordinator.create(&input)?,
            SessionState::Editing(id) => coordinator.update(id, &input)?,
        };
        self.cancel();
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSession, SessionState};
    use crate::model::portfolio::Portfolio;
    use crate::validation::PortfolioForm;
    use uuid::Uuid;

    fn record(title: &str, image_url: Option<&str>) -> Portfolio {
        Portfolio {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} description"),
            image_url: image_url.map(str::to_string),
            project_url: None,
            github_url: None,
            technologies: vec!["Rust".to_string(), "SQLite".to_string()],
            featured: true,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn starts_in_creating_with_empty_fields() {
        let session: EditSession<PortfolioForm> = EditSession::new();
        assert_eq!(session.state(), SessionState::Creating);
        assert_eq!(session.form(), &PortfolioForm::default());
        assert_eq!(session.mode_label(), "Create");
    }

    #[test]
    fn selecting_another_record_replaces_target_and_fields() {
        let first = record("First", Some("https://img.example.com/a.png"));
        let second = record("Second", None);
        let mut session: EditSession<PortfolioForm> = EditSession::new();

        session.select_for_edit(&first);
        assert_eq!(session.state(), SessionState::Editing(first.id));
        assert_eq!(session.form().technologies, "Rust, SQLite");
        session.form_mut().title = "First (draft)".to_string();

        session.select_for_edit(&second);
        assert_eq!(session.state(), SessionState::Editing(second.id));
        assert_eq!(session.form().title, "Second");
        assert_eq!(session.form().image_url, "");
        assert_eq!(session.mode_label(), "Edit");
    }

    #[test]
    fn cancel_clears_target_and_fields() {
        let mut session: EditSession<PortfolioForm> = EditSession::new();
        session.select_for_edit(&record("First", None));
        session.cancel();
        assert_eq!(session.state(), SessionState::Creating);
        assert_eq!(session.form(), &PortfolioForm::default());
    }
}
