//! Work-experience record.
//!
//! # Invariants
//! - `title`, `company`, `location` and `description` are non-empty after
//!   trimming.
//! - `current == true` implies `end_date` is absent once persisted.
//! - A present `end_date` is never before `start_date`.

use super::{Resource, ResourceId};
use crate::validation::{FieldCheck, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Client-supplied experience fields used by create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: String,
    pub technologies: Vec<String>,
}

impl ExperienceInput {
    /// End date as it will be persisted: ignored for current roles.
    pub fn effective_end_date(&self) -> Option<NaiveDate> {
        if self.current {
            None
        } else {
            self.end_date
        }
    }

    /// Checks the input without consuming it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.clone().into_validated().map(|_| ())
    }

    /// Trims text fields, clears `end_date` for current roles, drops blank
    /// technologies, then validates.
    pub fn into_validated(self) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::default();
        let end_date = self.effective_end_date();
        check.date_order(self.start_date, end_date);
        let normalized = Self {
            title: check.required("title", "Title", &self.title),
            company: check.required("company", "Company", &self.company),
            location: check.required("location", "Location", &self.location),
            start_date: self.start_date,
            end_date,
            current: self.current,
            description: check.required("description", "Description", &self.description),
            technologies: check.technologies(self.technologies.iter().map(String::as_str)),
        };
        check.finish(normalized)
    }
}

/// Persisted work-experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: ResourceId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub description: String,
    pub technologies: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Experience {
    /// Returns the client-editable part of this record.
    pub fn to_input(&self) -> ExperienceInput {
        ExperienceInput {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            description: self.description.clone(),
            technologies: self.technologies.clone(),
        }
    }
}

impl Resource for Experience {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn technologies(&self) -> &[String] {
        &self.technologies
    }
}
