//! Portfolio project record.
//!
//! # Invariants
//! - `title` and `description` are non-empty after trimming.
//! - URL fields are either absent or syntactically valid absolute URLs.
//! - `technologies` is non-empty and holds trimmed, non-blank entries in
//!   caller order.

use super::{Resource, ResourceId};
use crate::validation::{FieldCheck, ValidationError};
use serde::{Deserialize, Serialize};

/// Client-supplied portfolio fields used by create and full update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInput {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl PortfolioInput {
    /// Checks the input without consuming it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.clone().into_validated().map(|_| ())
    }

    /// Trims text fields, drops blank URLs and technologies, then validates.
    ///
    /// Returns the normalized input that the store persists.
    pub fn into_validated(self) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::default();
        let normalized = Self {
            title: check.required("title", "Title", &self.title),
            description: check.required("description", "Description", &self.description),
            image_url: check.optional_url("imageUrl", self.image_url.as_deref()),
            project_url: check.optional_url("projectUrl", self.project_url.as_deref()),
            github_url: check.optional_url("githubUrl", self.github_url.as_deref()),
            technologies: check.technologies(self.technologies.iter().map(String::as_str)),
            featured: self.featured,
        };
        check.finish(normalized)
    }
}

/// Persisted portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
    /// Unix epoch milliseconds, assigned on create.
    pub created_at: i64,
    /// Unix epoch milliseconds, strictly increasing across updates.
    pub updated_at: i64,
}

impl Portfolio {
    /// Returns the client-editable part of this record.
    pub fn to_input(&self) -> PortfolioInput {
        PortfolioInput {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            project_url: self.project_url.clone(),
            github_url: self.github_url.clone(),
            technologies: self.technologies.clone(),
            featured: self.featured,
        }
    }
}

impl Resource for Portfolio {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn technologies(&self) -> &[String] {
        &self.technologies
    }
}
