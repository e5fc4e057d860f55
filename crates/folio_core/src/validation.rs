//! Form validation for portfolio and experience input.
//!
//! # Responsibility
//! - Turn raw form text into normalized typed inputs.
//! - Report every violation keyed by form field, with a human-readable
//!   message.
//!
//! # Invariants
//! - Validation is pure and never panics for expected violations.
//! - Technologies are split on `,`, trimmed and blank-filtered; an empty
//!   result is a violation, never an empty list.
//! - A current role never carries an end date.

use crate::model::experience::{Experience, ExperienceInput};
use crate::model::portfolio::{Portfolio, PortfolioInput};
use crate::model::Resource;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TECHNOLOGIES_REQUIRED: &str = "At least one technology is required";
const INVALID_URL: &str = "Must be a valid URL";
const INVALID_DATE: &str = "Must be a valid date (YYYY-MM-DD)";
const END_BEFORE_START: &str = "End date must not be before start date";

/// Field name to message, ordered by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Input rejected by schema rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: FieldErrors,
}

impl ValidationError {
    /// Builds an error carrying one field message.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message.into());
        Self { errors }
    }

    /// Message for one field, if that field failed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &FieldErrors {
        &self.errors
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Accumulates field violations while normalizing values.
///
/// Each check returns the normalized value (or a neutral placeholder on
/// failure) so callers can build the target struct in one pass and call
/// [`FieldCheck::finish`] at the end.
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    /// Required text: trimmed, must be non-empty.
    pub fn required(&mut self, field: &'static str, label: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(field, format!("{label} is required"));
        }
        trimmed.to_string()
    }

    /// Optional absolute URL; blank means absent.
    pub fn optional_url(&mut self, field: &'static str, value: Option<&str>) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|value| !value.is_empty())?;
        if !is_absolute_url(trimmed) {
            self.fail(field, INVALID_URL);
        }
        Some(trimmed.to_string())
    }

    /// Trims and drops blank entries, keeping caller order.
    pub fn technologies<'a>(&mut self, entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let technologies = normalize_technologies(entries);
        if technologies.is_empty() {
            self.fail("technologies", TECHNOLOGIES_REQUIRED);
        }
        technologies
    }

    /// Parses a `YYYY-MM-DD` date; blank input yields `None` without error.
    pub fn optional_date(&mut self, field: &'static str, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, INVALID_DATE);
                None
            }
        }
    }

    /// Parses a required `YYYY-MM-DD` date.
    pub fn required_date(
        &mut self,
        field: &'static str,
        label: &str,
        value: &str,
    ) -> Option<NaiveDate> {
        if value.trim().is_empty() {
            self.fail(field, format!("{label} is required"));
            return None;
        }
        self.optional_date(field, value)
    }

    /// Rejects an end date that precedes the start date.
    pub fn date_order(&mut self, start: NaiveDate, end: Option<NaiveDate>) {
        if end.is_some_and(|end| end < start) {
            self.fail("endDate", END_BEFORE_START);
        }
    }

    /// Returns `value` when no check failed.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        // First violation per field wins.
        self.errors.entry(field).or_insert_with(|| message.into());
    }
}

/// Trims every entry and drops blanks, preserving order.
pub fn normalize_technologies<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a comma-separated technologies field.
pub fn parse_technologies(raw: &str) -> Vec<String> {
    normalize_technologies(raw.split(','))
}

fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// A raw form that edits one resource kind.
pub trait ResourceForm: Default + Clone {
    type Input;
    type Record: Resource;

    /// Form fields populated from an existing record.
    fn seed(record: &Self::Record) -> Self;

    /// Validates the raw fields into a typed input.
    fn validate(&self) -> Result<Self::Input, ValidationError>;
}

/// Raw portfolio form fields as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioForm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub project_url: String,
    pub github_url: String,
    /// Comma-separated, e.g. `"React, TypeScript"`.
    pub technologies: String,
    pub featured: bool,
}

impl ResourceForm for PortfolioForm {
    type Input = PortfolioInput;
    type Record = Portfolio;

    fn seed(record: &Portfolio) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            image_url: record.image_url.clone().unwrap_or_default(),
            project_url: record.project_url.clone().unwrap_or_default(),
            github_url: record.github_url.clone().unwrap_or_default(),
            technologies: record.technologies.join(", "),
            featured: record.featured,
        }
    }

    fn validate(&self) -> Result<PortfolioInput, ValidationError> {
        let mut check = FieldCheck::default();
        let input = PortfolioInput {
            title: check.required("title", "Title", &self.title),
            description: check.required("description", "Description", &self.description),
            image_url: check.optional_url("imageUrl", Some(self.image_url.as_str())),
            project_url: check.optional_url("projectUrl", Some(self.project_url.as_str())),
            github_url: check.optional_url("githubUrl", Some(self.github_url.as_str())),
            technologies: check.technologies(self.technologies.split(',')),
            featured: self.featured,
        };
        check.finish(input)
    }
}

/// Raw experience form fields as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceForm {
    pub title: String,
    pub company: String,
    pub location: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`, or blank when open-ended.
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub technologies: String,
}

impl ResourceForm for ExperienceForm {
    type Input = ExperienceInput;
    type Record = Experience;

    fn seed(record: &Experience) -> Self {
        Self {
            title: record.title.clone(),
            company: record.company.clone(),
            location: record.location.clone(),
            start_date: record.start_date.format(DATE_FORMAT).to_string(),
            end_date: record
                .end_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            current: record.current,
            description: record.description.clone(),
            technologies: record.technologies.join(", "),
        }
    }

    fn validate(&self) -> Result<ExperienceInput, ValidationError> {
        let mut check = FieldCheck::default();
        let title = check.required("title", "Title", &self.title);
        let company = check.required("company", "Company", &self.company);
        let location = check.required("location", "Location", &self.location);
        let start_date = check.required_date("startDate", "Start date", &self.start_date);
        let end_date = if self.current {
            None
        } else {
            check.optional_date("endDate", &self.end_date)
        };
        if let Some(start) = start_date {
            check.date_order(start, end_date);
        }
        let description = check.required("description", "Description", &self.description);
        let technologies = check.technologies(self.technologies.split(','));

        match (check.finish(()), start_date) {
            (Ok(()), Some(start_date)) => Ok(ExperienceInput {
                title,
                company,
                location,
                start_date,
                end_date,
                current: self.current,
                description,
                technologies,
            }),
            (Err(err), _) => Err(err),
            (Ok(()), None) => Err(ValidationError::single("startDate", "Start date is required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_technologies, ExperienceForm, PortfolioForm, ResourceForm};
    use chrono::NaiveDate;

    fn portfolio_form() -> PortfolioForm {
        PortfolioForm {
            title: "Folio".to_string(),
            description: "Portfolio manager".to_string(),
            technologies: "Rust".to_string(),
            ..PortfolioForm::default()
        }
    }

    fn experience_form() -> ExperienceForm {
        ExperienceForm {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: "2022-07-01".to_string(),
            current: false,
            description: "Platform work".to_string(),
            technologies: "Go, TS".to_string(),
        }
    }

    #[test]
    fn technologies_are_split_trimmed_and_filtered() {
        assert_eq!(
            parse_technologies("React, TypeScript,  Node.js "),
            vec!["React", "TypeScript", "Node.js"]
        );
    }

    #[test]
    fn blank_technologies_are_rejected() {
        let form = PortfolioForm {
            technologies: " , ,".to_string(),
            ..portfolio_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.field("technologies"),
            Some("At least one technology is required")
        );
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let form = PortfolioForm {
            title: "   ".to_string(),
            description: String::new(),
            ..portfolio_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field("title"), Some("Title is required"));
        assert_eq!(err.field("description"), Some("Description is required"));
        assert_eq!(err.fields().len(), 2);
    }

    #[test]
    fn empty_url_means_absent_and_bad_url_fails() {
        let ok = portfolio_form().validate().unwrap();
        assert_eq!(ok.project_url, None);

        let form = PortfolioForm {
            project_url: "not a url".to_string(),
            image_url: "https://cdn.example.com/cover.png".to_string(),
            ..portfolio_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field("projectUrl"), Some("Must be a valid URL"));
        assert_eq!(err.field("imageUrl"), None);
    }

    #[test]
    fn current_experience_ignores_typed_end_date() {
        let form = ExperienceForm {
            current: true,
            end_date: "not even a date".to_string(),
            ..experience_form()
        };
        let input = form.validate().unwrap();
        assert!(input.current);
        assert_eq!(input.end_date, None);
    }

    #[test]
    fn experience_dates_must_parse_and_be_ordered() {
        let form = ExperienceForm {
            start_date: "01/02/2020".to_string(),
            ..experience_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.field("startDate"),
            Some("Must be a valid date (YYYY-MM-DD)")
        );

        let reversed = ExperienceForm {
            end_date: "2019-12-31".to_string(),
            ..experience_form()
        };
        let err = reversed.validate().unwrap_err();
        assert!(err.field("endDate").is_some());
    }

    #[test]
    fn missing_start_date_is_required_error() {
        let form = ExperienceForm {
            start_date: " ".to_string(),
            ..experience_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field("startDate"), Some("Start date is required"));
    }

    #[test]
    fn valid_experience_form_produces_typed_input() {
        let input = experience_form().validate().unwrap();
        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(input.end_date, NaiveDate::from_ymd_opt(2022, 7, 1));
        assert_eq!(input.technologies, vec!["Go", "TS"]);
    }
}
