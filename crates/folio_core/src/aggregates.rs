//! Derived aggregates over the current list snapshot.
//!
//! Everything here is pure and recomputed on every render; nothing is
//! persisted.

use crate::model::experience::Experience;
use crate::model::portfolio::Portfolio;
use crate::model::{Resource, ResourceKind};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// Summary counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub featured_projects: usize,
    /// Rounded share of featured projects; `None` without projects.
    pub featured_percent: Option<u32>,
    pub total_experiences: usize,
    pub current_jobs: usize,
    pub distinct_technologies: usize,
}

impl DashboardStats {
    pub fn compute(portfolios: &[Portfolio], experiences: &[Experience]) -> Self {
        let featured_projects = portfolios.iter().filter(|p| p.featured).count();
        Self {
            total_projects: portfolios.len(),
            featured_projects,
            featured_percent: percent(featured_projects, portfolios.len()),
            total_experiences: experiences.len(),
            current_jobs: experiences.iter().filter(|e| e.current).count(),
            distinct_technologies: distinct_technology_count(portfolios, experiences),
        }
    }
}

fn percent(part: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    // Round half up in integer arithmetic.
    let scaled = (part * 200 + total) / (total * 2);
    u32::try_from(scaled).ok()
}

/// Size of the union of all technologies; case-sensitive, no normalization.
pub fn distinct_technology_count(portfolios: &[Portfolio], experiences: &[Experience]) -> usize {
    let portfolio_techs = portfolios.iter().flat_map(|p| p.technologies());
    let experience_techs = experiences.iter().flat_map(|e| e.technologies());
    portfolio_techs
        .chain(experience_techs)
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .len()
}

/// Whole-month span of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tenure {
    pub months: u32,
}

impl Tenure {
    /// Computes the span from `start` to the effective end.
    ///
    /// The end is `today` for current roles or when `end` is absent. A span
    /// that would be negative (end before start) is clamped to zero.
    pub fn between(
        start: NaiveDate,
        end: Option<NaiveDate>,
        current: bool,
        today: NaiveDate,
    ) -> Self {
        let end = if current { today } else { end.unwrap_or(today) };
        let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
        Self {
            months: u32::try_from(months).unwrap_or(0),
        }
    }

    pub fn years(self) -> u32 {
        self.months / 12
    }

    pub fn remaining_months(self) -> u32 {
        self.months % 12
    }

    /// Human-readable span: `"2 years 6 months"`, `"1 year"`, `"0 months"`.
    pub fn display(self) -> String {
        let years = self.years();
        let months = self.remaining_months();
        match (years, months) {
            (0, months) => count_label(months as usize, "month"),
            (years, 0) => count_label(years as usize, "year"),
            (years, months) => format!(
                "{} {}",
                count_label(years as usize, "year"),
                count_label(months as usize, "month")
            ),
        }
    }
}

/// Tenure of an experience entry measured against `today`.
pub fn experience_tenure(experience: &Experience, today: NaiveDate) -> Tenure {
    Tenure::between(
        experience.start_date,
        experience.end_date,
        experience.current,
        today,
    )
}

/// `"January 2020 - Present"` or `"January 2020 - July 2022"`.
///
/// Open-ended entries that are not current render as `Present` too, matching
/// how their tenure is measured.
pub fn period_label(start: NaiveDate, end: Option<NaiveDate>, current: bool) -> String {
    let end = match end {
        Some(end) if !current => format_month_year(end),
        _ => "Present".to_string(),
    };
    format!("{} - {end}", format_month_year(start))
}

/// An experience record plus its display period and tenure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSummary<'a> {
    #[serde(flatten)]
    pub experience: &'a Experience,
    pub period: String,
    pub duration: String,
}

impl<'a> ExperienceSummary<'a> {
    /// Summarizes `experience` with tenure measured against `today`.
    pub fn at(experience: &'a Experience, today: NaiveDate) -> Self {
        Self {
            experience,
            period: period_label(experience.start_date, experience.end_date, experience.current),
            duration: experience_tenure(experience, today).display(),
        }
    }
}

/// Heading count for a listing: `"1 project"`, `"4 positions"`.
pub fn listing_count(kind: ResourceKind, count: usize) -> String {
    let noun = match kind {
        ResourceKind::Portfolio => "project",
        ResourceKind::Experience => "position",
    };
    count_label(count, noun)
}

/// Display duration for raw fields, e.g. `duration(start, Some(end), false, today)`.
pub fn duration(
    start: NaiveDate,
    end: Option<NaiveDate>,
    current: bool,
    today: NaiveDate,
) -> String {
    Tenure::between(start, end, current, today).display()
}

/// `"January 2020"` style label for list rows.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Count with a singular/plural noun: `"1 project"`, `"3 projects"`.
pub fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        count_label, distinct_technology_count, duration, format_month_year, listing_count,
        period_label, DashboardStats, ExperienceSummary, Tenure,
    };
    use crate::model::ResourceKind;
    use crate::model::experience::Experience;
    use crate::model::portfolio::Portfolio;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn portfolio(technologies: &[&str], featured: bool) -> Portfolio {
        Portfolio {
            id: Uuid::new_v4(),
            title: "Project".to_string(),
            description: "Description".to_string(),
            image_url: None,
            project_url: None,
            github_url: None,
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            featured,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn experience(technologies: &[&str], current: bool) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            start_date: date(2020, 1, 1),
            end_date: None,
            current,
            description: "Description".to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn duration_counts_whole_months() {
        let today = date(2030, 1, 1);
        assert_eq!(
            duration(date(2020, 1, 1), Some(date(2022, 7, 1)), false, today),
            "2 years 6 months"
        );
        assert_eq!(
            Tenure::between(date(2020, 1, 1), Some(date(2022, 7, 1)), false, today).months,
            30
        );
    }

    #[test]
    fn current_role_and_missing_end_measure_to_today() {
        let today = date(2024, 3, 15);
        let start = date(2023, 2, 1);
        assert_eq!(duration(start, Some(date(2023, 3, 1)), true, today), "1 year 1 month");
        assert_eq!(duration(start, None, false, today), "1 year 1 month");
    }

    #[test]
    fn end_before_start_clamps_to_zero() {
        let tenure = Tenure::between(
            date(2022, 5, 1),
            Some(date(2021, 5, 1)),
            false,
            date(2030, 1, 1),
        );
        assert_eq!(tenure.months, 0);
        assert_eq!(tenure.display(), "0 months");
    }

    #[test]
    fn singular_and_plural_labels() {
        assert_eq!(Tenure { months: 12 }.display(), "1 year");
        assert_eq!(Tenure { months: 1 }.display(), "1 month");
        assert_eq!(Tenure { months: 25 }.display(), "2 years 1 month");
        assert_eq!(count_label(1, "project"), "1 project");
        assert_eq!(count_label(0, "position"), "0 positions");
    }

    #[test]
    fn distinct_technologies_union_both_collections() {
        let portfolios = vec![portfolio(&["Go", "Rust"], false)];
        let experiences = vec![experience(&["Go", "TS"], false)];
        assert_eq!(distinct_technology_count(&portfolios, &experiences), 3);
    }

    #[test]
    fn distinct_technologies_are_case_sensitive() {
        let portfolios = vec![portfolio(&["rust", "Rust"], false)];
        assert_eq!(distinct_technology_count(&portfolios, &[]), 2);
    }

    #[test]
    fn dashboard_stats_count_featured_and_current() {
        let portfolios = vec![
            portfolio(&["Rust"], true),
            portfolio(&["Rust"], false),
            portfolio(&["Go"], false),
        ];
        let experiences = vec![experience(&["Go"], true), experience(&["SQL"], false)];
        let stats = DashboardStats::compute(&portfolios, &experiences);
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.featured_projects, 1);
        assert_eq!(stats.featured_percent, Some(33));
        assert_eq!(stats.total_experiences, 2);
        assert_eq!(stats.current_jobs, 1);
        assert_eq!(stats.distinct_technologies, 3);
    }

    #[test]
    fn empty_snapshot_yields_zeroed_stats() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn month_year_label() {
        assert_eq!(format_month_year(date(2020, 1, 15)), "January 2020");
    }

    #[test]
    fn period_label_uses_present_for_open_roles() {
        assert_eq!(
            period_label(date(2020, 1, 10), Some(date(2022, 7, 1)), false),
            "January 2020 - July 2022"
        );
        assert_eq!(period_label(date(2020, 1, 10), None, true), "January 2020 - Present");
        assert_eq!(period_label(date(2020, 1, 10), None, false), "January 2020 - Present");
    }

    #[test]
    fn experience_summary_serializes_record_with_derived_fields() {
        let mut role = experience(&["Go"], false);
        role.end_date = Some(date(2022, 7, 1));
        let summary = ExperienceSummary::at(&role, date(2030, 1, 1));

        assert_eq!(summary.period, "January 2020 - July 2022");
        assert_eq!(summary.duration, "2 years 6 months");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Engineer");
        assert_eq!(json["startDate"], "2020-01-01");
        assert_eq!(json["duration"], "2 years 6 months");
        assert_eq!(json["period"], "January 2020 - July 2022");
    }

    #[test]
    fn current_role_summary_measures_to_given_day() {
        let role = experience(&["Go"], true);
        let summary = ExperienceSummary::at(&role, date(2021, 2, 20));
        assert_eq!(summary.duration, "1 year 1 month");
        assert_eq!(summary.period, "January 2020 - Present");
    }

    #[test]
    fn listing_counts_use_kind_nouns() {
        assert_eq!(listing_count(ResourceKind::Portfolio, 1), "1 project");
        assert_eq!(listing_count(ResourceKind::Experience, 4), "4 positions");
    }
}
