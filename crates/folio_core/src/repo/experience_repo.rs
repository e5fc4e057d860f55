//! Experience store backed by the `experiences` table.
//!
//! # Invariants
//! - Listing order is `start_date DESC` (most recent role first), newest
//!   insert first on ties.
//! - A current role is always persisted without an end date.

use super::{
    bool_to_int, decode_technologies, encode_technologies, format_date, int_to_bool, now_millis,
    parse_date, parse_id, RepoError, RepoResult, ResourceRepository,
};
use crate::model::experience::{Experience, ExperienceInput};
use crate::model::{ResourceId, ResourceKind};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const EXPERIENCE_SELECT_SQL: &str = "SELECT
    id,
    title,
    company,
    location,
    start_date,
    end_date,
    current,
    description,
    technologies,
    created_at,
    updated_at
FROM experiences";

/// SQLite-backed experience repository.
pub struct SqliteExperienceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExperienceRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ResourceRepository for SqliteExperienceRepository<'_> {
    type Input = ExperienceInput;
    type Record = Experience;

    fn create(&self, input: &ExperienceInput) -> RepoResult<Experience> {
        let input = input.clone().into_validated()?;
        let id = Uuid::new_v4();
        let now = now_millis();

        self.conn.execute(
            "INSERT INTO experiences (
                id,
                title,
                company,
                location,
                start_date,
                end_date,
                current,
                description,
                technologies,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10);",
            params![
                id.to_string(),
                input.title.as_str(),
                input.company.as_str(),
                input.location.as_str(),
                format_date(input.start_date),
                input.end_date.map(format_date),
                bool_to_int(input.current),
                input.description.as_str(),
                encode_technologies(&input.technologies)?,
                now,
            ],
        )?;

        Ok(Experience {
            id,
            title: input.title,
            company: input.company,
            location: input.location,
            start_date: input.start_date,
            end_date: input.end_date,
            current: input.current,
            description: input.description,
            technologies: input.technologies,
            created_at: now,
            updated_at: now,
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Experience>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EXPERIENCE_SELECT_SQL} ORDER BY start_date DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut experiences = Vec::new();
        while let Some(row) = rows.next()? {
            experiences.push(parse_experience_row(row)?);
        }
        Ok(experiences)
    }

    fn get_by_id(&self, id: ResourceId) -> RepoResult<Option<Experience>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EXPERIENCE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_experience_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_by_id(&self, id: ResourceId, input: &ExperienceInput) -> RepoResult<Experience> {
        let input = input.clone().into_validated()?;

        let changed = self.conn.execute(
            "UPDATE experiences
             SET
                title = ?2,
                company = ?3,
                location = ?4,
                start_date = ?5,
                end_date = ?6,
                current = ?7,
                description = ?8,
                technologies = ?9,
                updated_at = MAX(?10, updated_at + 1)
             WHERE id = ?1;",
            params![
                id.to_string(),
                input.title.as_str(),
                input.company.as_str(),
                input.location.as_str(),
                format_date(input.start_date),
                input.end_date.map(format_date),
                bool_to_int(input.current),
                input.description.as_str(),
                encode_technologies(&input.technologies)?,
                now_millis(),
            ],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        self.get_by_id(id)?.ok_or_else(|| not_found(id))
    }

    fn delete_by_id(&self, id: ResourceId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM experiences WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(true)
    }
}

fn not_found(id: ResourceId) -> RepoError {
    RepoError::NotFound {
        kind: ResourceKind::Experience,
        id,
    }
}

fn parse_experience_row(row: &Row<'_>) -> RepoResult<Experience> {
    let id_text: String = row.get("id")?;
    let start_text: String = row.get("start_date")?;
    let end_text: Option<String> = row.get("end_date")?;
    let technologies_text: String = row.get("technologies")?;
    let current = int_to_bool(row.get("current")?, "experiences.current")?;

    let end_date = match end_text {
        Some(value) => Some(parse_date(&value, "experiences.end_date")?),
        None => None,
    };
    if current && end_date.is_some() {
        return Err(RepoError::InvalidData(format!(
            "current experience `{id_text}` carries an end date"
        )));
    }

    Ok(Experience {
        id: parse_id(&id_text, "experiences")?,
        title: row.get("title")?,
        company: row.get("company")?,
        location: row.get("location")?,
        start_date: parse_date(&start_text, "experiences.start_date")?,
        end_date,
        current,
        description: row.get("description")?,
        technologies: decode_technologies(&technologies_text, "experiences")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
