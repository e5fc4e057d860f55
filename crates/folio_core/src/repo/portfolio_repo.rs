//! Portfolio store backed by the `portfolios` table.
//!
//! # Invariants
//! - Listing order is `created_at DESC`, newest insert first on ties.
//! - Update bumps `updated_at` strictly and never touches `id`/`created_at`.

use super::{
    bool_to_int, decode_technologies, encode_technologies, int_to_bool, now_millis, parse_id,
    RepoError, RepoResult, ResourceRepository,
};
use crate::model::portfolio::{Portfolio, PortfolioInput};
use crate::model::{ResourceId, ResourceKind};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PORTFOLIO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    image_url,
    project_url,
    github_url,
    technologies,
    featured,
    created_at,
    updated_at
FROM portfolios";

/// SQLite-backed portfolio repository.
pub struct SqlitePortfolioRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePortfolioRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ResourceRepository for SqlitePortfolioRepository<'_> {
    type Input = PortfolioInput;
    type Record = Portfolio;

    fn create(&self, input: &PortfolioInput) -> RepoResult<Portfolio> {
        let input = input.clone().into_validated()?;
        let id = Uuid::new_v4();
        let now = now_millis();

        self.conn.execute(
            "INSERT INTO portfolios (
                id,
                title,
                description,
                image_url,
                project_url,
                github_url,
                technologies,
                featured,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9);",
            params![
                id.to_string(),
                input.title.as_str(),
                input.description.as_str(),
                input.image_url.as_deref(),
                input.project_url.as_deref(),
                input.github_url.as_deref(),
                encode_technologies(&input.technologies)?,
                bool_to_int(input.featured),
                now,
            ],
        )?;

        Ok(Portfolio {
            id,
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            project_url: input.project_url,
            github_url: input.github_url,
            technologies: input.technologies,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Portfolio>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PORTFOLIO_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut portfolios = Vec::new();
        while let Some(row) = rows.next()? {
            portfolios.push(parse_portfolio_row(row)?);
        }
        Ok(portfolios)
    }

    fn get_by_id(&self, id: ResourceId) -> RepoResult<Option<Portfolio>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PORTFOLIO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_portfolio_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_by_id(&self, id: ResourceId, input: &PortfolioInput) -> RepoResult<Portfolio> {
        let input = input.clone().into_validated()?;

        let changed = self.conn.execute(
            "UPDATE portfolios
             SET
                title = ?2,
                description = ?3,
                image_url = ?4,
                project_url = ?5,
                github_url = ?6,
                technologies = ?7,
                featured = ?8,
                updated_at = MAX(?9, updated_at + 1)
             WHERE id = ?1;",
            params![
                id.to_string(),
                input.title.as_str(),
                input.description.as_str(),
                input.image_url.as_deref(),
                input.project_url.as_deref(),
                input.github_url.as_deref(),
                encode_technologies(&input.technologies)?,
                bool_to_int(input.featured),
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
            .execute("DELETE FROM portfolios WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(true)
    }
}

fn not_found(id: ResourceId) -> RepoError {
    RepoError::NotFound {
        kind: ResourceKind::Portfolio,
        id,
    }
}

fn parse_portfolio_row(row: &Row<'_>) -> RepoResult<Portfolio> {
    let id_text: String = row.get("id")?;
    let technologies_text: String = row.get("technologies")?;

    Ok(Portfolio {
        id: parse_id(&id_text, "portfolios")?,
        title: row.get("title")?,
        description: row.get("description")?,
        image_url: row.get("image_url")?,
        project_url: row.get("project_url")?,
        github_url: row.get("github_url")?,
        technologies: decode_technologies(&technologies_text, "portfolios")?,
        featured: int_to_bool(row.get("featured")?, "portfolios.featured")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
