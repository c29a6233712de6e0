//! SQLite implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkFilter};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const SELECT_LINK: &str = r#"
    SELECT alias, targets, multi, owner, created_at, expires_at, click_count
    FROM links
"#;

#[derive(sqlx::FromRow)]
struct LinkRow {
    alias: String,
    targets: String,
    multi: bool,
    owner: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let targets: Vec<String> = serde_json::from_str(&row.targets).map_err(|e| {
            tracing::error!(alias = %row.alias, error = %e, "Corrupt targets column");
            AppError::internal("Corrupt link record", json!({ "alias": row.alias }))
        })?;

        Ok(Link {
            alias: row.alias,
            targets,
            multi: row.multi,
            owner: row.owner,
            created_at: row.created_at,
            expires_at: row.expires_at,
            click_count: u64::try_from(row.click_count).unwrap_or(0),
        })
    }
}

fn encode_targets(targets: &[String]) -> Result<String, AppError> {
    serde_json::to_string(targets)
        .map_err(|e| AppError::internal("Failed to encode targets", json!({ "reason": e.to_string() })))
}

fn encode_count(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// SQLite repository for link storage and retrieval.
///
/// The `alias` primary key provides the atomic create-if-absent.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn create(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO links (alias, targets, multi, owner, created_at, expires_at, click_count)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.alias)
        .bind(encode_targets(&link.targets)?)
        .bind(link.multi)
        .bind(&link.owner)
        .bind(link.created_at)
        .bind(link.expires_at)
        .bind(encode_count(link.click_count))
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!("{SELECT_LINK} WHERE alias = ?"))
            .bind(alias)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Link::try_from).transpose()
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<Link>, AppError> {
        let rows = match &filter {
            LinkFilter::All => {
                sqlx::query_as::<_, LinkRow>(&format!("{SELECT_LINK} ORDER BY rowid DESC"))
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
            LinkFilter::OwnedBy(owner) => {
                sqlx::query_as::<_, LinkRow>(&format!(
                    "{SELECT_LINK} WHERE owner = ? ORDER BY rowid DESC"
                ))
                .bind(owner)
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        rows.into_iter().map(Link::try_from).collect()
    }

    async fn update(&self, link: &Link) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET targets = ?,
                multi = ?,
                owner = ?,
                expires_at = ?,
                click_count = MAX(click_count, ?)
            WHERE alias = ?
            "#,
        )
        .bind(encode_targets(&link.targets)?)
        .bind(link.multi)
        .bind(&link.owner)
        .bind(link.expires_at)
        .bind(encode_count(link.click_count))
        .bind(&link.alias)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": link.alias }),
            ));
        }

        Ok(())
    }

    async fn delete(&self, alias: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM links WHERE alias = ?")
            .bind(alias)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": alias }),
            ));
        }

        Ok(())
    }
}
