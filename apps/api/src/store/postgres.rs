use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{CandidateStore, StoreError};
use crate::models::candidate::{Candidate, Education, Experience, ParsedResume};

const CANDIDATE_COLUMNS: &str = "id, full_name, emails, phones, skills, education, experience, \
                                 summary, full_text, created_at";

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    full_name: Option<String>,
    emails: Vec<String>,
    phones: Vec<String>,
    skills: Vec<String>,
    education: Json<Vec<Education>>,
    experience: Json<Vec<Experience>>,
    summary: String,
    full_text: String,
    created_at: DateTime<Utc>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            id: row.id,
            full_name: row.full_name,
            emails: row.emails,
            phones: row.phones,
            skills: row.skills,
            education: row.education.0,
            experience: row.experience.0,
            summary: row.summary,
            full_text: row.full_text,
            created_at: row.created_at,
        }
    }
}

/// Durable store backed by the `candidates` table.
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    /// A single INSERT: either the whole record is persisted or nothing is.
    async fn put(&self, parsed: ParsedResume) -> Result<Candidate, StoreError> {
        let id = Uuid::new_v4();
        let row: CandidateRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO candidates
                (id, full_name, emails, phones, skills, education, experience, summary, full_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&parsed.full_name)
        .bind(&parsed.emails)
        .bind(&parsed.phones)
        .bind(&parsed.skills)
        .bind(Json(&parsed.education))
        .bind(Json(&parsed.experience))
        .bind(&parsed.summary)
        .bind(&parsed.full_text)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted candidate {id}");
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Candidate, StoreError> {
        let row: Option<CandidateRow> = sqlx::query_as(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Candidate::from).ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> BoxStream<'_, Result<Candidate, StoreError>> {
        // `fetch` borrows the SQL for the stream's lifetime, so the query is
        // spelled out rather than formatted.
        sqlx::query_as::<_, CandidateRow>(
            "SELECT id, full_name, emails, phones, skills, education, experience, \
             summary, full_text, created_at FROM candidates ORDER BY seq ASC",
        )
        .fetch(&self.pool)
        .map(|row| row.map(Candidate::from).map_err(StoreError::from))
        .boxed()
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("Deleted candidate {id}");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as usize)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
