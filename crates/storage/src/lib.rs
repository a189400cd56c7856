use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;
use uuid::Uuid;

use shared::domain::{Destination, DocumentId, LeadRecord};

/// Append-only document store backing the persistence gateway.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub document_id: DocumentId,
    pub destination: Destination,
    pub record: LeadRecord,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Writes one new document. Every call creates a distinct row; identical payloads are not merged.
    pub async fn append_document(
        &self,
        destination: Destination,
        record: &LeadRecord,
    ) -> Result<StoredDocument> {
        let document_id = DocumentId::new_v4();
        let created_at = Utc::now();
        let payload_json =
            serde_json::to_string(record).context("failed to encode document payload")?;

        sqlx::query(
            "INSERT INTO documents (document_id, collection, payload_json, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(document_id.to_string())
        .bind(destination.as_str())
        .bind(&payload_json)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to append document to '{destination}'"))?;

        debug!(%document_id, %destination, "document appended");

        Ok(StoredDocument {
            document_id,
            destination,
            record: record.clone(),
            created_at,
        })
    }

    /// Newest documents first.
    pub async fn list_documents(
        &self,
        destination: Destination,
        limit: u32,
    ) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query(
            "SELECT document_id, payload_json, created_at FROM documents WHERE collection = ? ORDER BY seq DESC LIMIT ?",
        )
        .bind(destination.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| decode_document(destination, row))
            .collect()
    }

    pub async fn load_document(&self, document_id: DocumentId) -> Result<Option<StoredDocument>> {
        let row = sqlx::query(
            "SELECT document_id, collection, payload_json, created_at FROM documents WHERE document_id = ?",
        )
        .bind(document_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let collection: String = row.try_get("collection")?;
        let destination = Destination::parse(&collection)
            .with_context(|| format!("unknown collection '{collection}' in documents table"))?;
        decode_document(destination, &row).map(Some)
    }

    pub async fn count_documents(&self, destination: Destination) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(destination.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn decode_document(destination: Destination, row: &SqliteRow) -> Result<StoredDocument> {
    let raw_id: String = row.try_get("document_id")?;
    let document_id = Uuid::parse_str(&raw_id)
        .map(DocumentId)
        .with_context(|| format!("invalid document id '{raw_id}'"))?;
    let payload_json: String = row.try_get("payload_json")?;
    let record: LeadRecord = serde_json::from_str(&payload_json)
        .with_context(|| format!("failed to decode payload of document {raw_id}"))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(StoredDocument {
        document_id,
        destination,
        record,
        created_at,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
