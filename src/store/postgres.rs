//! PostgreSQL metadata sink
//!
//! Holds per-document metadata plus a capped text preview; the full text
//! lives in the vector collection only. The table is keyed by the
//! deterministic document id; a re-scraped document replaces the stored
//! row and refreshes `scraped_at` while `created_at` keeps the timestamp
//! of the first insert.

use async_trait::async_trait;
use pgvector::Vector;
use tokio_postgres::{Client, NoTls};

use super::{MetadataSink, StoreError};
use crate::document::Document;
use crate::embedding::EMBEDDING_DIMENSIONS;

const TABLE: &str = "legal_documents";

fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE} (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            content_preview TEXT NOT NULL,
            source_url TEXT NOT NULL,
            scraped_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
    )
}

fn upsert_sql(with_embedding: bool) -> String {
    if with_embedding {
        format!(
            "INSERT INTO {TABLE} \
             (id, title, category, content_preview, source_url, scraped_at, embedding) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
               title = EXCLUDED.title, \
               category = EXCLUDED.category, \
               content_preview = EXCLUDED.content_preview, \
               source_url = EXCLUDED.source_url, \
               scraped_at = EXCLUDED.scraped_at, \
               embedding = EXCLUDED.embedding"
        )
    } else {
        format!(
            "INSERT INTO {TABLE} \
             (id, title, category, content_preview, source_url, scraped_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
               title = EXCLUDED.title, \
               category = EXCLUDED.category, \
               content_preview = EXCLUDED.content_preview, \
               source_url = EXCLUDED.source_url, \
               scraped_at = EXCLUDED.scraped_at"
        )
    }
}

pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Connect using a libpq-style connection string.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!("postgres connection error: {}", err);
            }
        });
        Ok(Self { client })
    }

    /// Create the documents table if missing. With `with_embeddings` the
    /// pgvector extension is enabled and an embedding column is added so
    /// the relational store can serve similarity queries on its own.
    pub async fn init_schema(&self, with_embeddings: bool) -> Result<(), StoreError> {
        if with_embeddings {
            self.client
                .execute("CREATE EXTENSION IF NOT EXISTS vector", &[])
                .await?;
        }

        self.client
            .execute(create_table_sql().as_str(), &[])
            .await?;

        if with_embeddings {
            let alter = format!(
                "ALTER TABLE {TABLE} \
                 ADD COLUMN IF NOT EXISTS embedding vector({EMBEDDING_DIMENSIONS})"
            );
            self.client.execute(alter.as_str(), &[]).await?;
        }

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {TABLE}_category_idx ON {TABLE} (category)"
        );
        self.client.execute(index.as_str(), &[]).await?;

        tracing::info!(table = TABLE, with_embeddings, "schema ready");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let row = self
            .client
            .query_one(format!("SELECT count(*) FROM {TABLE}").as_str(), &[])
            .await?;
        Ok(row.get(0))
    }
}

#[async_trait]
impl MetadataSink for PostgresStore {
    async fn upsert(
        &mut self,
        doc: &Document,
        embedding: Option<&[f32]>,
    ) -> Result<(), StoreError> {
        match embedding {
            Some(values) => {
                let vector = Vector::from(values.to_vec());
                self.client
                    .execute(
                        upsert_sql(true).as_str(),
                        &[
                            &doc.id,
                            &doc.title,
                            &doc.category,
                            &doc.content_preview,
                            &doc.source_url,
                            &doc.scraped_at,
                            &vector,
                        ],
                    )
                    .await?;
            }
            None => {
                self.client
                    .execute(
                        upsert_sql(false).as_str(),
                        &[
                            &doc.id,
                            &doc.title,
                            &doc.category,
                            &doc.content_preview,
                            &doc.source_url,
                            &doc.scraped_at,
                        ],
                    )
                    .await?;
            }
        }
        Ok(())
    }
}
