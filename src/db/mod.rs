/// Database Module
///
/// This module handles all MongoDB operations including:
/// - Client construction and connectivity checks
/// - Index maintenance on the ingestion timestamp
/// - Unordered bulk inserts of attacker records
/// - Read-only queries used by the validation report
///
/// The pipeline and validator only see the `RecordStore` and `SnapshotReader`
/// traits, so a single `Database` is built in `main` and passed down.
pub mod index;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::ErrorKind,
    options::ClientOptions,
    Client, Collection, IndexModel,
};
use thiserror::Error;

use crate::config::StoreSettings;
use crate::models::AttackerRecord;

const APP_NAME: &str = "dshield-top-attackers";

/// Errors raised by store writes
#[derive(Debug, Error)]
pub enum StoreError {
    /// Some documents in an unordered batch were rejected
    #[error("bulk write error: {write_errors} document(s) rejected: {details}")]
    PartialWrite { write_errors: usize, details: String },

    #[error("mongo error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

/// Write side of the document store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a non-unique ascending index on `field`
    async fn ensure_index(&self, field: &str) -> Result<(), StoreError>;

    /// Unordered bulk insert; returns the number of documents acknowledged
    async fn insert_records(&self, records: &[AttackerRecord]) -> Result<usize, StoreError>;
}

/// Read side of the document store, used by the validation report
#[async_trait]
pub trait SnapshotReader: Send + Sync {
    async fn count_documents(&self) -> Result<u64>;

    /// First `limit` documents in the store's natural order
    async fn sample_documents(&self, limit: i64) -> Result<Vec<Document>>;

    async fn distinct_values(&self, field: &str) -> Result<Vec<Bson>>;

    /// The document with the greatest value of `field`, if any
    async fn latest_by(&self, field: &str) -> Result<Option<Document>>;
}

pub struct Database {
    client: Client,
    records: Collection<AttackerRecord>,
    settings: StoreSettings,
}

impl Database {
    /// Create a new MongoDB client for the configured collection
    ///
    /// The driver connects lazily; call `test_connection` to fail early.
    pub async fn new(settings: &StoreSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri).await.context("Failed to parse MongoDB connection string")?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;
        let records = client.database(&settings.database).collection::<AttackerRecord>(&settings.collection);

        Ok(Self { client, records, settings: settings.clone() })
    }

    /// Test the database connection
    pub async fn test_connection(&self) -> Result<()> {
        self.client
            .database(&self.settings.database)
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        Ok(())
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn documents(&self) -> Collection<Document> {
        self.records.clone_with_type::<Document>()
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn ensure_index(&self, field: &str) -> Result<(), StoreError> {
        let model = IndexModel::builder().keys(doc! { field: 1 }).build();

        let created = self.records.create_index(model).await?;
        tracing::debug!(index = %created.index_name, "Index ensured");
        Ok(())
    }

    async fn insert_records(&self, records: &[AttackerRecord]) -> Result<usize, StoreError> {
        match self.records.insert_many(records).ordered(false).await {
            Ok(result) => Ok(result.inserted_ids.len()),
            Err(err) => Err(classify_write_error(err)),
        }
    }
}

#[async_trait]
impl SnapshotReader for Database {
    async fn count_documents(&self) -> Result<u64> {
        self.records.count_documents(doc! {}).await.context("Failed to count documents")
    }

    async fn sample_documents(&self, limit: i64) -> Result<Vec<Document>> {
        let cursor = self.documents().find(doc! {}).limit(limit).await.context("Failed to query sample documents")?;
        cursor.try_collect::<Vec<Document>>().await.context("Failed to read sample documents")
    }

    async fn distinct_values(&self, field: &str) -> Result<Vec<Bson>> {
        self.records.distinct(field, doc! {}).await.context(format!("Failed to list distinct values of {}", field))
    }

    async fn latest_by(&self, field: &str) -> Result<Option<Document>> {
        self.documents()
            .find_one(doc! {})
            .sort(doc! { field: -1 })
            .await
            .context(format!("Failed to find latest document by {}", field))
    }
}

/// Split partial-batch rejections from connection-level failures
fn classify_write_error(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::InsertMany(failure) = err.kind.as_ref() {
        if let Some(write_errors) = &failure.write_errors {
            let details = write_errors
                .iter()
                .take(5)
                .map(|e| format!("#{} code {}: {}", e.index, e.code, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return StoreError::PartialWrite { write_errors: write_errors.len(), details };
        }
    }
    StoreError::Backend(err)
}
