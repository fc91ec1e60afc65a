//! In-memory stand-ins for the MongoDB store

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use dshield_top_attackers::{
    db::{RecordStore, SnapshotReader, StoreError},
    models::AttackerRecord,
};
use mongodb::{
    bson::{self, Bson, Document},
    options::ClientOptions,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// How the fake store answers inserts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsertMode {
    Accept,
    /// Reject this many documents of the batch
    RejectSome(usize),
    ConnectionLost,
}

pub struct MemoryStore {
    pub docs: Mutex<Vec<AttackerRecord>>,
    pub indexes: Mutex<Vec<String>>,
    pub insert_calls: AtomicUsize,
    pub index_calls: AtomicUsize,
    pub insert_mode: InsertMode,
    pub fail_index: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(Vec::new()),
            indexes: Mutex::new(Vec::new()),
            insert_calls: AtomicUsize::new(0),
            index_calls: AtomicUsize::new(0),
            insert_mode: InsertMode::Accept,
            fail_index: false,
        }
    }

    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn with_failing_index(mut self) -> Self {
        self.fail_index = true;
        self
    }

    pub fn stored(&self) -> Vec<AttackerRecord> {
        self.docs.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

/// A genuine driver error, produced without a server
pub async fn driver_error() -> mongodb::error::Error {
    ClientOptions::parse("not-a-mongo-uri").await.unwrap_err()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ensure_index(&self, field: &str) -> Result<(), StoreError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_index {
            return Err(StoreError::Backend(driver_error().await));
        }
        let mut indexes = self.indexes.lock().unwrap();
        if !indexes.iter().any(|i| i == field) {
            indexes.push(field.to_string());
        }
        Ok(())
    }

    async fn insert_records(&self, records: &[AttackerRecord]) -> Result<usize, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        match self.insert_mode {
            InsertMode::Accept => {
                self.docs.lock().unwrap().extend_from_slice(records);
                Ok(records.len())
            }
            InsertMode::RejectSome(rejected) => {
                let kept = records.len().saturating_sub(rejected);
                self.docs.lock().unwrap().extend_from_slice(&records[..kept]);
                Err(StoreError::PartialWrite {
                    write_errors: rejected,
                    details: "#0 code 11000: E11000 duplicate key error".to_string(),
                })
            }
            InsertMode::ConnectionLost => Err(StoreError::Backend(driver_error().await)),
        }
    }
}

#[async_trait]
impl SnapshotReader for MemoryStore {
    async fn count_documents(&self) -> Result<u64> {
        Ok(self.docs.lock().unwrap().len() as u64)
    }

    async fn sample_documents(&self, limit: i64) -> Result<Vec<Document>> {
        let docs = self.docs.lock().unwrap();
        docs.iter().take(limit.max(0) as usize).map(|r| Ok(bson::to_document(r)?)).collect()
    }

    async fn distinct_values(&self, field: &str) -> Result<Vec<Bson>> {
        let mut values: Vec<Bson> = Vec::new();
        for doc in self.sample_documents(i64::MAX).await? {
            if let Some(value) = doc.get(field) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }

    async fn latest_by(&self, field: &str) -> Result<Option<Document>> {
        let docs = self.sample_documents(i64::MAX).await?;
        Ok(docs.into_iter().max_by_key(|doc| doc.get_str(field).map(str::to_string).unwrap_or_default()))
    }
}
