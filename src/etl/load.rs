/// Load Module
///
/// Handles storing parsed records into the document store.
use crate::db::{RecordStore, StoreError};
use crate::models::AttackerRecord;

/// Bulk insert records, unordered
///
/// Returns the number of documents the store acknowledged. Any failure is
/// logged and reported as 0, including a partial batch where some documents
/// were in fact written.
pub async fn load_records<S: RecordStore + ?Sized>(store: &S, records: &[AttackerRecord]) -> usize {
    if records.is_empty() {
        tracing::warn!("No documents to insert.");
        return 0;
    }

    match store.insert_records(records).await {
        Ok(inserted) => {
            tracing::info!("Inserted {} documents.", inserted);
            inserted
        }
        Err(StoreError::PartialWrite { write_errors, details }) => {
            tracing::error!(
                "Bulk write error: {} of {} documents rejected, reporting 0 inserted: {}",
                write_errors,
                records.len(),
                details
            );
            0
        }
        Err(StoreError::Backend(e)) => {
            tracing::error!("Mongo error: {}", e);
            0
        }
    }
}
