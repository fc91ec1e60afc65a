/// Index maintenance
///
/// Best-effort: a failed index build is logged and never stops ingestion.
use super::RecordStore;

/// Field stamped on every record of an ingestion run
pub const INGESTED_AT_FIELD: &str = "ingested_at";

/// Make sure a secondary index exists on `field`
///
/// Returns whether the index is known to exist afterwards.
pub async fn ensure_index<S: RecordStore + ?Sized>(store: &S, field: &str) -> bool {
    match store.ensure_index(field).await {
        Ok(()) => {
            tracing::info!("Index on {} is in place", field);
            true
        }
        Err(e) => {
            tracing::warn!("Index creation failed: {}", e);
            false
        }
    }
}
