/// Validation Module
///
/// Read-only report over what the ETL pipeline has stored: document count,
/// a handful of samples, distinct countries, and the latest ingestion stamp.
use anyhow::Result;
use mongodb::bson::{Bson, Document};

use crate::db::{index::INGESTED_AT_FIELD, SnapshotReader};

pub const COUNTRY_FIELD: &str = "country";

/// Everything the validation binary prints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub namespace: String,
    pub total: u64,
    pub samples: Vec<Document>,
    pub countries: Vec<String>,
    pub latest_ingested_at: Option<String>,
}

/// Query the store; an empty collection skips the remaining queries
pub async fn collect_report<R: SnapshotReader + ?Sized>(
    reader: &R,
    namespace: &str,
    sample_size: i64,
) -> Result<ValidationReport> {
    let mut report = ValidationReport { namespace: namespace.to_string(), ..Default::default() };

    report.total = reader.count_documents().await?;
    if report.total == 0 {
        return Ok(report);
    }

    report.samples = reader.sample_documents(sample_size).await?;
    report.countries = reader.distinct_values(COUNTRY_FIELD).await?.iter().map(bson_display).collect();
    report.latest_ingested_at =
        reader.latest_by(INGESTED_AT_FIELD).await?.and_then(|doc| doc.get(INGESTED_AT_FIELD).map(bson_display));

    tracing::debug!(total = report.total, countries = report.countries.len(), "Validation report collected");
    Ok(report)
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total documents in {}: {}", self.namespace, self.total)?;
        if self.total == 0 {
            return writeln!(f, "⚠️ No data found. Did you run dshield-etl?");
        }

        writeln!(f, "\nSample documents:")?;
        for doc in &self.samples {
            writeln!(f, "{}", pretty_document(doc))?;
        }

        writeln!(f, "\nUnique countries in this dataset: [{}]", self.countries.join(", "))?;

        writeln!(f, "\nLatest ingestion timestamp: {}", self.latest_ingested_at.as_deref().unwrap_or("N/A"))
    }
}

/// Relaxed extended JSON, pretty-printed
fn pretty_document(doc: &Document) -> String {
    let json = Bson::Document(doc.clone()).into_relaxed_extjson();
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| format!("{}", doc))
}

/// Strings print bare; anything else uses its BSON display form
fn bson_display(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_render_empty_collection() {
        let report = ValidationReport { namespace: "db.coll".to_string(), ..Default::default() };
        let text = report.to_string();

        assert!(text.starts_with("Total documents in db.coll: 0\n"));
        assert!(text.contains("No data found"));
        assert!(!text.contains("Sample documents"));
    }

    #[test]
    fn test_render_full_report() {
        let report = ValidationReport {
            namespace: "kyureeus_ssn.dshield_top_attackers_raw".to_string(),
            total: 2,
            samples: vec![doc! { "ip": "1.2.3.4", "attacks": 10_i64, "country": "US" }],
            countries: vec!["CN".to_string(), "US".to_string()],
            latest_ingested_at: Some("2026-10-16T12:00:00.000000Z".to_string()),
        };
        let text = report.to_string();

        assert!(text.contains("Total documents in kyureeus_ssn.dshield_top_attackers_raw: 2"));
        assert!(text.contains("\"ip\": \"1.2.3.4\""));
        assert!(text.contains("\"attacks\": 10"));
        assert!(text.contains("Unique countries in this dataset: [CN, US]"));
        assert!(text.contains("Latest ingestion timestamp: 2026-10-16T12:00:00.000000Z"));
    }

    #[test]
    fn test_render_without_latest() {
        let report = ValidationReport { namespace: "a.b".to_string(), total: 1, ..Default::default() };
        assert!(report.to_string().contains("Latest ingestion timestamp: N/A"));
    }

    #[test]
    fn test_bson_display() {
        assert_eq!(bson_display(&Bson::String("US".to_string())), "US");
        assert_eq!(bson_display(&Bson::Null), "null");
        assert_eq!(bson_display(&Bson::Int64(7)), "7");
    }
}
