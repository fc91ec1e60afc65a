/// ETL Pipeline Module
///
/// The three stages behind the pipeline:
/// - Extract: Download the DShield feed with retries
/// - Transform: Parse feed lines into attacker records
/// - Load: Bulk insert records into MongoDB
pub mod extract;
pub mod load;
pub mod transform;

pub use extract::{extract_feed, FeedFetcher, FetchConfig, FetchOutcome};
pub use load::load_records;
pub use transform::{parse_feed, parse_feed_at, parse_feed_with_summary, ParseSummary};
