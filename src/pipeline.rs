/// Pipeline Module
///
/// Orchestrates one ingestion run: Extract → Transform → Load, with a
/// best-effort index check up front and statistics tracking.
use crate::db::{index, RecordStore};
use crate::etl::{self, FeedFetcher};
use std::time::{Duration, Instant};

/// Pipeline execution statistics
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub outcome: RunOutcome,
    /// Last stage that was entered
    pub stage: Option<PipelineStage>,
    pub index_ready: bool,
    pub body_bytes: usize,
    pub records_parsed: usize,
    pub null_attacks: usize,
    pub records_skipped: usize,
    pub records_inserted: usize,
    pub elapsed_time: Duration,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.records_inserted as f64 / secs
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetching,
    Parsing,
    Loading,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Fetching => write!(f, "Fetching"),
            PipelineStage::Parsing => write!(f, "Parsing"),
            PipelineStage::Loading => write!(f, "Loading"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunOutcome {
    /// The loader was handed the parsed batch, whatever it managed to commit
    Completed,
    /// Nothing usable was downloaded; parse and load never ran
    #[default]
    FetchFailed,
}

/// Configuration for pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feed_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { feed_url: crate::config::FEED_URL.to_string() }
    }
}

/// Main ETL Pipeline
pub struct Pipeline<'a, S: RecordStore + ?Sized> {
    fetcher: FeedFetcher,
    store: &'a S,
    config: PipelineConfig,
}

impl<'a, S: RecordStore + ?Sized> Pipeline<'a, S> {
    /// Create a new pipeline instance
    pub fn new(fetcher: FeedFetcher, store: &'a S, config: PipelineConfig) -> Self {
        Self { fetcher, store, config }
    }

    /// Run one ingestion
    pub async fn run(&self) -> PipelineStats {
        let start_time = Instant::now();
        let mut stats = PipelineStats::new();

        tracing::info!("Starting pipeline for {}", self.config.feed_url);

        println!("\n🚀 Starting ETL Pipeline...");
        println!("   🌐 Feed: {}", self.config.feed_url);
        println!("   🔄 Max retries: {}", self.fetcher.config().max_retries);

        stats.index_ready = index::ensure_index(self.store, index::INGESTED_AT_FIELD).await;

        stats.stage = Some(PipelineStage::Fetching);
        let Some(raw_text) = etl::extract_feed(&self.fetcher, &self.config.feed_url).await else {
            tracing::error!("No data to process. Exiting.");
            stats.outcome = RunOutcome::FetchFailed;
            stats.elapsed_time = start_time.elapsed();
            println!("\n❌ Pipeline stopped: nothing was fetched");
            self.print_final_stats(&stats);
            return stats;
        };
        stats.body_bytes = raw_text.len();

        stats.stage = Some(PipelineStage::Parsing);
        let (records, summary) = etl::parse_feed_with_summary(&raw_text, chrono::Utc::now());
        stats.records_parsed = summary.records;
        stats.null_attacks = summary.null_attacks;
        stats.records_skipped = summary.skipped();

        stats.stage = Some(PipelineStage::Loading);
        stats.records_inserted = etl::load_records(self.store, &records).await;
        stats.outcome = RunOutcome::Completed;

        stats.elapsed_time = start_time.elapsed();

        println!("\n✅ Pipeline complete!");
        self.print_final_stats(&stats);

        stats
    }

    /// Print final statistics
    fn print_final_stats(&self, stats: &PipelineStats) {
        println!("\n📊 Pipeline Statistics:");
        println!("   ⏱️  Total time: {:.2}s", stats.elapsed_time.as_secs_f64());
        if let Some(stage) = stats.stage {
            println!("   🧭 Last stage: {}", stage);
        }
        println!("   🗂️  Index on ingested_at: {}", if stats.index_ready { "ready" } else { "not confirmed" });
        println!("   📥 Bytes fetched: {}", stats.body_bytes);
        println!(
            "   📝 Records parsed: {} ({} without attack count, {} lines skipped)",
            stats.records_parsed, stats.null_attacks, stats.records_skipped
        );
        println!("   💾 Records inserted: {}", stats.records_inserted);
        println!("   ⚡ Throughput: {:.0} records/sec", stats.records_per_second());
    }
}
