/// Transform Module
///
/// Turns the raw, line-oriented DShield feed into `AttackerRecord`s.
///
/// Feed lines look like `<ip> <attacks> <country> [extra...]`. Blank lines,
/// lines starting with `#` and the `ip ...` header line are skipped. Lines
/// with fewer than three fields are dropped, and a non-numeric count becomes
/// `None` rather than rejecting the line.
use chrono::{DateTime, Utc};

use crate::models::AttackerRecord;

const COMMENT_MARKER: char = '#';
const HEADER_PREFIX: &str = "ip";
const MIN_FIELDS: usize = 3;

/// Line categories seen while parsing one feed body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub records: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub header_lines: usize,
    /// Lines dropped for having fewer than three fields
    pub short_lines: usize,
    /// Records kept with `attacks` set to `None`
    pub null_attacks: usize,
}

impl ParseSummary {
    pub fn skipped(&self) -> usize {
        self.blank_lines + self.comment_lines + self.header_lines + self.short_lines
    }
}

/// Parse a feed body, stamping every record with the current time
pub fn parse_feed(raw: &str) -> Vec<AttackerRecord> {
    parse_feed_with_summary(raw, Utc::now()).0
}

/// Parse a feed body with a caller-chosen ingestion timestamp
pub fn parse_feed_at(raw: &str, ingested_at: DateTime<Utc>) -> Vec<AttackerRecord> {
    parse_feed_with_summary(raw, ingested_at).0
}

pub fn parse_feed_with_summary(raw: &str, ingested_at: DateTime<Utc>) -> (Vec<AttackerRecord>, ParseSummary) {
    let mut records = Vec::new();
    let mut summary = ParseSummary::default();

    // `lines()` handles `\n` and `\r\n`; a bare `\r` also ends a line
    for line in raw.lines().flat_map(|l| l.split('\r')) {
        if line.trim().is_empty() {
            summary.blank_lines += 1;
            continue;
        }
        // Comment and header markers only count in the first column
        if line.starts_with(COMMENT_MARKER) {
            summary.comment_lines += 1;
            continue;
        }
        if is_header(line) {
            summary.header_lines += 1;
            continue;
        }

        match parse_line(line, ingested_at) {
            Some(record) => {
                if record.attacks.is_none() {
                    summary.null_attacks += 1;
                }
                records.push(record);
            }
            None => summary.short_lines += 1,
        }
    }

    summary.records = records.len();
    tracing::info!("Transformed {} records.", summary.records);
    tracing::debug!(
        blank = summary.blank_lines,
        comments = summary.comment_lines,
        headers = summary.header_lines,
        short = summary.short_lines,
        null_attacks = summary.null_attacks,
        "Feed parse summary"
    );

    (records, summary)
}

/// Case-insensitive check for the `ip ...` header line
fn is_header(line: &str) -> bool {
    line.get(..HEADER_PREFIX.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(HEADER_PREFIX))
}

/// Parse one data line; `None` if it has fewer than three fields
fn parse_line(line: &str, ingested_at: DateTime<Utc>) -> Option<AttackerRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let attacks = fields[1].parse::<i64>().ok();
    Some(AttackerRecord::new(fields[0], attacks, fields[2], ingested_at))
}
