/// DShield Top Attackers
///
/// An ETL pipeline that downloads the DShield attacker feed, parses it into
/// attacker records, and appends each snapshot to MongoDB, plus a read-only
/// validation report over the stored data.
pub mod cli;
pub mod config;
pub mod db;
pub mod etl;
pub mod models;
pub mod pipeline;
pub mod telemetry;
pub mod validate;
