/// Configuration Module
///
/// Resolves feed and MongoDB settings from the environment (optionally seeded
/// from a `.env` file) with CLI overrides layered on top.
use std::time::Duration;
use thiserror::Error;

/// Default DShield feed location
pub const FEED_URL: &str = "https://www.dshield.org/ipsascii.html";

pub const MONGO_URI_VAR: &str = "MONGO_URI";
pub const MONGO_DB_VAR: &str = "MONGO_DB";
pub const MONGO_COLLECTION_VAR: &str = "MONGO_COLLECTION";

pub const DEFAULT_MONGO_DB: &str = "kyureeus_ssn";
pub const DEFAULT_MONGO_COLLECTION: &str = "dshield_top_attackers_raw";

pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_BACKOFF_SECS: f64 = 1.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SAMPLE_SIZE: i64 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is missing. Set it in the environment or your .env file")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue { key: &'static str, value: String, reason: String },
}

/// Where ingested documents live
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Per-field overrides, typically from the command line
#[derive(Debug, Clone, Default)]
pub struct StoreOverrides {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
}

impl StoreSettings {
    /// Resolve settings from the process environment
    pub fn from_env(overrides: &StoreOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup
    ///
    /// Overrides win over looked-up values. Blank values count as unset, and the
    /// connection string has no fallback.
    pub fn from_lookup<F>(overrides: &StoreOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |over: &Option<String>, key: &str| {
            over.clone().or_else(|| lookup(key)).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let uri = pick(&overrides.uri, MONGO_URI_VAR).ok_or(ConfigError::MissingVar(MONGO_URI_VAR))?;
        let database =
            pick(&overrides.database, MONGO_DB_VAR).unwrap_or_else(|| DEFAULT_MONGO_DB.to_string());
        let collection = pick(&overrides.collection, MONGO_COLLECTION_VAR)
            .unwrap_or_else(|| DEFAULT_MONGO_COLLECTION.to_string());

        Ok(Self { uri, database, collection })
    }

    /// `db.collection`, for log lines and the report header
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

/// Convert a backoff given in (possibly fractional) seconds
pub fn backoff_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
        key: "backoff",
        value: secs.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_uri_is_fatal() {
        let result = StoreSettings::from_lookup(&StoreOverrides::default(), lookup_from(&[]));
        assert_eq!(result, Err(ConfigError::MissingVar(MONGO_URI_VAR)));
    }

    #[test]
    fn test_blank_uri_counts_as_missing() {
        let result = StoreSettings::from_lookup(&StoreOverrides::default(), lookup_from(&[(MONGO_URI_VAR, "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let settings =
            StoreSettings::from_lookup(&StoreOverrides::default(), lookup_from(&[(MONGO_URI_VAR, "mongodb://db:27017")]))
                .unwrap();

        assert_eq!(settings.uri, "mongodb://db:27017");
        assert_eq!(settings.database, DEFAULT_MONGO_DB);
        assert_eq!(settings.collection, DEFAULT_MONGO_COLLECTION);
        assert_eq!(settings.namespace(), "kyureeus_ssn.dshield_top_attackers_raw");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = StoreOverrides {
            uri: Some("mongodb://override".to_string()),
            database: None,
            collection: Some("snapshots".to_string()),
        };
        let lookup = lookup_from(&[(MONGO_URI_VAR, "mongodb://env"), (MONGO_DB_VAR, "intel")]);

        let settings = StoreSettings::from_lookup(&overrides, lookup).unwrap();
        assert_eq!(settings.uri, "mongodb://override");
        assert_eq!(settings.database, "intel");
        assert_eq!(settings.collection, "snapshots");
    }

    #[test]
    fn test_backoff_conversion() {
        assert_eq!(backoff_from_secs(1.5).unwrap(), Duration::from_millis(1500));
        assert!(backoff_from_secs(-1.0).is_err());
        assert!(backoff_from_secs(f64::NAN).is_err());
        assert!(backoff_from_secs(f64::INFINITY).is_err());
        assert!(matches!(backoff_from_secs(1e30), Err(ConfigError::InvalidValue { key: "backoff", .. })));
    }
}
