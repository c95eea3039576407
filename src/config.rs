//! # Environment configuration
//!
//! ## Environment Variables
//!
//! - `MONGO_URI`: MongoDB connection string, may carry `replicaSet` and `use_greenlets`
//! - `MONGO_DB_NAME`: database exposed to request handlers

use std::env;

use crate::errors::ConfigError;

pub const MONGO_URI: &str = "MONGO_URI";
pub const MONGO_DB_NAME: &str = "MONGO_DB_NAME";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub db_name: String,
}

impl MongoConfig {
    /// Loads `.env` if present, then reads both required variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// Fails on the first absent or blank variable, `MONGO_URI` first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            uri: required(&lookup, MONGO_URI)?,
            db_name: required(&lookup, MONGO_DB_NAME)?,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or(ConfigError::MissingVar(key))?;
    let value = value.trim();

    if value.is_empty() {
        return Err(ConfigError::EmptyVar(key));
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_both_variables() {
        let config = MongoConfig::from_lookup(lookup(&[
            (MONGO_URI, "mongodb://localhost"),
            (MONGO_DB_NAME, "pyramid_mongokit"),
        ]))
        .unwrap();

        assert_eq!(config.uri, "mongodb://localhost");
        assert_eq!(config.db_name, "pyramid_mongokit");
    }

    #[test]
    fn missing_db_name_is_an_error() {
        let err = MongoConfig::from_lookup(lookup(&[(MONGO_URI, "mongodb://localhost")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(MONGO_DB_NAME));
    }

    #[test]
    fn missing_uri_is_reported_first() {
        let err = MongoConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(MONGO_URI));
    }

    #[test]
    fn blank_value_is_rejected() {
        let err = MongoConfig::from_lookup(lookup(&[
            (MONGO_URI, "mongodb://localhost"),
            (MONGO_DB_NAME, "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyVar(MONGO_DB_NAME));
    }
}
