//! # Connection string rewriting
//!
//! Options the async driver has no use for, or that must be applied explicitly,
//! are lifted out of the URI into [`ConnectionSettings`].

use std::borrow::Cow;

use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};

use crate::errors::KitError;

const SCHEMES: [&str; 2] = ["mongodb+srv://", "mongodb://"];

/// Everything needed to construct the process-wide client.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSettings {
    /// URI handed to the driver: hosts and credentials kept, path set to the
    /// database name, lifted options removed.
    pub uri: String,
    pub auto_start_request: bool,
    pub tz_aware: bool,
    pub replica_set: Option<String>,
    /// Recorded from the `use_greenlets` option. The async driver has no equivalent.
    pub use_greenlets: Option<bool>,
    pub read_preference: Option<ReadPreference>,
}

impl ConnectionSettings {
    pub fn parse(uri: &str, db_name: &str) -> Result<Self, KitError> {
        let (scheme, rest) = SCHEMES
            .iter()
            .find_map(|&scheme| uri.strip_prefix(scheme).map(|rest| (scheme, rest)))
            .ok_or_else(|| KitError::InvalidUri(format!("unsupported scheme in `{uri}`")))?;

        let host_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (hosts, tail) = rest.split_at(host_end);
        if hosts.is_empty() || hosts.ends_with('@') {
            return Err(KitError::InvalidUri(format!("no hosts in `{uri}`")));
        }

        let query = tail.split_once('?').map(|(_, query)| query).unwrap_or("");

        let mut replica_set = None;
        let mut use_greenlets = None;
        let mut passthrough = Vec::new();

        for pair in query.split(['&', ';']).filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(raw_key)?;
            let value = decode(raw_value)?;

            match key.to_ascii_lowercase().as_str() {
                "replicaset" => {
                    if value.is_empty() {
                        return Err(KitError::InvalidUri("empty `replicaSet` option".into()));
                    }
                    replica_set = Some(value.into_owned());
                }
                "use_greenlets" => use_greenlets = Some(parse_flag(&key, &value)?),
                _ => passthrough.push(pair),
            }
        }

        let mut cleaned = format!("{scheme}{hosts}/{db_name}");
        if !passthrough.is_empty() {
            cleaned.push('?');
            cleaned.push_str(&passthrough.join("&"));
        }

        let read_preference = replica_set
            .as_ref()
            .map(|_| ReadPreference::SecondaryPreferred { options: None });

        Ok(Self {
            uri: cleaned,
            auto_start_request: false,
            tz_aware: true,
            replica_set,
            use_greenlets,
            read_preference,
        })
    }

    /// Parses the cleaned URI with the driver and applies the lifted options.
    pub async fn client_options(&self) -> Result<ClientOptions, KitError> {
        let mut options = ClientOptions::parse(self.uri.as_str()).await?;

        if let Some(name) = &self.replica_set {
            options.repl_set_name = Some(name.clone());
        }
        if let Some(read_preference) = &self.read_preference {
            options.selection_criteria =
                Some(SelectionCriteria::ReadPreference(read_preference.clone()));
        }

        Ok(options)
    }
}

fn decode(raw: &str) -> Result<Cow<'_, str>, KitError> {
    urlencoding::decode(raw)
        .map_err(|e| KitError::InvalidUri(format!("bad percent-encoding in `{raw}`: {e}")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, KitError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(KitError::InvalidUri(format!(
            "`{key}` expects a boolean, got `{value}`"
        ))),
    }
}
