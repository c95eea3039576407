//! # Process-wide MongoDB client
//!
//! One [`MongoClient`] is built at ignite and shared by every request. The
//! driver pools its own connections; this wrapper only adds the begin/end
//! request notifications that request guards pair up.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use mongodb::Client;
use tracing::debug;
use uuid::Uuid;

use crate::errors::KitError;
use crate::uri::ConnectionSettings;

#[derive(Debug)]
pub struct MongoClient {
    client: Client,
    settings: ConnectionSettings,
    started: AtomicU64,
    ended: AtomicU64,
}

impl MongoClient {
    /// Builds the driver client. No connection is opened until the first operation.
    pub async fn connect(settings: ConnectionSettings) -> Result<Self, KitError> {
        let options = settings.client_options().await?;
        let client = Client::with_options(options)?;

        Ok(Self {
            client,
            settings,
            started: AtomicU64::new(0),
            ended: AtomicU64::new(0),
        })
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Marks the start of a request's use of the client.
    ///
    /// The driver pins nothing per request, so this and [`end_request`] only
    /// bump counters and emit a trace event. Pairing them is the whole contract.
    ///
    /// [`end_request`]: MongoClient::end_request
    pub fn start_request(&self, request_id: Uuid) {
        let started = self.started.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(%request_id, started, "mongo request started");
    }

    /// Marks the end of a request started with [`start_request`](MongoClient::start_request).
    pub fn end_request(&self, request_id: Uuid) {
        let ended = self.ended.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(%request_id, ended, "mongo request ended");
    }

    pub fn requests_started(&self) -> u64 {
        self.started.load(Ordering::Acquire)
    }

    pub fn requests_ended(&self) -> u64 {
        self.ended.load(Ordering::Acquire)
    }

    pub fn active_requests(&self) -> u64 {
        self.requests_started().saturating_sub(self.requests_ended())
    }
}

impl Deref for MongoClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
