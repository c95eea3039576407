//! # Request-scoped accessors
//!
//! The shared client is handed to handlers through [`MongoConnection`] and
//! [`MongoDb`] guards. Each access brackets the request with
//! [`MongoClient::start_request`] and a finish callback that calls
//! [`MongoClient::end_request`] once the response is written, or when the
//! request is dropped if it never got that far.

use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};

use mongodb::{Collection, Database};
use rocket::Request;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use uuid::Uuid;

use crate::db::MongoClient;
use crate::errors::KitError;
use crate::registry::{Document, MongoRegistry};

type FinishedCallback = Box<dyn FnOnce() + Send>;

/// Callbacks queued for the end of one request.
pub struct RequestScope {
    id: Uuid,
    callbacks: Mutex<Vec<FinishedCallback>>,
}

impl RequestScope {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pending(&self) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Runs every queued callback in registration order. Later calls only see
    /// callbacks queued since.
    pub fn finish(&self) {
        let callbacks = std::mem::take(
            &mut *self.callbacks.lock().unwrap_or_else(PoisonError::into_inner),
        );

        for callback in callbacks {
            callback();
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.finish();
    }
}

pub fn request_scope<'r>(request: &'r Request<'_>) -> &'r RequestScope {
    request.local_cache(RequestScope::new)
}

pub fn add_finished_callback<F>(request: &Request<'_>, callback: F)
where
    F: FnOnce() + Send + 'static,
{
    request_scope(request)
        .callbacks
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Box::new(callback));
}

pub fn registry<'r>(request: &'r Request<'_>) -> Result<&'r MongoRegistry, KitError> {
    request
        .rocket()
        .state::<MongoRegistry>()
        .ok_or(KitError::NotInitialized)
}

/// Begins a request on the shared client and queues the matching end.
///
/// Every call produces its own begin/end pair; use [`request_connection`] or
/// the guards for one pair per request.
pub fn mongo_connection(request: &Request<'_>) -> Result<Arc<MongoClient>, KitError> {
    let client = registry(request)?.get_mongo_connection();
    let request_id = request_scope(request).id();

    client.start_request(request_id);

    let finished = Arc::clone(&client);
    add_finished_callback(request, move || finished.end_request(request_id));

    Ok(client)
}

struct CachedConnection(Result<Arc<MongoClient>, KitError>);

/// [`mongo_connection`], evaluated at most once per request. A failure is
/// cached too and returned unchanged on every later call.
pub fn request_connection(request: &Request<'_>) -> Result<Arc<MongoClient>, KitError> {
    request
        .local_cache(|| CachedConnection(mongo_connection(request)))
        .0
        .clone()
}

/// The configured database on the request's connection.
pub fn mongo_db(request: &Request<'_>) -> Result<Database, KitError> {
    let client = request_connection(request)?;
    Ok(client.database(registry(request)?.db_name()))
}

pub struct MongoConnection(pub Arc<MongoClient>);

impl Deref for MongoConnection {
    type Target = MongoClient;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for MongoConnection {
    type Error = KitError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request_connection(request) {
            Ok(client) => Outcome::Success(MongoConnection(client)),
            Err(e) => Outcome::Error((Status::InternalServerError, e)),
        }
    }
}

pub struct MongoDb<'r> {
    db: Database,
    registry: &'r MongoRegistry,
}

impl MongoDb<'_> {
    /// Typed collection for a registered document.
    pub fn collection<D: Document>(&self) -> Result<Collection<D>, KitError> {
        self.registry.collection(&self.db)
    }
}

impl Deref for MongoDb<'_> {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for MongoDb<'r> {
    type Error = KitError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let db = registry(request).and_then(|registry| {
            mongo_db(request).map(|db| MongoDb { db, registry })
        });

        match db {
            Ok(db) => Outcome::Success(db),
            Err(e) => Outcome::Error((Status::InternalServerError, e)),
        }
    }
}
