//! # Application registry
//!
//! [`MongoRegistry`] is the long-lived state Rocket manages for the whole
//! process: the shared client, the configured database name and the document
//! types registered against collections.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use mongodb::{Collection, Database};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::config::MongoConfig;
use crate::db::MongoClient;
use crate::errors::KitError;
use crate::uri::ConnectionSettings;

/// A schema type stored in one named collection.
///
/// ```rust,no_run
/// use rocket_mongokit::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Review {
///     rating: i32,
/// }
///
/// impl Document for Review {
///     const COLLECTION: &'static str = "reviews";
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRegistration {
    pub collection: String,
    pub type_name: &'static str,
    type_id: TypeId,
}

impl DocumentRegistration {
    fn of<D: Document>() -> Self {
        Self {
            collection: D::COLLECTION.to_string(),
            type_name: type_name::<D>(),
            type_id: TypeId::of::<D>(),
        }
    }

    pub fn is<D: Document>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }
}

#[derive(Debug)]
pub struct MongoRegistry {
    client: Arc<MongoClient>,
    db_name: String,
    documents: RwLock<HashMap<String, DocumentRegistration>>,
    initialized_at: DateTime<Utc>,
}

impl MongoRegistry {
    /// Rewrites the configured URI and constructs the single process client.
    pub async fn initialize(config: &MongoConfig) -> Result<Self, KitError> {
        let settings = ConnectionSettings::parse(&config.uri, &config.db_name)?;
        let client = MongoClient::connect(settings).await?;

        info!(
            db = %config.db_name,
            replica_set = ?client.settings().replica_set,
            read_preference = ?client.settings().read_preference,
            "MongoDB client initialized"
        );

        Ok(Self {
            client: Arc::new(client),
            db_name: config.db_name.clone(),
            documents: RwLock::new(HashMap::new()),
            initialized_at: Utc::now(),
        })
    }

    pub fn get_mongo_connection(&self) -> Arc<MongoClient> {
        Arc::clone(&self.client)
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn database(&self) -> Database {
        self.client.database(&self.db_name)
    }

    pub fn initialized_at(&self) -> DateTime<Utc> {
        self.initialized_at
    }

    /// Associates `D` with `D::COLLECTION`.
    ///
    /// Registering the same type twice is a no-op; a different type claiming a
    /// taken collection is rejected and the first registration stays.
    pub fn register_document<D: Document>(&self) -> Result<(), KitError> {
        validate_collection_name(D::COLLECTION)?;

        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = documents.get(D::COLLECTION) {
            if existing.is::<D>() {
                return Ok(());
            }
            return Err(KitError::DuplicateDocument {
                collection: D::COLLECTION.to_string(),
                existing: existing.type_name,
            });
        }

        debug!(collection = D::COLLECTION, document = type_name::<D>(), "document registered");
        documents.insert(D::COLLECTION.to_string(), DocumentRegistration::of::<D>());

        Ok(())
    }

    pub fn document(&self, collection: &str) -> Option<DocumentRegistration> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
    }

    pub fn documents(&self) -> Vec<DocumentRegistration> {
        let mut documents: Vec<_> = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.collection.cmp(&b.collection));
        documents
    }

    /// Typed handle to the collection `D` is registered under.
    pub fn collection<D: Document>(&self, db: &Database) -> Result<Collection<D>, KitError> {
        match self.document(D::COLLECTION) {
            Some(registration) if registration.is::<D>() => Ok(db.collection(D::COLLECTION)),
            _ => Err(KitError::UnregisteredDocument(type_name::<D>())),
        }
    }
}

fn validate_collection_name(name: &str) -> Result<(), KitError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('$') {
        "name contains `$`"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else if name.starts_with("system.") {
        "the `system.` prefix is reserved"
    } else {
        return Ok(());
    };

    Err(KitError::InvalidCollectionName {
        name: name.to_string(),
        reason,
    })
}
