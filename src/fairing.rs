use std::sync::Arc;

use rocket::fairing::{self, Fairing, Info, Kind};
use rocket::{Build, Request, Response, Rocket};
use tracing::error;

use crate::config::MongoConfig;
use crate::errors::KitError;
use crate::registry::{Document, MongoRegistry};
use crate::request::request_scope;

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;
type Registration = fn(&MongoRegistry) -> Result<(), KitError>;

/// Wires MongoDB into a Rocket application.
///
/// On ignite it reads `MONGO_URI` and `MONGO_DB_NAME`, builds the shared
/// client and manages a [`MongoRegistry`]. Launch is aborted if any of that
/// fails. On response it runs the request's finish callbacks, which is where
/// per-request connections are released.
///
/// # Example
///
/// ```rust,no_run
/// use rocket_mongokit::MongoKit;
///
/// let rocket = rocket::build().attach(MongoKit::fairing());
/// # drop(rocket);
/// ```
pub struct MongoKit {
    lookup: Option<Lookup>,
    registrations: Vec<Registration>,
}

impl MongoKit {
    /// Reads configuration from the process environment (and `.env`).
    pub fn fairing() -> Self {
        Self {
            lookup: None,
            registrations: Vec::new(),
        }
    }

    /// Reads configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Some(Arc::new(lookup)),
            registrations: Vec::new(),
        }
    }

    /// Registers `D` as soon as the registry exists.
    pub fn register<D: Document>(mut self) -> Self {
        self.registrations.push(|registry| registry.register_document::<D>());
        self
    }

    fn config(&self) -> Result<MongoConfig, KitError> {
        let config = match &self.lookup {
            Some(lookup) => MongoConfig::from_lookup(|key| lookup(key)),
            None => MongoConfig::from_env(),
        };

        Ok(config?)
    }

    async fn build_registry(&self) -> Result<MongoRegistry, KitError> {
        let registry = MongoRegistry::initialize(&self.config()?).await?;

        for register in &self.registrations {
            register(&registry)?;
        }

        Ok(registry)
    }
}

#[rocket::async_trait]
impl Fairing for MongoKit {
    fn info(&self) -> Info {
        Info {
            name: "MongoKit",
            kind: Kind::Ignite | Kind::Response,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> fairing::Result {
        match self.build_registry().await {
            Ok(registry) => Ok(rocket.manage(registry)),
            Err(e) => {
                error!(error = %e, "failed to initialize MongoDB");
                Err(rocket)
            }
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, _: &mut Response<'r>) {
        request_scope(request).finish();
    }
}
