//! # rocket_mongokit - MongoDB wiring for Rocket applications
//!
//! Attach [`MongoKit`] to a Rocket instance and handlers can ask for the
//! shared client or the configured database as request guards:
//!
//! ```rust,no_run
//! use rocket::get;
//! use rocket_mongokit::{MongoDb, MongoKit};
//!
//! #[get("/collections")]
//! async fn collections(db: MongoDb<'_>) -> String {
//!     db.list_collection_names().await.unwrap_or_default().join(",")
//! }
//!
//! fn main() {
//!     let _rocket = rocket::build()
//!         .attach(MongoKit::fairing())
//!         .mount("/", rocket::routes![collections]);
//! }
//! ```
//!
//! ## Environment Variables
//!
//! - `MONGO_URI`: MongoDB connection string
//! - `MONGO_DB_NAME`: database handed out by [`MongoDb`]

pub mod config;
pub mod db;
pub mod errors;
pub mod fairing;
pub mod registry;
pub mod request;
pub mod uri;

pub use config::MongoConfig;
pub use db::MongoClient;
pub use errors::{ConfigError, KitError};
pub use fairing::MongoKit;
pub use registry::{Document, DocumentRegistration, MongoRegistry};
pub use request::{
    MongoConnection, MongoDb, add_finished_callback, mongo_connection, mongo_db,
    request_connection,
};
pub use uri::ConnectionSettings;
