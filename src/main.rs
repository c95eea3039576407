//! # mongokit-demo - example server built on `rocket_mongokit`
//!
//! ## Environment Variables
//!
//! - `MONGO_URI`: MongoDB connection string
//! - `MONGO_DB_NAME`: database name
//! - `RUST_LOG`: tracing filter, defaults to `rocket_mongokit=info,mongokit_demo=info`

use rocket::{catchers, launch, routes};
use rocket_mongokit::MongoKit;
use tracing_subscriber::EnvFilter;

use crate::models::Note;

pub mod cli;
pub mod handlers;
pub mod models;

#[launch]
async fn rocket() -> _ {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rocket_mongokit=info,mongokit_demo=info".into()),
        )
        .try_init()
        .ok();

    match cli::handle_cli() {
        Ok(true) => {}
        Ok(false) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    rocket::build()
        .attach(MongoKit::fairing().register::<Note>())
        .register("/", catchers![handlers::catch404, handlers::catch500])
        .mount("/", routes![handlers::index])
        .mount("/status", handlers::status::routes())
        .mount("/notes", handlers::notes::routes())
}
