use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use rocket::{State, get, routes as rocket_routes, serde::json::Json};
use rocket_mongokit::{MongoConnection, MongoDb, MongoRegistry};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RequestCounters {
    pub started: u64,
    pub ended: u64,
    pub active: u64,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct StatusReport {
    pub db_name: String,
    pub replica_set: Option<String>,
    pub initialized_at: DateTime<Utc>,
    pub requests: RequestCounters,
    pub documents: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct HealthStatus {
    pub db_status: String,
    pub collections: Vec<String>,
}

/// Process-level view of the shared client. Does not touch the server.
#[get("/")]
pub fn status(conn: MongoConnection, registry: &State<MongoRegistry>) -> Json<StatusReport> {
    Json(StatusReport {
        db_name: registry.db_name().to_string(),
        replica_set: conn.settings().replica_set.clone(),
        initialized_at: registry.initialized_at(),
        requests: RequestCounters {
            started: conn.requests_started(),
            ended: conn.requests_ended(),
            active: conn.active_requests(),
        },
        documents: registry
            .documents()
            .into_iter()
            .map(|registration| registration.collection)
            .collect(),
    })
}

#[get("/health")]
pub async fn health(db: MongoDb<'_>) -> Json<HealthStatus> {
    let health = match db.list_collection_names().filter(doc! {}).await {
        Ok(collections) => HealthStatus {
            db_status: "database online!".to_string(),
            collections,
        },
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HealthStatus {
                db_status: "database offline :(".to_string(),
                collections: Vec::new(),
            }
        }
    };

    Json(health)
}

pub fn routes() -> Vec<rocket::Route> {
    rocket_routes![status, health]
}
