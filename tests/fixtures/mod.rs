#![allow(dead_code)]

use std::collections::HashMap;

use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rocket::request::{FromRequest, Outcome};
use rocket::{Build, Request, Rocket, get, routes as rocket_routes};
use rocket_mongokit::{KitError, MongoConnection, MongoDb, MongoKit, mongo_connection};
use rstest::fixture;

pub const REPLICA_SET_URI: &str = "mongodb://localhost/?replicaSet=tests&use_greenlets=true";

pub fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[fixture]
pub fn kit() -> MongoKit {
    MongoKit::from_lookup(lookup(&[
        ("MONGO_URI", REPLICA_SET_URI),
        ("MONGO_DB_NAME", "pyramid_mongokit"),
    ]))
}

/// Begins a request on every use, bypassing the per-request memo.
pub struct RawConnection;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RawConnection {
    type Error = KitError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match mongo_connection(request) {
            Ok(_) => Outcome::Success(RawConnection),
            Err(e) => Outcome::Error((Status::InternalServerError, e)),
        }
    }
}

#[get("/raw")]
fn raw(_conn: RawConnection) -> &'static str {
    "ok"
}

#[get("/raw-twice")]
fn raw_twice(_first: RawConnection, _second: RawConnection) -> &'static str {
    "ok"
}

#[get("/guarded-twice")]
fn guarded_twice(_conn: MongoConnection, _again: MongoConnection, db: MongoDb<'_>) -> String {
    db.name().to_string()
}

#[get("/failing")]
fn failing(_conn: MongoConnection) -> Result<&'static str, Status> {
    Err(Status::ServiceUnavailable)
}

#[get("/panicking")]
fn panicking(_conn: MongoConnection) -> &'static str {
    panic!("handler failure")
}

#[get("/plain")]
fn plain() -> &'static str {
    "plain"
}

pub fn routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount(
        "/",
        rocket_routes![raw, raw_twice, guarded_twice, failing, panicking, plain],
    )
}

pub fn rocket_with(kit: MongoKit) -> Rocket<Build> {
    routes(rocket::build().attach(kit))
}

/// Launch failures are rendered into the error so Rocket sees them as handled.
pub async fn tracked(rocket: Rocket<Build>) -> anyhow::Result<Client> {
    Client::tracked(rocket)
        .await
        .map_err(|e| anyhow::anyhow!("launch failed: {e}"))
}

pub async fn client(kit: MongoKit) -> anyhow::Result<Client> {
    tracked(rocket_with(kit)).await
}
