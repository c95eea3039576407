use rocket::{Request, catch, get, http::Status, serde::json::Json};
use serde_json::{Value, json};

pub mod notes;
pub mod status;

#[get("/")]
pub fn index() -> &'static str {
    "rocket_mongokit demo: see /status and /notes"
}

fn error_body(status: Status, message: &str) -> Json<Value> {
    Json(json!({
        "error": message,
        "status": status.code
    }))
}

#[catch(404)]
pub fn catch404(req: &Request) -> Json<Value> {
    error_body(Status::NotFound, &format!("no route for {}", req.uri()))
}

#[catch(500)]
pub fn catch500() -> Json<Value> {
    error_body(Status::InternalServerError, "Internal server error")
}
