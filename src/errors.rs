use rocket::Request;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    MissingVar(&'static str),
    #[error("environment variable `{0}` is set but empty")]
    EmptyVar(&'static str),
}

#[derive(Error, Debug, Clone)]
pub enum KitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid MongoDB URI: {0}")]
    InvalidUri(String),
    #[error("MongoDB driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("MongoDB integration is not initialized; attach the MongoKit fairing")]
    NotInitialized,
    #[error("invalid collection name `{name}`: {reason}")]
    InvalidCollectionName { name: String, reason: &'static str },
    #[error("collection `{collection}` is already registered to `{existing}`")]
    DuplicateDocument {
        collection: String,
        existing: &'static str,
    },
    #[error("document type `{0}` is not registered")]
    UnregisteredDocument(&'static str),
}

impl KitError {
    pub fn status(&self) -> Status {
        match self {
            KitError::InvalidCollectionName { .. } => Status::BadRequest,
            KitError::DuplicateDocument { .. } => Status::Conflict,
            KitError::UnregisteredDocument(_) => Status::NotFound,
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for KitError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let body = json!({
            "error": self.to_string(),
            "status": status.code
        })
        .to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}
