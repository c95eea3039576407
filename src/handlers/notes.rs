//! # Note handlers
//!
//! Minimal CRUD over the registered [`Note`] document, through the
//! request-scoped database guard.

use {
    crate::models::{NewNote, Note, NoteView},
    mongodb::bson::{DateTime, doc, oid::ObjectId},
    rocket::{
        Route, futures::TryStreamExt, get, http::Status, post, response::status, routes,
        serde::json::Json,
    },
    rocket_mongokit::{KitError, MongoDb},
};

#[get("/")]
pub async fn list_notes(db: MongoDb<'_>) -> Result<Json<Vec<NoteView>>, KitError> {
    let notes: Vec<Note> = db
        .collection::<Note>()?
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(notes.into_iter().map(NoteView::from).collect()))
}

#[get("/<id>")]
pub async fn get_note(db: MongoDb<'_>, id: &str) -> Result<Option<Json<NoteView>>, KitError> {
    let Ok(oid) = ObjectId::parse_str(id) else {
        return Ok(None);
    };

    let note = db.collection::<Note>()?.find_one(doc! { "_id": oid }).await?;

    Ok(note.map(|note| Json(NoteView::from(note))))
}

#[post("/", data = "<note>", format = "json")]
pub async fn create_note(
    db: MongoDb<'_>,
    note: Json<NewNote>,
) -> Result<status::Custom<Json<NoteView>>, KitError> {
    let note = Note {
        oid: ObjectId::new(),
        body: note.into_inner().body,
        created_at: DateTime::now(),
    };

    db.collection::<Note>()?.insert_one(&note).await?;
    tracing::info!(id = %note.oid, "created note");

    Ok(status::Custom(Status::Created, Json(NoteView::from(note))))
}

pub fn routes() -> Vec<Route> {
    routes![list_notes, get_note, create_note]
}
