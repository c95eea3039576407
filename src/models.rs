use {
    mongodb::bson::{DateTime, oid::ObjectId},
    rocket_mongokit::Document,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(crate = "rocket::serde")]
pub struct Note {
    #[serde(rename = "_id")]
    pub oid: ObjectId,
    pub body: String,
    pub created_at: DateTime,
}

impl Document for Note {
    const COLLECTION: &'static str = "notes";
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct NewNote {
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct NoteView {
    pub id: String,
    pub body: String,
    pub created_at: String,
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        Self {
            id: note.oid.to_hex(),
            body: note.body,
            created_at: note
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}
