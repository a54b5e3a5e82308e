use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed post identifier wrapping the database's native id.
///
/// Incoming ids arrive as opaque hex strings; `parse` either yields a typed
/// id or a parse error, and each call site decides whether a failed parse
/// means "not found" or a client error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(ObjectId);

/// Returned when a string is not a valid post id.
#[derive(Debug, Error)]
#[error("invalid post id: {0}")]
pub struct InvalidPostId(String);

impl PostId {
    pub fn parse(raw: &str) -> Result<Self, InvalidPostId> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidPostId(raw.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for PostId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

/// The persisted field set of a post. The stored image file itself lives on
/// disk as `<id>.<extension>`; `image` keeps the original upload filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    #[serde(rename = "imagem")]
    pub image: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub alt: String,
}

/// Post entity - one uploaded image plus its description and alt-text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    #[serde(flatten)]
    pub fields: PostFields,
}

/// Outcome of deleting a post document: how many documents went away and,
/// when the document existed, the extension of its image file so the caller
/// can remove `<id>.<extension>` as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRemoval {
    pub deleted_count: u64,
    pub image_extension: Option<String>,
}

/// Extension of an image filename: the suffix after the final dot, or empty
/// when the name has none.
pub fn image_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => "",
    }
}
