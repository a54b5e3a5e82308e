//! Data Transfer Objects - request/response types for the API.
//!
//! Field names on the wire stay in the original Portuguese form
//! (`imagem`, `descricao`, `imagemAnterior`, ...) so existing clients keep
//! working.

use serde::{Deserialize, Serialize};

/// A post document as returned by the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "imagem")]
    pub image: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub alt: String,
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPostResponse {
    pub id: String,
    #[serde(rename = "imagem")]
    pub image: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub alt: String,
}

/// Response to a successful update: the resolved field set, plus the
/// previous image filename when one existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedPostResponse {
    #[serde(rename = "imagem")]
    pub image: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub alt: String,
    #[serde(rename = "imagemAnterior", skip_serializing_if = "Option::is_none")]
    pub previous_image: Option<String>,
}

/// Response to deleting a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePostResponse {
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
    #[serde(rename = "imgExtension", skip_serializing_if = "Option::is_none")]
    pub image_extension: Option<String>,
}

/// Summary of a best-effort bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub total: u64,
    pub deleted: u64,
}
