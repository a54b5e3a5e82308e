use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{Post, PostFields, PostId, PostRemoval};
use crate::error::RepoError;

/// Post repository - CRUD against a single document collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Return every post in the collection.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by id; `None` when no such document exists.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError>;

    /// Insert a new post and return the generated id.
    async fn insert(&self, fields: &PostFields) -> Result<PostId, RepoError>;

    /// Replace the full field set on an existing document. Returns whether
    /// a document was matched.
    async fn update(&self, id: &PostId, fields: &PostFields) -> Result<bool, RepoError>;

    /// Delete a post document, capturing its image extension first so the
    /// caller can locate the file to remove.
    async fn delete(&self, id: &PostId) -> Result<PostRemoval, RepoError>;

    /// Administrative: map every database name to its collection names.
    async fn list_clusters(&self) -> Result<BTreeMap<String, Vec<String>>, RepoError>;
}
