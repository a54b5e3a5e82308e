//! MongoDB implementation of the post repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use pixpost_core::domain::{Post, PostFields, PostId, PostRemoval, image_extension};
use pixpost_core::error::RepoError;
use pixpost_core::ports::PostRepository;

/// Post repository backed by a single MongoDB collection.
pub struct MongoPostRepository {
    client: Client,
    database: String,
    collection: String,
}

impl MongoPostRepository {
    pub fn new(client: Client, database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
            collection: collection.into(),
        }
    }

    fn posts(&self) -> Collection<Post> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }

    fn documents(&self) -> Collection<Document> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let cursor = self
            .posts()
            .find(doc! {})
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
        self.posts()
            .find_one(doc! { "_id": id.as_object_id() })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }

    async fn insert(&self, fields: &PostFields) -> Result<PostId, RepoError> {
        let document =
            bson::to_document(fields).map_err(|e| RepoError::Serialization(e.to_string()))?;

        let result = self
            .documents()
            .insert_one(document)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        result
            .inserted_id
            .as_object_id()
            .map(PostId::from)
            .ok_or_else(|| RepoError::Query("insert did not produce an ObjectId".to_string()))
    }

    async fn update(&self, id: &PostId, fields: &PostFields) -> Result<bool, RepoError> {
        let replacement =
            bson::to_document(fields).map_err(|e| RepoError::Serialization(e.to_string()))?;

        let result = self
            .documents()
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": replacement },
            )
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &PostId) -> Result<PostRemoval, RepoError> {
        // Read first to capture the image extension; the file cleanup
        // happens at the call site.
        let existing = self.find_by_id(id).await?;
        let image_extension = existing
            .as_ref()
            .map(|post| image_extension(&post.fields.image).to_string());

        let result = self
            .documents()
            .delete_one(doc! { "_id": id.as_object_id() })
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(PostRemoval {
            deleted_count: result.deleted_count,
            image_extension,
        })
    }

    async fn list_clusters(&self) -> Result<BTreeMap<String, Vec<String>>, RepoError> {
        let mut clusters = BTreeMap::new();

        for name in self
            .client
            .list_database_names()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
        {
            let collections = self
                .client
                .database(&name)
                .list_collection_names()
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?;

            clusters.insert(name, collections);
        }

        Ok(clusters)
    }
}
