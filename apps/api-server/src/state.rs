//! Application state - shared across all handlers.

use std::sync::Arc;

use pixpost_core::assembly::PostAssembler;
use pixpost_core::ports::{DescriptionGenerator, ImageStore, ImageStoreError, PostRepository};
use pixpost_infra::{FsImageStore, GeminiClient, MongoConnection, MongoPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub images: Arc<dyn ImageStore>,
    pub assembler: Arc<PostAssembler>,
}

impl AppState {
    /// Build the application state from configuration and an established
    /// database connection.
    pub async fn new(config: &AppConfig, connection: &MongoConnection) -> Result<Self, ImageStoreError> {
        let posts: Arc<dyn PostRepository> = Arc::new(MongoPostRepository::new(
            connection.client().clone(),
            config.database.database.clone(),
            config.database.collection.clone(),
        ));

        let store = FsImageStore::new(&config.uploads_dir);
        store.ensure_root().await?;
        let images: Arc<dyn ImageStore> = Arc::new(store);

        let describer: Arc<dyn DescriptionGenerator> =
            Arc::new(GeminiClient::new(config.gemini.clone()));

        let assembler = Arc::new(PostAssembler::new(
            posts.clone(),
            images.clone(),
            describer,
        ));

        tracing::info!("Application state initialized");

        Ok(Self {
            posts,
            images,
            assembler,
        })
    }
}
