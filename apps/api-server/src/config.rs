//! Application configuration loaded from environment variables.

use std::env;

use pixpost_infra::{GeminiConfig, MongoConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub uploads_dir: String,
    pub public_dir: String,
    pub database: MongoConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = MongoConfig {
            uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "pixpost".to_string()),
            collection: env::var("MONGODB_COLLECTION").unwrap_or_else(|_| "posts".to_string()),
        };

        let mut gemini = GeminiConfig::new(env::var("GEMINI_API_KEY").unwrap_or_default());
        if let Ok(model) = env::var("GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            gemini.base_url = base_url;
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_origin: env::var("CORS_ORIGIN").ok(),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            database,
            gemini,
        }
    }
}
