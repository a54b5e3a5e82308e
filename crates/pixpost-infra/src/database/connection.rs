use bson::doc;
use mongodb::Client;

use pixpost_core::error::RepoError;

/// Configuration for the document database.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

/// Owned database connection with an explicit startup/shutdown lifecycle.
///
/// Created once at startup and read-only afterwards; handlers share clones
/// of the inner client.
pub struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    /// Connect and verify the server is reachable. Driver connections are
    /// lazy, so a ping makes a bad URI or unreachable server fail here
    /// instead of on the first request.
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepoError> {
        tracing::info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(database = %config.database, collection = %config.collection, "Connected to MongoDB");

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Tear down the connection pool. Called once when the server exits.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
    }
}
