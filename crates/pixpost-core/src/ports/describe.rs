use async_trait::async_trait;
use thiserror::Error;

/// Description generation errors.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("Description service request failed: {0}")]
    Request(String),

    #[error("Description service returned no text")]
    EmptyResponse,
}

/// External image-to-text service. A single attempt per call; latency and
/// availability are outside this system's control and never retried.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String, DescribeError>;
}
