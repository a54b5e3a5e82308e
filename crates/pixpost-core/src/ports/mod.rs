//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod describe;
mod image_store;
mod repository;

pub use describe::{DescribeError, DescriptionGenerator};
pub use image_store::{ImageStore, ImageStoreError};
pub use repository::PostRepository;
