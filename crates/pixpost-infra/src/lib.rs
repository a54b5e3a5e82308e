//! # PixPost Infrastructure
//!
//! Concrete implementations of the ports defined in `pixpost-core`.
//! This crate contains the MongoDB repository, the filesystem image store,
//! and the Gemini description client.

pub mod ai;
pub mod database;
pub mod storage;

pub use ai::{GeminiClient, GeminiConfig};
pub use database::{MongoConfig, MongoConnection, MongoPostRepository};
pub use storage::FsImageStore;
