//! Database connection management and the MongoDB post repository.

mod connection;
mod mongo_repo;

pub use connection::{MongoConfig, MongoConnection};
pub use mongo_repo::MongoPostRepository;
