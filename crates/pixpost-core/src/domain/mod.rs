//! Domain entities - the core business objects.

mod post;

pub use post::{InvalidPostId, Post, PostFields, PostId, PostRemoval, image_extension};
