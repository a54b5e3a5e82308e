//! # PixPost Core
//!
//! The domain layer of the PixPost backend.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod assembly;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
