//! # PixPost Shared
//!
//! Wire-level types shared between handlers and clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
