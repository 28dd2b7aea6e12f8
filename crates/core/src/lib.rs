//! `bookstore-core`: shared building blocks for the storefront authorization layer.
//!
//! This crate contains **pure** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{BookId, Username};
