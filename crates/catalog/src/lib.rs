//! `bookstore-catalog`: product records, the read-only catalog port and the
//! catalog filter.
//!
//! The filter is pure and order-preserving; it never fetches or mutates
//! catalog data.

pub mod filter;
pub mod product;
pub mod store;

pub use filter::{FilterOutcome, Verdict, apply};
pub use product::{CatalogDocument, Product};
pub use store::{CatalogError, CatalogStore, InMemoryCatalog};
