//! Infrastructure layer: adapters for the decision service and the catalog store.

pub mod catalog;
pub mod decision_service;
