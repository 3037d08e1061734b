//! Destination store for the medication transport statistics pipeline.

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::DestinationStore;
