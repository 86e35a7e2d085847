//! Task store module.
//!
//! This module contains the client-side state for the task board:
//! - `TaskStore`, the authoritative task collection with loading/error status
//! - Derived views (sorting and filtering) over the collection
//! - The optional local snapshot slot
//! - Store error handling

mod error;
mod snapshot;
mod store_impl;
pub mod views;

pub use error::StoreError;
pub use snapshot::{FileSnapshot, MemorySnapshot, Snapshot};
pub use store_impl::{
    StoreState, TaskStore, CREATE_FALLBACK, DELETE_FALLBACK, FETCH_FALLBACK, UPDATE_FALLBACK,
};
