//! AuthDesk Core — domain models, repository traits, and error types.
//!
//! These are the shared definitions every other crate builds on. The
//! crate is free of I/O dependencies so the service layer can be
//! tested against any store implementation.

pub mod error;
pub mod models;
pub mod repository;
pub mod sync;

pub use error::{DeskError, DeskResult};
