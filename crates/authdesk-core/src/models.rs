//! Domain models for AuthDesk.
//!
//! These are the core types shared across all crates.

pub mod application;
pub mod scope;

pub use application::{Application, ApplicationFlow, CreateApplication, UpdateApplication};
pub use scope::{CreateScope, Scope, UpdateScope};
