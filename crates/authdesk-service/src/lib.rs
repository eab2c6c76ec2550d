//! AuthDesk Service — the scope-assignment consistency engine.
//!
//! This crate holds the parts with actual logic: the minimum-coverage
//! validator ([`coverage`]), the cursor pagination protocol ([`page`]),
//! and the Application/Scope services that sequence
//! validate → persist → project → best-effort registry sync.
//!
//! Services are generic over the repository and sync traits so they
//! can be exercised against the in-memory SurrealDB engine in tests.

pub mod application;
pub mod coverage;
pub mod dto;
pub mod page;
pub mod scope;

pub use application::ApplicationService;
pub use scope::ScopeService;
