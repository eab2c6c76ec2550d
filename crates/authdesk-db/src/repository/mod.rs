//! SurrealDB repository implementations.

mod application;
mod scope;

pub use application::SurrealApplicationRepository;
pub use scope::SurrealScopeRepository;
