//! Registry sync adapters.
//!
//! Implementations of the [`authdesk_core::sync`] traits: an HTTP
//! client for a real OIDC registry and a no-op for deployments (and
//! tests) that run without one. [`RegistryClient`] wraps both behind
//! one concrete type so services stay free of an extra generic layer.

pub mod client;
pub mod http;
pub mod noop;

pub use client::RegistryClient;
pub use http::HttpRegistrySync;
pub use noop::NoopRegistrySync;
