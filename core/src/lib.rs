//! Async client core for an OData-style "People" service.
//!
//! # Overview
//! Builds requests for searching, reading and patching people, resolves the
//! deployment's routing key before writes, validates response shape and
//! classifies every failure into a small closed set of `PeopleError` kinds.
//!
//! # Design
//! - `PeopleClient` is stateless: read-only `ApiConfig` plus a transport.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response); the async operations compose them
//!   through an `HttpTransport`.
//! - `ReqwestTransport` is the production transport; tests substitute an
//!   in-memory one.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod server_key;
pub mod transport;
pub mod types;

pub use client::PeopleClient;
pub use config::ApiConfig;
pub use error::{ConfigError, PeopleError};
pub use http::{BoxError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use transport::ReqwestTransport;
pub use types::Person;
