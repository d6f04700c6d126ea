//! Backend Data Access
//!
//! One HTTP client, one endpoint registry and a service module per
//! resource family. Every call takes the page's `CancelToken`.

pub mod cancel;
pub mod client;
pub mod endpoints;

pub mod auth;
pub mod incidents;
pub mod notifications;
pub mod planner;
pub mod reports;
pub mod routes;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancelToken;
pub use client::{ApiClient, Method, ReqwestTransport, Transport};
pub use endpoints::Endpoint;
