//! Clients for the two supported D6 API versions
//!
//! v2 is the preferred, more complete surface; v1 is kept because some
//! integrations only expose the older routes.

mod client;
mod factory;
mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{ApiVersion, UpstreamCall, UpstreamClient};
pub use factory::{create_clients, PREFERENCE};
pub use http::{HttpUpstreamClient, PASSWORD_HEADER, USERNAME_HEADER};
