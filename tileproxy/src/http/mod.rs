//! HTTP request primitive
//!
//! Upstream fetches go through the [`HttpClient`] trait so that the fetch
//! pipeline can be exercised with mock clients in tests. [`ReqwestClient`]
//! is the blocking production implementation.

mod client;
mod request;

pub use client::{HttpClient, HttpError, ReqwestClient};
pub use request::{HttpRequest, HttpTemplate};

#[cfg(test)]
pub use client::tests::{MockHttpClient, WriteMode};
