//! HTTP client for the vector-database admin API.
//!
//! One async method per backend operation, a small error taxonomy, and the
//! wire-level view models. No retries anywhere: every failure is returned to
//! the caller, which is responsible for user-visible reporting.

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    ClusterInfo, Collection, CollectionSpec, CreateCustomerRequest, CreatedCustomer, Customer,
    CustomerStats, DocumentInfo, DocumentList, ServiceStatus, Telemetry, UploadResponse,
};

/// Errors produced by API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The network call itself failed (DNS, refused connection, timeout)
    #[error("connection failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// A success payload could not be decoded
    #[error("invalid response: {0}")]
    Parse(String),

    /// Client-side input check failed before any request was sent
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Api { status, .. } if *status == 401 || *status == 403)
    }
}
