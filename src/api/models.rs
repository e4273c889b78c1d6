//! Wire-level view models for the admin API.
//!
//! These are transient snapshots: fetched fresh on every call, never cached
//! past the current render, never mutated locally. Optional fields default
//! rather than fail so a sparse backend answer still renders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generic `{"result": ...}` envelope used by the vector-engine passthrough
/// endpoints.
#[derive(Debug, Deserialize)]
pub struct ResultEnvelope<T> {
    #[serde(default)]
    pub result: Option<T>,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// A customer as reported by the backend, including derived quota figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub collection_name: String,
    pub quota_mb: u64,
    pub used_mb: f64,
    pub remaining_mb: f64,
    pub usage_percent: f64,
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_upload: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerList {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Aggregate usage figures across all customers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerStats {
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub active_customers: u64,
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub total_used_mb: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub quota_mb: u64,
}

/// Identifiers of a freshly created customer
#[derive(Debug, Deserialize)]
pub struct CreatedCustomer {
    pub customer_id: String,
    pub collection_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerResponse {
    pub customer: CreatedCustomer,
}

/// One uploaded document in a customer's inventory
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    #[serde(default)]
    pub chunks: u64,
    #[serde(default)]
    pub file_size_mb: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub total_chunks: u64,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub file_name: String,
    #[serde(default)]
    pub size_mb: f64,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Summary entry from the collection listing
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSummary {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionListing {
    #[serde(default)]
    pub collections: Vec<CollectionSummary>,
}

/// Detail payload for a single collection, merged with its name by the client
#[derive(Debug, Default, Deserialize)]
pub struct CollectionDetail {
    #[serde(default)]
    pub points_count: u64,
    #[serde(default)]
    pub config: CollectionConfig,
}

/// A collection with its enriched detail information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub points_count: u64,
    #[serde(default)]
    pub vectors_count: u64,
    #[serde(default)]
    pub config: CollectionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default)]
    pub params: Option<CollectionParams>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionParams {
    #[serde(default)]
    pub vectors: Option<VectorParams>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorParams {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub distance: Option<String>,
}

impl Collection {
    /// Placeholder entry for a collection whose detail fetch failed
    pub fn unresolved(name: String) -> Self {
        Self {
            name,
            points_count: 0,
            vectors_count: 0,
            config: CollectionConfig::default(),
        }
    }

    pub fn vector_size(&self) -> Option<u64> {
        self.config.params.as_ref()?.vectors.as_ref()?.size
    }

    pub fn distance(&self) -> Option<&str> {
        self.config
            .params
            .as_ref()?
            .vectors
            .as_ref()?
            .distance
            .as_deref()
    }
}

/// Creation parameters for a new collection
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub vector_size: u64,
    pub distance: String,
    pub on_disk_payload: bool,
}

impl CollectionSpec {
    pub(crate) fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "vectors": {
                "size": self.vector_size,
                "distance": self.distance,
            }
        });
        if self.on_disk_payload {
            body["on_disk_payload"] = serde_json::Value::Bool(true);
        }
        body
    }
}

// ---------------------------------------------------------------------------
// Cluster & telemetry
// ---------------------------------------------------------------------------

/// Service health as reported by the status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<ServiceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub version: Option<String>,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }

    pub fn version(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.version.as_deref())
            .unwrap_or("v1.x")
    }
}

/// Read-only cluster snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub peer_id: Option<u64>,
    #[serde(default)]
    pub raft_info: Option<RaftInfo>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaftInfo {
    #[serde(default)]
    pub role: Option<String>,
}

impl ClusterInfo {
    pub fn raft_role(&self) -> &str {
        self.raft_info
            .as_ref()
            .and_then(|r| r.role.as_deref())
            .unwrap_or("Standalone")
    }
}

/// Engine telemetry snapshot.
///
/// The engine reports `collections` either as an array or as a name-keyed
/// map depending on version; both decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Telemetry {
    #[serde(default)]
    pub collections: Option<TelemetryCollections>,
    #[serde(default)]
    pub app: Option<TelemetryApp>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TelemetryCollections {
    List(Vec<TelemetryCollection>),
    Map(HashMap<String, TelemetryCollection>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryCollection {
    #[serde(default)]
    pub vectors_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryApp {
    #[serde(default)]
    pub memory_usage: u64,
    #[serde(default)]
    pub status: Option<String>,
}

impl Telemetry {
    /// Sum of vector counts across all reported collections
    pub fn total_vectors(&self) -> u64 {
        match &self.collections {
            Some(TelemetryCollections::List(list)) => {
                list.iter().map(|c| c.vectors_count).sum()
            }
            Some(TelemetryCollections::Map(map)) => {
                map.values().map(|c| c.vectors_count).sum()
            }
            None => 0,
        }
    }

    pub fn memory_usage(&self) -> u64 {
        self.app.as_ref().map(|a| a.memory_usage).unwrap_or(0)
    }

    pub fn app_status(&self) -> &str {
        self.app
            .as_ref()
            .and_then(|a| a.status.as_deref())
            .unwrap_or("Active")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_collections_decode_as_array() {
        let telemetry: Telemetry = serde_json::from_str(
            r#"{"collections": [{"vectors_count": 10}, {"vectors_count": 5}],
                "app": {"memory_usage": 2048, "status": "running"}}"#,
        )
        .unwrap();
        assert_eq!(telemetry.total_vectors(), 15);
        assert_eq!(telemetry.memory_usage(), 2048);
        assert_eq!(telemetry.app_status(), "running");
    }

    #[test]
    fn telemetry_collections_decode_as_map() {
        let telemetry: Telemetry = serde_json::from_str(
            r#"{"collections": {"docs": {"vectors_count": 7}, "faq": {"vectors_count": 3}}}"#,
        )
        .unwrap();
        assert_eq!(telemetry.total_vectors(), 10);
        assert_eq!(telemetry.memory_usage(), 0);
        assert_eq!(telemetry.app_status(), "Active");
    }

    #[test]
    fn collection_without_config_reports_no_params() {
        let collection: Collection =
            serde_json::from_str(r#"{"name": "docs", "points_count": 3}"#).unwrap();
        assert_eq!(collection.vector_size(), None);
        assert_eq!(collection.distance(), None);
    }

    #[test]
    fn collection_with_full_config() {
        let collection: Collection = serde_json::from_str(
            r#"{"name": "docs", "points_count": 3, "vectors_count": 3,
                "config": {"params": {"vectors": {"size": 384, "distance": "Cosine"}}}}"#,
        )
        .unwrap();
        assert_eq!(collection.vector_size(), Some(384));
        assert_eq!(collection.distance(), Some("Cosine"));
    }

    #[test]
    fn cluster_defaults_to_standalone_role() {
        let cluster: ClusterInfo = serde_json::from_str(r#"{"peer_id": 42}"#).unwrap();
        assert_eq!(cluster.raft_role(), "Standalone");

        let cluster: ClusterInfo =
            serde_json::from_str(r#"{"raft_info": {"role": "Leader"}}"#).unwrap();
        assert_eq!(cluster.raft_role(), "Leader");
    }

    #[test]
    fn collection_spec_body_omits_default_payload_flag() {
        let spec = CollectionSpec {
            vector_size: 768,
            distance: "Dot".to_string(),
            on_disk_payload: false,
        };
        let body = spec.to_body();
        assert_eq!(body["vectors"]["size"], 768);
        assert!(body.get("on_disk_payload").is_none());

        let spec = CollectionSpec {
            on_disk_payload: true,
            ..spec
        };
        assert_eq!(spec.to_body()["on_disk_payload"], true);
    }
}
