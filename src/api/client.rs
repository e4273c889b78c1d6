//! Client implementation for the admin API.
//!
//! Thin wrapper over `reqwest`: one method per backend operation, bearer
//! auth when a token is installed, and immediate error surfacing. The only
//! composition the client performs itself is collection-detail enrichment,
//! where the per-collection fetches run concurrently.

use super::models::{
    ChangePasswordRequest, ClusterInfo, Collection, CollectionDetail, CollectionListing,
    CollectionSpec, CollectionSummary, CreateCustomerRequest, CreateCustomerResponse, Customer,
    CustomerList, CustomerStats, DocumentList, LoginRequest, LoginResponse, ResultEnvelope,
    ServiceStatus, Telemetry, UploadResponse,
};
use super::ApiError;
use futures::future::join_all;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use tracing::{debug, warn};

/// HTTP client for the vector-database admin API
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiClient {
    /// Create a client against the given base URL (no trailing slash needed)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install the bearer token attached to subsequent requests
    pub fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        let token = self.token.read().ok().and_then(|t| t.clone());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(req: RequestBuilder) -> Result<Response, ApiError> {
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    /// Map a non-success response to `ApiError::Api`, preferring the JSON
    /// `detail` field when the server provides one.
    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or(body);
        ApiError::Api { status, detail }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::send(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let req = self.request(Method::POST, "/api/auth/login").json(&body);
        Self::decode(Self::send(req).await?).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        Self::send(self.request(Method::POST, "/api/auth/logout")).await?;
        Ok(())
    }

    pub async fn change_password(&self, old: &str, new: &str) -> Result<(), ApiError> {
        let body = ChangePasswordRequest {
            old_password: old.to_string(),
            new_password: new.to_string(),
        };
        let req = self
            .request(Method::POST, "/api/auth/change-password")
            .json(&body);
        Self::send(req).await?;
        Ok(())
    }

    /// Validate the installed token against the identity endpoint
    pub async fn whoami(&self) -> Result<(), ApiError> {
        Self::send(self.request(Method::GET, "/api/auth/me")).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Customers
    // -----------------------------------------------------------------------

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let list: CustomerList = self.get_json("/api/customers").await?;
        Ok(list.customers)
    }

    pub async fn customer_stats(&self) -> Result<CustomerStats, ApiError> {
        self.get_json("/api/customers/stats").await
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, ApiError> {
        self.get_json(&format!("/api/customers/{}", customer_id))
            .await
    }

    pub async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<CreateCustomerResponse, ApiError> {
        let req = self.request(Method::POST, "/api/customers").json(request);
        Self::decode(Self::send(req).await?).await
    }

    pub async fn delete_customer(&self, customer_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/customers/{}", customer_id);
        Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn list_documents(&self, customer_id: &str) -> Result<DocumentList, ApiError> {
        self.get_json(&format!("/api/customers/{}/documents", customer_id))
            .await
    }

    /// Upload a document for a customer as a multipart form
    pub async fn upload_document(
        &self,
        customer_id: &str,
        file_name: &str,
        contents: Vec<u8>,
        description: Option<&str>,
    ) -> Result<UploadResponse, ApiError> {
        let part = Part::bytes(contents).file_name(file_name.to_string());
        let mut form = Form::new().part("file", part);
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }

        let path = format!("/api/customers/{}/upload", customer_id);
        let req = self.request(Method::POST, &path).multipart(form);
        Self::decode(Self::send(req).await?).await
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    pub async fn list_collections(&self) -> Result<Vec<CollectionSummary>, ApiError> {
        let envelope: ResultEnvelope<CollectionListing> =
            self.get_json("/api/qdrant/collections").await?;
        Ok(envelope.result.unwrap_or_default().collections)
    }

    pub async fn collection_detail(&self, name: &str) -> Result<Collection, ApiError> {
        let envelope: ResultEnvelope<CollectionDetail> = self
            .get_json(&format!("/api/qdrant/collections/{}", name))
            .await?;
        let detail = envelope.result.unwrap_or_default();
        Ok(Collection {
            name: name.to_string(),
            points_count: detail.points_count,
            vectors_count: detail.points_count,
            config: detail.config,
        })
    }

    /// List collections and enrich each entry with its detail payload.
    ///
    /// Detail fetches run concurrently; an individual failure degrades that
    /// entry to zeroed counts instead of failing the whole listing.
    pub async fn collections_with_details(&self) -> Result<Vec<Collection>, ApiError> {
        let summaries = self.list_collections().await?;
        let details = join_all(
            summaries
                .iter()
                .map(|summary| self.collection_detail(&summary.name)),
        )
        .await;

        Ok(summaries
            .into_iter()
            .zip(details)
            .map(|(summary, detail)| match detail {
                Ok(collection) => collection,
                Err(err) => {
                    warn!(collection = %summary.name, error = %err, "detail fetch failed");
                    Collection::unresolved(summary.name)
                }
            })
            .collect())
    }

    pub async fn create_collection(
        &self,
        name: &str,
        spec: &CollectionSpec,
    ) -> Result<(), ApiError> {
        validate_collection_name(name)?;
        let path = format!("/api/qdrant/collections/{}", name);
        let req = self.request(Method::POST, &path).json(&spec.to_body());
        Self::send(req).await?;
        Ok(())
    }

    pub async fn delete_collection(&self, name: &str) -> Result<(), ApiError> {
        let path = format!("/api/qdrant/collections/{}", name);
        Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Cluster & telemetry
    // -----------------------------------------------------------------------

    pub async fn service_status(&self) -> Result<ServiceStatus, ApiError> {
        self.get_json("/api/qdrant/status").await
    }

    pub async fn cluster_info(&self) -> Result<ClusterInfo, ApiError> {
        let envelope: ResultEnvelope<ClusterInfo> = self.get_json("/api/qdrant/cluster").await?;
        debug!("fetched cluster info");
        Ok(envelope.result.unwrap_or_default())
    }

    pub async fn telemetry(&self) -> Result<Telemetry, ApiError> {
        let envelope: ResultEnvelope<Telemetry> = self.get_json("/api/qdrant/telemetry").await?;
        Ok(envelope.result.unwrap_or_default())
    }
}

/// Collection names are restricted to letters, digits, dashes and
/// underscores.
pub fn validate_collection_name(name: &str) -> Result<(), ApiError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation {
            field: "collection name".to_string(),
            message: "only letters, digits, dashes and underscores are allowed".to_string(),
        })
    }
}

/// Derive the conventional document-collection name for a customer,
/// e.g. `"Acme Corp"` becomes `acme_corp_document`.
pub fn suggest_collection_name(customer_name: &str) -> String {
    let slug = customer_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_document", slug)
}
