//! Console application state and page controller.
//!
//! `App` owns everything the UI renders: the session, the latest data
//! snapshots, the activity log, and the active page. Navigation triggers
//! exactly one data-refresh call per target page. All state lives in this
//! one structure rather than ambient globals so the controller can be
//! driven headlessly in tests.

pub mod scheduler;

pub use scheduler::RefreshScheduler;

use crate::activity::ActivityLog;
use crate::api::models::CreateCustomerRequest;
use crate::api::{
    ApiClient, ApiError, ClusterInfo, Collection, CollectionSpec, Customer, CustomerStats,
    ServiceStatus, Telemetry,
};
use crate::config::ConfigManager;
use crate::session::SessionStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Logical pages of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Customers,
    Collections,
    Status,
    Logs,
    Settings,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Customers,
        Page::Collections,
        Page::Status,
        Page::Logs,
        Page::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Customers => "Customer Management",
            Page::Collections => "Collections",
            Page::Status => "System Status",
            Page::Logs => "Logs",
            Page::Settings => "Settings",
        }
    }

    /// Parse a page name; unknown names yield `None` and navigation treats
    /// them as a no-op.
    pub fn parse(name: &str) -> Option<Page> {
        match name.to_ascii_lowercase().as_str() {
            "dashboard" => Some(Page::Dashboard),
            "customers" => Some(Page::Customers),
            "collections" => Some(Page::Collections),
            "status" => Some(Page::Status),
            "logs" => Some(Page::Logs),
            "settings" => Some(Page::Settings),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Reachability of the backend as last observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Online,
    Offline,
}

/// Latest fetched snapshots; always replaced wholesale by server responses
#[derive(Debug, Default)]
pub struct DashboardData {
    pub connection: ConnectionState,
    pub service: Option<ServiceStatus>,
    pub collections: Vec<Collection>,
    pub telemetry: Option<Telemetry>,
    pub customers: Vec<Customer>,
    pub customer_stats: Option<CustomerStats>,
    pub cluster: Option<ClusterInfo>,
}

/// Results of one full refresh cycle, gathered before any state is applied
#[derive(Debug)]
pub struct RefreshOutcome {
    pub service: Result<ServiceStatus, ApiError>,
    pub collections: Result<Vec<Collection>, ApiError>,
    pub telemetry: Result<Telemetry, ApiError>,
}

impl RefreshOutcome {
    /// Run the status -> collections -> telemetry sequence. Each step is
    /// captured independently so one failure does not abort the rest.
    pub async fn fetch(api: &ApiClient) -> Self {
        let service = api.service_status().await;
        let collections = api.collections_with_details().await;
        let telemetry = api.telemetry().await;
        Self {
            service,
            collections,
            telemetry,
        }
    }
}

/// Top-level application state
pub struct App {
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub config: ConfigManager,
    pub page: Page,
    pub activity: ActivityLog,
    pub data: DashboardData,
    /// Last user-facing status message (success or error)
    pub status_line: Option<String>,
    pub should_quit: bool,
    /// Set by logout; the UI loop rebuilds the whole state in response
    pub reset_requested: bool,
    next_cycle: u64,
    last_applied_cycle: u64,
}

impl App {
    pub fn new(api: Arc<ApiClient>, session: SessionStore, config: ConfigManager) -> Self {
        Self {
            api,
            session,
            config,
            page: Page::Dashboard,
            activity: ActivityLog::new(),
            data: DashboardData::default(),
            status_line: None,
            should_quit: false,
            reset_requested: false,
            next_cycle: 0,
            last_applied_cycle: 0,
        }
    }

    /// Discard all transient state after logout, equivalent to a fresh start
    pub fn reinitialize(&mut self) {
        self.page = Page::Dashboard;
        self.activity = ActivityLog::new();
        self.data = DashboardData::default();
        self.status_line = None;
        self.reset_requested = false;
        self.next_cycle = 0;
        self.last_applied_cycle = 0;
    }

    fn report_error(&mut self, context: &str, err: &ApiError) {
        let message = format!("{}: {}", context, err);
        self.activity.record(message.clone());
        self.status_line = Some(message);
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Switch the active page and run the data fetch bound to it
    pub async fn navigate(&mut self, page: Page) {
        self.page = page;
        match page {
            Page::Dashboard => self.refresh_dashboard().await,
            Page::Customers => self.load_customers().await,
            Page::Collections => self.load_collections().await,
            Page::Status => self.load_cluster().await,
            Page::Logs | Page::Settings => {}
        }
    }

    /// Navigate by name; unknown targets are ignored
    pub async fn navigate_by_name(&mut self, name: &str) {
        match Page::parse(name) {
            Some(page) => self.navigate(page).await,
            None => debug!(target_page = name, "ignoring unknown navigation target"),
        }
    }

    // -----------------------------------------------------------------------
    // Refresh cycle
    // -----------------------------------------------------------------------

    /// Allocate the identifier for a new refresh cycle
    pub fn begin_cycle(&mut self) -> u64 {
        self.next_cycle += 1;
        self.next_cycle
    }

    /// Apply a completed cycle's results. Results from a cycle older than
    /// the newest applied one are discarded, so an interleaved manual and
    /// scheduled refresh cannot roll the view backwards.
    pub fn apply_refresh(&mut self, cycle: u64, outcome: RefreshOutcome) -> bool {
        if cycle < self.last_applied_cycle {
            debug!(cycle, latest = self.last_applied_cycle, "discarding stale refresh cycle");
            return false;
        }
        self.last_applied_cycle = cycle;

        match outcome.service {
            Ok(service) => {
                self.data.connection = if service.is_online() {
                    ConnectionState::Online
                } else {
                    ConnectionState::Offline
                };
                self.data.service = Some(service);
            }
            Err(err) => {
                self.data.connection = ConnectionState::Offline;
                self.activity.record(format!("Connection error: {}", err));
            }
        }

        match outcome.collections {
            Ok(collections) => {
                self.activity
                    .record(format!("{} collections loaded", collections.len()));
                self.data.collections = collections;
            }
            Err(err) => self
                .activity
                .record(format!("Failed to load collections: {}", err)),
        }

        match outcome.telemetry {
            Ok(telemetry) => self.data.telemetry = Some(telemetry),
            Err(err) => self
                .activity
                .record(format!("Telemetry unavailable: {}", err)),
        }

        self.activity.record("Dashboard updated");
        true
    }

    /// Run one full refresh cycle and apply it
    pub async fn refresh_dashboard(&mut self) {
        let cycle = self.begin_cycle();
        self.activity.record("Refreshing dashboard");
        let outcome = RefreshOutcome::fetch(&self.api).await;
        self.apply_refresh(cycle, outcome);
    }

    // -----------------------------------------------------------------------
    // Page data
    // -----------------------------------------------------------------------

    pub async fn load_customers(&mut self) {
        match self.api.list_customers().await {
            Ok(customers) => {
                self.activity
                    .record(format!("{} customers loaded", customers.len()));
                self.data.customers = customers;
            }
            Err(err) => self.report_error("Failed to load customers", &err),
        }

        match self.api.customer_stats().await {
            Ok(stats) => self.data.customer_stats = Some(stats),
            Err(err) => debug!(error = %err, "customer stats unavailable"),
        }
    }

    pub async fn load_collections(&mut self) {
        match self.api.collections_with_details().await {
            Ok(collections) => {
                self.activity
                    .record(format!("{} collections loaded", collections.len()));
                self.data.collections = collections;
            }
            Err(err) => self.report_error("Failed to load collections", &err),
        }
    }

    pub async fn load_cluster(&mut self) {
        match self.api.cluster_info().await {
            Ok(cluster) => self.data.cluster = Some(cluster),
            Err(err) => self.report_error("Cluster info unavailable", &err),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations - every successful write re-fetches the affected lists
    // -----------------------------------------------------------------------

    pub async fn create_customer(&mut self, name: &str, email: &str, quota_mb: u64) {
        self.activity.record(format!("Creating customer: {}", name));
        let request = CreateCustomerRequest {
            name: name.to_string(),
            email: email.to_string(),
            quota_mb,
        };

        match self.api.create_customer(&request).await {
            Ok(response) => {
                self.activity.record(format!(
                    "Customer created: {} (collection {})",
                    response.customer.customer_id, response.customer.collection_name
                ));
                self.status_line = Some(format!(
                    "Customer {} created",
                    response.customer.customer_id
                ));
                self.load_customers().await;
            }
            Err(err) => self.report_error("Customer creation failed", &err),
        }
    }

    pub async fn delete_customer(&mut self, customer_id: &str) {
        self.activity
            .record(format!("Deleting customer: {}", customer_id));
        match self.api.delete_customer(customer_id).await {
            Ok(()) => {
                self.activity
                    .record(format!("Customer deleted: {}", customer_id));
                self.status_line = Some(format!("Customer {} deleted", customer_id));
                self.load_customers().await;
            }
            Err(err) => self.report_error("Customer deletion failed", &err),
        }
    }

    pub async fn upload_document(
        &mut self,
        customer_id: &str,
        path: &Path,
        description: Option<&str>,
    ) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(err) => {
                let message = format!("Cannot read {}: {}", path.display(), err);
                self.activity.record(message.clone());
                self.status_line = Some(message);
                return;
            }
        };

        self.activity.record(format!("Uploading: {}", file_name));
        match self
            .api
            .upload_document(customer_id, &file_name, contents, description)
            .await
        {
            Ok(response) => {
                self.activity
                    .record(format!("Document uploaded: {}", response.file_name));
                self.status_line = Some(format!(
                    "Uploaded {} ({:.2} MB)",
                    response.file_name, response.size_mb
                ));
                self.load_customers().await;
            }
            Err(err) => self.report_error("Upload failed", &err),
        }
    }

    pub async fn create_collection(&mut self, name: &str, spec: CollectionSpec) {
        self.activity.record(format!("Creating collection: {}", name));
        match self.api.create_collection(name, &spec).await {
            Ok(()) => {
                self.activity
                    .record(format!("Collection created: {}", name));
                self.status_line = Some(format!("Collection {} created", name));
                self.load_collections().await;
            }
            Err(err) => self.report_error("Collection creation failed", &err),
        }
    }

    pub async fn delete_collection(&mut self, name: &str) {
        self.activity.record(format!("Deleting collection: {}", name));
        match self.api.delete_collection(name).await {
            Ok(()) => {
                self.activity
                    .record(format!("Collection deleted: {}", name));
                self.status_line = Some(format!("Collection {} deleted", name));
                self.load_collections().await;
            }
            Err(err) => self.report_error("Collection deletion failed", &err),
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Attempt a login; on success the dashboard is refreshed immediately
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        match self.session.login(&self.api, username, password).await {
            Ok(()) => {
                self.activity.record("Login successful");
                self.status_line = None;
                self.refresh_dashboard().await;
                true
            }
            Err(err) => {
                self.status_line = Some(err.to_string());
                false
            }
        }
    }

    /// Log out and request a full state reset
    pub async fn logout(&mut self) {
        if let Err(err) = self.session.logout(&self.api).await {
            self.status_line = Some(err.to_string());
        }
        self.reset_requested = true;
    }

    pub async fn toggle_theme(&mut self) {
        let theme = self.session.theme().toggled();
        if let Err(err) = self.session.set_theme(theme).await {
            self.status_line = Some(err.to_string());
            return;
        }
        self.activity
            .record(format!("Theme changed: {}", theme.label()));
    }

    /// Persist a new auto-refresh interval; the caller reconfigures the
    /// scheduler with the returned value.
    pub fn set_refresh_interval(&mut self, seconds: u64) -> u64 {
        let seconds = seconds.clamp(5, 3600);
        if let Err(err) = self
            .config
            .update(|c| c.refresh.interval_seconds = seconds)
        {
            self.status_line = Some(err.to_string());
        } else {
            self.activity
                .record(format!("Auto-refresh interval set to {}s", seconds));
        }
        seconds
    }
}
