//! vecops - terminal admin console for vector-database deployments
//!
//! `vecops start` launches the interactive dashboard; the remaining
//! subcommands run the same operations headlessly against the stored
//! session.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use vecops::api::models::CollectionSpec;
use vecops::app::App;
use vecops::ui::format::{format_bytes, format_count};
use vecops::ui::views::{NO_COLLECTIONS, NO_CUSTOMERS};
use vecops::{ApiClient, ConfigManager, SessionStore};

/// vecops console CLI
#[derive(Parser)]
#[command(name = "vecops")]
#[command(about = "Terminal admin console for vector-database deployments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configured one for this run
    #[arg(short, long)]
    server: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard (default)
    Start,

    /// Authenticate and store the session token
    Login {
        username: String,
        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the stored session
    Logout,

    /// Change the operator password
    ChangePassword,

    /// Print service, cluster, and telemetry status
    Status,

    /// Customer operations
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },

    /// Collection operations
    Collections {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Upload a document for a customer
    Upload {
        customer_id: String,
        file: PathBuf,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show the resolved configuration
    Config,
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List customers with quota usage
    List,
    /// Create a customer; a document collection is provisioned for it
    Create {
        name: String,
        email: String,
        #[arg(long, default_value_t = 100)]
        quota_mb: u64,
    },
    /// Delete a customer and all of its documents
    Delete { customer_id: String },
    /// Show one customer with its uploaded documents
    Show { customer_id: String },
}

#[derive(Subcommand)]
enum CollectionCommands {
    /// List collections with their configuration
    List,
    /// Create a collection
    Create {
        name: String,
        #[arg(long, default_value_t = 384)]
        vector_size: u64,
        #[arg(long, default_value = "Cosine")]
        distance: String,
        #[arg(long)]
        on_disk_payload: bool,
    },
    /// Delete a collection
    Delete { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = ConfigManager::new(cli.config.clone()).context("loading configuration")?;
    let base_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.config().server.base_url.clone());
    let api = Arc::new(ApiClient::new(&base_url)?);
    let mut session = SessionStore::load(SessionStore::default_path()).await?;

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => {
            session.restore(&api).await?;
            let app = App::new(api, session, config);
            vecops::ui::run(app).await?;
        }
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            session.login(&api, &username, &password).await?;
            println!("Logged in as {}", username);
        }
        Commands::Logout => {
            session.logout(&api).await?;
            println!("Logged out");
        }
        Commands::ChangePassword => {
            require_session(&api, &mut session).await?;
            let old = prompt("Current password: ")?;
            let new = prompt("New password: ")?;
            session.change_password(&api, &old, &new).await?;
            println!("Password changed");
        }
        Commands::Status => {
            require_session(&api, &mut session).await?;
            print_status(&api).await?;
        }
        Commands::Customers { command } => {
            require_session(&api, &mut session).await?;
            run_customer_command(&api, command).await?;
        }
        Commands::Collections { command } => {
            require_session(&api, &mut session).await?;
            run_collection_command(&api, command).await?;
        }
        Commands::Upload {
            customer_id,
            file,
            description,
        } => {
            require_session(&api, &mut session).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let contents = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let response = api
                .upload_document(&customer_id, &file_name, contents, description.as_deref())
                .await?;
            println!("Uploaded {} ({:.2} MB)", response.file_name, response.size_mb);
        }
        Commands::Config => {
            println!("# configuration for {}", base_url);
            println!("{}", toml::to_string_pretty(config.config())?);
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let level = level.parse().unwrap_or(tracing::Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Restore the stored token or bail with a pointer to `vecops login`
async fn require_session(api: &ApiClient, session: &mut SessionStore) -> Result<()> {
    if !session.restore(api).await? {
        bail!("not logged in; run `vecops login <username>` first");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

async fn print_status(api: &ApiClient) -> Result<()> {
    let status = api.service_status().await?;
    println!("Service:   {} ({})", status.status, status.version());

    let cluster = api.cluster_info().await?;
    let peer = cluster
        .peer_id
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    println!("Peer ID:   {}", peer);
    println!("Raft role: {}", cluster.raft_role());

    let telemetry = api.telemetry().await?;
    println!("Vectors:   {}", format_count(telemetry.total_vectors()));
    println!("Memory:    {}", format_bytes(telemetry.memory_usage()));
    Ok(())
}

async fn run_customer_command(api: &ApiClient, command: CustomerCommands) -> Result<()> {
    match command {
        CustomerCommands::List => {
            let customers = api.list_customers().await?;
            if customers.is_empty() {
                println!("{}", NO_CUSTOMERS);
                return Ok(());
            }
            for c in &customers {
                println!(
                    "{:<10} {:<24} {:>6.1}%  {:>6} MB  {}",
                    c.customer_id, c.name, c.usage_percent, c.quota_mb, c.email
                );
            }
            let stats = api.customer_stats().await?;
            println!(
                "-- {} customers, {} active, {} documents, {:.2} MB in use",
                stats.total_customers,
                stats.active_customers,
                format_count(stats.total_documents),
                stats.total_used_mb
            );
        }
        CustomerCommands::Create {
            name,
            email,
            quota_mb,
        } => {
            let request = vecops::api::models::CreateCustomerRequest {
                name: name.clone(),
                email,
                quota_mb,
            };
            let response = api.create_customer(&request).await?;
            println!(
                "Created customer {} (collection {})",
                response.customer.customer_id, response.customer.collection_name
            );
        }
        CustomerCommands::Delete { customer_id } => {
            api.delete_customer(&customer_id).await?;
            println!("Deleted customer {}", customer_id);
        }
        CustomerCommands::Show { customer_id } => {
            let customer = api.get_customer(&customer_id).await?;
            println!("{} <{}>", customer.name, customer.email);
            println!("ID:         {}", customer.customer_id);
            println!("Collection: {}", customer.collection_name);
            println!(
                "Quota:      {:.2} / {} MB ({:.1}%)",
                customer.used_mb, customer.quota_mb, customer.usage_percent
            );
            println!("Documents:  {}", customer.document_count);

            let documents = api.list_documents(&customer_id).await?;
            if documents.documents.is_empty() {
                println!("No documents uploaded yet");
            } else {
                for doc in &documents.documents {
                    println!(
                        "  {} ({} chunks, {:.2} MB)",
                        doc.filename, doc.chunks, doc.file_size_mb
                    );
                }
                println!(
                    "  -- {} documents, {} chunks total",
                    documents.total_documents, documents.total_chunks
                );
            }
        }
    }
    Ok(())
}

async fn run_collection_command(api: &ApiClient, command: CollectionCommands) -> Result<()> {
    match command {
        CollectionCommands::List => {
            let collections = api.collections_with_details().await?;
            if collections.is_empty() {
                println!("{}", NO_COLLECTIONS);
                return Ok(());
            }
            for c in &collections {
                let size = c
                    .vector_size()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "{:<32} {:>10} vectors  dim {:>5}  {}",
                    c.name,
                    format_count(c.vectors_count),
                    size,
                    c.distance().unwrap_or("N/A")
                );
            }
        }
        CollectionCommands::Create {
            name,
            vector_size,
            distance,
            on_disk_payload,
        } => {
            let spec = CollectionSpec {
                vector_size,
                distance,
                on_disk_payload,
            };
            api.create_collection(&name, &spec).await?;
            println!("Created collection {}", name);
        }
        CollectionCommands::Delete { name } => {
            api.delete_collection(&name).await?;
            println!("Deleted collection {}", name);
        }
    }
    Ok(())
}
