//! `inventory`: terminal front end for the inventory system.
//!
//! Runs the app shell against the backend, calls individual API
//! operations, and serves the development proxy.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inventory_client::api::Id;
use inventory_client::ApiClient;
use inventory_core::AppConfig;
use tracing::info;

use commands::resource::Filter;

/// Inventory management CLI.
#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Inventory management shell")]
struct Cli {
    /// Path to config file (default: ~/.inventory/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Backend origin, overrides `api.server` (e.g. http://127.0.0.1:5000).
    #[arg(long = "server", global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mount the shell and navigate to paths read from stdin.
    Open {
        /// Initial location.
        #[arg(default_value = "/")]
        path: String,
    },

    /// Get resource(s).
    Get {
        /// Resource type (products, categories, bom, orders, production, transactions).
        resource: String,
        /// Optional resource ID for single get.
        id: Option<Id>,
        #[command(flatten)]
        filter: Filter,
    },

    /// Create a resource.
    Create {
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource (PUT).
    Update {
        resource: String,
        id: Id,
        /// JSON body.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource.
    Delete {
        resource: String,
        id: Id,
        /// For bom: delete every line of product `id`.
        #[arg(long)]
        whole_product: bool,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Complete or cancel an order.
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Check stock availability.
    Check {
        /// JSON body, e.g. {"product_id": 1, "quantity": 5}.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Reports.
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Run the development proxy.
    Serve {
        /// Listen address (overrides dev_server.listen).
        #[arg(long)]
        listen: Option<String>,
    },

    /// Configuration file management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum OrderAction {
    Complete { id: Id },
    Cancel { id: Id },
}

#[derive(Subcommand, Debug)]
enum ReportAction {
    /// Download the BOM workbook.
    BomExport {
        #[arg(long)]
        out: PathBuf,
    },
    /// Material requirements.
    Materials,
    /// Cost analysis.
    Costs,
    /// Purchase list.
    PurchaseList,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write the effective configuration to the config path.
    Init,
}

fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load(&config_path)?;
    if let Some(server) = cli.server {
        config.api.server = server;
    }

    init_logging(&config);
    info!("Using configuration {}", config_path.display());

    match cli.command {
        Commands::Open { path } => {
            commands::open::run(config, &path).await?;
        }

        Commands::Get {
            resource,
            id,
            filter,
        } => {
            let client = ApiClient::new(&config.api)?;
            let payload = commands::resource::get(&client, &resource, id, &filter).await?;
            commands::resource::print(&payload)?;
        }

        Commands::Create {
            resource,
            json_body,
            file,
        } => {
            let body = if let Some(path) = file {
                std::fs::read_to_string(&path)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            let client = ApiClient::new(&config.api)?;
            let payload = commands::resource::create(&client, &resource, &body).await?;
            println!("{} created.", resource);
            commands::resource::print(&payload)?;
        }

        Commands::Update {
            resource,
            id,
            json_body,
        } => {
            let client = ApiClient::new(&config.api)?;
            let payload = commands::resource::update(&client, &resource, id, &json_body).await?;
            println!("{} {} updated.", resource, id);
            commands::resource::print(&payload)?;
        }

        Commands::Delete {
            resource,
            id,
            whole_product,
            yes,
        } => {
            if !yes {
                eprint!("Are you sure? [y/N]: ");
                let mut s = String::new();
                std::io::stdin().read_line(&mut s)?;
                if !s.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let client = ApiClient::new(&config.api)?;
            commands::resource::delete(&client, &resource, id, whole_product).await?;
            println!("{} {} deleted.", resource, id);
        }

        Commands::Order { action } => {
            let client = ApiClient::new(&config.api)?;
            let payload = match action {
                OrderAction::Complete { id } => {
                    commands::resource::order_action(&client, id, true).await?
                }
                OrderAction::Cancel { id } => {
                    commands::resource::order_action(&client, id, false).await?
                }
            };
            commands::resource::print(&payload)?;
        }

        Commands::Check { json_body } => {
            let client = ApiClient::new(&config.api)?;
            let payload = commands::resource::check(&client, &json_body).await?;
            commands::resource::print(&payload)?;
        }

        Commands::Report { action } => {
            let client = ApiClient::new(&config.api)?;
            let payload = match action {
                ReportAction::BomExport { out } => {
                    return commands::report::bom_export(&client, &out).await;
                }
                ReportAction::Materials => commands::report::material_requirements(&client).await?,
                ReportAction::Costs => commands::report::cost_analysis(&client).await?,
                ReportAction::PurchaseList => commands::report::purchase_list(&client).await?,
            };
            commands::resource::print(&payload)?;
        }

        Commands::Serve { listen } => {
            let mut dev = config.dev_server.clone();
            if let Some(listen) = listen {
                dev.listen = listen;
            }
            commands::serve::run(&dev).await?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("# {}", config_path.display());
                println!("{}", config.to_toml()?);
            }
            ConfigAction::Init => {
                config.save(&config_path)?;
                println!("Wrote {}", config_path.display());
            }
        },

        Commands::Version => {
            println!("inventory v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
