//! Merchant Admin CLI - session, catalog, order and settings management.
//!
//! # Usage
//!
//! ```bash
//! # Start a session (password read from MERCHANT_PASSWORD or stdin)
//! ma-cli login -e owner@shop.example
//!
//! # Preview the variants of a product without saving
//! ma-cli variants generate 42 -o "Size=S,M,L" -o "Color=Red,Blue" --dry-run
//!
//! # Generate and save them with 5 units each
//! ma-cli variants generate 42 -o "Size=S,M,L" -o "Color=Red,Blue" -q 5
//!
//! # Ship an order
//! ma-cli orders set-status 1001 shipped --note "DHL 123"
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `status` - Session management
//! - `products list|show` - Browse the catalog
//! - `variants generate` - Regenerate a product's variants from its options
//! - `orders list|show|set-status` - Order management
//! - `settings payment` - Show enabled payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use merchant_admin_client::{
    ApiClient, ClientConfig, FileTokenStore, LogFormat, TelemetryConfig,
};
use merchant_admin_core::{OrderStatus, ProductOption};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "ma-cli")]
#[command(author, version, about = "Merchant admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session tokens
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// End the session and forget the stored tokens
    Logout,
    /// Show whether a session is stored
    Status,
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage product variants
    Variants {
        #[command(subcommand)]
        action: VariantAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show store settings
    Settings {
        #[command(subcommand)]
        section: SettingsSection,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<u32>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product and its variants
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum VariantAction {
    /// Replace a product's variants with every combination of the given options
    Generate {
        /// Product ID
        product_id: String,

        /// Option as `Name=value1,value2` (repeat up to 4 times)
        #[arg(short, long = "option", value_parser = commands::variants::parse_option, required = true)]
        options: Vec<ProductOption>,

        /// Base SKU (defaults to the product's SKU)
        #[arg(long)]
        base_sku: Option<String>,

        /// Price for every variant (defaults to the product's price)
        #[arg(long)]
        price: Option<Decimal>,

        /// Stock for every variant
        #[arg(short, long, default_value_t = 0)]
        quantity: u32,

        /// Require shoppers to pick a variant
        #[arg(long)]
        required: bool,

        /// Print the variants without saving them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<u32>,

        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show {
        /// Order ID
        id: String,
    },
    /// Move an order to a new status
    SetStatus {
        /// Order ID
        id: String,

        /// New status
        status: OrderStatus,

        /// Note for the order history
        #[arg(short, long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsSection {
    /// Show enabled payment methods
    Payment,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(telemetry: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = telemetry.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: telemetry
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "merchant_admin_cli=info,merchant_admin_client=info".into());

    let json = telemetry.log_format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&TelemetryConfig::default());
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config.telemetry);
    init_tracing(&config.telemetry);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            commands::report(&e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let store = Arc::new(FileTokenStore::new(&config.token_file));
    let client = ApiClient::new(config, store)?;

    match cli.command {
        Commands::Login { email } => commands::session::login(&client, &email).await,
        Commands::Logout => commands::session::logout(&client).await,
        Commands::Status => commands::session::status(&client, config),
        Commands::Products { action } => match action {
            ProductAction::List { page, search } => {
                commands::products::list(&client, page, search).await
            }
            ProductAction::Show { id } => commands::products::show(&client, &id).await,
        },
        Commands::Variants { action } => match action {
            VariantAction::Generate {
                product_id,
                options,
                base_sku,
                price,
                quantity,
                required,
                dry_run,
            } => {
                commands::variants::generate(
                    &client,
                    &commands::variants::GenerateArgs {
                        product_id,
                        options,
                        base_sku,
                        price,
                        quantity,
                        required,
                        dry_run,
                    },
                )
                .await
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List { page, status } => {
                commands::orders::list(&client, page, status).await
            }
            OrderAction::Show { id } => commands::orders::show(&client, &id).await,
            OrderAction::SetStatus { id, status, note } => {
                commands::orders::set_status(&client, &id, status, note).await
            }
        },
        Commands::Settings { section } => match section {
            SettingsSection::Payment => commands::settings::payment(&client).await,
        },
    }
}
