//! # Portos CLI
//!
//! The storefront as a command line. Each subcommand is one storefront page.
//!
//! ## Module Organization
//! ```text
//! portos_cli/
//! ├── lib.rs          ◄─── argument parsing, startup, dispatch
//! ├── app.rs          ◄─── App: config + StorefrontClient + Output
//! ├── output.rs       ◄─── text or --json ApiResponse envelope
//! ├── render.rs       ◄─── text tables for products, cart, orders
//! ├── prompt.rs       ◄─── reading answers from stdin
//! ├── commands/
//! │   ├── auth.rs     ◄─── login, register, logout, whoami
//! │   ├── product.rs  ◄─── products, categories, product, review
//! │   ├── cart.rs     ◄─── cart show/add/set/inc/dec/remove/shell
//! │   ├── address.rs  ◄─── address list/add/update/delete/default
//! │   ├── order.rs    ◄─── checkout, orders
//! │   └── config.rs   ◄─── config show/init
//! └── error.rs        ◄─── CliError + exit status
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()     RUST_LOG, default "info,portos=debug", stderr    │
//! │  2. parse arguments    clap derive                                      │
//! │  3. load config        defaults ◄ portos.toml ◄ PORTOS_* ◄ --api-url    │
//! │  4. restore session    session.json, dropped if expired                 │
//! │  5. dispatch command   result printed as text or JSON envelope          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod commands;
pub mod error;
pub mod output;
pub mod prompt;
pub mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use portos_client::{ClientConfig, ClientError};
use portos_core::{Category, Id};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use app::App;
use commands::address::AddressAction;
use commands::cart::CartAction;
use commands::config::ConfigAction;
use commands::order::CheckoutArgs;
use commands::product::{ProductFilters, ReviewArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "portos", author, version, about = "Portos storefront from the terminal")]
pub struct Cli {
    /// Print the `{success, data, error, statusCode}` envelope as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL; wins over the config file and PORTOS_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Prompted for (twice) when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Browse the catalogue
    Products(ProductFilters),
    /// List categories, or browse one
    Categories {
        /// e.g. `sensors`
        category: Option<Category>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Product detail with ratings and reviews
    Product { id: Id },
    /// Review a product from one of your orders
    Review(ReviewArgs),
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Manage delivery addresses
    Address {
        #[command(subcommand)]
        action: Option<AddressAction>,
    },
    /// Place an order for the cart, or for a single product
    Checkout(CheckoutArgs),
    /// Order history, or one order with its tracking timeline
    Orders { order_id: Option<Id> },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Initializes the tracing subscriber. Logs go to stderr so `--json`
/// output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=warn` - quiet
/// - `RUST_LOG=portos_client=trace` - everything from the client
/// - Default: `info,portos=debug`
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,portos=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses arguments and runs the command.
pub async fn run() -> ExitCode {
    run_with(Cli::parse()).await
}

pub async fn run_with(cli: Cli) -> ExitCode {
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(report(&e)),
    }
}

/// Prints a failure to stderr and picks the exit status.
fn report(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        debug!(error = ?cli_err, "Command failed");
        eprintln!("error: {}", cli_err.user_message());
        if let Some(hint) = cli_err.hint() {
            eprintln!("hint: {hint}");
        }
        return cli_err.code().exit_status();
    }

    eprintln!("error: {err:#}");
    match err.downcast_ref::<ClientError>() {
        Some(client_err) if client_err.is_config_error() => {
            error::ErrorCode::ConfigError.exit_status()
        }
        _ => 1,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.clone()).context("loading configuration")?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        config.validate().context("--api-url")?;
    }
    Ok(config)
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // `config init` must work even when the existing file does not parse.
    if let Command::Config {
        action: ConfigAction::Init { force },
    } = &cli.command
    {
        return Ok(commands::config::init(cli.config.clone(), *force, cli.json)?);
    }

    let config = load_config(&cli)?;
    if let Command::Config { .. } = cli.command {
        return Ok(commands::config::show(&config, cli.config, cli.json)?);
    }

    let app = App::bootstrap(config, cli.json).await?;
    debug!(base_url = %app.client.base_url(), "Dispatching command");

    match cli.command {
        Command::Login { username, password } => {
            commands::auth::login(&app, username, password).await?
        }
        Command::Register {
            username,
            email,
            password,
        } => commands::auth::register(&app, username, email, password).await?,
        Command::Logout => commands::auth::logout(&app).await?,
        Command::Whoami => commands::auth::whoami(&app).await?,
        Command::Products(filters) => commands::product::products(&app, &filters).await?,
        Command::Categories { category, page } => {
            commands::product::categories(&app, category, page).await?
        }
        Command::Product { id } => commands::product::product(&app, id).await?,
        Command::Review(args) => commands::product::review(&app, args).await?,
        Command::Cart { action } => {
            commands::cart::run(&app, action.unwrap_or(CartAction::Show)).await?
        }
        Command::Address { action } => {
            commands::address::run(&app, action.unwrap_or(AddressAction::List)).await?
        }
        Command::Checkout(args) => commands::order::checkout(&app, args).await?,
        Command::Orders { order_id } => commands::order::orders(&app, order_id).await?,
        Command::Config { .. } => {}
    }
    Ok(())
}
