//! MediMart CLI - catalog seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the product catalog from a JSON file
//! mm-cli seed products -f catalog.json
//!
//! # Promote a user to admin
//! mm-cli role set -u <uid> -r admin
//!
//! # Inspect or replace the shipping cost configuration
//! mm-cli shipping get
//! mm-cli shipping set -f shipping.json
//! ```
//!
//! Platform credentials come from the same environment variables the
//! storefront server reads (`MEDIMART_PLATFORM_URL`, project, API key).
//!
//! # Commands
//!
//! - `seed products` - Create catalog products from a JSON file
//! - `role set` - Change a user profile's role
//! - `shipping get` / `shipping set` - Manage shipping costs

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mm-cli")]
#[command(author, version, about = "MediMart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed platform collections
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage user roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Manage shipping cost configuration
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed the product catalog from a JSON file
    Products {
        /// Path to a JSON array of product records
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Set a user's role
    Set {
        /// User id (the identity uid)
        #[arg(short, long)]
        uid: String,

        /// Role to assign (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

#[derive(Subcommand)]
enum ShippingAction {
    /// Show the current shipping cost configuration
    Get,
    /// Replace the shipping cost configuration from a JSON file
    Set {
        /// Path to a JSON shipping cost configuration
        #[arg(short, long)]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::catalog::seed_products(&file).await?,
        },
        Commands::Role { action } => match action {
            RoleAction::Set { uid, role } => commands::users::set_role(&uid, &role).await?,
        },
        Commands::Shipping { action } => match action {
            ShippingAction::Get => commands::shipping::get().await?,
            ShippingAction::Set { file } => commands::shipping::set(&file).await?,
        },
    }
    Ok(())
}
