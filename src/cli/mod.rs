pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::client::CatalogClient;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog CLI - manage products over the catalog API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "API base URL (default http://localhost:8080, or CATALOG_SERVER)"
    )]
    pub server: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Bearer token from the identity provider (or CATALOG_TOKEN)"
    )]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Product operations")]
    Products {
        #[command(subcommand)]
        cmd: commands::products::ProductCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = client_from(&cli)?;

    match cli.command {
        Commands::Products { cmd } => {
            commands::products::handle(cmd, &client, output_format).await
        }
    }
}

fn client_from(cli: &Cli) -> anyhow::Result<CatalogClient> {
    let server = cli
        .server
        .clone()
        .or_else(|| std::env::var("CATALOG_SERVER").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("CATALOG_TOKEN").ok())
        .context("no bearer token: pass --token or set CATALOG_TOKEN")?;
    Ok(CatalogClient::new(server, token))
}
