use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use runtime::logging::{Logging, LoggingLayerBuilder};
use secrecy::SecretString;
use shopify_mcp_server::graphql::{ShopifyClient, admin_endpoint};
use shopify_mcp_server::server::Server;
use shopify_mcp_server::tools;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const MISSING_CREDENTIALS: &str = "\
Shopify credentials are missing.

Provide an Admin API access token and your store domain, either as flags:

    shopify-mcp-server --accessToken <token> --domain <store>.myshopify.com

or as environment variables (a .env file in the working directory is also read):

    SHOPIFY_ACCESS_TOKEN=<token>
    MYSHOPIFY_DOMAIN=<store>.myshopify.com";

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = STYLES,
    about = "Shopify MCP Server - query and update a Shopify store from an AI agent",
)]
struct Args {
    /// Path to a YAML config file
    config: Option<PathBuf>,

    /// Shopify Admin API access token
    #[arg(long = "accessToken")]
    access_token: Option<String>,

    /// Store domain, e.g. my-store.myshopify.com
    #[arg(long)]
    domain: Option<String>,

    /// Admin API version, e.g. 2025-10
    #[arg(long = "apiVersion")]
    api_version: Option<String>,

    /// Load environment variables from this file instead of `.env`
    #[arg(long = "env-file")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Could not load env file {}", path.display()))?;
        }
        // A missing .env is the common case
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let mut config = match &args.config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };

    if let Some(token) = args.access_token {
        config.shopify.access_token = Some(SecretString::from(token));
    }
    if let Some(domain) = args.domain {
        config.shopify.domain = Some(domain);
    }
    if let Some(api_version) = args.api_version {
        config.shopify.api_version = api_version;
    }

    let (logging_layer, _logging_guard) = LoggingLayerBuilder::new().build(&config.logging)?;
    tracing_subscriber::registry()
        .with(logging_layer)
        .with(Logging::env_filter(&config.logging)?)
        .init();

    let shopify = config.shopify;
    let (Some(access_token), Some(domain)) = (
        shopify.access_token,
        shopify.domain.filter(|d| !d.trim().is_empty()),
    ) else {
        eprintln!("{MISSING_CREDENTIALS}");
        bail!("missing Shopify access token or store domain");
    };

    let endpoint = admin_endpoint(&domain, &shopify.api_version)
        .with_context(|| format!("Invalid store domain {domain}"))?;
    let client = ShopifyClient::builder()
        .endpoint(endpoint)
        .access_token(access_token)
        .headers(shopify.headers)
        .timeout(shopify.timeout)
        .build()?;
    info!(
        endpoint = %client.endpoint(),
        api_version = %shopify.api_version,
        "Connecting to Shopify Admin API"
    );

    let toolbox = tools::catalog(&client)?;

    Server::builder()
        .toolbox(toolbox)
        .server_info(config.server_info)
        .build()
        .start()
        .await?;

    Ok(())
}
