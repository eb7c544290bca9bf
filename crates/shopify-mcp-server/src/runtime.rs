//! Runtime utilities
//!
//! This module is only used by the main binary and provides helper code
//! related to runtime configuration.

mod config;
pub mod logging;

use std::path::Path;

use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Prefix of environment variables that map onto the config structure
const ENV_PREFIX: &str = "SHOPIFY_MCP_";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(shopify_common_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment.
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(shopify_common_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file_exact(yaml_path.as_ref()))
        .extract()
}

/// Figment provider that maps the conventional Shopify environment variables into
/// the nested structure needed by the config
fn shopify_common_env() -> Env {
    Env::raw()
        .only(&["shopify_access_token", "myshopify_domain", "shopify_api_version"])
        .map(|key| match key.to_string().to_lowercase().as_str() {
            "shopify_access_token" => "SHOPIFY:ACCESS_TOKEN".into(),
            "myshopify_domain" => "SHOPIFY:DOMAIN".into(),
            "shopify_api_version" => "SHOPIFY:API_VERSION".into(),

            // Filtered out by `only` above
            other => other.to_string().into(),
        })
        .split(":")
}
