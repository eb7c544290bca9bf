use std::time::Duration;

use reqwest::header::HeaderMap;
use secrecy::SecretString;
use serde::Deserialize;
use shopify_mcp_server::server_info::ServerInfoConfig;

use super::logging::Logging;

/// Configuration for the MCP server
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Connection to the Shopify Admin API
    #[serde(default)]
    pub shopify: ShopifyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Metadata reported to MCP clients during initialization
    #[serde(default)]
    pub server_info: ServerInfoConfig,
}

/// Store credentials and request options for the Admin API
#[derive(Debug, Deserialize)]
pub struct ShopifyConfig {
    /// The store domain, e.g. `my-store.myshopify.com`
    #[serde(default)]
    pub domain: Option<String>,

    /// Admin API access token
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// The Admin API version segment of the endpoint
    #[serde(default = "defaults::api_version")]
    pub api_version: String,

    /// Timeout for each Admin API request
    #[serde(default = "defaults::timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Extra headers to include in all Admin API requests
    #[serde(default, deserialize_with = "parsers::map_from_str")]
    pub headers: HeaderMap,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            domain: None,
            access_token: None,
            api_version: defaults::api_version(),
            timeout: defaults::timeout(),
            headers: HeaderMap::new(),
        }
    }
}

mod defaults {
    use std::time::Duration;

    use shopify_mcp_server::graphql::DEFAULT_API_VERSION;

    pub(super) fn api_version() -> String {
        DEFAULT_API_VERSION.to_string()
    }

    pub(super) const fn timeout() -> Duration {
        Duration::from_secs(30)
    }
}

mod parsers {
    use std::str::FromStr;

    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use serde::Deserializer;

    pub(super) fn map_from_str<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapFromStrVisitor;
        impl<'de> serde::de::Visitor<'de> for MapFromStrVisitor {
            type Value = HeaderMap;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of header string keys and values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut parsed = HeaderMap::with_capacity(map.size_hint().unwrap_or(0));

                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    let key = HeaderName::from_str(&key)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;
                    let value = HeaderValue::from_str(&value)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;

                    parsed.insert(key, value);
                }

                Ok(parsed)
            }
        }

        deserializer.deserialize_map(MapFromStrVisitor)
    }
}
