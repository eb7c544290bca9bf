//! Execute GraphQL requests against the Shopify Admin API

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::ServerError;

/// Header carrying the Admin API access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Admin API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2025-10";

/// An error returned by the Admin API client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Authentication failed
    #[error("Unauthorized: invalid or expired access token")]
    Unauthorized,

    /// Rate limited by Shopify
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The GraphQL response carried errors
    #[error("GraphQL errors: {0}")]
    GraphQL(String),

    /// The GraphQL response carried neither data nor errors
    #[error("No data in response")]
    NoData,
}

/// A GraphQL document plus its bound variables
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub query: &'static str,
    pub variables: Value,
}

impl Request {
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self { query, variables }
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}

/// Shared handle to the Shopify Admin GraphQL endpoint.
///
/// Cloning is cheap; every clone shares the same connection pool and headers. Nothing
/// about the handle changes after construction.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    endpoint: Url,
    headers: HeaderMap,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[bon::bon]
impl ShopifyClient {
    /// Create a client for an explicit GraphQL endpoint
    #[builder]
    pub fn new(
        endpoint: Url,
        access_token: SecretString,
        #[builder(default)] headers: HeaderMap,
        #[builder(default = Duration::from_secs(30))] timeout: Duration,
    ) -> Result<Self, ServerError> {
        let mut headers = headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut token = HeaderValue::from_str(access_token.expose_secret())?;
        token.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-shopify-access-token"), token);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ServerError::HttpClient)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                endpoint,
                headers,
            }),
        })
    }

    /// The GraphQL endpoint this client talks to
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL request and return its `data` member
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    pub async fn execute(&self, request: &Request) -> Result<Value, ClientError> {
        let body = serde_json::json!({
            "query": request.query,
            "variables": request.variables,
        });

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .headers(self.inner.headers.clone())
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                return Err(ClientError::RateLimited(retry_after));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ClientError::Unauthorized);
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::Status { status, body });
            }
            _ => {}
        }

        let response: Response = response.json().await?;
        debug!(errors = response.errors.len(), "Received GraphQL response");

        if !response.errors.is_empty() {
            return Err(ClientError::GraphQL(
                response
                    .errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        match response.data {
            Some(Value::Null) | None => Err(ClientError::NoData),
            Some(data) => Ok(data),
        }
    }
}

/// Build the Admin API GraphQL endpoint for a store domain.
///
/// Accepts `my-store.myshopify.com` as well as `https://my-store.myshopify.com/`.
pub fn admin_endpoint(domain: &str, api_version: &str) -> Result<Url, url::ParseError> {
    let domain = domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    Url::parse(&format!(
        "https://{domain}/admin/api/{api_version}/graphql.json"
    ))
}
