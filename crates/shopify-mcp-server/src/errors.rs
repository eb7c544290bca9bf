use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use thiserror::Error;
use tokio::task::JoinError;
use url::ParseError;

use crate::graphql::ClientError;

/// An error raised while validating or executing a tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was not supplied
    #[error("Missing required argument `{0}`")]
    MissingArgument(String),

    /// An argument did not match its declared schema
    #[error("Invalid argument `{field}`: {message}")]
    InvalidArgument { field: String, message: String },

    /// Arguments matched the schema but could not be decoded into the tool input
    #[error("Invalid input: {0}")]
    InvalidInput(#[source] serde_json::Error),

    /// The remote call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The remote response did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Response(#[source] serde_json::Error),

    /// The ShopifyQL endpoint rejected the query text
    #[error("ShopifyQL parse errors: {0}")]
    Parse(String),

    /// A mutation reported user errors
    #[error("{0}")]
    UserErrors(String),

    /// A mutation succeeded without returning the affected entity
    #[error("{0} returned no result")]
    EmptyPayload(&'static str),

    /// A lookup by id returned nothing
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl ToolError {
    /// Whether the error was raised before any network call was attempted
    pub fn is_invalid_arguments(&self) -> bool {
        matches!(
            self,
            ToolError::MissingArgument(_)
                | ToolError::InvalidArgument { .. }
                | ToolError::InvalidInput(_)
        )
    }

    pub(crate) fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// An error in server initialization
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid store domain: {0}")]
    Domain(#[from] ParseError),

    #[error("Invalid input schema for tool {tool}: {message}")]
    ToolSchema { tool: String, message: String },

    #[error("Failed to start server: {0}")]
    StartupError(#[from] JoinError),

    #[error("Failed to initialize MCP server: {0}")]
    McpInitializeError(#[from] Box<rmcp::service::ServerInitializeError>),
}

/// An MCP tool error
pub type McpError = rmcp::model::ErrorData;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_the_field() {
        let error = ToolError::invalid_argument("limit", "0 is less than the minimum of 1");
        assert_eq!(
            error.to_string(),
            "Invalid argument `limit`: 0 is less than the minimum of 1"
        );
        assert!(error.is_invalid_arguments());
    }

    #[test]
    fn not_found_message() {
        let error = ToolError::NotFound {
            kind: "Order",
            id: "gid://shopify/Order/1".to_string(),
        };
        assert_eq!(error.to_string(), "Order with ID gid://shopify/Order/1 not found");
        assert!(!error.is_invalid_arguments());
    }

    #[test]
    fn parse_errors_are_not_argument_errors() {
        let error = ToolError::Parse("bad token; unknown table".to_string());
        assert_eq!(
            error.to_string(),
            "ShopifyQL parse errors: bad token; unknown table"
        );
        assert!(!error.is_invalid_arguments());
    }
}
