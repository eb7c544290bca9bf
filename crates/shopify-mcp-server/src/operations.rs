//! The tool abstraction: one [`Executable`] per tool, erased into an [`Operation`] and
//! collected into a [`Toolbox`] that the MCP server dispatches into.

mod arguments;

use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, Content, ErrorCode, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::{McpError, ServerError, ToolError};
use crate::graphql::{Request, ShopifyClient};
use crate::schema_from_type;

use arguments::ArgumentValidator;

/// A single remote operation exposed as a tool.
///
/// Execution is split in two pure halves around the network call: [`Executable::request`]
/// builds the GraphQL request from the validated input, and [`Executable::respond`] reshapes
/// the decoded `data` member into the tool output.
pub trait Executable: 'static {
    /// Tool arguments; the input schema is generated from this type
    type Input: DeserializeOwned + JsonSchema + Send + 'static;

    /// The `data` member of the GraphQL response
    type Data: DeserializeOwned;

    /// The result returned to the caller
    type Output: Serialize;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    /// Completes the sentence "Failed to ..." in error messages
    const ACTION: &'static str;

    fn request(input: &Self::Input) -> Result<Request, ToolError>;

    fn respond(input: Self::Input, data: Self::Data) -> Result<Self::Output, ToolError>;
}

type Runner = for<'a> fn(&'a ShopifyClient, JsonObject) -> BoxFuture<'a, Result<Value, ToolError>>;

/// A type-erased tool bound to a client
#[derive(Clone)]
pub struct Operation {
    pub tool: Tool,
    action: &'static str,
    arguments: Arc<ArgumentValidator>,
    client: ShopifyClient,
    run: Runner,
}

impl Operation {
    pub fn new<E: Executable>(client: ShopifyClient) -> Result<Self, ServerError> {
        let schema = schema_from_type!(E::Input);
        let arguments = ArgumentValidator::new(E::NAME, &schema)?;

        Ok(Self {
            tool: Tool::new(E::NAME, E::DESCRIPTION, schema),
            action: E::ACTION,
            arguments: Arc::new(arguments),
            client,
            run: run::<E>,
        })
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    /// Validate the arguments, then run the operation against the remote API
    #[tracing::instrument(skip_all, fields(tool = %self.tool.name))]
    pub async fn execute(&self, arguments: JsonObject) -> Result<Value, ToolError> {
        let arguments = self.arguments.validate(arguments)?;
        (self.run)(&self.client, arguments).await
    }

    /// Execute and convert the outcome into an MCP tool result.
    ///
    /// Argument errors become protocol errors. Everything else is reported to the caller as
    /// a failed tool call.
    pub async fn call(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        match self.execute(arguments).await {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string()),
            )])),
            Err(error) if error.is_invalid_arguments() => Err(McpError::new(
                ErrorCode::INVALID_PARAMS,
                error.to_string(),
                None,
            )),
            Err(cause) => {
                error!(tool = %self.tool.name, "Failed to {}: {cause}", self.action);
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Failed to {}: {cause}",
                    self.action
                ))]))
            }
        }
    }
}

fn run<E: Executable>(
    client: &ShopifyClient,
    arguments: JsonObject,
) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let input: E::Input =
            serde_json::from_value(Value::Object(arguments)).map_err(ToolError::InvalidInput)?;
        let request = E::request(&input)?;
        debug!(variables = %request.variables, "Executing {}", E::NAME);

        let data = client.execute(&request).await?;
        let data: E::Data = serde_json::from_value(data).map_err(ToolError::Response)?;
        let output = E::respond(input, data)?;

        serde_json::to_value(output).map_err(ToolError::Response)
    })
}

/// The set of tools served over MCP
#[derive(Clone, Default)]
pub struct Toolbox {
    operations: Arc<Vec<Operation>>,
}

impl Toolbox {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations: Arc::new(operations),
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.operations.iter().map(|op| op.tool.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name() == name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Dispatch a tool call by name
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match self.get(name) {
            Some(operation) => operation.call(arguments.unwrap_or_default()).await,
            None => Err(tool_not_found(name)),
        }
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}
