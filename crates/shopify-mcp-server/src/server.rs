use bon::bon;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt as _, transport::stdio};
use tracing::{error, info};

use crate::errors::{McpError, ServerError};
use crate::operations::Toolbox;
use crate::server_info::ServerInfoConfig;

/// Shopify MCP Server
pub struct Server {
    toolbox: Toolbox,
    server_info: ServerInfoConfig,
}

#[bon]
impl Server {
    #[builder]
    pub fn new(toolbox: Toolbox, #[builder(default)] server_info: ServerInfoConfig) -> Self {
        Self {
            toolbox,
            server_info,
        }
    }

    /// Serve MCP over stdin/stdout until the client disconnects
    pub async fn start(self) -> Result<(), ServerError> {
        let running = Running {
            toolbox: self.toolbox,
            server_info: self.server_info,
        };

        info!(tools = running.toolbox.len(), "Starting MCP server in stdio mode");
        let service = running
            .serve(stdio())
            .await
            .inspect_err(|e| {
                error!("serving error: {:?}", e);
            })
            .map_err(Box::new)?;
        service.waiting().await.map_err(ServerError::StartupError)?;

        Ok(())
    }
}

/// The MCP handler for a started server
#[derive(Clone)]
pub(crate) struct Running {
    toolbox: Toolbox,
    server_info: ServerInfoConfig,
}

impl ServerHandler for Running {
    #[tracing::instrument(skip_all, fields(tool = request.name.as_ref(), request_id = %context.id))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.toolbox.call(&request.name, request.arguments).await
    }

    #[tracing::instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: self.toolbox.tools(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.server_info.name(),
                description: None,
                icons: None,
                title: self.server_info.title(),
                version: self.server_info.version(),
                website_url: self.server_info.website_url(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
