use super::http;
use super::tooling::schema_to_object_map;
use crate::core::config::{self, AzureConfig};
use crate::core::types::ErrorResponse;
use crate::mcp::McpCallResponse;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::Json;
use rmcp::{model::*, ServiceExt};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, warn};

fn status_code_to_error_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::INVALID_PARAMS,
        StatusCode::NOT_FOUND => ErrorCode::METHOD_NOT_FOUND,
        _ => ErrorCode::INTERNAL_ERROR,
    }
}

fn mcp_call_response_to_stdio_result(response: McpCallResponse) -> CallToolResult {
    let content = response
        .content
        .into_iter()
        .map(|item| Content::text(item.text))
        .collect();

    if response.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn convert_http_handler_result(
    result: Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>,
) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(Json(response)) => Ok(mcp_call_response_to_stdio_result(response)),
        Err((status, Json(err))) => Err(ErrorData::new(
            status_code_to_error_code(status),
            err.error,
            None,
        )),
    }
}

#[derive(Clone, Debug)]
pub struct McpService {
    pub state: Arc<AppState>,
}

impl McpService {
    pub async fn new() -> anyhow::Result<Self> {
        // stdout is the JSON-RPC channel; all diagnostics go to stderr.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();

        info!("Starting MCP Service");

        let azure_config = AzureConfig::from_env();

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config::http_timeout_secs()))
            .connect_timeout(std::time::Duration::from_secs(
                config::http_connect_timeout_secs(),
            ))
            .build()?;

        let state = AppState::new(http_client, azure_config);

        Ok(Self {
            state: Arc::new(state),
        })
    }
}

impl rmcp::ServerHandler for McpService {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.title = Some("Azure Scout MCP".to_string());
        server_info.description = Some(
            "Azure estate intelligence: cost analysis, resource inventory, performance metrics, and security posture over the Azure management APIs."
                .to_string(),
        );

        let mut info = ServerInfo::new(ServerCapabilities::builder().enable_tools().build());
        info.protocol_version = ProtocolVersion::LATEST;
        info.server_info = server_info;
        info.instructions = Some(
            "Use these tools to inspect Azure costs, inventory, performance metrics, and security posture for the configured subscription."
                .to_string(),
        );
        info
    }

    async fn list_tools(
        &self,
        _page: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self
            .state
            .tool_registry
            .tool_specs()
            .into_iter()
            .map(|spec| {
                let mut tool = Tool::default();
                tool.name = Cow::Owned(spec.name);
                tool.title = Some(spec.title);
                tool.description = Some(Cow::Owned(spec.description));
                tool.input_schema = schema_to_object_map(&spec.input_schema);
                tool.output_schema = None;
                tool.annotations = None;
                tool.execution = None;
                tool.icons = None;
                tool.meta = None;
                tool
            })
            .collect();

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        info!(
            "MCP tool call: {} with args: {:?}",
            request.name, request.arguments
        );

        if !self.state.tool_registry.contains_tool(request.name.as_ref()) {
            return Err(ErrorData::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", request.name),
                None,
            ));
        }

        // Every tool parameter is optional except alert_id, so a missing
        // arguments object reads as "no arguments".
        let arguments = request
            .arguments
            .as_ref()
            .map(|map| Value::Object(map.clone()))
            .unwrap_or_else(|| Value::Object(Default::default()));

        convert_http_handler_result(
            http::dispatch_tool(Arc::clone(&self.state), request.name.as_ref(), &arguments).await,
        )
    }
}

pub async fn run() -> anyhow::Result<()> {
    let service = McpService::new().await?;
    let running = service.serve(rmcp::transport::stdio()).await?;
    info!("MCP stdio server initialized; waiting for client session");
    let quit_reason = running.waiting().await?;
    warn!("MCP stdio server stopped: {:?}", quit_reason);
    Ok(())
}
