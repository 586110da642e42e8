pub mod handlers;
pub mod http;
pub mod prompts;
pub mod resources;
pub mod stdio;
pub mod tooling;

pub use http::{
    call_tool, dispatch_tool, get_prompt, list_prompts, list_resources, list_tools, read_resource,
    McpCallRequest, McpCallResponse, McpContent, McpPrompt, McpPromptGetRequest,
    McpPromptResponse, McpPromptsResponse, McpResource, McpResourceReadRequest,
    McpResourcesResponse, McpTool, McpToolsResponse,
};
