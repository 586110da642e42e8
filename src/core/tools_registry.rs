use crate::mcp::prompts::prompt_catalog;
use crate::mcp::resources::resource_catalog;
use crate::mcp::tooling::tool_catalog;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct PublicToolSpec {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Value,
}

/// A resource URI bound to the tool invocation that serves its reads.
#[derive(Clone, Debug)]
pub struct ResourceBinding {
    pub uri: String,
    pub description: String,
    pub tool: String,
    pub arguments: Value,
}

#[derive(Clone, Debug)]
pub struct PromptSpec {
    pub name: String,
    pub description: String,
    pub arguments: Vec<String>,
}

/// Single lookup surface for both transports: tool names, resource URIs,
/// and prompt names. Loaded once at startup from the static catalogs.
#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, PublicToolSpec>,
    resources: HashMap<String, ResourceBinding>,
    prompts: HashMap<String, PromptSpec>,
}

impl ToolRegistry {
    pub fn load() -> Self {
        let mut registry = ToolRegistry::default();

        for entry in tool_catalog() {
            let spec = PublicToolSpec {
                name: entry.name.to_string(),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                input_schema: entry.input_schema,
            };
            if registry.tools.insert(spec.name.clone(), spec).is_some() {
                warn!("tool catalog: duplicate tool name {}; keeping the later entry", entry.name);
            }
        }

        for entry in resource_catalog() {
            if crate::mcp::resources::resource_category(entry.uri).is_none() {
                warn!("resource catalog: {} is not a well-formed URI; skipping", entry.uri);
                continue;
            }
            if !registry.tools.contains_key(entry.tool) {
                warn!(
                    "resource catalog: {} maps to unknown tool {}; skipping",
                    entry.uri, entry.tool
                );
                continue;
            }
            let binding = ResourceBinding {
                uri: entry.uri.to_string(),
                description: entry.description.to_string(),
                tool: entry.tool.to_string(),
                arguments: entry.arguments,
            };
            if registry.resources.insert(binding.uri.clone(), binding).is_some() {
                warn!("resource catalog: duplicate URI {}; keeping the later entry", entry.uri);
            }
        }

        for entry in prompt_catalog() {
            let spec = PromptSpec {
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                arguments: entry.arguments.iter().map(|a| a.to_string()).collect(),
            };
            if registry.prompts.insert(spec.name.clone(), spec).is_some() {
                warn!("prompt catalog: duplicate prompt name {}; keeping the later entry", entry.name);
            }
        }

        registry
    }

    pub fn tool_specs(&self) -> Vec<PublicToolSpec> {
        let mut specs: Vec<_> = self.tools.values().cloned().collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn contains_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn resource_bindings(&self) -> Vec<ResourceBinding> {
        let mut bindings: Vec<_> = self.resources.values().cloned().collect();
        bindings.sort_by(|a, b| a.uri.cmp(&b.uri));
        bindings
    }

    pub fn resolve_resource(&self, uri: &str) -> Option<&ResourceBinding> {
        self.resources.get(uri)
    }

    pub fn prompt_specs(&self) -> Vec<PromptSpec> {
        let mut specs: Vec<_> = self.prompts.values().cloned().collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn contains_prompt(&self, name: &str) -> bool {
        self.prompts.contains_key(name)
    }
}
