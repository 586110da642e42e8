use azure_scout::core::tools_registry::ToolRegistry;
use azure_scout::mcp::resources::resource_catalog;
use azure_scout::mcp_tooling::tool_catalog;

#[test]
fn catalog_tool_names_are_unique_and_registered() {
    let registry = ToolRegistry::load();

    let mut seen = std::collections::HashSet::new();
    for entry in tool_catalog() {
        assert!(seen.insert(entry.name), "duplicate tool name {}", entry.name);
        assert!(
            registry.contains_tool(entry.name),
            "tool {} missing from registry",
            entry.name
        );
    }
    assert_eq!(registry.tool_specs().len(), seen.len());
}

#[test]
fn every_tool_schema_is_an_object_schema() {
    for spec in ToolRegistry::load().tool_specs() {
        assert_eq!(
            spec.input_schema.get("type").and_then(|t| t.as_str()),
            Some("object"),
            "tool {} schema is not an object",
            spec.name
        );
        assert!(
            spec.input_schema.get("properties").is_some(),
            "tool {} schema has no properties map",
            spec.name
        );
    }
}

#[test]
fn every_resource_resolves_to_a_registered_tool() {
    let registry = ToolRegistry::load();

    for entry in resource_catalog() {
        let binding = registry
            .resolve_resource(entry.uri)
            .unwrap_or_else(|| panic!("resource {} not in registry", entry.uri));
        assert!(
            registry.contains_tool(&binding.tool),
            "resource {} maps to unregistered tool {}",
            entry.uri,
            binding.tool
        );
        assert!(binding.arguments.is_object());
    }
    assert_eq!(registry.resource_bindings().len(), resource_catalog().len());
}

#[test]
fn unknown_resource_does_not_resolve() {
    let registry = ToolRegistry::load();
    assert!(registry.resolve_resource("https://azure-billing/nonexistent").is_none());
}

#[test]
fn prompt_specs_cover_the_catalog() {
    let registry = ToolRegistry::load();
    let specs = registry.prompt_specs();
    assert_eq!(specs.len(), 22);
    assert!(registry.contains_prompt("analyze_costs"));
    assert!(registry.contains_prompt("threat_hunting"));
    assert!(!registry.contains_prompt("nonexistent"));

    let analyze = specs.iter().find(|s| s.name == "analyze_costs").unwrap();
    assert_eq!(analyze.arguments, vec!["timeframe", "group_by"]);
}
