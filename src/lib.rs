pub mod azure;
pub mod core;
pub mod mcp;
pub mod tools;

// --- Primary core exports ---
pub use crate::core::types;
pub use crate::core::AppState;

// --- Stable module paths for the binaries ---
pub use crate::mcp::handlers as mcp_handlers;
pub use crate::mcp::stdio as stdio_service;
pub use crate::mcp::tooling as mcp_tooling;
