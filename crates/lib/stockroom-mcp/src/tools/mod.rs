//! MCP tool modules.

pub mod stock;
