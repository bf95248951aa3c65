//! # tunarr-mcp
//!
//! MCP stdio server exposing a Tunarr server's channel and program catalog
//! to LLM hosts.
//!
//! This crate provides:
//! - A newline-delimited JSON-RPC 2.0 loop over stdin/stdout (protocol
//!   revision 2024-11-05)
//! - Five read-only tools backed by the Tunarr HTTP API
//! - Host-directed logging via `notifications/message`
//! - Environment-driven configuration

pub mod config;
pub mod server;
pub mod tools;

pub use config::{Config, DEFAULT_TIMEOUT_SECONDS};
pub use server::McpServer;
