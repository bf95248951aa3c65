//! Structured logging field name constants for the Tunarr MCP bridge.
//!
//! All crates use these constants for consistent structured logging fields,
//! so host-side log filtering can query by the same names across the client
//! and the MCP server.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Tool call failed, response unusable |
//! | WARN  | Recoverable issue, lenient fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown) |
//! | DEBUG | Tool invocations with arguments, request/response summaries |
//! | TRACE | Per-item values (individual channels, programs) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Logical operation name.
/// Examples: "list_channels", "search_programs"
pub const OPERATION: &str = "op";

/// MCP tool name being dispatched.
pub const TOOL: &str = "tool";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Channel identifier a listing operates on.
pub const CHANNEL_ID: &str = "channel_id";

// ─── Request fields ────────────────────────────────────────────────────────

/// Tunarr host the request targets.
pub const HOST: &str = "host";

/// Pagination offset forwarded to the service.
pub const OFFSET: &str = "offset";

/// Pagination page forwarded to the service.
pub const PAGE: &str = "page";

/// Pagination limit forwarded to the service.
pub const LIMIT: &str = "limit";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of entries returned by a listing or search.
pub const RESULT_COUNT: &str = "result_count";

/// HTTP status code of a Tunarr response.
pub const STATUS: &str = "status";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
