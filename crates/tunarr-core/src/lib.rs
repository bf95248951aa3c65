//! # tunarr-core
//!
//! Core types and validation for the Tunarr MCP bridge.
//!
//! This crate holds the wire model of the Tunarr HTTP API (channels, media
//! sources, program catalog items, search filters) and the decoding engine
//! that turns untrusted JSON into those types with precise error paths.

pub mod channels;
pub mod decode;
pub mod error;
pub mod filter;
pub mod logging;
pub mod media_sources;
pub mod programs;
pub mod search;

// Re-export commonly used types at crate root
pub use channels::{Channel, ChannelIcon, ChannelSession, Program, StreamMode, Watermark};
pub use decode::{parse, parse_at, Ctx, DecodeResult, FromJson, Obj};
pub use error::{Error, Issue, Operation, Result, ValidationError};
pub use filter::{Combinator, FieldSpec, FilterNode, NumericOp, NumericValue, StringOp};
pub use media_sources::{Library, MediaSource, MediaType};
pub use programs::{ContentItem, Identifier, SourceType};
pub use search::{SearchQuery, SearchRequest, Sort, SortDirection};
