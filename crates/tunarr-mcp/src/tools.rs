//! Tool definitions exposed over `tools/list`.
//!
//! Tool identities (names, titles, descriptions) and input schemas are part
//! of the outward contract; hosts select tools by these strings.

use schemars::JsonSchema;
use serde_json::{json, Value};
use tunarr_core::{Ctx, DecodeResult, FromJson, Obj, SearchRequest};

fn default_limit() -> u32 {
    50
}

fn default_offset() -> u32 {
    0
}

/// Arguments shared by the per-channel movie and show pagers.
#[derive(Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ChannelPageArgs {
    /// Channel Id
    pub id: String,
    /// How many movies to return
    #[schemars(default = "default_limit")]
    pub limit: u32,
    /// Offset to start returning items
    #[schemars(default = "default_offset")]
    pub offset: u32,
}

impl FromJson for ChannelPageArgs {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj: Obj<'_> = ctx.object()?;
        Ok(ChannelPageArgs {
            id: obj.req("id", |c| c.string())?,
            limit: obj.opt_or("limit", default_limit(), |c| c.integer_nonnegative())?,
            offset: obj.opt_or("offset", default_offset(), |c| c.integer_nonnegative())?,
        })
    }
}

/// Generate a tool input schema, dropping the schema-document framing keys
/// hosts do not expect inside `inputSchema`.
fn input_schema<T: JsonSchema>() -> serde_json::Result<Value> {
    let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(schema)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("$schema");
        map.remove("title");
    }
    Ok(value)
}

/// The five tool descriptors, in registration order.
pub fn definitions() -> serde_json::Result<Value> {
    let page_schema = input_schema::<ChannelPageArgs>()?;
    let search_schema = input_schema::<SearchRequest>()?;
    Ok(json!([
        {
            "name": "list_channels",
            "title": "List Channels",
            "description": "Get channels",
            "inputSchema": {"type": "object"},
            "annotations": {"readOnlyHint": true}
        },
        {
            "name": "list_movies_in_channel",
            "title": "List Movies In Channel",
            "description": "Get movies in channel",
            "inputSchema": page_schema.clone(),
            "annotations": {"readOnlyHint": true}
        },
        {
            "name": "list_shows_in_channel",
            "title": "List Shows In Channel",
            "description": "Get shows in channel",
            "inputSchema": page_schema,
            "annotations": {"readOnlyHint": true}
        },
        {
            "name": "list_media_sources",
            "title": "List Media Sources",
            "description": "Get configured media sources (Plex, Jellyfin, Emby, Local)",
            "inputSchema": {"type": "object"},
            "annotations": {"readOnlyHint": true}
        },
        {
            "name": "search_programs",
            "title": "Search Programs",
            "description": "Search for programs (movies, shows, episodes, music) across media sources",
            "inputSchema": search_schema,
            "annotations": {"readOnlyHint": true}
        }
    ]))
}
