//! Program search request model.
//!
//! This is the one place where tool input is rich enough to need its own
//! types: a free-text query, an optional filter tree, sort configuration
//! and paging. The decoded request re-serializes directly into the POST
//! body for `/api/programs/search`.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::Serialize;

use crate::decode::{decode_closed_set, Ctx, DecodeResult, FromJson};
use crate::filter::{string_enum_schema, FilterNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<SortDirection> {
        decode_closed_set(
            ctx,
            &[SortDirection::Asc, SortDirection::Desc],
            |d| d.as_str(),
        )
    }
}

impl JsonSchema for SortDirection {
    fn schema_name() -> String {
        "SortDirection".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        string_enum_schema(&["asc", "desc"])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Sort {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl FromJson for Sort {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Sort {
            field: obj.req("field", |c| c.string())?,
            direction: obj.req("direction", SortDirection::decode)?,
        })
    }
}

/// The query object itself. Every part is optional; an empty object is a
/// valid "give me everything" search.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Search text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Restrict search to specific fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_search_to: Option<Vec<String>>,
    /// Advanced filter conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterNode>,
    /// Sort configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl FromJson for SearchQuery {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(SearchQuery {
            query: obj.opt_nullable("query", |c| c.string())?,
            restrict_search_to: obj.opt("restrictSearchTo", |c| c.strings())?,
            filter: obj.opt_nullable("filter", FilterNode::from_json)?,
            sort: obj.opt_nullable("sort", Sort::from_json)?,
        })
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Complete search tool input. Serializing this produces the request body
/// sent to the server, filter tree and all.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Search query object containing search text, filters, and sort options
    pub query: SearchQuery,
    /// Filter by media source ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_source_id: Option<String>,
    /// Filter by library ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_id: Option<String>,
    /// Page number
    #[schemars(default = "default_page")]
    pub page: u32,
    /// Number of results per page
    #[schemars(default = "default_limit")]
    pub limit: u32,
}

impl FromJson for SearchRequest {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(SearchRequest {
            query: obj.req("query", SearchQuery::from_json)?,
            media_source_id: obj.opt("mediaSourceId", |c| c.string())?,
            library_id: obj.opt("libraryId", |c| c.string())?,
            page: obj.opt_or("page", default_page(), |c| c.integer_nonnegative())?,
            limit: obj.opt_or("limit", default_limit(), |c| c.integer_nonnegative())?,
        })
    }
}
