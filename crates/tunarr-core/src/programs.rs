//! Program catalog items returned by program search.
//!
//! Seven kinds of item share a common base (identity, titles, tags, source
//! linkage) and differ in their per-kind metadata. The discriminator is the
//! `type` field. Search results arrive as a heterogeneous array; every
//! element must decode as one of the known kinds or the whole response is
//! rejected with the failing element's index in the error path.

use serde::Serialize;
use serde_json::Number;

use crate::decode::{decode_closed_set, Ctx, DecodeResult, FromJson, Obj};

// =============================================================================
// SOURCE LINKAGE
// =============================================================================

/// Media server backend a program was indexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Plex,
    Jellyfin,
    Emby,
    Local,
}

impl SourceType {
    pub const ALL: [SourceType; 4] = [
        SourceType::Plex,
        SourceType::Jellyfin,
        SourceType::Emby,
        SourceType::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Plex => "plex",
            SourceType::Jellyfin => "jellyfin",
            SourceType::Emby => "emby",
            SourceType::Local => "local",
        }
    }

    pub(crate) fn decode(ctx: &Ctx<'_>) -> DecodeResult<SourceType> {
        decode_closed_set(ctx, &Self::ALL, |s| s.as_str())
    }
}

/// Namespace of an external identifier attached to a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierKind {
    Plex,
    PlexGuid,
    Imdb,
    Tmdb,
    Tvdb,
    Jellyfin,
    Emby,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 7] = [
        IdentifierKind::Plex,
        IdentifierKind::PlexGuid,
        IdentifierKind::Imdb,
        IdentifierKind::Tmdb,
        IdentifierKind::Tvdb,
        IdentifierKind::Jellyfin,
        IdentifierKind::Emby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Plex => "plex",
            IdentifierKind::PlexGuid => "plex-guid",
            IdentifierKind::Imdb => "imdb",
            IdentifierKind::Tmdb => "tmdb",
            IdentifierKind::Tvdb => "tvdb",
            IdentifierKind::Jellyfin => "jellyfin",
            IdentifierKind::Emby => "emby",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<IdentifierKind> {
        decode_closed_set(ctx, &Self::ALL, |k| k.as_str())
    }
}

/// One external identifier (a Plex rating key, an IMDB id, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: IdentifierKind,
}

impl FromJson for Identifier {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Identifier {
            id: obj.req("id", |c| c.string())?,
            source_id: obj.opt("sourceId", |c| c.string())?,
            kind: obj.req("type", IdentifierKind::decode)?,
        })
    }
}

// =============================================================================
// COMMON FIELDS
// =============================================================================

/// Fields shared by every program kind. All of them are required.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseItem {
    pub uuid: String,
    pub canonical_id: String,
    pub source_type: SourceType,
    pub external_id: String,
    pub identifiers: Vec<Identifier>,
    pub title: String,
    pub sort_title: String,
    pub tags: Vec<String>,
    pub media_source_id: String,
    pub library_id: String,
}

impl BaseItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<BaseItem> {
        Ok(BaseItem {
            uuid: obj.req("uuid", |c| c.uuid_string())?,
            canonical_id: obj.req("canonicalId", |c| c.string())?,
            source_type: obj.req("sourceType", SourceType::decode)?,
            external_id: obj.req("externalId", |c| c.string())?,
            identifiers: obj.req("identifiers", |c| c.array(Identifier::from_json))?,
            title: obj.req("title", |c| c.string())?,
            sort_title: obj.req("sortTitle", |c| c.string())?,
            tags: obj.req("tags", |c| c.strings())?,
            media_source_id: obj.req("mediaSourceId", |c| c.string())?,
            library_id: obj.req("libraryId", |c| c.string())?,
        })
    }
}

// =============================================================================
// PER-KIND ITEMS
// =============================================================================

/// A movie. The descriptive fields are present-but-nullable on the wire:
/// absence is an upstream contract break, `null` is ordinary missing data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieItem {
    #[serde(flatten)]
    pub base: BaseItem,
    pub original_title: Option<String>,
    pub year: Option<u32>,
    pub release_date: Option<Number>,
    pub release_date_string: Option<String>,
    pub duration: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl MovieItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<MovieItem> {
        Ok(MovieItem {
            base: BaseItem::decode(obj)?,
            original_title: obj.req_nullable("originalTitle", |c| c.string())?,
            year: obj.req_nullable("year", |c| c.integer_positive())?,
            release_date: obj.req_nullable("releaseDate", |c| c.number_raw())?,
            release_date_string: obj.req_nullable("releaseDateString", |c| c.string())?,
            duration: obj.req("duration", |c| c.number_raw())?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
            plot: obj.opt_nullable("plot", |c| c.string())?,
            tagline: obj.opt_nullable("tagline", |c| c.string())?,
            rating: obj.opt_nullable("rating", |c| c.string())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowItem {
    #[serde(flatten)]
    pub base: BaseItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grandchild_count: Option<u32>,
}

impl ShowItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<ShowItem> {
        Ok(ShowItem {
            base: BaseItem::decode(obj)?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
            plot: obj.opt_nullable("plot", |c| c.string())?,
            tagline: obj.opt_nullable("tagline", |c| c.string())?,
            rating: obj.opt_nullable("rating", |c| c.string())?,
            release_date: obj.opt_nullable("releaseDate", |c| c.number_raw())?,
            release_date_string: obj.opt_nullable("releaseDateString", |c| c.string())?,
            year: obj.opt_nullable("year", |c| c.integer_positive())?,
            child_count: obj.opt("childCount", |c| c.integer_nonnegative())?,
            grandchild_count: obj.opt("grandchildCount", |c| c.integer_nonnegative())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonItem {
    #[serde(flatten)]
    pub base: BaseItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
}

impl SeasonItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<SeasonItem> {
        Ok(SeasonItem {
            base: BaseItem::decode(obj)?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
            plot: obj.opt_nullable("plot", |c| c.string())?,
            tagline: obj.opt_nullable("tagline", |c| c.string())?,
            index: obj.req("index", |c| c.integer_nonnegative())?,
            year: obj.opt_nullable("year", |c| c.integer_positive())?,
            release_date: obj.opt_nullable("releaseDate", |c| c.number_raw())?,
            release_date_string: obj.opt_nullable("releaseDateString", |c| c.string())?,
            child_count: obj.opt("childCount", |c| c.integer_nonnegative())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeItem {
    #[serde(flatten)]
    pub base: BaseItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date_string: Option<String>,
    pub duration: Number,
    pub episode_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl EpisodeItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<EpisodeItem> {
        Ok(EpisodeItem {
            base: BaseItem::decode(obj)?,
            original_title: obj.opt_nullable("originalTitle", |c| c.string())?,
            year: obj.opt_nullable("year", |c| c.integer_positive())?,
            release_date: obj.opt_nullable("releaseDate", |c| c.number_raw())?,
            release_date_string: obj.opt_nullable("releaseDateString", |c| c.string())?,
            duration: obj.req("duration", |c| c.number_raw())?,
            episode_number: obj.req("episodeNumber", |c| c.integer_nonnegative())?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistItem {
    #[serde(flatten)]
    pub base: BaseItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
}

impl ArtistItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<ArtistItem> {
        Ok(ArtistItem {
            base: BaseItem::decode(obj)?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
            child_count: obj.opt("childCount", |c| c.integer_nonnegative())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumItem {
    #[serde(flatten)]
    pub base: BaseItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
}

impl AlbumItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<AlbumItem> {
        Ok(AlbumItem {
            base: BaseItem::decode(obj)?,
            summary: obj.opt_nullable("summary", |c| c.string())?,
            year: obj.opt_nullable("year", |c| c.integer_positive())?,
            child_count: obj.opt("childCount", |c| c.integer_nonnegative())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackItem {
    #[serde(flatten)]
    pub base: BaseItem,
    pub duration: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl TrackItem {
    fn decode(obj: &Obj<'_>) -> DecodeResult<TrackItem> {
        Ok(TrackItem {
            base: BaseItem::decode(obj)?,
            duration: obj.req("duration", |c| c.number_raw())?,
            index: obj.opt("index", |c| c.integer_nonnegative())?,
        })
    }
}

// =============================================================================
// THE UNION
// =============================================================================

/// Any program in the catalog, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Movie(MovieItem),
    Show(ShowItem),
    Season(SeasonItem),
    Episode(EpisodeItem),
    Artist(ArtistItem),
    Album(AlbumItem),
    Track(TrackItem),
}

impl ContentItem {
    /// Every accepted discriminator value, in wire order.
    pub const KINDS: [&'static str; 7] = [
        "movie", "show", "season", "episode", "artist", "album", "track",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            ContentItem::Movie(_) => "movie",
            ContentItem::Show(_) => "show",
            ContentItem::Season(_) => "season",
            ContentItem::Episode(_) => "episode",
            ContentItem::Artist(_) => "artist",
            ContentItem::Album(_) => "album",
            ContentItem::Track(_) => "track",
        }
    }

    pub fn base(&self) -> &BaseItem {
        match self {
            ContentItem::Movie(item) => &item.base,
            ContentItem::Show(item) => &item.base,
            ContentItem::Season(item) => &item.base,
            ContentItem::Episode(item) => &item.base,
            ContentItem::Artist(item) => &item.base,
            ContentItem::Album(item) => &item.base,
            ContentItem::Track(item) => &item.base,
        }
    }

    /// Decoder admitting a single kind, for endpoints that return one item
    /// family (the channel movie and show pagers). Any other discriminator
    /// fails at the element's `type` path.
    pub fn only(kind: &'static str) -> impl Fn(&Ctx<'_>) -> DecodeResult<ContentItem> {
        move |ctx| {
            let obj = ctx.object()?;
            obj.req("type", |c| c.literal(&[kind]))?;
            ContentItem::from_json(ctx)
        }
    }
}

impl FromJson for ContentItem {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        let kind = obj.req("type", |c| c.literal(&Self::KINDS))?;
        match kind {
            "movie" => Ok(ContentItem::Movie(MovieItem::decode(&obj)?)),
            "show" => Ok(ContentItem::Show(ShowItem::decode(&obj)?)),
            "season" => Ok(ContentItem::Season(SeasonItem::decode(&obj)?)),
            "episode" => Ok(ContentItem::Episode(EpisodeItem::decode(&obj)?)),
            "artist" => Ok(ContentItem::Artist(ArtistItem::decode(&obj)?)),
            "album" => Ok(ContentItem::Album(AlbumItem::decode(&obj)?)),
            "track" => Ok(ContentItem::Track(TrackItem::decode(&obj)?)),
            _ => unreachable!("literal() only admits known kinds"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
