//! Configured media source backends and their libraries.
//!
//! `GET /api/media-sources` returns a bare array discriminated by `type`.
//! Plex carries extra guide fields, Jellyfin and Emby are plain remote
//! sources, and local sources swap connection details for filesystem paths.

use serde::Serialize;
use serde_json::Number;

use crate::decode::{decode_closed_set, Ctx, DecodeResult, FromJson, Obj};
use crate::programs::SourceType;

/// What a library shelves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movies,
    Shows,
    MusicVideos,
    OtherVideos,
    Tracks,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Movies,
        MediaType::Shows,
        MediaType::MusicVideos,
        MediaType::OtherVideos,
        MediaType::Tracks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movies => "movies",
            MediaType::Shows => "shows",
            MediaType::MusicVideos => "music_videos",
            MediaType::OtherVideos => "other_videos",
            MediaType::Tracks => "tracks",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<MediaType> {
        decode_closed_set(ctx, &Self::ALL, |t| t.as_str())
    }
}

/// One library within a media source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub id: String,
    pub name: String,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scanned_at: Option<Number>,
    pub external_key: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub enabled: bool,
    pub is_locked: bool,
}

impl FromJson for Library {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Library {
            id: obj.req("id", |c| c.uuid_string())?,
            name: obj.req("name", |c| c.string())?,
            media_type: obj.req("mediaType", MediaType::decode)?,
            last_scanned_at: obj.opt("lastScannedAt", |c| c.number_raw())?,
            external_key: obj.req("externalKey", |c| c.string())?,
            kind: obj.req("type", SourceType::decode)?,
            enabled: obj.req("enabled", |c| c.boolean())?,
            is_locked: obj.req("isLocked", |c| c.boolean())?,
        })
    }
}

/// Maps a path as the media server sees it to a local mount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathReplacement {
    pub server_path: String,
    pub local_path: String,
}

impl FromJson for PathReplacement {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(PathReplacement {
            server_path: obj.req("serverPath", |c| c.string())?,
            local_path: obj.req("localPath", |c| c.string())?,
        })
    }
}

/// Fields every media source kind carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMediaSource {
    pub id: String,
    pub name: String,
    pub libraries: Vec<Library>,
    pub path_replacements: Vec<PathReplacement>,
}

impl BaseMediaSource {
    fn decode(obj: &Obj<'_>) -> DecodeResult<BaseMediaSource> {
        Ok(BaseMediaSource {
            id: obj.req("id", |c| c.string())?,
            name: obj.req("name", |c| c.string())?,
            libraries: obj.req("libraries", |c| c.array(Library::from_json))?,
            path_replacements: obj.req("pathReplacements", |c| {
                c.array(PathReplacement::from_json)
            })?,
        })
    }
}

/// A networked media server. `userId` and `username` are always present
/// but may be null for token-only setups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMediaSource {
    #[serde(flatten)]
    pub base: BaseMediaSource,
    pub uri: String,
    pub access_token: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl RemoteMediaSource {
    fn decode(obj: &Obj<'_>) -> DecodeResult<RemoteMediaSource> {
        Ok(RemoteMediaSource {
            base: BaseMediaSource::decode(obj)?,
            uri: obj.req("uri", |c| c.string())?,
            access_token: obj.req("accessToken", |c| c.string())?,
            user_id: obj.req_nullable("userId", |c| c.string())?,
            username: obj.req_nullable("username", |c| c.string())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexMediaSource {
    #[serde(flatten)]
    pub remote: RemoteMediaSource,
    pub send_guide_updates: bool,
    pub index: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_identifier: Option<String>,
}

impl PlexMediaSource {
    fn decode(obj: &Obj<'_>) -> DecodeResult<PlexMediaSource> {
        Ok(PlexMediaSource {
            remote: RemoteMediaSource::decode(obj)?,
            send_guide_updates: obj.req("sendGuideUpdates", |c| c.boolean())?,
            index: obj.req("index", |c| c.number_raw())?,
            client_identifier: obj.opt("clientIdentifier", |c| c.string())?,
        })
    }
}

/// A source scanned straight off the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMediaSource {
    #[serde(flatten)]
    pub base: BaseMediaSource,
    pub media_type: MediaType,
    pub paths: Vec<String>,
}

impl LocalMediaSource {
    fn decode(obj: &Obj<'_>) -> DecodeResult<LocalMediaSource> {
        Ok(LocalMediaSource {
            base: BaseMediaSource::decode(obj)?,
            media_type: obj.req("mediaType", MediaType::decode)?,
            paths: obj.req("paths", |c| c.non_empty_array(|el| el.non_empty_string()))?,
        })
    }
}

/// Any configured media source, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaSource {
    Plex(PlexMediaSource),
    Jellyfin(RemoteMediaSource),
    Emby(RemoteMediaSource),
    Local(LocalMediaSource),
}

impl MediaSource {
    pub const KINDS: [&'static str; 4] = ["plex", "jellyfin", "emby", "local"];

    pub fn kind(&self) -> &'static str {
        match self {
            MediaSource::Plex(_) => "plex",
            MediaSource::Jellyfin(_) => "jellyfin",
            MediaSource::Emby(_) => "emby",
            MediaSource::Local(_) => "local",
        }
    }
}

impl FromJson for MediaSource {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        let kind = obj.req("type", |c| c.literal(&Self::KINDS))?;
        match kind {
            "plex" => Ok(MediaSource::Plex(PlexMediaSource::decode(&obj)?)),
            "jellyfin" => Ok(MediaSource::Jellyfin(RemoteMediaSource::decode(&obj)?)),
            "emby" => Ok(MediaSource::Emby(RemoteMediaSource::decode(&obj)?)),
            "local" => Ok(MediaSource::Local(LocalMediaSource::decode(&obj)?)),
            _ => unreachable!("literal() only admits known kinds"),
        }
    }
}
