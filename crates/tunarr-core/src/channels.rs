//! Channel lineup model.
//!
//! Channels arrive from `GET /api/channels` as a bare array. The aggregate
//! is strict about its own shape but deliberately lenient about the icon
//! block and a handful of cosmetic watermark fields: those substitute a
//! fallback when malformed instead of failing the document, because broken
//! artwork metadata is common in the wild and should never hide a lineup.

use serde::Serialize;
use serde_json::Number;

use crate::decode::{decode_closed_set, Ctx, DecodeResult, FromJson, Obj};
use crate::programs::SourceType;

// =============================================================================
// SCREEN GEOMETRY
// =============================================================================

/// Corner of the frame used by icon and watermark placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ScreenPosition {
    pub const ALL: [ScreenPosition; 4] = [
        ScreenPosition::TopLeft,
        ScreenPosition::TopRight,
        ScreenPosition::BottomLeft,
        ScreenPosition::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenPosition::TopLeft => "top-left",
            ScreenPosition::TopRight => "top-right",
            ScreenPosition::BottomLeft => "bottom-left",
            ScreenPosition::BottomRight => "bottom-right",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<ScreenPosition> {
        decode_closed_set(ctx, &Self::ALL, |p| p.as_str())
    }
}

/// Pixel dimensions of a transcode target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub width_px: Number,
    pub height_px: Number,
}

impl FromJson for Resolution {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Resolution {
            width_px: obj.req("widthPx", |c| c.number_raw())?,
            height_px: obj.req("heightPx", |c| c.number_raw())?,
        })
    }
}

// =============================================================================
// ICON AND OFFLINE BLOCKS
// =============================================================================

/// Channel artwork. Every field substitutes a fallback when missing or
/// malformed; only a non-object `icon` value fails the channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIcon {
    pub path: String,
    pub width: Number,
    pub duration: Number,
    pub position: ScreenPosition,
}

impl FromJson for ChannelIcon {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(ChannelIcon {
            path: obj.catch("path", String::new(), |c| c.string()),
            width: obj.catch("width", Number::from(0), |c| c.number_raw_nonnegative()),
            duration: obj.catch("duration", Number::from(0), |c| c.number_raw()),
            position: obj.catch("position", ScreenPosition::BottomRight, ScreenPosition::decode),
        })
    }
}

/// What plays when the channel has no scheduled content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineMode {
    Pic,
    Clip,
}

impl OfflineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfflineMode::Pic => "pic",
            OfflineMode::Clip => "clip",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<OfflineMode> {
        decode_closed_set(ctx, &[OfflineMode::Pic, OfflineMode::Clip], |m| m.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOffline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundtrack: Option<String>,
    pub mode: OfflineMode,
}

impl FromJson for ChannelOffline {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(ChannelOffline {
            picture: obj.opt("picture", |c| c.string())?,
            soundtrack: obj.opt("soundtrack", |c| c.string())?,
            mode: obj.req("mode", OfflineMode::decode)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_buffer_size: Option<Number>,
}

impl FromJson for TranscodingOptions {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(TranscodingOptions {
            target_resolution: obj.opt("targetResolution", Resolution::from_json)?,
            video_bitrate: obj.opt("videoBitrate", |c| c.number_raw())?,
            video_buffer_size: obj.opt("videoBufferSize", |c| c.number_raw())?,
        })
    }
}

// =============================================================================
// WATERMARK
// =============================================================================

/// Program kinds a watermark fade rule can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentProgramType {
    Movie,
    Episode,
    Track,
    MusicVideo,
    OtherVideo,
}

impl ContentProgramType {
    pub const ALL: [ContentProgramType; 5] = [
        ContentProgramType::Movie,
        ContentProgramType::Episode,
        ContentProgramType::Track,
        ContentProgramType::MusicVideo,
        ContentProgramType::OtherVideo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentProgramType::Movie => "movie",
            ContentProgramType::Episode => "episode",
            ContentProgramType::Track => "track",
            ContentProgramType::MusicVideo => "music_video",
            ContentProgramType::OtherVideo => "other_video",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<ContentProgramType> {
        decode_closed_set(ctx, &Self::ALL, |t| t.as_str())
    }
}

/// On/off fade cycle for the watermark. A 5 minute period fades the mark
/// in every fifth minute and shows it for 5 minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FadeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_type: Option<ContentProgramType>,
    pub period_mins: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_edge: Option<bool>,
}

impl FromJson for FadeConfig {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(FadeConfig {
            // An unrecognized program type means "applies to everything",
            // same as leaving it out.
            program_type: obj.catch_opt("programType", ContentProgramType::decode),
            period_mins: obj.req("periodMins", |c| c.number_raw_min(1.0))?,
            // Malformed values fall back to fading in at stream start;
            // absence stays absent.
            leading_edge: obj.get("leadingEdge").map(|c| c.boolean().unwrap_or(true)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Watermark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub enabled: bool,
    pub position: ScreenPosition,
    pub width: Number,
    pub vertical_margin: Number,
    pub horizontal_margin: Number,
    pub duration: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_size: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    pub opacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_config: Option<Vec<FadeConfig>>,
}

impl FromJson for Watermark {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Watermark {
            url: obj.opt("url", |c| c.string())?,
            enabled: obj.req("enabled", |c| c.boolean())?,
            // Absent defaults to the bottom-right corner, but a present
            // value must be a real corner.
            position: obj.opt_or("position", ScreenPosition::BottomRight, ScreenPosition::decode)?,
            width: obj.req("width", |c| c.number_raw_positive())?,
            vertical_margin: obj.req("verticalMargin", |c| c.number_raw_in_range(0.0, 100.0))?,
            horizontal_margin: obj.req("horizontalMargin", |c| c.number_raw_in_range(0.0, 100.0))?,
            duration: obj.opt_or("duration", Number::from(0), |c| c.number_raw_nonnegative())?,
            fixed_size: obj.opt("fixedSize", |c| c.boolean())?,
            animated: obj.opt("animated", |c| c.boolean())?,
            opacity: obj.catch("opacity", 100, |c| {
                c.integer_in_range(0, 100).map(|v| v as u32)
            }),
            fade_config: obj.opt("fadeConfig", |c| c.array(FadeConfig::from_json))?,
        })
    }
}

// =============================================================================
// SUBTITLES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFilter {
    None,
    Forced,
    Default,
    Any,
}

impl SubtitleFilter {
    pub const ALL: [SubtitleFilter; 4] = [
        SubtitleFilter::None,
        SubtitleFilter::Forced,
        SubtitleFilter::Default,
        SubtitleFilter::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleFilter::None => "none",
            SubtitleFilter::Forced => "forced",
            SubtitleFilter::Default => "default",
            SubtitleFilter::Any => "any",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<SubtitleFilter> {
        decode_closed_set(ctx, &Self::ALL, |f| f.as_str())
    }
}

/// Per-language subtitle selection rule. The `langugeCode` key is the
/// remote service's spelling; correcting it would break decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlePreference {
    pub languge_code: String,
    pub priority: u32,
    pub allow_image_based: bool,
    pub allow_external: bool,
    pub filter: SubtitleFilter,
}

impl FromJson for SubtitlePreference {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(SubtitlePreference {
            languge_code: obj.req("langugeCode", |c| c.string())?,
            priority: obj.req("priority", |c| c.integer_nonnegative())?,
            allow_image_based: obj.req("allowImageBased", |c| c.boolean())?,
            allow_external: obj.req("allowExternal", |c| c.boolean())?,
            filter: obj.opt_or("filter", SubtitleFilter::Any, SubtitleFilter::decode)?,
        })
    }
}

// =============================================================================
// STREAMING
// =============================================================================

/// How the channel itself is streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    Hls,
    HlsSlower,
    #[serde(rename = "mpegts")]
    MpegTs,
    HlsDirect,
}

impl StreamMode {
    pub const ALL: [StreamMode; 4] = [
        StreamMode::Hls,
        StreamMode::HlsSlower,
        StreamMode::MpegTs,
        StreamMode::HlsDirect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Hls => "hls",
            StreamMode::HlsSlower => "hls_slower",
            StreamMode::MpegTs => "mpegts",
            StreamMode::HlsDirect => "hls_direct",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<StreamMode> {
        decode_closed_set(ctx, &Self::ALL, |m| m.as_str())
    }
}

/// Stream mode of a live session, which also covers the concatenated
/// variants of each base mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStreamMode {
    Hls,
    HlsSlower,
    #[serde(rename = "mpegts")]
    MpegTs,
    HlsDirect,
    HlsConcat,
    HlsSlowerConcat,
    #[serde(rename = "mpegts_concat")]
    MpegTsConcat,
    HlsDirectConcat,
}

impl SessionStreamMode {
    pub const ALL: [SessionStreamMode; 8] = [
        SessionStreamMode::Hls,
        SessionStreamMode::HlsSlower,
        SessionStreamMode::MpegTs,
        SessionStreamMode::HlsDirect,
        SessionStreamMode::HlsConcat,
        SessionStreamMode::HlsSlowerConcat,
        SessionStreamMode::MpegTsConcat,
        SessionStreamMode::HlsDirectConcat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStreamMode::Hls => "hls",
            SessionStreamMode::HlsSlower => "hls_slower",
            SessionStreamMode::MpegTs => "mpegts",
            SessionStreamMode::HlsDirect => "hls_direct",
            SessionStreamMode::HlsConcat => "hls_concat",
            SessionStreamMode::HlsSlowerConcat => "hls_slower_concat",
            SessionStreamMode::MpegTsConcat => "mpegts_concat",
            SessionStreamMode::HlsDirectConcat => "hls_direct_concat",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<SessionStreamMode> {
        decode_closed_set(ctx, &Self::ALL, |m| m.as_str())
    }
}

/// One viewer connected to a live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConnection {
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<Number>,
}

impl FromJson for StreamConnection {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(StreamConnection {
            ip: obj.req("ip", |c| c.string())?,
            user_agent: obj.opt("userAgent", |c| c.string())?,
            last_heartbeat: obj.opt("lastHeartbeat", |c| c.number_raw_nonnegative())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSession {
    #[serde(rename = "type")]
    pub kind: SessionStreamMode,
    pub state: String,
    pub num_connections: u32,
    pub connections: Vec<StreamConnection>,
}

impl FromJson for ChannelSession {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(ChannelSession {
            kind: obj.req("type", SessionStreamMode::decode)?,
            state: obj.req("state", |c| c.string())?,
            num_connections: obj.req("numConnections", |c| c.integer_nonnegative())?,
            connections: obj.req("connections", |c| c.array(StreamConnection::from_json))?,
        })
    }
}

// =============================================================================
// FILLER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillerCollection {
    pub id: String,
    pub weight: Number,
    pub cooldown_seconds: Number,
}

impl FromJson for FillerCollection {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(FillerCollection {
            id: obj.req("id", |c| c.string())?,
            weight: obj.req("weight", |c| c.number_raw())?,
            cooldown_seconds: obj.req("cooldownSeconds", |c| c.number_raw())?,
        })
    }
}

// =============================================================================
// FALLBACK PROGRAMS
// =============================================================================

/// Kind of a scheduled lineup entry, including the synthetic kinds that
/// never appear in the searchable catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Movie,
    Episode,
    Track,
    Redirect,
    Custom,
    Flex,
}

impl ProgramType {
    pub const ALL: [ProgramType; 6] = [
        ProgramType::Movie,
        ProgramType::Episode,
        ProgramType::Track,
        ProgramType::Redirect,
        ProgramType::Custom,
        ProgramType::Flex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::Movie => "movie",
            ProgramType::Episode => "episode",
            ProgramType::Track => "track",
            ProgramType::Redirect => "redirect",
            ProgramType::Custom => "custom",
            ProgramType::Flex => "flex",
        }
    }

    fn decode(ctx: &Ctx<'_>) -> DecodeResult<ProgramType> {
        decode_closed_set(ctx, &Self::ALL, |t| t.as_str())
    }
}

/// A lineup entry in the flat legacy shape used by the fallback list.
/// Almost everything is optional; only identity, duration, source and kind
/// are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    /// Target channel id, only set on redirect entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_show_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_show_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub duration: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plex_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// For Plex items this is the rating key value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<String>,
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: ProgramType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Number>,
}

impl FromJson for Program {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Program {
            artist_name: obj.opt("artistName", |c| c.string())?,
            album_name: obj.opt("albumName", |c| c.string())?,
            channel: obj.opt("channel", |c| c.string())?,
            custom_order: obj.opt("customOrder", |c| c.number_raw())?,
            custom_show_id: obj.opt("customShowId", |c| c.string())?,
            custom_show_name: obj.opt("customShowName", |c| c.string())?,
            date: obj.opt("date", |c| c.string())?,
            duration: obj.req("duration", |c| c.number_raw())?,
            episode: obj.opt("episode", |c| c.number_raw())?,
            episode_icon: obj.opt("episodeIcon", |c| c.string())?,
            file: obj.opt("file", |c| c.string())?,
            id: obj.req("id", |c| c.string())?,
            icon: obj.opt("icon", |c| c.string())?,
            key: obj.opt("key", |c| c.string())?,
            plex_file: obj.opt("plexFile", |c| c.string())?,
            rating: obj.opt("rating", |c| c.string())?,
            external_key: obj.opt("externalKey", |c| c.string())?,
            season: obj.opt("season", |c| c.number_raw())?,
            season_icon: obj.opt("seasonIcon", |c| c.string())?,
            server_key: obj.opt("serverKey", |c| c.string())?,
            show_icon: obj.opt("showIcon", |c| c.string())?,
            show_title: obj.opt("showTitle", |c| c.string())?,
            source_type: obj.req("sourceType", SourceType::decode)?,
            summary: obj.opt("summary", |c| c.string())?,
            title: obj.opt("title", |c| c.string())?,
            kind: obj.req("type", ProgramType::decode)?,
            year: obj.opt("year", |c| c.number_raw())?,
        })
    }
}

// =============================================================================
// THE CHANNEL AGGREGATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDemand {
    pub enabled: bool,
}

impl FromJson for OnDemand {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(OnDemand {
            enabled: obj.req("enabled", |c| c.boolean())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub disable_filler_overlay: bool,
    pub duration: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Vec<Program>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_collections: Option<Vec<FillerCollection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_repeat_cooldown: Option<Number>,
    pub group_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_flex_title: Option<String>,
    pub guide_minimum_duration: Number,
    pub icon: ChannelIcon,
    pub id: String,
    pub name: String,
    pub number: Number,
    pub offline: ChannelOffline,
    pub start_time: Number,
    pub stealth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoding: Option<TranscodingOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
    pub on_demand: OnDemand,
    pub program_count: Number,
    pub stream_mode: StreamMode,
    pub transcode_config_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<ChannelSession>>,
    pub subtitles_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_preferences: Option<Vec<SubtitlePreference>>,
}

impl FromJson for Channel {
    fn from_json(ctx: &Ctx<'_>) -> DecodeResult<Self> {
        let obj = ctx.object()?;
        Ok(Channel {
            disable_filler_overlay: obj.req("disableFillerOverlay", |c| c.boolean())?,
            duration: obj.req("duration", |c| c.number_raw())?,
            fallback: obj.opt("fallback", |c| c.array(Program::from_json))?,
            filler_collections: obj.opt("fillerCollections", |c| {
                c.array(FillerCollection::from_json)
            })?,
            filler_repeat_cooldown: obj.opt("fillerRepeatCooldown", |c| c.number_raw())?,
            group_title: obj.req("groupTitle", |c| c.string())?,
            guide_flex_title: obj.opt("guideFlexTitle", |c| c.string())?,
            guide_minimum_duration: obj.req("guideMinimumDuration", |c| c.number_raw())?,
            icon: obj.req("icon", ChannelIcon::from_json)?,
            id: obj.req("id", |c| c.string())?,
            name: obj.req("name", |c| c.string())?,
            number: obj.req("number", |c| c.number_raw())?,
            offline: obj.req("offline", ChannelOffline::from_json)?,
            start_time: obj.req("startTime", |c| c.number_raw())?,
            stealth: obj.req("stealth", |c| c.boolean())?,
            transcoding: obj.opt("transcoding", TranscodingOptions::from_json)?,
            watermark: obj.opt("watermark", Watermark::from_json)?,
            on_demand: obj.req("onDemand", OnDemand::from_json)?,
            program_count: obj.req("programCount", |c| c.number_raw())?,
            stream_mode: obj.req("streamMode", StreamMode::decode)?,
            transcode_config_id: obj.req("transcodeConfigId", |c| c.string())?,
            sessions: obj.opt("sessions", |c| c.array(ChannelSession::from_json))?,
            subtitles_enabled: obj.req("subtitlesEnabled", |c| c.boolean())?,
            subtitle_preferences: obj.opt("subtitlePreferences", |c| {
                c.non_empty_array(SubtitlePreference::from_json)
            })?,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse;
    use serde_json::{json, Value};

    fn channel_doc() -> Value {
        json!({
            "disableFillerOverlay": false,
            "duration": 86400000,
            "groupTitle": "tunarr",
            "guideMinimumDuration": 300000,
            "icon": {
                "path": "http://example.com/icon.png",
                "width": 128,
                "duration": 60,
                "position": "top-left"
            },
            "id": "channel-1",
            "name": "All Movies",
            "number": 1.5,
            "offline": {"mode": "pic", "picture": "http://example.com/offline.png"},
            "startTime": 1700000000000i64,
            "stealth": false,
            "onDemand": {"enabled": false},
            "programCount": 42,
            "streamMode": "hls",
            "transcodeConfigId": "tc-default",
            "subtitlesEnabled": false
        })
    }

    fn with(mut doc: Value, extra: Value) -> Value {
        let map = doc.as_object_mut().unwrap();
        for (k, v) in extra.as_object().unwrap() {
            map.insert(k.clone(), v.clone());
        }
        doc
    }

    #[test]
    fn test_decodes_a_minimal_channel() {
        let channel: Channel = parse(&channel_doc()).unwrap();
        assert_eq!(channel.name, "All Movies");
        assert_eq!(channel.number.to_string(), "1.5");
        assert_eq!(channel.stream_mode, StreamMode::Hls);
        assert_eq!(channel.icon.position, ScreenPosition::TopLeft);
        assert_eq!(channel.offline.mode, OfflineMode::Pic);
        assert_eq!(channel.fallback, None);
        assert_eq!(channel.watermark, None);
    }

    #[test]
    fn test_icon_substitutes_fallbacks_per_field() {
        let doc = with(
            channel_doc(),
            json!({"icon": {"path": 7, "width": -5, "duration": "long", "position": "center"}}),
        );
        let channel: Channel = parse(&doc).unwrap();
        assert_eq!(channel.icon.path, "");
        assert_eq!(channel.icon.width, Number::from(0));
        assert_eq!(channel.icon.duration, Number::from(0));
        assert_eq!(channel.icon.position, ScreenPosition::BottomRight);

        // An empty icon object gets the same treatment.
        let doc = with(channel_doc(), json!({"icon": {}}));
        let channel: Channel = parse(&doc).unwrap();
        assert_eq!(channel.icon.position, ScreenPosition::BottomRight);
    }

    #[test]
    fn test_icon_keeps_valid_values() {
        let channel: Channel = parse(&channel_doc()).unwrap();
        assert_eq!(channel.icon.path, "http://example.com/icon.png");
        assert_eq!(channel.icon.width, Number::from(128));
        assert_eq!(channel.icon.position, ScreenPosition::TopLeft);
    }

    #[test]
    fn test_icon_must_still_be_an_object() {
        let doc = with(channel_doc(), json!({"icon": "nope"}));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["icon"]);
    }

    fn watermark_fields() -> Value {
        json!({
            "enabled": true,
            "width": 10,
            "verticalMargin": 5,
            "horizontalMargin": 7.5
        })
    }

    #[test]
    fn test_watermark_fills_defaults_on_absence() {
        let doc = with(channel_doc(), json!({ "watermark": watermark_fields() }));
        let channel: Channel = parse(&doc).unwrap();
        let mark = channel.watermark.unwrap();
        assert_eq!(mark.position, ScreenPosition::BottomRight);
        assert_eq!(mark.duration, Number::from(0));
        assert_eq!(mark.opacity, 100);
        assert_eq!(mark.horizontal_margin.to_string(), "7.5");
    }

    #[test]
    fn test_watermark_position_must_be_valid_when_present() {
        let wm = with(watermark_fields(), json!({"position": "center"}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["watermark.position"]);
    }

    #[test]
    fn test_watermark_opacity_falls_back_on_anything_bad() {
        for bad in [json!(350), json!(55.5), json!("opaque"), json!(null)] {
            let wm = with(watermark_fields(), json!({ "opacity": bad }));
            let doc = with(channel_doc(), json!({ "watermark": wm }));
            let channel: Channel = parse(&doc).unwrap();
            assert_eq!(channel.watermark.unwrap().opacity, 100);
        }

        let wm = with(watermark_fields(), json!({"opacity": 40}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let channel: Channel = parse(&doc).unwrap();
        assert_eq!(channel.watermark.unwrap().opacity, 40);
    }

    #[test]
    fn test_watermark_bounds_are_strict() {
        let wm = with(watermark_fields(), json!({"duration": -1}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["watermark.duration"]);

        let wm = with(watermark_fields(), json!({"verticalMargin": 101}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["watermark.verticalMargin"]);

        let wm = with(watermark_fields(), json!({"width": 0}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["watermark.width"]);
    }

    #[test]
    fn test_fade_config_rescues_cosmetic_fields_only() {
        let wm = with(
            watermark_fields(),
            json!({"fadeConfig": [
                {"programType": "music_video", "periodMins": 5, "leadingEdge": false},
                {"programType": "trailer", "periodMins": 2, "leadingEdge": "yes"},
                {"periodMins": 3}
            ]}),
        );
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let channel: Channel = parse(&doc).unwrap();
        let fades = channel.watermark.unwrap().fade_config.unwrap();

        assert_eq!(fades[0].program_type, Some(ContentProgramType::MusicVideo));
        assert_eq!(fades[0].leading_edge, Some(false));
        // Unknown program type drops to "all programs"; bad leadingEdge
        // falls back to fading in at start.
        assert_eq!(fades[1].program_type, None);
        assert_eq!(fades[1].leading_edge, Some(true));
        assert_eq!(fades[2].program_type, None);
        assert_eq!(fades[2].leading_edge, None);

        // The period itself is not cosmetic.
        let wm = with(watermark_fields(), json!({"fadeConfig": [{"periodMins": 0.5}]}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["watermark.fadeConfig[0].periodMins"]);
    }

    #[test]
    fn test_subtitle_preferences_keep_wire_spelling() {
        let prefs = json!([{
            "langugeCode": "eng",
            "priority": 0,
            "allowImageBased": true,
            "allowExternal": false
        }]);
        let doc = with(channel_doc(), json!({ "subtitlePreferences": prefs }));
        let channel: Channel = parse(&doc).unwrap();
        let prefs = channel.subtitle_preferences.unwrap();
        assert_eq!(prefs[0].languge_code, "eng");
        assert_eq!(prefs[0].filter, SubtitleFilter::Any);

        // The correctly spelled key is, perversely, the wrong one.
        let prefs = json!([{
            "languageCode": "eng",
            "priority": 0,
            "allowImageBased": true,
            "allowExternal": false
        }]);
        let doc = with(channel_doc(), json!({ "subtitlePreferences": prefs }));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["subtitlePreferences[0].langugeCode"]);
    }

    #[test]
    fn test_subtitle_preferences_must_not_be_empty() {
        let doc = with(channel_doc(), json!({"subtitlePreferences": []}));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["subtitlePreferences"]);
    }

    #[test]
    fn test_sessions_accept_all_stream_modes() {
        let sessions: Vec<Value> = SessionStreamMode::ALL
            .iter()
            .map(|mode| {
                json!({
                    "type": mode.as_str(),
                    "state": "running",
                    "numConnections": 1,
                    "connections": [{"ip": "10.0.0.2", "lastHeartbeat": 1700000000000i64}]
                })
            })
            .collect();
        let doc = with(channel_doc(), json!({ "sessions": sessions }));
        let channel: Channel = parse(&doc).unwrap();
        let sessions = channel.sessions.unwrap();
        assert_eq!(sessions.len(), 8);
        assert_eq!(sessions[6].kind, SessionStreamMode::MpegTsConcat);

        // The channel's own stream mode refuses the concat variants.
        let doc = with(channel_doc(), json!({"streamMode": "hls_concat"}));
        let err = parse::<Channel>(&doc).unwrap_err();
        assert_eq!(err.paths(), vec!["streamMode"]);
    }

    #[test]
    fn test_fallback_accepts_legacy_programs() {
        let fallback = json!([
            {
                "id": "fb-1",
                "duration": 30000,
                "sourceType": "local",
                "type": "flex"
            },
            {
                "id": "fb-2",
                "duration": 60000,
                "sourceType": "plex",
                "type": "redirect",
                "channel": "channel-2",
                "title": "See also",
                "year": 1999
            }
        ]);
        let doc = with(channel_doc(), json!({ "fallback": fallback }));
        let channel: Channel = parse(&doc).unwrap();
        let fallback = channel.fallback.unwrap();
        assert_eq!(fallback[0].kind, ProgramType::Flex);
        assert_eq!(fallback[1].channel.as_deref(), Some("channel-2"));
        assert_eq!(fallback[1].year, Some(Number::from(1999)));
    }

    #[test]
    fn test_channel_array_locates_bad_element() {
        let good = channel_doc();
        let bad = with(channel_doc(), json!({"streamMode": "betamax"}));
        let err = parse::<Vec<Channel>>(&json!([good, bad])).unwrap_err();
        assert_eq!(err.paths(), vec!["[1].streamMode"]);
    }

    #[test]
    fn test_serialization_materializes_defaults() {
        let wm = with(watermark_fields(), json!({"fadeConfig": [{"periodMins": 5}]}));
        let doc = with(channel_doc(), json!({ "watermark": wm }));
        let channel: Channel = parse(&doc).unwrap();
        let out = serde_json::to_value(&channel).unwrap();

        assert_eq!(out["watermark"]["position"], json!("bottom-right"));
        assert_eq!(out["watermark"]["opacity"], json!(100));
        assert_eq!(out["watermark"]["duration"], json!(0));
        // Absent optionals stay absent.
        assert!(out["watermark"].get("url").is_none());
        assert!(out["watermark"]["fadeConfig"][0].get("leadingEdge").is_none());
        assert!(out.get("fallback").is_none());
        // Wire representations survive.
        assert_eq!(out["number"], json!(1.5));
        assert_eq!(out["startTime"], json!(1700000000000i64));
        assert_eq!(out["icon"]["position"], json!("top-left"));
        assert_eq!(out["streamMode"], json!("hls"));
    }
}
