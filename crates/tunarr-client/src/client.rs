//! Async HTTP client for a Tunarr server.
//!
//! One method per remote operation. Each method issues the request, turns a
//! non-success status into that operation's transport error without reading
//! the body, validates the body through `tunarr-core`, and returns the
//! re-keyed envelope the MCP tools expose.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Number, Value};
use tracing::{debug, warn};
use tunarr_core::{
    Channel, ContentItem, Ctx, Error, FromJson, MediaSource, Operation, Result, SearchRequest,
    ValidationError,
};

// =============================================================================
// RESULT ENVELOPES
// =============================================================================

/// Channel listing, re-keyed from the service's bare array.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelList {
    pub channels: Vec<Channel>,
}

/// One page of a channel's movie programs. The service answers
/// `{total, result, size}`; `result` is re-keyed as `movies`.
#[derive(Debug, Clone, Serialize)]
pub struct MoviesPage {
    pub total: Number,
    pub movies: Vec<ContentItem>,
    pub size: Number,
}

/// One page of a channel's shows, re-keyed like [`MoviesPage`].
#[derive(Debug, Clone, Serialize)]
pub struct ShowsPage {
    pub total: Number,
    pub shows: Vec<ContentItem>,
    pub size: Number,
}

/// Media source listing, re-keyed from the service's bare array.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSourceList {
    pub media_sources: Vec<MediaSource>,
}

/// Program search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub results: Vec<ContentItem>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client for the Tunarr HTTP API.
///
/// Holds a connection-pooling [`reqwest::Client`] and the server's base URL,
/// e.g. `http://localhost:8000`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TunarrClient {
    client: Client,
    base_url: String,
}

impl TunarrClient {
    /// Create a client targeting `host` with the given per-request timeout.
    pub fn new(host: impl Into<String>, timeout_seconds: u64) -> Result<TunarrClient> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(TunarrClient {
            client,
            base_url: host.into(),
        })
    }

    /// Host the client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all channels. `GET /api/channels`.
    pub async fn list_channels(&self) -> Result<ChannelList> {
        let started = Instant::now();
        debug!(op = "list_channels", "Listing channels");

        let response = self
            .client
            .get(format!("{}/api/channels", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                op = "list_channels",
                status = response.status().as_u16(),
                "Tunarr answered with an error status"
            );
            return Err(Error::transport(Operation::ListChannels));
        }

        let body: Value = response.json().await?;
        let channels = Ctx::named(&body, "channels").array(Channel::from_json)?;

        debug!(
            op = "list_channels",
            result_count = channels.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Channels listed"
        );
        Ok(ChannelList { channels })
    }

    /// Fetch one page of a channel's movie programs.
    /// `GET /api/channels/{id}/programs?type=movie&offset=..&limit=..`.
    pub async fn list_movies_in_channel(
        &self,
        id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<MoviesPage> {
        let started = Instant::now();
        debug!(
            op = "list_movies_in_channel",
            channel_id = %id,
            offset,
            limit,
            "Listing movies in channel"
        );

        let response = self
            .client
            .get(format!(
                "{}/api/channels/{}/programs?type=movie&offset={}&limit={}",
                self.base_url, id, offset, limit
            ))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                op = "list_movies_in_channel",
                channel_id = %id,
                status = response.status().as_u16(),
                "Tunarr answered with an error status"
            );
            return Err(Error::transport(Operation::ListMoviesInChannel));
        }

        let body: Value = response.json().await?;
        let obj = Ctx::root(&body).object()?;
        let total = obj.req("total", |c| c.number_raw())?;
        let movies = match obj.get("result") {
            Some(field) => Ctx::named(field.value(), "movies").array(ContentItem::only("movie"))?,
            None => return Err(ValidationError::new("movies", "a required value", "nothing").into()),
        };
        let size = obj.req("size", |c| c.number_raw())?;

        debug!(
            op = "list_movies_in_channel",
            channel_id = %id,
            result_count = movies.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Movies listed"
        );
        Ok(MoviesPage {
            total,
            movies,
            size,
        })
    }

    /// Fetch one page of a channel's shows.
    /// `GET /api/channels/{id}/shows?offset=..&limit=..`.
    pub async fn list_shows_in_channel(
        &self,
        id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ShowsPage> {
        let started = Instant::now();
        debug!(
            op = "list_shows_in_channel",
            channel_id = %id,
            offset,
            limit,
            "Listing shows in channel"
        );

        let response = self
            .client
            .get(format!(
                "{}/api/channels/{}/shows?offset={}&limit={}",
                self.base_url, id, offset, limit
            ))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                op = "list_shows_in_channel",
                channel_id = %id,
                status = response.status().as_u16(),
                "Tunarr answered with an error status"
            );
            return Err(Error::transport(Operation::ListShowsInChannel));
        }

        let body: Value = response.json().await?;
        let obj = Ctx::root(&body).object()?;
        let total = obj.req("total", |c| c.number_raw())?;
        let shows = match obj.get("result") {
            Some(field) => Ctx::named(field.value(), "shows").array(ContentItem::only("show"))?,
            None => return Err(ValidationError::new("shows", "a required value", "nothing").into()),
        };
        let size = obj.req("size", |c| c.number_raw())?;

        debug!(
            op = "list_shows_in_channel",
            channel_id = %id,
            result_count = shows.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Shows listed"
        );
        Ok(ShowsPage { total, shows, size })
    }

    /// Fetch the configured media sources. `GET /api/media-sources`.
    pub async fn list_media_sources(&self) -> Result<MediaSourceList> {
        let started = Instant::now();
        debug!(op = "list_media_sources", "Listing media sources");

        let response = self
            .client
            .get(format!("{}/api/media-sources", self.base_url))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                op = "list_media_sources",
                status = response.status().as_u16(),
                "Tunarr answered with an error status"
            );
            return Err(Error::transport(Operation::ListMediaSources));
        }

        let body: Value = response.json().await?;
        let media_sources = Ctx::named(&body, "mediaSources").array(MediaSource::from_json)?;

        debug!(
            op = "list_media_sources",
            result_count = media_sources.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Media sources listed"
        );
        Ok(MediaSourceList { media_sources })
    }

    /// Search programs across media sources. `POST /api/programs/search`.
    pub async fn search_programs(&self, request: &SearchRequest) -> Result<SearchResults> {
        let started = Instant::now();
        debug!(
            op = "search_programs",
            page = request.page,
            limit = request.limit,
            "Searching programs"
        );

        let response = self
            .client
            .post(format!("{}/api/programs/search", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                op = "search_programs",
                status = response.status().as_u16(),
                "Tunarr answered with an error status"
            );
            return Err(Error::transport(Operation::SearchPrograms));
        }

        let body: Value = response.json().await?;
        let obj = Ctx::root(&body).object()?;
        let results = obj.req("results", |c| c.array(ContentItem::from_json))?;

        debug!(
            op = "search_programs",
            result_count = results.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(SearchResults { results })
    }
}
