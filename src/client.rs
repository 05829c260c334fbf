//! HTTP client for the Jellyfin playlist API
//!
//! This module provides a thin, stateless client over the narrow server
//! surface the engine needs: paginated playlist reads, append-by-id,
//! delete-by-entry-id, the single-position move endpoint, and the
//! read-modify-write item record calls used for metadata patches.
//!
//! # Example
//!
//! ```no_run
//! use jellylists::JellyfinClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JellyfinClient::builder()
//!         .base_url("http://jellyfin.local:8096")
//!         .access_token("api-key")
//!         .build()?;
//!
//!     let page = client.playlist_items("playlist-id", 0, 200).await?;
//!     println!("{} of {:?} entries", page.items.len(), page.total_record_count);
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{ItemsPage, PlaylistSummary};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("jellylists/", env!("CARGO_PKG_VERSION"));

/// Item fields requested with every playlist page, beyond the defaults
pub const PLAYLIST_ITEM_FIELDS: &str =
    "PremiereDate,ProductionYear,SortName,Tags,Taglines,SeriesName";

/// Upper bound on playlists returned by discovery
const PLAYLIST_DISCOVERY_LIMIT: u64 = 2000;

/// Jellyfin HTTP client
///
/// The client is stateless: it holds no playlist order and no pending
/// edits. Session state lives in [`crate::PlaylistSession`], which drives
/// this client strictly sequentially (the move endpoint's position
/// semantics are not commutative).
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    pub(crate) client: Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl JellyfinClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.access_token {
            Some(token) => builder.header("X-Emby-Token", token),
            None => builder,
        }
    }

    /// Turn a non-success response into an error, preserving the body text
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::from_status_code(status.as_u16(), message));
        }
        Ok(response)
    }

    // ========================================================================
    // Playlist reads
    // ========================================================================

    /// Fetch one page of playlist entries
    ///
    /// Returns the server's items plus `TotalRecordCount` when reported.
    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        start_index: usize,
        limit: usize,
    ) -> Result<ItemsPage> {
        let mut url = self.url(&format!("/Playlists/{playlist_id}/Items"))?;
        url.query_pairs_mut()
            .append_pair("startIndex", &start_index.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", PLAYLIST_ITEM_FIELDS);

        tracing::debug!("Fetching playlist page: {}", url);

        let response = self.request(self.client.get(url)).send().await?;
        let page: ItemsPage = Self::check(response).await?.json().await?;
        Ok(page)
    }

    /// List the user's playlists, sorted by name, for host-side pickers
    pub async fn list_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>> {
        let mut url = self.url(&format!("/Users/{user_id}/Items"))?;
        url.query_pairs_mut()
            .append_pair("IncludeItemTypes", "Playlist")
            .append_pair("Recursive", "true")
            .append_pair("SortBy", "SortName")
            .append_pair("SortOrder", "Ascending")
            .append_pair("Limit", &PLAYLIST_DISCOVERY_LIMIT.to_string());

        tracing::debug!("Listing playlists: {}", url);

        let response = self.request(self.client.get(url)).send().await?;
        let page: ItemsPage = Self::check(response).await?.json().await?;

        Ok(page
            .items
            .into_iter()
            .filter_map(|dto| {
                let id = dto.id?;
                let name = dto.name.unwrap_or_else(|| id.clone());
                Some(PlaylistSummary { id, name })
            })
            .collect())
    }

    // ========================================================================
    // Playlist mutations
    // ========================================================================

    /// Append media items to the playlist, by item id
    ///
    /// One call per batch; the session is responsible for chunking.
    pub async fn add_items(&self, playlist_id: &str, item_ids: &[String]) -> Result<()> {
        let mut url = self.url(&format!("/Playlists/{playlist_id}/Items"))?;
        url.query_pairs_mut().append_pair("Ids", &item_ids.join(","));

        tracing::debug!("Adding {} items to playlist {}", item_ids.len(), playlist_id);

        let response = self.request(self.client.post(url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Remove playlist occurrences, by playlist-entry id
    pub async fn remove_entries(&self, playlist_id: &str, entry_ids: &[String]) -> Result<()> {
        let mut url = self.url(&format!("/Playlists/{playlist_id}/Items"))?;
        url.query_pairs_mut()
            .append_pair("EntryIds", &entry_ids.join(","));

        tracing::debug!(
            "Removing {} entries from playlist {}",
            entry_ids.len(),
            playlist_id
        );

        let response = self.request(self.client.delete(url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Move one entry to an absolute 0-based index
    pub async fn move_entry(
        &self,
        playlist_id: &str,
        entry_id: &str,
        new_index: usize,
    ) -> Result<()> {
        let url = self.url(&format!(
            "/Playlists/{playlist_id}/Items/{entry_id}/Move/{new_index}"
        ))?;

        tracing::debug!("Moving entry {} to index {}", entry_id, new_index);

        let response = self.request(self.client.post(url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    // ========================================================================
    // Item records (metadata read-modify-write)
    // ========================================================================

    /// Fetch an item's full record as raw JSON
    ///
    /// The record is kept as [`serde_json::Value`] so that a later
    /// [`update_item`](Self::update_item) passes every unmentioned field
    /// back unchanged; the server replaces the whole record on update.
    pub async fn item_record(&self, item_id: &str) -> Result<serde_json::Value> {
        let url = self.url(&format!("/Items/{item_id}"))?;

        tracing::debug!("Fetching item record: {}", item_id);

        let response = self.request(self.client.get(url)).send().await?;
        let record = Self::check(response).await?.json().await?;
        Ok(record)
    }

    /// Push a full item record back to the server
    pub async fn update_item(&self, item_id: &str, record: &serde_json::Value) -> Result<()> {
        let url = self.url(&format!("/Items/{item_id}"))?;

        tracing::debug!("Updating item record: {}", item_id);

        let response = self
            .request(self.client.post(url))
            .json(record)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Builder for configuring a [`JellyfinClient`]
///
/// Unlike public streaming services, a Jellyfin server has no default
/// address, so `base_url` is mandatory.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: Option<String>,
    access_token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    ///
    /// Useful for sharing connection pools or custom proxy settings
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the server base URL (required), e.g. `http://jellyfin.local:8096`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the access token sent as `X-Emby-Token`
    ///
    /// The engine performs no authentication itself; the token is an
    /// opaque credential supplied by the host.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<JellyfinClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::other("base_url is required"))?;
        // Trailing slashes would double up when joining paths
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
                .build()?,
        };

        Ok(JellyfinClient {
            client,
            base_url,
            access_token: self.access_token,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        assert!(JellyfinClient::builder().build().is_err());
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = JellyfinClient::builder()
            .base_url("http://jellyfin.local:8096/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://jellyfin.local:8096");
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        assert!(JellyfinClient::builder().base_url("not a url").build().is_err());
    }
}
