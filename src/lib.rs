//! # jellylists — playlist curation engine for Jellyfin media servers
//!
//! Jellyfin exposes playlists through a deliberately narrow API:
//! paginated reads, append-by-id, delete-by-entry-id, and a
//! single-position "move entry to index" call. There is no "replace the
//! whole order" primitive. This crate is the reconciliation engine that
//! bridges the gap: given a desired order (from a sort, a manual rank,
//! or an imported file), it plans and executes the move sequence that
//! converges the server to it, while tracking reorders, per-item
//! metadata edits, and import-driven add/remove as one reviewable
//! changeset committed by a single save.
//!
//! # Architecture
//!
//! - [`JellyfinClient`] : stateless HTTP client over the playlist API
//! - [`PlaylistSession`] : stateful loader/executor owning the entry
//!   list and the [`ChangeSet`]
//! - [`planner`] : pure move planning (current order → target order)
//! - [`merge`] : tri-state pending metadata edits and normalization
//! - [`import`] : versioned export documents and import reconciliation
//! - [`Config`] : YAML-backed engine defaults
//!
//! # Example
//!
//! ```no_run
//! use jellylists::{JellyfinClient, PlaylistSession, SessionOptions, SortKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JellyfinClient::builder()
//!         .base_url("http://jellyfin.local:8096")
//!         .access_token("api-key")
//!         .build()?;
//!
//!     let mut session = PlaylistSession::new(client, "playlist-id", SessionOptions::default());
//!     session.load_all(true).await?;
//!
//!     // Preview a sort, then commit it as part of the changeset
//!     session.sort_preview(SortKey::Name, true);
//!     let report = session.save(|fraction| eprintln!("{:.0}%", fraction * 100.0)).await?;
//!     println!("{} moves issued", report.moves);
//!     Ok(())
//! }
//! ```
//!
//! # Consistency model
//!
//! After every confirmed call the session updates its local state
//! optimistically, with no re-fetch. A concurrent external mutation of
//! the same playlist desyncs that state until the next full reload; the
//! engine makes no global consistency guarantee, by design. All remote
//! calls are issued strictly sequentially — the move endpoint's position
//! semantics are not commutative — with a configurable throttle between
//! moves to bound server load.

mod changeset;
mod client;
mod config;
mod error;
pub mod import;
pub mod merge;
mod models;
pub mod planner;
mod session;

pub use changeset::{ChangeSet, ImportOptions, ImportPlan};
pub use client::{ClientBuilder, JellyfinClient, PLAYLIST_ITEM_FIELDS};
pub use config::Config;
pub use error::{Error, Result};
pub use import::{ExportDocument, ImportItem, ImportMetadata};
pub use merge::{EditField, EditOutcome, EffectiveMetadata, FieldEdit, PendingEdit};
pub use models::{ItemDto, ItemsPage, PlaylistEntry, PlaylistSummary};
pub use planner::{plan_moves, PlannedMove};
pub use session::{PlaylistSession, SaveReport, SessionOptions, SortKey};
