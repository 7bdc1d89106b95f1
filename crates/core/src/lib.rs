#![warn(clippy::all, missing_docs)]

//! Core logic for refreshing the champion cooldown dataset.
//!
//! Cooldowns are fetched from a curated feed with the versioned static CDN
//! as fallback, reconciled per champion, renamed for display and written as
//! a version-keyed JSON file plus a small manifest.

pub mod assembler;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod live;
pub mod manifest;
pub mod matcher;
pub mod models;
pub mod names;
pub mod refresh;
pub mod resolver;
pub mod source;
pub mod store;

pub use assembler::DatasetAssembler;
pub use config::AppConfig;
pub use coordinator::{FetchCoordinator, FetchEvent, FetchReport};
pub use error::RefreshError;
pub use manifest::Manifest;
pub use models::{AbilitySlot, ChampionRoster, CooldownRecord, ResolvedDataset, Side, VersionContext};
pub use refresh::{RefreshOutcome, RefreshPipeline, RefreshStatus, RosterCooldowns};
pub use resolver::CooldownResolver;
pub use source::{CooldownSource, VersionSource};
pub use store::DatasetStore;
