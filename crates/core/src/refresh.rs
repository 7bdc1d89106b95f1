//! One refresh run: version, roster, resolve, assemble, persist.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    assembler::DatasetAssembler,
    config::AppConfig,
    coordinator::{FetchCoordinator, FetchEvent},
    error::RefreshError,
    manifest::Manifest,
    matcher,
    models::{ChampionRoster, ResolvedDataset, Side, VersionContext},
    names,
    resolver::CooldownResolver,
    source::{CooldownSource, DataDragon, HttpClient, Meraki, VersionSource},
    store::DatasetStore,
};

/// What happened to the dataset file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    /// A fresh dataset was resolved and written.
    Built {
        /// Entries in the written dataset.
        champions: usize,
        /// Display names that resolved to nothing.
        gaps: Vec<String>,
    },
    /// The dataset for this version already existed.
    Skipped,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Version the run was pinned to.
    pub version: VersionContext,
    /// Dataset file for that version.
    pub dataset_path: PathBuf,
    /// Whether the dataset was rebuilt.
    pub status: RefreshStatus,
    /// Manifest written at the end of the run.
    pub manifest: Manifest,
}

/// Cooldowns for an ad-hoc roster, e.g. the players of a live game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterCooldowns {
    /// Version the lookups were made against.
    pub version: String,
    /// Records keyed by display name.
    pub champion_cooldowns: ResolvedDataset,
    /// Side per display name.
    pub team_champ_dict: BTreeMap<String, Side>,
}

/// Wires the providers, coordinator, assembler and store together.
pub struct RefreshPipeline {
    versions: Arc<dyn VersionSource>,
    primary: Arc<dyn CooldownSource>,
    secondary: Arc<dyn CooldownSource>,
    coordinator: FetchCoordinator,
    assembler: DatasetAssembler,
    store: DatasetStore,
}

impl RefreshPipeline {
    /// Build a pipeline against the real providers described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(config.request_timeout())?;
        let ddragon = Arc::new(DataDragon::new(
            http.clone(),
            config.ddragon_base.as_str(),
            config.locale.as_str(),
        ));
        let meraki = Arc::new(Meraki::new(http, config.meraki_base.as_str()));

        Ok(Self::new(
            ddragon.clone(),
            meraki,
            ddragon,
            DatasetStore::new(&config.data_dir),
            config.max_concurrency,
        ))
    }

    /// Build a pipeline from explicit parts.
    pub fn new(
        versions: Arc<dyn VersionSource>,
        primary: Arc<dyn CooldownSource>,
        secondary: Arc<dyn CooldownSource>,
        store: DatasetStore,
        max_concurrency: usize,
    ) -> Self {
        let resolver = Arc::new(CooldownResolver::new(primary.clone(), secondary.clone()));
        Self {
            versions,
            primary,
            secondary,
            coordinator: FetchCoordinator::new(resolver, max_concurrency),
            assembler: DatasetAssembler::default(),
            store,
        }
    }

    /// Replace the default assembler (and its override table).
    pub fn with_assembler(mut self, assembler: DatasetAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Store the pipeline writes into.
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Latest provider version.
    pub async fn latest_version(&self) -> Result<VersionContext, RefreshError> {
        self.versions.latest_version().await
    }

    /// Every known champion, from the primary listing or else the secondary.
    pub async fn full_roster(
        &self,
        context: &VersionContext,
    ) -> Result<ChampionRoster, RefreshError> {
        for source in [&self.primary, &self.secondary] {
            match source.full_roster(context).await {
                Some(names) if !names.is_empty() => {
                    info!("{} listed {} champions", source.name(), names.len());
                    return Ok(ChampionRoster::unpartitioned(names));
                }
                _ => warn!("{} roster listing unavailable", source.name()),
            }
        }
        Err(RefreshError::RosterUnavailable(
            "no provider returned a champion listing".to_string(),
        ))
    }

    /// Closest known champion identifier to `name`.
    pub async fn closest_champion(&self, name: &str, context: &VersionContext) -> Option<String> {
        let roster = self.full_roster(context).await.ok()?;
        matcher::closest_match(name, &roster.blue).map(str::to_string)
    }

    /// Full refresh: skip the rebuild when this version's dataset exists
    /// (unless `force`), and always rewrite the manifest.
    pub async fn run(
        &self,
        force: bool,
        progress: Option<mpsc::Sender<FetchEvent>>,
    ) -> Result<RefreshOutcome> {
        let version = self.latest_version().await?;
        info!("current provider version: {version}");
        let dataset_path = self.store.dataset_path(&version.version);

        let status = if !force && self.store.exists(&version.version) {
            info!(
                "{} already exists, skipping rebuild",
                dataset_path.display()
            );
            RefreshStatus::Skipped
        } else {
            info!("building {}", dataset_path.display());
            let roster = self.full_roster(&version).await?;
            let report = self
                .coordinator
                .resolve_all(&roster, &version, progress)
                .await;
            let dataset = self.assembler.assemble(report.cooldowns)?;
            self.store
                .write(&version.version, &dataset)
                .context("failed to persist dataset")?;
            info!("cooldown data saved to {}", dataset_path.display());
            RefreshStatus::Built {
                champions: dataset.len(),
                gaps: dataset.gaps().into_iter().map(str::to_string).collect(),
            }
        };

        let manifest = self
            .store
            .write_manifest(&version.version)
            .context("failed to persist manifest")?;
        info!("manifest saved to {}", self.store.manifest_path().display());

        Ok(RefreshOutcome {
            version,
            dataset_path,
            status,
            manifest,
        })
    }

    /// Resolve an arbitrary roster without touching the store.
    pub async fn resolve_roster(
        &self,
        roster: &ChampionRoster,
        progress: Option<mpsc::Sender<FetchEvent>>,
    ) -> Result<RosterCooldowns> {
        let version = self.latest_version().await?;
        let report = self
            .coordinator
            .resolve_all(roster, &version, progress)
            .await;
        let team_champ_dict = report
            .sides
            .iter()
            .map(|(internal, side)| (names::display_name(internal), *side))
            .collect();
        let champion_cooldowns = self.assembler.assemble(report.cooldowns)?;

        Ok(RosterCooldowns {
            version: version.version,
            champion_cooldowns,
            team_champ_dict,
        })
    }
}
