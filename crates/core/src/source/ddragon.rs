//! Versioned static CDN adapter and version authority.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

use super::{render::render_ranks, CooldownSource, HttpClient, ListingKeys, VersionSource};
use crate::{
    error::RefreshError,
    models::{AbilitySlot, CooldownRecord, VersionContext},
    names,
};

/// Versioned static CDN. Also the authority on which version is current.
#[derive(Debug, Clone)]
pub struct DataDragon {
    http: HttpClient,
    base_url: String,
    locale: String,
}

impl DataDragon {
    /// Build an adapter rooted at e.g. `https://ddragon.leagueoflegends.com`.
    pub fn new(http: HttpClient, base_url: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            locale: locale.into(),
        }
    }

    fn versions_url(&self) -> String {
        format!("{}/api/versions.json", self.base_url)
    }

    fn champion_url(&self, version: &str, id: &str) -> String {
        format!(
            "{}/cdn/{}/data/{}/champion/{}.json",
            self.base_url, version, self.locale, id
        )
    }

    fn roster_url(&self, version: &str) -> String {
        format!(
            "{}/cdn/{}/data/{}/champion.json",
            self.base_url, version, self.locale
        )
    }

    fn icon_url(&self, version: &str, image: &str) -> String {
        format!("{}/cdn/{}/img/champion/{}", self.base_url, version, image)
    }

    pub(crate) fn normalize(
        &self,
        document: &DdragonDocument,
        id: &str,
        context: &VersionContext,
    ) -> CooldownRecord {
        let Some(champion) = document.data.get(id).or_else(|| {
            document
                .data
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(id))
                .map(|(_, champion)| champion)
        }) else {
            return CooldownRecord::default();
        };

        let icon = champion
            .image
            .as_ref()
            .map(|image| image.full.as_str())
            .filter(|full| !full.is_empty())
            .map(|full| self.icon_url(&context.version, full));

        let mut record = CooldownRecord {
            icon,
            ..Default::default()
        };
        for (slot, spell) in AbilitySlot::ALL.into_iter().zip(&champion.spells) {
            if let Some(text) = render_ranks(&spell.cooldown) {
                record.abilities.insert(slot, text);
            }
        }
        record
    }
}

#[async_trait]
impl CooldownSource for DataDragon {
    fn name(&self) -> &'static str {
        "ddragon"
    }

    async fn fetch_cooldowns(
        &self,
        champion: &str,
        context: &VersionContext,
    ) -> Option<CooldownRecord> {
        let id = names::request_id(champion);
        let url = self.champion_url(&context.version, id);
        match self.http.get_json::<DdragonDocument>(&url).await {
            Ok(document) => self.normalize(&document, id, context).non_empty(),
            Err(err) => {
                debug!("ddragon lookup for {champion} failed: {err:#}");
                None
            }
        }
    }

    async fn full_roster(&self, context: &VersionContext) -> Option<Vec<String>> {
        let url = self.roster_url(&context.version);
        match self.http.get_json::<DdragonListing>(&url).await {
            Ok(listing) => Some(listing.data.0),
            Err(err) => {
                debug!("ddragon roster listing failed: {err:#}");
                None
            }
        }
    }
}

#[async_trait]
impl VersionSource for DataDragon {
    async fn latest_version(&self) -> Result<VersionContext, RefreshError> {
        let versions: Vec<String> = self
            .http
            .get_json(&self.versions_url())
            .await
            .map_err(|err| RefreshError::VersionUnavailable(format!("{err:#}")))?;

        select_latest(versions)
    }
}

/// The version listing is newest-first; an empty list leaves nothing to pin to.
pub(crate) fn select_latest(versions: Vec<String>) -> Result<VersionContext, RefreshError> {
    versions
        .into_iter()
        .next()
        .map(VersionContext::new)
        .ok_or_else(|| RefreshError::VersionUnavailable("version list is empty".to_string()))
}

#[derive(Debug, Deserialize)]
pub(crate) struct DdragonDocument {
    #[serde(default)]
    data: BTreeMap<String, DdragonChampion>,
}

#[derive(Debug, Deserialize)]
struct DdragonChampion {
    #[serde(default)]
    image: Option<DdragonImage>,
    #[serde(default)]
    spells: Vec<DdragonSpell>,
}

#[derive(Debug, Deserialize)]
struct DdragonImage {
    full: String,
}

#[derive(Debug, Deserialize)]
struct DdragonSpell {
    #[serde(default)]
    cooldown: Vec<Number>,
}

#[derive(Debug, Deserialize)]
struct DdragonListing {
    #[serde(default)]
    data: ListingKeys,
}
