//! Curated champion feed adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

use super::{render::render_ranks, CooldownSource, HttpClient, ListingKeys};
use crate::{
    models::{AbilitySlot, CooldownRecord, VersionContext},
    names,
};

/// Text used when an ability carries no cooldown at all.
pub const NO_COOLDOWN: &str = "No CD";

/// Curated champion feed. Richer than the static CDN and not versioned, so
/// the run's version context is ignored.
#[derive(Debug, Clone)]
pub struct Meraki {
    http: HttpClient,
    base_url: String,
}

impl Meraki {
    /// Build an adapter rooted at e.g.
    /// `https://cdn.merakianalytics.com/riot/lol/resources/latest/en-US`.
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn champion_url(&self, id: &str) -> String {
        format!("{}/champions/{}.json", self.base_url, id)
    }

    fn roster_url(&self) -> String {
        format!("{}/champions.json", self.base_url)
    }
}

#[async_trait]
impl CooldownSource for Meraki {
    fn name(&self) -> &'static str {
        "meraki"
    }

    async fn fetch_cooldowns(
        &self,
        champion: &str,
        _context: &VersionContext,
    ) -> Option<CooldownRecord> {
        let url = self.champion_url(names::request_id(champion));
        match self.http.get_json::<MerakiChampion>(&url).await {
            Ok(document) => normalize(&document).non_empty(),
            Err(err) => {
                debug!("meraki lookup for {champion} failed: {err:#}");
                None
            }
        }
    }

    async fn full_roster(&self, _context: &VersionContext) -> Option<Vec<String>> {
        match self.http.get_json::<ListingKeys>(&self.roster_url()).await {
            Ok(listing) => Some(listing.0),
            Err(err) => {
                debug!("meraki roster listing failed: {err:#}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MerakiChampion {
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    abilities: BTreeMap<String, Vec<MerakiAbility>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MerakiAbility {
    #[serde(default)]
    cooldown: Option<MerakiCooldown>,
    #[serde(default)]
    recharge_rate: Option<Vec<Number>>,
}

/// Cooldowns appear either as a bare per-rank list or wrapped in modifiers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MerakiCooldown {
    Ranks(Vec<Number>),
    Modified {
        #[serde(default)]
        modifiers: Vec<MerakiModifier>,
    },
}

impl MerakiCooldown {
    fn ranks(&self) -> &[Number] {
        match self {
            MerakiCooldown::Ranks(values) => values,
            MerakiCooldown::Modified { modifiers } => modifiers
                .first()
                .map(|modifier| modifier.values.as_slice())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MerakiModifier {
    #[serde(default)]
    values: Vec<Number>,
}

pub(crate) fn normalize(document: &MerakiChampion) -> CooldownRecord {
    let mut record = CooldownRecord {
        icon: document.icon.clone(),
        ..Default::default()
    };

    for (key, variants) in &document.abilities {
        let Some(slot) = AbilitySlot::from_label(key) else {
            continue;
        };
        let Some(ability) = variants.first() else {
            continue;
        };

        let mut text = ability
            .cooldown
            .as_ref()
            .and_then(|cooldown| render_ranks(cooldown.ranks()))
            .unwrap_or_else(|| NO_COOLDOWN.to_string());

        if let Some(recharge) = ability.recharge_rate.as_deref().and_then(render_ranks) {
            text.push_str(" <br> recharge: <br> ");
            text.push_str(&recharge);
        }

        record.abilities.insert(slot, text);
    }

    record
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> MerakiChampion {
        serde_json::from_value(value).expect("valid meraki fixture")
    }

    #[test]
    fn normalises_modifier_cooldowns_and_skips_passive() {
        let document = parse(json!({
            "name": "Ahri",
            "icon": "https://cdn.example/ahri.png",
            "abilities": {
                "P": [{"name": "Essence Theft", "cooldown": null}],
                "Q": [{"cooldown": {"modifiers": [{"values": [7, 7, 7, 7, 7], "units": ["", "", "", "", ""]}]}}],
                "W": [{"cooldown": {"modifiers": [{"values": [9, 8, 7, 6, 5]}]}}],
                "E": [{"cooldown": [14, 13, 12]}],
                "R": [{
                    "cooldown": {"modifiers": [{"values": [130, 105, 80]}]},
                    "rechargeRate": [1.5, 1.5, 1.5]
                }]
            }
        }));

        let record = normalize(&document);
        assert_eq!(record.icon.as_deref(), Some("https://cdn.example/ahri.png"));
        assert_eq!(record.abilities.len(), 4);
        assert_eq!(record.ability(AbilitySlot::Q), Some("7 all ranks"));
        assert_eq!(record.ability(AbilitySlot::W), Some("9 / 8 / 7 / 6 / 5"));
        assert_eq!(record.ability(AbilitySlot::E), Some("14 / 13 / 12"));
        assert_eq!(
            record.ability(AbilitySlot::R),
            Some("130 / 105 / 80 <br> recharge: <br> 1.5 all ranks")
        );
    }

    #[test]
    fn missing_cooldown_reads_no_cd() {
        let document = parse(json!({
            "abilities": {
                "Q": [{"cooldown": null}],
                "W": [{"cooldown": {"modifiers": []}}],
                "E": []
            }
        }));

        let record = normalize(&document);
        assert_eq!(record.ability(AbilitySlot::Q), Some(NO_COOLDOWN));
        assert_eq!(record.ability(AbilitySlot::W), Some(NO_COOLDOWN));
        assert_eq!(record.ability(AbilitySlot::E), None);
        assert!(record.icon.is_none());
    }

    #[test]
    fn document_without_abilities_is_empty() {
        let document = parse(json!({"icon": "x.png"}));
        assert!(normalize(&document).non_empty().is_none());
    }

    #[tokio::test]
    async fn unreachable_feed_yields_nothing() -> anyhow::Result<()> {
        let http = HttpClient::new(Duration::from_secs(2))?;
        let meraki = Meraki::new(http, "http://127.0.0.1:9/en-US");
        let context = VersionContext::new("14.1.1");

        assert!(meraki.fetch_cooldowns("Ahri", &context).await.is_none());
        assert!(meraki.full_roster(&context).await.is_none());
        Ok(())
    }
}
