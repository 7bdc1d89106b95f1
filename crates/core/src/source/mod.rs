//! Remote cooldown providers and their normalisation into [`CooldownRecord`].

/// Static CDN adapter (versioned per-champion documents).
pub mod ddragon;
/// Shared HTTP plumbing.
pub mod http;
/// Curated third-party feed adapter.
pub mod meraki;
/// Per-rank value rendering.
pub mod render;

use std::fmt;

use async_trait::async_trait;
use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    error::RefreshError,
    models::{CooldownRecord, VersionContext},
};

pub use ddragon::DataDragon;
pub use http::HttpClient;
pub use meraki::Meraki;

/// A provider that can produce cooldown records for champions.
///
/// Implementations swallow transport, parse and schema failures and report
/// them as `None`; callers only ever see "got data" or "try elsewhere".
#[async_trait]
pub trait CooldownSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch and normalise cooldowns for one champion. `Some` is never empty.
    async fn fetch_cooldowns(
        &self,
        champion: &str,
        context: &VersionContext,
    ) -> Option<CooldownRecord>;

    /// Every champion identifier the provider knows about, used for fuzzy
    /// matching and full refreshes. `None` when the listing is unavailable.
    async fn full_roster(&self, context: &VersionContext) -> Option<Vec<String>>;
}

/// Source of the provider version a run is pinned to.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Latest published version; failure here is fatal for a run.
    async fn latest_version(&self) -> Result<VersionContext, RefreshError>;
}

/// Keys of a listing object (`{"Aatrox": {...}, "Ahri": {...}}`) in the
/// order the provider published them. Values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ListingKeys(pub Vec<String>);

impl<'de> Deserialize<'de> for ListingKeys {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = ListingKeys;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by champion identifier")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut keys = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, _)) = map.next_entry::<String, IgnoredAny>()? {
                    keys.push(key);
                }
                Ok(ListingKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_keys_keep_document_order() {
        let raw = r#"{"Zed": {"id": 238}, "Ahri": {"id": 103}, "MonkeyKing": {}}"#;
        let listing: ListingKeys = serde_json::from_str(raw).expect("valid listing");
        assert_eq!(listing.0, vec!["Zed", "Ahri", "MonkeyKing"]);
    }

    #[test]
    fn listing_rejects_non_objects() {
        assert!(serde_json::from_str::<ListingKeys>("[1, 2]").is_err());
    }
}
