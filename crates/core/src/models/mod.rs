//! Shared domain models.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

/// Team label carried alongside a champion name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The `ORDER` team in the live client.
    Blue,
    /// The `CHAOS` team in the live client.
    Red,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => f.write_str("Blue"),
            Side::Red => f.write_str("Red"),
        }
    }
}

/// Champion names to resolve, split by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionRoster {
    /// Champions on the blue side.
    #[serde(rename = "Blue")]
    pub blue: Vec<String>,
    /// Champions on the red side.
    #[serde(rename = "Red")]
    pub red: Vec<String>,
}

impl ChampionRoster {
    /// Build a roster from two explicit sides.
    pub fn new(blue: Vec<String>, red: Vec<String>) -> Self {
        Self { blue, red }
    }

    /// Build a roster without side information; every name lands on Blue.
    pub fn unpartitioned(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            blue: names.into_iter().collect(),
            red: Vec::new(),
        }
    }

    /// Total number of entries including duplicates.
    pub fn len(&self) -> usize {
        self.blue.len() + self.red.len()
    }

    /// Whether the roster has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.blue.is_empty() && self.red.is_empty()
    }

    /// Distinct names in roster order, paired with the first side they appear on.
    pub fn unique(&self) -> Vec<(String, Side)> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique = Vec::new();
        let sides = [(Side::Blue, &self.blue), (Side::Red, &self.red)];
        for (side, names) in sides {
            for name in names {
                if seen.insert(name.as_str()) {
                    unique.push((name.clone(), side));
                }
            }
        }
        unique
    }
}

/// One of the four active ability slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AbilitySlot {
    Q,
    W,
    E,
    R,
}

impl AbilitySlot {
    /// Slots in the order the static CDN lists spells.
    pub const ALL: [AbilitySlot; 4] = [
        AbilitySlot::Q,
        AbilitySlot::W,
        AbilitySlot::E,
        AbilitySlot::R,
    ];

    /// Short key used in upstream documents and the dataset file.
    pub fn label(self) -> &'static str {
        match self {
            AbilitySlot::Q => "Q",
            AbilitySlot::W => "W",
            AbilitySlot::E => "E",
            AbilitySlot::R => "R",
        }
    }

    /// Parse a slot label; the passive (`P`) and anything unknown yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Q" => Some(AbilitySlot::Q),
            "W" => Some(AbilitySlot::W),
            "E" => Some(AbilitySlot::E),
            "R" => Some(AbilitySlot::R),
            _ => None,
        }
    }
}

impl fmt::Display for AbilitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalised cooldown text per ability slot plus an optional icon.
///
/// Serialises flat, e.g. `{"champIcon": "...", "Q": "8 all ranks"}`, which is
/// the shape the browser frontend reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownRecord {
    /// Icon URL or path for the champion portrait.
    #[serde(rename = "champIcon", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display text keyed by slot.
    #[serde(flatten)]
    pub abilities: BTreeMap<AbilitySlot, String>,
}

impl CooldownRecord {
    /// A record with no ability entries counts as a miss, regardless of icon.
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Text recorded for `slot`, if any.
    pub fn ability(&self, slot: AbilitySlot) -> Option<&str> {
        self.abilities.get(&slot).map(String::as_str)
    }

    /// Builder-style setter used by the adapters.
    pub fn with_ability(mut self, slot: AbilitySlot, text: impl Into<String>) -> Self {
        self.abilities.insert(slot, text.into());
        self
    }

    /// Return `Some(self)` only when the record carries ability data.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Provider version the run is pinned to (e.g. `14.1.1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionContext {
    /// Version string as listed by the static CDN.
    pub version: String,
}

impl VersionContext {
    /// Wrap a version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl fmt::Display for VersionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Final lookup table keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedDataset {
    entries: BTreeMap<String, CooldownRecord>,
}

impl ResolvedDataset {
    pub(crate) fn from_entries(entries: BTreeMap<String, CooldownRecord>) -> Self {
        Self { entries }
    }

    /// Record for a display name.
    pub fn get(&self, name: &str) -> Option<&CooldownRecord> {
        self.entries.get(name)
    }

    /// Number of champions in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no champions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in display-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CooldownRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Champions whose resolution came back empty.
    pub fn gaps(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, record)| record.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unique_keeps_first_side_and_order() {
        let roster = ChampionRoster::new(
            vec!["Ahri".into(), "Garen".into()],
            vec!["Garen".into(), "Zed".into(), "Zed".into()],
        );
        assert_eq!(roster.len(), 5);
        assert_eq!(
            roster.unique(),
            vec![
                ("Ahri".to_string(), Side::Blue),
                ("Garen".to_string(), Side::Blue),
                ("Zed".to_string(), Side::Red),
            ]
        );
    }

    #[test]
    fn record_serialises_flat() -> anyhow::Result<()> {
        let record = CooldownRecord {
            icon: Some("ahri.png".into()),
            ..Default::default()
        }
        .with_ability(AbilitySlot::Q, "7 all ranks")
        .with_ability(AbilitySlot::R, "130 / 105 / 80");

        let value = serde_json::to_value(&record)?;
        assert_eq!(
            value,
            json!({"champIcon": "ahri.png", "Q": "7 all ranks", "R": "130 / 105 / 80"})
        );

        let parsed: CooldownRecord = serde_json::from_value(value)?;
        assert_eq!(parsed, record);
        Ok(())
    }

    #[test]
    fn icon_alone_is_empty() {
        let record = CooldownRecord {
            icon: Some("x.png".into()),
            ..Default::default()
        };
        assert!(record.is_empty());
        assert!(record.non_empty().is_none());
        assert_eq!(serde_json::to_string(&CooldownRecord::default()).unwrap(), "{}");
    }
}
