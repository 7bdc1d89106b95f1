//! Display-name translation and content overrides for the final dataset.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::RefreshError,
    models::{AbilitySlot, CooldownRecord, ResolvedDataset},
    names,
};

/// Replacement text for one champion's slot, keyed by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOverride {
    /// Display name the override applies to.
    pub champion: String,
    /// Slot whose text is replaced.
    pub slot: AbilitySlot,
    /// Text written in place of the upstream value.
    pub text: String,
}

impl ContentOverride {
    /// Build an override entry.
    pub fn new(champion: impl Into<String>, slot: AbilitySlot, text: impl Into<String>) -> Self {
        Self {
            champion: champion.into(),
            slot,
            text: text.into(),
        }
    }
}

/// Upstream entries known to be unusable as published.
pub fn builtin_overrides() -> Vec<ContentOverride> {
    vec![ContentOverride::new(
        "Aphelios",
        AbilitySlot::Q,
        "Five weapon-specific Q abilities; cooldown depends on the equipped weapon",
    )]
}

/// Turns resolver output into the persisted lookup table.
#[derive(Debug, Clone)]
pub struct DatasetAssembler {
    overrides: Vec<ContentOverride>,
}

impl Default for DatasetAssembler {
    fn default() -> Self {
        Self::new(builtin_overrides())
    }
}

impl DatasetAssembler {
    /// Build an assembler with an explicit override table.
    pub fn new(overrides: Vec<ContentOverride>) -> Self {
        Self { overrides }
    }

    /// Rename entries to display names and apply overrides.
    ///
    /// Overrides only touch records that resolved; gaps stay empty so they
    /// remain visible. Two entries rendering to one display name is an error.
    pub fn assemble(
        &self,
        cooldowns: BTreeMap<String, CooldownRecord>,
    ) -> Result<ResolvedDataset, RefreshError> {
        let mut entries: BTreeMap<String, CooldownRecord> = BTreeMap::new();
        let mut owners: BTreeMap<String, String> = BTreeMap::new();

        for (internal, mut record) in cooldowns {
            let display = names::display_name(&internal);
            if let Some(first) = owners.get(&display) {
                return Err(RefreshError::NameCollision {
                    display,
                    first: first.clone(),
                    second: internal,
                });
            }

            if !record.is_empty() {
                self.apply_overrides(&display, &mut record);
            }
            owners.insert(display.clone(), internal);
            entries.insert(display, record);
        }

        Ok(ResolvedDataset::from_entries(entries))
    }

    fn apply_overrides(&self, name: &str, record: &mut CooldownRecord) {
        for entry in self.overrides.iter().filter(|entry| entry.champion == name) {
            debug!("overriding {name} {}", entry.slot);
            record.abilities.insert(entry.slot, entry.text.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> CooldownRecord {
        CooldownRecord::default().with_ability(AbilitySlot::Q, text)
    }

    #[test]
    fn renames_and_overrides() -> anyhow::Result<()> {
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("MonkeyKing".to_string(), record("8 all ranks"));
        cooldowns.insert("MissFortune".to_string(), record("3 all ranks"));
        cooldowns.insert("Aphelios".to_string(), record("garbled"));

        let dataset = DatasetAssembler::default().assemble(cooldowns)?;
        let names: Vec<&str> = dataset.names().collect();
        assert_eq!(names, vec!["Aphelios", "Miss Fortune", "Wukong"]);
        assert_eq!(
            dataset.get("Wukong").and_then(|r| r.ability(AbilitySlot::Q)),
            Some("8 all ranks")
        );
        assert_ne!(
            dataset.get("Aphelios").and_then(|r| r.ability(AbilitySlot::Q)),
            Some("garbled")
        );
        Ok(())
    }

    #[test]
    fn overrides_skip_gaps() -> anyhow::Result<()> {
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("Aphelios".to_string(), CooldownRecord::default());
        let dataset = DatasetAssembler::default().assemble(cooldowns)?;
        assert_eq!(dataset.gaps(), vec!["Aphelios"]);
        Ok(())
    }

    #[test]
    fn collisions_are_reported() {
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("MonkeyKing".to_string(), record("a"));
        cooldowns.insert("Wukong".to_string(), record("b"));

        let err = DatasetAssembler::default()
            .assemble(cooldowns)
            .expect_err("collision");
        match err {
            RefreshError::NameCollision { display, .. } => assert_eq!(display, "Wukong"),
            other => panic!("unexpected error {other}"),
        }
    }
}
