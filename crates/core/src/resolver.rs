//! Per-champion fallback chain across the two providers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    matcher,
    models::{CooldownRecord, VersionContext},
    source::CooldownSource,
};

/// How a step picks the name it asks the provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Use the roster name as given.
    Exact,
    /// Use the provider's closest roster entry to the given name.
    Closest,
}

/// Which provider a step consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// The curated feed.
    Primary,
    /// The versioned static CDN.
    Secondary,
}

/// One entry in the resolution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Provider consulted by this step.
    pub provider: Provider,
    /// Name selection used by this step.
    pub lookup: Lookup,
}

/// Exact lookups on both providers first; fuzzy matching only after both miss,
/// since it needs a full roster listing.
pub const DEFAULT_PLAN: [Step; 4] = [
    Step {
        provider: Provider::Primary,
        lookup: Lookup::Exact,
    },
    Step {
        provider: Provider::Secondary,
        lookup: Lookup::Exact,
    },
    Step {
        provider: Provider::Primary,
        lookup: Lookup::Closest,
    },
    Step {
        provider: Provider::Secondary,
        lookup: Lookup::Closest,
    },
];

/// Successful resolution with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Step that produced the record.
    pub step: Step,
    /// Name the provider was queried with.
    pub queried_as: String,
    /// The non-empty record.
    pub record: CooldownRecord,
}

/// Walks [`DEFAULT_PLAN`] and returns the first non-empty record.
pub struct CooldownResolver {
    primary: Arc<dyn CooldownSource>,
    secondary: Arc<dyn CooldownSource>,
}

impl CooldownResolver {
    /// Build a resolver over a preferred and a fallback provider.
    pub fn new(primary: Arc<dyn CooldownSource>, secondary: Arc<dyn CooldownSource>) -> Self {
        Self { primary, secondary }
    }

    fn source(&self, provider: Provider) -> &dyn CooldownSource {
        match provider {
            Provider::Primary => self.primary.as_ref(),
            Provider::Secondary => self.secondary.as_ref(),
        }
    }

    /// Resolve one champion, returning an empty record when every step misses.
    pub async fn resolve(&self, champion: &str, context: &VersionContext) -> CooldownRecord {
        self.resolve_with_provenance(champion, context)
            .await
            .map(|resolution| resolution.record)
            .unwrap_or_default()
    }

    /// Resolve one champion and report which step succeeded.
    pub async fn resolve_with_provenance(
        &self,
        champion: &str,
        context: &VersionContext,
    ) -> Option<Resolution> {
        for step in DEFAULT_PLAN {
            let source = self.source(step.provider);
            let queried_as = match step.lookup {
                Lookup::Exact => champion.to_string(),
                Lookup::Closest => match self.closest_name(source, champion, context).await {
                    Some(name) => name,
                    None => continue,
                },
            };

            let record = source
                .fetch_cooldowns(&queried_as, context)
                .await
                .and_then(CooldownRecord::non_empty);
            if let Some(record) = record {
                if step.lookup == Lookup::Closest {
                    info!(
                        "resolved {champion} via {} closest match {queried_as}",
                        source.name()
                    );
                }
                return Some(Resolution {
                    step,
                    queried_as,
                    record,
                });
            }
            debug!("{} had nothing for {queried_as}", source.name());
        }

        None
    }

    /// Closest roster entry, skipped when it is the name already tried exactly.
    async fn closest_name(
        &self,
        source: &dyn CooldownSource,
        champion: &str,
        context: &VersionContext,
    ) -> Option<String> {
        let roster = source.full_roster(context).await?;
        let candidate = matcher::closest_match(champion, &roster)?;
        if candidate == champion {
            return None;
        }
        Some(candidate.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::models::AbilitySlot;

    /// In-memory provider keyed by exact request name.
    pub(crate) struct FakeSource {
        pub name: &'static str,
        pub records: HashMap<String, CooldownRecord>,
        pub roster: Option<Vec<String>>,
        pub panic_on: Option<String>,
        pub fetches: AtomicUsize,
        pub listings: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(name: &'static str) -> Self {
            Self {
                name,
                records: HashMap::new(),
                roster: None,
                panic_on: None,
                fetches: AtomicUsize::new(0),
                listings: AtomicUsize::new(0),
            }
        }

        pub(crate) fn with(mut self, champion: &str, text: &str) -> Self {
            let record = CooldownRecord::default().with_ability(AbilitySlot::Q, text);
            self.records.insert(champion.to_string(), record);
            self
        }

        pub(crate) fn with_roster(mut self, roster: &[&str]) -> Self {
            self.roster = Some(roster.iter().map(|name| name.to_string()).collect());
            self
        }
    }

    #[async_trait]
    impl CooldownSource for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_cooldowns(
            &self,
            champion: &str,
            _context: &VersionContext,
        ) -> Option<CooldownRecord> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.panic_on.as_deref() == Some(champion) {
                panic!("simulated provider bug for {champion}");
            }
            let id = crate::names::request_id(champion);
            self.records.get(id).cloned()
        }

        async fn full_roster(&self, _context: &VersionContext) -> Option<Vec<String>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            self.roster.clone()
        }
    }

    fn context() -> VersionContext {
        VersionContext::new("14.1.1")
    }

    fn resolver(primary: FakeSource, secondary: FakeSource) -> CooldownResolver {
        CooldownResolver::new(Arc::new(primary), Arc::new(secondary))
    }

    #[tokio::test]
    async fn primary_wins_when_both_have_data() {
        let chain = resolver(
            FakeSource::new("a").with("Ahri", "from a"),
            FakeSource::new("b").with("Ahri", "from b"),
        );

        let resolution = chain
            .resolve_with_provenance("Ahri", &context())
            .await
            .expect("resolved");
        assert_eq!(resolution.step, DEFAULT_PLAN[0]);
        assert_eq!(resolution.record.ability(AbilitySlot::Q), Some("from a"));
    }

    #[tokio::test]
    async fn falls_back_to_secondary_before_fuzzy_matching() {
        let primary = Arc::new(FakeSource::new("a").with_roster(&["Ahri"]));
        let secondary = Arc::new(FakeSource::new("b").with("Ahri", "from b"));
        let resolver = CooldownResolver::new(primary.clone(), secondary.clone());

        let record = resolver.resolve("Ahri", &context()).await;
        assert_eq!(record.ability(AbilitySlot::Q), Some("from b"));
        assert_eq!(primary.listings.load(Ordering::SeqCst), 0);
        assert_eq!(secondary.listings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fuzzy_match_against_primary_then_secondary() {
        let chain = resolver(
            FakeSource::new("a")
                .with("Kaisa", "from a")
                .with_roster(&["Kaisa", "Khazix"]),
            FakeSource::new("b").with_roster(&["KaiSa"]),
        );
        let resolution = chain
            .resolve_with_provenance("Kai'Sa", &context())
            .await
            .expect("resolved");
        assert_eq!(resolution.step, DEFAULT_PLAN[2]);
        assert_eq!(resolution.queried_as, "Kaisa");

        let chain = resolver(
            FakeSource::new("a").with_roster(&["Kaisa"]),
            FakeSource::new("b")
                .with("KaiSa", "from b")
                .with_roster(&["KaiSa"]),
        );
        let resolution = chain
            .resolve_with_provenance("Kai'Sa", &context())
            .await
            .expect("resolved");
        assert_eq!(resolution.step, DEFAULT_PLAN[3]);
        assert_eq!(resolution.record.ability(AbilitySlot::Q), Some("from b"));
    }

    #[tokio::test]
    async fn total_miss_is_an_empty_record() {
        let primary = Arc::new(FakeSource::new("a").with_roster(&[]));
        let secondary = Arc::new(FakeSource::new("b"));
        let resolver = CooldownResolver::new(primary.clone(), secondary.clone());

        let record = resolver.resolve("Nobody", &context()).await;
        assert!(record.is_empty());
        assert_eq!(primary.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(primary.listings.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.listings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_records_from_a_source_are_not_accepted() {
        let mut primary = FakeSource::new("a");
        primary
            .records
            .insert("Ahri".to_string(), CooldownRecord::default());
        let chain = resolver(primary, FakeSource::new("b").with("Ahri", "from b"));

        let record = chain.resolve("Ahri", &context()).await;
        assert_eq!(record.ability(AbilitySlot::Q), Some("from b"));
    }
}
