//! Bounded-parallel resolution across a whole roster.

use std::{collections::BTreeMap, sync::Arc};

use futures::{stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::{
    models::{ChampionRoster, CooldownRecord, Side, VersionContext},
    resolver::CooldownResolver,
};

/// Default cap on in-flight resolutions.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Progress notifications, sent in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// Dispatch is about to begin for `total` distinct champions.
    Started {
        /// Number of distinct champions.
        total: usize,
    },
    /// One champion finished, successfully or not.
    Resolved {
        /// Roster name of the champion.
        champion: String,
        /// Side the champion was first listed on.
        side: Side,
        /// Whether a non-empty record was found.
        found: bool,
        /// Champions finished so far, including this one.
        completed: usize,
        /// Number of distinct champions.
        total: usize,
    },
    /// Every task has finished.
    Finished {
        /// Champions that resolved to an empty record.
        gaps: usize,
    },
}

/// Results of a roster-wide resolution, keyed by roster name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Record per distinct champion; misses are empty records.
    pub cooldowns: BTreeMap<String, CooldownRecord>,
    /// Side each champion was first listed on.
    pub sides: BTreeMap<String, Side>,
}

impl FetchReport {
    /// Champions whose record is empty.
    pub fn gaps(&self) -> usize {
        self.cooldowns.values().filter(|record| record.is_empty()).count()
    }
}

/// Drives a [`CooldownResolver`] over a roster with a fixed concurrency cap.
pub struct FetchCoordinator {
    resolver: Arc<CooldownResolver>,
    max_concurrency: usize,
}

impl FetchCoordinator {
    /// Build a coordinator; a cap of zero is treated as one.
    pub fn new(resolver: Arc<CooldownResolver>, max_concurrency: usize) -> Self {
        Self {
            resolver,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Resolve every distinct champion in `roster`.
    ///
    /// Each champion runs as its own task; a task that panics is logged and
    /// recorded as an empty record without disturbing the others.
    ///
    /// Events are sent with backpressure while the batch runs, so the
    /// receiver must be drained concurrently (e.g. from a spawned task) or
    /// have capacity for `2 + roster size` events; otherwise this call blocks.
    pub async fn resolve_all(
        &self,
        roster: &ChampionRoster,
        context: &VersionContext,
        progress: Option<mpsc::Sender<FetchEvent>>,
    ) -> FetchReport {
        let champions = roster.unique();
        let total = champions.len();
        notify(&progress, FetchEvent::Started { total }).await;

        let mut tasks = stream::iter(champions)
            .map(|(champion, side)| {
                let resolver = Arc::clone(&self.resolver);
                let context = context.clone();
                let task_champion = champion.clone();
                async move {
                    let handle = tokio::spawn(async move {
                        resolver.resolve(&task_champion, &context).await
                    });
                    let record = match handle.await {
                        Ok(record) => record,
                        Err(err) => {
                            error!("resolution task for {champion} failed: {err}");
                            CooldownRecord::default()
                        }
                    };
                    (champion, side, record)
                }
            })
            .buffer_unordered(self.max_concurrency);

        let mut report = FetchReport::default();
        let mut completed = 0;
        while let Some((champion, side, record)) = tasks.next().await {
            completed += 1;
            let found = !record.is_empty();
            if !found {
                warn!("no cooldown data found for {champion}");
            }
            notify(
                &progress,
                FetchEvent::Resolved {
                    champion: champion.clone(),
                    side,
                    found,
                    completed,
                    total,
                },
            )
            .await;
            report.sides.insert(champion.clone(), side);
            report.cooldowns.insert(champion, record);
        }

        notify(
            &progress,
            FetchEvent::Finished {
                gaps: report.gaps(),
            },
        )
        .await;
        report
    }
}

async fn notify(progress: &Option<mpsc::Sender<FetchEvent>>, event: FetchEvent) {
    if let Some(sender) = progress {
        let _ = sender.send(event).await;
    }
}
