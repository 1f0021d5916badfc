use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::aggregator::Aggregator;
use crate::config::SectionConfig;
use crate::model::Snapshot;

/// Clock abstraction so staleness decisions are testable with a fixed
/// time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    /// No snapshot has ever been produced
    #[error("no snapshot available")]
    Empty,
}

struct Stored {
    snapshot: Arc<Snapshot>,
    /// Calendar day, in the reference timezone, on which the snapshot
    /// was produced.
    day: NaiveDate,
}

/// Holds the last published snapshot and decides when to rebuild it.
///
/// A snapshot is stale once the calendar day in the reference timezone
/// has changed since it was produced. Refreshes are serialized: at
/// most one fetch pass is in flight system-wide, and callers that
/// arrive while one is running wait for its result instead of starting
/// their own.
pub struct SnapshotCache {
    clock: Arc<dyn Clock>,
    tz: FixedOffset,
    aggregator: Aggregator,
    sections: Vec<SectionConfig>,
    stored: RwLock<Option<Stored>>,
    refresh: Mutex<()>,
}

impl SnapshotCache {
    pub fn new(
        clock: Arc<dyn Clock>,
        tz: FixedOffset,
        aggregator: Aggregator,
        sections: Vec<SectionConfig>,
    ) -> Self {
        Self {
            clock,
            tz,
            aggregator,
            sections,
            stored: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Return the snapshot for the current day, rebuilding it first if
    /// none has been produced today.
    pub async fn get_or_refresh(&self) -> Result<Arc<Snapshot>, CacheError> {
        let today = self.today(self.clock.now());

        if let Some(snapshot) = self.fresh(today).await {
            return Ok(snapshot);
        }

        // Serialize refreshes. A caller that blocked here while another
        // refresh ran picks up that refresh's snapshot on the re-check.
        let _guard = self.refresh.lock().await;

        if let Some(snapshot) = self.fresh(today).await {
            return Ok(snapshot);
        }

        let previous = {
            let stored = self.stored.read().await;
            stored
                .as_ref()
                .map(|s| s.snapshot.data.clone())
                .unwrap_or_default()
        };

        info!(day = %today, sections = self.sections.len(), "Building news snapshot");
        let data = self.aggregator.run(&self.sections, &previous).await;

        let snapshot = Arc::new(Snapshot {
            last_updated: self.clock.now(),
            data,
        });

        {
            let mut stored = self.stored.write().await;
            *stored = Some(Stored {
                snapshot: snapshot.clone(),
                day: today,
            });
        }

        info!(day = %today, "Snapshot published");
        Ok(snapshot)
    }

    /// The last published snapshot regardless of staleness. Errors only
    /// when no snapshot has ever been produced.
    pub async fn latest(&self) -> Result<Arc<Snapshot>, CacheError> {
        self.stored
            .read()
            .await
            .as_ref()
            .map(|s| s.snapshot.clone())
            .ok_or(CacheError::Empty)
    }

    async fn fresh(&self, today: NaiveDate) -> Option<Arc<Snapshot>> {
        self.stored
            .read()
            .await
            .as_ref()
            .filter(|s| s.day == today)
            .map(|s| s.snapshot.clone())
    }
}

/// Periodically touches the cache so a new day's snapshot gets built
/// without waiting for the first request. Goes through
/// [`SnapshotCache::get_or_refresh`], so the single-refresh guarantee
/// holds and a tick within the same day does no network work.
pub async fn keep_warm(cache: Arc<SnapshotCache>, interval: Duration) {
    info!("Starting initial snapshot build");
    loop {
        if let Err(e) = cache.get_or_refresh().await {
            error!("Scheduled snapshot refresh failed: {}", e);
        }
        tokio::time::sleep(interval).await;
    }
}
