use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::SectionConfig;
use crate::fetcher::FetchFeed;
use crate::model::SectionData;

/// Fetches every configured section once, strictly sequentially.
///
/// Sections are fetched one at a time with a pause between successive
/// requests; the upstream host throttles bursts, so the sequential
/// order and the delay are part of the contract.
pub struct Aggregator {
    fetcher: Arc<dyn FetchFeed>,
    delay: Duration,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn FetchFeed>, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Run one full fetch pass over `sections`, in configuration order.
    ///
    /// A section whose fetch fails falls back to its entry in
    /// `previous` (empty if none) and never aborts the pass. The
    /// returned mapping always covers every configured section.
    pub async fn run(&self, sections: &[SectionConfig], previous: &SectionData) -> SectionData {
        let mut data = SectionData::new();

        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.delay).await;
            }

            let items = match self.fetcher.fetch(&section.url).await {
                Ok(items) => {
                    info!(section = %section.name, count = items.len(), "Fetched section");
                    items
                }
                Err(e) => {
                    warn!(section = %section.name, error = %e, "Section fetch failed, keeping previous items");
                    previous.get(&section.name).cloned().unwrap_or_default()
                }
            };

            data.insert(section.name.clone(), items);
        }

        data
    }
}
