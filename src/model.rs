use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single normalized news item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Hostname of `link` with any leading "www." stripped, or the
    /// default source label when the link is missing or unparseable.
    pub source: String,
}

/// Mapping from section name to its items, complete for every
/// configured section.
pub type SectionData = BTreeMap<String, Vec<FeedItem>>;

/// The full aggregate of all sections for one day. Published as a
/// whole and never mutated afterwards; a refresh replaces it with a
/// new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_updated: DateTime<Utc>,
    pub data: SectionData,
}
