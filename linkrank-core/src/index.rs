use crate::liveness::LivenessCache;
use linkrank_ingest::LinkRecord;
use std::collections::HashMap;
use tracing::debug;

/// Stable identity assignment for the URLs of one reduction group.
///
/// Indices are contiguous from 0 in first-seen order: a record's source
/// URL before its own targets, records in the order they were grouped.
/// Stale URLs are never admitted. The index is discarded with its group.
#[derive(Debug, Default, Clone)]
pub struct VertexIndex {
    by_url: HashMap<String, usize>,
    urls: Vec<String>,
}

impl VertexIndex {
    /// Indexes every distinct live URL in the batch. Given the same
    /// record order and liveness state, the assignment is identical on
    /// every call.
    pub async fn build(records: &[LinkRecord], liveness: &LivenessCache) -> Self {
        let mut index = Self::default();
        for record in records {
            index.admit(&record.source_url, liveness).await;
            for target in &record.target_urls {
                index.admit(target, liveness).await;
            }
        }
        debug!("Indexed {} vertices", index.len());
        index
    }

    async fn admit(&mut self, url: &str, liveness: &LivenessCache) {
        if self.by_url.contains_key(url) {
            return;
        }
        if liveness.is_stale(url).await {
            return;
        }
        let next = self.urls.len();
        self.by_url.insert(url.to_string(), next);
        self.urls.push(url.to_string());
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn index_of(&self, url: &str) -> Option<usize> {
        self.by_url.get(url).copied()
    }

    pub fn url_at(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    /// URLs in index order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}
