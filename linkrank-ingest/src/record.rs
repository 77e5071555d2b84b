use serde::{Deserialize, Serialize};

/// One page's outgoing-link observation: the page URL and every target
/// URL that survived the well-formedness filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source_url: String,
    pub target_urls: Vec<String>,
}

impl LinkRecord {
    pub fn new(source_url: String, target_urls: Vec<String>) -> Self {
        Self {
            source_url,
            target_urls,
        }
    }
}
