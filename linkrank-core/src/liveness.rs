use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Reachability check for a single URL. Implementations answer within a
/// bounded attempt; transport, redirects and protocol details are theirs.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns true when the URL answered within the bounded attempt.
    async fn probe(&self, url: &str) -> bool;
}

/// Production prober: one HEAD request through a shared client. Any
/// response, whatever its status, proves the endpoint reachable; any
/// transport failure (malformed URL, DNS, refused, timeout) does not.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Linkrank/0.1 (https://github.com/trapdoorsec/linkrank)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                debug!("Probe {} -> {}", url, response.status());
                true
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                false
            }
        }
    }
}

#[derive(Default)]
struct Classified {
    stale: HashSet<String>,
    active: HashSet<String>,
}

/// Process-lifetime memo of URL liveness, shared by every reduction
/// group. Both probe outcomes are cached: a URL classified once stays
/// classified for the rest of the process.
pub struct LivenessCache {
    prober: Arc<dyn Prober>,
    classified: Mutex<Classified>,
}

impl LivenessCache {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            classified: Mutex::new(Classified::default()),
        }
    }

    /// Cache backed by the production HTTP prober.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self::new(Arc::new(HttpProber::with_timeout(timeout_secs)))
    }

    /// Returns true when the URL is unreachable. Never fails; every
    /// failure mode collapses to "stale".
    pub async fn is_stale(&self, url: &str) -> bool {
        {
            let classified = self.classified.lock().await;
            if classified.stale.contains(url) {
                return true;
            }
            if classified.active.contains(url) {
                return false;
            }
        }

        // Probe without holding the lock so a slow endpoint does not
        // serialize every group. Concurrent groups may race on the same
        // URL; last writer wins.
        let reachable = self.prober.probe(url).await;

        let mut classified = self.classified.lock().await;
        if reachable {
            classified.active.insert(url.to_string());
        } else {
            classified.stale.insert(url.to_string());
        }
        !reachable
    }
}
