use crate::liveness::LivenessCache;
use crate::reduce::{GroupOutput, reduce};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use linkrank_ingest::{LinkRecord, wat};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Partition key every mapped record lands under. The shuffle and reduce
/// layers stay generic over keys; today the whole crawl shares one graph.
pub const GRAPH_PARTITION_KEY: &str = "web-graph";

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, JobError>;

/// Options for one scoring job run.
pub struct JobOptions {
    /// WAT files to map, one envelope per file.
    pub manifest: Vec<PathBuf>,
    /// Map-phase worker count.
    pub workers: usize,
    pub show_progress_bars: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    pub files_mapped: usize,
    pub records_mapped: usize,
    pub groups: usize,
    pub urls_ranked: usize,
    pub edges_removed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct JobOutput {
    pub summary: JobSummary,
    pub groups: Vec<GroupOutput>,
}

/// Runs the full map -> shuffle -> reduce pipeline over the manifest.
///
/// The map phase fans files across a worker pool; each file decodes to at
/// most one link record. Undecodable files are logged and skipped - one
/// bad envelope does not sink the job. The reduce phase spawns one task
/// per partition key, all sharing the injected liveness cache. A group
/// either completes and emits its ranks, or the failure propagates here;
/// there is no retry discipline.
pub async fn execute_job(options: JobOptions, liveness: Arc<LivenessCache>) -> Result<JobOutput> {
    let JobOptions {
        manifest,
        workers,
        show_progress_bars,
    } = options;

    let job_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let files_mapped = manifest.len();
    info!(
        "Job {}: mapping {} files with {} workers",
        job_id, files_mapped, workers
    );

    let pairs = map_phase(manifest, workers.max(1), show_progress_bars).await?;
    let records_mapped = pairs.len();

    // Shuffle: group by key, preserving arrival order within each group.
    let mut key_order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<LinkRecord>> = HashMap::new();
    for (key, record) in pairs {
        if !grouped.contains_key(&key) {
            key_order.push(key.clone());
        }
        grouped.entry(key).or_default().push(record);
    }

    let spinner = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Reducing {} groups...", key_order.len()));
        Some(pb)
    } else {
        None
    };

    // One task per reduction group; parallelism lives across groups, never
    // inside one.
    let mut group_handles = Vec::new();
    for key in &key_order {
        let key = key.clone();
        let records = grouped.remove(&key).unwrap_or_default();
        let liveness = liveness.clone();
        group_handles.push(tokio::spawn(async move {
            reduce(&key, &records, &liveness).await
        }));
    }

    let mut groups = Vec::new();
    for handle in group_handles {
        let output = handle.await?;
        if let Some(ref pb) = spinner {
            pb.set_message(format!("Reduced group '{}'", output.key));
            pb.tick();
        }
        groups.push(output);
    }

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!("Reduced {} groups", groups.len()));
    }

    let summary = JobSummary {
        job_id,
        files_mapped,
        records_mapped,
        groups: groups.len(),
        urls_ranked: groups.iter().map(|g| g.ranks.len()).sum(),
        edges_removed: groups.iter().map(|g| g.edges_removed).sum(),
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        "Job {} finished: {} records, {} URLs ranked, {} edges removed",
        summary.job_id, summary.records_mapped, summary.urls_ranked, summary.edges_removed
    );

    Ok(JobOutput { summary, groups })
}

/// Decodes every manifest file into `(key, record)` pairs, chunked across
/// workers. Worker results are reassembled in chunk order so the record
/// sequence the shuffle sees matches the manifest order exactly.
async fn map_phase(
    manifest: Vec<PathBuf>,
    workers: usize,
    show_progress_bars: bool,
) -> Result<Vec<(String, LinkRecord)>> {
    let total = manifest.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let progress = if show_progress_bars {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] Mapping {pos}/{len}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let files_per_worker = total.div_ceil(workers);
    let mut worker_handles = Vec::new();

    for worker_id in 0..workers {
        let start = worker_id * files_per_worker;
        if start >= total {
            break;
        }
        let end = std::cmp::min(start + files_per_worker, total);
        let worker_files = manifest[start..end].to_vec();
        let pb = progress.clone();

        let handle = tokio::spawn(async move {
            let mut pairs = Vec::new();
            for path in worker_files {
                match wat::load_record(&path) {
                    Ok(Some(record)) => {
                        debug!("[Worker {}] Mapped {}", worker_id, path.display());
                        pairs.push((GRAPH_PARTITION_KEY.to_string(), record));
                    }
                    Ok(None) => {
                        debug!("[Worker {}] No record in {}", worker_id, path.display());
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                    }
                }
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
            }
            pairs
        });
        worker_handles.push(handle);
    }

    let mut pairs = Vec::new();
    for handle in worker_handles {
        pairs.extend(handle.await?);
    }

    if let Some(ref pb) = progress {
        pb.finish_with_message("Map phase complete");
    }
    Ok(pairs)
}
