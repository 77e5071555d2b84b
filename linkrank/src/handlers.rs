use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkrank_core::job::{JobOptions, execute_job};
use linkrank_core::liveness::LivenessCache;
use linkrank_core::report::{ReportFormat, gather_report_data, render_report, write_report};
use linkrank_ingest::{archive, fetch, manifest};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Helper functions for the score handler

/// Expand a user-supplied path, resolving a leading tilde
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    PathBuf::from(expanded.as_ref())
}

/// Load the WAT file list from either a manifest file or a directory
pub fn load_manifest_from_source(
    manifest_file: Option<&PathBuf>,
    dir: Option<&PathBuf>,
) -> Result<Vec<PathBuf>, String> {
    let files = if let Some(manifest_path) = manifest_file {
        manifest::read_manifest(manifest_path)
            .map_err(|e| format!("Failed to read manifest {}: {}", manifest_path.display(), e))?
    } else if let Some(dir_path) = dir {
        manifest::build_manifest(dir_path)
            .map_err(|e| format!("Failed to list {}: {}", dir_path.display(), e))?
    } else {
        return Err("Either --manifest or --dir must be provided".to_string());
    };

    if files.is_empty() {
        return Err("No WAT files found to map".to_string());
    }
    Ok(files)
}

fn report_format(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|s| ReportFormat::from_str(s))
        .unwrap_or(ReportFormat::Text)
}

// Handler functions

pub async fn handle_run(args: &ArgMatches) {
    let bundle_url = args.get_one::<Url>("url").unwrap().clone();
    let work_dir = expand_path(args.get_one::<String>("dir").unwrap());
    let workers = *args.get_one::<usize>("workers").unwrap();
    let probe_timeout = *args.get_one::<u64>("probe-timeout").unwrap();
    let output = args.get_one::<PathBuf>("output").cloned();
    let format = report_format(args);

    let result = run_bundle_job(
        bundle_url,
        work_dir,
        workers,
        probe_timeout,
        output,
        format,
    )
    .await;
    if let Err(e) = result {
        eprintln!("{} {}", "[!]".red().bold(), e);
        std::process::exit(1);
    }
}

pub async fn handle_score(args: &ArgMatches) {
    let manifest_file = args.get_one::<PathBuf>("manifest");
    let dir = args.get_one::<PathBuf>("dir");
    let workers = *args.get_one::<usize>("workers").unwrap();
    let probe_timeout = *args.get_one::<u64>("probe-timeout").unwrap();
    let output = args.get_one::<PathBuf>("output").cloned();
    let format = report_format(args);

    let files = match load_manifest_from_source(manifest_file, dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{} {}", "[!]".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = score_manifest(files, workers, probe_timeout, output, format).await {
        eprintln!("{} {}", "[!]".red().bold(), e);
        std::process::exit(1);
    }
}

pub async fn handle_probe(args: &ArgMatches) {
    let url = args.get_one::<Url>("url").unwrap();
    let probe_timeout = *args.get_one::<u64>("probe-timeout").unwrap();

    let cache = LivenessCache::with_timeout(probe_timeout);
    if cache.is_stale(url.as_str()).await {
        println!("{} {} is stale", "✗".red().bold(), url);
    } else {
        println!("{} {} is active", "✓".green().bold(), url);
    }
}

async fn run_bundle_job(
    bundle_url: Url,
    work_dir: PathBuf,
    workers: usize,
    probe_timeout: u64,
    output: Option<PathBuf>,
    format: ReportFormat,
) -> Result<()> {
    fs::create_dir_all(&work_dir)
        .with_context(|| format!("Failed to create {}", work_dir.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message(format!("Downloading {}", bundle_url));
    let bundle = fetch::download_bundle(bundle_url.as_str(), &work_dir).await?;

    spinner.set_message(format!("Extracting {}", bundle.display()));
    let root = archive::extract(&bundle)?;

    let files = manifest::build_manifest(&root)?;
    manifest::write_manifest(&files, &work_dir.join("files.txt"))?;
    spinner.finish_with_message(format!("{} files ready for mapping", files.len()));

    score_manifest(files, workers, probe_timeout, output, format).await
}

async fn score_manifest(
    files: Vec<PathBuf>,
    workers: usize,
    probe_timeout: u64,
    output: Option<PathBuf>,
    format: ReportFormat,
) -> Result<()> {
    let liveness = Arc::new(LivenessCache::with_timeout(probe_timeout));
    let job_output = execute_job(
        JobOptions {
            manifest: files,
            workers,
            show_progress_bars: true,
        },
        liveness,
    )
    .await?;

    let report = gather_report_data(&job_output);
    let rendered = render_report(&report, &format);
    match output {
        Some(path) => {
            write_report(&rendered, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Report saved to {}", "✓".green().bold(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
