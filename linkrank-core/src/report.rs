// Score report generation from a finished job

use crate::job::JobOutput;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub job_id: String,
    pub generated_at: DateTime<Utc>,
    pub files_mapped: usize,
    pub records_mapped: usize,
    pub edges_removed: usize,
    pub groups: Vec<GroupScores>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupScores {
    pub key: String,
    pub scores: Vec<UrlScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlScore {
    pub url: String,
    pub score: f64,
}

/// Collects a finished job into report form, scores sorted descending
/// (ties broken by URL so output is stable).
pub fn gather_report_data(output: &JobOutput) -> ScoreReport {
    let groups = output
        .groups
        .iter()
        .map(|group| {
            let mut scores: Vec<UrlScore> = group
                .ranks
                .iter()
                .map(|(url, &score)| UrlScore {
                    url: url.clone(),
                    score,
                })
                .collect();
            scores.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.url.cmp(&b.url))
            });
            GroupScores {
                key: group.key.clone(),
                scores,
            }
        })
        .collect();

    ScoreReport {
        job_id: output.summary.job_id.clone(),
        generated_at: Utc::now(),
        files_mapped: output.summary.files_mapped,
        records_mapped: output.summary.records_mapped,
        edges_removed: output.summary.edges_removed,
        groups,
    }
}

pub fn render_report(report: &ScoreReport, format: &ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        }
        ReportFormat::Csv => render_csv(report),
    }
}

fn render_text(report: &ScoreReport) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Job: {}\n", report.job_id));
    out.push_str(&format!("  Files mapped: {}\n", report.files_mapped));
    out.push_str(&format!("  Records mapped: {}\n", report.records_mapped));
    out.push_str(&format!("  Edges removed: {}\n", report.edges_removed));

    let total_urls: usize = report.groups.iter().map(|g| g.scores.len()).sum();
    out.push_str(&format!("  URLs ranked: {}\n", total_urls));
    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for group in &report.groups {
        out.push_str(&format!("## {}\n", group.key));
        out.push_str(&format!("  {} URLs ranked\n\n", group.scores.len()));

        // Group by host; BTreeMap keeps host order stable.
        let mut by_host: BTreeMap<String, Vec<&UrlScore>> = BTreeMap::new();
        for entry in &group.scores {
            let host = Url::parse(&entry.url)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.to_string()))
                .unwrap_or_else(|| "unknown".to_string());
            by_host.entry(host).or_default().push(entry);
        }

        for (host, entries) in by_host {
            out.push_str(&format!("### {}\n", host));
            for entry in entries {
                out.push_str(&format!("  {:>10.4} {}\n", entry.score, entry.url));
            }
            out.push('\n');
        }
    }

    out
}

fn render_csv(report: &ScoreReport) -> String {
    let mut out = String::from("key,url,score\n");
    for group in &report.groups {
        for entry in &group.scores {
            out.push_str(&format!("{},{},{}\n", group.key, entry.url, entry.score));
        }
    }
    out
}

pub fn write_report(rendered: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(rendered.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobOutput, JobSummary};
    use crate::rank::RankMap;
    use crate::reduce::GroupOutput;

    fn sample_output() -> JobOutput {
        let mut ranks = RankMap::new();
        ranks.insert("http://a.example/".to_string(), 1.0);
        ranks.insert("http://b.example/page.html".to_string(), 2.0);
        ranks.insert("http://c.example/".to_string(), 1.5);

        JobOutput {
            summary: JobSummary {
                job_id: "test-job".to_string(),
                files_mapped: 3,
                records_mapped: 2,
                groups: 1,
                urls_ranked: 3,
                edges_removed: 1,
                started_at: Utc::now(),
                finished_at: Utc::now(),
            },
            groups: vec![GroupOutput {
                key: "web-graph".to_string(),
                ranks,
                vertices: 3,
                edges_removed: 1,
            }],
        }
    }

    #[test]
    fn test_format_from_str() {
        assert!(matches!(
            ReportFormat::from_str("text"),
            Some(ReportFormat::Text)
        ));
        assert!(matches!(
            ReportFormat::from_str("JSON"),
            Some(ReportFormat::Json)
        ));
        assert!(matches!(
            ReportFormat::from_str("csv"),
            Some(ReportFormat::Csv)
        ));
        assert!(ReportFormat::from_str("html").is_none());
    }

    #[test]
    fn test_scores_sorted_descending() {
        let report = gather_report_data(&sample_output());
        let scores = &report.groups[0].scores;
        assert_eq!(scores[0].url, "http://b.example/page.html");
        assert_eq!(scores[1].url, "http://c.example/");
        assert_eq!(scores[2].url, "http://a.example/");
    }

    #[test]
    fn test_text_report_contains_hosts_and_scores() {
        let report = gather_report_data(&sample_output());
        let text = render_report(&report, &ReportFormat::Text);

        assert!(text.contains("## web-graph"));
        assert!(text.contains("### a.example"));
        assert!(text.contains("### b.example"));
        assert!(text.contains("2.0000 http://b.example/page.html"));
    }

    #[test]
    fn test_csv_report() {
        let report = gather_report_data(&sample_output());
        let csv = render_report(&report, &ReportFormat::Csv);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "key,url,score");
        assert_eq!(lines[1], "web-graph,http://b.example/page.html,2");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_json_report_round_trips() {
        let report = gather_report_data(&sample_output());
        let json = render_report(&report, &ReportFormat::Json);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["job_id"], "test-job");
        assert_eq!(value["groups"][0]["key"], "web-graph");
        assert_eq!(value["groups"][0]["scores"][0]["score"], 2.0);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        write_report("hello", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
