use crate::error::Result;
use crate::record::LinkRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Path extensions treated as HTML-like content. A target URL whose final
/// path segment carries any other extension is dropped before it ever
/// reaches graph construction.
const HTML_LIKE_EXTENSIONS: [&str; 4] = ["stm", "htm", "html", "shtml"];

/// Checks whether a target URL qualifies for the link map: an absolute
/// http/https URL whose path extension, if present, is HTML-like.
pub fn is_rankable_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let file = parsed
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, extension)) => HTML_LIKE_EXTENSIONS.contains(&extension),
        None => true,
    }
}

/// Decodes one WAT envelope into a link record.
///
/// The envelope describes a single fetched page. The source URL lives at
/// `Envelope / WARC-Header-Metadata / WARC-Target-URI`; outgoing links at
/// `Envelope / Payload-Metadata / HTTP-Response-Metadata / HTML-Metadata /
/// Links[].url`. A blank source, or a target list that is empty after
/// filtering, yields no record - that is a skip, not an error. Only
/// malformed JSON is an error.
pub fn parse_envelope(json: &str) -> Result<Option<LinkRecord>> {
    let root: Value = serde_json::from_str(json)?;

    let envelope = &root["Envelope"];
    let source_url = envelope["WARC-Header-Metadata"]["WARC-Target-URI"]
        .as_str()
        .map(str::trim)
        .unwrap_or_default();
    if source_url.is_empty() {
        return Ok(None);
    }

    let links = &envelope["Payload-Metadata"]["HTTP-Response-Metadata"]["HTML-Metadata"]["Links"];
    let target_urls: Vec<String> = links
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["url"].as_str())
                .map(str::trim)
                .filter(|url| !url.is_empty() && is_rankable_url(url))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if target_urls.is_empty() {
        return Ok(None);
    }

    debug!(
        "Found {} outgoing URLs for {}",
        target_urls.len(),
        source_url
    );
    Ok(Some(LinkRecord::new(source_url.to_string(), target_urls)))
}

/// Reads one extracted WAT file and decodes its envelope.
pub fn load_record(path: &Path) -> Result<Option<LinkRecord>> {
    let content = fs::read_to_string(path)?;
    parse_envelope(&content)
}
