use crate::error::{IngestError, Result};
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Derives the local file name for a bundle URL. Only `.zip` bundles
/// qualify; anything else is rejected before any network traffic.
pub fn bundle_file_name(url: &str) -> Result<String> {
    let parsed =
        Url::parse(url).map_err(|e| IngestError::BundleName(format!("{}: {}", url, e)))?;
    let name = parsed
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    if !name.ends_with(".zip") {
        return Err(IngestError::BundleName(format!(
            "expected a .zip bundle, got '{}'",
            name
        )));
    }
    Ok(name)
}

fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent("Linkrank/0.1 (https://github.com/trapdoorsec/linkrank)")
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Downloads a crawl bundle into `dest_dir` and returns the local path.
///
/// An already-present bundle is reused as-is, so re-running a job does not
/// re-download gigabytes of archive.
pub async fn download_bundle(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = bundle_file_name(url)?;
    let dest_path = dest_dir.join(&file_name);

    if dest_path.exists() {
        info!("Bundle {} already present, skipping download", file_name);
        return Ok(dest_path);
    }

    info!("Downloading bundle {}", url);
    let client = build_client()?;
    let response = client.get(url).send().await?.error_for_status()?;

    let mut file = File::create(&dest_path).await?;
    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        total += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!("Wrote {} bytes to {}", total, dest_path.display());
    Ok(dest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_bundle_file_name_zip() {
        let name = bundle_file_name("http://example.com/crawl/records.zip").unwrap();
        assert_eq!(name, "records.zip");
    }

    #[test]
    fn test_bundle_file_name_rejects_non_zip() {
        assert!(bundle_file_name("http://example.com/crawl/records.tar").is_err());
        assert!(bundle_file_name("http://example.com/crawl/").is_err());
    }

    #[test]
    fn test_bundle_file_name_rejects_invalid_url() {
        assert!(bundle_file_name("not a url").is_err());
    }

    #[tokio::test]
    async fn test_download_bundle_writes_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04fake"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/records.zip", mock_server.uri());
        let saved = download_bundle(&url, dir.path()).await.unwrap();

        assert_eq!(saved, dir.path().join("records.zip"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"PK\x03\x04fake");
    }

    #[tokio::test]
    async fn test_download_bundle_skips_existing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("records.zip");
        std::fs::write(&existing, b"already here").unwrap();

        let url = format!("{}/records.zip", mock_server.uri());
        let saved = download_bundle(&url, dir.path()).await.unwrap();

        assert_eq!(std::fs::read(&saved).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn test_download_bundle_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/records.zip", mock_server.uri());
        assert!(download_bundle(&url, dir.path()).await.is_err());
    }
}
