//! Loading record sources from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads `url` through `client`, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL '{url}'"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads a record source: `http(s)://` sources are fetched, anything else is
/// treated as a local path.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read '{source}'"))?
    };

    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/students.csv"));
        assert!(is_remote("http://localhost:8080/u.json"));
        assert!(!is_remote("data/https.csv"));
    }

    #[tokio::test]
    async fn test_load_local_source() {
        let path = format!("{}/unistats_test_load_source.csv", env::temp_dir().display());
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let client = BasicClient::new().unwrap();
        let bytes = load_source(&client, &path).await.unwrap();

        assert_eq!(bytes, b"a,b\n1,2\n");
        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_local_source_fails() {
        let client = BasicClient::new().unwrap();
        let result = load_source(&client, "/nonexistent/unistats/students.csv").await;

        assert!(result.is_err());
    }
}
