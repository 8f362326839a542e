//! Optional upload of produced reports and exports to S3.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::{debug, info};

/// Uploads each file to `s3://<bucket>/<prefix>/<file name>`.
///
/// With `gzip` set, bodies are gzip-compressed and keys gain a `.gz` suffix.
/// Returns the number of uploaded objects.
#[tracing::instrument(skip(client, files), fields(files = files.len()))]
pub async fn upload_files(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
    files: &[PathBuf],
    gzip: bool,
) -> Result<usize> {
    let mut upload_count = 0;

    for path in files {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;

        let (body, key) = prepare_upload(path, prefix, contents, gzip)?;
        let content_type = if gzip {
            "application/gzip"
        } else {
            content_type_for(path)
        };

        client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("S3 upload failed for '{key}'"))?;

        debug!(key = %key, "Uploaded");
        upload_count += 1;
    }

    info!(upload_count, "S3 upload complete");
    Ok(upload_count)
}

/// Builds the object body and key for `path`.
fn prepare_upload(path: &Path, prefix: &str, contents: Vec<u8>, gzip: bool) -> Result<(Vec<u8>, String)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("'{}' has no usable file name", path.display()))?;
    let prefix = prefix.trim_matches('/');
    let key = if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    };

    if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&contents)?;
        Ok((encoder.finish()?, format!("{key}.gz")))
    } else {
        Ok((contents, key))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
