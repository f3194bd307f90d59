//! Download engine
//!
//! Walks the resolved lesson URLs sequentially: interprets each lesson page,
//! follows its binary download anchor and streams the body to disk under the
//! remote-supplied filename. Destination files are created exclusively; an
//! existing file is resolved by size comparison, never overwritten.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Response;
use tokio::io::AsyncWriteExt;

use crate::core::error::{Error, Result};
use crate::core::pages;
use crate::core::session::Session;

/// Progress callback, called with (bytes downloaded, total bytes)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Options for download operations
#[derive(Default)]
pub struct DownloadOptions {
    /// Optional progress sink fed alongside the file write
    pub progress: Option<ProgressCallback>,
}

/// Terminal state of one lesson download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Streamed to disk in full
    Completed { path: PathBuf, bytes: u64 },
    /// Destination already present with the expected size; nothing written
    AlreadyComplete { path: PathBuf },
    /// Destination present but its size disagrees with the remote; left
    /// untouched
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Downloads resolved lesson URLs into the output directory, one at a time.
pub struct DownloadEngine {
    session: Session,
    out_dir: PathBuf,
}

impl DownloadEngine {
    pub fn new<P: Into<PathBuf>>(session: Session, out_dir: P) -> Self {
        Self {
            session,
            out_dir: out_dir.into(),
        }
    }

    /// Download every URL in order. A failing lesson is logged and skipped;
    /// a local filesystem failure aborts the batch.
    pub async fn download_all(&self, urls: &[String], options: &DownloadOptions) -> Result<()> {
        for url in urls {
            info!("{url}");
            match self.download_lesson(url, options).await {
                Ok(DownloadOutcome::Completed { path, bytes }) => {
                    info!("saved {} ({} bytes)", path.display(), bytes);
                }
                Ok(DownloadOutcome::AlreadyComplete { path }) => {
                    info!("{} already exists (and is the same size)", path.display());
                }
                Ok(DownloadOutcome::SizeMismatch {
                    path,
                    expected,
                    actual,
                }) => {
                    warn!(
                        "{} exists with {} bytes, remote has {}; leaving it alone",
                        path.display(),
                        actual,
                        expected
                    );
                }
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => warn!("skipping {url}: {e}"),
            }
        }
        Ok(())
    }

    /// Download a single lesson page's binary to disk.
    pub async fn download_lesson(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> Result<DownloadOutcome> {
        let html = self.session.get_page(url).await?;
        let page = pages::lesson_page(&html, self.session.base());
        let download_url = page
            .download_url
            .ok_or_else(|| Error::MissingDownloadLink(url.to_string()))?;

        let response = self.session.get_raw(&download_url).await?;
        let filename = disposition_filename(&response)
            .ok_or_else(|| Error::HeaderMissing("Content-Disposition".to_string()))?;

        // A series lesson goes into a subdirectory named after the series
        // slug; a standalone lesson sits in the output directory itself.
        let dir = match &page.series {
            Some(series) => self.out_dir.join(&series.id),
            None => self.out_dir.clone(),
        };
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(&filename);
        let expected = response.content_length().unwrap_or(0);

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let actual = std::fs::metadata(&path)?.len();
                if actual == expected {
                    return Ok(DownloadOutcome::AlreadyComplete { path });
                }
                return Ok(DownloadOutcome::SizeMismatch {
                    path,
                    expected,
                    actual,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = stream_to_file(file, response, options.progress.as_ref()).await?;
        Ok(DownloadOutcome::Completed { path, bytes })
    }
}

/// Stream the response body to the file, feeding the progress sink after
/// each chunk. Interruptions mid-stream are per-lesson failures; the partial
/// file stays behind and is caught by the size comparison next run.
async fn stream_to_file(
    file: std::fs::File,
    response: Response,
    progress: Option<&ProgressCallback>,
) -> Result<u64> {
    let total = response.content_length().unwrap_or(0);
    let mut file = tokio::fs::File::from_std(file);
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream
        .try_next()
        .await
        .map_err(|e| Error::DownloadFailed(e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::DownloadFailed(e.to_string()))?;
        downloaded += chunk.len() as u64;
        if let Some(progress) = progress {
            progress(downloaded, total);
        }
    }

    file.flush()
        .await
        .map_err(|e| Error::DownloadFailed(e.to_string()))?;
    Ok(downloaded)
}

fn disposition_filename(response: &Response) -> Option<String> {
    let header = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    parse_disposition_filename(header)
}

/// Pull the `filename` parameter out of a Content-Disposition header value.
fn parse_disposition_filename(header: &str) -> Option<String> {
    for part in header.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("filename") {
            continue;
        }
        let value = value.trim().trim_matches('"');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
