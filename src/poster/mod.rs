mod download;
mod extract;
#[cfg(test)]
mod test_server;

pub use download::download_poster;
pub use extract::poster_url;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{info, warn};

use crate::upload::Uploader;
use crate::utils;

/// Runs the poster pipeline: download the image, re-upload it to the
/// configured image host, return the hosted URL.
pub struct PosterProcessor {
    client: reqwest::Client,
    uploader: Box<dyn Uploader>,
    temp_dir: Option<PathBuf>,
}

impl PosterProcessor {
    pub fn new(uploader: Box<dyn Uploader>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            uploader,
            temp_dir: None,
        })
    }

    /// Override the directory temporary downloads land in (system default
    /// otherwise).
    pub fn with_temp_dir(mut self, temp_dir: impl AsRef<Path>) -> Self {
        self.temp_dir = Some(temp_dir.as_ref().to_path_buf());
        self
    }

    /// Download `poster_url`, upload it, and return the hosted URL with any
    /// `[img]...[/img]` markup stripped.
    ///
    /// The temporary download is deleted on every exit path; a deletion
    /// failure is logged and never changes the result.
    pub async fn process_url(&self, poster_url: &str) -> Result<String> {
        info!("Processing poster: {}", poster_url);

        let temp_poster = self.create_temp_file(poster_url)?;

        download::download_poster(&self.client, poster_url, temp_poster.path())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to download poster: {e:#}"))?;

        info!("Uploading poster to {}...", self.uploader.name());

        let upload_result = self
            .uploader
            .upload(temp_poster.path())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to upload poster: {e:#}"))?;

        info!("Poster uploaded successfully: {}", upload_result);

        Ok(strip_img_bbcode(&upload_result).to_string())
    }

    /// Extract a poster URL from a metadata API response and process it.
    pub async fn process_response(&self, data: &Value) -> Result<String> {
        let Some(poster_url) = extract::poster_url(data) else {
            anyhow::bail!("No poster URL found in metadata response");
        };

        self.process_url(&poster_url).await
    }

    fn create_temp_file(&self, poster_url: &str) -> Result<TempPoster> {
        let temp_dir = match &self.temp_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create temp directory {}", dir.display()))?;
                dir.clone()
            }
            None => std::env::temp_dir(),
        };

        let suffix = format!(".{}", utils::image_extension(poster_url));
        let file = tempfile::Builder::new()
            .prefix("poster_")
            .suffix(&suffix)
            .tempfile_in(&temp_dir)
            .context("Failed to create temporary poster file")?;

        Ok(TempPoster::new(file.into_temp_path()))
    }
}

/// Owns the temporary download for one pipeline run and deletes it when
/// dropped, whichever way the run ends.
struct TempPoster {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl TempPoster {
    fn new(guard: TempPath) -> Self {
        Self {
            path: guard.to_path_buf(),
            guard: Some(guard),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPoster {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            if let Err(e) = guard.close() {
                warn!(
                    "Failed to delete temporary poster file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

fn strip_img_bbcode(upload_result: &str) -> &str {
    upload_result
        .strip_prefix("[img]")
        .and_then(|rest| rest.strip_suffix("[/img]"))
        .unwrap_or(upload_result)
}
