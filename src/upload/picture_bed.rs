use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::Uploader;

/// Client for a token-authenticated picture-bed upload API.
pub struct PictureBedUploader {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl PictureBedUploader {
    pub fn new(api_url: &str, api_token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_token: api_token.to_string(),
        })
    }
}

#[async_trait]
impl Uploader for PictureBedUploader {
    fn name(&self) -> &'static str {
        "picture bed"
    }

    async fn upload(&self, file_path: &Path) -> Result<String> {
        let data = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read poster file {}", file_path.display()))?;

        let filename = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "poster.jpg".to_string());

        debug!(
            "Uploading {} ({} bytes) to {}",
            filename,
            data.len(),
            self.api_url
        );

        let part = reqwest::multipart::Part::bytes(data).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await
            .context("Picture bed request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Picture bed returned HTTP {}: {}",
                status.as_u16(),
                message
            );
        }

        let body = response
            .text()
            .await
            .context("Failed to read picture bed response")?;

        // Some picture beds answer with JSON, others with the raw URL or
        // BBCode markup as the body.
        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(url) = json["url"].as_str().or_else(|| json["data"]["url"].as_str()) {
                return Ok(url.to_string());
            }
        }

        let result = body.trim();
        if result.is_empty() {
            anyhow::bail!("Picture bed returned an empty response");
        }

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploader_name() {
        let uploader = PictureBedUploader::new("https://img.example.com/api/upload", "t").unwrap();
        assert_eq!(uploader.name(), "picture bed");
    }
}
