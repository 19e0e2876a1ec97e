use anyhow::Result;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER, USER_AGENT,
};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::info;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-mimicking headers; poster hosts (Douban in particular) reject
/// bare client requests.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,zh-CN;q=0.8,zh-TW;q=0.7,zh;q=0.6"),
    );
    headers.insert(REFERER, HeaderValue::from_static("https://movie.douban.com/"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("image"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("no-cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
    headers
}

/// Download a poster image to `save_path`, streaming the body in chunks.
///
/// Missing parent directories are created. Each failure cause (empty URL,
/// bad status, timeout, request error, write error) yields its own
/// descriptive error; none of them panic.
pub async fn download_poster(
    client: &reqwest::Client,
    poster_url: &str,
    save_path: &Path,
) -> Result<()> {
    if poster_url.is_empty() {
        anyhow::bail!("Poster URL is empty");
    }

    info!("Starting poster download from: {}", poster_url);

    let mut response = client
        .get(poster_url)
        .headers(browser_headers())
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(request_error)?;

    if response.status() != StatusCode::OK {
        anyhow::bail!(
            "Failed to download poster, status code: {}",
            response.status().as_u16()
        );
    }

    if let Some(parent) = save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to save poster file: {}", e))?;
    }

    let mut file = tokio::fs::File::create(save_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save poster file: {}", e))?;

    while let Some(chunk) = response.chunk().await.map_err(request_error)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to save poster file: {}", e))?;
    }

    file.flush()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save poster file: {}", e))?;

    info!("Poster downloaded successfully to: {}", save_path.display());
    Ok(())
}

fn request_error(err: reqwest::Error) -> anyhow::Error {
    if err.is_timeout() {
        anyhow::anyhow!("Poster download timeout (30s)")
    } else {
        anyhow::anyhow!("Poster download request error: {}", err)
    }
}
