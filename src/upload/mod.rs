mod picture_bed;

pub use picture_bed::PictureBedUploader;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Contract with an image-hosting service: takes a local file, returns the
/// hosted URL, possibly wrapped in `[img]...[/img]` BBCode markup.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Human-readable name of the upload service
    fn name(&self) -> &'static str;

    /// Upload the file at `file_path`, returning the hosted URL or markup
    async fn upload(&self, file_path: &Path) -> Result<String>;
}
