use url::Url;

/// Derives an image file extension from a poster URL path. Falls back to
/// "jpg" when the path has no recognizable extension.
pub fn image_extension(poster_url: &str) -> &'static str {
    let ext = Url::parse(poster_url).ok().and_then(|url| {
        url.path()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    });

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "jpg",
        Some("png") => "png",
        Some("gif") => "gif",
        Some("webp") => "webp",
        Some("avif") => "avif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("https://img.example.com/p/123.jpg"), "jpg");
        assert_eq!(image_extension("https://img.example.com/p/123.JPEG"), "jpg");
        assert_eq!(image_extension("https://img.example.com/p/123.webp"), "webp");
        assert_eq!(
            image_extension("https://img.example.com/p/123.png?size=l"),
            "png"
        );
    }

    #[test]
    fn test_image_extension_fallback() {
        assert_eq!(image_extension("https://img.example.com/p/cover"), "jpg");
        assert_eq!(image_extension("https://img.example.com/p.x/cover"), "jpg");
        assert_eq!(image_extension("https://img.example.com/p/123.bmp"), "jpg");
        assert_eq!(image_extension("not a url"), "jpg");
        assert_eq!(image_extension(""), "jpg");
    }
}
