use serde_json::Value;
use tracing::{debug, info};

/// Fields the metadata API may carry the poster under, in priority order.
const POSTER_FIELDS: [&str; 5] = ["poster", "img", "image", "cover", "posterUrl"];

/// Extract a poster URL from a metadata API response.
///
/// Checks the candidate fields at the top level first, then one level down
/// under `data`. Absence is a normal outcome, not an error.
pub fn poster_url(data: &Value) -> Option<String> {
    if let Some((field, url)) = first_match(data) {
        info!("Found poster URL in field \"{}\": {}", field, url);
        return Some(url);
    }

    if let Some(nested) = data.get("data") {
        if let Some((field, url)) = first_match(nested) {
            info!("Found poster URL in nested field \"data.{}\": {}", field, url);
            return Some(url);
        }
    }

    debug!("No poster URL found in metadata response");
    None
}

fn first_match(data: &Value) -> Option<(&'static str, String)> {
    POSTER_FIELDS.iter().find_map(|&field| {
        data.get(field)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| (field, url.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_field() {
        let data = json!({"image": "http://a/b.jpg"});
        assert_eq!(poster_url(&data), Some("http://a/b.jpg".to_string()));
    }

    #[test]
    fn test_field_priority_order() {
        let data = json!({
            "cover": "http://a/cover.jpg",
            "img": "http://a/img.jpg",
        });
        assert_eq!(poster_url(&data), Some("http://a/img.jpg".to_string()));
    }

    #[test]
    fn test_top_level_wins_over_nested() {
        let data = json!({
            "posterUrl": "http://a/top.jpg",
            "data": {"poster": "http://a/nested.jpg"},
        });
        assert_eq!(poster_url(&data), Some("http://a/top.jpg".to_string()));
    }

    #[test]
    fn test_nested_fallback() {
        let data = json!({"data": {"cover": "http://a/b.jpg"}});
        assert_eq!(poster_url(&data), Some("http://a/b.jpg".to_string()));
    }

    #[test]
    fn test_empty_and_non_string_values_skipped() {
        let data = json!({
            "poster": "",
            "img": 42,
            "data": {"image": "http://a/b.png"},
        });
        assert_eq!(poster_url(&data), Some("http://a/b.png".to_string()));
    }

    #[test]
    fn test_no_match_anywhere() {
        let data = json!({"title": "A Movie", "data": {"year": 1999}});
        assert_eq!(poster_url(&data), None);
    }

    #[test]
    fn test_non_object_response() {
        assert_eq!(poster_url(&json!(null)), None);
        assert_eq!(poster_url(&json!(["http://a/b.jpg"])), None);
    }
}
