//! Stored image paths → public URLs
//!
//! Image columns hold whatever the upload pipeline of the day wrote: bare
//! keys (`venues/abc.jpg`), framework storage paths
//! (`storage/app/public/venues/abc.jpg`), Windows separators, absolute URLs
//! to a CDN, or JSON arrays encoded one time too many. These helpers turn all
//! of them into either a clean storage key or a public URL.

use serde_json::Value;

const LEGACY_PREFIXES: [&str; 4] = ["storage/app/public/", "app/public/", "public/", "storage/"];

/// Clean a stored image path into a key relative to the media root.
///
/// Returns `None` for empty placeholders, absolute URLs (they have no local
/// key) and anything trying to escape the media root.
pub fn storage_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) || is_absolute_url(trimmed) {
        return None;
    }

    let mut path = trimmed.replace('\\', "/");
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest.to_string();
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest.to_string();
        } else {
            break;
        }
    }
    for prefix in LEGACY_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            path = rest.to_string();
        }
    }

    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(path)
}

/// Turn a stored image path into a public URL under `media_base_url`
pub fn normalize_image_path(raw: &str, media_base_url: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }

    let key = storage_key(trimmed)?;
    Some(format!("{}/{}", media_base_url.trim_end_matches('/'), key))
}

/// Parse a gallery column into raw paths, keeping order and dropping duplicates
pub fn parse_gallery(value: &Value) -> Vec<String> {
    parse_string_list(value)
}

/// Parse a gallery column straight into public URLs
pub fn gallery_urls(value: &Value, media_base_url: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for raw in parse_gallery(value) {
        if let Some(url) = normalize_image_path(&raw, media_base_url)
            && !urls.contains(&url)
        {
            urls.push(url);
        }
    }
    urls
}

/// Tolerant list parsing shared by galleries, facilities and treatments.
///
/// Accepts a JSON array, a string holding a JSON array, a comma separated
/// string or a single value.
pub fn parse_string_list(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_strings(value, &mut out, true);
    out
}

fn collect_strings(value: &Value, out: &mut Vec<String>, allow_nested: bool) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out, false);
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if is_placeholder(trimmed) {
                return;
            }
            if allow_nested
                && trimmed.starts_with('[')
                && let Ok(decoded @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed)
            {
                collect_strings(&decoded, out, false);
                return;
            }
            for part in trimmed.split(',') {
                push_unique(out, part.trim());
            }
        }
        Value::Number(n) => push_unique(out, &n.to_string()),
        _ => {}
    }
}

fn push_unique(out: &mut Vec<String>, item: &str) {
    if !item.is_empty() && !is_placeholder(item) && !out.iter().any(|s| s == item) {
        out.push(item.to_string());
    }
}

fn is_placeholder(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("null") || s == "[]"
}

fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://cdn.example.com/media/";

    #[test]
    fn test_placeholders_yield_nothing() {
        assert_eq!(normalize_image_path("", BASE), None);
        assert_eq!(normalize_image_path("  null ", BASE), None);
        assert_eq!(normalize_image_path("[]", BASE), None);
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        assert_eq!(
            normalize_image_path("https://img.example.org/a.jpg", BASE).as_deref(),
            Some("https://img.example.org/a.jpg")
        );
        assert_eq!(
            normalize_image_path("//img.example.org/a.jpg", BASE).as_deref(),
            Some("https://img.example.org/a.jpg")
        );
        assert_eq!(storage_key("https://img.example.org/a.jpg"), None);
    }

    #[test]
    fn test_legacy_prefixes_are_stripped() {
        for raw in [
            "venues/a.jpg",
            "/venues/a.jpg",
            "./venues/a.jpg",
            "storage/venues/a.jpg",
            "/storage/app/public/venues/a.jpg",
            "public/venues/a.jpg",
            "storage\\app\\public\\venues\\a.jpg",
        ] {
            assert_eq!(
                normalize_image_path(raw, BASE).as_deref(),
                Some("https://cdn.example.com/media/venues/a.jpg"),
                "raw = {raw}"
            );
        }
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert_eq!(storage_key("../etc/passwd"), None);
        assert_eq!(storage_key("venues/../../secret"), None);
        assert_eq!(normalize_image_path("storage/../x.jpg", BASE), None);
        // dots inside a file name are fine
        assert_eq!(storage_key("venues/a..b.jpg").as_deref(), Some("venues/a..b.jpg"));
    }

    #[test]
    fn test_parse_gallery_shapes() {
        assert_eq!(
            parse_gallery(&json!(["a.jpg", "b.jpg", "a.jpg", ""])),
            vec!["a.jpg", "b.jpg"]
        );
        assert_eq!(
            parse_gallery(&json!("[\"a.jpg\",\"b.jpg\"]")),
            vec!["a.jpg", "b.jpg"]
        );
        assert_eq!(parse_gallery(&json!("a.jpg, b.jpg")), vec!["a.jpg", "b.jpg"]);
        assert_eq!(parse_gallery(&json!("a.jpg")), vec!["a.jpg"]);
        assert!(parse_gallery(&json!(null)).is_empty());
        assert!(parse_gallery(&json!("[]")).is_empty());
    }

    #[test]
    fn test_gallery_urls_dedupes_after_normalizing() {
        let urls = gallery_urls(
            &json!(["gallery/a.jpg", "/storage/gallery/a.jpg", "https://x.org/b.jpg"]),
            "http://localhost:8080/media",
        );
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/media/gallery/a.jpg",
                "https://x.org/b.jpg"
            ]
        );
    }

    #[test]
    fn test_parse_string_list_for_facilities() {
        assert_eq!(
            parse_string_list(&json!("showers, parking ,wifi")),
            vec!["showers", "parking", "wifi"]
        );
        assert_eq!(
            parse_string_list(&json!(["sauna", "Sauna", "sauna"])),
            vec!["sauna", "Sauna"]
        );
    }
}
