//! Media type helpers.

/// The bare media type: parameters dropped, trimmed, ASCII-lowercased.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns true if a payload with this content type can be embedded as a JSON value.
///
/// An absent content type implies JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let media = media_type(content_type);
    media == "application/json" || media == "text/json" || media.ends_with("+json")
}
