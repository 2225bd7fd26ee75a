/// Resolve an image path from a question set against the session's asset base.
///
/// Absolute `http(s)` and `data:` URLs pass through untouched; relative paths
/// lose one leading `./` and are appended to `base`.
#[must_use]
pub fn resolve_asset_url(base: &str, path: Option<&str>) -> String {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return String::new();
    };
    if path.starts_with("http") || path.starts_with("data:") {
        return path.to_string();
    }
    let clean = path.strip_prefix("./").unwrap_or(path);
    if base.ends_with('/') {
        format!("{base}{clean}")
    } else {
        format!("{base}/{clean}")
    }
}
