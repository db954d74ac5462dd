//! Request path rules for AMP URLs

use crate::helpers::strip_root;

/// Whether the last path segment is the AMP marker
pub fn is_amp_path(path: &str, marker: &str) -> bool {
    canonical_path(path, marker).is_some()
}

/// Root-relative path of a request
///
/// Uses the request-local rewrite when the server already computed it,
/// otherwise removes the installation subdirectory from the original path.
pub fn relative_path(original: &str, relative: Option<&str>, root: &str) -> String {
    match relative {
        Some(relative) => relative.to_string(),
        None => strip_root(original, root),
    }
}

/// Strip the trailing marker segment, leaving a path that ends in `/`
///
/// `/welcome/amp` and `/welcome/amp/` both give `/welcome/`. Returns `None`
/// when the last segment is not the marker.
pub fn canonical_path(relative: &str, marker: &str) -> Option<String> {
    let trimmed = relative.strip_suffix('/').unwrap_or(relative);
    let parent = trimmed.strip_suffix(marker)?;
    if marker.is_empty() || !parent.ends_with('/') {
        return None;
    }
    Some(parent.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_path_root_install() {
        assert_eq!(canonical_path("/welcome/amp", "amp").as_deref(), Some("/welcome/"));
        assert_eq!(canonical_path("/welcome/amp/", "amp").as_deref(), Some("/welcome/"));
        assert_eq!(
            canonical_path("/2024/01/15/welcome/amp/", "amp").as_deref(),
            Some("/2024/01/15/welcome/")
        );
    }

    #[test]
    fn test_canonical_path_needs_whole_segment() {
        assert_eq!(canonical_path("/welcome/", "amp"), None);
        assert_eq!(canonical_path("/champ/", "amp"), None);
        assert_eq!(canonical_path("/ampere/", "amp"), None);
        assert_eq!(canonical_path("/amp/welcome/", "amp"), None);
        assert_eq!(canonical_path("amp", "amp"), None);
        assert_eq!(canonical_path("/welcome/amp//", "amp"), None);
    }

    #[test]
    fn test_canonical_path_of_home() {
        assert_eq!(canonical_path("/amp/", "amp").as_deref(), Some("/"));
    }

    #[test]
    fn test_custom_marker() {
        assert_eq!(canonical_path("/welcome/lite", "lite").as_deref(), Some("/welcome/"));
        assert!(!is_amp_path("/welcome/amp", "lite"));
        assert!(!is_amp_path("/welcome/", ""));
    }

    #[test]
    fn test_relative_path_prefers_rewrite() {
        assert_eq!(
            relative_path("/blog/welcome/amp", Some("/welcome/amp"), "/"),
            "/welcome/amp"
        );
        assert_eq!(
            relative_path("/blog/welcome/amp", None, "/blog/"),
            "/welcome/amp"
        );
        assert_eq!(relative_path("/welcome/amp", None, "/"), "/welcome/amp");
    }
}
