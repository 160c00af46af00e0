//! Request dimensions and tile version selection.

/// Dimension carrying the upstream version selector.
pub const TILE_VERSION: &str = "TileVersion";

/// A configured dimension of the tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub default_value: Option<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, default_value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.map(str::to_string),
        }
    }
}

/// A dimension together with the value a request asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedDimension {
    pub dimension: Dimension,
    pub requested_value: Option<String>,
}

impl RequestedDimension {
    pub fn new(dimension: Dimension, requested_value: Option<&str>) -> Self {
        Self {
            dimension,
            requested_value: requested_value.map(str::to_string),
        }
    }
}

fn find<'a>(dimensions: &'a [RequestedDimension], name: &str) -> Option<&'a RequestedDimension> {
    dimensions
        .iter()
        .find(|d| d.dimension.name.eq_ignore_ascii_case(name))
}

/// Value requested for the named dimension (case-insensitive name match).
pub fn requested_value<'a>(dimensions: &'a [RequestedDimension], name: &str) -> Option<&'a str> {
    find(dimensions, name)?.requested_value.as_deref()
}

/// Configured default of the named dimension (case-insensitive name match).
pub fn default_value<'a>(dimensions: &'a [RequestedDimension], name: &str) -> Option<&'a str> {
    find(dimensions, name)?.dimension.default_value.as_deref()
}

/// Resolves the version selector used for the source lookup.
///
/// The requested `TileVersion` is used unless it is missing or one of the
/// aliases `latest` / `default` (any case), in which case the dimension's
/// default applies. The result may still be `None`.
pub fn resolve_version(dimensions: &[RequestedDimension]) -> Option<&str> {
    match requested_value(dimensions, TILE_VERSION) {
        Some(v) if !is_default_alias(v) => Some(v),
        _ => default_value(dimensions, TILE_VERSION),
    }
}

fn is_default_alias(value: &str) -> bool {
    value.eq_ignore_ascii_case("latest") || value.eq_ignore_ascii_case("default")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_dims(requested: Option<&str>, default: Option<&str>) -> Vec<RequestedDimension> {
        vec![
            RequestedDimension::new(Dimension::new("TIME", Some("2024")), Some("2023")),
            RequestedDimension::new(Dimension::new(TILE_VERSION, default), requested),
        ]
    }

    #[test]
    fn test_empty_set_has_no_values() {
        assert_eq!(requested_value(&[], TILE_VERSION), None);
        assert_eq!(default_value(&[], TILE_VERSION), None);
        assert_eq!(resolve_version(&[]), None);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let dims = version_dims(Some("v3"), Some("v1"));
        assert_eq!(requested_value(&dims, "tileversion"), Some("v3"));
        assert_eq!(default_value(&dims, "TILEVERSION"), Some("v1"));
        assert_eq!(requested_value(&dims, "time"), Some("2023"));
    }

    #[test]
    fn test_absent_name() {
        let dims = version_dims(Some("v3"), Some("v1"));
        assert_eq!(requested_value(&dims, "elevation"), None);
    }

    #[test]
    fn test_latest_uses_default() {
        for alias in ["latest", "LATEST", "Latest", "default", "Default"] {
            let dims = version_dims(Some(alias), Some("v1"));
            assert_eq!(resolve_version(&dims), Some("v1"), "alias {}", alias);
        }
    }

    #[test]
    fn test_missing_request_uses_default() {
        let dims = version_dims(None, Some("v1"));
        assert_eq!(resolve_version(&dims), Some("v1"));
    }

    #[test]
    fn test_explicit_version_passes_through_without_default() {
        let dims = version_dims(Some("v2"), None);
        assert_eq!(resolve_version(&dims), Some("v2"));
    }

    #[test]
    fn test_latest_without_default_is_none() {
        let dims = version_dims(Some("latest"), None);
        assert_eq!(resolve_version(&dims), None);
    }
}
