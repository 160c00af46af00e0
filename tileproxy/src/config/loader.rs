//! Source definition loading
//!
//! Turns a `source` [`ConfigNode`] into a tile source:
//!
//! ```text
//! source (name, type)
//! ├── grid            optional, overrides the grid of every map (blank too)
//! └── map (name, version?, grid?)        ogc_api_tiles
//!     └── matrix (level)
//!         └── http                       one or more
//!             ├── url                    template text
//!             ├── headers/<Name>         optional
//!             └── timeout                optional, seconds
//! ```
//!
//! A `wmts_proxy` source has a single `http` child instead of maps.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{ConfigError, ConfigNode, ProxySettings};
use crate::http::{HttpClient, HttpTemplate};
use crate::source::{
    OgcApiTilesSource, Registry, SourceMap, SourceMatrix, TileSource, WmtsProxySource,
};

/// Source type names accepted in the `type` attribute.
pub use crate::source::{OGC_API_TILES, WMTS_PROXY};

/// Parses an `http` element into a request template.
pub fn parse_http(node: &ConfigNode) -> Result<HttpTemplate, String> {
    let url = node
        .child("url")
        .and_then(ConfigNode::text)
        .ok_or_else(|| "missing <url>".to_string())?;

    let mut template = HttpTemplate::new(url);

    if let Some(headers) = node.child("headers") {
        for header in &headers.children {
            let value = header
                .text()
                .ok_or_else(|| format!("header {} has no value", header.name))?;
            template = template.with_header(header.name.clone(), value);
        }
    }

    if let Some(timeout) = node.child("timeout") {
        let raw = timeout.text().unwrap_or_default();
        let secs: u64 = raw
            .parse()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| format!("invalid timeout '{}'", raw))?;
        template = template.with_timeout(Duration::from_secs(secs));
    }

    Ok(template)
}

/// Parses the map definitions of an `ogc_api_tiles` source.
///
/// Maps and matrices keep document order, which decides lookup precedence.
pub fn parse_registry(source_name: &str, node: &ConfigNode) -> Result<Registry, ConfigError> {
    // A present <grid> wins even when blank.
    let grid_override = node.child("grid").map(|grid| grid.text().unwrap_or_default());
    let mut registry = Registry::new();

    for map_node in node.children_named("map") {
        let name = map_node
            .attr("name")
            .ok_or_else(|| ConfigError::MissingMapName {
                source_name: source_name.to_string(),
            })?;
        let grid = grid_override.or_else(|| map_node.attr("grid"));
        let mut map = SourceMap::new(name, map_node.attr("version"), grid);

        info!(
            source = source_name,
            map = %map.name,
            version = %map.version,
            grid = %map.grid,
            "creating map"
        );

        for matrix_node in map_node.children_named("matrix") {
            let matrix = parse_matrix(source_name, &map.name, matrix_node)?;
            map.matrices.push(matrix);
        }

        registry.register(map);
    }

    Ok(registry)
}

fn parse_matrix(
    source_name: &str,
    map_name: &str,
    node: &ConfigNode,
) -> Result<SourceMatrix, ConfigError> {
    let raw_level = node.attr("level").unwrap_or_default();
    let level: u32 = raw_level.trim().parse().map_err(|_| ConfigError::InvalidLevel {
        source_name: source_name.to_string(),
        map: map_name.to_string(),
        value: raw_level.to_string(),
    })?;

    let mut matrix = SourceMatrix::new(level);
    debug!(source = source_name, map = map_name, level, "adding matrix");

    for http_node in node.children_named("http") {
        let template = parse_http(http_node).map_err(|reason| ConfigError::Http {
            context: format!("{} map {} matrix {}", source_name, map_name, level),
            reason,
        })?;
        debug!(map = map_name, level, url = template.url(), "adding http");
        matrix.urls.push(template);
    }

    if matrix.urls.is_empty() {
        return Err(ConfigError::EmptyMatrix {
            source_name: source_name.to_string(),
            map: map_name.to_string(),
            level,
        });
    }

    Ok(matrix)
}

/// Post-load check: a source must define at least one map.
pub fn check_registry(source_name: &str, registry: &Registry) -> Result<(), ConfigError> {
    if registry.is_empty() {
        return Err(ConfigError::NoMaps {
            source_name: source_name.to_string(),
        });
    }
    Ok(())
}

/// Parses and checks the registry of an `ogc_api_tiles` source.
pub fn load_registry(source_name: &str, node: &ConfigNode) -> Result<Registry, ConfigError> {
    let registry = parse_registry(source_name, node)?;
    check_registry(source_name, &registry)?;
    Ok(registry)
}

/// Builds a tile source from a `source` element, dispatching on its `type`.
pub fn load_source(
    node: &ConfigNode,
    http_client: Arc<dyn HttpClient>,
    settings: &ProxySettings,
) -> Result<Box<dyn TileSource>, ConfigError> {
    let name = node.attr("name").ok_or(ConfigError::MissingSourceName)?;
    let kind = node.attr("type").unwrap_or_default();

    let source: Box<dyn TileSource> = match kind {
        OGC_API_TILES => {
            let registry = load_registry(name, node)?;
            info!(source = name, maps = registry.len(), "loaded ogc_api_tiles source");
            Box::new(
                OgcApiTilesSource::new(name, registry, http_client)
                    .with_buffer_capacity(settings.buffer_capacity),
            )
        }
        WMTS_PROXY => {
            let http_node = node.child("http").ok_or_else(|| ConfigError::MissingHttp {
                source_name: name.to_string(),
            })?;
            let template = parse_http(http_node).map_err(|reason| ConfigError::Http {
                context: name.to_string(),
                reason,
            })?;
            info!(source = name, url = template.url(), "loaded wmts_proxy source");
            Box::new(
                WmtsProxySource::new(name, template, http_client)
                    .with_buffer_capacity(settings.buffer_capacity),
            )
        }
        other => {
            return Err(ConfigError::UnknownSourceType {
                source_name: name.to_string(),
                kind: other.to_string(),
            })
        }
    };

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockHttpClient, WriteMode};

    fn http(url: &str) -> ConfigNode {
        ConfigNode::new("http").with_child(ConfigNode::new("url").with_text(url))
    }

    fn matrix(level: &str, urls: &[&str]) -> ConfigNode {
        urls.iter().fold(
            ConfigNode::new("matrix").with_attr("level", level),
            |node, url| node.with_child(http(url)),
        )
    }

    fn map(name: &str) -> ConfigNode {
        ConfigNode::new("map").with_attr("name", name)
    }

    fn source(kind: &str) -> ConfigNode {
        ConfigNode::new("source")
            .with_attr("name", "upstream")
            .with_attr("type", kind)
    }

    #[test]
    fn test_parse_http_full() {
        let node = http("https://up/{TileCol}")
            .with_child(
                ConfigNode::new("headers")
                    .with_child(ConfigNode::new("Referer").with_text("https://example.com"))
                    .with_child(ConfigNode::new("X-Api-Key").with_text("secret")),
            )
            .with_child(ConfigNode::new("timeout").with_text("15"));

        let template = parse_http(&node).unwrap();
        assert_eq!(template.url(), "https://up/{TileCol}");
        assert_eq!(template.headers().len(), 2);
        assert_eq!(template.headers()[1], ("X-Api-Key".to_string(), "secret".to_string()));
        assert_eq!(template.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_parse_http_missing_url() {
        assert_eq!(parse_http(&ConfigNode::new("http")), Err("missing <url>".to_string()));
    }

    #[test]
    fn test_parse_http_bad_timeout() {
        let node = http("https://up").with_child(ConfigNode::new("timeout").with_text("0"));
        assert!(parse_http(&node).unwrap_err().contains("invalid timeout"));
    }

    #[test]
    fn test_defaults_and_order() {
        let node = ConfigNode::new("source")
            .with_child(
                map("base")
                    .with_attr("version", "v1")
                    .with_child(matrix("0", &["https://a/0"]))
                    .with_child(matrix("1", &["https://a/1", "https://b/1"])),
            )
            .with_child(map("roads").with_attr("grid", "WebMercator").with_child(matrix("2", &["https://r/2"])));

        let registry = load_registry("upstream", &node).unwrap();
        assert_eq!(registry.len(), 2);

        let base = &registry.maps()[0];
        assert_eq!((base.version.as_str(), base.grid.as_str()), ("v1", "*"));
        assert_eq!(base.matrices.len(), 2);
        let urls: Vec<_> = base.matrices[1].urls.iter().map(|u| u.url()).collect();
        assert_eq!(urls, vec!["https://a/1", "https://b/1"]);

        let roads = &registry.maps()[1];
        assert_eq!((roads.version.as_str(), roads.grid.as_str()), ("*", "WebMercator"));
    }

    #[test]
    fn test_source_grid_overrides_all_maps() {
        let node = ConfigNode::new("source")
            .with_child(ConfigNode::new("grid").with_text("GoogleMapsCompatible"))
            .with_child(map("a").with_attr("grid", "WebMercator").with_child(matrix("0", &["u"])))
            .with_child(map("b").with_child(matrix("0", &["u"])));

        let registry = load_registry("upstream", &node).unwrap();
        assert!(registry.maps().iter().all(|m| m.grid == "GoogleMapsCompatible"));
    }

    #[test]
    fn test_blank_source_grid_still_overrides() {
        let node = ConfigNode::new("source")
            .with_child(ConfigNode::new("grid"))
            .with_child(map("a").with_attr("grid", "WebMercator").with_child(matrix("0", &["u"])));

        let registry = load_registry("upstream", &node).unwrap();
        assert_eq!(registry.maps()[0].grid, "");
        assert!(registry.find("a", None, Some("WebMercator")).is_none());
        assert!(registry.find("a", None, None).is_some());
    }

    #[test]
    fn test_missing_map_name() {
        let node = ConfigNode::new("source").with_child(ConfigNode::new("map"));
        assert_eq!(
            load_registry("upstream", &node),
            Err(ConfigError::MissingMapName {
                source_name: "upstream".to_string()
            })
        );
    }

    #[test]
    fn test_missing_or_invalid_level() {
        let no_level = ConfigNode::new("source")
            .with_child(map("base").with_child(ConfigNode::new("matrix").with_child(http("u"))));
        assert!(matches!(
            load_registry("upstream", &no_level),
            Err(ConfigError::InvalidLevel { .. })
        ));

        let bad_level =
            ConfigNode::new("source").with_child(map("base").with_child(matrix("-1", &["u"])));
        assert!(matches!(
            load_registry("upstream", &bad_level),
            Err(ConfigError::InvalidLevel { ref value, .. }) if value == "-1"
        ));
    }

    #[test]
    fn test_matrix_without_http() {
        let node = ConfigNode::new("source").with_child(map("base").with_child(matrix("4", &[])));
        assert!(matches!(
            load_registry("upstream", &node),
            Err(ConfigError::EmptyMatrix { level: 4, .. })
        ));
    }

    #[test]
    fn test_bad_http_aborts_load() {
        let node = ConfigNode::new("source").with_child(
            map("base").with_child(
                matrix("3", &["https://ok"]).with_child(ConfigNode::new("http")),
            ),
        );
        let err = load_registry("upstream", &node).unwrap_err();
        assert!(matches!(err, ConfigError::Http { .. }));
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains("matrix 3"));
    }

    #[test]
    fn test_zero_maps_fails_check() {
        let err = load_registry("upstream", &ConfigNode::new("source")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NoMaps {
                source_name: "upstream".to_string()
            }
        );
        assert_eq!(err.to_string(), "upstream: missing map definitions");
    }

    #[test]
    fn test_load_ogc_api_tiles_source() {
        let node = source(OGC_API_TILES).with_child(map("base").with_child(matrix("0", &["u"])));
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new(WriteMode::Append));

        let source = load_source(&node, client, &ProxySettings::default()).unwrap();
        assert_eq!(source.name(), "upstream");
        assert_eq!(source.kind(), OGC_API_TILES);
    }

    #[test]
    fn test_load_wmts_proxy_source() {
        let node = source(WMTS_PROXY).with_child(http("https://wmts/{TileMatrix}"));
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new(WriteMode::Append));

        let source = load_source(&node, client, &ProxySettings::default()).unwrap();
        assert_eq!(source.kind(), WMTS_PROXY);
    }

    #[test]
    fn test_wmts_proxy_without_http() {
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new(WriteMode::Append));
        let err = load_source(&source(WMTS_PROXY), client, &ProxySettings::default())
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "wmts source upstream has no <http> request configured"
        );
    }

    #[test]
    fn test_unknown_source_type() {
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new(WriteMode::Append));
        let err = load_source(&source("wms"), client, &ProxySettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownSourceType { ref kind, .. } if kind == "wms"));
    }

    #[test]
    fn test_missing_source_name() {
        let client: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new(WriteMode::Append));
        let node = ConfigNode::new("source").with_attr("type", OGC_API_TILES);
        let err = load_source(&node, client, &ProxySettings::default())
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::MissingSourceName);
    }
}
