//! Request templates and resolved requests

use std::time::Duration;

use crate::template::{self, TemplateParams};

/// An upstream request template as loaded from configuration.
///
/// Immutable once loaded. Each fetch derives an [`HttpRequest`] that borrows
/// the headers and carries its own resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTemplate {
    url: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl HttpTemplate {
    /// Creates a template with no extra headers and the client's timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Adds a header sent with every request built from this template.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Overrides the client's request timeout for this upstream.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The unresolved URL template.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the concrete request for one tile.
    pub fn resolve(&self, params: &TemplateParams<'_>) -> HttpRequest<'_> {
        HttpRequest {
            url: template::resolve(&self.url, params),
            headers: &self.headers,
            timeout: self.timeout,
        }
    }
}

/// A concrete upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest<'a> {
    pub url: String,
    pub headers: &'a [(String, String)],
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_headers_and_timeout() {
        let template = HttpTemplate::new("https://up/{TileMatrix}/{TileRow}/{TileCol}.{ext}")
            .with_header("Referer", "https://maps.example.com")
            .with_timeout(Duration::from_secs(5));

        let params = TemplateParams {
            col: 7,
            row: 1,
            matrix: 4,
            matrix_set: "WebMercator",
            tileset: "base",
            extension: "jpg",
        };
        let request = template.resolve(&params);

        assert_eq!(request.url, "https://up/4/1/7.jpg");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[0].0, "Referer");
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
        // Template itself is unchanged
        assert_eq!(template.url(), "https://up/{TileMatrix}/{TileRow}/{TileCol}.{ext}");
    }
}
