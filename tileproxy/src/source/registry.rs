//! Registry of upstream map definitions
//!
//! A registry is an ordered list of [`SourceMap`] entries. Lookups scan the
//! list from the last-registered entry back to the first without stopping
//! early, so the entry that ends up selected is the **earliest-registered**
//! match. Configuration order, not specificity, decides between overlapping
//! entries. Matrices inside a map are resolved the same way.

use crate::http::HttpTemplate;

/// Selector value matching any requested version or grid.
pub const WILDCARD: &str = "*";

/// Upstream definition for one zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMatrix {
    pub level: u32,
    pub urls: Vec<HttpTemplate>,
}

impl SourceMatrix {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            urls: Vec::new(),
        }
    }

    pub fn with_url(mut self, template: HttpTemplate) -> Self {
        self.urls.push(template);
        self
    }
}

/// Upstream definition for a (tileset, version, grid) selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMap {
    pub name: String,
    pub version: String,
    pub grid: String,
    pub matrices: Vec<SourceMatrix>,
}

impl SourceMap {
    /// Creates a map; absent version or grid become [`WILDCARD`].
    pub fn new(name: impl Into<String>, version: Option<&str>, grid: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: version.unwrap_or(WILDCARD).to_string(),
            grid: grid.unwrap_or(WILDCARD).to_string(),
            matrices: Vec::new(),
        }
    }

    pub fn with_matrix(mut self, matrix: SourceMatrix) -> Self {
        self.matrices.push(matrix);
        self
    }

    /// True when this entry serves the requested selector.
    ///
    /// A requested version or grid that is absent or `*` is not compared;
    /// an entry field of `*` accepts any requested value.
    pub fn matches(&self, name: &str, version: Option<&str>, grid: Option<&str>) -> bool {
        self.name == name
            && selector_matches(version, &self.version)
            && selector_matches(grid, &self.grid)
    }

    /// Matrix registered for `level`; the earliest registration wins.
    pub fn matrix(&self, level: u32) -> Option<&SourceMatrix> {
        self.matrices
            .iter()
            .rev()
            .fold(None, |selected, entry| {
                if entry.level == level {
                    Some(entry)
                } else {
                    selected
                }
            })
    }
}

fn selector_matches(requested: Option<&str>, configured: &str) -> bool {
    match requested {
        None | Some(WILDCARD) => true,
        Some(value) => configured == WILDCARD || configured == value,
    }
}

/// All map definitions of one configured source.
///
/// Built once by the loader and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    maps: Vec<SourceMap>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a map; registration order is significant for lookups.
    pub fn register(&mut self, map: SourceMap) {
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[SourceMap] {
        &self.maps
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Map serving (name, version, grid); the earliest registration wins.
    pub fn find(&self, name: &str, version: Option<&str>, grid: Option<&str>) -> Option<&SourceMap> {
        self.maps
            .iter()
            .rev()
            .fold(None, |selected, entry| {
                if entry.matches(name, version, grid) {
                    Some(entry)
                } else {
                    selected
                }
            })
    }
}

impl FromIterator<SourceMap> for Registry {
    fn from_iter<I: IntoIterator<Item = SourceMap>>(iter: I) -> Self {
        Self {
            maps: iter.into_iter().collect(),
        }
    }
}
