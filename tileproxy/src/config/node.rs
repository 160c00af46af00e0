//! Declarative configuration tree
//!
//! Source definitions are element trees: each node has a name, string
//! attributes, optional text and ordered children. They are stored as JSON:
//!
//! ```json
//! {
//!   "name": "source",
//!   "attributes": { "name": "basemap", "type": "ogc_api_tiles" },
//!   "children": [
//!     { "name": "map", "attributes": { "name": "base" }, "children": [
//!       { "name": "matrix", "attributes": { "level": "3" }, "children": [
//!         { "name": "http", "children": [
//!           { "name": "url", "text": "https://up/{TileMatrix}/{TileRow}/{TileCol}.png" }
//!         ] }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One element of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value, if set.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Trimmed element text; `None` when missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Parses a tree from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON definition file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let node = ConfigNode::new("source")
            .with_attr("name", "basemap")
            .with_child(ConfigNode::new("map").with_attr("name", "a"))
            .with_child(ConfigNode::new("grid").with_text("  WebMercator \n"))
            .with_child(ConfigNode::new("map").with_attr("name", "b"));

        assert_eq!(node.attr("name"), Some("basemap"));
        assert_eq!(node.attr("type"), None);
        assert_eq!(node.child("grid").and_then(ConfigNode::text), Some("WebMercator"));
        assert_eq!(node.child("map").and_then(|m| m.attr("name")), Some("a"));

        let names: Vec<_> = node
            .children_named("map")
            .filter_map(|m| m.attr("name"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_blank_text_is_none() {
        assert_eq!(ConfigNode::new("url").with_text("   ").text(), None);
        assert_eq!(ConfigNode::new("url").text(), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "source",
            "attributes": { "type": "wmts_proxy" },
            "children": [ { "name": "http", "children": [ { "name": "url", "text": "https://up" } ] } ]
        }"#;
        let node = ConfigNode::from_json(json).unwrap();
        assert_eq!(node.attr("type"), Some("wmts_proxy"));
        let url = node.child("http").and_then(|h| h.child("url")).and_then(ConfigNode::text);
        assert_eq!(url, Some("https://up"));
    }

    #[test]
    fn test_from_json_invalid() {
        let result = ConfigNode::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = ConfigNode::from_file(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_json_serialization_roundtrip_file() {
        let node = ConfigNode::new("source").with_child(ConfigNode::new("map").with_attr("name", "a"));
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("source.json");
        std::fs::write(&path, serde_json::to_string_pretty(&node).unwrap()).unwrap();

        assert_eq!(ConfigNode::from_file(&path).unwrap(), node);
    }
}
