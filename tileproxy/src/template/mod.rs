//! URL template substitution
//!
//! Upstream endpoints are configured as URL templates carrying OGC-style
//! placeholders, for example
//! `https://tiles.example.com/{TileSetName}/{TileMatrixSet}/{TileMatrix}/{TileRow}/{TileCol}.{ext}`.
//!
//! # Placeholders
//!
//! | Token | Value |
//! |---|---|
//! | `{TileCol}` | upstream column |
//! | `{TileRow}` | upstream row |
//! | `{TileMatrix}` | zoom level |
//! | `{TileMatrixSet}` | grid name |
//! | `{TileSetName}` | tileset name |
//! | `{ext}` | format extension |
//!
//! Tokens are matched literally and case-sensitively. Anything else in braces
//! is left untouched.

/// Column placeholder.
pub const TILE_COL: &str = "{TileCol}";
/// Row placeholder.
pub const TILE_ROW: &str = "{TileRow}";
/// Zoom level placeholder.
pub const TILE_MATRIX: &str = "{TileMatrix}";
/// Grid name placeholder.
pub const TILE_MATRIX_SET: &str = "{TileMatrixSet}";
/// Tileset name placeholder.
pub const TILE_SET_NAME: &str = "{TileSetName}";
/// Format extension placeholder.
pub const EXTENSION: &str = "{ext}";

/// Values substituted into a URL template for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateParams<'a> {
    pub col: u32,
    pub row: u32,
    pub matrix: u32,
    pub matrix_set: &'a str,
    pub tileset: &'a str,
    pub extension: &'a str,
}

/// Substitutes every recognized placeholder present in `template`.
///
/// Each placeholder gets a single substitution pass that replaces all of its
/// occurrences; placeholders absent from the template are skipped.
///
/// # Example
///
/// ```
/// use tileproxy::template::{resolve, TemplateParams};
///
/// let params = TemplateParams {
///     col: 5,
///     row: 2,
///     matrix: 3,
///     matrix_set: "WebMercator",
///     tileset: "base",
///     extension: "png",
/// };
/// let url = resolve("https://up/{TileSetName}/{TileMatrix}/{TileRow}/{TileCol}.{ext}", &params);
/// assert_eq!(url, "https://up/base/3/2/5.png");
/// ```
pub fn resolve(template: &str, params: &TemplateParams<'_>) -> String {
    let mut url = template.to_string();

    substitute(&mut url, TILE_COL, &params.col.to_string());
    substitute(&mut url, TILE_ROW, &params.row.to_string());
    substitute(&mut url, TILE_MATRIX, &params.matrix.to_string());
    substitute(&mut url, TILE_MATRIX_SET, params.matrix_set);
    substitute(&mut url, TILE_SET_NAME, params.tileset);
    substitute(&mut url, EXTENSION, params.extension);

    url
}

fn substitute(url: &mut String, token: &str, value: &str) {
    if url.contains(token) {
        *url = url.replace(token, value);
    }
}
