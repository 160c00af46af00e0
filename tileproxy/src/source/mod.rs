//! Tile sources
//!
//! A tile source turns a [`MapRequest`] from the caching host into upstream
//! fetches. Two kinds exist:
//!
//! - [`OgcApiTilesSource`]: resolves the upstream from a [`Registry`] of
//!   per-tileset, per-version, per-grid map definitions and runs the fetch
//!   chain configured for the requested zoom level.
//! - [`WmtsProxySource`]: a single-template passthrough.
//!
//! Sources only proxy; [`TileSource::render_map`] is rejected by both.

mod handle;
mod ogc_api_tiles;
mod registry;
mod wmts_proxy;

pub use handle::SourceHandle;
pub use ogc_api_tiles::{OgcApiTilesSource, DEFAULT_BUFFER_CAPACITY, KIND as OGC_API_TILES};
pub use registry::{Registry, SourceMap, SourceMatrix, WILDCARD};
pub use wmts_proxy::{WmtsProxySource, KIND as WMTS_PROXY};

use bytes::Bytes;
use thiserror::Error;

use crate::config::{ConfigError, ConfigNode};
use crate::coord::{CoordError, GridLink, TileAddress};
use crate::dimension::RequestedDimension;
use crate::http::HttpError;

/// Errors raised while proxying a tile.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request did not carry exactly one tile
    #[error("BUG: expected exactly one tile per request, got {0}")]
    BadRequestShape(usize),

    /// Coordinate normalization failed
    #[error(transparent)]
    Coord(#[from] CoordError),

    /// No map definition serves the requested selector
    #[error("not found (no map for {tileset}, version {version}, grid {grid})")]
    SourceNotFound {
        tileset: String,
        version: String,
        grid: String,
    },

    /// The selected map has no matrix for the zoom level
    #[error("not found (no matrix in {tileset} for {level})")]
    MatrixNotFound { tileset: String, level: u32 },

    /// The selected matrix has no upstream URL
    #[error("matrix {level} of {tileset} has no upstream url configured")]
    EmptyMatrix { tileset: String, level: u32 },

    /// An upstream fetch failed; the rest of the chain was skipped
    #[error("upstream fetch failed: {0}")]
    Fetch(#[from] HttpError),

    /// A reload definition was rejected; the previous configuration stays
    #[error("reload rejected: {0}")]
    Config(#[from] ConfigError),

    /// Operation not offered by this kind of source
    #[error("{kind} source does not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },
}

impl ProxyError {
    /// HTTP status equivalent reported to the host.
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::SourceNotFound { .. } | ProxyError::MatrixNotFound { .. } => 404,
            ProxyError::Coord(CoordError::OutOfExtent { .. })
            | ProxyError::EmptyMatrix { .. }
            | ProxyError::Config(_) => 400,
            ProxyError::BadRequestShape(_)
            | ProxyError::Coord(_)
            | ProxyError::Fetch(_)
            | ProxyError::Unsupported { .. } => 500,
        }
    }

    /// True for the not-found outcomes a host is expected to handle.
    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

/// A tile request as handed over by the caching host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRequest {
    pub tileset: String,
    /// Format extension, e.g. `png`
    pub extension: String,
    pub grid: GridLink,
    /// Tiles of the metatile; proxying requires exactly one.
    pub tiles: Vec<TileAddress>,
    pub dimensions: Option<Vec<RequestedDimension>>,
}

impl MapRequest {
    /// Request for a single tile without dimensions.
    pub fn single(
        tileset: impl Into<String>,
        extension: impl Into<String>,
        grid: GridLink,
        tile: TileAddress,
    ) -> Self {
        Self {
            tileset: tileset.into(),
            extension: extension.into(),
            grid,
            tiles: vec![tile],
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: Vec<RequestedDimension>) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// The one tile of the request.
    pub fn tile(&self) -> Result<&TileAddress, ProxyError> {
        match self.tiles.as_slice() {
            [tile] => Ok(tile),
            tiles => Err(ProxyError::BadRequestShape(tiles.len())),
        }
    }
}

/// A configured upstream that can serve tiles to the caching host.
pub trait TileSource: Send + Sync {
    /// Configured source name.
    fn name(&self) -> &str;

    /// Source type as named in configuration.
    fn kind(&self) -> &'static str;

    /// Fetches the tile payload for `request` from upstream.
    fn proxy_map(&self, request: &MapRequest) -> Result<Bytes, ProxyError>;

    /// Concrete upstream URLs `proxy_map` would fetch, in fetch order.
    fn resolve_urls(&self, request: &MapRequest) -> Result<Vec<String>, ProxyError>;

    /// Renders a map image. Proxy sources cannot render.
    fn render_map(&self, _request: &MapRequest) -> Result<Bytes, ProxyError> {
        Err(ProxyError::Unsupported {
            kind: self.kind(),
            operation: "render map",
        })
    }

    /// Rebuilds the source from a new definition while it keeps serving.
    ///
    /// On error the current configuration stays in effect.
    fn reload(&self, _node: &ConfigNode) -> Result<(), ProxyError> {
        Err(ProxyError::Unsupported {
            kind: self.kind(),
            operation: "reload",
        })
    }
}
