//! Registry-backed tile source with per-level fetch chains.
//!
//! # Fetch chain
//!
//! Every URL template of the selected matrix is fetched, strictly one after
//! the other, in reverse registration order, into a single output buffer.
//! There is no fallback: the first failure aborts the call and no partial
//! buffer is returned. The production client appends bodies, so the buffer
//! ends with the body of the first-registered URL.

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, warn};

use super::handle::SourceHandle;
use super::registry::{Registry, SourceMatrix};
use super::{MapRequest, ProxyError, TileSource};
use crate::config::{loader, ConfigNode};
use crate::coord::{self, TileIndex};
use crate::dimension;
use crate::http::HttpClient;
use crate::template::TemplateParams;

/// Initial output buffer capacity in bytes; the buffer grows past it.
pub const DEFAULT_BUFFER_CAPACITY: usize = 30_000;

/// Source type name used in configuration.
pub const KIND: &str = "ogc_api_tiles";

/// Tile source resolving upstreams from a [`Registry`].
pub struct OgcApiTilesSource<C: HttpClient> {
    name: String,
    handle: SourceHandle,
    http_client: C,
    buffer_capacity: usize,
}

/// Everything needed to build the URLs of one request.
struct Resolved<'r> {
    matrix: &'r SourceMatrix,
    index: TileIndex,
    level: u32,
}

impl<C: HttpClient> OgcApiTilesSource<C> {
    pub fn new(name: impl Into<String>, registry: Registry, http_client: C) -> Self {
        Self {
            name: name.into(),
            handle: SourceHandle::new(registry),
            http_client,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Sets the initial output buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Handle on the live registry.
    pub fn handle(&self) -> &SourceHandle {
        &self.handle
    }

    fn resolve<'r>(
        &self,
        registry: &'r Registry,
        request: &MapRequest,
    ) -> Result<Resolved<'r>, ProxyError> {
        let tile = request.tile()?;

        let version = request
            .dimensions
            .as_deref()
            .and_then(dimension::resolve_version);

        let index = coord::normalize_address(&request.grid, tile)?;
        let level = tile.z;

        debug!(
            tileset = %request.tileset,
            grid = %request.grid.name,
            version = version.unwrap_or("*"),
            "looking up source map"
        );
        let map = registry
            .find(&request.tileset, version, Some(request.grid.name.as_str()))
            .ok_or_else(|| ProxyError::SourceNotFound {
                tileset: request.tileset.clone(),
                version: version.unwrap_or("*").to_string(),
                grid: request.grid.name.clone(),
            })?;

        debug!(tileset = %request.tileset, level, matrices = map.matrices.len(), "looking up matrix");
        let matrix = map.matrix(level).ok_or_else(|| ProxyError::MatrixNotFound {
            tileset: request.tileset.clone(),
            level,
        })?;

        if matrix.urls.is_empty() {
            return Err(ProxyError::EmptyMatrix {
                tileset: request.tileset.clone(),
                level,
            });
        }

        Ok(Resolved {
            matrix,
            index,
            level,
        })
    }
}

fn template_params<'a>(request: &'a MapRequest, resolved: &Resolved<'_>) -> TemplateParams<'a> {
    TemplateParams {
        col: resolved.index.col,
        row: resolved.index.row,
        matrix: resolved.level,
        matrix_set: &request.grid.name,
        tileset: &request.tileset,
        extension: &request.extension,
    }
}

impl<C: HttpClient> TileSource for OgcApiTilesSource<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn proxy_map(&self, request: &MapRequest) -> Result<Bytes, ProxyError> {
        let registry = self.handle.snapshot();
        let resolved = self.resolve(&registry, request)?;
        let params = template_params(request, &resolved);

        let mut buffer = BytesMut::with_capacity(self.buffer_capacity);

        debug!(
            tileset = %request.tileset,
            level = resolved.level,
            urls = resolved.matrix.urls.len(),
            "fetching tile"
        );
        for template in resolved.matrix.urls.iter().rev() {
            let http_request = template.resolve(&params);
            debug!(url = %http_request.url, template = template.url(), "fetching upstream");

            self.http_client
                .do_request(&http_request, &mut buffer)
                .map_err(|e| {
                    warn!(source = %self.name, url = %http_request.url, error = %e, "upstream fetch failed");
                    ProxyError::Fetch(e)
                })?;
        }

        Ok(buffer.freeze())
    }

    fn resolve_urls(&self, request: &MapRequest) -> Result<Vec<String>, ProxyError> {
        let registry = self.handle.snapshot();
        let resolved = self.resolve(&registry, request)?;
        let params = template_params(request, &resolved);

        Ok(resolved
            .matrix
            .urls
            .iter()
            .rev()
            .map(|template| template.resolve(&params).url)
            .collect())
    }

    /// Builds a new registry off to the side, then swaps it in.
    fn reload(&self, node: &ConfigNode) -> Result<(), ProxyError> {
        let registry = loader::load_registry(&self.name, node)?;
        let maps = registry.len();
        self.handle.replace(registry);
        info!(source = %self.name, maps, "registry reloaded");
        Ok(())
    }
}
