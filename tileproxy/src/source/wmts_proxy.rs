//! Single-template WMTS passthrough source.

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use super::ogc_api_tiles::DEFAULT_BUFFER_CAPACITY;
use super::{MapRequest, ProxyError, TileSource};
use crate::coord;
use crate::http::{HttpClient, HttpRequest, HttpTemplate};
use crate::template::TemplateParams;

/// Source type name used in configuration.
pub const KIND: &str = "wmts_proxy";

/// Proxies every tile to one upstream URL template.
///
/// The grid name fills `{TileMatrixSet}` and the zoom level `{TileMatrix}`.
pub struct WmtsProxySource<C: HttpClient> {
    name: String,
    template: HttpTemplate,
    http_client: C,
    buffer_capacity: usize,
}

impl<C: HttpClient> WmtsProxySource<C> {
    pub fn new(name: impl Into<String>, template: HttpTemplate, http_client: C) -> Self {
        Self {
            name: name.into(),
            template,
            http_client,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn template(&self) -> &HttpTemplate {
        &self.template
    }

    fn build_request(&self, request: &MapRequest) -> Result<HttpRequest<'_>, ProxyError> {
        let tile = request.tile()?;
        let index = coord::normalize_address(&request.grid, tile)?;

        Ok(self.template.resolve(&TemplateParams {
            col: index.col,
            row: index.row,
            matrix: tile.z,
            matrix_set: &request.grid.name,
            tileset: &request.tileset,
            extension: &request.extension,
        }))
    }
}

impl<C: HttpClient> TileSource for WmtsProxySource<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn proxy_map(&self, request: &MapRequest) -> Result<Bytes, ProxyError> {
        let http_request = self.build_request(request)?;
        debug!(source = %self.name, url = %http_request.url, "fetching upstream");

        let mut buffer = BytesMut::with_capacity(self.buffer_capacity);
        self.http_client
            .do_request(&http_request, &mut buffer)
            .map_err(|e| {
                warn!(source = %self.name, url = %http_request.url, error = %e, "upstream fetch failed");
                ProxyError::Fetch(e)
            })?;

        Ok(buffer.freeze())
    }

    fn resolve_urls(&self, request: &MapRequest) -> Result<Vec<String>, ProxyError> {
        Ok(vec![self.build_request(request)?.url])
    }
}
