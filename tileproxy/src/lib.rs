//! TileProxy - tile-source resolution and fetch proxy
//!
//! Given a tile request from a tile-caching server, this library works out
//! which upstream HTTP endpoint(s) serve the tile, builds the request URLs
//! from configured templates, fetches the bytes and hands them back.
//!
//! # Request flow
//!
//! 1. [`dimension`] picks the requested tile version
//! 2. [`source::Registry`] selects the map for (tileset, version, grid)
//! 3. [`coord`] converts the internal (x, y) into upstream (row, col)
//! 4. the map's matrix for the zoom level supplies URL templates
//! 5. [`template`] fills in the placeholders
//! 6. [`http::HttpClient`] fetches each URL into the output buffer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tileproxy::config::{loader, ConfigFile, ConfigNode};
//! use tileproxy::coord::{GridLink, GridOrigin, TileAddress};
//! use tileproxy::http::{HttpClient, ReqwestClient};
//! use tileproxy::source::MapRequest;
//!
//! let settings = ConfigFile::load().unwrap();
//! let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::from_settings(&settings.http).unwrap());
//! let node = ConfigNode::from_file("sources.json".as_ref()).unwrap();
//! let source = loader::load_source(&node, client, &settings.proxy).unwrap();
//!
//! let grid = GridLink::quadtree("WebMercator", GridOrigin::TopLeft, 18);
//! let request = MapRequest::single("base", "png", grid, TileAddress::new(5, 2, 3));
//! let tile = source.proxy_map(&request).unwrap();
//! ```

pub mod config;
pub mod coord;
pub mod dimension;
pub mod http;
pub mod logging;
pub mod source;
pub mod template;
