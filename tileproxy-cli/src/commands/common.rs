//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::Args;
use tileproxy::coord::{GridLink, GridOrigin, TileAddress};
use tileproxy::dimension::{Dimension, RequestedDimension, TILE_VERSION};
use tileproxy::source::{MapRequest, TileSource};

use crate::error::CliError;
use crate::runner::{read_definition, CliRunner};

/// Identifies one tile of one tileset.
#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Source definition file (defaults to `sources` in the settings file)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Tileset name as known to the caching server
    #[arg(long)]
    pub tileset: String,

    /// Grid name
    #[arg(long, default_value = "WebMercator")]
    pub grid: String,

    /// Grid origin: bottom-left, top-left, bottom-right or top-right
    #[arg(long, default_value = "top-left")]
    pub origin: GridOrigin,

    /// Deepest zoom level of the grid; level z is 2^z tiles wide
    #[arg(long, default_value_t = 18)]
    pub max_level: u32,

    /// Zoom level
    #[arg(short = 'z', long)]
    pub level: u32,

    /// Tile column in grid coordinates
    #[arg(short = 'x', long)]
    pub x: u32,

    /// Tile row in grid coordinates
    #[arg(short = 'y', long)]
    pub y: u32,

    /// Format extension substituted for {ext}
    #[arg(long, default_value = "png")]
    pub ext: String,

    /// Requested TileVersion value
    #[arg(long)]
    pub tile_version: Option<String>,

    /// Default TileVersion value, used for "latest" and "default"
    #[arg(long)]
    pub default_version: Option<String>,
}

impl TileArgs {
    /// Build the tile request these arguments describe.
    pub fn to_request(&self) -> MapRequest {
        let grid = GridLink::quadtree(self.grid.as_str(), self.origin, self.max_level);
        let request = MapRequest::single(
            self.tileset.as_str(),
            self.ext.as_str(),
            grid,
            TileAddress::new(self.x, self.y, self.level),
        );

        if self.tile_version.is_none() && self.default_version.is_none() {
            return request;
        }

        request.with_dimensions(vec![RequestedDimension::new(
            Dimension::new(TILE_VERSION, self.default_version.as_deref()),
            self.tile_version.as_deref(),
        )])
    }

    /// Load the source these arguments point at.
    pub fn load_source(&self, runner: &CliRunner) -> Result<Box<dyn TileSource>, CliError> {
        let path = runner.definition_path(self.source.clone())?;
        let node = read_definition(&path)?;
        runner.load_source(&node)
    }
}
