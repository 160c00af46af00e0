//! Grid and tile addressing types

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while converting internal tile addresses to upstream indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// Grid origin name is not one of the four supported corners
    #[error("invalid grid origin '{0}'")]
    InvalidGridOrigin(String),

    /// The grid defines no extents for the requested zoom level
    #[error("grid '{grid}' has no level {level}")]
    UnknownLevel { grid: String, level: u32 },

    /// Tile lies outside the level extents
    #[error("tile ({x}, {y}) outside level extent {maxx}x{maxy}")]
    OutOfExtent { x: u32, y: u32, maxx: u32, maxy: u32 },
}

/// Corner of a tile matrix used as the (0, 0) reference for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridOrigin {
    BottomLeft,
    TopLeft,
    BottomRight,
    TopRight,
}

impl GridOrigin {
    /// All supported origins, in declaration order.
    pub const ALL: [GridOrigin; 4] = [
        GridOrigin::BottomLeft,
        GridOrigin::TopLeft,
        GridOrigin::BottomRight,
        GridOrigin::TopRight,
    ];

    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GridOrigin::BottomLeft => "bottom-left",
            GridOrigin::TopLeft => "top-left",
            GridOrigin::BottomRight => "bottom-right",
            GridOrigin::TopRight => "top-right",
        }
    }

    /// True when rows are counted from the bottom edge.
    pub fn flips_rows(&self) -> bool {
        matches!(self, GridOrigin::BottomLeft | GridOrigin::BottomRight)
    }

    /// True when columns are counted from the right edge.
    pub fn flips_cols(&self) -> bool {
        matches!(self, GridOrigin::BottomRight | GridOrigin::TopRight)
    }
}

impl fmt::Display for GridOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridOrigin {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bottom-left" => Ok(GridOrigin::BottomLeft),
            "top-left" => Ok(GridOrigin::TopLeft),
            "bottom-right" => Ok(GridOrigin::BottomRight),
            "top-right" => Ok(GridOrigin::TopRight),
            _ => Err(CoordError::InvalidGridOrigin(s.to_string())),
        }
    }
}

/// Number of tiles along each axis of one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelExtent {
    pub maxx: u32,
    pub maxy: u32,
}

impl LevelExtent {
    pub fn new(maxx: u32, maxy: u32) -> Self {
        Self { maxx, maxy }
    }
}

/// Row/column index as expected by upstream tile protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub row: u32,
    pub col: u32,
}

/// A tile in the host's internal addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl TileAddress {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// The grid a request is addressed against.
///
/// `levels` is indexed by zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLink {
    pub name: String,
    pub origin: GridOrigin,
    pub levels: Vec<LevelExtent>,
}

impl GridLink {
    pub fn new(name: impl Into<String>, origin: GridOrigin, levels: Vec<LevelExtent>) -> Self {
        Self {
            name: name.into(),
            origin,
            levels,
        }
    }

    /// Builds a power-of-two pyramid (`2^z` tiles per axis) such as WebMercator.
    pub fn quadtree(name: impl Into<String>, origin: GridOrigin, max_level: u32) -> Self {
        let levels = (0..=max_level.min(31))
            .map(|z| LevelExtent::new(1 << z, 1 << z))
            .collect();
        Self::new(name, origin, levels)
    }

    /// Extents of the given zoom level.
    pub fn extent(&self, level: u32) -> Result<LevelExtent, CoordError> {
        self.levels
            .get(level as usize)
            .copied()
            .ok_or_else(|| CoordError::UnknownLevel {
                grid: self.name.clone(),
                level,
            })
    }
}
