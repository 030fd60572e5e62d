//! Spatial index for the park map: world coordinates, clamped map ranges,
//! per-tile element stacks, point and range queries, and redraw tracking.
//!
//! World coordinates are in map units; one tile spans [`COORDS_XY_STEP`]
//! units on each axis. Heights are in map units as well, with element base
//! heights stored in steps of [`COORDS_Z_STEP`].

use serde::{Deserialize, Serialize};

pub mod element;
pub mod invalidate;
pub mod map;

pub use element::{
    Ownership, SceneryElement, SurfaceElement, TileElement, TrackElement, GRASS_LENGTH_CLEAR_0,
};
pub use invalidate::InvalidationTracker;
pub use map::{Litter, TileMap};

/// Size of one tile in map units.
pub const COORDS_XY_STEP: i32 = 32;

/// Offset from a tile's corner to its centre.
pub const COORDS_XY_HALF_TILE: i32 = 16;

/// Size of one height step in map units.
pub const COORDS_Z_STEP: i32 = 8;

/// Height reported for tiles without a surface element.
pub const MINIMUM_LAND_HEIGHT_BIG: i32 = 16;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A position in map units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CoordsXY {
    pub x: i32,
    pub y: i32,
}

impl CoordsXY {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile containing this position.
    pub fn to_tile(self) -> TileCoords {
        TileCoords::new(
            self.x.div_euclid(COORDS_XY_STEP),
            self.y.div_euclid(COORDS_XY_STEP),
        )
    }

    /// The centre of the tile containing this position.
    pub fn to_tile_centre(self) -> CoordsXY {
        let corner = self.to_tile().to_coords();
        CoordsXY::new(
            corner.x + COORDS_XY_HALF_TILE,
            corner.y + COORDS_XY_HALF_TILE,
        )
    }

    /// Offset by a number of whole tiles. `None` if the result does not fit
    /// in map units.
    pub fn offset_tiles(self, dx: i32, dy: i32) -> Option<CoordsXY> {
        let x = dx.checked_mul(COORDS_XY_STEP)?.checked_add(self.x)?;
        let y = dy.checked_mul(COORDS_XY_STEP)?.checked_add(self.y)?;
        Some(CoordsXY::new(x, y))
    }
}

/// A position in map units including height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXYZ {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CoordsXYZ {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn xy(self) -> CoordsXY {
        CoordsXY::new(self.x, self.y)
    }
}

/// A tile index on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoords {
    pub x: i32,
    pub y: i32,
}

impl TileCoords {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The corner of this tile in map units.
    pub fn to_coords(self) -> CoordsXY {
        CoordsXY::new(self.x * COORDS_XY_STEP, self.y * COORDS_XY_STEP)
    }
}

// ---------------------------------------------------------------------------
// MapRange
// ---------------------------------------------------------------------------

/// An inclusive rectangle in map units.
///
/// Corners are normalised on construction so `left <= right` and
/// `top <= bottom` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapRange {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl MapRange {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Clamp into the editable part of a map: one tile row inside the border
    /// at the low end, `size_max_xy` at the high end.
    pub fn clamp_to_map(&self, size_max_xy: i32) -> MapRange {
        let clamp = |v: i32| v.clamp(COORDS_XY_STEP, size_max_xy.max(COORDS_XY_STEP));
        MapRange::new(
            clamp(self.left),
            clamp(self.top),
            clamp(self.right),
            clamp(self.bottom),
        )
    }

    /// Centre of the range snapped to the middle of a tile, as reported in
    /// action results.
    pub fn midpoint(&self) -> CoordsXY {
        CoordsXY::new(
            (self.left + self.right) / 2 + COORDS_XY_HALF_TILE,
            (self.top + self.bottom) / 2 + COORDS_XY_HALF_TILE,
        )
    }

    pub fn contains(&self, pos: CoordsXY) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.bottom
    }

    /// Iterate positions one tile apart, column by column (x outer, y inner).
    pub fn iter_tiles(&self) -> impl Iterator<Item = CoordsXY> {
        let (top, bottom) = (self.top, self.bottom);
        (self.left..=self.right)
            .step_by(COORDS_XY_STEP as usize)
            .flat_map(move |x| {
                (top..=bottom)
                    .step_by(COORDS_XY_STEP as usize)
                    .map(move |y| CoordsXY::new(x, y))
            })
    }
}

/// Errors from map operations.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("position ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
}
