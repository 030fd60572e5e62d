use crate::TileCoords;
use std::collections::BTreeSet;

/// Tracks which tiles need redrawing since the renderer last drained them.
///
/// Purely presentational: not part of world state, not serialized, not hashed.
#[derive(Debug, Clone, Default)]
pub struct InvalidationTracker {
    tiles: BTreeSet<TileCoords>,
    full_redraw: bool,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a single tile for redraw.
    pub fn mark_tile(&mut self, tile: TileCoords) {
        self.tiles.insert(tile);
    }

    /// Request a redraw of the whole viewport.
    pub fn mark_all(&mut self) {
        self.full_redraw = true;
    }

    pub fn is_tile_invalid(&self, tile: TileCoords) -> bool {
        self.full_redraw || self.tiles.contains(&tile)
    }

    pub fn is_dirty(&self) -> bool {
        self.full_redraw || !self.tiles.is_empty()
    }

    pub fn invalid_tiles(&self) -> &BTreeSet<TileCoords> {
        &self.tiles
    }

    /// Take the pending tiles, leaving the tracker clean.
    pub fn drain(&mut self) -> BTreeSet<TileCoords> {
        self.full_redraw = false;
        std::mem::take(&mut self.tiles)
    }
}
