//! The tile map: a sparse grid of element stacks keyed by tile.

use crate::element::{SurfaceElement, TileElement};
use crate::invalidate::InvalidationTracker;
use crate::{
    COORDS_XY_STEP, COORDS_Z_STEP, CoordsXY, MINIMUM_LAND_HEIGHT_BIG, MapError, MapRange,
    Ownership, TileCoords,
};
use parkline_core::hash::StateHash;
use parkline_core::id::RideId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A piece of litter lying on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Litter {
    pub z: i32,
}

/// Map of tiles to their element stacks.
///
/// Tiles are stored in a `BTreeMap` so every iteration is in coordinate
/// order, which keeps anything derived from it deterministic across peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    size: i32,
    tiles: BTreeMap<TileCoords, Vec<TileElement>>,
    litter: BTreeMap<TileCoords, Vec<Litter>>,
    #[serde(skip)]
    invalidation: InvalidationTracker,
}

impl TileMap {
    /// An empty map of `size` x `size` tiles.
    pub fn new(size: i32) -> Self {
        Self {
            size,
            tiles: BTreeMap::new(),
            litter: BTreeMap::new(),
            invalidation: InvalidationTracker::new(),
        }
    }

    /// A map where every tile has a copy of `surface`.
    pub fn with_flat_terrain(size: i32, surface: SurfaceElement) -> Self {
        let mut map = Self::new(size);
        for x in 0..size {
            for y in 0..size {
                map.tiles.insert(
                    TileCoords::new(x, y),
                    vec![TileElement::Surface(surface.clone())],
                );
            }
        }
        map
    }

    /// Map size in tiles along one axis.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Highest addressable coordinate on either axis, in map units.
    pub fn size_max_xy(&self) -> i32 {
        self.size * COORDS_XY_STEP - 33
    }

    /// Whether `pos` lies inside the editable map (excludes the border row).
    pub fn is_inside(&self, pos: CoordsXY) -> bool {
        pos.x >= COORDS_XY_STEP
            && pos.y >= COORDS_XY_STEP
            && pos.x <= self.size_max_xy()
            && pos.y <= self.size_max_xy()
    }

    // -- Point queries --

    /// The element stack at the tile containing `pos`.
    pub fn elements_at(&self, pos: CoordsXY) -> &[TileElement] {
        self.tiles
            .get(&pos.to_tile())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn surface_at(&self, pos: CoordsXY) -> Option<&SurfaceElement> {
        self.elements_at(pos).iter().find_map(TileElement::as_surface)
    }

    pub fn surface_at_mut(&mut self, pos: CoordsXY) -> Option<&mut SurfaceElement> {
        self.tiles
            .get_mut(&pos.to_tile())?
            .iter_mut()
            .find_map(TileElement::as_surface_mut)
    }

    /// Ground height at `pos` in map units.
    pub fn tile_height(&self, pos: CoordsXY) -> i32 {
        self.surface_at(pos)
            .map(|s| s.base_height() as i32 * COORDS_Z_STEP)
            .unwrap_or(MINIMUM_LAND_HEIGHT_BIG)
    }

    /// Whether the land at `pos` belongs to the park.
    pub fn is_location_in_park(&self, pos: CoordsXY) -> bool {
        self.surface_at(pos)
            .is_some_and(|s| s.ownership() == Ownership::Owned)
    }

    // -- Range queries --

    /// All elements on tiles inside `range`, in tile order.
    pub fn elements_in_range(
        &self,
        range: &MapRange,
    ) -> impl Iterator<Item = (TileCoords, &TileElement)> {
        let min = CoordsXY::new(range.left(), range.top()).to_tile();
        let max = CoordsXY::new(range.right(), range.bottom()).to_tile();
        self.tiles
            .range(min..=max)
            .filter(move |(tile, _)| tile.y >= min.y && tile.y <= max.y)
            .flat_map(|(tile, stack)| stack.iter().map(move |el| (*tile, el)))
    }

    // -- Mutation --

    /// Push an element onto the stack at `pos`.
    pub fn insert_element(&mut self, pos: CoordsXY, element: TileElement) -> Result<(), MapError> {
        let tile = pos.to_tile();
        if tile.x < 0 || tile.y < 0 || tile.x >= self.size || tile.y >= self.size {
            return Err(MapError::OutOfBounds { x: pos.x, y: pos.y });
        }
        self.tiles.entry(tile).or_default().push(element);
        Ok(())
    }

    /// Remove every track element belonging to `ride`. Returns how many were removed.
    pub fn remove_ride_elements(&mut self, ride: RideId) -> usize {
        let mut removed = Vec::new();
        for (tile, stack) in self.tiles.iter_mut() {
            let before = stack.len();
            stack.retain(|el| el.as_track().is_none_or(|t| t.ride != ride));
            if stack.len() != before {
                removed.push((*tile, before - stack.len()));
            }
        }
        for (tile, _) in &removed {
            self.invalidation.mark_tile(*tile);
        }
        removed.iter().map(|(_, n)| n).sum()
    }

    // -- Litter --

    pub fn add_litter(&mut self, pos: CoordsXY, z: i32) {
        self.litter.entry(pos.to_tile()).or_default().push(Litter { z });
    }

    pub fn litter_at(&self, pos: CoordsXY) -> &[Litter] {
        self.litter
            .get(&pos.to_tile())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remove litter lying within one height step of `z` on the tile.
    pub fn remove_litter(&mut self, pos: CoordsXY, z: i32) {
        let tile = pos.to_tile();
        if let Some(items) = self.litter.get_mut(&tile) {
            items.retain(|l| (l.z - z).abs() > COORDS_Z_STEP * 2);
            if items.is_empty() {
                self.litter.remove(&tile);
            }
        }
    }

    // -- Redraw --

    /// Mark the tile containing `pos` for redraw.
    pub fn invalidate_tile(&mut self, pos: CoordsXY) {
        self.invalidation.mark_tile(pos.to_tile());
    }

    pub fn invalidation(&self) -> &InvalidationTracker {
        &self.invalidation
    }

    // -- Hashing --

    /// Feed tile contents and litter into a state hash in coordinate order.
    pub fn hash_into(&self, h: &mut StateHash) {
        h.write_i32(self.size);
        for (tile, stack) in &self.tiles {
            h.write_i32(tile.x);
            h.write_i32(tile.y);
            h.write_u32(stack.len() as u32);
            for el in stack {
                el.hash_into(h);
            }
        }
        for (tile, items) in &self.litter {
            h.write_i32(tile.x);
            h.write_i32(tile.y);
            for l in items {
                h.write_i32(l.z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{SceneryElement, TrackElement};
    use parkline_core::id::{EdgeStyle, SceneryIndex, SurfaceStyle};
    use slotmap::SlotMap;

    fn owned_flat(size: i32) -> TileMap {
        TileMap::with_flat_terrain(
            size,
            SurfaceElement::new(SurfaceStyle(0), EdgeStyle(0), 2).with_ownership(Ownership::Owned),
        )
    }

    fn make_ride_id() -> RideId {
        let mut sm = SlotMap::<RideId, ()>::with_key();
        sm.insert(())
    }

    #[test]
    fn size_max_xy_matches_border() {
        let map = TileMap::new(256);
        assert_eq!(map.size_max_xy(), 8159);
        assert!(map.is_inside(CoordsXY::new(32, 32)));
        assert!(!map.is_inside(CoordsXY::new(31, 32)));
        assert!(!map.is_inside(CoordsXY::new(32, 8160)));
    }

    #[test]
    fn surface_lookup_and_height() {
        let map = owned_flat(8);
        let surface = map.surface_at(CoordsXY::new(70, 70)).unwrap();
        assert_eq!(surface.surface_style(), SurfaceStyle(0));
        assert_eq!(map.tile_height(CoordsXY::new(70, 70)), 16);
        assert!(map.is_location_in_park(CoordsXY::new(70, 70)));
    }

    #[test]
    fn missing_surface_reports_minimum_height() {
        let map = TileMap::new(8);
        assert!(map.surface_at(CoordsXY::new(64, 64)).is_none());
        assert_eq!(map.tile_height(CoordsXY::new(64, 64)), MINIMUM_LAND_HEIGHT_BIG);
        assert!(!map.is_location_in_park(CoordsXY::new(64, 64)));
    }

    #[test]
    fn surface_mutation_through_setter() {
        let mut map = owned_flat(8);
        map.surface_at_mut(CoordsXY::new(64, 64))
            .unwrap()
            .set_surface_style(SurfaceStyle(4));
        assert_eq!(
            map.surface_at(CoordsXY::new(64, 64)).unwrap().surface_style(),
            SurfaceStyle(4)
        );
        assert_eq!(
            map.surface_at(CoordsXY::new(96, 64)).unwrap().surface_style(),
            SurfaceStyle(0)
        );
    }

    #[test]
    fn insert_out_of_bounds_fails() {
        let mut map = TileMap::new(4);
        let el = TileElement::Scenery(SceneryElement {
            object: SceneryIndex(0),
            base_height: 2,
            ghost: false,
        });
        assert!(matches!(
            map.insert_element(CoordsXY::new(200, 0), el),
            Err(MapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn range_query_filters_rows() {
        let map = owned_flat(8);
        let range = MapRange::new(64, 64, 96, 96);
        let tiles: Vec<_> = map.elements_in_range(&range).map(|(t, _)| t).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoords::new(2, 2),
                TileCoords::new(2, 3),
                TileCoords::new(3, 2),
                TileCoords::new(3, 3),
            ]
        );
    }

    #[test]
    fn remove_ride_elements_only_touches_ride() {
        let mut map = owned_flat(8);
        let ride = make_ride_id();
        let track = TileElement::Track(TrackElement {
            ride,
            piece: 0,
            base_height: 2,
            ghost: false,
        });
        map.insert_element(CoordsXY::new(64, 64), track.clone()).unwrap();
        map.insert_element(CoordsXY::new(96, 64), track).unwrap();
        assert_eq!(map.remove_ride_elements(ride), 2);
        assert_eq!(map.elements_at(CoordsXY::new(64, 64)).len(), 1);
        assert!(map.invalidation().is_tile_invalid(TileCoords::new(2, 2)));
    }

    #[test]
    fn litter_removed_near_height() {
        let mut map = owned_flat(8);
        let pos = CoordsXY::new(64, 64);
        map.add_litter(pos, 16);
        map.add_litter(pos, 120);
        map.remove_litter(pos, 16);
        assert_eq!(map.litter_at(pos), &[Litter { z: 120 }]);
    }

    #[test]
    fn hash_tracks_surface_changes() {
        let mut map = owned_flat(4);
        let mut before = StateHash::new();
        map.hash_into(&mut before);

        map.invalidate_tile(CoordsXY::new(32, 32));
        let mut redraw_only = StateHash::new();
        map.hash_into(&mut redraw_only);
        assert_eq!(before, redraw_only);

        map.surface_at_mut(CoordsXY::new(32, 32))
            .unwrap()
            .set_edge_style(EdgeStyle(2));
        let mut after = StateHash::new();
        map.hash_into(&mut after);
        assert_ne!(before, after);
    }

    #[test]
    fn snapshot_round_trip_preserves_hash() {
        let mut map = owned_flat(4);
        map.add_litter(CoordsXY::new(64, 64), 16);
        let bytes = bitcode::serialize(&map).unwrap();
        let restored: TileMap = bitcode::deserialize(&bytes).unwrap();
        let mut a = StateHash::new();
        let mut b = StateHash::new();
        map.hash_into(&mut a);
        restored.hash_into(&mut b);
        assert_eq!(a, b);
    }
}
