//! Track design placement: validating, pricing and committing a design's
//! track pieces and scenery onto the tile map.

use crate::design::TrackDesign;
use parkline_core::fixed::{Money, checked_add_money, checked_mul_count, money};
use parkline_core::id::{RideId, SceneryIndex};
use parkline_core::registry::ObjectRegistry;
use parkline_core::strings::StringId;
use parkline_map::{
    COORDS_XY_STEP, COORDS_Z_STEP, CoordsXY, CoordsXYZ, MapError, SceneryElement, TileElement,
    TileMap, TrackElement,
};
use serde::{Deserialize, Serialize};

/// Highest base height a track piece may be placed at, in map units.
pub const MAX_TRACK_HEIGHT: i32 = 254 * COORDS_Z_STEP;

/// Height covered by one support segment, in map units.
const SUPPORT_STEP: i32 = 2 * COORDS_Z_STEP;

/// How a placement is committed to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitMode {
    /// Real construction.
    Place,
    /// Preview elements, flagged as ghosts.
    Ghost,
}

/// Parameters of one placement attempt.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    pub design: &'a TrackDesign,
    pub origin: CoordsXYZ,
    pub include_scenery: bool,
    /// Editor and sandbox mode may build on land the park does not own.
    pub ignore_ownership: bool,
}

/// Reasons a placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("track design has no track pieces")]
    EmptyDesign,
    #[error("track piece at ({x}, {y}) is off the edge of the map")]
    OffEdgeOfMap { x: i32, y: i32 },
    #[error("land at ({x}, {y}) is not owned by the park")]
    LandNotOwned { x: i32, y: i32 },
    #[error("track piece at ({x}, {y}) would be below ground")]
    BelowGround { x: i32, y: i32 },
    #[error("track piece at ({x}, {y}) would be too high")]
    TooHigh { x: i32, y: i32 },
    #[error("existing track in the way at ({x}, {y})")]
    TrackInTheWay { x: i32, y: i32 },
    #[error("scenery object '{0}' is not available")]
    SceneryUnavailable(String),
    #[error("placement cost overflowed")]
    CostOverflow,
}

impl PlacementError {
    /// Localizable reason for showing the rejection to the player.
    pub fn reason(&self) -> StringId {
        match self {
            PlacementError::EmptyDesign | PlacementError::CostOverflow => {
                StringId::CantPlaceTrackDesign
            }
            PlacementError::OffEdgeOfMap { .. } => StringId::OffEdgeOfMap,
            PlacementError::LandNotOwned { .. } => StringId::LandNotOwnedByPark,
            PlacementError::BelowGround { .. } => StringId::CanOnlyBuildThisAboveGround,
            PlacementError::TooHigh { .. } => StringId::TooHigh,
            PlacementError::TrackInTheWay { .. } => StringId::TrackInTheWay,
            PlacementError::SceneryUnavailable(_) => StringId::SceneryUnavailable,
        }
    }
}

impl From<MapError> for PlacementError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::OutOfBounds { x, y } => PlacementError::OffEdgeOfMap { x, y },
        }
    }
}

/// Places track designs on the map.
///
/// `query` must not mutate anything; `commit` applies exactly what the
/// matching `query` priced and returns the same cost.
pub trait TrackPlacer {
    fn query(
        &self,
        map: &TileMap,
        objects: &ObjectRegistry,
        request: &PlacementRequest<'_>,
    ) -> Result<Money, PlacementError>;

    fn commit(
        &self,
        map: &mut TileMap,
        objects: &ObjectRegistry,
        request: &PlacementRequest<'_>,
        ride: RideId,
        mode: CommitMode,
    ) -> Result<Money, PlacementError>;
}

/// Construction prices used by [`VirtualTrackPlacer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementPricing {
    /// Price of one track piece.
    pub piece_price: Money,
    /// Price of one support segment under an elevated piece.
    pub support_price: Money,
}

impl Default for PlacementPricing {
    fn default() -> Self {
        Self {
            piece_price: money(30),
            support_price: money(5),
        }
    }
}

/// A validated placement: what would be built and what it costs.
#[derive(Debug, Clone, Default)]
struct PlacementPlan {
    cost: Money,
    track: Vec<(CoordsXY, u8, u8)>,
    scenery: Vec<(CoordsXY, SceneryIndex, u8)>,
}

/// Default placer: lays a design's pieces onto tiles one by one.
#[derive(Debug, Clone, Default)]
pub struct VirtualTrackPlacer {
    pricing: PlacementPricing,
}

impl VirtualTrackPlacer {
    pub fn new(pricing: PlacementPricing) -> Self {
        Self { pricing }
    }

    fn plan(
        &self,
        map: &TileMap,
        objects: &ObjectRegistry,
        request: &PlacementRequest<'_>,
    ) -> Result<PlacementPlan, PlacementError> {
        let design = request.design;
        if design.track.is_empty() {
            return Err(PlacementError::EmptyDesign);
        }

        let origin = request.origin.xy();
        let mut plan = PlacementPlan::default();

        for piece in &design.track {
            let pos = origin
                .offset_tiles(piece.x, piece.y)
                .ok_or_else(|| off_edge(origin, piece.x, piece.y))?;
            if !map.is_inside(pos) {
                return Err(PlacementError::OffEdgeOfMap { x: pos.x, y: pos.y });
            }
            if !request.ignore_ownership && !map.is_location_in_park(pos) {
                return Err(PlacementError::LandNotOwned { x: pos.x, y: pos.y });
            }
            let ground = map.tile_height(pos);
            let z = height(request.origin.z, piece.z);
            if z < i64::from(ground) {
                return Err(PlacementError::BelowGround { x: pos.x, y: pos.y });
            }
            if z > i64::from(MAX_TRACK_HEIGHT) {
                return Err(PlacementError::TooHigh { x: pos.x, y: pos.y });
            }
            let base_height = (z / i64::from(COORDS_Z_STEP)) as u8;
            let blocked = map
                .elements_at(pos)
                .iter()
                .filter_map(TileElement::as_track)
                .any(|t| !t.ghost && t.base_height == base_height);
            if blocked
                || plan
                    .track
                    .iter()
                    .any(|&(p, _, h)| p == pos && h == base_height)
            {
                return Err(PlacementError::TrackInTheWay { x: pos.x, y: pos.y });
            }

            let supports = checked_mul_count(
                self.pricing.support_price,
                (z - i64::from(ground)) / i64::from(SUPPORT_STEP),
            )
            .ok_or(PlacementError::CostOverflow)?;
            plan.cost = checked_add_money(plan.cost, self.pricing.piece_price)
                .and_then(|c| checked_add_money(c, supports))
                .ok_or(PlacementError::CostOverflow)?;
            plan.track.push((pos, piece.piece, base_height));
        }

        if request.include_scenery {
            for item in &design.scenery {
                let index = objects
                    .scenery_by_name(&item.object)
                    .ok_or_else(|| PlacementError::SceneryUnavailable(item.object.clone()))?;
                // Scenery that cannot go down is dropped, not an error.
                let Some(pos) = origin.offset_tiles(item.x, item.y) else {
                    continue;
                };
                if !map.is_inside(pos)
                    || (!request.ignore_ownership && !map.is_location_in_park(pos))
                {
                    continue;
                }
                let z = height(request.origin.z, item.z).max(i64::from(map.tile_height(pos)));
                if z > i64::from(MAX_TRACK_HEIGHT) {
                    continue;
                }
                let price = objects.scenery(index).map(|d| d.price).unwrap_or_default();
                plan.cost = checked_add_money(plan.cost, price).ok_or(PlacementError::CostOverflow)?;
                plan.scenery.push((pos, index, (z / i64::from(COORDS_Z_STEP)) as u8));
            }
        }

        Ok(plan)
    }
}

/// Absolute height of a design element, in i64 so offsets cannot overflow.
fn height(origin_z: i32, dz: i32) -> i64 {
    i64::from(origin_z) + i64::from(dz)
}

/// Error for a piece whose position does not fit in map units.
fn off_edge(origin: CoordsXY, dx: i32, dy: i32) -> PlacementError {
    let step = i64::from(COORDS_XY_STEP);
    let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    PlacementError::OffEdgeOfMap {
        x: clamp(i64::from(origin.x) + i64::from(dx) * step),
        y: clamp(i64::from(origin.y) + i64::from(dy) * step),
    }
}

impl TrackPlacer for VirtualTrackPlacer {
    fn query(
        &self,
        map: &TileMap,
        objects: &ObjectRegistry,
        request: &PlacementRequest<'_>,
    ) -> Result<Money, PlacementError> {
        self.plan(map, objects, request).map(|plan| plan.cost)
    }

    fn commit(
        &self,
        map: &mut TileMap,
        objects: &ObjectRegistry,
        request: &PlacementRequest<'_>,
        ride: RideId,
        mode: CommitMode,
    ) -> Result<Money, PlacementError> {
        let plan = self.plan(map, objects, request)?;
        let ghost = mode == CommitMode::Ghost;
        for &(pos, piece, base_height) in &plan.track {
            map.insert_element(
                pos,
                TileElement::Track(TrackElement {
                    ride,
                    piece,
                    base_height,
                    ghost,
                }),
            )?;
            map.invalidate_tile(pos);
        }
        for &(pos, object, base_height) in &plan.scenery {
            map.insert_element(
                pos,
                TileElement::Scenery(SceneryElement {
                    object,
                    base_height,
                    ghost,
                }),
            )?;
            map.invalidate_tile(pos);
        }
        Ok(plan.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DesignScenery, DesignTrackPiece};
    use parkline_core::id::{EdgeStyle, RideType, SurfaceStyle};
    use parkline_core::registry::ObjectRegistryBuilder;
    use parkline_map::{Ownership, SurfaceElement};
    use slotmap::SlotMap;

    fn objects() -> ObjectRegistry {
        let mut b = ObjectRegistryBuilder::new();
        b.register_scenery("oak_tree", money(12));
        b.build().unwrap()
    }

    fn owned_map() -> TileMap {
        TileMap::with_flat_terrain(
            16,
            SurfaceElement::new(SurfaceStyle(0), EdgeStyle(0), 2).with_ownership(Ownership::Owned),
        )
    }

    fn ride_id() -> RideId {
        let mut sm = SlotMap::<RideId, ()>::with_key();
        sm.insert(())
    }

    fn design(pieces: &[(i32, i32, i32)], scenery: &[&str]) -> TrackDesign {
        TrackDesign {
            name: "Test".to_string(),
            ride_type: RideType(1),
            vehicle_object: "cars".to_string(),
            ride_mode: 0,
            colour_scheme: 0,
            entrance_style: 0,
            depart_flags: 0,
            number_of_trains: 1,
            number_of_cars_per_train: 1,
            min_waiting_time: 0,
            max_waiting_time: 0,
            operation_setting: 0,
            lift_hill_speed: 0,
            num_circuits: 0,
            track_spine_colour: [0; 4],
            track_rail_colour: [0; 4],
            track_support_colour: [0; 4],
            vehicle_colours: Vec::new(),
            track: pieces
                .iter()
                .map(|&(x, y, z)| DesignTrackPiece { x, y, z, piece: 1 })
                .collect(),
            scenery: scenery
                .iter()
                .map(|name| DesignScenery {
                    object: name.to_string(),
                    x: 0,
                    y: 1,
                    z: 0,
                })
                .collect(),
        }
    }

    fn request(design: &TrackDesign, include_scenery: bool) -> PlacementRequest<'_> {
        PlacementRequest {
            design,
            origin: CoordsXYZ::new(128, 128, 16),
            include_scenery,
            ignore_ownership: false,
        }
    }

    #[test]
    fn query_prices_pieces_and_supports() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, 0), (1, 0, 0), (2, 0, 32)], &[]);
        let cost = placer.query(&owned_map(), &objects(), &request(&d, true)).unwrap();
        // Three pieces plus two support segments under the raised piece.
        assert_eq!(cost, money(30 * 3 + 5 * 2));
    }

    #[test]
    fn query_does_not_touch_map() {
        let placer = VirtualTrackPlacer::default();
        let map = owned_map();
        let d = design(&[(0, 0, 0)], &["oak_tree"]);
        placer.query(&map, &objects(), &request(&d, true)).unwrap();
        assert_eq!(map.elements_at(CoordsXY::new(128, 128)).len(), 1);
    }

    #[test]
    fn scenery_included_in_cost() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, 0)], &["oak_tree"]);
        let with = placer.query(&owned_map(), &objects(), &request(&d, true)).unwrap();
        let without = placer.query(&owned_map(), &objects(), &request(&d, false)).unwrap();
        assert_eq!(with - without, money(12));
    }

    #[test]
    fn missing_scenery_object_reported() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, 0)], &["palm_tree"]);
        let err = placer.query(&owned_map(), &objects(), &request(&d, true)).unwrap_err();
        assert_eq!(err, PlacementError::SceneryUnavailable("palm_tree".to_string()));
        assert!(placer.query(&owned_map(), &objects(), &request(&d, false)).is_ok());
    }

    #[test]
    fn off_map_rejected() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, 0), (40, 0, 0)], &[]);
        let err = placer.query(&owned_map(), &objects(), &request(&d, false)).unwrap_err();
        assert!(matches!(err, PlacementError::OffEdgeOfMap { .. }));
        assert_eq!(err.reason(), StringId::OffEdgeOfMap);
    }

    #[test]
    fn unowned_land_rejected_unless_ignored() {
        let placer = VirtualTrackPlacer::default();
        let mut map = owned_map();
        map.surface_at_mut(CoordsXY::new(128, 128))
            .unwrap()
            .set_ownership(Ownership::Unowned);
        let d = design(&[(0, 0, 0)], &[]);
        let mut req = request(&d, false);
        assert!(matches!(
            placer.query(&map, &objects(), &req),
            Err(PlacementError::LandNotOwned { .. })
        ));
        req.ignore_ownership = true;
        assert!(placer.query(&map, &objects(), &req).is_ok());
    }

    #[test]
    fn below_ground_rejected() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, -8)], &[]);
        assert!(matches!(
            placer.query(&owned_map(), &objects(), &request(&d, false)),
            Err(PlacementError::BelowGround { .. })
        ));
    }

    #[test]
    fn overlapping_pieces_rejected() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, 0), (0, 0, 0)], &[]);
        assert!(matches!(
            placer.query(&owned_map(), &objects(), &request(&d, false)),
            Err(PlacementError::TrackInTheWay { .. })
        ));
    }

    #[test]
    fn commit_places_elements_and_blocks_repeat() {
        let placer = VirtualTrackPlacer::default();
        let mut map = owned_map();
        let objects = objects();
        let d = design(&[(0, 0, 0), (1, 0, 0)], &["oak_tree"]);
        let req = request(&d, true);
        let queried = placer.query(&map, &objects, &req).unwrap();
        let committed = placer
            .commit(&mut map, &objects, &req, ride_id(), CommitMode::Place)
            .unwrap();
        assert_eq!(queried, committed);
        assert_eq!(map.elements_at(CoordsXY::new(128, 128)).len(), 2);
        assert_eq!(map.elements_at(CoordsXY::new(128, 160)).len(), 2);
        assert!(matches!(
            placer.query(&map, &objects, &req),
            Err(PlacementError::TrackInTheWay { .. })
        ));
    }

    #[test]
    fn ghost_commit_does_not_block() {
        let placer = VirtualTrackPlacer::default();
        let mut map = owned_map();
        let objects = objects();
        let d = design(&[(0, 0, 0)], &[]);
        let req = request(&d, false);
        placer
            .commit(&mut map, &objects, &req, ride_id(), CommitMode::Ghost)
            .unwrap();
        assert!(map.elements_at(CoordsXY::new(128, 128))[1].is_ghost());
        assert!(placer.query(&map, &objects, &req).is_ok());
    }

    #[test]
    fn huge_piece_offsets_are_off_the_map() {
        let placer = VirtualTrackPlacer::default();
        for (x, y) in [(100_000_000, 0), (0, i32::MIN), (i32::MAX, i32::MAX)] {
            let d = design(&[(0, 0, 0), (x, y, 0)], &[]);
            let err = placer.query(&owned_map(), &objects(), &request(&d, false)).unwrap_err();
            assert!(matches!(err, PlacementError::OffEdgeOfMap { .. }), "{err:?}");
        }
    }

    #[test]
    fn extreme_piece_heights_rejected() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[(0, 0, i32::MAX)], &[]);
        assert!(matches!(
            placer.query(&owned_map(), &objects(), &request(&d, false)),
            Err(PlacementError::TooHigh { .. })
        ));
        let d = design(&[(0, 0, i32::MIN)], &[]);
        assert!(matches!(
            placer.query(&owned_map(), &objects(), &request(&d, false)),
            Err(PlacementError::BelowGround { .. })
        ));
    }

    #[test]
    fn scenery_out_of_reach_is_dropped() {
        let placer = VirtualTrackPlacer::default();
        let objects = objects();
        let bare = design(&[(0, 0, 0)], &[]);
        let bare_cost = placer.query(&owned_map(), &objects, &request(&bare, true)).unwrap();

        let mut far = design(&[(0, 0, 0)], &["oak_tree"]);
        far.scenery[0].x = 100_000_000;
        let mut high = design(&[(0, 0, 0)], &["oak_tree"]);
        high.scenery[0].z = 4000;
        let mut overflowing = design(&[(0, 0, 0)], &["oak_tree"]);
        overflowing.scenery[0].z = i32::MAX;

        for d in [far, high, overflowing] {
            let mut map = owned_map();
            let req = request(&d, true);
            assert_eq!(placer.query(&map, &objects, &req).unwrap(), bare_cost);
            placer
                .commit(&mut map, &objects, &req, ride_id(), CommitMode::Place)
                .unwrap();
            assert!(
                !map.elements_at(CoordsXY::new(128, 160))
                    .iter()
                    .any(|e| matches!(e, TileElement::Scenery(_)))
            );
        }
    }

    #[test]
    fn raised_scenery_keeps_its_height() {
        let placer = VirtualTrackPlacer::default();
        let objects = objects();
        let mut map = owned_map();
        let mut d = design(&[(0, 0, 0)], &["oak_tree"]);
        d.scenery[0].z = 64;
        placer
            .commit(&mut map, &objects, &request(&d, true), ride_id(), CommitMode::Place)
            .unwrap();
        let scenery = map
            .elements_at(CoordsXY::new(128, 160))
            .iter()
            .find_map(|e| match e {
                TileElement::Scenery(s) => Some(s.base_height),
                _ => None,
            });
        assert_eq!(scenery, Some(((16 + 64) / COORDS_Z_STEP) as u8));
    }

    #[test]
    fn empty_design_rejected() {
        let placer = VirtualTrackPlacer::default();
        let d = design(&[], &[]);
        assert_eq!(
            placer.query(&owned_map(), &objects(), &request(&d, false)),
            Err(PlacementError::EmptyDesign)
        );
    }
}
