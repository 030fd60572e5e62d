//! Shared test fixtures for unit tests, integration tests and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so downstream
//! test crates can build the same scenario through the `test-utils` feature.

use crate::config::ScenarioConfig;
use crate::context::GameContext;
use parkline_core::fixed::money;
use parkline_core::id::{
    EdgeStyle, RideEntryIndex, RideGroupIndex, RideId, RideType, SurfaceStyle,
};
use parkline_core::registry::{
    ObjectRegistry, ObjectRegistryBuilder, RepositoryItem, RideEntryDef, VehicleColour,
};
use parkline_map::CoordsXYZ;
use parkline_ride::design::{DesignScenery, DesignTrackPiece, TrackDesign};

// ===========================================================================
// Object ids
// ===========================================================================

/// Grass: price 10, grows.
pub fn grass() -> SurfaceStyle {
    SurfaceStyle(0)
}

/// Sand: price 20, does not grow.
pub fn sand() -> SurfaceStyle {
    SurfaceStyle(1)
}

pub fn rock_edge() -> EdgeStyle {
    EdgeStyle(0)
}

pub fn wood_edge() -> EdgeStyle {
    EdgeStyle(1)
}

/// Wooden coaster cars: group 0, at least two cars per train.
pub fn wooden_cars() -> RideEntryIndex {
    RideEntryIndex(0)
}

/// Mine train cars: same ride type as the wooden cars, group 1.
pub fn mine_cars() -> RideEntryIndex {
    RideEntryIndex(1)
}

pub fn monorail_cars() -> RideEntryIndex {
    RideEntryIndex(2)
}

pub fn wooden_coaster() -> RideType {
    RideType(1)
}

pub fn monorail() -> RideType {
    RideType(2)
}

// ===========================================================================
// Registry and scenario
// ===========================================================================

pub fn standard_objects() -> ObjectRegistry {
    let mut b = ObjectRegistryBuilder::new();
    b.register_surface("grass", money(10), true);
    b.register_surface("sand", money(20), false);
    b.register_surface("dirt", money(15), false);
    b.register_edge("rock");
    b.register_edge("wood");

    let mut wooden = RideEntryDef::new("wooden_cars", wooden_coaster());
    wooden.ride_group = Some(RideGroupIndex(0));
    wooden.min_cars_per_train = 2;
    wooden.preset_colours = vec![
        VehicleColour { body: 1, trim: 2, ternary: 3 },
        VehicleColour { body: 4, trim: 5, ternary: 6 },
        VehicleColour { body: 7, trim: 8, ternary: 9 },
    ];
    b.register_ride_entry(wooden);

    let mut mine = RideEntryDef::new("mine_cars", wooden_coaster());
    mine.ride_group = Some(RideGroupIndex(1));
    b.register_ride_entry(mine);

    b.register_ride_entry(RideEntryDef::new("monorail_cars", monorail()));

    b.register_repository_item(RepositoryItem {
        name: "classic_wooden_cars".to_string(),
        ride_type: wooden_coaster(),
        ride_group: Some(RideGroupIndex(0)),
    });
    b.register_scenery("oak_tree", money(12));

    match b.build() {
        Ok(objects) => objects,
        Err(e) => panic!("standard objects failed to build: {e}"),
    }
}

/// A 64x64 owned park with every ride entry invented.
pub fn standard_config() -> ScenarioConfig {
    ScenarioConfig {
        map_size: 64,
        invented_ride_entries: vec![
            "wooden_cars".to_string(),
            "mine_cars".to_string(),
            "monorail_cars".to_string(),
        ],
        ..ScenarioConfig::default()
    }
}

pub fn standard_context() -> GameContext {
    GameContext::from_config(standard_objects(), &standard_config())
}

// ===========================================================================
// Rides and designs
// ===========================================================================

/// Create a monorail directly through the registry, bypassing actions.
pub fn create_monorail(ctx: &mut GameContext) -> RideId {
    match ctx
        .world
        .rides
        .create(monorail(), Some(monorail_cars()), &ctx.objects, |_| true)
    {
        Ok((id, _)) => id,
        Err(e) => panic!("monorail creation failed: {e}"),
    }
}

/// Tile (10, 10) at ground level of the standard terrain.
pub fn standard_origin() -> CoordsXYZ {
    CoordsXYZ::new(320, 320, 112)
}

/// A three-piece wooden coaster at ground level with one oak tree beside it.
pub fn standard_design() -> TrackDesign {
    TrackDesign {
        name: "Timber Wolf".to_string(),
        ride_type: wooden_coaster(),
        vehicle_object: "wooden_cars".to_string(),
        ride_mode: 0,
        colour_scheme: 1,
        entrance_style: 2,
        depart_flags: 0,
        number_of_trains: 1,
        number_of_cars_per_train: 2,
        min_waiting_time: 10,
        max_waiting_time: 60,
        operation_setting: 0,
        lift_hill_speed: 5,
        num_circuits: 1,
        track_spine_colour: [0; 4],
        track_rail_colour: [0; 4],
        track_support_colour: [0; 4],
        vehicle_colours: vec![VehicleColour {
            body: 20,
            trim: 21,
            ternary: 22,
        }],
        track: vec![
            DesignTrackPiece { x: 0, y: 0, z: 0, piece: 0 },
            DesignTrackPiece { x: 1, y: 0, z: 0, piece: 1 },
            DesignTrackPiece { x: 2, y: 0, z: 16, piece: 2 },
        ],
        scenery: vec![DesignScenery {
            object: "oak_tree".to_string(),
            x: 0,
            y: 1,
            z: 0,
        }],
    }
}
