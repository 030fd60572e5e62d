//! Track design descriptors: immutable templates for instantiating a ride.

use crate::ride::{MAX_VEHICLES_PER_RIDE, NUM_COLOUR_SCHEMES};
use parkline_core::id::RideType;
use parkline_core::registry::VehicleColour;
use serde::{Deserialize, Serialize};

/// One track piece of a design, relative to the placement origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTrackPiece {
    /// Tile offset along x.
    pub x: i32,
    /// Tile offset along y.
    pub y: i32,
    /// Height offset in map units.
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub piece: u8,
}

/// A scenery object shipped with a design, relative to the placement origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignScenery {
    /// Name of the scenery object; may not be loaded in the current park.
    pub object: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
}

/// A saved ride layout with its operating configuration.
///
/// Read-only input to track placement; never mutated by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDesign {
    pub name: String,
    pub ride_type: RideType,
    /// Name of the vehicle object the design was saved with.
    pub vehicle_object: String,
    #[serde(default)]
    pub ride_mode: u8,
    #[serde(default)]
    pub colour_scheme: u8,
    #[serde(default)]
    pub entrance_style: u8,
    #[serde(default)]
    pub depart_flags: u8,
    #[serde(default = "default_one")]
    pub number_of_trains: u8,
    #[serde(default = "default_one")]
    pub number_of_cars_per_train: u8,
    #[serde(default)]
    pub min_waiting_time: u8,
    #[serde(default)]
    pub max_waiting_time: u8,
    #[serde(default)]
    pub operation_setting: u8,
    /// Lift hill speed in the low 5 bits; upper bits are reserved.
    #[serde(default)]
    pub lift_hill_speed: u8,
    /// Zero in older designs means "one circuit".
    #[serde(default)]
    pub num_circuits: u8,
    #[serde(default)]
    pub track_spine_colour: [u8; NUM_COLOUR_SCHEMES],
    #[serde(default)]
    pub track_rail_colour: [u8; NUM_COLOUR_SCHEMES],
    #[serde(default)]
    pub track_support_colour: [u8; NUM_COLOUR_SCHEMES],
    /// Per-vehicle colours; missing slots keep the default colour.
    #[serde(default)]
    pub vehicle_colours: Vec<VehicleColour>,
    pub track: Vec<DesignTrackPiece>,
    #[serde(default)]
    pub scenery: Vec<DesignScenery>,
}

fn default_one() -> u8 {
    1
}

impl TrackDesign {
    /// Vehicle colour for slot `i`, or the default colour if the design has none.
    pub fn vehicle_colour(&self, i: usize) -> VehicleColour {
        if i >= MAX_VEHICLES_PER_RIDE {
            return VehicleColour::default();
        }
        self.vehicle_colours.get(i).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> TrackDesign {
        TrackDesign {
            name: "Loop".to_string(),
            ride_type: RideType(1),
            vehicle_object: "wooden_cars".to_string(),
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
            track_spine_colour: [0; NUM_COLOUR_SCHEMES],
            track_rail_colour: [0; NUM_COLOUR_SCHEMES],
            track_support_colour: [0; NUM_COLOUR_SCHEMES],
            vehicle_colours: vec![VehicleColour {
                body: 7,
                trim: 8,
                ternary: 9,
            }],
            track: vec![DesignTrackPiece {
                x: 0,
                y: 0,
                z: 0,
                piece: 0,
            }],
            scenery: Vec::new(),
        }
    }

    #[test]
    fn vehicle_colour_defaults_missing_slots() {
        let d = design();
        assert_eq!(d.vehicle_colour(0).body, 7);
        assert_eq!(d.vehicle_colour(1), VehicleColour::default());
        assert_eq!(d.vehicle_colour(MAX_VEHICLES_PER_RIDE), VehicleColour::default());
    }
}
