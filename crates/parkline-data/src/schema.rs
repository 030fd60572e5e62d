//! Serde data file structs for park object definitions.
//!
//! These define the on-disk format of `objects.{ron,toml,json}`. Prices are
//! whole currency units; ids are assigned in file order when the
//! definitions are registered.

use parkline_core::registry::VehicleColour;
use serde::Deserialize;

// ===========================================================================
// Terrain
// ===========================================================================

/// A terrain surface definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SurfaceData {
    pub name: String,
    #[serde(default)]
    pub price: i32,
    #[serde(default = "default_true")]
    pub can_grow: bool,
}

fn default_true() -> bool {
    true
}

/// A terrain edge definition.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeData {
    pub name: String,
}

// ===========================================================================
// Rides
// ===========================================================================

/// A loaded ride (vehicle) entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RideEntryData {
    pub name: String,
    pub ride_type: u8,
    #[serde(default)]
    pub ride_group: Option<u8>,
    /// Preset vehicle colours. An empty list gets one default colour.
    #[serde(default)]
    pub preset_colours: Vec<VehicleColour>,
    #[serde(default = "default_min_cars")]
    pub min_cars_per_train: u8,
    #[serde(default = "default_max_cars")]
    pub max_cars_per_train: u8,
}

fn default_min_cars() -> u8 {
    1
}

fn default_max_cars() -> u8 {
    8
}

/// An installed ride object that is not loaded into the park.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryData {
    pub name: String,
    pub ride_type: u8,
    #[serde(default)]
    pub ride_group: Option<u8>,
}

// ===========================================================================
// Scenery
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SceneryData {
    pub name: String,
    #[serde(default)]
    pub price: i32,
}

// ===========================================================================
// Objects file
// ===========================================================================

/// Top-level contents of an objects file. Every list may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObjectsData {
    pub surfaces: Vec<SurfaceData>,
    pub edges: Vec<EdgeData>,
    pub ride_entries: Vec<RideEntryData>,
    pub repository: Vec<RepositoryData>,
    pub scenery: Vec<SceneryData>,
}
