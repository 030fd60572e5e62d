//! Scenario configuration: everything needed to build a [`GameContext`]
//! besides the loaded objects.
//!
//! [`GameContext`]: crate::context::GameContext

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Map sizes a scenario may ask for, in tiles along one axis. The two
/// border rows leave at least one editable tile at the minimum.
pub const MAP_SIZE_RANGE: RangeInclusive<i32> = 3..=256;

/// Which screen the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenMode {
    #[default]
    Playing,
    ScenarioEditor,
}

/// Restrictions the scenario places on the park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkFlags {
    pub forbid_landscape_changes: bool,
    /// Nothing costs money; executed actions are never charged.
    pub no_money: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cheats {
    pub sandbox_mode: bool,
    pub build_while_paused: bool,
    pub ignore_research_status: bool,
}

/// Construction prices for the default track placer, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub track_piece: i32,
    /// Per support segment under an elevated piece.
    pub track_support: i32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            track_piece: 30,
            track_support: 5,
        }
    }
}

/// Top-level scenario configuration. Every field has a default so partial
/// files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Map size in tiles along one axis, border included. Must lie in
    /// [`MAP_SIZE_RANGE`]; [`GameContext::from_config`] clamps it.
    ///
    /// [`GameContext::from_config`]: crate::context::GameContext::from_config
    pub map_size: i32,
    /// Base height of the generated flat terrain, in height steps.
    pub terrain_height: u8,
    /// Whether the park owns all generated land.
    pub park_owns_land: bool,
    pub screen_mode: ScreenMode,
    pub paused: bool,
    pub park: ParkFlags,
    pub cheats: Cheats,
    /// Starting cash in whole currency units.
    pub starting_cash: i32,
    /// Names of ride entries already invented when the scenario starts.
    pub invented_ride_entries: Vec<String>,
    pub pricing: PricingConfig,
}

impl ScenarioConfig {
    /// The map size pulled into [`MAP_SIZE_RANGE`].
    pub fn clamped_map_size(&self) -> i32 {
        self.map_size.clamp(*MAP_SIZE_RANGE.start(), *MAP_SIZE_RANGE.end())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map_size: 256,
            terrain_height: 14,
            park_owns_land: true,
            screen_mode: ScreenMode::default(),
            paused: false,
            park: ParkFlags::default(),
            cheats: Cheats::default(),
            starting_cash: 10_000,
            invented_ride_entries: Vec::new(),
            pricing: PricingConfig::default(),
        }
    }
}
