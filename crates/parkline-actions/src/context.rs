//! The explicit context every action runs against.
//!
//! [`World`] is the mutable, replicated game state. [`GameContext`] adds
//! the loaded objects and the track placement engine, which are fixed for
//! the lifetime of a scenario.

use crate::config::{Cheats, ParkFlags, ScenarioConfig, ScreenMode};
use crate::result::ExpenditureType;
use log::warn;
use parkline_core::fixed::{Money, money};
use parkline_core::hash::StateHash;
use parkline_core::id::{EdgeStyle, RideEntryIndex, SurfaceStyle};
use parkline_core::registry::ObjectRegistry;
use parkline_map::{Ownership, SurfaceElement, TileMap};
use parkline_ride::{PlacementPricing, Research, RideRegistry, TrackPlacer, VirtualTrackPlacer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding a world snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Finances
// ---------------------------------------------------------------------------

/// Park cash and spending per budget line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finances {
    cash: Money,
    spent: BTreeMap<ExpenditureType, Money>,
}

impl Finances {
    pub fn new(cash: Money) -> Self {
        Self {
            cash,
            spent: BTreeMap::new(),
        }
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    pub fn spent(&self, category: ExpenditureType) -> Money {
        self.spent.get(&category).copied().unwrap_or(Money::ZERO)
    }

    /// Charge `amount` under `category`. Negative amounts are refunds.
    pub fn spend(&mut self, category: ExpenditureType, amount: Money) {
        self.cash = self.cash.saturating_sub(amount);
        let line = self.spent.entry(category).or_insert(Money::ZERO);
        *line = line.saturating_add(amount);
    }

    fn hash_into(&self, h: &mut StateHash) {
        h.write_money(self.cash);
        for (category, amount) in &self.spent {
            h.write_u8(*category as u8);
            h.write_money(*amount);
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Replicated game state mutated by actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub map: TileMap,
    pub rides: RideRegistry,
    pub research: Research,
    pub park: ParkFlags,
    pub cheats: Cheats,
    pub screen_mode: ScreenMode,
    pub paused: bool,
    pub finances: Finances,
}

impl World {
    /// A world over `map` with no rides, default flags and no cash.
    pub fn new(map: TileMap) -> Self {
        Self {
            map,
            rides: RideRegistry::new(),
            research: Research::new(),
            park: ParkFlags::default(),
            cheats: Cheats::default(),
            screen_mode: ScreenMode::default(),
            paused: false,
            finances: Finances::default(),
        }
    }

    /// Editor and sandbox mode bypass park restrictions and ownership.
    pub fn is_editor_or_sandbox(&self) -> bool {
        self.screen_mode == ScreenMode::ScenarioEditor || self.cheats.sandbox_mode
    }

    /// Whether construction is blocked by the pause state.
    pub fn is_paused_for_construction(&self) -> bool {
        self.paused && !self.cheats.build_while_paused
    }

    /// Deterministic hash of everything peers must agree on.
    ///
    /// Redraw tracking is excluded.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        self.map.hash_into(&mut h);
        self.rides.hash_into(&mut h);
        self.research.hash_into(&mut h);
        h.write_bool(self.park.forbid_landscape_changes);
        h.write_bool(self.park.no_money);
        h.write_bool(self.paused);
        self.finances.hash_into(&mut h);
        h.finish()
    }

    /// Serialize to bytes using bitcode.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        bitcode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Restore a world from [`snapshot`](Self::snapshot) bytes.
    pub fn restore(data: &[u8]) -> Result<Self, SnapshotError> {
        bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// GameContext
// ---------------------------------------------------------------------------

/// Everything an action may read or mutate.
///
/// Queries take `&GameContext` and executes take `&mut GameContext`.
pub struct GameContext {
    pub objects: ObjectRegistry,
    pub world: World,
    pub placer: Box<dyn TrackPlacer>,
}

impl GameContext {
    /// A context using the default track placer.
    pub fn new(objects: ObjectRegistry, world: World) -> Self {
        Self::with_placer(objects, world, Box::new(VirtualTrackPlacer::default()))
    }

    pub fn with_placer(objects: ObjectRegistry, world: World, placer: Box<dyn TrackPlacer>) -> Self {
        Self {
            objects,
            world,
            placer,
        }
    }

    /// Build a fresh scenario: flat terrain of the first surface and edge
    /// objects, scenario flags and cash, and the configured inventions.
    pub fn from_config(objects: ObjectRegistry, config: &ScenarioConfig) -> Self {
        let ownership = if config.park_owns_land {
            Ownership::Owned
        } else {
            Ownership::Unowned
        };
        let surface = SurfaceElement::new(SurfaceStyle(0), EdgeStyle(0), config.terrain_height)
            .with_ownership(ownership);
        let map_size = config.clamped_map_size();
        if map_size != config.map_size {
            warn!("map size {} out of range, using {map_size}", config.map_size);
        }
        let mut world = World::new(TileMap::with_flat_terrain(map_size, surface));
        world.park = config.park;
        world.cheats = config.cheats;
        world.screen_mode = config.screen_mode;
        world.paused = config.paused;
        world.finances = Finances::new(money(config.starting_cash));

        for name in &config.invented_ride_entries {
            match objects.ride_entry_by_name(name) {
                Some(entry) => {
                    world.research.invent(entry);
                }
                None => warn!("invented ride entry '{name}' is not loaded"),
            }
        }

        let placer = VirtualTrackPlacer::new(PlacementPricing {
            piece_price: money(config.pricing.track_piece),
            support_price: money(config.pricing.track_support),
        });
        Self::with_placer(objects, world, Box::new(placer))
    }

    /// Whether a ride entry can be used: invented, or research is ignored.
    pub fn is_entry_available(&self, entry: RideEntryIndex) -> bool {
        self.world.cheats.ignore_research_status || self.world.research.is_invented(entry)
    }
}
