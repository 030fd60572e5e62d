use crate::fixed::Money;
use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Object categories the registry can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    TerrainSurface,
    TerrainEdge,
    RideEntry,
    Scenery,
}

/// A terrain surface object (grass, sand, dirt...).
#[derive(Debug, Clone)]
pub struct TerrainSurfaceDef {
    pub name: String,
    /// Price charged per tile when a tile is changed to this surface.
    pub price: Money,
    /// Whether grass grows on this surface.
    pub can_grow: bool,
}

/// A terrain edge object (rock, wood, brick...).
#[derive(Debug, Clone)]
pub struct TerrainEdgeDef {
    pub name: String,
}

/// Body/trim/ternary colour triple for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VehicleColour {
    pub body: u8,
    pub trim: u8,
    pub ternary: u8,
}

/// A loaded ride (vehicle) entry.
#[derive(Debug, Clone)]
pub struct RideEntryDef {
    pub name: String,
    pub ride_type: RideType,
    /// Variant group, for ride types that group their entries.
    pub ride_group: Option<RideGroupIndex>,
    pub preset_colours: Vec<VehicleColour>,
    pub min_cars_per_train: u8,
    pub max_cars_per_train: u8,
}

impl RideEntryDef {
    pub fn new(name: &str, ride_type: RideType) -> Self {
        Self {
            name: name.to_string(),
            ride_type,
            ride_group: None,
            preset_colours: vec![VehicleColour::default()],
            min_cars_per_train: 1,
            max_cars_per_train: 8,
        }
    }
}

/// A loaded scenery object placed alongside track designs.
#[derive(Debug, Clone)]
pub struct SceneryDef {
    pub name: String,
    pub price: Money,
}

/// An installed ride object, loaded or not. Used to find the variant group
/// of an entry that a track design references but the park has not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryItem {
    pub name: String,
    pub ride_type: RideType,
    pub ride_group: Option<RideGroupIndex>,
}

/// Builder for constructing an immutable [`ObjectRegistry`].
#[derive(Debug, Default)]
pub struct ObjectRegistryBuilder {
    surfaces: Vec<TerrainSurfaceDef>,
    edges: Vec<TerrainEdgeDef>,
    ride_entries: Vec<RideEntryDef>,
    scenery: Vec<SceneryDef>,
    repository: Vec<RepositoryItem>,
}

impl ObjectRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a terrain surface. Returns its style id.
    pub fn register_surface(&mut self, name: &str, price: Money, can_grow: bool) -> SurfaceStyle {
        let id = SurfaceStyle(self.surfaces.len() as u8);
        self.surfaces.push(TerrainSurfaceDef {
            name: name.to_string(),
            price,
            can_grow,
        });
        id
    }

    /// Register a terrain edge. Returns its style id.
    pub fn register_edge(&mut self, name: &str) -> EdgeStyle {
        let id = EdgeStyle(self.edges.len() as u8);
        self.edges.push(TerrainEdgeDef {
            name: name.to_string(),
        });
        id
    }

    /// Register a loaded ride entry. It is also recorded in the repository.
    pub fn register_ride_entry(&mut self, def: RideEntryDef) -> RideEntryIndex {
        let id = RideEntryIndex(self.ride_entries.len() as u16);
        self.repository.push(RepositoryItem {
            name: def.name.clone(),
            ride_type: def.ride_type,
            ride_group: def.ride_group,
        });
        self.ride_entries.push(def);
        id
    }

    /// Record an installed-but-unloaded ride object.
    pub fn register_repository_item(&mut self, item: RepositoryItem) {
        self.repository.push(item);
    }

    /// Register a scenery object. Returns its index.
    pub fn register_scenery(&mut self, name: &str, price: Money) -> SceneryIndex {
        let id = SceneryIndex(self.scenery.len() as u16);
        self.scenery.push(SceneryDef {
            name: name.to_string(),
            price,
        });
        id
    }

    /// Finalize and build the immutable registry.
    pub fn build(self) -> Result<ObjectRegistry, RegistryError> {
        if self.surfaces.len() > SurfaceStyle::MAX as usize + 1 {
            return Err(RegistryError::TooManyObjects {
                category: ObjectCategory::TerrainSurface,
                limit: SurfaceStyle::MAX as usize + 1,
            });
        }
        if self.edges.len() > EdgeStyle::MAX as usize + 1 {
            return Err(RegistryError::TooManyObjects {
                category: ObjectCategory::TerrainEdge,
                limit: EdgeStyle::MAX as usize + 1,
            });
        }

        let mut ride_entry_by_name = HashMap::new();
        for (i, entry) in self.ride_entries.iter().enumerate() {
            if ride_entry_by_name
                .insert(entry.name.clone(), RideEntryIndex(i as u16))
                .is_some()
            {
                return Err(RegistryError::DuplicateName(entry.name.clone()));
            }
        }
        let mut scenery_by_name = HashMap::new();
        for (i, def) in self.scenery.iter().enumerate() {
            if scenery_by_name
                .insert(def.name.clone(), SceneryIndex(i as u16))
                .is_some()
            {
                return Err(RegistryError::DuplicateName(def.name.clone()));
            }
        }

        Ok(ObjectRegistry {
            surfaces: self.surfaces,
            edges: self.edges,
            ride_entries: self.ride_entries,
            ride_entry_by_name,
            scenery: self.scenery,
            scenery_by_name,
            repository: self.repository,
        })
    }
}

/// Immutable registry of loaded objects. Frozen after build().
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    surfaces: Vec<TerrainSurfaceDef>,
    edges: Vec<TerrainEdgeDef>,
    ride_entries: Vec<RideEntryDef>,
    ride_entry_by_name: HashMap<String, RideEntryIndex>,
    scenery: Vec<SceneryDef>,
    scenery_by_name: HashMap<String, SceneryIndex>,
    repository: Vec<RepositoryItem>,
}

impl ObjectRegistry {
    /// Returns true if an object of the given category is loaded at `index`.
    pub fn is_loaded(&self, category: ObjectCategory, index: u16) -> bool {
        let index = index as usize;
        match category {
            ObjectCategory::TerrainSurface => index < self.surfaces.len(),
            ObjectCategory::TerrainEdge => index < self.edges.len(),
            ObjectCategory::RideEntry => index < self.ride_entries.len(),
            ObjectCategory::Scenery => index < self.scenery.len(),
        }
    }

    pub fn surface(&self, style: SurfaceStyle) -> Option<&TerrainSurfaceDef> {
        self.surfaces.get(style.0 as usize)
    }

    pub fn edge(&self, style: EdgeStyle) -> Option<&TerrainEdgeDef> {
        self.edges.get(style.0 as usize)
    }

    pub fn ride_entry(&self, index: RideEntryIndex) -> Option<&RideEntryDef> {
        self.ride_entries.get(index.0 as usize)
    }

    /// Find a loaded ride entry by object name.
    pub fn ride_entry_by_name(&self, name: &str) -> Option<RideEntryIndex> {
        self.ride_entry_by_name.get(name).copied()
    }

    /// Loaded entries of the given ride type, in registry order.
    pub fn ride_entries_for_type(
        &self,
        ride_type: RideType,
    ) -> impl Iterator<Item = (RideEntryIndex, &RideEntryDef)> {
        self.ride_entries
            .iter()
            .enumerate()
            .filter(move |(_, def)| def.ride_type == ride_type)
            .map(|(i, def)| (RideEntryIndex(i as u16), def))
    }

    /// Whether any installed object of this ride type declares a variant group.
    pub fn ride_type_has_groups(&self, ride_type: RideType) -> bool {
        self.repository
            .iter()
            .any(|item| item.ride_type == ride_type && item.ride_group.is_some())
    }

    /// Look up an installed ride object by name, loaded or not.
    pub fn repository_item(&self, name: &str) -> Option<&RepositoryItem> {
        self.repository.iter().find(|item| item.name == name)
    }

    pub fn scenery(&self, index: SceneryIndex) -> Option<&SceneryDef> {
        self.scenery.get(index.0 as usize)
    }

    pub fn scenery_by_name(&self, name: &str) -> Option<SceneryIndex> {
        self.scenery_by_name.get(name).copied()
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn ride_entry_count(&self) -> usize {
        self.ride_entries.len()
    }

    pub fn scenery_count(&self) -> usize {
        self.scenery.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate object name: {0}")]
    DuplicateName(String),
    #[error("too many {category:?} objects (limit {limit})")]
    TooManyObjects {
        category: ObjectCategory,
        limit: usize,
    },
}
