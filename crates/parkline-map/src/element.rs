//! Typed tile elements stacked on each map tile.

use parkline_core::hash::StateHash;
use parkline_core::id::{EdgeStyle, RideId, SceneryIndex, SurfaceStyle};
use serde::{Deserialize, Serialize};
use slotmap::Key;

/// Fully cut grass. Only the low three bits of the grass length are the stage.
pub const GRASS_LENGTH_CLEAR_0: u8 = 0;

const GRASS_STAGE_MASK: u8 = 0x07;

/// Who owns the land under a surface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ownership {
    #[default]
    Unowned,
    Owned,
    ConstructionRightsOwned,
}

/// The ground of a tile. Owned by the map; mutated through setters only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceElement {
    surface_style: SurfaceStyle,
    edge_style: EdgeStyle,
    grass_length: u8,
    base_height: u8,
    ownership: Ownership,
}

impl SurfaceElement {
    pub fn new(surface_style: SurfaceStyle, edge_style: EdgeStyle, base_height: u8) -> Self {
        Self {
            surface_style,
            edge_style,
            grass_length: GRASS_LENGTH_CLEAR_0,
            base_height,
            ownership: Ownership::Unowned,
        }
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        self.surface_style
    }

    pub fn set_surface_style(&mut self, style: SurfaceStyle) {
        self.surface_style = style;
    }

    pub fn edge_style(&self) -> EdgeStyle {
        self.edge_style
    }

    pub fn set_edge_style(&mut self, style: EdgeStyle) {
        self.edge_style = style;
    }

    pub fn grass_length(&self) -> u8 {
        self.grass_length
    }

    pub fn set_grass_length(&mut self, length: u8) {
        self.grass_length = length;
    }

    /// Growth stage of the grass, ignoring the sub-stage counter bits.
    pub fn grass_stage(&self) -> u8 {
        self.grass_length & GRASS_STAGE_MASK
    }

    pub fn base_height(&self) -> u8 {
        self.base_height
    }

    pub fn set_base_height(&mut self, height: u8) {
        self.base_height = height;
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn set_ownership(&mut self, ownership: Ownership) {
        self.ownership = ownership;
    }

    fn hash_into(&self, h: &mut StateHash) {
        h.write_u8(self.surface_style.0);
        h.write_u8(self.edge_style.0);
        h.write_u8(self.grass_length);
        h.write_u8(self.base_height);
        h.write_u8(self.ownership as u8);
    }
}

/// One piece of a ride's track occupying a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackElement {
    pub ride: RideId,
    pub piece: u8,
    pub base_height: u8,
    pub ghost: bool,
}

/// A scenery object placed on a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneryElement {
    pub object: SceneryIndex,
    pub base_height: u8,
    pub ghost: bool,
}

/// A typed element in a tile's stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileElement {
    Surface(SurfaceElement),
    Track(TrackElement),
    Scenery(SceneryElement),
}

impl TileElement {
    pub fn as_surface(&self) -> Option<&SurfaceElement> {
        match self {
            TileElement::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_surface_mut(&mut self) -> Option<&mut SurfaceElement> {
        match self {
            TileElement::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&TrackElement> {
        match self {
            TileElement::Track(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_ghost(&self) -> bool {
        match self {
            TileElement::Surface(_) => false,
            TileElement::Track(t) => t.ghost,
            TileElement::Scenery(s) => s.ghost,
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StateHash) {
        match self {
            TileElement::Surface(s) => {
                h.write_u8(0);
                s.hash_into(h);
            }
            TileElement::Track(t) => {
                h.write_u8(1);
                h.write_u64(t.ride.data().as_ffi());
                h.write_u8(t.piece);
                h.write_u8(t.base_height);
                h.write_bool(t.ghost);
            }
            TileElement::Scenery(s) => {
                h.write_u8(2);
                h.write_u32(s.object.0 as u32);
                h.write_u8(s.base_height);
                h.write_bool(s.ghost);
            }
        }
    }
}
