use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a ride in the ride registry. Stale after the ride is demolished.
    pub struct RideId;
}

/// Raw parameter value meaning "leave this style unchanged".
pub const STYLE_UNCHANGED: u8 = 0xFF;

/// Identifies a loaded terrain surface object. Valid range is `0..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceStyle(pub u8);

impl SurfaceStyle {
    pub const MAX: u8 = 0x1F;

    /// Returns true if the raw value is inside the surface style range.
    pub fn in_range(self) -> bool {
        self.0 <= Self::MAX
    }
}

/// Identifies a loaded terrain edge object. Valid range is `0..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeStyle(pub u8);

impl EdgeStyle {
    pub const MAX: u8 = 0x0F;

    pub fn in_range(self) -> bool {
        self.0 <= Self::MAX
    }
}

/// Decode a raw style parameter: [`STYLE_UNCHANGED`] becomes `None`.
pub fn decode_style<T>(raw: u8, wrap: impl FnOnce(u8) -> T) -> Option<T> {
    if raw == STYLE_UNCHANGED {
        None
    } else {
        Some(wrap(raw))
    }
}

/// Index of a loaded ride (vehicle) entry in the object registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideEntryIndex(pub u16);

/// The ride type a track design or ride entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideType(pub u8);

/// Variant group within a ride type. Entries sharing a group are
/// interchangeable for track design placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideGroupIndex(pub u8);

/// Index of a loaded scenery object in the object registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneryIndex(pub u16);
