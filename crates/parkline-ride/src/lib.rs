//! Rides: the ride registry, research availability, track design
//! descriptors, and placement of designs onto the map.

pub mod design;
pub mod placement;
pub mod research;
pub mod ride;

pub use design::{DesignScenery, DesignTrackPiece, TrackDesign};
pub use placement::{
    CommitMode, PlacementError, PlacementPricing, PlacementRequest, TrackPlacer,
    VirtualTrackPlacer,
};
pub use research::Research;
pub use ride::{Ride, RideError, RidePreview, RideRegistry};
