use serde::{Deserialize, Serialize};

/// Localizable message identifiers carried by action results.
///
/// The UI resolves these against the active language pack; the action core
/// only ever passes them around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StringId {
    #[default]
    None,
    CantChangeLandType,
    ForbiddenByTheLocalAuthority,
    ConstructionNotPossibleWhileGameIsPaused,
    CantCreateNewRideAttraction,
    TooManyRides,
    InvalidRideEntry,
    CantPlaceTrackDesign,
    OffEdgeOfMap,
    LandNotOwnedByPark,
    CanOnlyBuildThisAboveGround,
    TooHigh,
    TrackInTheWay,
    SceneryUnavailable,
    CantChangeOperatingMode,
    CantChangeRideVehicles,
    InvalidValue,
    CantRenameRide,
    InvalidRideName,
    RideNameAlreadyInUse,
    CantDemolishRide,
    RideNotFound,
}
