//! The value every action returns, and the typed error codes it carries.

use parkline_core::fixed::Money;
use parkline_core::id::RideId;
use parkline_core::strings::StringId;
use parkline_map::CoordsXYZ;
use serde::{Deserialize, Serialize};

/// Typed failure code of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ActionError {
    #[error("invalid parameters")]
    InvalidParameters,
    #[error("disallowed")]
    Disallowed,
    #[error("game is paused")]
    GamePaused,
    #[error("no free elements")]
    NoFreeElements,
    #[error("unknown error")]
    Unknown,
}

/// Budget line an action's cost is booked under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ExpenditureType {
    #[default]
    Landscaping,
    RideConstruction,
}

/// A rejection raised inside an action, converted into a populated
/// [`GameActionResult`] at the action boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub error: ActionError,
    pub title: StringId,
    pub message: StringId,
}

impl Rejection {
    pub fn new(error: ActionError, title: StringId, message: StringId) -> Self {
        Self {
            error,
            title,
            message,
        }
    }

    /// Construction attempted while the game is paused.
    pub fn paused() -> Self {
        Self::new(
            ActionError::GamePaused,
            StringId::ConstructionNotPossibleWhileGameIsPaused,
            StringId::None,
        )
    }
}

/// Outcome of a query or execute.
///
/// Always fully populated: fields known before a failure (position,
/// expenditure, title) are kept when the action is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameActionResult {
    pub error: Option<ActionError>,
    pub error_title: StringId,
    pub error_message: StringId,
    pub position: Option<CoordsXYZ>,
    pub cost: Money,
    pub expenditure: ExpenditureType,
    /// Ride created by the action, if any.
    pub ride: Option<RideId>,
}

impl Default for GameActionResult {
    fn default() -> Self {
        Self {
            error: None,
            error_title: StringId::None,
            error_message: StringId::None,
            position: None,
            cost: Money::ZERO,
            expenditure: ExpenditureType::default(),
            ride: None,
        }
    }
}

impl GameActionResult {
    pub fn new(expenditure: ExpenditureType, error_title: StringId) -> Self {
        Self {
            expenditure,
            error_title,
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Record a rejection. Position and expenditure are left as they are.
    pub fn reject(&mut self, rejection: Rejection) {
        self.error = Some(rejection.error);
        self.error_title = rejection.title;
        self.error_message = rejection.message;
    }

    /// Fold the outcome of an action body into this result.
    pub fn finish(mut self, outcome: Result<(), Rejection>) -> Self {
        if let Err(rejection) = outcome {
            self.reject(rejection);
        }
        self
    }
}
