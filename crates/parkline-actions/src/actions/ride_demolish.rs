use crate::action::GameAction;
use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::{ActionError, ExpenditureType, GameActionResult, Rejection};
use log::debug;
use parkline_core::id::RideId;
use parkline_core::strings::StringId;
use serde::{Deserialize, Serialize};

/// Remove a ride and every track element it owns. Its id never resolves
/// again afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideDemolishAction {
    ride: RideId,
    flags: ActionFlags,
}

impl RideDemolishAction {
    pub fn new(ride: RideId) -> Self {
        Self {
            ride,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), Rejection> {
        if !ctx.world.rides.contains(self.ride) {
            return Err(Rejection::new(
                ActionError::InvalidParameters,
                StringId::CantDemolishRide,
                StringId::RideNotFound,
            ));
        }
        Ok(())
    }

    fn base_result() -> GameActionResult {
        GameActionResult::new(ExpenditureType::RideConstruction, StringId::CantDemolishRide)
    }
}

impl GameAction for RideDemolishAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: ActionFlags) {
        self.flags = flags;
    }

    fn paused_result(&self) -> GameActionResult {
        Self::base_result().finish(Err(Rejection::paused()))
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult {
        Self::base_result().finish(self.validate(ctx))
    }

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult {
        let outcome = self.validate(ctx).and_then(|()| {
            let removed = ctx.world.map.remove_ride_elements(self.ride);
            ctx.world.rides.demolish(self.ride).map_err(|e| {
                Rejection::new(ActionError::Unknown, StringId::CantDemolishRide, e.reason())
            })?;
            debug!("demolished ride {:?} and {removed} track elements", self.ride);
            Ok(())
        });
        Self::base_result().finish(outcome)
    }
}
