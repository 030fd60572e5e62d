use crate::action::GameAction;
use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::{ActionError, ExpenditureType, GameActionResult, Rejection};
use parkline_core::id::RideId;
use parkline_core::strings::StringId;
use serde::{Deserialize, Serialize};

/// Rename a ride. Names must be non-empty and unique across the park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideSetNameAction {
    ride: RideId,
    name: String,
    flags: ActionFlags,
}

impl RideSetNameAction {
    pub fn new(ride: RideId, name: impl Into<String>) -> Self {
        Self {
            ride,
            name: name.into(),
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), Rejection> {
        let reject = |message| {
            Rejection::new(ActionError::InvalidParameters, StringId::CantRenameRide, message)
        };
        if !ctx.world.rides.contains(self.ride) {
            return Err(reject(StringId::RideNotFound));
        }
        if self.name.trim().is_empty() {
            return Err(reject(StringId::InvalidRideName));
        }
        if ctx.world.rides.name_in_use(&self.name, Some(self.ride)) {
            return Err(reject(StringId::RideNameAlreadyInUse));
        }
        Ok(())
    }

    fn base_result() -> GameActionResult {
        GameActionResult::new(ExpenditureType::RideConstruction, StringId::CantRenameRide)
    }
}

impl GameAction for RideSetNameAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: ActionFlags) {
        self.flags = flags;
    }

    fn allowed_while_paused(&self) -> bool {
        true
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult {
        Self::base_result().finish(self.validate(ctx))
    }

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult {
        let outcome = self.validate(ctx).map(|()| {
            if let Some(ride) = ctx.world.rides.get_mut(self.ride) {
                ride.name = self.name.clone();
            }
        });
        Self::base_result().finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn renames_ride() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        assert!(RideSetNameAction::new(ride, "Skyway").execute(&mut ctx).is_ok());
        assert_eq!(ctx.world.rides.get(ride).unwrap().name, "Skyway");
        // Renaming to its own name is fine.
        assert!(RideSetNameAction::new(ride, "Skyway").query(&ctx).is_ok());
    }

    #[test]
    fn empty_and_duplicate_names_rejected() {
        let mut ctx = standard_context();
        let a = create_monorail(&mut ctx);
        let b = create_monorail(&mut ctx);
        RideSetNameAction::new(a, "Skyway").execute(&mut ctx);

        let result = RideSetNameAction::new(b, "  ").execute(&mut ctx);
        assert_eq!(result.error_message, StringId::InvalidRideName);
        let result = RideSetNameAction::new(b, "Skyway").execute(&mut ctx);
        assert_eq!(result.error_message, StringId::RideNameAlreadyInUse);
        assert_ne!(ctx.world.rides.get(b).unwrap().name, "Skyway");
    }
}
