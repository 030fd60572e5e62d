use crate::action::GameAction;
use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::{ActionError, ExpenditureType, GameActionResult, Rejection};
use parkline_core::id::RideId;
use parkline_core::strings::StringId;
use parkline_ride::ride::{InspectionInterval, MAX_CIRCUITS, Ride};
use serde::{Deserialize, Serialize};

/// Number of operating modes a ride can be set to.
pub const RIDE_MODE_COUNT: u8 = 37;

/// Upper bound for either waiting time, in seconds.
pub const MAX_WAITING_TIME: u8 = 250;

/// Lift hill speeds fit in five bits.
pub const MAX_LIFT_HILL_SPEED: u8 = 0x1F;

/// Operating setting changed by [`RideSetSettingAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RideSetting {
    Mode,
    Departure,
    MinWaitingTime,
    MaxWaitingTime,
    Operation,
    InspectionInterval,
    LiftHillSpeed,
    NumCircuits,
}

/// Change one operating setting of an existing ride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideSetSettingAction {
    ride: RideId,
    setting: RideSetting,
    value: u8,
    flags: ActionFlags,
}

fn inspection_interval(value: u8) -> Option<InspectionInterval> {
    Some(match value {
        0 => InspectionInterval::Every10Minutes,
        1 => InspectionInterval::Every20Minutes,
        2 => InspectionInterval::Every30Minutes,
        3 => InspectionInterval::Every45Minutes,
        4 => InspectionInterval::EveryHour,
        5 => InspectionInterval::Every2Hours,
        6 => InspectionInterval::Never,
        _ => return None,
    })
}

impl RideSetSettingAction {
    pub fn new(ride: RideId, setting: RideSetting, value: u8) -> Self {
        Self {
            ride,
            setting,
            value,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn validate(&self, ctx: &GameContext) -> Result<(), Rejection> {
        let reject = |message| {
            Rejection::new(
                ActionError::InvalidParameters,
                StringId::CantChangeOperatingMode,
                message,
            )
        };
        if !ctx.world.rides.contains(self.ride) {
            return Err(reject(StringId::RideNotFound));
        }
        let valid = match self.setting {
            RideSetting::Mode => self.value < RIDE_MODE_COUNT,
            RideSetting::Departure | RideSetting::Operation => true,
            RideSetting::MinWaitingTime | RideSetting::MaxWaitingTime => {
                self.value <= MAX_WAITING_TIME
            }
            RideSetting::InspectionInterval => inspection_interval(self.value).is_some(),
            RideSetting::LiftHillSpeed => self.value <= MAX_LIFT_HILL_SPEED,
            RideSetting::NumCircuits => (1..=MAX_CIRCUITS).contains(&self.value),
        };
        if !valid {
            return Err(reject(StringId::InvalidValue));
        }
        Ok(())
    }

    fn apply(&self, ride: &mut Ride) {
        let value = self.value;
        match self.setting {
            RideSetting::Mode => ride.mode = value,
            RideSetting::Departure => ride.depart_flags = value,
            RideSetting::MinWaitingTime => {
                ride.min_waiting_time = value;
                ride.max_waiting_time = ride.max_waiting_time.max(value);
            }
            RideSetting::MaxWaitingTime => {
                ride.max_waiting_time = value;
                ride.min_waiting_time = ride.min_waiting_time.min(value);
            }
            RideSetting::Operation => ride.operation_option = value,
            RideSetting::InspectionInterval => {
                if let Some(interval) = inspection_interval(value) {
                    ride.inspection_interval = interval;
                }
            }
            RideSetting::LiftHillSpeed => ride.lift_hill_speed = value,
            RideSetting::NumCircuits => ride.num_circuits = value,
        }
    }

    fn base_result() -> GameActionResult {
        GameActionResult::new(
            ExpenditureType::RideConstruction,
            StringId::CantChangeOperatingMode,
        )
    }
}

impl GameAction for RideSetSettingAction {
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
        let outcome = self.validate(ctx).and_then(|()| {
            let ride = ctx.world.rides.get_mut(self.ride).ok_or(Rejection::new(
                ActionError::InvalidParameters,
                StringId::CantChangeOperatingMode,
                StringId::RideNotFound,
            ))?;
            self.apply(ride);
            Ok(())
        });
        Self::base_result().finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn sets_mode_and_circuits() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        assert!(RideSetSettingAction::new(ride, RideSetting::Mode, 3).execute(&mut ctx).is_ok());
        assert!(
            RideSetSettingAction::new(ride, RideSetting::NumCircuits, 4)
                .execute(&mut ctx)
                .is_ok()
        );
        let r = ctx.world.rides.get(ride).unwrap();
        assert_eq!(r.mode, 3);
        assert_eq!(r.num_circuits, 4);
    }

    #[test]
    fn zero_circuits_rejected() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        let result = RideSetSettingAction::new(ride, RideSetting::NumCircuits, 0).execute(&mut ctx);
        assert_eq!(result.error, Some(ActionError::InvalidParameters));
        assert_eq!(result.error_message, StringId::InvalidValue);
        assert_eq!(ctx.world.rides.get(ride).unwrap().num_circuits, 1);
    }

    #[test]
    fn waiting_times_stay_ordered() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        RideSetSettingAction::new(ride, RideSetting::MaxWaitingTime, 5).execute(&mut ctx);
        let r = ctx.world.rides.get(ride).unwrap();
        assert_eq!((r.min_waiting_time, r.max_waiting_time), (5, 5));

        RideSetSettingAction::new(ride, RideSetting::MinWaitingTime, 30).execute(&mut ctx);
        let r = ctx.world.rides.get(ride).unwrap();
        assert_eq!((r.min_waiting_time, r.max_waiting_time), (30, 30));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        for (setting, value) in [
            (RideSetting::Mode, RIDE_MODE_COUNT),
            (RideSetting::MinWaitingTime, 251),
            (RideSetting::LiftHillSpeed, 0x20),
            (RideSetting::InspectionInterval, 7),
            (RideSetting::NumCircuits, MAX_CIRCUITS + 1),
        ] {
            let result = RideSetSettingAction::new(ride, setting, value).query(&ctx);
            assert_eq!(result.error, Some(ActionError::InvalidParameters), "{setting:?}");
        }
    }

    #[test]
    fn missing_ride_rejected() {
        let mut ctx = standard_context();
        let ride = create_monorail(&mut ctx);
        ctx.world.rides.demolish(ride).unwrap();
        let result = RideSetSettingAction::new(ride, RideSetting::Mode, 0).query(&ctx);
        assert_eq!(result.error_message, StringId::RideNotFound);
    }
}
