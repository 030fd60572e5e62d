//! Concrete actions and the serializable [`Action`] wrapper used for
//! logging and replay.

mod ride_demolish;
mod ride_set_name;
mod ride_set_setting;
mod ride_set_vehicle;
mod surface_set_style;
mod track_design;

pub use ride_demolish::RideDemolishAction;
pub use ride_set_name::RideSetNameAction;
pub use ride_set_setting::{
    MAX_LIFT_HILL_SPEED, MAX_WAITING_TIME, RIDE_MODE_COUNT, RideSetSettingAction, RideSetting,
};
pub use ride_set_vehicle::{RideSetVehicleAction, RideSetVehicleType};
pub use surface_set_style::SurfaceSetStyleAction;
pub use track_design::TrackDesignAction;

use crate::action::GameAction;
use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::GameActionResult;
use serde::{Deserialize, Serialize};

/// Any action, in a form that can be recorded and sent to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    SurfaceSetStyle(SurfaceSetStyleAction),
    TrackDesign(TrackDesignAction),
    RideSetSetting(RideSetSettingAction),
    RideSetVehicle(RideSetVehicleAction),
    RideSetName(RideSetNameAction),
    RideDemolish(RideDemolishAction),
}

impl Action {
    fn inner(&self) -> &dyn GameAction {
        match self {
            Action::SurfaceSetStyle(a) => a,
            Action::TrackDesign(a) => a,
            Action::RideSetSetting(a) => a,
            Action::RideSetVehicle(a) => a,
            Action::RideSetName(a) => a,
            Action::RideDemolish(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GameAction {
        match self {
            Action::SurfaceSetStyle(a) => a,
            Action::TrackDesign(a) => a,
            Action::RideSetSetting(a) => a,
            Action::RideSetVehicle(a) => a,
            Action::RideSetName(a) => a,
            Action::RideDemolish(a) => a,
        }
    }
}

impl GameAction for Action {
    fn flags(&self) -> ActionFlags {
        self.inner().flags()
    }

    fn set_flags(&mut self, flags: ActionFlags) {
        self.inner_mut().set_flags(flags);
    }

    fn allowed_while_paused(&self) -> bool {
        self.inner().allowed_while_paused()
    }

    fn paused_result(&self) -> GameActionResult {
        self.inner().paused_result()
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult {
        self.inner().query(ctx)
    }

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult {
        self.inner().execute(ctx)
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_action!(
    SurfaceSetStyle(SurfaceSetStyleAction),
    TrackDesign(TrackDesignAction),
    RideSetSetting(RideSetSettingAction),
    RideSetVehicle(RideSetVehicleAction),
    RideSetName(RideSetNameAction),
    RideDemolish(RideDemolishAction),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use parkline_map::MapRange;

    #[test]
    fn wrapper_delegates_to_inner_action() {
        let mut ctx = standard_context();
        let inner = SurfaceSetStyleAction::new(MapRange::new(64, 64, 64, 64), Some(sand()), None);
        let mut action = Action::from(inner.clone());
        assert_eq!(action.query(&ctx), inner.query(&ctx));
        action.set_flags(ActionFlags::GHOST);
        assert!(action.flags().contains(ActionFlags::GHOST));
        assert!(action.execute(&mut ctx).is_ok());
    }

    #[test]
    fn actions_round_trip_through_bitcode() {
        let action = Action::from(TrackDesignAction::new(standard_origin(), standard_design()));
        let bytes = bitcode::serialize(&action).unwrap();
        let decoded: Action = bitcode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, action);
    }
}
