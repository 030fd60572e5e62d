//! Runs actions against a context: the pause gate, query-before-execute,
//! and charging the park for what was built.

use crate::action::GameAction;
use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::GameActionResult;
use log::trace;

/// Entry points for running actions.
pub struct GameActions;

impl GameActions {
    /// Validate and price an action without touching the world.
    pub fn query(ctx: &GameContext, action: &dyn GameAction) -> GameActionResult {
        if Self::blocked_by_pause(ctx, action) {
            return action.paused_result();
        }
        action.query(ctx)
    }

    /// Query, then execute if the query succeeded.
    ///
    /// A successful execute is charged to the park's finances under the
    /// result's expenditure type, unless the action is a ghost or the park
    /// has no money.
    pub fn execute(ctx: &mut GameContext, action: &dyn GameAction) -> GameActionResult {
        let queried = Self::query(ctx, action);
        if !queried.is_ok() {
            return queried;
        }

        let result = action.execute(ctx);
        if result.is_ok()
            && !action.flags().contains(ActionFlags::GHOST)
            && !ctx.world.park.no_money
        {
            ctx.world
                .finances
                .spend(result.expenditure, result.cost);
        }
        trace!(
            "executed action: ok={} cost={} expenditure={:?}",
            result.is_ok(),
            result.cost,
            result.expenditure
        );
        result
    }

    /// Run a sub-action from inside another action's execute.
    ///
    /// Adds [`ActionFlags::APPLY`], skips the pause gate (the outer action
    /// already passed it) and is never charged.
    pub fn execute_nested<A: GameAction>(ctx: &mut GameContext, mut action: A) -> GameActionResult {
        action.set_flags(action.flags().with(ActionFlags::APPLY));
        let queried = action.query(ctx);
        if !queried.is_ok() {
            return queried;
        }
        action.execute(ctx)
    }

    fn blocked_by_pause(ctx: &GameContext, action: &dyn GameAction) -> bool {
        ctx.world.is_paused_for_construction()
            && !action.flags().contains(ActionFlags::ALLOW_DURING_PAUSE)
            && !action.allowed_while_paused()
    }
}
