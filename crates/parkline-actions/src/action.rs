use crate::context::GameContext;
use crate::flags::ActionFlags;
use crate::result::{GameActionResult, Rejection};

/// The two-phase contract every action implements.
///
/// `query` validates and prices without mutating; `execute` re-runs the
/// same validation against the current world and then applies the change.
/// Both are deterministic: given the same world they return the same
/// result on every peer. Neither ever panics or returns an error across
/// the boundary; failures come back as a populated result.
pub trait GameAction {
    fn flags(&self) -> ActionFlags;

    fn set_flags(&mut self, flags: ActionFlags);

    /// Whether the action may run while the game is paused without the
    /// [`ActionFlags::ALLOW_DURING_PAUSE`] flag.
    fn allowed_while_paused(&self) -> bool {
        false
    }

    /// The result reported when the pause gate turns the action away.
    fn paused_result(&self) -> GameActionResult {
        GameActionResult::default().finish(Err(Rejection::paused()))
    }

    fn query(&self, ctx: &GameContext) -> GameActionResult;

    fn execute(&self, ctx: &mut GameContext) -> GameActionResult;
}
