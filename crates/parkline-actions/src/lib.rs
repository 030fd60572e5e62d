//! Parkline Actions -- validated, deterministic mutations of park state.
//!
//! Every change to the park goes through a [`GameAction`]. Each action has
//! two phases over an explicit [`GameContext`]:
//!
//! 1. **Query** -- validate and price against `&GameContext`. Never mutates.
//! 2. **Execute** -- re-validate against the current world and apply the
//!    change through `&mut GameContext`.
//!
//! Both phases return a fully populated [`GameActionResult`]; nothing
//! panics or errors across the action boundary.
//!
//! # Running Actions
//!
//! ```rust,ignore
//! let mut ctx = GameContext::from_config(objects, &config);
//! let action = SurfaceSetStyleAction::new(range, Some(sand), None);
//! let result = GameActions::execute(&mut ctx, &action);
//! assert!(result.is_ok());
//! ```
//!
//! [`GameActions`] applies the pause gate, runs the query before the
//! execute, and books the cost against the park's finances.
//!
//! # Key Types
//!
//! - [`actions::SurfaceSetStyleAction`] -- repaint terrain surfaces and
//!   edges over a rectangular range.
//! - [`actions::TrackDesignAction`] -- instantiate a saved track design as
//!   a new, fully configured ride.
//! - [`actions::Action`] -- serializable wrapper over every action, used
//!   by [`replay::ActionLog`].
//! - [`context::World`] -- replicated state, hashed and snapshotted with
//!   bitcode.

pub mod action;
pub mod actions;
pub mod config;
pub mod context;
pub mod cost;
pub mod dispatcher;
pub mod flags;
pub mod replay;
pub mod result;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use action::GameAction;
pub use actions::Action;
pub use config::ScenarioConfig;
pub use context::{GameContext, World};
pub use dispatcher::GameActions;
pub use flags::ActionFlags;
pub use result::{ActionError, ExpenditureType, GameActionResult};
