//! Action logs for replay and multiplayer verification.
//!
//! An [`ActionLog`] starts from a world snapshot and records every action
//! run against it, optionally with the state hash after each one. Playing
//! the log back against the same objects must reproduce the same hashes on
//! every peer.

use crate::actions::Action;
use crate::context::{GameContext, SnapshotError, World};
use crate::dispatcher::GameActions;
use crate::result::GameActionResult;
use parkline_core::registry::ObjectRegistry;
use parkline_ride::TrackPlacer;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReplayMismatch
// ---------------------------------------------------------------------------

/// Where replay verification failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    /// Index of the action after which the hashes diverged.
    pub action_index: usize,
    pub expected_hash: u64,
    pub actual_hash: u64,
}

// ---------------------------------------------------------------------------
// ActionLog
// ---------------------------------------------------------------------------

/// A recorded sequence of actions starting from a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    /// Serialized world at the start of recording.
    pub initial_snapshot: Vec<u8>,
    pub actions: Vec<Action>,
    /// (action_index, state_hash) pairs checked during playback.
    pub hash_checkpoints: Vec<(usize, u64)>,
}

impl ActionLog {
    /// Start a log from the current state of `world`.
    pub fn new(world: &World) -> Result<Self, SnapshotError> {
        Ok(Self {
            initial_snapshot: world.snapshot()?,
            actions: Vec::new(),
            hash_checkpoints: Vec::new(),
        })
    }

    pub fn record(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn record_with_hash(&mut self, action: Action, hash: u64) {
        let index = self.actions.len();
        self.actions.push(action);
        self.hash_checkpoints.push((index, hash));
    }

    /// Run `action` through the dispatcher and record it with the resulting
    /// state hash. Failed actions are recorded too; they must fail the same
    /// way on playback.
    pub fn execute(&mut self, ctx: &mut GameContext, action: Action) -> GameActionResult {
        let result = GameActions::execute(ctx, &action);
        self.record_with_hash(action, ctx.world.state_hash());
        result
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Serialize the log to bytes (using bitcode).
    pub fn serialize(&self) -> Result<Vec<u8>, SnapshotError> {
        bitcode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, SnapshotError> {
        bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Errors that stop playback before any action runs.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("cannot restore initial snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The outcome of replaying a log with verification.
#[derive(Debug)]
pub struct ReplayResult {
    pub actions_executed: usize,
    /// Whether every hash checkpoint matched.
    pub is_verified: bool,
    pub first_mismatch: Option<ReplayMismatch>,
}

fn restore_context(
    log: &ActionLog,
    objects: ObjectRegistry,
    placer: Box<dyn TrackPlacer>,
) -> Result<GameContext, ReplayError> {
    let world = World::restore(&log.initial_snapshot)?;
    Ok(GameContext::with_placer(objects, world, placer))
}

/// Replay a log and check every hash checkpoint.
pub fn replay_and_verify(
    log: &ActionLog,
    objects: ObjectRegistry,
    placer: Box<dyn TrackPlacer>,
) -> Result<ReplayResult, ReplayError> {
    let mut ctx = restore_context(log, objects, placer)?;

    let mut first_mismatch = None;
    let mut checkpoint_idx = 0;

    for (i, action) in log.actions.iter().enumerate() {
        GameActions::execute(&mut ctx, action);

        while checkpoint_idx < log.hash_checkpoints.len()
            && log.hash_checkpoints[checkpoint_idx].0 == i
        {
            let (_, expected_hash) = log.hash_checkpoints[checkpoint_idx];
            let actual_hash = ctx.world.state_hash();
            if actual_hash != expected_hash && first_mismatch.is_none() {
                first_mismatch = Some(ReplayMismatch {
                    action_index: i,
                    expected_hash,
                    actual_hash,
                });
            }
            checkpoint_idx += 1;
        }
    }

    Ok(ReplayResult {
        actions_executed: log.actions.len(),
        is_verified: first_mismatch.is_none(),
        first_mismatch,
    })
}

/// Replay a log without verification, returning the final context.
pub fn replay(
    log: &ActionLog,
    objects: ObjectRegistry,
    placer: Box<dyn TrackPlacer>,
) -> Result<GameContext, ReplayError> {
    let mut ctx = restore_context(log, objects, placer)?;
    for action in &log.actions {
        GameActions::execute(&mut ctx, action);
    }
    Ok(ctx)
}

// ===========================================================================
// Tests
// ===========================================================================
