//! Traits for the collaborators the runtime depends on.
//!
//! Runtime users plug in implementations so combat can run against a real
//! narrative service and renderer, scripted fixtures, or nothing at all.

use async_trait::async_trait;
use combat_core::{ActionIntent, CombatSession, RewardHandoff};

use super::errors::Result;
use crate::providers::{AnimationClip, NarrativeError, NarrativeLine, NarrativeRequest};

/// Generates a commentary line for one event.
///
/// Implementations do not need their own timeout; the coordinator bounds
/// every call and abandons the result once the budget is spent.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn generate(
        &self,
        request: &NarrativeRequest,
    ) -> std::result::Result<NarrativeLine, NarrativeError>;
}

/// Plays a clip and resolves when it completes.
#[async_trait]
pub trait AnimationPlayer: Send + Sync {
    async fn play(&self, clip: AnimationClip);
}

/// Receives the reward hand-off of every settled session, exactly once.
///
/// Called from the session worker; implementations must not block.
pub trait RewardCalculator: Send + Sync {
    fn hand_off(&self, handoff: RewardHandoff);
}

/// Supplies the enemy's tap for its turn.
#[async_trait]
pub trait TapProvider: Send + Sync {
    async fn next_tap(&self, session: &CombatSession) -> Result<ActionIntent>;
}

/// Reward calculator that drops every hand-off.
pub struct NoopRewardCalculator;

impl RewardCalculator for NoopRewardCalculator {
    fn hand_off(&self, handoff: RewardHandoff) {
        tracing::debug!(session = %handoff.session, outcome = %handoff.outcome, "reward hand-off ignored");
    }
}

/// Animation player for headless runs: every clip completes immediately.
pub struct InstantAnimationPlayer;

#[async_trait]
impl AnimationPlayer for InstantAnimationPlayer {
    async fn play(&self, _clip: AnimationClip) {}
}
