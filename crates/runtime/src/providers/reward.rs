//! Channel-backed reward calculator.

use combat_core::RewardHandoff;
use tokio::sync::mpsc;

use crate::api::RewardCalculator;

/// Forwards every hand-off to an unbounded channel owned by the real
/// reward calculator.
#[derive(Clone)]
pub struct RewardChannel {
    tx: mpsc::UnboundedSender<RewardHandoff>,
}

impl RewardChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RewardHandoff>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RewardCalculator for RewardChannel {
    fn hand_off(&self, handoff: RewardHandoff) {
        let session = handoff.session;
        if self.tx.send(handoff).is_err() {
            tracing::warn!(%session, "reward receiver dropped; hand-off discarded");
        }
    }
}
