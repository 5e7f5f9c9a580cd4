//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving sessions, streaming events from specific topics, and watching the
//! speech bubble.
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use combat_core::{
    ActionIntent, CombatSession, Loadout, ResolveOutcome, SessionId, SessionStatus, Side,
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Bubble, BubbleBoard, Command};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    board: BubbleBoard,
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        board: BubbleBoard,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            board,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Start a session; both sides begin at full HP and the player acts first.
    pub async fn create_session(&self, player: Loadout, enemy: Loadout) -> Result<SessionId> {
        self.request(|reply| Command::Create {
            player,
            enemy,
            reply,
        })
        .await?
    }

    /// Resolve one tap for `actor`.
    ///
    /// A second mutation of the same session while this one is in flight is
    /// rejected with [`RuntimeError::ConcurrencyConflict`].
    pub async fn resolve(
        &self,
        session: SessionId,
        actor: Side,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome> {
        let _guard = self.claim(session)?;
        self.request(|reply| Command::Resolve {
            session,
            actor,
            intent,
            reply,
        })
        .await?
    }

    pub async fn resolve_player_action(
        &self,
        session: SessionId,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome> {
        self.resolve(session, Side::Player, intent).await
    }

    pub async fn resolve_enemy_action(
        &self,
        session: SessionId,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome> {
        self.resolve(session, Side::Enemy, intent).await
    }

    /// End the session on the player's behalf.
    pub async fn retreat(&self, session: SessionId) -> Result<SessionStatus> {
        let _guard = self.claim(session)?;
        self.request(|reply| Command::Retreat { session, reply })
            .await?
    }

    /// Swap one side's stats and weapon between turns.
    pub async fn change_equipment(
        &self,
        session: SessionId,
        side: Side,
        loadout: Loadout,
    ) -> Result<()> {
        let _guard = self.claim(session)?;
        self.request(|reply| Command::ChangeEquipment {
            session,
            side,
            loadout,
            reply,
        })
        .await?
    }

    /// Query a session (read-only copy). Archived sessions stay readable.
    pub async fn query_session(&self, session: SessionId) -> Result<Option<CombatSession>> {
        self.request(|reply| Command::Query { session, reply })
            .await
    }

    /// Drop a settled session from the archive, returning its final state.
    /// Live sessions are left alone and yield `None`.
    pub async fn evict_session(&self, session: SessionId) -> Result<Option<CombatSession>> {
        self.request(|reply| Command::Evict { session, reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Session start, resolved actions, and endings
    /// - `Topic::Commentary` - Commentary events captured from resolves
    /// - `Topic::Display` - Speech bubble shown, fading, dismissed, suppressed
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use combat_runtime::Topic;
    ///
    /// let mut display_rx = handle.subscribe(Topic::Display);
    /// while let Ok(event) = display_rx.recv().await {
    ///     // Render bubble changes
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Watch the speech bubble slot. `None` means nothing is on screen.
    pub fn bubble(&self) -> watch::Receiver<Option<Bubble>> {
        self.board.subscribe()
    }

    pub fn current_bubble(&self) -> Option<Bubble> {
        self.board.current()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    fn claim(&self, session: SessionId) -> Result<InFlightGuard> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(session) {
            return Err(RuntimeError::ConcurrencyConflict { session });
        }
        Ok(InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            session,
        })
    }
}

/// Marks a session as having a mutation in flight until dropped.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
    session: SessionId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session);
    }
}
