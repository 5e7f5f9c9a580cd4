//! Session worker that owns the authoritative [`SessionRegistry`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), resolves
//! them one at a time, publishes session events, and forwards commentary
//! events (captured in the same step as the resolve) to the coordinator.

use std::sync::Arc;

use combat_core::{
    ActionIntent, CombatSession, Loadout, ResolveOutcome, SessionId, SessionRegistry,
    SessionStatus, Side,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{Result, RewardCalculator};
use crate::events::{
    CommentaryEvent, Event, EventBus, SessionEvent, combat_started, extract_commentary,
};

/// Commands that can be sent to the session worker
pub enum Command {
    /// Start a session between two loadouts.
    Create {
        player: Loadout,
        enemy: Loadout,
        reply: oneshot::Sender<Result<SessionId>>,
    },
    /// Resolve one tap for the given side.
    Resolve {
        session: SessionId,
        actor: Side,
        intent: ActionIntent,
        reply: oneshot::Sender<Result<ResolveOutcome>>,
    },
    /// Player retreat.
    Retreat {
        session: SessionId,
        reply: oneshot::Sender<Result<SessionStatus>>,
    },
    ChangeEquipment {
        session: SessionId,
        side: Side,
        loadout: Loadout,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Read-only copy of a live or archived session.
    Query {
        session: SessionId,
        reply: oneshot::Sender<Option<CombatSession>>,
    },
    /// Drop a settled session from the archive.
    Evict {
        session: SessionId,
        reply: oneshot::Sender<Option<CombatSession>>,
    },
}

/// Background task that serializes every session mutation.
pub struct SessionWorker {
    registry: SessionRegistry,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    commentary_tx: mpsc::UnboundedSender<CommentaryEvent>,
    reward: Arc<dyn RewardCalculator>,
    shutdown: CancellationToken,
}

impl SessionWorker {
    pub fn new(
        registry: SessionRegistry,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        commentary_tx: mpsc::UnboundedSender<CommentaryEvent>,
        reward: Arc<dyn RewardCalculator>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            registry,
            command_rx,
            event_bus,
            commentary_tx,
            reward,
            shutdown,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
            }
        }
        debug!(target: "runtime::session", live = self.registry.live_count(), "Session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Create {
                player,
                enemy,
                reply,
            } => {
                let result = self.create(player, enemy);
                if reply.send(result).is_err() {
                    debug!("Create reply channel closed (caller dropped)");
                }
            }
            Command::Resolve {
                session,
                actor,
                intent,
                reply,
            } => {
                let result = self.resolve(session, actor, intent);
                if reply.send(result).is_err() {
                    debug!("Resolve reply channel closed (caller dropped)");
                }
            }
            Command::Retreat { session, reply } => {
                let result = self.retreat(session);
                if reply.send(result).is_err() {
                    debug!("Retreat reply channel closed (caller dropped)");
                }
            }
            Command::ChangeEquipment {
                session,
                side,
                loadout,
                reply,
            } => {
                let result = self.change_equipment(session, side, loadout);
                if reply.send(result).is_err() {
                    debug!("ChangeEquipment reply channel closed (caller dropped)");
                }
            }
            Command::Query { session, reply } => {
                if reply.send(self.registry.get(session).cloned()).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
            }
            Command::Evict { session, reply } => {
                let evicted = self.registry.evict(session);
                if evicted.is_some() {
                    debug!(
                        target: "runtime::session",
                        session = %session,
                        archived = self.registry.archived_count(),
                        "Session evicted"
                    );
                }
                if reply.send(evicted).is_err() {
                    debug!("Evict reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn create(&mut self, player: Loadout, enemy: Loadout) -> Result<SessionId> {
        let id = self.registry.create(player, enemy)?;
        let Some(session) = self.registry.get(id) else {
            return Ok(id);
        };

        info!(
            target: "runtime::session",
            session = %id,
            player = %session.player().snapshot().name,
            enemy = %session.enemy().snapshot().name,
            "Session started"
        );
        let started = combat_started(session);
        self.event_bus.publish(Event::Session(SessionEvent::Started {
            session: id,
            player: session.player().snapshot().name.clone(),
            enemy: session.enemy().snapshot().name.clone(),
        }));
        self.dispatch_commentary(started);
        Ok(id)
    }

    fn resolve(
        &mut self,
        id: SessionId,
        actor: Side,
        intent: ActionIntent,
    ) -> Result<ResolveOutcome> {
        let outcome = match self.registry.resolve(id, actor, intent) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(
                    target: "runtime::session",
                    session = %id,
                    actor = %actor,
                    error = %e,
                    "Resolve rejected"
                );
                return Err(e.into());
            }
        };

        debug!(
            target: "runtime::session",
            session = %id,
            actor = %actor,
            zone = %outcome.result.zone,
            damage = outcome.result.damage,
            turn = outcome.result.sequence,
            "Action resolved"
        );

        // Snapshot the commentary context before anything else can touch the session.
        let commentary = self
            .registry
            .get(id)
            .and_then(|session| extract_commentary(session, &outcome));

        self.event_bus
            .publish(Event::Session(SessionEvent::ActionResolved {
                session: id,
                result: outcome.result.clone(),
                status: outcome.status,
            }));
        if let Some(event) = commentary {
            self.dispatch_commentary(event);
        }
        if outcome.transitioned {
            self.settle(id)?;
        }

        Ok(outcome)
    }

    fn retreat(&mut self, id: SessionId) -> Result<SessionStatus> {
        let status = self.registry.retreat(id)?;
        info!(target: "runtime::session", session = %id, "Player retreated");
        self.settle(id)?;
        Ok(status)
    }

    fn change_equipment(&mut self, id: SessionId, side: Side, loadout: Loadout) -> Result<()> {
        let weapon = loadout.weapon.pattern().clone();
        self.registry.change_equipment(id, side, loadout)?;
        debug!(
            target: "runtime::session",
            session = %id,
            side = %side,
            weapon = %weapon,
            "Equipment changed"
        );
        self.event_bus
            .publish(Event::Session(SessionEvent::EquipmentChanged { session: id, side }));
        Ok(())
    }

    /// Archives a terminal session and hands its result to the reward calculator.
    fn settle(&mut self, id: SessionId) -> Result<()> {
        let Some(handoff) = self.registry.settle(id)? else {
            return Ok(());
        };

        info!(
            target: "runtime::session",
            session = %id,
            outcome = %handoff.outcome,
            turns = handoff.turn_count,
            "Session ended; handing off to reward calculator"
        );
        let ended = SessionEvent::Ended {
            session: id,
            outcome: handoff.outcome,
            turn_count: handoff.turn_count,
        };
        self.reward.hand_off(handoff);
        self.event_bus.publish(Event::Session(ended));
        Ok(())
    }

    fn dispatch_commentary(&self, event: CommentaryEvent) {
        self.event_bus.publish(Event::Commentary(event.clone()));
        if self.commentary_tx.send(event).is_err() {
            debug!(target: "runtime::session", "Commentary coordinator stopped; event not narrated");
        }
    }
}
