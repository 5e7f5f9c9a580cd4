//! Commentary coordinator: narrative, animation, and the speech bubble.
//!
//! For every commentary event the coordinator starts the narrative request
//! and the animation clip together, then shows the bubble once both have
//! finished. The narrative request is bounded by
//! [`CommentaryConfig::narrative_timeout`]; on timeout or failure the bubble
//! is suppressed and nothing is substituted. A shown bubble stays visible,
//! fades, and is cleared. A newer event always takes the bubble over.
//!
//! Failures here never reach the session worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use combat_core::SessionId;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::analytics::AnalyticsSink;
use super::metrics::CommentaryMetrics;
use crate::api::{AnimationPlayer, NarrativeProvider};
use crate::events::{CommentaryEvent, CommentaryEventType, DisplayEvent, Event, EventBus, SuppressReason};
use crate::providers::{LineSource, NarrativeError, NarrativeRequest, NarrativeResult, Tone};
use crate::repository::{AnalyticsEntry, RequestOutcome};
use crate::runtime::CommentaryConfig;

/// Lifecycle phase of a bubble on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubblePhase {
    Visible,
    Fading,
}

/// The speech bubble currently on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub session: SessionId,
    pub turn: u64,
    pub event_type: CommentaryEventType,
    pub text: String,
    pub tone: Tone,
    pub source: LineSource,
    pub phase: BubblePhase,
    /// Display generation that owns this bubble.
    pub generation: u64,
}

/// Single-slot display surface. At most one bubble exists at a time.
///
/// Every event claims a new generation; writes tagged with an older
/// generation are ignored, so a stale task can never overwrite or clear a
/// newer bubble.
#[derive(Clone)]
pub struct BubbleBoard {
    slot: Arc<watch::Sender<Option<Bubble>>>,
    generation: Arc<AtomicU64>,
}

impl BubbleBoard {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Bubble>> {
        self.slot.subscribe()
    }

    pub fn current(&self) -> Option<Bubble> {
        self.slot.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Claims the next generation and clears whatever is on screen.
    pub(crate) fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.slot.send_if_modified(|slot| slot.take().is_some());
        generation
    }

    /// Puts `bubble` on screen if its generation is still the latest.
    pub(crate) fn show(&self, bubble: Bubble) -> bool {
        let generation = &self.generation;
        self.slot.send_if_modified(|slot| {
            if generation.load(Ordering::SeqCst) != bubble.generation {
                return false;
            }
            *slot = Some(bubble);
            true
        })
    }

    pub(crate) fn fade(&self, generation: u64) -> bool {
        self.slot.send_if_modified(|slot| match slot {
            Some(bubble) if bubble.generation == generation => {
                bubble.phase = BubblePhase::Fading;
                true
            }
            _ => false,
        })
    }

    pub(crate) fn dismiss(&self, generation: u64) -> bool {
        self.slot.send_if_modified(|slot| {
            if slot.as_ref().is_some_and(|bubble| bubble.generation == generation) {
                *slot = None;
                true
            } else {
                false
            }
        })
    }
}

impl Default for BubbleBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task that narrates commentary events.
pub struct CommentaryCoordinator {
    config: CommentaryConfig,
    narrative: Option<Arc<dyn NarrativeProvider>>,
    animation: Arc<dyn AnimationPlayer>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    metrics: Arc<CommentaryMetrics>,
    board: BubbleBoard,
    event_bus: EventBus,
    events_rx: mpsc::UnboundedReceiver<CommentaryEvent>,
    shutdown: CancellationToken,
    /// Cancels the display task of the latest event.
    current: Option<CancellationToken>,
}

impl CommentaryCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: CommentaryConfig,
        narrative: Option<Arc<dyn NarrativeProvider>>,
        animation: Arc<dyn AnimationPlayer>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
        metrics: Arc<CommentaryMetrics>,
        board: BubbleBoard,
        event_bus: EventBus,
        events_rx: mpsc::UnboundedReceiver<CommentaryEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            narrative,
            animation,
            analytics,
            metrics,
            board,
            event_bus,
            events_rx,
            shutdown,
            current: None,
        }
    }

    /// Main coordinator loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                event = self.events_rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }

        if let Some(token) = self.current.take() {
            token.cancel();
        }
        debug!(target: "runtime::commentary", "Commentary coordinator stopped");
    }

    fn handle_event(&mut self, event: CommentaryEvent) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let generation = self.board.begin();
        let token = self.shutdown.child_token();
        self.current = Some(token.clone());

        let job = DisplayJob {
            session: event.session(),
            turn: event.turn(),
            event_type: event.event_type(),
            generation,
            board: self.board.clone(),
            event_bus: self.event_bus.clone(),
            metrics: Arc::clone(&self.metrics),
            shutdown: self.shutdown.clone(),
            visible: self.config.visible_duration,
            fade: self.config.fade_duration,
        };

        let animation = {
            let player = Arc::clone(&self.animation);
            let clip = event.clip();
            tokio::spawn(async move { player.play(clip).await })
        };

        let provider = match &self.narrative {
            Some(provider) if self.config.enabled => Arc::clone(provider),
            _ => {
                job.suppress(SuppressReason::Disabled);
                return;
            }
        };

        debug!(
            target: "runtime::commentary",
            session = %job.session,
            turn = job.turn,
            event_type = %job.event_type,
            generation,
            "Commentary requested"
        );

        let (narrative_tx, narrative_rx) = oneshot::channel();
        tokio::spawn(request_narrative(
            provider,
            event.to_request(),
            self.config.narrative_timeout,
            Arc::clone(&self.metrics),
            self.analytics.clone(),
            narrative_tx,
        ));
        tokio::spawn(job.run(narrative_rx, animation, token));
    }
}

type NarrativeOutcome = std::result::Result<NarrativeResult, SuppressReason>;

/// Issues one narrative request, bounded by `timeout`, and records it.
///
/// Runs to completion even when the event has been superseded, so every
/// request gets its analytics entry.
async fn request_narrative(
    provider: Arc<dyn NarrativeProvider>,
    request: NarrativeRequest,
    timeout: Duration,
    metrics: Arc<CommentaryMetrics>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    reply: oneshot::Sender<NarrativeOutcome>,
) {
    metrics.record_request();
    let started = Instant::now();
    let response = tokio::time::timeout(timeout, provider.generate(&request)).await;
    let latency = started.elapsed();
    let latency_ms = latency.as_millis() as u64;

    let (outcome, status, error) = match response {
        Ok(Ok(line)) => {
            metrics.record_success(latency);
            debug!(
                target: "runtime::commentary",
                session = %request.session_id,
                turn = request.turn_number,
                latency_ms,
                "Narrative ready"
            );
            (
                Ok(NarrativeResult::from_line(line, latency_ms)),
                RequestOutcome::Success,
                None,
            )
        }
        Ok(Err(err)) => {
            metrics.record_failure();
            warn!(
                target: "runtime::commentary",
                session = %request.session_id,
                turn = request.turn_number,
                event_type = %request.event_type,
                error = %err,
                "Narrative request failed"
            );
            (
                Err(SuppressReason::Failure),
                RequestOutcome::Failure,
                Some(err.to_string()),
            )
        }
        Err(_) => {
            metrics.record_timeout();
            let err = NarrativeError::Timeout {
                after_ms: timeout.as_millis() as u64,
            };
            warn!(
                target: "runtime::commentary",
                session = %request.session_id,
                turn = request.turn_number,
                event_type = %request.event_type,
                error = %err,
                "Narrative request timed out"
            );
            (
                Err(SuppressReason::Timeout),
                RequestOutcome::Timeout,
                Some(err.to_string()),
            )
        }
    };

    if let Some(sink) = analytics {
        sink.record(AnalyticsEntry::new(
            request.session_id,
            request.turn_number,
            request.event_type,
            latency_ms,
            status,
            error,
        ));
    }

    if reply.send(outcome).is_err() {
        debug!(target: "runtime::commentary", "Display task gone; narrative result dropped");
    }
}

/// Display side of one event: waits for both signals, then runs the bubble.
struct DisplayJob {
    session: SessionId,
    turn: u64,
    event_type: CommentaryEventType,
    generation: u64,
    board: BubbleBoard,
    event_bus: EventBus,
    metrics: Arc<CommentaryMetrics>,
    /// Coordinator token; cancelled only on runtime shutdown.
    shutdown: CancellationToken,
    visible: Duration,
    fade: Duration,
}

impl DisplayJob {
    fn shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    async fn run(
        self,
        narrative: oneshot::Receiver<NarrativeOutcome>,
        animation: JoinHandle<()>,
        token: CancellationToken,
    ) {
        let ready = async {
            let (narrative, animation) = tokio::join!(narrative, animation);
            if let Err(e) = animation {
                warn!(target: "runtime::commentary", error = %e, "Animation task failed");
            }
            narrative
        };

        let narrative = tokio::select! {
            biased;
            _ = token.cancelled() => {
                if self.shutting_down() {
                    self.suppress(SuppressReason::Shutdown);
                } else {
                    self.metrics.record_superseded();
                    self.suppress(SuppressReason::Superseded);
                }
                return;
            }
            narrative = ready => narrative,
        };

        let result = match narrative {
            Ok(Ok(result)) => result,
            Ok(Err(reason)) => {
                self.suppress(reason);
                return;
            }
            Err(_) => {
                self.suppress(SuppressReason::Failure);
                return;
            }
        };

        let shown = self.board.show(Bubble {
            session: self.session,
            turn: self.turn,
            event_type: self.event_type,
            text: result.text.clone(),
            tone: result.tone,
            source: result.source,
            phase: BubblePhase::Visible,
            generation: self.generation,
        });
        if !shown {
            self.metrics.record_superseded();
            self.suppress(SuppressReason::Superseded);
            return;
        }

        self.metrics.record_shown();
        self.publish(DisplayEvent::BubbleShown {
            session: self.session,
            turn: self.turn,
            event_type: self.event_type,
            text: result.text,
            tone: result.tone,
            source: result.source,
        });

        if !self.hold(&token, self.visible).await {
            return;
        }
        self.board.fade(self.generation);
        self.publish(DisplayEvent::BubbleFading {
            session: self.session,
            turn: self.turn,
            event_type: self.event_type,
        });

        if !self.hold(&token, self.fade).await {
            return;
        }
        self.board.dismiss(self.generation);
        self.publish(DisplayEvent::BubbleDismissed {
            session: self.session,
            turn: self.turn,
            event_type: self.event_type,
            preempted: false,
        });
    }

    /// Waits `duration`; returns `false` if a newer event preempted the bubble
    /// or the runtime is shutting down.
    async fn hold(&self, token: &CancellationToken, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                let preempted = !self.shutting_down();
                if preempted {
                    self.metrics.record_superseded();
                } else {
                    self.board.dismiss(self.generation);
                }
                self.publish(DisplayEvent::BubbleDismissed {
                    session: self.session,
                    turn: self.turn,
                    event_type: self.event_type,
                    preempted,
                });
                false
            }
            _ = tokio::time::sleep(duration) => true,
        }
    }

    fn suppress(&self, reason: SuppressReason) {
        self.metrics.record_suppressed();
        debug!(
            target: "runtime::commentary",
            session = %self.session,
            turn = self.turn,
            event_type = %self.event_type,
            reason = %reason,
            "Bubble suppressed"
        );
        self.publish(DisplayEvent::BubbleSuppressed {
            session: self.session,
            turn: self.turn,
            event_type: self.event_type,
            reason,
        });
    }

    fn publish(&self, event: DisplayEvent) {
        self.event_bus.publish(Event::Display(event));
    }
}
