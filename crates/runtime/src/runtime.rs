//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive combat sessions.

use std::sync::Arc;
use std::time::Duration;

use combat_core::{CombatConfig, ResolveOutcome, SessionId, SessionRegistry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{
    AnimationPlayer, InstantAnimationPlayer, NarrativeProvider, NoopRewardCalculator,
    RewardCalculator, Result, RuntimeError, RuntimeHandle, TapProvider,
};
use crate::events::EventBus;
use crate::repository::AnalyticsRepository;
use crate::workers::{
    AnalyticsRecorder, AnalyticsSink, BubbleBoard, Command, CommentaryCoordinator,
    CommentaryMetrics, SessionWorker,
};

/// Commentary timing and switches.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentaryConfig {
    pub enabled: bool,
    /// Hard ceiling on a single narrative request.
    pub narrative_timeout: Duration,
    /// How long a shown bubble stays fully visible.
    pub visible_duration: Duration,
    pub fade_duration: Duration,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            narrative_timeout: Duration::from_secs(2),
            visible_duration: Duration::from_millis(2500),
            fade_duration: Duration::from_millis(500),
        }
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub commentary: CommentaryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            commentary: CommentaryConfig::default(),
        }
    }
}

/// Main runtime that orchestrates combat sessions
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Enemy tap source (injected by user)
    tap_provider: Option<Arc<dyn TapProvider>>,

    metrics: Arc<CommentaryMetrics>,
    shutdown: CancellationToken,

    // Background workers
    session_worker_handle: JoinHandle<()>,
    coordinator_handle: JoinHandle<()>,
    analytics_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Commentary counters shared with the coordinator.
    pub fn metrics(&self) -> Arc<CommentaryMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Resolve the enemy's turn with a tap from the configured provider.
    pub async fn enemy_turn(&self, session: SessionId) -> Result<ResolveOutcome> {
        let provider = self
            .tap_provider
            .as_ref()
            .ok_or(RuntimeError::TapProviderNotSet)?;

        let snapshot = self
            .handle
            .query_session(session)
            .await?
            .ok_or(combat_core::RegistryError::UnknownSession { session })?;
        let intent = provider.next_tap(&snapshot).await?;

        self.handle.resolve_enemy_action(session, intent).await
    }

    /// Set the enemy tap provider
    pub fn set_tap_provider(&mut self, provider: impl TapProvider + 'static) {
        self.tap_provider = Some(Arc::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops both workers, then waits for in-flight narrative requests to
    /// finish writing their analytics entries.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.cancel();
        drop(self.handle);

        self.session_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.coordinator_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        if let Some(analytics_handle) = self.analytics_handle {
            analytics_handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    narrative: Option<Arc<dyn NarrativeProvider>>,
    animation: Option<Arc<dyn AnimationPlayer>>,
    reward: Option<Arc<dyn RewardCalculator>>,
    tap_provider: Option<Arc<dyn TapProvider>>,
    analytics: Option<Box<dyn AnalyticsRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            narrative: None,
            animation: None,
            reward: None,
            tap_provider: None,
            analytics: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override commentary timing only
    pub fn commentary(mut self, commentary: CommentaryConfig) -> Self {
        self.config.commentary = commentary;
        self
    }

    /// Set the narrative provider. Without one, every bubble is suppressed
    /// as disabled.
    pub fn narrative_provider(mut self, provider: impl NarrativeProvider + 'static) -> Self {
        self.narrative = Some(Arc::new(provider));
        self
    }

    /// Set the animation player (default: clips complete instantly)
    pub fn animation_player(mut self, player: Arc<dyn AnimationPlayer>) -> Self {
        self.animation = Some(player);
        self
    }

    /// Set the reward calculator (default: hand-offs are dropped)
    pub fn reward_calculator(mut self, reward: impl RewardCalculator + 'static) -> Self {
        self.reward = Some(Arc::new(reward));
        self
    }

    /// Set the enemy tap provider (optional)
    pub fn tap_provider(mut self, provider: impl TapProvider + 'static) -> Self {
        self.tap_provider = Some(Arc::new(provider));
        self
    }

    /// Record every narrative request into `repository` (optional)
    pub fn analytics_repository(mut self, repository: impl AnalyticsRepository + 'static) -> Self {
        self.analytics = Some(Box::new(repository));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let registry = SessionRegistry::new(self.config.combat.clone());
        let shutdown = CancellationToken::new();

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (commentary_tx, commentary_rx) = mpsc::unbounded_channel();
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let board = BubbleBoard::new();
        let metrics = Arc::new(CommentaryMetrics::new());

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), board.clone());

        let (analytics, analytics_handle) = match self.analytics {
            Some(repository) => {
                let (recorder, writer) = AnalyticsRecorder::spawn(repository);
                (
                    Some(Arc::new(recorder) as Arc<dyn AnalyticsSink>),
                    Some(writer),
                )
            }
            None => (None, None),
        };

        let session_worker = SessionWorker::new(
            registry,
            command_rx,
            event_bus.clone(),
            commentary_tx,
            self.reward
                .unwrap_or_else(|| Arc::new(NoopRewardCalculator)),
            shutdown.clone(),
        );
        let session_worker_handle = tokio::spawn(async move {
            session_worker.run().await;
        });

        let coordinator = CommentaryCoordinator::new(
            self.config.commentary.clone(),
            self.narrative,
            self.animation
                .unwrap_or_else(|| Arc::new(InstantAnimationPlayer)),
            analytics,
            Arc::clone(&metrics),
            board,
            event_bus,
            commentary_rx,
            shutdown.clone(),
        );
        let coordinator_handle = tokio::spawn(async move {
            coordinator.run().await;
        });

        tracing::info!(
            commentary = self.config.commentary.enabled,
            narrative_timeout_ms = self.config.commentary.narrative_timeout.as_millis() as u64,
            "Runtime started"
        );

        Ok(Runtime {
            handle,
            tap_provider: self.tap_provider,
            metrics,
            shutdown,
            session_worker_handle,
            coordinator_handle,
            analytics_handle,
        })
    }
}
