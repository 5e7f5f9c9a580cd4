//! Runtime orchestration for dial-tap combat.
//!
//! This crate wires the pure session rules of `combat-core` into tokio
//! workers: a session worker that serializes every resolve, and a commentary
//! coordinator that narrates meaningful moments without ever blocking
//! combat. Consumers embed [`Runtime`] to drive sessions, subscribe to events,
//! and watch the speech bubble through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] holds adapters for the narrative service, animation
//!   playback, enemy taps, and reward hand-off
//! - [`repository`] stores analytics records
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    AnimationPlayer, InstantAnimationPlayer, NarrativeProvider, NoopRewardCalculator,
    RewardCalculator, Result, RuntimeError, RuntimeHandle, TapProvider,
};
pub use events::{
    CommentaryEvent, CommentaryEventType, DisplayEvent, Event, EventBus, EventContext,
    SessionEvent, SuppressReason, Topic,
};
pub use providers::{
    AnimationClip, ClipKind, ClipTimings, HttpNarrativeProvider, LineSource, NarrativeError,
    NarrativeLine, NarrativeRequest, NarrativeResult, PlaybackState, RewardChannel,
    SeededTapProvider, StaticNarrativeProvider, TimedAnimationPlayer, Tone,
};
pub use repository::{
    AnalyticsEntry, AnalyticsRepository, FileAnalyticsLog, InMemoryAnalyticsLog,
    RepositoryError, RequestOutcome,
};
pub use runtime::{CommentaryConfig, Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::{
    AnalyticsRecorder, AnalyticsSink, Bubble, BubbleBoard, BubblePhase, CommentaryMetrics,
    MetricsSnapshot,
};
