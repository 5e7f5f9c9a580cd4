//! Worker tasks that back the runtime orchestration.
//!
//! The session worker serializes every session mutation, the commentary
//! coordinator narrates what it reports, and the analytics writer drains
//! request records in the background.

mod analytics;
mod commentary;
mod metrics;
mod session;

pub use analytics::{AnalyticsRecorder, AnalyticsSink};
pub use commentary::{Bubble, BubbleBoard, BubblePhase, CommentaryCoordinator};
pub use metrics::{CommentaryMetrics, MetricsSnapshot};
pub use session::{Command, SessionWorker};
