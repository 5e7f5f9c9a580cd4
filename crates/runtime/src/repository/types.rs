//! Records stored by the repositories.

use chrono::{DateTime, Utc};
use combat_core::SessionId;
use serde::{Deserialize, Serialize};

use crate::events::CommentaryEventType;

/// How a narrative request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestOutcome {
    Success,
    Timeout,
    Failure,
}

/// One narrative request, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEntry {
    pub session: SessionId,
    pub turn: u64,
    pub event_type: CommentaryEventType,
    pub latency_ms: u64,
    pub success: bool,
    pub outcome: RequestOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEntry {
    pub fn new(
        session: SessionId,
        turn: u64,
        event_type: CommentaryEventType,
        latency_ms: u64,
        outcome: RequestOutcome,
        error: Option<String>,
    ) -> Self {
        Self {
            session,
            turn,
            event_type,
            latency_ms,
            success: outcome == RequestOutcome::Success,
            outcome,
            error,
            timestamp: Utc::now(),
        }
    }
}
