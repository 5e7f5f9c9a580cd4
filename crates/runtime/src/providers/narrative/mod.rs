//! Narrative generation: request/response types and providers.

mod fixed;
mod http;

pub use fixed::StaticNarrativeProvider;
pub use http::HttpNarrativeProvider;

use combat_core::{ErrorCategory, ErrorSeverity, GameError, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::CommentaryEventType;

/// What the narrative service is asked to describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub session_id: SessionId,
    pub event_type: CommentaryEventType,
    pub turn_number: u64,
    pub player_hp_pct: u32,
    pub enemy_hp_pct: u32,
    pub damage: u32,
    pub is_critical: bool,
}

/// Emotional register of a line; unknown tones from the service read as neutral.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Excited,
    Tense,
    Grim,
    Triumphant,
    #[default]
    #[serde(other)]
    Neutral,
}

/// Where a line came from. Scripted lines never pass as generated ones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LineSource {
    #[default]
    Generated,
    Scripted,
}

/// A line returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeLine {
    pub text: String,
    pub tone: Tone,
    pub source: LineSource,
}

impl NarrativeLine {
    pub fn generated(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            source: LineSource::Generated,
        }
    }

    pub fn scripted(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            source: LineSource::Scripted,
        }
    }
}

/// A completed request as the coordinator saw it. Ephemeral; only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub text: String,
    pub tone: Tone,
    pub source: LineSource,
    pub generation_time_ms: u64,
    pub success: bool,
}

impl NarrativeResult {
    pub fn from_line(line: NarrativeLine, generation_time_ms: u64) -> Self {
        Self {
            text: line.text,
            tone: line.tone,
            source: line.source,
            generation_time_ms,
            success: true,
        }
    }
}

/// Narrative failures. These stay inside the commentary domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narrative request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("narrative transport error: {0}")]
    Http(String),

    #[error("narrative service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("narrative response could not be decoded: {0}")]
    Decode(String),

    #[error("narrative service declined the request")]
    Rejected,

    #[error("narrative service returned an empty line")]
    EmptyText,
}

impl NarrativeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl GameError for NarrativeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::ExternalServiceFailure
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "NARRATIVE_TIMEOUT",
            Self::Http(_) => "NARRATIVE_HTTP",
            Self::Service { .. } => "NARRATIVE_SERVICE",
            Self::Decode(_) => "NARRATIVE_DECODE",
            Self::Rejected => "NARRATIVE_REJECTED",
            Self::EmptyText => "NARRATIVE_EMPTY",
        }
    }
}
