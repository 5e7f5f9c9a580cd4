//! Event types for the session and display topics.

use combat_core::{ActionResult, SessionId, SessionStatus, Side};
use serde::{Deserialize, Serialize};

use super::commentary::CommentaryEventType;
use crate::providers::{LineSource, Tone};

/// Session lifecycle events, published by the session worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        session: SessionId,
        player: String,
        enemy: String,
    },

    /// One turn was resolved. Published before any commentary for it.
    ActionResolved {
        session: SessionId,
        result: ActionResult,
        status: SessionStatus,
    },

    EquipmentChanged {
        session: SessionId,
        side: Side,
    },

    /// The session reached a terminal state and its reward hand-off was sent.
    Ended {
        session: SessionId,
        outcome: SessionStatus,
        turn_count: u64,
    },
}

/// Why a commentary bubble was never shown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuppressReason {
    /// The narrative request ran past its timeout.
    Timeout,
    /// The narrative service returned an error.
    Failure,
    /// A newer event took over the display first.
    Superseded,
    /// Commentary is switched off or no narrative provider is configured.
    Disabled,
    /// The runtime stopped before the bubble could be shown.
    Shutdown,
}

/// Speech bubble lifecycle, published by the commentary coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplayEvent {
    BubbleShown {
        session: SessionId,
        turn: u64,
        event_type: CommentaryEventType,
        text: String,
        tone: Tone,
        source: LineSource,
    },

    BubbleFading {
        session: SessionId,
        turn: u64,
        event_type: CommentaryEventType,
    },

    /// `preempted` is set when a newer event cleared the bubble early.
    BubbleDismissed {
        session: SessionId,
        turn: u64,
        event_type: CommentaryEventType,
        preempted: bool,
    },

    BubbleSuppressed {
        session: SessionId,
        turn: u64,
        event_type: CommentaryEventType,
        reason: SuppressReason,
    },
}

impl DisplayEvent {
    pub fn event_type(&self) -> CommentaryEventType {
        match self {
            Self::BubbleShown { event_type, .. }
            | Self::BubbleFading { event_type, .. }
            | Self::BubbleDismissed { event_type, .. }
            | Self::BubbleSuppressed { event_type, .. } => *event_type,
        }
    }
}
