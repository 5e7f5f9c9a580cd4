//! Topic-based event bus for runtime events.
//!
//! This module provides a flexible event system where events are published to
//! specific topics, and consumers can subscribe only to the topics they need.

mod bus;
mod commentary;
mod extractor;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use commentary::{CommentaryEvent, CommentaryEventType, EventContext};
pub use extractor::{combat_started, extract_commentary};
pub use types::{DisplayEvent, SessionEvent, SuppressReason};
