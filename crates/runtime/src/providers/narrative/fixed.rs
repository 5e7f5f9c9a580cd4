//! Offline narrative provider with fixed lines.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{NarrativeError, NarrativeLine, NarrativeRequest, Tone};
use crate::api::NarrativeProvider;
use crate::events::CommentaryEventType;

/// Serves one fixed line per event type, marked [`LineSource::Scripted`].
///
/// Intended for tests, demos, and offline runs. An optional delay simulates
/// service latency.
///
/// [`LineSource::Scripted`]: super::LineSource::Scripted
#[derive(Debug, Clone)]
pub struct StaticNarrativeProvider {
    lines: HashMap<CommentaryEventType, (String, Tone)>,
    delay: Duration,
}

impl StaticNarrativeProvider {
    pub fn new() -> Self {
        let lines = [
            (CommentaryEventType::CombatStart, "Steel meets steel.", Tone::Tense),
            (CommentaryEventType::PlayerHit, "A clean strike!", Tone::Excited),
            (CommentaryEventType::PlayerMiss, "Only air.", Tone::Neutral),
            (CommentaryEventType::EnemyHit, "That one hurt.", Tone::Grim),
            (CommentaryEventType::HpThreshold, "The tide is turning.", Tone::Tense),
            (CommentaryEventType::Victory, "The foe falls.", Tone::Triumphant),
            (CommentaryEventType::Defeat, "Darkness closes in.", Tone::Grim),
        ]
        .into_iter()
        .map(|(kind, text, tone)| (kind, (text.to_owned(), tone)))
        .collect();

        Self {
            lines,
            delay: Duration::ZERO,
        }
    }

    pub fn with_line(
        mut self,
        event_type: CommentaryEventType,
        text: impl Into<String>,
        tone: Tone,
    ) -> Self {
        self.lines.insert(event_type, (text.into(), tone));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for StaticNarrativeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NarrativeProvider for StaticNarrativeProvider {
    async fn generate(&self, request: &NarrativeRequest) -> Result<NarrativeLine, NarrativeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let (text, tone) = self
            .lines
            .get(&request.event_type)
            .ok_or(NarrativeError::EmptyText)?;
        Ok(NarrativeLine::scripted(text.clone(), *tone))
    }
}
