//! Commentary events and the immutable context they carry.
//!
//! Each event is captured in the same worker step as the resolve that caused
//! it, so the HP and turn values below never reflect a later state.

use combat_core::{HealthThreshold, SessionId, Side, Zone};
use serde::{Deserialize, Serialize};

use crate::providers::{AnimationClip, ClipKind, NarrativeRequest};

/// Kind tag sent to the narrative service and the analytics log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommentaryEventType {
    CombatStart,
    PlayerHit,
    PlayerMiss,
    EnemyHit,
    HpThreshold,
    Victory,
    Defeat,
}

/// Snapshot shared by every commentary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub session_id: SessionId,
    pub turn_number: u64,
    pub player_hp_pct: u32,
    pub enemy_hp_pct: u32,
    pub damage: u32,
    pub is_critical: bool,
}

/// A meaningful combat moment, tagged by kind. Each variant carries only the
/// fields its kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentaryEvent {
    CombatStart {
        context: EventContext,
    },
    PlayerHit {
        context: EventContext,
        zone: Zone,
    },
    PlayerMiss {
        context: EventContext,
        zone: Zone,
    },
    EnemyHit {
        context: EventContext,
        zone: Zone,
    },
    HpThreshold {
        context: EventContext,
        side: Side,
        threshold: HealthThreshold,
    },
    Victory {
        context: EventContext,
    },
    Defeat {
        context: EventContext,
    },
}

impl CommentaryEvent {
    pub fn context(&self) -> &EventContext {
        match self {
            Self::CombatStart { context }
            | Self::PlayerHit { context, .. }
            | Self::PlayerMiss { context, .. }
            | Self::EnemyHit { context, .. }
            | Self::HpThreshold { context, .. }
            | Self::Victory { context }
            | Self::Defeat { context } => context,
        }
    }

    pub fn event_type(&self) -> CommentaryEventType {
        match self {
            Self::CombatStart { .. } => CommentaryEventType::CombatStart,
            Self::PlayerHit { .. } => CommentaryEventType::PlayerHit,
            Self::PlayerMiss { .. } => CommentaryEventType::PlayerMiss,
            Self::EnemyHit { .. } => CommentaryEventType::EnemyHit,
            Self::HpThreshold { .. } => CommentaryEventType::HpThreshold,
            Self::Victory { .. } => CommentaryEventType::Victory,
            Self::Defeat { .. } => CommentaryEventType::Defeat,
        }
    }

    pub fn session(&self) -> SessionId {
        self.context().session_id
    }

    pub fn turn(&self) -> u64 {
        self.context().turn_number
    }

    /// Wire request for the narrative service.
    pub fn to_request(&self) -> NarrativeRequest {
        let context = self.context();
        NarrativeRequest {
            session_id: context.session_id,
            event_type: self.event_type(),
            turn_number: context.turn_number,
            player_hp_pct: context.player_hp_pct,
            enemy_hp_pct: context.enemy_hp_pct,
            damage: context.damage,
            is_critical: context.is_critical,
        }
    }

    /// The one-shot clip that accompanies this event.
    pub fn clip(&self) -> AnimationClip {
        let (side, kind) = match self {
            Self::CombatStart { .. } => (Side::Enemy, ClipKind::Intro),
            Self::PlayerHit { .. } | Self::PlayerMiss { .. } => (Side::Player, ClipKind::Attack),
            Self::EnemyHit { .. } => (Side::Enemy, ClipKind::Attack),
            Self::HpThreshold { side, .. } => (*side, ClipKind::Hurt),
            Self::Victory { .. } => (Side::Enemy, ClipKind::Death),
            Self::Defeat { .. } => (Side::Player, ClipKind::Death),
        };
        AnimationClip::new(side, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> EventContext {
        EventContext {
            session_id: SessionId(3),
            turn_number: 4,
            player_hp_pct: 80,
            enemy_hp_pct: 20,
            damage: 40,
            is_critical: true,
        }
    }

    #[test]
    fn request_mirrors_context() {
        let event = CommentaryEvent::PlayerHit {
            context: context(),
            zone: Zone::Crit,
        };
        let request = event.to_request();
        assert_eq!(request.event_type, CommentaryEventType::PlayerHit);
        assert_eq!(request.turn_number, 4);
        assert_eq!(request.enemy_hp_pct, 20);
        assert!(request.is_critical);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = CommentaryEvent::Victory { context: context() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "victory");
        assert_eq!(json["context"]["turn_number"], 4);
    }

    #[test]
    fn every_event_maps_to_a_one_shot_clip() {
        let events = [
            CommentaryEvent::CombatStart { context: context() },
            CommentaryEvent::EnemyHit {
                context: context(),
                zone: Zone::Normal,
            },
            CommentaryEvent::HpThreshold {
                context: context(),
                side: Side::Enemy,
                threshold: HealthThreshold::Critical,
            },
            CommentaryEvent::Defeat { context: context() },
        ];
        for event in events {
            assert!(!event.clip().kind.is_looping(), "{:?}", event.event_type());
        }
        assert_eq!(
            CommentaryEvent::Defeat { context: context() }.clip(),
            AnimationClip::new(Side::Player, ClipKind::Death)
        );
    }
}
