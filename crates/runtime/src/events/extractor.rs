//! Commentary extraction from resolve outcomes.
//!
//! Runs inside the session worker right after the resolve it describes, so
//! the captured context is exactly the post-resolve state.

use combat_core::{CombatSession, ResolveOutcome, SessionStatus, Side, hp_percent};

use super::commentary::{CommentaryEvent, EventContext};

/// Event announcing a freshly created session.
pub fn combat_started(session: &CombatSession) -> CommentaryEvent {
    CommentaryEvent::CombatStart {
        context: EventContext {
            session_id: session.id(),
            turn_number: session.turn(),
            player_hp_pct: session.player().hp_percent(),
            enemy_hp_pct: session.enemy().hp_percent(),
            damage: 0,
            is_critical: false,
        },
    }
}

/// Picks at most one commentary event for a resolve.
///
/// # Priority
///
/// 1. Victory / Defeat on the resolve that ended the session
/// 2. HP-threshold crossing (wounded or critical)
/// 3. Player hit or miss, enemy hit
///
/// An enemy miss is not worth a bubble and yields `None`.
pub fn extract_commentary(
    session: &CombatSession,
    outcome: &ResolveOutcome,
) -> Option<CommentaryEvent> {
    let result = &outcome.result;
    // HP and turn come from the result; max HP is fixed between resolves.
    let context = EventContext {
        session_id: session.id(),
        turn_number: result.sequence,
        player_hp_pct: hp_percent(result.player_hp, session.player().max_hp()),
        enemy_hp_pct: hp_percent(result.enemy_hp, session.enemy().max_hp()),
        damage: result.damage,
        is_critical: result.is_critical(),
    };

    if outcome.transitioned {
        return match outcome.status {
            SessionStatus::Victory => Some(CommentaryEvent::Victory { context }),
            SessionStatus::Defeat => Some(CommentaryEvent::Defeat { context }),
            SessionStatus::Ongoing | SessionStatus::Retreated => None,
        };
    }

    if let Some((side, threshold)) = outcome.threshold_crossed {
        return Some(CommentaryEvent::HpThreshold {
            context,
            side,
            threshold,
        });
    }

    match (result.actor, result.landed()) {
        (Side::Player, true) => Some(CommentaryEvent::PlayerHit {
            context,
            zone: result.zone,
        }),
        (Side::Player, false) => Some(CommentaryEvent::PlayerMiss {
            context,
            zone: result.zone,
        }),
        (Side::Enemy, true) => Some(CommentaryEvent::EnemyHit {
            context,
            zone: result.zone,
        }),
        (Side::Enemy, false) => None,
    }
}
