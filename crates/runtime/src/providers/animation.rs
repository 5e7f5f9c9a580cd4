//! Animation clips and a timer-backed player.
//!
//! A sprite renderer is out of scope; [`TimedAnimationPlayer`] stands in for
//! it by holding each one-shot clip for its configured duration and
//! publishing the playback state on a watch channel.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use combat_core::Side;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::api::AnimationPlayer;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClipKind {
    Idle,
    Intro,
    Attack,
    Hurt,
    Death,
}

impl ClipKind {
    /// Only the idle clip loops; everything else plays once.
    pub const fn is_looping(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Death stays on its last frame instead of returning to idle.
    pub const fn holds_last_frame(self) -> bool {
        matches!(self, Self::Death)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationClip {
    pub side: Side,
    pub kind: ClipKind,
}

impl AnimationClip {
    pub const fn new(side: Side, kind: ClipKind) -> Self {
        Self { side, kind }
    }

    pub const fn idle(side: Side) -> Self {
        Self::new(side, ClipKind::Idle)
    }
}

impl fmt::Display for AnimationClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.side, self.kind)
    }
}

/// What the player is showing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(AnimationClip),
    /// A clip that froze on its last frame.
    Holding(AnimationClip),
}

/// How long each one-shot clip runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipTimings {
    pub intro: Duration,
    pub attack: Duration,
    pub hurt: Duration,
    pub death: Duration,
}

impl ClipTimings {
    pub fn uniform(duration: Duration) -> Self {
        Self {
            intro: duration,
            attack: duration,
            hurt: duration,
            death: duration,
        }
    }

    pub fn duration(&self, kind: ClipKind) -> Duration {
        match kind {
            ClipKind::Idle => Duration::ZERO,
            ClipKind::Intro => self.intro,
            ClipKind::Attack => self.attack,
            ClipKind::Hurt => self.hurt,
            ClipKind::Death => self.death,
        }
    }
}

impl Default for ClipTimings {
    fn default() -> Self {
        Self {
            intro: Duration::from_millis(1200),
            attack: Duration::from_millis(800),
            hurt: Duration::from_millis(600),
            death: Duration::from_millis(1500),
        }
    }
}

/// Plays clips by sleeping for their duration.
///
/// A newer clip takes over the stage; when an older clip finishes it does not
/// reset the state the newer one set.
pub struct TimedAnimationPlayer {
    timings: ClipTimings,
    state: watch::Sender<PlaybackState>,
    generation: AtomicU64,
}

impl TimedAnimationPlayer {
    pub fn new(timings: ClipTimings) -> Self {
        let (state, _) = watch::channel(PlaybackState::Idle);
        Self {
            timings,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn shared(timings: ClipTimings) -> Arc<Self> {
        Arc::new(Self::new(timings))
    }

    pub fn timings(&self) -> &ClipTimings {
        &self.timings
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }
}

impl Default for TimedAnimationPlayer {
    fn default() -> Self {
        Self::new(ClipTimings::default())
    }
}

#[async_trait]
impl AnimationPlayer for TimedAnimationPlayer {
    async fn play(&self, clip: AnimationClip) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if clip.kind.is_looping() {
            self.state.send_replace(PlaybackState::Idle);
            return;
        }

        self.state.send_replace(PlaybackState::Playing(clip));
        tokio::time::sleep(self.timings.duration(clip.kind)).await;

        let settled = if clip.kind.holds_last_frame() {
            PlaybackState::Holding(clip)
        } else {
            PlaybackState::Idle
        };
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = settled;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn clip_names_combine_side_and_kind() {
        assert_eq!(
            AnimationClip::new(Side::Enemy, ClipKind::Hurt).to_string(),
            "enemy_hurt"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_returns_to_idle_after_its_duration() {
        let player = TimedAnimationPlayer::new(ClipTimings::uniform(Duration::from_millis(500)));
        let started = Instant::now();

        player
            .play(AnimationClip::new(Side::Player, ClipKind::Attack))
            .await;

        assert_eq!(started.elapsed(), Duration::from_millis(500));
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn death_holds_its_last_frame() {
        let player = TimedAnimationPlayer::default();
        let clip = AnimationClip::new(Side::Enemy, ClipKind::Death);
        player.play(clip).await;
        assert_eq!(player.state(), PlaybackState::Holding(clip));
    }

    #[tokio::test(start_paused = true)]
    async fn older_clip_does_not_reset_newer_one() {
        let player = Arc::new(TimedAnimationPlayer::new(ClipTimings {
            attack: Duration::from_millis(300),
            death: Duration::from_millis(1000),
            ..ClipTimings::default()
        }));
        let death = AnimationClip::new(Side::Enemy, ClipKind::Death);

        let first = {
            let player = Arc::clone(&player);
            tokio::spawn(async move {
                player
                    .play(AnimationClip::new(Side::Player, ClipKind::Attack))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = {
            let player = Arc::clone(&player);
            tokio::spawn(async move { player.play(death).await })
        };

        first.await.unwrap();
        assert_eq!(player.state(), PlaybackState::Playing(death));
        second.await.unwrap();
        assert_eq!(player.state(), PlaybackState::Holding(death));
    }
}
