use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use combat_core::{ActionIntent, CombatantSnapshot, Loadout, Side, WeaponBandProfile, ZoneTable};
use combat_runtime::{
    AnimationClip, ClipKind, ClipTimings, CommentaryConfig, CommentaryEventType, DisplayEvent,
    Event, FileAnalyticsLog, InMemoryAnalyticsLog, LineSource, NarrativeError, NarrativeLine,
    NarrativeProvider, NarrativeRequest, PlaybackState, RequestOutcome, Runtime,
    StaticNarrativeProvider, SuppressReason, TimedAnimationPlayer, Topic,
};
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

const NORMAL: f64 = 250.0;

fn loadout(name: &str) -> Loadout {
    let weapon = WeaponBandProfile::new(
        "longsword",
        ZoneTable::new(40.0, 70.0, 90.0, 100.0, 60.0),
        ZoneTable::new(0.0, 0.0, 0.5, 1.0, 2.0),
    )
    .expect("longsword profile is valid");
    Loadout::new(CombatantSnapshot::new(name, 0, 20, 100), weapon)
}

fn normal_hit() -> ActionIntent {
    ActionIntent::new(NORMAL, 0.0).expect("angle in domain")
}

async fn next_display(rx: &mut broadcast::Receiver<Event>) -> DisplayEvent {
    loop {
        match rx.recv().await.expect("display topic open") {
            Event::Display(event) => return event,
            _ => continue,
        }
    }
}

/// Waits until `clip` is on stage, then until the stage is idle again.
/// Returns when the clip finished.
async fn clip_finished(playback: &mut watch::Receiver<PlaybackState>, clip: AnimationClip) {
    playback
        .wait_for(|state| *state == PlaybackState::Playing(clip))
        .await
        .expect("animation player alive");
    playback
        .wait_for(|state| *state == PlaybackState::Idle)
        .await
        .expect("animation player alive");
}

struct UnavailableNarrative;

#[async_trait]
impl NarrativeProvider for UnavailableNarrative {
    async fn generate(&self, _request: &NarrativeRequest) -> Result<NarrativeLine, NarrativeError> {
        Err(NarrativeError::Service {
            status: 503,
            body: "overloaded".into(),
        })
    }
}

/// Narrative is ready at 300 ms but the intro clip runs 800 ms: the bubble
/// waits for the clip, stays 2.5 s, fades for 0.5 s, then clears.
#[tokio::test(start_paused = true)]
async fn bubble_waits_for_animation_then_fades_and_clears() {
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new().with_delay(Duration::from_millis(300)))
        .animation_player(TimedAnimationPlayer::shared(ClipTimings::uniform(
            Duration::from_millis(800),
        )))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    let start = Instant::now();
    handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    assert_eq!(handle.current_bubble(), None);

    let shown = next_display(&mut display_rx).await;
    let shown_at = start.elapsed();
    match &shown {
        DisplayEvent::BubbleShown {
            event_type,
            source,
            turn,
            ..
        } => {
            assert_eq!(*event_type, CommentaryEventType::CombatStart);
            assert_eq!(*source, LineSource::Scripted);
            assert_eq!(*turn, 0);
        }
        other => panic!("expected bubble to show, got {other:?}"),
    }
    assert!(shown_at >= Duration::from_millis(800), "shown at {shown_at:?}");
    assert!(shown_at < Duration::from_millis(900), "shown at {shown_at:?}");
    assert!(handle.current_bubble().is_some());

    let fading = next_display(&mut display_rx).await;
    assert!(matches!(fading, DisplayEvent::BubbleFading { .. }));
    let visible_for = start.elapsed() - shown_at;
    assert!(visible_for >= Duration::from_millis(2500), "{visible_for:?}");
    assert!(visible_for < Duration::from_millis(2600), "{visible_for:?}");

    let dismissed = next_display(&mut display_rx).await;
    assert!(matches!(
        dismissed,
        DisplayEvent::BubbleDismissed {
            preempted: false,
            ..
        }
    ));
    let total = start.elapsed() - shown_at;
    assert!(total >= Duration::from_millis(3000), "{total:?}");
    assert!(total < Duration::from_millis(3100), "{total:?}");
    assert_eq!(handle.current_bubble(), None);

    assert_eq!(metrics.shown(), 1);
    assert_eq!(metrics.successes(), 1);
    runtime.shutdown().await.unwrap();
}

/// A narrative that takes 3 s is abandoned at 2 s: no bubble, a timeout in
/// telemetry, and combat never waits for it. The attack clip still plays out
/// in full.
#[tokio::test(start_paused = true)]
async fn slow_narrative_times_out_without_blocking_combat() {
    let log = InMemoryAnalyticsLog::new();
    let player = TimedAnimationPlayer::shared(ClipTimings::uniform(Duration::from_millis(500)));
    let mut playback = player.subscribe();
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new().with_delay(Duration::from_secs(3)))
        .animation_player(Arc::<TimedAnimationPlayer>::clone(&player))
        .analytics_repository(log.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    let start = Instant::now();
    let id = handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    let outcome = handle.resolve_player_action(id, normal_hit()).await.unwrap();
    assert_eq!(outcome.result.damage, 20);
    assert!(start.elapsed() < Duration::from_millis(10));

    clip_finished(
        &mut playback,
        AnimationClip::new(Side::Player, ClipKind::Attack),
    )
    .await;
    let clip_done = start.elapsed();
    assert!(clip_done >= Duration::from_millis(500), "{clip_done:?}");
    assert!(clip_done < Duration::from_millis(600), "{clip_done:?}");
    assert_eq!(handle.current_bubble(), None);

    // The player hit replaces the pending start commentary.
    let first = next_display(&mut display_rx).await;
    assert_eq!(
        first,
        DisplayEvent::BubbleSuppressed {
            session: id,
            turn: 0,
            event_type: CommentaryEventType::CombatStart,
            reason: SuppressReason::Superseded,
        }
    );

    let second = next_display(&mut display_rx).await;
    assert_eq!(
        second,
        DisplayEvent::BubbleSuppressed {
            session: id,
            turn: 1,
            event_type: CommentaryEventType::PlayerHit,
            reason: SuppressReason::Timeout,
        }
    );
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    assert_eq!(handle.current_bubble(), None);
    assert_eq!(player.state(), PlaybackState::Idle);

    // Combat is still live after the timeout.
    handle
        .resolve_enemy_action(id, ActionIntent::new(20.0, 0.0).unwrap())
        .await
        .unwrap();

    runtime.shutdown().await.unwrap();

    // Both requests ran to their timeout and were logged, superseded or not.
    assert_eq!(metrics.timeouts(), 2);
    assert_eq!(metrics.shown(), 0);
    let entries = log.entries().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.outcome, RequestOutcome::Timeout);
        assert!(!entry.success);
        assert!(entry.latency_ms >= 2000);
        assert!(entry.error.is_some());
    }
}

/// The intro clip is done at 200 ms but the narrative needs 1.5 s: the bubble
/// appears with the narrative, not with the clip.
#[tokio::test(start_paused = true)]
async fn bubble_waits_for_slow_narrative_after_animation() {
    let player = TimedAnimationPlayer::shared(ClipTimings::uniform(Duration::from_millis(200)));
    let mut playback = player.subscribe();
    let runtime = Runtime::builder()
        .narrative_provider(
            StaticNarrativeProvider::new().with_delay(Duration::from_millis(1500)),
        )
        .animation_player(Arc::<TimedAnimationPlayer>::clone(&player))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut display_rx = handle.subscribe(Topic::Display);

    let start = Instant::now();
    handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();

    clip_finished(&mut playback, AnimationClip::new(Side::Enemy, ClipKind::Intro)).await;
    let clip_done = start.elapsed();
    assert!(clip_done >= Duration::from_millis(200), "{clip_done:?}");
    assert!(clip_done < Duration::from_millis(300), "{clip_done:?}");
    assert_eq!(handle.current_bubble(), None);

    let shown = next_display(&mut display_rx).await;
    let shown_at = start.elapsed();
    assert!(
        matches!(
            shown,
            DisplayEvent::BubbleShown {
                event_type: CommentaryEventType::CombatStart,
                ..
            }
        ),
        "{shown:?}"
    );
    assert!(shown_at >= Duration::from_millis(1500), "shown at {shown_at:?}");
    assert!(shown_at < Duration::from_millis(1600), "shown at {shown_at:?}");

    runtime.shutdown().await.unwrap();
}

/// A visible bubble is cleared as soon as a newer event arrives, and only the
/// newer event's bubble is shown.
#[tokio::test(start_paused = true)]
async fn newer_event_preempts_visible_bubble() {
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new().with_delay(Duration::from_millis(300)))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);
    let mut bubble_rx = handle.bubble();

    let id = handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    let shown = next_display(&mut display_rx).await;
    assert_eq!(shown.event_type(), CommentaryEventType::CombatStart);
    assert!(matches!(shown, DisplayEvent::BubbleShown { .. }));

    bubble_rx.changed().await.unwrap();
    assert_eq!(
        bubble_rx.borrow_and_update().as_ref().map(|b| b.event_type),
        Some(CommentaryEventType::CombatStart)
    );

    handle.resolve_player_action(id, normal_hit()).await.unwrap();

    let dismissed = next_display(&mut display_rx).await;
    assert_eq!(
        dismissed,
        DisplayEvent::BubbleDismissed {
            session: id,
            turn: 0,
            event_type: CommentaryEventType::CombatStart,
            preempted: true,
        }
    );

    let shown = next_display(&mut display_rx).await;
    match shown {
        DisplayEvent::BubbleShown {
            event_type, turn, ..
        } => {
            assert_eq!(event_type, CommentaryEventType::PlayerHit);
            assert_eq!(turn, 1);
        }
        other => panic!("expected player hit bubble, got {other:?}"),
    }
    let bubble = handle.current_bubble().expect("player hit bubble on screen");
    assert_eq!(bubble.turn, 1);

    assert_eq!(metrics.shown(), 2);
    assert_eq!(metrics.superseded(), 1);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_narrative_is_logged_and_hidden() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("analytics.jsonl");

    let runtime = Runtime::builder()
        .narrative_provider(UnavailableNarrative)
        .analytics_repository(FileAnalyticsLog::create(&path).unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();

    let event = next_display(&mut display_rx).await;
    assert!(matches!(
        event,
        DisplayEvent::BubbleSuppressed {
            reason: SuppressReason::Failure,
            ..
        }
    ));
    assert_eq!(handle.current_bubble(), None);

    runtime.shutdown().await.unwrap();
    assert_eq!(metrics.failures(), 1);

    let entries = FileAnalyticsLog::read_all(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, RequestOutcome::Failure);
    assert_eq!(entries[0].event_type, CommentaryEventType::CombatStart);
    assert!(entries[0].error.as_deref().unwrap_or_default().contains("503"));
}

#[tokio::test(start_paused = true)]
async fn disabled_commentary_suppresses_without_requests() {
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new())
        .commentary(CommentaryConfig {
            enabled: false,
            ..Default::default()
        })
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    let id = handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    let event = next_display(&mut display_rx).await;
    assert!(matches!(
        event,
        DisplayEvent::BubbleSuppressed {
            reason: SuppressReason::Disabled,
            ..
        }
    ));

    // Combat itself is unaffected.
    let outcome = handle.resolve_player_action(id, normal_hit()).await.unwrap();
    assert_eq!(outcome.result.enemy_hp, 80);

    runtime.shutdown().await.unwrap();
    assert_eq!(metrics.requests(), 0);
    assert_eq!(metrics.shown(), 0);
}

/// Stopping the runtime clears pending and visible bubbles without counting
/// them as replaced by a newer event.
#[tokio::test(start_paused = true)]
async fn shutdown_is_not_counted_as_preemption() {
    // Pending: narrative still in flight.
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new().with_delay(Duration::from_millis(500)))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    let id = handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(metrics.requests(), 1);
    runtime.shutdown().await.unwrap();

    let event = next_display(&mut display_rx).await;
    assert_eq!(
        event,
        DisplayEvent::BubbleSuppressed {
            session: id,
            turn: 0,
            event_type: CommentaryEventType::CombatStart,
            reason: SuppressReason::Shutdown,
        }
    );
    assert_eq!(metrics.superseded(), 0);
    assert_eq!(metrics.shown(), 0);

    // Visible: bubble on screen when the runtime stops.
    let runtime = Runtime::builder()
        .narrative_provider(StaticNarrativeProvider::new())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let metrics = runtime.metrics();
    let mut display_rx = handle.subscribe(Topic::Display);

    handle
        .create_session(loadout("hero"), loadout("goblin"))
        .await
        .unwrap();
    let shown = next_display(&mut display_rx).await;
    assert!(matches!(shown, DisplayEvent::BubbleShown { .. }), "{shown:?}");

    runtime.shutdown().await.unwrap();
    let event = next_display(&mut display_rx).await;
    assert!(
        matches!(
            event,
            DisplayEvent::BubbleDismissed {
                preempted: false,
                ..
            }
        ),
        "{event:?}"
    );
    assert_eq!(handle.current_bubble(), None);
    assert_eq!(metrics.shown(), 1);
    assert_eq!(metrics.superseded(), 0);
}
