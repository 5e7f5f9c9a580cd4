//! Terminal client entry point.
//!
//! Runs one scripted encounter: both sides tap from seeded generators, the
//! runtime narrates, and the outcome is printed once the session settles.
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_core::{Loadout, ResolveOutcome, SessionStatus};
use combat_runtime::{
    DisplayEvent, Event, FileAnalyticsLog, HttpNarrativeProvider, RewardChannel, Runtime,
    RuntimeConfig, SeededTapProvider, StaticNarrativeProvider, TapProvider, TimedAnimationPlayer,
    Topic,
};
use config::CliConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();

    // Keep the guard alive so buffered log lines reach the file
    let _guard = setup_logging(config.session_id.as_deref())?;

    run_encounter(config).await
}

async fn run_encounter(config: CliConfig) -> Result<()> {
    let factory = ContentFactory::embedded();
    let balance = factory.load_balance()?;
    let weapons = factory.load_weapons_with(&balance)?;
    let roster = factory.load_roster()?;

    let mut player = roster.loadout("hero", &weapons)?;
    if let Some(pattern) = &config.weapon {
        player.weapon = weapons.require(pattern)?;
    }
    if let Some(accuracy) = config.player_accuracy {
        player.snapshot.accuracy = accuracy;
    }
    let mut enemy = roster.loadout(&config.enemy, &weapons)?;
    if let Some(accuracy) = config.enemy_accuracy {
        enemy.snapshot.accuracy = accuracy;
    }

    let (rewards, mut handoffs) = RewardChannel::new();
    let mut builder = Runtime::builder()
        .config(RuntimeConfig {
            combat: balance,
            ..Default::default()
        })
        .animation_player(TimedAnimationPlayer::shared(Default::default()))
        .reward_calculator(rewards)
        .tap_provider(SeededTapProvider::new(config.seed.wrapping_add(1)));

    builder = match &config.narrative_url {
        Some(url) => {
            let mut provider = HttpNarrativeProvider::new(url);
            if let Some(key) = &config.narrative_api_key {
                provider = provider.with_api_key(key);
            }
            tracing::info!("Narrative service: {}", provider.endpoint());
            builder.narrative_provider(provider)
        }
        None => {
            tracing::info!("NARRATIVE_URL not set; using scripted lines");
            builder.narrative_provider(StaticNarrativeProvider::new())
        }
    };
    if let Some(path) = &config.analytics_log {
        let log = FileAnalyticsLog::open(path)
            .with_context(|| format!("Failed to open analytics log {}", path.display()))?;
        builder = builder.analytics_repository(log);
    }

    let runtime = builder.build().await?;
    let handle = runtime.handle();
    let display = tokio::spawn(print_bubbles(handle.subscribe(Topic::Display)));

    print_matchup(&player, &enemy);
    let session = handle.create_session(player, enemy).await?;
    let player_taps = SeededTapProvider::new(config.seed);

    loop {
        tokio::time::sleep(config.turn_delay).await;
        let Some(snapshot) = handle.query_session(session).await? else {
            break;
        };
        if snapshot.turn() >= config.max_turns {
            println!("The hero has seen enough and withdraws.");
            handle.retreat(session).await?;
            break;
        }

        let intent = player_taps.next_tap(&snapshot).await?;
        let outcome = handle.resolve_player_action(session, intent).await?;
        print_turn("Hero", &outcome);
        if outcome.status.is_terminal() {
            break;
        }

        tokio::time::sleep(config.turn_delay).await;
        let outcome = runtime.enemy_turn(session).await?;
        print_turn("Enemy", &outcome);
        if outcome.status.is_terminal() {
            break;
        }
    }

    if let Some(handoff) = handoffs.recv().await {
        let verdict = match handoff.outcome {
            SessionStatus::Victory => "Victory",
            SessionStatus::Defeat => "Defeat",
            SessionStatus::Retreated => "Retreated",
            SessionStatus::Ongoing => "Unfinished",
        };
        println!("\n{verdict} after {} turns.", handoff.turn_count);
    }

    // Give the final line time to play out
    let commentary = RuntimeConfig::default().commentary;
    tokio::time::sleep(
        commentary.narrative_timeout + commentary.visible_duration + commentary.fade_duration,
    )
    .await;

    let metrics = runtime.metrics().snapshot();
    runtime.shutdown().await?;
    display.abort();

    println!(
        "Commentary: {} requested, {} shown, {} timed out, {} failed (avg {} ms)",
        metrics.requests,
        metrics.shown,
        metrics.timeouts,
        metrics.failures,
        metrics.avg_latency.as_millis()
    );
    Ok(())
}

fn print_matchup(player: &Loadout, enemy: &Loadout) {
    println!(
        "{} ({}, accuracy {}) vs {} ({}, accuracy {})\n",
        player.snapshot.name,
        player.weapon.pattern(),
        player.snapshot.accuracy,
        enemy.snapshot.name,
        enemy.weapon.pattern(),
        enemy.snapshot.accuracy,
    );
}

fn print_turn(actor: &str, outcome: &ResolveOutcome) {
    let result = &outcome.result;
    println!(
        "[turn {:>2}] {actor:<5} {:<6} at {:>5.1}° for {:>2}  | hero {:>3} hp, enemy {:>3} hp",
        result.sequence,
        result.zone,
        result.effective_angle,
        result.damage,
        result.player_hp,
        result.enemy_hp,
    );
}

async fn print_bubbles(mut rx: tokio::sync::broadcast::Receiver<Event>) {
    while let Ok(event) = rx.recv().await {
        if let Event::Display(DisplayEvent::BubbleShown { text, tone, .. }) = event {
            println!("           💬 \"{text}\" ({tone})");
        }
    }
}

/// Setup logging to both stderr and file
fn setup_logging(
    session_id: Option<&str>,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Create session ID if not provided
    let session_id = match session_id {
        Some(id) => id.to_owned(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            format!("session_{timestamp}")
        }
    };

    // Create session-specific log directory
    let session_log_dir = log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    // Setup file appender
    let file_appender = tracing_appender::rolling::never(&session_log_dir, "combat.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/combat.log", session_log_dir.display());

    Ok(guard)
}

/// Platform-specific log directory
fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "dial-combat")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/dial-combat"))
        .join("logs")
}
