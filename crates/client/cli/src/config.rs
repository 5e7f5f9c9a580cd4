//! CLI configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one scripted encounter.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Roster id of the enemy.
    pub enemy: String,
    /// Weapon pattern that replaces the hero's roster weapon.
    pub weapon: Option<String>,
    /// Seed for both sides' tap generators.
    pub seed: u64,
    pub player_accuracy: Option<u32>,
    pub enemy_accuracy: Option<u32>,
    pub narrative_url: Option<String>,
    pub narrative_api_key: Option<String>,
    pub analytics_log: Option<PathBuf>,
    pub session_id: Option<String>,
    /// Pause between turns so commentary has time to play.
    pub turn_delay: Duration,
    /// The hero retreats once this many turns have passed.
    pub max_turns: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            enemy: "goblin".to_owned(),
            weapon: None,
            seed: 42,
            player_accuracy: None,
            enemy_accuracy: None,
            narrative_url: None,
            narrative_api_key: None,
            analytics_log: None,
            session_id: None,
            turn_delay: Duration::from_millis(1200),
            max_turns: 60,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_ENEMY` - Roster id of the enemy (default: goblin)
    /// - `COMBAT_WEAPON` - Weapon pattern for the hero (default: roster weapon)
    /// - `COMBAT_SEED` - Tap generator seed (default: 42)
    /// - `COMBAT_PLAYER_ACCURACY` / `COMBAT_ENEMY_ACCURACY` - Accuracy overrides
    /// - `COMBAT_TURN_DELAY_MS` - Pause between turns (default: 1200)
    /// - `COMBAT_MAX_TURNS` - Turn limit before the hero retreats (default: 60)
    /// - `NARRATIVE_URL` - Narrative service endpoint (default: scripted lines)
    /// - `NARRATIVE_API_KEY` - Bearer token for the narrative service
    /// - `ANALYTICS_LOG` - JSON-lines analytics file (default: disabled)
    /// - `COMBAT_SESSION_ID` - Log directory name (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(enemy) = env::var("COMBAT_ENEMY") {
            config.enemy = enemy;
        }
        config.weapon = env::var("COMBAT_WEAPON").ok();
        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.seed = seed;
        }
        config.player_accuracy = read_env("COMBAT_PLAYER_ACCURACY");
        config.enemy_accuracy = read_env("COMBAT_ENEMY_ACCURACY");
        if let Some(delay) = read_env::<u64>("COMBAT_TURN_DELAY_MS") {
            config.turn_delay = Duration::from_millis(delay);
        }
        if let Some(max_turns) = read_env::<u64>("COMBAT_MAX_TURNS") {
            config.max_turns = max_turns.max(1);
        }

        config.narrative_url = env::var("NARRATIVE_URL").ok();
        config.narrative_api_key = env::var("NARRATIVE_API_KEY").ok();
        config.analytics_log = env::var("ANALYTICS_LOG").ok().map(PathBuf::from);
        config.session_id = env::var("COMBAT_SESSION_ID").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
