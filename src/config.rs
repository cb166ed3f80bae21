//! Run configuration.
//!
//! ```toml
//! max_rounds = 100
//! seed = 42
//! players = 4
//! map = "standard"            # "shuffled" or a path to a .map file
//! setup_road_rule = "adjacent" # or "anywhere"
//! ```
//!
//! Loading never fails. A missing or unparsable file yields the defaults, and
//! every key that is present but unusable falls back on its own.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::MapSource;
use crate::game::rules::SetupRoadRule;
use crate::game::state::{
    DEFAULT_MAX_ROUNDS, GameConfig, MAX_PLAYERS, MAX_ROUNDS_CAP, MIN_PLAYERS,
};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub max_rounds: u32,
    pub seed: u64,
    pub players: usize,
    pub map: MapSource,
    pub setup_road_rule: SetupRoadRule,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: DEFAULT_SEED,
            players: DEFAULT_PLAYERS,
            map: MapSource::Standard,
            setup_road_rule: SetupRoadRule::Adjacent,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "config file unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml_str(text: &str) -> Self {
        let table = match text.parse::<toml::Table>() {
            Ok(table) => table,
            Err(err) => {
                warn!(%err, "config is not valid TOML, using defaults");
                return Self::default();
            }
        };

        let mut config = Self::default();
        for (key, value) in &table {
            match key.as_str() {
                "max_rounds" => match value.as_integer() {
                    Some(rounds) => config.set_max_rounds(rounds),
                    None => warn!(%value, "max_rounds must be an integer, keeping default"),
                },
                "seed" => match value.as_integer().and_then(|v| u64::try_from(v).ok()) {
                    Some(seed) => config.seed = seed,
                    None => warn!(%value, "seed must be a non-negative integer, keeping default"),
                },
                "players" => match value
                    .as_integer()
                    .and_then(|v| usize::try_from(v).ok())
                    .filter(|n| (MIN_PLAYERS..=MAX_PLAYERS).contains(n))
                {
                    Some(players) => config.players = players,
                    None => warn!(
                        %value,
                        "players must be {MIN_PLAYERS}..={MAX_PLAYERS}, keeping {DEFAULT_PLAYERS}"
                    ),
                },
                "map" => match value.as_str().map(str::parse::<MapSource>) {
                    Some(Ok(map)) => config.map = map,
                    _ => warn!(%value, "map must be standard, shuffled or a path"),
                },
                "setup_road_rule" => match value.as_str().map(str::parse::<SetupRoadRule>) {
                    Some(Ok(rule)) => config.setup_road_rule = rule,
                    _ => warn!(%value, "setup_road_rule must be adjacent or anywhere"),
                },
                other => warn!(key = other, "ignoring unknown config key"),
            }
        }
        config
    }

    /// Round limit from any source. Values above the hard cap clamp to it and
    /// values below one leave the current limit in place.
    pub fn set_max_rounds(&mut self, rounds: i64) {
        if rounds > i64::from(MAX_ROUNDS_CAP) {
            warn!(rounds, "max_rounds above {MAX_ROUNDS_CAP}, clamping");
            self.max_rounds = MAX_ROUNDS_CAP;
        } else if rounds >= 1 {
            // In range, so the cast is lossless.
            self.max_rounds = rounds as u32;
        } else {
            warn!(rounds, "max_rounds must be at least 1, keeping {}", self.max_rounds);
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            num_players: self.players,
            max_rounds: self.max_rounds,
            seed: self.seed,
            setup_road_rule: self.setup_road_rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn full_file_is_read() {
        let config = RunConfig::from_toml_str(
            r#"
            max_rounds = 250
            seed = 7
            players = 3
            map = "shuffled"
            setup_road_rule = "anywhere"
            "#,
        );
        assert_eq!(
            config,
            RunConfig {
                max_rounds: 250,
                seed: 7,
                players: 3,
                map: MapSource::Shuffled,
                setup_road_rule: SetupRoadRule::Anywhere,
            }
        );
    }

    #[test]
    fn bad_keys_fall_back_one_by_one() {
        let config = RunConfig::from_toml_str(
            r#"
            max_rounds = "lots"
            seed = -1
            players = 9
            map = "maps/standard.map"
            setup_road_rule = "sideways"
            "#,
        );
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.players, DEFAULT_PLAYERS);
        assert_eq!(config.map, MapSource::File(PathBuf::from("maps/standard.map")));
        assert_eq!(config.setup_road_rule, SetupRoadRule::Adjacent);
    }

    #[test]
    fn max_rounds_is_bounded() {
        let clamped = RunConfig::from_toml_str("max_rounds = 100000");
        assert_eq!(clamped.max_rounds, MAX_ROUNDS_CAP);
        let ignored = RunConfig::from_toml_str("max_rounds = 0");
        assert_eq!(ignored.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(RunConfig::from_toml_str("max_rounds = 1").max_rounds, 1);
    }

    #[test]
    fn overrides_follow_the_file_rules() {
        let mut config = RunConfig::from_toml_str("max_rounds = 250");
        config.set_max_rounds(0);
        assert_eq!(config.max_rounds, 250);
        config.set_max_rounds(-3);
        assert_eq!(config.max_rounds, 250);
        config.set_max_rounds(20_000);
        assert_eq!(config.max_rounds, MAX_ROUNDS_CAP);
        config.set_max_rounds(12);
        assert_eq!(config.max_rounds, 12);
    }

    #[test]
    fn garbage_and_missing_files_give_defaults() {
        assert_eq!(RunConfig::from_toml_str("max_rounds = = ="), RunConfig::default());
        assert_eq!(
            RunConfig::load(Path::new("no/such/config.toml")),
            RunConfig::default()
        );
    }

    #[test]
    fn converts_to_engine_config() {
        let config = RunConfig {
            players: 2,
            ..RunConfig::default()
        };
        let game = config.game_config();
        assert_eq!(game.num_players, 2);
        assert_eq!(game.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(game.seed, DEFAULT_SEED);
    }
}
