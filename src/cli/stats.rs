use std::time::Duration;

use crate::game::event::GameOutcome;
use crate::game::game::Game;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    /// Indexed by seat.
    pub wins: Vec<u32>,
    pub victory_points: Vec<Vec<u32>>,
    pub games: u32,
    pub total_rounds: u64,
    pub round_limit_endings: u32,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            victory_points: vec![Vec::new(); num_players],
            ..Self::default()
        }
    }

    pub fn record_game(&mut self, game: &Game, outcome: GameOutcome, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_rounds += u64::from(game.state.round);

        match outcome.winner() {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(winner) {
                    *wins += 1;
                }
            }
            None => self.round_limit_endings += 1,
        }

        for player in &game.state.players {
            if let Some(points) = self.victory_points.get_mut(player.id) {
                points.push(player.victory_points);
            }
        }
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(seat).copied().unwrap_or(0) as f64 / self.games as f64
    }

    pub fn avg_victory_points(&self, seat: usize) -> f64 {
        match self.victory_points.get(seat) {
            Some(points) if !points.is_empty() => {
                points.iter().sum::<u32>() as f64 / points.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn avg_rounds(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games as f64
    }

    pub fn avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}
