use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::game::action::Action;
use crate::game::resources::ResourceBundle;
use crate::types::PlayerId;

/// One line of the observable game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// 0 during setup.
    pub round: u32,
    pub player: Option<PlayerId>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    DiceRolled {
        dice: (u8, u8),
        total: u8,
    },
    ResourcesProduced {
        bundle: ResourceBundle,
    },
    StartingResources {
        bundle: ResourceBundle,
    },
    Built {
        action: Action,
        /// Taken while over the hand limit.
        forced: bool,
    },
    ActionRejected {
        action: Action,
        reason: String,
        forced: bool,
    },
    Passed,
    SetupStepSkipped,
    SetupComplete,
    RoundSummary {
        standings: Vec<Standing>,
    },
    GameOver {
        outcome: GameOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: PlayerId,
    pub victory_points: u32,
    pub cards: u32,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GameOutcome {
    Victory { winner: PlayerId, victory_points: u32 },
    RoundLimit { rounds: u32 },
}

impl GameOutcome {
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameOutcome::Victory { winner, .. } => Some(*winner),
            GameOutcome::RoundLimit { .. } => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Victory {
                winner,
                victory_points,
            } => write!(f, "player {winner} wins with {victory_points} victory points"),
            GameOutcome::RoundLimit { rounds } => write!(f, "round limit of {rounds} reached"),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::DiceRolled { dice, total } => {
                write!(f, "rolled {} + {} = {total}", dice.0, dice.1)
            }
            EventKind::ResourcesProduced { bundle } => write!(f, "receives {bundle}"),
            EventKind::StartingResources { bundle } => write!(f, "starts with {bundle}"),
            EventKind::Built { action, forced } => {
                if *forced {
                    write!(f, "[hand limit] builds {action}")
                } else {
                    write!(f, "builds {action}")
                }
            }
            EventKind::ActionRejected {
                action,
                reason,
                forced,
            } => {
                if *forced {
                    write!(f, "[hand limit] cannot build {action}: {reason}")
                } else {
                    write!(f, "cannot build {action}: {reason}")
                }
            }
            EventKind::Passed => write!(f, "passes"),
            EventKind::SetupStepSkipped => write!(f, "skips a setup placement"),
            EventKind::SetupComplete => write!(f, "setup complete"),
            EventKind::RoundSummary { standings } => {
                let parts = standings.iter().format_with(" | ", |s, f| {
                    f(&format_args!(
                        "player {} {} VP {} cards",
                        s.player, s.victory_points, s.cards
                    ))
                });
                write!(f, "standings: {parts}")
            }
            EventKind::GameOver { outcome } => write!(f, "game over, {outcome}"),
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.player {
            Some(player) => write!(f, "[Round {}] Player {player}: {}", self.round, self.kind),
            None => write!(f, "[Round {}] {}", self.round, self.kind),
        }
    }
}
