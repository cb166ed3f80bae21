use serde::{Deserialize, Serialize};

use crate::board::{Board, IntersectionId};
use crate::error::SetupError;
use crate::game::action::Action;
use crate::game::distribution;
use crate::game::event::{GameOutcome, Standing};
use crate::game::placement;
use crate::game::players::PlayerState;
use crate::game::resources::ResourceBundle;
use crate::game::rules::{self, PlacementPhase, RuleViolation, SetupRoadRule};
use crate::types::PlayerId;

/// Hard ceiling on the round count, whatever the configuration says.
pub const MAX_ROUNDS_CAP: u32 = 8192;
pub const DEFAULT_MAX_ROUNDS: u32 = 100;
pub const VICTORY_POINTS_TO_WIN: u32 = 10;
/// More cards than this forces building before the normal action.
pub const HAND_LIMIT: u32 = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub max_rounds: u32,
    pub seed: u64,
    pub setup_road_rule: SetupRoadRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: 42,
            setup_road_rule: SetupRoadRule::Adjacent,
        }
    }
}

impl GameConfig {
    /// Round limit after applying the hard cap. Never below one.
    pub fn round_limit(&self) -> u32 {
        self.max_rounds.clamp(1, MAX_ROUNDS_CAP)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacement {
    Settlement,
    Road,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStep {
    pub player: PlayerId,
    pub placement: SetupPlacement,
    pub second_round: bool,
}

/// Snake order: every player places a settlement and a road front to back,
/// then again back to front.
#[derive(Debug, Clone)]
pub struct SetupState {
    steps: Vec<SetupStep>,
    cursor: usize,
    anchor: Option<IntersectionId>,
}

impl SetupState {
    pub fn new(num_players: usize) -> Self {
        let forward = (0..num_players).map(|p| (p, false));
        let backward = (0..num_players).rev().map(|p| (p, true));
        let steps = forward
            .chain(backward)
            .flat_map(|(player, second_round)| {
                [SetupPlacement::Settlement, SetupPlacement::Road].map(|placement| SetupStep {
                    player,
                    placement,
                    second_round,
                })
            })
            .collect();
        Self {
            steps,
            cursor: 0,
            anchor: None,
        }
    }

    pub fn current(&self) -> Option<SetupStep> {
        self.steps.get(self.cursor).copied()
    }

    /// The settlement placed by the current player in this pass, if it was
    /// placed.
    pub fn anchor(&self) -> Option<IntersectionId> {
        self.anchor
    }

    pub(crate) fn advance(&mut self, placed_settlement: Option<IntersectionId>) {
        if let Some(step) = self.current() {
            self.anchor = match step.placement {
                SetupPlacement::Settlement => placed_settlement,
                SetupPlacement::Road => None,
            };
        }
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    Setup,
    Rolling,
    ForcedBuildDown,
    NormalAction,
    RoundComplete,
    GameOver(GameOutcome),
}

/// Board, players and turn bookkeeping. The [`Game`](crate::game::Game)
/// driver moves it through its phases.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub players: Vec<PlayerState>,
    pub phase: TurnPhase,
    pub setup: SetupState,
    /// 0 during setup, then 1-based.
    pub round: u32,
    pub current_player: PlayerId,
}

impl GameState {
    pub fn new(config: GameConfig, board: Board) -> Result<Self, SetupError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(SetupError::PlayerCount(config.num_players));
        }
        let players = (0..config.num_players).map(PlayerState::new).collect();
        let setup = SetupState::new(config.num_players);
        Ok(Self {
            config,
            board,
            players,
            phase: TurnPhase::Setup,
            setup,
            round: 0,
            current_player: 0,
        })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            TurnPhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.players
            .iter()
            .map(|p| Standing {
                player: p.id,
                victory_points: p.victory_points,
                cards: p.card_count(),
            })
            .collect()
    }

    /// Legal choices for the acting player in the current phase.
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase {
            TurnPhase::Setup => match self.setup.current() {
                Some(step) => match step.placement {
                    SetupPlacement::Settlement => {
                        rules::legal_setup_settlements(&self.board, step.player)
                    }
                    SetupPlacement::Road => rules::legal_setup_roads(
                        &self.board,
                        self.setup.anchor(),
                        self.config.setup_road_rule,
                    ),
                },
                None => Vec::new(),
            },
            TurnPhase::ForcedBuildDown | TurnPhase::NormalAction => self
                .players
                .get(self.current_player)
                .map(|player| rules::legal_actions(&self.board, player))
                .unwrap_or_default(),
            TurnPhase::Rolling | TurnPhase::RoundComplete | TurnPhase::GameOver(_) => Vec::new(),
        }
    }

    /// Applies a setup placement for the current step. On success returns the
    /// starting grant, which is non-empty only for the second settlement.
    pub fn apply_setup(&mut self, action: Action) -> Result<ResourceBundle, RuleViolation> {
        let Some(step) = self.setup.current() else {
            return Err(RuleViolation::OutOfPhase(action));
        };
        let player = self
            .players
            .get_mut(step.player)
            .ok_or(RuleViolation::OutOfPhase(action))?;
        match (step.placement, action) {
            (SetupPlacement::Settlement, Action::BuildSettlement(node)) => {
                placement::place_settlement(&mut self.board, player, node, PlacementPhase::Setup)?;
                if !step.second_round {
                    return Ok(ResourceBundle::zero());
                }
                let grant = distribution::starting_grant(&self.board, node);
                player.add_resources(&grant);
                Ok(grant)
            }
            (SetupPlacement::Road, Action::BuildRoad(path)) => {
                placement::place_setup_road(
                    &mut self.board,
                    player,
                    path,
                    self.setup.anchor(),
                    self.config.setup_road_rule,
                )?;
                Ok(ResourceBundle::zero())
            }
            _ => Err(RuleViolation::OutOfPhase(action)),
        }
    }

    /// Applies a main-phase action for the current player.
    pub fn apply(&mut self, action: Action) -> Result<(), RuleViolation> {
        let player = self
            .players
            .get_mut(self.current_player)
            .ok_or(RuleViolation::OutOfPhase(action))?;
        placement::apply(&mut self.board, player, action)
    }

    pub fn winner(&self) -> Option<&PlayerState> {
        self.players
            .get(self.current_player)
            .filter(|p| p.victory_points >= VICTORY_POINTS_TO_WIN)
    }

    pub fn is_last_player(&self) -> bool {
        self.current_player + 1 >= self.players.len()
    }
}
