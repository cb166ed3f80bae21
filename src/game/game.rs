use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::board::{Board, MapSource};
use crate::error::SetupError;
use crate::game::action::Action;
use crate::game::distribution;
use crate::game::event::{EventKind, GameEvent, GameOutcome};
use crate::game::players::PlayerState;
use crate::game::state::{GameConfig, GameState, HAND_LIMIT, SetupPlacement, TurnPhase};
use crate::players::Policy;
use crate::types::PlayerId;

/// What a policy gets to look at when deciding.
pub struct GameView<'a> {
    pub board: &'a Board,
    pub players: &'a [PlayerState],
    pub me: PlayerId,
    pub round: u32,
    pub phase: TurnPhase,
    pub legal_actions: &'a [Action],
}

impl GameView<'_> {
    pub fn is_forced(&self) -> bool {
        self.phase == TurnPhase::ForcedBuildDown
    }
}

/// Drives a [`GameState`] through its phases. Owns the only random source
/// used for dice and policy tie-breaking.
pub struct Game {
    pub id: Uuid,
    pub state: GameState,
    rng: StdRng,
}

impl Game {
    /// Builds the board from `map` and seats `config.num_players` players.
    pub fn new(config: GameConfig, map: &MapSource) -> Result<Self, SetupError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = Board::from_source(map, &mut rng)?;
        Ok(Self {
            id: Uuid::new_v4(),
            state: GameState::new(config, board)?,
            rng,
        })
    }

    /// Runs to completion, handing every event to `on_event`.
    pub fn play<P: Policy>(
        &mut self,
        policies: &[P],
        mut on_event: impl FnMut(&GameEvent),
    ) -> GameOutcome {
        loop {
            for event in self.tick(policies) {
                on_event(&event);
            }
            if let Some(outcome) = self.state.outcome() {
                return outcome;
            }
        }
    }

    /// Advances one phase transition and returns the events it produced.
    /// Does nothing once the game is over.
    pub fn tick<P: Policy>(&mut self, policies: &[P]) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.state.phase {
            TurnPhase::Setup => self.setup_step(policies, &mut events),
            TurnPhase::Rolling => self.roll(&mut events),
            TurnPhase::ForcedBuildDown => self.forced_step(policies, &mut events),
            TurnPhase::NormalAction => self.normal_step(policies, &mut events),
            TurnPhase::RoundComplete => self.complete_round(&mut events),
            TurnPhase::GameOver(_) => {}
        }
        events
    }

    fn event(&self, player: Option<PlayerId>, kind: EventKind) -> GameEvent {
        GameEvent {
            round: self.state.round,
            player,
            kind,
        }
    }

    fn decide<P: Policy>(&mut self, policies: &[P], player: PlayerId) -> Option<Action> {
        let legal = self.state.legal_actions();
        let policy = policies.get(player)?;
        let view = GameView {
            board: &self.state.board,
            players: &self.state.players,
            me: player,
            round: self.state.round,
            phase: self.state.phase,
            legal_actions: &legal,
        };
        policy.choose_action(&view, &mut self.rng)
    }

    fn setup_step<P: Policy>(&mut self, policies: &[P], events: &mut Vec<GameEvent>) {
        let Some(step) = self.state.setup.current() else {
            self.finish_setup(events);
            return;
        };
        let player = Some(step.player);
        let mut placed = None;

        match self.decide(policies, step.player) {
            None => events.push(self.event(player, EventKind::SetupStepSkipped)),
            Some(action) => match self.state.apply_setup(action) {
                Ok(grant) => {
                    if let (SetupPlacement::Settlement, Action::BuildSettlement(node)) =
                        (step.placement, action)
                    {
                        placed = Some(node);
                    }
                    events.push(self.event(
                        player,
                        EventKind::Built {
                            action,
                            forced: false,
                        },
                    ));
                    if !grant.is_empty() {
                        let kind = EventKind::StartingResources { bundle: grant };
                        events.push(self.event(player, kind));
                    }
                }
                Err(reason) => {
                    debug!(player = step.player, %action, %reason, "setup placement rejected");
                    events.push(self.event(
                        player,
                        EventKind::ActionRejected {
                            action,
                            reason: reason.to_string(),
                            forced: false,
                        },
                    ));
                }
            },
        }

        self.state.setup.advance(placed);
        if self.state.setup.is_complete() {
            self.finish_setup(events);
        }
    }

    fn finish_setup(&mut self, events: &mut Vec<GameEvent>) {
        self.state.round = 1;
        self.state.current_player = 0;
        self.state.phase = TurnPhase::Rolling;
        info!(game = %self.id, "setup complete");
        events.push(self.event(None, EventKind::SetupComplete));
    }

    fn roll(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.state.current_player;
        let dice = distribution::roll_dice(&mut self.rng);
        let total = dice.0 + dice.1;
        debug!(round = self.state.round, player, total, "dice rolled");
        events.push(self.event(Some(player), EventKind::DiceRolled { dice, total }));

        let gained = distribution::distribute(&self.state.board, &mut self.state.players, total);
        for (id, bundle) in gained.into_iter().enumerate() {
            if !bundle.is_empty() {
                events.push(self.event(Some(id), EventKind::ResourcesProduced { bundle }));
            }
        }
        self.state.phase = TurnPhase::ForcedBuildDown;
    }

    /// One forced build per tick while the hand is over the limit. Leaves the
    /// phase as soon as the policy passes or its choice is refused.
    fn forced_step<P: Policy>(&mut self, policies: &[P], events: &mut Vec<GameEvent>) {
        let player = self.state.current_player;
        let over_limit = self
            .state
            .player(player)
            .is_some_and(|p| p.card_count() > HAND_LIMIT);
        if !over_limit {
            self.state.phase = TurnPhase::NormalAction;
            return;
        }
        match self.decide(policies, player) {
            Some(action) => {
                if !self.try_apply(player, action, true, events) {
                    self.state.phase = TurnPhase::NormalAction;
                }
            }
            None => self.state.phase = TurnPhase::NormalAction,
        }
    }

    fn normal_step<P: Policy>(&mut self, policies: &[P], events: &mut Vec<GameEvent>) {
        let player = self.state.current_player;
        match self.decide(policies, player) {
            Some(action) => {
                self.try_apply(player, action, false, events);
            }
            None => events.push(self.event(Some(player), EventKind::Passed)),
        }

        if let Some(winner) = self.state.winner() {
            let outcome = GameOutcome::Victory {
                winner: winner.id,
                victory_points: winner.victory_points,
            };
            events.push(self.event(
                None,
                EventKind::RoundSummary {
                    standings: self.state.standings(),
                },
            ));
            self.finish(outcome, events);
        } else if self.state.is_last_player() {
            self.state.phase = TurnPhase::RoundComplete;
        } else {
            self.state.current_player += 1;
            self.state.phase = TurnPhase::Rolling;
        }
    }

    fn try_apply(
        &mut self,
        player: PlayerId,
        action: Action,
        forced: bool,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match self.state.apply(action) {
            Ok(()) => {
                events.push(self.event(Some(player), EventKind::Built { action, forced }));
                true
            }
            Err(reason) => {
                debug!(player, %action, %reason, forced, "action rejected");
                events.push(self.event(
                    Some(player),
                    EventKind::ActionRejected {
                        action,
                        reason: reason.to_string(),
                        forced,
                    },
                ));
                false
            }
        }
    }

    fn complete_round(&mut self, events: &mut Vec<GameEvent>) {
        events.push(self.event(
            None,
            EventKind::RoundSummary {
                standings: self.state.standings(),
            },
        ));
        if self.state.round >= self.state.config.round_limit() {
            let outcome = GameOutcome::RoundLimit {
                rounds: self.state.round,
            };
            self.finish(outcome, events);
        } else {
            self.state.round += 1;
            self.state.current_player = 0;
            self.state.phase = TurnPhase::Rolling;
        }
    }

    fn finish(&mut self, outcome: GameOutcome, events: &mut Vec<GameEvent>) {
        self.state.phase = TurnPhase::GameOver(outcome);
        info!(game = %self.id, round = self.state.round, %outcome, "game over");
        events.push(self.event(None, EventKind::GameOver { outcome }));
    }
}
