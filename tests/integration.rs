//! End-to-end games through the public API.

use std::collections::HashMap;
use std::path::PathBuf;

use rand::RngCore;
use settlers_sim::board::{Board, MapSource};
use settlers_sim::error::SetupError;
use settlers_sim::game::placement;
use settlers_sim::game::{
    Action, EventKind, Game, GameConfig, GameEvent, GameOutcome, GameView, PlacementPhase,
    PlayerState, ResourceBundle, RuleViolation, SetupRoadRule, TurnPhase, VICTORY_POINTS_TO_WIN,
};
use settlers_sim::players::{GreedyPolicy, Policy, RandomPolicy};
use settlers_sim::types::StructureKind;

fn config(seed: u64, max_rounds: u32) -> GameConfig {
    GameConfig {
        num_players: 4,
        max_rounds,
        seed,
        setup_road_rule: SetupRoadRule::Adjacent,
    }
}

fn standard_game(seed: u64, max_rounds: u32) -> Game {
    Game::new(config(seed, max_rounds), &MapSource::Standard).unwrap()
}

fn run(game: &mut Game, policies: &[RandomPolicy]) -> (GameOutcome, Vec<GameEvent>) {
    let mut events = Vec::new();
    let outcome = game.play(policies, |e| events.push(e.clone()));
    (outcome, events)
}

#[test]
fn setup_places_two_settlements_and_two_roads_each() {
    let mut game = Game::new(config(11, 50), &MapSource::Standard).unwrap();
    let policies = [RandomPolicy; 4];
    let mut events = Vec::new();
    while game.state.phase == TurnPhase::Setup {
        events.extend(game.tick(&policies));
    }

    let mut settlements: HashMap<usize, Vec<u16>> = HashMap::new();
    let mut grants: HashMap<usize, ResourceBundle> = HashMap::new();
    for event in &events {
        match (&event.kind, event.player) {
            (EventKind::Built { action: Action::BuildSettlement(node), .. }, Some(p)) => {
                settlements.entry(p).or_default().push(*node);
            }
            (EventKind::StartingResources { bundle }, Some(p)) => {
                grants.insert(p, *bundle);
            }
            _ => {}
        }
    }

    for player in &game.state.players {
        assert_eq!(game.state.board.structures_of(player.id).count(), 2);
        assert_eq!(game.state.board.roads_of(player.id).count(), 2);
        assert_eq!(player.victory_points, 2);

        let second = settlements[&player.id][1];
        let productive = game
            .state
            .board
            .adjacent_tiles(second)
            .filter(|t| t.terrain.is_productive())
            .count() as u32;
        let granted = grants.get(&player.id).map(|b| b.total()).unwrap_or(0);
        assert_eq!(granted, productive);
        assert_eq!(player.card_count(), productive);
    }
    assert!(events.iter().all(|e| e.round == 0 || e.kind == EventKind::SetupComplete));
}

#[test]
fn every_setup_road_touches_its_settlement() {
    let mut game = Game::new(config(3, 10), &MapSource::Standard).unwrap();
    let policies = [RandomPolicy; 4];
    let mut last_settlement = None;
    while game.state.phase == TurnPhase::Setup {
        for event in game.tick(&policies) {
            match event.kind {
                EventKind::Built { action: Action::BuildSettlement(node), .. } => {
                    last_settlement = Some(node);
                }
                EventKind::Built { action: Action::BuildRoad(path), .. } => {
                    let path = game.state.board.path(path).unwrap();
                    assert!(path.touches(last_settlement.unwrap()));
                }
                _ => {}
            }
        }
    }
}

#[test]
fn same_seed_replays_the_same_game() {
    let policies = [RandomPolicy; 4];
    let (first_outcome, first) = run(&mut standard_game(99, 60), &policies);
    let (second_outcome, second) = run(&mut standard_game(99, 60), &policies);
    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first, second);

    let (_, other) = run(&mut standard_game(100, 60), &policies);
    assert_ne!(first, other);
}

#[test]
fn games_end_by_victory_or_exactly_at_the_cap() {
    let policies = [RandomPolicy; 4];
    for seed in 0..8 {
        let cap = 40;
        let mut game = Game::new(config(seed, cap), &MapSource::Standard).unwrap();
        let (outcome, events) = run(&mut game, &policies);
        match outcome {
            GameOutcome::Victory { winner, victory_points } => {
                assert!(victory_points >= VICTORY_POINTS_TO_WIN);
                assert_eq!(game.state.players[winner].victory_points, victory_points);
                assert!(game.state.round <= cap);
            }
            GameOutcome::RoundLimit { rounds } => {
                assert_eq!(rounds, cap);
                assert_eq!(game.state.round, cap);
                let players = &game.state.players;
                assert!(players.iter().all(|p| p.victory_points < VICTORY_POINTS_TO_WIN));
            }
        }
        assert_eq!(events.last().map(|e| &e.kind), Some(&EventKind::GameOver { outcome }));
        assert!(game.state.is_over());
    }
}

#[test]
fn greedy_games_end_consistently() {
    for seed in [7, 8] {
        let cap = 300;
        let mut game = Game::new(config(seed, cap), &MapSource::Standard).unwrap();
        let outcome = game.play(&[GreedyPolicy; 4], |_| {});
        match outcome {
            GameOutcome::Victory { winner, .. } => {
                assert!(game.state.players[winner].victory_points >= VICTORY_POINTS_TO_WIN);
            }
            GameOutcome::RoundLimit { rounds } => assert_eq!(rounds, cap),
        }
        for player in &game.state.players {
            assert_eq!(player.victory_points, player.settlements + 2 * player.cities);
        }
    }
}

#[test]
fn seven_never_pays_out() {
    let mut game = Game::new(config(21, 80), &MapSource::Standard).unwrap();
    let (_, events) = run(&mut game, &[RandomPolicy; 4]);
    let mut last_total = None;
    for event in &events {
        match &event.kind {
            EventKind::DiceRolled { total, .. } => last_total = Some(*total),
            EventKind::ResourcesProduced { .. } => assert_ne!(last_total, Some(7)),
            _ => {}
        }
    }
}

#[test]
fn map_file_plays_like_the_built_in_board() {
    let policies = [RandomPolicy; 4];
    let file = MapSource::File(PathBuf::from("maps/standard.map"));
    let (_, from_file) = run(&mut Game::new(config(5, 30), &file).unwrap(), &policies);
    let (_, built_in) = run(&mut standard_game(5, 30), &policies);
    assert_eq!(from_file, built_in);
}

#[test]
fn shuffled_board_is_seeded() {
    let a = Game::new(config(8, 1), &MapSource::Shuffled).unwrap();
    let b = Game::new(config(8, 1), &MapSource::Shuffled).unwrap();
    assert_eq!(a.state.board.tiles(), b.state.board.tiles());
    assert_eq!(a.state.board.intersections().len(), 54);
}

#[test]
fn missing_map_file_is_a_configuration_error() {
    let source = MapSource::File(PathBuf::from("maps/does-not-exist.map"));
    let err = Game::new(config(1, 1), &source).err().unwrap();
    assert!(matches!(err, SetupError::Map(_)));
    assert!(err.is_configuration());
}

#[test]
fn anywhere_rule_still_completes_setup() {
    let mut cfg = config(17, 5);
    cfg.setup_road_rule = SetupRoadRule::Anywhere;
    let mut game = Game::new(cfg, &MapSource::Standard).unwrap();
    let policies = [RandomPolicy; 4];
    while game.state.phase == TurnPhase::Setup {
        game.tick(&policies);
    }
    for player in &game.state.players {
        assert_eq!(player.roads, 2);
        assert_eq!(player.settlements, 2);
    }
}

/// Passes on its normal action but builds whatever it can when over the
/// hand limit.
struct Hoarder;

impl Policy for Hoarder {
    fn choose_action(&self, view: &GameView<'_>, _rng: &mut dyn RngCore) -> Option<Action> {
        if view.phase == TurnPhase::Setup || view.is_forced() {
            view.legal_actions.first().copied()
        } else {
            None
        }
    }
}

#[test]
fn hand_limit_forces_builds() {
    let mut game = Game::new(config(42, 10), &MapSource::Standard).unwrap();
    let policies = [Hoarder, Hoarder, Hoarder, Hoarder];
    while game.state.phase == TurnPhase::Setup {
        game.tick(&policies);
    }
    assert_eq!(game.state.phase, TurnPhase::Rolling);
    game.state.players[0].resources = ResourceBundle::from_counts([6, 6, 0, 0, 0]);
    game.tick(&policies);

    let mut forced = 0;
    while game.state.phase == TurnPhase::ForcedBuildDown {
        for event in game.tick(&policies) {
            match event.kind {
                EventKind::Built { forced: true, .. } => forced += 1,
                EventKind::Built { forced: false, .. } => {
                    panic!("unforced build during hand limit")
                }
                _ => {}
            }
        }
    }
    assert!(forced >= 2);
    assert!(game.state.players[0].card_count() <= 7);

    let events = game.tick(&policies);
    assert!(events.iter().any(|e| e.kind == EventKind::Passed));
}

/// Answers the hand limit with a city on an intersection that does not exist.
struct Reckless;

impl Policy for Reckless {
    fn choose_action(&self, view: &GameView<'_>, _rng: &mut dyn RngCore) -> Option<Action> {
        match view.phase {
            TurnPhase::Setup => view.legal_actions.first().copied(),
            TurnPhase::ForcedBuildDown => Some(Action::BuildCity(999)),
            _ => None,
        }
    }
}

#[test]
fn refused_forced_build_ends_the_hand_limit_phase() {
    let mut game = Game::new(config(42, 10), &MapSource::Standard).unwrap();
    let policies = [Reckless, Reckless, Reckless, Reckless];
    while game.state.phase == TurnPhase::Setup {
        game.tick(&policies);
    }
    game.state.players[0].resources = ResourceBundle::from_counts([6, 6, 0, 0, 0]);
    game.tick(&policies);
    assert_eq!(game.state.phase, TurnPhase::ForcedBuildDown);

    let events = game.tick(&policies);
    let rejected: Vec<_> = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::ActionRejected { forced: true, .. }))
        .collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(events.len(), 1);
    assert_eq!(game.state.phase, TurnPhase::NormalAction);
    assert!(game.state.players[0].card_count() > 7);
}

/// Always proposes building on intersection 0, legal or not.
struct Stubborn;

impl Policy for Stubborn {
    fn choose_action(&self, view: &GameView<'_>, _rng: &mut dyn RngCore) -> Option<Action> {
        match view.phase {
            TurnPhase::Setup => view.legal_actions.first().copied(),
            _ => Some(Action::BuildCity(0)),
        }
    }
}

#[test]
fn refused_actions_do_not_stop_the_game() {
    let mut game = Game::new(config(4, 3), &MapSource::Standard).unwrap();
    let mut rejected = 0;
    let outcome = game.play(&[Stubborn, Stubborn, Stubborn, Stubborn], |event| {
        if matches!(event.kind, EventKind::ActionRejected { .. }) {
            rejected += 1;
        }
    });
    assert_eq!(outcome, GameOutcome::RoundLimit { rounds: 3 });
    assert!(rejected > 0);
}

#[test]
fn upgrade_path_and_its_failures() {
    let mut board = Board::standard().unwrap();
    let mut owner = PlayerState::new(0);
    let mut rival = PlayerState::new(1);
    placement::place_settlement(&mut board, &mut owner, 10, PlacementPhase::Setup).unwrap();

    rival.resources = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
    assert_eq!(
        placement::upgrade(&mut board, &mut rival, 10),
        Err(RuleViolation::NotOwner(10))
    );
    assert_eq!(rival.resources.total(), 5);

    owner.resources = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
    assert_eq!(
        placement::upgrade(&mut board, &mut owner, 30),
        Err(RuleViolation::NotSettlement(30))
    );
    assert_eq!(board.intersection(30).unwrap().structure, StructureKind::Empty);

    placement::upgrade(&mut board, &mut owner, 10).unwrap();
    assert_eq!(board.intersection(10).unwrap().structure, StructureKind::City);
    assert_eq!(owner.victory_points, 2);
    assert!(owner.resources.is_empty());
}
