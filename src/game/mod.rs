pub mod action;
pub mod distribution;
pub mod event;
pub mod game;
pub mod placement;
pub mod players;
pub mod resources;
pub mod rules;
pub mod state;

pub use action::Action;
pub use distribution::{NO_PRODUCTION_ROLL, Payout};
pub use event::{EventKind, GameEvent, GameOutcome, Standing};
pub use game::{Game, GameView};
pub use players::PlayerState;
pub use resources::{COST_CITY, COST_ROAD, COST_SETTLEMENT, ResourceBundle, ResourceError};
pub use rules::{PlacementPhase, RuleViolation, SetupRoadRule};
pub use state::{
    GameConfig, GameState, HAND_LIMIT, MAX_ROUNDS_CAP, SetupPlacement, TurnPhase,
    VICTORY_POINTS_TO_WIN,
};
