//! Applying placements to the board.
//!
//! Each operation re-validates, pays, mutates the board and then awards
//! points, in that order. Nothing changes when any step before the mutation
//! fails.

use tracing::debug;

use crate::board::{Board, IntersectionId, PathId};
use crate::game::action::Action;
use crate::game::players::PlayerState;
use crate::game::rules::{self, PlacementPhase, RuleViolation, SetupRoadRule};

/// Builds a settlement. Setup placements are free.
pub fn place_settlement(
    board: &mut Board,
    player: &mut PlayerState,
    node: IntersectionId,
    phase: PlacementPhase,
) -> Result<(), RuleViolation> {
    match phase {
        PlacementPhase::Main => apply(board, player, Action::BuildSettlement(node)),
        PlacementPhase::Setup => {
            rules::validate_settlement(board, player.id, node, phase)?;
            commit(board, player, Action::BuildSettlement(node), false);
            Ok(())
        }
    }
}

pub fn place_road(
    board: &mut Board,
    player: &mut PlayerState,
    path: PathId,
) -> Result<(), RuleViolation> {
    apply(board, player, Action::BuildRoad(path))
}

/// The free road of a setup step.
pub fn place_setup_road(
    board: &mut Board,
    player: &mut PlayerState,
    path: PathId,
    anchor: Option<IntersectionId>,
    rule: SetupRoadRule,
) -> Result<(), RuleViolation> {
    rules::validate_setup_road(board, path, anchor, rule)?;
    commit(board, player, Action::BuildRoad(path), false);
    Ok(())
}

pub fn upgrade(
    board: &mut Board,
    player: &mut PlayerState,
    node: IntersectionId,
) -> Result<(), RuleViolation> {
    apply(board, player, Action::BuildCity(node))
}

/// Main-phase dispatch for a policy's choice: validate, pay, then build.
pub fn apply(
    board: &mut Board,
    player: &mut PlayerState,
    action: Action,
) -> Result<(), RuleViolation> {
    rules::validate_purchase(board, player, &action)?;
    player.remove_resources(rules::cost_of(&action))?;
    commit(board, player, action, true);
    Ok(())
}

fn commit(board: &mut Board, player: &mut PlayerState, action: Action, paid: bool) {
    match action {
        Action::BuildSettlement(node) => {
            board.put_settlement(node, player.id);
            player.record_settlement();
        }
        Action::BuildRoad(path) => {
            board.put_road(path, player.id);
            player.record_road();
        }
        Action::BuildCity(node) => {
            board.put_city(node);
            player.record_city();
        }
    }
    debug!(player = player.id, %action, paid, "built");
}
