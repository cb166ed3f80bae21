//! Placement rules.
//!
//! Every `validate_*` function is a pure check over the board: it never
//! mutates and never looks at a hand. Affordability is layered on separately
//! through [`validate_affordable`], so callers can ask "is this spot legal"
//! and "can this player pay" independently.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::board::{Board, IntersectionId, PathId};
use crate::game::action::Action;
use crate::game::players::PlayerState;
use crate::game::resources::{
    COST_CITY, COST_ROAD, COST_SETTLEMENT, ResourceBundle, ResourceError,
};
use crate::types::{PlayerId, StructureKind};

/// Whether the connectivity requirement applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementPhase {
    /// Initial free placements: the distance rule holds, connectivity is waived.
    Setup,
    Main,
}

/// Where the free road of a setup step may go.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SetupRoadRule {
    /// Must touch the settlement placed in the same setup step.
    #[default]
    Adjacent,
    /// Any unowned path.
    Anywhere,
}

/// Why an action was refused. Refusals are ordinary game outcomes, not
/// failures of the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("intersection {0} does not exist")]
    UnknownIntersection(IntersectionId),
    #[error("path {0} does not exist")]
    UnknownPath(PathId),
    #[error("intersection {0} is already built on")]
    Occupied(IntersectionId),
    #[error("intersection {node} is next to a structure at {neighbor}")]
    TooClose {
        node: IntersectionId,
        neighbor: IntersectionId,
    },
    #[error("intersection {0} is not reached by any of the player's roads")]
    NotConnected(IntersectionId),
    #[error("path {0} already has a road")]
    PathOwned(PathId),
    #[error("path {0} does not connect to the player's network")]
    RoadNotConnected(PathId),
    #[error("path {path} does not touch the settlement at {anchor}")]
    NotAnchored {
        path: PathId,
        anchor: IntersectionId,
    },
    #[error("no settlement was placed this setup step to anchor a road")]
    NoAnchor,
    #[error("intersection {0} belongs to someone else")]
    NotOwner(IntersectionId),
    #[error("intersection {0} does not hold a settlement")]
    NotSettlement(IntersectionId),
    #[error("{0} is not allowed at this point of the game")]
    OutOfPhase(Action),
    #[error(transparent)]
    Insufficient(#[from] ResourceError),
}

pub fn validate_settlement(
    board: &Board,
    player: PlayerId,
    node: IntersectionId,
    phase: PlacementPhase,
) -> Result<(), RuleViolation> {
    let intersection = board
        .intersection(node)
        .ok_or(RuleViolation::UnknownIntersection(node))?;
    if intersection.is_occupied() {
        return Err(RuleViolation::Occupied(node));
    }
    if let Some(neighbor) = board
        .neighbors(node)
        .find(|other| board.intersection(*other).is_some_and(|n| n.is_occupied()))
    {
        return Err(RuleViolation::TooClose { node, neighbor });
    }
    if phase == PlacementPhase::Main
        && !board
            .incident_paths(node)
            .any(|path| path.owner == Some(player))
    {
        return Err(RuleViolation::NotConnected(node));
    }
    Ok(())
}

/// Main-phase road rule: the path is free and one of its endpoints is owned
/// by `player` or touches another road of theirs.
pub fn validate_road(board: &Board, player: PlayerId, path: PathId) -> Result<(), RuleViolation> {
    let candidate = board.path(path).ok_or(RuleViolation::UnknownPath(path))?;
    if candidate.owner.is_some() {
        return Err(RuleViolation::PathOwned(path));
    }
    let (a, b) = candidate.endpoints;
    let connected = [a, b].into_iter().any(|end| {
        board
            .intersection(end)
            .is_some_and(|n| n.owner == Some(player))
            || board
                .incident_paths(end)
                .any(|other| other.id != path && other.owner == Some(player))
    });
    if !connected {
        return Err(RuleViolation::RoadNotConnected(path));
    }
    Ok(())
}

/// Setup road rule. `anchor` is the settlement placed earlier in the same
/// setup step, if any.
pub fn validate_setup_road(
    board: &Board,
    path: PathId,
    anchor: Option<IntersectionId>,
    rule: SetupRoadRule,
) -> Result<(), RuleViolation> {
    let candidate = board.path(path).ok_or(RuleViolation::UnknownPath(path))?;
    if candidate.owner.is_some() {
        return Err(RuleViolation::PathOwned(path));
    }
    match rule {
        SetupRoadRule::Anywhere => Ok(()),
        SetupRoadRule::Adjacent => {
            let anchor = anchor.ok_or(RuleViolation::NoAnchor)?;
            if candidate.touches(anchor) {
                Ok(())
            } else {
                Err(RuleViolation::NotAnchored { path, anchor })
            }
        }
    }
}

pub fn validate_city(
    board: &Board,
    player: PlayerId,
    node: IntersectionId,
) -> Result<(), RuleViolation> {
    let intersection = board
        .intersection(node)
        .ok_or(RuleViolation::UnknownIntersection(node))?;
    if intersection.structure != StructureKind::Settlement {
        return Err(RuleViolation::NotSettlement(node));
    }
    if intersection.owner != Some(player) {
        return Err(RuleViolation::NotOwner(node));
    }
    Ok(())
}

pub fn validate_affordable(
    player: &PlayerState,
    cost: &ResourceBundle,
) -> Result<(), RuleViolation> {
    player.resources.covers(cost)?;
    Ok(())
}

pub fn can_place_settlement(
    board: &Board,
    player: PlayerId,
    node: IntersectionId,
    phase: PlacementPhase,
) -> bool {
    validate_settlement(board, player, node, phase).is_ok()
}

pub fn can_place_road(board: &Board, player: PlayerId, path: PathId) -> bool {
    validate_road(board, player, path).is_ok()
}

pub fn can_upgrade(board: &Board, player: PlayerId, node: IntersectionId) -> bool {
    validate_city(board, player, node).is_ok()
}

pub fn cost_of(action: &Action) -> &'static ResourceBundle {
    match action {
        Action::BuildSettlement(_) => &COST_SETTLEMENT,
        Action::BuildRoad(_) => &COST_ROAD,
        Action::BuildCity(_) => &COST_CITY,
    }
}

/// Main-phase topology check for any action, without affordability.
pub fn validate_action(
    board: &Board,
    player: PlayerId,
    action: &Action,
) -> Result<(), RuleViolation> {
    match *action {
        Action::BuildSettlement(node) => {
            validate_settlement(board, player, node, PlacementPhase::Main)
        }
        Action::BuildRoad(path) => validate_road(board, player, path),
        Action::BuildCity(node) => validate_city(board, player, node),
    }
}

/// The topology check followed by the affordability check for the action's
/// cost. Topology faults are reported first.
pub fn validate_purchase(
    board: &Board,
    player: &PlayerState,
    action: &Action,
) -> Result<(), RuleViolation> {
    validate_action(board, player.id, action)?;
    validate_affordable(player, cost_of(action))
}

/// Settlements allowed during setup, in intersection id order.
pub fn legal_setup_settlements(board: &Board, player: PlayerId) -> Vec<Action> {
    board
        .intersections()
        .iter()
        .filter(|n| can_place_settlement(board, player, n.id, PlacementPhase::Setup))
        .map(|n| Action::BuildSettlement(n.id))
        .collect()
}

/// Free roads allowed during setup, in path id order.
pub fn legal_setup_roads(
    board: &Board,
    anchor: Option<IntersectionId>,
    rule: SetupRoadRule,
) -> Vec<Action> {
    board
        .paths()
        .iter()
        .filter(|p| validate_setup_road(board, p.id, anchor, rule).is_ok())
        .map(|p| Action::BuildRoad(p.id))
        .collect()
}

/// Everything `player` may legally build and afford right now. Settlements
/// come first, then roads, then cities; each group in id order.
pub fn legal_actions(board: &Board, player: &PlayerState) -> Vec<Action> {
    let settlements = board
        .intersections()
        .iter()
        .map(|n| Action::BuildSettlement(n.id));
    let roads = board.paths().iter().map(|p| Action::BuildRoad(p.id));
    let cities = board.structures_of(player.id).map(|n| Action::BuildCity(n.id));
    settlements
        .chain(roads)
        .chain(cities)
        .filter(|action| validate_purchase(board, player, action).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resources::ResourceBundle;

    fn board() -> Board {
        Board::standard().unwrap()
    }

    #[test]
    fn setup_settlement_ignores_connectivity_but_not_distance() {
        let mut board = board();
        assert!(can_place_settlement(&board, 0, 0, PlacementPhase::Setup));
        assert_eq!(
            validate_settlement(&board, 0, 0, PlacementPhase::Main),
            Err(RuleViolation::NotConnected(0))
        );

        board.put_settlement(0, 1);
        assert_eq!(
            validate_settlement(&board, 0, 0, PlacementPhase::Setup),
            Err(RuleViolation::Occupied(0))
        );
        assert_eq!(
            validate_settlement(&board, 0, 1, PlacementPhase::Setup),
            Err(RuleViolation::TooClose { node: 1, neighbor: 0 })
        );
        assert!(can_place_settlement(&board, 0, 2, PlacementPhase::Setup));
    }

    #[test]
    fn main_settlement_needs_an_incident_road() {
        let mut board = board();
        board.put_settlement(0, 0);
        let first = board.path_between(0, 1).unwrap();
        let second = board.path_between(1, 2).unwrap();
        board.put_road(first, 0);
        board.put_road(second, 0);
        assert!(can_place_settlement(&board, 0, 2, PlacementPhase::Main));
        assert!(!can_place_settlement(&board, 1, 2, PlacementPhase::Main));
    }

    #[test]
    fn road_extends_from_structures_and_roads() {
        let mut board = board();
        board.put_settlement(0, 0);
        let from_settlement = board.path_between(0, 1).unwrap();
        assert!(can_place_road(&board, 0, from_settlement));
        assert_eq!(
            validate_road(&board, 1, from_settlement),
            Err(RuleViolation::RoadNotConnected(from_settlement))
        );

        board.put_road(from_settlement, 0);
        let onward = board.path_between(1, 2).unwrap();
        assert!(can_place_road(&board, 0, onward));
        assert_eq!(
            validate_road(&board, 0, from_settlement),
            Err(RuleViolation::PathOwned(from_settlement))
        );
    }

    #[test]
    fn setup_road_respects_the_anchor_rule() {
        let board = board();
        let touching = board.path_between(0, 1).unwrap();
        let far = board.path_between(2, 3).unwrap();
        assert!(validate_setup_road(&board, touching, Some(0), SetupRoadRule::Adjacent).is_ok());
        assert_eq!(
            validate_setup_road(&board, far, Some(0), SetupRoadRule::Adjacent),
            Err(RuleViolation::NotAnchored { path: far, anchor: 0 })
        );
        assert_eq!(
            validate_setup_road(&board, far, None, SetupRoadRule::Adjacent),
            Err(RuleViolation::NoAnchor)
        );
        assert!(validate_setup_road(&board, far, None, SetupRoadRule::Anywhere).is_ok());
        assert_eq!(legal_setup_roads(&board, Some(0), SetupRoadRule::Adjacent).len(), 3);
        assert_eq!(legal_setup_roads(&board, None, SetupRoadRule::Anywhere).len(), 72);
    }

    #[test]
    fn upgrade_requires_own_settlement() {
        let mut board = board();
        assert_eq!(validate_city(&board, 0, 0), Err(RuleViolation::NotSettlement(0)));
        board.put_settlement(0, 1);
        assert_eq!(validate_city(&board, 0, 0), Err(RuleViolation::NotOwner(0)));
        assert!(can_upgrade(&board, 1, 0));
        board.put_city(0);
        assert_eq!(validate_city(&board, 1, 0), Err(RuleViolation::NotSettlement(0)));
    }

    #[test]
    fn unknown_ids_are_refused() {
        let board = board();
        assert_eq!(
            validate_settlement(&board, 0, 999, PlacementPhase::Setup),
            Err(RuleViolation::UnknownIntersection(999))
        );
        assert_eq!(validate_road(&board, 0, 999), Err(RuleViolation::UnknownPath(999)));
    }

    #[test]
    fn legal_actions_are_filtered_by_hand() {
        let mut board = board();
        board.put_settlement(0, 0);
        let mut player = PlayerState::new(0);
        assert!(legal_actions(&board, &player).is_empty());

        player.resources = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
        let actions = legal_actions(&board, &player);
        assert!(!actions.is_empty());
        assert!(actions.iter().all(Action::is_road));

        player.resources = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
        assert_eq!(legal_actions(&board, &player), vec![Action::BuildCity(0)]);
    }

    #[test]
    fn affordability_is_checked_without_spending() {
        let mut player = PlayerState::new(0);
        player.resources = ResourceBundle::from_counts([1, 0, 0, 0, 0]);
        assert!(matches!(
            validate_affordable(&player, &COST_ROAD),
            Err(RuleViolation::Insufficient(_))
        ));
        assert_eq!(player.resources.total(), 1);
    }

    #[test]
    fn purchase_checks_topology_before_the_hand() {
        let mut board = board();
        board.put_settlement(0, 0);
        let mut rival = PlayerState::new(1);
        rival.resources = COST_CITY;
        assert_eq!(
            validate_purchase(&board, &rival, &Action::BuildCity(0)),
            Err(RuleViolation::NotOwner(0))
        );

        let mut owner = PlayerState::new(0);
        assert!(matches!(
            validate_purchase(&board, &owner, &Action::BuildCity(0)),
            Err(RuleViolation::Insufficient(_))
        ));
        owner.resources = COST_CITY;
        assert_eq!(validate_purchase(&board, &owner, &Action::BuildCity(0)), Ok(()));
        assert_eq!(cost_of(&Action::BuildRoad(3)), &COST_ROAD);
    }

    #[test]
    fn setup_road_rule_parses_from_config_text() {
        assert_eq!("adjacent".parse::<SetupRoadRule>().ok(), Some(SetupRoadRule::Adjacent));
        assert_eq!("Anywhere".parse::<SetupRoadRule>().ok(), Some(SetupRoadRule::Anywhere));
        assert_eq!(SetupRoadRule::Anywhere.to_string(), "anywhere");
    }
}
