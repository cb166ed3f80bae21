use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, IntersectionId, TileId};
use crate::game::players::PlayerState;
use crate::game::resources::ResourceBundle;
use crate::types::{PlayerId, Resource};

/// The roll on which nothing is produced.
pub const NO_PRODUCTION_ROLL: u8 = 7;

/// One grant from one tile to one structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub player: PlayerId,
    pub tile: TileId,
    pub node: IntersectionId,
    pub resource: Resource,
    pub amount: u32,
}

pub fn roll_dice(rng: &mut (impl Rng + ?Sized)) -> (u8, u8) {
    (rng.gen_range(1..=6), rng.gen_range(1..=6))
}

/// Every payout produced by `roll`, in tile then corner order.
pub fn payouts(board: &Board, roll: u8) -> Vec<Payout> {
    if roll == NO_PRODUCTION_ROLL {
        return Vec::new();
    }
    let mut out = Vec::new();
    for tile in board.tiles().iter().filter(|t| t.produces_on(roll)) {
        let Some(resource) = tile.terrain.resource() else {
            continue;
        };
        for corner in tile.corners {
            let Some(node) = board.intersection(corner) else {
                continue;
            };
            let (Some(player), amount) = (node.owner, node.structure.yield_multiplier()) else {
                continue;
            };
            if amount == 0 {
                continue;
            }
            out.push(Payout {
                player,
                tile: tile.id,
                node: node.id,
                resource,
                amount,
            });
        }
    }
    out
}

/// Credits every payout for `roll` and returns the per-player totals,
/// indexed by player id.
pub fn distribute(board: &Board, players: &mut [PlayerState], roll: u8) -> Vec<ResourceBundle> {
    let mut gained = vec![ResourceBundle::zero(); players.len()];
    for payout in payouts(board, roll) {
        if let Some(bundle) = gained.get_mut(payout.player) {
            bundle.add(payout.resource, payout.amount);
        }
    }
    for (player, bundle) in players.iter_mut().zip(&gained) {
        player.add_resources(bundle);
    }
    gained
}

/// One card per productive tile around `node`.
pub fn starting_grant(board: &Board, node: IntersectionId) -> ResourceBundle {
    let mut grant = ResourceBundle::zero();
    for resource in board.adjacent_tiles(node).filter_map(|t| t.terrain.resource()) {
        grant.add(resource, 1);
    }
    grant
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::Terrain;

    fn numbered_corner(board: &Board) -> (u8, IntersectionId, Resource) {
        let tile = board
            .tiles()
            .iter()
            .find(|t| t.terrain.is_productive())
            .unwrap();
        (
            tile.number.unwrap(),
            tile.corners[0],
            tile.terrain.resource().unwrap(),
        )
    }

    #[test]
    fn settlement_earns_one_city_earns_two() {
        let mut board = Board::standard().unwrap();
        let (roll, node, resource) = numbered_corner(&board);
        board.put_settlement(node, 1);
        let mut players = vec![PlayerState::new(0), PlayerState::new(1)];

        let gained = distribute(&board, &mut players, roll);
        assert!(gained[0].is_empty());
        assert!(gained[1].get(resource) >= 1);
        let first = players[1].card_count();

        board.put_city(node);
        let gained = distribute(&board, &mut players, roll);
        assert_eq!(gained[1].total(), first * 2);
    }

    #[test]
    fn seven_produces_nothing() {
        let mut board = Board::standard().unwrap();
        for node in 0..board.intersections().len() as IntersectionId {
            if crate::game::rules::can_place_settlement(
                &board,
                0,
                node,
                crate::game::rules::PlacementPhase::Setup,
            ) {
                board.put_settlement(node, 0);
            }
        }
        assert!(payouts(&board, NO_PRODUCTION_ROLL).is_empty());
        assert!((2..=12).filter(|r| *r != 7).any(|r| !payouts(&board, r).is_empty()));
    }

    #[test]
    fn starting_grant_skips_the_desert() {
        let board = Board::standard().unwrap();
        let desert = board
            .tiles()
            .iter()
            .find(|t| t.terrain == Terrain::Desert)
            .unwrap();
        for corner in desert.corners {
            let grant = starting_grant(&board, corner);
            let productive = board
                .adjacent_tiles(corner)
                .filter(|t| t.terrain.is_productive())
                .count() as u32;
            assert_eq!(grant.total(), productive);
            assert_eq!(grant.total() as usize, board.intersection(corner).unwrap().tiles.len() - 1);
        }
    }

    #[test]
    fn dice_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let (a, b) = roll_dice(&mut rng);
            assert!((1..=6).contains(&a) && (1..=6).contains(&b));
        }
    }
}
