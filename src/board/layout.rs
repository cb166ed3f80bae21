//! Procedural boards: tiles placed at axial coordinates, corners computed
//! geometrically and merged when they coincide.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{Board, BoardBuilder, IntersectionId, TileSpec, TopologyError};
use crate::coords::{self, CubeCoord, Point};
use crate::types::Terrain;

/// Two computed corners closer than this on both axes are the same
/// intersection. Units are hex circumradii.
pub const CORNER_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTile {
    pub coord: CubeCoord,
    pub terrain: Terrain,
    pub number: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayout {
    pub tiles: Vec<LayoutTile>,
}

impl TileLayout {
    /// Rows of 3-4-5-4-3 with the desert in the centre.
    pub fn standard() -> Self {
        let tiles = coords::hexagon(2)
            .into_iter()
            .zip(STANDARD_TERRAIN.iter().zip(STANDARD_NUMBERS.iter()))
            .map(|(coord, (terrain, number))| LayoutTile {
                coord,
                terrain: *terrain,
                number: *number,
            })
            .collect();
        Self { tiles }
    }

    /// Standard tile positions with terrains and numbers shuffled. The
    /// desert never gets a number.
    pub fn shuffled(rng: &mut impl rand::Rng) -> Self {
        let mut terrains = STANDARD_TERRAIN.to_vec();
        terrains.shuffle(rng);
        let mut numbers: Vec<u8> = STANDARD_NUMBERS.iter().flatten().copied().collect();
        numbers.shuffle(rng);

        let tiles = coords::hexagon(2)
            .into_iter()
            .zip(terrains)
            .map(|(coord, terrain)| LayoutTile {
                coord,
                terrain,
                number: if terrain.is_productive() {
                    numbers.pop()
                } else {
                    None
                },
            })
            .collect();
        Self { tiles }
    }

    /// Merges coincident corners into intersection ids, assigned in
    /// first-discovery order.
    pub fn to_builder(&self) -> BoardBuilder {
        let mut unique: Vec<Point> = Vec::new();
        let mut specs = Vec::with_capacity(self.tiles.len());

        for tile in &self.tiles {
            let mut corners = [0 as IntersectionId; 6];
            for (slot, point) in corners.iter_mut().zip(tile.coord.corners()) {
                let index = match unique.iter().position(|p| p.approx_eq(point, CORNER_EPSILON)) {
                    Some(index) => index,
                    None => {
                        unique.push(point);
                        unique.len() - 1
                    }
                };
                *slot = index as IntersectionId;
            }
            specs.push(TileSpec {
                terrain: tile.terrain,
                number: tile.number,
                corners,
            });
        }

        let mut builder = BoardBuilder::new(unique.len());
        for spec in specs {
            builder.push_tile(spec);
        }
        builder
    }

    pub fn build(&self) -> Result<Board, TopologyError> {
        self.to_builder().build()
    }
}

static STANDARD_TERRAIN: Lazy<Vec<Terrain>> = Lazy::new(|| {
    use Terrain::*;
    vec![
        Wood, Sheep, Wheat, //
        Brick, Ore, Wood, Sheep, //
        Wheat, Brick, Desert, Ore, Wood, //
        Sheep, Wheat, Brick, Wood, //
        Ore, Sheep, Wheat,
    ]
});

static STANDARD_NUMBERS: Lazy<Vec<Option<u8>>> = Lazy::new(|| {
    vec![
        Some(2),
        Some(3),
        Some(3),
        Some(4),
        Some(4),
        Some(5),
        Some(5),
        Some(6),
        Some(6),
        None,
        Some(8),
        Some(8),
        Some(9),
        Some(9),
        Some(10),
        Some(10),
        Some(11),
        Some(11),
        Some(12),
    ]
});
