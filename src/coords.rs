use std::collections::{HashMap, HashSet, VecDeque};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x + y + z == 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    /// Builds a cube coordinate from axial `(q, r)`.
    pub fn from_axial(q: i32, r: i32) -> Self {
        CubeCoord::new(q, -q - r, r)
    }

    pub fn to_axial(self) -> (i32, i32) {
        (self.x, self.z)
    }

    pub fn add(self, other: CubeCoord) -> Self {
        CubeCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn neighbors(self) -> impl Iterator<Item = CubeCoord> {
        UNIT_VECTORS.iter().map(move |(_, vec)| self.add(*vec))
    }

    pub fn distance_from_origin(self) -> i32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Planar centre of a pointy-top hex with unit circumradius.
    pub fn center(self) -> Point {
        let (q, r) = self.to_axial();
        Point {
            x: SQRT_3 * (q as f64 + r as f64 / 2.0),
            y: 1.5 * r as f64,
        }
    }

    /// The six corners in cyclic order, corner `i` at `60 * i - 30` degrees.
    pub fn corners(self) -> [Point; 6] {
        let center = self.center();
        (*CORNER_OFFSETS).map(|(dx, dy)| Point {
            x: center.x + dx,
            y: center.y + dy,
        })
    }
}

impl Default for CubeCoord {
    fn default() -> Self {
        CubeCoord::new(0, 0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn approx_eq(self, other: Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

const SQRT_3: f64 = 1.732_050_807_568_877_2;

static CORNER_OFFSETS: Lazy<[(f64, f64); 6]> = Lazy::new(|| {
    let mut offsets = [(0.0, 0.0); 6];
    for (i, offset) in offsets.iter_mut().enumerate() {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        *offset = (angle.cos(), angle.sin());
    }
    offsets
});

pub static UNIT_VECTORS: Lazy<HashMap<Direction, CubeCoord>> = Lazy::new(|| {
    use Direction::*;
    HashMap::from([
        (NorthEast, CubeCoord::new(1, 0, -1)),
        (SouthWest, CubeCoord::new(-1, 0, 1)),
        (NorthWest, CubeCoord::new(0, 1, -1)),
        (SouthEast, CubeCoord::new(0, -1, 1)),
        (East, CubeCoord::new(1, -1, 0)),
        (West, CubeCoord::new(-1, 1, 0)),
    ])
});

fn num_tiles_for(layer: i32) -> i32 {
    if layer == 0 {
        return 1;
    }
    6 * layer + num_tiles_for(layer - 1)
}

pub fn generate_coordinate_system(num_layers: i32) -> HashSet<CubeCoord> {
    let target = num_tiles_for(num_layers);
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([CubeCoord::default()]);

    while (visited.len() as i32) < target {
        let Some(node) = queue.pop_front() else {
            break;
        };
        if !visited.insert(node) {
            continue;
        }
        for neighbor in node.neighbors() {
            if !visited.contains(&neighbor) && !queue.contains(&neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    visited
}

/// Hexagonal region of `num_layers` rings around the origin, in row-major
/// order (top row first, west to east within a row).
pub fn hexagon(num_layers: i32) -> Vec<CubeCoord> {
    let mut coords: Vec<CubeCoord> = generate_coordinate_system(num_layers).into_iter().collect();
    coords.sort_by_key(|c| (c.z, c.x));
    coords
}
