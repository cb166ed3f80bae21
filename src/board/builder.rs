use std::collections::HashMap;

use super::{Board, Intersection, IntersectionId, Path, PathId, Tile, TileId};
use crate::types::Terrain;

/// One tile as handed to the builder: corners are already-deduplicated
/// intersection ids in cyclic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSpec {
    pub terrain: Terrain,
    pub number: Option<u8>,
    pub corners: [IntersectionId; 6],
}

/// Broken construction invariants. These point at a bug in the layout or map
/// data, not at anything a player did.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("board has no tiles")]
    NoTiles,
    #[error("{0} intersections do not fit the id space")]
    TooManyIntersections(usize),
    #[error("{0} tiles do not fit the id space")]
    TooManyTiles(usize),
    #[error("{0} paths do not fit the id space")]
    TooManyPaths(usize),
    #[error("tile {tile} references intersection {corner} but only {count} exist")]
    CornerOutOfRange {
        tile: TileId,
        corner: IntersectionId,
        count: usize,
    },
    #[error("tile {tile} lists intersection {corner} more than once")]
    RepeatedCorner { tile: TileId, corner: IntersectionId },
    #[error("tile {tile} yields a path from intersection {intersection} to itself")]
    DegeneratePath {
        tile: TileId,
        intersection: IntersectionId,
    },
    #[error("path {0} joins an intersection to itself")]
    SelfLoop(PathId),
    #[error("intersection {0} is not a corner of any tile")]
    OrphanIntersection(IntersectionId),
    #[error("intersection {intersection} has degree {degree}, expected 2 or 3")]
    Degree {
        intersection: IntersectionId,
        degree: usize,
    },
    #[error("path {path} and intersection {intersection} disagree about adjacency")]
    DanglingPath {
        path: PathId,
        intersection: IntersectionId,
    },
    #[error("tile {tile} and intersection {intersection} disagree about adjacency")]
    DanglingTile {
        tile: TileId,
        intersection: IntersectionId,
    },
}

/// Wires tiles, intersections and paths into a [`Board`].
///
/// Paths are derived by walking each tile's corners cyclically and keeping
/// the first occurrence of every unordered endpoint pair, so ids follow
/// discovery order.
#[derive(Debug, Clone, Default)]
pub struct BoardBuilder {
    intersection_count: usize,
    tiles: Vec<TileSpec>,
}

impl BoardBuilder {
    pub fn new(intersection_count: usize) -> Self {
        Self {
            intersection_count,
            tiles: Vec::new(),
        }
    }

    pub fn with_tile(mut self, spec: TileSpec) -> Self {
        self.tiles.push(spec);
        self
    }

    pub fn push_tile(&mut self, spec: TileSpec) {
        self.tiles.push(spec);
    }

    pub fn build(self) -> Result<Board, TopologyError> {
        if self.tiles.is_empty() {
            return Err(TopologyError::NoTiles);
        }
        if self.intersection_count > IntersectionId::MAX as usize {
            return Err(TopologyError::TooManyIntersections(self.intersection_count));
        }
        if self.tiles.len() > TileId::MAX as usize {
            return Err(TopologyError::TooManyTiles(self.tiles.len()));
        }

        let mut intersections: Vec<Intersection> = (0..self.intersection_count)
            .map(|id| Intersection::new(id as IntersectionId))
            .collect();
        let mut tiles = Vec::with_capacity(self.tiles.len());

        for (index, spec) in self.tiles.into_iter().enumerate() {
            let tile_id = index as TileId;
            for (i, corner) in spec.corners.iter().enumerate() {
                if *corner as usize >= intersections.len() {
                    return Err(TopologyError::CornerOutOfRange {
                        tile: tile_id,
                        corner: *corner,
                        count: intersections.len(),
                    });
                }
                if spec.corners[..i].contains(corner) {
                    return Err(TopologyError::RepeatedCorner {
                        tile: tile_id,
                        corner: *corner,
                    });
                }
                intersections[*corner as usize].tiles.push(tile_id);
            }
            tiles.push(Tile {
                id: tile_id,
                terrain: spec.terrain,
                number: spec.number,
                corners: spec.corners,
            });
        }

        let mut paths: Vec<Path> = Vec::new();
        let mut seen: HashMap<(IntersectionId, IntersectionId), PathId> = HashMap::new();
        for tile in &tiles {
            for i in 0..6 {
                let a = tile.corners[i];
                let b = tile.corners[(i + 1) % 6];
                if a == b {
                    return Err(TopologyError::DegeneratePath {
                        tile: tile.id,
                        intersection: a,
                    });
                }
                let key = (a.min(b), a.max(b));
                if seen.contains_key(&key) {
                    continue;
                }
                let path_id = PathId::try_from(paths.len())
                    .map_err(|_| TopologyError::TooManyPaths(paths.len() + 1))?;
                seen.insert(key, path_id);
                paths.push(Path {
                    id: path_id,
                    owner: None,
                    endpoints: key,
                });
                intersections[a as usize].paths.push(path_id);
                intersections[b as usize].paths.push(path_id);
            }
        }

        let board = Board::from_parts(tiles, intersections, paths);
        verify(&board)?;
        Ok(board)
    }
}

/// Checks the structural invariants of a built board.
pub(crate) fn verify(board: &Board) -> Result<(), TopologyError> {
    for tile in board.tiles() {
        for (i, corner) in tile.corners.iter().enumerate() {
            if tile.corners[..i].contains(corner) {
                return Err(TopologyError::RepeatedCorner {
                    tile: tile.id,
                    corner: *corner,
                });
            }
            let listed = board
                .intersection(*corner)
                .is_some_and(|n| n.tiles.contains(&tile.id));
            if !listed {
                return Err(TopologyError::DanglingTile {
                    tile: tile.id,
                    intersection: *corner,
                });
            }
        }
    }

    for path in board.paths() {
        let (a, b) = path.endpoints;
        if a == b {
            return Err(TopologyError::SelfLoop(path.id));
        }
        for end in [a, b] {
            let listed = board
                .intersection(end)
                .is_some_and(|n| n.paths.contains(&path.id));
            if !listed {
                return Err(TopologyError::DanglingPath {
                    path: path.id,
                    intersection: end,
                });
            }
        }
    }

    for node in board.intersections() {
        if node.tiles.is_empty() {
            return Err(TopologyError::OrphanIntersection(node.id));
        }
        for tile_id in &node.tiles {
            let listed = board
                .tile(*tile_id)
                .is_some_and(|t| t.corners.contains(&node.id));
            if !listed {
                return Err(TopologyError::DanglingTile {
                    tile: *tile_id,
                    intersection: node.id,
                });
            }
        }
        for path_id in &node.paths {
            let listed = board.path(*path_id).is_some_and(|p| p.touches(node.id));
            if !listed {
                return Err(TopologyError::DanglingPath {
                    path: *path_id,
                    intersection: node.id,
                });
            }
        }
        if !(2..=3).contains(&node.degree()) {
            return Err(TopologyError::Degree {
                intersection: node.id,
                degree: node.degree(),
            });
        }
    }
    Ok(())
}
