//! Tile / intersection / path arena.
//!
//! Entities live in flat vectors indexed by their id; adjacency is stored as
//! id lists, never as references. Structure (which tiles touch which
//! intersections, which paths join which intersections) is fixed once the
//! board is built; only ownership and structure kinds change during play.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::SetupError;
use crate::types::{PlayerId, StructureKind, Terrain};

mod builder;
pub mod layout;
pub mod map_file;

pub use builder::{BoardBuilder, TileSpec, TopologyError};
pub use layout::{CORNER_EPSILON, LayoutTile, TileLayout};
pub use map_file::{MapDescription, MapError};

pub type TileId = u16;
pub type IntersectionId = u16;
pub type PathId = u16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub terrain: Terrain,
    /// `None` for tiles that carry no production number.
    pub number: Option<u8>,
    pub corners: [IntersectionId; 6],
}

impl Tile {
    /// True when a roll of `roll` makes this tile pay out.
    pub fn produces_on(&self, roll: u8) -> bool {
        self.terrain.is_productive() && self.number == Some(roll)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    pub id: IntersectionId,
    pub owner: Option<PlayerId>,
    pub structure: StructureKind,
    pub paths: SmallVec<[PathId; 3]>,
    pub tiles: SmallVec<[TileId; 3]>,
}

impl Intersection {
    pub(crate) fn new(id: IntersectionId) -> Self {
        Self {
            id,
            owner: None,
            structure: StructureKind::Empty,
            paths: SmallVec::new(),
            tiles: SmallVec::new(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.structure != StructureKind::Empty
    }

    pub fn degree(&self) -> usize {
        self.paths.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub id: PathId,
    pub owner: Option<PlayerId>,
    /// Stored low id first.
    pub endpoints: (IntersectionId, IntersectionId),
}

impl Path {
    pub fn touches(&self, node: IntersectionId) -> bool {
        self.endpoints.0 == node || self.endpoints.1 == node
    }

    pub fn other_end(&self, node: IntersectionId) -> Option<IntersectionId> {
        if self.endpoints.0 == node {
            Some(self.endpoints.1)
        } else if self.endpoints.1 == node {
            Some(self.endpoints.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
    intersections: Vec<Intersection>,
    paths: Vec<Path>,
}

impl Board {
    /// The fixed 19-tile board.
    pub fn standard() -> Result<Self, TopologyError> {
        TileLayout::standard().build()
    }

    pub fn from_source(source: &MapSource, rng: &mut impl rand::Rng) -> Result<Self, SetupError> {
        let board = match source {
            MapSource::Standard => TileLayout::standard().build()?,
            MapSource::Shuffled => TileLayout::shuffled(rng).build()?,
            MapSource::File(path) => MapDescription::load(path)?.build()?,
        };
        Ok(board)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    pub fn intersection(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id as usize)
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id as usize)
    }

    /// Intersections one path away from `node`.
    pub fn neighbors(&self, node: IntersectionId) -> impl Iterator<Item = IntersectionId> + '_ {
        self.incident_paths(node)
            .filter_map(move |path| path.other_end(node))
    }

    pub fn incident_paths(&self, node: IntersectionId) -> impl Iterator<Item = &Path> + '_ {
        self.intersection(node)
            .into_iter()
            .flat_map(|n| n.paths.iter())
            .filter_map(move |path_id| self.path(*path_id))
    }

    pub fn adjacent_tiles(&self, node: IntersectionId) -> impl Iterator<Item = &Tile> + '_ {
        self.intersection(node)
            .into_iter()
            .flat_map(|n| n.tiles.iter())
            .filter_map(move |tile_id| self.tile(*tile_id))
    }

    pub fn path_between(&self, a: IntersectionId, b: IntersectionId) -> Option<PathId> {
        self.incident_paths(a)
            .find(|path| path.other_end(a) == Some(b))
            .map(|path| path.id)
    }

    pub fn structures_of(&self, player: PlayerId) -> impl Iterator<Item = &Intersection> + '_ {
        self.intersections
            .iter()
            .filter(move |n| n.owner == Some(player) && n.is_occupied())
    }

    pub fn roads_of(&self, player: PlayerId) -> impl Iterator<Item = &Path> + '_ {
        self.paths.iter().filter(move |p| p.owner == Some(player))
    }

    pub(crate) fn from_parts(
        tiles: Vec<Tile>,
        intersections: Vec<Intersection>,
        paths: Vec<Path>,
    ) -> Self {
        Self {
            tiles,
            intersections,
            paths,
        }
    }

    pub(crate) fn put_settlement(&mut self, node: IntersectionId, player: PlayerId) {
        if let Some(intersection) = self.intersections.get_mut(node as usize) {
            debug_assert_eq!(intersection.structure, StructureKind::Empty);
            intersection.owner = Some(player);
            intersection.structure = StructureKind::Settlement;
        }
    }

    pub(crate) fn put_city(&mut self, node: IntersectionId) {
        if let Some(intersection) = self.intersections.get_mut(node as usize) {
            debug_assert_eq!(intersection.structure, StructureKind::Settlement);
            intersection.structure = StructureKind::City;
        }
    }

    pub(crate) fn put_road(&mut self, path: PathId, player: PlayerId) {
        if let Some(path) = self.paths.get_mut(path as usize) {
            debug_assert!(path.owner.is_none());
            path.owner = Some(player);
        }
    }
}

/// Where the board comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapSource {
    #[default]
    Standard,
    Shuffled,
    File(PathBuf),
}

impl fmt::Display for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSource::Standard => write!(f, "standard"),
            MapSource::Shuffled => write!(f, "shuffled"),
            MapSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for MapSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err("empty map source".to_string()),
            "standard" => Ok(MapSource::Standard),
            "shuffled" => Ok(MapSource::Shuffled),
            _ => Ok(MapSource::File(PathBuf::from(trimmed))),
        }
    }
}
