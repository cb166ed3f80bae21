//! Declarative map descriptions.
//!
//! ```text
//! # comment
//! intersections: 54
//! tile: WOOD 2  0 1 2 3 4 5
//! tile: DESERT 0  21 31 32 29 19 18
//! ```
//!
//! `intersections` declares how many intersection ids exist. Each `tile`
//! record gives a terrain token, a production number (`0` for none) and six
//! corner ids in cyclic order. Tiles are numbered in file order.
//!
//! The keywords may be left out: a line holding a single number is the
//! intersection count and any other bare line is a tile record.
//!
//! A description that parses but does not wire into a valid board (a corner
//! shared by too many paths, say) is still the map author's mistake and is
//! reported as [`MapError::InvalidBoard`].

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{Board, BoardBuilder, IntersectionId, TileSpec, TopologyError};
use crate::types::Terrain;

const TILE_FIELDS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("cannot read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown record `{record}`")]
    UnknownRecord { line: usize, record: String },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unknown terrain `{token}`")]
    UnknownTerrain { line: usize, token: String },
    #[error("line {line}: `{token}` is not a non-negative integer")]
    InvalidInteger { line: usize, token: String },
    #[error("line {line}: production number {number} is not 0 or 2..=12")]
    InvalidNumber { line: usize, number: u32 },
    #[error("line {line}: intersection count {count} is out of range")]
    InvalidIntersectionCount { line: usize, count: u32 },
    #[error("line {line}: intersection count declared twice")]
    DuplicateIntersectionCount { line: usize },
    #[error("no intersection count declared")]
    MissingIntersectionCount,
    #[error("line {line}: corner {corner} is outside 0..{count}")]
    CornerOutOfRange {
        line: usize,
        corner: u32,
        count: usize,
    },
    #[error("line {line}: corner {corner} appears twice in one tile")]
    RepeatedCorner { line: usize, corner: u32 },
    #[error("intersection {0} is declared but no tile uses it")]
    UnusedIntersection(IntersectionId),
    #[error("map declares no tiles")]
    NoTiles,
    #[error("map does not form a valid board: {0}")]
    InvalidBoard(#[from] TopologyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDescription {
    pub intersection_count: usize,
    pub tiles: Vec<TileSpec>,
}

impl MapDescription {
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut count: Option<(usize, usize)> = None;
        let mut records: Vec<TileRecord> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let (key, rest) = match content.split_once(':') {
                Some((key, rest)) => (key.trim(), rest),
                None if content.split_whitespace().count() == 1 => ("intersections", content),
                None => ("tile", content),
            };
            match key {
                "intersections" => {
                    if count.is_some() {
                        return Err(MapError::DuplicateIntersectionCount { line });
                    }
                    let fields: Vec<&str> = rest.split_whitespace().collect();
                    if fields.len() != 1 {
                        return Err(MapError::FieldCount {
                            line,
                            expected: 1,
                            found: fields.len(),
                        });
                    }
                    let value = parse_u32(fields[0], line)?;
                    if value == 0 || value > IntersectionId::MAX as u32 {
                        return Err(MapError::InvalidIntersectionCount { line, count: value });
                    }
                    count = Some((value as usize, line));
                }
                "tile" => records.push(parse_tile(rest, line)?),
                other => {
                    return Err(MapError::UnknownRecord {
                        line,
                        record: other.to_string(),
                    });
                }
            }
        }

        let (intersection_count, _) = count.ok_or(MapError::MissingIntersectionCount)?;
        if records.is_empty() {
            return Err(MapError::NoTiles);
        }

        let mut used = vec![false; intersection_count];
        let mut tiles = Vec::with_capacity(records.len());
        for (line, terrain, number, raw_corners) in records {
            let mut corners = [0 as IntersectionId; 6];
            for (i, corner) in raw_corners.iter().enumerate() {
                if *corner as usize >= intersection_count {
                    return Err(MapError::CornerOutOfRange {
                        line,
                        corner: *corner,
                        count: intersection_count,
                    });
                }
                if raw_corners[..i].contains(corner) {
                    return Err(MapError::RepeatedCorner {
                        line,
                        corner: *corner,
                    });
                }
                used[*corner as usize] = true;
                corners[i] = *corner as IntersectionId;
            }
            tiles.push(TileSpec {
                terrain,
                number,
                corners,
            });
        }
        if let Some(unused) = used.iter().position(|u| !u) {
            return Err(MapError::UnusedIntersection(unused as IntersectionId));
        }

        Ok(Self {
            intersection_count,
            tiles,
        })
    }

    pub fn to_builder(&self) -> BoardBuilder {
        let mut builder = BoardBuilder::new(self.intersection_count);
        for tile in &self.tiles {
            builder.push_tile(tile.clone());
        }
        builder
    }

    pub fn build(&self) -> Result<Board, MapError> {
        Ok(self.to_builder().build()?)
    }
}

impl FromStr for MapDescription {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapDescription::parse(s)
    }
}

type TileRecord = (usize, Terrain, Option<u8>, [u32; 6]);

fn parse_tile(rest: &str, line: usize) -> Result<TileRecord, MapError> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() != TILE_FIELDS {
        return Err(MapError::FieldCount {
            line,
            expected: TILE_FIELDS,
            found: fields.len(),
        });
    }
    let terrain = Terrain::from_str(fields[0]).map_err(|_| MapError::UnknownTerrain {
        line,
        token: fields[0].to_string(),
    })?;
    let number = match parse_u32(fields[1], line)? {
        0 => None,
        n @ 2..=12 => Some(n as u8),
        n => return Err(MapError::InvalidNumber { line, number: n }),
    };
    let mut corners = [0u32; 6];
    for (slot, token) in corners.iter_mut().zip(&fields[2..]) {
        *slot = parse_u32(token, line)?;
    }
    Ok((line, terrain, number, corners))
}

fn parse_u32(token: &str, line: usize) -> Result<u32, MapError> {
    token.parse().map_err(|_| MapError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}
