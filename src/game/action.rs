use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{IntersectionId, PathId};

/// Everything a player can ask the engine to do. Passing is expressed as
/// choosing no action at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    BuildSettlement(IntersectionId),
    BuildRoad(PathId),
    BuildCity(IntersectionId),
}

impl Action {
    pub fn is_settlement(&self) -> bool {
        matches!(self, Action::BuildSettlement(_))
    }

    pub fn is_road(&self) -> bool {
        matches!(self, Action::BuildRoad(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::BuildSettlement(node) => write!(f, "settlement at intersection {node}"),
            Action::BuildRoad(path) => write!(f, "road on path {path}"),
            Action::BuildCity(node) => write!(f, "city at intersection {node}"),
        }
    }
}
