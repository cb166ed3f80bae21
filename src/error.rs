use crate::board::{MapError, TopologyError};

/// Anything that stops a game from starting.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid map description: {0}")]
    Map(#[from] MapError),
    #[error("board construction bug: {0}")]
    Topology(#[from] TopologyError),
    #[error("{0} players requested, the game supports 2 to 4")]
    PlayerCount(usize),
}

impl SetupError {
    /// True for faults in user-supplied input, false for broken construction
    /// invariants.
    pub fn is_configuration(&self) -> bool {
        match self {
            SetupError::Map(_) | SetupError::PlayerCount(_) => true,
            SetupError::Topology(_) => false,
        }
    }
}
