use std::fmt;

use thiserror::Error;

use crate::board::CellId;

/// Object whose one-time initialization has not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Object {
    Cell(CellId),
    Route,
    Maze,
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Cell(id) => write!(f, "cell #{}", id),
            Object::Route => write!(f, "route"),
            Object::Maze => write!(f, "maze"),
        }
    }
}

/// Misuse of the API. Domain outcomes such as "no path" are
/// [`TravelTime::Blocked`](crate::TravelTime::Blocked) values instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("Uninitialized {0} accessed")]
    Uninitialized(Object),
    #[error("Cell #{0} does not belong to this board")]
    UnknownCell(CellId),
    #[error("Cell #{0} has no reachable neighbor to choose")]
    NoReachableNeighbor(CellId),
    #[error("Exit cell #{0} is not a member of the maze")]
    ExitNotMember(CellId),
    #[error("Travel time doesn't fit into 64 bits")]
    TimeOverflow,
}

pub type Result<T, E = MazeError> = std::result::Result<T, E>;
