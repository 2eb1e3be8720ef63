use std::fmt;

use smallvec::SmallVec;

use crate::{
    error::{MazeError, Object, Result},
    time::TravelTime,
};

/// Handle of a cell inside a [`Board`](super::Board).
///
/// Two cells are the same cell only if their handles are equal, cells with equal passages are
/// still distinct. A handle remembers the board that issued it (and its clones), any other board
/// rejects it with [`MazeError::UnknownCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub(crate) board: usize,
    pub(crate) index: usize,
}

impl CellId {
    /// Position of the cell on its board.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Passages of a single cell, in the order they were supplied.
pub type Passages = SmallVec<[(CellId, TravelTime); 6]>;

/// Outcome of the last attempt to attach passages to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ok,
    AlreadyInitialized,
    InvalidTime,
}

impl Status {
    pub fn description(&self) -> &'static str {
        match self {
            Status::Ok => "Status is OK",
            Status::AlreadyInitialized => "Cell is already initialized",
            Status::InvalidTime => "Time value is invalid",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    passages: Option<Passages>,
    status: Status,
}

impl Cell {
    pub(crate) fn new(id: CellId) -> Cell {
        Cell {
            id,
            passages: None,
            status: Status::Ok,
        }
    }

    /// Sets the passages of the cell, only the first successful call has any effect.
    ///
    /// Returns `false` and records the reason in [`Cell::status`] if the cell already has its
    /// passages or if any of the supplied times is not strictly positive. A destination given
    /// more than once keeps its first position and the last time.
    pub(crate) fn make_passages(&mut self, passages: Vec<(CellId, TravelTime)>) -> bool {
        if self.passages.is_some() {
            log::warn!("Cell #{} already has its passages", self.id);
            self.status = Status::AlreadyInitialized;
            return false;
        }

        if let Some((to, time)) = passages.iter().find(|(_, t)| !t.is_valid_passage()) {
            log::warn!("Invalid time {} from cell #{} to cell #{}", time, self.id, to);
            self.status = Status::InvalidTime;
            return false;
        }

        let mut stored = Passages::new();
        for (to, time) in passages {
            match stored.iter_mut().find(|(cell, _)| *cell == to) {
                Some(entry) => entry.1 = time,
                None => stored.push((to, time)),
            }
        }

        self.passages = Some(stored);
        self.status = Status::Ok;
        true
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.passages.is_some()
    }

    pub(crate) fn valid_or_err(&self) -> Result<&Passages> {
        self.passages
            .as_ref()
            .ok_or(MazeError::Uninitialized(Object::Cell(self.id)))
    }

    /// Every stored passage, blocked ones included, in insertion order.
    pub fn passages(&self) -> Result<impl Iterator<Item = (CellId, TravelTime)> + '_> {
        Ok(self.valid_or_err()?.iter().copied())
    }

    /// Returns the time to the target cell, or [`TravelTime::Blocked`] if there is no passage.
    pub fn passage_time_to(&self, cell: CellId) -> Result<TravelTime> {
        Ok(self
            .valid_or_err()?
            .iter()
            .find(|(to, _)| *to == cell)
            .map_or(TravelTime::Blocked, |(_, time)| *time))
    }

    /// Destinations of all passages that are not blocked.
    pub fn connected_cells(&self) -> Result<SmallVec<[CellId; 6]>> {
        Ok(self
            .valid_or_err()?
            .iter()
            .filter(|(_, time)| time.is_finite())
            .map(|(to, _)| *to)
            .collect())
    }

    pub fn is_dead_end(&self) -> Result<bool> {
        Ok(self.valid_or_err()?.iter().all(|(_, time)| time.is_blocked()))
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cell {}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cell #{}", self.id)?;
        for (to, time) in self.passages.iter().flatten() {
            writeln!(f, "Time to cell #{}: {}", to, time)?;
        }
        Ok(())
    }
}
