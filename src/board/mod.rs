pub mod cell;

use std::{
    ops,
    sync::atomic::{AtomicUsize, Ordering},
};

pub use cell::{Cell, CellId, Passages, Status};

use crate::{
    error::{MazeError, Result},
    time::TravelTime,
};

/// Owner of every cell.
///
/// Cells refer to each other only through [`CellId`] handles, so passages may form arbitrary
/// cycles. Passages are attached through `&mut Board`, which means nothing can change once a
/// [`Maze`](crate::Maze) or [`Route`](crate::Route) borrows the board.
///
/// Every board gets its own tag, which is stamped into the handles it issues. A clone keeps the
/// tag, so handles stay valid for copies of the same board.
#[derive(Debug, Clone)]
pub struct Board {
    id: usize,
    cells: Vec<Cell>,
}

static NEXT_BOARD: AtomicUsize = AtomicUsize::new(0);

impl Board {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Board {
            id: NEXT_BOARD.fetch_add(1, Ordering::Relaxed),
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Creates a new cell without passages.
    pub fn add_cell(&mut self) -> CellId {
        let id = CellId {
            board: self.id,
            index: self.cells.len(),
        };
        self.cells.push(Cell::new(id));
        id
    }

    pub fn add_cells(&mut self, count: usize) -> Vec<CellId> {
        (0..count).map(|_| self.add_cell()).collect()
    }

    /// Attaches passages to a cell, see [`Cell::status`] for the reason of a `false` result.
    ///
    /// Every destination has to be a cell of this board, it doesn't have to be initialized yet.
    pub fn attach_passages<I>(&mut self, cell: CellId, passages: I) -> Result<bool>
    where
        I: IntoIterator<Item = (CellId, TravelTime)>,
    {
        let passages: Vec<_> = passages.into_iter().collect();
        if let Some((to, _)) = passages.iter().find(|(to, _)| !self.contains(*to)) {
            return Err(MazeError::UnknownCell(*to));
        }

        let cell = self.get_cell_mut(cell).ok_or(MazeError::UnknownCell(cell))?;
        Ok(cell.make_passages(passages))
    }

    pub fn contains(&self, cell: CellId) -> bool {
        cell.board == self.id && cell.index < self.cells.len()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get_cell(&self, cell: CellId) -> Option<&Cell> {
        if !self.contains(cell) {
            return None;
        }
        self.cells.get(cell.index)
    }

    fn get_cell_mut(&mut self, cell: CellId) -> Option<&mut Cell> {
        if !self.contains(cell) {
            return None;
        }
        self.cells.get_mut(cell.index)
    }

    /// Same as [`Board::get_cell`], but a foreign handle is an error.
    pub fn cell(&self, cell: CellId) -> Result<&Cell> {
        self.get_cell(cell).ok_or(MazeError::UnknownCell(cell))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn passage_time(&self, from: CellId, to: CellId) -> Result<TravelTime> {
        self.cell(from)?.passage_time_to(to)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl ops::Index<CellId> for Board {
    type Output = Cell;

    fn index(&self, index: CellId) -> &Self::Output {
        self.get_cell(index)
            .unwrap_or_else(|| panic!("Cell out of the board: {:?}", index))
    }
}
