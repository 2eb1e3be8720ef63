use std::fmt;

use rand::{thread_rng, Rng};

use crate::{
    board::{Board, CellId},
    error::{MazeError, Object, Result},
    time::TravelTime,
};

/// Ordered walk through cells of a board.
///
/// The cells are set once with [`Route::assign`] and never change afterwards. An empty route is a
/// valid value, it's what [`Maze::generate_route`](crate::Maze::generate_route) returns when the
/// walk leaves the maze.
#[derive(Debug, Clone)]
pub struct Route<'b> {
    board: &'b Board,
    cells: Option<Vec<CellId>>,
}

impl<'b> Route<'b> {
    pub fn new(board: &'b Board) -> Self {
        Route { board, cells: None }
    }

    pub(crate) fn from_cells(board: &'b Board, cells: Vec<CellId>) -> Result<Self> {
        let mut route = Self::new(board);
        route.assign(&cells)?;
        Ok(route)
    }

    /// Sets the cells of the route.
    ///
    /// Returns `Ok(false)` if the route already has its cells, every cell must be initialized.
    pub fn assign(&mut self, cells: &[CellId]) -> Result<bool> {
        if self.cells.is_some() {
            log::warn!("Route is already assigned");
            return Ok(false);
        }

        for &cell in cells {
            self.board.cell(cell)?.valid_or_err()?;
        }

        self.cells = Some(cells.to_vec());
        Ok(true)
    }

    pub fn is_assigned(&self) -> bool {
        self.cells.is_some()
    }

    fn valid_or_err(&self) -> Result<&[CellId]> {
        self.cells
            .as_deref()
            .ok_or(MazeError::Uninitialized(Object::Route))
    }

    /// Copy of the cells, in walking order.
    pub fn cells(&self) -> Result<Vec<CellId>> {
        self.valid_or_err().map(<[_]>::to_vec)
    }

    /// Sum of the passage times between consecutive cells.
    ///
    /// Routes with less than two cells take no time. A missing or blocked passage anywhere makes
    /// the whole route [`TravelTime::Blocked`], a sum over `i64::MAX` is
    /// [`MazeError::TimeOverflow`].
    pub fn total_time(&self) -> Result<TravelTime> {
        self.walk_time(|time| time)
    }

    /// Like [`Route::total_time`], but each passage takes a uniformly random time between 1 and
    /// its time, inclusive.
    pub fn sampled_time(&self) -> Result<TravelTime> {
        self.sampled_time_with(&mut thread_rng())
    }

    pub fn sampled_time_with<R: Rng>(&self, rng: &mut R) -> Result<TravelTime> {
        self.walk_time(|time| rng.gen_range(1..=time))
    }

    fn walk_time(&self, mut step: impl FnMut(i64) -> i64) -> Result<TravelTime> {
        let cells = self.valid_or_err()?;

        let mut total: i64 = 0;
        for pair in cells.windows(2) {
            match self.board.passage_time(pair[0], pair[1])? {
                TravelTime::Finite(time) => {
                    total = total
                        .checked_add(step(time))
                        .ok_or(MazeError::TimeOverflow)?
                }
                TravelTime::Blocked => return Ok(TravelTime::Blocked),
            }
        }

        Ok(TravelTime::Finite(total))
    }
}

/// Routes are equal if they walk the same cells in the same order. Handles carry their board, so
/// routes over different boards are never equal.
impl PartialEq for Route<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Route<'_> {}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cells) = &self.cells else {
            return writeln!(f, "Unassigned route");
        };

        writeln!(f, "Start:")?;
        for pair in cells.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match self.board.passage_time(from, to) {
                Ok(TravelTime::Finite(time)) => {
                    writeln!(f, "Cell {} to cell {}: {} seconds.", from, to, time)?
                }
                _ => writeln!(f, "Cell {} to cell {}: Blocked", from, to)?,
            }
        }
        writeln!(f, "End of route")
    }
}
