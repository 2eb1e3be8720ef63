use std::fmt;

use hashbrown::HashSet;

use crate::{
    board::{Board, CellId},
    error::{MazeError, Object, Result},
    policy::Policy,
    route::Route,
    time::TravelTime,
};

/// Set of cells of a board that form one maze.
///
/// Passages of member cells may still lead to cells outside of the maze, walks treat that as
/// leaving the maze.
#[derive(Debug, Clone)]
pub struct Maze<'b> {
    board: &'b Board,
    cells: Option<Vec<CellId>>,
    members: HashSet<CellId>,
}

impl<'b> Maze<'b> {
    pub fn new(board: &'b Board) -> Self {
        Maze {
            board,
            cells: None,
            members: HashSet::new(),
        }
    }

    /// Sets the member cells.
    ///
    /// Returns `Ok(false)` if the maze already has its cells, every cell must be initialized.
    pub fn assign_cells(&mut self, cells: &[CellId]) -> Result<bool> {
        if self.cells.is_some() {
            log::warn!("Maze is already assigned");
            return Ok(false);
        }

        for &cell in cells {
            self.board.cell(cell)?.valid_or_err()?;
        }

        self.members = cells.iter().copied().collect();
        self.cells = Some(cells.to_vec());
        Ok(true)
    }

    pub fn is_assigned(&self) -> bool {
        self.cells.is_some()
    }

    fn valid_or_err(&self) -> Result<&[CellId]> {
        self.cells
            .as_deref()
            .ok_or(MazeError::Uninitialized(Object::Maze))
    }

    pub fn cells(&self) -> Result<&[CellId]> {
        self.valid_or_err()
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.members.contains(&cell)
    }

    pub fn board(&self) -> &'b Board {
        self.board
    }

    /// Walks from `start`, asking `policy` where to go next.
    ///
    /// The walk ends in a dead end, or before a cell would be visited for the second time. If it
    /// reaches a cell outside of the maze the result is an empty route.
    pub fn generate_route<P>(&self, start: CellId, policy: &mut P) -> Result<Route<'b>>
    where
        P: Policy + ?Sized,
    {
        self.valid_or_err()?;

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = start;

        while !visited.contains(&current) {
            if !self.contains(current) {
                log::debug!("Walk from #{} left the maze at #{}", start, current);
                return Route::from_cells(self.board, Vec::new());
            }

            path.push(current);
            visited.insert(current);

            let cell = self.board.cell(current)?;
            if cell.is_dead_end()? {
                log::debug!("Walk from #{} ended in dead end #{}", start, current);
                return Route::from_cells(self.board, path);
            }

            current = policy.choose(cell)?;
            log::trace!("Walking from #{} to #{}", cell.id(), current);
        }

        log::debug!("Walk from #{} returned to #{}", start, current);
        Route::from_cells(self.board, path)
    }

    /// Average time of walks from every member cell to `outside`.
    ///
    /// A single walk that gets stuck in a dead end or goes around in a circle makes the whole
    /// maze [`TravelTime::Blocked`]. The sum is divided by the number of members without the exit,
    /// rounding down. A sum over `i64::MAX` is [`MazeError::TimeOverflow`].
    pub fn average_exit_time<P>(&self, outside: CellId, policy: &mut P) -> Result<TravelTime>
    where
        P: Policy + ?Sized,
    {
        let cells = self.valid_or_err()?;
        if !self.contains(outside) {
            return Err(MazeError::ExitNotMember(outside));
        }

        let mut total: i64 = 0;
        for &start in cells {
            match self.exit_time(start, outside, policy)? {
                TravelTime::Finite(time) => {
                    total = total.checked_add(time).ok_or(MazeError::TimeOverflow)?
                }
                TravelTime::Blocked => return Ok(TravelTime::Blocked),
            }
        }

        let sources = cells.len() as i64 - 1;
        if sources == 0 {
            return Ok(TravelTime::ZERO);
        }
        Ok(TravelTime::Finite(total / sources))
    }

    fn exit_time<P>(&self, start: CellId, outside: CellId, policy: &mut P) -> Result<TravelTime>
    where
        P: Policy + ?Sized,
    {
        let mut visited = HashSet::new();
        let mut current = start;
        let mut time = TravelTime::ZERO;

        while current != outside {
            let cell = self.board.cell(current)?;
            if cell.is_dead_end()? || !visited.insert(current) {
                log::debug!("No way out from #{}, stuck at #{}", start, current);
                return Ok(TravelTime::Blocked);
            }

            let next = policy.choose(cell)?;
            time = time
                .checked_add(cell.passage_time_to(next)?)
                .ok_or(MazeError::TimeOverflow)?;
            if time.is_blocked() {
                log::debug!("No way out from #{}, #{} has no passage to #{}", start, current, next);
                return Ok(TravelTime::Blocked);
            }
            current = next;
        }

        Ok(time)
    }
}

impl fmt::Display for Maze<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cells) = &self.cells else {
            return writeln!(f, "Uninitialized maze");
        };

        for &cell in cells {
            write!(f, "{}", self.board[cell])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::Cell,
        policy::*,
        test_utils::sample_board,
        TravelTime::*,
    };

    /// Sample board with cell 4 turned into a dead end, every cell in the maze.
    fn dead_end_board() -> (Board, Vec<CellId>) {
        let (mut board, c) = sample_board();
        board.attach_passages(c[4], []).unwrap();
        (board, c)
    }

    /// Sample board extended by the chain 4 -> 5 -> 6, where 6 is a dead end.
    fn chain_board() -> (Board, Vec<CellId>) {
        let (mut board, mut c) = sample_board();
        c.extend(board.add_cells(2));
        board.attach_passages(c[4], [(c[5], Finite(3))]).unwrap();
        board.attach_passages(c[5], [(c[6], Finite(3))]).unwrap();
        board.attach_passages(c[6], []).unwrap();
        (board, c)
    }

    fn maze<'b>(board: &'b Board, cells: &[CellId]) -> Maze<'b> {
        let mut maze = Maze::new(board);
        assert_eq!(maze.assign_cells(cells), Ok(true));
        maze
    }

    #[test]
    fn assign_once() {
        let (board, c) = dead_end_board();
        let mut maze = Maze::new(&board);

        assert!(!maze.is_assigned());
        assert_eq!(maze.assign_cells(&c), Ok(true));
        assert_eq!(maze.assign_cells(&c[..2]), Ok(false));
        assert_eq!(maze.cells(), Ok(c.as_slice()));
        assert!(maze.contains(c[4]));
    }

    #[test]
    fn uninitialized_member_is_an_error() {
        let (board, c) = sample_board();
        let mut maze = Maze::new(&board);

        assert_eq!(
            maze.assign_cells(&c),
            Err(MazeError::Uninitialized(Object::Cell(c[4])))
        );
        assert!(!maze.is_assigned());
        assert!(!maze.contains(c[0]));
    }

    #[test]
    fn unassigned_maze_cannot_walk() {
        let (board, c) = dead_end_board();
        let maze = Maze::new(&board);
        let err = MazeError::Uninitialized(Object::Maze);

        assert_eq!(maze.generate_route(c[0], &mut Greedy).unwrap_err(), err);
        assert_eq!(maze.average_exit_time(c[0], &mut Greedy).unwrap_err(), err);
    }

    #[test]
    fn walk_stops_before_revisiting() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c);

        let route = maze.generate_route(c[1], &mut choose_arbitrary).unwrap();
        assert_eq!(route.cells(), Ok(vec![c[1], c[2], c[3], c[0]]));
        assert_eq!(route.total_time(), Ok(Finite(9)));
    }

    #[test]
    fn walk_stops_in_dead_end() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c);

        let route = maze.generate_route(c[1], &mut choose_greedy).unwrap();
        assert_eq!(route.cells(), Ok(vec![c[1], c[2], c[3], c[4]]));
        assert_eq!(route.total_time(), Ok(Finite(8)));

        let route = maze.generate_route(c[4], &mut choose_random).unwrap();
        assert_eq!(route.cells(), Ok(vec![c[4]]));
        assert_eq!(route.total_time(), Ok(Finite(0)));
    }

    #[test]
    fn random_walks_stay_on_the_board() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c);
        let mut policy = RandomChoice::seeded(3);

        for _ in 0..16 {
            let route = maze.generate_route(c[1], &mut policy).unwrap();
            let cells = route.cells().unwrap();
            assert!(cells == [c[1], c[2], c[3], c[0]] || cells == [c[1], c[2], c[3], c[4]]);
            assert!(route.total_time().unwrap().is_finite());
        }
    }

    #[test]
    fn walk_leaving_the_maze_is_empty() {
        let (board, c) = chain_board();
        let maze = maze(&board, &c[..6]);

        let empty = Route::from_cells(&board, vec![]).unwrap();
        assert_eq!(maze.generate_route(c[4], &mut choose_arbitrary), Ok(empty.clone()));
        assert_eq!(maze.generate_route(c[4], &mut choose_random), Ok(empty.clone()));
        assert_eq!(maze.generate_route(c[6], &mut Greedy), Ok(empty));
    }

    #[test]
    fn single_chain_is_policy_independent() {
        let (board, c) = chain_board();
        let maze = maze(&board, &c);

        let random = maze.generate_route(c[4], &mut choose_random).unwrap();
        let arbitrary = maze.generate_route(c[4], &mut choose_arbitrary).unwrap();
        let greedy = maze.generate_route(c[4], &mut Greedy).unwrap();

        assert_eq!(random, arbitrary);
        assert_eq!(arbitrary, greedy);
        assert_eq!(arbitrary.cells(), Ok(vec![c[4], c[5], c[6]]));
    }

    #[test]
    fn different_choices_make_different_routes() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c);
        let mut second = |cell: &Cell| -> Result<CellId> {
            let connected = cell.connected_cells()?;
            Ok(connected[1 % connected.len()])
        };

        let picked = maze.generate_route(c[3], &mut second).unwrap();
        let first = maze.generate_route(c[3], &mut choose_arbitrary).unwrap();

        assert_eq!(picked.cells(), Ok(vec![c[3], c[4]]));
        assert_eq!(first.cells(), Ok(vec![c[3], c[0], c[1], c[2]]));
        assert_ne!(picked, first);
    }

    #[test]
    fn average_exit_time() {
        let (mut board, c) = sample_board();
        board.attach_passages(c[4], [(c[1], Finite(1))]).unwrap();
        let maze = maze(&board, &c);

        assert_eq!(maze.average_exit_time(c[4], &mut choose_greedy), Ok(Finite(6)));
        assert_eq!(maze.average_exit_time(c[0], &mut choose_arbitrary), Ok(Finite(7)));
        assert_eq!(maze.average_exit_time(c[4], &mut Arbitrary), Ok(Blocked));
        assert_eq!(maze.average_exit_time(c[0], &mut Greedy), Ok(Blocked));
    }

    #[test]
    fn one_stuck_cell_blocks_the_average() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c);

        assert_eq!(maze.average_exit_time(c[0], &mut choose_arbitrary), Ok(Blocked));
        assert_eq!(maze.average_exit_time(c[0], &mut choose_random), Ok(Blocked));
        assert_eq!(maze.average_exit_time(c[0], &mut choose_greedy), Ok(Blocked));
    }

    #[test]
    fn overflowing_average_is_an_error() {
        let mut board = Board::new();
        let c = board.add_cells(3);
        board.attach_passages(c[0], [(c[2], Finite(i64::MAX))]).unwrap();
        board.attach_passages(c[1], [(c[2], Finite(i64::MAX))]).unwrap();
        board.attach_passages(c[2], []).unwrap();

        let whole = maze(&board, &c);
        assert_eq!(
            whole.average_exit_time(c[2], &mut Greedy),
            Err(MazeError::TimeOverflow)
        );

        let half = maze(&board, &c[1..]);
        assert_eq!(half.average_exit_time(c[2], &mut Greedy), Ok(Finite(i64::MAX)));
    }

    #[test]
    fn overflowing_walk_is_an_error() {
        let mut board = Board::new();
        let c = board.add_cells(3);
        board.attach_passages(c[0], [(c[1], Finite(i64::MAX))]).unwrap();
        board.attach_passages(c[1], [(c[2], Finite(i64::MAX))]).unwrap();
        board.attach_passages(c[2], []).unwrap();
        let maze = maze(&board, &c);

        assert_eq!(
            maze.average_exit_time(c[2], &mut choose_arbitrary),
            Err(MazeError::TimeOverflow)
        );
    }

    #[test]
    fn exit_must_be_a_member() {
        let (board, c) = chain_board();
        let maze = maze(&board, &c[..6]);

        assert_eq!(
            maze.average_exit_time(c[6], &mut Greedy),
            Err(MazeError::ExitNotMember(c[6]))
        );
    }

    #[test]
    fn exit_alone_takes_no_time() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c[4..]);

        assert_eq!(maze.average_exit_time(c[4], &mut Greedy), Ok(Finite(0)));
    }

    #[test]
    fn display_lists_member_cells() {
        let (board, c) = dead_end_board();
        let maze = maze(&board, &c[3..]);

        assert_eq!(
            maze.to_string(),
            "Cell #3\nTime to cell #0: 4\nTime to cell #4: 3\nCell #4\n"
        );
        assert_eq!(Maze::new(&board).to_string(), "Uninitialized maze\n");
    }
}
