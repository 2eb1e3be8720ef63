//! Mazes as weighted directed graphs of cells.
//!
//! Cells live in a [`Board`] and point at each other through [`CellId`] handles. A [`Maze`] is a
//! set of those cells; it produces [`Route`]s by walking the passages with a [`Policy`] and can
//! tell the average time needed to reach an exit from every member cell.

pub mod board;
pub mod error;
pub mod maze;
pub mod policy;
pub mod route;
pub mod time;

pub use board::{Board, Cell, CellId, Status};
pub use error::{MazeError, Object, Result};
pub use maze::Maze;
pub use policy::{
    choose_arbitrary, choose_greedy, choose_random, Arbitrary, Greedy, Policy, RandomChoice,
};
pub use route::Route;
pub use time::TravelTime;

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;
