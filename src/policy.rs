//! Strategies choosing where a walk continues from a cell.
//!
//! Any `FnMut(&Cell) -> Result<CellId>` is a [`Policy`], so [`choose_greedy`],
//! [`choose_arbitrary`] and [`choose_random`] can be passed directly. Policies are only meant to
//! be asked about cells that are not dead ends.

use rand::{seq::SliceRandom as _, thread_rng, Rng, SeedableRng as _};

use crate::{
    board::{Cell, CellId},
    error::{MazeError, Result},
    Random,
};

pub trait Policy {
    fn choose(&mut self, cell: &Cell) -> Result<CellId>;
}

impl<F> Policy for F
where
    F: FnMut(&Cell) -> Result<CellId>,
{
    fn choose(&mut self, cell: &Cell) -> Result<CellId> {
        self(cell)
    }
}

/// Destination of the fastest passage, the first one wins a tie.
///
/// Blocked passages are candidates too, they just lose to every finite time, so a cell with only
/// blocked passages still has a greedy choice. Only a cell without any passage is an error.
pub fn choose_greedy(cell: &Cell) -> Result<CellId> {
    let mut passages = cell.passages()?;
    let first = passages
        .next()
        .ok_or(MazeError::NoReachableNeighbor(cell.id()))?;

    let (fastest, _) = passages.fold(first, |best, passage| {
        if passage.1 < best.1 {
            passage
        } else {
            best
        }
    });
    Ok(fastest)
}

/// First cell that isn't behind a blocked passage.
pub fn choose_arbitrary(cell: &Cell) -> Result<CellId> {
    cell.connected_cells()?
        .first()
        .copied()
        .ok_or(MazeError::NoReachableNeighbor(cell.id()))
}

/// Uniformly random cell that isn't behind a blocked passage.
pub fn choose_random(cell: &Cell) -> Result<CellId> {
    choose_random_with(cell, &mut thread_rng())
}

fn choose_random_with<R: Rng>(cell: &Cell, rng: &mut R) -> Result<CellId> {
    cell.connected_cells()?
        .choose(rng)
        .copied()
        .ok_or(MazeError::NoReachableNeighbor(cell.id()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn choose(&mut self, cell: &Cell) -> Result<CellId> {
        choose_greedy(cell)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Arbitrary;

impl Policy for Arbitrary {
    fn choose(&mut self, cell: &Cell) -> Result<CellId> {
        choose_arbitrary(cell)
    }
}

/// Random policy owning its generator, so the walks can be reproduced from a seed.
#[derive(Debug, Clone)]
pub struct RandomChoice<R = Random> {
    rng: R,
}

impl RandomChoice<Random> {
    /// Seeded from `seed`, or from the thread generator if there is none.
    pub fn new(seed: Option<u64>) -> Self {
        Self::seeded(seed.unwrap_or_else(|| thread_rng().gen()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Random::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomChoice<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomChoice { rng }
    }
}

impl<R: Rng> Policy for RandomChoice<R> {
    fn choose(&mut self, cell: &Cell) -> Result<CellId> {
        choose_random_with(cell, &mut self.rng)
    }
}
