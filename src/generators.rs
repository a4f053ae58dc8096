use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, Cell};
use crate::errors::{ErrorKind, Result};
use crate::grid::Grid;

/// The random source used for maze generation.
///
/// A fixed seed always produces the same maze for the same grid dimensions, no seed draws one
/// from the operating system.
pub fn rng_from_seed(seed: Option<u64>) -> XorShiftRng {
    match seed {
        Some(s) => XorShiftRng::seed_from_u64(s),
        None => XorShiftRng::from_entropy(),
    }
}

/// Apply a randomised Prim's algorithm to the grid, carving a perfect maze.
///
/// Starting from a random cell the maze grows one cell at a time. The frontier holds every cell
/// bordering the maze that is not yet part of it. Each step draws a frontier cell uniformly at
/// random and links it to one of its neighbours that are already in the maze, that neighbour
/// also drawn uniformly at random. Picking among *all* in-maze neighbours rather than the cell
/// that first put it on the frontier gives mazes more branching.
///
/// Every step adds exactly one cell and one link, so the result is a spanning tree with
/// `size - 1` links. The whole run is determined by the draws taken from `rng`.
///
/// Fails with `ErrorKind::State`, leaving the grid untouched, if the grid already has links or
/// cells in the maze.
pub fn prims<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<()> {

    if grid.is_generated() {
        bail!(ErrorKind::State);
    }

    let start = grid.random_cell(rng);
    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or_else(|| ErrorKind::OutOfBounds(start))?;
    debug!("prims: {}x{} grid, starting at {}",
           grid.width().0,
           grid.height().0,
           start);

    grid.mark_in_maze(start_index);
    let mut frontier = Frontier::with_capacity(grid.size());
    frontier.extend_from(grid, start_index);

    while let Some(frontier_index) = frontier.take_random(rng) {

        let in_maze_neighbours = grid.neighbour_indices(frontier_index)
            .into_iter()
            .filter(|&index| is_in_maze(grid, index))
            .collect::<SmallVec<[usize; 4]>>();

        // A cell only ever joins the frontier next to a cell in the maze.
        let maze_index = match in_maze_neighbours.choose(rng) {
            Some(&index) => index,
            None => bail!("frontier cell {} has no neighbour in the maze", frontier_index),
        };

        let a = coordinate_at(grid, frontier_index)?;
        let b = coordinate_at(grid, maze_index)?;
        grid.link(a, b)
            .map_err(|e| format!("failed to link {} to {}: {:?}", a, b, e))?;
        trace!("prims: linked {} to {}", a, b);

        grid.mark_in_maze(frontier_index);
        frontier.extend_from(grid, frontier_index);
    }

    debug!("prims: finished with {} links", grid.links_count());
    Ok(())
}

fn coordinate_at(grid: &Grid, index: usize) -> Result<Cartesian2DCoordinate> {
    match grid.index_to_grid_coordinate(index) {
        Some(coord) => Ok(coord),
        None => bail!("cell index {} is outside the {} cell grid", index, grid.size()),
    }
}

#[inline]
fn is_in_maze(grid: &Grid, index: usize) -> bool {
    grid.cell_at_index(index).map_or(false, Cell::in_maze)
}

/// Cells adjacent to, but not yet part of, the growing maze.
///
/// The bit set tracks membership so a cell is never queued twice. Draws swap-remove from the
/// vec, enumeration order only shapes which maze is produced.
#[derive(Debug)]
struct Frontier {
    cells: Vec<usize>,
    members: BitSet,
}

impl Frontier {
    fn with_capacity(cells_count: usize) -> Frontier {
        Frontier {
            cells: Vec::new(),
            members: BitSet::with_capacity(cells_count),
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    /// Queue every in bounds neighbour of `index` that is neither in the maze nor queued already.
    fn extend_from(&mut self, grid: &Grid, index: usize) {
        for neighbour in grid.neighbour_indices(index) {
            if !is_in_maze(grid, neighbour) && self.members.insert(neighbour) {
                self.cells.push(neighbour);
            }
        }
    }

    fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }
        let draw = rng.gen_range(0..self.len());
        let index = self.cells.swap_remove(draw);
        let _ = self.members.remove(index);
        Some(index)
    }
}
