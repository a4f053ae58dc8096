//! Errors reported by grid construction, maze generation and path queries.
//!
//! None of these are retried internally. A `Disconnected` result on a grid that went through
//! generation means the spanning tree invariant was broken and should be treated as a defect.

use error_chain::error_chain;

use crate::cells::Cartesian2DCoordinate;

error_chain! {
    errors {
        Configuration(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}: both must be positive and the cell count must fit u32 coordinates",
                    width, height)
        }
        State {
            description("grid is not in its pre-generation state")
            display("maze generation requires a grid with no links and no cells in the maze")
        }
        OutOfBounds(coord: Cartesian2DCoordinate) {
            description("coordinate outside the grid")
            display("coordinate {} lies outside the grid", coord)
        }
        Disconnected(start: Cartesian2DCoordinate, end: Cartesian2DCoordinate) {
            description("no path between cells")
            display("no path from {} to {}", start, end)
        }
    }
}
