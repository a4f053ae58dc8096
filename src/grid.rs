use error_chain::bail;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use smallvec::SmallVec;
use std::fmt;
use std::slice;
use std::u32;

use crate::cells::{Cartesian2DCoordinate, Cell, CompassPrimary, CoordinateSmallVec};
use crate::errors::{ErrorKind, Result};
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{ColumnsCount, EdgesCount, Height, NodesCount, RowsCount, Width};

/// A fixed size rectangular grid of cells, stored densely in row major order.
///
/// The grid owns every cell. Edge slots refer to neighbours by their index in the cell arena, so
/// the topology is a plain value with no shared ownership.
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<Cell>,
    links: usize,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotNeighbours,
    SlotOccupied,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: width: {:?}, height: {:?}, links: {:?}",
               self.width.0,
               self.height.0,
               self.links)
    }
}

impl Grid {
    /// Allocate `width * height` unlinked cells, none of them in the maze.
    ///
    /// The cell count must be non zero and fit a `u32`, larger grids are a `Configuration` error.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let cells_count = match w.checked_mul(h) {
            Some(count) if count > 0 && count <= u32::MAX as usize => count,
            _ => bail!(ErrorKind::Configuration(w, h)),
        };

        let cells = (0..cells_count)
            .map(|index| Cell::new(Cartesian2DCoordinate::from_row_major_index(index, width)))
            .collect();

        Ok(Grid {
            width,
            height,
            cells,
            links: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.height.0)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.width.0)
    }

    /// Node and edge counts of the spanning tree a generated maze on this grid has.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let nodes = self.size();
        (NodesCount(nodes), EdgesCount(nodes - 1))
    }

    /// Number of undirected passages between cells.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.links
    }

    /// True once anything has touched the topology: a link exists or a cell joined the maze.
    pub fn is_generated(&self) -> bool {
        self.links > 0 || self.cells.iter().any(Cell::in_maze)
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let x = rng.gen_range(0..self.width.0);
        let y = rng.gen_range(0..self.height.0);
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        self.cells.get(index).map(Cell::coordinate)
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub fn cell_at_index(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn cells(&self) -> slice::Iter<Cell> {
        self.cells.iter()
    }

    /// Cell nodes that are to the North, South, East or West of a particular node, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        direction
            .offset_coordinate(coord)
            .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Arena indices of the in bounds neighbours of the cell at `index`, scanned clockwise from
    /// north.
    pub(crate) fn neighbour_indices(&self, index: usize) -> SmallVec<[usize; 4]> {
        let coord = self.cells[index].coordinate();
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter_map(|neighbour| self.grid_coordinate_to_index(neighbour))
            .collect()
    }

    #[inline]
    pub(crate) fn mark_in_maze(&mut self, index: usize) {
        self.cells[index].mark_in_maze();
    }

    /// Link two axis adjacent cells, populating the facing edge slot on both sides.
    ///
    /// Each slot is written at most once, relinking an already linked pair is an error.
    pub(crate) fn link(&mut self,
                       a: Cartesian2DCoordinate,
                       b: Cartesian2DCoordinate)
                       -> ::std::result::Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let (a_index, b_index) = match (self.grid_coordinate_to_index(a),
                                        self.grid_coordinate_to_index(b)) {
            (Some(a_index), Some(b_index)) => (a_index, b_index),
            _ => return Err(CellLinkError::InvalidGridCoordinate),
        };
        let a_to_b = CompassPrimary::between(a, b).ok_or(CellLinkError::NotNeighbours)?;
        let b_to_a = a_to_b.opposite();

        if self.cells[a_index].has_edge(a_to_b) || self.cells[b_index].has_edge(b_to_a) {
            return Err(CellLinkError::SlotOccupied);
        }

        self.cells[a_index].set_edge(a_to_b, b_index);
        self.cells[b_index].set_edge(b_to_a, a_index);
        self.links += 1;
        Ok(())
    }

    /// Cell nodes that are linked to a particular node by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|cell| {
            cell.linked_slots()
                .iter()
                .map(|&(_, index)| self.cells[index].coordinate())
                .collect()
        })
    }

    /// The neighbour behind the `direction` edge slot, if that slot is populated.
    pub fn linked_neighbour(&self,
                            coord: Cartesian2DCoordinate,
                            direction: CompassPrimary)
                            -> Option<Cartesian2DCoordinate> {
        self.cell(coord)
            .and_then(|cell| cell.edge(direction))
            .map(|index| self.cells[index].coordinate())
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        CompassPrimary::between(a, b)
            .map_or(false, |dir| self.linked_neighbour(a, dir) == Some(b))
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.linked_neighbour(coord, direction).is_some()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.width, self.height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::columns(self.width, self.height)
    }

    /// Every passage exactly once, as (cell, east or south neighbour) pairs in row major order.
    pub fn iter_links<'a>(&'a self)
                          -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + 'a {
        self.cells.iter().flat_map(move |cell| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter_map(|dir| cell.edge(*dir))
                .map(|index| (cell.coordinate(), self.cells[index].coordinate()))
                .collect::<SmallVec<[_; 2]>>()
        })
    }

    /// Export the passages as an undirected petgraph graph.
    ///
    /// Node `i` is the cell with row major index `i` and carries its coordinate as the weight.
    pub fn as_graph(&self) -> UnGraph<Cartesian2DCoordinate, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.links);
        for cell in &self.cells {
            let _ = graph.add_node(cell.coordinate());
        }
        for (index, cell) in self.cells.iter().enumerate() {
            for &dir in &[CompassPrimary::East, CompassPrimary::South] {
                if let Some(neighbour_index) = cell.edge(dir) {
                    let _ = graph.add_edge(NodeIndex::new(index), NodeIndex::new(neighbour_index), ());
                }
            }
        }
        graph
    }
}
