use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex, Width};

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Inverse of the row major layout the grid stores its cells in.
    /// `width` must be non-zero.
    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let Width(w) = width;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex,
                                   row_index: RowIndex)
                                   -> Cartesian2DCoordinate {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// The four edge slots of a square cell. North is towards smaller `y`, west towards smaller `x`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// All directions in the order neighbours are scanned: clockwise from north.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    #[inline]
    fn slot(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The direction to step in to get from `from` to `to`.
    /// None unless the two coordinates are strictly axis adjacent.
    pub fn between(from: Cartesian2DCoordinate,
                   to: Cartesian2DCoordinate)
                   -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| dir.offset_coordinate(from) == Some(to))
    }

    /// Creates a new coordinate offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable, the grid bounds are not checked.
    pub fn offset_coordinate(self,
                             coord: Cartesian2DCoordinate)
                             -> Option<Cartesian2DCoordinate> {
        let (x, y) = (coord.x, coord.y);
        match self {
            CompassPrimary::North => y.checked_sub(1).map(|ny| Cartesian2DCoordinate::new(x, ny)),
            CompassPrimary::South => y.checked_add(1).map(|ny| Cartesian2DCoordinate::new(x, ny)),
            CompassPrimary::East => x.checked_add(1).map(|nx| Cartesian2DCoordinate::new(nx, y)),
            CompassPrimary::West => x.checked_sub(1).map(|nx| Cartesian2DCoordinate::new(nx, y)),
        }
    }
}

/// A node in the grid's cell arena.
///
/// Edge slots hold the arena index of the linked neighbour rather than a reference to it, the
/// `Grid` is the only owner of cells. Slots are only ever written while a maze is generated.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Cell {
    coord: Cartesian2DCoordinate,
    edges: [Option<usize>; 4],
    in_maze: bool,
}

impl Cell {
    pub(crate) fn new(coord: Cartesian2DCoordinate) -> Cell {
        Cell {
            coord,
            edges: [None; 4],
            in_maze: false,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Cartesian2DCoordinate {
        self.coord
    }

    /// Has the cell been incorporated into the spanning tree yet?
    #[inline]
    pub fn in_maze(&self) -> bool {
        self.in_maze
    }

    /// Arena index of the neighbour linked through the `dir` edge slot.
    #[inline]
    pub fn edge(&self, dir: CompassPrimary) -> Option<usize> {
        self.edges[dir.slot()]
    }

    #[inline]
    pub fn has_edge(&self, dir: CompassPrimary) -> bool {
        self.edge(dir).is_some()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.iter().filter(|slot| slot.is_some()).count()
    }

    /// Populated slots as (direction, neighbour arena index) pairs.
    pub fn linked_slots(&self) -> SmallVec<[(CompassPrimary, usize); 4]> {
        CompassPrimary::ALL
            .iter()
            .filter_map(|&dir| self.edge(dir).map(|index| (dir, index)))
            .collect()
    }

    #[inline]
    pub(crate) fn mark_in_maze(&mut self) {
        self.in_maze = true;
    }

    #[inline]
    pub(crate) fn set_edge(&mut self, dir: CompassPrimary, neighbour_index: usize) {
        self.edges[dir.slot()] = Some(neighbour_index);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::u32;

    #[test]
    fn opposite_directions() {
        for dir in CompassPrimary::ALL.iter() {
            assert_ne!(*dir, dir.opposite());
            assert_eq!(*dir, dir.opposite().opposite());
        }
        assert_eq!(CompassPrimary::North.opposite(), CompassPrimary::South);
        assert_eq!(CompassPrimary::East.opposite(), CompassPrimary::West);
    }

    #[test]
    fn offset_coordinates() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(CompassPrimary::North.offset_coordinate(gc(3, 3)), Some(gc(3, 2)));
        assert_eq!(CompassPrimary::South.offset_coordinate(gc(3, 3)), Some(gc(3, 4)));
        assert_eq!(CompassPrimary::East.offset_coordinate(gc(3, 3)), Some(gc(4, 3)));
        assert_eq!(CompassPrimary::West.offset_coordinate(gc(3, 3)), Some(gc(2, 3)));

        assert_eq!(CompassPrimary::North.offset_coordinate(gc(0, 0)), None);
        assert_eq!(CompassPrimary::West.offset_coordinate(gc(0, 0)), None);
        assert_eq!(CompassPrimary::South.offset_coordinate(gc(0, u32::MAX)), None);
        assert_eq!(CompassPrimary::East.offset_coordinate(gc(u32::MAX, 0)), None);
    }

    #[test]
    fn direction_between_cells() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(1, 0)), Some(CompassPrimary::North));
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(1, 2)), Some(CompassPrimary::South));
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(2, 1)), Some(CompassPrimary::East));
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(0, 1)), Some(CompassPrimary::West));

        assert_eq!(CompassPrimary::between(gc(1, 1), gc(1, 1)), None);
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(2, 2)), None);
        assert_eq!(CompassPrimary::between(gc(1, 1), gc(1, 3)), None);
    }

    #[test]
    fn row_major_index_conversion() {
        let width = Width(3);
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(0, width),
                   Cartesian2DCoordinate::new(0, 0));
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(4, width),
                   Cartesian2DCoordinate::new(1, 1));
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(8, width),
                   Cartesian2DCoordinate::new(2, 2));
    }

    #[test]
    fn new_cell_has_no_edges() {
        let cell = Cell::new(Cartesian2DCoordinate::new(2, 5));
        assert_eq!(cell.coordinate(), Cartesian2DCoordinate::new(2, 5));
        assert!(!cell.in_maze());
        assert_eq!(cell.edges_count(), 0);
        assert!(cell.linked_slots().is_empty());
    }

    #[test]
    fn edge_slots_are_keyed_by_direction() {
        let mut cell = Cell::new(Cartesian2DCoordinate::new(1, 1));
        cell.set_edge(CompassPrimary::East, 7);
        assert_eq!(cell.edge(CompassPrimary::East), Some(7));
        assert!(!cell.has_edge(CompassPrimary::West));
        assert_eq!(cell.edges_count(), 1);
        assert_eq!(&*cell.linked_slots(), &[(CompassPrimary::East, 7)]);
    }
}
