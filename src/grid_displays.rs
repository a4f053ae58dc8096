use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec};
use crate::grid::Grid;
use crate::utils;
use crate::utils::FnvHashSet;

const WALL: char = '▓';
const PASSAGE: char = ' ';

pub trait GridDisplay {
    /// Render the contents of a grid cell as text, a single glyph.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> char {
        PASSAGE
    }
}

/// Marks the start `S`, the end `E` and every cell in between `.` along a path.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
    start: Option<Cartesian2DCoordinate>,
    end: Option<Cartesian2DCoordinate>,
}

impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> PathDisplay {
        let mut on_path_coordinates = utils::fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay {
            on_path_coordinates,
            start: path.first().cloned(),
            end: path.last().cloned(),
        }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> char {
        if self.start == Some(coord) {
            'S'
        } else if self.end == Some(coord) {
            'E'
        } else if self.on_path_coordinates.contains(&coord) {
            '.'
        } else {
            PASSAGE
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}

impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}

impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> char {
        if self.start_coordinates.contains(&coord) {
            'S'
        } else if self.end_coordinates.contains(&coord) {
            'E'
        } else {
            PASSAGE
        }
    }
}

/// Text rendering of a maze, one glyph per cell with a glyph of wall or passage between cells.
pub struct MazeText<'a> {
    grid: &'a Grid,
    display: Option<&'a dyn GridDisplay>,
}

impl Grid {
    pub fn render_text<'a>(&'a self, display: Option<&'a dyn GridDisplay>) -> MazeText<'a> {
        MazeText {
            grid: self,
            display,
        }
    }
}

impl<'a> MazeText<'a> {
    fn cell_body(&self, coord: Cartesian2DCoordinate) -> char {
        self.display.map_or(PASSAGE, |display| display.render_cell_body(coord))
    }

    fn passage_or_wall(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> char {
        if self.grid.is_neighbour_linked(coord, direction) {
            PASSAGE
        } else {
            WALL
        }
    }
}

impl<'a> fmt::Display for MazeText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border = ::std::iter::repeat(WALL)
            .take(self.grid.columns().0 * 2 + 1)
            .collect::<String>();
        writeln!(f, "{}", border)?;

        let rows_count = self.grid.rows().0;
        for (row_index, row) in self.grid.iter_row().enumerate() {

            let mut cells_line = String::new();
            let mut south_line = String::new();
            cells_line.push(WALL);
            south_line.push(WALL);

            for coord in row {
                cells_line.push(self.cell_body(coord));
                cells_line.push(self.passage_or_wall(coord, CompassPrimary::East));
                south_line.push(self.passage_or_wall(coord, CompassPrimary::South));
                south_line.push(WALL);
            }

            writeln!(f, "{}", cells_line)?;
            if row_index + 1 < rows_count {
                writeln!(f, "{}", south_line)?;
            }
        }

        writeln!(f, "{}", border)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_text(None))
    }
}
