use docopt::Docopt;
use error_chain::bail;
use log::info;
use serde_derive::Deserialize;
use mazegame::{
    cells::Cartesian2DCoordinate,
    generators,
    grid::Grid,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    pathing,
    units::{Height, Width},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Mazegame

Usage:
    mazegame_driver -h | --help
    mazegame_driver [options]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --level=<l>            Preset grid size from 1 to 4: 5x5, 10x10, 15x15 or 20x20.
    --grid-width=<w>       The grid width in a w*h grid [default: 10].
    --grid-height=<h>      The grid height in a w*h grid [default: 10].
    --seed=<s>             Seed the random source, the same seed and size always give the same maze.
    --show-path            Show the path from the start to the end point. Uses the longest path in the maze if no points are given, the point furthest from the start if only a start is given.
                           Without this flag any given start and end points are marked on their own.
    --start-x=<x>          x coordinate of the path start
    --start-y=<y>          y coordinate of the path start
    --end-x=<x>            x coordinate of the path end
    --end-y=<y>            y coordinate of the path end
    --text-out=<path>      Output file path for the text rendering of the maze, stdout if not given.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_level: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_end_x: Option<u32>,
    flag_end_y: Option<u32>,
    flag_text_out: String,
    flag_save_edges: String,
}

mod errors {
    use error_chain::error_chain;
    error_chain! {
        links {
            Maze(::mazegame::errors::Error, ::mazegame::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let (width, height) = grid_dimensions(&args)?;
    let mut maze_grid = Grid::new(Width(width), Height(height))?;
    let mut rng = generators::rng_from_seed(args.flag_seed);
    generators::prims(&mut maze_grid, &mut rng)?;
    info!("generated a {}x{} maze with {} passages",
          width,
          height,
          maze_grid.links_count());

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    let (start, end) = points_from_args(&args);
    let text = if args.flag_show_path {
        let path = path_from_args(&maze_grid, start, end)?;
        info!("showing a path of {} cells", path.len());
        let display = PathDisplay::new(&path);
        format!("{}", maze_grid.render_text(Some(&display)))
    } else if start.is_some() || end.is_some() {
        for point in start.iter().chain(end.iter()) {
            if !maze_grid.is_valid_coordinate(*point) {
                bail!("point {} lies outside the {}x{} grid", point, width, height);
            }
        }
        let display = StartEndPointsDisplay::new(start.into_iter().collect(),
                                                 end.into_iter().collect());
        format!("{}", maze_grid.render_text(Some(&display)))
    } else {
        format!("{}", maze_grid)
    };

    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Levels follow the game's menu: each level adds five cells to both sides of a square maze.
fn grid_dimensions(maze_args: &MazeArgs) -> Result<(usize, usize)> {
    if let Some(level) = maze_args.flag_level {
        if level < 1 || level > 4 {
            bail!("level must be between 1 and 4, got {}", level);
        }
        Ok((level * 5, level * 5))
    } else if let Some(square_grid_size) = maze_args.flag_grid_size {
        Ok((square_grid_size, square_grid_size))
    } else {
        Ok((maze_args.flag_grid_width, maze_args.flag_grid_height))
    }
}

/// A point is only given when both of its coordinates are.
fn points_from_args(maze_args: &MazeArgs)
                    -> (Option<Cartesian2DCoordinate>, Option<Cartesian2DCoordinate>) {
    let start = match (maze_args.flag_start_x, maze_args.flag_start_y) {
        (Some(x), Some(y)) => Some(Cartesian2DCoordinate::new(x, y)),
        _ => None,
    };
    let end = match (maze_args.flag_end_x, maze_args.flag_end_y) {
        (Some(x), Some(y)) => Some(Cartesian2DCoordinate::new(x, y)),
        _ => None,
    };
    (start, end)
}

fn path_from_args(maze_grid: &Grid,
                  start: Option<Cartesian2DCoordinate>,
                  end: Option<Cartesian2DCoordinate>)
                  -> Result<pathing::Path> {
    let path = match (start, end) {
        (Some(start), Some(end)) => pathing::find_path(maze_grid, start, end)?,
        (Some(start), None) => {
            let distances = pathing::Distances::new(maze_grid, start)?;
            let end = distances.furthest_points_on_grid()
                .first()
                .cloned()
                .unwrap_or(start);
            pathing::find_path(maze_grid, start, end)?
        }
        (None, Some(end)) => {
            let distances = pathing::Distances::new(maze_grid, end)?;
            let start = distances.furthest_points_on_grid()
                .first()
                .cloned()
                .unwrap_or(end);
            pathing::find_path(maze_grid, start, end)?
        }
        (None, None) => pathing::longest_path(maze_grid)?,
    };
    Ok(path)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze_grid.size(), maze_grid.links_count()));

    for (src, dst) in maze_grid.iter_links() {
        let (index_a, index_b) = match (maze_grid.grid_coordinate_to_index(src),
                                        maze_grid.grid_coordinate_to_index(dst)) {
            (Some(a), Some(b)) => (a, b),
            _ => bail!("link {} - {} lies outside the grid", src, dst),
        };
        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    info!("saved maze edges to {}", file_path);

    Ok(())
}
