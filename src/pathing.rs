// Path queries over a generated grid.
//
// Every query only reads the grid, so any number of them can run against the same finished maze.
// A maze is a spanning tree, which makes "the" path between two cells well defined. The search
// itself is a plain breadth first search over populated edge slots and does not rely on the tree
// shape, on a grid with cycles it returns one of the shortest routes.

use bit_set::BitSet;
use error_chain::bail;
use log::warn;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::cells::{Cartesian2DCoordinate, Cell};
use crate::errors::{ErrorKind, Result};
use crate::grid::Grid;
use crate::utils;
use crate::utils::FnvHashMap;

/// Ordered cells from a start to an end cell inclusive, each consecutive pair linked.
pub type Path = Vec<Cartesian2DCoordinate>;

fn checked_index(grid: &Grid, coord: Cartesian2DCoordinate) -> Result<usize> {
    grid.grid_coordinate_to_index(coord)
        .ok_or_else(|| ErrorKind::OutOfBounds(coord).into())
}

fn checked_coordinate(grid: &Grid, index: usize) -> Result<Cartesian2DCoordinate> {
    match grid.index_to_grid_coordinate(index) {
        Some(coord) => Ok(coord),
        None => bail!("cell index {} is outside the {} cell grid", index, grid.size()),
    }
}

/// The path from `start` to `end` through the maze's passages.
///
/// `start == end` gives the single cell path. Fails with `ErrorKind::OutOfBounds` if either
/// coordinate is off the grid and `ErrorKind::Disconnected` if no passages join the two cells,
/// which only happens on a grid that is not (fully) generated.
pub fn find_path(grid: &Grid,
                 start: Cartesian2DCoordinate,
                 end: Cartesian2DCoordinate)
                 -> Result<Path> {
    let start_index = checked_index(grid, start)?;
    let end_index = checked_index(grid, end)?;
    if start_index == end_index {
        return Ok(vec![start]);
    }

    let cells_count = grid.size();
    let mut predecessors: Vec<Option<usize>> = vec![None; cells_count];
    let mut discovered = BitSet::with_capacity(cells_count);
    let mut queue = VecDeque::new();
    let _ = discovered.insert(start_index);
    queue.push_back(start_index);

    'search: while let Some(current) = queue.pop_front() {
        let linked = grid.cell_at_index(current)
            .map(Cell::linked_slots)
            .unwrap_or_default();
        for (_, next) in linked {
            if discovered.insert(next) {
                predecessors[next] = Some(current);
                if next == end_index {
                    break 'search;
                }
                queue.push_back(next);
            }
        }
    }

    if !discovered.contains(end_index) {
        warn!("no path from {} to {}: the grid is not a connected maze", start, end);
        bail!(ErrorKind::Disconnected(start, end));
    }

    let mut path = vec![end];
    let mut current = end_index;
    while let Some(previous) = predecessors[current] {
        path.push(checked_coordinate(grid, previous)?);
        current = previous;
    }
    path.reverse();
    Ok(path)
}

/// Flood fill distances, in steps, from one start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    pub fn new(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> Result<Distances> {

        let _ = checked_index(grid, start_coordinate)?;

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        // Every link is one step, so the first time a cell is reached is via a shortest route
        // and the distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances.get(cell_coord).cloned().unwrap_or(0);
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coordinate in links {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + 1);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None for cells that cannot be reached, or are not on the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// All cells at the maximum distance from the start, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[Cartesian2DCoordinate; 8]>>();
        furthest.sort_by_key(|coord| (coord.y, coord.x));
        furthest
    }
}

/// The longest path in a perfect maze.
///
/// The cell furthest from an arbitrary cell is one end of a longest path, the cell furthest from
/// that is the other end.
pub fn longest_path(grid: &Grid) -> Result<Path> {
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::new(grid, arbitrary_start_point)?;
    let long_path_start = first_distances.furthest_points_on_grid()
        .first()
        .cloned()
        .unwrap_or(arbitrary_start_point);

    let distances_from_start = Distances::new(grid, long_path_start)?;
    let long_path_end = distances_from_start.furthest_points_on_grid()
        .first()
        .cloned()
        .unwrap_or(long_path_start);

    find_path(grid, long_path_start, long_path_end)
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use std::thread;
    use std::u32;

    use super::*;
    use crate::generators::{prims, rng_from_seed};
    use crate::units::{Height, Width};

    static OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn empty_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn generated_grid(w: usize, h: usize, seed: u64) -> Grid {
        let mut g = empty_grid(w, h);
        prims(&mut g, &mut rng_from_seed(Some(seed))).expect("generation failed");
        g
    }

    // 2x2 grid with a U shaped passage: (0,0) - (0,1) - (1,1) - (1,0)
    fn u_shaped_grid() -> Grid {
        let mut g = empty_grid(2, 2);
        g.link(gc(0, 0), gc(0, 1)).expect("Link Failed");
        g.link(gc(0, 1), gc(1, 1)).expect("Link Failed");
        g.link(gc(1, 1), gc(1, 0)).expect("Link Failed");
        g
    }

    fn is_connected_path(g: &Grid, path: &[Cartesian2DCoordinate]) -> bool {
        path.windows(2).all(|pair| g.is_linked(pair[0], pair[1]))
    }

    fn assert_kind<T: ::std::fmt::Debug>(result: Result<T>, check: fn(&ErrorKind) -> bool) {
        match result {
            Err(e) => assert!(check(e.kind()), "unexpected error kind {:?}", e.kind()),
            Ok(v) => panic!("expected an error, got {:?}", v),
        }
    }

    #[test]
    fn path_to_self_is_single_cell() {
        let g = generated_grid(1, 1, 42);
        assert_eq!(find_path(&g, gc(0, 0), gc(0, 0)).unwrap(), vec![gc(0, 0)]);

        let g = generated_grid(6, 4, 42);
        for coord in g.iter() {
            assert_eq!(find_path(&g, coord, coord).unwrap(), vec![coord]);
        }
    }

    #[test]
    fn path_across_two_by_two_maze() {
        let g = generated_grid(2, 2, 8);
        let path = find_path(&g, gc(0, 0), gc(1, 1)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&gc(0, 0)));
        assert_eq!(path.last(), Some(&gc(1, 1)));
        assert!(is_connected_path(&g, &path));
    }

    #[test]
    fn path_follows_passages() {
        let g = u_shaped_grid();
        assert_eq!(find_path(&g, gc(0, 0), gc(1, 0)).unwrap(),
                   vec![gc(0, 0), gc(0, 1), gc(1, 1), gc(1, 0)]);
        assert_eq!(find_path(&g, gc(1, 0), gc(0, 0)).unwrap(),
                   vec![gc(1, 0), gc(1, 1), gc(0, 1), gc(0, 0)]);
    }

    #[test]
    fn out_of_bounds_coordinates() {
        let g = generated_grid(3, 3, 1);
        let is_out_of_bounds = |kind: &ErrorKind| match *kind {
            ErrorKind::OutOfBounds(_) => true,
            _ => false,
        };
        assert_kind(find_path(&g, OUT_OF_GRID_COORDINATE, gc(0, 0)), is_out_of_bounds);
        assert_kind(find_path(&g, gc(0, 0), gc(3, 0)), is_out_of_bounds);
        assert_kind(find_path(&g, gc(0, 3), gc(0, 0)), is_out_of_bounds);
        assert_kind(Distances::new(&g, OUT_OF_GRID_COORDINATE), is_out_of_bounds);
    }

    #[test]
    fn unlinked_cells_are_disconnected() {
        let g = empty_grid(3, 3);
        let is_disconnected = |kind: &ErrorKind| match *kind {
            ErrorKind::Disconnected(..) => true,
            _ => false,
        };
        assert_kind(find_path(&g, gc(0, 0), gc(2, 2)), is_disconnected);

        let mut partial = empty_grid(3, 1);
        partial.link(gc(0, 0), gc(1, 0)).expect("Link Failed");
        assert_eq!(find_path(&partial, gc(0, 0), gc(1, 0)).unwrap(), vec![gc(0, 0), gc(1, 0)]);
        assert_kind(find_path(&partial, gc(0, 0), gc(2, 0)), is_disconnected);
    }

    #[test]
    fn every_pair_has_a_path_in_a_generated_maze() {
        let g = generated_grid(5, 4, 17);
        let coords = g.iter().collect::<Vec<_>>();
        for &a in &coords {
            for &b in &coords {
                let path = find_path(&g, a, b).expect("maze should be connected");
                assert_eq!(path.first(), Some(&a));
                assert_eq!(path.last(), Some(&b));
                assert!(is_connected_path(&g, &path));
            }
        }
    }

    #[test]
    fn path_length_matches_distance() {
        let g = generated_grid(9, 7, 23);
        let start = gc(4, 3);
        let distances = Distances::new(&g, start).unwrap();
        for coord in g.iter() {
            let path = find_path(&g, start, coord).unwrap();
            assert_eq!(Some(path.len() as u32 - 1), distances.distance_from_start_to(coord));
        }
    }

    #[test]
    fn distances_on_u_shaped_grid() {
        let g = u_shaped_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.start(), gc(0, 0));
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(3));
        assert_eq!(distances.max(), 3);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(1, 0)]);
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = empty_grid(3, 3);
        let start_coordinate = gc(0, 0);
        let distances = Distances::new(&g, start_coordinate).unwrap();
        assert_eq!(distances.reachable_count(), 1);
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);
            if coord != start_coordinate {
                assert!(d.is_none());
            } else {
                assert_eq!(d, Some(0));
            }
        }
    }

    #[test]
    fn longest_path_in_a_corridor() {
        let g = generated_grid(6, 1, 4);
        let path = longest_path(&g).unwrap();
        assert_eq!(path.len(), 6);
        let ends = [path[0], path[5]];
        assert!(ends.contains(&gc(0, 0)) && ends.contains(&gc(5, 0)));
    }

    #[test]
    fn longest_path_is_not_shorter_than_any_other() {
        let g = generated_grid(7, 7, 31);
        let longest = longest_path(&g).unwrap();
        assert!(is_connected_path(&g, &longest));
        for coord in g.iter() {
            let distances = Distances::new(&g, coord).unwrap();
            assert!(distances.max() as usize <= longest.len() - 1);
        }
    }

    #[test]
    fn index_lookups_outside_the_grid_are_errors() {
        let g = empty_grid(2, 3);
        assert_eq!(checked_coordinate(&g, 3).unwrap(), gc(1, 1));
        assert!(checked_coordinate(&g, 6).is_err());
        assert_eq!(checked_index(&g, gc(1, 2)).unwrap(), 5);
        assert!(checked_index(&g, gc(2, 0)).is_err());
    }

    #[test]
    fn queries_share_a_finished_grid_across_threads() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Grid>();

        let g = generated_grid(12, 9, 77);
        let expected = g.iter()
            .map(|coord| find_path(&g, gc(0, 0), coord).unwrap())
            .collect::<Vec<_>>();

        thread::scope(|scope| {
            let workers = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        g.iter()
                            .map(|coord| find_path(&g, gc(0, 0), coord).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            for worker in workers {
                assert_eq!(worker.join().expect("query thread panicked"), expected);
            }
        });
        assert_eq!(g.links_count(), g.size() - 1);
    }

    #[test]
    fn quickcheck_reversed_query_reverses_path() {
        fn prop(w: u8, h: u8, seed: u64, a: (u8, u8), b: (u8, u8)) -> TestResult {
            let (w, h) = (w as usize % 10 + 1, h as usize % 10 + 1);
            let g = generated_grid(w, h, seed);
            let a = gc((a.0 as usize % w) as u32, (a.1 as usize % h) as u32);
            let b = gc((b.0 as usize % w) as u32, (b.1 as usize % h) as u32);

            let forward = match find_path(&g, a, b) {
                Ok(path) => path,
                Err(_) => return TestResult::failed(),
            };
            let mut backward = match find_path(&g, b, a) {
                Ok(path) => path,
                Err(_) => return TestResult::failed(),
            };
            backward.reverse();
            TestResult::from_bool(forward == backward && forward[0] == a &&
                                  forward[forward.len() - 1] == b &&
                                  is_connected_path(&g, &forward))
        }
        quickcheck(prop as fn(u8, u8, u64, (u8, u8), (u8, u8)) -> TestResult);
    }
}
