use super::{heuristic, simplify_path};
use crate::common::{Cell, Direction, NodeArena, OpenEntry, PathResult, SearchNode};
use crate::map::Map;
use crate::stat::Stats;

use anyhow::ensure;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Search with default stats. See [`a_star_search`].
pub fn find_path(map: &Map, start: Cell, goal: Cell) -> anyhow::Result<PathResult> {
    a_star_search(map, start, goal, &mut Stats::default())
}

/// Best-first search from `start` to `goal` where every move after the first
/// must continue straight or turn clockwise.
///
/// An unreachable goal gives an empty [`PathResult`]; out-of-bounds endpoints
/// are an error. The occupancy of `start` is never checked.
///
/// A closed cell is only reopened by a strictly cheaper g, and a new node is
/// dropped if the open list already holds the same cell with an f no worse.
/// Together with the inadmissible heuristic this means the returned path is
/// not guaranteed to be the shortest one.
#[instrument(skip_all, name = "a_star", fields(start = format!("{start:?}"), goal = format!("{goal:?}")), level = "debug")]
pub fn a_star_search(
    map: &Map,
    start: Cell,
    goal: Cell,
    stats: &mut Stats,
) -> anyhow::Result<PathResult> {
    ensure!(
        map.contains(start),
        "start {start:?} is outside the {}x{} grid",
        map.height,
        map.width
    );
    ensure!(
        map.contains(goal),
        "goal {goal:?} is outside the {}x{} grid",
        map.height,
        map.width
    );
    let search_start_time = Instant::now();

    let mut arena = NodeArena::default();
    let mut open_list = BTreeSet::new();
    // Arena indices of the open entries for each cell, for the dominance check.
    let mut open_cells: HashMap<Cell, Vec<usize>> = HashMap::new();
    let mut closed_list = HashSet::new();
    let mut g_cost_map = HashMap::new();
    let mut sequence = 0;

    let start_h_cost = heuristic(start, goal);
    let root = arena.push(SearchNode {
        position: start,
        g_cost: 0,
        h_cost: start_h_cost,
        f_cost: start_h_cost,
        parent: None,
    });
    open_list.insert(OpenEntry {
        f_cost: start_h_cost,
        sequence,
        index: root,
    });
    open_cells.entry(start).or_default().push(root);
    g_cost_map.insert(start, 0);

    while let Some(entry) = open_list.pop_first() {
        let current = arena.get(entry.index).clone();
        trace!(
            "expand node {:?} g {} h {} f {}",
            current.position,
            current.g_cost,
            current.h_cost,
            current.f_cost
        );

        // Update stats.
        stats.expanded_nodes += 1;

        if let Some(indices) = open_cells.get_mut(&current.position) {
            indices.retain(|&index| index != entry.index);
        }
        closed_list.insert(current.position);

        if current.position == goal {
            let result = construct_result(&arena, entry.index);
            stats.path_length = current.g_cost;
            stats.time_us = search_start_time.elapsed().as_micros() as usize;
            debug!("found path {:?} with {} steps", result.path, current.g_cost);
            return Ok(result);
        }

        let allowed_moves: &[Direction] = match arena.incoming_delta(entry.index) {
            None => &Direction::ALL,
            Some(delta) => match Direction::from_delta(delta) {
                Some(previous) => previous.allowed_next(),
                None => {
                    debug!("unrecognized step {delta:?} into {:?}", current.position);
                    &Direction::ALL
                }
            },
        };

        // Assuming uniform cost.
        let tentative_g_cost = current.g_cost + 1;

        for &direction in allowed_moves {
            let Some(neighbor) = map.step(current.position, direction) else {
                continue;
            };
            if !map.is_passable(neighbor) {
                continue;
            }

            // Only reopen a closed cell on a strictly cheaper path.
            let reopen = closed_list.contains(&neighbor);
            if reopen
                && g_cost_map
                    .get(&neighbor)
                    .is_some_and(|&g_cost| g_cost <= tentative_g_cost)
            {
                continue;
            }

            let h_cost = heuristic(neighbor, goal);
            let f_cost = tentative_g_cost + h_cost;

            // An open copy of this cell with an equal or better f wins.
            if open_cells.get(&neighbor).is_some_and(|indices| {
                indices
                    .iter()
                    .any(|&index| arena.get(index).f_cost <= f_cost)
            }) {
                continue;
            }

            sequence += 1;
            let index = arena.push(SearchNode {
                position: neighbor,
                g_cost: tentative_g_cost,
                h_cost,
                f_cost,
                parent: Some(entry.index),
            });
            open_list.insert(OpenEntry {
                f_cost,
                sequence,
                index,
            });
            open_cells.entry(neighbor).or_default().push(index);
            g_cost_map.insert(neighbor, tentative_g_cost);

            stats.generated_nodes += 1;
            if reopen {
                stats.reopened_nodes += 1;
            }
        }
        trace!("open list size {}", open_list.len());
    }

    stats.time_us = search_start_time.elapsed().as_micros() as usize;
    debug!("cannot find solution after generating {} nodes", arena.len());
    Ok(PathResult::default())
}

fn construct_result(arena: &NodeArena, goal_index: usize) -> PathResult {
    let raw_path = arena.trace(goal_index);
    let directions = raw_path
        .windows(2)
        .map(|step| Direction::between(step[0], step[1]))
        .collect();

    PathResult {
        path: simplify_path(&raw_path),
        raw_path,
        directions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Language;
    use proptest::prelude::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    // Checks every structural property a returned path must have.
    fn check_path(map: &Map, start: Cell, goal: Cell, result: &PathResult) {
        if result.is_empty() {
            assert!(result.raw_path.is_empty());
            assert!(result.directions.is_empty());
            return;
        }

        assert_eq!(result.raw_path.first(), Some(&start));
        assert_eq!(result.raw_path.last(), Some(&goal));
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&goal));
        assert_eq!(result.path, simplify_path(&result.raw_path));
        assert_eq!(result.directions.len(), result.raw_path.len() - 1);

        for (step, direction) in result.raw_path.windows(2).zip(&result.directions) {
            assert!(map.is_passable(step[1]));
            assert_eq!(Direction::between(step[0], step[1]), *direction);
            assert!(direction.is_some());
        }

        for pair in result.directions.windows(2) {
            let (previous, next) = (pair[0].unwrap(), pair[1].unwrap());
            assert!(
                previous.allowed_next().contains(&next),
                "{previous:?} followed by {next:?}"
            );
        }
    }

    #[test]
    fn test_a_star_single_row() {
        init_tracing();
        let map = Map::new(vec![vec![0, 0, 0]]).unwrap();
        let result = find_path(&map, (0, 0), (0, 2)).unwrap();

        assert_eq!(result.raw_path, vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(result.path, vec![(0, 0), (0, 2)]);
        assert_eq!(result.labels(Language::English), vec!["RIGHT", "RIGHT"]);
        check_path(&map, (0, 0), (0, 2), &result);
    }

    #[test]
    fn test_a_star_around_blocked_center() {
        init_tracing();
        let map = Map::new(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
        let stats = &mut Stats::default();
        let result = a_star_search(&map, (0, 0), (2, 2), stats).unwrap();

        assert_eq!(result.raw_path.len(), 5);
        assert_eq!(result.path.len(), 3);
        // Going down first would need a counter-clockwise turn into the goal.
        assert_eq!(result.path, vec![(0, 0), (0, 2), (2, 2)]);
        assert_eq!(
            result.labels(Language::English),
            vec!["RIGHT", "RIGHT", "DOWN", "DOWN"]
        );
        assert_eq!(stats.path_length, 4);
        assert!(stats.expanded_nodes >= 5);
        check_path(&map, (0, 0), (2, 2), &result);
    }

    #[test]
    fn test_a_star_start_is_goal() {
        init_tracing();
        let map = Map::new(vec![vec![0, 0], vec![0, 0]]).unwrap();
        let result = find_path(&map, (1, 0), (1, 0)).unwrap();

        assert_eq!(result.path, vec![(1, 0)]);
        assert_eq!(result.raw_path, vec![(1, 0)]);
        assert!(result.directions.is_empty());
    }

    #[test]
    fn test_a_star_single_cell_grid() {
        let map = Map::new(vec![vec![0]]).unwrap();
        let result = find_path(&map, (0, 0), (0, 0)).unwrap();
        assert_eq!(result.path, vec![(0, 0)]);
    }

    #[test]
    fn test_a_star_enclosed_start() {
        init_tracing();
        let map = Map::new(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 1, 0, 1, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
        ])
        .unwrap();
        let stats = &mut Stats::default();
        let result = a_star_search(&map, (2, 2), (0, 0), stats).unwrap();

        assert_eq!(result, PathResult::default());
        assert!(result.labels(Language::English).is_empty());
        assert_eq!(stats.expanded_nodes, 1);
    }

    #[test]
    fn test_a_star_enclosed_goal() {
        init_tracing();
        let map = Map::new(vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 1],
            vec![0, 0, 1, 0],
        ])
        .unwrap();
        let result = find_path(&map, (0, 0), (2, 2)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_a_star_blocked_goal() {
        let map = Map::new(vec![vec![0, 0, 1]]).unwrap();
        let result = find_path(&map, (0, 0), (0, 2)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_a_star_blocked_start_still_searches() {
        let map = Map::new(vec![vec![1, 0, 0]]).unwrap();
        let result = find_path(&map, (0, 0), (0, 2)).unwrap();
        assert_eq!(result.path, vec![(0, 0), (0, 2)]);
    }

    #[test]
    fn test_a_star_counter_clockwise_turn_is_rejected() {
        init_tracing();
        // The only route is RIGHT then UP.
        let map = Map::new(vec![vec![1, 0], vec![0, 0]]).unwrap();
        let result = find_path(&map, (1, 0), (0, 1)).unwrap();
        assert!(result.is_empty());

        // The reverse route is LEFT then UP, a clockwise turn.
        let map = Map::new(vec![vec![0, 1], vec![0, 0]]).unwrap();
        let result = find_path(&map, (1, 1), (0, 0)).unwrap();
        assert_eq!(result.path, vec![(1, 1), (1, 0), (0, 0)]);
        assert_eq!(result.labels(Language::English), vec!["LEFT", "UP"]);
    }

    #[test]
    fn test_a_star_u_turn_corridor() {
        init_tracing();
        let map = Map::new(vec![vec![0, 0, 0], vec![1, 1, 0], vec![0, 0, 0]]).unwrap();
        let result = find_path(&map, (0, 0), (2, 0)).unwrap();

        assert_eq!(result.raw_path.len(), 7);
        assert_eq!(result.path, vec![(0, 0), (0, 2), (2, 2), (2, 0)]);
        assert_eq!(
            result.labels(Language::Finnish),
            vec!["OIKEA", "OIKEA", "ALAS", "ALAS", "VASEN", "VASEN"]
        );
        check_path(&map, (0, 0), (2, 0), &result);
    }

    #[test]
    fn test_a_star_first_move_is_unrestricted() {
        let map = Map::new(vec![vec![0, 0, 0]]).unwrap();
        let result = find_path(&map, (0, 2), (0, 0)).unwrap();
        assert_eq!(result.labels(Language::English), vec!["LEFT", "LEFT"]);
    }

    #[test]
    fn test_a_star_out_of_bounds() {
        let map = Map::new(vec![vec![0, 0], vec![0, 0]]).unwrap();

        let err = find_path(&map, (2, 0), (0, 0)).unwrap_err();
        assert!(err.to_string().contains("start"));

        let err = find_path(&map, (0, 0), (0, 5)).unwrap_err();
        assert!(err.to_string().contains("goal"));
    }

    #[test]
    fn test_a_star_from_map_file() {
        init_tracing();
        let map = Map::from_file("map_file/test/test.map").unwrap();
        let stats = &mut Stats::default();
        let result = a_star_search(&map, (0, 0), (3, 4), stats).unwrap();

        assert!(!result.is_empty());
        check_path(&map, (0, 0), (3, 4), &result);
        stats.print();
    }

    fn grid_and_endpoints() -> impl Strategy<Value = (Vec<Vec<u8>>, Cell, Cell)> {
        (1usize..9, 1usize..9).prop_flat_map(|(height, width)| {
            (
                prop::collection::vec(
                    prop::collection::vec(prop::sample::select(vec![0u8, 0, 0, 1]), width),
                    height,
                ),
                (0..height, 0..width),
                (0..height, 0..width),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_a_star_paths_are_well_formed((grid, start, goal) in grid_and_endpoints()) {
            let map = Map::new(grid).unwrap();
            let result = find_path(&map, start, goal).unwrap();
            check_path(&map, start, goal, &result);
        }
    }
}
