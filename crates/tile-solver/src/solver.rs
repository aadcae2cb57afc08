//! A* solver with a lockstep twin search for solvability.
//!
//! The solver runs two identical searches side by side: one from the
//! initial board and one from its twin (the same board with one adjacent
//! pair of tiles swapped). Exactly one of the two can reach the goal, so
//! whichever gets there first settles whether the initial board is
//! solvable, without any parity arithmetic.
//!
//! Both searches use `manhattan + moves` as priority. Since Manhattan
//! distance is admissible and consistent, the first goal extracted from the
//! main frontier lies on a shortest path.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::board::Board;
use crate::error::SolveError;
use crate::frontier::Frontier;
use crate::node::{NodeArena, NodeId};

/// How a search avoids walking back over boards it has already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleGuard {
    /// Skip only the neighbor equal to the node's parent board.
    #[default]
    Parent,
    /// Skip every board that has already been expanded.
    Closed,
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub cycle_guard: CycleGuard,
    /// Maximum time to search
    pub timeout: Option<Duration>,
    /// Maximum lockstep iterations (one extraction from each side)
    pub max_expansions: Option<usize>,
}

/// Counters gathered while solving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Lockstep iterations run
    pub iterations: usize,
    /// Nodes expanded on the main side
    pub main_expansions: usize,
    /// Nodes expanded on the twin side
    pub twin_expansions: usize,
    /// Search nodes allocated across both sides
    pub nodes_created: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

/// What one side of the lockstep produced this iteration.
enum Pick {
    Goal(NodeId),
    Open(NodeId),
    Exhausted,
}

/// One best-first search from a single root board.
struct Search {
    arena: NodeArena,
    frontier: Frontier,
    closed: Option<HashSet<Board>>,
    expansions: usize,
}

impl Search {
    fn new(root: Board, guard: CycleGuard) -> Self {
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let id = arena.root(root);
        frontier.insert(id, arena[id].priority());
        Self {
            arena,
            frontier,
            closed: match guard {
                CycleGuard::Parent => None,
                CycleGuard::Closed => Some(HashSet::new()),
            },
            expansions: 0,
        }
    }

    /// Take the lowest-priority node off the frontier.
    fn pick(&mut self) -> Pick {
        while let Some(id) = self.frontier.extract_min() {
            let board = self.arena[id].board();
            if let Some(closed) = &mut self.closed {
                // Stale duplicate of a board already expanded more cheaply.
                if !closed.insert(board.clone()) {
                    continue;
                }
            }
            return if board.is_goal() {
                Pick::Goal(id)
            } else {
                Pick::Open(id)
            };
        }
        Pick::Exhausted
    }

    /// Push every acceptable neighbor of `id` onto the frontier.
    fn expand(&mut self, id: NodeId) {
        self.expansions += 1;
        let node = &self.arena[id];
        let parent = self.arena.parent_board(id);
        let children: Vec<Board> = node
            .board()
            .neighbors()
            .filter(|next| match &self.closed {
                Some(closed) => !closed.contains(next),
                None => parent != Some(next),
            })
            .collect();

        for board in children {
            let child = self.arena.child(id, board);
            self.frontier.insert(child, self.arena[child].priority());
        }
    }
}

/// Outcome of the lockstep loop.
enum Verdict {
    SolvedMain(NodeId),
    SolvedTwin,
}

/// A solved (or proven unsolvable) sliding-tile puzzle.
///
/// The whole search runs inside construction; afterwards the solver is a
/// read-only record of the result.
#[derive(Debug, Clone)]
pub struct Solver {
    initial: Board,
    solution: Option<Vec<Board>>,
    stats: SearchStats,
}

impl Solver {
    /// Solve `initial` with no time or expansion limits.
    pub fn new(initial: Board) -> Self {
        match Self::with_config(initial, &SolverConfig::default()) {
            Ok(solver) => solver,
            Err(e) => unreachable!("unbounded search stopped early: {}", e),
        }
    }

    /// Solve `initial` under `config`.
    ///
    /// Fails only when a configured limit is hit before either side reaches
    /// the goal; no partial result is kept.
    pub fn with_config(initial: Board, config: &SolverConfig) -> Result<Self, SolveError> {
        let start_time = Instant::now();
        let deadline = config.timeout.map(|t| start_time + t);

        debug!(
            "solving {}x{} board (manhattan {}, guard {:?})",
            initial.dimension(),
            initial.dimension(),
            initial.manhattan(),
            config.cycle_guard
        );

        let mut main = Search::new(initial.clone(), config.cycle_guard);
        let mut twin = Search::new(initial.twin(), config.cycle_guard);
        let mut twin_live = true;
        let mut iterations: usize = 0;

        let verdict = loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    info!("search timed out after {} iterations", iterations);
                    return Err(SolveError::Timeout {
                        elapsed: start_time.elapsed(),
                        expansions: main.expansions + twin.expansions,
                    });
                }
            }
            if let Some(limit) = config.max_expansions {
                if iterations >= limit {
                    info!("search hit the expansion limit of {}", limit);
                    return Err(SolveError::ExpansionLimit { limit });
                }
            }
            iterations += 1;
            if iterations % 10_000 == 0 {
                trace!(
                    "iteration {}: main frontier {}, twin frontier {}",
                    iterations,
                    main.frontier.len(),
                    twin.frontier.len()
                );
            }

            let m = main.pick();
            let t = if twin_live { twin.pick() } else { Pick::Exhausted };

            // The main side is checked first so a simultaneous finish counts
            // as solvable.
            let m = match m {
                Pick::Goal(id) => break Verdict::SolvedMain(id),
                Pick::Open(id) => id,
                Pick::Exhausted => {
                    debug_assert!(main.closed.is_some(), "parent-guarded frontier ran dry");
                    break Verdict::SolvedTwin;
                }
            };
            let t = match t {
                Pick::Goal(_) => break Verdict::SolvedTwin,
                Pick::Open(id) => Some(id),
                Pick::Exhausted => {
                    if twin_live {
                        debug!("twin search exhausted; the initial board is solvable");
                        twin_live = false;
                    }
                    None
                }
            };

            main.expand(m);
            if let Some(t) = t {
                twin.expand(t);
            }
        };

        let solution = match verdict {
            Verdict::SolvedMain(id) => Some(main.arena.path_to(id)),
            Verdict::SolvedTwin => None,
        };

        let stats = SearchStats {
            iterations,
            main_expansions: main.expansions,
            twin_expansions: twin.expansions,
            nodes_created: main.arena.len() + twin.arena.len(),
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        debug!(
            "search finished: solvable={} moves={:?} main_expansions={} twin_expansions={} in {}ms",
            solution.is_some(),
            solution.as_ref().map(|path| path.len() - 1),
            stats.main_expansions,
            stats.twin_expansions,
            stats.time_elapsed_ms
        );

        Ok(Self {
            initial,
            solution,
            stats,
        })
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Moves in a shortest solution, or `-1` when the board is unsolvable.
    pub fn moves(&self) -> i64 {
        self.min_moves().map_or(-1, |m| m as i64)
    }

    /// Moves in a shortest solution, or `None` when the board is unsolvable.
    pub fn min_moves(&self) -> Option<usize> {
        self.solution.as_ref().map(|path| path.len() - 1)
    }

    /// Boards from the initial board to the goal, inclusive.
    ///
    /// `None` means no solution exists; an already solved board yields a
    /// one-element path.
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;
    use std::collections::{HashMap, VecDeque};

    fn board(rows: &[&[u32]]) -> Board {
        Board::new(rows).unwrap()
    }

    fn walk(start: Board, dirs: &[Direction]) -> Board {
        dirs.iter()
            .fold(start, |b, &dir| b.slide(dir).unwrap())
    }

    /// Shortest distance to the goal for every board within `max_depth`
    /// moves of it.
    fn distances_from_goal(dimension: usize, max_depth: usize) -> HashMap<Board, usize> {
        let goal = Board::goal(dimension).unwrap();
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(goal.clone(), 0);
        queue.push_back(goal);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            if d == max_depth {
                continue;
            }
            for next in current.neighbors() {
                if !dist.contains_key(&next) {
                    dist.insert(next.clone(), d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    fn assert_valid_path(solver: &Solver) {
        let path = solver.solution().unwrap();
        assert_eq!(path.first(), Some(solver.initial()));
        assert!(path.last().unwrap().is_goal());
        assert_eq!(path.len() as i64, solver.moves() + 1);
        for pair in path.windows(2) {
            assert!(
                pair[0].neighbors().any(|n| n == pair[1]),
                "{:?} -> {:?} is not a single slide",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_already_solved() {
        let solver = Solver::new(Board::goal(3).unwrap());
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), 0);
        assert_eq!(solver.min_moves(), Some(0));
        assert_eq!(solver.solution().unwrap().len(), 1);
    }

    #[test]
    fn test_one_slide_from_goal() {
        let b = Board::goal(3).unwrap().slide(Direction::Left).unwrap();
        let solver = Solver::new(b);
        assert_eq!(solver.moves(), 1);
        assert_eq!(solver.solution().unwrap().len(), 2);
        assert_valid_path(&solver);
    }

    #[test]
    fn test_classic_four_move_puzzle() {
        let b: Board = "3\n 0 1 3\n 4 2 5\n 7 8 6\n".parse().unwrap();
        let solver = Solver::new(b);
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), 4);
        assert_valid_path(&solver);
    }

    #[test]
    fn test_scrambled_board_from_overview() {
        let b = board(&[&[1, 0, 2], &[4, 6, 3], &[7, 5, 8]]);
        let dist = distances_from_goal(3, 12);
        let solver = Solver::new(b.clone());
        assert_valid_path(&solver);
        assert_eq!(solver.moves(), dist[&b] as i64);
    }

    #[test]
    fn test_unsolvable_reports_no_solution() {
        for b in [
            Board::goal(3).unwrap().twin(),
            board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]),
            board(&[&[2, 1], &[3, 0]]),
        ] {
            let solver = Solver::new(b);
            assert!(!solver.is_solvable());
            assert_eq!(solver.moves(), -1);
            assert_eq!(solver.min_moves(), None);
            assert!(solver.solution().is_none());
        }
    }

    #[test]
    fn test_every_2x2_board() {
        let dist = distances_from_goal(2, usize::MAX);
        assert_eq!(dist.len(), 12);

        let mut seen = 0;
        for code in 0..256u32 {
            let tiles: Vec<u32> = (0..4).map(|i| (code >> (2 * i)) & 3).collect();
            let Ok(b) = Board::from_tiles(2, tiles) else {
                continue;
            };
            seen += 1;

            let solver = Solver::new(b.clone());
            let twin = Solver::new(b.twin());
            assert_ne!(solver.is_solvable(), twin.is_solvable(), "{:?}", b);

            match dist.get(&b) {
                Some(&d) => {
                    assert_eq!(solver.moves(), d as i64, "{:?}", b);
                    assert_valid_path(&solver);
                }
                None => assert!(!solver.is_solvable(), "{:?}", b),
            }
        }
        assert_eq!(seen, 24);
    }

    #[test]
    fn test_3x3_moves_match_breadth_first_search() {
        let dist = distances_from_goal(3, 14);
        for depth in [3, 7, 10, 14] {
            let mut boards: Vec<&Board> = dist
                .iter()
                .filter(|&(_, &d)| d == depth)
                .map(|(b, _)| b)
                .collect();
            boards.sort_by(|a, b| a.tiles().cmp(b.tiles()));

            for b in boards.into_iter().take(4) {
                let solver = Solver::new(b.clone());
                assert_eq!(solver.moves(), depth as i64, "{:?}", b);
                assert_valid_path(&solver);
                assert!(!Solver::new(b.twin()).is_solvable());
            }
        }
    }

    #[test]
    fn test_4x4_walk() {
        use Direction::*;
        let b = walk(Board::goal(4).unwrap(), &[Up, Up, Up, Left, Left, Left]);
        assert_eq!(b.manhattan(), 6);
        let solver = Solver::new(b);
        assert_eq!(solver.moves(), 6);
        assert_valid_path(&solver);
    }

    #[test]
    fn test_closed_guard_agrees_with_parent_guard() {
        use Direction::*;
        let config = SolverConfig {
            cycle_guard: CycleGuard::Closed,
            ..Default::default()
        };
        let boards = [
            board(&[&[1, 0, 2], &[4, 6, 3], &[7, 5, 8]]),
            walk(Board::goal(3).unwrap(), &[Up, Left, Up, Left, Down, Right, Down]),
            board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]),
            board(&[&[3, 1], &[2, 0]]),
        ];
        for b in boards {
            let closed = Solver::with_config(b.clone(), &config).unwrap();
            let parent = Solver::new(b);
            assert_eq!(closed.moves(), parent.moves());
            if closed.is_solvable() {
                assert_valid_path(&closed);
            }
        }
    }

    #[test]
    fn test_closed_guard_on_every_2x2_board() {
        let config = SolverConfig {
            cycle_guard: CycleGuard::Closed,
            ..Default::default()
        };
        let dist = distances_from_goal(2, usize::MAX);
        for code in 0..256u32 {
            let tiles: Vec<u32> = (0..4).map(|i| (code >> (2 * i)) & 3).collect();
            let Ok(b) = Board::from_tiles(2, tiles) else {
                continue;
            };
            let solver = Solver::with_config(b.clone(), &config).unwrap();
            assert_eq!(solver.min_moves(), dist.get(&b).copied(), "{:?}", b);
        }
    }

    #[test]
    fn test_solving_is_deterministic() {
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        let first = Solver::new(b.clone());
        let second = Solver::new(b);
        assert_eq!(first.solution(), second.solution());
        assert_eq!(first.stats().main_expansions, second.stats().main_expansions);
    }

    #[test]
    fn test_stats_are_recorded() {
        let b = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        let solver = Solver::new(b);
        let stats = solver.stats();
        assert_eq!(stats.main_expansions, 4);
        assert_eq!(stats.iterations, 5);
        assert!(stats.nodes_created > stats.main_expansions);
    }

    #[test]
    fn test_expansion_limit() {
        use Direction::*;
        let b = walk(Board::goal(3).unwrap(), &[Up, Left]);
        let config = SolverConfig {
            max_expansions: Some(1),
            ..Default::default()
        };
        assert_eq!(
            Solver::with_config(b.clone(), &config).unwrap_err(),
            SolveError::ExpansionLimit { limit: 1 }
        );

        let roomy = SolverConfig {
            max_expansions: Some(100),
            ..Default::default()
        };
        assert_eq!(Solver::with_config(b, &roomy).unwrap().moves(), 2);
    }

    #[test]
    fn test_timeout() {
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            Solver::with_config(b, &config),
            Err(SolveError::Timeout { .. })
        ));
    }
}
