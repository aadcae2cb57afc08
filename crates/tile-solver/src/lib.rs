//! Sliding-tile puzzle solver.
//!
//! This crate solves N×N sliding-tile puzzles with A* search over immutable
//! boards, ordered by Manhattan distance plus depth. Solvability is decided
//! by a twin search run in lockstep with the main one: the twin starts from
//! the board with one adjacent pair of tiles swapped, and exactly one of the
//! two can ever reach the goal.
//!
//! ```
//! use tile_solver::{Board, Solver};
//!
//! let board: Board = "3\n 0 1 3\n 4 2 5\n 7 8 6\n".parse().unwrap();
//! let solver = Solver::new(board);
//! assert!(solver.is_solvable());
//! assert_eq!(solver.moves(), 4);
//! ```

pub mod board;
pub mod error;
pub mod frontier;
pub mod node;
pub mod solver;

// Re-export main types
pub use board::{Board, Direction, Neighbors, BLANK};
pub use error::{BoardError, SolveError};
pub use frontier::Frontier;
pub use node::{NodeArena, NodeId, SearchNode};
pub use solver::{CycleGuard, SearchStats, Solver, SolverConfig};
