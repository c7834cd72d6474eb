use crate::board::{Board, Movement};
use crate::pqueue::PriorityQueue;
use crate::zobrist::Visited;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop at the first solution with the fewest strokes.
    First,
    /// Exhaust the frontier, collecting every solution path encountered.
    All,
}

/// Observer hooks invoked by the search. All of them default to no-ops.
pub trait Tracer {
    /// Called when the search starts expanding boards of a new stroke count.
    fn on_tier(&self, _strokes: usize, _frontier_len: usize) {}

    /// Called for every solved board as soon as it is produced.
    fn on_solution(&self, _board: &Board) {}

    /// Called once the search returns.
    fn on_finish(&self, _nodes_explored: usize, _solutions: usize) {}
}

pub struct NullTracer;

impl Tracer for NullTracer {}

/// Tracer that reports search progress through `tracing`.
pub struct LoggingTracer {
    puzzle: usize,
}

impl LoggingTracer {
    pub fn new(puzzle: usize) -> Self {
        LoggingTracer { puzzle }
    }
}

impl Tracer for LoggingTracer {
    fn on_tier(&self, strokes: usize, frontier_len: usize) {
        debug!(
            puzzle = self.puzzle,
            strokes, frontier_len, "Evaluating boards solved in {} strokes", strokes
        );
    }

    fn on_solution(&self, board: &Board) {
        info!(
            puzzle = self.puzzle,
            strokes = board.strokes(),
            "Found solution"
        );
    }

    fn on_finish(&self, nodes_explored: usize, solutions: usize) {
        debug!(
            puzzle = self.puzzle,
            nodes_explored, solutions, "Search finished"
        );
    }
}

/// Uniform-cost search over boards, ordered by stroke count.
pub struct Solver<T: Tracer> {
    mode: SearchMode,
    tracer: T,
    nodes_explored: usize,
    nodes_generated: usize,
    states_seen: usize,
}

impl<T: Tracer> Solver<T> {
    pub fn new(mode: SearchMode, tracer: T) -> Self {
        Solver {
            mode,
            tracer,
            nodes_explored: 0,
            nodes_generated: 0,
            states_seen: 0,
        }
    }

    /// Boards popped from the frontier and expanded.
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// Successor boards produced by legal moves, duplicates included.
    pub fn nodes_generated(&self) -> usize {
        self.nodes_generated
    }

    /// Distinct canonical encodings reached, the root included.
    pub fn states_seen(&self) -> usize {
        self.states_seen
    }

    /// Search from `root`, returning the solved boards found.
    ///
    /// An empty result means the frontier was exhausted: the puzzle has no
    /// solution. Solutions are recorded before deduplication, so in `All` mode
    /// one final state may appear several times, reached by different paths.
    pub fn solve(&mut self, root: &Board) -> Vec<Rc<Board>> {
        let solutions = self.search(Rc::new(root.clone()));
        self.tracer.on_finish(self.nodes_explored, solutions.len());
        solutions
    }

    fn search(&mut self, root: Rc<Board>) -> Vec<Rc<Board>> {
        let mut solutions = Vec::new();
        if root.is_solved() {
            self.tracer.on_solution(&root);
            solutions.push(Rc::clone(&root));
            if self.mode == SearchMode::First {
                self.states_seen = 1;
                return solutions;
            }
        }

        let mut visited = Visited::new(&root);
        visited.insert(&root);
        let mut frontier = PriorityQueue::new();
        frontier.push(root.strokes(), root);

        // Best solution one stroke above the tier being expanded. A board still
        // queued in this tier may reach a cheaper one by extending its stroke.
        let mut pending: Option<Rc<Board>> = None;
        let mut tier: Option<usize> = None;

        while let Some(current) = frontier.pop_min() {
            if let Some(found) = &pending {
                if current.strokes() >= found.strokes() {
                    break;
                }
            }
            if tier.is_none_or(|t| current.strokes() > t) {
                tier = Some(current.strokes());
                self.tracer.on_tier(current.strokes(), frontier.len());
            }
            self.nodes_explored += 1;

            for index in 0..current.pieces().len() {
                for direction in current.legal_directions(index) {
                    let next = Rc::new(current.move_piece(Movement::new(index, direction)));
                    self.nodes_generated += 1;

                    if next.is_solved() {
                        self.tracer.on_solution(&next);
                        match self.mode {
                            SearchMode::All => solutions.push(Rc::clone(&next)),
                            SearchMode::First if next.strokes() == current.strokes() => {
                                self.states_seen = visited.len();
                                return vec![next];
                            }
                            SearchMode::First => {
                                pending.get_or_insert_with(|| Rc::clone(&next));
                            }
                        }
                    }

                    if visited.insert(&next) {
                        frontier.push(next.strokes(), next);
                    }
                }
            }
        }

        debug_assert!(pending.is_some() || frontier.is_empty());
        self.states_seen = visited.len();
        match pending {
            Some(found) => vec![found],
            None => solutions,
        }
    }
}

/// The solution with the fewest strokes, if any.
pub fn shortest(solutions: &[Rc<Board>]) -> Option<&Rc<Board>> {
    solutions.iter().min_by_key(|board| board.strokes())
}

/// Follow parent links from `board` back to the root.
///
/// Returns every intermediate board, one per unit slide, in order from the
/// root to `board`.
pub fn reconstruct_path(board: &Rc<Board>) -> Vec<Rc<Board>> {
    let mut path = vec![Rc::clone(board)];
    let mut current = board;
    while let Some(parent) = current.parent() {
        path.push(Rc::clone(parent));
        current = parent;
    }
    path.reverse();
    path
}

/// Keep only the boards that close a stroke: the root, then the last board of
/// every merged movement. The result has `strokes() + 1` entries.
pub fn stroke_path(path: &[Rc<Board>]) -> Vec<Rc<Board>> {
    path.iter()
        .enumerate()
        .filter(|&(i, board)| {
            path.get(i + 1)
                .is_none_or(|next| next.strokes() > board.strokes())
        })
        .map(|(_, board)| Rc::clone(board))
        .collect()
}
