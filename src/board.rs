use crate::piece::{ALL_DIRECTIONS, Direction, Piece, Shape};
use arrayvec::ArrayVec;
use std::fmt;
use std::rc::Rc;

/// A stroke: one or more consecutive unit slides of a piece in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub piece: usize,
    pub direction: Direction,
    pub steps: u32,
}

impl Movement {
    pub fn new(piece: usize, direction: Direction) -> Self {
        Movement {
            piece,
            direction,
            steps: 1,
        }
    }
}

/// Immutable snapshot of a puzzle position.
///
/// Piece indexes are stable across every board descended from the same root;
/// only positions change. Boundary walls stay in the piece list as immovable
/// obstacles, while the goal region is kept apart.
#[derive(Clone)]
pub struct Board {
    width: i32,
    height: i32,
    pieces: Vec<Piece>,
    goal: Piece,
    main: usize,
    movements: Vec<Movement>,
    parent: Option<Rc<Board>>,
}

impl Board {
    /// Build a root board. Callers are expected to hand over validated geometry.
    pub fn new(width: i32, height: i32, pieces: Vec<Piece>, goal: Piece, main: usize) -> Self {
        debug_assert!(main < pieces.len(), "main piece index out of range");
        Board {
            width,
            height,
            pieces,
            goal,
            main,
            movements: Vec::new(),
            parent: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    pub fn goal(&self) -> &Piece {
        &self.goal
    }

    pub fn main_piece(&self) -> &Piece {
        &self.pieces[self.main]
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Search cost: the number of merged movement records.
    pub fn strokes(&self) -> usize {
        self.movements.len()
    }

    pub fn parent(&self) -> Option<&Rc<Board>> {
        self.parent.as_ref()
    }

    pub fn can_move(&self, index: usize, direction: Direction) -> bool {
        let piece = self.piece(index);
        if !piece.movable {
            return false;
        }

        let moved = piece.offset(direction, 1);
        if moved.left() < 0
            || moved.top() < 0
            || moved.right() >= self.width
            || moved.bottom() >= self.height
        {
            return false;
        }

        let collides = self
            .pieces
            .iter()
            .any(|other| other.index != piece.index && other.intersects(&moved));
        if collides {
            return false;
        }

        // Any square may pass over the goal region, not only the main piece
        !(moved.intersects(self.goal()) && moved.shape != Shape::Square)
    }

    pub fn legal_directions(&self, index: usize) -> ArrayVec<Direction, 4> {
        ALL_DIRECTIONS
            .into_iter()
            .filter(|&direction| self.can_move(index, direction))
            .collect()
    }

    /// True once the main piece fully encloses the goal region.
    pub fn is_solved(&self) -> bool {
        self.main_piece().contains(self.goal())
    }

    /// Produce the successor board reached by applying `movement`.
    ///
    /// The movement is appended to the history, merged into the last record
    /// when it repeats the same piece and direction. The receiver is left
    /// untouched and becomes the successor's parent.
    pub fn move_piece(self: &Rc<Self>, movement: Movement) -> Board {
        let mut pieces = self.pieces.clone();
        pieces[movement.piece] = self
            .piece(movement.piece)
            .offset(movement.direction, movement.steps as i32);

        let mut movements = self.movements.clone();
        match movements.last_mut() {
            Some(last) if last.piece == movement.piece && last.direction == movement.direction => {
                last.steps += movement.steps;
            }
            _ => movements.push(movement),
        }

        let board = Board {
            width: self.width,
            height: self.height,
            pieces,
            goal: self.goal,
            main: self.main,
            movements,
            parent: Some(Rc::clone(self)),
        };
        debug_assert!(
            board.check_consistency().is_ok(),
            "illegal movement {:?}: {}",
            movement,
            board.check_consistency().unwrap_err()
        );
        board
    }

    /// Canonical per-cell shape occupancy, row-major. Empty cells hold `0`.
    ///
    /// Pieces of equal shape are indistinguishable here, so boards that differ
    /// only by which same-shaped piece sits where encode identically.
    pub fn encode(&self) -> Vec<u8> {
        let mut cells = vec![0u8; (self.width * self.height) as usize];
        for piece in &self.pieces {
            let tag = piece.shape.tag();
            for (x, y) in piece.cells() {
                cells[(y * self.width + x) as usize] = tag;
            }
        }
        cells
    }

    /// Verify the geometric invariants: every piece inside the grid, no two
    /// pieces sharing a cell and no non-square piece on the goal region.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut owner: Vec<Option<usize>> = vec![None; (self.width * self.height) as usize];
        for piece in &self.pieces {
            if piece.left() < 0
                || piece.top() < 0
                || piece.right() >= self.width
                || piece.bottom() >= self.height
            {
                return Err(format!("piece {} is out of bounds", piece));
            }
            for (x, y) in piece.cells() {
                let cell = &mut owner[(y * self.width + x) as usize];
                if let Some(other) = *cell {
                    return Err(format!(
                        "pieces {} and {} overlap at ({}, {})",
                        self.pieces[other], piece, x, y
                    ));
                }
                *cell = Some(piece.index);
                if piece.shape != Shape::Square && self.goal.contains_point(x, y) {
                    return Err(format!("piece {} covers the goal at ({}, {})", piece, x, y));
                }
            }
        }
        Ok(())
    }

    pub fn describe(&self, movement: &Movement) -> String {
        format!(
            "{} {} x{}",
            self.piece(movement.piece).name,
            movement.direction,
            movement.steps
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = vec![vec!['_'; self.width as usize]; self.height as usize];
        for (x, y) in self.goal.cells() {
            grid[y as usize][x as usize] = self.goal.name;
        }
        for piece in &self.pieces {
            for (x, y) in piece.cells() {
                grid[y as usize][x as usize] = piece.name;
            }
        }
        for row in grid {
            writeln!(f, "{}", row.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{}, {} strokes", self.width, self.height, self.strokes())?;
        write!(f, "{}", self)
    }
}
