use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    #[cfg(test)]
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "Left"),
            Direction::Up => write!(f, "Up"),
            Direction::Right => write!(f, "Right"),
            Direction::Down => write!(f, "Down"),
        }
    }
}

/// Coarse shape class of a piece. Pieces of equal shape are interchangeable
/// as far as state deduplication is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Unit,
    VerticalPair,
    HorizontalPair,
    Square,
    Other,
}

/// Number of distinct encoding tags, including the empty-cell tag.
pub const NUM_SHAPE_TAGS: usize = 6;

impl Shape {
    pub fn from_size(w: i32, h: i32) -> Shape {
        match (w, h) {
            (1, 1) => Shape::Unit,
            (1, 2) => Shape::VerticalPair,
            (2, 1) => Shape::HorizontalPair,
            (2, 2) => Shape::Square,
            _ => Shape::Other,
        }
    }

    /// Per-cell tag used by the canonical encoding. Zero marks an empty cell.
    pub fn tag(&self) -> u8 {
        match self {
            Shape::Unit => 1,
            Shape::VerticalPair => 2,
            Shape::HorizontalPair => 3,
            Shape::Square => 4,
            Shape::Other => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub shape: Shape,
    pub name: char,
    pub index: usize,
    pub movable: bool,
}

impl Piece {
    pub fn new(x: i32, y: i32, w: i32, h: i32, name: char, index: usize, movable: bool) -> Self {
        Piece {
            x,
            y,
            w,
            h,
            shape: Shape::from_size(w, h),
            name,
            index,
            movable,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.w - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h - 1
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// True if all four corners of `other` lie within this piece.
    pub fn contains(&self, other: &Piece) -> bool {
        other.corners().iter().all(|&(x, y)| self.contains_point(x, y))
    }

    /// True if any corner of `other` lies within this piece.
    ///
    /// This is not a general rectangle overlap test. It detects every
    /// collision only when `other` is at most 2x2, so that each of its cells
    /// is a corner. The parser rejects larger movable pieces and goals.
    pub fn intersects(&self, other: &Piece) -> bool {
        other.corners().iter().any(|&(x, y)| self.contains_point(x, y))
    }

    pub fn offset(&self, direction: Direction, steps: i32) -> Piece {
        let (dx, dy) = direction.delta();
        Piece {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
            ..*self
        }
    }

    /// Iterate over the cells covered by this piece, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.top()..=self.bottom())
            .flat_map(move |y| (self.left()..=self.right()).map(move |x| (x, y)))
    }

    fn corners(&self) -> [(i32, i32); 4] {
        [
            (self.left(), self.top()),
            (self.right(), self.top()),
            (self.left(), self.bottom()),
            (self.right(), self.bottom()),
        ]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.name, self.x, self.y)
    }
}
