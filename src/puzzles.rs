use crate::board::Board;
use crate::piece::{Piece, Shape};
use std::collections::HashSet;
use std::fs;
use std::io;
use thiserror::Error;

/// Error type for puzzle parsing operations.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// IO error when reading from file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Malformed puzzle layout
    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(String),
}

impl From<String> for PuzzleError {
    fn from(err: String) -> Self {
        PuzzleError::InvalidPuzzle(err)
    }
}

/// Identifiers with a reserved meaning in the text layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Boundary cells: immovable pieces that take part in collisions.
    pub wall: char,
    /// The goal region the main piece must cover.
    pub goal: char,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            wall: 'X',
            goal: 'Z',
        }
    }
}

/// Parse a sliding-block puzzle from its text layout.
///
/// One row per line, all rows of equal width. A space is an empty cell; any
/// other character forms a piece out of the maximal rectangle starting at its
/// first occurrence in row-major order (extended right first, then down).
/// Shapes follow from the rectangle size. The first square found becomes the
/// main piece. Movable pieces and the goal region span at most two cells
/// along each axis; only walls may be larger.
pub fn parse_board(text: &str, options: &ParseOptions) -> Result<Board, PuzzleError> {
    if options.wall == options.goal {
        return Err(format!("wall and goal share the identifier '{}'", options.wall).into());
    }
    if options.wall == ' ' || options.goal == ' ' {
        return Err("space is reserved for empty cells".to_string().into());
    }

    let lines: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();
    let Some(start) = lines.iter().position(|row| !row.is_empty()) else {
        return Err("Empty puzzle".to_string().into());
    };
    let end = lines.iter().rposition(|row| !row.is_empty()).map_or(start, |e| e + 1);
    let rows = &lines[start..end];

    let height = rows.len();
    let width = rows[0].len();
    if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(format!(
            "Row {} has width {} (expected {})",
            y + 1,
            row.len(),
            width
        )
        .into());
    }

    let mut consumed = vec![vec![false; width]; height];
    let mut pieces = Vec::new();
    let mut seen = HashSet::new();
    let mut goal = None;
    let mut main = None;

    for y in 0..height {
        for x in 0..width {
            let name = rows[y][x];
            if name == ' ' || consumed[y][x] {
                continue;
            }

            let mut w = 1;
            while x + w < width && rows[y][x + w] == name && !consumed[y][x + w] {
                w += 1;
            }
            let mut h = 1;
            while y + h < height
                && (x..x + w).all(|xx| rows[y + h][xx] == name && !consumed[y + h][xx])
            {
                h += 1;
            }
            for row in consumed.iter_mut().skip(y).take(h) {
                for cell in row.iter_mut().skip(x).take(w) {
                    *cell = true;
                }
            }

            // Only walls may exceed 2x2; the goal falls under this check too
            let movable = name != options.wall;
            if movable && (w > 2 || h > 2) {
                return Err(format!(
                    "'{}' at ({}, {}) spans {}x{} cells (at most 2x2 allowed)",
                    name, x, y, w, h
                )
                .into());
            }

            if name == options.goal {
                if goal.is_some() {
                    return Err(format!(
                        "Multiple goal regions found (second one at ({}, {}))",
                        x, y
                    )
                    .into());
                }
                goal = Some(Piece::new(
                    x as i32,
                    y as i32,
                    w as i32,
                    h as i32,
                    name,
                    usize::MAX,
                    false,
                ));
                continue;
            }

            if movable && !seen.insert(name) {
                return Err(format!(
                    "Piece '{}' is not a single rectangle (again at ({}, {}))",
                    name, x, y
                )
                .into());
            }

            let piece = Piece::new(
                x as i32,
                y as i32,
                w as i32,
                h as i32,
                name,
                pieces.len(),
                movable,
            );
            if movable && main.is_none() && piece.shape == Shape::Square {
                main = Some(piece.index);
            }
            pieces.push(piece);
        }
    }

    let goal = goal.ok_or_else(|| format!("No goal region '{}' found", options.goal))?;
    let main = main.ok_or("No square piece found to serve as the main piece".to_string())?;

    Ok(Board::new(width as i32, height as i32, pieces, goal, main))
}

/// A collection of puzzles read from one text file.
#[derive(Debug)]
pub struct Puzzles {
    puzzles: Vec<Board>,
}

impl Puzzles {
    /// Parse puzzles from a string.
    ///
    /// Puzzles are separated by empty lines or by lines starting with `;`,
    /// which also serve as comments.
    pub fn from_text(contents: &str, options: &ParseOptions) -> Result<Self, PuzzleError> {
        let mut puzzles = Vec::new();
        let mut current = String::new();

        for line in contents.lines() {
            if line.starts_with(';') || line.trim_end_matches('\r').is_empty() {
                if !current.is_empty() {
                    puzzles.push(parse_board(&current, options)?);
                    current.clear();
                }
                continue;
            }
            current.push_str(line);
            current.push('\n');
        }

        if !current.is_empty() {
            puzzles.push(parse_board(&current, options)?);
        }

        Ok(Puzzles { puzzles })
    }

    pub fn from_file(path: &str, options: &ParseOptions) -> Result<Self, PuzzleError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents, options)
    }

    /// Get the nth puzzle (0-indexed).
    pub fn get(&self, index: usize) -> Option<&Board> {
        self.puzzles.get(index)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str = "XXXXXX\n\
                           XabbcX\n\
                           XabbcX\n\
                           XdeefX\n\
                           XdghfX\n\
                           Xi  jX\n\
                           XXZZXX";

    fn parse(text: &str) -> Result<Board, PuzzleError> {
        parse_board(text, &ParseOptions::default())
    }

    #[test]
    fn test_parse_classic() {
        let board = parse(CLASSIC).unwrap();
        assert_eq!(board.width(), 6);
        assert_eq!(board.height(), 7);

        let movable: Vec<char> = board
            .pieces()
            .iter()
            .filter(|p| p.movable)
            .map(|p| p.name)
            .collect();
        assert_eq!(movable, vec!['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j']);

        assert_eq!(board.main_piece().name, 'b');
        assert_eq!(board.main_piece().shape, Shape::Square);
        let goal = board.goal();
        assert_eq!((goal.x, goal.y, goal.w, goal.h), (2, 6, 2, 1));
        assert!(!goal.movable);
    }

    #[test]
    fn test_parse_shapes() {
        let board = parse(CLASSIC).unwrap();
        let shape_of = |name: char| board.pieces().iter().find(|p| p.name == name).unwrap().shape;
        assert_eq!(shape_of('a'), Shape::VerticalPair);
        assert_eq!(shape_of('e'), Shape::HorizontalPair);
        assert_eq!(shape_of('g'), Shape::Unit);
        assert_eq!(shape_of('X'), Shape::Other);
    }

    #[test]
    fn test_indexes_match_positions() {
        let board = parse(CLASSIC).unwrap();
        for (i, piece) in board.pieces().iter().enumerate() {
            assert_eq!(piece.index, i);
        }
    }

    #[test]
    fn test_walls_are_immovable() {
        let board = parse(CLASSIC).unwrap();
        let walls: Vec<_> = board.pieces().iter().filter(|p| p.name == 'X').collect();
        assert!(!walls.is_empty());
        assert!(walls.iter().all(|p| !p.movable));
    }

    #[test]
    fn test_surrounding_blank_lines() {
        let text = format!("\n\n{}\n\n", CLASSIC);
        let board = parse(&text).unwrap();
        assert_eq!(board.height(), 7);
    }

    #[test]
    fn test_empty_puzzle() {
        assert!(matches!(parse(""), Err(PuzzleError::InvalidPuzzle(_))));
        assert!(matches!(parse("\n\n"), Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_ragged_rows() {
        let input = "XXXX\n\
                     XaaX\n\
                     XaaXX\n\
                     XZZX";
        assert!(matches!(parse(input), Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_missing_goal() {
        let input = "XXXX\n\
                     XaaX\n\
                     XaaX\n\
                     XXXX";
        assert!(matches!(parse(input), Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_multiple_goals() {
        let input = "XXXXX\n\
                     Xaa X\n\
                     Xaa X\n\
                     ZXXXZ";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidPuzzle(_)));
        assert!(err.to_string().contains("goal"));
    }

    #[test]
    fn test_no_square_piece() {
        let input = "XXXX\n\
                     Xa X\n\
                     XbbX\n\
                     XZZX";
        assert!(matches!(parse(input), Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_non_rectangular_piece() {
        let input = "XXXXX\n\
                     Xaa X\n\
                     Xa  X\n\
                     Xbb X\n\
                     Xbb X\n\
                     XZZXX";
        assert!(matches!(parse(input), Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_oversized_piece() {
        let input = "XXXXXXX\n\
                     XbbcccX\n\
                     Xdd a X\n\
                     Xdd   X\n\
                     XXZZXXX";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidPuzzle(_)));
        assert!(err.to_string().contains("'c'"));

        let tall = "XXXXXX\n\
                    Xaa  X\n\
                    Xaab X\n\
                    X  b X\n\
                    X  b X\n\
                    XXZZXX";
        assert!(parse(tall).is_err());
    }

    #[test]
    fn test_oversized_goal() {
        let input = "XXXXXX\n\
                     Xaa bX\n\
                     Xaa  X\n\
                     XZZZZX";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidPuzzle(_)));
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_large_walls_allowed() {
        let input = "XXXXXXX\n\
                     Xaa   X\n\
                     Xaa   X\n\
                     X  XXXX\n\
                     X     X\n\
                     XXZZXXX";
        let board = parse(input).unwrap();
        assert!(board.pieces().iter().any(|p| p.name == 'X' && p.w > 2));
    }

    #[test]
    fn test_main_is_first_square() {
        let input = "XXXXXX\n\
                     X  ccX\n\
                     XaaccX\n\
                     Xaa  X\n\
                     XXZZXX";
        let board = parse(input).unwrap();
        assert_eq!(board.main_piece().name, 'c');
    }

    #[test]
    fn test_custom_identifiers() {
        let input = "####\n\
                     #aa#\n\
                     #aa#\n\
                     #..#";
        let options = ParseOptions {
            wall: '#',
            goal: '.',
        };
        let board = parse_board(input, &options).unwrap();
        assert_eq!(board.goal().name, '.');
        assert_eq!(board.main_piece().name, 'a');

        assert!(parse(input).is_err());
    }

    #[test]
    fn test_conflicting_identifiers() {
        let options = ParseOptions {
            wall: 'Z',
            goal: 'Z',
        };
        assert!(parse_board(CLASSIC, &options).is_err());
    }

    #[test]
    fn test_from_text_basic() {
        let second = "XXXX\n\
                      XaaX\n\
                      XaaX\n\
                      XZZX";
        let contents = format!("; 1\n\n{}\n\n; 2\n{}\n", CLASSIC, second);
        let puzzles = Puzzles::from_text(&contents, &ParseOptions::default()).unwrap();

        assert_eq!(puzzles.len(), 2);
        assert_eq!(puzzles.get(0).unwrap().height(), 7);
        assert_eq!(puzzles.get(1).unwrap().width(), 4);
        assert!(puzzles.get(2).is_none());
    }

    #[test]
    fn test_from_text_invalid_puzzle() {
        let contents = "; 1\n\nXXXX\nXaaX\nXaaXX\nXZZX\n";
        let result = Puzzles::from_text(contents, &ParseOptions::default());
        assert!(matches!(result, Err(PuzzleError::InvalidPuzzle(_))));
    }

    #[test]
    fn test_from_file_demo() {
        let puzzles = Puzzles::from_file("puzzles/klotski.txt", &ParseOptions::default()).unwrap();
        assert_eq!(puzzles.len(), 3);
        assert_eq!(puzzles.get(0).unwrap().main_piece().name, 'b');
        assert_eq!(puzzles.get(2).unwrap().width(), 5);
    }

    #[test]
    fn test_from_file_no_file() {
        let result = Puzzles::from_file("nonexistent_file.txt", &ParseOptions::default());
        assert!(matches!(result, Err(PuzzleError::Io(_))));
    }
}
