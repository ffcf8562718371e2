//! Mailbox board: 64 cells, each empty or holding a coloured piece.

use std::fmt;

use super::error::FenError;
use super::types::{Color, Piece, Square};

/// Contents of one board cell.
pub type Cell = Option<(Color, Piece)>;

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Piece layout of a chess board, indexed a1 = 0 .. h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; 64],
}

impl Board {
    /// A board with no pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// The standard starting arrangement.
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for (file, piece) in (0u8..).zip(BACK_RANK) {
            board.set(Square::at(0, file), Some((Color::White, piece)));
            board.set(Square::at(1, file), Some((Color::White, Piece::Pawn)));
            board.set(Square::at(6, file), Some((Color::Black, Piece::Pawn)));
            board.set(Square::at(7, file), Some((Color::Black, piece)));
        }
        board
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Cell {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, cell: Cell) {
        self.cells[sq.index()] = cell;
    }

    /// Remove and return whatever occupies `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Cell {
        self.cells[sq.index()].take()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    #[inline]
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.cells[sq.index()].map(|(c, _)| c)
    }

    /// True when `sq` holds exactly this coloured piece.
    #[inline]
    #[must_use]
    pub fn has(&self, sq: Square, color: Color, piece: Piece) -> bool {
        self.cells[sq.index()] == Some((color, piece))
    }

    /// Every occupied square with its piece, in square order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Color, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|(c, p)| (sq, c, p)))
    }

    /// Squares holding pieces of `color`, in square order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .filter(move |&(_, c, _)| c == color)
            .map(|(sq, _, p)| (sq, p))
    }

    #[must_use]
    pub fn count(&self, color: Color, piece: Piece) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == Some((color, piece)))
            .count()
    }

    /// The first king of `color` in square order.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.has(sq, color, Piece::King))
    }

    /// Parse the placement field of a FEN string.
    ///
    /// Rejects boards that do not have exactly one king per side, boards with
    /// more than sixteen men or eight pawns of a colour, and pawns on the
    /// first or eighth rank.
    pub fn from_fen_placement(text: &str) -> Result<Board, FenError> {
        let mut board = Board::empty();
        board.fill_placement(text)?;
        for color in Color::BOTH {
            let found = board.count(color, Piece::King);
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
            let found = board.pieces_of(color).count();
            if found > 16 {
                return Err(FenError::TooManyPieces { color, found });
            }
            let found = board.count(color, Piece::Pawn);
            if found > 8 {
                return Err(FenError::TooManyPawns { color, found });
            }
        }
        if let Some((square, _, _)) = board
            .occupied()
            .find(|&(sq, _, piece)| piece == Piece::Pawn && (sq.rank() == 0 || sq.rank() == 7))
        {
            return Err(FenError::PawnOnBackRank { square });
        }
        Ok(board)
    }

    fn fill_placement(&mut self, text: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = text.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0usize;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::InvalidFileCount {
                            rank: rank as usize + 1,
                            files: file + 1,
                        });
                    }
                    self.set(Square::at(rank, file as u8), Some((color, piece)));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidFileCount {
                    rank: rank as usize + 1,
                    files: file,
                });
            }
        }
        Ok(())
    }

    /// Format the placement field of a FEN string.
    #[must_use]
    pub fn to_fen_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::at(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// Human-readable 8x8 rendering, rank 8 at the top.
    #[must_use]
    pub fn diagram(&self) -> String {
        let mut out = String::with_capacity(200);
        for rank in (0..8u8).rev() {
            out.push((b'1' + rank) as char);
            for file in 0..8u8 {
                out.push(' ');
                out.push(match self.piece_at(Square::at(rank, file)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                });
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }

    /// Vertical mirror with piece colours swapped.
    #[must_use]
    pub fn mirrored(&self) -> Board {
        let mut out = Board::empty();
        for (sq, color, piece) in self.occupied() {
            out.set(sq.flip_vertical(), Some((color.opponent(), piece)));
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen_placement())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagram())
    }
}
