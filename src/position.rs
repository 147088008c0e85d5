use crate::board::{BoardOracle, PieceKind, PlayerColor, Square};
use crate::evaluation::move_value;
use crate::moves::Move;
use thiserror::Error;

// ==================== Padded board layout ====================
//
// The 8x8 board lives inside a 10x12 one-dimensional array. Two sentinel
// rows above and below plus one sentinel column on each side mean a sliding
// piece walks off the playable area straight onto a border cell, so move
// generation needs a single sentinel check instead of bounds arithmetic.

pub const BOARD_CELLS: usize = 120;

/// Corner indices of the playable area.
pub const A1: usize = 91;
pub const H1: usize = 98;
pub const A8: usize = 21;
pub const H8: usize = 28;

pub const EMPTY: u8 = b'.';
pub const BORDER: u8 = b' ';

/// Padded index for an external square, in the white-oriented frame.
#[inline]
pub fn pad_index(sq: Square) -> usize {
    21 + (7 - sq.rank as usize) * 10 + sq.file as usize
}

/// External square for a playable padded index, in the white-oriented frame.
#[inline]
pub fn square_of(index: usize) -> Square {
    Square::new(((index - 21) % 10) as u8, (7 - (index - 21) / 10) as u8)
}

#[inline]
fn swap_case(c: u8) -> u8 {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else if c.is_ascii_lowercase() {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{color:?} has {count} kings, expected exactly one")]
    KingCount { color: PlayerColor, count: usize },
}

/// Castling rights for one side, in that side's own internal orientation:
/// `west` gates the rook starting on the low-index corner of the home rank,
/// `east` the high-index corner. For white this reads (queenside, kingside),
/// for black (kingside, queenside) because the 180-degree rotation mirrors
/// the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlePair {
    pub west: bool,
    pub east: bool,
}

/// An immutable search position, always oriented so the side to move is the
/// friendly (uppercase) side. `side` records which real color that is; the
/// adapter uses it to un-mirror coordinates on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: [u8; BOARD_CELLS],
    /// Material + positional score from the friendly side's perspective.
    pub score: i32,
    pub ours: CastlePair,
    pub theirs: CastlePair,
    /// En-passant target cell, if the last move was a pawn double-step.
    pub ep: Option<usize>,
    /// Cell the king passed over in the last castling move. Only feeds the
    /// anti-check heuristic in evaluation and pawn generation.
    pub kp: Option<usize>,
    pub side: PlayerColor,
}

impl Position {
    /// Encode the oracle's board into the internal representation. The
    /// result is always from the mover's perspective: when black is to
    /// move the whole board is rotated and case-swapped.
    pub fn encode(oracle: &impl BoardOracle) -> Result<Position, EncodeError> {
        let mut board = [BORDER; BOARD_CELLS];
        let mut white_kings = 0usize;
        let mut black_kings = 0usize;

        for rank in 0..8u8 {
            for file in 0..8u8 {
                let sq = Square::new(file, rank);
                let idx = pad_index(sq);
                board[idx] = match oracle.piece_at(sq) {
                    Some((kind, color)) => {
                        if kind == PieceKind::King {
                            match color {
                                PlayerColor::White => white_kings += 1,
                                PlayerColor::Black => black_kings += 1,
                            }
                        }
                        match color {
                            PlayerColor::White => kind.letter(),
                            PlayerColor::Black => kind.letter().to_ascii_lowercase(),
                        }
                    }
                    None => EMPTY,
                };
            }
        }

        if white_kings != 1 {
            return Err(EncodeError::KingCount {
                color: PlayerColor::White,
                count: white_kings,
            });
        }
        if black_kings != 1 {
            return Err(EncodeError::KingCount {
                color: PlayerColor::Black,
                count: black_kings,
            });
        }

        let rights = oracle.castling_rights();
        // The score is a running sum of move_value deltas against the
        // encoded placement as the zero baseline. An absolute table sum
        // would not even be zero for the standard initial position: the
        // 180-degree mirror maps e1 onto d8, so the king and queen cells
        // of the two sides land on different table entries.
        let pos = Position {
            score: 0,
            board,
            ours: CastlePair {
                west: rights.white_queenside,
                east: rights.white_kingside,
            },
            // Stored pre-mirrored for the moment black becomes friendly.
            theirs: CastlePair {
                west: rights.black_kingside,
                east: rights.black_queenside,
            },
            ep: oracle.en_passant_square().map(pad_index),
            kp: None,
            side: PlayerColor::White,
        };

        Ok(match oracle.side_to_move() {
            PlayerColor::White => pos,
            PlayerColor::Black => pos.rotate(false),
        })
    }

    /// View the position from the opponent's perspective: reverse the board,
    /// swap case, negate the score and swap the castle pairs. A null-move
    /// rotation forfeits the en-passant and king-passage context.
    pub fn rotate(&self, null_move: bool) -> Position {
        let mut board = [BORDER; BOARD_CELLS];
        for (i, cell) in board.iter_mut().enumerate() {
            *cell = swap_case(self.board[BOARD_CELLS - 1 - i]);
        }
        Position {
            board,
            score: -self.score,
            ours: self.theirs,
            theirs: self.ours,
            ep: if null_move {
                None
            } else {
                self.ep.map(|e| BOARD_CELLS - 1 - e)
            },
            kp: if null_move {
                None
            } else {
                self.kp.map(|k| BOARD_CELLS - 1 - k)
            },
            side: self.side.opponent(),
        }
    }

    /// Apply a move and return the resulting position, already rotated to
    /// the next mover's perspective.
    pub fn make_move(&self, m: &Move) -> Position {
        let (i, j) = (m.from, m.to);
        let p = self.board[i];

        let mut board = self.board;
        let mut ours = self.ours;
        let mut theirs = self.theirs;
        let mut ep = None;
        let mut kp = None;
        let score = self.score + move_value(self, m);

        board[j] = board[i];
        board[i] = EMPTY;

        // A rook leaving its corner, or anything landing on an enemy rook's
        // corner, cancels the matching right.
        if i == A1 {
            ours.west = false;
        }
        if i == H1 {
            ours.east = false;
        }
        if j == A8 {
            theirs.east = false;
        }
        if j == H8 {
            theirs.west = false;
        }

        if p == b'K' {
            ours = CastlePair::default();
            if i.abs_diff(j) == 2 {
                let mid = (i + j) / 2;
                kp = Some(mid);
                board[if j < i { A1 } else { H1 }] = EMPTY;
                board[mid] = b'R';
            }
        }

        if p == b'P' {
            if (A8..=H8).contains(&j) {
                board[j] = m.promotion.unwrap_or(b'Q');
            }
            if i == j + 20 {
                ep = Some(i - 10);
            }
            if Some(j) == self.ep {
                board[j + 10] = EMPTY;
            }
        }

        Position {
            board,
            score,
            ours,
            theirs,
            ep,
            kp,
            side: self.side,
        }
        .rotate(false)
    }

    /// True if the friendly side still has a piece worth a null move
    /// (anything but pawns and the king).
    #[inline]
    pub fn has_major_or_minor(&self) -> bool {
        self.board
            .iter()
            .any(|&c| matches!(c, b'R' | b'N' | b'B' | b'Q'))
    }
}
