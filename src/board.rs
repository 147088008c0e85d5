use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    #[inline]
    pub fn opponent(&self) -> PlayerColor {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// ASCII letter used on the internal padded board (always uppercase).
    #[inline]
    pub fn letter(&self) -> u8 {
        match self {
            PieceKind::Pawn => b'P',
            PieceKind::Knight => b'N',
            PieceKind::Bishop => b'B',
            PieceKind::Rook => b'R',
            PieceKind::Queen => b'Q',
            PieceKind::King => b'K',
        }
    }

    #[inline]
    pub fn from_letter(letter: u8) -> Option<PieceKind> {
        match letter.to_ascii_uppercase() {
            b'P' => Some(PieceKind::Pawn),
            b'N' => Some(PieceKind::Knight),
            b'B' => Some(PieceKind::Bishop),
            b'R' => Some(PieceKind::Rook),
            b'Q' => Some(PieceKind::Queen),
            b'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A board square with 0-based file (a=0) and rank (1st=0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    #[inline]
    pub fn new(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }

    /// Mirror through the board center (what a 180-degree rotation does).
    #[inline]
    pub fn mirrored(&self) -> Square {
        Square {
            file: 7 - self.file,
            rank: 7 - self.rank,
        }
    }
}

/// A move in external coordinates, as exchanged with the host program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl ExtMove {
    pub fn new(from: Square, to: Square) -> Self {
        ExtMove {
            from,
            to,
            promotion: None,
        }
    }
}

/// Castling rights for both sides, in external (absolute) terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_queenside: bool,
    pub white_kingside: bool,
    pub black_queenside: bool,
    pub black_kingside: bool,
}

/// The authoritative board the engine searches for.
///
/// The engine itself only generates pseudo-legal moves; real chess legality
/// (not leaving the own king in check, draw rules, ...) lives behind this
/// trait. The host wires it to whatever rules implementation it already has.
pub trait BoardOracle {
    fn piece_at(&self, square: Square) -> Option<(PieceKind, PlayerColor)>;
    fn side_to_move(&self) -> PlayerColor;
    fn castling_rights(&self) -> CastlingRights;
    fn en_passant_square(&self) -> Option<Square>;

    /// All currently legal moves. Must be authoritative.
    fn legal_moves(&self) -> Vec<ExtMove>;

    /// Membership test against `legal_moves`. Hosts with a cheaper native
    /// test should override this.
    fn is_legal(&self, m: &ExtMove) -> bool {
        self.legal_moves().contains(m)
    }
}
