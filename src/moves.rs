use crate::position::{Position, A1, A8, BORDER, EMPTY, H1, H8};
use smallvec::SmallVec;

// ==================== Direction Vectors ====================

pub const NORTH: i32 = -10;
pub const EAST: i32 = 1;
pub const SOUTH: i32 = 10;
pub const WEST: i32 = -1;

const PAWN_DIRS: [i32; 4] = [NORTH, NORTH + NORTH, NORTH + WEST, NORTH + EAST];
const KNIGHT_DIRS: [i32; 8] = [
    NORTH + NORTH + EAST,
    EAST + NORTH + EAST,
    EAST + SOUTH + EAST,
    SOUTH + SOUTH + EAST,
    SOUTH + SOUTH + WEST,
    WEST + SOUTH + WEST,
    WEST + NORTH + WEST,
    NORTH + NORTH + WEST,
];
const BISHOP_DIRS: [i32; 4] = [
    NORTH + EAST,
    SOUTH + EAST,
    SOUTH + WEST,
    NORTH + WEST,
];
const ROOK_DIRS: [i32; 4] = [NORTH, EAST, SOUTH, WEST];
const ROYAL_DIRS: [i32; 8] = [
    NORTH,
    EAST,
    SOUTH,
    WEST,
    NORTH + EAST,
    SOUTH + EAST,
    SOUTH + WEST,
    NORTH + WEST,
];

const PROMOTIONS: [u8; 4] = [b'N', b'B', b'R', b'Q'];

#[inline]
fn directions(piece: u8) -> &'static [i32] {
    match piece {
        b'P' => &PAWN_DIRS,
        b'N' => &KNIGHT_DIRS,
        b'B' => &BISHOP_DIRS,
        b'R' => &ROOK_DIRS,
        _ => &ROYAL_DIRS, // b'Q' and b'K'
    }
}

// ==================== Moves ====================

/// A move between two padded indices. `promotion` holds the uppercase
/// letter of the promoted piece and is set only on pawn promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub promotion: Option<u8>,
}

impl Move {
    #[inline]
    pub fn quiet(from: usize, to: usize) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }
}

pub type MoveList = SmallVec<[Move; 64]>;

/// Generate the pseudo-legal moves for the friendly (uppercase) side.
///
/// Each piece walks its direction vectors one step at a time until a border
/// sentinel or a friendly piece stops it; a capture is generated and then
/// terminates the slide. Check legality is not considered here.
pub fn gen_moves(pos: &Position) -> MoveList {
    let mut moves = MoveList::new();

    for i in 0..pos.board.len() {
        let p = pos.board[i];
        if !p.is_ascii_uppercase() {
            continue;
        }
        for &d in directions(p) {
            let mut j = i as i32 + d;
            loop {
                let q = pos.board[j as usize];

                // Off the board or onto one of ours.
                if q == BORDER || q.is_ascii_uppercase() {
                    break;
                }

                if p == b'P' {
                    // Pushes need empty cells; the double step additionally
                    // needs a home-rank origin and a clear intermediate.
                    if (d == NORTH || d == NORTH + NORTH) && q != EMPTY {
                        break;
                    }
                    if d == NORTH + NORTH
                        && ((i as i32) < A1 as i32 + NORTH
                            || pos.board[(i as i32 + NORTH) as usize] != EMPTY)
                    {
                        break;
                    }
                    // Diagonals need a capture, the en-passant target, or a
                    // cell next to the opponent's castling passage.
                    if (d == NORTH + WEST || d == NORTH + EAST)
                        && q == EMPTY
                        && pos.ep != Some(j as usize)
                        && !pos.kp.is_some_and(|kp| (j - kp as i32).abs() <= 1)
                    {
                        break;
                    }
                    if (A8 as i32..=H8 as i32).contains(&j) {
                        for promotion in PROMOTIONS {
                            moves.push(Move {
                                from: i,
                                to: j as usize,
                                promotion: Some(promotion),
                            });
                        }
                        break;
                    }
                }

                moves.push(Move::quiet(i, j as usize));

                // Steppers stop here, and captures end a slide.
                if matches!(p, b'P' | b'N' | b'K') || q.is_ascii_lowercase() {
                    break;
                }

                // A home rook sliding next to its own king doubles as the
                // castling move (the slide already proved the path clear).
                if i == A1 && pos.board[(j + EAST) as usize] == b'K' && pos.ours.west {
                    moves.push(Move::quiet((j + EAST) as usize, (j + WEST) as usize));
                }
                if i == H1 && pos.board[(j + WEST) as usize] == b'K' && pos.ours.east {
                    moves.push(Move::quiet((j + WEST) as usize, (j + EAST) as usize));
                }

                j += d;
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::{position_from_rows, START_ROWS};
    use crate::position::CastlePair;

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let pos = position_from_rows(START_ROWS);
        let moves = gen_moves(&pos);
        assert_eq!(moves.len(), 20);
        // 16 pawn moves, 4 knight moves.
        assert_eq!(moves.iter().filter(|m| pos.board[m.from] == b'P').count(), 16);
        assert_eq!(moves.iter().filter(|m| pos.board[m.from] == b'N').count(), 4);
    }

    #[test]
    fn test_double_step_needs_clear_path() {
        let pos = position_from_rows([
            "....k...", "........", "........", "........", "........", "....n...", "....P...",
            "....K...",
        ]);
        // e2 pawn is blocked by the knight on e3: no push at all.
        assert!(gen_moves(&pos)
            .iter()
            .all(|m| pos.board[m.from] != b'P' || (m.to != 75 && m.to != 65)));
    }

    #[test]
    fn test_double_step_only_from_home_rank() {
        let pos = position_from_rows([
            "....k...", "........", "........", "........", "........", "....P...", "........",
            "....K...",
        ]);
        let moves = gen_moves(&pos);
        // Pawn on e3 can single-push but not double-push.
        assert!(moves.contains(&Move::quiet(75, 65)));
        assert!(!moves.contains(&Move::quiet(75, 55)));
    }

    #[test]
    fn test_promotion_fans_out() {
        let pos = position_from_rows([
            "....k...", "P.......", "........", "........", "........", "........", "........",
            "....K...",
        ]);
        let moves = gen_moves(&pos);
        let promotions: Vec<_> = moves.iter().filter(|m| m.from == 31).collect();
        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().all(|m| m.promotion.is_some()));
    }

    #[test]
    fn test_sliding_stops_at_capture() {
        let pos = position_from_rows([
            "....k...", "........", "........", "....r...", "........", "........", "........",
            "....R..K",
        ]);
        let moves = gen_moves(&pos);
        // Rook on e1 captures e5 but cannot continue to e6.
        assert!(moves.contains(&Move::quiet(95, 55)));
        assert!(!moves.contains(&Move::quiet(95, 45)));
    }

    #[test]
    fn test_castling_generated_with_rights_and_clear_path() {
        let mut pos = position_from_rows([
            "....k...", "........", "........", "........", "........", "........", "........",
            "R...K..R",
        ]);
        pos.ours = CastlePair {
            west: true,
            east: true,
        };
        let moves = gen_moves(&pos);
        assert!(moves.contains(&Move::quiet(95, 93))); // queenside
        assert!(moves.contains(&Move::quiet(95, 97))); // kingside

        pos.ours.east = false;
        let moves = gen_moves(&pos);
        assert!(moves.contains(&Move::quiet(95, 93)));
        assert!(!moves.contains(&Move::quiet(95, 97)));
    }

    #[test]
    fn test_castling_blocked_by_piece_in_between() {
        let mut pos = position_from_rows([
            "....k...", "........", "........", "........", "........", "........", "........",
            "R..QK..R",
        ]);
        pos.ours = CastlePair {
            west: true,
            east: true,
        };
        let moves = gen_moves(&pos);
        assert!(!moves.contains(&Move::quiet(95, 93)));
        assert!(moves.contains(&Move::quiet(95, 97)));
    }

    #[test]
    fn test_en_passant_diagonal_allowed() {
        let mut pos = position_from_rows([
            "....k...", "........", "........", "...pP...", "........", "........", "........",
            "....K...",
        ]);
        pos.ep = Some(44);
        let moves = gen_moves(&pos);
        assert!(moves.contains(&Move::quiet(55, 44)));

        pos.ep = None;
        let moves = gen_moves(&pos);
        assert!(!moves.contains(&Move::quiet(55, 44)));
    }

    #[test]
    fn test_plain_diagonal_requires_capture() {
        let pos = position_from_rows([
            "....k...", "........", "........", "...p....", "....P...", "........", "........",
            "....K...",
        ]);
        let moves = gen_moves(&pos);
        assert!(moves.contains(&Move::quiet(65, 54))); // capture d5
        assert!(!moves.contains(&Move::quiet(65, 56))); // empty f5
    }
}
