use crate::moves::Move;
use crate::position::{Position, A1, A8, BOARD_CELLS, H1, H8};
use once_cell::sync::Lazy;

// ==================== Piece Values ====================

pub const PAWN_VALUE: i32 = 102;
pub const KNIGHT_VALUE: i32 = 285;
pub const BISHOP_VALUE: i32 = 322;
pub const ROOK_VALUE: i32 = 482;
pub const QUEEN_VALUE: i32 = 932;
pub const KING_VALUE: i32 = 62000;

/// Scores with at least this magnitude mean a forced king loss somewhere in
/// the line. The king value dwarfs any material swing, so ten queens of
/// slack keeps regular scores well below the mate band.
pub const MATE_LOWER: i32 = KING_VALUE - 10 * QUEEN_VALUE;
pub const MATE_UPPER: i32 = KING_VALUE + 10 * QUEEN_VALUE;

const WEIGHTS: [i32; 6] = [
    PAWN_VALUE,
    KNIGHT_VALUE,
    BISHOP_VALUE,
    ROOK_VALUE,
    QUEEN_VALUE,
    KING_VALUE,
];

// ==================== Piece-Square Tables ====================

// Midgame tables for the friendly (upward-moving) side, rank 8 first.
#[rustfmt::skip]
const TABLES: [[i32; 64]; 6] = [
    // Pawn
    [   0,   0,   0,   0,   0,   0,   0,   0,
       82,  85,  88,  75, 105,  85,  87,  92,
        9,  32,  23,  46,  42,  33,  46,   9,
      -15,  18,   0,  17,  16,   2,  17, -11,
      -24,   5,  12,  11,   8,   3,   2, -21,
      -20,  11,   7,  -9,  -8,   0,   5, -17,
      -29,  10,  -5, -35, -34, -12,   5, -29,
        0,   0,   0,   0,   0,   0,   0,   0],
    // Knight
    [ -64, -51, -73, -73,  -8, -53, -56, -68,
       -1,  -4, 102, -34,   6,  64,  -2, -12,
       12,  69,   3,  76,  75,  29,  64,   0,
       26,  26,  47,  39,  35,  43,  27,  19,
        1,   7,  33,  23,  24,  37,   4,   2,
      -16,  12,  15,  24,  20,  17,  13, -12,
      -21, -13,   4,   2,   4,   2, -21, -18,
      -72, -21, -24, -22, -17, -33, -20, -67],
    // Bishop
    [ -59, -78, -82, -76, -23,-107, -37, -50,
      -11,  20,  35, -42, -39,  31,   2, -22,
       -9,  39, -32,  41,  52, -10,  28, -14,
       25,  17,  20,  34,  26,  25,  15,  10,
       13,  10,  17,  23,  17,  16,   0,   7,
       14,  25,  24,  15,   8,  25,  20,  15,
       19,  20,  11,   6,   7,   6,  20,  16,
       -7,   2, -15, -12, -14, -15, -10, -10],
    // Rook
    [  35,  29,  33,   4,  37,  33,  56,  50,
       55,  29,  56,  67,  55,  62,  34,  60,
       19,  35,  28,  33,  45,  27,  25,  15,
        0,   5,  16,  13,  18,  -4,  -9,  -6,
      -28, -35, -16, -21, -13, -29, -46, -30,
      -42, -28, -42, -25, -25, -35, -26, -46,
      -53, -38, -31, -26, -29, -43, -44, -53,
      -30, -24, -18,   5,  -2, -18, -31, -32],
    // Queen
    [   6,   1,  -8,-104,  69,  24,  88,  26,
       14,  32,  60, -10,  20,  76,  57,  24,
       -2,  43,  32,  60,  72,  63,  43,   2,
        1, -16,  22,  17,  25,  20, -13,  -6,
      -14, -15,  -2,  -5,  -1, -10, -20, -22,
      -30,  -6, -13, -11, -16, -11, -16, -27,
      -36, -18,   0, -19, -15, -15, -21, -38,
      -39, -30, -31, -13, -31, -36, -34, -42],
    // King
    [   4,  54,  47, -99, -99,  60,  83, -62,
      -32,  10,  55,  56,  56,  55,  10,   3,
      -62,  12, -57,  44, -67,  28,  37, -31,
      -55,  50,  11,  -4, -19,  13,   0, -49,
      -55, -43, -52, -28, -51, -47,  -8, -50,
      -47, -42, -43, -79, -64, -32, -29, -32,
       -4,   3, -14, -50, -57, -18,  13,   4,
       17,  30,  -3, -14,   6,  -1,  40,  18],
];

const PAWN: usize = 0;
const ROOK: usize = 3;
const KING: usize = 5;

#[inline]
fn table_index(piece: u8) -> usize {
    match piece {
        b'P' => 0,
        b'N' => 1,
        b'B' => 2,
        b'R' => 3,
        b'Q' => 4,
        _ => 5, // b'K'
    }
}

/// Material-combined tables padded to the 120-cell layout. Border cells
/// contribute zero so sliding indices never need masking before lookup.
static PST: Lazy<[[i32; BOARD_CELLS]; 6]> = Lazy::new(|| {
    let mut padded = [[0i32; BOARD_CELLS]; 6];
    for (k, table) in TABLES.iter().enumerate() {
        for row in 0..8 {
            for col in 0..8 {
                padded[k][21 + row * 10 + col] = table[row * 8 + col] + WEIGHTS[k];
            }
        }
    }
    padded
});

// ==================== Incremental Evaluation ====================

/// Signed score delta of playing `m`, from the mover's perspective.
/// Position scores are running sums of these deltas; the placement a
/// search starts from is the zero baseline.
///
/// Covers the positional shift of the moving piece, the mirrored value of a
/// captured piece, a king-table nudge for landing next to the opponent's
/// castling passage (`kp`), the rook relocation of a castling move, and the
/// table swap of a promotion.
pub fn move_value(pos: &Position, m: &Move) -> i32 {
    let (i, j) = (m.from, m.to);
    let p = pos.board[i];
    let q = pos.board[j];
    let pst = &*PST;

    let mut score = pst[table_index(p)][j] - pst[table_index(p)][i];

    if q.is_ascii_lowercase() {
        score += pst[table_index(q.to_ascii_uppercase())][BOARD_CELLS - 1 - j];
    }

    if let Some(kp) = pos.kp {
        if (j as i32 - kp as i32).abs() < 2 {
            score += pst[KING][BOARD_CELLS - 1 - j];
        }
    }

    if p == b'K' && i.abs_diff(j) == 2 {
        score += pst[ROOK][(i + j) / 2];
        score -= pst[ROOK][if j < i { A1 } else { H1 }];
    }

    if p == b'P' && (A8..=H8).contains(&j) {
        let promoted = m.promotion.unwrap_or(b'Q');
        score += pst[table_index(promoted)][j] - pst[PAWN][j];
    }

    score
}
