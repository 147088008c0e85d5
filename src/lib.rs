//! A compact chess move-search engine.
//!
//! The board lives in a 120-cell padded array, always oriented so the side
//! to move is the friendly (uppercase) side. On top of that sit an
//! incremental piece-square evaluator, a pseudo-legal move generator and an
//! iterative-deepening MTD-bi search (null-window negamax with null-move
//! pruning and a quiescence extension).
//!
//! Real chess legality is deliberately not implemented here: the host
//! supplies it through the [`board::BoardOracle`] trait, and every move the
//! engine returns is validated against that oracle first.

pub mod board;
pub mod engine;
pub mod evaluation;
pub mod moves;
pub mod position;
pub mod search;

pub use board::{BoardOracle, CastlingRights, ExtMove, PieceKind, PlayerColor, Square};
pub use engine::{Engine, EngineError};
pub use position::{EncodeError, Position};
pub use search::{Limits, SearchInfo, Searcher};
