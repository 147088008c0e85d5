use crate::board::{BoardOracle, ExtMove, PieceKind, PlayerColor};
use crate::moves::Move;
use crate::position::{square_of, EncodeError, Position};
use crate::search::{Limits, SearchInfo, Searcher};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The position is terminal; the caller must not ask for a move.
    #[error("no legal moves available in the current position")]
    NoLegalMoves,
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Convert an internal move back to external coordinates, un-mirroring when
/// the search ran from the second color's perspective.
fn decode_move(m: &Move, mirrored: bool) -> ExtMove {
    let mut from = square_of(m.from);
    let mut to = square_of(m.to);
    if mirrored {
        from = from.mirrored();
        to = to.mirrored();
    }
    ExtMove {
        from,
        to,
        promotion: m.promotion.and_then(PieceKind::from_letter),
    }
}

/// The full engine: encoder, searcher and result validation in one place.
///
/// One instance drives one search at a time; the internal caches are reset
/// per call but are not synchronized, so concurrent callers need their own
/// instances.
pub struct Engine {
    searcher: Searcher,
    pub limits: Limits,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Engine {
            searcher: Searcher::new(),
            limits,
        }
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.searcher.nodes()
    }

    /// Compute the best move for the oracle's current position, always
    /// returning a member of the oracle's legal-move set.
    pub fn get_best_move(&mut self, oracle: &impl BoardOracle) -> Result<ExtMove, EngineError> {
        self.get_best_move_with(oracle, |_| {})
    }

    /// Like [`Engine::get_best_move`], with a progress callback receiving
    /// one [`SearchInfo`] per bisection iteration.
    pub fn get_best_move_with<F>(
        &mut self,
        oracle: &impl BoardOracle,
        report: F,
    ) -> Result<ExtMove, EngineError>
    where
        F: FnMut(&SearchInfo),
    {
        let legal = oracle.legal_moves();
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let pos = Position::encode(oracle)?;
        let mirrored = oracle.side_to_move() == PlayerColor::Black;

        if let Some((best, score)) = self.searcher.search(&pos, &self.limits, report) {
            let ext = decode_move(&best, mirrored);
            if oracle.is_legal(&ext) {
                return Ok(ext);
            }
            // The generator is only pseudo-legal, so the oracle can veto
            // its favorite; fall back rather than fail.
            log::warn!("discarding non-legal search result {ext:?} (score {score})");
        }

        Ok(legal[0])
    }
}
