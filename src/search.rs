use crate::evaluation::{move_value, MATE_LOWER, MATE_UPPER};
use crate::moves::{gen_moves, Move};
use crate::position::Position;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

// ==================== Constants ====================

/// Captures and promotions below this heuristic value are not worth
/// extending the quiescence search for.
pub const QUIESCENCE_THRESHOLD: i32 = 150;

/// The MTD-bi bisection stops once the window is narrower than this.
const CONVERGENCE_WINDOW: i32 = 15;

// ==================== Budgets ====================

/// Search budgets. Exhausting any of them is a controlled early stop, not
/// an error; the best move found so far still stands.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_depth: usize,
    /// Wall-clock budget for the bisection iterations of one depth level.
    pub depth_time: Duration,
    /// Wall-clock budget for the whole deepening loop.
    pub total_time: Duration,
    /// Node ceiling, checked between candidate moves.
    pub max_nodes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 4,
            depth_time: Duration::from_millis(500),
            total_time: Duration::from_secs(3),
            max_nodes: 1_000_000,
        }
    }
}

/// One progress record of the deepening loop. Purely diagnostic.
#[derive(Debug, Clone, Copy)]
pub struct SearchInfo {
    pub depth: usize,
    pub gamma: i32,
    pub score: i32,
    pub best_move: Option<Move>,
}

// ==================== Searcher ====================

/// Score window memoized for a `(position, depth, root)` key across the
/// bisection iterations of one search call.
#[derive(Clone, Copy)]
struct Entry {
    lower: i32,
    upper: i32,
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            lower: -MATE_UPPER,
            upper: MATE_UPPER,
        }
    }
}

/// The search context. All state here is owned by one `search` invocation:
/// it is cleared on entry and never shared between overlapping calls, so
/// callers wanting parallel searches need separate `Searcher` instances.
pub struct Searcher {
    scores: FxHashMap<(Position, i32, bool), Entry>,
    best_moves: FxHashMap<Position, Move>,
    nodes: u64,
    max_nodes: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

impl Searcher {
    pub fn new() -> Self {
        Searcher {
            scores: FxHashMap::default(),
            best_moves: FxHashMap::default(),
            nodes: 0,
            max_nodes: u64::MAX,
        }
    }

    /// Nodes visited by the last `search` call.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Fail-soft negamax against the single threshold `gamma`: the result
    /// is a valid lower bound when it reaches `gamma` and a valid upper
    /// bound otherwise.
    fn bound(&mut self, pos: Position, gamma: i32, depth: i32, root: bool) -> i32 {
        self.nodes += 1;

        // The friendly king was already lost on the way here.
        if pos.score <= -MATE_LOWER {
            return -MATE_UPPER;
        }

        let entry = self
            .scores
            .get(&(pos, depth, root))
            .copied()
            .unwrap_or_default();
        if entry.lower >= gamma {
            return entry.lower;
        }
        if entry.upper < gamma {
            return entry.upper;
        }

        let mut best = -MATE_UPPER;
        let mut best_move: Option<Move> = None;

        // Candidates are staged from cheapest refutation to full scan, with
        // an early exit as soon as gamma is met.
        'candidates: {
            // Null move: if passing is already good enough, the position
            // does not need a full-width search. Requires some sliding or
            // minor piece so zugzwang endgames are not mis-pruned.
            if depth > 2 && !root && pos.has_major_or_minor() {
                let score = -self.bound(pos.rotate(true), 1 - gamma, depth - 3, false);
                if score > best {
                    best = score;
                }
                if best >= gamma {
                    break 'candidates;
                }
            }

            // Quiescence: stand pat, then only tactics worth the extension.
            if depth <= 0 {
                if pos.score > best {
                    best = pos.score;
                }
                if best >= gamma {
                    break 'candidates;
                }

                let mut tactical: Vec<(i32, Move)> = gen_moves(&pos)
                    .into_iter()
                    .map(|m| (move_value(&pos, &m), m))
                    .filter(|&(value, _)| value >= QUIESCENCE_THRESHOLD)
                    .collect();
                tactical.sort_by_key(|&(value, _)| -value);

                for (_, m) in tactical {
                    let score = -self.bound(pos.make_move(&m), 1 - gamma, depth - 1, false);
                    if score > best {
                        best = score;
                        best_move = Some(m);
                    }
                    if best >= gamma {
                        break 'candidates;
                    }
                }
                break 'candidates;
            }

            // The move that refuted this position last time goes first.
            if let Some(killer) = self.best_moves.get(&pos).copied() {
                let score = -self.bound(pos.make_move(&killer), 1 - gamma, depth - 1, false);
                if score > best {
                    best = score;
                    best_move = Some(killer);
                }
                if best >= gamma {
                    break 'candidates;
                }
            }

            let mut moves = gen_moves(&pos);
            moves.sort_by_key(|m| -move_value(&pos, m));
            for m in moves {
                if self.nodes > self.max_nodes {
                    break;
                }
                let score = -self.bound(pos.make_move(&m), 1 - gamma, depth - 1, false);
                if score > best {
                    best = score;
                    best_move = Some(m);
                }
                if best >= gamma {
                    break 'candidates;
                }
            }
        }

        // No move improved on the absolute floor: either we are stalemated
        // or every reply loses the king. Tell the two apart by checking
        // whether the opponent could capture the king if we passed.
        if depth > 0 && best == -MATE_UPPER {
            let flipped = pos.rotate(true);
            let in_check = gen_moves(&flipped)
                .iter()
                .any(|m| move_value(&flipped, m) >= MATE_LOWER);
            best = if in_check { -MATE_LOWER } else { 0 };
        }

        if best >= gamma {
            match best_move {
                Some(m) => {
                    self.best_moves.insert(pos, m);
                }
                None => {
                    self.best_moves.remove(&pos);
                }
            }
            self.scores.insert(
                (pos, depth, root),
                Entry {
                    lower: best,
                    upper: entry.upper,
                },
            );
        } else {
            self.scores.insert(
                (pos, depth, root),
                Entry {
                    lower: entry.lower,
                    upper: best,
                },
            );
        }

        best
    }

    /// Iterative-deepening driver. Depth 1 is a single direct evaluation
    /// for a fast provisional move; deeper levels bisect the score range
    /// (MTD-bi), calling the null-window `bound` until the window collapses
    /// or the per-depth budget runs out. Returns the most recent best move
    /// together with the score that produced it.
    pub fn search<F>(
        &mut self,
        pos: &Position,
        limits: &Limits,
        mut report: F,
    ) -> Option<(Move, i32)>
    where
        F: FnMut(&SearchInfo),
    {
        self.nodes = 0;
        self.max_nodes = limits.max_nodes;
        self.scores.clear();
        self.best_moves.clear();

        let start = Instant::now();
        let mut result = None;

        for depth in 1..=limits.max_depth {
            if depth == 1 {
                let score = self.bound(*pos, 0, 1, true);
                let best_move = self.best_moves.get(pos).copied();
                if let Some(m) = best_move {
                    result = Some((m, score));
                }
                log::debug!("depth 1 score {score} nodes {}", self.nodes);
                report(&SearchInfo {
                    depth,
                    gamma: 0,
                    score,
                    best_move,
                });
            } else {
                let mut lower = -MATE_LOWER;
                let mut upper = MATE_LOWER;
                let depth_start = Instant::now();

                while lower < upper - CONVERGENCE_WINDOW {
                    // The total budget is checked here too: one depth's
                    // bisection must not overrun a small overall limit.
                    if depth_start.elapsed() >= limits.depth_time
                        || start.elapsed() >= limits.total_time
                    {
                        log::debug!("depth {depth} stopped on time budget");
                        break;
                    }
                    // Floor division keeps the bisection symmetric for
                    // negative windows.
                    let gamma = (lower + upper + 1).div_euclid(2);
                    let score = self.bound(*pos, gamma, depth as i32, true);
                    if score >= gamma {
                        lower = score;
                    } else {
                        upper = score;
                    }

                    let best_move = self.best_moves.get(pos).copied();
                    if let Some(m) = best_move {
                        result = Some((m, score));
                    }
                    log::trace!(
                        "depth {depth} gamma {gamma} score {score} nodes {}",
                        self.nodes
                    );
                    report(&SearchInfo {
                        depth,
                        gamma,
                        score,
                        best_move,
                    });
                }
                log::debug!(
                    "depth {depth} window [{lower}, {upper}] nodes {}",
                    self.nodes
                );
            }

            // Coarse cancellation: budgets are only consulted between whole
            // bisection iterations and depth increments.
            if start.elapsed() >= limits.total_time || self.nodes > limits.max_nodes {
                break;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::tests::position_from_rows;

    #[test]
    fn test_quiet_position_stands_pat() {
        let pos = position_from_rows([
            "....k...", "........", "........", "........", "........", "........", "........",
            "....K...",
        ]);
        let mut searcher = Searcher::new();
        // No tactics at all: quiescence must return the static score as an
        // upper bound for an unreachable gamma.
        let score = searcher.bound(pos, MATE_LOWER, 0, false);
        assert_eq!(score, pos.score);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        // Lone king on a1, hemmed in by queen b3 and king c2, not in check.
        let pos = position_from_rows([
            "........", "........", "........", "........", "........", ".q......", "..k.....",
            "K.......",
        ]);
        let mut searcher = Searcher::new();
        let score = searcher.bound(pos, 1, 2, true);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_checkmate_scores_mate_bound() {
        // Queen b2 supported by king b3 mates the king on a1.
        let pos = position_from_rows([
            "........", "........", "........", "........", "........", ".k......", ".q......",
            "K.......",
        ]);
        let mut searcher = Searcher::new();
        let score = searcher.bound(pos, 1, 2, true);
        assert_eq!(score, -MATE_LOWER);
    }

    #[test]
    fn test_finds_back_rank_mate() {
        // Ra1-a8 is mate: king g6 boxes the bare king on h8.
        let pos = position_from_rows([
            ".......k", "........", "......K.", "........", "........", "........", "........",
            "R.......",
        ]);
        let mut searcher = Searcher::new();
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let mut top_score = 0;
        let result = searcher.search(&pos, &limits, |info| {
            top_score = top_score.max(info.score);
        });
        assert!(top_score >= MATE_LOWER, "top score was {top_score}");
        let (best, _) = result.expect("a best move must be recorded");
        assert_eq!((best.from, best.to), (91, 21));
    }

    #[test]
    fn test_bound_caches_and_reuses_score_windows() {
        let pos = position_from_rows(crate::position::tests::START_ROWS);
        let mut searcher = Searcher::new();

        // Failing low against an unreachable threshold stores an upper bound.
        let upper = searcher.bound(pos, MATE_LOWER, 2, false);
        assert!(upper < MATE_LOWER);
        let entry = searcher.scores[&(pos, 2, false)];
        assert_eq!(entry.upper, upper);

        // Failing high against a trivial threshold stores a lower bound
        // alongside it under the same key.
        let lower = searcher.bound(pos, -MATE_LOWER, 2, false);
        assert!(lower >= -MATE_LOWER);
        let entry = searcher.scores[&(pos, 2, false)];
        assert_eq!(entry.lower, lower);
        assert_eq!(entry.upper, upper);

        // Repeat calls are answered straight from the cached window: the
        // node counter moves by exactly one per call, nothing is re-searched.
        let nodes = searcher.nodes;
        assert_eq!(searcher.bound(pos, MATE_LOWER, 2, false), upper);
        assert_eq!(searcher.bound(pos, -MATE_LOWER, 2, false), lower);
        assert_eq!(searcher.nodes, nodes + 2);
    }

    #[test]
    fn test_total_time_budget_bounds_the_bisection() {
        let pos = position_from_rows(crate::position::tests::START_ROWS);
        let mut searcher = Searcher::new();
        let limits = Limits {
            max_depth: 4,
            depth_time: Duration::from_secs(10),
            total_time: Duration::from_millis(5),
            max_nodes: u64::MAX,
        };
        let start = Instant::now();
        searcher.search(&pos, &limits, |_| {});
        // The overrun is bounded by one null-window call, not a whole
        // depth's bisection.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_node_ceiling_terminates_search() {
        let pos = position_from_rows(crate::position::tests::START_ROWS);
        let mut searcher = Searcher::new();
        let limits = Limits {
            max_depth: 4,
            max_nodes: 50,
            ..Limits::default()
        };
        searcher.search(&pos, &limits, |_| {});
        // Well under what an unbounded depth-4 search would visit.
        assert!(searcher.nodes() < 100_000);
    }

    #[test]
    fn test_deeper_search_prefers_hanging_queen() {
        // White to move, black queen hangs on d5 with nothing defending it.
        let pos = position_from_rows([
            "....k...", "........", "........", "...q....", "........", "........", "........",
            "...RK...",
        ]);
        let mut searcher = Searcher::new();
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let (best, score) = searcher
            .search(&pos, &limits, |_| {})
            .expect("search must find a move");
        // Rd1xd5.
        assert_eq!((best.from, best.to), (94, 54));
        assert!(score > 0);
    }
}
