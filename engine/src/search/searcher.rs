use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chess::Move;
use chess::board::{Board, CaptureGen, LegalGen};

use crate::eval::{Eval, evaluate};
use crate::movepick::{HistoryTable, KillerTable, MovePicker};

use super::{Bound, Clock, MAX_DEPTH, TranspositionTable};

/******************************************\
|==========================================|
|                 Searcher                 |
|==========================================|
\******************************************/

/// Time-bounded iterative-deepening alpha-beta searcher.
///
/// One `Searcher` serves one game: the transposition table persists across
/// `get_move` calls so results are reused between moves, while the killer and
/// history tables and the node counters are transient per call.
///
/// All search state is owned and mutated by the calling thread; the only
/// concurrency is the timer thread behind the shared stop flag. Callers
/// wanting concurrent analysis must clone the `Board` per search.
pub struct Searcher {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,

    time_up: Arc<AtomicBool>,

    nodes: u64,
    tt_hits: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::default(),
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            time_up: Arc::new(AtomicBool::new(false)),
            nodes: 0,
            tt_hits: 0,
        }
    }

    /// Nodes visited by the current (or last) `get_move` call.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Transposition-table early returns of the current (or last) call.
    pub fn tt_hits(&self) -> u64 {
        self.tt_hits
    }

    #[inline]
    fn time_up(&self) -> bool {
        self.time_up.load(Ordering::Relaxed)
    }

    /// Clears the per-call state. The transposition table survives.
    fn reset_transients(&mut self) {
        self.killers.clear();
        self.history.clear();
        self.nodes = 0;
        self.tt_hits = 0;
    }

    /// Picks a move for the position within the given think budget.
    ///
    /// Runs iterative deepening at depths 1, 2, ... until the timer fires or
    /// the depth cap is reached, keeping the best move of the deepest
    /// completed iteration; an interrupted iteration's result is discarded.
    /// The position is cloned once; the caller's board is never mutated.
    pub fn get_move(&mut self, board: &Board, think_millis: u64) -> Move {
        let timer = Clock::start(self.time_up.clone(), Duration::from_millis(think_millis));

        let mut root = board.clone();
        let mut choice = Move::NONE;

        for depth in 1..MAX_DEPTH {
            let (move_, _score) = self.root_search(&mut root, depth);
            if self.time_up() || move_.is_none() {
                break;
            }
            choice = move_;
        }

        self.reset_transients();

        timer.join();
        self.time_up.store(false, Ordering::Relaxed);

        choice
    }

    /// Searches to a single fixed depth without a timer, returning the best
    /// move and its score. Used for deterministic analysis.
    pub fn search_fixed_depth(&mut self, board: &Board, depth: usize) -> (Move, Eval) {
        let mut root = board.clone();
        let result = self.root_search(&mut root, depth);
        self.reset_transients();
        result
    }

    /// Searches the root moves at the given depth.
    ///
    /// The first move gets the full window; each later move first gets a null
    /// window probe and is only re-searched fully when the probe beats alpha
    /// (principal variation search). Every alpha improvement is stored as a
    /// lower bound so a later iteration can seed its ordering; the final
    /// result is stored exact.
    fn root_search(&mut self, board: &mut Board, depth: usize) -> (Move, Eval) {
        let mut alpha = Eval(-Eval::INFINITY.0 - MAX_DEPTH as i32);
        let beta = Eval(Eval::INFINITY.0 + MAX_DEPTH as i32);
        let mut choice = Move::NONE;

        let tt_move = self.tt.probe_move(board.key());
        let mut picker =
            MovePicker::new::<LegalGen>(board, tt_move, self.killers.probe(depth), &self.history);

        while let Some(move_) = picker.next() {
            board.make_move(move_);
            let score = if choice.is_none() {
                -self.search(board, depth - 1, 0, -beta, -alpha, true)
            } else {
                let probe = -self.search(board, depth - 1, 0, -alpha - Eval(1), -alpha, false);
                if probe > alpha {
                    -self.search(board, depth - 1, 0, -beta, -alpha, true)
                } else {
                    probe
                }
            };
            board.undo_move(move_);

            if self.time_up() {
                return (Move::NONE, Eval::ZERO);
            }

            if score > alpha {
                alpha = score;
                choice = move_;
                self.tt
                    .try_store(board.key(), choice, depth, alpha, Bound::Lower);
            }
        }

        self.tt
            .try_store(board.key(), choice, depth, alpha, Bound::Exact);

        (choice, alpha)
    }

    /// Recursive negamax with alpha-beta pruning and principal variation
    /// search.
    ///
    /// Returns 0 once the time limit has fired; the caller discards the
    /// interrupted iteration, so the placeholder value is never trusted.
    /// A repeated position scores as a draw before anything else is tried.
    /// With no legal moves the node is checkmate (`-(INFINITY - ply)`, so
    /// shorter mates score higher) or stalemate (0).
    fn search(
        &mut self,
        board: &mut Board,
        depth: usize,
        ply: u16,
        mut alpha: Eval,
        beta: Eval,
        is_pv: bool,
    ) -> Eval {
        if self.time_up() {
            return Eval::ZERO;
        }

        self.nodes += 1;

        if board.has_repeated_threefold() {
            return Eval::ZERO;
        }

        let in_check = board.in_check();

        // A checked position never drops into quiescence: extending it by one
        // ply means a mate at the horizon is detected exactly rather than
        // being scored by a stand-pat evaluation
        if depth == 0 && !in_check {
            return self.quiescence(board, alpha, beta);
        }
        let depth = depth.max(1);

        // Runaway check extensions are cut at the depth cap
        if ply >= MAX_DEPTH as u16 {
            return evaluate(board);
        }

        if let Some(score) = self
            .tt
            .probe_score(board.key(), depth, ply, alpha, beta)
        {
            self.tt_hits += 1;
            return score;
        }

        let tt_move = self.tt.probe_move(board.key());

        let mut picker =
            MovePicker::new::<LegalGen>(board, tt_move, self.killers.probe(depth), &self.history);

        if picker.is_empty() {
            return if in_check {
                Eval::mated_in(ply)
            } else {
                Eval::ZERO
            };
        }

        let mut bound = Bound::Upper;
        let mut choice = Move::NONE;

        while let Some(move_) = picker.next() {
            board.make_move(move_);
            let score = if is_pv && bound == Bound::Exact {
                // A PV move has been found: probe later moves with a null
                // window and only re-search the rare ones that beat alpha
                let probe =
                    -self.search(board, depth - 1, ply + 1, -alpha - Eval(1), -alpha, false);
                if probe > alpha {
                    -self.search(board, depth - 1, ply + 1, -beta, -alpha, true)
                } else {
                    probe
                }
            } else {
                -self.search(board, depth - 1, ply + 1, -beta, -alpha, is_pv)
            };
            board.undo_move(move_);

            if self.time_up() {
                return Eval::ZERO;
            }

            if score > alpha {
                alpha = score;
                choice = move_;
                bound = Bound::Exact;
            }

            if score >= beta {
                // Fail high: no further moves need examining
                self.tt
                    .try_store(board.key(), move_, depth, beta, Bound::Lower);

                if !move_.is_capture() {
                    self.killers.update(depth, move_);
                    self.history.update(board.stm(), move_, depth);
                }

                return beta;
            }
        }

        self.tt
            .try_store(board.key(), choice, depth, alpha, bound);

        alpha
    }

    /// Capture-only extension at the depth horizon.
    ///
    /// The stand-pat evaluation may cut off or raise alpha immediately;
    /// otherwise capture sequences are searched until they run dry, so a
    /// position in the middle of an exchange is never scored as quiet.
    fn quiescence(&mut self, board: &mut Board, mut alpha: Eval, beta: Eval) -> Eval {
        let stand_pat = evaluate(board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut picker = MovePicker::new::<CaptureGen>(
            board,
            Move::NONE,
            self.killers.probe(0),
            &self.history,
        );

        while let Some(move_) = picker.next() {
            board.make_move(move_);
            let score = -self.quiescence(board, -beta, -alpha);
            board.undo_move(move_);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/

#[cfg(test)]
mod tests {
    use super::*;
    use chess::board::init_tables;
    use chess::{MoveFlag, Square};

    fn setup(fen: &str) -> Board {
        init_tables();
        Board::from_fen(fen).expect("Test FEN should be valid")
    }

    #[test]
    fn test_mate_in_one_found_at_depth_one() {
        // Ra1-a8 is a back-rank mate
        let board = setup("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut searcher = Searcher::new();

        let (move_, score) = searcher.search_fixed_depth(&board, 1);

        assert_eq!(move_, Move::new(Square::A1, Square::A8, MoveFlag::QuietMove));
        assert!(score.is_mate(), "expected a mate score, got {score}");
        assert_eq!(score, Eval::INFINITY, "mate in one scores as immediate mate");
    }

    #[test]
    fn test_mate_in_one_found_at_higher_depths() {
        let board = setup("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut searcher = Searcher::new();

        for depth in 2..=4 {
            let (move_, score) = searcher.search_fixed_depth(&board, depth);
            assert_eq!(
                move_,
                Move::new(Square::A1, Square::A8, MoveFlag::QuietMove),
                "depth {depth} missed the mate"
            );
            assert!(score.is_mate(), "depth {depth} score {score} is not a mate");
        }
    }

    #[test]
    fn test_get_move_with_time_budget() {
        let board = setup("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut searcher = Searcher::new();

        let move_ = searcher.get_move(&board, 200);
        assert_eq!(move_, Move::new(Square::A1, Square::A8, MoveFlag::QuietMove));

        // Transient state is reset after the call
        assert_eq!(searcher.nodes(), 0);
    }

    #[test]
    fn test_one_ply_search_refuses_hanging_capture() {
        // Qe1xe6 wins a pawn but loses the queen to fxe6; quiescence sees the
        // recapture, so even a one-ply search must refuse it
        let board = setup("6k1/5p2/4p3/8/8/8/8/4Q1K1 w - - 0 1");
        let mut searcher = Searcher::new();

        let (move_, _score) = searcher.search_fixed_depth(&board, 1);

        assert_ne!(
            move_,
            Move::new(Square::E1, Square::E6, MoveFlag::Capture),
            "search grabbed a defended pawn with the queen"
        );
    }

    #[test]
    fn test_losing_side_steers_into_repetition() {
        // White is a queen down. Shuffling the knight to f3 repeats the
        // position a third time, which scores 0 and beats every alternative.
        let mut board = setup("1q5k/8/8/8/8/8/8/6NK w - - 0 1");

        let nf3 = Move::new(Square::G1, Square::F3, MoveFlag::QuietMove);
        let qa7 = Move::new(Square::B8, Square::A7, MoveFlag::QuietMove);
        let ng1 = Move::new(Square::F3, Square::G1, MoveFlag::QuietMove);
        let qb8 = Move::new(Square::A7, Square::B8, MoveFlag::QuietMove);

        board.make_move(nf3);
        board.make_move(qa7);
        board.make_move(ng1);
        board.make_move(qb8);
        board.make_move(nf3);
        board.make_move(qa7);
        board.make_move(ng1);
        board.make_move(qb8);

        assert!(board.has_repeated_threefold());

        let mut searcher = Searcher::new();
        let (move_, score) = searcher.search_fixed_depth(&board, 3);

        assert_eq!(move_, nf3, "expected the repetition-forcing move");
        assert_eq!(score, Eval::ZERO, "a repetition line scores as a draw");
    }

    #[test]
    fn test_search_prefers_winning_capture() {
        // White can win the undefended queen on d5
        let board = setup("3q4/8/8/3q4/8/8/3R4/3RK1k1 w - - 0 1");
        let mut searcher = Searcher::new();

        let (move_, score) = searcher.search_fixed_depth(&board, 2);

        assert_eq!(move_.to(), Square::D5, "expected a capture on d5");
        assert!(move_.is_capture());
        assert!(score > Eval(300), "winning a queen should score high: {score}");
    }

    #[test]
    fn test_tt_persists_across_calls() {
        let board = setup("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut searcher = Searcher::new();

        searcher.search_fixed_depth(&board, 3);

        // The stored root move survives the transient reset
        assert_eq!(
            searcher.tt.probe_move(board.key()),
            Move::new(Square::A1, Square::A8, MoveFlag::QuietMove)
        );
    }
}
