//! Search layer: evaluation, move ordering, transposition table and the
//! time-bounded iterative-deepening searcher.
//!
//! Board representation and move generation live in the sibling `chess`
//! crate. Call `chess::board::init_tables()` once at startup before searching.
pub mod eval;
pub mod movepick;
pub mod search;

pub use eval::{Eval, evaluate, piece_value};
pub use movepick::{HistoryTable, KillerTable, MovePicker};
pub use search::{Bound, Clock, MAX_DEPTH, Searcher, TranspositionTable};
