mod clock;
mod searcher;
mod tt;

pub use clock::Clock;
pub use searcher::Searcher;
pub use tt::{Bound, TranspositionTable};

/// Iterative deepening never exceeds this depth; killer slots and the mate
/// score window are sized from it.
pub const MAX_DEPTH: usize = 64;
