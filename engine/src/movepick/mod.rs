mod history;
mod movepick;

pub use history::{HistoryTable, KillerTable};
pub use movepick::MovePicker;

/// Score assigned to the transposition-table move; it is always tried first.
pub(crate) const HASH_SCORE: i32 = i32::MAX;

/// Score of a killer move. Captures and promotions sit in a band above this,
/// quiet history scores stay below it.
pub(crate) const KILLER_SCORE: i32 = i32::MAX / 2;
