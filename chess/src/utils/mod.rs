pub mod perft;
pub mod prng;

pub use perft::{PERFT_SUITE, perft};
pub use prng::PRNG;
