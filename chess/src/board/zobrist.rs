use super::Board;
use crate::core::*;
use crate::utils::PRNG;

/******************************************\
|==========================================|
|              Key Definition              |
|==========================================|
\******************************************/

/// Type alias for a Zobrist key, a 64-bit unsigned integer.
pub type Key = u64;

/******************************************\
|==========================================|
|              Zobrist Table               |
|==========================================|
\******************************************/

/// The precomputed random numbers for Zobrist hashing.
///
/// Each hashable game state element (piece on a square, castling rights,
/// side to move, en passant file) has an associated random key.
#[derive(Debug)]
pub struct ZobristTable {
    /// Keys for each piece on each square: `pieces[piece_index][square_index]`.
    pub pieces: [[Key; Square::NUM]; Piece::NUM],
    /// Key XORed in when Black is to move.
    pub side_to_move: Key,
    /// Keys for each possible castling rights mask: `castling[castling_mask]`.
    pub castling: [Key; Castling::NUM],
    /// Keys for each possible en passant file: `enpassant[file_index]`.
    pub enpassant: [Key; File::NUM],
}

/// Global instance of the ZobristTable, generated at compile time from a
/// fixed seed so that keys are reproducible across runs.
pub const ZOBRIST: ZobristTable = init_zobrist_table();

/******************************************\
|==========================================|
|              Initialisation              |
|==========================================|
\******************************************/

const fn init_zobrist_table() -> ZobristTable {
    let mut rng = PRNG::new(0xDEADBEEFCAFEBABE);

    let mut pieces = [[0; Square::NUM]; Piece::NUM];
    let mut castling = [0; Castling::NUM];
    let mut enpassant = [0; File::NUM];

    let mut i = 0;
    while i < Piece::NUM {
        let mut j = 0;
        while j < Square::NUM {
            pieces[i][j] = rng.random_u64();
            j += 1;
        }
        i += 1;
    }

    let side_to_move = rng.random_u64();

    i = 0;
    while i < Castling::NUM {
        castling[i] = rng.random_u64();
        i += 1;
    }

    i = 0;
    while i < File::NUM {
        enpassant[i] = rng.random_u64();
        i += 1;
    }

    ZobristTable {
        pieces,
        side_to_move,
        castling,
        enpassant,
    }
}

/******************************************\
|==========================================|
|              Access Functions            |
|==========================================|
\******************************************/

/// Retrieves the Zobrist key for a specific piece on a specific square.
#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> Key {
    unsafe {
        *ZOBRIST
            .pieces
            .get_unchecked(piece.index())
            .get_unchecked(sq.index())
    }
}

/// Retrieves the Zobrist key for the side to move.
#[inline]
pub fn side_key() -> Key {
    ZOBRIST.side_to_move
}

/// Retrieves the Zobrist key for a set of castling rights.
#[inline]
pub fn castle_key(flag: Castling) -> Key {
    ZOBRIST.castling[flag.0 as usize]
}

/// Retrieves the Zobrist key for an en passant capture on a given file.
#[inline]
pub fn ep_key(file: File) -> Key {
    unsafe { *ZOBRIST.enpassant.get_unchecked(file.index()) }
}

/******************************************\
|==========================================|
|            Board Implementation          |
|==========================================|
\******************************************/

impl Board {
    /// Calculates the Zobrist key of the board from scratch.
    ///
    /// The incrementally maintained key must always equal this value.
    pub fn calc_key(&self) -> Key {
        let mut key = 0;

        // Toggle keys for each piece and square pair
        for sq in Square::iter() {
            if let Some(piece) = self.on(sq) {
                key ^= piece_key(piece, sq);
            }
        }

        // Toggle the side key if the side to move is black
        if self.stm() == Colour::Black {
            key ^= side_key();
        }

        // Toggle castling key according to the current castling rights
        key ^= castle_key(self.state.castle);

        // Toggle enpassant key based on the file of the enpassant square
        if let Some(ep_square) = self.state.enpassant {
            key ^= ep_key(ep_square.file());
        }

        key
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
