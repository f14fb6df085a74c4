//! Read-only attack and ray lookup tables.
//!
//! Leaper attacks and the square-pair ray tables are built at compile time;
//! sliding attacks go through the magic tables in [`super::magic`]. All
//! accessors are branch-free array reads.

use super::init::*;
use crate::core::{Bitboard, Colour, Direction, PieceType, Square};

use Direction::*;

use super::magic::{BISHOP_MAGICS, BISHOP_TABLE, ROOK_MAGICS, ROOK_TABLE};

/******************************************\
|==========================================|
|              Type Definitions            |
|==========================================|
\******************************************/

/// Attack table for a single piece type indexed by square
pub(super) type AttackTable = [Bitboard; Square::NUM];
/// Attack table for pawns indexed by colour and square
type PawnAttackTable = [[Bitboard; Square::NUM]; Colour::NUM];
/// Table mapping square pairs to bitboards
pub(super) type SquarePairTable = [[Bitboard; Square::NUM]; Square::NUM];

/******************************************\
|==========================================|
|              Attack Tables               |
|==========================================|
\******************************************/

/// Precomputed pawn attacks, indexed by `[Colour][Square]`.
const PAWN_ATTACKS: PawnAttackTable = [
    init_pseudo_attacks(&[NE, NW]), // White pawn attacks
    init_pseudo_attacks(&[SE, SW]), // Black pawn attacks
];

/// Precomputed knight attacks, indexed by `[Square]`.
const KNIGHT_ATTACKS: AttackTable = init_pseudo_attacks(&[NNE, NNW, NEE, NWW, SEE, SWW, SSE, SSW]);

/// Precomputed king attacks, indexed by `[Square]`.
const KING_ATTACKS: AttackTable = init_pseudo_attacks(&[N, NE, NW, E, W, SE, SW, S]);

/******************************************\
|==========================================|
|              Lookup Tables               |
|==========================================|
\******************************************/

/// Full lines through square pairs (extended to the board edges), indexed by `[Square][Square]`.
const LINE_BB: SquarePairTable = init_line_bb_table();

/// Exclusive segments between square pairs, indexed by `[Square][Square]`.
const BETWEEN_BB: SquarePairTable = init_between_bb_table();

/// Pin rays between square pairs (between-segment plus pinner), indexed by `[Square][Square]`.
const PIN_BB: SquarePairTable = init_pin_bb_table();

/******************************************\
|==========================================|
|               Get Attacks                |
|==========================================|
\******************************************/

#[inline]
pub fn pawn_attack(col: Colour, sq: Square) -> Bitboard {
    unsafe {
        *PAWN_ATTACKS
            .get_unchecked(col.index())
            .get_unchecked(sq.index())
    }
}

#[inline]
pub fn knight_attack(sq: Square) -> Bitboard {
    unsafe { *KNIGHT_ATTACKS.get_unchecked(sq.index()) }
}

#[inline]
pub fn king_attack(sq: Square) -> Bitboard {
    unsafe { *KING_ATTACKS.get_unchecked(sq.index()) }
}

#[inline]
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    unsafe { *BISHOP_TABLE.get_unchecked(BISHOP_MAGICS[sq.index()].index(occ)) }
}

#[inline]
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    unsafe { *ROOK_TABLE.get_unchecked(ROOK_MAGICS[sq.index()].index(occ)) }
}

#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    bishop_attacks(sq, occ) | rook_attacks(sq, occ)
}

/// Gets the attack `Bitboard` for any piece of `col` and type `pt` on `sq`,
/// given the board occupancy `occ` (ignored for leapers).
#[inline]
pub fn attacks(col: Colour, pt: PieceType, sq: Square, occ: Bitboard) -> Bitboard {
    match pt {
        PieceType::Pawn => pawn_attack(col, sq),
        PieceType::Knight => knight_attack(sq),
        PieceType::King => king_attack(sq),
        PieceType::Bishop => bishop_attacks(sq, occ),
        PieceType::Rook => rook_attacks(sq, occ),
        PieceType::Queen => queen_attacks(sq, occ),
    }
}

/******************************************\
|==========================================|
|           Get Bitboard Lookups           |
|==========================================|
\******************************************/

/// The line through `from` and `to`, extended to the board edges in both
/// directions. Empty when the squares are not collinear or are equal.
#[inline]
pub fn line_bb(from: Square, to: Square) -> Bitboard {
    LINE_BB[from.index()][to.index()]
}

/// The squares strictly between `from` and `to`. Empty when the squares are
/// not collinear, adjacent, or equal.
#[inline]
pub fn between_bb(from: Square, to: Square) -> Bitboard {
    BETWEEN_BB[from.index()][to.index()]
}

/// The squares a piece pinned between `king` and `pinner` may occupy: the
/// segment between them plus the pinner's square (capture), excluding the
/// king's square. Also used as the block-or-capture mask on a slider check.
#[inline]
pub fn pin_bb(king: Square, pinner: Square) -> Bitboard {
    PIN_BB[king.index()][pinner.index()]
}

/// True when `sq3` lies on the line through `sq1` and `sq2`.
#[inline]
pub fn aligned(sq1: Square, sq2: Square, sq3: Square) -> bool {
    line_bb(sq1, sq2).contains(sq3)
}
