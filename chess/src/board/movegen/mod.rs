//! Legal move generation: precomputed attack tables, magic sliding-attack
//! lookups, and the generator itself.
//!
//! The leaper tables and ray tables are compile-time constants; the sliding
//! attack tables are built once at startup (see [`init_tables`]) from the
//! precomputed magic constants, and are read-only afterwards.

mod r#gen;
mod init;
mod lookup;
mod magic;
mod move_list;

pub use lookup::{
    aligned, attacks, between_bb, bishop_attacks, king_attack, knight_attack, line_bb, pawn_attack,
    pin_bb, queen_attacks, rook_attacks,
};

pub use move_list::MoveList;

pub(crate) use r#gen::generate_move;

use super::Board;
use crate::core::*;

/// Builds the process-wide sliding attack tables.
///
/// Call once at startup, before timing-sensitive use; the tables are built
/// lazily on first access otherwise, so ordering mistakes degrade startup
/// cost rather than correctness.
pub fn init_tables() {
    magic::init_magic_tables();
}

/******************************************\
|==========================================|
|             Generation Types             |
|==========================================|
\******************************************/

/// What to generate: the full legal move set, or captures only (used by the
/// quiescence search).
#[derive(PartialEq, Eq)]
pub enum MoveGenType {
    Legal,
    Capture,
}

pub trait GenTypeTrait {
    fn gen_type() -> MoveGenType;
}

pub struct LegalGen;
pub struct CaptureGen;

impl GenTypeTrait for LegalGen {
    fn gen_type() -> MoveGenType {
        MoveGenType::Legal
    }
}
impl GenTypeTrait for CaptureGen {
    fn gen_type() -> MoveGenType {
        MoveGenType::Capture
    }
}

/******************************************\
|==========================================|
|            Board Entry Points            |
|==========================================|
\******************************************/

impl Board {
    /// Fills `move_list` with the exact legal move set (or legal captures
    /// only) for the side to move. An empty result means checkmate when
    /// `in_check()` holds, stalemate otherwise.
    #[inline]
    pub fn generate_moves<G: GenTypeTrait>(&self, move_list: &mut MoveList) {
        generate_move::<G>(self, move_list);
    }

    /// The king's destination square for a castling right.
    #[inline]
    pub(crate) fn castling_king_dest(castle: Castling) -> Square {
        match castle {
            Castling::WK => Square::G1,
            Castling::WQ => Square::C1,
            Castling::BK => Square::G8,
            Castling::BQ => Square::C8,
            _ => unreachable!(),
        }
    }

    /// The rook's home square for a castling right.
    #[inline]
    pub(crate) fn castling_rook_from(castle: Castling) -> Square {
        match castle {
            Castling::WK => Square::H1,
            Castling::WQ => Square::A1,
            Castling::BK => Square::H8,
            Castling::BQ => Square::A8,
            _ => unreachable!(),
        }
    }

    /// The rook's destination square for a castling right.
    #[inline]
    pub(crate) fn castling_rook_dest(castle: Castling) -> Square {
        match castle {
            Castling::WK => Square::F1,
            Castling::WQ => Square::D1,
            Castling::BK => Square::F8,
            Castling::BQ => Square::D8,
            _ => unreachable!(),
        }
    }

    /// The move flag for a castling right.
    #[inline]
    pub(crate) fn castling_flag(castle: Castling) -> MoveFlag {
        match castle {
            Castling::WK | Castling::BK => MoveFlag::KingCastle,
            Castling::WQ | Castling::BQ => MoveFlag::QueenCastle,
            _ => unreachable!(),
        }
    }

    /// Checks the castling path for one right: the spanned squares must be
    /// empty and the king's transit squares unattacked. The caller has
    /// already verified the right is held and the king is not in check.
    #[inline]
    pub(crate) fn can_castle(&self, castle: Castling) -> bool {
        debug_assert!(
            castle.0.count_ones() == 1,
            "This function only works for castling on one side (atomic)"
        );

        let us = self.stm();

        let ksq = self.ksq(us);
        let rook_from = Board::castling_rook_from(castle);
        let rook_dest = Board::castling_rook_dest(castle);

        // King transit squares (destination included), and the union of both
        // movement paths which must be empty
        let king_path = pin_bb(ksq, Board::castling_king_dest(castle));
        let rook_path = pin_bb(rook_from, rook_dest);
        let move_area = king_path | rook_path;

        let occ = self.all_occupied_bb() ^ rook_from.bb() ^ ksq.bb();

        (king_path & self.attacked()).is_empty() && (move_area & occ).is_empty()
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
