pub mod fen;
pub mod history;
pub mod mask;
pub mod movegen;
pub mod movement;
pub mod zobrist;

pub use fen::{FenParseError, KILLER_FEN, START_FEN, TRICKY_FEN};
pub use movegen::{
    CaptureGen, GenTypeTrait, LegalGen, MoveList, aligned, attacks, between_bb, bishop_attacks,
    init_tables, king_attack, knight_attack, line_bb, pawn_attack, pin_bb, queen_attacks,
    rook_attacks,
};
pub use zobrist::Key;

use crate::core::*;
use history::UndoHistory;

/******************************************\
|==========================================|
|                Constants                 |
|==========================================|
\******************************************/

/// Upper bound on the number of legal moves in any reachable position.
pub const MAX_MOVES: usize = 256;

/// Undo stack capacity. Must exceed the deepest search in flight
/// (64 plies of iterative deepening plus quiescence chains).
pub const MAX_HISTORY: usize = 1024;

/******************************************\
|==========================================|
|               Board State                |
|==========================================|
\******************************************/

/// Per-move snapshot of the irreversible parts of the position, plus the
/// legality masks derived for the side to move.
///
/// One `BoardState` is pushed per `make_move` and popped per `undo_move`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoardState {
    /// Plies since the last pawn move or capture.
    fifty_move: u8,

    /// Piece captured by the move that produced this state, if any.
    captured: Option<Piece>,

    /// En-passant destination square (the square behind a double-pushed pawn).
    enpassant: Option<Square>,

    /// Castling rights still available.
    castle: Castling,

    /// Incrementally maintained Zobrist key.
    key: Key,

    /// Squares a checked side may move a non-king piece to (FULL = no check,
    /// EMPTY = double check).
    check_mask: Bitboard,

    /// Squares of pieces pinned along a diagonal, plus their pin rays.
    diag_pin: Bitboard,

    /// Squares of pieces pinned along a rank or file, plus their pin rays.
    hv_pin: Bitboard,

    /// Squares attacked by the opponent, with the friendly king removed from
    /// the occupancy so sliders see through it.
    attacked: Bitboard,

    /// True when the en-passant capture is illegal due to a discovered check.
    ep_pin: bool,
}

impl BoardState {
    /// The state carried into the next ply: counters and rights persist,
    /// capture and mask fields are rebuilt by the move itself.
    pub(super) fn snapshot(&self) -> Self {
        Self {
            fifty_move: self.fifty_move,
            castle: self.castle,
            key: self.key,
            enpassant: self.enpassant,
            ..Default::default()
        }
    }
}

/******************************************\
|==========================================|
|                  Board                   |
|==========================================|
\******************************************/

/// The authoritative game state: piece placement, side to move, castling
/// rights, en-passant state, Zobrist key and the undo stack.
///
/// Mutated in place by `make_move`/`undo_move`, which must nest like a stack.
#[derive(Debug, Clone)]
pub struct Board {
    /// Mirror array for O(1) piece-at-square lookup.
    board: [Option<Piece>; Square::NUM],

    /// One bitboard per piece type, both colours merged.
    pieces: [Bitboard; PieceType::NUM],

    /// Aggregate occupancy per colour.
    occupied: [Bitboard; Colour::NUM],

    /// Side to move.
    stm: Colour,

    /// Plies played since the start of the game.
    half_moves: u16,

    /// Current irreversible state and legality masks.
    pub(crate) state: BoardState,

    /// Snapshots of prior states, one per move made.
    history: UndoHistory<MAX_HISTORY>,
}

impl PartialEq for Board {
    /// Positions compare equal on placement, side, rights, en-passant,
    /// counters and key. The undo history is not part of position identity.
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.pieces == other.pieces
            && self.occupied == other.occupied
            && self.stm == other.stm
            && self.half_moves == other.half_moves
            && self.state == other.state
    }
}

impl Eq for Board {}

/******************************************\
|==========================================|
|           Basic Implementation           |
|==========================================|
\******************************************/

impl Default for Board {
    fn default() -> Board {
        let mut board = Board::new();
        board.set(START_FEN).unwrap();
        board
    }
}

impl Board {
    pub(crate) fn new() -> Board {
        Board {
            board: [None; Square::NUM],
            pieces: [Bitboard::EMPTY; PieceType::NUM],
            occupied: [Bitboard::EMPTY; Colour::NUM],
            stm: Colour::White,
            half_moves: 0,
            state: BoardState::default(),
            history: UndoHistory::default(),
        }
    }

    /// Returns the piece on `square`, if any.
    #[inline]
    pub fn on(&self, square: Square) -> Option<Piece> {
        unsafe { *self.board.get_unchecked(square.index()) }
    }

    /// Returns the piece on `square` without checking occupancy.
    ///
    /// ## Safety
    /// - The caller must guarantee the square is occupied
    #[inline]
    pub unsafe fn on_unchecked(&self, square: Square) -> Piece {
        unsafe { self.board[square.index()].unwrap_unchecked() }
    }

    #[inline]
    pub fn piecetype_bb(&self, piecetype: PieceType) -> Bitboard {
        unsafe { *self.pieces.get_unchecked(piecetype.index()) }
    }

    #[inline]
    pub fn occupied_bb(&self, colour: Colour) -> Bitboard {
        unsafe { *self.occupied.get_unchecked(colour.index()) }
    }

    #[inline]
    pub fn all_occupied_bb(&self) -> Bitboard {
        self.occupied_bb(Colour::White) | self.occupied_bb(Colour::Black)
    }

    #[inline]
    pub fn piece_bb(&self, col: Colour, pt: PieceType) -> Bitboard {
        self.piecetype_bb(pt) & self.occupied_bb(col)
    }

    #[inline]
    pub fn stm(&self) -> Colour {
        self.stm
    }

    #[inline]
    pub fn half_moves(&self) -> u16 {
        self.half_moves
    }

    #[inline]
    pub fn fifty_move(&self) -> u8 {
        self.state.fifty_move
    }

    /// En-passant destination square (where a capturing pawn would land).
    #[inline]
    pub fn ep(&self) -> Option<Square> {
        self.state.enpassant
    }

    /// Square of the pawn capturable en passant.
    #[inline]
    pub fn ep_target(&self) -> Option<Square> {
        self.state
            .enpassant
            .map(|sq| unsafe { sq.add_unchecked(-self.stm.forward()) })
    }

    #[inline]
    pub fn castling(&self) -> Castling {
        self.state.castle
    }

    #[inline]
    pub fn key(&self) -> Key {
        self.state.key
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.state.check_mask != Bitboard::FULL
    }

    /// True when the current position has occurred three times, counting
    /// itself. Scans the undo stack backwards over same-side entries, bounded
    /// by the current half-move-clock run (a pawn move or capture makes older
    /// positions unreachable).
    pub fn has_repeated_threefold(&self) -> bool {
        let len = self.history.len();
        let start = len.saturating_sub(self.state.fifty_move as usize + 1);

        let mut count = 1;
        let mut i = len;
        while i >= 2 {
            i -= 2;
            if i < start {
                break;
            }
            if self.history.nth(i).is_some_and(|s| s.key == self.state.key) {
                count += 1;
                if count >= 3 {
                    return true;
                }
            }
        }

        false
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SEPARATOR: &str = "\n     +---+---+---+---+---+---+---+---+";

        writeln!(f, "{}", SEPARATOR)?;

        for rank in Rank::iter().rev() {
            write!(f, " {}   |", rank as u8 + 1)?;

            for file in File::iter() {
                let square = Square::from_parts(file, rank);
                let cell = match self.on(square) {
                    Some(piece) => piece.to_string(),
                    None => " ".to_string(),
                };
                write!(f, " {} |", cell)?;
            }

            writeln!(f, "{}", SEPARATOR)?;
        }

        writeln!(f)?;
        writeln!(f, "       A   B   C   D   E   F   G   H")?;
        writeln!(f)?;
        writeln!(f, "Current Side: {:?}", self.stm())?;
        writeln!(f, "Castling: {}", self.state.castle)?;
        writeln!(
            f,
            "En Passant Square: {}",
            match self.state.enpassant {
                Some(square) => square.to_string(),
                None => "None".to_string(),
            }
        )?;
        writeln!(f, "Half Move Clock: {}", self.state.fifty_move)?;
        writeln!(f, "Full Move: {}", self.half_moves / 2 + 1)?;
        writeln!(f, "Fen: {}", self.fen())?;
        writeln!(f, "Key: {:#X}", self.state.key)
    }
}
