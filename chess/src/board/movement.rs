use super::Board;
use super::zobrist::{castle_key, ep_key, piece_key, side_key};
use crate::core::*;

/******************************************\
|==========================================|
|          Castling Rights Table           |
|==========================================|
\******************************************/

/// Per-square mask of castling rights that survive a move touching that
/// square. King home squares clear both rights for that side, corner squares
/// clear the matching rook's right, every other square keeps all rights.
/// Applied to both the from and to squares so rook captures clear rights too.
const CASTLE_RIGHTS_MASK: [Castling; Square::NUM] = init_castle_rights_mask();

const fn init_castle_rights_mask() -> [Castling; Square::NUM] {
    let mut table = [Castling::ALL; Square::NUM];

    table[Square::A1 as usize] = Castling(Castling::ALL.0 & !Castling::WQ.0);
    table[Square::H1 as usize] = Castling(Castling::ALL.0 & !Castling::WK.0);
    table[Square::E1 as usize] =
        Castling(Castling::ALL.0 & !(Castling::WK.0 | Castling::WQ.0));

    table[Square::A8 as usize] = Castling(Castling::ALL.0 & !Castling::BQ.0);
    table[Square::H8 as usize] = Castling(Castling::ALL.0 & !Castling::BK.0);
    table[Square::E8 as usize] =
        Castling(Castling::ALL.0 & !(Castling::BK.0 | Castling::BQ.0));

    table
}

/******************************************\
|==========================================|
|              Making Moves                |
|==========================================|
\******************************************/

impl Board {
    /// Adds a piece to the board at the specified square, updating the mirror
    /// array and bitboards. Does not touch the Zobrist key or counters.
    #[inline]
    pub(crate) fn add_piece(&mut self, piece: Piece, square: Square) {
        self.board[square.index()] = Some(piece);
        self.pieces[piece.pt().index()].set(square);
        self.occupied[piece.colour().index()].set(square);
    }

    /// Removes the piece at the specified square. The square must be occupied.
    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) {
        debug_assert!(self.on(square).is_some(), "remove_piece: 'square' is empty");
        let piece = unsafe { self.on(square).unwrap_unchecked() };
        self.board[square.index()] = None;
        self.pieces[piece.pt().index()].clear(square);
        self.occupied[piece.colour().index()].clear(square);
    }

    /// Moves a piece between two squares. The `from` square must be occupied
    /// and the `to` square empty.
    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        debug_assert!(
            self.on(from).is_some(),
            "move_piece: 'from' square is empty"
        );
        let piece = unsafe { self.on(from).unwrap_unchecked() };
        self.board[from.index()] = None;
        self.board[to.index()] = Some(piece);
        self.pieces[piece.pt().index()].clear(from);
        self.pieces[piece.pt().index()].set(to);
        self.occupied[piece.colour().index()].clear(from);
        self.occupied[piece.colour().index()].set(to);
    }

    /// Sets the en passant square behind a pawn double-pushed from `from`,
    /// toggling the key for the new en passant file.
    #[inline]
    fn set_ep(&mut self, from: Square) {
        let us = self.stm;
        let ep_sq = unsafe { from.add_unchecked(us.forward()) };
        self.state.enpassant = Some(ep_sq);
        self.state.key ^= ep_key(ep_sq.file());
    }

    /// The starting square of the rook involved in castling.
    #[inline]
    fn rook_from(&self, king_side: bool) -> Square {
        match king_side {
            true => Square::H1.relative(self.stm),
            false => Square::A1.relative(self.stm),
        }
    }

    /// The destination square of the rook involved in castling.
    #[inline]
    fn rook_to(&self, king_side: bool) -> Square {
        match king_side {
            true => Square::F1.relative(self.stm),
            false => Square::D1.relative(self.stm),
        }
    }

    /// Relocates the rook for a castling move and updates its keys.
    /// The king's movement is handled by `make_move` itself.
    #[inline]
    fn castle(&mut self, king_side: bool) {
        let piece = Piece::from_parts(self.stm, PieceType::Rook);

        let rook_from = self.rook_from(king_side);
        let rook_to = self.rook_to(king_side);

        self.move_piece(rook_from, rook_to);

        self.state.key ^= piece_key(piece, rook_from);
        self.state.key ^= piece_key(piece, rook_to);
    }

    /// Moves the castling rook back during `undo_move`. Keys are restored
    /// wholesale by `restore_state`, so no toggling happens here.
    #[inline]
    fn undo_castle(&mut self, king_side: bool) {
        let rook_from = self.rook_from(king_side);
        let rook_to = self.rook_to(king_side);

        self.move_piece(rook_to, rook_from);
    }

    /// Masks the castling rights with the rights surviving a move touching
    /// `from` and `to`, toggling the old rights out of the key and the new
    /// rights in.
    #[inline]
    fn update_castle_rights(&mut self, from: Square, to: Square) {
        self.state.key ^= castle_key(self.state.castle);
        self.state
            .castle
            .mask(CASTLE_RIGHTS_MASK[from.index()] & CASTLE_RIGHTS_MASK[to.index()]);
        self.state.key ^= castle_key(self.state.castle);
    }

    /// Applies a `Move` to the board, updating all state in place.
    ///
    /// Handles captures (including en passant, where the captured square
    /// differs from the target square), castling rook relocation, promotions,
    /// castling-rights masking, the en passant square, the half-move clock,
    /// and the incremental Zobrist key. The previous state is pushed onto the
    /// undo stack. No allocation happens here.
    ///
    /// The move is assumed to be legal for the current position; passing
    /// anything else leaves the board in an unspecified state.
    pub fn make_move(&mut self, move_: Move) {
        // Cache the current state (becomes the previous state after this call)
        let state = self.state.snapshot();
        let old = std::mem::replace(&mut self.state, state);
        self.store_state(old);

        self.half_moves += 1;

        let from = move_.from();
        let to = move_.to();
        let us = self.stm;
        let them = !us;
        debug_assert!(self.on(from).is_some(), "make_move: 'from' square is empty");
        let piece = unsafe { self.on(from).unwrap_unchecked() };
        let flag = move_.flag();

        // Incremented by default, reset below on pawn moves and captures
        self.state.fifty_move += 1;

        // Clear any previous en passant square before a new one may be set
        if let Some(ep_sq) = self.state.enpassant {
            self.state.key ^= ep_key(ep_sq.file());
            self.state.enpassant = None;
        }

        match flag {
            MoveFlag::QuietMove => {
                if piece.pt() == PieceType::Pawn {
                    self.state.fifty_move = 0;
                }
                self.move_piece(from, to);
                self.state.key ^= piece_key(piece, from);
                self.state.key ^= piece_key(piece, to);
                self.update_castle_rights(from, to);
            }
            MoveFlag::DoublePawnPush => {
                self.state.fifty_move = 0;
                self.set_ep(from);
                self.move_piece(from, to);
                self.state.key ^= piece_key(piece, from);
                self.state.key ^= piece_key(piece, to);
            }
            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                // Pick the king up first so the rook's destination is free
                self.remove_piece(from);
                self.state.key ^= piece_key(piece, from);
                self.castle(flag == MoveFlag::KingCastle);
                self.add_piece(piece, to);
                self.state.key ^= piece_key(piece, to);
                self.update_castle_rights(from, to);
            }
            MoveFlag::Capture => {
                self.state.fifty_move = 0;
                debug_assert!(
                    self.on(to).is_some(),
                    "make_move: Capture flag set, but 'to' square is empty"
                );
                let captured_piece = unsafe { self.on(to).unwrap_unchecked() };
                self.state.captured = Some(captured_piece);
                self.remove_piece(to);
                self.state.key ^= piece_key(captured_piece, to);
                self.move_piece(from, to);
                self.state.key ^= piece_key(piece, from);
                self.state.key ^= piece_key(piece, to);
                self.update_castle_rights(from, to);
            }
            MoveFlag::EPCapture => {
                self.state.fifty_move = 0;
                // The captured pawn sits behind the target square
                let cap_sq = unsafe { to.add_unchecked(-us.forward()) };
                let captured_pawn = Piece::from_parts(them, PieceType::Pawn);
                self.state.captured = Some(captured_pawn);
                self.remove_piece(cap_sq);
                self.state.key ^= piece_key(captured_pawn, cap_sq);
                self.move_piece(from, to);
                self.state.key ^= piece_key(piece, from);
                self.state.key ^= piece_key(piece, to);
            }
            MoveFlag::KnightPromo
            | MoveFlag::BishopPromo
            | MoveFlag::RookPromo
            | MoveFlag::QueenPromo => {
                self.state.fifty_move = 0;
                let promo_piece = Piece::from_parts(us, move_.promotion_pt());
                self.remove_piece(from);
                self.state.key ^= piece_key(piece, from);
                self.add_piece(promo_piece, to);
                self.state.key ^= piece_key(promo_piece, to);
                self.update_castle_rights(from, to);
            }
            MoveFlag::KnightPromoCapture
            | MoveFlag::BishopPromoCapture
            | MoveFlag::RookPromoCapture
            | MoveFlag::QueenPromoCapture => {
                self.state.fifty_move = 0;
                debug_assert!(
                    self.on(to).is_some(),
                    "make_move: PromoCapture flag set, but 'to' square is empty"
                );
                let captured_piece = unsafe { self.on(to).unwrap_unchecked() };
                self.state.captured = Some(captured_piece);
                self.remove_piece(to);
                self.state.key ^= piece_key(captured_piece, to);
                let promo_piece = Piece::from_parts(us, move_.promotion_pt());
                self.remove_piece(from);
                self.state.key ^= piece_key(piece, from);
                self.add_piece(promo_piece, to);
                self.state.key ^= piece_key(promo_piece, to);
                self.update_castle_rights(from, to);
            }
        }

        self.stm = !self.stm;
        self.state.key ^= side_key();

        self.update_masks();
    }

    /// Reverses the move most recently applied with `make_move`, restoring
    /// the previous snapshot (counters, rights, en passant, key, captured
    /// piece) from the undo stack.
    ///
    /// `move_` must be the exact move passed to the matching `make_move`;
    /// unmaking out of order is a contract violation.
    pub fn undo_move(&mut self, move_: Move) {
        self.stm = !self.stm;
        self.half_moves -= 1;

        let from = move_.from();
        let to = move_.to();
        let us = self.stm;
        let flag = move_.flag();
        // The captured piece lives in the state being discarded
        let captured = self.state.captured;

        self.restore_state();

        match flag {
            MoveFlag::QuietMove | MoveFlag::DoublePawnPush => {
                self.move_piece(to, from);
            }
            MoveFlag::Capture => {
                self.move_piece(to, from);
                debug_assert!(
                    captured.is_some(),
                    "undo_move: Capture flag set, but no captured piece recorded"
                );
                self.add_piece(unsafe { captured.unwrap_unchecked() }, to);
            }
            MoveFlag::EPCapture => {
                self.move_piece(to, from);
                let cap_sq = unsafe { to.add_unchecked(-us.forward()) };
                debug_assert!(
                    captured.is_some(),
                    "undo_move: EPCapture flag set, but no captured piece recorded"
                );
                self.add_piece(unsafe { captured.unwrap_unchecked() }, cap_sq);
            }
            MoveFlag::KingCastle | MoveFlag::QueenCastle => {
                self.remove_piece(to);
                self.undo_castle(flag == MoveFlag::KingCastle);
                self.add_piece(Piece::from_parts(us, PieceType::King), from);
            }
            MoveFlag::KnightPromo
            | MoveFlag::BishopPromo
            | MoveFlag::RookPromo
            | MoveFlag::QueenPromo => {
                self.remove_piece(to);
                self.add_piece(Piece::from_parts(us, PieceType::Pawn), from);
            }
            MoveFlag::KnightPromoCapture
            | MoveFlag::BishopPromoCapture
            | MoveFlag::RookPromoCapture
            | MoveFlag::QueenPromoCapture => {
                self.remove_piece(to);
                debug_assert!(
                    captured.is_some(),
                    "undo_move: PromoCapture flag set, but no captured piece recorded"
                );
                self.add_piece(unsafe { captured.unwrap_unchecked() }, to);
                self.add_piece(Piece::from_parts(us, PieceType::Pawn), from);
            }
        }
    }
}

/******************************************\
|==========================================|
|                Unit Tests                |
|==========================================|
\******************************************/
