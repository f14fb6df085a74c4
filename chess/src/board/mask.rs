use super::Board;
use super::movegen::*;
use crate::core::*;

impl Board {
    /// Bishops and queens of `col` (diagonal sliders).
    #[inline]
    pub(crate) fn bishop_queen_bb(&self, col: Colour) -> Bitboard {
        self.piece_bb(col, PieceType::Bishop) | self.piece_bb(col, PieceType::Queen)
    }

    /// Rooks and queens of `col` (orthogonal sliders).
    #[inline]
    pub(crate) fn rook_queen_bb(&self, col: Colour) -> Bitboard {
        self.piece_bb(col, PieceType::Rook) | self.piece_bb(col, PieceType::Queen)
    }

    /// The king square of `col`. Exactly one king per side is a board
    /// invariant during legal play.
    #[inline]
    pub fn ksq(&self, col: Colour) -> Square {
        debug_assert!(
            !self.piece_bb(col, PieceType::King).is_empty(),
            "King must exist for colour {:?}",
            col
        );

        self.piece_bb(col, PieceType::King).lsb_unchecked()
    }

    /// Squares attacked by the opponent, computed with the friendly king
    /// removed from the occupancy.
    #[inline]
    pub const fn attacked(&self) -> Bitboard {
        self.state.attacked
    }

    /// Squares a non-king piece may move to while in check: FULL when not in
    /// check, the block-or-capture ray on single check, EMPTY on double check.
    #[inline]
    pub const fn check_mask(&self) -> Bitboard {
        self.state.check_mask
    }

    #[inline]
    pub const fn diag_pin(&self) -> Bitboard {
        self.state.diag_pin
    }

    #[inline]
    pub const fn hv_pin(&self) -> Bitboard {
        self.state.hv_pin
    }

    /// True when the en-passant capture would expose the king.
    #[inline]
    pub const fn ep_pin(&self) -> bool {
        self.state.ep_pin
    }

    /// Computes the set of squares attacked by the opponent.
    ///
    /// The friendly king is removed from the occupancy so that sliders
    /// "see through" it; otherwise a king stepping backwards along a check
    /// ray would appear to reach safety.
    #[inline]
    fn calc_attacked_bb(&self) -> Bitboard {
        let us = self.stm;
        let them = !us;
        let occ = self.all_occupied_bb() ^ self.piece_bb(us, PieceType::King);

        let mut threatened = Bitboard::pawn_attacks(them, self.piece_bb(them, PieceType::Pawn));

        self.piece_bb(them, PieceType::Knight).for_each(|sq| {
            threatened |= knight_attack(sq);
        });

        self.bishop_queen_bb(them).for_each(|sq| {
            threatened |= bishop_attacks(sq, occ);
        });

        self.rook_queen_bb(them).for_each(|sq| {
            threatened |= rook_attacks(sq, occ);
        });

        threatened |= king_attack(self.ksq(them));

        threatened
    }

    /// Computes the diagonal and orthogonal pin masks.
    ///
    /// A friendly piece lying alone between the king and an opponent slider
    /// is pinned; the mask holds the full pin rays (pinner included), so a
    /// pinned piece's destinations can be intersected with its ray.
    #[inline]
    fn calc_pin_mask(&self) -> (Bitboard, Bitboard) {
        let us = self.stm;
        let them = !us;
        let ksq = self.ksq(us);

        let all_occ = self.all_occupied_bb();
        let our_occ = self.occupied_bb(us);
        let them_occ = self.occupied_bb(them);

        let mut diag_pin = Bitboard::EMPTY;
        let mut hv_pin = Bitboard::EMPTY;

        // Sliders currently giving check are handled by the check mask, not
        // the pin masks; exclude anything the king already sees directly.
        let probe_rays = queen_attacks(ksq, all_occ);
        let potential_pinned = probe_rays & our_occ;
        let potential_checkers = probe_rays & them_occ;

        // Lift the candidate pinned pieces and look again
        let occ = all_occ ^ potential_pinned;

        let diag_pinners =
            bishop_attacks(ksq, occ) & self.bishop_queen_bb(them) & !potential_checkers;
        diag_pinners.for_each(|sq| diag_pin |= pin_bb(ksq, sq));

        let hv_pinners = rook_attacks(ksq, occ) & self.rook_queen_bb(them) & !potential_checkers;
        hv_pinners.for_each(|sq| hv_pin |= pin_bb(ksq, sq));

        (diag_pin, hv_pin)
    }

    /// The two-sided en-passant legality test.
    ///
    /// Removing the captured pawn must not expose a diagonal slider to the
    /// king, and, when a single friendly pawn can capture, removing both
    /// pawns must not expose a rook or queen along the shared rank. Both
    /// sides of the test are required; the horizontal case is the classic
    /// pin-through-two-pawns trap.
    #[inline]
    fn calc_ep_pin(&self, ep_target: Square, attackers: Bitboard) -> bool {
        let us = self.stm;
        let them = !us;
        let ksq = self.ksq(us);
        let all_occ = self.all_occupied_bb();
        let them_occ = self.occupied_bb(them);

        let ep_target_bb = ep_target.bb();

        let potential_checkers = queen_attacks(ksq, all_occ) & them_occ;
        let occ = all_occ ^ ep_target_bb;
        let diag_pinners =
            bishop_attacks(ksq, occ) & !potential_checkers & self.bishop_queen_bb(them);

        if diag_pinners.is_occupied() {
            return true;
        }

        if attackers.is_singleton() {
            let ep_rank = ep_target.rank().bb();
            let occ = all_occ ^ ep_target_bb ^ attackers;
            let h_pinners =
                rook_attacks(ksq, occ) & ep_rank & !potential_checkers & self.rook_queen_bb(them);
            if h_pinners.is_occupied() {
                return true;
            }
        }

        false
    }

    /// Computes the check mask for the side to move.
    ///
    /// FULL when no piece attacks the king. On a single check the mask is the
    /// checker's square for pawn and knight checkers (capture is the only
    /// remedy), or the block-or-capture ray for sliders. Double check leaves
    /// the mask EMPTY, restricting play to king moves.
    #[inline]
    fn calc_check_mask(&self) -> Bitboard {
        let us = self.stm;
        let ksq = self.ksq(us);
        let them = !us;
        let occ = self.all_occupied_bb();

        let pawn_checkers = pawn_attack(us, ksq) & self.piece_bb(them, PieceType::Pawn);
        let knight_checkers = knight_attack(ksq) & self.piece_bb(them, PieceType::Knight);
        let diag_checkers = bishop_attacks(ksq, occ) & self.bishop_queen_bb(them);
        let hv_checkers = rook_attacks(ksq, occ) & self.rook_queen_bb(them);

        let all_checkers = pawn_checkers | knight_checkers | diag_checkers | hv_checkers;

        if all_checkers.is_empty() {
            Bitboard::FULL
        } else if !all_checkers.more_than_one() {
            let checker_sq = all_checkers.lsb_unchecked();

            if (pawn_checkers | knight_checkers).contains(checker_sq) {
                all_checkers
            } else {
                pin_bb(ksq, checker_sq)
            }
        } else {
            Bitboard::EMPTY
        }
    }

    /// Rebuilds the legality masks for the side to move. Called after every
    /// mutation of the position.
    pub(crate) fn update_masks(&mut self) {
        self.state.attacked = self.calc_attacked_bb();

        let check_mask = self.calc_check_mask();
        self.state.check_mask = check_mask;

        // Pins are irrelevant under double check (king moves only)
        if !check_mask.is_empty() {
            (self.state.diag_pin, self.state.hv_pin) = self.calc_pin_mask();

            if let Some(ep_target) = self.ep_target() {
                let our_pawns = self.piece_bb(self.stm, PieceType::Pawn);

                let ep_target_bb = ep_target.bb();

                let attackers = our_pawns
                    & (ep_target_bb.shift(Direction::E) | ep_target_bb.shift(Direction::W));

                if attackers.is_occupied() {
                    self.state.ep_pin = self.calc_ep_pin(ep_target, attackers);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ksq() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(board.ksq(Colour::White), Square::E1);
        assert_eq!(board.ksq(Colour::Black), Square::E8);
    }

    #[test]
    fn test_attacked_bb_initial_pos() {
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let attacked_by_black = board.attacked();

        let expected =
            Rank::Rank6.bb() | Rank::Rank7.bb() | Rank::Rank8.bb() ^ Square::A8.bb() ^ Square::H8.bb();

        assert_eq!(attacked_by_black, expected);
    }

    #[test]
    fn test_no_check_mask_is_full() {
        let board = Board::default();
        assert_eq!(board.check_mask(), Bitboard::FULL);
        assert!(!board.in_check());
    }

    #[test]
    fn test_single_slider_check_mask() {
        // Black rook on e8 checks the white king on e1 along the open e-file
        let board = Board::from_fen("4r1k1/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.in_check());

        let expected = between_bb(Square::E1, Square::E8) | Square::E8.bb();
        assert_eq!(board.check_mask(), expected);
    }

    #[test]
    fn test_knight_check_mask_is_checker_square() {
        let board = Board::from_fen("6k1/8/8/8/8/3n4/8/4K3 w - - 0 1").unwrap();
        assert!(board.in_check());
        assert_eq!(board.check_mask(), Square::D3.bb());
    }

    #[test]
    fn test_double_check_mask_is_empty() {
        // Rook on e8 and bishop on h4 both attack the king on e1
        let board = Board::from_fen("4r1k1/8/8/8/7b/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.in_check());
        assert_eq!(board.check_mask(), Bitboard::EMPTY);
    }

    #[test]
    fn test_pin_masks() {
        // White knight on e4 is pinned by the rook on e8; bishop pin on b4-d2
        let board = Board::from_fen("4r1k1/8/8/8/1b2N3/8/3P4/4K3 w - - 0 1").unwrap();

        assert!(board.hv_pin().contains(Square::E4));
        assert!(board.hv_pin().contains(Square::E8));
        assert!(!board.hv_pin().contains(Square::D2));

        assert!(board.diag_pin().contains(Square::D2));
        assert!(board.diag_pin().contains(Square::B4));
        assert!(!board.diag_pin().contains(Square::E4));
    }

    #[test]
    fn test_ep_pin_horizontal() {
        // King and rook share the rank of both pawns: en passant is illegal
        let board = Board::from_fen("8/8/8/8/k2Pp2Q/8/8/3K4 b - d3 0 1").unwrap();
        assert!(board.ep_pin());
    }

    #[test]
    fn test_ep_not_pinned() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert!(!board.ep_pin());
    }
}
