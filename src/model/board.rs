//! Mailbox-based chess position representation.
//!
//! `Position` stores piece placement as an 8×8 grid of `Option<Piece>` plus
//! side to move, castling rights, en-passant square, and move counters. It
//! converts to and from FEN exactly and performs the bookkeeping required
//! when a piece is moved. It deliberately does NOT implement chess legality:
//! the caller chooses the moves, the model only tracks state.

use crate::model::types::{BoardError, CastlingRights, Color, Piece, PieceKind, Square};

/// FEN for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete chess position with FEN-level game state.
///
/// The grid is indexed `[rank][file]`, rank 0 = rank 1 (White's back rank).
/// All access goes through `Square`, which is validated at construction, so
/// no board index can ever be out of range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Piece placement, `board[rank][file]`.
    board: [[Option<Piece>; 8]; 8],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q). Monotonically revoked, never restored.
    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* a double-pushed pawn).
    /// Cleared on every move unless that move re-establishes it.
    pub en_passant: Option<Square>,

    /// Half-move clock: moves since the last pawn move or capture.
    pub halfmove_clock: u32,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u32,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Position {
    /// An empty board with no pieces and default game state.
    pub fn empty() -> Self {
        Position {
            board: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        Self::from_fen(STARTING_FEN).expect("starting FEN is always valid")
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.rank() as usize][sq.file() as usize]
    }

    /// May a piece of `color` land on `sq`? True for an empty square or one
    /// holding an opposing piece; false when a same-color piece sits there.
    pub fn can_occupy(&self, sq: Square, color: Color) -> bool {
        match self.piece_at(sq) {
            None => true,
            Some(occupant) => occupant.color != color,
        }
    }

    /// Every square the piece on `from` may be dropped on under the model's
    /// occupancy-only rule (empty or enemy-held). Empty source yields an
    /// empty list. This is NOT chess legality; movement shapes are a caller
    /// concern.
    pub fn occupiable_from(&self, from: Square) -> Vec<Square> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };
        let mut targets = Vec::new();
        for rank in 0..8 {
            for file in 0..8 {
                let sq = Square::new(file, rank).expect("loop bounds keep squares valid");
                if sq != from && self.can_occupy(sq, piece.color) {
                    targets.push(sq);
                }
            }
        }
        targets
    }

    // -----------------------------------------------------------------------
    // Low-level placement
    // -----------------------------------------------------------------------

    #[inline]
    fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.board[sq.rank() as usize][sq.file() as usize] = piece;
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Apply a caller-chosen move and update all bookkeeping.
    ///
    /// Returns `true` if the move captured an opposing piece. The model
    /// performs only sanity checks (occupied source, right side to move,
    /// no same-color capture, `from != to`); movement shapes, check, and
    /// every other legality rule belong to the caller. On error the
    /// position is left untouched.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<bool, BoardError> {
        let illegal = |reason: &str| BoardError::IllegalMove {
            from: from.to_algebraic(),
            to: to.to_algebraic(),
            reason: reason.to_string(),
        };

        if from == to {
            return Err(illegal("source and destination are the same square"));
        }

        let piece = self.piece_at(from).ok_or_else(|| illegal("no piece on source square"))?;
        if piece.color != self.side_to_move {
            return Err(illegal("piece does not belong to the side to move"));
        }

        let captured = self.piece_at(to);
        if let Some(occupant) = captured {
            if occupant.color == piece.color {
                return Err(illegal("destination holds a piece of the same color"));
            }
        }
        let is_capture = captured.is_some();

        // ---- Move the piece ----
        self.set_piece(from, None);
        self.set_piece(to, Some(piece));

        // ---- En passant: cleared every move, re-set only on a double push ----
        self.en_passant = None;
        if piece.kind == PieceKind::Pawn && from.file() == to.file() {
            let behind = match (piece.color, from.rank(), to.rank()) {
                (Color::White, 1, 3) => Some(2),
                (Color::Black, 6, 4) => Some(5),
                _ => None,
            };
            if let Some(rank) = behind {
                self.en_passant =
                    Some(Square::new(from.file() as i32, rank).expect("en-passant rank in range"));
            }
        }

        // ---- Halfmove clock ----
        if piece.kind == PieceKind::Pawn || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // ---- Castling rights: revoked by the moved piece and its origin ----
        self.revoke_castling(piece, from);

        // ---- Side to move / fullmove number ----
        self.side_to_move = !self.side_to_move;
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        Ok(is_capture)
    }

    /// Clear castling flags per the monotonic rule: a king move clears both
    /// of its color's flags; a rook departing its home square (file a
    /// queenside, file h kingside, on its color's back rank) clears that one
    /// flag. Rights are never re-derived from board inspection.
    fn revoke_castling(&mut self, piece: Piece, from: Square) {
        let back_rank = match piece.color {
            Color::White => 0,
            Color::Black => 7,
        };
        match piece.kind {
            PieceKind::King => {
                let flags = match piece.color {
                    Color::White => {
                        CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE
                    }
                    Color::Black => {
                        CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
                    }
                };
                self.castling_rights.remove(flags);
            }
            PieceKind::Rook if from.rank() == back_rank => {
                let flag = match (piece.color, from.file()) {
                    (Color::White, 0) => CastlingRights::WHITE_QUEENSIDE,
                    (Color::White, 7) => CastlingRights::WHITE_KINGSIDE,
                    (Color::Black, 0) => CastlingRights::BLACK_QUEENSIDE,
                    (Color::Black, 7) => CastlingRights::BLACK_KINGSIDE,
                    _ => return,
                };
                self.castling_rights.remove(flag);
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for
    /// debugging and console display.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8u8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8u8 {
                let ch = match self.board[rank as usize][file as usize] {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Position {
    /// Parse a full 6-field FEN string into a `Position`.
    ///
    /// Validates piece placement, side to move, castling, en passant, and
    /// both clocks. Fewer than 6 fields is an error; extra trailing fields
    /// are ignored. Never leaves a position partially built: either a fully
    /// valid `Position` is returned or nothing is.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(BoardError::MalformedFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut pos = Position::empty();
        pos.parse_placement(fields[0])?;
        pos.parse_game_state(&fields[1..6])?;
        Ok(pos)
    }

    /// Parse the degenerate placement-only FEN variant (field 1 alone), as
    /// the original scene manager did. Game-state fields take the standard
    /// starting values: White to move, all castling rights, no en passant,
    /// clocks 0 and 1.
    pub fn from_placement(placement: &str) -> Result<Self, BoardError> {
        let mut pos = Position::empty();
        pos.parse_placement(placement.trim())?;
        pos.castling_rights = CastlingRights::ALL;
        Ok(pos)
    }

    /// Reload this position from a FEN string in place.
    ///
    /// Validate-then-commit: on failure the existing position is unchanged.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), BoardError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    // ----- Field 1: piece placement -----

    fn parse_placement(&mut self, placement: &str) -> Result<(), BoardError> {
        // Clear anything previously tracked.
        self.board = [[None; 8]; 8];

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::MalformedFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(BoardError::MalformedFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(BoardError::MalformedFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_char(ch) {
                    self.board[rank as usize][file as usize] = Some(piece);
                    file += 1;
                } else {
                    return Err(BoardError::MalformedFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(BoardError::MalformedFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(())
    }

    // ----- Fields 2–6: game state -----

    fn parse_game_state(&mut self, fields: &[&str]) -> Result<(), BoardError> {
        // Side to move.
        self.side_to_move = match fields[0] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(BoardError::MalformedFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // Castling availability.
        self.castling_rights = CastlingRights::from_fen(fields[1]).ok_or_else(|| {
            BoardError::MalformedFen(format!("invalid castling string: '{}'", fields[1]))
        })?;

        // En-passant target square.
        self.en_passant = if fields[2] == "-" {
            None
        } else {
            Some(Square::from_algebraic(fields[2]).ok_or_else(|| {
                BoardError::MalformedFen(format!("invalid en passant square: '{}'", fields[2]))
            })?)
        };

        // Halfmove clock.
        self.halfmove_clock = fields[3].parse::<u32>().map_err(|_| {
            BoardError::MalformedFen(format!("invalid halfmove clock: '{}'", fields[3]))
        })?;

        // Fullmove number.
        self.fullmove_number = fields[4].parse::<u32>().map_err(|_| {
            BoardError::MalformedFen(format!("invalid fullmove number: '{}'", fields[4]))
        })?;
        if self.fullmove_number == 0 {
            return Err(BoardError::MalformedFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Export the position as a FEN string, the exact inverse of `from_fen`.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: piece placement -----
        for rank in (0..8usize).rev() {
            let mut empty_count = 0u8;
            for file in 0..8usize {
                match self.board[rank][file] {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // ----- Field 2: side to move -----
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // ----- Field 3: castling -----
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_fen());

        // ----- Field 4: en passant -----
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // ----- Fields 5 & 6: clocks -----
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
