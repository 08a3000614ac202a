//! Serializable snapshots of a position for display and render collaborators.
//!
//! A UI component (FEN label, sprite renderer, web view) polls these views
//! after each move instead of reaching into the model's fields.

use serde::Serialize;

use crate::model::types::{Color, Square};
use crate::model::Position;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Per-wing castling availability as four named flags.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CastlingView {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

/// Full snapshot of a position, ready to serialize for a display layer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    /// The position as a FEN string (the text the original scene showed in
    /// its label).
    pub fen: String,
    /// "white" or "black".
    pub turn: String,
    pub castling: CastlingView,
    /// En-passant target in algebraic form, if any.
    pub en_passant: Option<String>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// 8×8 grid, rank 8 first. Empty squares are empty strings; pieces are
    /// sprite identifiers like "white-pawn" for the render collaborator.
    pub board: [[String; 8]; 8],
}

impl PositionView {
    /// Build a snapshot from the current position.
    pub fn from_position(pos: &Position) -> Self {
        let rights = pos.castling_rights;
        let mut board: [[String; 8]; 8] = Default::default();
        for (row, rank) in (0..8).rev().enumerate() {
            for file in 0..8 {
                let sq = Square::new(file, rank).expect("loop bounds keep squares valid");
                if let Some(piece) = pos.piece_at(sq) {
                    board[row][file as usize] = piece.sprite_name().to_string();
                }
            }
        }
        PositionView {
            fen: pos.to_fen(),
            turn: pos.side_to_move.to_string(),
            castling: CastlingView {
                white_kingside: rights.can_castle_kingside(Color::White),
                white_queenside: rights.can_castle_queenside(Color::White),
                black_kingside: rights.can_castle_kingside(Color::Black),
                black_queenside: rights.can_castle_queenside(Color::Black),
            },
            en_passant: pos.en_passant.map(|sq| sq.to_algebraic()),
            halfmove_clock: pos.halfmove_clock,
            fullmove_number: pos.fullmove_number,
            board,
        }
    }
}

impl From<&Position> for PositionView {
    fn from(pos: &Position) -> Self {
        PositionView::from_position(pos)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::STARTING_FEN;

    #[test]
    fn starting_view_fields() {
        let view = PositionView::from_position(&Position::starting());
        assert_eq!(view.fen, STARTING_FEN);
        assert_eq!(view.turn, "white");
        assert!(view.castling.white_kingside);
        assert!(view.castling.black_queenside);
        assert_eq!(view.en_passant, None);
        assert_eq!(view.halfmove_clock, 0);
        assert_eq!(view.fullmove_number, 1);
    }

    #[test]
    fn starting_view_board_grid() {
        let view = PositionView::from_position(&Position::starting());
        // Row 0 = rank 8.
        assert_eq!(view.board[0][0], "black-rook");
        assert_eq!(view.board[0][4], "black-king");
        assert_eq!(view.board[7][4], "white-king");
        assert_eq!(view.board[6][0], "white-pawn");
        assert_eq!(view.board[3][3], "");
    }

    #[test]
    fn view_serializes_camel_case() {
        let view = PositionView::from_position(&Position::starting());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["turn"], "white");
        assert_eq!(json["castling"]["whiteKingside"], true);
        assert_eq!(json["halfmoveClock"], 0);
        assert_eq!(json["fullmoveNumber"], 1);
        assert!(json["enPassant"].is_null());
        assert_eq!(json["board"][0][0], "black-rook");
    }

    #[test]
    fn view_tracks_en_passant() {
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        let view = PositionView::from_position(&pos);
        assert_eq!(view.en_passant.as_deref(), Some("e3"));
        assert_eq!(view.turn, "black");
    }
}
