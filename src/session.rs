//! Stateful game session wrapping one `Position`.
//!
//! `Game` is the orchestrator the rest of an application talks to: it owns
//! the position, applies move requests coming from an input collaborator,
//! records history, and hands out snapshots for display collaborators.
//! Collaborators receive references to the one `Game` instead of looking a
//! shared board up through globals.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::model::types::{BoardError, Color, Piece, Square};
use crate::model::Position;
use crate::view::PositionView;

// =========================================================================
// MoveRecord & MoveOutcome
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece that moved.
    pub piece: Piece,
    /// The piece that was captured, if any.
    pub captured: Option<Piece>,
}

/// What a completed move means for the caller: which piece (if any) must
/// have its visual representation destroyed, and the refreshed FEN for the
/// display layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub capture: Option<Piece>,
    pub fen: String,
}

// =========================================================================
// Game
// =========================================================================

/// A chess game session: one owned position plus history and metadata.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    move_history: Vec<MoveRecord>,

    // Metadata
    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,

    // FEN tracking
    started_from_fen: bool,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let pos = Position::starting();
        let fen = pos.to_fen();
        Self {
            position: pos,
            move_history: Vec::new(),
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            started_from_fen: false,
            starting_fen: fen,
        }
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let pos = Position::from_fen(fen)?;
        Ok(Self {
            position: pos,
            move_history: Vec::new(),
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
            started_from_fen: true,
            starting_fen: fen.to_string(),
        })
    }

    /// Create a game from explicit options.
    pub fn with_config(config: GameConfig) -> Result<Self, BoardError> {
        let mut game = match &config.starting_fen {
            Some(fen) => Self::from_fen(fen)?,
            None => Self::new(),
        };
        game.white_player = config.white_player;
        game.black_player = config.black_player;
        info!(id = %game.id, fen = %game.starting_fen, "game created");
        Ok(game)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Completed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// Current position as FEN.
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// Whether the game was started from a custom FEN.
    pub fn started_from_fen(&self) -> bool {
        self.started_from_fen
    }

    /// The starting FEN.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Snapshot for display collaborators.
    pub fn view(&self) -> PositionView {
        PositionView::from_position(&self.position)
    }

    /// Drop targets for the piece on `from` under the occupancy-only rule,
    /// for input collaborators highlighting squares during a drag.
    pub fn destinations_from(&self, from: Square) -> Vec<Square> {
        self.position.occupiable_from(from)
    }

    // -----------------------------------------------------------------
    // Play a move
    // -----------------------------------------------------------------

    /// Apply a move request from the input collaborator.
    ///
    /// The model only sanity-checks the request (occupied source, correct
    /// side, no same-color capture); chess legality is the caller's concern.
    /// On success the move is recorded and the refreshed FEN is returned so
    /// the display layer can update its label.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, BoardError> {
        let piece = self.position.piece_at(from).ok_or_else(|| BoardError::IllegalMove {
            from: from.to_algebraic(),
            to: to.to_algebraic(),
            reason: "no piece on source square".to_string(),
        })?;
        let captured = self.position.piece_at(to);

        self.position.apply_move(from, to)?;

        let record = MoveRecord {
            from,
            to,
            piece,
            captured,
        };
        if let Some(victim) = captured {
            info!(game = %self.id, %from, %to, "{piece} captured {victim}");
        } else {
            debug!(game = %self.id, %from, %to, "{piece} moved");
        }
        self.move_history.push(record);

        Ok(MoveOutcome {
            capture: captured,
            fen: self.position.to_fen(),
        })
    }

    // -----------------------------------------------------------------
    // Load a new FEN into an existing game (reset).
    // -----------------------------------------------------------------

    /// Load a FEN position, resetting all history. On failure the current
    /// game is unchanged.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), BoardError> {
        let pos = Position::from_fen(fen)?;
        self.position = pos;
        self.move_history.clear();
        self.started_from_fen = true;
        self.starting_fen = fen.to_string();
        info!(game = %self.id, fen, "position loaded");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Board array (for display collaborators)
    // -----------------------------------------------------------------

    /// Generate an 8×8 board array (row-major, rank 8 first → rank 1 last).
    /// Empty squares are empty strings. Pieces are like "wP", "bK", etc.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        let mut board: [[String; 8]; 8] = Default::default();
        for (row, rank) in (0..8).rev().enumerate() {
            for file in 0..8 {
                let sq = Square::new(file, rank).expect("loop bounds keep squares valid");
                if let Some(piece) = self.position.piece_at(sq) {
                    let c = match piece.color {
                        Color::White => 'w',
                        Color::Black => 'b',
                    };
                    let p = piece.to_char().to_ascii_uppercase();
                    board[row][file as usize] = format!("{c}{p}");
                }
            }
        }
        board
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::PieceKind;
    use crate::model::STARTING_FEN;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(g: &mut Game, from: &str, to: &str) -> MoveOutcome {
        g.play(sq(from), sq(to)).unwrap()
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_starts_fresh() {
        let g = Game::new();
        assert_eq!(g.fen(), STARTING_FEN);
        assert_eq!(g.side_to_move(), Color::White);
        assert!(!g.started_from_fen());
        assert!(g.move_history().is_empty());
    }

    #[test]
    fn game_from_fen() {
        let g =
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(g.side_to_move(), Color::Black);
        assert!(g.started_from_fen());
    }

    #[test]
    fn game_from_invalid_fen() {
        assert!(Game::from_fen("invalid").is_err());
    }

    #[test]
    fn game_ids_are_unique() {
        assert_ne!(Game::new().id, Game::new().id);
    }

    #[test]
    fn with_config_sets_players_and_fen() {
        let config = GameConfig {
            starting_fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()),
            white_player: "Alice".to_string(),
            black_player: "Bob".to_string(),
        };
        let g = Game::with_config(config).unwrap();
        assert_eq!(g.white_player, "Alice");
        assert_eq!(g.black_player, "Bob");
        assert_eq!(g.starting_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    // -----------------------------------------------------------------
    // Playing moves
    // -----------------------------------------------------------------

    #[test]
    fn play_updates_fen_and_history() {
        let mut g = Game::new();
        let outcome = play(&mut g, "e2", "e4");
        assert_eq!(outcome.capture, None);
        assert_eq!(
            outcome.fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(g.move_history().len(), 1);
        assert_eq!(g.move_history()[0].piece.kind, PieceKind::Pawn);
    }

    #[test]
    fn play_reports_captured_piece() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        play(&mut g, "d7", "d5");
        let outcome = play(&mut g, "e4", "d5");
        let victim = outcome.capture.expect("pawn takes pawn");
        assert_eq!(victim.color, Color::Black);
        assert_eq!(victim.kind, PieceKind::Pawn);
        assert_eq!(g.move_history()[2].captured, Some(victim));
    }

    #[test]
    fn rejected_move_leaves_no_trace() {
        let mut g = Game::new();
        let before = g.fen();
        assert!(g.play(sq("e4"), sq("e5")).is_err());
        assert!(g.play(sq("e7"), sq("e5")).is_err());
        assert_eq!(g.fen(), before);
        assert!(g.move_history().is_empty());
    }

    // -----------------------------------------------------------------
    // Loading FEN
    // -----------------------------------------------------------------

    #[test]
    fn load_fen_resets_history() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        g.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(g.move_history().is_empty());
        assert!(g.started_from_fen());
        assert_eq!(g.starting_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn load_bad_fen_keeps_game() {
        let mut g = Game::new();
        play(&mut g, "e2", "e4");
        let before = g.fen();
        assert!(g.load_fen("rubbish").is_err());
        assert_eq!(g.fen(), before);
        assert_eq!(g.move_history().len(), 1);
    }

    // -----------------------------------------------------------------
    // Display feeds
    // -----------------------------------------------------------------

    #[test]
    fn board_array_starting_position() {
        let g = Game::new();
        let board = g.board_array();
        // Rank 8 = row 0: rook on a8.
        assert_eq!(board[0][0], "bR");
        // Rank 1 = row 7: king on e1.
        assert_eq!(board[7][4], "wK");
        // Rank 5 = row 3: empty.
        assert_eq!(board[3][0], "");
    }

    #[test]
    fn view_follows_moves() {
        let mut g = Game::new();
        play(&mut g, "g1", "f3");
        let view = g.view();
        assert_eq!(view.turn, "black");
        assert_eq!(view.board[5][5], "white-knight"); // f3 = row 5, file 5
        assert_eq!(view.fen, g.fen());
    }

    #[test]
    fn destinations_match_position_rule() {
        let g = Game::new();
        assert_eq!(g.destinations_from(sq("e2")).len(), 48);
        assert!(g.destinations_from(sq("e5")).is_empty());
    }
}
