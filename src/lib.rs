//! Chess position model with exact FEN conversion and move bookkeeping.
//!
//! The crate centres on [`model::Position`]: an 8×8 board of optional pieces
//! plus side to move, castling rights, en-passant target, and the two move
//! counters. Positions decode from and encode to FEN bit-exactly, and
//! `apply_move` keeps every state field mutually consistent when a piece is
//! moved (en-passant resets each move, castling rights are monotonically
//! revoked, the halfmove clock resets on pawn moves and captures).
//!
//! Chess legality — movement shapes, check, mate, castling execution,
//! promotion — is deliberately out of scope: the model applies whatever move
//! the caller chose and reports whether it captured. [`session::Game`] wraps
//! one position with move history, metadata, and logging; [`view`] provides
//! serializable snapshots for display layers.

pub mod config;
pub mod model;
pub mod session;
pub mod view;

pub use config::GameConfig;
pub use model::{BoardError, CastlingRights, Color, Piece, PieceKind, Position, Square, STARTING_FEN};
pub use session::{Game, MoveOutcome, MoveRecord};
pub use view::{CastlingView, PositionView};
