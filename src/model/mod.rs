pub mod board;
pub mod types;

pub use board::{Position, STARTING_FEN};
pub use types::{BoardError, CastlingRights, Color, Piece, PieceKind, Square};
