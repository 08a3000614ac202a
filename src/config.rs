/// Options for constructing a game session.
///
/// Populated explicitly by the embedding application; this core reads no
/// environment variables and does no I/O.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Starting position as FEN; `None` means the standard start.
    pub starting_fen: Option<String>,
    /// Display name for White.
    pub white_player: String,
    /// Display name for Black.
    pub black_player: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_fen: None,
            white_player: "Player".to_string(),
            black_player: "Player".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.starting_fen, None);
        assert_eq!(config.white_player, "Player");
        assert_eq!(config.black_player, "Player");
    }
}
