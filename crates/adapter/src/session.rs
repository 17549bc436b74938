//! Session - drives a game from protocol commands
//!
//! A session owns one [`GameState`] and turns each inbound command into the messages
//! the presentation layer needs. It is synchronous: the caller feeds lines in and
//! writes the returned messages out in order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, warn};
use rand::Rng;

use crate::core::{DefaultRng, GameState, LevelConfig, SwapOutcome, TileLayout};
use crate::level_file::LevelFile;
use crate::protocol::{
    create_error, create_invalid_swap, create_observation, create_shuffle, create_turn, parse_message,
    ErrorCode, OutboundMessage, ParsedMessage, SwapCommand,
};

/// Where a session gets its board from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u64,
    /// Level file to load; the default full board when None
    pub level_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            level_path: None,
        }
    }
}

impl SessionConfig {
    /// Read `COOKIE_CRUNCH_SEED` and `COOKIE_CRUNCH_LEVEL`
    pub fn from_env() -> Self {
        use std::env;

        let seed = env::var("COOKIE_CRUNCH_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        let level_path = env::var("COOKIE_CRUNCH_LEVEL")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self { seed, level_path }
    }
}

pub struct Session<R = DefaultRng> {
    game: GameState<R>,
    /// Sequence number of the last outbound message
    seq: u64,
}

impl Session<DefaultRng> {
    /// Build a session from a configuration, loading its level file if any
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        match &config.level_path {
            Some(path) => {
                let file = LevelFile::load(path)?;
                Self::from_level_file(&file, config.seed)
                    .with_context(|| format!("failed to set up level {}", path.display()))
            }
            None => {
                let level = LevelConfig::default();
                let layout = TileLayout::full(level.columns(), level.rows());
                Ok(Self::new(GameState::new(level, layout, config.seed)))
            }
        }
    }

    pub fn from_level_file(file: &LevelFile, seed: u64) -> Result<Self> {
        let config = file.config()?;
        let layout = file.layout()?;
        Ok(Self::new(GameState::new(config, layout, seed)))
    }
}

impl<R: Rng> Session<R> {
    pub fn new(game: GameState<R>) -> Self {
        Self { game, seq: 0 }
    }

    pub fn game(&self) -> &GameState<R> {
        &self.game
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Fill the board for a new game: a `shuffle` followed by an `observation`
    pub fn start(&mut self) -> Vec<OutboundMessage> {
        if !self.game.level().has_tiles() {
            return vec![self.no_tiles()];
        }
        let created = self.game.start();
        let seq = self.next_seq();
        vec![OutboundMessage::Shuffle(create_shuffle(seq, &created)), self.observe()]
    }

    /// Observation of the current board
    pub fn observe(&mut self) -> OutboundMessage {
        let seq = self.next_seq();
        let level = self.game.level();
        OutboundMessage::Observation(create_observation(
            seq,
            self.game.turn_id(),
            &level.snapshot(),
            level.hint(),
        ))
    }

    /// Parse one inbound line and handle it
    ///
    /// Lines that are not valid messages produce an `invalid_command` error.
    pub fn handle_line(&mut self, line: &str) -> Vec<OutboundMessage> {
        match parse_message(line) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                warn!("unparseable command: {}", e);
                let seq = self.next_seq();
                vec![OutboundMessage::Error(create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &e.to_string(),
                ))]
            }
        }
    }

    pub fn handle(&mut self, msg: ParsedMessage) -> Vec<OutboundMessage> {
        match msg {
            ParsedMessage::Swap(cmd) => vec![self.handle_swap(&cmd)],
            ParsedMessage::Shuffle(_) => {
                if !self.game.level().has_tiles() {
                    return vec![self.no_tiles()];
                }
                let created = self.game.reshuffle();
                let seq = self.next_seq();
                vec![OutboundMessage::Shuffle(create_shuffle(seq, &created)), self.observe()]
            }
            ParsedMessage::Observe(_) => vec![self.observe()],
            ParsedMessage::Unknown(unknown) => {
                debug!("ignoring unknown message seq {}", unknown.seq);
                let seq = self.next_seq();
                vec![OutboundMessage::Error(create_error(
                    seq,
                    ErrorCode::UnknownMessage,
                    "unknown message type",
                ))]
            }
        }
    }

    fn handle_swap(&mut self, cmd: &SwapCommand) -> OutboundMessage {
        if !self.game.level().has_tiles() {
            return self.no_tiles();
        }

        let Some(direction) = cmd.direction() else {
            let seq = self.next_seq();
            return OutboundMessage::Error(create_error(
                seq,
                ErrorCode::InvalidCommand,
                "swap needs a direction or an adjacent `to` cell",
            ));
        };

        let (column, row) = (cmd.from.column, cmd.from.row);
        let Some(swap) = self.game.swap_from(column, row, direction) else {
            let seq = self.next_seq();
            return OutboundMessage::Error(create_error(
                seq,
                ErrorCode::InvalidCell,
                &format!("no cookie to swap at ({}, {}) towards {:?}", column, row, direction),
            ));
        };

        match self.game.play_swap(swap) {
            SwapOutcome::Rejected(swap) => {
                let seq = self.next_seq();
                OutboundMessage::InvalidSwap(create_invalid_swap(seq, swap))
            }
            SwapOutcome::Resolved(report) => {
                let seq = self.next_seq();
                OutboundMessage::Turn(create_turn(seq, self.game.turn_id(), &report))
            }
        }
    }

    fn no_tiles(&mut self) -> OutboundMessage {
        let seq = self.next_seq();
        OutboundMessage::Error(create_error(seq, ErrorCode::NoTiles, "level has no tiles"))
    }
}

/// Encode an outbound message as one JSON line (without the newline)
pub fn encode(msg: &OutboundMessage) -> Result<String> {
    serde_json::to_string(msg).with_context(|| format!("failed to encode message seq {}", msg.seq()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64) -> Session {
        Session::from_config(&SessionConfig {
            seed,
            level_path: None,
        })
        .unwrap()
    }

    #[test]
    fn test_start_sends_shuffle_then_observation() {
        let mut session = session(1);
        let out = session.start();
        assert_eq!(out.len(), 2);
        match &out[0] {
            OutboundMessage::Shuffle(msg) => assert_eq!(msg.cookies.len(), 81),
            other => panic!("Expected shuffle, got {:?}", other),
        }
        match &out[1] {
            OutboundMessage::Observation(msg) => {
                assert_eq!(msg.board.len(), 9);
                assert!(msg.possible_swaps > 0);
                assert!(msg.hint.is_some());
            }
            other => panic!("Expected observation, got {:?}", other),
        }
        assert_eq!(out[0].seq() + 1, out[1].seq());
    }

    #[test]
    fn test_bad_line_is_invalid_command() {
        let mut session = session(1);
        session.start();
        let out = session.handle_line("{nope");
        assert!(matches!(
            &out[..],
            [OutboundMessage::Error(e)] if e.code == ErrorCode::InvalidCommand
        ));
    }

    #[test]
    fn test_swap_off_board_is_invalid_cell() {
        let mut session = session(1);
        session.start();
        let out = session.handle_line(r#"{"type":"swap","seq":1,"from":{"column":0,"row":0},"direction":"down"}"#);
        assert!(matches!(
            &out[..],
            [OutboundMessage::Error(e)] if e.code == ErrorCode::InvalidCell
        ));
    }

    #[test]
    fn test_encode_is_single_line() {
        let mut session = session(2);
        for msg in session.start() {
            let line = encode(&msg).unwrap();
            assert!(!line.contains('\n'));
        }
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.seed, 1);
        assert!(config.level_path.is_none());
    }
}
