//! Adapter tests - level files and the JSON session end to end

use std::path::PathBuf;

use serde_json::Value;

use cookie_crunch::adapter::{encode, LevelFile, OutboundMessage, Session, SessionConfig};
use cookie_crunch::core::{GameState, Level};

fn level_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("levels").join(name)
}

fn to_json(messages: &[OutboundMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| serde_json::from_str(&encode(msg).unwrap()).unwrap())
        .collect()
}

#[test]
fn test_shipped_levels_load() {
    let expected = [("level_0.json", (9, 9), 81), ("level_1.json", (9, 9), 61), ("level_2.json", (6, 7), 38)];
    for (name, dimensions, tiles) in expected {
        let file = LevelFile::load(level_path(name)).unwrap();
        let layout = file.layout().unwrap();
        assert_eq!(layout.dimensions(), dimensions, "{}", name);
        assert_eq!(layout.tile_count(), tiles, "{}", name);

        let mut level = Level::seeded(file.config().unwrap(), layout, 5);
        let created = level.shuffle();
        assert_eq!(created.len(), tiles, "{}", name);
        assert!(!level.possible_swaps().is_empty(), "{}", name);
    }
}

#[test]
fn test_level_file_settings_reach_the_board() {
    let file = LevelFile::load(level_path("level_2.json")).unwrap();
    let config = file.config().unwrap();
    assert_eq!(config.cookie_kinds(), 3);
    assert_eq!(config.max_shuffle_attempts(), 500);

    let mut game = GameState::new(config, file.layout().unwrap(), 8);
    let created = game.start();
    assert!(created.iter().all(|cookie| cookie.kind.index() < 3));
}

#[test]
fn test_session_from_missing_level_fails() {
    let config = SessionConfig {
        seed: 1,
        level_path: Some(level_path("missing.json")),
    };
    let err = Session::from_config(&config).err().expect("missing file must fail");
    assert!(format!("{:#}", err).contains("missing.json"));
}

#[test]
fn test_session_closed_loop() {
    let config = SessionConfig {
        seed: 42,
        level_path: Some(level_path("level_1.json")),
    };
    let mut session = Session::from_config(&config).unwrap();

    let start = to_json(&session.start());
    assert_eq!(start[0]["type"], "shuffle");
    assert_eq!(start[0]["cookies"].as_array().unwrap().len(), 61);
    assert_eq!(start[1]["type"], "observation");
    assert_eq!(start[1]["turn_id"], 0);
    assert_eq!(start[1]["board"].as_array().unwrap().len(), 9);
    assert_eq!(start[1]["board_hash"].as_str().unwrap().len(), 16);

    // Play the hint through the protocol
    let hint = &start[1]["hint"];
    let line = format!(
        r#"{{"type":"swap","seq":1,"from":{{"column":{},"row":{}}},"to":{{"column":{},"row":{}}}}}"#,
        hint["a"]["column"], hint["a"]["row"], hint["b"]["column"], hint["b"]["row"]
    );
    let turn = to_json(&session.handle_line(&line));
    assert_eq!(turn.len(), 1);
    assert_eq!(turn[0]["type"], "turn");
    assert_eq!(turn[0]["turn_id"], 1);
    let cascades = turn[0]["cascades"].as_array().unwrap();
    assert!(!cascades.is_empty());
    let first_chain = &cascades[0]["chains"][0];
    assert!(first_chain["cookies"].as_array().unwrap().len() >= 3);
    assert!(first_chain["kind"] == "horizontal" || first_chain["kind"] == "vertical");

    // Observation reflects the finished turn
    let observed = to_json(&session.handle_line(r#"{"type":"observe","seq":2}"#));
    assert_eq!(observed[0]["type"], "observation");
    assert_eq!(observed[0]["turn_id"], 1);
    assert_eq!(session.game().level().cookie_count(), 61);

    // Sequence numbers keep increasing across messages
    let seqs: Vec<u64> = start
        .iter()
        .chain(&turn)
        .chain(&observed)
        .map(|m| m["seq"].as_u64().unwrap())
        .collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]), "{:?}", seqs);
}

#[test]
fn test_session_invalid_swap_and_shuffle() {
    let mut session = Session::from_config(&SessionConfig::default()).unwrap();
    session.start();

    // Find a swipe that is not legal on the current board
    let mut invalid = None;
    'search: for row in 0..9 {
        for column in 0..8 {
            let swap = session
                .game()
                .swap_from(column, row, cookie_crunch::types::Direction::Right)
                .unwrap();
            if !session.game().level().is_possible_swap(&swap) {
                invalid = Some((column, row));
                break 'search;
            }
        }
    }
    let (column, row) = invalid.expect("a full board has illegal swaps");
    let before = session.game().level().snapshot().board_hash;

    let line = format!(
        r#"{{"type":"swap","seq":1,"from":{{"column":{},"row":{}}},"direction":"right"}}"#,
        column, row
    );
    let out = to_json(&session.handle_line(&line));
    assert_eq!(out[0]["type"], "invalid_swap");
    assert_eq!(session.game().level().snapshot().board_hash, before);

    let out = to_json(&session.handle_line(r#"{"type":"shuffle","seq":2}"#));
    assert_eq!(out[0]["type"], "shuffle");
    assert_eq!(out[1]["type"], "observation");
    assert_eq!(out[0]["cookies"].as_array().unwrap().len(), 81);
}

#[test]
fn test_session_errors() {
    let mut session = Session::from_config(&SessionConfig::default()).unwrap();
    session.start();

    let out = to_json(&session.handle_line(r#"{"type":"dance","seq":1}"#));
    assert_eq!(out[0]["type"], "error");
    assert_eq!(out[0]["code"], "unknown_message");

    let out = to_json(&session.handle_line(r#"{"type":"swap","seq":2,"from":{"column":0,"row":0}}"#));
    assert_eq!(out[0]["code"], "invalid_command");

    let out = to_json(&session.handle_line(r#"{"type":"swap","seq":3,"from":{"column":0,"row":0},"to":{"column":2,"row":0}}"#));
    assert_eq!(out[0]["code"], "invalid_command");

    let out = to_json(&session.handle_line(r#"{"type":"swap","seq":4,"from":{"column":8,"row":8},"direction":"up"}"#));
    assert_eq!(out[0]["code"], "invalid_cell");
}

#[test]
fn test_session_without_tiles_reports_no_tiles() {
    let file = LevelFile::from_json(r#"{"tiles":[[0,0,0],[0,0,0],[0,0,0]]}"#).unwrap();
    let mut session = Session::from_level_file(&file, 1).unwrap();

    let out = to_json(&session.start());
    assert_eq!(out[0]["code"], "no_tiles");
    let out = to_json(&session.handle_line(r#"{"type":"shuffle","seq":1}"#));
    assert_eq!(out[0]["code"], "no_tiles");
    let out = to_json(&session.handle_line(r#"{"type":"observe","seq":2}"#));
    assert_eq!(out[0]["type"], "observation");
    assert_eq!(out[0]["possible_swaps"], 0);
}
