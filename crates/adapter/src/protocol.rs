//! Protocol module - JSON message types for a presentation layer
//!
//! Line-delimited JSON. Every message has `type` and `seq`; outbound messages also
//! carry `ts` (timestamp in ms). Cells are `{"column": c, "row": r}` with row 0 at
//! the bottom of the board.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{BoardSnapshot, CascadeStep, TurnReport};
use crate::types::{Chain, ChainKind, Cookie, CookieType, Direction, Swap};

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SwapType {
    #[default]
    #[serde(rename = "swap")]
    Swap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShuffleType {
    #[default]
    #[serde(rename = "shuffle")]
    Shuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ObserveType {
    #[default]
    #[serde(rename = "observe")]
    Observe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

/// Swipe direction, parsed case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectionName(pub Direction);

impl<'de> Deserialize<'de> for DirectionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Direction::from_str(&s)
            .map(DirectionName)
            .ok_or_else(|| serde::de::Error::custom("invalid direction"))
    }
}

impl Serialize for DirectionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(match self.0 {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        })
    }
}

/// Swap request: a cell plus either the neighbour cell or a swipe direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapCommand {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SwapType,
    pub seq: u64,
    pub from: CellRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<CellRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DirectionName>,
}

impl SwapCommand {
    /// Direction from `from` to the other cell
    ///
    /// None when neither `to` nor `direction` is given, or `to` is not an orthogonal
    /// neighbour of `from`.
    pub fn direction(&self) -> Option<Direction> {
        if let Some(DirectionName(direction)) = self.direction {
            return Some(direction);
        }
        let to = self.to?;
        let dc = to.column as i64 - self.from.column as i64;
        let dr = to.row as i64 - self.from.row as i64;
        match (dc, dr) {
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Up),
            (0, -1) => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Ask for a fresh board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleCommand {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ShuffleType,
    pub seq: u64,
}

/// Ask for an observation of the current board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserveCommand {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObserveType,
    pub seq: u64,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShuffleMessageType {
    #[serde(rename = "shuffle")]
    Shuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnType {
    #[serde(rename = "turn")]
    Turn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidSwapType {
    #[serde(rename = "invalid_swap")]
    InvalidSwap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "invalid_cell")]
    InvalidCell,
    #[serde(rename = "no_tiles")]
    NoTiles,
    #[serde(rename = "unknown_message")]
    UnknownMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookieKindLower {
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "white")]
    White,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "purple")]
    Purple,
}

impl From<CookieType> for CookieKindLower {
    fn from(value: CookieType) -> Self {
        match value {
            CookieType::Blue => CookieKindLower::Blue,
            CookieType::Red => CookieKindLower::Red,
            CookieType::Yellow => CookieKindLower::Yellow,
            CookieType::White => CookieKindLower::White,
            CookieType::Green => CookieKindLower::Green,
            CookieType::Purple => CookieKindLower::Purple,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainKindLower {
    #[serde(rename = "horizontal")]
    Horizontal,
    #[serde(rename = "vertical")]
    Vertical,
}

impl From<ChainKind> for ChainKindLower {
    fn from(value: ChainKind) -> Self {
        match value {
            ChainKind::Horizontal => ChainKindLower::Horizontal,
            ChainKind::Vertical => ChainKindLower::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CookieJson {
    pub column: usize,
    pub row: usize,
    pub kind: CookieKindLower,
}

impl From<Cookie> for CookieJson {
    fn from(value: Cookie) -> Self {
        Self {
            column: value.column,
            row: value.row,
            kind: value.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapJson {
    pub a: CookieJson,
    pub b: CookieJson,
}

impl From<Swap> for SwapJson {
    fn from(value: Swap) -> Self {
        Self {
            a: value.a().into(),
            b: value.b().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainJson {
    pub kind: ChainKindLower,
    pub cookies: Vec<CookieJson>,
}

impl From<&Chain> for ChainJson {
    fn from(value: &Chain) -> Self {
        Self {
            kind: value.kind().into(),
            cookies: value.cookies().iter().copied().map(CookieJson::from).collect(),
        }
    }
}

fn columns_json(columns: &[Vec<Cookie>]) -> Vec<Vec<CookieJson>> {
    columns
        .iter()
        .map(|column| column.iter().copied().map(CookieJson::from).collect())
        .collect()
}

fn cookies_json(cookies: &BTreeSet<Cookie>) -> Vec<CookieJson> {
    cookies.iter().copied().map(CookieJson::from).collect()
}

/// One cascade round: chains to remove, then falls (lowest first), then new cookies
/// (highest first), each grouped per column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeJson {
    pub chains: Vec<ChainJson>,
    pub falls: Vec<Vec<CookieJson>>,
    pub top_ups: Vec<Vec<CookieJson>>,
}

impl From<&CascadeStep> for CascadeJson {
    fn from(value: &CascadeStep) -> Self {
        Self {
            chains: value.chains.iter().map(ChainJson::from).collect(),
            falls: columns_json(&value.falls),
            top_ups: columns_json(&value.top_ups),
        }
    }
}

/// Deterministic board hash serialized as 16 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&format_args!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

/// Board state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub turn_id: u32,
    pub columns: usize,
    pub rows: usize,
    /// One string per row, top row first: ' ' no tile, '.' empty, else kind symbol
    pub board: Vec<String>,
    pub possible_swaps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<SwapJson>,
    pub board_hash: StateHash,
}

/// A new board: every cookie to create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleMessage {
    #[serde(rename = "type")]
    pub msg_type: ShuffleMessageType,
    pub seq: u64,
    pub ts: u64,
    pub cookies: Vec<CookieJson>,
}

/// An accepted swap and everything it caused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMessage {
    #[serde(rename = "type")]
    pub msg_type: TurnType,
    pub seq: u64,
    pub ts: u64,
    pub turn_id: u32,
    pub swap: SwapJson,
    pub cascades: Vec<CascadeJson>,
    /// Present when the settled board had no legal swap and was replaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reshuffled: Option<Vec<CookieJson>>,
}

/// A swap that does not produce a chain; the board is unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidSwapMessage {
    #[serde(rename = "type")]
    pub msg_type: InvalidSwapType,
    pub seq: u64,
    pub ts: u64,
    pub swap: SwapJson,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any message the game sends
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Observation(ObservationMessage),
    Shuffle(ShuffleMessage),
    Turn(TurnMessage),
    InvalidSwap(InvalidSwapMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    pub fn seq(&self) -> u64 {
        match self {
            OutboundMessage::Observation(m) => m.seq,
            OutboundMessage::Shuffle(m) => m.seq,
            OutboundMessage::Turn(m) => m.seq,
            OutboundMessage::InvalidSwap(m) => m.seq,
            OutboundMessage::Error(m) => m.seq,
        }
    }
}

/// Parse an inbound line
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "swap")]
        Swap(SwapCommand),
        #[serde(rename = "shuffle")]
        Shuffle(ShuffleCommand),
        #[serde(rename = "observe")]
        Observe(ObserveCommand),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Swap(m)) => Ok(ParsedMessage::Swap(m)),
        Ok(InboundMessage::Shuffle(m)) => Ok(ParsedMessage::Shuffle(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if msg_type != "swap" && msg_type != "shuffle" && msg_type != "observe" {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Swap(SwapCommand),
    Shuffle(ShuffleCommand),
    Observe(ObserveCommand),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Create an observation from a board snapshot
pub fn create_observation(seq: u64, turn_id: u32, snapshot: &BoardSnapshot, hint: Option<Swap>) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        turn_id,
        columns: snapshot.columns,
        rows: snapshot.rows,
        board: snapshot.rows_top_down(),
        possible_swaps: snapshot.possible_swaps,
        hint: hint.map(SwapJson::from),
        board_hash: StateHash(snapshot.board_hash),
    }
}

/// Create a shuffle message listing the new board's cookies
pub fn create_shuffle(seq: u64, cookies: &BTreeSet<Cookie>) -> ShuffleMessage {
    ShuffleMessage {
        msg_type: ShuffleMessageType::Shuffle,
        seq,
        ts: current_timestamp_ms(),
        cookies: cookies_json(cookies),
    }
}

/// Create a turn message from a resolved swap
pub fn create_turn(seq: u64, turn_id: u32, report: &TurnReport) -> TurnMessage {
    TurnMessage {
        msg_type: TurnType::Turn,
        seq,
        ts: current_timestamp_ms(),
        turn_id,
        swap: report.swap.into(),
        cascades: report.cascades.iter().map(CascadeJson::from).collect(),
        reshuffled: report.reshuffled.as_ref().map(cookies_json),
    }
}

/// Create an invalid-swap message
pub fn create_invalid_swap(seq: u64, swap: Swap) -> InvalidSwapMessage {
    InvalidSwapMessage {
        msg_type: InvalidSwapType::InvalidSwap,
        seq,
        ts: current_timestamp_ms(),
        swap: swap.into(),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap_with_direction() {
        let json = r#"{"type":"swap","seq":4,"from":{"column":3,"row":2},"direction":"Up"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Swap(msg) => {
                assert_eq!(msg.msg_type, SwapType::Swap);
                assert_eq!(msg.seq, 4);
                assert_eq!(msg.from, CellRef { column: 3, row: 2 });
                assert_eq!(msg.direction(), Some(Direction::Up));
            }
            _ => panic!("Expected Swap message"),
        }
    }

    #[test]
    fn test_parse_swap_with_target_cell() {
        let json = r#"{"type":"swap","seq":5,"from":{"column":3,"row":2},"to":{"column":2,"row":2}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Swap(msg) => assert_eq!(msg.direction(), Some(Direction::Left)),
            _ => panic!("Expected Swap message"),
        }

        let json = r#"{"type":"swap","seq":6,"from":{"column":3,"row":2},"to":{"column":4,"row":3}}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Swap(msg) => assert_eq!(msg.direction(), None),
            _ => panic!("Expected Swap message"),
        }
    }

    #[test]
    fn test_parse_shuffle_and_observe() {
        assert!(matches!(
            parse_message(r#"{"type":"shuffle","seq":1}"#).unwrap(),
            ParsedMessage::Shuffle(ShuffleCommand { seq: 1, .. })
        ));
        assert!(matches!(
            parse_message(r#"{"type":"observe","seq":2}"#).unwrap(),
            ParsedMessage::Observe(ObserveCommand { seq: 2, .. })
        ));
    }

    #[test]
    fn test_parse_unknown_type_is_not_an_error() {
        let parsed = parse_message(r#"{"type":"dance","seq":9}"#).unwrap();
        assert!(matches!(parsed, ParsedMessage::Unknown(UnknownMessage { seq: 9 })));
    }

    #[test]
    fn test_parse_bad_direction_is_an_error() {
        let json = r#"{"type":"swap","seq":1,"from":{"column":0,"row":0},"direction":"sideways"}"#;
        assert!(parse_message(json).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xabc)).unwrap();
        assert_eq!(json, "\"0000000000000abc\"");
        let parsed: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StateHash(0xabc));
        assert!(serde_json::from_str::<StateHash>("\"xyz\"").is_err());
    }

    #[test]
    fn test_outbound_messages_carry_type_tag() {
        let swap = Swap::new(Cookie::new(1, 0, CookieType::Red), Cookie::new(0, 0, CookieType::Blue));
        let msg = OutboundMessage::InvalidSwap(create_invalid_swap(3, swap));
        assert_eq!(msg.seq(), 3);

        let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "invalid_swap");
        // Canonical order puts (0, 0) first
        assert_eq!(value["swap"]["a"]["column"], 0);
        assert_eq!(value["swap"]["a"]["kind"], "blue");

        let error = create_error(4, ErrorCode::InvalidCell, "no cookie at (9, 9)");
        let value = serde_json::to_value(OutboundMessage::Error(error)).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["code"], "invalid_cell");
    }

    #[test]
    fn test_chain_json_keeps_axis_order() {
        let mut chain = Chain::new(ChainKind::Vertical);
        for row in 2..5 {
            chain.add(Cookie::new(6, row, CookieType::Yellow));
        }
        let json = ChainJson::from(&chain);
        assert_eq!(json.kind, ChainKindLower::Vertical);
        let rows: Vec<_> = json.cookies.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![2, 3, 4]);
        assert!(json.cookies.iter().all(|c| c.kind == CookieKindLower::Yellow));
    }
}
