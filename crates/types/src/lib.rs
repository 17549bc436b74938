//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental value types of the board: tiles, cookie kinds,
//! positioned cookies, swaps and chains. All types are pure data structures with no
//! external dependencies, so they can be used by the simulation core, the protocol
//! adapter and any presentation layer alike.
//!
//! # Coordinates
//!
//! Cells are addressed as `(column, row)`. Column 0 is the leftmost column and
//! **row 0 is the bottom row** of the play field. "Up" therefore means a larger row.
//!
//! # Board Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_COLUMNS` | 9 | Columns of the reference level |
//! | `DEFAULT_ROWS` | 9 | Rows of the reference level |
//! | `DEFAULT_COOKIE_KINDS` | 4 | Cookie kinds drawn in the reference level |
//! | `MIN_COOKIE_KINDS` | 3 | Fewest kinds that still allow a match-free fill |
//! | `MIN_CHAIN_LENGTH` | 3 | Shortest run that counts as a chain |
//!
//! # Identity
//!
//! A cell holds at most one live cookie, so [`Cookie`] equality, ordering and hashing
//! only look at its coordinates. [`Swap`] stores its pair in canonical order so the
//! two directions of the same exchange are structurally identical, and [`Chain`]
//! compares by the set of member coordinates.
//!
//! # Examples
//!
//! ```
//! use cookie_crunch_types::{Cookie, CookieType, Swap};
//!
//! let a = Cookie::new(3, 2, CookieType::Red);
//! let b = Cookie::new(4, 2, CookieType::Blue);
//!
//! // Same exchange regardless of direction
//! assert_eq!(Swap::new(a, b), Swap::new(b, a));
//!
//! // Identity is the cell, not the kind
//! assert_eq!(a, Cookie::new(3, 2, CookieType::Green));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Columns of the reference level (9)
pub const DEFAULT_COLUMNS: usize = 9;

/// Rows of the reference level (9)
pub const DEFAULT_ROWS: usize = 9;

/// Cookie kinds used by the reference level (4)
pub const DEFAULT_COOKIE_KINDS: u8 = 4;

/// Fewest cookie kinds a level may use.
///
/// With two already-placed neighbours per axis at most two kinds are ever excluded
/// during the initial fill, so three kinds always leave a legal draw.
pub const MIN_COOKIE_KINDS: u8 = 3;

/// Most cookie kinds a level may use (every [`CookieType`] variant)
pub const MAX_COOKIE_KINDS: u8 = CookieType::ALL.len() as u8;

/// Shortest run of same-typed cookies that forms a chain (3)
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Upper bound on regenerate-and-check rounds in a single shuffle
pub const DEFAULT_MAX_SHUFFLE_ATTEMPTS: u32 = 10_000;


/// Marks a grid cell as part of the playable shape
///
/// Tiles carry no state; they exist only where the level layout says so and never
/// change after the level is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile;

/// The cookie kinds a level can draw from
///
/// The reference level uses the first four; larger configurations add the rest in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CookieType {
    Blue,
    Red,
    Yellow,
    White,
    Green,
    Purple,
}

impl CookieType {
    /// Every kind, in draw order
    pub const ALL: [CookieType; 6] = [
        CookieType::Blue,
        CookieType::Red,
        CookieType::Yellow,
        CookieType::White,
        CookieType::Green,
        CookieType::Purple,
    ];

    /// Zero-based position in [`CookieType::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Inverse of [`CookieType::index`]
    ///
    /// # Examples
    ///
    /// ```
    /// use cookie_crunch_types::CookieType;
    ///
    /// assert_eq!(CookieType::from_index(1), Some(CookieType::Red));
    /// assert_eq!(CookieType::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cookie_crunch_types::CookieType;
    ///
    /// assert_eq!(CookieType::from_str("blue"), Some(CookieType::Blue));
    /// assert_eq!(CookieType::from_str("WHITE"), Some(CookieType::White));
    /// assert_eq!(CookieType::from_str("croissant"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blue" => Some(CookieType::Blue),
            "red" => Some(CookieType::Red),
            "yellow" => Some(CookieType::Yellow),
            "white" => Some(CookieType::White),
            "green" => Some(CookieType::Green),
            "purple" => Some(CookieType::Purple),
            _ => None,
        }
    }

    /// Lowercase name, also used as the sprite asset name
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieType::Blue => "blue",
            CookieType::Red => "red",
            CookieType::Yellow => "yellow",
            CookieType::White => "white",
            CookieType::Green => "green",
            CookieType::Purple => "purple",
        }
    }

    /// Single-letter symbol used by text board dumps
    pub fn symbol(&self) -> char {
        match self {
            CookieType::Blue => 'B',
            CookieType::Red => 'R',
            CookieType::Yellow => 'Y',
            CookieType::White => 'W',
            CookieType::Green => 'G',
            CookieType::Purple => 'P',
        }
    }

    /// Inverse of [`CookieType::symbol`] (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cookie_crunch_types::CookieType;
    ///
    /// assert_eq!(CookieType::from_symbol('y'), Some(CookieType::Yellow));
    /// assert_eq!(CookieType::from_symbol('.'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.symbol() == symbol.to_ascii_uppercase())
    }

    /// Asset name of the regular sprite
    pub fn sprite_name(&self) -> &'static str {
        self.as_str()
    }

    /// Asset name of the selected-state sprite
    ///
    /// # Examples
    ///
    /// ```
    /// use cookie_crunch_types::CookieType;
    ///
    /// assert_eq!(CookieType::Red.highlighted_sprite_name(), "red-Highlighted");
    /// ```
    pub fn highlighted_sprite_name(&self) -> String {
        format!("{}-Highlighted", self.sprite_name())
    }
}

impl fmt::Display for CookieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed token occupying one grid cell
///
/// `column` and `row` always mirror the slot that holds the cookie; the level updates
/// both together whenever a cookie moves. Equality, ordering and hashing only use the
/// coordinates (ordering is row-major from the bottom-left cell).
#[derive(Debug, Clone, Copy)]
pub struct Cookie {
    pub column: usize,
    pub row: usize,
    pub kind: CookieType,
}

impl Cookie {
    pub fn new(column: usize, row: usize, kind: CookieType) -> Self {
        Self { column, row, kind }
    }

    /// `(column, row)` of the cell holding this cookie
    pub fn position(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    fn order_key(&self) -> (usize, usize) {
        (self.row, self.column)
    }
}

impl PartialEq for Cookie {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for Cookie {}

impl Hash for Cookie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

impl PartialOrd for Cookie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cookie {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{} square:({},{})", self.kind, self.column, self.row)
    }
}

/// Swipe direction from a cell, in board coordinates (up = towards larger rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// `(column delta, row delta)` of one step in this direction
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    /// Parse direction from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// An exchange of two cookies
///
/// The pair is stored in canonical (cookie ordering) order, so `Swap::new(a, b)` and
/// `Swap::new(b, a)` are the same value. A swap is either a candidate, whose cookies
/// describe the cells before the exchange, or a record of an applied exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Swap {
    a: Cookie,
    b: Cookie,
}

impl Swap {
    pub fn new(first: Cookie, second: Cookie) -> Self {
        if second < first {
            Self { a: second, b: first }
        } else {
            Self { a: first, b: second }
        }
    }

    /// Lower cookie of the canonical pair
    pub fn a(&self) -> Cookie {
        self.a
    }

    /// Upper cookie of the canonical pair
    pub fn b(&self) -> Cookie {
        self.b
    }

    /// True if either member occupies `(column, row)`
    pub fn contains(&self, column: usize, row: usize) -> bool {
        self.a.position() == (column, row) || self.b.position() == (column, row)
    }

    /// True if the two cells share an edge
    pub fn is_adjacent(&self) -> bool {
        let dc = self.a.column.abs_diff(self.b.column);
        let dr = self.a.row.abs_diff(self.b.row);
        dc + dr == 1
    }
}

impl fmt::Display for Swap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap {} with {}", self.a, self.b)
    }
}

/// Orientation of a detected chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainKind {
    Horizontal,
    Vertical,
}

impl ChainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKind::Horizontal => "horizontal",
            ChainKind::Vertical => "vertical",
        }
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run of same-typed cookies along one row or column
///
/// Cookies are kept in the order they were found, which is along the run's axis
/// (left-to-right or bottom-to-top). Two chains are equal when they cover the same
/// cells, whatever order they were built in.
#[derive(Debug, Clone)]
pub struct Chain {
    cookies: Vec<Cookie>,
    kind: ChainKind,
}

impl Chain {
    pub fn new(kind: ChainKind) -> Self {
        Self {
            cookies: Vec::with_capacity(MIN_CHAIN_LENGTH),
            kind,
        }
    }

    pub fn add(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn first_cookie(&self) -> Option<Cookie> {
        self.cookies.first().copied()
    }

    pub fn last_cookie(&self) -> Option<Cookie> {
        self.cookies.last().copied()
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        self.cookies.iter().any(|c| c.position() == (column, row))
    }

    /// Member cells in cookie order, independent of insertion order
    fn member_key(&self) -> Vec<Cookie> {
        let mut key = self.cookies.clone();
        key.sort();
        key
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.member_key() == other.member_key()
    }
}

impl Eq for Chain {}

impl Hash for Chain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.member_key().hash(state);
    }
}

impl PartialOrd for Chain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Chain {
    fn cmp(&self, other: &Self) -> Ordering {
        self.member_key().cmp(&other.member_key())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{} cookies:[", self.kind)?;
        for (i, cookie) in self.cookies.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", cookie)?;
        }
        f.write_str("]")
    }
}
