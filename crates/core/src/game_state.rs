//! Game state module - the turn machine around a level
//!
//! A turn moves through `Idle -> Validating -> Applying -> Resolving -> Idle`.
//! A swap outside the legal set goes straight back to `Idle` and leaves the board
//! untouched. While resolving, every [`GameState::resolve_step`] removes one round of
//! chains and settles the board, until a round finds no chain. The legal swaps are
//! then recomputed and, if none are left, the board is reshuffled.
//!
//! Callers that animate each cascade drive `resolve_step` themselves. Everyone else
//! uses [`GameState::play_swap`], which runs the whole turn and returns a report.

use std::collections::BTreeSet;

use log::debug;
use rand::Rng;

use crate::config::LevelConfig;
use crate::layout::TileLayout;
use crate::level::Level;
use crate::rng::DefaultRng;
use crate::types::{Chain, Cookie, Direction, Swap};

/// Where the current turn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    Validating,
    Applying,
    Resolving,
}

/// One round of the cascade: what was removed, what fell, what was added
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeStep {
    pub chains: BTreeSet<Chain>,
    /// Per column, lowest cookie first
    pub falls: Vec<Vec<Cookie>>,
    /// Per column, highest cookie first
    pub top_ups: Vec<Vec<Cookie>>,
}

/// Result of a single [`GameState::resolve_step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStep {
    Cascade(CascadeStep),
    /// No chain left; the turn is over
    Settled {
        /// Cookies of a new board if no legal swap remained
        reshuffled: Option<BTreeSet<Cookie>>,
    },
}

/// Everything that happened during one accepted swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub swap: Swap,
    pub cascades: Vec<CascadeStep>,
    pub reshuffled: Option<BTreeSet<Cookie>>,
}

impl TurnReport {
    /// Number of cookies removed over all cascades; crossing cookies count once
    pub fn removed_cookies(&self) -> usize {
        self.cascades
            .iter()
            .map(|step| {
                step.chains
                    .iter()
                    .flat_map(|chain| chain.cookies().iter().copied())
                    .collect::<BTreeSet<Cookie>>()
                    .len()
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Not a legal swap; nothing changed
    Rejected(Swap),
    Resolved(TurnReport),
}

/// A level plus the phase of the turn being played on it
#[derive(Debug, Clone)]
pub struct GameState<R = DefaultRng> {
    level: Level<R>,
    phase: TurnPhase,
    /// Monotonic id of accepted swaps (increments when a swap is applied).
    turn_id: u32,
}

impl GameState<DefaultRng> {
    /// Create a game on `layout` seeded with `seed`; call [`GameState::start`] to fill it
    pub fn new(config: LevelConfig, layout: TileLayout, seed: u64) -> Self {
        Self::with_level(Level::seeded(config, layout, seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Wrap an existing level, taking its cookies as the current board
    pub fn with_level(mut level: Level<R>) -> Self {
        level.detect_possible_swaps();
        Self {
            level,
            phase: TurnPhase::Idle,
            turn_id: 0,
        }
    }

    /// Fill the board for a new game and return the created cookies
    pub fn start(&mut self) -> BTreeSet<Cookie> {
        self.turn_id = 0;
        self.reshuffle()
    }

    /// Replace the board with a fresh one that has at least one legal swap
    pub fn reshuffle(&mut self) -> BTreeSet<Cookie> {
        self.phase = TurnPhase::Idle;
        self.level.shuffle()
    }

    pub fn level(&self) -> &Level<R> {
        &self.level
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn_id(&self) -> u32 {
        self.turn_id
    }

    /// The swap a swipe from (column, row) towards `direction` asks for
    ///
    /// None when either cell is outside the grid or holds no cookie. Whether the swap
    /// is legal is decided later by [`GameState::propose_swap`].
    pub fn swap_from(&self, column: usize, row: usize, direction: Direction) -> Option<Swap> {
        let cookies = self.level.cookies();
        if !cookies.in_bounds(column, row) {
            return None;
        }
        let (to_column, to_row) = cookies.neighbour(column, row, direction.offset())?;
        let from = cookies.get(column, row)?;
        let to = cookies.get(to_column, to_row)?;
        Some(Swap::new(from, to))
    }

    /// Validate and apply a swap
    ///
    /// Returns true when the swap was applied and the turn is now resolving. A swap
    /// outside the legal set, or one proposed while a turn is still resolving, is
    /// refused without touching the board.
    pub fn propose_swap(&mut self, swap: &Swap) -> bool {
        if self.phase != TurnPhase::Idle {
            return false;
        }

        self.phase = TurnPhase::Validating;
        if !self.level.is_possible_swap(swap) {
            debug!("rejected swap {}", swap);
            self.phase = TurnPhase::Idle;
            return false;
        }

        self.phase = TurnPhase::Applying;
        self.level.perform_swap(swap);
        self.turn_id = self.turn_id.wrapping_add(1);
        self.phase = TurnPhase::Resolving;
        true
    }

    /// Run one round of the cascade
    ///
    /// Returns None unless a turn is resolving.
    pub fn resolve_step(&mut self) -> Option<ResolveStep> {
        if self.phase != TurnPhase::Resolving {
            return None;
        }

        let chains = self.level.remove_matches();
        if chains.is_empty() {
            self.level.detect_possible_swaps();
            let reshuffled = if self.level.possible_swaps().is_empty() {
                debug!("turn {}: no legal swap left, reshuffling", self.turn_id);
                Some(self.level.shuffle())
            } else {
                None
            };
            self.phase = TurnPhase::Idle;
            return Some(ResolveStep::Settled { reshuffled });
        }

        let falls = self.level.fill_holes();
        let top_ups = self.level.top_up_cookies();
        debug!(
            "turn {}: cascade removed {} chains",
            self.turn_id,
            chains.len()
        );
        Some(ResolveStep::Cascade(CascadeStep { chains, falls, top_ups }))
    }

    /// Play a whole turn: validate, apply and resolve until the board is stable
    pub fn play_swap(&mut self, swap: Swap) -> SwapOutcome {
        if !self.propose_swap(&swap) {
            return SwapOutcome::Rejected(swap);
        }

        let mut cascades = Vec::new();
        while let Some(step) = self.resolve_step() {
            match step {
                ResolveStep::Cascade(cascade) => cascades.push(cascade),
                ResolveStep::Settled { reshuffled } => {
                    return SwapOutcome::Resolved(TurnReport {
                        swap,
                        cascades,
                        reshuffled,
                    });
                }
            }
        }

        // resolve_step only stops by settling
        SwapOutcome::Resolved(TurnReport {
            swap,
            cascades,
            reshuffled: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CookieType;
    use rand::RngCore;

    fn new_game(seed: u64) -> GameState {
        let mut game = GameState::new(LevelConfig::default(), TileLayout::full(9, 9), seed);
        game.start();
        game
    }

    #[test]
    fn test_start_leaves_game_idle_with_moves() {
        let game = new_game(1);
        assert_eq!(game.phase(), TurnPhase::Idle);
        assert_eq!(game.turn_id(), 0);
        assert_eq!(game.level().cookie_count(), 81);
        assert!(!game.level().possible_swaps().is_empty());
    }

    #[test]
    fn test_illegal_swap_is_rejected_without_mutation() {
        let mut game = new_game(2);
        let before = game.level().cookies().clone();

        // Find an adjacent pair that is not legal
        let swap = (0..9)
            .flat_map(|row| (0..8).map(move |column| (column, row)))
            .filter_map(|(column, row)| game.swap_from(column, row, Direction::Right))
            .find(|swap| !game.level().is_possible_swap(swap))
            .expect("a 9x9 board has an illegal swap");

        assert_eq!(game.play_swap(swap), SwapOutcome::Rejected(swap));
        assert_eq!(game.level().cookies(), &before);
        assert_eq!(game.phase(), TurnPhase::Idle);
        assert_eq!(game.turn_id(), 0);
    }

    #[test]
    fn test_legal_swap_resolves_to_stable_board() {
        let mut game = new_game(3);
        let swap = game.level().hint().unwrap();

        let SwapOutcome::Resolved(report) = game.play_swap(swap) else {
            panic!("hint should be legal");
        };
        assert!(!report.cascades.is_empty());
        assert!(report.removed_cookies() >= 3);
        assert_eq!(game.phase(), TurnPhase::Idle);
        assert_eq!(game.turn_id(), 1);

        // Board is full and has no chains left
        assert_eq!(game.level().cookie_count(), 81);
        assert!(game.level().detect_horizontal_matches().is_empty());
        assert!(game.level().detect_vertical_matches().is_empty());
        assert!(!game.level().possible_swaps().is_empty());
    }

    #[test]
    fn test_step_by_step_matches_phases() {
        let mut game = new_game(4);
        let swap = game.level().hint().unwrap();

        assert!(game.resolve_step().is_none());
        assert!(game.propose_swap(&swap));
        assert_eq!(game.phase(), TurnPhase::Resolving);
        // No second swap while resolving
        assert!(!game.propose_swap(&swap));

        let first = game.resolve_step().unwrap();
        assert!(matches!(first, ResolveStep::Cascade(_)));

        let mut steps = 1;
        while let Some(step) = game.resolve_step() {
            steps += 1;
            if let ResolveStep::Settled { .. } = step {
                break;
            }
            assert!(steps < 100, "cascade did not settle");
        }
        assert_eq!(game.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_swap_from_checks_bounds_and_cookies() {
        let game = new_game(5);
        assert!(game.swap_from(0, 0, Direction::Left).is_none());
        assert!(game.swap_from(0, 0, Direction::Down).is_none());
        assert!(game.swap_from(8, 8, Direction::Up).is_none());
        assert!(game.swap_from(9, 0, Direction::Left).is_none());

        let swap = game.swap_from(4, 4, Direction::Up).unwrap();
        assert!(swap.contains(4, 4));
        assert!(swap.contains(4, 5));
    }

    #[test]
    fn test_with_level_reads_existing_board() {
        let config = LevelConfig::new(4, 1).unwrap();
        let mut level = Level::seeded(config, TileLayout::full(4, 1), 0);
        level.place_cookie(0, 0, CookieType::Red);
        level.place_cookie(1, 0, CookieType::Red);
        level.place_cookie(2, 0, CookieType::Blue);
        level.place_cookie(3, 0, CookieType::Red);

        let game = GameState::with_level(level);
        assert_eq!(game.level().possible_swaps().len(), 1);
        assert_eq!(
            game.level().hint(),
            Some(Swap::new(Cookie::new(2, 0, CookieType::Blue), Cookie::new(3, 0, CookieType::Red)))
        );
    }

    #[test]
    fn test_single_row_turn_settles_with_moves() {
        // R R B R: swapping the last two clears three cookies that have nothing to fall
        let config = LevelConfig::new(4, 1).unwrap();
        let mut level = Level::seeded(config, TileLayout::full(4, 1), 9);
        level.place_cookie(0, 0, CookieType::Red);
        level.place_cookie(1, 0, CookieType::Red);
        level.place_cookie(2, 0, CookieType::Blue);
        level.place_cookie(3, 0, CookieType::Red);

        let mut game = GameState::with_level(level);
        let swap = Swap::new(Cookie::new(2, 0, CookieType::Blue), Cookie::new(3, 0, CookieType::Red));
        let SwapOutcome::Resolved(report) = game.play_swap(swap) else {
            panic!("swap should be legal");
        };

        // Consecutive top-ups differ, so the refill cannot chain again
        assert_eq!(report.cascades.len(), 1);
        let cascade = &report.cascades[0];
        assert_eq!(cascade.chains.len(), 1);
        assert!(cascade.falls.is_empty());
        assert_eq!(cascade.top_ups.len(), 3);
        assert_eq!(report.removed_cookies(), 3);

        // Either the refill left a move or the board was reshuffled into one
        match &report.reshuffled {
            None => assert_eq!(game.level().cookie_at(3, 0).unwrap().kind, CookieType::Blue),
            Some(created) => assert_eq!(created.len(), 4),
        }
        assert!(!game.level().possible_swaps().is_empty());
        assert_eq!(game.level().cookie_count(), 4);
    }

    /// Always draws the first allowed kind
    struct FirstKindRng;

    impl RngCore for FirstKindRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn test_settled_board_without_moves_is_reshuffled() {
        // R R Y R: the swap clears the reds and the refill leaves B R B Y, which has no move
        let config = LevelConfig::new(4, 1).unwrap();
        let mut level = Level::new(config, TileLayout::full(4, 1), FirstKindRng);
        level.place_cookie(0, 0, CookieType::Red);
        level.place_cookie(1, 0, CookieType::Red);
        level.place_cookie(2, 0, CookieType::Yellow);
        level.place_cookie(3, 0, CookieType::Red);

        let mut game = GameState::with_level(level);
        let swap = game.swap_from(2, 0, Direction::Right).unwrap();
        let SwapOutcome::Resolved(report) = game.play_swap(swap) else {
            panic!("swap should be legal");
        };

        assert_eq!(report.cascades.len(), 1);
        let refill: Vec<_> = report.cascades[0].top_ups.iter().flatten().map(|c| c.kind).collect();
        assert_eq!(refill, vec![CookieType::Blue, CookieType::Red, CookieType::Blue]);

        let created = report.reshuffled.expect("board without moves must be reshuffled");
        assert_eq!(created.len(), 4);
        assert_eq!(game.phase(), TurnPhase::Idle);
        assert_eq!(game.level().snapshot().rows_top_down(), vec!["BBRB".to_string()]);
        assert_eq!(game.level().possible_swaps().len(), 1);
    }
}
