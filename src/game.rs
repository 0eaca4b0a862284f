//! Core game state and logic

use crate::board::Board;
use crate::piece::Piece;
use crate::randomizer::Randomizer;
use crate::score::{ScoreListener, ScoreNotifier, POINTS_PER_LINE};
use std::time::Duration;

/// Gravity interval used when settings don't override it
pub const DEFAULT_FALL_DELAY: Duration = Duration::from_millis(500);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
}

/// Player intents for a single tick
///
/// Movement and rotation are edges (one step per press); `soft_drop` is
/// level-triggered and stays set while the key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intents {
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_cw: bool,
    pub soft_drop: bool,
    pub start: bool,
    pub back_to_menu: bool,
    pub quit: bool,
}

/// Notifications for the audio and UI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    PieceLocked,
    LineCleared(u32),
    GameOver,
    ReturnedToMenu,
}

/// The main game struct
#[derive(Debug)]
pub struct Game {
    /// The playing field
    pub board: Board,
    /// Current falling piece (only while playing)
    pub current_piece: Option<Piece>,
    score: ScoreNotifier,
    state: GameState,
    /// Time accumulated toward the next gravity step
    fall_timer: Duration,
    fall_delay: Duration,
    randomizer: Randomizer,
    /// Set once the game-over event has been emitted for this round
    game_over_signalled: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(DEFAULT_FALL_DELAY)
    }
}

impl Game {
    /// Create a new game sitting in the menu
    pub fn new(fall_delay: Duration) -> Self {
        Self::with_randomizer(fall_delay, Randomizer::new())
    }

    /// Create a new game with a fixed piece sequence
    pub fn with_seed(fall_delay: Duration, seed: u64) -> Self {
        Self::with_randomizer(fall_delay, Randomizer::with_seed(seed))
    }

    fn with_randomizer(fall_delay: Duration, randomizer: Randomizer) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            score: ScoreNotifier::new(),
            state: GameState::Menu,
            fall_timer: Duration::ZERO,
            fall_delay,
            randomizer,
            game_over_signalled: false,
        }
    }

    /// Register an observer for score changes
    pub fn attach_score_listener(&mut self, listener: Box<dyn ScoreListener>) {
        self.score.attach(listener);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    /// Advance the game by one step
    ///
    /// Input is applied before gravity, and gravity before lock/clear/spawn.
    pub fn tick(&mut self, elapsed: Duration, intents: &Intents) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self.state {
            GameState::Menu => {
                if intents.start {
                    self.start();
                    events.push(GameEvent::Started);
                }
            }
            GameState::Playing => self.tick_playing(elapsed, intents, &mut events),
            GameState::GameOver => {
                if intents.back_to_menu {
                    tracing::info!("returning to menu");
                    self.state = GameState::Menu;
                    events.push(GameEvent::ReturnedToMenu);
                }
            }
        }

        events
    }

    fn start(&mut self) {
        tracing::info!("starting new game");
        self.board.reset();
        self.score.set_score(0);
        self.fall_timer = Duration::ZERO;
        self.game_over_signalled = false;
        self.state = GameState::Playing;
        // The field is empty, so this spawn can't top out
        self.spawn_piece(&mut Vec::new());
    }

    fn tick_playing(&mut self, elapsed: Duration, intents: &Intents, events: &mut Vec<GameEvent>) {
        if intents.move_left {
            self.try_move(-1, 0);
        }
        if intents.move_right {
            self.try_move(1, 0);
        }
        if intents.rotate_cw {
            self.try_rotate();
        }

        self.fall_timer += elapsed;
        if self.fall_timer >= self.fall_delay || intents.soft_drop {
            self.fall_timer = Duration::ZERO;
            if !self.try_move(0, 1) {
                self.lock_piece(events);
            }
        }
    }

    /// Move the current piece, undoing the move if it collides
    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = &mut self.current_piece else {
            return false;
        };
        piece.move_by(dx, dy);
        if self.board.is_blocked(&piece.world_cells()) {
            piece.move_by(-dx, -dy);
            false
        } else {
            true
        }
    }

    /// Rotate the current piece, undoing the rotation if it collides
    fn try_rotate(&mut self) -> bool {
        let Some(piece) = &mut self.current_piece else {
            return false;
        };
        piece.rotate();
        if self.board.is_blocked(&piece.world_cells()) {
            piece.rotate_back();
            false
        } else {
            true
        }
    }

    /// Lock the current piece, clear lines, and spawn the next one
    fn lock_piece(&mut self, events: &mut Vec<GameEvent>) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board.lock(&piece);
        tracing::debug!(
            piece = piece.piece_type.name(),
            col = piece.col,
            row = piece.row,
            "piece locked"
        );
        events.push(GameEvent::PieceLocked);

        let lines = self.board.clear_full_lines();
        if lines > 0 {
            let score = self.score.score().saturating_add(lines * POINTS_PER_LINE);
            self.score.set_score(score);
            tracing::info!(lines, score, "lines cleared");
            events.push(GameEvent::LineCleared(lines));
        }

        self.spawn_piece(events);
    }

    /// Spawn a random piece, ending the game if the spawn cell is taken
    fn spawn_piece(&mut self, events: &mut Vec<GameEvent>) {
        let piece = Piece::new(self.randomizer.next());

        if self.board.is_blocked(&piece.world_cells()) {
            tracing::info!(score = self.score.score(), "game over");
            self.current_piece = None;
            self.state = GameState::GameOver;
            if !self.game_over_signalled {
                self.game_over_signalled = true;
                events.push(GameEvent::GameOver);
            }
            return;
        }

        tracing::debug!(piece = piece.piece_type.name(), "spawned");
        self.current_piece = Some(piece);
    }
}
