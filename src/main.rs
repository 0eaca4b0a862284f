//! BLOCKFALL - a falling-block puzzle game for the terminal

mod audio;
mod board;
mod game;
mod input;
mod menu;
mod piece;
mod randomizer;
mod score;
mod settings;
mod tetromino;
mod ui;

use audio::AudioManager;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Game, GameEvent, GameState};
use input::InputHandler;
use menu::{Menu, MenuAction};
use ratatui::{Terminal, backend::CrosstermBackend};
use score::{ScoreDisplay, ScoreLog};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Input delay after game over to prevent accidental menu return
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(2);

/// Get the log directory, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so output never lands on the game screen
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    match settings.save_if_missing() {
        Ok(true) => tracing::info!("wrote default settings"),
        Ok(false) => {}
        Err(e) => tracing::warn!("could not write default settings: {}", e),
    }

    let mut audio = AudioManager::new(&settings.audio);
    if let Some(audio) = &mut audio {
        audio.play_bgm();
    }

    let fall_delay = settings.gameplay.fall_delay();
    let mut game = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(fall_delay, seed),
        None => Game::new(fall_delay),
    };
    let score_display = ScoreDisplay::new();
    game.attach_score_listener(Box::new(score_display.clone()));
    game.attach_score_listener(Box::new(ScoreLog));

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut input = InputHandler::from_settings(&settings);
    let result = run_app(&mut terminal, &mut game, &mut input, &score_display, &mut audio);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if result.is_ok() {
        println!("\nThanks for playing BLOCKFALL!");
        println!("Last Score: {}", score_display.get());
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &mut InputHandler,
    score: &ScoreDisplay,
    audio: &mut Option<AudioManager>,
) -> io::Result<()> {
    let mut menu = Menu::new();
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| match game.state() {
            GameState::Menu => ui::render_menu(frame, &menu),
            GameState::Playing | GameState::GameOver => ui::render_game(frame, game, score),
        })?;

        // Drain every pending event before ticking
        let mut timeout = FRAME_DURATION.saturating_sub(last_tick.elapsed());
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let Event::Key(key) = event::read()? else {
                continue;
            };

            match key.kind {
                KeyEventKind::Release => input.key_up(key),
                // Repeats from a key held through game over must not pick a menu item
                KeyEventKind::Repeat if game.state() != GameState::Playing && !input.is_quit(key) => {}
                _ if game.state() == GameState::Menu && !input.is_quit(key) => {
                    match menu.handle_key(key.code, input.is_confirm(key.code)) {
                        Some(MenuAction::Play) => input.request_start(),
                        Some(MenuAction::Quit) => input.request_quit(),
                        None => {}
                    }
                }
                _ => input.key_down(key),
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        last_tick = now;

        let intents = input.take_intents();
        if intents.quit {
            tracing::info!(score = game.score(), "quit requested");
            return Ok(());
        }

        for event in game.tick(elapsed, &intents) {
            tracing::trace!(?event, "game event");
            if event == GameEvent::GameOver {
                input.block_confirm(GAME_OVER_INPUT_DELAY);
            }
            if let Some(audio) = audio {
                audio.handle_event(event);
            }
        }

        if game.state() != GameState::Playing {
            // Held keys don't carry over into menus
            input.clear();
        }
    }
}
