//! Keyboard input to per-tick intents
//!
//! Presses are collected between frames and handed to the game as one
//! [`Intents`] snapshot. Soft drop is a held action; key release events are
//! unreliable on Linux terminals, so a key counts as held while presses or
//! repeats keep arriving.

use crate::game::Intents;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub confirm: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings, dropping names we don't recognise
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key name in settings");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            rotate_cw: Self::parse_keys(&settings.keys.rotate_cw),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            confirm: Self::parse_keys(&settings.keys.confirm),
            back: Self::parse_keys(&settings.keys.back),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Collects key presses into intents
#[derive(Debug, Default)]
pub struct InputHandler {
    bindings: KeyBindings,
    /// Edges seen since the last snapshot
    pending: Intents,
    /// Last time a soft drop key was seen
    soft_drop_seen: Option<Instant>,
    /// Confirm and back keys are ignored until this instant
    confirm_blocked_until: Option<Instant>,
}

impl InputHandler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pending: Intents::default(),
            soft_drop_seen: None,
            confirm_blocked_until: None,
        }
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(KeyBindings::from_settings(settings))
    }

    /// True if the key is bound to confirm and confirming is allowed
    pub fn is_confirm(&self, code: KeyCode) -> bool {
        self.is_confirm_at(code, Instant::now())
    }

    fn is_confirm_at(&self, code: KeyCode, now: Instant) -> bool {
        !self.confirm_blocked_at(now) && self.bindings.confirm.contains(&normalize_key(code))
    }

    /// Ignore confirm and back keys for a while, so a key still held from
    /// play can't skip the game over screen
    pub fn block_confirm(&mut self, duration: Duration) {
        self.block_confirm_at(duration, Instant::now());
    }

    fn block_confirm_at(&mut self, duration: Duration, now: Instant) {
        self.confirm_blocked_until = Some(now + duration);
    }

    fn confirm_blocked_at(&self, now: Instant) -> bool {
        self.confirm_blocked_until.is_some_and(|until| now < until)
    }

    /// True if the key (or Ctrl+C) requests quitting
    pub fn is_quit(&self, key: KeyEvent) -> bool {
        (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
            || self.bindings.quit.contains(&normalize_key(key.code))
    }

    /// Handle a key press or repeat
    pub fn key_down(&mut self, key: KeyEvent) {
        self.key_down_at(key, Instant::now());
    }

    fn key_down_at(&mut self, key: KeyEvent, now: Instant) {
        if self.is_quit(key) {
            self.pending.quit = true;
            return;
        }

        let code = normalize_key(key.code);

        if self.bindings.move_left.contains(&code) {
            self.pending.move_left = true;
        } else if self.bindings.move_right.contains(&code) {
            self.pending.move_right = true;
        } else if self.bindings.rotate_cw.contains(&code) {
            self.pending.rotate_cw = true;
        } else if self.bindings.soft_drop.contains(&code) {
            self.soft_drop_seen = Some(now);
        } else if self.bindings.confirm.contains(&code) || self.bindings.back.contains(&code) {
            if !self.confirm_blocked_at(now) {
                self.pending.back_to_menu = true;
            }
        }
    }

    /// Handle a key release event (may not be called on Linux)
    pub fn key_up(&mut self, key: KeyEvent) {
        if self.bindings.soft_drop.contains(&normalize_key(key.code)) {
            self.soft_drop_seen = None;
        }
    }

    /// Request a new game (the menu's Play item)
    pub fn request_start(&mut self) {
        self.pending.start = true;
    }

    /// Request exit
    pub fn request_quit(&mut self) {
        self.pending.quit = true;
    }

    /// Take the intents for this tick and reset the edges
    pub fn take_intents(&mut self) -> Intents {
        self.take_intents_at(Instant::now())
    }

    fn take_intents_at(&mut self, now: Instant) -> Intents {
        if self
            .soft_drop_seen
            .is_some_and(|seen| now.duration_since(seen) > KEY_TIMEOUT)
        {
            self.soft_drop_seen = None;
        }

        let mut intents = std::mem::take(&mut self.pending);
        intents.soft_drop = self.soft_drop_seen.is_some();
        intents
    }

    /// Forget held keys and queued edges (a confirm block stays in place)
    pub fn clear(&mut self) {
        self.pending = Intents::default();
        self.soft_drop_seen = None;
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(KeyBindings::parse_key("Left"), Some(KeyCode::Left));
        assert_eq!(KeyBindings::parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(KeyBindings::parse_key("X"), Some(KeyCode::Char('x')));
        assert_eq!(KeyBindings::parse_key("F13ish"), None);
    }

    #[test]
    fn test_edges_are_consumed() {
        let mut input = InputHandler::default();
        input.key_down(press(KeyCode::Left));
        input.key_down(press(KeyCode::Up));

        let intents = input.take_intents();
        assert!(intents.move_left);
        assert!(intents.rotate_cw);
        assert!(!intents.move_right);

        assert_eq!(input.take_intents(), Intents::default());
    }

    #[test]
    fn test_soft_drop_held_until_timeout() {
        let mut input = InputHandler::default();
        let t0 = Instant::now();
        input.key_down_at(press(KeyCode::Down), t0);

        assert!(input.take_intents_at(t0 + Duration::from_millis(50)).soft_drop);
        assert!(input.take_intents_at(t0 + Duration::from_millis(90)).soft_drop);
        assert!(!input.take_intents_at(t0 + Duration::from_millis(150)).soft_drop);
    }

    #[test]
    fn test_soft_drop_released() {
        let mut input = InputHandler::default();
        input.key_down(press(KeyCode::Down));
        input.key_up(press(KeyCode::Down));
        assert!(!input.take_intents().soft_drop);
    }

    #[test]
    fn test_quit_keys() {
        let mut input = InputHandler::default();
        input.key_down(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.take_intents().quit);

        input.key_down(press(KeyCode::Char('Q')));
        assert!(input.take_intents().quit);
    }

    #[test]
    fn test_confirm_and_back_return_to_menu() {
        let mut input = InputHandler::default();
        input.key_down(press(KeyCode::Enter));
        assert!(input.take_intents().back_to_menu);
        input.key_down(press(KeyCode::Esc));
        assert!(input.take_intents().back_to_menu);
    }

    #[test]
    fn test_confirm_blocked_after_game_over() {
        let mut input = InputHandler::default();
        let t0 = Instant::now();
        input.block_confirm_at(Duration::from_secs(2), t0);
        input.clear();

        // A held Enter repeating right after game over does nothing
        input.key_down_at(press(KeyCode::Enter), t0 + Duration::from_millis(30));
        input.key_down_at(press(KeyCode::Esc), t0 + Duration::from_millis(60));
        assert!(!input.take_intents_at(t0 + Duration::from_millis(70)).back_to_menu);
        assert!(!input.is_confirm_at(KeyCode::Enter, t0 + Duration::from_millis(80)));

        // Other keys still work
        input.key_down_at(press(KeyCode::Char('q')), t0 + Duration::from_millis(90));
        assert!(input.take_intents_at(t0 + Duration::from_millis(100)).quit);

        let later = t0 + Duration::from_secs(2);
        input.key_down_at(press(KeyCode::Enter), later);
        assert!(input.take_intents_at(later).back_to_menu);
        assert!(input.is_confirm_at(KeyCode::Enter, later));
    }

    #[test]
    fn test_request_start() {
        let mut input = InputHandler::default();
        input.request_start();
        let intents = input.take_intents();
        assert!(intents.start);
        assert!(!intents.quit);
    }
}
