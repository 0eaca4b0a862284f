//! Score broadcasting
//!
//! The game owns a [`ScoreNotifier`]; anything that wants to show or record
//! the score registers a [`ScoreListener`] with it instead of reading game
//! internals.

use std::cell::Cell;
use std::rc::Rc;

/// Points awarded per cleared line
pub const POINTS_PER_LINE: u32 = 100;

/// Receives every score change
pub trait ScoreListener {
    fn on_score_changed(&mut self, score: u32);
}

/// Holds the score and the listeners observing it
#[derive(Default)]
pub struct ScoreNotifier {
    score: u32,
    listeners: Vec<Box<dyn ScoreListener>>,
}

impl std::fmt::Debug for ScoreNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreNotifier")
            .field("score", &self.score)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ScoreNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn attach(&mut self, listener: Box<dyn ScoreListener>) {
        self.listeners.push(listener);
    }

    /// Overwrite the score and notify every listener before returning
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        for listener in &mut self.listeners {
            listener.on_score_changed(score);
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

/// Display adapter: keeps the last broadcast score for the renderer
///
/// Clones share the same value, so one clone is attached to the notifier and
/// another is read by the UI.
#[derive(Debug, Clone, Default)]
pub struct ScoreDisplay {
    current: Rc<Cell<u32>>,
}

impl ScoreDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u32 {
        self.current.get()
    }
}

impl ScoreListener for ScoreDisplay {
    fn on_score_changed(&mut self, score: u32) {
        self.current.set(score);
    }
}

/// Writes score changes to the log
#[derive(Debug, Default)]
pub struct ScoreLog;

impl ScoreListener for ScoreLog {
    fn on_score_changed(&mut self, score: u32) {
        tracing::debug!(score, "score changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        id: u8,
        seen: Rc<RefCell<Vec<(u8, u32)>>>,
    }

    impl ScoreListener for Recorder {
        fn on_score_changed(&mut self, score: u32) {
            self.seen.borrow_mut().push((self.id, score));
        }
    }

    #[test]
    fn test_set_score_without_listeners() {
        let mut notifier = ScoreNotifier::new();
        notifier.set_score(300);
        assert_eq!(notifier.score(), 300);
    }

    #[test]
    fn test_listeners_called_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ScoreNotifier::new();
        for id in 0..3 {
            notifier.attach(Box::new(Recorder {
                id,
                seen: Rc::clone(&seen),
            }));
        }

        notifier.set_score(100);
        notifier.set_score(0);

        assert_eq!(
            *seen.borrow(),
            vec![(0, 100), (1, 100), (2, 100), (0, 0), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn test_display_tracks_score() {
        let display = ScoreDisplay::new();
        let mut notifier = ScoreNotifier::new();
        notifier.attach(Box::new(display.clone()));
        notifier.attach(Box::new(ScoreLog));

        assert_eq!(display.get(), 0);
        notifier.set_score(400);
        assert_eq!(display.get(), 400);
    }
}
