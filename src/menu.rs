//! Main menu

use crossterm::event::KeyCode;

/// What a menu item does when selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Quit,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Play",
                    action: MenuAction::Play,
                },
                MenuItem {
                    label: "Quit",
                    action: MenuAction::Quit,
                },
            ],
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.items.len().saturating_sub(1));
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    /// Action of the highlighted item
    pub fn select(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }

    /// Navigate with arrow keys; returns an action when `confirm` is pressed
    pub fn handle_key(&mut self, code: KeyCode, confirm: bool) -> Option<MenuAction> {
        match code {
            KeyCode::Up => {
                self.move_up();
                None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_down();
                None
            }
            _ if confirm => self.select(),
            _ => None,
        }
    }
}
