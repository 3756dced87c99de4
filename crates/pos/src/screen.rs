//! Navigation between the counter's two screens.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Order entry and payment.
    Home,
    /// Past transactions with client search.
    TransactionHistory,
}

/// Stack of open screens; `Home` is always at the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenStack {
    stack: Vec<Screen>,
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self {
            stack: vec![Screen::Home],
        }
    }
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Home)
    }

    /// Push `screen` unless it is already showing.
    pub fn navigate(&mut self, screen: Screen) {
        if self.current() != screen {
            self.stack.push(screen);
        }
    }

    /// Pop the top screen. Returns `false` when already at `Home`.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
