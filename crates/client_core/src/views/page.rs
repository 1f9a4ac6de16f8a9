use std::fmt;

use super::CardView;

/// Page shell: catalog grid, basket counter and scroll lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub catalog: Vec<CardView>,
    pub counter: usize,
    pub locked: bool,
    pub scroll_position: usize,
    saved_scroll: usize,
}

impl PageView {
    pub fn set_catalog(&mut self, cards: Vec<CardView>) {
        self.catalog = cards;
    }

    pub fn set_counter(&mut self, counter: usize) {
        self.counter = counter;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Scrolling is ignored while the page is locked behind a modal.
    pub fn scroll_to(&mut self, position: usize) {
        if !self.locked {
            self.scroll_position = position.min(self.catalog.len().saturating_sub(1));
        }
    }

    pub fn save_scroll_position(&mut self) {
        self.saved_scroll = self.scroll_position;
    }

    pub fn restore_scroll_position(&mut self) {
        self.scroll_position = self.saved_scroll;
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Storefront  [basket: {}]", self.counter)?;
        if self.catalog.is_empty() {
            return write!(f, "  (catalog is empty)");
        }
        let visible = self.catalog.iter().enumerate().skip(self.scroll_position);
        for (position, card) in visible {
            writeln!(f, "  {:>2}. {card}", position + 1)?;
        }
        Ok(())
    }
}
