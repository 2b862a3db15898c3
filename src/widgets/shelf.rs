#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

impl Key {
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            _ => None,
        }
    }
}

/// Roving tabindex over a horizontal shelf. Exactly one item is tabbable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfTrack {
    len: usize,
    active: usize,
}

impl ShelfTrack {
    pub fn new(len: usize) -> Self {
        Self { len, active: 0 }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// `0` for the active item, `-1` for the rest.
    pub fn tab_index(&self, item: usize) -> i32 {
        if item == self.active { 0 } else { -1 }
    }

    /// Moves to `index` clamped to the ends. Returns whether focus moved.
    pub fn set_active(&mut self, index: isize) -> bool {
        if self.len == 0 {
            return false;
        }
        let last = self.len as isize - 1;
        let clamped = index.clamp(0, last) as usize;
        let moved = clamped != self.active;
        self.active = clamped;
        moved
    }

    pub fn key(&mut self, key: Key) -> bool {
        let current = self.active as isize;
        match key {
            Key::ArrowLeft => self.set_active(current - 1),
            Key::ArrowRight => self.set_active(current + 1),
            Key::Home => self.set_active(0),
            Key::End => self.set_active(isize::MAX),
        }
    }

    pub fn prev(&mut self) -> bool {
        self.key(Key::ArrowLeft)
    }

    pub fn next(&mut self) -> bool {
        self.key(Key::ArrowRight)
    }

    /// An item gained focus by pointer or tab.
    pub fn focused(&mut self, item: usize) {
        if item < self.len {
            self.active = item;
        }
    }
}

/// Disabled state of the prev/next buttons for a scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Sub-pixel tolerance at either end of the track.
const EDGE: f64 = 1.0;

pub fn controls(scroll_left: f64, scroll_width: f64, client_width: f64) -> Controls {
    let max = (scroll_width - client_width).max(0.0);
    Controls {
        prev_disabled: scroll_left <= EDGE,
        next_disabled: scroll_left >= max - EDGE,
    }
}
