/// Keys a flip card reacts to; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Click on any `[data-book-toggle]`.
    ToggleClick,
    /// Keydown on a non-button toggle (the cover figure).
    ToggleKey(Key),
    /// Keydown anywhere inside the card.
    CardKey(Key),
    /// The stretched front-face link received focus.
    FrontLinkFocused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// `.book__summary` on the back face.
    Summary,
    /// The first `[data-book-toggle]`.
    Trigger,
}

/// Result of one event: whether the card is flipped afterwards and where
/// focus should move, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub flipped: bool,
    pub focus: Option<Focus>,
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipCard {
    flipped: bool,
    has_preview: bool,
}

impl FlipCard {
    /// Cards without a synopsis have no toggles and never flip.
    pub fn new(has_preview: bool) -> Self {
        Self {
            flipped: false,
            has_preview,
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Mirrors `aria-expanded` on every toggle.
    pub fn aria_expanded(&self) -> &'static str {
        if self.flipped { "true" } else { "false" }
    }

    fn set(&mut self, flipped: bool, focus: Option<Focus>, prevent_default: bool) -> Effect {
        self.flipped = flipped;
        Effect {
            flipped,
            focus,
            prevent_default,
        }
    }

    fn toggle(&mut self) -> Effect {
        let flipped = !self.flipped;
        self.set(flipped, flipped.then_some(Focus::Summary), true)
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        if !self.has_preview {
            return self.set(false, None, false);
        }
        match event {
            Event::ToggleClick => self.toggle(),
            Event::ToggleKey(Key::Enter | Key::Space) => self.toggle(),
            Event::CardKey(Key::Escape) if self.flipped => {
                self.set(false, Some(Focus::Trigger), false)
            }
            Event::FrontLinkFocused if self.flipped => self.set(false, None, false),
            _ => self.set(self.flipped, None, false),
        }
    }
}
