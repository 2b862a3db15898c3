//! Interaction models for the page widgets. Each type here is the state
//! machine a script in `assets/js` drives; the DOM glue stays in the script.
//!
//! Nothing in the build calls into this module. The shipped scripts carry the
//! behaviour in the browser, and these types are the reference they are kept
//! in step with: the unit tests below each widget pin the transitions the
//! matching script implements (`app.js` for cards and mounting, `home.js` for
//! the spotlight and shelves, `record.js` for the reading room and citation).

pub mod citation;
pub mod flip_card;
pub mod hero;
pub mod reading_room;
pub mod shelf;

use std::collections::HashSet;

/// Remembers which elements already have listeners attached, so re-rendered
/// regions can be mounted again without doubling handlers. The browser keeps
/// the same mark as `data-book-ready` on the element.
#[derive(Debug, Default)]
pub struct MountRegistry {
    mounted: HashSet<String>,
}

impl MountRegistry {
    /// Returns `true` only the first time `key` is seen.
    pub fn mount(&mut self, key: impl Into<String>) -> bool {
        self.mounted.insert(key.into())
    }

    /// Mounts every key in `scope`, returning the ones that were new.
    pub fn mount_all<'a>(&mut self, scope: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        scope.into_iter().filter(|key| self.mount(*key)).collect()
    }

    pub fn is_mounted(&self, key: &str) -> bool {
        self.mounted.contains(key)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}
