use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Records visible in the spotlight at once.
pub const WINDOW: usize = 4;
/// Automatic advance period when motion is allowed.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(12);
/// `localStorage` key holding today's order.
pub const STORAGE_KEY: &str = "waypoint-spotlight";

const MODULUS: u64 = 2_147_483_647;

/// Deterministic Fisher-Yates permutation of `0..len` seeded by `key`.
/// The browser computes the same permutation from the same key.
pub fn seeded_order(len: usize, key: &str) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut seed: u64 = 0;
    for ch in key.chars() {
        let mut units = [0u16; 2];
        let code = ch.encode_utf16(&mut units)[0];
        seed = (seed * 31 + u64::from(code)) % MODULUS;
    }
    if seed == 0 {
        seed = 1;
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut state = seed;
    for i in (1..len).rev() {
        state = (state * 1_103_515_245 + 12_345) % MODULUS;
        let j = (state % (i as u64 + 1)) as usize;
        indices.swap(i, j);
    }
    indices
}

/// The shuffle changes once per UTC day.
pub fn spotlight_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// What `localStorage[STORAGE_KEY]` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub key: String,
    pub order: Vec<usize>,
}

impl StoredOrder {
    /// A stored order is reused only for the same day and the same record count.
    fn usable(&self, key: &str, len: usize) -> bool {
        if self.key != key || self.order.len() != len {
            return false;
        }
        let mut seen = vec![false; len];
        self.order
            .iter()
            .all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroRotation {
    order: Vec<usize>,
    offset: usize,
    window: usize,
    reduced_motion: bool,
}

impl HeroRotation {
    /// Under reduced motion the server-rendered order stays put and neither
    /// the timer nor the shuffle button moves it.
    pub fn new(len: usize, key: &str, stored: Option<&StoredOrder>, reduced_motion: bool) -> Self {
        let order = if reduced_motion {
            (0..len).collect()
        } else {
            match stored {
                Some(stored) if stored.usable(key, len) => stored.order.clone(),
                _ => seeded_order(len, key),
            }
        };
        Self {
            window: WINDOW.min(len),
            order,
            offset: 0,
            reduced_motion,
        }
    }

    /// What to write back to storage, if anything.
    pub fn to_store(&self, key: &str) -> Option<StoredOrder> {
        (!self.reduced_motion && !self.order.is_empty()).then(|| StoredOrder {
            key: key.to_owned(),
            order: self.order.clone(),
        })
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Record indices currently shown, wrapping around the order.
    pub fn visible(&self) -> Vec<usize> {
        (0..self.window)
            .map(|i| self.order[(self.offset + i) % self.order.len()])
            .collect()
    }

    /// Whether the periodic timer should be started at all.
    pub fn rotates(&self) -> bool {
        !self.reduced_motion && self.order.len() > self.window
    }

    /// Shows the next window. Returns whether anything changed.
    pub fn advance(&mut self) -> bool {
        if self.reduced_motion || self.order.is_empty() {
            return false;
        }
        let next = (self.offset + self.window) % self.order.len();
        let changed = next != self.offset;
        self.offset = next;
        changed
    }

    pub fn tick(&mut self) -> bool {
        self.rotates() && self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_order_is_a_stable_permutation() {
        let a = seeded_order(10, "2024-05-01");
        let b = seeded_order(10, "2024-05-01");
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
        assert_ne!(seeded_order(10, "2024-05-02"), a);
        assert!(seeded_order(0, "x").is_empty());
        assert_eq!(seeded_order(1, ""), vec![0]);
    }

    #[test]
    fn seeded_order_matches_lcg_by_hand() {
        // key "a": seed 97; i=1: state = (97 * 1103515245 + 12345) % (2^31 - 1)
        let state = (97u64 * 1_103_515_245 + 12_345) % MODULUS;
        let expected = if state % 2 == 0 { vec![1, 0] } else { vec![0, 1] };
        assert_eq!(seeded_order(2, "a"), expected);
    }

    #[test]
    fn key_is_the_iso_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        assert_eq!(spotlight_key(day), "2024-05-01");
    }

    #[test]
    fn rotation_walks_windows_and_wraps() {
        let mut hero = HeroRotation::new(6, "2024-05-01", None, false);
        let order = hero.order().to_vec();
        assert_eq!(hero.visible(), order[..4].to_vec());
        assert!(hero.tick());
        assert_eq!(hero.visible(), vec![order[4], order[5], order[0], order[1]]);
    }

    #[test]
    fn stored_order_is_reused_only_when_valid() {
        let stored = StoredOrder {
            key: "2024-05-01".to_owned(),
            order: vec![2, 0, 1],
        };
        let hero = HeroRotation::new(3, "2024-05-01", Some(&stored), false);
        assert_eq!(hero.order(), &[2, 0, 1]);

        let stale = HeroRotation::new(3, "2024-05-02", Some(&stored), false);
        assert_eq!(stale.order(), seeded_order(3, "2024-05-02").as_slice());

        let broken = StoredOrder {
            key: "2024-05-01".to_owned(),
            order: vec![0, 0, 1],
        };
        let hero = HeroRotation::new(3, "2024-05-01", Some(&broken), false);
        assert_eq!(hero.order(), seeded_order(3, "2024-05-01").as_slice());
    }

    #[test]
    fn reduced_motion_disables_every_rotation() {
        let mut hero = HeroRotation::new(8, "2024-05-01", None, true);
        assert_eq!(hero.visible(), vec![0, 1, 2, 3]);
        assert!(!hero.rotates());
        assert!(!hero.tick());
        assert!(!hero.advance());
        assert_eq!(hero.visible(), vec![0, 1, 2, 3]);
        assert_eq!(hero.to_store("2024-05-01"), None);
    }

    #[test]
    fn small_catalog_does_not_rotate() {
        let mut hero = HeroRotation::new(3, "k", None, false);
        assert_eq!(hero.visible().len(), 3);
        assert!(!hero.tick());
    }
}
