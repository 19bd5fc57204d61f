//! Shelf life of opened items.

use serde::{Deserialize, Serialize};

/// Name fragments that mark slow-spoiling goods (matched case-insensitively).
pub const DEFAULT_SLOW_SPOILING_MARKERS: &[&str] =
    &["frozen meat", "cheese", "vacuum-sealed", "hard cheese"];

/// How many days an item stays good once opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfLifePolicy {
    /// Days for ordinary perishables.
    pub short_days: u32,
    /// Days for items whose name contains a slow-spoiling marker.
    pub long_days: u32,
    pub slow_spoiling_markers: Vec<String>,
}

impl Default for ShelfLifePolicy {
    fn default() -> Self {
        Self {
            short_days: 3,
            long_days: 7,
            slow_spoiling_markers: DEFAULT_SLOW_SPOILING_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl ShelfLifePolicy {
    pub fn is_slow_spoiling(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.slow_spoiling_markers
            .iter()
            .any(|marker| name.contains(&marker.to_lowercase()))
    }

    pub fn shelf_life_days(&self, name: &str) -> u32 {
        if self.is_slow_spoiling(name) {
            self.long_days
        } else {
            self.short_days
        }
    }
}
