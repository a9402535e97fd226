//! Custom ranking signals.

use serde::{Deserialize, Serialize};

use crate::hierarchy::HeadingLevel;

/// Weight of content that sits under no heading at all.
pub const TOP_WEIGHT: u32 = 100;

/// Weight lost per heading level.
pub const LEVEL_STEP: u32 = 10;

/// Signals a search index can sort on to favour early, shallow content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomRanking {
    /// Zero-based index among the records of a document.
    pub position: usize,
    /// [`heading_weight`] of the deepest active heading.
    pub heading: u32,
}

impl CustomRanking {
    pub fn new(position: usize, level: Option<HeadingLevel>) -> Self {
        Self {
            position,
            heading: heading_weight(level),
        }
    }
}

/// `100 - 10 * level`: 100 with no heading, 90 under an h1, down to 40
/// under an h6.
pub fn heading_weight(level: Option<HeadingLevel>) -> u32 {
    match level {
        Some(level) => TOP_WEIGHT - LEVEL_STEP * u32::from(level.get()),
        None => TOP_WEIGHT,
    }
}
