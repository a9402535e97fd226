//! Heading hierarchy tracking.
//!
//! [`HierarchyState`] is the accumulator of a single document-order fold:
//! every heading overwrites its own level and clears everything deeper, and
//! every content node reads a [`Context`] snapshot from it. Markup nesting
//! plays no part; only the order in which headings are met does.

use std::fmt;

/// A heading depth, `h1` through `h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: HeadingLevel = HeadingLevel(1);
    pub const MAX: HeadingLevel = HeadingLevel(6);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(Self(level))
    }

    /// Level of a heading tag name (`"h3"` -> 3); `None` for other tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.as_bytes() {
            [b'h' | b'H', digit @ b'1'..=b'6'] => Some(Self(digit - b'0')),
            _ => None,
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    text: String,
    anchor: Option<String>,
}

/// Most recent heading at each level, reset below every new heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyState {
    levels: [Option<Entry>; 6],
}

/// What a content node sees of the hierarchy at the moment it is visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Texts of populated levels, shallowest first.
    pub headings: Vec<String>,
    /// Anchor of the deepest heading that has one.
    pub anchor: Option<String>,
    /// Deepest populated level.
    pub level: Option<HeadingLevel>,
}

impl HierarchyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heading: it replaces its own level and invalidates every
    /// deeper one.
    pub fn enter(&mut self, level: HeadingLevel, text: String, anchor: Option<String>) {
        let index = level.index();
        self.levels[index] = Some(Entry { text, anchor });
        for deeper in &mut self.levels[index + 1..] {
            *deeper = None;
        }
    }

    /// Deepest populated level, if any heading has been seen.
    pub fn deepest(&self) -> Option<HeadingLevel> {
        self.levels
            .iter()
            .rposition(Option::is_some)
            .and_then(|index| HeadingLevel::new(index as u8 + 1))
    }

    /// Heading texts of populated levels, shallowest first. Levels never
    /// seen are left out, not padded.
    pub fn headings(&self) -> Vec<String> {
        self.entries().map(|entry| entry.text.clone()).collect()
    }

    /// Anchor of the deepest heading carrying one. A heading without an
    /// anchor lets its ancestors' anchor show through.
    pub fn inherited_anchor(&self) -> Option<&str> {
        self.levels
            .iter()
            .rev()
            .flatten()
            .find_map(|entry| entry.anchor.as_deref())
    }

    pub fn snapshot(&self) -> Context {
        Context {
            headings: self.headings(),
            anchor: self.inherited_anchor().map(str::to_owned),
            level: self.deepest(),
        }
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.levels.iter().flatten()
    }
}
