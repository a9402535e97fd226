//! Candidate selection and markup sanitizing.

use std::collections::BTreeSet;

use cssparser::{Parser, ParserInput};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, Selector, SelectorList};

use crate::dom::{Document, DomSelectors, Element, NodeId};
use crate::error::{Error, Result};

/// A compiled `cssSelector`: an element is a candidate if any selector in
/// the comma-separated list matches it.
#[derive(Debug, Clone)]
pub struct ContentSelector {
    source: String,
    selectors: Vec<Selector<DomSelectors>>,
}

impl ContentSelector {
    /// Compile a selector list, rejecting anything cssparser cannot fully consume.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let list = parser
            .parse_entirely(|parser| {
                SelectorList::parse(&DomSelectors, parser, ParseRelative::No)
            })
            .map_err(|err| Error::InvalidSelector {
                selector: source.to_string(),
                reason: format!(
                    "{:?} at line {}, column {}",
                    err.kind, err.location.line, err.location.column
                ),
            })?;

        Ok(Self {
            source: source.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The selector text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &Element<'_>, caches: &mut SelectorCaches) -> bool {
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );
        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, element, &mut context)
        })
    }

    /// Every matching element of `doc`, in document order.
    pub fn select(&self, doc: &Document) -> Vec<NodeId> {
        let mut caches = SelectorCaches::default();
        doc.elements()
            .filter(|&id| self.matches(&Element::new(doc, id), &mut caches))
            .collect()
    }
}

/// The compiled `tagsToExclude` set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedTags(BTreeSet<String>);

impl ExcludedTags {
    /// Normalize configured entries: split on commas and whitespace,
    /// lowercase, drop blanks, and reject anything that cannot be a tag name.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut tags = BTreeSet::new();
        for entry in entries {
            for tag in entry
                .as_ref()
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tag| !tag.is_empty())
            {
                if !is_tag_name(tag) {
                    return Err(Error::InvalidTagName(tag.to_string()));
                }
                tags.insert(tag.to_ascii_lowercase());
            }
        }
        Ok(Self(tags))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn is_tag_name(tag: &str) -> bool {
    tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

/// Markup and text of one candidate after exclusion, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub html: String,
    pub content: String,
}

impl Sanitized {
    pub fn new(doc: &Document, id: NodeId, excluded: &ExcludedTags) -> Self {
        let skip = |tag: &str| excluded.contains(tag);
        Self {
            html: doc.outer_html(id, skip).trim().to_string(),
            content: doc.text(id, skip).trim().to_string(),
        }
    }

    /// Candidates without visible text never become records.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
