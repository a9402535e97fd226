//! Local anchor lookup.
//!
//! A node's own anchor is found by trying a short, ordered list of lookups;
//! the first one that yields a non-empty value wins. Inheriting an anchor
//! from earlier headings is the hierarchy tracker's job, not this module's.

use crate::dom::{Document, NodeId};

/// One way of reading an anchor off a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorLookup {
    /// The node's `name` attribute.
    NameAttribute,
    /// The node's `id` attribute.
    IdAttribute,
    /// The `name` attribute of the first descendant element carrying one.
    DescendantName,
}

/// Lookups for heading elements. Anchors are often placed on an inner
/// `<a name>` rather than on the heading tag itself.
pub const HEADING_LOOKUPS: &[AnchorLookup] = &[
    AnchorLookup::NameAttribute,
    AnchorLookup::IdAttribute,
    AnchorLookup::DescendantName,
];

/// Lookups for content candidates: direct attributes only.
pub const CONTENT_LOOKUPS: &[AnchorLookup] =
    &[AnchorLookup::NameAttribute, AnchorLookup::IdAttribute];

impl AnchorLookup {
    pub fn find<'a>(self, doc: &'a Document, id: NodeId) -> Option<&'a str> {
        match self {
            Self::NameAttribute => non_empty_attr(doc, id, "name"),
            Self::IdAttribute => non_empty_attr(doc, id, "id"),
            Self::DescendantName => doc
                .descendants(id)
                .find_map(|child| non_empty_attr(doc, child, "name")),
        }
    }
}

/// Try `lookups` in order and return the first anchor found.
pub fn resolve<'a>(doc: &'a Document, id: NodeId, lookups: &[AnchorLookup]) -> Option<&'a str> {
    lookups.iter().find_map(|lookup| lookup.find(doc, id))
}

fn non_empty_attr<'a>(doc: &'a Document, id: NodeId, name: &str) -> Option<&'a str> {
    doc.get_attr(id, name).filter(|value| !value.is_empty())
}
