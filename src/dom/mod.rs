//! HTML parsing into a read-only arena tree.
//!
//! html5ever builds the tree; [`Element`] plugs it into the `selectors`
//! crate for CSS matching, and [`Document::outer_html`] /
//! [`Document::text`] produce markup and text with pruned tags.

mod arena;
mod element;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Document, Node, NodeData, NodeId};
pub use element::{DomSelectors, Element};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML string into a [`Document`].
///
/// Never fails: like a browser, html5ever repairs whatever it is given.
pub fn parse_html(html: &str) -> Document {
    parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_document()
}
