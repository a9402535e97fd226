//! The extraction pipeline.
//!
//! A parsed document is flattened into document-order [`Event`]s (headings
//! and content candidates, interleaved as they appear) and folded through a
//! [`HierarchyState`]. Each surviving candidate becomes a [`Record`].

use serde::Serialize;
use serde_json::json;
use tracing::{debug, trace};

use crate::anchor::{self, CONTENT_LOOKUPS, HEADING_LOOKUPS};
use crate::dom::{self, Document, Element, NodeId};
use crate::error::Result;
use crate::hierarchy::{HeadingLevel, HierarchyState};
use crate::identity;
use crate::options::Options;
use crate::ranking::CustomRanking;
use crate::select::{ContentSelector, ExcludedTags, Sanitized};

/// One indexable block of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Trimmed text of the block.
    pub content: String,
    /// Trimmed outer markup of the block, excluded tags removed.
    pub html: String,
    /// The block's own anchor, else the nearest earlier heading's.
    pub anchor: Option<String>,
    /// Active heading texts, shallowest first.
    pub headings: Vec<String>,
    #[serde(rename = "customRanking")]
    pub custom_ranking: CustomRanking,
    /// Originating element; resolve it with [`Extraction::element`].
    #[serde(skip)]
    pub node: NodeId,
    #[serde(rename = "objectID")]
    pub object_id: String,
}

impl Record {
    /// Identity over every field except `node` and `objectID` itself.
    pub fn compute_object_id(&self) -> String {
        identity::fingerprint(&json!({
            "content": self.content,
            "html": self.html,
            "anchor": self.anchor,
            "headings": self.headings,
            "customRanking": {
                "position": self.custom_ranking.position,
                "heading": self.custom_ranking.heading,
            },
        }))
    }
}

/// Records of one document, together with the tree they point into.
#[derive(Debug)]
pub struct Extraction {
    document: Document,
    records: Vec<Record>,
}

impl Extraction {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The element a record was extracted from.
    pub fn element(&self, record: &Record) -> Element<'_> {
        Element::new(&self.document, record.node)
    }
}

impl std::ops::Index<usize> for Extraction {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Extraction {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A step of the document-order fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Heading(HeadingLevel, NodeId),
    Candidate(NodeId),
}

/// Compiled options, reusable across documents.
#[derive(Debug, Clone)]
pub struct Extractor {
    selector: ContentSelector,
    excluded: ExcludedTags,
}

impl Extractor {
    /// Compile `options`. Selector syntax errors and bad tag names surface
    /// here, before any document is touched.
    pub fn new(options: &Options) -> Result<Self> {
        Ok(Self {
            selector: ContentSelector::parse(&options.css_selector)?,
            excluded: ExcludedTags::parse(&options.tags_to_exclude)?,
        })
    }

    pub fn selector(&self) -> &ContentSelector {
        &self.selector
    }

    pub fn excluded_tags(&self) -> &ExcludedTags {
        &self.excluded
    }

    /// Parse `html` and extract its records.
    pub fn extract(&self, html: &str) -> Extraction {
        self.extract_document(dom::parse_html(html))
    }

    /// Extract records from an already parsed document.
    pub fn extract_document(&self, document: Document) -> Extraction {
        let events = self.events(&document);
        let records = self.fold(&document, &events);
        debug!(
            selector = self.selector.as_str(),
            events = events.len(),
            records = records.len(),
            "extracted records"
        );
        Extraction { document, records }
    }

    /// Headings and candidates in document order. An element that is both
    /// yields its heading event first.
    fn events(&self, doc: &Document) -> Vec<Event> {
        let candidates = self.selector.select(doc);
        let mut candidates = candidates.iter().copied().peekable();
        let mut events = Vec::new();

        for id in doc.elements() {
            if let Some(level) = doc.local_name(id).and_then(HeadingLevel::from_tag) {
                events.push(Event::Heading(level, id));
            }
            if candidates.next_if_eq(&id).is_some() {
                events.push(Event::Candidate(id));
            }
        }
        events
    }

    fn fold(&self, doc: &Document, events: &[Event]) -> Vec<Record> {
        let mut state = HierarchyState::new();
        let mut records = Vec::new();

        for event in events {
            match *event {
                Event::Heading(level, id) => {
                    let text = doc
                        .text(id, |tag| self.excluded.contains(tag))
                        .trim()
                        .to_string();
                    let anchor = anchor::resolve(doc, id, HEADING_LOOKUPS).map(str::to_owned);
                    trace!(%level, text = text.as_str(), ?anchor, "heading");
                    state.enter(level, text, anchor);
                }
                Event::Candidate(id) => {
                    let sanitized = Sanitized::new(doc, id, &self.excluded);
                    if sanitized.is_empty() {
                        trace!(node = id.0, "dropping empty candidate");
                        continue;
                    }
                    records.push(self.record(doc, id, sanitized, &state, records.len()));
                }
            }
        }
        records
    }

    fn record(
        &self,
        doc: &Document,
        id: NodeId,
        sanitized: Sanitized,
        state: &HierarchyState,
        position: usize,
    ) -> Record {
        let context = state.snapshot();
        let anchor = anchor::resolve(doc, id, CONTENT_LOOKUPS)
            .map(str::to_owned)
            .or(context.anchor);

        let mut record = Record {
            content: sanitized.content,
            html: sanitized.html,
            anchor,
            headings: context.headings,
            custom_ranking: CustomRanking::new(position, context.level),
            node: id,
            object_id: String::new(),
        };
        record.object_id = record.compute_object_id();
        record
    }
}

/// Extract records from `html` with default options.
pub fn run(html: &str) -> Result<Extraction> {
    run_with(html, &Options::default())
}

/// Extract records from `html`.
pub fn run_with(html: &str, options: &Options) -> Result<Extraction> {
    Ok(Extractor::new(options)?.extract(html))
}
