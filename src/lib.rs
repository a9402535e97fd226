//! # blockdex
//!
//! Split an HTML document into small records for a full-text search index.
//!
//! Each record is one content block (a paragraph by default) annotated with
//! the headings it falls under, the nearest anchor to link to, ranking
//! signals, and a content-derived `objectID`.
//!
//! ## Quick Start
//!
//! ```
//! let html = r#"
//!     <h1 name="intro">Intro</h1>
//!     <p>First paragraph</p>
//!     <h2>Details</h2>
//!     <p>Second paragraph</p>
//! "#;
//!
//! let extraction = blockdex::run(html).unwrap();
//! assert_eq!(extraction.len(), 2);
//!
//! let second = &extraction[1];
//! assert_eq!(second.content, "Second paragraph");
//! assert_eq!(second.headings, ["Intro", "Details"]);
//! assert_eq!(second.anchor.as_deref(), Some("intro"));
//! assert_eq!(second.custom_ranking.position, 1);
//! assert_eq!(second.custom_ranking.heading, 80);
//! ```
//!
//! ## Options
//!
//! ```
//! use blockdex::{Options, run_with};
//!
//! let options = Options::default()
//!     .with_css_selector("div.note")
//!     .with_excluded_tags(["script"]);
//!
//! let extraction = run_with(
//!     r#"<div class="note">Hi<script>track()</script></div>"#,
//!     &options,
//! )
//! .unwrap();
//! assert_eq!(extraction[0].html, r#"<div class="note">Hi</div>"#);
//! assert_eq!(extraction.element(&extraction[0]).tag_name(), "div");
//! ```
//!
//! An invalid `cssSelector` is reported as [`Error::InvalidSelector`] before
//! any record is produced. Malformed HTML is never an error.

pub mod anchor;
pub mod dom;
pub mod error;
pub mod extract;
pub mod hierarchy;
pub mod identity;
pub mod input;
pub mod options;
pub mod ranking;
pub mod select;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use extract::{Extraction, Extractor, Record, run, run_with};
pub use hierarchy::{HeadingLevel, HierarchyState};
pub use identity::fingerprint;
pub use options::Options;
pub use ranking::CustomRanking;
