//! Extraction options.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Selector used when no `cssSelector` is configured.
pub const DEFAULT_CSS_SELECTOR: &str = "p";

/// Caller-facing configuration, deserializable from the JSON shape
/// `{ "cssSelector": "...", "tagsToExclude": "script" | ["script", ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Which elements become records.
    pub css_selector: String,
    /// Tags stripped from each record's markup and text.
    ///
    /// An entry may itself hold a comma or whitespace separated list.
    #[serde(deserialize_with = "one_or_many")]
    pub tags_to_exclude: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            css_selector: DEFAULT_CSS_SELECTOR.to_string(),
            tags_to_exclude: Vec::new(),
        }
    }
}

impl Options {
    /// Parse options from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn with_css_selector(mut self, selector: impl Into<String>) -> Self {
        self.css_selector = selector.into();
        self
    }

    pub fn with_excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_to_exclude.extend(tags.into_iter().map(Into::into));
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
    })
}
