//! Table of contents entries and heading anchor ids.

use std::collections::HashMap;

use serde::Serialize;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Anchor link (`#` + heading id).
    pub link: String,
    /// Heading label.
    pub title: String,
    /// List kind used by the ToC renderer.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Effective heading level.
    pub level: usize,
}

impl TocEntry {
    pub(crate) fn new(id: &str, title: &str, level: usize) -> Self {
        Self {
            link: format!("#{id}"),
            title: title.to_owned(),
            kind: "ul",
            level,
        }
    }
}

/// Convert text to a URL-safe anchor id.
///
/// # Example
///
/// ```
/// use wm_outline::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Unique heading ids for one serialization.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    /// Id for a heading: the explicit id when given, otherwise the slugified
    /// label. Repeated ids get `-1`, `-2`, ... suffixes.
    pub(crate) fn assign(&mut self, explicit: Option<&str>, label: &str) -> String {
        let base = match explicit {
            Some(id) => id.to_owned(),
            None => {
                let slug = slugify(label);
                if slug.is_empty() { "section".to_owned() } else { slug }
            }
        };
        let count = self.counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }
}
