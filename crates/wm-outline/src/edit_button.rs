//! Section edit buttons.
//!
//! The serializer emits one `EditButton` special call per editable section,
//! carrying the JSON payload below. An HTML renderer turns that call into a
//! marker comment (`<!-- EDIT{...} -->`), and [`replace_edit_markers`] swaps
//! markers for the final form markup once the page is rendered.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EDIT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!-- EDIT(\{.*?\}) -->").unwrap());

/// Edit-button payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditButton {
    /// Edited object kind, always `section`.
    pub target: String,
    /// Wiki (page) identifier.
    #[serde(rename = "wiki-id")]
    pub wiki_id: String,
    /// Unique form id within the page.
    #[serde(rename = "form-id")]
    pub form_id: String,
    /// Human-readable label, taken from the section heading.
    pub message: String,
    /// Source range as `start-end`, or `start-` when the section runs to the end.
    pub range: String,
    /// Heading anchor id.
    #[serde(rename = "hid", default, skip_serializing_if = "Option::is_none")]
    pub heading_id: Option<String>,
    /// Per-document sequence number.
    #[serde(rename = "secid")]
    pub section_id: usize,
}

impl EditButton {
    /// Payload for a section.
    #[must_use]
    pub fn for_section(
        wiki_id: &str,
        sequence: usize,
        label: &str,
        start: usize,
        end: Option<usize>,
    ) -> Self {
        Self {
            target: "section".to_owned(),
            wiki_id: wiki_id.to_owned(),
            form_id: format!("edit-section-{sequence}"),
            message: label.to_owned(),
            range: format_range(start, end),
            heading_id: None,
            section_id: sequence,
        }
    }

    /// Set the heading anchor id.
    #[must_use]
    pub fn with_heading_id(mut self, id: impl Into<String>) -> Self {
        self.heading_id = Some(id.into());
        self
    }

    /// Payload as JSON.
    ///
    /// `<` and `>` are escaped so the payload can be embedded in an HTML comment.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, EditMarkerError> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace('<', "\\u003c").replace('>', "\\u003e"))
    }

    /// Parse a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a valid edit-button object.
    pub fn from_json(json: &str) -> Result<Self, EditMarkerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// HTML comment marker for this payload.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn marker(&self) -> Result<String, EditMarkerError> {
        Ok(format!("<!-- EDIT{} -->", self.to_json()?))
    }
}

/// Format a source range: `start-end`, or `start-` when the end is unknown.
#[must_use]
pub fn format_range(start: usize, end: Option<usize>) -> String {
    match end {
        Some(end) => format!("{start}-{end}"),
        None => format!("{start}-"),
    }
}

/// Edit marker (de)serialization error.
#[derive(Debug, thiserror::Error)]
pub enum EditMarkerError {
    /// Payload is not valid JSON for an edit button.
    #[error("Invalid edit button payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Replace every edit marker in `html` with the markup returned by `render`.
///
/// # Errors
///
/// Returns an error if a marker carries a payload that cannot be parsed.
///
/// # Example
///
/// ```
/// use wm_outline::{EditButton, replace_edit_markers};
///
/// let button = EditButton::for_section("start", 1, "Intro", 0, Some(42));
/// let html = format!("<h2>Intro</h2>{}", button.marker().unwrap());
/// let out = replace_edit_markers(&html, |b| format!("<form id=\"{}\"></form>", b.form_id)).unwrap();
/// assert_eq!(out, "<h2>Intro</h2><form id=\"edit-section-1\"></form>");
/// ```
pub fn replace_edit_markers<F>(html: &str, mut render: F) -> Result<String, EditMarkerError>
where
    F: FnMut(&EditButton) -> String,
{
    let mut result = String::with_capacity(html.len());
    let mut last = 0;
    for caps in EDIT_MARKER_RE.captures_iter(html) {
        let (Some(whole), Some(json)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let button = EditButton::from_json(json.as_str())?;
        result.push_str(&html[last..whole.start()]);
        result.push_str(&render(&button));
        last = whole.end();
    }
    result.push_str(&html[last..]);
    Ok(result)
}
