//! Outline tree node.

use wm_callstack::{Call, CallState, Tag};

/// Index of a section inside its [`Outline`](crate::Outline).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    /// Identifier of the synthetic root section.
    pub const ROOT: Self = Self(0);

    /// Position of the section in creation (document) order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the outline: a heading, the content it directly owns, and
/// its sub-sections.
///
/// Sections are owned by the [`Outline`](crate::Outline) arena; `parent` and
/// `children` are arena indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineSection {
    pub(crate) id: SectionId,
    pub(crate) level: usize,
    pub(crate) declared_level: usize,
    pub(crate) label: String,
    pub(crate) heading_calls: Vec<Call>,
    pub(crate) content_calls: Vec<Call>,
    pub(crate) children: Vec<SectionId>,
    pub(crate) parent: Option<SectionId>,
    pub(crate) start_pos: Option<usize>,
    pub(crate) end_pos: Option<usize>,
}

impl OutlineSection {
    pub(crate) fn root() -> Self {
        Self {
            id: SectionId::ROOT,
            level: 0,
            declared_level: 0,
            label: String::new(),
            heading_calls: Vec::new(),
            content_calls: Vec::new(),
            children: Vec::new(),
            parent: None,
            start_pos: None,
            end_pos: None,
        }
    }

    /// Arena identifier.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Effective level: 0 for the root, 1.. for headings.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Level declared in the source, before any correction.
    #[must_use]
    pub fn declared_level(&self) -> usize {
        self.declared_level
    }

    /// Plain-text heading label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Calls making up the heading markup (enter, inline content, exit).
    #[must_use]
    pub fn heading_calls(&self) -> &[Call] {
        &self.heading_calls
    }

    /// Calls owned by this section before its first child section.
    #[must_use]
    pub fn content_calls(&self) -> &[Call] {
        &self.content_calls
    }

    /// Immediate sub-sections, in document order.
    #[must_use]
    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    /// Parent section (`None` for the root).
    #[must_use]
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Source offset where the section heading starts.
    #[must_use]
    pub fn start_pos(&self) -> Option<usize> {
        self.start_pos
    }

    /// Source offset where the section ends (`None` when it runs to the end of the document).
    #[must_use]
    pub fn end_pos(&self) -> Option<usize> {
        self.end_pos
    }

    /// Check whether this is the synthetic root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check whether the section has sub-sections.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Explicit heading id set by the author on the heading call, if any.
    #[must_use]
    pub fn explicit_heading_id(&self) -> Option<&str> {
        self.heading_calls
            .first()
            .and_then(|call| call.attributes.get_str("id"))
            .filter(|id| !id.is_empty())
    }

    /// Number of non-blank text lines in the content calls.
    ///
    /// Used to space out in-content markers.
    #[must_use]
    pub fn content_line_count(&self) -> usize {
        self.content_calls
            .iter()
            .filter_map(Call::text_content)
            .flat_map(str::lines)
            .filter(|line| !line.trim().is_empty())
            .count()
    }
}

/// Plain text of a run of calls: text payloads joined, whitespace collapsed.
///
/// Self-closing headings carry their title as payload and are included.
pub(crate) fn plain_text(calls: &[Call]) -> String {
    let mut text = String::new();
    for call in calls {
        let content = match (&call.tag, call.state) {
            (_, CallState::Unmatched) | (Tag::Heading(_), CallState::Special) => {
                call.payload.as_deref()
            }
            _ => None,
        };
        if let Some(content) = content {
            text.push_str(content);
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
