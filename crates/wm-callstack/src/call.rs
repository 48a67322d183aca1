//! Single tokenized markup instruction.

use crate::attributes::{AttributeValue, Attributes};

/// Context value marking a heading as a real document section heading.
///
/// Headings used as decorative titles inside another component (card, box)
/// carry a different context and never start a section.
pub const OUTLINE_CONTEXT: &str = "outline";

/// Lifecycle state of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CallState {
    /// Opening tag.
    Enter,
    /// Closing tag.
    Exit,
    /// Self-closing tag without children.
    Special,
    /// Raw text or unprocessed content (payload carries the text).
    Unmatched,
}

/// Source syntax a heading was written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeadingSyntax {
    /// `# Heading` single-line syntax.
    Atx,
    /// `=== Heading ===` single-line syntax.
    Wiki,
    /// `<heading>...</heading>` block syntax.
    Block,
}

impl HeadingSyntax {
    /// Block headings span several lines; the other styles are single-line.
    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(self, Self::Block)
    }
}

/// Tag kinds the processing passes know about.
///
/// Everything that is not structurally relevant to the outline passes is
/// carried opaquely as [`Tag::Other`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Tag {
    /// Heading, either a section heading or a component title depending on context.
    Heading(HeadingSyntax),
    /// Synthetic section wrapper emitted by the outline serializer.
    Section,
    /// Synthetic header wrapper grouping a section heading with its leading content.
    Header,
    /// Edit button marker carrying a JSON payload.
    EditButton,
    /// In-content advertisement slot.
    AdMarker,
    /// Paragraph.
    Paragraph,
    /// Image or other media reference.
    Media,
    /// Deferred template with its captured sub-sequence.
    Template {
        /// Calls expanded later for every template instance.
        children: Vec<Call>,
    },
    /// Any other tag, kept by name.
    Other(String),
}

impl Tag {
    /// Create an opaque tag.
    #[must_use]
    pub fn other(name: impl Into<String>) -> Self {
        Self::Other(name.into())
    }

    /// Logical tag name used for bracket matching.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Heading(_) => "heading",
            Self::Section => "section",
            Self::Header => "header",
            Self::EditButton => "edit-button",
            Self::AdMarker => "ad",
            Self::Paragraph => "p",
            Self::Media => "media",
            Self::Template { .. } => "template",
            Self::Other(name) => name,
        }
    }
}

/// One tokenized unit of markup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    /// Tag kind.
    pub tag: Tag,
    /// Lifecycle state.
    pub state: CallState,
    /// Mutable attribute bag.
    pub attributes: Attributes,
    /// Secondary classification set by a later pass (e.g. [`OUTLINE_CONTEXT`]).
    pub context: Option<String>,
    /// Byte offset of the call start in the source text.
    pub start_pos: Option<usize>,
    /// Byte offset of the call end in the source text.
    pub end_pos: Option<usize>,
    /// Captured raw content (text for `Unmatched`, JSON for edit buttons).
    pub payload: Option<String>,
}

impl Call {
    /// Create a call with the given tag and state.
    #[must_use]
    pub fn new(tag: Tag, state: CallState) -> Self {
        Self {
            tag,
            state,
            attributes: Attributes::new(),
            context: None,
            start_pos: None,
            end_pos: None,
            payload: None,
        }
    }

    /// Create an opening call.
    #[must_use]
    pub fn enter(tag: Tag) -> Self {
        Self::new(tag, CallState::Enter)
    }

    /// Create a closing call.
    #[must_use]
    pub fn exit(tag: Tag) -> Self {
        Self::new(tag, CallState::Exit)
    }

    /// Create a self-closing call.
    #[must_use]
    pub fn special(tag: Tag) -> Self {
        Self::new(tag, CallState::Special)
    }

    /// Create a raw text call.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(Tag::other("cdata"), CallState::Unmatched).with_payload(content)
    }

    /// Create a template call capturing a sub-sequence.
    #[must_use]
    pub fn template(children: Vec<Call>) -> Self {
        Self::special(Tag::Template { children })
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Set the context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the source span.
    #[must_use]
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start_pos = Some(start);
        self.end_pos = Some(end);
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Logical tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.tag.name()
    }

    /// Check whether the call opens a tag.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.state == CallState::Enter
    }

    /// Check whether the call closes a tag.
    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.state == CallState::Exit
    }

    /// Check whether the call is a tag (as opposed to raw text filler).
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.state != CallState::Unmatched
    }

    /// Check whether the call is in the outline context.
    #[must_use]
    pub fn is_outline_context(&self) -> bool {
        self.context.as_deref() == Some(OUTLINE_CONTEXT)
    }

    /// Heading syntax if the call is a heading.
    #[must_use]
    pub fn heading_syntax(&self) -> Option<HeadingSyntax> {
        match self.tag {
            Tag::Heading(syntax) => Some(syntax),
            _ => None,
        }
    }

    /// Text payload of an `Unmatched` call.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match self.state {
            CallState::Unmatched => self.payload.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(Tag::Heading(HeadingSyntax::Atx).name(), "heading");
        assert_eq!(Tag::Heading(HeadingSyntax::Block).name(), "heading");
        assert_eq!(Tag::Template { children: vec![] }.name(), "template");
        assert_eq!(Tag::other("card").name(), "card");
    }

    #[test]
    fn test_text_call() {
        let call = Call::text("hello");
        assert_eq!(call.state, CallState::Unmatched);
        assert_eq!(call.text_content(), Some("hello"));
        assert!(!call.is_tag());
    }

    #[test]
    fn test_outline_context() {
        let heading = Call::enter(Tag::Heading(HeadingSyntax::Atx)).with_context(OUTLINE_CONTEXT);
        assert!(heading.is_outline_context());
        assert!(!Call::enter(Tag::Heading(HeadingSyntax::Atx)).is_outline_context());
        assert!(
            !Call::enter(Tag::Heading(HeadingSyntax::Atx))
                .with_context("card")
                .is_outline_context()
        );
    }

    #[test]
    fn test_template_keeps_children() {
        let template = Call::template(vec![Call::text("{{name}}")]);
        match &template.tag {
            Tag::Template { children } => assert_eq!(children.len(), 1),
            other => panic!("unexpected tag {other:?}"),
        }
        assert_eq!(template.state, CallState::Special);
    }
}
