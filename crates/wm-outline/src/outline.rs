//! Outline builder.
//!
//! Consumes a flat call stack once, front to back, and sorts every call into
//! a tree of sections keyed by heading level:
//!
//! - an outline heading (heading tag in the [`OUTLINE_CONTEXT`]) starts a new
//!   section, attached under the nearest section one level up;
//! - calls between a heading enter and its exit belong to the heading itself;
//! - every other call belongs to the current section's content.
//!
//! Level jumps deeper than one (`# A` followed by `### B`) are clamped to
//! `parent + 1`; no intermediate section is fabricated.
//!
//! [`OUTLINE_CONTEXT`]: wm_callstack::OUTLINE_CONTEXT

use std::iter::Peekable;

use wm_callstack::{Call, CallStack, CallState, HeadingSyntax, Tag};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, OutlineError, Strictness};
use crate::metadata::MetadataSink;
use crate::section::{OutlineSection, SectionId, plain_text};
use crate::walk::PreOrder;

/// Attribute carrying the heading level on heading calls.
pub const LEVEL_ATTRIBUTE: &str = "level";

/// Attribute keeping the author's level when the effective level was corrected.
pub const DECLARED_LEVEL_ATTRIBUTE: &str = "declared-level";

/// Section tree built from a call stack.
#[derive(Clone, Debug)]
pub struct Outline {
    sections: Vec<OutlineSection>,
    title: Option<String>,
    max_end_pos: Option<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Outline {
    /// Build an outline with default options.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] on invariant violations in strict mode.
    pub fn build(stack: CallStack) -> Result<Self, OutlineError> {
        OutlineBuilder::new().build(stack)
    }

    /// Synthetic level-0 root section.
    #[must_use]
    pub fn root(&self) -> &OutlineSection {
        &self.sections[SectionId::ROOT.0]
    }

    /// Section by id.
    ///
    /// # Panics
    ///
    /// Panics if the id belongs to another outline.
    #[must_use]
    pub fn section(&self, id: SectionId) -> &OutlineSection {
        &self.sections[id.0]
    }

    /// All sections in document order, root first.
    pub fn sections(&self) -> impl Iterator<Item = &OutlineSection> {
        self.sections.iter()
    }

    /// Number of sections, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check whether the outline has no section besides the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.len() == 1
    }

    /// Sections in depth-first pre-order, root first.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }

    /// Label of the leading level-1 section, used as page title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Largest source end offset seen on any call.
    #[must_use]
    pub fn max_end_pos(&self) -> Option<usize> {
        self.max_end_pos
    }

    /// Warnings and (in lenient mode) internal errors recorded while building.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Content warnings as display strings.
    pub fn warnings(&self) -> impl Iterator<Item = String> + '_ {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
            .map(ToString::to_string)
    }
}

/// Configurable outline builder.
///
/// # Example
///
/// ```
/// use wm_callstack::{Call, CallStack, HeadingSyntax, OUTLINE_CONTEXT, Tag};
/// use wm_outline::{OutlineBuilder, PageMetadata, Strictness};
///
/// let heading = Tag::Heading(HeadingSyntax::Atx);
/// let stack = CallStack::from(vec![
///     Call::enter(heading.clone()).with_attr("level", 1_i64).with_context(OUTLINE_CONTEXT),
///     Call::text("Guide"),
///     Call::exit(heading),
///     Call::text("Welcome"),
/// ]);
///
/// let mut metadata = PageMetadata::default();
/// let outline = OutlineBuilder::new()
///     .with_strictness(Strictness::Lenient)
///     .with_metadata_sink(&mut metadata)
///     .build(stack)
///     .unwrap();
///
/// assert_eq!(outline.root().children().len(), 1);
/// assert_eq!(metadata.title.as_deref(), Some("Guide"));
/// ```
#[derive(Default)]
pub struct OutlineBuilder<'a> {
    strictness: Strictness,
    sink: Option<&'a mut dyn MetadataSink>,
}

impl<'a> OutlineBuilder<'a> {
    /// Create a builder with default strictness and no metadata sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how internal errors are handled.
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Receive the page title derived from the leading level-1 heading.
    #[must_use]
    pub fn with_metadata_sink(mut self, sink: &'a mut dyn MetadataSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the outline, consuming the stack.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] on invariant violations in strict mode.
    pub fn build(self, stack: CallStack) -> Result<Outline, OutlineError> {
        let mut state = BuildState::new(self.strictness);
        let mut calls = stack.into_iter().peekable();
        while let Some(call) = calls.next() {
            state.accept(call, &mut calls)?;
        }
        state.finish()?;

        let title = state.title();
        if let (Some(title), Some(sink)) = (title.as_deref(), self.sink)
            && let Err(e) = sink.set_title(title)
        {
            state
                .diagnostics
                .warn(format!("Failed to record page title: {e}"), None);
        }

        Ok(Outline {
            sections: state.sections,
            title,
            max_end_pos: state.max_end_pos,
            diagnostics: state.diagnostics.into_items(),
        })
    }
}

/// Heading currently being captured into the current section.
#[derive(Clone, Copy, Debug)]
struct OpenHeading {
    syntax: HeadingSyntax,
    /// Nesting of heading tags inside the open heading (1 = only the outline heading).
    depth: usize,
}

struct BuildState {
    sections: Vec<OutlineSection>,
    current: SectionId,
    open_heading: Option<OpenHeading>,
    /// Set right after a single-line heading closes: stray paragraph markers
    /// produced by the tokenizer around it are folded into the heading.
    absorb_paragraph: bool,
    max_end_pos: Option<usize>,
    diagnostics: Diagnostics,
}

impl BuildState {
    fn new(strictness: Strictness) -> Self {
        Self {
            sections: vec![OutlineSection::root()],
            current: SectionId::ROOT,
            open_heading: None,
            absorb_paragraph: false,
            max_end_pos: None,
            diagnostics: Diagnostics::new(strictness),
        }
    }

    fn current_mut(&mut self) -> &mut OutlineSection {
        &mut self.sections[self.current.0]
    }

    fn accept<I>(&mut self, call: Call, rest: &mut Peekable<I>) -> Result<(), OutlineError>
    where
        I: Iterator<Item = Call>,
    {
        if let Some(end) = call.end_pos {
            self.max_end_pos = Some(self.max_end_pos.map_or(end, |max| max.max(end)));
        }

        if let Some(open) = self.open_heading {
            self.accept_in_heading(call, open);
            return Ok(());
        }

        if is_outline_heading(&call) {
            return match call.state {
                CallState::Enter | CallState::Special => self.start_section(call),
                _ => {
                    self.diagnostics
                        .internal("Heading exit without an open heading", call.start_pos)?;
                    self.current_mut().content_calls.push(call);
                    Ok(())
                }
            };
        }

        if std::mem::take(&mut self.absorb_paragraph) && call.tag == Tag::Paragraph {
            let absorbed = match call.state {
                CallState::Exit => true,
                CallState::Enter => rest
                    .peek()
                    .is_some_and(|next| next.tag == Tag::Paragraph && next.is_exit()),
                _ => false,
            };
            if absorbed {
                let opened = call.is_enter();
                let section = self.current_mut();
                section.heading_calls.push(call);
                if opened && let Some(exit) = rest.next_if(|next| next.tag == Tag::Paragraph) {
                    section.heading_calls.push(exit);
                }
                return Ok(());
            }
        }

        self.current_mut().content_calls.push(call);
        Ok(())
    }

    fn accept_in_heading(&mut self, mut call: Call, mut open: OpenHeading) {
        if call.tag == Tag::Media {
            call.attributes.set("linking", "nolink");
        }
        if matches!(call.tag, Tag::Heading(_)) {
            match call.state {
                CallState::Enter => open.depth += 1,
                CallState::Exit => open.depth -= 1,
                CallState::Special | CallState::Unmatched => {}
            }
        }

        let closed = open.depth == 0;
        let section = self.current_mut();
        section.heading_calls.push(call);
        if closed {
            section.label = plain_text(&section.heading_calls);
            self.open_heading = None;
            self.absorb_paragraph = !open.syntax.is_block();
        } else {
            self.open_heading = Some(open);
        }
    }

    fn start_section(&mut self, mut call: Call) -> Result<(), OutlineError> {
        let position = call.start_pos;
        let current_level = self.sections[self.current.0].level;

        let declared = match call.attributes.get_int(LEVEL_ATTRIBUTE) {
            Some(level) if level >= 1 => usize::try_from(level).unwrap_or(usize::MAX),
            Some(level) => {
                self.diagnostics.warn(
                    format!("Heading level {level} is not valid, using level 1"),
                    position,
                );
                1
            }
            None => {
                self.diagnostics.internal(
                    format!("Heading without level attribute, using level {current_level}"),
                    position,
                )?;
                current_level.max(1)
            }
        };

        let (parent, level) = if declared > current_level {
            if declared - current_level > 1 {
                let corrected = current_level + 1;
                self.diagnostics.warn(
                    format!(
                        "Heading level {declared} skips levels below level {current_level}, \
                         corrected to {corrected}"
                    ),
                    position,
                );
                (self.current, corrected)
            } else {
                (self.current, declared)
            }
        } else {
            (self.ancestor_for(declared, position)?, declared)
        };

        if level != declared {
            call.attributes.set(DECLARED_LEVEL_ATTRIBUTE, declared);
        }
        call.attributes.set(LEVEL_ATTRIBUTE, level);

        self.close_spans(parent, position);

        let syntax = call.heading_syntax().unwrap_or(HeadingSyntax::Block);
        let id = SectionId(self.sections.len());
        let mut section = OutlineSection {
            id,
            level,
            declared_level: declared,
            label: String::new(),
            heading_calls: Vec::new(),
            content_calls: Vec::new(),
            children: Vec::new(),
            parent: Some(parent),
            start_pos: position,
            end_pos: None,
        };
        if call.state == CallState::Special {
            section.heading_calls.push(call);
            section.label = plain_text(&section.heading_calls);
            self.absorb_paragraph = !syntax.is_block();
        } else {
            section.heading_calls.push(call);
            self.open_heading = Some(OpenHeading { syntax, depth: 1 });
        }

        self.sections[parent.0].children.push(id);
        self.sections.push(section);
        self.current = id;
        Ok(())
    }

    /// Walk up from the current section to the section a heading of
    /// `level` (not deeper than the current one) is attached to.
    fn ancestor_for(&mut self, level: usize, position: Option<usize>) -> Result<SectionId, OutlineError> {
        let current_level = self.sections[self.current.0].level;
        let steps = current_level - level + 1;
        let mut ancestor = self.current;
        for _ in 0..steps {
            match self.sections[ancestor.0].parent {
                Some(parent) => ancestor = parent,
                None => {
                    self.diagnostics.internal(
                        format!("No ancestor section for heading level {level}, attaching to root"),
                        position,
                    )?;
                    break;
                }
            }
        }
        Ok(ancestor)
    }

    /// Close the span of every section the new heading ends: the current one
    /// and its ancestors below `parent`.
    fn close_spans(&mut self, parent: SectionId, heading_start: Option<usize>) {
        let Some(start) = heading_start else {
            return;
        };
        let end = start.saturating_sub(1);
        let mut id = self.current;
        while id != parent {
            let section = &mut self.sections[id.0];
            let Some(next) = section.parent else {
                break;
            };
            section.end_pos = Some(section.start_pos.map_or(end, |s| end.max(s)));
            id = next;
        }
    }

    fn finish(&mut self) -> Result<(), OutlineError> {
        if self.open_heading.take().is_some() {
            let position = self.sections[self.current.0].start_pos;
            self.diagnostics
                .internal("Heading is not closed at the end of the document", position)?;
            let section = self.current_mut();
            section.label = plain_text(&section.heading_calls);
        }
        Ok(())
    }

    fn title(&self) -> Option<String> {
        let first = *self.sections[SectionId::ROOT.0].children.first()?;
        let section = &self.sections[first.0];
        (section.declared_level == 1 && !section.label.is_empty()).then(|| section.label.clone())
    }
}

fn is_outline_heading(call: &Call) -> bool {
    matches!(call.tag, Tag::Heading(_)) && call.is_outline_context()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{CollaboratorError, ImageKind, PageMetadata};
    use crate::test_support::{heading, heading_with_syntax, text};
    use pretty_assertions::assert_eq;
    use wm_callstack::OUTLINE_CONTEXT;

    fn build(calls: Vec<Call>) -> Outline {
        Outline::build(CallStack::from(calls)).unwrap()
    }

    fn children_labels(outline: &Outline, id: SectionId) -> Vec<&str> {
        outline
            .section(id)
            .children()
            .iter()
            .map(|&child| outline.section(child).label())
            .collect()
    }

    #[test]
    fn test_flat_document() {
        let mut calls = heading(1, "Intro", 0);
        calls.push(text("hello"));
        calls.extend(heading(1, "Next", 20));
        calls.push(text("world"));
        let outline = build(calls);

        let root = outline.root();
        assert_eq!(children_labels(&outline, root.id()), vec!["Intro", "Next"]);
        let intro = outline.section(root.children()[0]);
        let next = outline.section(root.children()[1]);
        assert_eq!(intro.level(), 1);
        assert_eq!(next.level(), 1);
        assert_eq!(intro.content_calls(), &[text("hello")]);
        assert_eq!(next.content_calls(), &[text("world")]);
        assert!(!intro.has_children());
        assert_eq!(next.parent(), Some(SectionId::ROOT));
    }

    #[test]
    fn test_skipped_level_is_clamped() {
        let mut calls = heading(1, "Top", 0);
        calls.extend(heading(3, "Deep", 10));
        let outline = build(calls);

        let top = outline.section(outline.root().children()[0]);
        let deep = outline.section(top.children()[0]);
        assert_eq!(deep.level(), 2);
        assert_eq!(deep.declared_level(), 3);
        assert_eq!(deep.heading_calls()[0].attributes.get_int(LEVEL_ATTRIBUTE), Some(2));
        assert_eq!(
            deep.heading_calls()[0]
                .attributes
                .get_int(DECLARED_LEVEL_ATTRIBUTE),
            Some(3)
        );
        assert_eq!(outline.warnings().count(), 1);
    }

    #[test]
    fn test_sibling_after_clamped_section() {
        let mut calls = heading(1, "A", 0);
        calls.extend(heading(4, "B", 10));
        calls.extend(heading(2, "C", 20));
        calls.extend(heading(1, "D", 30));
        let outline = build(calls);

        let a = outline.root().children()[0];
        assert_eq!(children_labels(&outline, a), vec!["B", "C"]);
        assert_eq!(children_labels(&outline, SectionId::ROOT), vec!["A", "D"]);
    }

    #[test]
    fn test_going_back_up_several_levels() {
        let mut calls = heading(1, "A", 0);
        calls.extend(heading(2, "B", 10));
        calls.extend(heading(3, "C", 20));
        calls.extend(heading(2, "D", 30));
        let outline = build(calls);

        let a = outline.root().children()[0];
        assert_eq!(children_labels(&outline, a), vec!["B", "D"]);
        let b = outline.section(a).children()[0];
        assert_eq!(children_labels(&outline, b), vec!["C"]);
    }

    #[test]
    fn test_heading_outside_outline_context_is_content() {
        let mut calls = heading(1, "Page", 0);
        calls.push(Call::enter(Tag::other("card")));
        calls.push(
            Call::enter(Tag::Heading(HeadingSyntax::Block))
                .with_attr(LEVEL_ATTRIBUTE, 2_i64)
                .with_context("card"),
        );
        calls.push(text("Card title"));
        calls.push(Call::exit(Tag::Heading(HeadingSyntax::Block)));
        calls.push(Call::exit(Tag::other("card")));
        let outline = build(calls);

        assert_eq!(outline.len(), 2);
        let page = outline.section(outline.root().children()[0]);
        assert_eq!(page.content_calls().len(), 5);
    }

    #[test]
    fn test_preamble_belongs_to_root() {
        let mut calls = vec![text("before")];
        calls.extend(heading(2, "First", 10));
        let outline = build(calls);
        assert_eq!(outline.root().content_calls(), &[text("before")]);
        assert_eq!(outline.root().children().len(), 1);
        assert_eq!(outline.title(), None);
    }

    #[test]
    fn test_rich_heading_content_and_media() {
        let atx = Tag::Heading(HeadingSyntax::Atx);
        let calls = vec![
            Call::enter(atx.clone())
                .with_attr(LEVEL_ATTRIBUTE, 1_i64)
                .with_context(OUTLINE_CONTEXT),
            Call::enter(Tag::Media).with_attr("src", "logo.png"),
            Call::exit(Tag::Media),
            Call::text("Logo "),
            Call::enter(Tag::other("strong")),
            Call::text("bold"),
            Call::exit(Tag::other("strong")),
            Call::exit(atx),
            Call::text("body"),
        ];
        let outline = build(calls);
        let section = outline.section(outline.root().children()[0]);

        assert_eq!(section.heading_calls().len(), 8);
        assert_eq!(section.label(), "Logo bold");
        assert_eq!(
            section.heading_calls()[1].attributes.get_str("linking"),
            Some("nolink")
        );
        assert_eq!(section.content_calls(), &[text("body")]);
    }

    #[test]
    fn test_empty_paragraph_after_single_line_heading_is_absorbed() {
        let mut calls = heading_with_syntax(HeadingSyntax::Wiki, 1, "Title", 0);
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(Call::exit(Tag::Paragraph));
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(text("real"));
        calls.push(Call::exit(Tag::Paragraph));
        let outline = build(calls);

        let section = outline.section(outline.root().children()[0]);
        assert_eq!(section.heading_calls().len(), 5);
        assert_eq!(section.content_calls().len(), 3);
    }

    #[test]
    fn test_stray_paragraph_close_after_single_line_heading_is_absorbed() {
        let mut calls = heading_with_syntax(HeadingSyntax::Atx, 1, "Title", 0);
        calls.push(Call::exit(Tag::Paragraph));
        calls.push(text("after"));
        let outline = build(calls);

        let section = outline.section(outline.root().children()[0]);
        assert_eq!(section.heading_calls().len(), 4);
        assert_eq!(section.content_calls(), &[text("after")]);
    }

    #[test]
    fn test_paragraph_after_stray_close_is_content() {
        let mut calls = heading_with_syntax(HeadingSyntax::Atx, 1, "Title", 0);
        calls.push(Call::exit(Tag::Paragraph));
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(text("body"));
        calls.push(Call::exit(Tag::Paragraph));
        let outline = build(calls);

        let section = outline.section(outline.root().children()[0]);
        assert_eq!(section.heading_calls().len(), 4);
        assert_eq!(section.content_calls().len(), 3);
    }

    #[test]
    fn test_paragraph_after_block_heading_is_content() {
        let mut calls = heading_with_syntax(HeadingSyntax::Block, 1, "Title", 0);
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(Call::exit(Tag::Paragraph));
        let outline = build(calls);

        let section = outline.section(outline.root().children()[0]);
        assert_eq!(section.heading_calls().len(), 3);
        assert_eq!(section.content_calls().len(), 2);
    }

    #[test]
    fn test_special_heading_starts_section() {
        let calls = vec![
            Call::special(Tag::Heading(HeadingSyntax::Wiki))
                .with_attr(LEVEL_ATTRIBUTE, 1_i64)
                .with_context(OUTLINE_CONTEXT)
                .with_payload("Native")
                .with_span(0, 12),
            text("body"),
        ];
        let outline = build(calls);
        let section = outline.section(outline.root().children()[0]);
        assert_eq!(section.label(), "Native");
        assert_eq!(section.content_calls(), &[text("body")]);
    }

    #[test]
    fn test_section_spans() {
        let mut calls = heading(1, "A", 0);
        calls.extend(heading(2, "B", 50));
        calls.extend(heading(1, "C", 100));
        calls.push(text("end").with_span(120, 130));
        let outline = build(calls);

        let a = outline.section(outline.root().children()[0]);
        let b = outline.section(a.children()[0]);
        let c = outline.section(outline.root().children()[1]);
        assert_eq!((a.start_pos(), a.end_pos()), (Some(0), Some(99)));
        assert_eq!((b.start_pos(), b.end_pos()), (Some(50), Some(99)));
        assert_eq!((c.start_pos(), c.end_pos()), (Some(100), None));
        assert_eq!(outline.max_end_pos(), Some(130));
    }

    #[test]
    fn test_title_from_leading_level_one() {
        let mut metadata = PageMetadata::default();
        let outline = OutlineBuilder::new()
            .with_metadata_sink(&mut metadata)
            .build(CallStack::from(heading(1, "Guide", 0)))
            .unwrap();
        assert_eq!(outline.title(), Some("Guide"));
        assert_eq!(metadata.title.as_deref(), Some("Guide"));

        let outline = build(heading(2, "Not a title", 0));
        assert_eq!(outline.title(), None);
    }

    struct FailingSink;

    impl MetadataSink for FailingSink {
        fn set_title(&mut self, _title: &str) -> Result<(), CollaboratorError> {
            Err("store unavailable".into())
        }

        fn set_featured_image(&mut self, _kind: ImageKind, _path: &str) -> Result<(), CollaboratorError> {
            Err("store unavailable".into())
        }
    }

    #[test]
    fn test_failing_sink_does_not_abort() {
        let mut sink = FailingSink;
        let outline = OutlineBuilder::new()
            .with_metadata_sink(&mut sink)
            .build(CallStack::from(heading(1, "Guide", 0)))
            .unwrap();
        assert_eq!(outline.title(), Some("Guide"));
        assert_eq!(outline.warnings().count(), 1);
    }

    #[test]
    fn test_missing_level_is_internal_error() {
        let calls = vec![
            Call::enter(Tag::Heading(HeadingSyntax::Atx)).with_context(OUTLINE_CONTEXT),
            text("No level"),
            Call::exit(Tag::Heading(HeadingSyntax::Atx)),
        ];
        let strict = Outline::build(CallStack::from(calls.clone()));
        assert!(matches!(strict, Err(OutlineError::Internal(_))));

        let lenient = OutlineBuilder::new()
            .with_strictness(Strictness::Lenient)
            .build(CallStack::from(calls))
            .unwrap();
        let section = lenient.section(lenient.root().children()[0]);
        assert_eq!(section.level(), 1);
        assert_eq!(lenient.diagnostics()[0].kind, DiagnosticKind::Internal);
    }

    #[test]
    fn test_unclosed_heading_is_internal_error() {
        let calls = vec![
            Call::enter(Tag::Heading(HeadingSyntax::Atx))
                .with_attr(LEVEL_ATTRIBUTE, 1_i64)
                .with_context(OUTLINE_CONTEXT),
            text("Open"),
        ];
        assert!(Outline::build(CallStack::from(calls.clone())).is_err());

        let outline = OutlineBuilder::new()
            .with_strictness(Strictness::Lenient)
            .build(CallStack::from(calls))
            .unwrap();
        assert_eq!(outline.section(SectionId(1)).label(), "Open");
    }

    #[test]
    fn test_orphan_heading_exit_is_kept_as_content() {
        let calls = vec![
            text("x"),
            Call::exit(Tag::Heading(HeadingSyntax::Atx)).with_context(OUTLINE_CONTEXT),
        ];
        let outline = OutlineBuilder::new()
            .with_strictness(Strictness::Lenient)
            .build(CallStack::from(calls))
            .unwrap();
        assert_eq!(outline.root().content_calls().len(), 2);
        assert_eq!(outline.diagnostics().len(), 1);
    }

    #[test]
    fn test_every_call_is_kept() {
        let mut calls = vec![text("pre")];
        calls.extend(heading(1, "A", 0));
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(text("a"));
        calls.push(Call::exit(Tag::Paragraph));
        calls.extend(heading(3, "B", 10));
        calls.push(Call::template(vec![text("{{x}}")]));
        calls.extend(heading(2, "C", 20));
        calls.extend(heading(1, "D", 30));
        let input_len = calls.len();

        let outline = build(calls);
        let kept: usize = outline
            .pre_order()
            .map(|s| s.heading_calls().len() + s.content_calls().len())
            .sum();
        assert_eq!(kept, input_len);
    }
}
