//! Outline serializer.
//!
//! Flattens an [`Outline`] back into a call sequence, depth-first and
//! pre-order. Every section is wrapped in `section` enter/exit calls; in
//! full-document mode a section with sub-sections gets a `header` wrapper
//! around its heading and own content, and edit buttons and ad markers are
//! injected. The dynamic target only wraps sections. The table of contents
//! target emits no calls, only [`TocEntry`] values.
//!
//! The outline is never mutated: all running counters live in a per-call
//! state, so several serializations of the same outline give the same result.

use wm_callstack::{Call, CallStack, Tag};

use crate::ads::{AdPolicy, AdSlotContext};
use crate::edit_button::EditButton;
use crate::metadata::{ImageKind, MetadataSink};
use crate::outline::{LEVEL_ATTRIBUTE, Outline};
use crate::section::{OutlineSection, SectionId};
use crate::toc::{HeadingIds, TocEntry};
use crate::walk::last_section;

/// Serializer switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitorOptions {
    /// Inject edit buttons in full-document mode.
    pub edit_buttons: bool,
    /// Capture the leading image of a sole level-1 section as featured image
    /// and flatten that section into the page header.
    pub capture_header_metadata: bool,
    /// Page identifier written into edit buttons.
    pub wiki_id: String,
}

impl Default for VisitorOptions {
    fn default() -> Self {
        Self {
            edit_buttons: true,
            capture_header_metadata: true,
            wiki_id: "start".to_owned(),
        }
    }
}

/// Instruction output target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Whole page: header wrappers, edit buttons and ad markers.
    Full,
    /// Partial page: section wrappers, headings and content only.
    Dynamic,
}

/// Serialized call sequence and the warnings raised while producing it.
#[derive(Clone, Debug, Default)]
pub struct Serialized {
    /// Output calls.
    pub calls: CallStack,
    /// Collaborator failures and similar non-fatal problems.
    pub warnings: Vec<String>,
}

/// Serializer over a built outline.
///
/// # Example
///
/// ```
/// use wm_callstack::{Call, CallStack, HeadingSyntax, OUTLINE_CONTEXT, Tag};
/// use wm_outline::{Outline, OutlineVisitor, VisitorOptions};
///
/// let heading = Tag::Heading(HeadingSyntax::Atx);
/// let outline = Outline::build(CallStack::from(vec![
///     Call::enter(heading.clone())
///         .with_attr("level", 2_i64)
///         .with_context(OUTLINE_CONTEXT)
///         .with_span(0, 8),
///     Call::text("Usage"),
///     Call::exit(heading),
/// ]))
/// .unwrap();
///
/// let toc = OutlineVisitor::new(&outline, VisitorOptions::default()).table_of_contents();
/// assert_eq!(toc[0].link, "#usage");
/// ```
pub struct OutlineVisitor<'a> {
    outline: &'a Outline,
    options: VisitorOptions,
    ad_policy: Option<&'a dyn AdPolicy>,
    sink: Option<&'a mut dyn MetadataSink>,
}

enum Step {
    Open(SectionId),
    Close,
}

struct VisitorState {
    target: Target,
    output: CallStack,
    heading_ids: HeadingIds,
    cumulative_lines: usize,
    section_ordinal: usize,
    ads_inserted: usize,
    edit_sequence: usize,
    last_section: SectionId,
    warnings: Vec<String>,
}

impl VisitorState {
    fn new(target: Target, last_section: SectionId) -> Self {
        Self {
            target,
            output: CallStack::new(),
            heading_ids: HeadingIds::default(),
            cumulative_lines: 0,
            section_ordinal: 0,
            ads_inserted: 0,
            edit_sequence: 0,
            last_section,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    /// Copy of the heading calls with the anchor id set on the opening call.
    fn heading(&mut self, section: &OutlineSection) -> (Vec<Call>, String) {
        let id = self
            .heading_ids
            .assign(section.explicit_heading_id(), section.label());
        let mut calls = section.heading_calls().to_vec();
        if let Some(first) = calls.first_mut() {
            first.attributes.set("id", id.as_str());
        }
        (calls, id)
    }
}

impl<'a> OutlineVisitor<'a> {
    /// Create a serializer without collaborators.
    #[must_use]
    pub fn new(outline: &'a Outline, options: VisitorOptions) -> Self {
        Self {
            outline,
            options,
            ad_policy: None,
            sink: None,
        }
    }

    /// Decide ad marker placement with `policy` in full-document mode.
    #[must_use]
    pub fn with_ad_policy(mut self, policy: &'a dyn AdPolicy) -> Self {
        self.ad_policy = Some(policy);
        self
    }

    /// Report the featured image to `sink`.
    #[must_use]
    pub fn with_metadata_sink(mut self, sink: &'a mut dyn MetadataSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Serialize for a whole page.
    pub fn serialize_full(&mut self) -> Serialized {
        self.serialize(Target::Full)
    }

    /// Serialize for a partial (dynamic) page.
    pub fn serialize_dynamic(&mut self) -> Serialized {
        self.serialize(Target::Dynamic)
    }

    /// Serialize the outline for `target`.
    pub fn serialize(&mut self, target: Target) -> Serialized {
        tracing::debug!(mode = ?target, sections = self.outline.len(), "Serializing outline");

        let mut state = VisitorState::new(target, last_section(self.outline));
        let mut steps = vec![Step::Open(SectionId::ROOT)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(id) => {
                    let children = self.open_section(&mut state, id);
                    steps.push(Step::Close);
                    steps.extend(children.iter().rev().map(|&child| Step::Open(child)));
                }
                Step::Close => state.output.append(Call::exit(Tag::Section)),
            }
        }

        Serialized {
            calls: state.output,
            warnings: state.warnings,
        }
    }

    /// Table of contents in visiting order, root excluded.
    ///
    /// Ids match the ones written into serialized headings.
    #[must_use]
    pub fn table_of_contents(&self) -> Vec<TocEntry> {
        let mut ids = HeadingIds::default();
        self.outline
            .pre_order()
            .filter(|section| !section.is_root())
            .map(|section| {
                let id = ids.assign(section.explicit_heading_id(), section.label());
                TocEntry::new(&id, section.label(), section.level())
            })
            .collect()
    }

    /// Emit everything of a section up to its children; return the children to visit.
    fn open_section(&mut self, state: &mut VisitorState, id: SectionId) -> &'a [SectionId] {
        let outline: &'a Outline = self.outline;
        let section = outline.section(id);
        let ordinal = state.section_ordinal;
        state.section_ordinal += 1;

        state
            .output
            .append(Call::enter(Tag::Section).with_attr(LEVEL_ATTRIBUTE, section.level()));

        let (mut heading, heading_id) = if section.is_root() {
            (Vec::new(), None)
        } else {
            let (calls, id) = state.heading(section);
            (calls, Some(id))
        };
        let mut content = section.content_calls().to_vec();
        let mut lines = section.content_line_count();
        let mut children = section.children();

        if let Some(child) = self.flattened_child(state.target, section) {
            tracing::debug!(label = child.label(), "Flattening sole level-1 section into page header");
            let (child_heading, _) = state.heading(child);
            heading.extend(child_heading);
            content.extend(self.capture_featured_image(state, child));
            lines += child.content_line_count();
            children = child.children();
        }

        let marker = self.ad_marker(state, id, ordinal, lines);
        let button = match heading_id {
            Some(heading_id) => self.edit_button(state, section, &heading_id),
            None => None,
        };

        let output = &mut state.output;
        if children.is_empty() {
            output.append_all(marker);
            output.append_all(heading);
            output.append_all(content);
            output.append_all(button);
        } else {
            let header = state.target == Target::Full
                && (!heading.is_empty() || !content.is_empty() || marker.is_some());
            if header {
                output.append(Call::enter(Tag::Header));
            }
            output.append_all(heading);
            output.append_all(content);
            output.append_all(marker);
            output.append_all(button);
            if header {
                output.append(Call::exit(Tag::Header));
            }
        }
        children
    }

    /// The root's sole level-1 child, when header metadata capture applies.
    /// A heading clamped up to level 1 does not count.
    fn flattened_child(&self, target: Target, section: &OutlineSection) -> Option<&'a OutlineSection> {
        if target != Target::Full || !self.options.capture_header_metadata || !section.is_root() {
            return None;
        }
        match section.children() {
            [only] => {
                let child = self.outline.section(*only);
                (child.level() == 1 && child.declared_level() == 1).then_some(child)
            }
            _ => None,
        }
    }

    /// Content of `section`, with a leading featured image reported to the
    /// metadata sink and hidden.
    fn capture_featured_image(&mut self, state: &mut VisitorState, section: &OutlineSection) -> Vec<Call> {
        let mut content = section.content_calls().to_vec();
        let Some(index) = featured_image_index(&content) else {
            return content;
        };
        let Some(sink) = self.sink.as_deref_mut() else {
            return content;
        };

        let image = &mut content[index];
        let Some(src) = image.attributes.get_str("src").map(str::to_owned) else {
            return content;
        };
        match sink.set_featured_image(ImageKind::from_path(&src), &src) {
            Ok(()) => {
                image.attributes.set("display", "none");
            }
            Err(e) => state.warn(format!("Failed to record featured image {src}: {e}")),
        }
        content
    }

    fn ad_marker(
        &self,
        state: &mut VisitorState,
        id: SectionId,
        ordinal: usize,
        lines: usize,
    ) -> Option<Call> {
        if state.target != Target::Full {
            return None;
        }
        let policy = self.ad_policy?;

        state.cumulative_lines += lines;
        let slot = AdSlotContext {
            section_lines: lines,
            cumulative_lines: state.cumulative_lines,
            section_ordinal: ordinal,
            ads_inserted: state.ads_inserted,
            is_last_section: id == state.last_section,
        };
        match policy.should_insert(&slot) {
            Ok(true) => {
                state.ads_inserted += 1;
                state.cumulative_lines = 0;
                Some(Call::special(Tag::AdMarker).with_attr("name", format!("ad-{}", state.ads_inserted)))
            }
            Ok(false) => None,
            Err(e) => {
                state.warn(format!("Ad policy failed for section {ordinal}: {e}"));
                None
            }
        }
    }

    fn edit_button(
        &self,
        state: &mut VisitorState,
        section: &OutlineSection,
        heading_id: &str,
    ) -> Option<Call> {
        if state.target != Target::Full || !self.options.edit_buttons {
            return None;
        }
        let start = section.start_pos()?;

        state.edit_sequence += 1;
        let button = EditButton::for_section(
            &self.options.wiki_id,
            state.edit_sequence,
            section.label(),
            start,
            section.end_pos(),
        )
        .with_heading_id(heading_id);
        match button.to_json() {
            Ok(json) => Some(
                Call::special(Tag::EditButton)
                    .with_attr("secid", state.edit_sequence)
                    .with_payload(json),
            ),
            Err(e) => {
                state.warn(format!("Failed to encode edit button: {e}"));
                None
            }
        }
    }
}

/// Index of a media call leading `calls` and followed by text.
///
/// Paragraph markers and blank text before the image are skipped.
fn featured_image_index(calls: &[Call]) -> Option<usize> {
    let is_layout = |call: &Call| {
        call.tag == Tag::Paragraph || call.text_content().is_some_and(|t| t.trim().is_empty())
    };
    let mut significant = calls.iter().enumerate().filter(|(_, call)| !is_layout(call));

    let (index, first) = significant.next()?;
    if first.tag != Tag::Media || first.is_exit() {
        return None;
    }
    first.attributes.get_str("src").filter(|src| !src.is_empty())?;

    significant
        .any(|(_, call)| call.text_content().is_some_and(|t| !t.trim().is_empty()))
        .then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::IntervalAdPolicy;
    use crate::metadata::{CollaboratorError, PageMetadata};
    use crate::test_support::{heading, text};
    use pretty_assertions::assert_eq;
    use wm_callstack::CallState;

    fn outline(calls: Vec<Call>) -> Outline {
        Outline::build(CallStack::from(calls)).unwrap()
    }

    fn shape(calls: &CallStack) -> Vec<String> {
        calls
            .calls()
            .iter()
            .map(|call| match call.state {
                CallState::Enter => format!("+{}", call.name()),
                CallState::Exit => format!("-{}", call.name()),
                CallState::Special => format!("*{}", call.name()),
                CallState::Unmatched => call.payload.clone().unwrap_or_default(),
            })
            .collect()
    }

    fn sample() -> Outline {
        let mut calls = vec![text("intro")];
        calls.extend(heading(1, "Intro", 0));
        calls.push(text("hello"));
        calls.extend(heading(1, "Next", 100));
        calls.push(text("world"));
        outline(calls)
    }

    fn edit_buttons(calls: &CallStack) -> Vec<EditButton> {
        calls
            .calls()
            .iter()
            .filter(|call| call.tag == Tag::EditButton)
            .map(|call| EditButton::from_json(call.payload.as_deref().unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_full_serialization_shape() {
        let outline = sample();
        let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_full();
        assert_eq!(
            shape(&result.calls),
            vec![
                "+section", "+header", "intro", "-header", "+section", "+heading", "Intro",
                "-heading", "hello", "*edit-button", "-section", "+section", "+heading", "Next",
                "-heading", "world", "*edit-button", "-section", "-section",
            ]
        );
        assert!(result.calls.check_balance().is_ok());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_dynamic_serialization_has_no_injections() {
        let outline = sample();
        let policy = |_: &AdSlotContext| -> Result<bool, CollaboratorError> { Ok(true) };
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_ad_policy(&policy)
            .serialize_dynamic();
        assert_eq!(
            shape(&result.calls),
            vec![
                "+section", "intro", "+section", "+heading", "Intro", "-heading", "hello",
                "-section", "+section", "+heading", "Next", "-heading", "world", "-section",
                "-section",
            ]
        );
        assert!(
            result
                .calls
                .calls()
                .iter()
                .all(|call| !matches!(call.tag, Tag::EditButton | Tag::AdMarker | Tag::Header))
        );
    }

    #[test]
    fn test_section_level_and_heading_id_attributes() {
        let outline = sample();
        let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_dynamic();
        let calls = result.calls.calls();
        assert_eq!(calls[0].attributes.get_int(LEVEL_ATTRIBUTE), Some(0));
        assert_eq!(calls[2].attributes.get_int(LEVEL_ATTRIBUTE), Some(1));
        assert_eq!(calls[3].attributes.get_str("id"), Some("intro"));
        assert_eq!(calls[9].attributes.get_str("id"), Some("next"));
        assert_eq!(outline.section(SectionId(1)).heading_calls()[0].attributes.get_str("id"), None);
    }

    #[test]
    fn test_edit_button_ranges() {
        let outline = sample();
        let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_full();
        let buttons = edit_buttons(&result.calls);
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].range, "0-99");
        assert_eq!(buttons[0].form_id, "edit-section-1");
        assert_eq!(buttons[0].heading_id.as_deref(), Some("intro"));
        assert_eq!(buttons[1].range, "100-");
        assert_eq!(buttons[1].message, "Next");
        assert_eq!(buttons[1].section_id, 2);
    }

    #[test]
    fn test_open_ended_section_range() {
        let mut calls = heading(1, "Head", 0);
        calls.extend(heading(1, "Tail", 100));
        let outline = outline(calls);
        let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_full();
        let buttons = edit_buttons(&result.calls);
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].range, "0-99");
        assert_eq!(buttons[1].range, "100-");
    }

    #[test]
    fn test_clamped_heading_is_not_flattened() {
        let outline = outline(heading(2, "Tail", 100));
        assert_eq!(outline.section(SectionId(1)).level(), 1);
        let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_full();
        let buttons = edit_buttons(&result.calls);
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].range, "100-");
        assert_eq!(buttons[0].message, "Tail");
    }

    #[test]
    fn test_edit_buttons_disabled() {
        let outline = sample();
        let options = VisitorOptions {
            edit_buttons: false,
            ..VisitorOptions::default()
        };
        let result = OutlineVisitor::new(&outline, options).serialize_full();
        assert!(edit_buttons(&result.calls).is_empty());
    }

    #[test]
    fn test_header_wrapper_for_sections_with_children() {
        let mut calls = heading(2, "Parent", 0);
        calls.push(text("lead"));
        calls.extend(heading(3, "Child", 50));
        let outline = outline(calls);
        let options = VisitorOptions {
            edit_buttons: false,
            capture_header_metadata: false,
            ..VisitorOptions::default()
        };
        let result = OutlineVisitor::new(&outline, options).serialize_full();
        assert_eq!(
            shape(&result.calls),
            vec![
                "+section", "+section", "+header", "+heading", "Parent", "-heading", "lead",
                "-header", "+section", "+heading", "Child", "-heading", "-section", "-section",
                "-section",
            ]
        );
    }

    #[test]
    fn test_toc_is_idempotent() {
        let mut calls = heading(1, "Guide", 0);
        calls.extend(heading(2, "Setup", 10));
        calls.extend(heading(2, "Setup", 20));
        calls.extend(heading(4, "Deep", 30));
        let outline = outline(calls);
        let visitor = OutlineVisitor::new(&outline, VisitorOptions::default());

        let first = visitor.table_of_contents();
        let second = visitor.table_of_contents();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                TocEntry::new("guide", "Guide", 1),
                TocEntry::new("setup", "Setup", 2),
                TocEntry::new("setup-1", "Setup", 2),
                TocEntry::new("deep", "Deep", 3),
            ]
        );
    }

    #[test]
    fn test_serialization_does_not_mutate_outline() {
        let outline = sample();
        let before = outline.clone();
        let mut visitor = OutlineVisitor::new(&outline, VisitorOptions::default());
        let first = visitor.serialize_full();
        let second = visitor.serialize_full();
        assert_eq!(first.calls.calls(), second.calls.calls());
        assert_eq!(
            outline.sections().collect::<Vec<_>>(),
            before.sections().collect::<Vec<_>>()
        );
    }

    fn page_with_image(src: &str) -> Outline {
        let mut calls = heading(1, "Product", 0);
        calls.push(Call::enter(Tag::Paragraph));
        calls.push(Call::enter(Tag::Media).with_attr("src", src));
        calls.push(Call::exit(Tag::Media));
        calls.push(Call::exit(Tag::Paragraph));
        calls.push(text("Description"));
        calls.extend(heading(2, "Details", 50));
        outline(calls)
    }

    #[test]
    fn test_featured_image_capture_and_flatten() {
        let outline = page_with_image("shot.png");
        let mut metadata = PageMetadata::default();
        let options = VisitorOptions {
            edit_buttons: false,
            ..VisitorOptions::default()
        };
        let result = OutlineVisitor::new(&outline, options)
            .with_metadata_sink(&mut metadata)
            .serialize_full();

        assert_eq!(metadata.featured_raster_image.as_deref(), Some("shot.png"));
        assert_eq!(
            shape(&result.calls),
            vec![
                "+section", "+header", "+heading", "Product", "-heading", "+p", "+media",
                "-media", "-p", "Description", "-header", "+section", "+heading", "Details",
                "-heading", "-section", "-section",
            ]
        );
        let media = &result.calls.calls()[6];
        assert_eq!(media.attributes.get_str("display"), Some("none"));
        assert_eq!(media.attributes.get_str("src"), Some("shot.png"));
    }

    #[test]
    fn test_vector_featured_image() {
        let outline = page_with_image("logo.svg");
        let mut metadata = PageMetadata::default();
        OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_metadata_sink(&mut metadata)
            .serialize_full();
        assert_eq!(metadata.featured_vector_image.as_deref(), Some("logo.svg"));
        assert_eq!(metadata.featured_raster_image, None);
    }

    #[test]
    fn test_no_flatten_with_several_level_one_sections() {
        let mut calls = heading(1, "A", 0);
        calls.push(Call::enter(Tag::Media).with_attr("src", "a.png"));
        calls.push(Call::exit(Tag::Media));
        calls.push(text("text"));
        calls.extend(heading(1, "B", 50));
        let outline = outline(calls);
        let mut metadata = PageMetadata::default();
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_metadata_sink(&mut metadata)
            .serialize_full();
        assert_eq!(metadata, PageMetadata::default());
        assert_eq!(edit_buttons(&result.calls).len(), 2);
    }

    #[test]
    fn test_image_not_leading_is_not_featured() {
        assert_eq!(
            featured_image_index(&[
                text("first"),
                Call::enter(Tag::Media).with_attr("src", "a.png"),
                Call::exit(Tag::Media),
            ]),
            None
        );
        assert_eq!(
            featured_image_index(&[
                Call::enter(Tag::Paragraph),
                text("  "),
                Call::enter(Tag::Media).with_attr("src", "a.png"),
                Call::exit(Tag::Media),
                text("caption"),
            ]),
            Some(2)
        );
        assert_eq!(
            featured_image_index(&[
                Call::enter(Tag::Media).with_attr("src", "a.png"),
                Call::exit(Tag::Media),
            ]),
            None
        );
    }

    struct FailingSink;

    impl MetadataSink for FailingSink {
        fn set_title(&mut self, _title: &str) -> Result<(), CollaboratorError> {
            Ok(())
        }

        fn set_featured_image(&mut self, _kind: ImageKind, _path: &str) -> Result<(), CollaboratorError> {
            Err("metadata store is read-only".into())
        }
    }

    #[test]
    fn test_failing_sink_keeps_image_visible() {
        let outline = page_with_image("shot.png");
        let mut sink = FailingSink;
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_metadata_sink(&mut sink)
            .serialize_full();
        assert_eq!(result.warnings.len(), 1);
        let media = result
            .calls
            .calls()
            .iter()
            .find(|call| call.tag == Tag::Media)
            .unwrap();
        assert_eq!(media.attributes.get_str("display"), None);
    }

    fn long_document(sections: usize) -> Outline {
        let mut calls = Vec::new();
        for i in 0..sections {
            calls.extend(heading(1, &format!("S{i}"), i * 100));
            calls.push(text(&"line\n".repeat(10)));
        }
        outline(calls)
    }

    fn ad_positions(calls: &CallStack) -> Vec<usize> {
        calls
            .calls()
            .iter()
            .enumerate()
            .filter(|(_, call)| call.tag == Tag::AdMarker)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_interval_ad_policy() {
        let outline = long_document(13);
        let policy = IntervalAdPolicy::default();
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_ad_policy(&policy)
            .serialize_full();

        // 10 lines per section, 25 needed: every third section gets a marker.
        let markers: Vec<_> = result
            .calls
            .calls()
            .iter()
            .filter(|call| call.tag == Tag::AdMarker)
            .filter_map(|call| call.attributes.get_str("name"))
            .collect();
        assert_eq!(markers, vec!["ad-1", "ad-2", "ad-3", "ad-4"]);
        assert_eq!(ad_positions(&result.calls).len(), 4);
    }

    #[test]
    fn test_ad_marker_comes_first_in_leaf_section() {
        let outline = long_document(2);
        let policy = |slot: &AdSlotContext| -> Result<bool, CollaboratorError> {
            Ok(slot.section_ordinal == 1)
        };
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_ad_policy(&policy)
            .serialize_full();
        assert_eq!(ad_positions(&result.calls), vec![2]);
    }

    #[test]
    fn test_last_section_is_reported_to_policy() {
        let outline = long_document(3);
        let seen = std::cell::RefCell::new(Vec::new());
        let policy = |slot: &AdSlotContext| -> Result<bool, CollaboratorError> {
            seen.borrow_mut().push((slot.section_ordinal, slot.is_last_section));
            Ok(false)
        };
        OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_ad_policy(&policy)
            .serialize_full();
        assert_eq!(
            seen.into_inner(),
            vec![(0, false), (1, false), (2, false), (3, true)]
        );
    }

    #[test]
    fn test_failing_ad_policy_is_skipped() {
        let outline = long_document(2);
        let policy =
            |_: &AdSlotContext| -> Result<bool, CollaboratorError> { Err("ad server down".into()) };
        let result = OutlineVisitor::new(&outline, VisitorOptions::default())
            .with_ad_policy(&policy)
            .serialize_full();
        assert!(ad_positions(&result.calls).is_empty());
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(edit_buttons(&result.calls).len(), 2);
    }
}
