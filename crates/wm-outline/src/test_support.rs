use wm_callstack::{Call, HeadingSyntax, OUTLINE_CONTEXT, Tag};

use crate::outline::LEVEL_ATTRIBUTE;

/// ATX outline heading: enter, label text, exit. Spans `pos..pos + label + 2`.
pub(crate) fn heading(level: usize, label: &str, pos: usize) -> Vec<Call> {
    heading_with_syntax(HeadingSyntax::Atx, level, label, pos)
}

pub(crate) fn heading_with_syntax(
    syntax: HeadingSyntax,
    level: usize,
    label: &str,
    pos: usize,
) -> Vec<Call> {
    let end = pos + label.len() + 2;
    vec![
        Call::enter(Tag::Heading(syntax))
            .with_attr(LEVEL_ATTRIBUTE, level)
            .with_context(OUTLINE_CONTEXT)
            .with_span(pos, end),
        Call::text(label),
        Call::exit(Tag::Heading(syntax)).with_context(OUTLINE_CONTEXT),
    ]
}

pub(crate) fn text(content: &str) -> Call {
    Call::text(content)
}
