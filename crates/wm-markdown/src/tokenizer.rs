//! Markdown to call stack conversion.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag as MdTag};
use wm_callstack::{Call, CallStack, HeadingSyntax, OUTLINE_CONTEXT, Tag};

/// Container tags whose headings are decorative titles, not sections.
const COMPONENT_CONTAINERS: [&str; 3] = ["blockquote", "li", "footnote"];

/// Converts CommonMark text into a raw call stack.
#[derive(Clone, Debug)]
pub struct MarkdownTokenizer {
    gfm: bool,
}

impl Default for MarkdownTokenizer {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl MarkdownTokenizer {
    /// Create a tokenizer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    ///
    /// Heading attributes (`# Title {#id}`) are always enabled.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_HEADING_ATTRIBUTES;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            base
        }
    }

    /// Tokenize `markdown` into calls with byte spans.
    #[must_use]
    pub fn tokenize(&self, markdown: &str) -> CallStack {
        let mut state = TokenizerState {
            source: markdown,
            stack: CallStack::new(),
            open: Vec::new(),
        };
        for (event, range) in Parser::new_ext(markdown, self.parser_options()).into_offset_iter() {
            state.event(event, range);
        }
        if !state.open.is_empty() {
            tracing::warn!(open = state.open.len(), "Markdown events left tags open");
        }
        state.stack
    }
}

struct TokenizerState<'a> {
    source: &'a str,
    stack: CallStack,
    open: Vec<Tag>,
}

impl TokenizerState<'_> {
    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        let call = match event {
            Event::Start(tag) => {
                let call = self.start(tag, &range);
                self.open.push(call.tag.clone());
                call
            }
            Event::End(_) => {
                let Some(tag) = self.open.pop() else {
                    tracing::warn!(start = range.start, "Unbalanced markdown end event");
                    return;
                };
                Call::exit(tag)
            }
            Event::Text(text) => Call::text(text.into_string()),
            Event::Code(code) => {
                let span = (range.start, range.end);
                self.stack
                    .append(Call::enter(Tag::other("code")).with_span(span.0, span.1));
                self.stack.append(Call::text(code.into_string()));
                self.stack
                    .append(Call::exit(Tag::other("code")).with_span(span.0, span.1));
                return;
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                Call::special(Tag::other("html")).with_payload(html.into_string())
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                Call::special(Tag::other("math")).with_payload(math.into_string())
            }
            Event::FootnoteReference(name) => {
                Call::special(Tag::other("footnote-ref")).with_attr("name", name.into_string())
            }
            Event::SoftBreak => Call::text("\n"),
            Event::HardBreak => Call::special(Tag::other("br")),
            Event::Rule => Call::special(Tag::other("hr")),
            Event::TaskListMarker(checked) => {
                Call::special(Tag::other("checkbox")).with_attr("checked", checked)
            }
        };
        self.stack.append(call.with_span(range.start, range.end));
    }

    fn start(&self, tag: MdTag<'_>, range: &Range<usize>) -> Call {
        match tag {
            MdTag::Heading { level, id, .. } => {
                let mut call = Call::enter(Tag::Heading(self.heading_syntax(range)))
                    .with_attr("level", heading_level_to_num(level))
                    .with_context(self.heading_context());
                if let Some(id) = id {
                    call = call.with_attr("id", id.into_string());
                }
                call
            }
            MdTag::Paragraph => Call::enter(Tag::Paragraph),
            MdTag::Image {
                dest_url, title, ..
            } => {
                let call = Call::enter(Tag::Media).with_attr("src", dest_url.into_string());
                if title.is_empty() {
                    call
                } else {
                    call.with_attr("title", title.into_string())
                }
            }
            MdTag::Link { dest_url, .. } => {
                Call::enter(Tag::other("a")).with_attr("href", dest_url.into_string())
            }
            MdTag::CodeBlock(kind) => {
                let call = Call::enter(Tag::other("pre"));
                match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        call.with_attr("lang", lang.into_string())
                    }
                    _ => call,
                }
            }
            MdTag::List(Some(start)) => {
                Call::enter(Tag::other("ol")).with_attr("start", i64::try_from(start).unwrap_or(i64::MAX))
            }
            MdTag::List(None) => Call::enter(Tag::other("ul")),
            MdTag::BlockQuote(_) => Call::enter(Tag::other("blockquote")),
            MdTag::Item => Call::enter(Tag::other("li")),
            MdTag::FootnoteDefinition(name) => {
                Call::enter(Tag::other("footnote")).with_attr("name", name.into_string())
            }
            MdTag::HtmlBlock => Call::enter(Tag::other("html-block")),
            MdTag::MetadataBlock(_) => Call::enter(Tag::other("metadata")),
            MdTag::DefinitionList => Call::enter(Tag::other("dl")),
            MdTag::DefinitionListTitle => Call::enter(Tag::other("dt")),
            MdTag::DefinitionListDefinition => Call::enter(Tag::other("dd")),
            MdTag::Table(_) => Call::enter(Tag::other("table")),
            MdTag::TableHead => Call::enter(Tag::other("thead")),
            MdTag::TableRow => Call::enter(Tag::other("tr")),
            MdTag::TableCell => Call::enter(Tag::other("td")),
            MdTag::Emphasis => Call::enter(Tag::other("em")),
            MdTag::Strong => Call::enter(Tag::other("strong")),
            MdTag::Strikethrough => Call::enter(Tag::other("s")),
            MdTag::Superscript => Call::enter(Tag::other("sup")),
            MdTag::Subscript => Call::enter(Tag::other("sub")),
        }
    }

    /// ATX headings start with `#`; setext headings span two lines.
    fn heading_syntax(&self, range: &Range<usize>) -> HeadingSyntax {
        let line = self.source.get(range.start..).unwrap_or_default();
        if line.trim_start_matches(' ').starts_with('#') {
            HeadingSyntax::Atx
        } else {
            HeadingSyntax::Block
        }
    }

    /// Innermost component container name, or the outline context.
    fn heading_context(&self) -> &'static str {
        self.open
            .iter()
            .rev()
            .find_map(|tag| {
                COMPONENT_CONTAINERS
                    .iter()
                    .find(|name| **name == tag.name())
                    .copied()
            })
            .unwrap_or(OUTLINE_CONTEXT)
    }
}

/// Convert heading level to number.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
