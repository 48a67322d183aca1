//! CommonMark tokenizer producing wiki call stacks.
//!
//! [`MarkdownTokenizer`] drives pulldown-cmark's offset iterator and maps
//! every event to a [`Call`](wm_callstack::Call) carrying its byte span, so
//! the outline builder can compute section ranges for edit buttons.
//!
//! # Example
//!
//! ```
//! use wm_callstack::Tag;
//! use wm_markdown::MarkdownTokenizer;
//!
//! let stack = MarkdownTokenizer::new().tokenize("# Hello\n\nWorld\n");
//! let first = &stack.calls()[0];
//! assert!(matches!(first.tag, Tag::Heading(_)));
//! assert!(first.is_outline_context());
//! assert_eq!(first.start_pos, Some(0));
//! ```

mod tokenizer;

pub use tokenizer::MarkdownTokenizer;
