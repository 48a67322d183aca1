//! Section outline for wiki call stacks.
//!
//! This crate turns the flat call sequence produced by a tokenizer into a
//! tree of sections keyed by heading level, and flattens that tree back into
//! a call sequence for a specific output target.
//!
//! # Architecture
//!
//! - [`OutlineBuilder`]: single forward pass over a [`CallStack`], clamping
//!   skipped heading levels and recording [`Diagnostic`]s
//! - [`Outline`]: arena of [`OutlineSection`]s shared read-only by all targets
//! - [`OutlineVisitor`]: full-document, dynamic and table of contents output
//!
//! Page-level side effects (title, featured image) go to a [`MetadataSink`];
//! ad placement is delegated to an [`AdPolicy`].
//!
//! # Example
//!
//! ```
//! use wm_callstack::{Call, CallStack, HeadingSyntax, OUTLINE_CONTEXT, Tag};
//! use wm_outline::{Outline, OutlineVisitor, VisitorOptions};
//!
//! let heading = Tag::Heading(HeadingSyntax::Atx);
//! let stack = CallStack::from(vec![
//!     Call::enter(heading.clone()).with_attr("level", 1_i64).with_context(OUTLINE_CONTEXT),
//!     Call::text("Intro"),
//!     Call::exit(heading.clone()),
//!     Call::text("hello"),
//!     Call::enter(heading.clone()).with_attr("level", 1_i64).with_context(OUTLINE_CONTEXT),
//!     Call::text("Next"),
//!     Call::exit(heading),
//!     Call::text("world"),
//! ]);
//!
//! let outline = Outline::build(stack).unwrap();
//! assert_eq!(outline.root().children().len(), 2);
//!
//! let result = OutlineVisitor::new(&outline, VisitorOptions::default()).serialize_dynamic();
//! assert!(result.calls.check_balance().is_ok());
//! ```
//!
//! [`CallStack`]: wm_callstack::CallStack

mod ads;
mod config;
mod diagnostics;
mod edit_button;
mod metadata;
mod outline;
mod section;
mod toc;
mod visitor;
mod walk;

#[cfg(test)]
mod test_support;

pub use ads::{AdPolicy, AdSlotContext, IntervalAdPolicy};
pub use config::ad_policy;
pub use diagnostics::{Diagnostic, DiagnosticKind, OutlineError, Strictness};
pub use edit_button::{EditButton, EditMarkerError, format_range, replace_edit_markers};
pub use metadata::{CollaboratorError, ImageKind, MetadataSink, PageMetadata};
pub use outline::{DECLARED_LEVEL_ATTRIBUTE, LEVEL_ATTRIBUTE, Outline, OutlineBuilder};
pub use section::{OutlineSection, SectionId};
pub use toc::{TocEntry, slugify};
pub use visitor::{OutlineVisitor, Serialized, Target, VisitorOptions};
pub use walk::{PreOrder, SectionVisitor, last_section, walk};
