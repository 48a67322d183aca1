//! Flat instruction sequence for wiki markup processing.
//!
//! A tokenizer turns markup into a linear list of [`Call`]s (tag, lifecycle
//! state, attributes, source span). Processing passes then walk and rewrite
//! that list through a [`CallStack`], which adds a cursor, bracket matching
//! between `Enter`/`Exit` calls, structural navigation (parent, first child,
//! next sibling) and in-place splicing.
//!
//! # Example
//!
//! ```
//! use wm_callstack::{Call, CallStack, Tag};
//!
//! let mut stack = CallStack::from(vec![
//!     Call::enter(Tag::other("box")),
//!     Call::enter(Tag::Paragraph),
//!     Call::text("hello"),
//!     Call::exit(Tag::Paragraph),
//!     Call::exit(Tag::other("box")),
//! ]);
//!
//! stack.move_to_end();
//! stack.previous();
//! let opening = stack.move_to_previous_corresponding_opening_call().unwrap();
//! assert_eq!(opening.tag.name(), "box");
//! ```

mod attributes;
mod call;
mod error;
mod stack;

pub use attributes::{AttributeValue, Attributes};
pub use call::{Call, CallState, HeadingSyntax, OUTLINE_CONTEXT, Tag};
pub use error::CallStackError;
pub use stack::{CallStack, Cursor};
