//! Cursor-based navigation and splicing over a flat call sequence.
//!
//! The sequence stays flat, the way the tokenizer produced it. Nesting is
//! inferred from `Enter`/`Exit` pairs by a single depth-counting scan
//! ([`CallStack::scan_matching`]) shared by every "move to X" operation.
//! All moves are linear scans from the cursor.

use crate::call::{Call, CallState};
use crate::error::CallStackError;

/// Cursor position within a [`CallStack`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Before the first call; [`CallStack::next`] returns the first call.
    #[default]
    BeforeStart,
    /// On the call at this index.
    At(usize),
    /// After the last call; [`CallStack::previous`] returns the last call.
    AfterEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

/// Ordered, mutable call sequence with a movable cursor.
///
/// The cursor belongs to the stack instance, so every pass working on its own
/// stack navigates independently.
///
/// # Example
///
/// ```
/// use wm_callstack::{Call, CallStack, Tag};
///
/// let mut stack = CallStack::from(vec![Call::text("a"), Call::text("b")]);
/// let mut seen = Vec::new();
/// while let Some(call) = stack.next() {
///     seen.push(call.payload.clone().unwrap_or_default());
/// }
/// assert_eq!(seen, vec!["a", "b"]);
/// assert!(stack.next().is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallStack {
    calls: Vec<Call>,
    cursor: Cursor,
}

impl CallStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Check whether the stack holds no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor before the first call.
    pub fn move_to_start(&mut self) {
        self.cursor = Cursor::BeforeStart;
    }

    /// Move the cursor after the last call.
    pub fn move_to_end(&mut self) {
        self.cursor = Cursor::AfterEnd;
    }

    /// Advance the cursor and return the call under it.
    ///
    /// Returns `None` once the end is reached; the cursor then stays after the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Call> {
        self.cursor = match self.cursor {
            Cursor::BeforeStart if !self.calls.is_empty() => Cursor::At(0),
            Cursor::At(i) if i + 1 < self.calls.len() => Cursor::At(i + 1),
            _ => Cursor::AfterEnd,
        };
        self.current()
    }

    /// Step the cursor back and return the call under it.
    ///
    /// Returns `None` once the start is reached; the cursor then stays before the start.
    pub fn previous(&mut self) -> Option<&Call> {
        self.cursor = match self.cursor {
            Cursor::AfterEnd if !self.calls.is_empty() => Cursor::At(self.calls.len() - 1),
            Cursor::At(i) if i > 0 => Cursor::At(i - 1),
            _ => Cursor::BeforeStart,
        };
        self.current()
    }

    /// Call under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Call> {
        match self.cursor {
            Cursor::At(i) => self.calls.get(i),
            Cursor::BeforeStart | Cursor::AfterEnd => None,
        }
    }

    /// Mutable call under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut Call> {
        match self.cursor {
            Cursor::At(i) => self.calls.get_mut(i),
            Cursor::BeforeStart | Cursor::AfterEnd => None,
        }
    }

    /// Call that [`next`](Self::next) would return, without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<&Call> {
        match self.cursor {
            Cursor::BeforeStart => self.calls.first(),
            Cursor::At(i) => self.calls.get(i + 1),
            Cursor::AfterEnd => None,
        }
    }

    /// Move from an exit call to its corresponding opening call.
    ///
    /// The cursor must be on an `Exit` call, or after the end with an `Exit`
    /// as last call. Nested calls with the same tag name are skipped; calls
    /// with other tag names are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CallStackError::NoOpeningCall`] when the sequence holds no
    /// opening call for the exit (the cursor is left where it was), or
    /// [`CallStackError::UnexpectedCursor`] when the cursor is not on an exit.
    pub fn move_to_previous_corresponding_opening_call(&mut self) -> Result<&Call, CallStackError> {
        let index = match self.cursor {
            Cursor::At(i) => i,
            Cursor::AfterEnd if !self.calls.is_empty() => self.calls.len() - 1,
            _ => return Err(CallStackError::UnexpectedCursor { expected: "an exit" }),
        };
        let exit = &self.calls[index];
        if !exit.is_exit() {
            return Err(CallStackError::UnexpectedCursor { expected: "an exit" });
        }
        let tag = exit.name().to_owned();
        match self.scan_matching(index, Direction::Backward, Some(&tag)) {
            Some(opening) => {
                self.cursor = Cursor::At(opening);
                Ok(&self.calls[opening])
            }
            None => {
                tracing::debug!(tag = %tag, index, "No opening call for exit");
                Err(CallStackError::NoOpeningCall { tag, index })
            }
        }
    }

    /// Move from an opening call to its corresponding exit call.
    ///
    /// # Errors
    ///
    /// Returns [`CallStackError::NoClosingCall`] when the opening call is never
    /// closed (the cursor is left where it was), or
    /// [`CallStackError::UnexpectedCursor`] when the cursor is not on an enter.
    pub fn move_to_next_corresponding_exit_call(&mut self) -> Result<&Call, CallStackError> {
        let Some(index) = self.index().filter(|&i| self.calls[i].is_enter()) else {
            return Err(CallStackError::UnexpectedCursor { expected: "an enter" });
        };
        let tag = self.calls[index].name().to_owned();
        match self.scan_matching(index, Direction::Forward, Some(&tag)) {
            Some(closing) => {
                self.cursor = Cursor::At(closing);
                Ok(&self.calls[closing])
            }
            None => {
                tracing::debug!(tag = %tag, index, "No closing call for enter");
                Err(CallStackError::NoClosingCall { tag, index })
            }
        }
    }

    /// Move to the nearest opening call structurally containing the cursor.
    ///
    /// Fully nested sibling subtrees before the cursor are skipped. When the
    /// cursor is on an exit call, the parent of the closed element is returned.
    /// Returns `None` at the top level (the cursor is left unchanged).
    pub fn move_to_parent(&mut self) -> Option<&Call> {
        let mut from = match self.cursor {
            Cursor::At(i) => i,
            Cursor::AfterEnd => self.calls.len(),
            Cursor::BeforeStart => return None,
        };
        if let Some(call) = self.calls.get(from).filter(|call| call.is_exit()) {
            let tag = call.name().to_owned();
            from = self.scan_matching(from, Direction::Backward, Some(&tag))?;
        }
        let parent = self.scan_matching(from, Direction::Backward, None)?;
        self.cursor = Cursor::At(parent);
        self.current()
    }

    /// Move from an opening call to its first child tag.
    ///
    /// Text filler (`Unmatched` calls) is skipped. Returns `None` when the
    /// cursor is not on an opening call or the element has no child tag.
    pub fn move_to_first_child_tag(&mut self) -> Option<&Call> {
        let index = self.index().filter(|&i| self.calls[i].is_enter())?;
        let child = self.next_tag_after(index)?;
        self.cursor = Cursor::At(child);
        self.current()
    }

    /// Move to the next sibling tag, skipping the subtree of the current call.
    ///
    /// Returns `None` when the parent closes first or the sequence ends.
    pub fn move_to_next_sibling_tag(&mut self) -> Option<&Call> {
        let index = self.index()?;
        let call = &self.calls[index];
        let end = if call.is_enter() {
            let tag = call.name().to_owned();
            self.scan_matching(index, Direction::Forward, Some(&tag))?
        } else {
            index
        };
        let sibling = self.next_tag_after(end)?;
        self.cursor = Cursor::At(sibling);
        self.current()
    }

    /// Insert a call before the cursor.
    ///
    /// The cursor stays on the same call, so [`next`](Self::next) is unaffected.
    /// Before the start the call is prepended; after the end it is appended.
    pub fn insert_before(&mut self, call: Call) {
        match self.cursor {
            Cursor::At(i) => {
                self.calls.insert(i, call);
                self.cursor = Cursor::At(i + 1);
            }
            Cursor::BeforeStart => self.calls.insert(0, call),
            Cursor::AfterEnd => self.calls.push(call),
        }
    }

    /// Insert a call after the cursor without moving it.
    ///
    /// The next call returned by [`next`](Self::next) is the inserted one.
    pub fn insert_after(&mut self, call: Call) {
        match self.cursor {
            Cursor::At(i) => self.calls.insert(i + 1, call),
            Cursor::BeforeStart => self.calls.insert(0, call),
            Cursor::AfterEnd => self.calls.push(call),
        }
    }

    /// Delete the call under the cursor and return it.
    ///
    /// The cursor moves to the previous call, so [`next`](Self::next) returns
    /// the call that followed the deleted one.
    pub fn delete_actual_call(&mut self) -> Option<Call> {
        let index = self.index()?;
        let removed = self.calls.remove(index);
        self.cursor = match index {
            0 => Cursor::BeforeStart,
            i => Cursor::At(i - 1),
        };
        Some(removed)
    }

    /// Delete the call under the cursor and the call just before it.
    ///
    /// Used to drop paired open/close markers. Returns the call that was under
    /// the cursor; [`next`](Self::next) then returns the call that followed it.
    /// On the first call there is no pair to drop: the stack is left untouched
    /// and `None` is returned.
    pub fn delete_actual_call_and_previous(&mut self) -> Option<Call> {
        let index = self.index()?;
        if index == 0 {
            tracing::warn!("No previous call to delete at the start of the stack");
            return None;
        }
        let removed = self.calls.remove(index);
        self.calls.remove(index - 1);
        self.cursor = match index {
            1 => Cursor::BeforeStart,
            i => Cursor::At(i - 2),
        };
        Some(removed)
    }

    /// Append a call at the end of the sequence.
    pub fn append(&mut self, call: Call) {
        self.calls.push(call);
    }

    /// Append several calls at the end of the sequence.
    pub fn append_all(&mut self, calls: impl IntoIterator<Item = Call>) {
        self.calls.extend(calls);
    }

    /// Remove every call and reset the cursor.
    pub fn empty(&mut self) {
        self.calls.clear();
        self.cursor = Cursor::BeforeStart;
    }

    /// Backing sequence.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Consume the stack and return the backing sequence.
    #[must_use]
    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }

    /// Validate that every `Enter` is closed by an `Exit` of the same tag at
    /// the same depth.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, scanning forward.
    pub fn check_balance(&self) -> Result<(), CallStackError> {
        let mut open: Vec<(&str, usize)> = Vec::new();
        for (index, call) in self.calls.iter().enumerate() {
            match call.state {
                CallState::Enter => open.push((call.name(), index)),
                CallState::Exit => match open.pop() {
                    Some((name, _)) if name == call.name() => {}
                    Some((name, _)) => {
                        return Err(CallStackError::Unbalanced {
                            index,
                            expected: name.to_owned(),
                            found: call.name().to_owned(),
                        });
                    }
                    None => {
                        return Err(CallStackError::NoOpeningCall {
                            tag: call.name().to_owned(),
                            index,
                        });
                    }
                },
                CallState::Special | CallState::Unmatched => {}
            }
        }
        match open.pop() {
            Some((name, index)) => Err(CallStackError::NoClosingCall {
                tag: name.to_owned(),
                index,
            }),
            None => Ok(()),
        }
    }

    fn index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(i) if i < self.calls.len() => Some(i),
            _ => None,
        }
    }

    /// First tag call after `index` at the same depth, or `None` when an exit
    /// (the parent closing) or the end comes first.
    fn next_tag_after(&self, index: usize) -> Option<usize> {
        self.calls
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, call)| call.is_tag())
            .filter(|(_, call)| !call.is_exit())
            .map(|(i, _)| i)
    }

    /// Find the call closing the depth level entered at `from` (exclusive).
    ///
    /// Scanning backward, an `Exit` nests one level deeper and an `Enter` at
    /// depth zero is the match; forward it is the reverse. With a tag name only
    /// calls of that name are counted, otherwise every tag counts.
    fn scan_matching(&self, from: usize, direction: Direction, tag: Option<&str>) -> Option<usize> {
        let (nests, closes) = match direction {
            Direction::Backward => (CallState::Exit, CallState::Enter),
            Direction::Forward => (CallState::Enter, CallState::Exit),
        };
        let mut depth = 0usize;
        let mut index = from;
        loop {
            index = match direction {
                Direction::Backward => index.checked_sub(1)?,
                Direction::Forward => Some(index + 1).filter(|&i| i < self.calls.len())?,
            };
            let call = &self.calls[index];
            if tag.is_some_and(|name| call.name() != name) {
                continue;
            }
            if call.state == nests {
                depth += 1;
            } else if call.state == closes {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
        }
    }
}

impl From<Vec<Call>> for CallStack {
    fn from(calls: Vec<Call>) -> Self {
        Self {
            calls,
            cursor: Cursor::BeforeStart,
        }
    }
}

impl FromIterator<Call> for CallStack {
    fn from_iter<I: IntoIterator<Item = Call>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for CallStack {
    type Item = Call;
    type IntoIter = std::vec::IntoIter<Call>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.into_iter()
    }
}
