//! Depth-first pre-order traversal of an outline.
//!
//! The traversal keeps an explicit stack, so deep heading nesting cannot
//! overflow the call stack.

use crate::outline::Outline;
use crate::section::{OutlineSection, SectionId};

/// Hooks called by [`walk`] for every section.
pub trait SectionVisitor {
    /// Called before the children of `section` are visited.
    fn enter(&mut self, section: &OutlineSection, depth: usize);

    /// Called after the children of `section` were visited.
    fn leave(&mut self, _section: &OutlineSection, _depth: usize) {}
}

enum Step {
    Enter(SectionId, usize),
    Leave(SectionId, usize),
}

/// Walk the outline from the root, depth-first, pre-order.
///
/// The root is visited at depth 0.
pub fn walk<V: SectionVisitor + ?Sized>(outline: &Outline, visitor: &mut V) {
    let mut steps = vec![Step::Enter(SectionId::ROOT, 0)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id, depth) => {
                let section = outline.section(id);
                visitor.enter(section, depth);
                steps.push(Step::Leave(id, depth));
                for &child in section.children().iter().rev() {
                    steps.push(Step::Enter(child, depth + 1));
                }
            }
            Step::Leave(id, depth) => visitor.leave(outline.section(id), depth),
        }
    }
}

/// Pre-order iterator over sections, root first.
pub struct PreOrder<'a> {
    outline: &'a Outline,
    pending: Vec<SectionId>,
}

impl<'a> PreOrder<'a> {
    pub(crate) fn new(outline: &'a Outline) -> Self {
        Self {
            outline,
            pending: vec![SectionId::ROOT],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a OutlineSection;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let section = self.outline.section(id);
        self.pending.extend(section.children().iter().rev());
        Some(section)
    }
}

/// Last section in visiting order, found by descending through last children.
#[must_use]
pub fn last_section(outline: &Outline) -> SectionId {
    let mut id = SectionId::ROOT;
    while let Some(&last) = outline.section(id).children().last() {
        id = last;
    }
    id
}
