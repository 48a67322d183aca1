//! In-content advertisement placement policy.

use crate::metadata::CollaboratorError;

/// Running counters handed to an [`AdPolicy`] for each visited section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdSlotContext {
    /// Content lines of the section being visited.
    pub section_lines: usize,
    /// Content lines accumulated since the last inserted marker (including this section).
    pub cumulative_lines: usize,
    /// Ordinal of the section in visiting order (the root is 0).
    pub section_ordinal: usize,
    /// Markers inserted so far.
    pub ads_inserted: usize,
    /// Whether this is the last section of the document.
    pub is_last_section: bool,
}

/// Decides whether an ad marker is inserted in a section.
pub trait AdPolicy {
    /// Return `true` to insert a marker in the section described by `slot`.
    fn should_insert(&self, slot: &AdSlotContext) -> Result<bool, CollaboratorError>;
}

impl<F> AdPolicy for F
where
    F: Fn(&AdSlotContext) -> Result<bool, CollaboratorError>,
{
    fn should_insert(&self, slot: &AdSlotContext) -> Result<bool, CollaboratorError> {
        self(slot)
    }
}

/// Policy inserting a marker once enough content has gone by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalAdPolicy {
    /// Lines required since the previous marker.
    pub min_cumulative_lines: usize,
    /// Lines the section itself must have.
    pub min_section_lines: usize,
    /// Maximum number of markers per document.
    pub max_ads: usize,
    /// Never insert in the last section.
    pub skip_last_section: bool,
}

impl Default for IntervalAdPolicy {
    fn default() -> Self {
        Self {
            min_cumulative_lines: 25,
            min_section_lines: 3,
            max_ads: 4,
            skip_last_section: true,
        }
    }
}

impl AdPolicy for IntervalAdPolicy {
    fn should_insert(&self, slot: &AdSlotContext) -> Result<bool, CollaboratorError> {
        if slot.section_ordinal == 0 || slot.ads_inserted >= self.max_ads {
            return Ok(false);
        }
        if self.skip_last_section && slot.is_last_section {
            return Ok(false);
        }
        Ok(slot.section_lines >= self.min_section_lines
            && slot.cumulative_lines >= self.min_cumulative_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(section_lines: usize, cumulative_lines: usize) -> AdSlotContext {
        AdSlotContext {
            section_lines,
            cumulative_lines,
            section_ordinal: 2,
            ads_inserted: 0,
            is_last_section: false,
        }
    }

    #[test]
    fn test_interval_policy_thresholds() {
        let policy = IntervalAdPolicy::default();
        assert!(policy.should_insert(&slot(3, 25)).unwrap());
        assert!(!policy.should_insert(&slot(2, 40)).unwrap());
        assert!(!policy.should_insert(&slot(10, 24)).unwrap());
    }

    #[test]
    fn test_interval_policy_limits() {
        let policy = IntervalAdPolicy {
            max_ads: 1,
            ..IntervalAdPolicy::default()
        };
        let mut context = slot(10, 50);
        context.ads_inserted = 1;
        assert!(!policy.should_insert(&context).unwrap());

        let mut context = slot(10, 50);
        context.is_last_section = true;
        assert!(!policy.should_insert(&context).unwrap());

        let mut context = slot(10, 50);
        context.section_ordinal = 0;
        assert!(!policy.should_insert(&context).unwrap());
    }

    #[test]
    fn test_closure_policy() {
        let policy = |slot: &AdSlotContext| -> Result<bool, CollaboratorError> {
            Ok(slot.section_ordinal % 2 == 1)
        };
        let mut context = slot(0, 0);
        context.section_ordinal = 3;
        assert!(policy.should_insert(&context).unwrap());
    }
}
