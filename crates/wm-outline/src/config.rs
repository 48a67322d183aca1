//! Conversions from [`wm_config`] settings.

use wm_config::{AdsConfig, Config, OutlineConfig};

use crate::ads::IntervalAdPolicy;
use crate::diagnostics::Strictness;
use crate::visitor::VisitorOptions;

impl From<&OutlineConfig> for VisitorOptions {
    fn from(config: &OutlineConfig) -> Self {
        Self {
            edit_buttons: config.edit_buttons,
            capture_header_metadata: config.header_metadata,
            wiki_id: config.wiki_id.clone(),
        }
    }
}

impl From<&AdsConfig> for IntervalAdPolicy {
    fn from(config: &AdsConfig) -> Self {
        Self {
            min_cumulative_lines: config.min_cumulative_lines,
            min_section_lines: config.min_section_lines,
            max_ads: config.max_ads,
            skip_last_section: config.skip_last_section,
        }
    }
}

impl From<&OutlineConfig> for Strictness {
    fn from(config: &OutlineConfig) -> Self {
        match config.strict {
            Some(true) => Self::Strict,
            Some(false) => Self::Lenient,
            None => Self::default(),
        }
    }
}

/// Ad policy for a configuration, `None` when ads are disabled.
#[must_use]
pub fn ad_policy(config: &Config) -> Option<IntervalAdPolicy> {
    config.ads.enabled.then(|| IntervalAdPolicy::from(&config.ads))
}
