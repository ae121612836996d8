use std::time::Duration;

use serde::Deserialize;

use crate::HighlightError;
use crate::toolbar::ToolbarMetrics;

/// Tunables for a [`Highlighter`](crate::Highlighter).
///
/// Durations are given in milliseconds when deserialized.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlighterConfig {
    /// How long selection-change notifications are coalesced for
    #[serde(with = "millis")]
    pub debounce: Duration,
    /// How long a remove-by-id request blocks duplicates for the same id
    #[serde(with = "millis")]
    pub removal_guard: Duration,
    /// Delay before a deferred rescan retrofits natively painted elements
    #[serde(with = "millis")]
    pub deferred_delay: Duration,
    /// Selection boxes closer than this (in CSS px, on every edge) count as unchanged
    pub rect_epsilon: f64,
    pub toolbar: ToolbarMetrics,
    /// Show a toast through the shell when a highlight could not be applied
    pub toast_on_failure: bool,
    /// Id of the injected `<style>` element
    pub style_element_id: String,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            removal_guard: Duration::from_millis(100),
            deferred_delay: Duration::ZERO,
            rect_epsilon: 0.5,
            toolbar: ToolbarMetrics::default(),
            toast_on_failure: false,
            style_element_id: String::from("hilite-styles"),
        }
    }
}

impl HighlighterConfig {
    pub fn from_json(json: &str) -> Result<Self, HighlightError> {
        Ok(serde_json::from_str(json)?)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
