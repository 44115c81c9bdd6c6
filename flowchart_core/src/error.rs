//! Error types for the flowchart engine.

use story_data::TimePeriodId;

/// Errors surfaced by the view controller.
///
/// Only tab selection can fail; toggles and redraws degrade silently.
#[derive(Debug, thiserror::Error)]
pub enum FlowchartError {
    #[error("unknown time period: {0}")]
    UnknownTimePeriod(TimePeriodId),

    #[error("story has no time periods")]
    EmptyStory,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
