use serde::Deserialize;

/// Log output format style, one per tracing-subscriber formatter
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// Human-readable, single-line logs
    #[default]
    Full,
    /// Single-line logs optimized for short line lengths
    Compact,
    /// Newline-delimited JSON
    Json,
    /// Multi-line logs with source locations
    Pretty,
}
