use serde::Serialize;

pub mod filter;
pub mod segment;

// Re-export commonly used types
pub use filter::{FilterParams, apply_filters};
pub use segment::segment;

/// One structured log record: a header line plus the continuation lines
/// that follow it, with the fields extracted from the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// 0-based index of the first physical line of this batch
    pub line_number: usize,
    /// Sequence number in emission order, starting at 0
    pub id: u64,
    /// Leading bracketed tag, e.g. "TRACE". Empty only for the preamble
    /// batch that collects lines before the first header.
    #[serde(rename = "type")]
    pub batch_type: String,
    /// Secondary bracketed tag, e.g. "WebView"
    pub sub_type: String,
    /// HH:MM:SS timestamp from the header, empty if absent
    pub time: String,
    /// Free text preceding the source-location marker
    pub action: String,
    /// Normalized relative source path from the location marker
    pub location: String,
    /// Header-line remainder plus continuation lines, in original order
    pub text: Vec<String>,
}

impl Batch {
    /// The batch body as one string, lines joined with no separator.
    pub fn joined_text(&self) -> String {
        self.text.concat()
    }
}
