use std::sync::LazyLock;

use regex::Regex;

use super::Batch;

// A header line starts (after trimming) with a bracketed all-caps tag.
// Mixed-case or empty brackets are treated as plain continuation text.
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[([A-Z_]+)\]").unwrap());

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d{2}:\d{2}:\d{2})\]").unwrap());

// The subtype tag only counts when followed by whitespace; a bare "[tag]"
// at end of line stays in the batch text.
static SUB_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[([0-9a-z_-]*)\]\s").unwrap());

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z '_.-]*) \(/Users/").unwrap());

// example: (/Users/runner/work/1/s/PMA/PMA/WebView/Foobar.cs, LoadFile:110)
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(/Users/runner/(.+?)(?:, [A-Za-z_][0-9A-Za-z_]*)?:\d+\)").unwrap()
});

// CI checkout prefix, with the project directory repeated under the
// checkout root. Collapsed to an ellipsis in displayed locations.
static CHECKOUT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^work/\d+/s(?:/PMA)+").unwrap());

/// Split raw log text into an ordered sequence of batches.
///
/// Header lines open a new batch; their leftover content after field
/// extraction becomes the first text element. Continuation lines are
/// appended untouched to the open batch, so every physical line of the
/// input lands in exactly one batch.
///
/// Extraction is best-effort and never fails: an optional field whose
/// marker is absent or malformed is simply the empty string.
pub fn segment(text: &str) -> Vec<Batch> {
    let normalized = text.replace("\r\n", "\n");
    let mut batches: Vec<Batch> = Vec::new();
    // Preamble accumulator; only emitted when the input does not start
    // with a header line.
    let mut current = Batch::default();

    for (i, line) in normalized.split('\n').enumerate() {
        let Some((batch_type, rest)) = take_type(line.trim()) else {
            current.text.push(line.to_string());
            continue;
        };

        if i > 0 {
            push(&mut batches, current);
        }

        let (time, rest) = take_time(rest);
        let (sub_type, rest) = take_sub_type(rest);
        let (action, rest) = take_action(rest);
        let (location, rest) = take_location(rest);

        current = Batch {
            line_number: i,
            batch_type,
            sub_type,
            time,
            action,
            location,
            text: vec![rest.to_string()],
            ..Batch::default()
        };
    }

    push(&mut batches, current);
    batches
}

// Emission order doubles as the id sequence.
fn push(batches: &mut Vec<Batch>, mut batch: Batch) {
    batch.id = batches.len() as u64;
    batches.push(batch);
}

fn take_type(trimmed: &str) -> Option<(String, &str)> {
    let caps = TYPE_RE.captures(trimmed)?;
    let (whole, tag) = (caps.get(0)?, caps.get(1)?);
    Some((tag.as_str().to_string(), &trimmed[whole.end()..]))
}

fn take_time(rest: &str) -> (String, &str) {
    if let Some(caps) = TIME_RE.captures(rest) {
        if let (Some(whole), Some(time)) = (caps.get(0), caps.get(1)) {
            return (time.as_str().to_string(), &rest[whole.end()..]);
        }
    }
    (String::new(), rest)
}

fn take_sub_type(rest: &str) -> (String, &str) {
    if let Some(caps) = SUB_TYPE_RE.captures(rest) {
        if let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) {
            return (tag.as_str().to_string(), rest[whole.end()..].trim());
        }
    }
    (String::new(), rest)
}

fn take_action(rest: &str) -> (String, &str) {
    if let Some(caps) = ACTION_RE.captures(rest) {
        if let Some(text) = caps.get(1) {
            // Strip the captured text and the single space before the
            // path marker; the marker itself is left for take_location.
            return (text.as_str().to_string(), rest[text.end() + 1..].trim());
        }
    }
    (String::new(), rest)
}

fn take_location(rest: &str) -> (String, &str) {
    if let Some(caps) = LOCATION_RE.captures(rest) {
        if let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) {
            let location = CHECKOUT_PREFIX_RE.replace(path.as_str(), "…").into_owned();
            return (location, rest[whole.end()..].trim());
        }
    }
    (String::new(), rest)
}
