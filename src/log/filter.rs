use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::Batch;

// Resource-loading callbacks that flood webview logs.
static NOISY_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(OnLoadResource|ShouldInterceptRequest|OnPageStarted|OnPageFinished) method")
        .unwrap()
});

const FRONTEND_NOTIFY_MARKER: &str = "native://notify";

/// Filter parameters parsed from the viewer's query string. Absent or
/// empty parameters leave their pipeline stage switched off entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// `subType=WebView,Survey` keeps batches whose subtype equals one of
    /// the listed values
    pub sub_types: Option<Vec<String>>,
    /// `noResourceLoads=1` drops resource-loading callback batches
    pub no_resource_loads: bool,
    /// `onlyFrontendNotify=1` keeps batches whose text carries the
    /// frontend notify marker
    pub only_frontend_notify: bool,
    /// `actionIncludes=a,b` keeps batches whose action contains one of
    /// the listed substrings
    pub action_includes: Option<Vec<String>>,
}

impl FilterParams {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            sub_types: list_param(query.get("subType")),
            no_resource_loads: flag_param(query.get("noResourceLoads")),
            only_frontend_notify: flag_param(query.get("onlyFrontendNotify")),
            action_includes: list_param(query.get("actionIncludes")),
        }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

// The whole value is trimmed before splitting; individual items are not,
// so "a, b" is the list ["a", " b"].
fn list_param(value: Option<&String>) -> Option<Vec<String>> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.split(',').map(str::to_string).collect())
}

fn flag_param(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Narrow a batch sequence by the active predicates, applied in a fixed
/// order: subtype, resource-load exclusion, frontend-notify, action
/// substrings. Order and content of the surviving batches are untouched.
pub fn apply_filters(mut batches: Vec<Batch>, params: &FilterParams) -> Vec<Batch> {
    if let Some(sub_types) = &params.sub_types {
        batches.retain(|b| sub_types.iter().any(|s| *s == b.sub_type));
    }
    if params.no_resource_loads {
        batches.retain(|b| !NOISY_ACTION_RE.is_match(&b.action));
    }
    if params.only_frontend_notify {
        batches.retain(|b| b.joined_text().contains(FRONTEND_NOTIFY_MARKER));
    }
    if let Some(fragments) = &params.action_includes {
        batches.retain(|b| fragments.iter().any(|f| b.action.contains(f.as_str())));
    }
    batches
}
