//! HTML rendering for the listing and viewer pages. Pure string
//! producers; all file and network I/O lives in the http module.

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::log::Batch;

/// One row of the listing page.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

const STYLE: &str = r#"<style>
  tr.subType_WebView { background-color: #dfd; }
  tr.subType_Survey { background-color: #ddf; }
  tr.subType_Error, tr.type_Exception { background-color: #fdd; }
  td { border-bottom: 1px solid silver; }
  th { text-align: left; border: 1px solid black; position: sticky; top: 0; background-color: rgba(255,255,255,.8); }
  td.line-number { font-size: x-small; color: silver; text-align: right; }
  td.time { font-size: x-small; color: gray; text-align: center; }
  td.type_TRACE { color: silver; }
  td.type_START_TIMETRACK { color: cadetblue; }
  td.type_STOP_TIMETRACK { color: dodgerblue; }
  td.subType_WebView { color: forestgreen; background-color: palegreen; }
  td.action > span { display: block; max-width: 300px; overflow: hidden; }
  div.json-like { color: darkslateblue; cursor: pointer; }
  div.json-like:hover { color: darkblue; }
</style>"#;

// Clicking a json-like fragment parses it (and a nested message payload,
// when one is present) and dumps the value to the browser console.
const SCRIPT: &str = r#"<script type="text/javascript">
  function toJSON(s) { let val = ''; try { val = JSON.parse(s); } catch (err) {} return val; }
  window.addEventListener('DOMContentLoaded', () => {
    document.body.addEventListener('click', (event) => {
      const el = event.target;
      if (!el.classList.contains('json-like')) return;
      const val = toJSON(el.innerText);
      let inner = '';
      if (val && typeof val.message === 'string') inner = val.message;
      if (val && val.data && typeof val.data.message === 'string') inner = val.data.message;
      let val2;
      if (inner && /^[^{]+/.test(inner)) {
        val2 = toJSON(inner.replace(/^[^{]*{/, '{'));
      }
      console.info(val2 || val);
    });
  });
</script>"#;

const USAGE: &str = "<h2>usage</h2><ol>\
<li>?<strong>subType</strong>=WebView,Survey === subType eq OR</li>\
<li>?<strong>actionIncludes</strong>=Survey%20response,OnWebViewLoad === action includes OR</li>\
<li>?<strong>noResourceLoads</strong>=1 === skip url load info</li>\
<li>?<strong>onlyFrontendNotify</strong>=1 = show only logs sent by android frontend</li>\
<li>?<strong>format</strong>=json = raw filtered batches</li>\
</ol>";

/// Escape text for embedding in HTML (`& < > " '`).
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn index_page(entries: &[LogEntry]) -> String {
    let mut html = String::from("<html><body><ul>");
    for entry in entries {
        let name = escape_html(&entry.name);
        let modified = entry
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        html.push_str(&format!(
            "<li><a href=\"/{name}\">{name}</a> <small>{} bytes, {modified}</small></li>",
            entry.size,
        ));
    }
    html.push_str("</ul>");
    html.push_str(USAGE);
    html.push_str("</body></html>");
    html
}

pub fn log_page(batches: &[Batch]) -> String {
    let mut html = format!("<html><head>{STYLE}{SCRIPT}</head><body>");
    html.push_str(
        "<table><tr><th>line</th><th>type</th><th>time</th><th>subtype</th>\
         <th>location</th><th>action</th><th>content</th></tr>",
    );
    for batch in batches {
        html.push_str(&batch_row(batch));
    }
    html.push_str("</table></body></html>");
    html
}

/// The filtered batches as a JSON array, for `?format=json`.
pub fn batches_json(batches: &[Batch]) -> Result<String> {
    Ok(serde_json::to_string_pretty(batches)?)
}

fn batch_row(batch: &Batch) -> String {
    format!(
        "<tr class=\"type_{ty} subType_{sub}\">\
         <td class=\"line-number\">{line}</td>\
         <td class=\"type_{ty}\">{ty}</td>\
         <td class=\"time\">{time}</td>\
         <td class=\"subType_{sub}\">{sub}</td>\
         <td class=\"location\">{location}</td>\
         <td class=\"action\"><span>{action}</span></td>\
         <td class=\"content\">{content}</td>\
         </tr>",
        ty = batch.batch_type,
        sub = batch.sub_type,
        line = batch.line_number,
        time = batch.time,
        location = escape_html(&batch.location),
        action = escape_html(&batch.action),
        content = content_cell(&batch.joined_text()),
    )
}

// The logs embed json-ish payloads with no useful delimiters. Split the
// first fragment that follows a known marker into its own clickable div;
// missing a fragment is fine, breaking the page is not.
fn content_cell(joined: &str) -> String {
    let mut text = format!("<div>{}</div>", escape_html(joined));
    text = text.replacen(
        "native://notify?{",
        "native://notify?</div><div class=\"json-like\">{",
        1,
    );
    text = text.replacen("Data : {", "Data : </div><div class=\"json-like\">{", 1);
    text
}
