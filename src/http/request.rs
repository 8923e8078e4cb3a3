use std::collections::HashMap;

use anyhow::{Result, bail};

/// Parsed request line of an incoming HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    /// Percent-decoded path, always starting with "/"
    pub path: String,
    /// Percent-decoded query parameters; a key without "=" maps to ""
    pub query: HashMap<String, String>,
}

impl Request {
    /// Parse a `METHOD TARGET HTTP/x.y` request line.
    pub fn parse(request_line: &str) -> Result<Request> {
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version)) =
            (parts.next(), parts.next(), parts.next())
        else {
            bail!("malformed request line {request_line:?}");
        };
        if !version.starts_with("HTTP/") {
            bail!("malformed HTTP version {version:?}");
        }

        let (raw_path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        Ok(Request {
            method: method.to_string(),
            path: decode(raw_path),
            query: parse_query(raw_query),
        })
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

// A malformed escape must never fail the request; fall back to the raw
// text instead.
fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_get() {
        let req = Request::parse("GET / HTTP/1.1").unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/");
        assert!(req.query.is_empty());
    }

    #[test]
    fn parses_path_and_query() {
        let req = Request::parse("GET /device.txt?subType=WebView,Survey&noResourceLoads=1 HTTP/1.1")
            .unwrap();
        assert_eq!(req.path, "/device.txt");
        assert_eq!(req.query.get("subType").unwrap(), "WebView,Survey");
        assert_eq!(req.query.get("noResourceLoads").unwrap(), "1");
    }

    #[test]
    fn decodes_percent_escapes_and_plus() {
        let req =
            Request::parse("GET /a.txt?actionIncludes=Survey%20response,b+c HTTP/1.1").unwrap();
        assert_eq!(req.query.get("actionIncludes").unwrap(), "Survey response,b c");
    }

    #[test]
    fn invalid_escape_falls_back_to_raw_text() {
        let req = Request::parse("GET /a.txt?x=%ZZ HTTP/1.1").unwrap();
        assert_eq!(req.query.get("x").unwrap(), "%ZZ");
    }

    #[test]
    fn key_without_value_maps_to_empty_string() {
        let req = Request::parse("GET /a.txt?onlyFrontendNotify HTTP/1.1").unwrap();
        assert_eq!(req.query.get("onlyFrontendNotify").unwrap(), "");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Request::parse("").is_err());
        assert!(Request::parse("GET /").is_err());
        assert!(Request::parse("GET / FTP/1.0").is_err());
    }
}
