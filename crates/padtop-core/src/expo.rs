//! Exposition-format parsing.
//!
//! The scratchpad server exposes metrics as line-oriented text:
//!
//! ```text
//! # HELP scratchpad:num_requests_waiting Requests queued for scheduling.
//! scratchpad:num_requests_waiting{engine="0"} 3
//! scratchpad:gen_throughput 187.4
//! process:cpu_seconds_total 42.1
//! ```
//!
//! Only lines under the watched namespace become samples. Comments, blank
//! lines and foreign namespaces are ignored; a candidate line whose value
//! token does not parse is dropped on its own without failing the scrape.

use std::collections::HashMap;

/// What became of one input line.
///
/// Both drop cases are expected steady-state outcomes, not faults: exporters
/// routinely interleave comments and foreign namespaces, and a truncated
/// response can cut a line mid-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineOutcome<'a> {
    /// A candidate line that parsed into a sample.
    Sample { name: &'a str, value: f64 },
    /// Outside the watched namespace: comment, blank, other exporter.
    Ignored,
    /// In the namespace, but the name or value token is unusable.
    Unparseable,
}

/// One parsed scrape: bare metric name to value, plus a count of candidate
/// lines that were dropped as unparseable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpoScrape {
    pub values: HashMap<String, f64>,
    pub unparseable: usize,
}

/// Classify a single exposition line under `namespace`.
///
/// A candidate has the shape `<namespace>:<name>[{labels}] <value>`. The
/// label block is stripped before extracting the bare name; the value is
/// whatever follows the first whitespace run, parsed as `f64`.
pub fn parse_line<'a>(line: &'a str, namespace: &str) -> LineOutcome<'a> {
    let line = line.trim_end();
    let Some(rest) = line
        .strip_prefix(namespace)
        .and_then(|r| r.strip_prefix(':'))
    else {
        return LineOutcome::Ignored;
    };

    let Some((ident, value_str)) = rest.split_once(char::is_whitespace) else {
        // Prefix matched but there is no value token.
        return LineOutcome::Unparseable;
    };

    let name = ident.split('{').next().unwrap_or("");
    if name.is_empty() {
        return LineOutcome::Unparseable;
    }

    match value_str.trim().parse::<f64>() {
        Ok(value) => LineOutcome::Sample { name, value },
        Err(_) => LineOutcome::Unparseable,
    }
}

/// Parse a whole `/metrics` response body.
///
/// Duplicate names within one body resolve last-write-wins. Output ordering
/// is not meaningful; callers key into the map by registered metric name.
pub fn parse_exposition(body: &str, namespace: &str) -> ExpoScrape {
    let mut scrape = ExpoScrape::default();
    for line in body.lines() {
        match parse_line(line, namespace) {
            LineOutcome::Sample { name, value } => {
                scrape.values.insert(name.to_string(), value);
            }
            LineOutcome::Ignored => {}
            LineOutcome::Unparseable => scrape.unparseable += 1,
        }
    }
    scrape
}
