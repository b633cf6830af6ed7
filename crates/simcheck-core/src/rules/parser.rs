//! Line parser for the tolerance table
//!
//! Grammar, one rule per line:
//!
//! ```text
//! # comment
//! <unit>, <aggregation> = <absolute>, <relative>
//! ```
//!
//! `*` is the wildcard header and `-1` disables the relative check.

use crate::errors::{Result, SimCheckError};
use crate::rules::model::{Selector, ThresholdRule, RELATIVE_DISABLED};

fn parse_error(line_no: usize, line: &str, reason: impl Into<String>) -> SimCheckError {
    SimCheckError::ConfigParse {
        line_no,
        line: line.to_string(),
        reason: reason.into(),
    }
}

/// Split `s` on `sep` into exactly two trimmed parts.
fn split_pair(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = s.split(sep);
    let first = parts.next()?.trim();
    let second = parts.next()?.trim();
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

fn parse_number(line_no: usize, line: &str, field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|_| {
        parse_error(
            line_no,
            line,
            format!("{} threshold `{}` is not a number", field, raw),
        )
    })?;
    if !value.is_finite() {
        return Err(parse_error(
            line_no,
            line,
            format!("{} threshold `{}` must be finite", field, raw),
        ));
    }
    Ok(value)
}

/// Parse a single line of the tolerance table.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
///
/// # Errors
///
/// `ConfigParse` when the line does not have exactly two headers and two
/// numbers, a header is empty, a number does not parse, the absolute
/// threshold is negative, or the relative threshold is negative without
/// being the `-1` sentinel.
pub fn parse_rule_line(line_no: usize, raw: &str) -> Result<Option<ThresholdRule>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (headers, values) = split_pair(line, '=').ok_or_else(|| {
        parse_error(
            line_no,
            line,
            "expected `<unit>, <aggregation> = <absolute>, <relative>`",
        )
    })?;

    let (unit, aggregation) = split_pair(headers, ',').ok_or_else(|| {
        parse_error(
            line_no,
            line,
            "expected exactly two headers `<unit>, <aggregation>` before `=`",
        )
    })?;
    if unit.is_empty() || aggregation.is_empty() {
        return Err(parse_error(line_no, line, "unit and aggregation must not be empty"));
    }

    let (absolute, relative) = split_pair(values, ',').ok_or_else(|| {
        parse_error(
            line_no,
            line,
            "expected exactly two values `<absolute>, <relative>` after `=`",
        )
    })?;

    let absolute_threshold = parse_number(line_no, line, "absolute", absolute)?;
    if absolute_threshold < 0.0 {
        return Err(parse_error(
            line_no,
            line,
            format!("absolute threshold {} must not be negative", absolute_threshold),
        ));
    }

    let relative_threshold = parse_number(line_no, line, "relative", relative)?;
    if relative_threshold < 0.0 && relative_threshold != RELATIVE_DISABLED {
        return Err(parse_error(
            line_no,
            line,
            format!(
                "relative threshold {} must be non-negative or -1 (disabled)",
                relative_threshold
            ),
        ));
    }

    Ok(Some(
        ThresholdRule::new(
            Selector::from_token(unit),
            Selector::from_token(aggregation),
            absolute_threshold,
            relative_threshold,
        )
        .with_line_no(line_no),
    ))
}

/// Parse every line of a tolerance table, keeping file order.
///
/// Stops at the first malformed line: a partially loaded table is never
/// returned.
///
/// # Errors
///
/// The first `ConfigParse` error encountered.
pub fn parse_rules<'a, I>(lines: I) -> Result<Vec<ThresholdRule>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rules = Vec::new();
    for (idx, raw) in lines.into_iter().enumerate() {
        let raw = if idx == 0 {
            raw.trim_start_matches('\u{feff}')
        } else {
            raw
        };
        if let Some(rule) = parse_rule_line(idx + 1, raw)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}
