//! Value literals: leaf formatting, bracketed vector/matrix syntax, and the
//! inverse parsing used by the grammar.
//!
//! Inline layout: `[e1, e2]` for vectors, `[r1c1, r1c2; r2c1, r2c2]` for
//! matrices. A matrix with a single row keeps a trailing `;` (`[1.0, 2.0;]`)
//! so it does not read back as a vector.
//!
//! Vertical blocks write each vector or matrix as a column; see `column`.

use crate::error::GrammarError;
use crate::model::{Leaf, PrimitiveKind, Value};

/// Formatted leaves of a value, laid out by dimension.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cells {
    Scalar(String),
    Vector(Vec<String>),
    Matrix(Vec<Vec<String>>),
}

/// Formats a float in its shortest round-trip form (`5.0`, `1e-7`).
pub fn format_float(v: f64) -> String {
    format!("{v:?}")
}

/// Formats a boolean as `True` or `False`.
pub fn format_bool(v: bool) -> &'static str {
    if v { "True" } else { "False" }
}

/// Wraps text in double quotes. The text is not checked.
pub fn format_text(v: &str) -> String {
    format!("\"{v}\"")
}

/// Checks that text can be written as a quoted literal.
pub(crate) fn check_text(v: &str) -> Result<(), &'static str> {
    if v.contains('"') {
        return Err("text contains a double quote");
    }
    if v.contains(['\n', '\r']) {
        return Err("text contains a line break");
    }
    Ok(())
}

pub(crate) fn cells(value: &Value) -> Cells {
    fn vector<T>(items: &[T], f: impl Fn(&T) -> String) -> Cells {
        Cells::Vector(items.iter().map(f).collect())
    }
    fn matrix<T>(rows: &[Vec<T>], f: impl Fn(&T) -> String) -> Cells {
        Cells::Matrix(rows.iter().map(|r| r.iter().map(&f).collect()).collect())
    }

    match value {
        Value::Float(v) => Cells::Scalar(format_float(*v)),
        Value::Text(v) => Cells::Scalar(format_text(v)),
        Value::Bool(v) => Cells::Scalar(format_bool(*v).to_string()),
        Value::FloatVector(v) => vector(v, |x| format_float(*x)),
        Value::TextVector(v) => vector(v, |x| format_text(x)),
        Value::BoolVector(v) => vector(v, |x| format_bool(*x).to_string()),
        Value::FloatMatrix(m) => matrix(m, |x| format_float(*x)),
        Value::TextMatrix(m) => matrix(m, |x| format_text(x)),
        Value::BoolMatrix(m) => matrix(m, |x| format_bool(*x).to_string()),
    }
}

/// Lays cells out on one line.
pub(crate) fn inline(cells: &Cells) -> String {
    match cells {
        Cells::Scalar(s) => s.clone(),
        Cells::Vector(items) => format!("[{}]", items.join(", ")),
        Cells::Matrix(rows) => {
            let body = rows
                .iter()
                .map(|row| row.join(", "))
                .collect::<Vec<_>>()
                .join("; ");
            if rows.len() == 1 {
                format!("[{body};]")
            } else {
                format!("[{body}]")
            }
        }
    }
}

/// Flattens cells into one column of a vertical block, in row-major order.
/// The last element of each matrix row carries a `;`.
pub(crate) fn column(cells: &Cells) -> Vec<String> {
    match cells {
        Cells::Scalar(s) => vec![s.clone()],
        Cells::Vector(items) => items.clone(),
        Cells::Matrix(rows) => rows
            .iter()
            .flat_map(|row| {
                let last = row.len().saturating_sub(1);
                row.iter().enumerate().map(move |(c, item)| {
                    if c == last {
                        format!("{item};")
                    } else {
                        item.clone()
                    }
                })
            })
            .collect(),
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parses a float literal.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse().ok()
}

/// Parses `TRUE` / `FALSE` in any letter case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Returns the offset one past the quote closing the string opened at
/// `open`, or None if the line ends first.
pub fn scan_string(line: &str, open: usize) -> Option<usize> {
    let body = open + 1;
    line.get(body..)?.find('"').map(|i| body + i + 1)
}

/// Returns the offset one past the `]` matching the `[` at `open`,
/// ignoring brackets inside quoted text.
pub fn scan_bracket(line: &str, open: usize) -> Option<usize> {
    let body = open + 1;
    let mut in_string = false;
    for (i, ch) in line.get(body..)?.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            ']' if !in_string => return Some(body + i + 1),
            _ => {}
        }
    }
    None
}

/// Parses one leaf of `kind` from trimmed element text.
pub(crate) fn parse_leaf(kind: PrimitiveKind, raw: &str, line: usize) -> Result<Leaf, GrammarError> {
    match kind {
        PrimitiveKind::Float64 => parse_float(raw).map(Leaf::Float).ok_or_else(|| {
            GrammarError::ValueFormat {
                line,
                raw: raw.to_string(),
            }
        }),
        PrimitiveKind::Boolean => parse_bool(raw).map(Leaf::Bool).ok_or_else(|| {
            GrammarError::BooleanFormat {
                line,
                raw: raw.to_string(),
            }
        }),
        PrimitiveKind::Text => match raw.strip_prefix('"') {
            Some(rest) => rest
                .strip_suffix('"')
                .map(|inner| Leaf::Text(inner.to_string()))
                .ok_or(GrammarError::UnterminatedString { line }),
            None => Ok(Leaf::Text(raw.to_string())),
        },
    }
}

/// Parses the text between `[` and `]` into a vector or matrix of `kind`.
///
/// The literal is a matrix when it contains a row separator `;` outside
/// quotes; one trailing separator is allowed and ignored.
pub(crate) fn parse_array(kind: PrimitiveKind, inner: &str, line: usize) -> Result<Value, GrammarError> {
    if inner.trim().is_empty() {
        return Err(GrammarError::MalformedLiteral {
            line,
            reason: "empty literal",
        });
    }

    let mut rows = split_outside_quotes(inner, ';');
    if rows.len() == 1 {
        let leaves = parse_row(kind, rows[0], line)?;
        return Value::vector(kind, leaves).map_err(|source| GrammarError::InvalidValue { line, source });
    }

    if rows.last().is_some_and(|r| r.trim().is_empty()) {
        rows.pop();
    }
    let rows = rows
        .into_iter()
        .map(|row| parse_row(kind, row, line))
        .collect::<Result<Vec<_>, _>>()?;
    Value::matrix(kind, rows).map_err(|source| GrammarError::InvalidValue { line, source })
}

fn parse_row(kind: PrimitiveKind, row: &str, line: usize) -> Result<Vec<Leaf>, GrammarError> {
    if row.trim().is_empty() {
        return Err(GrammarError::MalformedLiteral {
            line,
            reason: "empty row",
        });
    }
    split_outside_quotes(row, ',')
        .into_iter()
        .map(|cell| {
            let cell = cell.trim();
            if cell.is_empty() {
                return Err(GrammarError::MalformedLiteral {
                    line,
                    reason: "empty element",
                });
            }
            parse_leaf(kind, cell, line)
        })
        .collect()
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    for (i, ch) in s.char_indices() {
        if ch == '"' {
            in_string = !in_string;
        } else if ch == sep && !in_string {
            parts.push(&s[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}
