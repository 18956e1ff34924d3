//! Line grammar parser for DDF text.
//!
//! The parser is a single line-dispatch loop over three states:
//!
//! - `Normal`: directives, comments and inline declarations.
//! - `InHeader`: every line is kept verbatim until the closing `#HEADER`.
//! - `InVerticalBlock`: non-blank, non-comment lines are collected until
//!   the closing `#VERTICAL`, then read as columns: a types row, a names
//!   row, an optional `?`-separated description row, and one row per
//!   element index. A `;` glued to an element ends a matrix row.
//!
//! The first grammar error aborts the parse.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::classify::{NameRule, validate_name};
use crate::codec::literal::{parse_array, parse_leaf, scan_bracket, scan_string};
use crate::codec::tokenize::{Segment, Token, segments, split, split_quoted};
use crate::error::GrammarError;
use crate::limits::TOKEN_DELIMITERS;
use crate::model::{PrimitiveKind, Value, Variable, parse_type_tag};

const VERSION_MARKER: &str = "#VERSION";
const HEADER_MARKER: &str = "#HEADER";
const VERTICAL_MARKER: &str = "#VERTICAL";
const COMMENT_MARKER: &str = "//";

/// How strictly declarations are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compatibility {
    /// Strict naming rule; an invalid name aborts the parse.
    #[default]
    Strict,
    /// Legacy naming rule; an invalid name is reported as a warning and
    /// the declaration is still read.
    Legacy,
}

/// Options for parsing DDF text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub compatibility: Compatibility,
}

impl ParseOptions {
    /// Creates default (strict) parse options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for files written under the legacy naming rule.
    pub fn legacy() -> Self {
        Self {
            compatibility: Compatibility::Legacy,
        }
    }

    fn name_rule(&self) -> NameRule {
        match self.compatibility {
            Compatibility::Strict => NameRule::Strict,
            Compatibility::Legacy => NameRule::Legacy,
        }
    }
}

/// A variable read from text, with the line it was declared on.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub line: usize,
    pub variable: Variable,
}

/// Everything read from one DDF text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDocument {
    /// Value of the last `#VERSION` statement, if any.
    pub version: Option<f64>,
    /// Text of the last header block, if any.
    pub header: Option<String>,
    /// Declarations in file order.
    pub declarations: Vec<Declaration>,
    /// Non-fatal problems (legacy mode only).
    pub warnings: Vec<GrammarError>,
}

enum State {
    Normal,
    InHeader { opened: usize, lines: Vec<String> },
    InVerticalBlock { opened: usize, lines: Vec<(usize, String)> },
}

/// Parses DDF text.
pub fn parse_document(text: &str, options: &ParseOptions) -> Result<ParsedDocument, GrammarError> {
    let mut parser = Parser {
        options: *options,
        doc: ParsedDocument::default(),
        names: FxHashSet::default(),
    };
    let mut state = State::Normal;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        state = match state {
            State::Normal => parser.normal_line(line_no, line)?,
            State::InHeader { opened, mut lines } => {
                if first_token(line) == Some(HEADER_MARKER) {
                    parser.doc.header = Some(lines.join("\n"));
                    State::Normal
                } else {
                    lines.push(line.to_string());
                    State::InHeader { opened, lines }
                }
            }
            State::InVerticalBlock { opened, mut lines } => match first_token(line) {
                Some(VERTICAL_MARKER) => {
                    parser.vertical_block(opened, &lines)?;
                    State::Normal
                }
                Some(token) if !token.starts_with(COMMENT_MARKER) => {
                    lines.push((line_no, strip_comment(line).to_string()));
                    State::InVerticalBlock { opened, lines }
                }
                _ => State::InVerticalBlock { opened, lines },
            },
        };
    }

    match state {
        State::Normal => Ok(parser.doc),
        State::InHeader { opened, .. } => Err(GrammarError::UnterminatedHeader { line: opened }),
        State::InVerticalBlock { opened, .. } => {
            Err(GrammarError::UnterminatedVertical { line: opened })
        }
    }
}

fn first_token(line: &str) -> Option<&str> {
    split(line, TOKEN_DELIMITERS).first().map(|t| t.text)
}

/// Cuts the line at the first `//` outside quoted text.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '/' if !in_string && line[i + 1..].starts_with('/') => return &line[..i],
            _ => {}
        }
    }
    line
}

struct Parser {
    options: ParseOptions,
    doc: ParsedDocument,
    names: FxHashSet<String>,
}

impl Parser {
    fn normal_line(&mut self, line_no: usize, line: &str) -> Result<State, GrammarError> {
        let tokens = split(line, TOKEN_DELIMITERS);
        let Some(first) = tokens.first() else {
            return Ok(State::Normal);
        };

        match first.text {
            VERSION_MARKER => {
                if tokens.len() != 2 {
                    return Err(GrammarError::VersionArity {
                        line: line_no,
                        found: tokens.len(),
                    });
                }
                let raw = tokens[1].text;
                let version = raw.parse::<f64>().map_err(|_| GrammarError::VersionFormat {
                    line: line_no,
                    raw: raw.to_string(),
                })?;
                self.doc.version = Some(version);
                Ok(State::Normal)
            }
            HEADER_MARKER => Ok(State::InHeader {
                opened: line_no,
                lines: Vec::new(),
            }),
            VERTICAL_MARKER => Ok(State::InVerticalBlock {
                opened: line_no,
                lines: Vec::new(),
            }),
            t if t.starts_with(COMMENT_MARKER) => Ok(State::Normal),
            t => match parse_type_tag(t) {
                Some(_) => {
                    self.declaration(line_no, line)?;
                    Ok(State::Normal)
                }
                None => Err(GrammarError::UnrecognizedLine {
                    line: line_no,
                    token: t.to_string(),
                }),
            },
        }
    }

    /// Parses one inline declaration line and records the variable.
    fn declaration(&mut self, line_no: usize, line: &str) -> Result<(), GrammarError> {
        let tokens = split(line, TOKEN_DELIMITERS);
        if tokens.len() < 3 {
            return Err(GrammarError::TooFewTokens { line: line_no });
        }
        let Some((kind, is_array)) = parse_type_tag(tokens[0].text) else {
            return Err(GrammarError::UnrecognizedLine {
                line: line_no,
                token: tokens[0].text.to_string(),
            });
        };

        let name = tokens[1].text;
        self.check_name(line_no, name)?;

        let (value, value_end) = if is_array {
            read_array(kind, line, tokens[2], line_no)?
        } else {
            read_scalar(kind, line, tokens[2], line_no)?
        };
        let description = read_trailer(line, value_end, line_no)?;
        self.record(line_no, name, value, description.unwrap_or_default())
    }

    /// Reads a `#VERTICAL` block opened on line `opened`.
    fn vertical_block(
        &mut self,
        opened: usize,
        lines: &[(usize, String)],
    ) -> Result<(), GrammarError> {
        let too_short = || GrammarError::VerticalLayout {
            line: opened,
            reason: "fewer than three lines",
        };
        let [(types_line, types_row), (names_line, names_row), rest @ ..] = lines else {
            return Err(too_short());
        };
        if rest.is_empty() {
            return Err(too_short());
        }

        let kinds = split(types_row, TOKEN_DELIMITERS)
            .iter()
            .map(|t| match parse_type_tag(t.text) {
                Some((kind, true)) => Ok(kind),
                _ => Err(GrammarError::VerticalLayout {
                    line: *types_line,
                    reason: "column type must be m<d>, m<s> or m<b>",
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let names = split(names_row, TOKEN_DELIMITERS);

        let (descriptions, data) = match rest.split_first() {
            Some(((_, row), data)) if row.trim_start().starts_with('?') => {
                (column_descriptions(row), data)
            }
            _ => (Vec::new(), rest),
        };
        let described = descriptions.is_empty() || descriptions.len() == kinds.len();
        if names.len() != kinds.len() || !described {
            return Err(GrammarError::VerticalLayout {
                line: *types_line,
                reason: "type, name and description counts differ",
            });
        }
        for name in &names {
            self.check_name(*names_line, name.text)?;
        }

        // Columns only ever end, so each row fills the leftmost columns.
        let mut columns: Vec<Vec<(usize, &str)>> = vec![Vec::new(); kinds.len()];
        let mut allowed = kinds.len();
        for (line_no, row) in data {
            let tokens = split_quoted(row, TOKEN_DELIMITERS);
            if tokens.len() > allowed {
                return Err(GrammarError::VerticalLayout {
                    line: *line_no,
                    reason: "too many elements in row",
                });
            }
            allowed = tokens.len();
            for (column, token) in columns.iter_mut().zip(&tokens) {
                column.push((*line_no, token.text));
            }
        }

        for (i, column) in columns.iter().enumerate() {
            let value = column_value(kinds[i], column, *names_line)?;
            let description = descriptions.get(i).cloned().unwrap_or_default();
            self.record(*names_line, names[i].text, value, description)?;
        }
        Ok(())
    }

    /// Checks a declared name. Under the legacy rule an invalid name is
    /// only logged.
    fn check_name(&mut self, line_no: usize, name: &str) -> Result<(), GrammarError> {
        if validate_name(name, self.options.name_rule()).is_ok() {
            return Ok(());
        }
        let err = GrammarError::InvalidName {
            line: line_no,
            name: name.to_string(),
        };
        match self.options.compatibility {
            Compatibility::Strict => Err(err),
            Compatibility::Legacy => {
                self.doc.warnings.push(err);
                Ok(())
            }
        }
    }

    fn record(
        &mut self,
        line_no: usize,
        name: &str,
        value: Value,
        description: String,
    ) -> Result<(), GrammarError> {
        if !self.names.insert(name.to_string()) {
            return Err(GrammarError::DuplicateName {
                line: line_no,
                name: name.to_string(),
            });
        }
        let variable = Variable::new(name, value, description)
            .map_err(|source| GrammarError::InvalidValue { line: line_no, source })?;
        trace!(line = line_no, name, ty = variable.type_symbol(), "parsed declaration");
        self.doc.declarations.push(Declaration {
            line: line_no,
            variable,
        });
        Ok(())
    }
}

/// Splits a `?`-separated description row; each description is trimmed.
fn column_descriptions(row: &str) -> Vec<String> {
    row.trim().split('?').skip(1).map(|d| d.trim().to_string()).collect()
}

/// Builds one column's value. The column is a matrix when any element ends
/// a row with `;`; elements after the last `;` form a final row.
fn column_value(
    kind: PrimitiveKind,
    column: &[(usize, &str)],
    names_line: usize,
) -> Result<Value, GrammarError> {
    let is_matrix = column.iter().any(|(_, text)| text.ends_with(';'));
    let mut rows = Vec::new();
    let mut row = Vec::new();
    for &(line_no, text) in column {
        let row_end = text.strip_suffix(';');
        row.push(parse_leaf(kind, row_end.unwrap_or(text), line_no)?);
        if row_end.is_some() {
            rows.push(std::mem::take(&mut row));
        }
    }

    let value = if is_matrix {
        if !row.is_empty() {
            rows.push(row);
        }
        Value::matrix(kind, rows)
    } else {
        Value::vector(kind, row)
    };
    let line = column.last().map_or(names_line, |(line_no, _)| *line_no);
    value.map_err(|source| GrammarError::InvalidValue { line, source })
}

/// Reads a scalar value starting at `token`. Returns the value and the
/// offset where the trailing part of the line begins.
fn read_scalar(
    kind: PrimitiveKind,
    line: &str,
    token: Token<'_>,
    line_no: usize,
) -> Result<(Value, usize), GrammarError> {
    if kind == PrimitiveKind::Text && token.text.starts_with('"') {
        let end = scan_string(line, token.start).ok_or(GrammarError::UnterminatedString { line: line_no })?;
        let inner = &line[token.start + 1..end - 1];
        return Ok((Value::Text(inner.to_string()), end));
    }

    // A `;` glued to the value (`5.0;?volts`) starts the trailer.
    let raw = token.text.find(';').map_or(token.text, |i| &token.text[..i]);
    let end = token.start + raw.len();
    if kind == PrimitiveKind::Text {
        return Ok((Value::Text(raw.to_string()), end));
    }
    let leaf = parse_leaf(kind, raw, line_no)?;
    Ok((Value::scalar(leaf), end))
}

fn read_array(
    kind: PrimitiveKind,
    line: &str,
    token: Token<'_>,
    line_no: usize,
) -> Result<(Value, usize), GrammarError> {
    if !token.text.starts_with('[') {
        return Err(GrammarError::ExpectedBracket {
            line: line_no,
            token: token.text.to_string(),
        });
    }
    let end = scan_bracket(line, token.start).ok_or(GrammarError::UnclosedBracket { line: line_no })?;
    let value = parse_array(kind, &line[token.start + 1..end - 1], line_no)?;
    Ok((value, end))
}

/// Reads `[;] [?description] [// comment]` after the value.
fn read_trailer(line: &str, from: usize, line_no: usize) -> Result<Option<String>, GrammarError> {
    let trailer = &line[from..];
    let segs = segments(trailer, TOKEN_DELIMITERS);
    let mut semicolons = 0;

    for (i, seg) in segs.iter().enumerate() {
        let Segment::Token(token) = seg else {
            continue;
        };
        let text = token.text;

        // Terminators may be glued to what follows (`;?volts`).
        let rest = text.trim_start_matches(';');
        semicolons += text.len() - rest.len();
        if semicolons > 1 {
            return Err(GrammarError::ExcessiveSemicolons { line: line_no });
        }
        if rest.is_empty() {
            continue;
        }
        if rest.starts_with(COMMENT_MARKER) {
            break;
        }
        if let Some(first) = rest.strip_prefix('?') {
            return Ok(description(first, &segs[i + 1..]));
        }
        return Err(GrammarError::UnexpectedToken {
            line: line_no,
            token: text.to_string(),
        });
    }
    Ok(None)
}

/// Joins the description text following a `?` marker, stopping at a
/// `//` token. Trailing delimiters are dropped; when the marker stands
/// alone, one leading delimiter is dropped.
fn description(first: &str, rest: &[Segment<'_>]) -> Option<String> {
    let mut parts: Vec<&str> = vec![first];
    for seg in rest {
        if let Segment::Token(t) = seg {
            if t.text.starts_with(COMMENT_MARKER) {
                break;
            }
        }
        parts.push(seg.run().text);
    }
    let mut text = parts.concat();
    let trimmed_len = text.trim_end_matches([' ', '\t']).len();
    text.truncate(trimmed_len);
    if first.is_empty() {
        if let Some(c) = text.chars().next().filter(|c| TOKEN_DELIMITERS.contains(*c)) {
            text.drain(..c.len_utf8());
        }
    }
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dimension;

    fn parse(text: &str) -> Result<ParsedDocument, GrammarError> {
        parse_document(text, &ParseOptions::new())
    }

    fn single(text: &str) -> Variable {
        let doc = parse(text).unwrap();
        assert_eq!(doc.declarations.len(), 1);
        doc.declarations.into_iter().next().unwrap().variable
    }

    #[test]
    fn test_version_and_scalar() {
        let doc = parse("#VERSION 1.0\nd pi 3.14159\n").unwrap();
        assert_eq!(doc.version, Some(1.0));
        let var = &doc.declarations[0].variable;
        assert_eq!(var.name(), "pi");
        assert_eq!(var.value(), &Value::Float(3.14159));
        assert_eq!(doc.declarations[0].line, 2);
    }

    #[test]
    fn test_description() {
        let var = single("d Vin 12.05 ?Input Voltage (V)\n");
        assert_eq!(var.description(), Some("Input Voltage (V)"));
    }

    #[test]
    fn test_description_with_detached_marker() {
        let var = single("d Vin 12.05 ? Input Voltage");
        assert_eq!(var.description(), Some("Input Voltage"));
    }

    #[test]
    fn test_description_stops_at_comment() {
        let var = single("b on TRUE ; ?switch state   // not part of it");
        assert_eq!(var.value(), &Value::Bool(true));
        assert_eq!(var.description(), Some("switch state"));
    }

    #[test]
    fn test_comment_after_value() {
        let var = single("d x 5 // five");
        assert_eq!(var.value(), &Value::Float(5.0));
        assert_eq!(var.description(), None);
    }

    #[test]
    fn test_header_block() {
        let doc = parse("#HEADER\nline one\n#HEADER\n").unwrap();
        assert_eq!(doc.header.as_deref(), Some("line one"));
        assert!(doc.declarations.is_empty());
    }

    #[test]
    fn test_header_keeps_blank_lines_and_spacing() {
        let doc = parse("#HEADER\n\n  indented\tline\nlast\n#HEADER").unwrap();
        assert_eq!(doc.header.as_deref(), Some("\n  indented\tline\nlast"));
    }

    #[test]
    fn test_header_closed_after_tab() {
        let doc = parse("#HEADER\nbody\n\t#HEADER\nd x 1\n").unwrap();
        assert_eq!(doc.header.as_deref(), Some("body"));
        assert_eq!(doc.declarations.len(), 1);
    }

    #[test]
    fn test_header_unterminated() {
        assert_eq!(
            parse("d x 1\n#HEADER\nno end\n"),
            Err(GrammarError::UnterminatedHeader { line: 2 })
        );
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let doc = parse("\n   \n// a comment\n//also\nd x 1\n").unwrap();
        assert_eq!(doc.declarations.len(), 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse("#VERSION 2\r\ns name \"Al\" ?who\r\n").unwrap();
        assert_eq!(doc.version, Some(2.0));
        assert_eq!(doc.declarations[0].variable.description(), Some("who"));
    }

    #[test]
    fn test_version_errors() {
        assert_eq!(
            parse("#VERSION"),
            Err(GrammarError::VersionArity { line: 1, found: 1 })
        );
        assert_eq!(
            parse("#VERSION 1 2"),
            Err(GrammarError::VersionArity { line: 1, found: 3 })
        );
        assert_eq!(
            parse("\n#VERSION one"),
            Err(GrammarError::VersionFormat { line: 2, raw: "one".into() })
        );
    }

    #[test]
    fn test_invalid_name_strict() {
        assert_eq!(
            parse("d 1x 5"),
            Err(GrammarError::InvalidName { line: 1, name: "1x".into() })
        );
    }

    #[test]
    fn test_invalid_name_legacy_continues() {
        let doc = parse_document("d x-1 5\nd 1x 6\n", &ParseOptions::legacy()).unwrap();
        assert_eq!(doc.declarations.len(), 2);
        assert_eq!(doc.declarations[0].variable.name(), "x-1");
        assert_eq!(
            doc.warnings,
            vec![GrammarError::InvalidName { line: 2, name: "1x".into() }]
        );
    }

    #[test]
    fn test_too_few_tokens() {
        assert_eq!(parse("d x"), Err(GrammarError::TooFewTokens { line: 1 }));
    }

    #[test]
    fn test_value_errors() {
        assert_eq!(
            parse("d x five"),
            Err(GrammarError::ValueFormat { line: 1, raw: "five".into() })
        );
        assert_eq!(
            parse("b x yes"),
            Err(GrammarError::BooleanFormat { line: 1, raw: "yes".into() })
        );
        assert_eq!(
            parse("s x \"open"),
            Err(GrammarError::UnterminatedString { line: 1 })
        );
    }

    #[test]
    fn test_semicolons() {
        assert_eq!(single("d x 5;").value(), &Value::Float(5.0));
        assert_eq!(single("d x 5 ;").value(), &Value::Float(5.0));
        assert_eq!(
            parse("d x 5 ; ;"),
            Err(GrammarError::ExcessiveSemicolons { line: 1 })
        );
        assert_eq!(
            parse("d x 5;;"),
            Err(GrammarError::ExcessiveSemicolons { line: 1 })
        );
    }

    #[test]
    fn test_unexpected_token() {
        assert_eq!(
            parse("d x 5 6"),
            Err(GrammarError::UnexpectedToken { line: 1, token: "6".into() })
        );
    }

    #[test]
    fn test_unrecognized_line() {
        assert_eq!(
            parse("x y z"),
            Err(GrammarError::UnrecognizedLine { line: 1, token: "x".into() })
        );
    }

    #[test]
    fn test_duplicate_in_file() {
        assert_eq!(
            parse("d x 1\ns x \"a\""),
            Err(GrammarError::DuplicateName { line: 2, name: "x".into() })
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(single("s x \"two  words\"").value(), &Value::Text("two  words".into()));
        assert_eq!(single("s x bare").value(), &Value::Text("bare".into()));
        let var = single("s x \"a\"; ?d");
        assert_eq!(var.value(), &Value::Text("a".into()));
        assert_eq!(var.description(), Some("d"));
    }

    #[test]
    fn test_vector_and_matrix() {
        let v = single("m<d> Vout [2, 9, 12, 20] ?Output");
        assert_eq!(v.value(), &Value::FloatVector(vec![2.0, 9.0, 12.0, 20.0]));
        assert_eq!(v.description(), Some("Output"));

        let m = single("m<s> grid [\"a b\", \"c\"; \"d\", \"e;f\"];");
        assert_eq!(m.dimension(), Dimension::Matrix);
        assert_eq!(
            m.value(),
            &Value::TextMatrix(vec![
                vec!["a b".into(), "c".into()],
                vec!["d".into(), "e;f".into()],
            ])
        );
    }

    #[test]
    fn test_array_errors() {
        assert_eq!(
            parse("m<d> v 5"),
            Err(GrammarError::ExpectedBracket { line: 1, token: "5".into() })
        );
        assert!(matches!(
            parse("m<b> v [true, 2]"),
            Err(GrammarError::BooleanFormat { line: 1, .. })
        ));
    }

    #[test]
    fn test_glued_terminator() {
        assert_eq!(single("s x abc;").value(), &Value::Text("abc".into()));

        let var = single("d x 5;?volts");
        assert_eq!(var.value(), &Value::Float(5.0));
        assert_eq!(var.description(), Some("volts"));

        let var = single("m<d> v [1, 2];?two // note");
        assert_eq!(var.value(), &Value::FloatVector(vec![1.0, 2.0]));
        assert_eq!(var.description(), Some("two"));

        let var = single("b on true;//comment");
        assert_eq!(var.value(), &Value::Bool(true));
        assert_eq!(var.description(), None);

        assert_eq!(
            parse("d x 5;;?volts"),
            Err(GrammarError::ExcessiveSemicolons { line: 1 })
        );
        assert_eq!(
            parse("s x abc;def"),
            Err(GrammarError::UnexpectedToken { line: 1, token: ";def".into() })
        );
    }

    #[test]
    fn test_vertical_block_of_vectors() {
        let doc = parse("#VERTICAL\nm<d> m<d>\na b\n1 3\n2 4\n#VERTICAL\n").unwrap();
        assert_eq!(doc.declarations.len(), 2);
        assert_eq!(doc.declarations[0].line, 3);
        assert_eq!(doc.declarations[0].variable.value(), &Value::FloatVector(vec![1.0, 2.0]));
        assert_eq!(doc.declarations[1].variable.value(), &Value::FloatVector(vec![3.0, 4.0]));
    }

    #[test]
    fn test_vertical_block_aligned_columns() {
        let text = "#VERSION 2.0\n\
                    d Vin 12.05 ?Input Voltage (V)\n\
                    \n\
                    #VERTICAL\n\
                    \n\
                    m<d>      m<s>          m<b>\n\
                    Vout      labels        mask\n\
                    ?Output   ?Plot labels  ?\n\
                    2.0;      \"low end\"     True;\n\
                    9.0;      \"high\"        False;\n\
                    // a whole-line note\n\
                    12.0;     // trailing note\n\
                    20.0;\n\
                    \n\
                    #VERTICAL\n";
        let doc = parse(text).unwrap();
        let vars: Vec<&Variable> = doc.declarations.iter().map(|d| &d.variable).collect();
        assert_eq!(vars.len(), 4);

        assert_eq!(vars[1].name(), "Vout");
        assert_eq!(
            vars[1].value(),
            &Value::FloatMatrix(vec![vec![2.0], vec![9.0], vec![12.0], vec![20.0]])
        );
        assert_eq!(vars[1].description(), Some("Output"));

        assert_eq!(
            vars[2].value(),
            &Value::TextVector(vec!["low end".into(), "high".into()])
        );
        assert_eq!(vars[2].description(), Some("Plot labels"));

        assert_eq!(vars[3].value(), &Value::BoolMatrix(vec![vec![true], vec![false]]));
        assert_eq!(vars[3].description(), None);
    }

    #[test]
    fn test_vertical_matrix_rows() {
        let grid = Value::FloatMatrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let closed = single("#VERTICAL\nm<d>\ngrid\n1\n2;\n3\n4;\n#VERTICAL");
        assert_eq!(closed.value(), &grid);
        let open = single("#VERTICAL\nm<d>\ngrid\n1\n2;\n3\n4\n#VERTICAL");
        assert_eq!(open.value(), &grid);
    }

    #[test]
    fn test_vertical_comment_inside_quotes() {
        let doc = parse("#VERTICAL\nm<s> m<s>\nurl note\n\"http://a\"  x // c\n#VERTICAL").unwrap();
        assert_eq!(
            doc.declarations[0].variable.value(),
            &Value::TextVector(vec!["http://a".into()])
        );
        assert_eq!(
            doc.declarations[1].variable.value(),
            &Value::TextVector(vec!["x".into()])
        );
    }

    #[test]
    fn test_vertical_unterminated() {
        assert_eq!(
            parse("d x 1\n#VERTICAL\nm<d>\nv\n1\n"),
            Err(GrammarError::UnterminatedVertical { line: 2 })
        );
    }

    #[test]
    fn test_vertical_layout_errors() {
        assert_eq!(
            parse("#VERTICAL\nm<d>\nv\n#VERTICAL"),
            Err(GrammarError::VerticalLayout { line: 1, reason: "fewer than three lines" })
        );
        assert!(matches!(
            parse("#VERTICAL\nd\nv\n1\n#VERTICAL"),
            Err(GrammarError::VerticalLayout { line: 2, .. })
        ));
        assert_eq!(
            parse("#VERTICAL\nm<d> m<d>\nv\n1\n#VERTICAL"),
            Err(GrammarError::VerticalLayout {
                line: 2,
                reason: "type, name and description counts differ",
            })
        );
        assert_eq!(
            parse("#VERTICAL\nm<d> m<d>\na b\n1\n2 3\n#VERTICAL"),
            Err(GrammarError::VerticalLayout { line: 5, reason: "too many elements in row" })
        );
    }

    #[test]
    fn test_vertical_value_errors() {
        assert_eq!(
            parse("#VERTICAL\nm<d>\nv\n1\nx\n#VERTICAL"),
            Err(GrammarError::ValueFormat { line: 5, raw: "x".into() })
        );
        assert!(matches!(
            parse("#VERTICAL\nm<d>\ng\n1\n2;\n3;\n#VERTICAL"),
            Err(GrammarError::InvalidValue { line: 6, .. })
        ));
        assert_eq!(
            parse("d a 1\n#VERTICAL\nm<d>\na\n1\n#VERTICAL"),
            Err(GrammarError::DuplicateName { line: 4, name: "a".into() })
        );
        assert_eq!(
            parse("#VERTICAL\nm<d>\n1a\n1\n#VERTICAL"),
            Err(GrammarError::InvalidName { line: 3, name: "1a".into() })
        );
    }
}
