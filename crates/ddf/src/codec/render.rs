//! Document rendering to DDF text.

use std::cmp::Reverse;

use tracing::warn;

use crate::codec::literal;
use crate::codec::tokenize::split;
use crate::error::RenderError;
use crate::limits::{FORMAT_VERSION, TOKEN_DELIMITERS, UNSET_VERSION, VERTICAL_COLUMN_GAP};
use crate::model::{Dimension, Document, Value, Variable};

/// Options for rendering a document.
///
/// With the defaults the output parses back to an equal document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Write vectors and matrices as columns of `#VERTICAL` blocks.
    pub vertical: bool,
    /// Omit blank spacer lines.
    pub optimize: bool,
    /// Omit the header block.
    pub decapitate: bool,
    /// Omit the `#VERSION` line.
    pub skip_version: bool,
    /// Order vectors and matrices by element count, ascending (stable).
    /// Vertical blocks always order their columns longest first.
    pub sort_matrices: bool,
    /// Omit `?description` suffixes.
    pub hide_descriptions: bool,
    /// Append `;` after every inline value.
    pub terminate: bool,
}

impl RenderOptions {
    /// Creates default rendering options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from the compact letter syntax.
    ///
    /// `v` vertical, `o` optimize, `d` decapitate, `-` skip version,
    /// `;` terminate, `s` sort matrices, `u` hide descriptions. Unknown
    /// letters are ignored with a warning.
    pub fn from_flags(flags: &str) -> Self {
        let mut options = Self::default();
        for flag in flags.chars() {
            match flag {
                'v' => options.vertical = true,
                'o' => options.optimize = true,
                'd' => options.decapitate = true,
                '-' => options.skip_version = true,
                ';' => options.terminate = true,
                's' => options.sort_matrices = true,
                'u' => options.hide_descriptions = true,
                other => warn!(flag = %other, "ignoring unknown render flag"),
            }
        }
        options
    }

    pub fn vertical(mut self, on: bool) -> Self {
        self.vertical = on;
        self
    }

    pub fn optimize(mut self, on: bool) -> Self {
        self.optimize = on;
        self
    }

    pub fn decapitate(mut self, on: bool) -> Self {
        self.decapitate = on;
        self
    }

    pub fn skip_version(mut self, on: bool) -> Self {
        self.skip_version = on;
        self
    }

    pub fn sort_matrices(mut self, on: bool) -> Self {
        self.sort_matrices = on;
        self
    }

    pub fn hide_descriptions(mut self, on: bool) -> Self {
        self.hide_descriptions = on;
        self
    }

    pub fn terminate(mut self, on: bool) -> Self {
        self.terminate = on;
        self
    }
}

/// Renders a document to text.
///
/// Emission order is version, header, scalars, vectors, matrices. Any
/// value, description or header line that would not read back fails the
/// whole render.
pub fn render(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    let mut out = String::new();

    if !options.skip_version {
        let version = if doc.version() == UNSET_VERSION {
            FORMAT_VERSION
        } else {
            doc.version()
        };
        out.push_str("#VERSION ");
        out.push_str(&literal::format_float(version));
        out.push('\n');
        spacer(&mut out, options);
    }

    let header = doc.header();
    if !options.decapitate && !header.is_empty() {
        check_header(header)?;
        out.push_str("#HEADER\n");
        out.push_str(header);
        out.push_str("\n#HEADER\n");
        spacer(&mut out, options);
    }

    for var in doc.variables(Dimension::Scalar) {
        declaration(&mut out, var, options)?;
    }

    let mut vectors = doc.variables(Dimension::Vector);
    let mut matrices = doc.variables(Dimension::Matrix);
    if options.vertical {
        // Data rows fill columns from the left, so shorter columns go last.
        vectors.sort_by_key(|v| Reverse(v.len()));
        matrices.sort_by_key(|v| Reverse(v.len()));
        for block in [vectors, matrices] {
            if !block.is_empty() {
                vertical_block(&mut out, &block, options)?;
            }
        }
        return Ok(out);
    }

    if options.sort_matrices {
        vectors.sort_by_key(|v| v.len());
        matrices.sort_by_key(|v| v.len());
    }
    for var in vectors.into_iter().chain(matrices) {
        declaration(&mut out, var, options)?;
    }
    Ok(out)
}

fn spacer(out: &mut String, options: &RenderOptions) {
    if !options.optimize {
        out.push('\n');
    }
}

fn check_header(header: &str) -> Result<(), RenderError> {
    for (idx, line) in header.split('\n').enumerate() {
        let first = split(line, TOKEN_DELIMITERS).first().map(|t| t.text);
        if first == Some("#HEADER") {
            return Err(RenderError::UnrenderableHeader { line: idx + 1 });
        }
    }
    Ok(())
}

fn check_value(var: &Variable) -> Result<(), RenderError> {
    let value = var.value();
    value
        .validate()
        .map_err(|_| RenderError::UnrenderableValue {
            name: var.name().to_string(),
            reason: "value has an invalid shape",
        })?;
    check_texts(value).map_err(|reason| RenderError::UnrenderableValue {
        name: var.name().to_string(),
        reason,
    })
}

fn declaration(out: &mut String, var: &Variable, options: &RenderOptions) -> Result<(), RenderError> {
    check_value(var)?;
    let text = literal::inline(&literal::cells(var.value()));

    out.push_str(var.type_symbol());
    out.push(' ');
    out.push_str(var.name());
    out.push(' ');
    out.push_str(&text);
    if options.terminate {
        out.push(';');
    }
    if let Some(desc) = var.description().filter(|_| !options.hide_descriptions) {
        check_description(desc).map_err(|reason| RenderError::UnrenderableDescription {
            name: var.name().to_string(),
            reason,
        })?;
        // A bare `?` drops one separator, so leading whitespace needs one extra.
        out.push_str(if desc.starts_with(|c| TOKEN_DELIMITERS.contains(c)) {
            " ? "
        } else {
            " ?"
        });
        out.push_str(desc);
    }
    out.push('\n');
    Ok(())
}

fn check_texts(value: &Value) -> Result<(), &'static str> {
    match value {
        Value::Text(v) => literal::check_text(v),
        Value::TextVector(v) => v.iter().try_for_each(|s| literal::check_text(s)),
        Value::TextMatrix(m) => m.iter().flatten().try_for_each(|s| literal::check_text(s)),
        _ => Ok(()),
    }
}

fn check_description(desc: &str) -> Result<(), &'static str> {
    if desc.contains(['\n', '\r']) {
        return Err("description contains a line break");
    }
    if desc.ends_with(|c| TOKEN_DELIMITERS.contains(c)) {
        return Err("description ends with whitespace");
    }
    if split(desc, TOKEN_DELIMITERS)
        .iter()
        .any(|token| token.text.starts_with("//"))
    {
        return Err("description contains a comment marker");
    }
    Ok(())
}

/// Descriptions in a vertical block share one `?`-separated line and are
/// trimmed when read.
fn check_column_description(desc: &str) -> Result<(), &'static str> {
    check_description(desc)?;
    if desc.contains('?') {
        return Err("description in a vertical block contains '?'");
    }
    if desc.contains("//") {
        return Err("description contains a comment marker");
    }
    if desc.starts_with(|c| TOKEN_DELIMITERS.contains(c)) {
        return Err("description in a vertical block starts with whitespace");
    }
    Ok(())
}

/// Writes one `#VERTICAL` block: a types row, a names row, an optional
/// description row, then one row per element index. Columns are padded to
/// a common width; a column with no element left is omitted from the row.
fn vertical_block(
    out: &mut String,
    vars: &[&Variable],
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let mut rows: Vec<Vec<String>> = vec![
        vars.iter().map(|v| v.type_symbol().to_string()).collect(),
        vars.iter().map(|v| v.name().to_string()).collect(),
    ];

    if !options.hide_descriptions && vars.iter().any(|v| v.description().is_some()) {
        let mut descriptions = Vec::with_capacity(vars.len());
        for var in vars {
            let desc = var.description().unwrap_or_default();
            check_column_description(desc).map_err(|reason| RenderError::UnrenderableDescription {
                name: var.name().to_string(),
                reason,
            })?;
            descriptions.push(format!("?{desc}"));
        }
        rows.push(descriptions);
    }

    let mut columns = Vec::with_capacity(vars.len());
    for var in vars {
        check_value(var)?;
        columns.push(literal::column(&literal::cells(var.value())));
    }
    let depth = columns.first().map_or(0, Vec::len);
    for r in 0..depth {
        rows.push(columns.iter().filter_map(|c| c.get(r).cloned()).collect());
    }

    let mut widths = vec![0; vars.len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    if !out.is_empty() && !out.ends_with("\n\n") {
        spacer(out, options);
    }
    out.push_str("#VERTICAL\n");
    spacer(out, options);
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.chars().count() + VERTICAL_COLUMN_GAP;
                out.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push('\n');
    }
    spacer(out, options);
    out.push_str("#VERTICAL\n");
    Ok(())
}
