//! The document store: named variables plus header and version.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::classify::{NameRule, classify, to_value, validate_name};
use crate::codec::{ParseOptions, RenderOptions, parse_document, render};
use crate::error::{DocumentError, GrammarError};
use crate::limits::{MAX_DIMENSION_DEPTH, NO_ERRORS, SHOW_CELL_LEN, UNSET_VERSION};
use crate::model::variable::truncate;
use crate::model::{Dimension, Node, Variable};

/// How [`Document::names`] formats its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameListing {
    /// Append the type symbol to each name (`pi (d)`).
    pub with_types: bool,
    /// Join all names into a single comma-separated entry.
    pub merged: bool,
}

/// A collection of uniquely named variables with an optional header text
/// and format version.
///
/// Variables keep insertion order. Every failed operation appends a message
/// to the document's error log in addition to returning a typed error.
#[derive(Debug, Clone)]
pub struct Document {
    variables: Vec<Variable>,
    index: FxHashMap<String, usize>,
    header: String,
    version: f64,
    errors: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with no version set.
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            index: FxHashMap::default(),
            header: String::new(),
            version: UNSET_VERSION,
            errors: Vec::new(),
        }
    }

    /// Creates a document and loads a file into it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let mut doc = Self::new();
        doc.load(path)?;
        Ok(doc)
    }

    /// Adds a host value under `name`, inferring its kind and dimension.
    ///
    /// On failure the document is unchanged apart from its error log.
    pub fn add(
        &mut self,
        value: impl Into<Node>,
        name: &str,
        description: &str,
    ) -> Result<(), DocumentError> {
        let result = self.build(value.into(), name, description);
        match result {
            Ok(variable) => {
                self.push(variable);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn build(&self, node: Node, name: &str, description: &str) -> Result<Variable, DocumentError> {
        if validate_name(name, NameRule::Strict).is_err() {
            return Err(DocumentError::InvalidName { name: name.to_string() });
        }
        if self.contains(name) {
            return Err(DocumentError::DuplicateName { name: name.to_string() });
        }
        let classify_err = |source| DocumentError::Classify {
            name: name.to_string(),
            source,
        };
        let classification = classify(&node).map_err(classify_err)?;
        if classification.depth > MAX_DIMENSION_DEPTH {
            return Err(DocumentError::DimensionOutOfRange {
                name: name.to_string(),
                depth: classification.depth,
            });
        }
        let value = to_value(&node, classification).map_err(classify_err)?;
        Variable::new(name, value, description).map_err(classify_err)
    }

    /// Inserts an already built variable, checking its name.
    pub fn insert(&mut self, variable: Variable) -> Result<(), DocumentError> {
        let name = variable.name();
        let err = if validate_name(name, NameRule::Strict).is_err() {
            Some(DocumentError::InvalidName { name: name.to_string() })
        } else if self.contains(name) {
            Some(DocumentError::DuplicateName { name: name.to_string() })
        } else {
            None
        };
        match err {
            Some(err) => Err(self.fail(err)),
            None => {
                self.push(variable);
                Ok(())
            }
        }
    }

    fn push(&mut self, variable: Variable) {
        self.index
            .insert(variable.name().to_string(), self.variables.len());
        self.variables.push(variable);
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Removes every variable. Header, version and error log are kept.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.index.clear();
    }

    /// Returns the number of variables.
    pub fn count(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// Returns the variables of one dimension in insertion order.
    pub fn variables(&self, dimension: Dimension) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|v| v.dimension() == dimension)
            .collect()
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_version(&mut self, version: f64) {
        self.version = version;
    }

    /// Returns the version read from the last loaded file, or
    /// [`UNSET_VERSION`] if none was set.
    pub fn version(&self) -> f64 {
        self.version
    }

    /// Returns the most recent error message, or `"No errors"`.
    pub fn last_error(&self) -> &str {
        self.errors.last().map_or(NO_ERRORS, String::as_str)
    }

    /// Returns every error message logged so far, oldest first.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn fail(&mut self, err: DocumentError) -> DocumentError {
        let message = err.to_string();
        warn!(error = %message, "document operation failed");
        self.errors.push(message);
        err
    }

    // =========================================================================
    // FILES
    // =========================================================================

    /// Loads a file using the strict grammar.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        self.load_with(path, &ParseOptions::default())
    }

    /// Loads a file, adding its variables to this document.
    ///
    /// The load is all or nothing: on any error no variable, header or
    /// version from the file is kept.
    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                return Err(self.fail(DocumentError::Io {
                    action: "read",
                    path: path.to_path_buf(),
                    source,
                }));
            }
        };
        self.load_str(&text, options)?;
        debug!(path = %path.display(), variables = self.count(), "loaded document");
        Ok(())
    }

    /// Parses text and adds its contents to this document.
    pub fn load_str(&mut self, text: &str, options: &ParseOptions) -> Result<(), DocumentError> {
        let parsed = match parse_document(text, options) {
            Ok(parsed) => parsed,
            Err(err) => return Err(self.fail(err.into())),
        };

        for warning in &parsed.warnings {
            let message = warning.to_string();
            warn!(error = %message, "accepted under legacy rules");
            self.errors.push(message);
        }

        if let Some(decl) = parsed
            .declarations
            .iter()
            .find(|d| self.contains(d.variable.name()))
        {
            let err = GrammarError::DuplicateName {
                line: decl.line,
                name: decl.variable.name().to_string(),
            };
            return Err(self.fail(err.into()));
        }

        if let Some(version) = parsed.version {
            self.version = version;
        }
        if let Some(header) = parsed.header {
            self.header = header;
        }
        for decl in parsed.declarations {
            self.push(decl.variable);
        }
        Ok(())
    }

    /// Resets variables, header and version, then loads a file.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        self.clear();
        self.header.clear();
        self.version = UNSET_VERSION;
        self.load(path)
    }

    /// Renders the document to text.
    pub fn render(&mut self, options: &RenderOptions) -> Result<String, DocumentError> {
        render(self, options).map_err(|err| self.fail(err.into()))
    }

    /// Renders the document and writes it to `path`.
    ///
    /// Nothing is written if rendering fails.
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
        options: &RenderOptions,
    ) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let text = self.render(options)?;
        if let Err(source) = fs::write(path, &text) {
            return Err(self.fail(DocumentError::Io {
                action: "write",
                path: path.to_path_buf(),
                source,
            }));
        }
        debug!(path = %path.display(), bytes = text.len(), "saved document");
        Ok(())
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    fn in_emission_order(&self) -> impl Iterator<Item = &Variable> {
        Dimension::ALL
            .into_iter()
            .flat_map(|dim| self.variables.iter().filter(move |v| v.dimension() == dim))
    }

    /// Lists variable names in emission order: scalars, vectors, matrices.
    pub fn names(&self, listing: NameListing) -> Vec<String> {
        let names: Vec<String> = self
            .in_emission_order()
            .map(|v| {
                if !listing.with_types {
                    return v.name().to_string();
                }
                match v.dimension() {
                    Dimension::Matrix => format!("{} ({}, 2D)", v.name(), v.type_symbol()),
                    _ => format!("{} ({})", v.name(), v.type_symbol()),
                }
            })
            .collect();

        if listing.merged {
            vec![names.join(", ")]
        } else {
            names
        }
    }

    /// Returns a plain-text table of all variables grouped by dimension.
    pub fn show(&self) -> String {
        const COLUMNS: [&str; 4] = ["Name", "Type", "Value", "Description"];

        let groups: Vec<(&str, Vec<[String; 4]>)> = Dimension::ALL
            .into_iter()
            .map(|dim| {
                let rows = self
                    .variables(dim)
                    .into_iter()
                    .map(|v| {
                        let value = v.value().to_string();
                        [
                            v.name(),
                            v.type_symbol(),
                            value.as_str(),
                            v.description().unwrap_or(""),
                        ]
                        .map(|cell| truncate(cell, SHOW_CELL_LEN))
                    })
                    .collect();
                (group_title(dim), rows)
            })
            .collect();

        let mut widths = COLUMNS.map(|c| c.chars().count());
        for row in groups.iter().flat_map(|(_, rows)| rows) {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for (title, rows) in &groups {
            if rows.is_empty() {
                continue;
            }
            out.push_str(title);
            out.push_str(":\n");
            out.push_str(&table_row(&COLUMNS, &widths));
            for row in rows {
                out.push_str(&table_row(row, &widths));
            }
            out.push('\n');
        }
        out.push_str(&format!("No. Variables: {}\n", self.count()));
        out
    }
}

fn group_title(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Scalar => "Scalars",
        Dimension::Vector => "Vectors",
        Dimension::Matrix => "Matrices",
    }
}

fn table_row<S: AsRef<str>>(cells: &[S], widths: &[usize; 4]) -> String {
    let mut cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("  {}\n", line.trim_end())
}
