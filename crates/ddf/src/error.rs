//! Error types for DDF classification, parsing, rendering and document handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::PrimitiveKind;

/// Error while inferring the kind and dimension of a host value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("empty sequence provided, cannot infer type")]
    EmptySequence,

    #[error("nesting depth exceeded {max}, aborting")]
    DepthExceeded { max: usize },

    #[error("unrecognized type {type_name}")]
    UnrecognizedType { type_name: String },

    #[error("heterogeneous sequence: expected {expected} elements, found {found}")]
    HeterogeneousSequence {
        expected: PrimitiveKind,
        found: String,
    },

    #[error("ragged matrix: row {row} has {found} elements, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Error while parsing DDF text.
///
/// Every variant carries the 1-based line number it was raised on. The
/// first grammar error aborts the whole load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    // === G001: Version statement ===
    #[error("[G001] line {line}: version statement requires exactly 2 words, found {found}")]
    VersionArity { line: usize, found: usize },

    #[error("[G001] line {line}: failed to convert version '{raw}' to a number")]
    VersionFormat { line: usize, raw: String },

    // === G002: Blocks ===
    #[error("[G002] line {line}: failed to find closing #HEADER statement")]
    UnterminatedHeader { line: usize },

    #[error("[G002] line {line}: failed to find closing #VERTICAL statement")]
    UnterminatedVertical { line: usize },

    #[error("[G002] line {line}: malformed vertical block: {reason}")]
    VerticalLayout { line: usize, reason: &'static str },

    // === G003: Line structure ===
    #[error("[G003] line {line}: unrecognized statement '{token}'")]
    UnrecognizedLine { line: usize, token: String },

    #[error("[G003] line {line}: insufficient number of tokens for inline variable statement")]
    TooFewTokens { line: usize },

    #[error("[G003] line {line}: detected excessive semicolons")]
    ExcessiveSemicolons { line: usize },

    #[error("[G003] line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    // === G004: Names ===
    #[error("[G004] line {line}: invalid variable name '{name}'")]
    InvalidName { line: usize, name: String },

    #[error("[G004] line {line}: variable '{name}' already exists")]
    DuplicateName { line: usize, name: String },

    // === G005: Values ===
    #[error("[G005] line {line}: failed to interpret '{raw}' as a number")]
    ValueFormat { line: usize, raw: String },

    #[error("[G005] line {line}: failed to interpret '{raw}' as a boolean")]
    BooleanFormat { line: usize, raw: String },

    #[error("[G005] line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("[G005] line {line}: expected '[' to open literal, found '{token}'")]
    ExpectedBracket { line: usize, token: String },

    #[error("[G005] line {line}: failed to find closing ']'")]
    UnclosedBracket { line: usize },

    #[error("[G005] line {line}: malformed literal: {reason}")]
    MalformedLiteral { line: usize, reason: &'static str },

    #[error("[G005] line {line}: invalid value: {source}")]
    InvalidValue {
        line: usize,
        #[source]
        source: ClassifyError,
    },
}

impl GrammarError {
    /// Returns the short error code (e.g., "G001").
    pub fn code(&self) -> &'static str {
        match self {
            GrammarError::VersionArity { .. } | GrammarError::VersionFormat { .. } => "G001",
            GrammarError::UnterminatedHeader { .. }
            | GrammarError::UnterminatedVertical { .. }
            | GrammarError::VerticalLayout { .. } => "G002",
            GrammarError::UnrecognizedLine { .. }
            | GrammarError::TooFewTokens { .. }
            | GrammarError::ExcessiveSemicolons { .. }
            | GrammarError::UnexpectedToken { .. } => "G003",
            GrammarError::InvalidName { .. } | GrammarError::DuplicateName { .. } => "G004",
            _ => "G005",
        }
    }

    /// Returns the line number the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            GrammarError::VersionArity { line, .. }
            | GrammarError::VersionFormat { line, .. }
            | GrammarError::UnterminatedHeader { line }
            | GrammarError::UnterminatedVertical { line }
            | GrammarError::VerticalLayout { line, .. }
            | GrammarError::UnrecognizedLine { line, .. }
            | GrammarError::TooFewTokens { line }
            | GrammarError::ExcessiveSemicolons { line }
            | GrammarError::UnexpectedToken { line, .. }
            | GrammarError::InvalidName { line, .. }
            | GrammarError::DuplicateName { line, .. }
            | GrammarError::ValueFormat { line, .. }
            | GrammarError::BooleanFormat { line, .. }
            | GrammarError::UnterminatedString { line }
            | GrammarError::ExpectedBracket { line, .. }
            | GrammarError::UnclosedBracket { line }
            | GrammarError::MalformedLiteral { line, .. }
            | GrammarError::InvalidValue { line, .. } => *line,
        }
    }
}

/// Error while rendering a document to text.
///
/// Rendering stops at the first error; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("variable '{name}' cannot be rendered: {reason}")]
    UnrenderableValue { name: String, reason: &'static str },

    #[error("description of variable '{name}' cannot be rendered: {reason}")]
    UnrenderableDescription { name: String, reason: &'static str },

    #[error("header line {line} cannot be rendered: it would close the header block")]
    UnrenderableHeader { line: usize },
}

/// Error reported by [`crate::Document`] operations.
///
/// Each of these is also appended, as text, to the document's error log.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to add variable '{name}': {source}")]
    Classify {
        name: String,
        #[source]
        source: ClassifyError,
    },

    #[error("failed to add variable '{name}': variable with given name already exists")]
    DuplicateName { name: String },

    #[error("failed to add variable '{name}': dimension {depth} exceeds 2")]
    DimensionOutOfRange { name: String, depth: usize },

    #[error("failed to add variable '{name}': invalid variable name")]
    InvalidName { name: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
