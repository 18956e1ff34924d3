//! Value types for DDF variables.
//!
//! A [`Value`] is an explicit sum over the three primitive kinds crossed with
//! the three dimensions. Kind and dimension are always derived from the
//! variant, never stored separately.

use std::fmt;

use crate::codec::literal;
use crate::error::ClassifyError;

/// Primitive kind of every leaf in a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Float64,
    Text,
    Boolean,
}

impl PrimitiveKind {
    /// Returns the single-letter symbol used in type tags (`d`, `s`, `b`).
    pub fn symbol(self) -> char {
        match self {
            PrimitiveKind::Float64 => 'd',
            PrimitiveKind::Text => 's',
            PrimitiveKind::Boolean => 'b',
        }
    }

    /// Creates a PrimitiveKind from its type tag symbol.
    pub fn from_symbol(c: char) -> Option<PrimitiveKind> {
        match c {
            'd' => Some(PrimitiveKind::Float64),
            's' => Some(PrimitiveKind::Text),
            'b' => Some(PrimitiveKind::Boolean),
            _ => None,
        }
    }

    /// Returns the human-readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Float64 => "double",
            PrimitiveKind::Text => "string",
            PrimitiveKind::Boolean => "bool",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nesting depth of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Dimension {
    Scalar = 0,
    Vector = 1,
    Matrix = 2,
}

impl Dimension {
    /// Creates a Dimension from a nesting depth.
    pub fn from_depth(depth: usize) -> Option<Dimension> {
        match depth {
            0 => Some(Dimension::Scalar),
            1 => Some(Dimension::Vector),
            2 => Some(Dimension::Matrix),
            _ => None,
        }
    }

    /// Returns the nesting depth.
    pub fn depth(self) -> usize {
        self as usize
    }

    /// All dimensions in emission order.
    pub const ALL: [Dimension; 3] = [Dimension::Scalar, Dimension::Vector, Dimension::Matrix];
}

/// Returns the type tag for a kind and dimension (`d`, `m<d>`, ...).
pub fn type_symbol(kind: PrimitiveKind, dimension: Dimension) -> &'static str {
    match (dimension, kind) {
        (Dimension::Scalar, PrimitiveKind::Float64) => "d",
        (Dimension::Scalar, PrimitiveKind::Text) => "s",
        (Dimension::Scalar, PrimitiveKind::Boolean) => "b",
        (_, PrimitiveKind::Float64) => "m<d>",
        (_, PrimitiveKind::Text) => "m<s>",
        (_, PrimitiveKind::Boolean) => "m<b>",
    }
}

/// Parses a type tag into its kind and whether it declares a vector/matrix.
pub fn parse_type_tag(tag: &str) -> Option<(PrimitiveKind, bool)> {
    let mut chars = tag.chars();
    match (chars.next(), chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None, None, None) => PrimitiveKind::from_symbol(c).map(|k| (k, false)),
        (Some('m'), Some('<'), Some(c), Some('>'), None) => {
            PrimitiveKind::from_symbol(c).map(|k| (k, true))
        }
        _ => None,
    }
}

/// A single leaf of any kind.
///
/// Used while assembling values whose kind is only known at run time
/// (the text parser, host-value conversion).
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Leaf {
    /// Returns the primitive kind of this leaf.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Leaf::Float(_) => PrimitiveKind::Float64,
            Leaf::Text(_) => PrimitiveKind::Text,
            Leaf::Bool(_) => PrimitiveKind::Boolean,
        }
    }
}

/// A fully validated variable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Text(String),
    Bool(bool),

    FloatVector(Vec<f64>),
    TextVector(Vec<String>),
    BoolVector(Vec<bool>),

    /// Row-major, rectangular.
    FloatMatrix(Vec<Vec<f64>>),
    /// Row-major, rectangular.
    TextMatrix(Vec<Vec<String>>),
    /// Row-major, rectangular.
    BoolMatrix(Vec<Vec<bool>>),
}

impl Value {
    /// Returns the primitive kind of this value.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Value::Float(_) | Value::FloatVector(_) | Value::FloatMatrix(_) => {
                PrimitiveKind::Float64
            }
            Value::Text(_) | Value::TextVector(_) | Value::TextMatrix(_) => PrimitiveKind::Text,
            Value::Bool(_) | Value::BoolVector(_) | Value::BoolMatrix(_) => PrimitiveKind::Boolean,
        }
    }

    /// Returns the dimension of this value.
    pub fn dimension(&self) -> Dimension {
        match self {
            Value::Float(_) | Value::Text(_) | Value::Bool(_) => Dimension::Scalar,
            Value::FloatVector(_) | Value::TextVector(_) | Value::BoolVector(_) => {
                Dimension::Vector
            }
            Value::FloatMatrix(_) | Value::TextMatrix(_) | Value::BoolMatrix(_) => {
                Dimension::Matrix
            }
        }
    }

    /// Returns the type tag of this value (`d`, `m<s>`, ...).
    pub fn type_symbol(&self) -> &'static str {
        type_symbol(self.kind(), self.dimension())
    }

    /// Returns the total number of leaves.
    pub fn len(&self) -> usize {
        match self {
            Value::Float(_) | Value::Text(_) | Value::Bool(_) => 1,
            Value::FloatVector(v) => v.len(),
            Value::TextVector(v) => v.len(),
            Value::BoolVector(v) => v.len(),
            Value::FloatMatrix(m) => m.iter().map(Vec::len).sum(),
            Value::TextMatrix(m) => m.iter().map(Vec::len).sum(),
            Value::BoolMatrix(m) => m.iter().map(Vec::len).sum(),
        }
    }

    /// Returns true if the value holds no leaves (never true for a valid value).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `(rows, columns)` for matrices.
    pub fn shape(&self) -> Option<(usize, usize)> {
        fn shape_of<T>(m: &[Vec<T>]) -> (usize, usize) {
            (m.len(), m.first().map_or(0, Vec::len))
        }
        match self {
            Value::FloatMatrix(m) => Some(shape_of(m)),
            Value::TextMatrix(m) => Some(shape_of(m)),
            Value::BoolMatrix(m) => Some(shape_of(m)),
            _ => None,
        }
    }

    /// Checks structural rules: sequences are non-empty and matrices are
    /// rectangular.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        fn check_vector<T>(v: &[T]) -> Result<(), ClassifyError> {
            if v.is_empty() {
                return Err(ClassifyError::EmptySequence);
            }
            Ok(())
        }
        fn check_matrix<T>(m: &[Vec<T>]) -> Result<(), ClassifyError> {
            let expected = m.first().ok_or(ClassifyError::EmptySequence)?.len();
            for (row, cells) in m.iter().enumerate() {
                if cells.is_empty() {
                    return Err(ClassifyError::EmptySequence);
                }
                if cells.len() != expected {
                    return Err(ClassifyError::RaggedMatrix {
                        row,
                        expected,
                        found: cells.len(),
                    });
                }
            }
            Ok(())
        }
        match self {
            Value::Float(_) | Value::Text(_) | Value::Bool(_) => Ok(()),
            Value::FloatVector(v) => check_vector(v),
            Value::TextVector(v) => check_vector(v),
            Value::BoolVector(v) => check_vector(v),
            Value::FloatMatrix(m) => check_matrix(m),
            Value::TextMatrix(m) => check_matrix(m),
            Value::BoolMatrix(m) => check_matrix(m),
        }
    }

    /// Builds a scalar value from a leaf.
    pub fn scalar(leaf: Leaf) -> Value {
        match leaf {
            Leaf::Float(v) => Value::Float(v),
            Leaf::Text(v) => Value::Text(v),
            Leaf::Bool(v) => Value::Bool(v),
        }
    }

    /// Builds a vector of `kind` from leaves, checking every leaf.
    pub fn vector(kind: PrimitiveKind, leaves: Vec<Leaf>) -> Result<Value, ClassifyError> {
        let value = match kind {
            PrimitiveKind::Float64 => Value::FloatVector(collect_leaves(kind, leaves, as_float)?),
            PrimitiveKind::Text => Value::TextVector(collect_leaves(kind, leaves, as_text)?),
            PrimitiveKind::Boolean => Value::BoolVector(collect_leaves(kind, leaves, as_bool)?),
        };
        value.validate()?;
        Ok(value)
    }

    /// Builds a matrix of `kind` from rows of leaves, checking every leaf
    /// and the rectangular shape.
    pub fn matrix(kind: PrimitiveKind, rows: Vec<Vec<Leaf>>) -> Result<Value, ClassifyError> {
        let value = match kind {
            PrimitiveKind::Float64 => Value::FloatMatrix(collect_rows(kind, rows, as_float)?),
            PrimitiveKind::Text => Value::TextMatrix(collect_rows(kind, rows, as_text)?),
            PrimitiveKind::Boolean => Value::BoolMatrix(collect_rows(kind, rows, as_bool)?),
        };
        value.validate()?;
        Ok(value)
    }

    /// Returns the float if this is a float scalar.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the elements if this is a float vector.
    pub fn as_float_vector(&self) -> Option<&[f64]> {
        match self {
            Value::FloatVector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements if this is a text vector.
    pub fn as_text_vector(&self) -> Option<&[String]> {
        match self {
            Value::TextVector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements if this is a boolean vector.
    pub fn as_bool_vector(&self) -> Option<&[bool]> {
        match self {
            Value::BoolVector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the rows if this is a float matrix.
    pub fn as_float_matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            Value::FloatMatrix(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the rows if this is a text matrix.
    pub fn as_text_matrix(&self) -> Option<&[Vec<String>]> {
        match self {
            Value::TextMatrix(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the rows if this is a boolean matrix.
    pub fn as_bool_matrix(&self) -> Option<&[Vec<bool>]> {
        match self {
            Value::BoolMatrix(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Inline literal form, without checking that text is representable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&literal::inline(&literal::cells(self)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

fn as_float(leaf: Leaf) -> Option<f64> {
    match leaf {
        Leaf::Float(v) => Some(v),
        _ => None,
    }
}

fn as_text(leaf: Leaf) -> Option<String> {
    match leaf {
        Leaf::Text(v) => Some(v),
        _ => None,
    }
}

fn as_bool(leaf: Leaf) -> Option<bool> {
    match leaf {
        Leaf::Bool(v) => Some(v),
        _ => None,
    }
}

fn collect_leaves<T>(
    kind: PrimitiveKind,
    leaves: Vec<Leaf>,
    extract: fn(Leaf) -> Option<T>,
) -> Result<Vec<T>, ClassifyError> {
    leaves
        .into_iter()
        .map(|leaf| {
            let found = leaf.kind();
            extract(leaf).ok_or_else(|| ClassifyError::HeterogeneousSequence {
                expected: kind,
                found: found.name().to_string(),
            })
        })
        .collect()
}

fn collect_rows<T>(
    kind: PrimitiveKind,
    rows: Vec<Vec<Leaf>>,
    extract: fn(Leaf) -> Option<T>,
) -> Result<Vec<Vec<T>>, ClassifyError> {
    rows.into_iter()
        .map(|row| collect_leaves(kind, row, extract))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(parse_type_tag("d"), Some((PrimitiveKind::Float64, false)));
        assert_eq!(parse_type_tag("s"), Some((PrimitiveKind::Text, false)));
        assert_eq!(parse_type_tag("m<b>"), Some((PrimitiveKind::Boolean, true)));
        assert_eq!(parse_type_tag("m<x>"), None);
        assert_eq!(parse_type_tag("m<d"), None);
        assert_eq!(parse_type_tag("dd"), None);
        assert_eq!(parse_type_tag(""), None);

        assert_eq!(type_symbol(PrimitiveKind::Text, Dimension::Scalar), "s");
        assert_eq!(type_symbol(PrimitiveKind::Text, Dimension::Vector), "m<s>");
        assert_eq!(type_symbol(PrimitiveKind::Float64, Dimension::Matrix), "m<d>");
    }

    #[test]
    fn test_kind_and_dimension_follow_variant() {
        let v = Value::BoolMatrix(vec![vec![true, false]]);
        assert_eq!(v.kind(), PrimitiveKind::Boolean);
        assert_eq!(v.dimension(), Dimension::Matrix);
        assert_eq!(v.type_symbol(), "m<b>");
        assert_eq!(v.shape(), Some((1, 2)));
        assert_eq!(Value::Text("x".into()).dimension(), Dimension::Scalar);
    }

    #[test]
    fn test_len() {
        assert_eq!(Value::Float(1.0).len(), 1);
        assert_eq!(Value::TextVector(vec!["a".into(), "b".into()]).len(), 2);
        assert_eq!(Value::FloatMatrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).len(), 4);
    }

    #[test]
    fn test_validate_shapes() {
        assert_eq!(Value::FloatVector(vec![]).validate(), Err(ClassifyError::EmptySequence));
        assert_eq!(Value::FloatMatrix(vec![]).validate(), Err(ClassifyError::EmptySequence));
        assert_eq!(
            Value::FloatMatrix(vec![vec![]]).validate(),
            Err(ClassifyError::EmptySequence)
        );
        assert_eq!(
            Value::FloatMatrix(vec![vec![1.0, 2.0], vec![3.0]]).validate(),
            Err(ClassifyError::RaggedMatrix { row: 1, expected: 2, found: 1 })
        );
        assert!(Value::FloatMatrix(vec![vec![1.0], vec![3.0]]).validate().is_ok());
    }

    #[test]
    fn test_vector_rejects_mixed_leaves() {
        let err = Value::vector(
            PrimitiveKind::Float64,
            vec![Leaf::Float(1.0), Leaf::Text("two".into())],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClassifyError::HeterogeneousSequence {
                expected: PrimitiveKind::Float64,
                found: "string".into(),
            }
        );
    }

    #[test]
    fn test_matrix_from_leaves() {
        let m = Value::matrix(
            PrimitiveKind::Boolean,
            vec![vec![Leaf::Bool(true)], vec![Leaf::Bool(false)]],
        )
        .unwrap();
        assert_eq!(m.as_bool_matrix(), Some(&[vec![true], vec![false]][..]));
    }

    #[test]
    fn test_display_is_inline_literal() {
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Text("hi there".into()).to_string(), "\"hi there\"");
        assert_eq!(Value::FloatVector(vec![1.0, 2.5]).to_string(), "[1.0, 2.5]");
        assert_eq!(
            Value::FloatMatrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).to_string(),
            "[1.0, 2.0; 3.0, 4.0]"
        );
    }
}
