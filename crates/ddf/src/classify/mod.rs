//! Type inference and name validation for DDF variables.
//!
//! Classification works in two passes. [`classify`] walks the first element
//! of each nesting level to find the depth and leaf kind, exactly as the
//! format defines it. [`to_value`] then converts the whole node, checking
//! every leaf, so heterogeneous or ragged input never reaches a document.

use crate::error::ClassifyError;
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{Dimension, Leaf, Node, PrimitiveKind, Value};

/// Result of inspecting a host value's first-element chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Number of sequence levels above the first leaf.
    pub depth: usize,
    /// Kind of the first leaf.
    pub kind: PrimitiveKind,
}

impl Classification {
    /// Returns the dimension, or None if the depth exceeds a matrix.
    pub fn dimension(&self) -> Option<Dimension> {
        Dimension::from_depth(self.depth)
    }
}

/// Infers the nesting depth and primitive kind of a host value.
///
/// Only the first element of each sequence is inspected. Depths beyond
/// [`MAX_NESTING_DEPTH`] abort with [`ClassifyError::DepthExceeded`].
pub fn classify(node: &Node) -> Result<Classification, ClassifyError> {
    let mut current = node;
    let mut depth = 0;

    while let Node::Seq(items) = current {
        depth += 1;
        current = items.first().ok_or(ClassifyError::EmptySequence)?;
        if depth > MAX_NESTING_DEPTH {
            return Err(ClassifyError::DepthExceeded {
                max: MAX_NESTING_DEPTH,
            });
        }
    }

    let kind = leaf_kind(current).ok_or_else(|| ClassifyError::UnrecognizedType {
        type_name: current.type_name().to_string(),
    })?;
    Ok(Classification { depth, kind })
}

/// Converts a host value of known classification into a [`Value`].
///
/// Every leaf is checked against the classified kind and every matrix row
/// against the first row's length. Depths above 2 must be rejected by the
/// caller before conversion.
///
/// Integer leaves become floats; those beyond 2^53 lose precision.
pub fn to_value(node: &Node, classification: Classification) -> Result<Value, ClassifyError> {
    let kind = classification.kind;
    match (classification.dimension(), node) {
        (Some(Dimension::Scalar), _) => Ok(Value::scalar(to_leaf(node, kind)?)),
        (Some(Dimension::Vector), Node::Seq(items)) => {
            let leaves = items
                .iter()
                .map(|item| to_leaf(item, kind))
                .collect::<Result<Vec<_>, _>>()?;
            Value::vector(kind, leaves)
        }
        (Some(Dimension::Matrix), Node::Seq(rows)) => {
            let rows = rows
                .iter()
                .map(|row| match row {
                    Node::Seq(cells) => cells.iter().map(|cell| to_leaf(cell, kind)).collect(),
                    other => Err(mismatch(kind, other)),
                })
                .collect::<Result<Vec<Vec<Leaf>>, _>>()?;
            Value::matrix(kind, rows)
        }
        (_, other) => Err(ClassifyError::UnrecognizedType {
            type_name: other.type_name().to_string(),
        }),
    }
}

fn leaf_kind(node: &Node) -> Option<PrimitiveKind> {
    match node {
        Node::Int(_) | Node::Float(_) => Some(PrimitiveKind::Float64),
        Node::Text(_) => Some(PrimitiveKind::Text),
        Node::Bool(_) => Some(PrimitiveKind::Boolean),
        Node::Seq(_) | Node::Other(_) => None,
    }
}

/// Converts one leaf. Integers are stored as `f64`, so magnitudes above
/// 2^53 round to the nearest representable float.
fn to_leaf(node: &Node, kind: PrimitiveKind) -> Result<Leaf, ClassifyError> {
    match (kind, node) {
        (PrimitiveKind::Float64, Node::Int(v)) => Ok(Leaf::Float(*v as f64)),
        (PrimitiveKind::Float64, Node::Float(v)) => Ok(Leaf::Float(*v)),
        (PrimitiveKind::Text, Node::Text(v)) => Ok(Leaf::Text(v.clone())),
        (PrimitiveKind::Boolean, Node::Bool(v)) => Ok(Leaf::Bool(*v)),
        (_, other) => Err(mismatch(kind, other)),
    }
}

fn mismatch(expected: PrimitiveKind, found: &Node) -> ClassifyError {
    ClassifyError::HeterogeneousSequence {
        expected,
        found: found.type_name().to_string(),
    }
}

/// Rule applied to variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameRule {
    /// ASCII letter first, then ASCII letters, digits or underscore.
    #[default]
    Strict,
    /// Alphabetic first character and no whitespace anywhere.
    Legacy,
}

/// Validates a variable name under the given rule.
pub fn validate_name(name: &str, rule: NameRule) -> Result<(), &'static str> {
    let mut chars = name.chars();
    let first = chars.next().ok_or("name is empty")?;

    match rule {
        NameRule::Strict => {
            if !first.is_ascii_alphabetic() {
                return Err("name must start with a letter");
            }
            if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err("name may only contain letters, digits and underscores");
            }
        }
        NameRule::Legacy => {
            if !first.is_alphabetic() {
                return Err("name must start with a letter");
            }
            if chars.any(char::is_whitespace) {
                return Err("name must not contain whitespace");
            }
        }
    }
    Ok(())
}

/// Returns true if the name is valid under the given rule.
pub fn is_valid_name(name: &str, rule: NameRule) -> bool {
    validate_name(name, rule).is_ok()
}
