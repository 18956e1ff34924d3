//! Named variables.

use std::fmt;

use crate::error::ClassifyError;
use crate::limits::DESCRIPTION_PREVIEW_LEN;
use crate::model::{Dimension, PrimitiveKind, Value};

/// One named value with an optional description.
///
/// Kind and dimension come from the value; they cannot be set separately.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: Value,
    description: Option<String>,
}

impl Variable {
    /// Creates a variable, checking the value's structure.
    ///
    /// An empty description is stored as no description. The name is not
    /// checked here; [`crate::Document`] applies the naming rule.
    pub fn new(
        name: impl Into<String>,
        value: Value,
        description: impl Into<String>,
    ) -> Result<Self, ClassifyError> {
        value.validate()?;
        let description = description.into();
        Ok(Self {
            name: name.into(),
            value,
            description: (!description.is_empty()).then_some(description),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the full, untruncated description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.value.kind()
    }

    pub fn dimension(&self) -> Dimension {
        self.value.dimension()
    }

    /// Returns the type tag (`d`, `m<s>`, ...).
    pub fn type_symbol(&self) -> &'static str {
        self.value.type_symbol()
    }

    /// Returns the number of leaves: 1, n, or rows times columns.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Shortens text to `max` characters, ending with `...` when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Variable({}) {}={}", self.type_symbol(), self.name, self.value)?;
        if let Some(desc) = &self.description {
            write!(f, ", (\"{}\")", truncate(desc, DESCRIPTION_PREVIEW_LEN))?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_is_none() {
        let v = Variable::new("x", Value::Float(1.0), "").unwrap();
        assert_eq!(v.description(), None);
        let v = Variable::new("x", Value::Float(1.0), "volts").unwrap();
        assert_eq!(v.description(), Some("volts"));
    }

    #[test]
    fn test_rejects_invalid_value() {
        assert_eq!(
            Variable::new("x", Value::BoolVector(vec![]), ""),
            Err(ClassifyError::EmptySequence)
        );
    }

    #[test]
    fn test_display_truncates_description_only() {
        let long = "I am a rather long description";
        let v = Variable::new("X", Value::Float(5.0), long).unwrap();
        assert_eq!(v.to_string(), "<Variable(d) X=5.0, (\"I am a rather lon...\")>");
        assert_eq!(v.description(), Some(long));
    }

    #[test]
    fn test_display_without_description() {
        let v = Variable::new("Vout", Value::FloatVector(vec![2.0, 9.0]), "").unwrap();
        assert_eq!(v.to_string(), "<Variable(m<d>) Vout=[2.0, 9.0]>");
        assert_eq!(v.len(), 2);
        assert_eq!(v.dimension(), Dimension::Vector);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("exactly twenty chars", 20), "exactly twenty chars");
        assert_eq!(truncate("twenty-one characters", 20), "twenty-one charac...");
    }
}
