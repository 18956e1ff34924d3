//! Loosely-typed host values.
//!
//! A [`Node`] is what callers hand to [`crate::Document::add`]: an arbitrary
//! nesting of sequences and leaves whose shape is only discovered by
//! classification.

/// An arbitrary nested host value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Seq(Vec<Node>),
    /// A value of a type DDF cannot store, carrying the type's display name.
    Other(String),
}

impl Node {
    /// Creates an unsupported node named after `T`.
    pub fn other<T: ?Sized>() -> Node {
        Node::Other(std::any::type_name::<T>().to_string())
    }

    /// Returns the display name of this node's type.
    pub fn type_name(&self) -> &str {
        match self {
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::Text(_) => "str",
            Node::Bool(_) => "bool",
            Node::Seq(_) => "sequence",
            Node::Other(name) => name,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    Node::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Integers that may not fit in `i64` become floats when they don't.
macro_rules! impl_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    i64::try_from(v).map_or(Node::Float(v as f64), Node::Int)
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize);

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Node::Float(f64::from(v))
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Float(v)
    }
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::Bool(v)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::Text(v.to_string())
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Node::Text(v)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(v: Vec<T>) -> Self {
        Node::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>, const N: usize> From<[T; N]> for Node {
    fn from(v: [T; N]) -> Self {
        Node::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Node>> From<&[T]> for Node {
    fn from(v: &[T]) -> Self {
        Node::Seq(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(|| Node::Other("None".to_string()), Into::into)
    }
}

impl From<serde_json::Value> for Node {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Node::Other("null".to_string()),
            serde_json::Value::Bool(b) => Node::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => n.as_f64().map_or_else(|| Node::Other("number".to_string()), Node::Float),
            },
            serde_json::Value::String(s) => Node::Text(s),
            serde_json::Value::Array(items) => Node::Seq(items.into_iter().map(Node::from).collect()),
            serde_json::Value::Object(_) => Node::Other("object".to_string()),
        }
    }
}
