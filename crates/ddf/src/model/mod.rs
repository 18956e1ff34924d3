//! Data model types for DDF.
//!
//! - Host values ([`Node`]) accepted by [`Document::add`]
//! - Typed values ([`Value`]) over kind and dimension
//! - Named variables and the document that holds them

pub mod document;
pub mod node;
pub mod value;
pub mod variable;

pub use document::{Document, NameListing};
pub use node::Node;
pub use value::{Dimension, Leaf, PrimitiveKind, Value, parse_type_tag, type_symbol};
pub use variable::Variable;
