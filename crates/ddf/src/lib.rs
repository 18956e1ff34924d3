//! DDF: a line-oriented text format for named, typed engineering variables.
//!
//! A DDF file holds an optional `#VERSION`, an optional free-text header
//! block, and one declaration per line. Each variable is a double, string
//! or boolean, as a scalar, vector or matrix.
//!
//! # Quick Start
//!
//! ```rust
//! use ddf::{Document, ParseOptions, RenderOptions, Value};
//!
//! let mut doc = Document::new();
//! doc.add(12.05, "Vin", "Input Voltage (V)").unwrap();
//! doc.add(vec![2, 9, 12, 20], "Vout", "").unwrap();
//!
//! let text = doc.render(&RenderOptions::new().optimize(true)).unwrap();
//! assert_eq!(
//!     text,
//!     "#VERSION 2.0\nd Vin 12.05 ?Input Voltage (V)\nm<d> Vout [2.0, 9.0, 12.0, 20.0]\n"
//! );
//!
//! let mut copy = Document::new();
//! copy.load_str(&text, &ParseOptions::new()).unwrap();
//! assert_eq!(copy.get("Vout").unwrap().value(), &Value::FloatVector(vec![2.0, 9.0, 12.0, 20.0]));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Values, variables and the [`Document`] store
//! - [`classify`]: Kind and dimension inference for host values
//! - [`codec`]: Tokenizer, grammar parser and renderer
//! - [`error`]: Error types
//! - [`limits`]: Format constants
//!
//! # Format
//!
//! ```text
//! #VERSION 2.0
//!
//! #HEADER
//! Free text, kept verbatim.
//! #HEADER
//!
//! d pi 3.14159 ?Ratio of circumference to diameter
//! s unit "mm"
//! b enabled True;
//! m<d> grid [1.0, 2.0; 3.0, 4.0] // comments run to end of line
//! ```

pub mod classify;
pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use classify::{Classification, NameRule, classify, is_valid_name, validate_name};
pub use codec::{Compatibility, ParseOptions, RenderOptions, parse_document, render};
pub use error::{ClassifyError, DocumentError, GrammarError, RenderError};
pub use model::{Dimension, Document, NameListing, Node, PrimitiveKind, Value, Variable};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
