//! Text encoding and decoding for DDF.
//!
//! [`parse_document`] reads the line grammar; [`render`] writes it back.

pub mod literal;
pub mod parse;
pub mod render;
pub mod tokenize;

pub use literal::{format_bool, format_float, parse_bool, parse_float};
pub use parse::{Compatibility, Declaration, ParseOptions, ParsedDocument, parse_document};
pub use render::{RenderOptions, render};
pub use tokenize::{Segment, Token, segments, split, split_quoted};
