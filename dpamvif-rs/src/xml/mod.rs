//! XML parsing and output.
//!
//! Parsing builds a comment-preserving node tree with verbatim text;
//! output reproduces that tree byte-for-byte, with an optional explicit
//! re-indent pass for pretty results.

mod parser;
mod printer;

pub use parser::{parse_file, parse_str};
pub use printer::{indent, print_to_string, serialize_fragment, write_document};
