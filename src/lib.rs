//! jsondoc - a strict JSON document library.
//!
//! Reads JSON text, validates it against the JSON grammar, builds an owned
//! [`Value`] tree, offers type-checked read access to it and serializes it
//! back to text.
//!
//! # Architecture
//!
//! - [`json`] - lexer, parser, value model, accessors and serializer
//! - [`error`] - the Malformed-Document / Type-Mismatch error model
//!
//! # Guarantees
//!
//! Parsing is all-or-nothing: a call returns either a complete tree or an
//! error, never a partial tree. A tree is immutable once built and can be
//! read from several threads at once. Re-parsing the output of
//! [`Value::dump`] yields an equal tree.

// Library code must propagate errors instead of panicking.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod error;
pub mod json;

// Re-export commonly used types
pub use error::{Error, ErrorKind, JsonResult, Malformed};
pub use json::{
    parse, parse_str, parse_str_with_options, parse_with_options, DuplicateKeys, Kind, Map,
    ParseOptions, Value,
};
