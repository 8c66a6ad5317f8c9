//! JSON parsing, value access and serialization.
//!
//! # Architecture
//!
//! The JSON subsystem is organized into focused modules:
//!
//! - [`lexer`] - Tokenizer with escape handling and byte offsets
//! - [`parser`] - Recursive descent parser and the parse entry points
//! - [`types`] - The [`Value`] tree and its type-checked accessors
//! - [`dump`] - Serialization back to JSON text
//! - [`options`] - Resource limits and duplicate key policy
//!
//! # Example
//!
//! ```
//! use jsondoc::json::{parse_str, Value};
//!
//! let value = parse_str(r#"{"b": 2, "a": [true, null]}"#).unwrap();
//! assert!(value.contains("a").unwrap());
//! assert_eq!(value.get_map().unwrap()["b"].get_double().unwrap(), 2.0);
//!
//! // Key order is preserved on output
//! assert_eq!(value.dump(), r#"{"b":2,"a":[true,null]}"#);
//!
//! // Accessors are checked against the value's kind
//! assert!(Value::Number(42.0).contains("anything").is_err());
//! ```

pub mod dump;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod types;

// Re-export commonly used items
pub use crate::error::{Error, ErrorKind, JsonResult, Malformed};
pub use options::{DuplicateKeys, ParseOptions};
pub use parser::{parse, parse_str, parse_str_with_options, parse_with_options};
pub use types::{Kind, Map, Value};
