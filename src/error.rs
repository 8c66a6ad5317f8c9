//! Error handling for jsondoc.
//!
//! Every failure belongs to one of two kinds:
//!
//! - [`ErrorKind::MalformedDocument`]: the input text (or the file holding it)
//!   could not be turned into a [`Value`](crate::json::Value). Raised only by
//!   the parse entry points.
//! - [`ErrorKind::TypeMismatch`]: an accessor was called on a value of the
//!   wrong kind.
//!
//! Errors carry enough context to point at the offending byte, but no
//! partially built tree is ever attached to them.

use std::path::PathBuf;

use thiserror::Error;

use crate::json::Kind;

/// The two failure kinds exposed by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Lexical or grammatical violation, or an unreadable input file.
    MalformedDocument,
    /// Accessor invoked against a value of an incompatible kind.
    TypeMismatch,
}

impl ErrorKind {
    /// Get the error kind name as a string.
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDocument => "MalformedDocument",
            ErrorKind::TypeMismatch => "TypeMismatch",
        }
    }
}

/// The specific grammar or lexical rule a document broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// A byte that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// Input ended while a value, member or closing delimiter was required.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    /// A well-formed token in a position where the grammar forbids it.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar allowed at this point.
        expected: &'static str,
        /// Description of the token actually found.
        found: String,
    },

    /// A bare word that is not exactly `true`, `false` or `null`.
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),

    /// Text that starts like a number but breaks the number grammar.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    /// A number too large to be represented as a finite double.
    #[error("number `{0}` is out of range")]
    NumberOutOfRange(String),

    /// A string literal without its closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// A backslash followed by a character that is not a JSON escape.
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    /// A `\u` escape without four hexadecimal digits.
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,

    /// A `\u` escape naming half of a surrogate pair without its partner.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),

    /// A raw control character inside a string literal.
    #[error("control character 0x{0:02X} in string")]
    ControlCharacter(u8),

    /// A comma directly followed by `}` or `]`.
    #[error("trailing comma before `{0}`")]
    TrailingComma(char),

    /// Non-whitespace input after the root value.
    #[error("trailing content after the root value")]
    TrailingContent,

    /// The same key appears twice in one object.
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),

    /// Containers nested deeper than the configured limit.
    #[error("nesting depth {depth} exceeds limit {limit}")]
    NestingTooDeep {
        /// Depth reached.
        depth: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Input larger than the configured limit.
    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge {
        /// Input size in bytes.
        size: u64,
        /// Configured maximum.
        limit: u64,
    },

    /// File content that is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors produced by jsondoc.
#[derive(Debug, Error)]
pub enum Error {
    /// The document violates the JSON grammar.
    #[error("malformed document at line {line}, column {column}: {reason}")]
    Malformed {
        /// The rule that was broken.
        reason: Malformed,
        /// Byte offset of the failure.
        offset: usize,
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column (in characters) of the failure.
        column: usize,
    },

    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An accessor was invoked on a value of another kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the accessor works on.
        expected: Kind,
        /// Kind of the value it was invoked on.
        found: Kind,
    },
}

impl Error {
    /// Build a [`Error::Malformed`] for `reason` at byte `offset` of `input`.
    pub(crate) fn malformed(reason: Malformed, input: &str, offset: usize) -> Self {
        let (line, column) = locate(input, offset);
        Error::Malformed {
            reason,
            offset,
            line,
            column,
        }
    }

    /// Which of the two failure kinds this error belongs to.
    ///
    /// File access failures are parse-time failures and report
    /// [`ErrorKind::MalformedDocument`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Malformed { .. } | Error::Io { .. } => ErrorKind::MalformedDocument,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// Returns true if this is a Malformed-Document failure.
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedDocument
    }

    /// Returns true if this is a Type-Mismatch failure.
    pub fn is_type_mismatch(&self) -> bool {
        self.kind() == ErrorKind::TypeMismatch
    }

    /// The grammar rule that was broken, if this is a grammar failure.
    pub fn reason(&self) -> Option<&Malformed> {
        match self {
            Error::Malformed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Byte offset of a grammar failure.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Malformed { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Result type for jsondoc operations.
pub type JsonResult<T> = Result<T, Error>;

/// Translate a byte offset into a 1-based (line, column) pair.
fn locate(input: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(input.len());
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let before = &input[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
