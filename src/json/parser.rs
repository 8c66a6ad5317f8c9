//! JSON parser with strict validation.
//!
//! Each container walks the same states: open delimiter, first member or
//! immediate close, value, then comma or close. A comma always demands another
//! member, so trailing commas are rejected, and any token outside the expected
//! set aborts the whole parse. The parser never backtracks and never hands out
//! a partial tree.
//!
//! Open containers live on an explicit stack rather than the call stack, so
//! deep documents cost heap memory, not native stack frames.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::map::Entry;
use log::{debug, trace};

use super::lexer::{Lexer, Token};
use super::options::{DuplicateKeys, ParseOptions};
use super::types::{Map, Value};
use crate::error::{Error, JsonResult, Malformed};

/// A container whose closing delimiter has not been reached yet.
enum Frame {
    Array(Vec<Value>),
    Object {
        map: Map,
        /// Key waiting for its value
        key: String,
        key_offset: usize,
    },
}

impl Frame {
    fn into_value(self) -> Value {
        match self {
            Frame::Array(items) => Value::Array(items),
            Frame::Object { map, .. } => Value::Object(map),
        }
    }
}

/// JSON parser with strict validation.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str, options: &ParseOptions) -> JsonResult<Self> {
        let mut lexer = Lexer::new(input, options)?;
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            options: *options,
        })
    }

    /// Parse the input and return the root value.
    pub fn parse(&mut self) -> JsonResult<Value> {
        let value = self.parse_value()?;

        // Only whitespace may follow the root value
        if self.current != Token::Eof {
            return Err(self.error(Malformed::TrailingContent));
        }

        Ok(value)
    }

    /// Advance to the next token.
    fn advance(&mut self) -> JsonResult<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Error positioned at the current token.
    fn error(&self, reason: Malformed) -> Error {
        self.lexer.error(reason, self.lexer.token_start())
    }

    /// Error for a token outside the expected set.
    fn unexpected(&self, expected: &'static str) -> Error {
        match self.current {
            Token::Eof => self.error(Malformed::UnexpectedEnd(expected)),
            ref found => self.error(Malformed::UnexpectedToken {
                expected,
                found: found.describe(),
            }),
        }
    }

    /// Parse a single JSON value, including everything nested inside it.
    fn parse_value(&mut self) -> JsonResult<Value> {
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            // Either a complete value, or a container opened on the stack
            let mut value = match std::mem::replace(&mut self.current, Token::Eof) {
                Token::Null => Value::Null,
                Token::True => Value::Bool(true),
                Token::False => Value::Bool(false),
                Token::String(s) => Value::String(s.into_owned()),
                Token::Number(text) => self.parse_number(text)?,
                Token::LeftBracket => {
                    self.enter(stack.len() + 1)?;
                    self.advance()?;
                    if self.current == Token::RightBracket {
                        Value::Array(Vec::new())
                    } else {
                        stack.push(Frame::Array(Vec::new()));
                        continue;
                    }
                }
                Token::LeftBrace => {
                    self.enter(stack.len() + 1)?;
                    self.advance()?;
                    if self.current == Token::RightBrace {
                        Value::Object(Map::new())
                    } else {
                        let (key, key_offset) = self.parse_key()?;
                        stack.push(Frame::Object {
                            map: Map::new(),
                            key,
                            key_offset,
                        });
                        continue;
                    }
                }
                other => {
                    self.current = other;
                    return Err(self.unexpected("a value"));
                }
            };
            // Consume the scalar, or the closing delimiter of an empty container
            self.advance()?;

            // Hand the value to its parent, closing every container that ends here
            loop {
                let Some(mut frame) = stack.pop() else {
                    return Ok(value);
                };
                if !self.add_member(&mut frame, value)? {
                    stack.push(frame);
                    break;
                }
                value = frame.into_value();
            }
        }
    }

    /// Store `value` in `frame`, then consume the following comma or closing
    /// delimiter. Returns `true` once the container is closed.
    fn add_member(&mut self, frame: &mut Frame, value: Value) -> JsonResult<bool> {
        match frame {
            Frame::Array(items) => {
                items.push(value);
                match self.current {
                    Token::Comma => {
                        self.advance()?;
                        // A comma must be followed by another element
                        if self.current == Token::RightBracket {
                            return Err(self.error(Malformed::TrailingComma(']')));
                        }
                        Ok(false)
                    }
                    Token::RightBracket => {
                        self.advance()?;
                        Ok(true)
                    }
                    _ => Err(self.unexpected("`,` or `]`")),
                }
            }
            Frame::Object {
                map,
                key,
                key_offset,
            } => {
                match map.entry(std::mem::take(key)) {
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                    Entry::Occupied(mut slot) => match self.options.duplicate_keys {
                        DuplicateKeys::LastWins => {
                            slot.insert(value);
                        }
                        DuplicateKeys::Reject => {
                            let key = slot.key().clone();
                            let reason = Malformed::DuplicateKey(key);
                            return Err(self.lexer.error(reason, *key_offset));
                        }
                    },
                }

                match self.current {
                    Token::Comma => {
                        self.advance()?;
                        // A comma must be followed by another member
                        if self.current == Token::RightBrace {
                            return Err(self.error(Malformed::TrailingComma('}')));
                        }
                        (*key, *key_offset) = self.parse_key()?;
                        Ok(false)
                    }
                    Token::RightBrace => {
                        self.advance()?;
                        Ok(true)
                    }
                    _ => Err(self.unexpected("`,` or `}`")),
                }
            }
        }
    }

    /// Parse an object key and its colon. Returns the key and its offset.
    fn parse_key(&mut self) -> JsonResult<(String, usize)> {
        let key_offset = self.lexer.token_start();
        let key = match std::mem::replace(&mut self.current, Token::Eof) {
            Token::String(s) => s.into_owned(),
            other => {
                self.current = other;
                return Err(self.unexpected("a string key"));
            }
        };
        self.advance()?;

        // Expect colon
        if self.current != Token::Colon {
            return Err(self.unexpected("`:` after object key"));
        }
        self.advance()?;

        Ok((key, key_offset))
    }

    /// Parse a number token into a Value.
    fn parse_number(&self, text: &str) -> JsonResult<Value> {
        // The lexer already enforced the JSON number grammar
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(Malformed::InvalidNumber(text.to_string())))?;

        if !value.is_finite() {
            return Err(self.error(Malformed::NumberOutOfRange(text.to_string())));
        }

        Ok(Value::Number(value))
    }

    /// Check that opening a container at `depth` stays within the limit.
    fn enter(&self, depth: usize) -> JsonResult<()> {
        if depth > self.options.max_nesting_depth {
            return Err(self.error(Malformed::NestingTooDeep {
                depth,
                limit: self.options.max_nesting_depth,
            }));
        }
        Ok(())
    }
}

/// Parse JSON text with strict default options.
pub fn parse_str(input: &str) -> JsonResult<Value> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parse JSON text with custom options.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> JsonResult<Value> {
    let mut parser = Parser::new(input, options)?;
    parser.parse().inspect_err(|err| trace!("rejected document: {err}"))
}

/// Read the file at `path` and parse it with strict default options.
///
/// The whole file is read and parsed before returning; either a complete
/// tree or an error comes back. Unreadable files are reported as
/// [`Error::Io`], which counts as a Malformed-Document failure.
pub fn parse(path: impl AsRef<Path>) -> JsonResult<Value> {
    parse_with_options(path, &ParseOptions::default())
}

/// Read the file at `path` and parse it with custom options.
pub fn parse_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> JsonResult<Value> {
    let path = path.as_ref();
    debug!("parsing {}", path.display());

    let bytes = read_limited(path, options.max_input_size)?;

    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(e) => {
            let offset = e.valid_up_to();
            let valid = std::str::from_utf8(&bytes[..offset]).unwrap_or_default();
            return Err(Error::malformed(Malformed::InvalidUtf8, valid, offset));
        }
    };

    let value = parse_str_with_options(text, options)?;
    debug!("parsed {} ({} bytes)", path.display(), bytes.len());
    Ok(value)
}

/// Read the whole file, failing as soon as it grows past `limit` bytes.
fn read_limited(path: &Path, limit: u64) -> JsonResult<Vec<u8>> {
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let too_large = |size: u64| Error::malformed(Malformed::InputTooLarge { size, limit }, "", 0);

    let file = File::open(path).map_err(io_error)?;
    let reported = file.metadata().map_err(io_error)?.len();
    if reported > limit {
        return Err(too_large(reported));
    }

    // Pipes and devices report no useful length, so the read itself is capped
    let mut bytes = Vec::with_capacity(usize::try_from(reported).unwrap_or(0));
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(io_error)?;

    let size = bytes.len() as u64;
    if size > limit {
        return Err(too_large(size));
    }
    Ok(bytes)
}

impl std::str::FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> JsonResult<Self> {
        parse_str(s)
    }
}
