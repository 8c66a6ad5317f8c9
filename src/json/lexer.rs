//! JSON lexer/tokenizer.
//!
//! Converts input text into a stream of tokens for the parser, skipping
//! insignificant whitespace and resolving string escapes. Every token records
//! the byte offset it started at so the parser can report precise positions.

use std::borrow::Cow;

use super::options::ParseOptions;
use crate::error::{Error, JsonResult, Malformed};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Colon `:`
    Colon,
    /// Comma `,`
    Comma,
    /// Null literal
    Null,
    /// True literal
    True,
    /// False literal
    False,
    /// String value (unescaped). Borrowed when the literal has no escapes.
    String(Cow<'a, str>),
    /// Number value as its validated source text
    Number(&'a str),
    /// End of input
    Eof,
}

impl Token<'_> {
    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::LeftBrace => "`{`".to_string(),
            Token::RightBrace => "`}`".to_string(),
            Token::LeftBracket => "`[`".to_string(),
            Token::RightBracket => "`]`".to_string(),
            Token::Colon => "`:`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Null => "`null`".to_string(),
            Token::True => "`true`".to_string(),
            Token::False => "`false`".to_string(),
            Token::String(s) => format!("string {s:?}"),
            Token::Number(n) => format!("number `{n}`"),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// JSON lexer that tokenizes input.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str, options: &ParseOptions) -> JsonResult<Self> {
        let size = input.len() as u64;
        if size > options.max_input_size {
            return Err(Error::malformed(
                Malformed::InputTooLarge {
                    size,
                    limit: options.max_input_size,
                },
                input,
                0,
            ));
        }

        Ok(Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            token_start: 0,
        })
    }

    /// Byte offset at which the most recently returned token started.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Build a Malformed-Document error at `offset`.
    pub fn error(&self, reason: Malformed, offset: usize) -> Error {
        Error::malformed(reason, self.input, offset)
    }

    /// Peek at the current byte without consuming it.
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume and return the current byte.
    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consume a single-byte punctuation token.
    fn punct(&mut self, token: Token<'a>) -> JsonResult<Token<'a>> {
        self.pos += 1;
        Ok(token)
    }

    /// Read the next token from the input.
    pub fn next_token(&mut self) -> JsonResult<Token<'a>> {
        self.skip_whitespace();
        self.token_start = self.pos;

        match self.peek() {
            None => Ok(Token::Eof),
            Some(b'{') => self.punct(Token::LeftBrace),
            Some(b'}') => self.punct(Token::RightBrace),
            Some(b'[') => self.punct(Token::LeftBracket),
            Some(b']') => self.punct(Token::RightBracket),
            Some(b':') => self.punct(Token::Colon),
            Some(b',') => self.punct(Token::Comma),
            Some(b'"') => self.read_string(),
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(b) if b.is_ascii_alphabetic() => self.read_keyword(),
            Some(_) => {
                let ch = self.input[self.pos..].chars().next().unwrap_or('\u{FFFD}');
                Err(self.error(Malformed::UnexpectedCharacter(ch), self.pos))
            }
        }
    }

    /// Read a string token, handling escape sequences.
    ///
    /// Literals without escapes are returned as a borrowed slice of the input.
    fn read_string(&mut self) -> JsonResult<Token<'a>> {
        let input = self.input;

        // Consume opening quote
        self.pos += 1;

        let mut decoded: Option<String> = None;
        let mut run_start = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error(Malformed::UnterminatedString, self.token_start)),
                Some(b'"') => {
                    let tail = &input[run_start..self.pos];
                    self.pos += 1;
                    let value = match decoded {
                        Some(mut s) => {
                            s.push_str(tail);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(tail),
                    };
                    return Ok(Token::String(value));
                }
                Some(b'\\') => {
                    let mut buf = decoded.take().unwrap_or_default();
                    buf.push_str(&input[run_start..self.pos]);
                    self.pos += 1;
                    buf.push(self.read_escape_sequence()?);
                    decoded = Some(buf);
                    run_start = self.pos;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.error(Malformed::ControlCharacter(b), self.pos));
                }
                // Multi-byte UTF-8 sequences never contain `"` or `\`, so they
                // are copied as part of the current run.
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Read an escape sequence after a backslash.
    fn read_escape_sequence(&mut self) -> JsonResult<char> {
        let at = self.pos;
        match self.advance() {
            None => Err(self.error(Malformed::UnterminatedString, self.token_start)),
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\x08'),
            Some(b'f') => Ok('\x0C'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => self.read_unicode_escape(),
            Some(_) => {
                let ch = self.input[at..].chars().next().unwrap_or('\u{FFFD}');
                Err(self.error(Malformed::InvalidEscape(ch), at - 1))
            }
        }
    }

    /// Read a \uXXXX unicode escape sequence, pairing surrogates.
    fn read_unicode_escape(&mut self) -> JsonResult<char> {
        let escape_start = self.pos - 2;
        let unit = self.read_hex4()?;

        if (0xDC00..=0xDFFF).contains(&unit) {
            return Err(self.error(Malformed::UnpairedSurrogate(unit), escape_start));
        }

        if (0xD800..=0xDBFF).contains(&unit) {
            // Must be followed by a \uXXXX low surrogate
            if self.bytes.get(self.pos..self.pos + 2) != Some(b"\\u".as_slice()) {
                return Err(self.error(Malformed::UnpairedSurrogate(unit), escape_start));
            }
            self.pos += 2;
            let low = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.error(Malformed::UnpairedSurrogate(unit), escape_start));
            }
            let combined =
                0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            return char::from_u32(combined)
                .ok_or_else(|| self.error(Malformed::InvalidUnicodeEscape, escape_start));
        }

        char::from_u32(u32::from(unit))
            .ok_or_else(|| self.error(Malformed::InvalidUnicodeEscape, escape_start))
    }

    /// Read 4 hex digits and return the value.
    fn read_hex4(&mut self) -> JsonResult<u16> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(b @ b'0'..=b'9') => b - b'0',
                Some(b @ b'a'..=b'f') => b - b'a' + 10,
                Some(b @ b'A'..=b'F') => b - b'A' + 10,
                Some(_) => return Err(self.error(Malformed::InvalidUnicodeEscape, self.pos)),
                None => return Err(self.error(Malformed::UnterminatedString, self.token_start)),
            };
            self.pos += 1;
            value = (value << 4) | u16::from(digit);
        }
        Ok(value)
    }

    /// Consume a run of ASCII digits, returning how many were read.
    fn digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Read a number token.
    ///
    /// The whole number must follow the JSON grammar; a number that runs
    /// into another `.`, digit, sign or letter is rejected as a unit.
    fn read_number(&mut self) -> JsonResult<Token<'a>> {
        let start = self.pos;

        // Optional minus sign
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        // Integer part
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.digits();
            }
            _ => return Err(self.invalid_number(start)),
        }

        // Fractional part
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }

        // Exponent
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }

        // `01`, `3.14.15`, `1e5e5`, `12abc`
        if let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-') {
                return Err(self.invalid_number(start));
            }
        }

        let input = self.input;
        Ok(Token::Number(&input[start..self.pos]))
    }

    /// Build an invalid-number error covering the malformed text from `start`.
    fn invalid_number(&mut self, start: usize) -> Error {
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.input[start..self.pos].to_string();
        self.error(Malformed::InvalidNumber(text), start)
    }

    /// Read a bare word and match it against the keywords.
    fn read_keyword(&mut self) -> JsonResult<Token<'a>> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let input = self.input;
        match &input[start..self.pos] {
            "true" => Ok(Token::True),
            "false" => Ok(Token::False),
            "null" => Ok(Token::Null),
            word => Err(self.error(Malformed::InvalidLiteral(word.to_string()), start)),
        }
    }
}
