//! Tolerant parser for JSON-like model replies.
//!
//! Models asked for JSON often answer with Python dict literals or wrap the
//! object in a markdown fence. This parser accepts:
//!
//! - standard JSON
//! - single-quoted strings (apostrophes inside double-quoted strings are
//!   left alone)
//! - bare identifier keys
//! - trailing commas in objects and arrays
//! - `True` / `False` / `None`
//!
//! It produces a [`serde_json::Value`] so callers can use the usual
//! accessors. Anything else after the top-level value is an error.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest nesting of objects and arrays accepted, matching `serde_json`
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("unknown literal {0:?}")]
    UnknownLiteral(String),

    #[error("trailing characters at offset {0}")]
    TrailingCharacters(usize),

    #[error("nesting deeper than 128 levels at offset {0}")]
    DepthLimit(usize),
}

/// Parse `text` as a single relaxed-JSON value.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(ParseError::TrailingCharacters(parser.pos));
    }
    Ok(value)
}

/// Parse a model reply: unwrap a fenced code block if there is one, then
/// fall back to the outermost `{...}` span when the text carries prose
/// around the object. If the fenced body is unusable, the text outside the
/// fence is searched for an object as well.
pub fn parse_reply(text: &str) -> Result<Value, ParseError> {
    let Some(fence) = code_fence(text) else {
        return parse_candidate(text.trim());
    };

    match parse_candidate(fence.body.trim()) {
        Ok(value) => Ok(value),
        Err(first) => {
            let outside = format!("{}\n{}", fence.before, fence.after);
            match object_span(&outside) {
                Some(span) => parse(span).map_err(|_| first),
                None => Err(first),
            }
        }
    }
}

fn parse_candidate(candidate: &str) -> Result<Value, ParseError> {
    match parse(candidate) {
        Ok(value) => Ok(value),
        Err(first) => match object_span(candidate) {
            Some(span) if span.len() < candidate.len() => parse(span),
            _ => Err(first),
        },
    }
}

/// First ```` ``` ```` fenced block split into the text around it and its
/// body (without the language tag)
struct Fence<'a> {
    before: &'a str,
    body: &'a str,
    after: &'a str,
}

fn code_fence(text: &str) -> Option<Fence<'_>> {
    let start = text.find("```")?;
    let opened = &text[start + 3..];
    // Skip the info string (e.g. `json`) up to the end of the line
    let body_start = opened.find('\n')? + 1;
    let body = &opened[body_start..];
    let end = body.find("```")?;
    Some(Fence {
        before: &text[..start],
        body: &body[..end],
        after: &body[end + 3..],
    })
}

fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(ParseError::UnexpectedChar {
                ch,
                offset: self.pos - 1,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(open @ ('{' | '[')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(ParseError::DepthLimit(self.pos));
                }
                self.depth += 1;
                let value = if open == '{' {
                    self.parse_object()
                } else {
                    self.parse_array()
                };
                self.depth -= 1;
                value
            }
            Some(quote @ ('"' | '\'')) => self.parse_string(quote).map(Value::String),
            Some(ch) if ch == '-' || ch == '+' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if is_identifier_start(ch) => self.parse_literal(),
            Some(ch) => Err(ParseError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEnd),
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                Some(ch) => {
                    return Err(ParseError::UnexpectedChar {
                        ch,
                        offset: self.pos - 1,
                    })
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote),
            Some(ch) if is_identifier_start(ch) => Ok(self.take_identifier()),
            Some(ch) => Err(ParseError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEnd),
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => {}
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                Some(ch) => {
                    return Err(ParseError::UnexpectedChar {
                        ch,
                        offset: self.pos - 1,
                    })
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, ParseError> {
        self.expect(quote)?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(ParseError::UnexpectedEnd),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => {
                    let offset = self.pos - 1;
                    let escaped = match self.bump().ok_or(ParseError::UnexpectedEnd)? {
                        '"' => '"',
                        '\'' => '\'',
                        '\\' => '\\',
                        '/' => '/',
                        'b' => '\u{08}',
                        'f' => '\u{0c}',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'u' => self.parse_unicode_escape(offset)?,
                        _ => return Err(ParseError::InvalidEscape(offset)),
                    };
                    out.push(escaped);
                }
                Some(ch) => out.push(ch),
            }
        }
    }

    fn parse_unicode_escape(&mut self, offset: usize) -> Result<char, ParseError> {
        let high = self.read_hex4(offset)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or(ParseError::InvalidEscape(offset));
        }

        // Surrogate pair: expect a following \uDC00-\uDFFF
        if self.bump() != Some('\\') || self.bump() != Some('u') {
            return Err(ParseError::InvalidEscape(offset));
        }
        let low = self.read_hex4(offset)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ParseError::InvalidEscape(offset));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or(ParseError::InvalidEscape(offset))
    }

    fn read_hex4(&mut self, offset: usize) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or(ParseError::InvalidEscape(offset))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let literal = raw.strip_prefix('+').unwrap_or(&raw);

        if !literal.contains(['.', 'e', 'E']) {
            if let Ok(int) = literal.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }
        }

        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(ParseError::InvalidNumber(raw))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let ident = self.take_identifier();
        match ident.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "null" | "None" => Ok(Value::Null),
            _ => Err(ParseError::UnknownLiteral(ident)),
        }
    }

    fn take_identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_alphanumeric() || ch == '_')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}
