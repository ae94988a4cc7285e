//! Parses GDB/MI (v3) record lines into [`serde_json::Value`] trees shaped
//! the way [`crate::matcher::check`] expects: `{"type", "message", "payload",
//! "token"}`, mirroring the dict shape the original Python controller
//! received from its MI client library.

use serde_json::{Map, Value, json};

/// A single parsed MI record.
pub type MiMessage = Value;

/// Parse one line of GDB/MI output. Returns `None` for the `(gdb)` prompt
/// terminator and for blank lines, both of which carry no information.
#[must_use]
pub fn parse_line(line: &str) -> Option<MiMessage> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line == "(gdb)" {
        return None;
    }

    let (token, rest) = split_token(line);
    let mut chars = rest.chars();
    let marker = chars.next()?;
    let body = chars.as_str();

    match marker {
        '^' | '*' | '+' | '=' => Some(parse_class_record(marker, body, token)),
        '~' => Some(stream_record("console", body)),
        '@' => Some(stream_record("target", body)),
        '&' => Some(stream_record("log", body)),
        _ => None,
    }
}

fn split_token(line: &str) -> (Option<u64>, &str) {
    let digits_len = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits_len == 0 {
        (None, line)
    } else {
        let (digits, rest) = line.split_at(digits_len);
        (digits.parse().ok(), rest)
    }
}

fn record_type(marker: char) -> &'static str {
    match marker {
        '^' => "result",
        '*' => "exec",
        '+' => "status",
        '=' => "notify",
        _ => "unknown",
    }
}

fn parse_class_record(marker: char, body: &str, token: Option<u64>) -> MiMessage {
    let mut parser = Parser::new(body);
    let class = parser.parse_identifier();
    let mut payload = Map::new();

    while parser.peek() == Some(',') {
        parser.advance();
        if let Some((key, value)) = parser.parse_result() {
            payload.insert(key, value);
        }
    }

    json!({
        "type": record_type(marker),
        "message": class,
        "payload": Value::Object(payload),
        "token": token,
    })
}

fn stream_record(kind: &str, body: &str) -> MiMessage {
    let mut parser = Parser::new(body);
    let text = parser.parse_c_string().unwrap_or_default();
    json!({
        "type": kind,
        "message": Value::Null,
        "payload": text,
        "token": Value::Null,
    })
}

/// A minimal recursive-descent parser over the MI *value* grammar:
/// `value ::= const | tuple | list`, `const ::= c-string`,
/// `tuple ::= "{}" | "{" result ("," result)* "}"`,
/// `list ::= "[]" | "[" value ("," value)* "]" | "[" result ("," result)* "]"`,
/// `result ::= variable "=" value`.
struct Parser<'a> {
    rest: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s.chars().peekable() }
    }

    fn peek(&mut self) -> Option<char> {
        self.rest.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.rest.next()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ')) {
            self.advance();
        }
    }

    fn parse_identifier(&mut self) -> String {
        self.skip_ws();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn parse_result(&mut self) -> Option<(String, Value)> {
        self.skip_ws();
        let key = self.parse_identifier();
        if key.is_empty() {
            return None;
        }
        self.skip_ws();
        if self.peek() != Some('=') {
            return None;
        }
        self.advance();
        let value = self.parse_value()?;
        Some((key, value))
    }

    fn parse_value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            '"' => self.parse_c_string().map(Value::String),
            '{' => Some(self.parse_tuple()),
            '[' => Some(self.parse_list()),
            _ => None,
        }
    }

    fn parse_c_string(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }
        self.advance();
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return Some(s),
                '\\' => {
                    if let Some(escaped) = self.advance() {
                        s.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    }
                }
                other => s.push(other),
            }
        }
        Some(s)
    }

    fn parse_tuple(&mut self) -> Value {
        self.advance(); // consume '{'
        let mut map = Map::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.advance();
            return Value::Object(map);
        }
        loop {
            if let Some((key, value)) = self.parse_result() {
                map.insert(key, value);
            } else {
                break;
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        Value::Object(map)
    }

    fn parse_list(&mut self) -> Value {
        self.advance(); // consume '['
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.advance();
            return Value::Array(items);
        }
        loop {
            self.skip_ws();
            let item = if matches!(self.peek(), Some('"') | Some('{') | Some('[')) {
                self.parse_value()
            } else {
                self.parse_result().map(|(k, v)| {
                    let mut m = Map::new();
                    m.insert(k, v);
                    Value::Object(m)
                })
            };
            match item {
                Some(v) => items.push(v),
                None => break,
            }
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        Value::Array(items)
    }
}
