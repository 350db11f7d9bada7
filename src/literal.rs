//! A small parser for structured literals typed by an operator or found in a
//! training script: booleans, `None`, numbers, quoted strings, lists, tuples
//! and dicts. Nothing is ever evaluated; any other expression is rejected.

use std::{error::Error, fmt};

use serde_json::{Map, Number, Value};

/// A literal that could not be parsed, with the byte offset it failed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pos: usize,
    msg: String,
}

impl LiteralError {
    fn new(pos: usize, msg: impl Into<String>) -> Self {
        Self {
            pos,
            msg: msg.into(),
        }
    }

    /// Byte offset into the source text.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.msg, self.pos)
    }
}

impl Error for LiteralError {}

/// Parses `src` as a single literal. Surrounding whitespace is ignored.
///
/// # Errors
/// Returns a `LiteralError` if `src` is not exactly one literal.
pub fn parse(src: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != src.len() {
        return Err(LiteralError::new(parser.pos, "unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(LiteralError::new(
                self.pos - c.len_utf8(),
                format!("expected '{want}', found '{c}'"),
            )),
            None => Err(LiteralError::new(self.pos, format!("expected '{want}'"))),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::new(self.pos, "expected a value")),
            Some('{') => self.dict(),
            Some('[') => self.sequence('[', ']'),
            Some('(') => self.sequence('(', ')'),
            Some('"' | '\'') => self.string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(LiteralError::new(
                self.pos,
                format!("unexpected character '{c}'"),
            )),
        }
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(LiteralError::new(start, format!("unknown name '{word}'"))),
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        let text = &self.src[start..self.pos];
        let text = text.strip_prefix('+').unwrap_or(text);
        let invalid = || LiteralError::new(start, format!("invalid number '{text}'"));

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            if let Ok(n) = text.parse::<u64>() {
                return Ok(Value::Number(n.into()));
            }
            let digits = text.strip_prefix('-').unwrap_or(text);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            return Err(LiteralError::new(
                start,
                format!("integer '{text}' is out of range"),
            ));
        }
        let f = text.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self.bump().ok_or_else(|| LiteralError::new(start, "expected a string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::new(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let esc_at = self.pos - 1;
                    match self.bump() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some('0') => out.push('\0'),
                        Some('\\') => out.push('\\'),
                        Some('\'') => out.push('\''),
                        Some('"') => out.push('"'),
                        Some('u') => out.push(self.unicode_escape(esc_at)?),
                        Some(c) => {
                            out.push('\\');
                            out.push(c);
                        }
                        None => return Err(LiteralError::new(start, "unterminated string")),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, at: usize) -> Result<char, LiteralError> {
        let digits = self
            .rest()
            .get(..4)
            .ok_or_else(|| LiteralError::new(at, "truncated \\u escape"))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| LiteralError::new(at, "invalid \\u escape"))?;
        self.pos += 4;
        char::from_u32(code).ok_or_else(|| LiteralError::new(at, "invalid \\u escape"))
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Value, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => return Err(LiteralError::new(self.pos, format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(LiteralError::new(self.pos, "expected ',' or '}'")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_python_dict_in_source_order() {
        let v = parse("{'type': 'linear', 'factor': 2.0}").unwrap();
        assert_eq!(v, json!({"type": "linear", "factor": 2.0}));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["type", "factor"]);
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(parse("True").unwrap(), json!(true));
        assert_eq!(parse(" false ").unwrap(), json!(false));
        assert_eq!(parse("None").unwrap(), Value::Null);
        assert_eq!(parse("4096").unwrap(), json!(4096));
        assert_eq!(parse("-3").unwrap(), json!(-3));
        assert_eq!(parse("1e-05").unwrap(), json!(1e-05));
        assert_eq!(parse("500000.0").unwrap(), json!(500000.0));
        assert_eq!(parse("\"bf16\"").unwrap(), json!("bf16"));
    }

    #[test]
    fn parses_nested_containers() {
        let v = parse("{\"a\": [1, 2, (3, 4),], 'b': {'c': None}, 5: 'x'}").unwrap();
        assert_eq!(v, json!({"a": [1, 2, [3, 4]], "b": {"c": null}, "5": "x"}));
    }

    #[test]
    fn handles_escapes() {
        assert_eq!(parse(r#"'it\'s é'"#).unwrap(), json!("it's é"));
    }

    #[test]
    fn rejects_expressions() {
        assert!(parse("abc").is_err());
        assert!(parse("__import__('os')").is_err());
        assert!(parse("1 + 1").is_err());
        assert!(parse("{'a': 1").is_err());
        assert!(parse("'open").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn rejects_integers_that_would_lose_precision() {
        assert_eq!(parse("18446744073709551615").unwrap(), json!(u64::MAX));
        let err = parse("123456789012345678901234567890").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(parse("-9223372036854775809").is_err());
        assert!(parse("-").unwrap_err().to_string().contains("invalid number"));
    }

    #[test]
    fn error_reports_offset() {
        let err = parse("[1, foo]").unwrap_err();
        assert_eq!(err.pos(), 4);
    }
}
