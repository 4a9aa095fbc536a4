//! Strict literal parser
//!
//! Accepts only container and scalar literal syntax:
//!
//! ```text
//! value   := string | number | constant | list | mapping
//! list    := '[' (value (',' value)* ','?)? ']'
//! mapping := '{' (string ':' value (',' string ':' value)* ','?)? '}'
//! constant:= True | False | None | true | false | null
//! ```
//!
//! Names, calls, operators, tuples and sets are rejected. Nothing is ever
//! evaluated, and a malformed input never yields a partial container.

use crate::error::ParseError;
use crate::literal::{Literal, LiteralMap};

/// Maximum container nesting accepted by the parser
pub const MAX_DEPTH: usize = 32;

/// Parse a complete literal
///
/// # Errors
/// Returns [`ParseError`] if the text is not exactly one well-formed literal.
pub fn parse_literal(text: &str) -> Result<Literal, ParseError> {
    let mut parser = LiteralParser::new(text);
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos < text.len() {
        return Err(ParseError::TrailingInput { offset: parser.pos });
    }
    Ok(value)
}

/// Parse a literal that must be a list
///
/// # Errors
/// Returns [`ParseError::WrongShape`] for any other well-formed literal.
pub fn parse_list(text: &str) -> Result<Vec<Literal>, ParseError> {
    match parse_literal(text)? {
        Literal::List(items) => Ok(items),
        other => Err(ParseError::WrongShape {
            expected: "list",
            found: other.kind_name(),
        }),
    }
}

/// Parse a literal that must be a mapping
///
/// # Errors
/// Returns [`ParseError::WrongShape`] for any other well-formed literal.
pub fn parse_map(text: &str) -> Result<LiteralMap, ParseError> {
    match parse_literal(text)? {
        Literal::Map(map) => Ok(map),
        other => Err(ParseError::WrongShape {
            expected: "mapping",
            found: other.kind_name(),
        }),
    }
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect_char(&mut self, wanted: char, expected: &'static str) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedChar {
                found,
                offset: self.pos,
                expected,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn value(&mut self, depth: usize) -> Result<Literal, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd { expected: "a value" }),
            Some('[') => self.list(depth + 1),
            Some('{') => self.mapping(depth + 1),
            Some('\'' | '"') => self.string().map(Literal::Str),
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.constant(),
            Some(found) => Err(ParseError::UnexpectedChar {
                found,
                offset: self.pos,
                expected: "a value",
            }),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                offset: self.pos,
            });
        }
        Ok(())
    }

    fn list(&mut self, depth: usize) -> Result<Literal, ParseError> {
        self.check_depth(depth)?;
        self.expect_char('[', "'['")?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Literal::List(items));
            }
            items.push(self.value(depth)?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(']') => return Ok(Literal::List(items)),
                Some(found) => {
                    return Err(ParseError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                        expected: "',' or ']'",
                    })
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "',' or ']'" }),
            }
        }
    }

    fn mapping(&mut self, depth: usize) -> Result<Literal, ParseError> {
        self.check_depth(depth)?;
        self.expect_char('{', "'{'")?;
        let mut map = LiteralMap::new();
        loop {
            self.skip_ws();
            let key_offset = self.pos;
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Literal::Map(map));
                }
                Some('\'' | '"') => {}
                Some(_) => return Err(ParseError::NonStringKey { offset: key_offset }),
                None => return Err(ParseError::UnexpectedEnd { expected: "a key or '}'" }),
            }
            let key = self.string()?;
            self.expect_char(':', "':'")?;
            let value = self.value(depth)?;
            if map.contains_key(&key) {
                return Err(ParseError::DuplicateKey {
                    key,
                    offset: key_offset,
                });
            }
            map.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Literal::Map(map)),
                Some(found) => {
                    return Err(ParseError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                        expected: "',' or '}'",
                    })
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "',' or '}'" }),
            }
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let Some(quote) = self.bump() else {
            return Err(ParseError::UnexpectedEnd { expected: "a string" });
        };
        let mut out = String::new();
        loop {
            let escape_offset = self.pos;
            match self.bump() {
                None => return Err(ParseError::UnexpectedEnd { expected: "closing quote" }),
                Some(c) if c == quote => return Ok(out),
                Some('\n') => {
                    return Err(ParseError::UnexpectedChar {
                        found: '\n',
                        offset: escape_offset,
                        expected: "closing quote",
                    })
                }
                Some('\\') => out.push(self.escape(escape_offset)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, offset: usize) -> Result<char, ParseError> {
        let invalid = ParseError::InvalidEscape { offset };
        let c = match self.bump().ok_or_else(|| invalid.clone())? {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'x' => self.hex_escape(2, offset)?,
            'u' => self.hex_escape(4, offset)?,
            _ => return Err(invalid),
        };
        Ok(c)
    }

    fn hex_escape(&mut self, digits: usize, offset: usize) -> Result<char, ParseError> {
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or(ParseError::InvalidEscape { offset })?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidEscape { offset })?;
        self.pos = end;
        char::from_u32(code).ok_or(ParseError::InvalidEscape { offset })
    }

    fn number(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.pos += 1;
        }
        let int_digits = self.digits();
        let mut is_decimal = false;
        let mut frac_digits = 0;
        if self.peek() == Some('.') {
            is_decimal = true;
            self.pos += 1;
            frac_digits = self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_decimal = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.invalid_number(start));
            }
        }
        // A number must not run straight into a name, e.g. `12abc`
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(self.invalid_number(start));
        }
        if int_digits == 0 && frac_digits == 0 {
            return Err(self.invalid_number(start));
        }

        let text = &self.src[start..self.pos];
        let unsigned = text.trim_start_matches(&['+', '-'][..]);
        if !is_decimal && unsigned.len() > 1 && unsigned.starts_with('0') {
            return Err(self.invalid_number(start));
        }

        if is_decimal {
            text.parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .map(Literal::Decimal)
                .ok_or_else(|| self.invalid_number(start))
        } else {
            text.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| self.invalid_number(start))
        }
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
            count += 1;
        }
        count
    }

    fn invalid_number(&self, start: usize) -> ParseError {
        ParseError::InvalidNumber {
            text: self.src[start..self.pos].to_string(),
            offset: start,
        }
    }

    fn constant(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            "None" | "null" => Ok(Literal::None),
            word => Err(ParseError::UnsupportedSyntax {
                word: word.to_string(),
                offset: start,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_allow_list() {
        let items = parse_list("['K1', 'K2']").unwrap();
        assert_eq!(items, vec![Literal::from("K1"), Literal::from("K2")]);
    }

    #[test]
    fn parses_mapping_in_order() {
        let map = parse_map("{'target': 100, 'rate': 0.5, 'owner': \"ops\"}").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["target", "rate", "owner"]);
        assert_eq!(map["target"], Literal::Int(100));
        assert_eq!(map["rate"], Literal::Decimal(0.5));
        assert_eq!(map["owner"], Literal::from("ops"));
    }

    #[test]
    fn parses_json_written_mapping() {
        let map = parse_map(r#"{"target": 150, "done": true, "note": null}"#).unwrap();
        assert_eq!(map["target"], Literal::Int(150));
        assert_eq!(map["done"], Literal::Bool(true));
        assert_eq!(map["note"], Literal::None);
    }

    #[test]
    fn accepts_trailing_commas_and_empty_containers() {
        assert_eq!(parse_list("[1, 2,]").unwrap().len(), 2);
        assert!(parse_list("[]").unwrap().is_empty());
        assert!(parse_map("{ }").unwrap().is_empty());
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_literal("-7").unwrap(), Literal::Int(-7));
        assert_eq!(parse_literal("+3").unwrap(), Literal::Int(3));
        assert_eq!(parse_literal("0").unwrap(), Literal::Int(0));
        assert_eq!(parse_literal("1.").unwrap(), Literal::Decimal(1.0));
        assert_eq!(parse_literal(".5").unwrap(), Literal::Decimal(0.5));
        assert_eq!(parse_literal("1e3").unwrap(), Literal::Decimal(1000.0));
    }

    #[test]
    fn parses_escapes() {
        let lit = parse_literal(r"'a\'b\n\x41é'").unwrap();
        assert_eq!(lit, Literal::from("a'b\nAé"));
    }

    #[test]
    fn rejects_code() {
        assert!(matches!(
            parse_literal("__import__('os')"),
            Err(ParseError::UnsupportedSyntax { .. })
        ));
        assert!(matches!(
            parse_literal("['K1', open('x')]"),
            Err(ParseError::UnsupportedSyntax { .. })
        ));
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("(1, 2)").is_err());
    }

    #[test]
    fn rejects_malformed_containers() {
        assert!(matches!(
            parse_list("['K1', 'K2'"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_list("['K1' 'K2']"),
            Err(ParseError::UnexpectedChar { .. })
        ));
        assert!(matches!(
            parse_map("{1: 'a'}"),
            Err(ParseError::NonStringKey { offset: 1 })
        ));
        assert!(matches!(
            parse_map("{'a': 1, 'a': 2}"),
            Err(ParseError::DuplicateKey { .. })
        ));
        assert!(matches!(
            parse_list("['K1'] extra"),
            Err(ParseError::TrailingInput { offset: 7 })
        ));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(parse_literal("007").is_err());
        assert!(parse_literal("12abc").is_err());
        assert!(parse_literal("-").is_err());
        assert!(parse_literal("1e").is_err());
        assert!(parse_literal("99999999999999999999").is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(
            parse_list("{'a': 1}").unwrap_err(),
            ParseError::WrongShape {
                expected: "list",
                found: "mapping"
            }
        );
        assert!(parse_map("'text'").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            parse_literal("   "),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_literal(&deep), Err(ParseError::TooDeep { .. })));

        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&ok).is_ok());
    }
}
