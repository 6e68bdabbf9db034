// src/parser.rs

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidSyntax(String),
}

impl From<String> for ParseError {
    fn from(msg: String) -> Self {
        ParseError::InvalidSyntax(msg)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidSyntax(msg) => write!(f, "{msg}"),
        }
    }
}

/// Byte-offset cursor over a borrowed string.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_ascii_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax("identifier expected".into()));
        }
        Ok(self.s[start..self.i].to_string())
    }

    pub fn capture_until(&mut self, end: char) -> Result<&'a str, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == end {
                break;
            }
            self.i += c.len_utf8();
        }
        if self.peek_char() != Some(end) {
            return Err(ParseError::InvalidSyntax(format!("expected '{end}'")));
        }
        Ok(&self.s[start..self.i])
    }

    /// Like `capture_until`, for a multi-character terminator. The terminator
    /// itself is left unconsumed.
    pub fn capture_until_str(&mut self, end: &str) -> Result<&'a str, ParseError> {
        let start = self.i;
        match self.s[start..].find(end) {
            Some(off) => {
                self.i = start + off;
                Ok(&self.s[start..self.i])
            }
            None => Err(ParseError::InvalidSyntax(format!("expected '{end}'"))),
        }
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn expect_str(&mut self, lit: &str) -> Result<(), ParseError> {
        if self.consume_str(lit) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{lit}'")))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn consume_str(&mut self, lit: &str) -> bool {
        if self.peek_str(lit) {
            self.i += lit.len();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Consumes and returns everything left.
    pub fn rest(&mut self) -> &'a str {
        let out = &self.s[self.i..];
        self.i = self.s.len();
        out
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn capture_until_str_leaves_terminator() {
        let mut p = Parser::new("abc}}def");
        assert_eq!(p.capture_until_str("}}").unwrap(), "abc");
        assert!(p.consume_str("}}"));
        assert_eq!(p.rest(), "def");
        assert!(p.eof());
    }

    #[test]
    fn capture_until_str_missing_terminator() {
        let mut p = Parser::new("abc");
        assert!(p.capture_until_str("}}").is_err());
    }

    #[test]
    fn identifier_stops_at_punctuation() {
        let mut p = Parser::new("add_Extra1(x)");
        assert_eq!(p.parse_identifier().unwrap(), "add_Extra1");
        assert_eq!(p.peek_char(), Some('('));
    }
}
