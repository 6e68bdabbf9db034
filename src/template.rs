//! String templates with embedded tokens, e.g. `"hello {{user.name}}"`.

use crate::context::Context;
use crate::parser::Parser;
use crate::token::{parse_token_body, Delimiters, TokenRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Token(TokenRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &Delimiters::default())
    }

    /// Unterminated openers and unparseable token bodies are kept as text.
    /// Empty delimiters mark no tokens at all.
    pub fn parse_with(text: &str, delims: &Delimiters) -> Self {
        if delims.open.is_empty() || delims.close.is_empty() {
            let segments = if text.is_empty() {
                Vec::new()
            } else {
                vec![Segment::Text(text.to_string())]
            };
            return Self { segments };
        }
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut p = Parser::new(text);

        while !p.eof() {
            match p.capture_until_str(&delims.open) {
                Ok(before) => literal.push_str(before),
                Err(_) => {
                    literal.push_str(p.rest());
                    break;
                }
            }
            p.consume_str(&delims.open);
            let body = match p.capture_until_str(&delims.close) {
                Ok(body) => body,
                Err(_) => {
                    literal.push_str(&delims.open);
                    literal.push_str(p.rest());
                    break;
                }
            };
            p.consume_str(&delims.close);
            match parse_token_body(body) {
                Ok(token) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Token(token));
                }
                Err(_) => {
                    literal.push_str(&delims.open);
                    literal.push_str(body);
                    literal.push_str(&delims.close);
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Substitute every token. `Absent` renders as the empty string.
    pub fn render(&self, ctx: &Context<'_>) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Token(token) => out.push_str(&token.resolve(ctx).to_string()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn splits_text_and_tokens() {
        let t = Template::parse("a {{x}} b {{f(y)}}");
        assert_eq!(t.segments().len(), 4);
        assert_eq!(t.segments()[0], Segment::Text("a ".into()));
        assert!(matches!(&t.segments()[3], Segment::Token(tok) if tok.function.as_deref() == Some("f")));
    }

    #[test]
    fn malformed_spans_stay_literal() {
        let t = Template::parse("x {{}} y {{open");
        assert_eq!(t.segments(), &[Segment::Text("x {{}} y {{open".into())]);
    }

    #[test]
    fn render_with_transforms_and_absent() {
        let doc = json!({"user": {"name": "ada", "age": 36}});
        let reg = Registry::with_builtins();
        let ctx = Context::new(&doc, &reg);
        let t = Template::parse("hi {{upper(user.name)}}, {{user.age}} [{{missing}}]");
        assert_eq!(t.render(&ctx), "hi ADA, 36 []");
    }

    #[test]
    fn empty_delimiters_yield_plain_text() {
        let none = Delimiters {
            open: String::new(),
            close: String::new(),
        };
        assert_eq!(Template::parse_with("abc", &none).segments(), &[Segment::Text("abc".into())]);
        let open_only = Delimiters {
            open: "<%".into(),
            close: String::new(),
        };
        assert_eq!(Template::parse_with("a<%b", &open_only).segments(), &[Segment::Text("a<%b".into())]);
        assert!(Template::parse_with("", &none).segments().is_empty());
    }

    #[test]
    fn custom_delimiters() {
        let doc = json!({"n": 1});
        let reg = Registry::new();
        let ctx = Context::new(&doc, &reg);
        let delims = Delimiters {
            open: "<%".into(),
            close: "%>".into(),
        };
        let t = Template::parse_with("{{n}} <%n%>", &delims);
        assert_eq!(t.render(&ctx), "{{n}} 1");
    }
}
