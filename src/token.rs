//! Mustache token syntax: `{{name}}` and `{{func(name)}}`.

use crate::context::Context;
use crate::parser::{ParseError, Parser};
use crate::value::Value;
use std::fmt;

/// Opening and closing markers around a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: "{{".into(),
            close: "}}".into(),
        }
    }
}

/// A parsed token reference. `function` is set for the `{{func(name)}}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub function: Option<String>,
    pub name: String,
}

impl TokenRef {
    /// Look up `name`, then run it through `function` if present.
    pub fn resolve(&self, ctx: &Context<'_>) -> Value {
        let value = ctx.resolve(&self.name);
        tracing::trace!(token = %self, value = ?value, "resolved token");
        match &self.function {
            Some(func) => ctx.transform(func, value),
            None => value,
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(func) => write!(f, "{{{{{func}({})}}}}", self.name),
            None => write!(f, "{{{{{}}}}}", self.name),
        }
    }
}

/// Parse operand token text.
///
/// The text must start with a token span. Further spans may follow and are
/// validated but ignored, so `{{A}}{{B}}` yields `A`. Any literal text before,
/// between or after the spans is an error.
pub fn parse_token(text: &str) -> Result<TokenRef, ParseError> {
    let delims = Delimiters::default();
    let mut p = Parser::new(text);
    let first = next_span(&mut p, &delims)?;
    while !p.eof() {
        next_span(&mut p, &delims)?;
    }
    Ok(first)
}

fn next_span(p: &mut Parser<'_>, delims: &Delimiters) -> Result<TokenRef, ParseError> {
    p.expect_str(&delims.open)?;
    let body = p.capture_until_str(&delims.close)?;
    p.expect_str(&delims.close)?;
    parse_token_body(body)
}

/// Parse the text between the delimiters.
pub fn parse_token_body(body: &str) -> Result<TokenRef, ParseError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ParseError::InvalidSyntax("empty token".into()));
    }
    if body.contains(['{', '}']) {
        return Err(ParseError::InvalidSyntax(format!("unbalanced braces in '{body}'")));
    }
    if !body.ends_with(')') {
        if body.contains(['(', ')']) {
            return Err(ParseError::InvalidSyntax(format!("malformed call '{body}'")));
        }
        return Ok(TokenRef {
            function: None,
            name: body.to_string(),
        });
    }

    let mut p = Parser::new(body);
    let function = p.parse_identifier()?;
    p.skip_ws();
    p.expect('(')?;
    let name = p.capture_until(')')?.trim();
    p.expect(')')?;
    if !p.eof() {
        return Err(ParseError::InvalidSyntax("trailing input after call".into()));
    }
    if name.is_empty() || name.contains('(') {
        return Err(ParseError::InvalidSyntax(format!("bad argument in '{body}'")));
    }
    Ok(TokenRef {
        function: Some(function),
        name: name.to_string(),
    })
}
