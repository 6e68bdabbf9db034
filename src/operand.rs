use crate::context::Context;
use crate::token::parse_token;
use crate::value::Value;
use std::fmt;

/// A value-producing leaf of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Fixed value; context is ignored.
    Literal(Value),
    /// Raw token text, parsed and resolved on every evaluation.
    MustacheToken(String),
}

impl Operand {
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    pub fn mustache_token(text: impl Into<String>) -> Self {
        Operand::MustacheToken(text.into())
    }

    /// Resolve against `ctx`. Malformed token text yields `Value::Absent`.
    pub fn resolve(&self, ctx: &Context<'_>) -> Value {
        match self {
            Operand::Literal(v) => v.clone(),
            Operand::MustacheToken(text) => match parse_token(text) {
                Ok(token) => token.resolve(ctx),
                Err(e) => {
                    tracing::trace!(token = %text, error = %e, "unparseable token");
                    Value::Absent
                }
            },
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(Value::String(s)) => write!(f, "{s:?}"),
            Operand::Literal(Value::Absent) => write!(f, "null"),
            Operand::Literal(v) => write!(f, "{v}"),
            Operand::MustacheToken(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Registry;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn context_map() -> HashMap<String, Value> {
        HashMap::from([
            ("Beer".to_string(), Value::from("Corona")),
            ("integerToken".to_string(), Value::from(33)),
            ("booleanToken".to_string(), Value::from(false)),
        ])
    }

    #[test]
    fn token_preserves_kind() {
        let map = context_map();
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        assert_eq!(Operand::mustache_token("{{Beer}}").resolve(&ctx), Value::from("Corona"));
        assert_eq!(Operand::mustache_token("{{integerToken}}").resolve(&ctx), Value::Number(33.0));
        assert_eq!(Operand::mustache_token("{{booleanToken}}").resolve(&ctx), Value::Boolean(false));
    }

    #[test]
    fn literal_ignores_context() {
        let map = context_map();
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        assert_eq!(Operand::literal("{{Beer}}").resolve(&ctx), Value::from("{{Beer}}"));
    }

    #[test]
    fn unknown_function_passes_value_through() {
        let map = context_map();
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        assert_eq!(Operand::mustache_token("{{nope(Beer)}}").resolve(&ctx), Value::from("Corona"));
    }

    #[test]
    fn display() {
        assert_eq!(Operand::literal("a").to_string(), "\"a\"");
        assert_eq!(Operand::literal(3).to_string(), "3");
        assert_eq!(Operand::mustache_token("{{x}}").to_string(), "{{x}}");
    }
}
