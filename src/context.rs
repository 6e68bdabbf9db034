//! Evaluation context: where token names resolve, which transforms exist,
//! and how comparisons behave.

use crate::functions::Registry;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a token name to a value. Unknown names yield `Value::Absent`.
pub trait TokenResolver {
    fn resolve(&self, name: &str) -> Value;
}

impl TokenResolver for HashMap<String, Value> {
    fn resolve(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or(Value::Absent)
    }
}

/// A JSON document resolves an exact top-level key first, then falls back to
/// walking a dotted path (`a.b.0.c`) through objects and arrays.
impl TokenResolver for serde_json::Value {
    fn resolve(&self, name: &str) -> Value {
        if let Some(v) = self.get(name) {
            return Value::from(v);
        }
        let mut cur = self;
        for part in name.split('.') {
            let next = match cur {
                serde_json::Value::Object(map) => map.get(part),
                serde_json::Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(v) => cur = v,
                None => return Value::Absent,
            }
        }
        Value::from(cur)
    }
}

/// Adapts a closure into a [`TokenResolver`].
pub struct FnResolver<F>(pub F);

impl<F> TokenResolver for FnResolver<F>
where
    F: Fn(&str) -> Value,
{
    fn resolve(&self, name: &str) -> Value {
        (self.0)(name)
    }
}

/// String comparison mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpMode {
    #[default]
    Default,
    CaseInsensitive,
}

/// Whether operands of different kinds are coerced before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    /// numeric string <-> number, "true"/"false" <-> boolean
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    pub cmp: CmpMode,
    pub coercion: Coercion,
}

impl CompareOptions {
    pub fn case_insensitive() -> Self {
        Self {
            cmp: CmpMode::CaseInsensitive,
            ..Self::default()
        }
    }
}

/// Everything one evaluation needs. Borrowed, cheap to build per call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    resolver: &'a dyn TokenResolver,
    transforms: &'a Registry,
    options: CompareOptions,
}

impl<'a> Context<'a> {
    pub fn new(resolver: &'a dyn TokenResolver, transforms: &'a Registry) -> Self {
        Self {
            resolver,
            transforms,
            options: CompareOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolve(&self, name: &str) -> Value {
        self.resolver.resolve(name)
    }

    pub fn transform(&self, name: &str, value: Value) -> Value {
        self.transforms.apply(name, value)
    }

    pub fn options(&self) -> CompareOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json_resolver_exact_key_then_path() {
        let doc = json!({
            "a.b": "flat",
            "a": { "b": "nested", "list": [10, {"x": true}] }
        });
        assert_eq!(doc.resolve("a.b"), Value::from("flat"));
        assert_eq!(doc.resolve("a.list.0"), Value::Number(10.0));
        assert_eq!(doc.resolve("a.list.1.x"), Value::Boolean(true));
        assert_eq!(doc.resolve("a.list.9"), Value::Absent);
        assert_eq!(doc.resolve("a"), Value::Absent);
        assert_eq!(doc.resolve("missing"), Value::Absent);
    }

    #[test]
    fn fn_resolver_and_options() {
        let resolver = FnResolver(|name: &str| Value::from(name.len() as i64));
        let reg = Registry::new();
        let ctx = Context::new(&resolver, &reg).with_options(CompareOptions::case_insensitive());
        assert_eq!(ctx.resolve("abc"), Value::Number(3.0));
        assert_eq!(ctx.options().cmp, CmpMode::CaseInsensitive);
        assert_eq!(ctx.options().coercion, Coercion::Lenient);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: CompareOptions = serde_json::from_str(r#"{"cmp":"case_insensitive"}"#).unwrap();
        assert_eq!(opts, CompareOptions::case_insensitive());
    }
}
