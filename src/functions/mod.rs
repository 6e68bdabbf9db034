use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for pluggable unary transforms applied to a resolved token value.
pub trait Transform: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, value: Value) -> Value;
}

/// Adapts a closure into a [`Transform`].
pub struct FnTransform<F> {
    name: String,
    f: F,
}

impl<F> FnTransform<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: Value) -> Value {
        (self.f)(value)
    }
}

/// Thread-safe transform registry. Cloning is cheap; registering after a
/// clone copies the map.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<String, Arc<dyn Transform>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(builtins::Lower);
        reg.register(builtins::Upper);
        reg.register(builtins::Int);
        reg.register(builtins::Double);
        reg.register(builtins::Str);
        reg.register(builtins::Bool);
        reg.register(builtins::UrlEncode);
        reg
    }

    pub fn register<T: Transform + 'static>(&mut self, t: T) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(t.name().to_string(), Arc::new(t));
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.register(FnTransform::new(name, f));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.inner.get(name).cloned()
    }

    /// Apply `name` to `value`. Unknown names pass the value through.
    pub fn apply(&self, name: &str, value: Value) -> Value {
        match self.inner.get(name) {
            Some(t) => {
                tracing::trace!(transform = name, "applying transform");
                t.apply(value)
            }
            None => {
                tracing::debug!(transform = name, "unknown transform, passing value through");
                value
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.inner.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("transforms", &names).finish()
    }
}

pub mod builtins {
    use super::*;

    pub struct Lower;
    impl Transform for Lower {
        fn name(&self) -> &str { "lower" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::String(t) => Value::String(t.to_lowercase()),
                other => other,
            }
        }
    }

    pub struct Upper;
    impl Transform for Upper {
        fn name(&self) -> &str { "upper" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::String(t) => Value::String(t.to_uppercase()),
                other => other,
            }
        }
    }

    /// Truncates toward zero.
    pub struct Int;
    impl Transform for Int {
        fn name(&self) -> &str { "int" }
        fn apply(&self, value: Value) -> Value {
            match Double.apply(value) {
                Value::Number(n) => Value::Number(n.trunc()),
                _ => Value::Absent,
            }
        }
    }

    pub struct Double;
    impl Transform for Double {
        fn name(&self) -> &str { "double" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::Number(n) => Value::Number(n),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Value::Number)
                    .unwrap_or(Value::Absent),
                Value::Boolean(b) => Value::Number(if b { 1.0 } else { 0.0 }),
                Value::Absent => Value::Absent,
            }
        }
    }

    pub struct Str;
    impl Transform for Str {
        fn name(&self) -> &str { "string" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::Absent => Value::Absent,
                other => Value::String(other.to_string()),
            }
        }
    }

    pub struct Bool;
    impl Transform for Bool {
        fn name(&self) -> &str { "bool" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::Boolean(b) => Value::Boolean(b),
                Value::Number(n) => Value::Boolean(n != 0.0),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    _ => Value::Absent,
                },
                Value::Absent => Value::Absent,
            }
        }
    }

    /// Percent-encodes the string form of the value; spaces become `%20`.
    pub struct UrlEncode;
    impl Transform for UrlEncode {
        fn name(&self) -> &str { "urlenc" }
        fn apply(&self, value: Value) -> Value {
            match value {
                Value::Absent => Value::Absent,
                other => {
                    let s = other.to_string();
                    let encoded: String = url::form_urlencoded::byte_serialize(s.as_bytes()).collect();
                    Value::String(encoded.replace('+', "%20"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_transform_passes_through() {
        let reg = Registry::new();
        assert_eq!(reg.apply("nope", Value::from("x")), Value::from("x"));
    }

    #[test]
    fn register_fn_overrides_builtin() {
        let mut reg = Registry::with_builtins();
        reg.register_fn("lower", |_| Value::from("fixed"));
        assert_eq!(reg.apply("lower", Value::from("ABC")), Value::from("fixed"));
    }

    #[test]
    fn clone_then_register_does_not_leak() {
        let base = Registry::new();
        let mut extended = base.clone();
        extended.register_fn("id", |v| v);
        assert!(base.get("id").is_none());
        assert_eq!(extended.len(), 1);
    }

    #[test]
    fn builtin_casts() {
        let reg = Registry::with_builtins();
        assert_eq!(reg.apply("int", Value::from("12.9")), Value::Number(12.0));
        assert_eq!(reg.apply("int", Value::from("abc")), Value::Absent);
        assert_eq!(reg.apply("double", Value::from(" 2.5 ")), Value::Number(2.5));
        assert_eq!(reg.apply("string", Value::from(33)), Value::from("33"));
        assert_eq!(reg.apply("bool", Value::from("TRUE")), Value::Boolean(true));
        assert_eq!(reg.apply("bool", Value::from("yes")), Value::Absent);
        assert_eq!(reg.apply("upper", Value::from("abc")), Value::from("ABC"));
    }

    #[test]
    fn casts_reject_nan_and_infinity_strings() {
        let reg = Registry::with_builtins();
        for s in ["NaN", "inf", "Infinity"] {
            assert_eq!(reg.apply("double", Value::from(s)), Value::Absent);
            assert_eq!(reg.apply("int", Value::from(s)), Value::Absent);
        }
    }

    #[test]
    fn urlenc_uses_percent_twenty() {
        let reg = Registry::with_builtins();
        assert_eq!(
            reg.apply("urlenc", Value::from("a b&c")),
            Value::from("a%20b%26c")
        );
    }
}
