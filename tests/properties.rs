use mustache_rules as mr;
use mr::{Context, Operand, Registry, Value};
use proptest::prelude::*;
use std::collections::HashMap;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        any::<bool>().prop_map(Value::Boolean),
        Just(Value::Absent),
    ]
}

proptest! {
    #[test]
    fn literal_ignores_context(v in scalar(), name in "[a-z]{1,8}", bound in scalar()) {
        let map = HashMap::from([(name, bound)]);
        let reg = Registry::with_builtins();
        let ctx = Context::new(&map, &reg);
        prop_assert_eq!(Operand::literal(v.clone()).resolve(&ctx), v);
    }

    #[test]
    fn pure_token_preserves_kind(name in "[A-Za-z_][A-Za-z0-9_.]{0,10}", v in scalar()) {
        let map = HashMap::from([(name.clone(), v.clone())]);
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        let token = Operand::mustache_token(format!("{{{{{name}}}}}"));
        prop_assert_eq!(token.resolve(&ctx), v);
    }

    #[test]
    fn evaluation_is_idempotent(a in scalar(), b in scalar(), op in prop::sample::select(vec![
        "equals", "notEquals", "greaterThan", "lessEqual", "contains", "endsWith", "bogus",
    ])) {
        let map = HashMap::from([("a".to_string(), a), ("b".to_string(), b)]);
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        let expr = mr::comparison(mr::mustache_token("{{a}}"), op, mr::mustache_token("{{b}}"));
        prop_assert_eq!(expr.evaluate(&ctx), expr.evaluate(&ctx));
    }

    #[test]
    fn leading_text_is_never_a_token(prefix in "[a-z ]{1,6}", name in "[a-z]{1,6}") {
        let map = HashMap::from([(name.clone(), Value::from("x"))]);
        let reg = Registry::new();
        let ctx = Context::new(&map, &reg);
        let token = Operand::mustache_token(format!("{prefix}{{{{{name}}}}}"));
        prop_assert_eq!(token.resolve(&ctx), Value::Absent);
    }
}
