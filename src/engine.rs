use crate::context::Context;
use crate::expression::{Expression, LogicalOperator};
use crate::operand::Operand;
use crate::result::EvalResult;
use crate::value::Value;

/// =========================
/// Public API (Construction)
/// =========================

pub fn literal(value: impl Into<Value>) -> Operand {
    Operand::literal(value)
}

pub fn mustache_token(text: impl Into<String>) -> Operand {
    Operand::mustache_token(text)
}

pub fn comparison(lhs: Operand, operator: impl Into<String>, rhs: Operand) -> Expression {
    Expression::comparison(lhs, operator, rhs)
}

pub fn logical(kind: LogicalOperator, children: impl IntoIterator<Item = Expression>) -> Expression {
    Expression::logical(kind, children)
}

/// =========================
/// Public API (Evaluation)
/// =========================

pub fn evaluate(expression: &Expression, context: &Context<'_>) -> EvalResult {
    expression.evaluate(context)
}

pub fn resolve(operand: &Operand, context: &Context<'_>) -> Value {
    operand.resolve(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn evaluate_against_json_document() {
        let doc = json!({
            "device": { "os": "Android", "launches": 12 },
            "session": { "first": false }
        });
        let reg = Registry::with_builtins();
        let ctx = Context::new(&doc, &reg);

        let expr = logical(
            LogicalOperator::And,
            [
                comparison(mustache_token("{{lower(device.os)}}"), "equals", literal("android")),
                comparison(mustache_token("{{device.launches}}"), "greaterEqual", literal(10)),
                comparison(mustache_token("{{session.first}}"), "equals", literal("false")),
            ],
        );
        assert_eq!(evaluate(&expr, &ctx), EvalResult::success());
        assert_eq!(resolve(&mustache_token("{{device.os}}"), &ctx), Value::from("Android"));
    }
}
