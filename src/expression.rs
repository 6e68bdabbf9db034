// src/expression.rs
use crate::comparison::{check_unary, compare, Operator, UnaryOperator};
use crate::context::Context;
use crate::errors::{EvalError, Result, Side};
use crate::operand::Operand;
use crate::result::EvalResult;
use crate::value::Value;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl FromStr for LogicalOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "not" => Ok(Self::Not),
            _ => Err(EvalError::UnsupportedOperator(s.to_string())),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

/// Immutable expression tree. Operator identifiers stay as written so an
/// unknown one surfaces as a failed evaluation rather than a build error.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison {
        lhs: Operand,
        operator: String,
        rhs: Operand,
    },
    Logical {
        operator: LogicalOperator,
        children: Vec<Expression>,
    },
    Unary {
        operand: Operand,
        operator: String,
    },
}

impl Expression {
    pub fn comparison(lhs: Operand, operator: impl Into<String>, rhs: Operand) -> Self {
        Expression::Comparison {
            lhs,
            operator: operator.into(),
            rhs,
        }
    }

    pub fn logical(operator: LogicalOperator, children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Logical {
            operator,
            children: children.into_iter().collect(),
        }
    }

    pub fn and(children: impl IntoIterator<Item = Expression>) -> Self {
        Self::logical(LogicalOperator::And, children)
    }

    pub fn or(children: impl IntoIterator<Item = Expression>) -> Self {
        Self::logical(LogicalOperator::Or, children)
    }

    pub fn not(child: Expression) -> Self {
        Self::logical(LogicalOperator::Not, [child])
    }

    pub fn unary(operand: Operand, operator: impl Into<String>) -> Self {
        Expression::Unary {
            operand,
            operator: operator.into(),
        }
    }

    /// Evaluate against `ctx`. Never panics; failures carry a reason.
    pub fn evaluate(&self, ctx: &Context<'_>) -> EvalResult {
        let outcome = self.check(ctx);
        if let Err(e) = &outcome {
            tracing::debug!(expression = %self, reason = %e, "expression failed");
        }
        outcome.into()
    }

    fn check(&self, ctx: &Context<'_>) -> Result<()> {
        match self {
            Expression::Comparison { lhs, operator, rhs } => eval_comparison(lhs, operator, rhs, ctx),
            Expression::Logical { operator, children } => eval_logical(*operator, children, ctx),
            Expression::Unary { operand, operator } => eval_unary(operand, operator, ctx),
        }
    }
}

fn render(v: &Value) -> String {
    match v {
        Value::String(s) => format!("{s:?}"),
        Value::Absent => "null".into(),
        other => other.to_string(),
    }
}

fn eval_comparison(lhs: &Operand, operator: &str, rhs: &Operand, ctx: &Context<'_>) -> Result<()> {
    let l = lhs.resolve(ctx);
    let r = rhs.resolve(ctx);
    let op: Operator = operator.parse()?;
    if compare(&l, op, &r, ctx.options())? {
        Ok(())
    } else {
        Err(EvalError::NotSatisfied(format!(
            "comparison {} {} {}",
            render(&l),
            op,
            render(&r)
        )))
    }
}

fn eval_unary(operand: &Operand, operator: &str, ctx: &Context<'_>) -> Result<()> {
    let v = operand.resolve(ctx);
    let op: UnaryOperator = operator.parse()?;
    if check_unary(&v, op) {
        return Ok(());
    }
    match op {
        UnaryOperator::Exists => Err(EvalError::Unresolved { side: Side::Left }),
        UnaryOperator::NotExist => Err(EvalError::NotSatisfied(format!("{} {}", render(&v), op))),
    }
}

fn eval_logical(operator: LogicalOperator, children: &[Expression], ctx: &Context<'_>) -> Result<()> {
    match operator {
        LogicalOperator::And => {
            // stop at the first failing child
            for (i, child) in children.iter().enumerate() {
                if let Err(e) = child.check(ctx) {
                    tracing::debug!(index = i, of = children.len(), "AND short-circuit");
                    return Err(e);
                }
            }
            Ok(())
        }
        LogicalOperator::Or => {
            let mut reasons = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                match child.check(ctx) {
                    Ok(()) => {
                        tracing::debug!(index = i, of = children.len(), "OR short-circuit");
                        return Ok(());
                    }
                    Err(e) => reasons.push(e.to_string()),
                }
            }
            Err(EvalError::NoAlternative(reasons))
        }
        LogicalOperator::Not => {
            let [child] = children else {
                return Err(EvalError::Arity {
                    op: "NOT",
                    expected: 1,
                    actual: children.len(),
                });
            };
            match child.check(ctx) {
                Ok(()) => Err(EvalError::Negated(child.to_string())),
                Err(_) => Ok(()),
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison { lhs, operator, rhs } => write!(f, "{lhs} {operator} {rhs}"),
            Expression::Unary { operand, operator } => write!(f, "{operand} {operator}"),
            Expression::Logical {
                operator: LogicalOperator::Not,
                children,
            } => write!(f, "NOT ({})", children.iter().join(", ")),
            Expression::Logical { operator, children } => {
                write!(f, "({})", children.iter().join(&format!(" {operator} ")))
            }
        }
    }
}
