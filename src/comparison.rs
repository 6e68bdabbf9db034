use crate::context::{CmpMode, Coercion, CompareOptions};
use crate::errors::{EvalError, Result, Side};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Binary comparison operators, named as in the rule language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

impl FromStr for Operator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "equals" => Self::Equals,
            "notEquals" => Self::NotEquals,
            "greaterThan" => Self::GreaterThan,
            "greaterEqual" => Self::GreaterEqual,
            "lessThan" => Self::LessThan,
            "lessEqual" => Self::LessEqual,
            "contains" => Self::Contains,
            "notContains" => Self::NotContains,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            other => return Err(EvalError::UnsupportedOperator(other.to_string())),
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::GreaterThan => "greaterThan",
            Self::GreaterEqual => "greaterEqual",
            Self::LessThan => "lessThan",
            Self::LessEqual => "lessEqual",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
        };
        write!(f, "{}", s)
    }
}

/// Single-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Exists,
    NotExist,
}

impl FromStr for UnaryOperator {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exists" => Ok(Self::Exists),
            "notExist" => Ok(Self::NotExist),
            other => Err(EvalError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::NotExist => write!(f, "notExist"),
        }
    }
}

/// Both operands brought to a common kind.
#[derive(Debug, PartialEq)]
enum Pair {
    Num(f64, f64),
    Str(String, String),
    Bool(bool, bool),
}

impl Pair {
    fn ordering(&self) -> Option<Ordering> {
        match self {
            Pair::Num(a, b) => {
                if (a - b).abs() < f64::EPSILON {
                    Some(Ordering::Equal)
                } else {
                    a.partial_cmp(b)
                }
            }
            Pair::Str(a, b) => Some(a.cmp(b)),
            Pair::Bool(a, b) => Some(a.cmp(b)),
        }
    }
}

fn fold(s: &str, mode: CmpMode) -> String {
    match mode {
        CmpMode::Default => s.to_string(),
        CmpMode::CaseInsensitive => s.to_lowercase(),
    }
}

/// Finite decimal numbers only; `nan` and `inf` spellings are not numeric.
fn parse_num(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn ensure_resolved(lhs: &Value, rhs: &Value) -> Result<()> {
    if lhs.is_absent() {
        return Err(EvalError::Unresolved { side: Side::Left });
    }
    if rhs.is_absent() {
        return Err(EvalError::Unresolved { side: Side::Right });
    }
    Ok(())
}

fn mismatch(lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeMismatch {
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}

/// Bring two scalars to a common kind for equality/ordering.
fn unify(lhs: &Value, rhs: &Value, opts: CompareOptions) -> Result<Pair> {
    ensure_resolved(lhs, rhs)?;
    let pair = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Some(Pair::Num(*a, *b)),
        (Value::String(a), Value::String(b)) => Some(Pair::Str(fold(a, opts.cmp), fold(b, opts.cmp))),
        (Value::Boolean(a), Value::Boolean(b)) => Some(Pair::Bool(*a, *b)),
        _ if opts.coercion == Coercion::Strict => None,
        (Value::Number(a), Value::String(s)) => parse_num(s).map(|b| Pair::Num(*a, b)),
        (Value::String(s), Value::Number(b)) => parse_num(s).map(|a| Pair::Num(a, *b)),
        (Value::Boolean(a), Value::String(s)) => parse_bool(s).map(|b| Pair::Bool(*a, b)),
        (Value::String(s), Value::Boolean(b)) => parse_bool(s).map(|a| Pair::Bool(a, *b)),
        _ => None,
    };
    pair.ok_or_else(|| mismatch(lhs, rhs))
}

/// String forms for the substring operators. Lenient mode stringifies numbers
/// and booleans.
fn text_pair(lhs: &Value, rhs: &Value, opts: CompareOptions) -> Result<(String, String)> {
    ensure_resolved(lhs, rhs)?;
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok((fold(a, opts.cmp), fold(b, opts.cmp))),
        _ if opts.coercion == Coercion::Strict => Err(mismatch(lhs, rhs)),
        _ => Ok((fold(&lhs.to_string(), opts.cmp), fold(&rhs.to_string(), opts.cmp))),
    }
}

fn cmp_values<F>(lhs: &Value, rhs: &Value, opts: CompareOptions, pred_on_ord: F) -> Result<bool>
where
    F: Fn(Ordering) -> bool,
{
    let pair = unify(lhs, rhs, opts)?;
    Ok(pair.ordering().map(pred_on_ord).unwrap_or(false))
}

/// Apply `op` to two resolved values. `Ok(false)` means both sides were
/// comparable and the relation does not hold.
pub fn compare(lhs: &Value, op: Operator, rhs: &Value, opts: CompareOptions) -> Result<bool> {
    match op {
        Operator::Equals => cmp_values(lhs, rhs, opts, |o| o == Ordering::Equal),
        Operator::NotEquals => cmp_values(lhs, rhs, opts, |o| o != Ordering::Equal),
        Operator::GreaterThan => cmp_values(lhs, rhs, opts, |o| o == Ordering::Greater),
        Operator::GreaterEqual => cmp_values(lhs, rhs, opts, |o| o != Ordering::Less),
        Operator::LessThan => cmp_values(lhs, rhs, opts, |o| o == Ordering::Less),
        Operator::LessEqual => cmp_values(lhs, rhs, opts, |o| o != Ordering::Greater),
        Operator::Contains => text_pair(lhs, rhs, opts).map(|(a, b)| a.contains(&b)),
        Operator::NotContains => text_pair(lhs, rhs, opts).map(|(a, b)| !a.contains(&b)),
        Operator::StartsWith => text_pair(lhs, rhs, opts).map(|(a, b)| a.starts_with(&b)),
        Operator::EndsWith => text_pair(lhs, rhs, opts).map(|(a, b)| a.ends_with(&b)),
    }
}

pub fn check_unary(value: &Value, op: UnaryOperator) -> bool {
    match op {
        UnaryOperator::Exists => !value.is_absent(),
        UnaryOperator::NotExist => value.is_absent(),
    }
}
