use crate::errors::EvalError;
use serde::Serialize;

/// Outcome of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EvalResult {
    pub fn success() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl From<EvalError> for EvalResult {
    fn from(e: EvalError) -> Self {
        EvalResult::failure(e.to_string())
    }
}

impl From<crate::errors::Result<()>> for EvalResult {
    fn from(r: crate::errors::Result<()>) -> Self {
        match r {
            Ok(()) => EvalResult::success(),
            Err(e) => e.into(),
        }
    }
}
