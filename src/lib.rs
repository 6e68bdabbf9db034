pub mod errors;
pub mod context;
pub mod engine;
pub mod functions;  // plugin model
pub mod comparison;
pub mod expression;
pub mod operand;
pub mod result;
pub mod template;
pub mod token;
pub mod value;
mod parser;

pub use comparison::{Operator, UnaryOperator};
pub use context::{CmpMode, Coercion, CompareOptions, Context, FnResolver, TokenResolver};
pub use errors::{EvalError, Result};
pub use expression::{Expression, LogicalOperator};
pub use functions::{Registry, Transform};
pub use operand::Operand;
pub use parser::ParseError;
pub use result::EvalResult;
pub use template::Template;
pub use value::Value;

/// Re-export the construction and evaluation helpers.
pub use engine::{comparison, evaluate, literal, logical, mustache_token, resolve};

/// Owns a transform registry and comparison options so callers only supply a
/// resolver per evaluation.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    registry: Registry,
    options: CompareOptions,
}

impl Evaluator {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            options: CompareOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn eval(&self, expression: &Expression, resolver: &dyn TokenResolver) -> EvalResult {
        let ctx = Context::new(resolver, &self.registry).with_options(self.options);
        expression.evaluate(&ctx)
    }

    pub fn render(&self, template: &Template, resolver: &dyn TokenResolver) -> String {
        let ctx = Context::new(resolver, &self.registry).with_options(self.options);
        template.render(&ctx)
    }
}

/// Convenience: evaluate with the built-in registry and default options.
pub fn eval(expression: &Expression, resolver: &dyn TokenResolver) -> EvalResult {
    Evaluator::new(Registry::with_builtins()).eval(expression, resolver)
}
