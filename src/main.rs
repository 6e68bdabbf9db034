use clap::{Parser, Subcommand};
use mustache_rules::{CmpMode, Coercion, CompareOptions, Evaluator, Expression, Operand, Registry, Template, Value};
use tracing_subscriber::EnvFilter;

/// Evaluate rule conditions and render templates against a JSON context.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON object that tokens resolve against
    #[arg(long, global = true, default_value = "{}")]
    context: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two operands, e.g. `eval '{{user.age}}' greaterThan 18`
    Eval {
        lhs: String,
        operator: String,
        rhs: String,
        /// Case-insensitive string comparison
        #[arg(long)]
        ci: bool,
        /// Disable cross-type coercion
        #[arg(long)]
        strict: bool,
    },
    /// Substitute every token in a template string
    Render { template: String },
}

/// `{{...}}` arguments are tokens; anything else is a JSON scalar if it parses
/// as one, or a plain string.
fn operand(arg: &str) -> Operand {
    let trimmed = arg.trim();
    if trimmed.starts_with("{{") {
        return Operand::mustache_token(trimmed);
    }
    match serde_json::from_str::<serde_json::Value>(arg) {
        Ok(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_) | serde_json::Value::String(_))) => {
            Operand::literal(Value::from(&v))
        }
        _ => Operand::literal(arg),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments.
    let args = Args::parse();

    // Parse input JSON.
    let data: serde_json::Value = match serde_json::from_str(&args.context) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON context: {e}");
            std::process::exit(2);
        }
    };

    match args.command {
        Command::Eval { lhs, operator, rhs, ci, strict } => {
            let options = CompareOptions {
                cmp: if ci { CmpMode::CaseInsensitive } else { CmpMode::Default },
                coercion: if strict { Coercion::Strict } else { Coercion::Lenient },
            };
            let evaluator = Evaluator::new(Registry::with_builtins()).with_options(options);
            let expr = Expression::comparison(operand(&lhs), operator, operand(&rhs));
            let result = evaluator.eval(&expr, &data);

            match serde_json::to_string_pretty(&result) {
                Ok(out) => println!("{out}"),
                Err(e) => {
                    eprintln!("Failed to serialize result: {e}");
                    std::process::exit(2);
                }
            }
            if !result.success {
                std::process::exit(1);
            }
        }
        Command::Render { template } => {
            let evaluator = Evaluator::new(Registry::with_builtins());
            println!("{}", evaluator.render(&Template::parse(&template), &data));
        }
    }
}
