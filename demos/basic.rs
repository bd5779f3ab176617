//! Parse an expression once and evaluate it against a variable context.
//!
//! Run with: `cargo run --example basic`

use glexpr::engine::parse;
use glexpr::eval::eval_ast;
use glexpr::EvalContext;

fn main() -> Result<(), glexpr::ExprError> {
    let mut vars = EvalContext::new();
    vars.set_parameter("pi", 3.14159);
    vars.set_parameter("x", 10.0);

    let expression = "1.0e2 + x * pi";
    let ast = parse(expression)?;

    println!("{} = {}", expression, eval_ast(&ast, Some(&vars))?);

    // The same tree, different bindings.
    vars.set_parameter("x", -10.0);
    println!("{} = {}", expression, eval_ast(&ast, Some(&vars))?);

    Ok(())
}
