//! Emit the same formula as a GLSL function for both supported dialects,
//! ready to be spliced into a fragment shader.
//!
//! Run with: `cargo run --example shader`

use glexpr::engine::parse;
use glexpr::generator::{Dialect, ShaderGenerator};

fn main() -> Result<(), glexpr::ExprError> {
    let expression = "(v < 0.0404482362771082) ? v/12.92 : ((v+0.055)/1.055)^2.4";
    let ast = parse(expression)?;

    for dialect in [Dialect::Glsl100, Dialect::Glsl130] {
        let source = ShaderGenerator::new(dialect).generate(&ast, "srgb_to_linear")?;
        println!("// {:?}\n{}", dialect, source);
    }

    Ok(())
}
