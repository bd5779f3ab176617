//! GLSL source emission for parsed expressions.
//!
//! A pure textual mapping over the tree: no evaluation, no type inference
//! beyond the scalar type's literal suffix. Operators the target dialect
//! lacks (`%`, `log10`) are rewritten in place with equivalent arithmetic.

use log::debug;

use crate::error::{ExprError, Result};
use crate::types::{AstExpr, AstVisitor, BinaryFn, BinaryOp, CmpOp, LogicOp, UnaryFn};
use crate::Real;

/// Target shading-language dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// GLSL 1.00: no `trunc`, so `%` expands through `floor`/`ceil`.
    Glsl100,
    /// GLSL 1.30: `%` expands through `trunc`.
    Glsl130,
}

/// Visitor that serializes a tree into a GLSL expression string.
pub struct ShaderGenerator {
    dialect: Dialect,
}

impl ShaderGenerator {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Emit the expression alone.
    pub fn generate_expression(&mut self, ast: &AstExpr) -> Result<String> {
        self.visit(ast)
    }

    /// Emit a nullary function named `function` wrapping the expression,
    /// returning the engine's scalar type.
    pub fn generate(&mut self, ast: &AstExpr, function: &str) -> Result<String> {
        let code = self.generate_expression(ast)?;
        debug!(
            "generated {} bytes of {:?} source for {}()",
            code.len(),
            self.dialect,
            function
        );
        Ok(format!(
            "{} {}()\n{{\n\treturn {};\n}}\n",
            scalar_type(),
            function,
            code
        ))
    }
}

/// GLSL spelling of the engine's scalar type.
fn scalar_type() -> &'static str {
    #[cfg(feature = "f32")]
    {
        "float"
    }
    #[cfg(feature = "f64")]
    {
        "double"
    }
}

/// Literal suffix for the engine's scalar type.
fn literal_suffix() -> &'static str {
    #[cfg(feature = "f32")]
    {
        "f"
    }
    #[cfg(feature = "f64")]
    {
        "lf"
    }
}

impl AstVisitor for ShaderGenerator {
    type Output = Result<String>;

    fn visit_number(&mut self, value: Real) -> Result<String> {
        if !value.is_finite() {
            return Err(ExprError::Generate(format!(
                "non-finite literal {} has no GLSL spelling",
                value
            )));
        }
        Ok(format!("{}{}", value, literal_suffix()))
    }

    fn visit_variable(&mut self, name: &str) -> Result<String> {
        Ok(name.to_string())
    }

    fn visit_operation(&mut self, op: BinaryOp, left: &AstExpr, right: &AstExpr) -> Result<String> {
        let v1 = self.visit(left)?;
        let v2 = self.visit(right)?;
        Ok(match op {
            BinaryOp::Plus => format!("({}+{})", v1, v2),
            BinaryOp::Minus => format!("({}-{})", v1, v2),
            BinaryOp::Mul => format!("({}*{})", v1, v2),
            BinaryOp::Div => format!("({}/{})", v1, v2),
            BinaryOp::Pow => format!("pow({},{})", v1, v2),
            BinaryOp::Mod => match self.dialect {
                // No fmod or trunc in GLSL 1.00; round the quotient toward
                // zero by hand before multiplying back.
                Dialect::Glsl100 => format!(
                    "({v1} - {v2} * (({v1}/{v2}>0) ? floor({v1}/{v2}) : ceil({v1}/{v2})))"
                ),
                // No fmod in GLSL 1.30 either, but trunc exists.
                Dialect::Glsl130 => format!("({v1} - {v2} * trunc({v1}/{v2}))"),
            },
        })
    }

    fn visit_function1(&mut self, f: UnaryFn, arg: &AstExpr) -> Result<String> {
        let v1 = self.visit(arg)?;
        Ok(match f {
            // Neither dialect has log10; change the base by hand.
            UnaryFn::Log10 => format!("(log({})/log(10.0))", v1),
            f => format!("{}({})", f.name(), v1),
        })
    }

    fn visit_function2(&mut self, f: BinaryFn, left: &AstExpr, right: &AstExpr) -> Result<String> {
        let v1 = self.visit(left)?;
        let v2 = self.visit(right)?;
        Ok(format!("{}({},{})", f.name(), v1, v2))
    }

    fn visit_comparison(&mut self, op: CmpOp, left: &AstExpr, right: &AstExpr) -> Result<String> {
        let v1 = self.visit(left)?;
        let v2 = self.visit(right)?;
        Ok(format!("{}{}{}", v1, op.symbol(), v2))
    }

    fn visit_logical(&mut self, op: LogicOp, left: &AstExpr, right: &AstExpr) -> Result<String> {
        let v1 = self.visit(left)?;
        let v2 = self.visit(right)?;
        Ok(format!("{}{}{}", v1, op.symbol(), v2))
    }

    fn visit_branch(&mut self, cond: &AstExpr, yes: &AstExpr, no: &AstExpr) -> Result<String> {
        let cond = self.visit(cond)?;
        let yes = self.visit(yes)?;
        let no = self.visit(no)?;
        Ok(format!("(({}) ? {} : {})", cond, yes, no))
    }
}
