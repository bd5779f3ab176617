//! Tree-walking evaluation of a syntax tree against a variable context.

use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::functions;
use crate::types::{AstExpr, AstVisitor, BinaryFn, BinaryOp, CmpOp, LogicOp, UnaryFn};
use crate::Real;

/// Visitor that reduces a tree to a scalar.
///
/// Comparisons and logical connectives coerce their truth value back into
/// the scalar domain (1 for true, 0 for false) at the node boundary; the
/// rest of the tree only ever sees scalars. `&&` and `||` evaluate both
/// operands unconditionally.
pub struct Evaluator<'a> {
    ctx: Option<&'a EvalContext>,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: Option<&'a EvalContext>) -> Self {
        Self { ctx }
    }

    pub fn evaluate(&mut self, ast: &AstExpr) -> Result<Real> {
        self.visit(ast)
    }
}

/// Evaluate `ast` against an optional variable context.
pub fn eval_ast(ast: &AstExpr, ctx: Option<&EvalContext>) -> Result<Real> {
    Evaluator::new(ctx).evaluate(ast)
}

impl AstVisitor for Evaluator<'_> {
    type Output = Result<Real>;

    fn visit_number(&mut self, value: Real) -> Result<Real> {
        Ok(value)
    }

    fn visit_variable(&mut self, name: &str) -> Result<Real> {
        self.ctx
            .and_then(|ctx| ctx.get(name))
            .ok_or_else(|| ExprError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn visit_operation(&mut self, op: BinaryOp, left: &AstExpr, right: &AstExpr) -> Result<Real> {
        let l = self.visit(left)?;
        let r = self.visit(right)?;
        Ok(match op {
            BinaryOp::Plus => l + r,
            BinaryOp::Minus => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Pow => functions::pow(l, r),
            BinaryOp::Mod => functions::fmod(l, r),
        })
    }

    fn visit_function1(&mut self, f: UnaryFn, arg: &AstExpr) -> Result<Real> {
        let v = self.visit(arg)?;
        Ok(match f {
            UnaryFn::Sin => functions::sin(v),
            UnaryFn::Cos => functions::cos(v),
            UnaryFn::Tan => functions::tan(v),
            UnaryFn::Sqrt => functions::sqrt(v),
            UnaryFn::Log => functions::ln(v),
            UnaryFn::Log2 => functions::log2(v),
            UnaryFn::Log10 => functions::log10(v),
            UnaryFn::Ceil => functions::ceil(v),
            UnaryFn::Floor => functions::floor(v),
        })
    }

    fn visit_function2(&mut self, f: BinaryFn, left: &AstExpr, right: &AstExpr) -> Result<Real> {
        let l = self.visit(left)?;
        let r = self.visit(right)?;
        Ok(match f {
            BinaryFn::Min => functions::min(l, r),
            BinaryFn::Max => functions::max(l, r),
            BinaryFn::Pow => functions::pow(l, r),
        })
    }

    fn visit_comparison(&mut self, op: CmpOp, left: &AstExpr, right: &AstExpr) -> Result<Real> {
        let l = self.visit(left)?;
        let r = self.visit(right)?;
        let holds = match op {
            CmpOp::Eq => l == r,
            CmpOp::Ne => l != r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
        };
        Ok(if holds { 1.0 } else { 0.0 })
    }

    fn visit_logical(&mut self, op: LogicOp, left: &AstExpr, right: &AstExpr) -> Result<Real> {
        // Both sides always evaluate; zero is false, anything else true.
        let l = self.visit(left)?;
        let r = self.visit(right)?;
        let holds = match op {
            LogicOp::And => l != 0.0 && r != 0.0,
            LogicOp::Or => l != 0.0 || r != 0.0,
        };
        Ok(if holds { 1.0 } else { 0.0 })
    }

    fn visit_branch(&mut self, cond: &AstExpr, yes: &AstExpr, no: &AstExpr) -> Result<Real> {
        if self.visit(cond)? != 0.0 {
            self.visit(yes)
        } else {
            self.visit(no)
        }
    }
}
