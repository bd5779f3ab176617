//! Parsing entry points: shunting-yard reordering of the token stream and
//! construction of the syntax tree from the resulting RPN sequence.

use log::{debug, trace};

use crate::context::EvalContext;
use crate::error::{ExprError, Result};
use crate::eval::eval_ast;
use crate::lexer::Lexer;
use crate::types::{AstExpr, BinaryOp, FnKind, Sign, TernarySym, Token, TokenKind};
use crate::Real;

/// Parse an expression into its syntax tree.
pub fn parse(text: &str) -> Result<AstExpr> {
    let tokens = Lexer::new(text).tokenize()?;
    debug!("lexed {} tokens from {} chars", tokens.len(), text.len());
    let rpn = shunting_yard(tokens)?;
    if log::log_enabled!(log::Level::Trace) {
        let dump: Vec<String> = rpn.iter().map(|t| t.kind.to_string()).collect();
        trace!("rpn: {}", dump.join(" "));
    }
    rpn_to_ast(rpn)
}

/// Parse and immediately evaluate against an optional variable context.
pub fn interp(text: &str, ctx: Option<&EvalContext>) -> Result<Real> {
    let ast = parse(text)?;
    eval_ast(&ast, ctx)
}

/// Dijkstra's shunting yard: reorder the infix token sequence into reverse
/// Polish notation so that operator precedence survives into the tree.
fn shunting_yard(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        if matches!(token.kind, TokenKind::Number(_) | TokenKind::Variable(_)) {
            output.push(token);
        } else if matches!(token.kind, TokenKind::Function(_)) {
            stack.push(token);
        } else if matches!(token.kind, TokenKind::Comma) {
            // Pop operators into the output until the argument list's open
            // parenthesis surfaces; it stays on the stack.
            loop {
                match stack.pop() {
                    Some(top) if matches!(top.kind, TokenKind::OpenParen) => {
                        stack.push(top);
                        break;
                    }
                    Some(top) => output.push(top),
                    None => {
                        return Err(ExprError::MisplacedSeparator {
                            position: token.position,
                        })
                    }
                }
            }
        } else if token.kind.is_operator_class() {
            while let Some(top) = stack.last() {
                if !top.kind.is_operator_class() {
                    break;
                }
                let pops = if token.kind.left_associative() {
                    token.kind.precedence() <= top.kind.precedence()
                } else {
                    token.kind.precedence() < top.kind.precedence()
                };
                if !pops {
                    break;
                }
                match stack.pop() {
                    Some(top) => output.push(top),
                    None => break,
                }
            }
            stack.push(token);
        } else if matches!(token.kind, TokenKind::OpenParen) {
            stack.push(token);
        } else if matches!(token.kind, TokenKind::CloseParen) {
            // Pop to the matching open parenthesis, which is discarded,
            // then pop a pending function name if one sits on top.
            loop {
                match stack.pop() {
                    Some(top) if matches!(top.kind, TokenKind::OpenParen) => break,
                    Some(top) => output.push(top),
                    None => {
                        return Err(ExprError::UnmatchedParenthesis {
                            position: token.position,
                        })
                    }
                }
            }
            if matches!(stack.last().map(|t| &t.kind), Some(TokenKind::Function(_))) {
                if let Some(top) = stack.pop() {
                    output.push(top);
                }
            }
        }
        // End never reaches the output queue.
    }

    while let Some(top) = stack.pop() {
        if matches!(top.kind, TokenKind::OpenParen | TokenKind::CloseParen) {
            return Err(ExprError::UnmatchedParenthesis {
                position: top.position,
            });
        }
        output.push(top);
    }

    Ok(output)
}

/// Build the tree from the RPN sequence: leaves push, operators pop their
/// arity and push the combined node. The first pop always yields the right
/// source operand and the second the left, so the stored `left`/`right`
/// are genuine source order.
fn rpn_to_ast(tokens: Vec<Token>) -> Result<AstExpr> {
    let mut stack: Vec<AstExpr> = Vec::new();
    let mut last_position = 0;

    for token in tokens {
        let position = token.position;
        last_position = position;
        match token.kind {
            TokenKind::Number(value) => stack.push(AstExpr::Number(value)),
            TokenKind::Variable(name) => stack.push(AstExpr::Variable(name)),
            TokenKind::Unary(sign) => {
                let node = match stack.pop() {
                    Some(node) => node,
                    None => {
                        return Err(ExprError::Syntax {
                            message: "unary operator given without an operand".to_string(),
                            position,
                        })
                    }
                };
                match sign {
                    Sign::Positive => stack.push(node),
                    Sign::Negative => stack.push(negate(node)),
                }
            }
            TokenKind::Operator(op) => {
                let (left, right) = pop_operands(&mut stack, "operator", position)?;
                stack.push(AstExpr::Operation {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            TokenKind::Function(func) => match func.classify() {
                FnKind::Unary(f) => {
                    let arg = match stack.pop() {
                        Some(node) => node,
                        None => {
                            return Err(ExprError::Syntax {
                                message: "function given with insufficient operands".to_string(),
                                position,
                            })
                        }
                    };
                    stack.push(AstExpr::Function1 {
                        f,
                        arg: Box::new(arg),
                    });
                }
                FnKind::Binary(f) => {
                    let (left, right) = pop_operands(&mut stack, "function", position)?;
                    stack.push(AstExpr::Function2 {
                        f,
                        left: Box::new(left),
                        right: Box::new(right),
                    });
                }
            },
            TokenKind::Conditional(op) => {
                let (left, right) = pop_operands(&mut stack, "conditional operator", position)?;
                stack.push(AstExpr::Comparison {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            TokenKind::Logical(op) => {
                let (left, right) = pop_operands(&mut stack, "logical operator", position)?;
                stack.push(AstExpr::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            TokenKind::Ternary(TernarySym::Question) => {
                if stack.len() < 3 {
                    return Err(ExprError::Syntax {
                        message: "ternary operator given with insufficient operands".to_string(),
                        position,
                    });
                }
                // Safe pops behind the length check; the no branch was
                // pushed last, the condition first.
                let no = stack.pop();
                let yes = stack.pop();
                let cond = stack.pop();
                if let (Some(cond), Some(yes), Some(no)) = (cond, yes, no) {
                    stack.push(AstExpr::Branch {
                        cond: Box::new(cond),
                        yes: Box::new(yes),
                        no: Box::new(no),
                    });
                }
            }
            // The colon is consumed by the shunter's precedence handling
            // and builds nothing.
            TokenKind::Ternary(TernarySym::Colon) => {}
            TokenKind::OpenParen | TokenKind::CloseParen | TokenKind::Comma | TokenKind::End => {}
        }
    }

    let root = match stack.pop() {
        Some(root) => root,
        None => {
            return Err(ExprError::Syntax {
                message: "empty expression".to_string(),
                position: last_position,
            })
        }
    };
    if !stack.is_empty() {
        return Err(ExprError::Syntax {
            message: format!(
                "expression leaves {} dangling operand(s)",
                stack.len()
            ),
            position: last_position,
        });
    }
    Ok(root)
}

/// Pop a binary node's operands. The stack holds them in emission order,
/// so the right operand comes off first.
fn pop_operands(
    stack: &mut Vec<AstExpr>,
    what: &str,
    position: usize,
) -> Result<(AstExpr, AstExpr)> {
    let right = stack.pop();
    let left = stack.pop();
    match (left, right) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(ExprError::Syntax {
            message: format!("{} given with insufficient operands", what),
            position,
        }),
    }
}

/// Unary minus: literals fold in place, anything else subtracts from zero.
/// Folding only the literal and dropping the sign elsewhere (as the
/// tree-building used to) would silently misread `-x`.
fn negate(node: AstExpr) -> AstExpr {
    match node {
        AstExpr::Number(value) => AstExpr::Number(-value),
        other => AstExpr::Operation {
            op: BinaryOp::Minus,
            left: Box::new(AstExpr::Number(0.0)),
            right: Box::new(other),
        },
    }
}
