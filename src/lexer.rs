//! Lexical analysis: turns a source string into positional tokens.
//!
//! Besides splitting the input, the tokenizer settles everything that can
//! be settled from one token of lookbehind: unary versus binary `+`/`-`,
//! reserved function names versus variables, and the adjacency rules that
//! make sequences like `2x` or `sin x` impossible before parsing starts.

use crate::error::{ExprError, Result};
use crate::types::{BinaryOp, CmpOp, LogicOp, MathFn, Sign, TernarySym, Token, TokenKind};
use crate::Real;

/// The lexer struct, which produces tokens from an input string.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Peek at the current character.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek one character past the current one.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance the position by one character.
    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Tokenize the whole input, ending with an [`TokenKind::End`] sentinel
    /// that carries the terminal offset.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };

            let kind = if c.is_ascii_digit() || c == '.' {
                self.lex_number(start)?
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.lex_identifier()
            } else {
                self.lex_symbol(tokens.last().map(|t| &t.kind), start)?
            };

            check_adjacency(tokens.last().map(|t| &t.kind), &kind, start)?;
            tokens.push(Token::new(kind, start));
        }

        if let Some(last) = tokens.last() {
            if !last.kind.terminates_expression() {
                return Err(ExprError::Tokenizer {
                    message: format!("expression may not end with '{}'", last.kind),
                    position: last.position,
                });
            }
        }

        tokens.push(Token::new(TokenKind::End, self.pos));
        Ok(tokens)
    }

    /// Number literal: `digit* ('.' digit*)? ([eE] [+-]? digit*)?`,
    /// converted through the standard textual parse for the scalar type.
    fn lex_number(&mut self, start: usize) -> Result<TokenKind> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        match text.parse::<Real>() {
            Ok(value) => Ok(TokenKind::Number(value)),
            Err(_) => Err(ExprError::Tokenizer {
                message: format!("invalid number '{}'", text),
                position: start,
            }),
        }
    }

    /// Maximal `[A-Za-z0-9_]+` word. Reserved function names become
    /// function tokens and shadow any same-named variable; maximal munch
    /// keeps the fused names `log2` and `log10` from splitting.
    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = &self.input[start..self.pos];
        match MathFn::from_name(word) {
            Some(func) => TokenKind::Function(func),
            None => TokenKind::Variable(word.to_string()),
        }
    }

    fn lex_symbol(&mut self, prev: Option<&TokenKind>, start: usize) -> Result<TokenKind> {
        let c = match self.peek() {
            Some(c) => c,
            None => {
                return Err(ExprError::Tokenizer {
                    message: "unexpected end of input".to_string(),
                    position: start,
                })
            }
        };
        let next = self.peek_next();
        self.advance();

        let kind = match (c, next) {
            ('=', Some('=')) => {
                self.advance();
                TokenKind::Conditional(CmpOp::Eq)
            }
            ('!', Some('=')) => {
                self.advance();
                TokenKind::Conditional(CmpOp::Ne)
            }
            ('<', Some('=')) => {
                self.advance();
                TokenKind::Conditional(CmpOp::Le)
            }
            ('>', Some('=')) => {
                self.advance();
                TokenKind::Conditional(CmpOp::Ge)
            }
            ('&', Some('&')) => {
                self.advance();
                TokenKind::Logical(LogicOp::And)
            }
            ('|', Some('|')) => {
                self.advance();
                TokenKind::Logical(LogicOp::Or)
            }
            ('<', _) => TokenKind::Conditional(CmpOp::Lt),
            ('>', _) => TokenKind::Conditional(CmpOp::Gt),
            ('+', _) => self.sign_token(prev, Sign::Positive, BinaryOp::Plus, start)?,
            ('-', _) => self.sign_token(prev, Sign::Negative, BinaryOp::Minus, start)?,
            ('*', _) => TokenKind::Operator(BinaryOp::Mul),
            ('/', _) => TokenKind::Operator(BinaryOp::Div),
            ('^', _) => TokenKind::Operator(BinaryOp::Pow),
            ('%', _) => TokenKind::Operator(BinaryOp::Mod),
            ('?', _) => TokenKind::Ternary(TernarySym::Question),
            (':', _) => TokenKind::Ternary(TernarySym::Colon),
            ('(', _) => TokenKind::OpenParen,
            (')', _) => TokenKind::CloseParen,
            (',', _) => TokenKind::Comma,
            ('=', _) => {
                return Err(ExprError::Tokenizer {
                    message: "expected '=' after '=' for '=='".to_string(),
                    position: start,
                })
            }
            ('!', _) => {
                return Err(ExprError::Tokenizer {
                    message: "expected '=' after '!' for '!='".to_string(),
                    position: start,
                })
            }
            ('&', _) => {
                return Err(ExprError::Tokenizer {
                    message: "expected '&' after '&' for '&&'".to_string(),
                    position: start,
                })
            }
            ('|', _) => {
                return Err(ExprError::Tokenizer {
                    message: "expected '|' after '|' for '||'".to_string(),
                    position: start,
                })
            }
            _ => {
                return Err(ExprError::Tokenizer {
                    message: format!("unexpected character '{}'", c),
                    position: start,
                })
            }
        };
        Ok(kind)
    }

    /// Unary versus binary disambiguation for `+` and `-`: binary after
    /// anything that terminates an expression, unary after an operator,
    /// an open parenthesis, a comma, or at the very start. A sign directly
    /// after a function name or another sign is rejected.
    fn sign_token(
        &self,
        prev: Option<&TokenKind>,
        sign: Sign,
        op: BinaryOp,
        position: usize,
    ) -> Result<TokenKind> {
        match prev {
            None => Ok(TokenKind::Unary(sign)),
            Some(kind) if kind.terminates_expression() => Ok(TokenKind::Operator(op)),
            Some(TokenKind::Function(_)) => Err(ExprError::Tokenizer {
                message: "unary following function declaration".to_string(),
                position,
            }),
            Some(TokenKind::Unary(_)) => Err(ExprError::Tokenizer {
                message: "consecutive unary signs".to_string(),
                position,
            }),
            Some(_) => Ok(TokenKind::Unary(sign)),
        }
    }
}

/// Rejects token sequences that cannot occur in any valid expression:
/// an infix token without a left-hand operand, and implicit multiplication
/// (a function name or variable straight after a value).
fn check_adjacency(prev: Option<&TokenKind>, kind: &TokenKind, position: usize) -> Result<()> {
    let is_infix = matches!(
        kind,
        TokenKind::Operator(_)
            | TokenKind::Conditional(_)
            | TokenKind::Logical(_)
            | TokenKind::Ternary(_)
            | TokenKind::Comma
    );
    if is_infix && !matches!(prev, Some(p) if p.terminates_expression()) {
        return Err(ExprError::Tokenizer {
            message: format!("'{}' is missing a left-hand operand", kind),
            position,
        });
    }

    if matches!(kind, TokenKind::Function(_) | TokenKind::Variable(_)) {
        if let Some(p) = prev {
            if matches!(
                p,
                TokenKind::Number(_)
                    | TokenKind::Variable(_)
                    | TokenKind::Function(_)
                    | TokenKind::CloseParen
            ) {
                return Err(ExprError::Tokenizer {
                    message: format!("'{}' may not directly follow '{}'", kind, p),
                    position,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(input: &str) -> ExprError {
        Lexer::new(input).tokenize().unwrap_err()
    }

    #[test]
    fn test_tokenize_all_kinds() {
        let toks = kinds("1 + foo_bar * (2.5e-1) , min(x, 4) < 2 && y != 3 ? .5 : 0");
        assert!(toks.contains(&TokenKind::Number(1.0)));
        assert!(toks.contains(&TokenKind::Variable("foo_bar".to_string())));
        assert!(toks.contains(&TokenKind::Operator(BinaryOp::Mul)));
        assert!(toks.contains(&TokenKind::Number(0.25)));
        assert!(toks.contains(&TokenKind::Function(MathFn::Min)));
        assert!(toks.contains(&TokenKind::Comma));
        assert!(toks.contains(&TokenKind::Conditional(CmpOp::Lt)));
        assert!(toks.contains(&TokenKind::Logical(LogicOp::And)));
        assert!(toks.contains(&TokenKind::Conditional(CmpOp::Ne)));
        assert!(toks.contains(&TokenKind::Ternary(TernarySym::Question)));
        assert!(toks.contains(&TokenKind::Ternary(TernarySym::Colon)));
        assert!(toks.contains(&TokenKind::Number(0.5)));
        assert_eq!(toks.last(), Some(&TokenKind::End));
    }

    #[test]
    fn test_positions() {
        let toks = Lexer::new("  x + 10").tokenize().unwrap();
        assert_eq!(toks[0].position, 2);
        assert_eq!(toks[1].position, 4);
        assert_eq!(toks[2].position, 6);
        // End carries the terminal offset.
        assert_eq!(toks[3].kind, TokenKind::End);
        assert_eq!(toks[3].position, 8);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(kinds("1.0e2")[0], TokenKind::Number(100.0));
        assert_eq!(kinds(".5")[0], TokenKind::Number(0.5));
        assert_eq!(kinds("2.")[0], TokenKind::Number(2.0));
        assert_eq!(kinds("3e+2")[0], TokenKind::Number(300.0));
        assert_eq!(kinds("9E-1")[0], TokenKind::Number(0.9));
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(matches!(lex_err("."), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("1e"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("1e+"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err(".e3"), ExprError::Tokenizer { .. }));
    }

    #[test]
    fn test_unary_vs_binary_sign() {
        assert_eq!(kinds("-x")[0], TokenKind::Unary(Sign::Negative));
        assert_eq!(kinds("+4")[0], TokenKind::Unary(Sign::Positive));
        assert_eq!(kinds("x - 4")[1], TokenKind::Operator(BinaryOp::Minus));
        assert_eq!(kinds("(x) - 4")[3], TokenKind::Operator(BinaryOp::Minus));
        // After an operator or open parenthesis the sign is unary again.
        assert_eq!(kinds("x * -4")[2], TokenKind::Unary(Sign::Negative));
        assert_eq!(kinds("(-4)")[1], TokenKind::Unary(Sign::Negative));
        assert_eq!(kinds("min(x, -4)")[4], TokenKind::Unary(Sign::Negative));
        assert_eq!(kinds("x < -4")[2], TokenKind::Unary(Sign::Negative));
    }

    #[test]
    fn test_sign_rejections() {
        let err = lex_err("sin -x");
        assert!(matches!(err, ExprError::Tokenizer { position: 4, .. }), "{err}");
        assert!(matches!(lex_err("--4"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x * +-4"), ExprError::Tokenizer { .. }));
        // A sign after a binary operator is unary, not an error.
        assert_eq!(kinds("x - -4")[2], TokenKind::Unary(Sign::Negative));
    }

    #[test]
    fn test_reserved_names_and_maximal_munch() {
        assert_eq!(kinds("log10")[0], TokenKind::Function(MathFn::Log10));
        assert_eq!(kinds("log2")[0], TokenKind::Function(MathFn::Log2));
        assert_eq!(kinds("log")[0], TokenKind::Function(MathFn::Log));
        // A longer word containing a reserved prefix is one variable.
        assert_eq!(
            kinds("sinister")[0],
            TokenKind::Variable("sinister".to_string())
        );
        assert_eq!(kinds("log3")[0], TokenKind::Variable("log3".to_string()));
        assert_eq!(kinds("_pow")[0], TokenKind::Variable("_pow".to_string()));
    }

    #[test]
    fn test_adjacency_no_implicit_multiplication() {
        assert!(matches!(lex_err("2x"), ExprError::Tokenizer { position: 1, .. }));
        assert!(matches!(lex_err("x y"), ExprError::Tokenizer { position: 2, .. }));
        assert!(matches!(lex_err("sin x"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("(x) y"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x sin(y)"), ExprError::Tokenizer { .. }));
    }

    #[test]
    fn test_adjacency_infix_needs_operand() {
        assert!(matches!(lex_err("%x"), ExprError::Tokenizer { position: 0, .. }));
        assert!(matches!(lex_err("1-*2"), ExprError::Tokenizer { position: 2, .. }));
        assert!(matches!(lex_err("min(,1)"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x && && y"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("? 1 : 2"), ExprError::Tokenizer { .. }));
    }

    #[test]
    fn test_trailing_token_check() {
        assert!(matches!(lex_err("x %"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("+"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x++"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("1 +"), ExprError::Tokenizer { .. }));
    }

    #[test]
    fn test_unknown_and_half_operators() {
        assert!(matches!(lex_err("1 $ 2"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x = 2"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x ! 2"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x & y"), ExprError::Tokenizer { .. }));
        assert!(matches!(lex_err("x | y"), ExprError::Tokenizer { .. }));
    }

    #[test]
    fn test_empty_input_is_just_the_sentinel() {
        let toks = Lexer::new("   ").tokenize().unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::End);
    }
}
