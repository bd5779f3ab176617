//! Error types shared by the tokenizer, parser, evaluator, and generator.
//!
//! Every pipeline stage raises its error to the call boundary; nothing is
//! recovered locally and partial results are never returned. Lexical and
//! structural errors carry the 0-based character offset they refer to.

use std::fmt;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ExprError>;

/// Error type for expression parsing, evaluation, and code emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// Error during lexical analysis: an illegal character or a token
    /// adjacency that cannot start or continue a valid expression.
    Tokenizer {
        /// What the tokenizer objected to.
        message: String,
        /// Character offset of the offending token.
        position: usize,
    },

    /// Error during tree construction: an operator with fewer operands
    /// than its arity, leftover operands, or an empty expression.
    Syntax {
        /// What the parser objected to.
        message: String,
        /// Character offset of the offending token.
        position: usize,
    },

    /// A parenthesis without a partner.
    UnmatchedParenthesis { position: usize },

    /// A comma outside any function argument list.
    MisplacedSeparator { position: usize },

    /// A variable referenced by the expression is not defined in the
    /// evaluation context. Resolution happens per evaluation, so the same
    /// tree may succeed against one context and fail against another.
    UnknownVariable { name: String },

    /// The shader generator was handed a tree it cannot express in the
    /// target dialect, e.g. a non-finite literal.
    Generate(String),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Tokenizer { message, position } => {
                write!(f, "Tokenizer error: {}, character: {}", message, position)
            }
            ExprError::Syntax { message, position } => {
                write!(f, "Syntax error: {}, character: {}", message, position)
            }
            ExprError::UnmatchedParenthesis { position } => {
                write!(f, "Mismatched parenthesis, character: {}", position)
            }
            ExprError::MisplacedSeparator { position } => {
                write!(
                    f,
                    "Misplaced separator or unmatched parenthesis, character: {}",
                    position
                )
            }
            ExprError::UnknownVariable { name } => {
                write!(f, "Unknown variable: '{}'", name)
            }
            ExprError::Generate(message) => {
                write!(f, "Generator error: {}", message)
            }
        }
    }
}

impl std::error::Error for ExprError {}

impl ExprError {
    /// Source offset carried by the error, for the lexical and structural
    /// variants that have one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ExprError::Tokenizer { position, .. }
            | ExprError::Syntax { position, .. }
            | ExprError::UnmatchedParenthesis { position }
            | ExprError::MisplacedSeparator { position } => Some(*position),
            _ => None,
        }
    }
}
