use thiserror::Error;

use crate::symbols::Arity;

/// A name or argument list outside the closed symbol tables. Raised while the
/// tree is built, never retried by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("constant {0} does not exist")]
    UnknownConstant(String),
    #[error("function {0} does not exist")]
    UnknownFunction(String),
    #[error("function {function} expects {expected} argument(s), found {found}")]
    Arity {
        function: &'static str,
        expected: Arity,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
    },
    /// An expression parsed but text remains. `at_operator` is set when the
    /// leftover starts with a binary operator that found no operand.
    #[error("unexpected {found} after expression")]
    TrailingInput { found: String, at_operator: bool },
    #[error("expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Failure to turn text into a tree. `position` counts characters from the
/// start of the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        ParseError { position, kind }
    }

    /// No grammar alternative matched. The only kind the parser backtracks over.
    pub fn is_mismatch(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Mismatch { .. })
    }
}

/// Arithmetic failures, raised lazily by `Node::evaluate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("overflow in {0}")]
    Overflow(&'static str),
    #[error("{function} is undefined for {input}")]
    Domain {
        function: &'static str,
        input: String,
    },
    #[error("'{0}' is not a representable decimal")]
    InvalidLiteral(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// No expression could be located. `marker` is as long as `text` and has a
    /// `^` under every offset the scanner tried.
    #[error("no expression found:\n{text}\n{marker}")]
    Exhausted { text: String, marker: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Arithmetic(#[from] EvalError),
}

impl CalcError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, CalcError::Exhausted { .. })
    }
}
