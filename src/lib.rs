//! Finds the arithmetic expression at the end of a line of free text and
//! evaluates it with decimal arithmetic.
//!
//! ```
//! let calculation = editor_calc::calculate("some text 1.321").unwrap();
//! assert_eq!(calculation.skip, 10);
//! assert_eq!(calculation.result, "1.321");
//!
//! let tree = editor_calc::parse("2 ** 3 ** 2").unwrap();
//! let value = tree.evaluate().unwrap();
//! assert_eq!(editor_calc::decimal::to_canonical_string(value), "64");
//! ```

pub mod ast;
pub mod config;
pub mod decimal;
pub mod error;
mod eval;
pub mod parser;
pub mod precedence;
pub mod scanner;
pub mod symbols;
pub mod tok;

pub use ast::{BinaryOperator, FunctionCall, Node, UnaryOperator};
pub use config::Config;
pub use error::{CalcError, EvalError, ParseError, ParseErrorKind, SymbolError};
pub use scanner::Calculation;
pub use symbols::{ConstantSymbol, Function};

/// Parses and calculates with a fixed `Config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calculator {
    config: Config,
}

impl Calculator {
    pub fn new(config: Config) -> Self {
        Calculator { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses all of `text` (an optional trailing `=` aside) into a tree.
    pub fn parse(&self, text: &str) -> Result<Node, ParseError> {
        parser::parse(text, self.config.max_depth)
    }

    /// Locates the expression in `text` and evaluates it.
    pub fn calculate(&self, text: &str) -> Result<Calculation, CalcError> {
        scanner::calculate(text, &self.config)
    }
}

/// [`Calculator::parse`] with the default configuration.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    Calculator::default().parse(text)
}

/// [`Calculator::calculate`] with the default configuration.
pub fn calculate(text: &str) -> Result<Calculation, CalcError> {
    Calculator::default().calculate(text)
}
