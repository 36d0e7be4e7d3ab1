//! The closed sets of names an expression may refer to.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::SymbolError;

/// Named constants, valued from the host's `f64` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ConstantSymbol {
    #[cfg_attr(feature = "serde", serde(rename = "E"))]
    E,
    #[cfg_attr(feature = "serde", serde(rename = "LN2"))]
    Ln2,
    #[cfg_attr(feature = "serde", serde(rename = "LN10"))]
    Ln10,
    #[cfg_attr(feature = "serde", serde(rename = "LOG2E"))]
    Log2E,
    #[cfg_attr(feature = "serde", serde(rename = "LOG10E"))]
    Log10E,
    #[cfg_attr(feature = "serde", serde(rename = "PI"))]
    Pi,
    #[cfg_attr(feature = "serde", serde(rename = "SQRT1_2"))]
    Sqrt1Over2,
    #[cfg_attr(feature = "serde", serde(rename = "SQRT2"))]
    Sqrt2,
}

const CONSTANTS: &[(&str, ConstantSymbol)] = &[
    ("E", ConstantSymbol::E),
    ("LN2", ConstantSymbol::Ln2),
    ("LN10", ConstantSymbol::Ln10),
    ("LOG2E", ConstantSymbol::Log2E),
    ("LOG10E", ConstantSymbol::Log10E),
    ("PI", ConstantSymbol::Pi),
    ("SQRT1_2", ConstantSymbol::Sqrt1Over2),
    ("SQRT2", ConstantSymbol::Sqrt2),
];

impl ConstantSymbol {
    pub fn from_name(name: &str) -> Result<ConstantSymbol, SymbolError> {
        CONSTANTS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, symbol)| symbol)
            .ok_or_else(|| SymbolError::UnknownConstant(String::from(name)))
    }

    pub fn name(self) -> &'static str {
        CONSTANTS
            .iter()
            .find(|&&(_, symbol)| symbol == self)
            .map(|&(name, _)| name)
            .unwrap_or("?")
    }

    pub fn value(self) -> f64 {
        use std::f64::consts;

        match self {
            ConstantSymbol::E => consts::E,
            ConstantSymbol::Ln2 => consts::LN_2,
            ConstantSymbol::Ln10 => consts::LN_10,
            ConstantSymbol::Log2E => consts::LOG2_E,
            ConstantSymbol::Log10E => consts::LOG10_E,
            ConstantSymbol::Pi => consts::PI,
            ConstantSymbol::Sqrt1Over2 => consts::FRAC_1_SQRT_2,
            ConstantSymbol::Sqrt2 => consts::SQRT_2,
        }
    }

    /// Whether `name` sits in the constant slot of the grammar: `[A-Z_][A-Z_0-9]*`.
    pub fn is_candidate(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() || first == '_' => chars
                .all(|chr| chr.is_ascii_uppercase() || chr.is_ascii_digit() || chr == '_'),
            _ => false,
        }
    }
}

impl fmt::Display for ConstantSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive bounds on a function's argument count. `max` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn exactly(count: usize) -> Arity {
        Arity {
            min: count,
            max: Some(count),
        }
    }

    const fn between(min: usize, max: usize) -> Arity {
        Arity {
            min,
            max: Some(max),
        }
    }

    const fn at_least(min: usize) -> Arity {
        Arity { min, max: None }
    }

    pub fn accepts(self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Function {
    Abs,
    Acos,
    Acosh,
    Add,
    Asin,
    Asinh,
    Atan,
    Atanh,
    Atan2,
    Cbrt,
    Ceil,
    Cos,
    Cosh,
    Div,
    Exp,
    Floor,
    Hypot,
    Ln,
    Log,
    Log2,
    Log10,
    Max,
    Min,
    Mod,
    Mul,
    Pow,
    Random,
    Round,
    Sign,
    Sin,
    Sinh,
    Sqrt,
    Sub,
    Tan,
    Tanh,
    Trunc,
}

const FUNCTIONS: &[(&str, Function, Arity)] = &[
    ("abs", Function::Abs, Arity::exactly(1)),
    ("acos", Function::Acos, Arity::exactly(1)),
    ("acosh", Function::Acosh, Arity::exactly(1)),
    ("add", Function::Add, Arity::exactly(2)),
    ("asin", Function::Asin, Arity::exactly(1)),
    ("asinh", Function::Asinh, Arity::exactly(1)),
    ("atan", Function::Atan, Arity::exactly(1)),
    ("atanh", Function::Atanh, Arity::exactly(1)),
    ("atan2", Function::Atan2, Arity::exactly(2)),
    ("cbrt", Function::Cbrt, Arity::exactly(1)),
    ("ceil", Function::Ceil, Arity::exactly(1)),
    ("cos", Function::Cos, Arity::exactly(1)),
    ("cosh", Function::Cosh, Arity::exactly(1)),
    ("div", Function::Div, Arity::exactly(2)),
    ("exp", Function::Exp, Arity::exactly(1)),
    ("floor", Function::Floor, Arity::exactly(1)),
    ("hypot", Function::Hypot, Arity::at_least(1)),
    ("ln", Function::Ln, Arity::exactly(1)),
    ("log", Function::Log, Arity::between(1, 2)),
    ("log2", Function::Log2, Arity::exactly(1)),
    ("log10", Function::Log10, Arity::exactly(1)),
    ("max", Function::Max, Arity::at_least(1)),
    ("min", Function::Min, Arity::at_least(1)),
    ("mod", Function::Mod, Arity::exactly(2)),
    ("mul", Function::Mul, Arity::exactly(2)),
    ("pow", Function::Pow, Arity::exactly(2)),
    ("random", Function::Random, Arity::between(0, 1)),
    ("round", Function::Round, Arity::exactly(1)),
    ("sign", Function::Sign, Arity::exactly(1)),
    ("sin", Function::Sin, Arity::exactly(1)),
    ("sinh", Function::Sinh, Arity::exactly(1)),
    ("sqrt", Function::Sqrt, Arity::exactly(1)),
    ("sub", Function::Sub, Arity::exactly(2)),
    ("tan", Function::Tan, Arity::exactly(1)),
    ("tanh", Function::Tanh, Arity::exactly(1)),
    ("trunc", Function::Trunc, Arity::exactly(1)),
];

impl Function {
    pub fn from_name(name: &str) -> Result<Function, SymbolError> {
        FUNCTIONS
            .iter()
            .find(|(candidate, _, _)| *candidate == name)
            .map(|&(_, function, _)| function)
            .ok_or_else(|| SymbolError::UnknownFunction(String::from(name)))
    }

    fn entry(self) -> Option<&'static (&'static str, Function, Arity)> {
        FUNCTIONS.iter().find(|(_, function, _)| *function == self)
    }

    pub fn name(self) -> &'static str {
        self.entry().map_or("?", |&(name, _, _)| name)
    }

    pub fn arity(self) -> Arity {
        self.entry()
            .map_or(Arity::at_least(0), |&(_, _, arity)| arity)
    }

    /// Fails with `SymbolError::Arity` when `count` arguments are not accepted.
    pub fn check_arity(self, count: usize) -> Result<(), SymbolError> {
        let expected = self.arity();
        if expected.accepts(count) {
            Ok(())
        } else {
            Err(SymbolError::Arity {
                function: self.name(),
                expected,
                found: count,
            })
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[test]
    fn it_round_trips_every_constant_name() {
        for &(name, symbol) in CONSTANTS {
            assert_eq!(ConstantSymbol::from_name(name), Ok(symbol));
            assert_eq!(symbol.name(), name);
            assert!(ConstantSymbol::is_candidate(name));
        }
    }

    #[test]
    fn it_round_trips_every_function_name() {
        for &(name, function, arity) in FUNCTIONS {
            assert_eq!(Function::from_name(name), Ok(function));
            assert_eq!(function.name(), name);
            assert_eq!(function.arity(), arity);
        }
    }

    #[test]
    fn it_rejects_unknown_names() {
        assert_eq!(
            ConstantSymbol::from_name("TAU"),
            Err(SymbolError::UnknownConstant(String::from("TAU")))
        );
        assert_eq!(
            Function::from_name("sum"),
            Err(SymbolError::UnknownFunction(String::from("sum")))
        );
    }

    #[rstest]
    #[case("PI", true)]
    #[case("SQRT1_2", true)]
    #[case("_X", true)]
    #[case("Pi", false)]
    #[case("1PI", false)]
    #[case("", false)]
    fn it_recognizes_constant_slot(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(ConstantSymbol::is_candidate(name), expected);
    }

    #[rstest]
    #[case(Function::Sin, 1, true)]
    #[case(Function::Sin, 2, false)]
    #[case(Function::Log, 2, true)]
    #[case(Function::Log, 3, false)]
    #[case(Function::Random, 0, true)]
    #[case(Function::Max, 0, false)]
    #[case(Function::Max, 12, true)]
    fn it_checks_arity(#[case] function: Function, #[case] count: usize, #[case] ok: bool) {
        assert_eq!(function.check_arity(count).is_ok(), ok);
    }

    #[test]
    fn it_describes_arity_errors() {
        let error = Function::Add.check_arity(3).unwrap_err();
        assert_eq!(
            error.to_string(),
            "function add expects 2 argument(s), found 3"
        );
        assert_eq!(
            Function::Hypot.check_arity(0).unwrap_err().to_string(),
            "function hypot expects at least 1 argument(s), found 0"
        );
    }
}
