//! Evaluation of expression trees.
//!
//! Literals keep every digit; each operation result is rounded to the working
//! precision in significant digits. Every call walks the tree again, nothing
//! is cached between calls.

use rand::Rng;
use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::config::DEFAULT_PRECISION;
use crate::decimal;
use crate::error::EvalError;
use crate::symbols::Function;

impl Node {
    /// Evaluates with `DEFAULT_PRECISION` significant digits per operation.
    pub fn evaluate(&self) -> Result<Decimal, EvalError> {
        self.evaluate_with(DEFAULT_PRECISION)
    }

    pub fn evaluate_with(&self, precision: u32) -> Result<Decimal, EvalError> {
        match self {
            Node::DecimalLiteral { raw } => decimal::parse_literal(raw),
            Node::Constant { symbol } => decimal::from_f64(symbol.value(), symbol.name()),
            Node::FunctionCall(call) => {
                let args = call
                    .args()
                    .iter()
                    .map(|arg| arg.evaluate_with(precision))
                    .collect::<Result<Vec<_>, _>>()?;
                let value = apply_function(call.function(), &args)?;
                Ok(decimal::round_significant(value, precision))
            }
            Node::UnaryExpr { operators, operand } => {
                let value = operand.evaluate_with(precision)?;
                let minus_count = operators
                    .iter()
                    .filter(|&&operator| operator == UnaryOperator::Minus)
                    .count();
                Ok(if minus_count % 2 == 1 { -value } else { value })
            }
            Node::BinaryExpr {
                left,
                operator,
                right,
            } => {
                let value = apply_binary(
                    *operator,
                    left.evaluate_with(precision)?,
                    right.evaluate_with(precision)?,
                )?;
                Ok(decimal::round_significant(value, precision))
            }
        }
    }
}

pub fn apply_binary(
    operator: BinaryOperator,
    left: Decimal,
    right: Decimal,
) -> Result<Decimal, EvalError> {
    let symbol = operator.symbol();
    match operator {
        BinaryOperator::Add => left.checked_add(right).ok_or(EvalError::Overflow(symbol)),
        BinaryOperator::Sub => left.checked_sub(right).ok_or(EvalError::Overflow(symbol)),
        BinaryOperator::Mul => left.checked_mul(right).ok_or(EvalError::Overflow(symbol)),
        BinaryOperator::Div => {
            if right.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            left.checked_div(right).ok_or(EvalError::Overflow(symbol))
        }
        BinaryOperator::Mod => {
            if right.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            // truncated remainder, sign follows the dividend
            left.checked_rem(right).ok_or(EvalError::Overflow(symbol))
        }
        BinaryOperator::Pow => power(left, right),
    }
}

fn power(base: Decimal, exponent: Decimal) -> Result<Decimal, EvalError> {
    if exponent.fract().is_zero() {
        if let Some(exponent) = exponent.to_i64() {
            if base.is_zero() && exponent < 0 {
                return Err(EvalError::DivisionByZero);
            }
            return base
                .checked_powi(exponent)
                .ok_or(EvalError::Overflow("**"));
        }
    }

    if base.is_zero() {
        return if exponent.is_sign_positive() {
            Ok(Decimal::ZERO)
        } else {
            Err(EvalError::DivisionByZero)
        };
    }
    if base.is_sign_negative() {
        return Err(EvalError::Domain {
            function: "**",
            input: format!("{} ** {}", base, exponent),
        });
    }
    base.checked_powd(exponent).ok_or(EvalError::Overflow("**"))
}

fn domain(function: Function, input: Decimal) -> EvalError {
    EvalError::Domain {
        function: function.name(),
        input: input.to_string(),
    }
}

/// Runs `operation` on the `f64` nearest to `input`, for functions `Decimal` lacks.
fn via_f64(
    function: Function,
    input: Decimal,
    operation: fn(f64) -> f64,
) -> Result<Decimal, EvalError> {
    let result = operation(decimal::to_f64(input, function.name())?);
    if !result.is_finite() {
        return Err(domain(function, input));
    }
    decimal::from_f64(result, function.name())
}

fn natural_log(function: Function, input: Decimal) -> Result<Decimal, EvalError> {
    if input <= Decimal::ZERO {
        return Err(domain(function, input));
    }
    input.checked_ln().ok_or_else(|| domain(function, input))
}

fn log_base(function: Function, input: Decimal, base: Decimal) -> Result<Decimal, EvalError> {
    let numerator = natural_log(function, input)?;
    let denominator = natural_log(function, base)?;
    if denominator.is_zero() {
        return Err(domain(function, base));
    }
    numerator
        .checked_div(denominator)
        .ok_or(EvalError::Overflow(function.name()))
}

/// `args` always satisfies the function's arity; `Node` construction checks it.
fn apply_function(function: Function, args: &[Decimal]) -> Result<Decimal, EvalError> {
    let name = function.name();
    match function {
        Function::Abs => Ok(args[0].abs()),
        Function::Ceil => Ok(args[0].ceil()),
        Function::Floor => Ok(args[0].floor()),
        Function::Trunc => Ok(args[0].trunc()),
        Function::Round => {
            Ok(args[0].round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        }
        Function::Sign => Ok(if args[0].is_zero() {
            Decimal::ZERO
        } else if args[0].is_sign_negative() {
            Decimal::NEGATIVE_ONE
        } else {
            Decimal::ONE
        }),

        Function::Add => apply_binary(BinaryOperator::Add, args[0], args[1]),
        Function::Sub => apply_binary(BinaryOperator::Sub, args[0], args[1]),
        Function::Mul => apply_binary(BinaryOperator::Mul, args[0], args[1]),
        Function::Div => apply_binary(BinaryOperator::Div, args[0], args[1]),
        Function::Mod => apply_binary(BinaryOperator::Mod, args[0], args[1]),
        Function::Pow => apply_binary(BinaryOperator::Pow, args[0], args[1]),

        Function::Max => Ok(args.iter().copied().fold(args[0], Decimal::max)),
        Function::Min => Ok(args.iter().copied().fold(args[0], Decimal::min)),
        Function::Hypot => {
            let mut sum = Decimal::ZERO;
            for arg in args {
                sum = arg
                    .checked_mul(*arg)
                    .and_then(|square| sum.checked_add(square))
                    .ok_or(EvalError::Overflow(name))?;
            }
            sum.sqrt().ok_or(EvalError::Overflow(name))
        }

        Function::Sqrt => {
            if args[0].is_sign_negative() && !args[0].is_zero() {
                return Err(domain(function, args[0]));
            }
            args[0].sqrt().ok_or_else(|| domain(function, args[0]))
        }
        Function::Exp => args[0].checked_exp().ok_or(EvalError::Overflow(name)),
        Function::Ln => natural_log(function, args[0]),
        Function::Log10 => {
            if args[0] <= Decimal::ZERO {
                return Err(domain(function, args[0]));
            }
            args[0]
                .checked_log10()
                .ok_or_else(|| domain(function, args[0]))
        }
        Function::Log2 => log_base(function, args[0], Decimal::from(2)),
        Function::Log => match args.get(1) {
            Some(&base) => log_base(function, args[0], base),
            None => log_base(function, args[0], Decimal::from(10)),
        },

        Function::Sin => args[0].checked_sin().ok_or_else(|| domain(function, args[0])),
        Function::Cos => args[0].checked_cos().ok_or_else(|| domain(function, args[0])),
        Function::Tan => args[0].checked_tan().ok_or_else(|| domain(function, args[0])),
        Function::Asin => via_f64(function, args[0], f64::asin),
        Function::Acos => via_f64(function, args[0], f64::acos),
        Function::Atan => via_f64(function, args[0], f64::atan),
        Function::Sinh => via_f64(function, args[0], f64::sinh),
        Function::Cosh => via_f64(function, args[0], f64::cosh),
        Function::Tanh => via_f64(function, args[0], f64::tanh),
        Function::Asinh => via_f64(function, args[0], f64::asinh),
        Function::Acosh => via_f64(function, args[0], f64::acosh),
        Function::Atanh => via_f64(function, args[0], f64::atanh),
        Function::Cbrt => via_f64(function, args[0], f64::cbrt),
        Function::Atan2 => {
            let y = decimal::to_f64(args[0], name)?;
            let x = decimal::to_f64(args[1], name)?;
            decimal::from_f64(y.atan2(x), name)
        }

        Function::Random => {
            let value = decimal::from_f64(rand::thread_rng().gen::<f64>(), name)?;
            match args.first() {
                None => Ok(value),
                Some(&digits) => {
                    let digits = digits
                        .to_u32()
                        .filter(|&digits| digits >= 1 && digits <= 28 && args[0].fract().is_zero())
                        .ok_or_else(|| domain(function, args[0]))?;
                    Ok(value.round_sf(digits).unwrap_or(value))
                }
            }
        }
    }
}
