#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::SymbolError;
use crate::symbols::{ConstantSymbol, Function};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UnaryOperator {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Plus,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Minus,
}

/// Binding strength groups, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Exponent,
    Multiplicative,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BinaryOperator {
    #[cfg_attr(feature = "serde", serde(rename = "**"))]
    Pow,
    #[cfg_attr(feature = "serde", serde(rename = "%"))]
    Mod,
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Mul,
    #[cfg_attr(feature = "serde", serde(rename = "/"))]
    Div,
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Add,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Sub,
}

impl BinaryOperator {
    pub fn tier(self) -> Tier {
        match self {
            BinaryOperator::Pow => Tier::Exponent,
            BinaryOperator::Mod | BinaryOperator::Mul | BinaryOperator::Div => {
                Tier::Multiplicative
            }
            BinaryOperator::Add | BinaryOperator::Sub => Tier::Additive,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Pow => "**",
            BinaryOperator::Mod => "%",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
        }
    }
}

/// A validated function application. Fields are private so the argument count
/// always matches the function's arity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FunctionCall {
    name: Function,
    args: Vec<Node>,
}

impl FunctionCall {
    pub fn function(&self) -> Function {
        self.name
    }

    pub fn args(&self) -> &[Node] {
        &self.args
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Node {
    DecimalLiteral {
        raw: String,
    },
    Constant {
        symbol: ConstantSymbol,
    },
    FunctionCall(FunctionCall),
    UnaryExpr {
        operators: Vec<UnaryOperator>,
        operand: Box<Node>,
    },
    BinaryExpr {
        left: Box<Node>,
        operator: BinaryOperator,
        right: Box<Node>,
    },
}

impl Node {
    pub fn decimal(raw: impl Into<String>) -> Node {
        Node::DecimalLiteral { raw: raw.into() }
    }

    pub fn constant(name: &str) -> Result<Node, SymbolError> {
        Ok(Node::Constant {
            symbol: ConstantSymbol::from_name(name)?,
        })
    }

    pub fn function_call(name: &str, args: Vec<Node>) -> Result<Node, SymbolError> {
        let function = Function::from_name(name)?;
        function.check_arity(args.len())?;
        Ok(Node::FunctionCall(FunctionCall {
            name: function,
            args,
        }))
    }

    /// Applies `operators` to `operand`. A unary operand has its own operators
    /// appended, so `-(-x)` becomes a single node with two operators.
    pub fn unary(mut operators: Vec<UnaryOperator>, operand: Node) -> Node {
        match operand {
            Node::UnaryExpr {
                operators: inner,
                operand,
            } => {
                operators.extend(inner);
                Node::UnaryExpr { operators, operand }
            }
            operand => Node::UnaryExpr {
                operators,
                operand: Box::new(operand),
            },
        }
    }

    pub fn binary(left: Node, operator: BinaryOperator, right: Node) -> Node {
        Node::BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::DecimalLiteral { .. } => "DecimalLiteral",
            Node::Constant { .. } => "Constant",
            Node::FunctionCall(_) => "FunctionCall",
            Node::UnaryExpr { .. } => "UnaryExpr",
            Node::BinaryExpr { .. } => "BinaryExpr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Arity;

    #[test]
    fn it_builds_known_constants() {
        assert_eq!(
            Node::constant("SQRT2"),
            Ok(Node::Constant {
                symbol: ConstantSymbol::Sqrt2
            })
        );
        assert_eq!(
            Node::constant("TAU"),
            Err(SymbolError::UnknownConstant(String::from("TAU")))
        );
    }

    #[test]
    fn it_checks_function_arity_at_construction() {
        let call = Node::function_call("max", vec![Node::decimal("1"), Node::decimal("2")]);
        match call {
            Ok(Node::FunctionCall(call)) => {
                assert_eq!(call.function(), Function::Max);
                assert_eq!(call.args().len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            Node::function_call("sin", vec![]),
            Err(SymbolError::Arity {
                function: "sin",
                expected: Arity {
                    min: 1,
                    max: Some(1)
                },
                found: 0
            })
        );
        assert_eq!(
            Node::function_call("foo", vec![]),
            Err(SymbolError::UnknownFunction(String::from("foo")))
        );
    }

    #[test]
    fn it_flattens_nested_unary_operators() {
        let inner = Node::unary(vec![UnaryOperator::Minus], Node::decimal("1"));
        let outer = Node::unary(vec![UnaryOperator::Plus], inner);
        assert_eq!(
            outer,
            Node::UnaryExpr {
                operators: vec![UnaryOperator::Plus, UnaryOperator::Minus],
                operand: Box::new(Node::decimal("1")),
            }
        );
        assert_eq!(outer.kind(), "UnaryExpr");
    }

    #[test]
    fn it_assigns_operator_tiers() {
        assert_eq!(BinaryOperator::Pow.tier(), Tier::Exponent);
        assert_eq!(BinaryOperator::Mod.tier(), Tier::Multiplicative);
        assert_eq!(BinaryOperator::Div.tier(), Tier::Multiplicative);
        assert_eq!(BinaryOperator::Sub.tier(), Tier::Additive);
        assert!(Tier::Exponent < Tier::Additive);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn it_serializes_with_type_tags() {
        let node = Node::binary(
            Node::constant("PI").unwrap(),
            BinaryOperator::Pow,
            Node::function_call("sqrt", vec![Node::decimal("2")]).unwrap(),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "BinaryExpr",
                "left": { "type": "Constant", "symbol": "PI" },
                "operator": "**",
                "right": {
                    "type": "FunctionCall",
                    "name": "sqrt",
                    "args": [{ "type": "DecimalLiteral", "raw": "2" }]
                }
            })
        );
    }
}
