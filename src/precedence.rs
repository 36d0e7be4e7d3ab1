//! Nests a flat `operand (operator operand)*` sequence by operator tier.
//!
//! Operators within a tier fold left to right, exponents included:
//! `2 ** 3 ** 2` is `(2 ** 3) ** 2`.

use crate::ast::{BinaryOperator, Node, Tier};

/// The first operand, then each pending operator with the operand to its right.
///
/// Tiers only weaken from the top of `rest` downwards: pushing a weaker
/// operator first flushes every stronger run.
struct Stacks {
    first: Node,
    rest: Vec<(BinaryOperator, Node)>,
}

impl Stacks {
    /// Folds the run of `tier` operators on top of the stack into the operand
    /// below it.
    fn flush(mut self, tier: Tier) -> Self {
        let split = self
            .rest
            .iter()
            .rposition(|(operator, _)| operator.tier() != tier)
            .map_or(0, |index| index + 1);
        let run = self.rest.split_off(split);
        if run.is_empty() {
            return self;
        }

        let fold = |base: Node| {
            run.into_iter()
                .fold(base, |left, (operator, right)| Node::binary(left, operator, right))
        };
        match self.rest.pop() {
            Some((operator, base)) => {
                let folded = fold(base);
                self.rest.push((operator, folded));
                self
            }
            None => Stacks {
                first: fold(self.first),
                rest: self.rest,
            },
        }
    }
}

pub fn resolve(first: Node, rest: Vec<(BinaryOperator, Node)>) -> Node {
    let operator_count = rest.len();
    let mut stacks = Stacks {
        first,
        rest: Vec::with_capacity(operator_count),
    };

    for (operator, operand) in rest {
        stacks = match operator.tier() {
            Tier::Exponent => stacks,
            Tier::Multiplicative => stacks.flush(Tier::Exponent),
            Tier::Additive => stacks.flush(Tier::Exponent).flush(Tier::Multiplicative),
        };
        stacks.rest.push((operator, operand));
    }

    let stacks = stacks
        .flush(Tier::Exponent)
        .flush(Tier::Multiplicative)
        .flush(Tier::Additive);

    log::trace!("resolved {} operator(s) into one tree", operator_count);
    debug_assert!(stacks.rest.is_empty(), "unresolved operators left over");

    stacks.first
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn num(raw: &str) -> Node {
        Node::decimal(raw)
    }

    #[test]
    fn it_returns_a_lone_operand() {
        assert_eq!(resolve(num("1"), vec![]), num("1"));
    }

    #[test]
    fn it_folds_additive_runs_left() {
        let tree = resolve(
            num("1"),
            vec![(BinaryOperator::Sub, num("2")), (BinaryOperator::Sub, num("3"))],
        );
        assert_eq!(
            tree,
            Node::binary(
                Node::binary(num("1"), BinaryOperator::Sub, num("2")),
                BinaryOperator::Sub,
                num("3")
            )
        );
    }

    #[test]
    fn it_binds_multiplication_tighter_than_addition() {
        let tree = resolve(
            num("1"),
            vec![
                (BinaryOperator::Add, num("2")),
                (BinaryOperator::Mul, num("3")),
                (BinaryOperator::Sub, num("4")),
            ],
        );
        assert_eq!(
            tree,
            Node::binary(
                Node::binary(
                    num("1"),
                    BinaryOperator::Add,
                    Node::binary(num("2"), BinaryOperator::Mul, num("3"))
                ),
                BinaryOperator::Sub,
                num("4")
            )
        );
    }

    #[test]
    fn it_folds_exponent_chains_left() {
        let tree = resolve(
            num("2"),
            vec![(BinaryOperator::Pow, num("3")), (BinaryOperator::Pow, num("2"))],
        );
        assert_eq!(
            tree,
            Node::binary(
                Node::binary(num("2"), BinaryOperator::Pow, num("3")),
                BinaryOperator::Pow,
                num("2")
            )
        );
    }

    #[test]
    fn it_resolves_all_three_tiers() {
        // 1 + 2 * 3 ** 2 % 5 - 4
        let tree = resolve(
            num("1"),
            vec![
                (BinaryOperator::Add, num("2")),
                (BinaryOperator::Mul, num("3")),
                (BinaryOperator::Pow, num("2")),
                (BinaryOperator::Mod, num("5")),
                (BinaryOperator::Sub, num("4")),
            ],
        );
        let product = Node::binary(
            num("2"),
            BinaryOperator::Mul,
            Node::binary(num("3"), BinaryOperator::Pow, num("2")),
        );
        assert_eq!(
            tree,
            Node::binary(
                Node::binary(
                    num("1"),
                    BinaryOperator::Add,
                    Node::binary(product, BinaryOperator::Mod, num("5"))
                ),
                BinaryOperator::Sub,
                num("4")
            )
        );
        assert_eq!(
            tree.evaluate().map(crate::decimal::to_canonical_string),
            Ok(String::from("0"))
        );
    }

    fn operator_count(node: &Node) -> usize {
        match node {
            Node::BinaryExpr { left, right, .. } => {
                1 + operator_count(left) + operator_count(right)
            }
            _ => 0,
        }
    }

    #[test]
    fn it_keeps_every_operator_across_tier_changes() {
        // 2 ** 2 * 3 ** 2 + 1 - 4 / 2 ** 1 % 3
        let rest = vec![
            (BinaryOperator::Pow, num("2")),
            (BinaryOperator::Mul, num("3")),
            (BinaryOperator::Pow, num("2")),
            (BinaryOperator::Add, num("1")),
            (BinaryOperator::Sub, num("4")),
            (BinaryOperator::Div, num("2")),
            (BinaryOperator::Pow, num("1")),
            (BinaryOperator::Mod, num("3")),
        ];
        let tree = resolve(num("2"), rest);
        assert_eq!(operator_count(&tree), 8);
        assert_eq!(
            tree.evaluate().map(crate::decimal::to_canonical_string),
            Ok(String::from("35"))
        );
    }
}
