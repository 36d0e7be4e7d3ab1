use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::error::{ParseError, ParseErrorKind};
use crate::precedence;
use crate::symbols::ConstantSymbol;
use crate::tok::{collect_tokens, GreedyTokenizer, Token, TokenAndSpan, Tokenizer};

/// Parses `text` as a whole expression with an optional trailing `=`.
pub fn parse(text: &str, max_depth: usize) -> Result<Node, ParseError> {
    RecursiveDescentParser::new(Box::new(GreedyTokenizer::new(text)), max_depth).parse_main()
}

pub struct RecursiveDescentParser {
    tokens: Vec<TokenAndSpan>,
    cursor: usize,
    depth: usize,
    max_depth: usize,
}

impl RecursiveDescentParser {
    pub fn new(mut tokenizer: Box<dyn Tokenizer + '_>, max_depth: usize) -> Self {
        Self {
            tokens: collect_tokens(tokenizer.as_mut()),
            cursor: 0,
            depth: 0,
            max_depth,
        }
    }

    /// `expression ['='] EOF`
    pub fn parse_main(&mut self) -> Result<Node, ParseError> {
        let expression = self.parse_expression()?;

        if *self.peek() == Token::Equals {
            self.advance();
        }

        match self.peek() {
            Token::Eof => Ok(expression),
            other => Err(self.error_here(ParseErrorKind::TrailingInput {
                found: other.describe(),
                at_operator: binary_operator(other).is_some(),
            })),
        }
    }

    /// `operand (binaryOperator operand)*`, nested afterwards by operator tier.
    ///
    /// Every operator after the first operand takes one nesting level until the
    /// expression ends, since the resolved tree can be that much deeper.
    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let entry_depth = self.depth;
        let result = self.parse_operator_chain();
        self.depth = entry_depth;
        result
    }

    fn parse_operator_chain(&mut self) -> Result<Node, ParseError> {
        let first = self.parse_operand()?;
        let mut rest = vec![];

        while let Some(operator) = binary_operator(self.peek()) {
            if self.depth >= self.max_depth {
                return Err(self.error_here(ParseErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                }));
            }

            let checkpoint = self.cursor;
            self.advance();
            self.depth += 1;

            match self.parse_operand() {
                Ok(operand) => rest.push((operator, operand)),
                // the operator belongs to whatever follows the expression
                Err(error) if error.is_mismatch() => {
                    log::trace!(
                        "no operand after '{}' ({}), backtracking",
                        operator.symbol(),
                        error
                    );
                    self.cursor = checkpoint;
                    self.depth -= 1;
                    break;
                }
                Err(error) => return Err(error),
            }
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(precedence::resolve(first, rest))
        }
    }

    /// `sign (atomic | parenthesized) | parenthesized | atomic`, at most one sign.
    fn parse_operand(&mut self) -> Result<Node, ParseError> {
        let sign = match self.peek() {
            Token::Plus => Some(UnaryOperator::Plus),
            Token::Minus => Some(UnaryOperator::Minus),
            _ => None,
        };

        match sign {
            Some(operator) => {
                self.advance();
                let operand = if *self.peek() == Token::OpenParen {
                    self.parse_parenthesized()?
                } else {
                    self.parse_atomic()?
                };
                Ok(Node::unary(vec![operator], operand))
            }
            None if *self.peek() == Token::OpenParen => self.parse_parenthesized(),
            None => self.parse_atomic(),
        }
    }

    fn parse_parenthesized(&mut self) -> Result<Node, ParseError> {
        self.nested(|parser| {
            parser.expect(&Token::OpenParen, "'('")?;
            let inner = parser.parse_expression()?;
            parser.expect(&Token::CloseParen, "')'")?;
            Ok(inner)
        })
    }

    /// `functionCall | constant | decimal`
    fn parse_atomic(&mut self) -> Result<Node, ParseError> {
        let current = self.current().clone();
        let position = current.from.position;

        match current.token {
            Token::Identifier(name) if *self.peek_ahead(1) == Token::OpenParen => {
                self.parse_function_call(&name, position)
            }
            Token::Identifier(name) if ConstantSymbol::is_candidate(&name) => {
                self.advance();
                Node::constant(&name).map_err(|error| ParseError::new(position, error.into()))
            }
            Token::Number(raw) => {
                self.advance();
                Ok(Node::decimal(raw))
            }
            other => Err(ParseError::new(
                position,
                ParseErrorKind::Mismatch {
                    expected: "a number, constant or function call",
                    found: other.describe(),
                },
            )),
        }
    }

    fn parse_function_call(&mut self, name: &str, position: usize) -> Result<Node, ParseError> {
        // the name itself
        self.advance();

        let args = self.nested(|parser| {
            parser.expect(&Token::OpenParen, "'('")?;
            let args = parser.parse_arguments()?;
            parser.expect(&Token::CloseParen, "')'")?;
            Ok(args)
        })?;

        Node::function_call(name, args).map_err(|error| ParseError::new(position, error.into()))
    }

    /// `[expression (',' expression)*]`
    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = vec![];
        if *self.peek() == Token::CloseParen {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if *self.peek() == Token::Comma {
                self.advance();
            } else {
                return Ok(args);
            }
        }
    }

    /// Runs `rule` one nesting level deeper, failing once `max_depth` is reached.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error_here(ParseErrorKind::NestingTooDeep {
                limit: self.max_depth,
            }));
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> Result<(), ParseError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(ParseErrorKind::Mismatch {
                expected: description,
                found: self.peek().describe(),
            }))
        }
    }

    // the token list always ends with `Eof` and the cursor never moves past it

    fn current(&self) -> &TokenAndSpan {
        &self.tokens[self.cursor]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn peek_ahead(&self, distance: usize) -> &Token {
        let index = (self.cursor + distance).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn advance(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.current().from.position, kind)
    }
}

fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::StarStar => Some(BinaryOperator::Pow),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        _ => None,
    }
}
