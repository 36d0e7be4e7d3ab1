use std::fmt::Display;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // standard symbols
    Eof,
    OpenParen,
    CloseParen,
    Comma,
    Equals,

    // operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,

    // more complex stuff
    Identifier(String),
    Number(String),
    Unknown(char),
}

impl Token {
    fn from_char(char_value: char) -> Option<Token> {
        match char_value {
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            ',' => Some(Token::Comma),
            '=' => Some(Token::Equals),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            _ => None,
        }
    }

    /// Short human readable form used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Eof => String::from("end of input"),
            Token::OpenParen => String::from("'('"),
            Token::CloseParen => String::from("')'"),
            Token::Comma => String::from("','"),
            Token::Equals => String::from("'='"),
            Token::Plus => String::from("'+'"),
            Token::Minus => String::from("'-'"),
            Token::Star => String::from("'*'"),
            Token::StarStar => String::from("'**'"),
            Token::Slash => String::from("'/'"),
            Token::Percent => String::from("'%'"),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Number(raw) => format!("number '{}'", raw),
            Token::Unknown(chr) => format!("'{}'", chr.escape_default()),
        }
    }
}

/// Location of a character in the source line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    /// Byte offset, for slicing.
    pub offset: usize,
    /// Character offset, for reporting.
    pub position: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TokenAndSpan {
    pub token: Token,
    pub from: Position,
    pub to: Position,
}

impl Display for TokenAndSpan {
    fn fmt(
        &self,
        formatter: &mut std::fmt::Formatter<'_>,
    ) -> std::result::Result<(), std::fmt::Error> {
        if self.from == self.to {
            write!(formatter, "{:?}[char {}]", self.token, self.from.position)
        } else {
            write!(
                formatter,
                "{:?}[char {} -> char {}]",
                self.token, self.from.position, self.to.position
            )
        }
    }
}

#[derive(Clone, Copy)]
struct CharAndPosition {
    chr: Option<char>,
    offset: usize,
    position: usize,
}

impl From<CharAndPosition> for Position {
    fn from(char_and_position: CharAndPosition) -> Self {
        Position {
            offset: char_and_position.offset,
            position: char_and_position.position,
        }
    }
}

pub trait Tokenizer {
    /// Returns the next token. Once the source is exhausted every call yields `Token::Eof`.
    fn get_token(&mut self) -> TokenAndSpan;
}

pub struct GreedyTokenizer<'a> {
    source: &'a str,
    offset: usize,
    position: usize,
    current_char: CharAndPosition,
}

impl<'a> GreedyTokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut tok = GreedyTokenizer {
            source,
            offset: 0,
            position: 0,
            current_char: CharAndPosition {
                chr: None,
                offset: 0,
                position: 0,
            },
        };

        // start it off
        tok.step_next_char();

        tok
    }

    fn step_next_char(&mut self) {
        let chr = self.source[self.offset..].chars().next();

        self.current_char = CharAndPosition {
            chr,
            offset: self.offset,
            position: self.position,
        };

        if let Some(chr) = chr {
            self.offset += chr.len_utf8();
            self.position += 1;
        }
    }

    /// Looks `n` characters past the current one.
    fn peek_char(&self, n: usize) -> Option<char> {
        self.source[self.offset..].chars().nth(n)
    }

    /// Appends the current char to `buffer`, advances, and returns what was consumed.
    fn consume_into(&mut self, buffer: &mut String) -> CharAndPosition {
        let consumed = self.current_char;
        if let Some(chr) = consumed.chr {
            buffer.push(chr);
        }
        self.step_next_char();
        consumed
    }

    fn single(&mut self, token: Token) -> TokenAndSpan {
        let tok = self.current_char;
        self.step_next_char();
        TokenAndSpan {
            token,
            from: tok.into(),
            to: tok.into(),
        }
    }

    fn read_identifier(&mut self) -> TokenAndSpan {
        let from = self.current_char;
        let mut ident = String::new();
        let mut last = from;

        while is_identifier_like(self.current_char.chr) {
            last = self.consume_into(&mut ident);
        }

        TokenAndSpan {
            token: Token::Identifier(ident),
            from: from.into(),
            to: last.into(),
        }
    }

    fn read_number(&mut self) -> TokenAndSpan {
        let from = self.current_char;
        let mut numstr = String::new();
        let mut last = from;

        while is_digit(self.current_char.chr) {
            last = self.consume_into(&mut numstr);
        }

        // a fraction needs at least one digit after the dot
        if self.current_char.chr == Some('.') && is_digit(self.peek_char(0)) {
            last = self.consume_into(&mut numstr);
            while is_digit(self.current_char.chr) {
                last = self.consume_into(&mut numstr);
            }
        }

        // decimal exponent first, then the binary one
        for &marker in &['e', 'p'] {
            if self.current_char.chr == Some(marker) && self.exponent_follows() {
                last = self.consume_into(&mut numstr);
                if let Some('+') | Some('-') = self.current_char.chr {
                    last = self.consume_into(&mut numstr);
                }
                while is_digit(self.current_char.chr) {
                    last = self.consume_into(&mut numstr);
                }
            }
        }

        TokenAndSpan {
            token: Token::Number(numstr),
            from: from.into(),
            to: last.into(),
        }
    }

    fn exponent_follows(&self) -> bool {
        match self.peek_char(0) {
            Some('+') | Some('-') => is_digit(self.peek_char(1)),
            other => is_digit(other),
        }
    }
}

impl<'a> Tokenizer for GreedyTokenizer<'a> {
    fn get_token(&mut self) -> TokenAndSpan {
        // remove any whitespace
        while self.current_char.chr.map_or(false, char::is_whitespace) {
            self.step_next_char();
        }

        let tok = self.current_char;

        // recognize any identifiers
        if is_identifier_start(tok.chr) {
            return self.read_identifier();
        }

        // recognizing any numeric things
        if is_digit(tok.chr) || (tok.chr == Some('.') && is_digit(self.peek_char(0))) {
            return self.read_number();
        }

        // `*` and `**` share a prefix
        if tok.chr == Some('*') {
            if self.peek_char(0) == Some('*') {
                self.step_next_char();
                self.step_next_char();
                return TokenAndSpan {
                    token: Token::StarStar,
                    from: tok.into(),
                    to: Position {
                        offset: tok.offset + 1,
                        position: tok.position + 1,
                    },
                };
            }
            return self.single(Token::Star);
        }

        // every other case is either a reserved char, EOF or simply an unknown char
        match tok.chr {
            Some(char_value) => match Token::from_char(char_value) {
                Some(token) => self.single(token),
                None => self.single(Token::Unknown(char_value)),
            },
            None => TokenAndSpan {
                token: Token::Eof,
                from: tok.into(),
                to: tok.into(),
            },
        }
    }
}

/// Drains a tokenizer up to and including its `Eof` token.
pub fn collect_tokens(tokenizer: &mut dyn Tokenizer) -> Vec<TokenAndSpan> {
    let mut tokens = vec![];
    loop {
        let token_and_span = tokenizer.get_token();
        let done = token_and_span.token == Token::Eof;
        tokens.push(token_and_span);
        if done {
            return tokens;
        }
    }
}

fn is_digit(chr: Option<char>) -> bool {
    chr.map_or(false, |chr| chr.is_ascii_digit())
}

fn is_identifier_start(chr: Option<char>) -> bool {
    chr.map_or(false, |chr| chr.is_ascii_alphabetic() || chr == '_')
}

fn is_identifier_like(chr: Option<char>) -> bool {
    chr.map_or(false, |chr| chr.is_ascii_alphanumeric() || chr == '_')
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    fn at(position: usize) -> Position {
        Position {
            offset: position,
            position,
        }
    }

    fn tokens_of(source: &str) -> Vec<Token> {
        collect_tokens(&mut GreedyTokenizer::new(source))
            .into_iter()
            .map(|token_and_span| token_and_span.token)
            .collect()
    }

    #[test]
    fn it_handles_empty_buffer() {
        assert_eq!(
            GreedyTokenizer::new("").get_token(),
            TokenAndSpan {
                token: Token::Eof,
                from: at(0),
                to: at(0),
            }
        );

        assert_eq!(
            GreedyTokenizer::new(" \t ").get_token(),
            TokenAndSpan {
                token: Token::Eof,
                from: at(3),
                to: at(3),
            }
        );
    }

    #[test]
    fn it_keeps_returning_eof() {
        let mut tokenizer = GreedyTokenizer::new("1");
        assert_eq!(tokenizer.get_token().token, Token::Number(String::from("1")));
        assert_eq!(tokenizer.get_token().token, Token::Eof);
        assert_eq!(tokenizer.get_token().token, Token::Eof);
    }

    #[test]
    fn it_handles_parens() {
        let mut handler = GreedyTokenizer::new("   ()  ");
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::OpenParen,
                from: at(3),
                to: at(3),
            }
        );
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::CloseParen,
                from: at(4),
                to: at(4),
            }
        );
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Eof,
                from: at(7),
                to: at(7),
            }
        );
    }

    #[test]
    fn it_handles_identifier_token() {
        let mut handler = GreedyTokenizer::new(" SQRT1_2 log10(");
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Identifier(String::from("SQRT1_2")),
                from: at(1),
                to: at(7),
            }
        );
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Identifier(String::from("log10")),
                from: at(9),
                to: at(13),
            }
        );
        assert_eq!(handler.get_token().token, Token::OpenParen);
    }

    #[rstest]
    #[case("1", "1")]
    #[case("3.141592653589793", "3.141592653589793")]
    #[case(".5", ".5")]
    #[case("1.2e5", "1.2e5")]
    #[case("1.2e+5", "1.2e+5")]
    #[case("1.2e-5", "1.2e-5")]
    #[case("3p-2", "3p-2")]
    #[case("1e2p3", "1e2p3")]
    fn it_handles_numeric_token(#[case] source: &str, #[case] raw: &str) {
        let mut handler = GreedyTokenizer::new(source);
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Number(String::from(raw)),
                from: at(0),
                to: at(raw.len() - 1),
            }
        );
        assert_eq!(handler.get_token().token, Token::Eof);
    }

    #[test]
    fn it_stops_numbers_at_incomplete_suffixes() {
        assert_eq!(
            tokens_of("2e"),
            vec![
                Token::Number(String::from("2")),
                Token::Identifier(String::from("e")),
                Token::Eof
            ]
        );
        assert_eq!(
            tokens_of("1."),
            vec![Token::Number(String::from("1")), Token::Unknown('.'), Token::Eof]
        );
        assert_eq!(
            tokens_of("1.2.3"),
            vec![
                Token::Number(String::from("1.2")),
                Token::Number(String::from(".3")),
                Token::Eof
            ]
        );
    }

    #[test]
    fn it_handles_reserved_chars_tokens() {
        assert_eq!(
            tokens_of("+ - * ** / % , = ***"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::StarStar,
                Token::Slash,
                Token::Percent,
                Token::Comma,
                Token::Equals,
                Token::StarStar,
                Token::Star,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn it_reports_char_positions_for_multibyte_input() {
        let mut handler = GreedyTokenizer::new("é 1");
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Unknown('é'),
                from: at(0),
                to: at(0),
            }
        );
        assert_eq!(
            handler.get_token(),
            TokenAndSpan {
                token: Token::Number(String::from("1")),
                from: Position {
                    offset: 3,
                    position: 2
                },
                to: Position {
                    offset: 3,
                    position: 2
                },
            }
        );
    }

    #[test]
    fn it_formats_token_and_span_to_string() {
        let mut handler = GreedyTokenizer::new("(**");
        assert_eq!(format!("{}", handler.get_token()), "OpenParen[char 0]");
        assert_eq!(
            format!("{}", handler.get_token()),
            "StarStar[char 1 -> char 2]"
        );
    }
}
