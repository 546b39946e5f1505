use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    combinator::recognize,
    error::{context, VerboseError},
    sequence::pair,
    IResult,
};
use thiserror::Error;

use super::{
    keyword::Keyword,
    literal::{parse_literal, Literal},
    symbol::{parse_delimiter, parse_operator, Delimiter, Operator},
    whitespace::parse_whitespace,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Keyword(Keyword),
    // Identifiers
    Identifier(String),
    // Symbols
    Operator(Operator),
    Delimiter(Delimiter),
    // Literals
    Literal(Literal),
    // Formatting
    Whitespace(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(kw) => write!(f, "{}", kw),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Delimiter(d) => write!(f, "{}", d),
            Token::Literal(Literal::String(s)) => write!(f, "{:?}", s),
            Token::Literal(Literal::Number(n)) => write!(f, "{}", n),
            Token::Whitespace(ws) => write!(f, "{:?}", ws),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    current_position: usize,
    current_line: usize,
    current_column: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            current_position: 0,
            current_line: 1,   // 1-based
            current_column: 1, // 1-based
        }
    }

    #[tracing::instrument(level = "debug", skip(input))]
    pub fn tokenize(&mut self, input: &str) -> TokenizerResult<Vec<TokenSpan>> {
        let mut tokens = Vec::new();
        let mut remaining = input;

        while !remaining.is_empty() {
            let start_position = self.current_position;
            let start_line = self.current_line;
            let start_column = self.current_column;

            let result = alt((
                // Formatting
                parse_whitespace,
                // Literals
                parse_literal,
                // Code elements
                parse_identifier,
                parse_operator,
                parse_delimiter,
            ))(remaining);

            match result {
                Ok((new_remaining, token)) => {
                    let consumed = &remaining[..(remaining.len() - new_remaining.len())];
                    self.update_position(consumed);

                    tokens.push(TokenSpan {
                        token,
                        start: start_position,
                        end: self.current_position,
                        line: start_line,
                        column: start_column,
                    });

                    remaining = new_remaining;
                }
                Err(e) => {
                    let found = remaining.chars().take(20).collect::<String>();
                    let span = Span {
                        start: self.current_position,
                        end: self.current_position + 1,
                        line: self.current_line,
                        column: self.current_column,
                    };
                    let error = match e {
                        nom::Err::Incomplete(e) => TokenizerError::ParseError {
                            message: format!("Incomplete input, {:?}", e),
                            found,
                            span,
                        },
                        nom::Err::Error(e) | nom::Err::Failure(e) => TokenizerError::ParseError {
                            message: nom::error::convert_error(remaining, e).to_string(),
                            found,
                            span,
                        },
                    };
                    tracing::debug!("{}", error);
                    return Err(error);
                }
            }
        }

        Ok(tokens)
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenSpan {
    pub token: Token,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line: {}, column: {}, start: {}, end: {}",
            self.line, self.column, self.start, self.end
        )
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_identifier(input: &str) -> ParserResult<Token> {
    let (input, id) = context(
        "identifier",
        recognize(pair(
            take_while1(is_identifier_start),
            take_while(is_identifier_char),
        )),
    )(input)?;

    // Check if identifier is not a keyword
    if let Ok(kw) = Keyword::try_from(id) {
        return Ok((input, Token::Keyword(kw)));
    }

    Ok((input, Token::Identifier(id.to_string())))
}

/// Drops formatting tokens so the analyzer only sees significant tokens.
pub fn significant_tokens(spans: Vec<TokenSpan>) -> Vec<Token> {
    spans
        .into_iter()
        .map(|span| span.token)
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect()
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("Parse error: {message} at position {span}")]
    ParseError {
        message: String,
        found: String,
        span: Span,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_for_keyword() {
        let (rest, token) = parse_identifier("this").unwrap();
        assert_eq!(token, Token::Keyword(Keyword::This));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_identifier() {
        let (rest, token) = parse_identifier("my_var123 other").unwrap();
        assert_eq!(token, Token::Identifier("my_var123".to_string()));
        assert_eq!(rest, " other");
    }

    #[test]
    fn test_dollar_identifier() {
        let (rest, token) = parse_identifier("$index + 1").unwrap();
        assert_eq!(token, Token::Identifier("$index".to_string()));
        assert_eq!(rest, " + 1");
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let (_, token) = parse_identifier("thisOne").unwrap();
        assert_eq!(token, Token::Identifier("thisOne".to_string()));
    }

    #[test]
    fn test_tokenizer_with_position() {
        let mut tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("x\n  + other").unwrap();

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[0].token, Token::Identifier("x".to_string()));

        let plus = &tokens[2];
        assert_eq!(plus.token, Token::Operator(Operator::Plus));
        assert_eq!(plus.line, 2);
        assert_eq!(plus.column, 3);
    }

    #[test]
    fn test_member_expression_tokens() {
        let mut tokenizer = Tokenizer::new();
        let tokens = significant_tokens(tokenizer.tokenize("user.name + ' ' + $key").unwrap());

        assert_eq!(
            tokens,
            vec![
                Token::Identifier("user".to_string()),
                Token::Operator(Operator::Dot),
                Token::Identifier("name".to_string()),
                Token::Operator(Operator::Plus),
                Token::Literal(Literal::String(" ".to_string())),
                Token::Operator(Operator::Plus),
                Token::Identifier("$key".to_string()),
            ]
        );
    }

    #[test]
    fn test_object_literal_tokens() {
        let mut tokenizer = Tokenizer::new();
        let tokens = significant_tokens(tokenizer.tokenize("{isActive: page.home}").unwrap());

        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[0], Token::Delimiter(Delimiter::OpenBrace));
        assert_eq!(tokens[2], Token::Delimiter(Delimiter::Colon));
        assert_eq!(tokens[6], Token::Delimiter(Delimiter::CloseBrace));
    }

    #[test]
    fn test_unknown_character_is_error() {
        let mut tokenizer = Tokenizer::new();
        let result = tokenizer.tokenize("a # b");

        match result {
            Err(TokenizerError::ParseError { found, span, .. }) => {
                assert_eq!(found, "# b");
                assert_eq!(span.column, 3);
            }
            other => panic!("expected tokenizer error, got {:?}", other),
        }
    }
}
