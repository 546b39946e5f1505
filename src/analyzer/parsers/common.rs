use super::super::{core::*, prelude::*};
use crate::ast;
use crate::tokenizer::{
    keyword::Keyword,
    literal::Literal,
    symbol::{Delimiter, Operator},
    token::Token,
};

pub fn parse_identifier() -> impl Parser<Token, String> {
    with_context(
        satisfy(|token| match token {
            Token::Identifier(s) => Some(s.clone()),
            _ => None,
        }),
        "identifier",
    )
}

/// Property names after `.` and object keys may also be reserved words.
pub fn parse_property_name() -> impl Parser<Token, String> {
    with_context(
        satisfy(|token| match token {
            Token::Identifier(s) => Some(s.clone()),
            Token::Keyword(k) => Some(k.to_string()),
            _ => None,
        }),
        "property name",
    )
}

pub fn parse_literal() -> impl Parser<Token, ast::Literal> {
    with_context(
        satisfy(|token| match token {
            Token::Literal(Literal::Number(n)) => Some(ast::Literal::Number(*n)),
            Token::Literal(Literal::String(s)) => Some(ast::Literal::String(s.clone())),
            Token::Keyword(Keyword::True) => Some(ast::Literal::Boolean(true)),
            Token::Keyword(Keyword::False) => Some(ast::Literal::Boolean(false)),
            Token::Keyword(Keyword::Null) => Some(ast::Literal::Null),
            Token::Keyword(Keyword::Undefined) => Some(ast::Literal::Undefined),
            _ => None,
        }),
        "literal",
    )
}

pub fn parse_operator(operator: Operator) -> impl Parser<Token, Token> {
    equal(Token::Operator(operator))
}

pub fn parse_delimiter(delimiter: Delimiter) -> impl Parser<Token, Token> {
    equal(Token::Delimiter(delimiter))
}

pub fn parse_open_paren() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::OpenParen)
}

pub fn parse_close_paren() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::CloseParen)
}

pub fn parse_open_bracket() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::OpenBracket)
}

pub fn parse_close_bracket() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::CloseBracket)
}

pub fn parse_open_brace() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::OpenBrace)
}

pub fn parse_close_brace() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::CloseBrace)
}

pub fn parse_comma() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::Comma)
}

pub fn parse_colon() -> impl Parser<Token, Token> {
    parse_delimiter(Delimiter::Colon)
}

pub fn parse_dot() -> impl Parser<Token, Token> {
    with_context(parse_operator(Operator::Dot), "dot")
}
