//! Expression grammar, lowest precedence first:
//!
//! ```text
//! conditional    := logical_or ("?" expression ":" expression)?
//! logical_or     := logical_and ("||" logical_and)*
//! logical_and    := equality ("&&" equality)*
//! equality       := comparison (("===" | "!==" | "==" | "!=") comparison)*
//! comparison     := additive (("<" | "<=" | ">" | ">=") additive)*
//! additive       := multiplicative (("+" | "-") multiplicative)*
//! multiplicative := unary (("*" | "/" | "%") unary)*
//! unary          := ("!" | "-" | "+")* postfix
//! postfix        := primary ("." name | "[" expression "]" | "(" arguments ")")*
//! ```

use std::cell::Cell;

use super::{
    super::{core::*, prelude::*},
    *,
};
use crate::ast;
use crate::eval::value::format_number;
use crate::tokenizer::{
    keyword::Keyword,
    literal::Literal,
    symbol::{Delimiter, Operator},
    token::Token,
};

/// Deepest nesting of parentheses, brackets, braces, call arguments and
/// conditional branches accepted in one expression.
pub const MAX_NESTING: usize = 32;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

pub fn parse_expression() -> impl Parser<Token, ast::Expression> {
    with_context(lazy(parse_conditional), "expression")
}

/// A sub-expression inside a bracket, an argument list or a conditional
/// branch. Recursion goes through this type so the rule types stay finite.
#[derive(Clone, Copy)]
struct Nested;

struct NestingGuard;

impl NestingGuard {
    fn enter() -> (Self, usize) {
        let depth = NESTING.with(|nesting| {
            let depth = nesting.get() + 1;
            nesting.set(depth);
            depth
        });
        (NestingGuard, depth)
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.with(|nesting| nesting.set(nesting.get().saturating_sub(1)));
    }
}

impl Parser<Token, ast::Expression> for Nested {
    fn parse(&self, input: &[Token], pos: usize) -> ParseResult<ast::Expression> {
        let (_guard, depth) = NestingGuard::enter();
        if depth > MAX_NESTING {
            return Err(ParseError::Fail(format!(
                "expression nested deeper than {} levels",
                MAX_NESTING
            )));
        }
        parse_expression().parse(input, pos)
    }
}

fn fold_binary(
    first: ast::Expression,
    rest: Vec<(ast::BinaryOperator, ast::Expression)>,
) -> ast::Expression {
    rest.into_iter()
        .fold(first, |left, (op, right)| ast::Expression::binary(op, left, right))
}

fn binary_operator(
    operator: Operator,
    op: ast::BinaryOperator,
) -> impl Parser<Token, ast::BinaryOperator> {
    map(parse_operator(operator), move |_| op)
}

fn parse_conditional() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_logical_or(),
                optional(tuple2(
                    preceded(
                        as_unit(parse_operator(Operator::Question)),
                        Nested,
                    ),
                    preceded(as_unit(parse_colon()), Nested),
                )),
            ),
            |(test, branches)| match branches {
                Some((consequent, alternate)) => ast::Expression::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                },
                None => test,
            },
        ),
        "conditional",
    )
}

fn parse_logical_or() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_logical_and(),
                many(tuple2(
                    binary_operator(Operator::Or, ast::BinaryOperator::Or),
                    parse_logical_and(),
                )),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "logical or",
    )
}

fn parse_logical_and() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_equality(),
                many(tuple2(
                    binary_operator(Operator::And, ast::BinaryOperator::And),
                    parse_equality(),
                )),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "logical and",
    )
}

fn parse_equality() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_comparison(),
                many(tuple2(parse_operator_equality(), parse_comparison())),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "equality",
    )
}

fn parse_operator_equality() -> impl Parser<Token, ast::BinaryOperator> {
    with_context(
        choice(vec![
            Box::new(binary_operator(
                Operator::StrictEqual,
                ast::BinaryOperator::StrictEqual,
            )),
            Box::new(binary_operator(
                Operator::StrictNotEqual,
                ast::BinaryOperator::StrictNotEqual,
            )),
            Box::new(binary_operator(
                Operator::EqualEqual,
                ast::BinaryOperator::Equal,
            )),
            Box::new(binary_operator(
                Operator::NotEqual,
                ast::BinaryOperator::NotEqual,
            )),
        ]),
        "equality operator",
    )
}

fn parse_comparison() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_additive(),
                many(tuple2(parse_operator_comparison(), parse_additive())),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "comparison",
    )
}

fn parse_operator_comparison() -> impl Parser<Token, ast::BinaryOperator> {
    with_context(
        choice(vec![
            Box::new(binary_operator(
                Operator::GreaterEqual,
                ast::BinaryOperator::GreaterThanEqual,
            )),
            Box::new(binary_operator(
                Operator::Greater,
                ast::BinaryOperator::GreaterThan,
            )),
            Box::new(binary_operator(
                Operator::LessEqual,
                ast::BinaryOperator::LessThanEqual,
            )),
            Box::new(binary_operator(
                Operator::Less,
                ast::BinaryOperator::LessThan,
            )),
        ]),
        "comparison operator",
    )
}

fn parse_additive() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_multiplicative(),
                many(tuple2(
                    choice(vec![
                        Box::new(binary_operator(Operator::Plus, ast::BinaryOperator::Add)),
                        Box::new(binary_operator(
                            Operator::Minus,
                            ast::BinaryOperator::Subtract,
                        )),
                    ]),
                    parse_multiplicative(),
                )),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "additive",
    )
}

fn parse_multiplicative() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(
                parse_unary(),
                many(tuple2(
                    choice(vec![
                        Box::new(binary_operator(
                            Operator::Multiply,
                            ast::BinaryOperator::Multiply,
                        )),
                        Box::new(binary_operator(
                            Operator::Divide,
                            ast::BinaryOperator::Divide,
                        )),
                        Box::new(binary_operator(
                            Operator::Modulo,
                            ast::BinaryOperator::Modulo,
                        )),
                    ]),
                    parse_unary(),
                )),
            ),
            |(first, rest)| fold_binary(first, rest),
        ),
        "multiplicative",
    )
}

fn parse_unary_operator() -> impl Parser<Token, ast::UnaryOperator> {
    satisfy(|token| match token {
        Token::Operator(Operator::Not) => Some(ast::UnaryOperator::Not),
        Token::Operator(Operator::Minus) => Some(ast::UnaryOperator::Negate),
        Token::Operator(Operator::Plus) => Some(ast::UnaryOperator::Plus),
        _ => None,
    })
}

// prefix operators apply innermost-last: `!-a` is `!(-a)`
fn parse_unary() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(many(parse_unary_operator()), parse_postfix()),
            |(operators, operand)| {
                operators
                    .into_iter()
                    .rev()
                    .fold(operand, |operand, op| ast::Expression::Unary {
                        op,
                        operand: Box::new(operand),
                    })
            },
        ),
        "unary",
    )
}

enum PostfixOperation {
    Member(String),
    Index(ast::Expression),
    Call(Vec<ast::Expression>),
}

fn parse_postfix_operation() -> impl Parser<Token, PostfixOperation> {
    choice(vec![
        Box::new(map(
            preceded(as_unit(parse_dot()), parse_property_name()),
            PostfixOperation::Member,
        )),
        Box::new(map(
            delimited(
                as_unit(parse_open_bracket()),
                Nested,
                as_unit(parse_close_bracket()),
            ),
            PostfixOperation::Index,
        )),
        Box::new(map(parse_arguments(), PostfixOperation::Call)),
    ])
}

fn parse_postfix() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            tuple2(parse_primary(), many(parse_postfix_operation())),
            |(primary, operations)| {
                operations
                    .into_iter()
                    .fold(primary, |object, operation| match operation {
                        PostfixOperation::Member(property) => ast::Expression::Member {
                            object: Box::new(object),
                            property,
                        },
                        PostfixOperation::Index(index) => ast::Expression::Index {
                            object: Box::new(object),
                            index: Box::new(index),
                        },
                        PostfixOperation::Call(arguments) => ast::Expression::Call {
                            callee: Box::new(object),
                            arguments,
                        },
                    })
            },
        ),
        "postfix",
    )
}

pub fn parse_arguments() -> impl Parser<Token, Vec<ast::Expression>> {
    with_context(
        delimited(
            as_unit(parse_open_paren()),
            separated_list(Nested, as_unit(parse_comma())),
            as_unit(parse_close_paren()),
        ),
        "arguments",
    )
}

fn parse_primary() -> impl Parser<Token, ast::Expression> {
    with_context(
        choice(vec![
            Box::new(map(parse_literal(), ast::Expression::Literal)),
            Box::new(map(equal(Token::Keyword(Keyword::This)), |_| {
                ast::Expression::This
            })),
            Box::new(map(parse_identifier(), ast::Expression::Identifier)),
            Box::new(parse_array()),
            Box::new(parse_object()),
            Box::new(delimited(
                as_unit(parse_open_paren()),
                Nested,
                as_unit(parse_close_paren()),
            )),
        ]),
        "primary",
    )
}

fn parse_array() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            delimited(
                as_unit(parse_open_bracket()),
                separated_list(Nested, as_unit(parse_comma())),
                as_unit(parse_close_bracket()),
            ),
            ast::Expression::Array,
        ),
        "array",
    )
}

fn parse_object_key() -> impl Parser<Token, String> {
    with_context(
        choice(vec![
            Box::new(parse_property_name()),
            Box::new(satisfy(|token| match token {
                Token::Literal(Literal::String(s)) => Some(s.clone()),
                Token::Literal(Literal::Number(n)) => Some(format_number(*n)),
                _ => None,
            })),
        ]),
        "object key",
    )
}

fn parse_object() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            delimited(
                as_unit(parse_delimiter(Delimiter::OpenBrace)),
                separated_list(
                    map(
                        tuple3(
                            parse_object_key(),
                            as_unit(parse_colon()),
                            Nested,
                        ),
                        |(key, _, value)| (key, value),
                    ),
                    as_unit(parse_comma()),
                ),
                as_unit(parse_close_brace()),
            ),
            ast::Expression::Object,
        ),
        "object",
    )
}
