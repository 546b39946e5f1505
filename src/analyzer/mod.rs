//! # Expression Analyzer
//!
//! Turns the token stream produced by [`crate::tokenizer`] into an
//! [`ast::Expression`] using a small parser-combinator library.
//!
//! * [`core`]: the [`Parser`] trait and [`ParseError`]
//! * [`combinators`] / [`prelude`]: composable building blocks
//! * [`parsers`]: the expression grammar itself
//!
//! ```text
//! Expression text → Tokenizer → Analyzer → ast::Expression → Evaluator
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use viewtpl::analyzer::prelude::*;
//! use viewtpl::analyzer::Parser;
//! use viewtpl::tokenizer::token::Token;
//!
//! let parser = equal(Token::Identifier("items".to_string()));
//! let tokens = vec![Token::Identifier("items".to_string())];
//! assert!(parser.parse(&tokens, 0).is_ok());
//! ```

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;

pub use crate::ast;
