//! # Expression Tokenizer
//!
//! Lexes the expression text found in directive attributes and delimiter
//! interpolations into [`token::Token`]s.
//!
//! Each token kind lives in its own module and exposes a nom parser:
//!
//! * [`keyword`]: `true`, `false`, `null`, `undefined`, `this`
//! * [`literal`]: quoted strings and decimal numbers
//! * [`symbol`]: operators and delimiters
//! * [`whitespace`]: formatting, dropped before analysis
//!
//! [`token::Tokenizer`] drives them and records a [`token::Span`] for every
//! token so errors can point at the offending column.

pub mod keyword;
pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
