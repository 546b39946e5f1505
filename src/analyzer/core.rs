use thiserror::Error;

/// A parser over a slice of already-lexed input items.
///
/// Parsers are position based: they receive the whole input and the index to
/// start at, and return the index after the consumed items.
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error: {message}, found {found} at {}:{}", .position.0, .position.1)]
    ParseError {
        message: String,
        found: String,
        position: (usize, usize),
    },
    #[error("EOF")]
    EOF,
    #[error("Unexpected")]
    Unexpected,
    #[error("No alternative")]
    NoAlternative,
    #[error("Fail: {0}")]
    Fail(String),
    #[error("WithContext: {message}, {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}
