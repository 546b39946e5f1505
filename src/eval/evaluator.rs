use std::sync::Arc;

use dashmap::DashMap;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{debug, error};

use super::{
    expression::ExpressionEvaluator,
    scope::Scope,
    value::{Value, Vars},
};
use crate::analyzer::{parsers::expression::parse_expression, ParseError, Parser};
use crate::ast::Expression;
use crate::tokenizer::token::{Token, Tokenizer, TokenizerError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Tokenize error: {0}")]
    Tokenize(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("{0} is not defined")]
    UndefinedVariable(String),
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("{0} is not a function")]
    NotCallable(String),
    #[error("Host error: {0}")]
    Host(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

lazy_static! {
    static ref DEFAULT_EVALUATOR: Evaluator = Evaluator::new();
}

/// Parsed expressions kept by [`Evaluator::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Evaluates expression source text.
///
/// Parsed expressions are cached by their source so a template rendered many
/// times, or a repeat body compiled once per item, parses each expression once.
/// Once `capacity` entries are cached, further expressions are parsed on every
/// use instead of being added, so interpolations coming from rendered data
/// cannot grow the cache without bound.
pub struct Evaluator {
    cache: DashMap<String, Arc<Expression>>,
    capacity: usize,
    expression_evaluator: ExpressionEvaluator,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("cached", &self.cache.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: DashMap::new(),
            capacity,
            expression_evaluator: ExpressionEvaluator,
        }
    }

    /// The process-wide evaluator behind [`evaluate`].
    pub fn global() -> &'static Evaluator {
        &DEFAULT_EVALUATOR
    }

    /// Parses `source`, consuming all of it.
    pub fn compile(&self, source: &str) -> EvalResult<Arc<Expression>> {
        if let Some(expression) = self.cache.get(source) {
            return Ok(expression.clone());
        }

        let spans: Vec<_> = Tokenizer::new()
            .tokenize(source)?
            .into_iter()
            .filter(|span| !matches!(span.token, Token::Whitespace(_)))
            .collect();
        let tokens: Vec<Token> = spans.iter().map(|span| span.token.clone()).collect();

        let (pos, expression) = parse_expression().parse(&tokens, 0)?;
        if let Some(span) = spans.get(pos) {
            return Err(EvalError::Parse(ParseError::ParseError {
                message: "unexpected token".to_string(),
                found: span.token.to_string(),
                position: (span.line, span.column),
            }));
        }

        let expression = Arc::new(expression);
        if self.cache.len() < self.capacity {
            self.cache.insert(source.to_string(), expression.clone());
        } else {
            debug!("Expression cache full, not caching `{}`", source.trim());
        }
        Ok(expression)
    }

    pub fn try_evaluate(&self, source: &str, scope: &Scope, context: &Value) -> EvalResult<Value> {
        let expression = self.compile(source)?;
        self.expression_evaluator
            .eval_expression(&expression, scope, context)
    }

    /// Evaluates `source`; failures are logged and yield an empty string.
    pub fn evaluate(&self, source: &str, scope: &Scope, context: &Value) -> Value {
        match self.try_evaluate(source, scope, context) {
            Ok(value) => value,
            Err(e) => {
                error!("Compile error: {} in `{}`", e, source.trim());
                Value::String(String::new())
            }
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Evaluates `expression` with `vars` as its variables and `context` as `this`.
///
/// Never fails: a malformed expression, an unbound name or a runtime error is
/// logged and evaluates to an empty string.
///
/// ```
/// use viewtpl::eval::{evaluate, Value, Vars};
///
/// let mut vars = Vars::new();
/// vars.insert("name".to_string(), Value::from("A"));
/// vars.insert("lastname".to_string(), Value::from("B"));
/// assert_eq!(evaluate("name + ' ' + lastname", &vars, &Value::Undefined), Value::from("A B"));
/// assert_eq!(evaluate("2+3", &Vars::new(), &Value::Undefined), Value::Number(5.0));
/// assert_eq!(evaluate("nope(", &Vars::new(), &Value::Undefined), Value::from(""));
/// ```
pub fn evaluate(expression: &str, vars: &Vars, context: &Value) -> Value {
    Evaluator::global().evaluate(expression, &Scope::from(vars.clone()), context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_caches_by_source() {
        let evaluator = Evaluator::new();
        let first = evaluator.compile("a + 1").unwrap();
        let second = evaluator.compile("a + 1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(evaluator.cached(), 1);
    }

    #[test]
    fn test_cache_stops_growing_at_capacity() {
        let evaluator = Evaluator::with_capacity(2);
        let mut scope = Scope::new();
        scope.insert("a", Value::Number(1.0));
        for i in 0..10 {
            assert_eq!(
                evaluator.evaluate(&format!("a + {}", i), &scope, &Value::Undefined),
                Value::Number(1.0 + i as f64)
            );
        }
        assert_eq!(evaluator.cached(), 2);

        // cached entries are still shared
        let first = evaluator.compile("a + 0").unwrap();
        assert!(Arc::ptr_eq(&first, &evaluator.compile("a + 0").unwrap()));
        assert_eq!(
            format!("{:?}", evaluator),
            "Evaluator { cached: 2, capacity: 2 }"
        );
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let evaluator = Evaluator::new();
        match evaluator.compile("a b") {
            Err(EvalError::Parse(ParseError::ParseError { found, position, .. })) => {
                assert_eq!(found, "b");
                assert_eq!(position, (1, 3));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert_eq!(evaluator.cached(), 0);
    }

    #[test]
    fn test_tokenize_error() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.compile("a # b"),
            Err(EvalError::Tokenize(_))
        ));
    }

    #[test]
    fn test_evaluate_recovers() {
        let evaluator = Evaluator::new();
        let value = evaluator.evaluate("missing.name", &Scope::new(), &Value::Undefined);
        assert_eq!(value, Value::from(""));
        assert!(!value.is_truthy());
    }

    #[test]
    fn test_empty_expression_is_error() {
        let evaluator = Evaluator::new();
        assert!(evaluator
            .try_evaluate("  ", &Scope::new(), &Value::Undefined)
            .is_err());
    }
}
