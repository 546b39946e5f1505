//! # Expression Evaluation
//!
//! Interprets the expressions embedded in templates.
//!
//! * [`value`]: the dynamic [`Value`] model and its coercions
//! * [`scope`]: the frame stack variables are resolved against
//! * [`expression`]: the tree-walking [`ExpressionEvaluator`]
//! * [`evaluator`]: source-level [`Evaluator`] with a parse cache, and the
//!   recovering [`evaluate`] entry point

pub mod evaluator;
pub mod expression;
pub mod scope;
pub mod value;

pub use evaluator::{evaluate, EvalError, EvalResult, Evaluator};
pub use expression::ExpressionEvaluator;
pub use scope::Scope;
pub use value::{HostFunction, Value, Vars};
