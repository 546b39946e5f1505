pub mod common;
pub use common::*;

pub mod expression;
