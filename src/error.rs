use thiserror::Error;

use crate::config::ConfigError;
use crate::eval::EvalError;
use crate::template::TemplateError;
use crate::view::FetchError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
