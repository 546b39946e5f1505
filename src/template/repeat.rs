use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::compiler::Compiler;
use super::directive::DirectiveOutcome;
use super::TemplateError;
use crate::eval::Value;
use crate::markup::Element;
use crate::utils::Props;
use crate::InternalResult;

lazy_static! {
    static ref REPEAT_SYNTAX: Regex =
        Regex::new(r"^\s*([A-Za-z_$][\w$]*)\s+in\s+(.+?)\s*$").unwrap();
}

/// Position of one repeat iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub index: usize,
    pub key: Value,
    pub total: usize,
}

impl Iteration {
    /// `$index`, `$key`, `$total`, `$first`, `$last`, `$even`, `$odd` and
    /// `$middle`, in that order.
    pub fn special_variables(&self) -> [(&'static str, Value); 8] {
        let first = self.index == 0;
        let last = self.index + 1 == self.total;
        let even = self.index % 2 == 0;
        [
            ("$index", Value::from(self.index)),
            ("$key", self.key.clone()),
            ("$total", Value::from(self.total)),
            ("$first", Value::Boolean(first)),
            ("$last", Value::Boolean(last)),
            ("$even", Value::Boolean(even)),
            ("$odd", Value::Boolean(!even)),
            ("$middle", Value::Boolean(!first && !last)),
        ]
    }
}

/// Splits `item in items` into the loop variable and the collection
/// expression.
pub fn parse_repeat(value: &str) -> Result<(String, String), TemplateError> {
    let captures = REPEAT_SYNTAX
        .captures(value)
        .ok_or_else(|| TemplateError::RepeatSyntax {
            value: value.to_string(),
        })?;
    Ok((captures[1].to_string(), captures[2].to_string()))
}

/// `:repeat="item in items"`: renders the element once per entry of an array
/// or object.
///
/// Each iteration compiles the element's markup in its own scope frame holding
/// the loop variable and the special variables; the frame is popped whether or
/// not the iteration succeeds.
#[tracing::instrument(level = "debug", skip(compiler, element, _props))]
pub fn repeat(
    compiler: &mut Compiler,
    element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    let (needle, haystack) = parse_repeat(value)?;

    let entries: Vec<(Value, Value)> = match compiler.compile(&haystack) {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (Value::from(index), item))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, item)| (Value::String(key), item))
            .collect(),
        other => {
            return Err(TemplateError::RepeatType {
                expression: haystack,
                found: other.type_name().to_string(),
            }
            .into())
        }
    };

    let total = entries.len();
    if total == 0 {
        debug!("Empty collection `{}`, removing <{}>", haystack, element.name);
        return Ok(DirectiveOutcome::Remove);
    }

    let template = element.outer_html();
    let mut output = String::new();
    for (index, (key, item)) in entries.into_iter().enumerate() {
        let iteration = Iteration { index, key, total };

        let scope = compiler.scope_mut();
        scope.push_frame();
        for (name, value) in iteration.special_variables() {
            scope.insert(name, value);
        }
        scope.insert(needle.as_str(), item);

        let rendered = compiler.render_fragment(&template);
        compiler.scope_mut().pop_frame();
        output.push_str(&rendered?);
    }

    Ok(DirectiveOutcome::Replace(output))
}
