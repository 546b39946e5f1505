use std::cmp::Ordering;

use tracing::debug;

use super::evaluator::{EvalError, EvalResult};
use super::scope::Scope;
use super::value::{format_number, Value, Vars};
use crate::ast::{BinaryOperator, Expression, Literal, UnaryOperator};

/// Tree-walking interpreter for parsed expressions.
///
/// Identifiers resolve against the [`Scope`] only; the template context is
/// reachable through `this` and is the receiver of bare calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn eval_expression(
        &self,
        expr: &Expression,
        scope: &Scope,
        context: &Value,
    ) -> EvalResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(Self::eval_literal(lit)),
            Expression::Identifier(name) => self.eval_identifier(name, scope),
            Expression::This => Ok(context.clone()),
            Expression::Array(items) => Ok(Value::Array(
                self.eval_arguments(items, scope, context)?,
            )),
            Expression::Object(entries) => {
                let mut map = Vars::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval_expression(value, scope, context)?);
                }
                Ok(Value::Object(map))
            }
            Expression::Member { object, property } => self
                .eval_expression(object, scope, context)?
                .get_property(property),
            Expression::Index { object, index } => {
                let object = self.eval_expression(object, scope, context)?;
                let key = Self::property_key(&self.eval_expression(index, scope, context)?);
                object.get_property(&key)
            }
            Expression::Call { callee, arguments } => {
                self.eval_call(callee, arguments, scope, context)
            }
            Expression::Unary { op, operand } => {
                let value = self.eval_expression(operand, scope, context)?;
                Ok(Self::eval_unary(*op, &value))
            }
            Expression::Binary { op, left, right } => {
                self.eval_binary_op(*op, left, right, scope, context)
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expression(test, scope, context)?.is_truthy() {
                    self.eval_expression(consequent, scope, context)
                } else {
                    self.eval_expression(alternate, scope, context)
                }
            }
        }
    }

    fn eval_literal(lit: &Literal) -> Value {
        match lit {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
            Literal::Undefined => Value::Undefined,
        }
    }

    fn eval_identifier(&self, name: &str, scope: &Scope) -> EvalResult<Value> {
        scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    fn eval_arguments(
        &self,
        arguments: &[Expression],
        scope: &Scope,
        context: &Value,
    ) -> EvalResult<Vec<Value>> {
        arguments
            .iter()
            .map(|argument| self.eval_expression(argument, scope, context))
            .collect()
    }

    fn property_key(value: &Value) -> String {
        match value {
            Value::Number(n) => format_number(*n),
            other => other.to_js_string(),
        }
    }

    fn eval_call(
        &self,
        callee: &Expression,
        arguments: &[Expression],
        scope: &Scope,
        context: &Value,
    ) -> EvalResult<Value> {
        // method calls bind the object they were read from
        let (receiver, name, function) = match callee {
            Expression::Member { object, property } => {
                let receiver = self.eval_expression(object, scope, context)?;
                let function = receiver.get_property(property)?;
                (receiver, property.clone(), function)
            }
            Expression::Index { object, index } => {
                let receiver = self.eval_expression(object, scope, context)?;
                let key = Self::property_key(&self.eval_expression(index, scope, context)?);
                let function = receiver.get_property(&key)?;
                (receiver, key, function)
            }
            Expression::Identifier(name) => (
                context.clone(),
                name.clone(),
                self.eval_identifier(name, scope)?,
            ),
            other => (
                context.clone(),
                "expression".to_string(),
                self.eval_expression(other, scope, context)?,
            ),
        };
        let arguments = self.eval_arguments(arguments, scope, context)?;

        match function {
            Value::Function(f) => f.call(&receiver, &arguments),
            Value::Undefined => builtin_method(&receiver, &name, &arguments)
                .unwrap_or_else(|| Err(EvalError::NotCallable(name))),
            _ => Err(EvalError::NotCallable(name)),
        }
    }

    fn eval_unary(op: UnaryOperator, value: &Value) -> Value {
        match op {
            UnaryOperator::Not => Value::Boolean(!value.is_truthy()),
            UnaryOperator::Negate => Value::Number(-value.to_number()),
            UnaryOperator::Plus => Value::Number(value.to_number()),
        }
    }

    fn eval_binary_op(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        scope: &Scope,
        context: &Value,
    ) -> EvalResult<Value> {
        let left_val = self.eval_expression(left, scope, context)?;

        // short circuit returns the deciding operand
        match op {
            BinaryOperator::And if !left_val.is_truthy() => return Ok(left_val),
            BinaryOperator::Or if left_val.is_truthy() => return Ok(left_val),
            BinaryOperator::And | BinaryOperator::Or => {
                return self.eval_expression(right, scope, context)
            }
            _ => {}
        }

        let right_val = self.eval_expression(right, scope, context)?;
        debug!("{:?} {} {:?}", left_val, op, right_val);

        Ok(match op {
            BinaryOperator::Add => Self::eval_add(&left_val, &right_val),
            BinaryOperator::Subtract => Value::Number(left_val.to_number() - right_val.to_number()),
            BinaryOperator::Multiply => Value::Number(left_val.to_number() * right_val.to_number()),
            BinaryOperator::Divide => Value::Number(left_val.to_number() / right_val.to_number()),
            BinaryOperator::Modulo => Value::Number(left_val.to_number() % right_val.to_number()),
            BinaryOperator::StrictEqual => Value::Boolean(left_val == right_val),
            BinaryOperator::StrictNotEqual => Value::Boolean(left_val != right_val),
            BinaryOperator::Equal => Value::Boolean(loose_equals(&left_val, &right_val)),
            BinaryOperator::NotEqual => Value::Boolean(!loose_equals(&left_val, &right_val)),
            BinaryOperator::LessThan => Value::Boolean(matches!(
                compare(&left_val, &right_val),
                Some(Ordering::Less)
            )),
            BinaryOperator::GreaterThan => Value::Boolean(matches!(
                compare(&left_val, &right_val),
                Some(Ordering::Greater)
            )),
            BinaryOperator::LessThanEqual => Value::Boolean(matches!(
                compare(&left_val, &right_val),
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOperator::GreaterThanEqual => Value::Boolean(matches!(
                compare(&left_val, &right_val),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOperator::And | BinaryOperator::Or => unreachable!("handled above"),
        })
    }

    fn eval_add(left: &Value, right: &Value) -> Value {
        let concatenates = |v: &Value| {
            matches!(
                v,
                Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
            )
        };
        if concatenates(left) || concatenates(right) {
            Value::String(left.to_js_string() + &right.to_js_string())
        } else {
            Value::Number(left.to_number() + right.to_number())
        }
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (l, r) if l.is_nullish() || r.is_nullish() => l.is_nullish() && r.is_nullish(),
        (Value::Boolean(b), other) | (other, Value::Boolean(b)) => {
            loose_equals(&Value::Number(if *b { 1.0 } else { 0.0 }), other)
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == Value::String(s.clone()).to_number()
        }
        (Value::Array(_) | Value::Object(_), Value::String(_) | Value::Number(_)) => {
            loose_equals(&Value::String(left.to_js_string()), right)
        }
        (Value::String(_) | Value::Number(_), Value::Array(_) | Value::Object(_)) => {
            loose_equals(left, &Value::String(right.to_js_string()))
        }
        _ => left == right,
    }
}

/// The few host methods templates commonly call on plain values.
fn builtin_method(receiver: &Value, name: &str, arguments: &[Value]) -> Option<EvalResult<Value>> {
    let argument = |i: usize| arguments.get(i).cloned().unwrap_or_default();
    let value = match (receiver, name) {
        (Value::String(s), "toUpperCase") => Value::String(s.to_uppercase()),
        (Value::String(s), "toLowerCase") => Value::String(s.to_lowercase()),
        (Value::String(s), "trim") => Value::String(s.trim().to_string()),
        (Value::String(s), "includes") => Value::Boolean(s.contains(&argument(0).to_js_string())),
        (Value::String(s), "startsWith") => {
            Value::Boolean(s.starts_with(&argument(0).to_js_string()))
        }
        (Value::String(s), "endsWith") => Value::Boolean(s.ends_with(&argument(0).to_js_string())),
        (Value::String(s), "indexOf") => {
            let needle = argument(0).to_js_string();
            Value::Number(
                s.find(&needle)
                    .map(|byte| s[..byte].chars().count() as f64)
                    .unwrap_or(-1.0),
            )
        }
        (Value::Array(items), "join") => {
            let separator = match argument(0) {
                Value::Undefined => ",".to_string(),
                other => other.to_js_string(),
            };
            Value::String(
                items
                    .iter()
                    .map(Value::to_template_string)
                    .collect::<Vec<_>>()
                    .join(&separator),
            )
        }
        (Value::Array(items), "includes") => Value::Boolean(items.contains(&argument(0))),
        (Value::Array(items), "indexOf") => {
            let needle = argument(0);
            Value::Number(
                items
                    .iter()
                    .position(|item| *item == needle)
                    .map(|i| i as f64)
                    .unwrap_or(-1.0),
            )
        }
        (Value::Number(n), "toFixed") => {
            let digits = argument(0).to_number();
            let digits = if digits.is_nan() { 0.0 } else { digits.trunc() };
            if !(0.0..=100.0).contains(&digits) {
                return Some(Err(EvalError::TypeError(format!(
                    "toFixed() digits argument must be between 0 and 100, got {}",
                    format_number(digits)
                ))));
            }
            if !n.is_finite() || n.abs() >= 1e21 {
                Value::String(format_number(*n))
            } else {
                Value::String(format!("{:.*}", digits as usize, n))
            }
        }
        (Value::Object(map), "hasOwnProperty") => {
            Value::Boolean(map.contains_key(&argument(0).to_js_string()))
        }
        (receiver, "toString") if !receiver.is_nullish() => {
            Value::String(receiver.to_js_string())
        }
        _ => return None,
    };
    Some(Ok(value))
}
