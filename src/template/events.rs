use crate::eval::{EvalResult, Evaluator, Scope, Value, Vars};

/// DOM events with a directive of the same name.
pub const EVENTS: &[&str] = &[
    "blur",
    "change",
    "click",
    "dblclick",
    "focus",
    "input",
    "keydown",
    "keypress",
    "keyup",
    "mousedown",
    "mouseenter",
    "mouseleave",
    "mousemove",
    "mouseout",
    "mouseover",
    "mouseup",
    "reset",
    "scroll",
    "submit",
];

/// A handler recorded while compiling, to be attached by the host once the
/// markup is live.
///
/// `target` matches the event marker attribute written on the element;
/// `scope` is the variables visible where the directive ran, so a handler
/// inside a repeat sees its own iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBinding {
    pub target: usize,
    pub event: String,
    pub expression: String,
    pub scope: Vars,
}

impl EventBinding {
    pub fn new(
        target: usize,
        event: impl Into<String>,
        expression: impl Into<String>,
        scope: Vars,
    ) -> Self {
        Self {
            target,
            event: event.into(),
            expression: expression.into(),
            scope,
        }
    }

    /// Runs the handler expression with `$event` bound to `payload`.
    pub fn invoke(
        &self,
        evaluator: &Evaluator,
        context: &Value,
        payload: Value,
    ) -> EvalResult<Value> {
        let mut scope = Scope::from(self.scope.clone());
        scope.push_frame();
        scope.insert("$event", payload);
        evaluator.try_evaluate(&self.expression, &scope, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_invoke_sees_captured_scope_and_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let mut scope = Vars::new();
        scope.insert("item".to_string(), Value::from("b"));
        scope.insert(
            "select".to_string(),
            Value::function("select", move |_, args| {
                log.lock().unwrap().push(args.to_vec());
                Ok(Value::Undefined)
            }),
        );

        let binding = EventBinding::new(0, "click", "select(item, $event)", scope);
        binding
            .invoke(Evaluator::global(), &Value::Undefined, Value::from("payload"))
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec![Value::from("b"), Value::from("payload")]]
        );
    }
}
