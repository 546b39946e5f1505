//! Template compilation.
//!
//! A [`Template`] parses its source into a detached markup tree, runs the
//! directive attributes of every element through a [`Compiler`], serializes
//! the tree and rewrites the `{{ }}` and `{% %}` delimiters.
//!
//! ```
//! use viewtpl::eval::{Value, Vars};
//! use viewtpl::template::Template;
//!
//! let mut vars = Vars::new();
//! vars.insert(
//!     "items".to_string(),
//!     Value::from(vec![Value::from("Item 1"), Value::from("Item 2")]),
//! );
//! let mut template = Template::new(r#"<ul><li :repeat="item in items">{{item}}</li></ul>"#);
//! let html = template.parse(Some(vars), None).unwrap();
//! assert_eq!(html, "<ul><li>Item 1</li><li>Item 2</li></ul>");
//! ```

pub mod compiler;
pub mod directive;
pub mod directives;
pub mod events;
pub mod repeat;
pub mod supplant;

use thiserror::Error;

pub use compiler::Compiler;
pub use directive::{add_directive, Directive, DirectiveOutcome, DirectiveRegistry};
pub use events::{EventBinding, EVENTS};
pub use repeat::Iteration;
pub use supplant::{supplant, Supplant};

use crate::config::TemplateConfig;
use crate::eval::{Evaluator, Scope, Value, Vars};
use crate::InternalResult;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Invalid syntax for repeat: `{value}`, expected `item in collection`")]
    RepeatSyntax { value: String },
    #[error("Repeat collection `{expression}` must be an array or an object, found {found}")]
    RepeatType { expression: String, found: String },
    #[error("Unknown directive {0}")]
    UnknownDirective(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    vars: Vars,
    context: Value,
    registry: DirectiveRegistry,
    config: TemplateConfig,
    events: Vec<EventBinding>,
}

impl Template {
    /// A template using the process-wide directive registry.
    pub fn new(source: &str) -> Self {
        Self::with_registry(source, DirectiveRegistry::global().clone())
    }

    pub fn with_registry(source: &str, registry: DirectiveRegistry) -> Self {
        Self {
            source: source.trim().to_string(),
            vars: Vars::new(),
            context: Value::Undefined,
            registry,
            config: TemplateConfig::default(),
            events: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: TemplateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = source.trim().to_string();
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    pub fn set_vars(&mut self, vars: Vars) {
        self.vars = vars;
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn set_context(&mut self, context: Value) {
        self.context = context;
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Event bindings recorded by the last parse.
    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<EventBinding> {
        std::mem::take(&mut self.events)
    }

    /// Renders the template. `vars` and `context` replace the stored ones
    /// when given.
    ///
    /// Expression failures render as blanks; a malformed repeat or a repeat
    /// over something other than an array or object fails the whole parse.
    #[tracing::instrument(level = "debug", skip(self, vars, context))]
    pub fn parse(&mut self, vars: Option<Vars>, context: Option<Value>) -> InternalResult<String> {
        if let Some(vars) = vars {
            self.vars = vars;
        }
        if let Some(context) = context {
            self.context = context;
        }

        let mut compiler = Compiler::new(
            Scope::from(self.vars.clone()),
            self.context.clone(),
            self.registry.clone(),
            self.config.clone(),
        );
        let output = compiler.render_fragment(&self.source)?;
        self.events = compiler.into_events();
        Ok(output)
    }

    /// Renders with the stored vars and context.
    pub fn render(&mut self) -> InternalResult<String> {
        self.parse(None, None)
    }

    /// Evaluates `expression` against the stored vars and context.
    pub fn compile(&self, expression: &str) -> Value {
        Evaluator::global().evaluate(expression, &Scope::from(self.vars.clone()), &self.context)
    }

    /// Rewrites the delimiters of `markup` against the stored vars and context.
    pub fn supplant(&self, markup: &str) -> String {
        Supplant::new(Evaluator::global(), self.config.raw_delimiter).apply(
            markup,
            &Scope::from(self.vars.clone()),
            &self.context,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(entries: &[(&str, Value)]) -> Vars {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_source_is_trimmed() {
        let mut template = Template::new("\n  <p>x</p>\n");
        assert_eq!(template.source(), "<p>x</p>");
        template.set_source("  y ");
        assert_eq!(template.source(), "y");
    }

    #[test]
    fn test_parse_retains_vars_and_context() {
        let mut template = Template::new("<p>{{ name }} {{ this.greeting }}</p>");
        let context = Value::from(vars(&[("greeting", Value::from("hi"))]));
        let first = template
            .parse(Some(vars(&[("name", Value::from("Ann"))])), Some(context))
            .unwrap();
        assert_eq!(first, "<p>Ann hi</p>");
        assert_eq!(template.render().unwrap(), first);
        assert_eq!(template.source(), "<p>{{ name }} {{ this.greeting }}</p>");
    }

    #[test]
    fn test_compile_and_supplant() {
        let mut template = Template::new("");
        template.set_vars(vars(&[("age", Value::from(20usize))]));
        assert_eq!(template.compile("age + 1"), Value::Number(21.0));
        assert_eq!(template.supplant("{{ age }}/{% '<b>' %}"), "20/<b>");
    }

    #[test]
    fn test_triple_brace_config() {
        let config = TemplateConfig {
            raw_delimiter: crate::config::RawDelimiter::TripleBrace,
            ..TemplateConfig::default()
        };
        let mut template = Template::new("<p>{{{ html }}}</p>").with_config(config);
        let output = template
            .parse(Some(vars(&[("html", Value::from("<b>x</b>"))])), None)
            .unwrap();
        assert_eq!(output, "<p><b>x</b></p>");
    }
}
