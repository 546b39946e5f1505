use std::sync::Arc;

use tracing::{debug, warn};

use super::directive::{Directive, DirectiveOutcome, DirectiveRegistry};
use super::events::EventBinding;
use super::supplant::{strip_leading_blank_lines, Supplant};
use super::TemplateError;
use crate::config::TemplateConfig;
use crate::eval::{EvalResult, Evaluator, Scope, Value};
use crate::markup::{parse_fragment, serialize, Element, Node};
use crate::utils::{get_props, unescape};
use crate::InternalResult;

/// State of one compile pass, handed to every directive.
///
/// Repeat iterations push a scope frame on the same compiler, so bindings made
/// inside a loop disappear when the iteration ends.
pub struct Compiler {
    scope: Scope,
    context: Value,
    registry: DirectiveRegistry,
    config: TemplateConfig,
    evaluator: &'static Evaluator,
    events: Vec<EventBinding>,
    next_target: usize,
}

impl Compiler {
    pub fn new(
        scope: Scope,
        context: Value,
        registry: DirectiveRegistry,
        config: TemplateConfig,
    ) -> Self {
        Self {
            scope,
            context,
            registry,
            config,
            evaluator: Evaluator::global(),
            events: Vec::new(),
            next_target: 0,
        }
    }

    /// Evaluates `expression` in the current scope. Errors are logged and
    /// read as `""`.
    pub fn compile(&self, expression: &str) -> Value {
        self.evaluator
            .evaluate(expression, &self.scope, &self.context)
    }

    pub fn try_compile(&self, expression: &str) -> EvalResult<Value> {
        self.evaluator
            .try_evaluate(expression, &self.scope, &self.context)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EventBinding> {
        self.events
    }

    /// Records a deferred `event` handler on `element` and marks the element
    /// so the binding can find it after rendering. All events of one element
    /// share its target id.
    pub fn register_event(&mut self, element: &mut Element, event: &str, expression: &str) {
        let marker = self.config.event_attribute.clone();
        let target = match element
            .get_attribute(&marker)
            .and_then(|id| id.parse::<usize>().ok())
        {
            Some(target) => target,
            None => {
                let target = self.next_target;
                self.next_target += 1;
                element.set_attribute(&marker, &target.to_string());
                target
            }
        };
        debug!("Binding {} on target {}: {}", event, target, expression);
        self.events.push(EventBinding::new(
            target,
            event,
            expression,
            self.scope.flatten(),
        ));
    }

    /// Parses `markup`, runs the directives of every element, serializes the
    /// result and rewrites its delimiters.
    #[tracing::instrument(level = "debug", skip(self, markup))]
    pub fn render_fragment(&mut self, markup: &str) -> InternalResult<String> {
        let nodes = self.compile_nodes(parse_fragment(markup))?;
        let output = self.supplant(&serialize(&nodes));
        if self.config.strip_leading_blank_lines {
            Ok(strip_leading_blank_lines(&output))
        } else {
            Ok(output)
        }
    }

    /// Rewrites the delimiters of `markup` against the current scope.
    pub fn supplant(&self, markup: &str) -> String {
        Supplant::new(self.evaluator, self.config.raw_delimiter).apply(
            markup,
            &self.scope,
            &self.context,
        )
    }

    fn compile_nodes(&mut self, nodes: Vec<Node>) -> InternalResult<Vec<Node>> {
        let mut output = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Element(element) => {
                    if let Some(node) = self.compile_element(element)? {
                        output.push(node);
                    }
                }
                other => output.push(other),
            }
        }
        Ok(output)
    }

    fn directives_of(&self, element: &Element) -> InternalResult<Vec<(String, Arc<dyn Directive>)>> {
        let prefix = self.config.directive_prefix.as_str();
        let mut directives = Vec::new();
        for attribute in &element.attributes {
            let Some(name) = attribute.name.strip_prefix(prefix) else {
                continue;
            };
            match self.registry.get(name) {
                Some(directive) => directives.push((attribute.name.clone(), directive)),
                None if self.config.strict_directives => {
                    return Err(TemplateError::UnknownDirective(attribute.name.clone()).into())
                }
                None => warn!("No directive registered for {}", attribute.name),
            }
        }
        Ok(directives)
    }

    fn compile_element(&mut self, mut element: Element) -> InternalResult<Option<Node>> {
        let props = get_props(&element);

        for (attribute, directive) in self.directives_of(&element)? {
            // An earlier directive may have removed it.
            let Some(attr) = element.remove_attribute(&attribute) else {
                continue;
            };
            let value = unescape(attr.value.as_deref().unwrap_or(""));
            debug!("Applying {}=\"{}\" on <{}>", attribute, value, element.name);

            match directive.apply(self, &mut element, &value, &props)? {
                DirectiveOutcome::Keep => {}
                DirectiveOutcome::Remove => return Ok(None),
                DirectiveOutcome::Replace(markup) => return Ok(Some(Node::Raw(markup))),
            }
        }

        let children = std::mem::take(&mut element.children);
        element.children = self.compile_nodes(children)?;
        Ok(Some(Node::Element(element)))
    }
}
