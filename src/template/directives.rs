use indexmap::IndexMap;
use tracing::warn;

use super::compiler::Compiler;
use super::directive::{Directive, DirectiveOutcome, DirectiveRegistry};
use super::events::EVENTS;
use super::repeat::repeat;
use crate::eval::Value;
use crate::markup::Element;
use crate::utils::{kebab_case, unescape, Props};
use crate::InternalResult;

const BOOLEAN_ATTRIBUTES: &[&str] = &["selected", "checked", "disabled"];
const VALUE_ATTRIBUTES: &[&str] = &["href", "src", "value", "title", "alt"];

pub(crate) fn register_builtins(registry: &DirectiveRegistry) {
    registry.add_directive("bind", bind);
    registry.add_directive("show", show);
    registry.add_directive("hide", hide);
    registry.add_directive("class", class);
    registry.add_directive("style", style);
    registry.add_directive("repeat", repeat);
    for &name in BOOLEAN_ATTRIBUTES {
        registry.register(name, BooleanAttribute(name));
    }
    for &name in VALUE_ATTRIBUTES {
        registry.register(name, ValueAttribute(name));
    }
    for &event in EVENTS {
        registry.register(event, EventDirective(event));
    }
}

/// `:bind="expr"` replaces the element's content with the value as text.
pub fn bind(
    compiler: &mut Compiler,
    element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    let text = compiler.compile(value).to_template_string();
    element.set_text(&text);
    Ok(DirectiveOutcome::Keep)
}

pub fn show(
    compiler: &mut Compiler,
    _element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    if compiler.compile(value).is_truthy() {
        Ok(DirectiveOutcome::Keep)
    } else {
        Ok(DirectiveOutcome::Remove)
    }
}

pub fn hide(
    compiler: &mut Compiler,
    _element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    if compiler.compile(value).is_truthy() {
        Ok(DirectiveOutcome::Remove)
    } else {
        Ok(DirectiveOutcome::Keep)
    }
}

/// `:class="{isActive: page.home}"` adds or removes `is-active`.
pub fn class(
    compiler: &mut Compiler,
    element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    let toggles = match compiler.compile(value) {
        Value::Object(toggles) => toggles,
        other => {
            warn!("Ignoring :class=\"{}\": expected an object, got {}", value, other.type_name());
            return Ok(DirectiveOutcome::Keep);
        }
    };

    let mut classes: Vec<String> = element.class_list().iter().map(|c| unescape(c)).collect();
    for (name, enabled) in toggles {
        let name = kebab_case(&name);
        if enabled.is_truthy() {
            if !classes.contains(&name) {
                classes.push(name);
            }
        } else {
            classes.retain(|class| class != &name);
        }
    }

    if classes.is_empty() {
        element.remove_attribute("class");
    } else {
        element.set_attribute("class", &classes.join(" "));
    }
    Ok(DirectiveOutcome::Keep)
}

fn parse_declarations(style: &str) -> IndexMap<String, String> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// `:style="{backgroundColor: color}"` merges declarations into `style`.
pub fn style(
    compiler: &mut Compiler,
    element: &mut Element,
    value: &str,
    _props: &Props,
) -> InternalResult<DirectiveOutcome> {
    let properties = match compiler.compile(value) {
        Value::Object(properties) => properties,
        other => {
            warn!("Ignoring :style=\"{}\": expected an object, got {}", value, other.type_name());
            return Ok(DirectiveOutcome::Keep);
        }
    };

    let mut declarations = element
        .get_attribute("style")
        .map(|style| parse_declarations(&unescape(style)))
        .unwrap_or_default();
    for (property, value) in properties {
        let property = kebab_case(&property);
        let value = value.to_template_string();
        if value.is_empty() {
            declarations.shift_remove(&property);
        } else {
            declarations.insert(property, value);
        }
    }

    if declarations.is_empty() {
        element.remove_attribute("style");
    } else {
        let style = declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ");
        element.set_attribute("style", &style);
    }
    Ok(DirectiveOutcome::Keep)
}

/// `:disabled="expr"` writes `disabled="disabled"` when truthy and removes
/// the attribute otherwise.
#[derive(Debug, Clone, Copy)]
pub struct BooleanAttribute(pub &'static str);

impl Directive for BooleanAttribute {
    fn apply(
        &self,
        compiler: &mut Compiler,
        element: &mut Element,
        value: &str,
        _props: &Props,
    ) -> InternalResult<DirectiveOutcome> {
        if compiler.compile(value).is_truthy() {
            element.set_attribute(self.0, self.0);
        } else {
            element.remove_attribute(self.0);
        }
        Ok(DirectiveOutcome::Keep)
    }
}

/// `:href="expr"` writes the value into `href`; `null` and `undefined`
/// remove it.
#[derive(Debug, Clone, Copy)]
pub struct ValueAttribute(pub &'static str);

impl Directive for ValueAttribute {
    fn apply(
        &self,
        compiler: &mut Compiler,
        element: &mut Element,
        value: &str,
        _props: &Props,
    ) -> InternalResult<DirectiveOutcome> {
        let value = compiler.compile(value);
        if value.is_nullish() {
            element.remove_attribute(self.0);
        } else {
            element.set_attribute(self.0, &value.to_template_string());
        }
        Ok(DirectiveOutcome::Keep)
    }
}

/// `:click="expr"` records a deferred handler; nothing is evaluated while
/// compiling.
#[derive(Debug, Clone, Copy)]
pub struct EventDirective(pub &'static str);

impl Directive for EventDirective {
    fn apply(
        &self,
        compiler: &mut Compiler,
        element: &mut Element,
        value: &str,
        _props: &Props,
    ) -> InternalResult<DirectiveOutcome> {
        compiler.register_event(element, self.0, value);
        Ok(DirectiveOutcome::Keep)
    }
}
