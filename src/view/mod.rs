//! The view that owns a template and its state.
//!
//! A [`View`] renders its template with its state as variables, re-renders on
//! every [`View::set_state`] and runs the event bindings the template recorded.

pub mod cache;

use tracing::{debug, warn};

pub use cache::{FetchError, TemplateCache, TemplateFetcher};

use crate::config::TemplateConfig;
use crate::eval::{Evaluator, Value, Vars};
use crate::template::{EventBinding, Template};
use crate::utils::resolve;
use crate::{Error, InternalResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    /// Loaded through a [`TemplateFetcher`] and the process-wide
    /// [`TemplateCache`].
    Url(String),
}

impl Default for TemplateSource {
    fn default() -> Self {
        TemplateSource::Inline(String::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// An object, or a function returning one.
    pub state: Value,
    /// `this` for template expressions.
    pub context: Value,
    pub template: TemplateSource,
    pub config: TemplateConfig,
}

type StateListener = Box<dyn Fn(&Vars) + Send + Sync>;

pub struct View {
    state: Vars,
    context: Value,
    template: Template,
    markup: String,
    events: Vec<EventBinding>,
    listeners: Vec<StateListener>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("state", &self.state)
            .field("markup", &self.markup)
            .field("events", &self.events)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn initial_state(state: Value) -> Vars {
    match resolve(state) {
        Value::Object(state) => state,
        Value::Undefined | Value::Null => Vars::new(),
        other => {
            warn!("Ignoring initial state of type {}", other.type_name());
            Vars::new()
        }
    }
}

impl View {
    /// A view over an inline template.
    pub fn new(options: ViewOptions) -> InternalResult<Self> {
        let source = match &options.template {
            TemplateSource::Inline(source) => source.clone(),
            TemplateSource::Url(url) => {
                return Err(Error::internal(format!(
                    "No fetcher given to load template {}",
                    url
                )))
            }
        };
        Ok(Self::build(options, &source))
    }

    /// A view whose template may be loaded from a URL.
    pub fn with_fetcher(options: ViewOptions, fetcher: &dyn TemplateFetcher) -> InternalResult<Self> {
        let source = match &options.template {
            TemplateSource::Inline(source) => source.clone(),
            TemplateSource::Url(url) => TemplateCache::global().get_or_fetch(url, fetcher)?,
        };
        Ok(Self::build(options, &source))
    }

    fn build(options: ViewOptions, source: &str) -> Self {
        Self {
            state: initial_state(options.state),
            context: options.context,
            template: Template::new(source).with_config(options.config),
            markup: String::new(),
            events: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn get_state(&self) -> &Vars {
        &self.state
    }

    /// Merges `patch` into the state, re-renders, then notifies listeners.
    pub fn set_state(&mut self, patch: Vars) -> InternalResult<&mut Self> {
        for (name, value) in patch {
            self.state.insert(name, value);
        }
        self.render()?;
        for listener in &self.listeners {
            listener(&self.state);
        }
        Ok(self)
    }

    pub fn on_state_change<F>(&mut self, listener: F)
    where
        F: Fn(&Vars) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn render(&mut self) -> InternalResult<&str> {
        self.markup = self
            .template
            .parse(Some(self.state.clone()), Some(self.context.clone()))?;
        self.events = self.template.take_events();
        debug!(
            "Rendered view: {} bytes, {} event bindings",
            self.markup.len(),
            self.events.len()
        );
        Ok(&self.markup)
    }

    /// Markup of the last render.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Runs the `event` handlers bound to `target`, in binding order.
    pub fn dispatch(&self, target: usize, event: &str, payload: Value) -> InternalResult<Vec<Value>> {
        self.events
            .iter()
            .filter(|binding| binding.target == target && binding.event == event)
            .map(|binding| {
                binding
                    .invoke(Evaluator::global(), &self.context, payload.clone())
                    .map_err(Error::from)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::cache::MockTemplateFetcher;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn options(template: &str, state: Value) -> ViewOptions {
        ViewOptions {
            state,
            template: TemplateSource::Inline(template.to_string()),
            ..ViewOptions::default()
        }
    }

    fn vars(entries: &[(&str, Value)]) -> Vars {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_state_from_function() {
        let state = Value::function("state", |_, _| {
            Ok(Value::from(vars(&[("count", Value::from(1usize))])))
        });
        let view = View::new(options("<p>{{ count }}</p>", state)).unwrap();
        assert_eq!(view.get_state().get("count"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_set_state_merges_renders_and_notifies() {
        let initial = Value::from(vars(&[
            ("name", Value::from("Ann")),
            ("count", Value::from(1usize)),
        ]));
        let mut view = View::new(options("<p>{{ name }}: {{ count }}</p>", initial)).unwrap();
        assert_eq!(view.render().unwrap(), "<p>Ann: 1</p>");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        view.on_state_change(move |state| {
            log.lock().unwrap().push(state.get("count").cloned());
        });

        view.set_state(vars(&[("count", Value::from(2usize))])).unwrap();
        assert_eq!(view.markup(), "<p>Ann: 2</p>");
        assert_eq!(*seen.lock().unwrap(), vec![Some(Value::Number(2.0))]);
    }

    #[test]
    fn test_dispatch_runs_bound_handlers() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let log = clicked.clone();
        let context = Value::from(vars(&[(
            "select",
            Value::function("select", move |_, args| {
                log.lock().unwrap().push(args.to_vec());
                Ok(Value::Boolean(true))
            }),
        )]));
        let state = Value::from(vars(&[(
            "items",
            Value::from(vec![Value::from("a"), Value::from("b")]),
        )]));
        let mut view = View::new(ViewOptions {
            context,
            ..options(
                r#"<ul><li :repeat="item in items" :click="this.select(item, $index, $event)">{{ item }}</li></ul>"#,
                state,
            )
        })
        .unwrap();

        assert_eq!(
            view.render().unwrap(),
            r#"<ul><li data-view-event="0">a</li><li data-view-event="1">b</li></ul>"#
        );
        assert_eq!(view.events().len(), 2);

        let results = view.dispatch(1, "click", Value::from("evt")).unwrap();
        assert_eq!(results, vec![Value::Boolean(true)]);
        assert!(view.dispatch(1, "submit", Value::Null).unwrap().is_empty());
        assert_eq!(
            *clicked.lock().unwrap(),
            vec![vec![Value::from("b"), Value::Number(1.0), Value::from("evt")]]
        );
    }

    #[test]
    fn test_url_template_needs_fetcher() {
        let options = ViewOptions {
            template: TemplateSource::Url("/tpl/none.html".to_string()),
            ..ViewOptions::default()
        };
        assert!(matches!(View::new(options), Err(Error::Internal(_))));
    }

    #[test]
    fn test_url_template_is_fetched() {
        let mut fetcher = MockTemplateFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok("<b>{{ who }}</b>".to_string()));

        let options = ViewOptions {
            state: Value::from(vars(&[("who", Value::from("me"))])),
            template: TemplateSource::Url("/view-tests/fetched.html".to_string()),
            ..ViewOptions::default()
        };
        let mut view = View::with_fetcher(options.clone(), &fetcher).unwrap();
        assert_eq!(view.render().unwrap(), "<b>me</b>");

        let mut again = View::with_fetcher(options, &fetcher).unwrap();
        assert_eq!(again.render().unwrap(), "<b>me</b>");
    }

    #[test]
    fn test_fetch_failure_surfaces() {
        let mut fetcher = MockTemplateFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|url| Err(FetchError::NotFound(url.to_string())));
        let options = ViewOptions {
            template: TemplateSource::Url("/view-tests/missing.html".to_string()),
            ..ViewOptions::default()
        };
        assert!(matches!(
            View::with_fetcher(options, &fetcher),
            Err(Error::Fetch(FetchError::NotFound(_)))
        ));
    }
}
