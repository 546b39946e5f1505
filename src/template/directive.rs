use std::sync::Arc;

use dashmap::DashMap;
use lazy_static::lazy_static;

use super::compiler::Compiler;
use super::directives;
use crate::markup::Element;
use crate::utils::Props;
use crate::InternalResult;

/// What happens to an element after one of its directives ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveOutcome {
    /// Continue with the element's next directive, then its children.
    Keep,
    /// Drop the element and its subtree.
    Remove,
    /// Put this markup where the element was.
    Replace(String),
}

/// Handler behind a `:name="value"` attribute.
///
/// `value` is the attribute value with entities decoded; `props` holds every
/// attribute of the element as it was before any directive ran.
pub trait Directive: Send + Sync {
    fn apply(
        &self,
        compiler: &mut Compiler,
        element: &mut Element,
        value: &str,
        props: &Props,
    ) -> InternalResult<DirectiveOutcome>;
}

impl<F> Directive for F
where
    F: Fn(&mut Compiler, &mut Element, &str, &Props) -> InternalResult<DirectiveOutcome>
        + Send
        + Sync,
{
    fn apply(
        &self,
        compiler: &mut Compiler,
        element: &mut Element,
        value: &str,
        props: &Props,
    ) -> InternalResult<DirectiveOutcome> {
        self(compiler, element, value, props)
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: DirectiveRegistry = DirectiveRegistry::with_builtins();
}

/// Directives by name. Clones share the same table.
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    directives: Arc<DashMap<String, Arc<dyn Directive>>>,
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("directives", &self.names())
            .finish()
    }
}

impl DirectiveRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh registry seeded with the built-in directives.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        directives::register_builtins(&registry);
        registry
    }

    /// The process-wide registry used by [`Template::new`](super::Template::new).
    pub fn global() -> &'static DirectiveRegistry {
        &DEFAULT_REGISTRY
    }

    /// Registers `directive` under `name`, replacing any previous one.
    pub fn register<D: Directive + 'static>(&self, name: impl Into<String>, directive: D) {
        self.directives.insert(name.into(), Arc::new(directive));
    }

    pub fn add_directive<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut Compiler, &mut Element, &str, &Props) -> InternalResult<DirectiveOutcome>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Directive>> {
        self.directives.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.directives.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.directives.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Adds a directive to the process-wide registry. Last registration wins.
pub fn add_directive<F>(name: impl Into<String>, handler: F)
where
    F: Fn(&mut Compiler, &mut Element, &str, &Props) -> InternalResult<DirectiveOutcome>
        + Send
        + Sync
        + 'static,
{
    DirectiveRegistry::global().add_directive(name, handler);
}
