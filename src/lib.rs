//! HTML templates with directive attributes and inline expressions.
//!
//! ```
//! use viewtpl::eval::{Value, Vars};
//! use viewtpl::template::Template;
//!
//! let mut vars = Vars::new();
//! vars.insert("page".to_string(), Value::from(serde_json::json!({"home": true})));
//! vars.insert("name".to_string(), Value::from("<Ann>"));
//!
//! let mut template = Template::new(r#"<a :class="{isActive: page.home}">{{ name }}</a>"#);
//! assert_eq!(
//!     template.parse(Some(vars), None).unwrap(),
//!     r#"<a class="is-active">&lt;Ann&gt;</a>"#
//! );
//! ```

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod eval;
pub mod markup;
pub mod template;
pub mod tokenizer;
pub mod utils;
pub mod view;

// Re-exports
pub use config::{RawDelimiter, TemplateConfig};
pub use error::*;
pub use eval::{evaluate, Value, Vars};
pub use template::{add_directive, DirectiveOutcome, DirectiveRegistry, Template};
pub use view::{View, ViewOptions};

#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
