use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::RawDelimiter;
use crate::eval::{Evaluator, Scope, Value, Vars};
use crate::utils::escape;

lazy_static! {
    static ref RAW_PERCENT: Regex = Regex::new(r"(?s)\{%(.*?)%\}").unwrap();
    static ref RAW_TRIPLE_BRACE: Regex = Regex::new(r"\{\{\{([^{}]*)\}\}\}").unwrap();
    static ref ESCAPED: Regex = Regex::new(r"\{\{([^{}]*)\}\}").unwrap();
    static ref LEADING_BLANK_LINES: Regex = Regex::new(r"^(?:[ \t]*\r?\n)+").unwrap();
}

/// Delimiter rewriting. Raw interpolations are replaced first, then the
/// escaped `{{ }}` ones. An interpolation cannot contain `{` or `}`.
#[derive(Debug, Clone, Copy)]
pub struct Supplant<'a> {
    evaluator: &'a Evaluator,
    raw_delimiter: RawDelimiter,
}

impl<'a> Supplant<'a> {
    pub fn new(evaluator: &'a Evaluator, raw_delimiter: RawDelimiter) -> Self {
        Self {
            evaluator,
            raw_delimiter,
        }
    }

    pub fn apply(&self, markup: &str, scope: &Scope, context: &Value) -> String {
        let raw = match self.raw_delimiter {
            RawDelimiter::Percent => &*RAW_PERCENT,
            RawDelimiter::TripleBrace => &*RAW_TRIPLE_BRACE,
        };
        let markup = raw.replace_all(markup, |caps: &Captures| {
            self.evaluator
                .evaluate(&caps[1], scope, context)
                .to_template_string()
        });
        ESCAPED
            .replace_all(&markup, |caps: &Captures| {
                escape(
                    &self
                        .evaluator
                        .evaluate(&caps[1], scope, context)
                        .to_template_string(),
                )
            })
            .into_owned()
    }
}

/// Rewrites the delimiters of `markup` with `vars` in scope and `context` as
/// `this`, using `{% %}` for raw output.
///
/// ```
/// use viewtpl::eval::{Value, Vars};
/// use viewtpl::template::supplant;
///
/// let mut vars = Vars::new();
/// vars.insert("str".to_string(), Value::from("<b>"));
/// assert_eq!(supplant("{{ str }} {% str %}", &vars, &Value::Undefined), "&lt;b&gt; <b>");
/// assert_eq!(supplant("1 + 2 = {{1 + 2}}", &vars, &Value::Undefined), "1 + 2 = 3");
/// ```
pub fn supplant(markup: &str, vars: &Vars, context: &Value) -> String {
    Supplant::new(Evaluator::global(), RawDelimiter::default()).apply(
        markup,
        &Scope::from(vars.clone()),
        context,
    )
}

pub fn strip_leading_blank_lines(markup: &str) -> String {
    LEADING_BLANK_LINES.replace(markup, "").into_owned()
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
    fn test_escaped_and_raw() {
        let vars = vars(&[("str", Value::from("You & I aren't <\"GREAT\">"))]);
        assert_eq!(
            supplant("{{str}}", &vars, &Value::Undefined),
            "You &amp; I aren&#x27;t &lt;&quot;GREAT&quot;&gt;"
        );
        assert_eq!(
            supplant("{% str %}", &vars, &Value::Undefined),
            "You & I aren't <\"GREAT\">"
        );
    }

    #[test]
    fn test_debug_shows_delimiter() {
        let evaluator = Evaluator::with_capacity(4);
        let supplant = Supplant::new(&evaluator, RawDelimiter::Percent);
        assert_eq!(
            format!("{:?}", supplant),
            "Supplant { evaluator: Evaluator { cached: 0, capacity: 4 }, raw_delimiter: Percent }"
        );
    }

    #[test]
    fn test_triple_brace_generation() {
        let vars = vars(&[("html", Value::from("<i>x</i>"))]);
        let supplant = Supplant::new(Evaluator::global(), RawDelimiter::TripleBrace);
        assert_eq!(
            supplant.apply("{{{ html }}}|{{ html }}", &Scope::from(vars), &Value::Undefined),
            "<i>x</i>|&lt;i&gt;x&lt;&#x2F;i&gt;"
        );
    }

    #[test]
    fn test_nested_braces_are_not_interpolated() {
        let vars = vars(&[("a", Value::from(1usize))]);
        assert_eq!(
            supplant("{{ {x: a}.x }}", &vars, &Value::Undefined),
            "{{ {x: a}.x }}"
        );
        assert_eq!(supplant("{% {x: a}.x %}", &vars, &Value::Undefined), "1");
    }

    #[test]
    fn test_failures_render_blank() {
        assert_eq!(
            supplant("[{{ missing }}][{{ 1 + }}]", &Vars::new(), &Value::Undefined),
            "[][]"
        );
        assert_eq!(supplant("{{ null }}", &Vars::new(), &Value::Undefined), "");
    }

    #[test]
    fn test_context_is_this() {
        let context = Value::from(vars(&[("name", Value::from("View"))]));
        assert_eq!(supplant("{{ this.name }}", &Vars::new(), &context), "View");
    }

    #[test]
    fn test_strip_leading_blank_lines() {
        assert_eq!(strip_leading_blank_lines("\n  \n\t<p>\n</p>"), "\t<p>\n</p>");
        assert_eq!(strip_leading_blank_lines("<p></p>\n"), "<p></p>\n");
    }
}
