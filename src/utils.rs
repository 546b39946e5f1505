use indexmap::IndexMap;
use tracing::error;

use crate::eval::Value;
use crate::markup::Element;

/// Attributes of an element keyed by their camel-cased names.
pub type Props = IndexMap<String, String>;

/// Replaces the characters that are unsafe in HTML text and attribute values
/// with entities.
///
/// ```
/// use viewtpl::utils::escape;
///
/// assert_eq!(escape("You & I aren't <\"GREAT\">"), "You &amp; I aren&#x27;t &lt;&quot;GREAT&quot;&gt;");
/// ```
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes the entities [`escape`] produces, plus `&#39;`. Directive values
/// are decoded before evaluation, as a browser would.
pub fn unescape(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

/// Escaping for text content written by directives.
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escaping for attribute values written by directives.
pub fn escape_attribute(input: &str) -> String {
    input.replace('&', "&amp;").replace('"', "&quot;")
}

fn is_kebab_upper(c: char) -> bool {
    c.is_ascii_uppercase() || ('\u{C0}'..='\u{D6}').contains(&c) || ('\u{D8}'..='\u{DE}').contains(&c)
}

/// `isActive` becomes `is-active`. Latin-1 capitals are lowered too.
pub fn kebab_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if is_kebab_upper(c) {
            output.push('-');
            output.extend(c.to_lowercase());
        } else {
            output.push(c);
        }
    }
    output
}

/// `data-user-id` becomes `dataUserId`.
pub fn camel_case(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(next) = chars.peek().copied() {
                if next.is_ascii_lowercase() {
                    output.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        output.push(c);
    }
    output
}

/// All attributes of `element`, names camel-cased, valueless attributes as
/// empty strings.
pub fn get_props(element: &Element) -> Props {
    element
        .attributes
        .iter()
        .map(|attribute| {
            (
                camel_case(&attribute.name),
                attribute.value.clone().unwrap_or_default(),
            )
        })
        .collect()
}

/// Calls `value` when it is a function, otherwise returns it as is.
pub fn resolve(value: Value) -> Value {
    match value {
        Value::Function(f) => match f.call(&Value::Undefined, &[]) {
            Ok(resolved) => resolved,
            Err(e) => {
                error!("Failed to resolve {}: {}", f.name(), e);
                Value::Undefined
            }
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use crate::markup::Node;

    #[test]
    fn test_escape_every_unsafe_char() {
        assert_eq!(escape("<a href=\"/x\">'&'</a>"), "&lt;a href=&quot;&#x2F;x&quot;&gt;&#x27;&amp;&#x27;&lt;&#x2F;a&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let input = "a && b < c || d === '/'";
        assert_eq!(unescape(&escape(input)), input);
        assert_eq!(unescape("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("isActive"), "is-active");
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case("fooÀbar"), "foo-àbar");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("data-user-id"), "dataUserId");
        assert_eq!(camel_case(":repeat"), ":repeat");
        assert_eq!(camel_case("trailing-"), "trailing-");
    }

    #[test]
    fn test_get_props() {
        let nodes = parse_fragment(r#"<input data-item-id="7" :value="name" checked>"#);
        let Some(Node::Element(element)) = nodes.first() else {
            panic!("expected element");
        };
        let props = get_props(element);
        assert_eq!(props.get("dataItemId").map(String::as_str), Some("7"));
        assert_eq!(props.get(":value").map(String::as_str), Some("name"));
        assert_eq!(props.get("checked").map(String::as_str), Some(""));
    }

    #[test]
    fn test_resolve() {
        let state = Value::function("state", |_, _| Ok(Value::from(1usize)));
        assert_eq!(resolve(state), Value::Number(1.0));
        assert_eq!(resolve(Value::from("x")), Value::from("x"));
    }
}
