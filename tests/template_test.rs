mod common;

use common::vars;
use pretty_assertions::assert_eq;
use serde_json::json;
use viewtpl::{Template, Value};

#[test]
fn test_render_div() {
    let mut template = Template::new("<div>{{ name }}</div>");
    let result = template.parse(Some(vars(json!({"name": "Guilherme"}))), None).unwrap();
    assert_eq!(result, "<div>Guilherme</div>");
}

#[test]
fn test_render_text_node() {
    let mut template = Template::new("Hello, {{variable}}!!!");
    let result = template.parse(Some(vars(json!({"variable": "World"}))), None).unwrap();
    assert_eq!(result, "Hello, World!!!");
}

#[test]
fn test_render_multiple_elements() {
    let source = concat!(
        r#"<div class="container">"#,
        r#"<strong class="name">Name: {{user.name}}</strong>"#,
        r#"<a href="mailto:{{user.email}}" class="email">E-mail: {{user.email}}</a>"#,
        "</div>"
    );
    let expected = concat!(
        r#"<div class="container">"#,
        r#"<strong class="name">Name: Guilherme</strong>"#,
        r#"<a href="mailto:gui@email.com" class="email">E-mail: gui@email.com</a>"#,
        "</div>"
    );
    let mut template = Template::new(source);
    let result = template
        .parse(
            Some(vars(json!({"user": {"name": "Guilherme", "email": "gui@email.com"}}))),
            None,
        )
        .unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_resolve_operation() {
    let template = {
        let mut template = Template::new("");
        template.set_vars(vars(json!({
            "name": "Guilherme",
            "lastname": "Santiago",
            "age": 20
        })));
        template
    };
    assert_eq!(
        template.compile("name + ' ' + lastname + ' is ' + (age + 1) + ' years old'"),
        Value::from("Guilherme Santiago is 21 years old")
    );
    assert_eq!(template.compile("(10 / 2) * 2"), Value::Number(10.0));
}

#[test]
fn test_compile_returns_collections() {
    let mut template = Template::new("");
    template.set_vars(vars(json!({
        "dimensions": {"width": 200, "height": 100},
        "items": ["Item 1", "Item 2"]
    })));
    assert_eq!(
        template.compile("{width: dimensions.width, height: dimensions.height, value: true}"),
        Value::from(json!({"width": 200, "height": 100, "value": true}))
    );
    assert_eq!(
        template.compile("items"),
        Value::from(json!(["Item 1", "Item 2"]))
    );
}

#[test]
fn test_escaping() {
    let mut template = Template::new("<p>{{str}}</p><p>{% str %}</p>");
    let result = template
        .parse(Some(vars(json!({"str": "You & I aren't <\"GREAT\">"}))), None)
        .unwrap();
    assert_eq!(
        result,
        "<p>You &amp; I aren&#x27;t &lt;&quot;GREAT&quot;&gt;</p><p>You & I aren't <\"GREAT\"></p>"
    );
}

#[test]
fn test_context_methods() {
    let context = Value::from(vars(json!({"title": "Inbox"})));
    let mut template = Template::new("<h1>{{ this.title.toUpperCase() }} ({{ count }})</h1>");
    let result = template
        .parse(Some(vars(json!({"count": 3}))), Some(context))
        .unwrap();
    assert_eq!(result, "<h1>INBOX (3)</h1>");
}

#[test]
fn test_malformed_expressions_render_blank() {
    let mut template = Template::new("<p>[{{ missing.name }}][{{ 1 + }}][{{ ok }}]</p>");
    let result = template.parse(Some(vars(json!({"ok": "yes"}))), None).unwrap();
    assert_eq!(result, "<p>[][][yes]</p>");
}

#[test]
fn test_parse_is_idempotent() {
    let mut template = Template::new(
        r#"<ul :class="{isEmpty: !items.length}"><li :repeat="item in items" :click="pick(item)">{{ item }}</li></ul>"#,
    );
    let data = vars(json!({"items": ["a", "b"]}));
    let first = template.parse(Some(data.clone()), None).unwrap();
    let second = template.parse(Some(data), None).unwrap();
    assert_eq!(first, second);
    assert_eq!(template.events().len(), 2);
}

#[test]
fn test_leading_blank_lines_are_stripped() {
    let mut template = Template::new("<p :show=\"false\">gone</p>\n\n  \n<p>kept</p>");
    assert_eq!(template.render().unwrap(), "<p>kept</p>");
}

#[test]
fn test_source_is_untouched() {
    let source = r#"<p :bind="name"></p>"#;
    let mut template = Template::new(source);
    template.parse(Some(vars(json!({"name": "x"}))), None).unwrap();
    assert_eq!(template.source(), source);
}
