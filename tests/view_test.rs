mod common;

use std::sync::{Arc, Mutex};

use common::vars;
use pretty_assertions::assert_eq;
use serde_json::json;
use viewtpl::view::TemplateSource;
use viewtpl::{Value, View, ViewOptions};

const TODO: &str = r#"
<ul class="todos">
  <li :repeat="todo in todos" :class="{isDone: todo.done}" :click="$index">{{ todo.title }}</li>
</ul>
<p :show="!todos.length">Nothing to do</p>
"#;

fn todo_view() -> View {
    View::new(ViewOptions {
        state: Value::from(json!({"todos": [
            {"title": "write", "done": false},
            {"title": "test", "done": true}
        ]})),
        template: TemplateSource::Inline(TODO.to_string()),
        ..ViewOptions::default()
    })
    .unwrap()
}

#[test]
fn test_render_todo_list() {
    let mut view = todo_view();
    assert_eq!(
        view.render().unwrap(),
        concat!(
            "<ul class=\"todos\">\n  ",
            "<li data-view-event=\"0\">write</li>",
            "<li class=\"is-done\" data-view-event=\"1\">test</li>\n",
            "</ul>\n"
        )
    );
}

#[test]
fn test_click_then_set_state() {
    let mut view = todo_view();
    view.render().unwrap();

    let clicked = view.dispatch(0, "click", Value::Null).unwrap();
    assert_eq!(clicked, vec![Value::Number(0.0)]);

    let renders = Arc::new(Mutex::new(0));
    let counter = renders.clone();
    view.on_state_change(move |_| *counter.lock().unwrap() += 1);

    view.set_state(vars(json!({"todos": []}))).unwrap();
    assert_eq!(
        view.markup(),
        "<ul class=\"todos\">\n  \n</ul>\n<p>Nothing to do</p>"
    );
    assert!(view.events().is_empty());
    assert_eq!(*renders.lock().unwrap(), 1);
}
