use crate::utils::{escape_attribute, escape_text};

use super::serializer::serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for valueless attributes such as `checked`.
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
    /// Markup emitted as is, e.g. the output of a repeat.
    Raw(String),
}

impl Node {
    pub fn to_html(&self) -> String {
        serialize(std::slice::from_ref(self))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Vec::new())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Raw value; valueless attributes read as `""`.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Sets `name` to `value`, escaping it. Existing attributes keep their
    /// position; new ones are appended.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.set_attribute_raw(name, escape_attribute(value));
    }

    /// Sets `name` to an already escaped value.
    pub fn set_attribute_raw(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = Some(value),
            None => self.attributes.push(Attribute::new(name, Some(value))),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index))
    }

    /// Replaces the children with a single escaped text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text(escape_text(text))]
        };
    }

    pub fn outer_html(&self) -> String {
        serialize(&[Node::Element(self.clone())])
    }

    pub fn inner_html(&self) -> String {
        serialize(&self.children)
    }

    /// Whitespace separated tokens of the `class` attribute.
    pub fn class_list(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_helpers() {
        let mut element = Element::with_attributes(
            "a",
            vec![
                Attribute::new("class", Some("x".to_string())),
                Attribute::new("hidden", None),
            ],
        );
        assert_eq!(element.get_attribute("hidden"), Some(""));
        element.set_attribute("class", "y");
        element.set_attribute("href", "/a?b=1&c=\"2\"");
        assert_eq!(
            element.outer_html(),
            r#"<a class="y" hidden href="/a?b=1&amp;c=&quot;2&quot;"></a>"#
        );
        assert!(element.remove_attribute("hidden").is_some());
        assert!(element.remove_attribute("hidden").is_none());
    }

    #[test]
    fn test_set_text_escapes() {
        let mut element = Element::new("p");
        element.children.push(Node::Comment("gone".to_string()));
        element.set_text("1 < 2 & 3");
        assert_eq!(element.inner_html(), "1 &lt; 2 &amp; 3");
    }
}
