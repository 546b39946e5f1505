use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, opt, recognize, rest},
    error::{context, VerboseError},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use tracing::trace;

use super::node::{Attribute, Element, Node};

type MarkupResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
enum MarkupToken {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    Comment(String),
    Doctype(String),
}

fn parse_comment(input: &str) -> MarkupResult<MarkupToken> {
    context(
        "comment",
        map(
            preceded(
                tag("<!--"),
                alt((terminated(take_until("-->"), tag("-->")), rest)),
            ),
            |comment: &str| MarkupToken::Comment(comment.to_string()),
        ),
    )(input)
}

fn parse_doctype(input: &str) -> MarkupResult<MarkupToken> {
    context(
        "doctype",
        map(
            delimited(tag("<!"), take_until(">"), char('>')),
            |doctype: &str| MarkupToken::Doctype(doctype.to_string()),
        ),
    )(input)
}

fn parse_tag_name(input: &str) -> MarkupResult<String> {
    map(
        recognize(pair(
            satisfy(|c| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')),
        )),
        |name: &str| name.to_ascii_lowercase(),
    )(input)
}

fn parse_attribute_name(input: &str) -> MarkupResult<String> {
    map(
        take_while1(|c: char| {
            !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        }),
        |name: &str| name.to_ascii_lowercase(),
    )(input)
}

fn parse_attribute_value(input: &str) -> MarkupResult<&str> {
    preceded(
        tuple((multispace0, char('='), multispace0)),
        alt((
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            take_while1(|c: char| !c.is_whitespace() && c != '>'),
        )),
    )(input)
}

fn parse_attribute(input: &str) -> MarkupResult<Attribute> {
    context(
        "attribute",
        map(
            preceded(
                multispace0,
                pair(parse_attribute_name, opt(parse_attribute_value)),
            ),
            |(name, value)| Attribute::new(name, value.map(str::to_string)),
        ),
    )(input)
}

fn parse_start_tag(input: &str) -> MarkupResult<MarkupToken> {
    context(
        "start tag",
        map(
            tuple((
                char('<'),
                parse_tag_name,
                many0(parse_attribute),
                multispace0,
                opt(char('/')),
                char('>'),
            )),
            |(_, name, attributes, _, slash, _)| MarkupToken::StartTag {
                name,
                attributes,
                self_closing: slash.is_some(),
            },
        ),
    )(input)
}

fn parse_end_tag(input: &str) -> MarkupResult<MarkupToken> {
    context(
        "end tag",
        map(
            delimited(tag("</"), parse_tag_name, pair(multispace0, char('>'))),
            MarkupToken::EndTag,
        ),
    )(input)
}

fn parse_text(input: &str) -> MarkupResult<MarkupToken> {
    map(take_while1(|c| c != '<'), |text: &str| {
        MarkupToken::Text(text.to_string())
    })(input)
}

/// A `<` that starts no tag is text.
fn parse_stray_angle(input: &str) -> MarkupResult<MarkupToken> {
    map(recognize(char('<')), |text: &str| {
        MarkupToken::Text(text.to_string())
    })(input)
}

/// Splits off the body of a raw text element, up to its end tag.
fn take_raw_text<'a>(input: &'a str, name: &str) -> (&'a str, &'a str) {
    let needle = format!("</{}", name);
    match input.to_ascii_lowercase().find(&needle) {
        Some(index) => (&input[index..], &input[..index]),
        None => ("", input),
    }
}

#[tracing::instrument(level = "trace", skip(input))]
fn tokenize(mut input: &str) -> Vec<MarkupToken> {
    let mut tokens = Vec::new();
    while !input.is_empty() {
        let parsed = alt((
            parse_comment,
            parse_doctype,
            parse_end_tag,
            parse_start_tag,
            parse_text,
            parse_stray_angle,
        ))(input);

        let (remaining, token) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                trace!("Unparsed markup kept as text: {:?}", e);
                tokens.push(MarkupToken::Text(input.to_string()));
                break;
            }
        };
        input = remaining;

        let raw_text_of = match &token {
            MarkupToken::StartTag {
                name,
                self_closing: false,
                ..
            } if is_raw_text_element(name) => Some(name.clone()),
            _ => None,
        };
        tokens.push(token);

        if let Some(name) = raw_text_of {
            let (remaining, text) = take_raw_text(input, &name);
            if !text.is_empty() {
                tokens.push(MarkupToken::Text(text.to_string()));
            }
            input = remaining;
        }
    }
    tokens
}

fn append(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

fn close_top(stack: &mut Vec<Element>, root: &mut Vec<Node>) {
    if let Some(element) = stack.pop() {
        append(stack, root, Node::Element(element));
    }
}

/// Parses a markup fragment into a detached node list.
///
/// Lenient: malformed tags become text, stray end tags are dropped and
/// unclosed elements are closed at the end of input. Text and attribute
/// values are kept verbatim.
///
/// ```
/// use viewtpl::markup::{parse_fragment, serialize};
///
/// let nodes = parse_fragment(r#"<ul><li :repeat="item in items">{{ item }}</li></ul>"#);
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(serialize(&nodes), r#"<ul><li :repeat="item in items">{{ item }}</li></ul>"#);
/// ```
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    for token in tokenize(input) {
        match token {
            MarkupToken::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Element::with_attributes(name, attributes);
                if self_closing || is_void_element(&element.name) {
                    append(&mut stack, &mut root, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            MarkupToken::EndTag(name) => {
                if let Some(index) = stack.iter().rposition(|element| element.name == name) {
                    while stack.len() > index {
                        close_top(&mut stack, &mut root);
                    }
                } else {
                    trace!("Dropping stray end tag </{}>", name);
                }
            }
            MarkupToken::Text(text) => append(&mut stack, &mut root, Node::Text(text)),
            MarkupToken::Comment(comment) => {
                append(&mut stack, &mut root, Node::Comment(comment))
            }
            MarkupToken::Doctype(doctype) => {
                append(&mut stack, &mut root, Node::Doctype(doctype))
            }
        }
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::serialize;
    use pretty_assertions::assert_eq;

    fn element(node: &Node) -> &Element {
        node.as_element().expect("element")
    }

    #[test]
    fn test_attributes_keep_declaration_order() {
        let nodes = parse_fragment(r#"<p :show="a" :bind='b' id=main hidden></p>"#);
        let p = element(&nodes[0]);
        let names: Vec<_> = p.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec![":show", ":bind", "id", "hidden"]);
        assert_eq!(p.get_attribute(":bind"), Some("b"));
        assert_eq!(p.get_attribute("id"), Some("main"));
        assert_eq!(p.attribute("hidden").and_then(|a| a.value.clone()), None);
    }

    #[test]
    fn test_names_are_lowercased() {
        let nodes = parse_fragment(r#"<DIV Class="x"></div>"#);
        let div = element(&nodes[0]);
        assert_eq!(div.name, "div");
        assert_eq!(div.get_attribute("class"), Some("x"));
    }

    #[test]
    fn test_void_and_nesting() {
        let nodes = parse_fragment("<div><img src=a.png><span>t</span></div>text");
        assert_eq!(nodes.len(), 2);
        let div = element(&nodes[0]);
        assert_eq!(div.children.len(), 2);
        assert_eq!(element(&div.children[0]).name, "img");
        assert_eq!(nodes[1], Node::Text("text".to_string()));
    }

    #[test]
    fn test_raw_text_elements() {
        let nodes = parse_fragment("<script>if (a < b) { x('</div>') }</script>");
        let script = element(&nodes[0]);
        assert_eq!(
            script.children,
            vec![Node::Text("if (a < b) { x('</div>') }".to_string())]
        );
    }

    #[test]
    fn test_lenient_recovery() {
        assert_eq!(
            serialize(&parse_fragment("</b><div><p>open")),
            "<div><p>open</p></div>"
        );
        assert_eq!(serialize(&parse_fragment("a < b")), "a < b");
        assert_eq!(
            serialize(&parse_fragment("<div><span></div>")),
            "<div><span></span></div>"
        );
        assert_eq!(serialize(&parse_fragment("<!-- open")), "<!-- open-->");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fragment("").is_empty());
    }
}
