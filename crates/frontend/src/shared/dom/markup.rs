//! Tolerant reader for the HTML fragments servers send back.
//!
//! Covers what rendered list items contain: nested elements, quoted and bare
//! attributes, void and self-closed tags, comments and text. Unknown or
//! unbalanced end tags are ignored; unclosed elements are closed at the end.

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Markup>,
    },
    Text(String),
}

const VOID_TAGS: [&str; 10] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
];

struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Markup>,
}

impl OpenElement {
    fn finish(self) -> Markup {
        Markup::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

pub fn parse_fragment(html: &str) -> Vec<Markup> {
    let mut roots = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let tag = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");
            close_element(&mut stack, &mut roots, &tag);
            continue;
        }

        if let Some(after) = rest.strip_prefix('<') {
            if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let (tag, attributes, self_closing, remaining) = read_start_tag(after);
                rest = remaining;
                if self_closing || VOID_TAGS.contains(&tag.as_str()) {
                    let element = Markup::Element {
                        tag,
                        attributes,
                        children: Vec::new(),
                    };
                    push_node(&mut stack, &mut roots, element);
                } else {
                    stack.push(OpenElement {
                        tag,
                        attributes,
                        children: Vec::new(),
                    });
                }
                continue;
            }
            if after.starts_with('!') || after.starts_with('?') {
                // doctype or processing instruction
                let end = after.find('>').map_or(after.len(), |i| i + 1);
                rest = &after[end..];
                continue;
            }
        }

        // Text runs up to the next '<', always consuming at least one char.
        let end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '<')
            .map_or(rest.len(), |(i, _)| i);
        let text = &rest[..end];
        rest = &rest[end..];
        if !text.trim().is_empty() {
            push_node(&mut stack, &mut roots, Markup::Text(decode_entities(text)));
        }
    }

    while let Some(open) = stack.pop() {
        let element = open.finish();
        push_node(&mut stack, &mut roots, element);
    }
    roots
}

fn push_node(stack: &mut [OpenElement], roots: &mut Vec<Markup>, node: Markup) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn close_element(stack: &mut Vec<OpenElement>, roots: &mut Vec<Markup>, tag: &str) {
    let Some(position) = stack.iter().rposition(|open| open.tag == tag) else {
        return;
    };
    while stack.len() > position {
        if let Some(open) = stack.pop() {
            let element = open.finish();
            push_node(stack, roots, element);
        }
    }
}

/// Reads `name attr="v" ...>` (the leading `<` already consumed).
fn read_start_tag(input: &str) -> (String, Vec<(String, String)>, bool, &str) {
    let name_end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'))
        .unwrap_or(input.len());
    let tag = input[..name_end].to_ascii_lowercase();
    let mut rest = &input[name_end..];
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return (tag, attributes, false, rest);
        }
        if let Some(after) = rest.strip_prefix("/>") {
            return (tag, attributes, true, after);
        }
        if let Some(after) = rest.strip_prefix('>') {
            return (tag, attributes, false, after);
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        if name_end == 0 {
            // stray '/' or '='
            rest = &rest[1..];
            continue;
        }
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            attributes.push((name, String::new()));
            continue;
        };
        let after_eq = after_eq.trim_start();
        let (value, remaining) = read_attribute_value(after_eq);
        attributes.push((name, decode_entities(value)));
        rest = remaining;
    }
}

fn read_attribute_value(input: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(after) = input.strip_prefix(quote) {
            return match after.find(quote) {
                Some(end) => (&after[..end], &after[end + 1..]),
                None => (after, ""),
            };
        }
    }
    let end = input
        .find(|c: char| c.is_whitespace() || c == '>')
        .unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
