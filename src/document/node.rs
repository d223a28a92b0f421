//! Receipt markup tree.
//!
//! [`parse`] reads XML into an owned [`Element`] tree. Namespaces are
//! dropped (elements are matched by local name), whitespace-only text runs
//! are discarded, comments and processing instructions are skipped and CDATA
//! sections become ordinary text.

use crate::error::{ReciboError, Result};

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// One markup element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Content>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    pub fn attr_with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Builder: append a text run.
    pub fn text_with(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, treating an empty value as absent.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Concatenated direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Content::Text(t) => Some(t.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }
}

/// Parse receipt markup into an [`Element`] tree rooted at the document element.
///
/// ```
/// use recibo::document::parse;
///
/// let root = parse(r#"<receipt><line>Hi</line></receipt>"#).unwrap();
/// assert_eq!(root.name, "receipt");
/// assert_eq!(root.elements().next().unwrap().text(), "Hi");
/// ```
pub fn parse(xml: &str) -> Result<Element> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| ReciboError::Xml(e.to_string()))?;
    Ok(convert(doc.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());

    // foreign-namespace attributes such as xsi:schemaLocation are not markup
    for attr in node.attributes().filter(|a| a.namespace().is_none()) {
        element
            .attributes
            .push((attr.name().to_string(), attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Content::Element(convert(child)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if text.trim().is_empty() {
                continue;
            }
            // adjacent text and CDATA runs arrive as separate nodes
            match element.children.last_mut() {
                Some(Content::Text(prev)) => prev.push_str(text),
                _ => element.children.push(Content::Text(text.to_string())),
            }
        }
    }
    element
}
