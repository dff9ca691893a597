//! HTML parsing and tolerant element queries
//!
//! Extraction code never touches `scraper` directly. It goes through the small
//! query surface defined here:
//! - first element by tag
//! - elements by tag and class
//! - first element by tag carrying an attribute
//! - attribute read and normalized text read
//!
//! Parsing never fails: html5ever recovers from malformed markup, and bytes that
//! are not HTML at all simply produce a document without the wanted elements.

use scraper::{ElementRef, Html, Selector};

/// Read access to a single element
pub trait NodeRead {
    /// Value of attribute `name`, if present
    fn attr(&self, name: &str) -> Option<&str>;

    /// Text content with whitespace runs collapsed and ends trimmed
    fn text(&self) -> String;
}

/// Element lookups over a document or a subtree
pub trait MarkupQuery {
    type Node<'a>: NodeRead
    where
        Self: 'a;

    /// First element with the given tag, in document order
    fn first(&self, tag: &str) -> Option<Self::Node<'_>>;

    /// All elements with the given tag carrying every class in `class`
    ///
    /// `class` may hold several space-separated class names.
    fn all_with_class(&self, tag: &str, class: &str) -> Vec<Self::Node<'_>>;

    /// First element with the given tag and class
    fn first_with_class(&self, tag: &str, class: &str) -> Option<Self::Node<'_>> {
        self.all_with_class(tag, class).into_iter().next()
    }

    /// First element with the given tag on which `attr` is present
    fn first_with_attr(&self, tag: &str, attr: &str) -> Option<Self::Node<'_>>;
}

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw response bytes, replacing invalid UTF-8 sequences
    pub fn parse(bytes: &[u8]) -> Self {
        Self::parse_str(&String::from_utf8_lossy(bytes))
    }

    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }
}

/// An element inside a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> NodeRead for Node<'a> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    fn text(&self) -> String {
        normalize_whitespace(&self.element.text().collect::<String>())
    }
}

impl MarkupQuery for Document {
    type Node<'a> = Node<'a>;

    fn first(&self, tag: &str) -> Option<Node<'_>> {
        let selector = tag_selector(tag)?;
        self.html.select(&selector).next().map(|element| Node { element })
    }

    fn all_with_class(&self, tag: &str, class: &str) -> Vec<Node<'_>> {
        match class_selector(tag, class) {
            Some(selector) => self
                .html
                .select(&selector)
                .map(|element| Node { element })
                .collect(),
            None => Vec::new(),
        }
    }

    fn first_with_attr(&self, tag: &str, attr: &str) -> Option<Node<'_>> {
        let selector = attr_selector(tag, attr)?;
        self.html.select(&selector).next().map(|element| Node { element })
    }
}

impl<'n> MarkupQuery for Node<'n> {
    type Node<'a> = Node<'a> where Self: 'a;

    fn first(&self, tag: &str) -> Option<Node<'_>> {
        let selector = tag_selector(tag)?;
        self.element.select(&selector).next().map(|element| Node { element })
    }

    fn all_with_class(&self, tag: &str, class: &str) -> Vec<Node<'_>> {
        match class_selector(tag, class) {
            Some(selector) => self
                .element
                .select(&selector)
                .map(|element| Node { element })
                .collect(),
            None => Vec::new(),
        }
    }

    fn first_with_attr(&self, tag: &str, attr: &str) -> Option<Node<'_>> {
        let selector = attr_selector(tag, attr)?;
        self.element.select(&selector).next().map(|element| Node { element })
    }
}

fn tag_selector(tag: &str) -> Option<Selector> {
    parse_selector(tag)
}

fn class_selector(tag: &str, class: &str) -> Option<Selector> {
    let classes: String = class
        .split_whitespace()
        .map(|c| format!(".{}", c))
        .collect();
    parse_selector(&format!("{}{}", tag, classes))
}

fn attr_selector(tag: &str, attr: &str) -> Option<Selector> {
    parse_selector(&format!("{}[{}]", tag, attr))
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
