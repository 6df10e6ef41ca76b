//! Typed queries over a parsed HTML document
//!
//! Element lookups are expressed as an [`ElementQuery`] (tag name plus one
//! [`AttributePredicate`]) instead of hand-built selector strings. Attribute
//! values are compared case-sensitively, exactly as they were authored.

use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

/// Condition on a single attribute of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributePredicate {
    /// Attribute value equals `value`
    Equals {
        attribute: &'static str,
        value: &'static str,
    },
    /// Attribute value contains `needle` as a substring
    Contains {
        attribute: &'static str,
        needle: &'static str,
    },
}

impl AttributePredicate {
    /// An element without the attribute never matches
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Equals { attribute, value } => element.attr(attribute) == Some(*value),
            Self::Contains { attribute, needle } => element
                .attr(attribute)
                .is_some_and(|actual| actual.contains(needle)),
        }
    }
}

/// Elements with a given tag name that satisfy a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementQuery {
    pub tag: &'static str,
    pub predicate: AttributePredicate,
}

impl ElementQuery {
    pub const fn new(tag: &'static str, predicate: AttributePredicate) -> Self {
        Self { tag, predicate }
    }

    pub const fn attr_equals(tag: &'static str, attribute: &'static str, value: &'static str) -> Self {
        Self::new(tag, AttributePredicate::Equals { attribute, value })
    }

    pub const fn attr_contains(tag: &'static str, attribute: &'static str, needle: &'static str) -> Self {
        Self::new(tag, AttributePredicate::Contains { attribute, needle })
    }
}

/// Parsed HTML document
pub struct HtmlDocument {
    document: Html,
}

impl HtmlDocument {
    /// Parse a document leniently; malformed markup is recovered, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// All elements matching `query`, lazily and in document order
    pub fn query_all<'a>(&'a self, query: &ElementQuery) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let ElementQuery { tag, predicate } = *query;

        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |element| {
                let element = element.value();
                element.name().eq_ignore_ascii_case(tag) && predicate.matches(element)
            })
    }

    /// First element matching `query`
    pub fn query_first(&self, query: &ElementQuery) -> Option<ElementRef<'_>> {
        self.query_all(query).next()
    }

    /// Try `queries` in order and return the first element of the first
    /// query that matches anything. Later queries are never merged in.
    pub fn first_match(&self, queries: &[ElementQuery]) -> Option<ElementRef<'_>> {
        queries.iter().find_map(|query| self.query_first(query))
    }

    /// Text of the `<title>` that is a direct child of `<head>`
    ///
    /// Whitespace is trimmed and internal runs are collapsed to one space.
    pub fn head_title(&self) -> Option<String> {
        let selector = Selector::parse("head > title").ok()?;

        self.document.select(&selector).next().map(|title| {
            title
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}
