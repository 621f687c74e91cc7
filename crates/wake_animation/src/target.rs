//! Tween targets

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use wake_core::{Document, Element, ElementRef, Node};

/// What a tween animates: a selector, an element, or a collection
#[derive(Clone)]
pub enum Target {
    Selector(String),
    Element(ElementRef),
    Elements(Vec<ElementRef>),
    /// Raw child nodes; text and comments are skipped
    Nodes(Vec<Node>),
}

impl Target {
    pub fn element<E: Element + 'static>(element: Arc<E>) -> Self {
        Target::Element(element)
    }

    pub fn elements<E: Element + 'static>(elements: impl IntoIterator<Item = Arc<E>>) -> Self {
        Target::Elements(
            elements
                .into_iter()
                .map(|e| e as ElementRef)
                .collect(),
        )
    }

    /// Flatten to elements in document order, without duplicates
    ///
    /// Never fails: an invalid selector resolves to nothing.
    pub fn resolve(&self, document: &dyn Document) -> Vec<ElementRef> {
        let candidates: Vec<ElementRef> = match self {
            Target::Selector(selector) => match document.query_selector_all(selector) {
                Ok(nodes) => nodes.into_iter().filter_map(Node::into_element).collect(),
                Err(err) => {
                    tracing::warn!(%selector, error = %err, "target selector matched nothing");
                    Vec::new()
                }
            },
            Target::Element(element) => vec![element.clone()],
            Target::Elements(elements) => elements.clone(),
            Target::Nodes(nodes) => nodes.iter().filter_map(|n| n.as_element().cloned()).collect(),
        };

        let mut seen = FxHashSet::default();
        candidates
            .into_iter()
            .filter(|element| seen.insert(element.id()))
            .collect()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            Target::Element(element) => f.debug_tuple("Element").field(&element.id()).finish(),
            Target::Elements(elements) => f
                .debug_tuple("Elements")
                .field(&elements.iter().map(|e| e.id()).collect::<Vec<_>>())
                .finish(),
            Target::Nodes(nodes) => f.debug_tuple("Nodes").field(nodes).finish(),
        }
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<ElementRef> for Target {
    fn from(element: ElementRef) -> Self {
        Target::Element(element)
    }
}

impl From<&ElementRef> for Target {
    fn from(element: &ElementRef) -> Self {
        Target::Element(element.clone())
    }
}

impl From<Vec<ElementRef>> for Target {
    fn from(elements: Vec<ElementRef>) -> Self {
        Target::Elements(elements)
    }
}

impl From<Vec<Node>> for Target {
    fn from(nodes: Vec<Node>) -> Self {
        Target::Nodes(nodes)
    }
}
