//! Headless elements and document

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashMap;

use super::animation::HeadlessAnimation;
use super::Clock;
use crate::error::{HostError, Result};
use crate::host::{
    Document, EffectTiming, Element, ElementId, ElementRef, Keyframe, NativeAnimation, Node,
    Overlay, StyleProperty,
};

#[derive(Default)]
struct ElementData {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: FxHashMap<StyleProperty, String>,
    children: Vec<Node>,
    overlays: Vec<Overlay>,
    animations: Vec<Arc<HeadlessAnimation>>,
}

/// In-memory element
pub struct HeadlessElement {
    id: ElementId,
    tag: String,
    animatable: bool,
    clock: Arc<Clock>,
    data: Mutex<ElementData>,
}

impl HeadlessElement {
    pub(crate) fn new(id: ElementId, tag: &str, animatable: bool, clock: Arc<Clock>) -> Self {
        Self {
            id,
            tag: tag.to_ascii_lowercase(),
            animatable,
            clock,
            data: Mutex::new(ElementData::default()),
        }
    }

    pub fn append_child(&self, child: &Arc<HeadlessElement>) {
        let child: ElementRef = child.clone();
        self.data.lock().unwrap().children.push(Node::Element(child));
    }

    pub fn append_text(&self, text: impl Into<String>) {
        self.data
            .lock()
            .unwrap()
            .children
            .push(Node::Text(text.into()));
    }

    pub fn append_comment(&self, text: impl Into<String>) {
        self.data
            .lock()
            .unwrap()
            .children
            .push(Node::Comment(text.into()));
    }

    /// Every animation ever created on this element, oldest first
    pub fn animations(&self) -> Vec<Arc<HeadlessAnimation>> {
        self.data.lock().unwrap().animations.clone()
    }

    /// Most recently created animation
    pub fn last_animation(&self) -> Option<Arc<HeadlessAnimation>> {
        self.data.lock().unwrap().animations.last().cloned()
    }

    /// Animations that have not been cancelled
    pub fn active_animation_count(&self) -> usize {
        self.data
            .lock()
            .unwrap()
            .animations
            .iter()
            .filter(|a| a.is_active())
            .count()
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        self.data.lock().unwrap().overlays.clone()
    }

    pub fn overlay(&self, key: &str) -> Option<Overlay> {
        self.data
            .lock()
            .unwrap()
            .overlays
            .iter()
            .find(|o| o.key == key)
            .cloned()
    }

    pub fn classes(&self) -> Vec<String> {
        self.data.lock().unwrap().classes.iter().cloned().collect()
    }

    fn matches(&self, selector: &SimpleSelector) -> bool {
        match selector {
            SimpleSelector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
            SimpleSelector::Id(id) => self.attribute("id").as_deref() == Some(id.as_str()),
            SimpleSelector::Class(class) => self.has_class(class),
        }
    }
}

impl Element for HeadlessElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn animate(
        &self,
        keyframes: &[Keyframe],
        timing: &EffectTiming,
    ) -> Option<Arc<dyn NativeAnimation>> {
        if !self.animatable {
            return None;
        }

        let animation = Arc::new(HeadlessAnimation::new(
            self.id,
            keyframes.to_vec(),
            timing.clone(),
        ));
        self.clock.register(&animation);
        self.data.lock().unwrap().animations.push(animation.clone());
        Some(animation)
    }

    fn set_style(&self, property: StyleProperty, value: Option<&str>) {
        let mut data = self.data.lock().unwrap();
        match value {
            Some(value) => {
                data.styles.insert(property, value.to_string());
            }
            None => {
                data.styles.remove(&property);
            }
        }
    }

    fn style(&self, property: StyleProperty) -> Option<String> {
        self.data.lock().unwrap().styles.get(&property).cloned()
    }

    fn children(&self) -> Vec<Node> {
        self.data.lock().unwrap().children.clone()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.data.lock().unwrap().attributes.remove(name);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.data.lock().unwrap().attributes.get(name).cloned()
    }

    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut data = self.data.lock().unwrap();
        if enabled {
            data.classes.insert(class.to_string());
        } else {
            data.classes.remove(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.data.lock().unwrap().classes.contains(class)
    }

    fn attach_overlay(&self, overlay: Overlay) {
        let mut data = self.data.lock().unwrap();
        data.overlays.retain(|o| o.key != overlay.key);
        data.overlays.push(overlay);
    }

    fn detach_overlay(&self, key: &str) {
        self.data.lock().unwrap().overlays.retain(|o| o.key != key);
    }
}

#[derive(Clone, Debug, PartialEq)]
enum SimpleSelector {
    Tag(String),
    Id(String),
    Class(String),
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse the supported subset: `tag`, `#id`, `.class`, comma-separated
fn parse_selector(selector: &str) -> Result<Vec<SimpleSelector>> {
    let invalid = || HostError::InvalidSelector(selector.to_string());

    selector
        .split(',')
        .map(|part| {
            let part = part.trim();
            let parsed = if let Some(id) = part.strip_prefix('#') {
                SimpleSelector::Id(id.to_string())
            } else if let Some(class) = part.strip_prefix('.') {
                SimpleSelector::Class(class.to_string())
            } else {
                SimpleSelector::Tag(part.to_string())
            };
            let name = match &parsed {
                SimpleSelector::Tag(s) | SimpleSelector::Id(s) | SimpleSelector::Class(s) => s,
            };
            if is_ident(name) {
                Ok(parsed)
            } else {
                Err(invalid())
            }
        })
        .collect()
}

/// In-memory document holding every element created by the host
#[derive(Default)]
pub struct HeadlessDocument {
    elements: Mutex<Vec<Weak<HeadlessElement>>>,
}

impl HeadlessDocument {
    pub(crate) fn register(&self, element: &Arc<HeadlessElement>) {
        let mut elements = self.elements.lock().unwrap();
        elements.retain(|e| e.strong_count() > 0);
        elements.push(Arc::downgrade(element));
    }
}

impl Document for HeadlessDocument {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>> {
        let selectors = parse_selector(selector)?;
        let elements: Vec<Arc<HeadlessElement>> = self
            .elements
            .lock()
            .unwrap()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        Ok(elements
            .into_iter()
            .filter(|e| selectors.iter().any(|s| e.matches(s)))
            .map(|e| Node::Element(e as ElementRef))
            .collect())
    }
}
