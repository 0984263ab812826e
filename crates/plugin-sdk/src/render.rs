//! Render element builder API.
//!
//! Builders return structured JSON render elements (never raw HTML). The
//! keys mirror the `#`-prefixed render array convention so a theme layer can
//! walk the tree without knowing which builder produced it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A render element in the JSON render tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderElement {
    #[serde(rename = "#type")]
    pub element_type: String,
    #[serde(rename = "#weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(rename = "#tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "#value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "#url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "#view_mode", skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(rename = "#prefix", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(rename = "#suffix", skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(rename = "#attributes", skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(flatten)]
    pub children: BTreeMap<String, RenderElement>,
}

impl RenderElement {
    pub fn set_child(&mut self, key: &str, element: RenderElement) {
        self.children.insert(key.into(), element);
    }

    pub fn child(&self, key: &str) -> Option<&RenderElement> {
        self.children.get(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut RenderElement> {
        self.children.get_mut(key)
    }

    /// Children in render order: by weight, then key.
    pub fn sorted_children(&self) -> Vec<(&String, &RenderElement)> {
        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by_key(|(_, el)| el.weight.unwrap_or(0));
        children
    }

    /// True when the element renders nothing at all.
    pub fn is_empty(&self) -> bool {
        self.element_type.is_empty() && self.children.is_empty() && self.value.is_none()
    }

    /// CSS classes set through the builder, in insertion order.
    pub fn classes(&self) -> Vec<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.get("class"))
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Builder for constructing render elements.
pub struct ElementBuilder {
    element_type: String,
    weight: Option<i32>,
    tag: Option<String>,
    value: Option<String>,
    url: Option<String>,
    view_mode: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    classes: Vec<String>,
    attrs: serde_json::Map<String, Value>,
    children: BTreeMap<String, RenderElement>,
}

impl ElementBuilder {
    fn new(element_type: &str) -> Self {
        Self {
            element_type: element_type.into(),
            weight: None,
            tag: None,
            value: None,
            url: None,
            view_mode: None,
            prefix: None,
            suffix: None,
            classes: Vec::new(),
            attrs: serde_json::Map::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn weight(mut self, w: i32) -> Self {
        self.weight = Some(w);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn child(mut self, key: &str, element: RenderElement) -> Self {
        self.children.insert(key.into(), element);
        self
    }

    pub fn build(self) -> RenderElement {
        let attributes = if self.classes.is_empty() && self.attrs.is_empty() {
            None
        } else {
            let mut map = self.attrs;
            if !self.classes.is_empty() {
                map.insert(
                    "class".into(),
                    Value::Array(self.classes.into_iter().map(Value::String).collect()),
                );
            }
            Some(Value::Object(map))
        };

        RenderElement {
            element_type: self.element_type,
            weight: self.weight,
            tag: self.tag,
            value: self.value,
            url: self.url,
            view_mode: self.view_mode,
            prefix: self.prefix,
            suffix: self.suffix,
            attributes,
            children: self.children,
        }
    }
}

/// Create a container element (groups children).
pub fn container() -> ElementBuilder {
    ElementBuilder::new("container")
}

/// Create a markup element with an HTML tag and text value.
pub fn markup(tag: &str, value: &str) -> ElementBuilder {
    let mut b = ElementBuilder::new("markup");
    b.tag = Some(tag.into());
    b.value = Some(value.into());
    b
}

/// Create a link element.
pub fn link(href: &str, text: &str) -> ElementBuilder {
    let mut b = ElementBuilder::new("link");
    b.url = Some(href.into());
    b.value = Some(text.into());
    b
}

/// Create a placeholder for a rendered entity in the given view mode.
pub fn entity(entity_type: &str, id: i64, view_mode: &str) -> ElementBuilder {
    let mut b = ElementBuilder::new("entity");
    b.view_mode = Some(view_mode.into());
    b.attrs
        .insert("data-entity-type".into(), Value::String(entity_type.into()));
    b.attrs
        .insert("data-entity-id".into(), Value::String(id.to_string()));
    b
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn link_serializes_with_hash_keys() {
        let el = link("/user/login", "Log in").class("btn").build();
        let json = serde_json::to_value(&el).unwrap();

        assert_eq!(json["#type"], "link");
        assert_eq!(json["#url"], "/user/login");
        assert_eq!(json["#value"], "Log in");
        assert_eq!(json["#attributes"]["class"][0], "btn");
        assert!(json.get("#prefix").is_none());
    }

    #[test]
    fn children_flatten_next_to_properties() {
        let el = container()
            .prefix("<div>")
            .suffix("</div>")
            .child("first", markup("p", "one").build())
            .build();
        let json = serde_json::to_value(&el).unwrap();

        assert_eq!(json["#prefix"], "<div>");
        assert_eq!(json["first"]["#tag"], "p");

        let back: RenderElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn classes_keep_insertion_order() {
        let el = container().class("btn").class("btn-flat").build();
        assert_eq!(el.classes(), vec!["btn", "btn-flat"]);
        assert!(RenderElement::default().is_empty());
    }

    #[test]
    fn sorted_children_follow_weight() {
        let el = container()
            .child("b", markup("p", "second").weight(2).build())
            .child("a", markup("p", "third").weight(10).build())
            .child("c", markup("p", "first").weight(1).build())
            .build();
        let keys: Vec<&str> = el.sorted_children().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
    }
}
