//! Form and form element types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete form definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier (e.g., "social_group_request_membership_request_anonymous").
    pub form_id: String,

    /// Unique build ID for this form instance.
    pub form_build_id: String,

    /// Form action URL.
    pub action: String,

    /// HTTP method ("post" or "get").
    pub method: String,

    /// Form elements keyed by name.
    pub elements: BTreeMap<String, FormElement>,
}

impl Form {
    /// Create a new form with the given ID.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            form_build_id: format!("form-{}", uuid::Uuid::now_v7()),
            action: String::new(),
            method: "post".to_string(),
            elements: BTreeMap::new(),
        }
    }

    /// Add an element to the form.
    pub fn element(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.elements.insert(name.into(), element);
        self
    }

    pub fn get_element(&self, name: &str) -> Option<&FormElement> {
        self.elements.get(name)
    }
}

/// A form element definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormElement {
    /// Element type with type-specific configuration.
    #[serde(flatten)]
    pub element_type: ElementType,

    /// Element title/label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sort weight (lower = appears first).
    #[serde(default)]
    pub weight: i32,

    /// Additional HTML attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,

    /// Child elements (for containers and actions).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FormElement>,
}

impl FormElement {
    /// Create an HTML tag element (e.g. a paragraph of text).
    pub fn html_tag(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ElementType::HtmlTag {
            tag: tag.into(),
            value: value.into(),
        })
    }

    /// Create a link element.
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(ElementType::Link {
            url: url.into(),
        })
        .title(title)
    }

    /// Create the form actions wrapper.
    pub fn actions() -> Self {
        Self::new(ElementType::Actions)
    }

    fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            title: None,
            weight: 0,
            attributes: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    /// Set the element title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the CSS classes from a space separated list.
    pub fn classes(mut self, classes: &str) -> Self {
        let classes: Vec<Value> = classes.split_whitespace().map(Value::from).collect();
        self.attributes
            .insert("class".to_string(), Value::Array(classes));
        self
    }

    /// Add a child element.
    pub fn child(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.children.insert(name.into(), element);
        self
    }

    /// CSS classes set on the element.
    pub fn class_list(&self) -> Vec<&str> {
        match self.attributes.get("class") {
            Some(Value::Array(classes)) => classes.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Element type variants with type-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementType {
    /// Text wrapped in an HTML tag.
    HtmlTag { tag: String, value: String },

    /// Link rendered as an anchor; the element title is its text.
    Link { url: String },

    /// Wrapper for the form's buttons and links.
    Actions,
}

impl ElementType {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::HtmlTag { .. } => "html_tag",
            ElementType::Link { .. } => "link",
            ElementType::Actions => "actions",
        }
    }
}
