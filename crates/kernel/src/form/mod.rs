//! Declarative form definitions.
//!
//! Forms are built as typed element trees and serialized for the theme
//! layer to render.

mod types;

pub use types::{ElementType, Form, FormElement};
