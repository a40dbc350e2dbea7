//! Element mutators.

use std::error::Error;

use lol_html::html_content::ContentType;
use lol_html::send::Element;

/// A single edit applied to every element a selector matches.
///
/// Each variant carries the literal it writes; applying it has no other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutator {
    /// Set (or overwrite) an attribute.
    SetAttribute { name: String, value: String },
    /// Replace the element's inner content with escaped text.
    SetInnerText(String),
    /// Insert raw markup as the element's first child content.
    Prepend(String),
}

impl Mutator {
    pub fn set_attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Mutator::SetAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn set_inner_text(text: impl Into<String>) -> Self {
        Mutator::SetInnerText(text.into())
    }

    pub fn prepend(html: impl Into<String>) -> Self {
        Mutator::Prepend(html.into())
    }

    /// Apply the edit to a matched element.
    pub fn apply(&self, el: &mut Element<'_, '_>) -> Result<(), Box<dyn Error + Send + Sync>> {
        match self {
            Mutator::SetAttribute { name, value } => el.set_attribute(name, value)?,
            Mutator::SetInnerText(text) => el.set_inner_content(text, ContentType::Text),
            Mutator::Prepend(html) => el.prepend(html, ContentType::Html),
        }
        Ok(())
    }
}
