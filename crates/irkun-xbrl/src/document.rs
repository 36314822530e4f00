//! Parsed XBRL instances.
//!
//! An instance document is flattened into the list of its facts: every
//! element carrying a `contextRef` attribute, with its namespace, local name
//! and text. Contexts, units and footnotes are not retained.

use irkun_core::{DataError, Result};
use serde::{Deserialize, Serialize};

use crate::tags::TagName;

/// A fact reported in an XBRL instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XbrlFact {
    /// Namespace URI of the element.
    pub namespace: Option<String>,
    /// Local name of the element (e.g. `NetSales`).
    pub name: String,
    /// Id of the context the fact is reported in.
    pub context_ref: String,
    /// Text content; `None` for nil or empty facts.
    pub text: Option<String>,
}

impl XbrlFact {
    /// Returns the numeric value of the fact, if it has one.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.text.as_deref().and_then(parse_value)
    }
}

/// Parses the text of a numeric fact.
///
/// Thousands separators are ignored. Anything else that is not a finite
/// number yields `None`, never zero.
#[must_use]
pub fn parse_value(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The facts of one XBRL instance, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XbrlDocument {
    /// All facts in the document
    pub facts: Vec<XbrlFact>,
}

impl XbrlDocument {
    /// Parses an XBRL instance.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| DataError::Xml(e.to_string()))?;

        let facts = doc
            .descendants()
            .filter(|node| node.is_element())
            .filter_map(|node| {
                let context_ref = node.attribute("contextRef")?;
                let text = node
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                Some(XbrlFact {
                    namespace: node.tag_name().namespace().map(str::to_string),
                    name: node.tag_name().name().to_string(),
                    context_ref: context_ref.to_string(),
                    text,
                })
            })
            .collect();

        Ok(Self { facts })
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the document has no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Returns the facts reported under `tag`, in document order.
    pub fn facts_for<'a>(&'a self, tag: &'a TagName) -> impl Iterator<Item = &'a XbrlFact> + 'a {
        self.facts.iter().filter(move |fact| tag.matches(fact))
    }
}
