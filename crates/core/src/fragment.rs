//! Attaching fragments to text ranges and reading them back.
//!
//! The editing surface is reached only through the [`Host`] trait. An
//! annotated run is stored by the host as an [`AnnotatedNode`]: a small set of
//! attributes and class tokens from which [`detach`] rebuilds the
//! [`FragmentAnnotation`].

use crate::effect::{is_known_effect, normalize_effect, DEFAULT_EFFECT};
use crate::types::{generate_fragment_id, parse_order_hint, FragmentAnnotation};
use crate::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Class token carried by every fragment run.
pub const FRAGMENT_CLASS: &str = "fragment";

/// Marker shown in front of fragment text in the editor.
pub const FRAGMENT_INDICATOR: &str = "▣";

const ATTR_ID: &str = "data-id";
const ATTR_TEXT: &str = "data-text";
const ATTR_INDEX: &str = "data-fragment-index";
const ATTR_EDITABLE: &str = "contenteditable";
const ATTR_CLASS: &str = "class";

/// A contiguous range of a document, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    pub fn end(&self) -> usize {
        self.index + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// The editing surface a fragment is created in.
pub trait Host {
    /// The current selection, if the editor has one.
    fn selection(&self) -> Option<Range>;

    /// Plain text covered by `range`.
    fn text(&self, range: Range) -> Result<String>;

    /// Replace `range` with a single annotated run, in one step.
    fn format_range(&mut self, range: Range, annotation: &FragmentAnnotation) -> Result<()>;

    /// Move the caret to `position`.
    fn set_selection(&mut self, position: usize);

    /// Called after a fragment has been attached.
    fn fragment_created(&mut self, _annotation: &FragmentAnnotation) {}
}

/// The two inputs collected when a user creates a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRequest {
    pub effect: String,
    pub index: Option<u32>,
}

impl Default for FragmentRequest {
    fn default() -> Self {
        Self {
            effect: DEFAULT_EFFECT.to_string(),
            index: None,
        }
    }
}

impl FragmentRequest {
    /// Create a request with the default effect and no order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the effect. An empty name selects the default.
    pub fn with_effect(mut self, effect: &str) -> Self {
        self.effect = normalize_effect(effect);
        self
    }

    /// Set an explicit reveal order.
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Build a request from raw form inputs.
    ///
    /// A non-numeric order is dropped, not rejected.
    pub fn from_input(effect: &str, order: &str) -> Self {
        Self {
            effect: normalize_effect(effect),
            index: parse_order_hint(order),
        }
    }
}

/// Turn the host's current selection into a fragment.
///
/// Fails with [`Error::EmptySelection`] when nothing is selected. On success
/// the selected range has been replaced by one annotated run and the caret
/// sits at the end of it.
pub fn attach<H: Host + ?Sized>(host: &mut H, request: &FragmentRequest) -> Result<FragmentAnnotation> {
    let range = match host.selection() {
        Some(range) if !range.is_empty() => range,
        _ => return Err(Error::EmptySelection),
    };

    let text = host.text(range)?;
    let annotation = FragmentAnnotation::new(
        generate_fragment_id(),
        text,
        &request.effect,
        request.index,
    );

    host.format_range(range, &annotation)?;
    host.set_selection(range.end());

    log::debug!(
        "Created fragment {} ({}, index {:?})",
        annotation.id,
        annotation.effect,
        annotation.index
    );
    host.fragment_created(&annotation);

    Ok(annotation)
}

/// Rebuild a fragment from its stored run.
pub fn detach(node: &AnnotatedNode) -> FragmentAnnotation {
    let effect = node
        .classes
        .iter()
        .find(|class| class.as_str() != DEFAULT_EFFECT && is_known_effect(class))
        .map(String::as_str)
        .unwrap_or(DEFAULT_EFFECT);

    FragmentAnnotation {
        id: node.attribute(ATTR_ID).unwrap_or_default().to_string(),
        text: node.attribute(ATTR_TEXT).unwrap_or_default().to_string(),
        effect: effect.to_string(),
        index: node.attribute(ATTR_INDEX).and_then(parse_order_hint),
    }
}

/// Stored form of an annotated run: its attributes and class tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedNode {
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
}

impl AnnotatedNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether this run carries fragment metadata.
    pub fn is_fragment(&self) -> bool {
        self.has_class(FRAGMENT_CLASS)
    }

    /// Text shown for the run (the stored snapshot).
    pub fn text(&self) -> &str {
        self.attribute(ATTR_TEXT).unwrap_or_default()
    }

    /// Serialize as an editor span.
    pub fn to_markup(&self) -> String {
        let mut markup = String::from("<span");

        if !self.classes.is_empty() {
            markup.push_str(&format!(
                " {}=\"{}\"",
                ATTR_CLASS,
                escape(self.classes.join(" ").as_str())
            ));
        }
        for (name, value) in &self.attributes {
            markup.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
        }

        markup.push_str(&format!(
            "><span class=\"fragment-indicator\">{}</span> {}</span>",
            FRAGMENT_INDICATOR,
            escape(self.text())
        ));
        markup
    }

    /// Parse the outermost element of an editor span.
    ///
    /// Only the root element's attributes are read; its body is display-only.
    pub fn parse(markup: &str) -> Result<Self> {
        let mut reader = Reader::from_str(markup);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    return Self::from_element(e);
                }
                Ok(Event::Eof) => {
                    return Err(Error::NodeParseError("no element found".to_string()));
                }
                Err(e) => {
                    return Err(Error::NodeParseError(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }
    }

    fn from_element(element: &BytesStart) -> Result<Self> {
        let mut node = Self::new();

        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::NodeParseError(e.to_string()))?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::NodeParseError(e.to_string()))?
                .to_string();

            if name == ATTR_CLASS {
                for class in value.split_whitespace() {
                    node.add_class(class);
                }
            } else {
                node.set_attribute(name, value);
            }
        }

        Ok(node)
    }
}

impl FragmentAnnotation {
    /// Build the stored run for this fragment.
    pub fn to_node(&self) -> AnnotatedNode {
        let mut node = AnnotatedNode::new();
        node.set_attribute(ATTR_ID, self.id.as_str());
        node.set_attribute(ATTR_TEXT, self.text.as_str());
        node.add_class(FRAGMENT_CLASS);

        let effect = normalize_effect(&self.effect);
        if effect != DEFAULT_EFFECT {
            node.add_class(effect);
        }
        if let Some(index) = self.index {
            node.set_attribute(ATTR_INDEX, index.to_string());
        }

        // Edits must go through delete and recreate so `text` stays accurate
        node.set_attribute(ATTR_EDITABLE, "false");
        node
    }
}
