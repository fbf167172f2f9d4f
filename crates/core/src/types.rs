//! Domain types for annotated documents.
//!
//! A document reaches the conversion engine as a flat list of [`Operation`]s.
//! The serialized form is a Quill-style Delta (`{"ops": [{"insert": ...}]}`);
//! [`Delta`] reads and writes it.

use crate::effect::{normalize_effect, DEFAULT_EFFECT};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A text run marked for progressive reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentAnnotation {
    /// Identifier for host-side bookkeeping. Never used as a join key.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub id: String,

    /// Snapshot of the covered text, taken when the fragment was created.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub text: String,

    /// Animation effect name. Never empty.
    #[serde(default = "default_effect", deserialize_with = "deserialize_effect")]
    pub effect: String,

    /// Explicit reveal order within the slide.
    #[serde(
        default,
        deserialize_with = "deserialize_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<u32>,
}

impl FragmentAnnotation {
    /// Create a fragment, substituting the default effect for an empty one.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        effect: &str,
        index: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            effect: normalize_effect(effect),
            index,
        }
    }

    /// Whether the fragment uses the base effect.
    pub fn has_default_effect(&self) -> bool {
        self.effect.is_empty() || self.effect == DEFAULT_EFFECT
    }
}

/// An inline hashtag embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Normalized tag name without the leading `#`.
    #[serde(default)]
    pub id: String,

    /// The tag as typed, including the `#`.
    #[serde(default)]
    pub text: String,
}

/// One element of a document's flat operation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Literal text, possibly containing line breaks.
    TextInsert { content: String },

    /// A run carrying fragment metadata.
    AnnotatedInsert { annotation: FragmentAnnotation },

    /// An inline tag embed.
    TagInsert { tag: Tag },
}

impl Operation {
    /// Create a plain text insert.
    pub fn text(content: impl Into<String>) -> Self {
        Self::TextInsert {
            content: content.into(),
        }
    }

    /// Create an annotated insert.
    pub fn fragment(annotation: FragmentAnnotation) -> Self {
        Self::AnnotatedInsert { annotation }
    }

    /// Create a tag insert.
    pub fn tag(tag: Tag) -> Self {
        Self::TagInsert { tag }
    }

    /// The fragment carried by this operation, if any.
    pub fn as_fragment(&self) -> Option<&FragmentAnnotation> {
        match self {
            Self::AnnotatedInsert { annotation } => Some(annotation),
            _ => None,
        }
    }

    fn from_delta_op(op: DeltaOp) -> Option<Self> {
        let attributed = op.attributes.and_then(|a| a.fragment);

        match (op.insert, attributed) {
            // Formatted text: the stored snapshot wins over the run's text.
            (Some(Insert::Text(_)), Some(annotation)) => Some(Self::fragment(annotation)),
            (Some(Insert::Text(content)), None) => Some(Self::text(content)),
            (Some(Insert::Embed(Embed::Fragment(annotation))), _) => {
                Some(Self::fragment(annotation))
            }
            (Some(Insert::Embed(Embed::Tag(tag))), _) => Some(Self::tag(tag)),
            (Some(Insert::Other(value)), _) => {
                log::debug!("Skipping unsupported embed: {}", value);
                None
            }
            (None, _) => {
                log::debug!("Skipping operation without insert");
                None
            }
        }
    }

    fn into_delta_op(self) -> DeltaOp {
        let insert = match self {
            Self::TextInsert { content } => Insert::Text(content),
            Self::AnnotatedInsert { annotation } => Insert::Embed(Embed::Fragment(annotation)),
            Self::TagInsert { tag } => Insert::Embed(Embed::Tag(tag)),
        };
        DeltaOp {
            insert: Some(insert),
            attributes: None,
        }
    }
}

/// A document's content as an operation list, with an optional slide title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDelta", into = "RawDelta")]
pub struct Delta {
    /// Slide title, when the document carries one.
    pub title: Option<String>,

    /// Operations in document order.
    pub ops: Vec<Operation>,
}

impl Delta {
    /// Create a delta from operations.
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { title: None, ops }
    }

    /// Set the slide title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Parse a delta from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the delta to JSON text.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// All fragments in document order.
    pub fn fragments(&self) -> Vec<FragmentAnnotation> {
        self.ops
            .iter()
            .filter_map(Operation::as_fragment)
            .cloned()
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct RawDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    ops: Vec<DeltaOp>,
}

impl From<RawDelta> for Delta {
    fn from(raw: RawDelta) -> Self {
        Self {
            title: raw.title,
            ops: raw
                .ops
                .into_iter()
                .filter_map(Operation::from_delta_op)
                .collect(),
        }
    }
}

impl From<Delta> for RawDelta {
    fn from(delta: Delta) -> Self {
        Self {
            title: delta.title,
            ops: delta.ops.into_iter().map(Operation::into_delta_op).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DeltaOp {
    #[serde(default)]
    insert: Option<Insert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<OpAttributes>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Insert {
    Text(String),
    Embed(Embed),
    Other(Value),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Embed {
    Fragment(FragmentAnnotation),
    Tag(Tag),
}

/// Formats on a text insert. Only the fragment format matters here.
#[derive(Serialize, Deserialize)]
struct OpAttributes {
    #[serde(
        default,
        deserialize_with = "deserialize_attributed_fragment",
        skip_serializing_if = "Option::is_none"
    )]
    fragment: Option<FragmentAnnotation>,
}

/// Strings arrive from editors with loose typing; numbers keep their digits,
/// anything else reads as empty.
fn deserialize_lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// A fragment format that is not an object is ignored.
fn deserialize_attributed_fragment<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<FragmentAnnotation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        Some(value @ Value::Object(_)) => match serde_json::from_value(value) {
            Ok(fragment) => Ok(Some(fragment)),
            Err(e) => {
                log::debug!("Ignoring malformed fragment format: {}", e);
                Ok(None)
            }
        },
        Some(Value::Null) | None => Ok(None),
        Some(other) => {
            log::debug!("Ignoring non-object fragment format: {}", other);
            Ok(None)
        }
    }
}

fn default_effect() -> String {
    DEFAULT_EFFECT.to_string()
}

fn deserialize_effect<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let name = match raw {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    Ok(normalize_effect(&name))
}

fn deserialize_order<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(order_from_value))
}

fn order_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                // JS numbers arrive as floats through wasm bindings
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_order_hint(s),
        Value::Null => None,
        other => {
            log::debug!("Ignoring non-numeric fragment order: {}", other);
            None
        }
    }
}

/// Parse a user-supplied reveal order.
///
/// Malformed input is treated as "no order" rather than an error, so a typo
/// in the order field never blocks fragment creation.
pub fn parse_order_hint(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<u32>() {
        Ok(index) => Some(index),
        Err(_) => {
            log::debug!("Ignoring malformed fragment order: {:?}", input);
            None
        }
    }
}

static LAST_FRAGMENT_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a fragment id of the form `fragment-<unix millis>`.
///
/// Ids are strictly increasing within a process, even for calls in the same
/// millisecond.
pub fn generate_fragment_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut last = LAST_FRAGMENT_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_FRAGMENT_MILLIS.compare_exchange_weak(
            last,
            next,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return format!("fragment-{}", next),
            Err(current) => last = current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_substitutes_default_effect() {
        let fragment = FragmentAnnotation::new("f1", "world", "", None);
        assert_eq!(fragment.effect, "fade-in");
        assert!(fragment.has_default_effect());

        let fragment = FragmentAnnotation::new("f2", "world", "fade-up", Some(1));
        assert_eq!(fragment.effect, "fade-up");
        assert!(!fragment.has_default_effect());
    }

    #[test]
    fn test_parse_delta_with_fragment_embed() {
        let json = json!({
            "ops": [
                { "insert": "Hello " },
                { "insert": { "fragment": { "id": "f1", "text": "world", "effect": "fade-up", "index": 1 } } },
                { "insert": "!\nBye" }
            ]
        });

        let delta: Delta = serde_json::from_value(json).unwrap();

        assert_eq!(delta.title, None);
        assert_eq!(
            delta.ops,
            vec![
                Operation::text("Hello "),
                Operation::fragment(FragmentAnnotation::new("f1", "world", "fade-up", Some(1))),
                Operation::text("!\nBye"),
            ]
        );
    }

    #[test]
    fn test_parse_delta_with_fragment_format() {
        let json = r#"{"ops":[{"insert":"world","attributes":{"bold":true,"fragment":{"id":"f1","text":"world"}}}]}"#;

        let delta = Delta::from_json(json).unwrap();

        assert_eq!(
            delta.ops,
            vec![Operation::fragment(FragmentAnnotation::new("f1", "world", "fade-in", None))]
        );
    }

    #[test]
    fn test_parse_delta_ignores_other_formats() {
        let json = r#"{"ops":[{"insert":"bold text","attributes":{"bold":true}}]}"#;

        let delta = Delta::from_json(json).unwrap();

        assert_eq!(delta.ops, vec![Operation::text("bold text")]);
    }

    #[test]
    fn test_parse_delta_with_tag_and_unknown_embed() {
        let json = json!({
            "title": "Agenda",
            "ops": [
                { "insert": { "tag": { "id": "proje", "text": "#proje" } } },
                { "insert": { "image": "https://example.com/a.png" } },
                { "retain": 3 },
                { "insert": "\n" }
            ]
        });

        let delta: Delta = serde_json::from_value(json).unwrap();

        assert_eq!(delta.title.as_deref(), Some("Agenda"));
        assert_eq!(
            delta.ops,
            vec![
                Operation::tag(Tag {
                    id: "proje".to_string(),
                    text: "#proje".to_string()
                }),
                Operation::text("\n"),
            ]
        );
    }

    #[test]
    fn test_lenient_fragment_fields() {
        let json = json!({
            "ops": [
                { "insert": { "fragment": { "id": "a", "text": "x", "effect": "", "index": "3" } } },
                { "insert": { "fragment": { "id": "b", "text": "y", "effect": null, "index": "soon" } } },
                { "insert": { "fragment": { "text": "z", "index": -2 } } },
                { "insert": { "fragment": { "text": "w", "index": 4.0 } } }
            ]
        });

        let delta: Delta = serde_json::from_value(json).unwrap();
        let fragments = delta.fragments();

        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0].effect, "fade-in");
        assert_eq!(fragments[0].index, Some(3));
        assert_eq!(fragments[1].effect, "fade-in");
        assert_eq!(fragments[1].index, None);
        assert_eq!(fragments[2].id, "");
        assert_eq!(fragments[2].index, None);
        assert_eq!(fragments[3].index, Some(4));
    }

    #[test]
    fn test_wrong_typed_fragment_fields_keep_the_fragment() {
        let json = json!({
            "ops": [
                { "insert": { "fragment": { "id": 1700000000000u64, "text": "world", "effect": "fade-up" } } },
                { "insert": "x", "attributes": { "fragment": { "id": "f", "text": 7 } } },
                { "insert": { "fragment": { "id": ["a"], "text": null, "effect": 3, "index": true } } }
            ]
        });

        let delta: Delta = serde_json::from_value(json).unwrap();
        let fragments = delta.fragments();

        assert_eq!(delta.ops.len(), 3);
        assert_eq!(fragments[0].id, "1700000000000");
        assert_eq!(fragments[0].text, "world");
        assert_eq!(fragments[0].effect, "fade-up");
        assert_eq!(fragments[1].id, "f");
        assert_eq!(fragments[1].text, "7");
        assert_eq!(fragments[2].id, "");
        assert_eq!(fragments[2].text, "");
        assert_eq!(fragments[2].effect, "fade-in");
        assert_eq!(fragments[2].index, None);
    }

    #[test]
    fn test_non_object_fragment_format_reads_as_text() {
        let json = r#"{"ops":[{"insert":"plain","attributes":{"fragment":true}},{"insert":" run","attributes":{"fragment":"yes"}}]}"#;

        let delta = Delta::from_json(json).unwrap();

        assert_eq!(
            delta.ops,
            vec![Operation::text("plain"), Operation::text(" run")]
        );
    }

    #[test]
    fn test_delta_json_reparses_to_same_operations() {
        let delta = Delta::new(vec![
            Operation::text("Intro\n"),
            Operation::fragment(FragmentAnnotation::new("f1", "Point", "grow", Some(2))),
            Operation::tag(Tag {
                id: "demo".to_string(),
                text: "#demo".to_string(),
            }),
        ])
        .with_title("Slide");

        let json = delta.to_json().unwrap();
        assert!(json.contains(r#""insert":{"fragment":"#));
        assert_eq!(Delta::from_json(&json).unwrap(), delta);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Delta::from_json("{\"ops\": ["),
            Err(crate::Error::DeltaParseError(_))
        ));
    }

    #[test]
    fn test_parse_order_hint() {
        assert_eq!(parse_order_hint("2"), Some(2));
        assert_eq!(parse_order_hint(" 10 "), Some(10));
        assert_eq!(parse_order_hint(""), None);
        assert_eq!(parse_order_hint("abc"), None);
        assert_eq!(parse_order_hint("-1"), None);
        assert_eq!(parse_order_hint("1.5"), None);
    }

    #[test]
    fn test_generate_fragment_id_is_increasing() {
        let a = generate_fragment_id();
        let b = generate_fragment_id();

        assert!(a.starts_with("fragment-"));
        let a_millis: u64 = a.trim_start_matches("fragment-").parse().unwrap();
        let b_millis: u64 = b.trim_start_matches("fragment-").parse().unwrap();
        assert!(b_millis > a_millis);
    }
}
