//! reveal.js markup output.
//!
//! Converts an operation list into slide markup: plain text becomes `<p>`
//! paragraphs, each fragment becomes its own `<p class="fragment ...">`
//! block, and slides are wrapped into a complete reveal.js document.
//!
//! Text is inserted verbatim. Escaping is left to the host, which is expected
//! to hand over text that is already safe to embed.

use crate::types::{FragmentAnnotation, Operation};
use serde::{Deserialize, Serialize};

/// Order assumed for fragments without an explicit index.
///
/// Explicit indices above this value sort after unordered fragments.
pub const UNORDERED_FRAGMENT_INDEX: u32 = 999;

/// Settings for the generated presentation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// reveal.js release loaded from the CDN.
    pub version: String,

    /// Theme stylesheet name.
    pub theme: String,

    /// Slide transition style.
    pub transition: String,

    /// Reflect the current slide in the URL hash.
    pub hash: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            version: "4.3.1".to_string(),
            theme: "white".to_string(),
            transition: "slide".to_string(),
            hash: true,
        }
    }
}

/// Exporter for reveal.js presentations.
#[derive(Debug, Clone, Default)]
pub struct RevealExporter {
    config: RevealConfig,
}

impl RevealExporter {
    /// Create an exporter with the default reveal.js settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter from a loaded configuration.
    pub fn with_config(config: RevealConfig) -> Self {
        Self { config }
    }

    /// Use a different theme stylesheet.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.config.theme = theme.into();
        self
    }

    /// Use a different slide transition.
    pub fn with_transition(mut self, transition: impl Into<String>) -> Self {
        self.config.transition = transition.into();
        self
    }

    /// Use a different reveal.js release.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Enable or disable hash navigation.
    pub fn with_hash(mut self, hash: bool) -> Self {
        self.config.hash = hash;
        self
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Wrap rendered slides into a complete reveal.js HTML document.
    ///
    /// Slide markup is not validated.
    pub fn render_presentation(&self, slides: &[String]) -> String {
        let cdn = format!(
            "https://cdn.jsdelivr.net/npm/reveal.js@{}/dist",
            self.config.version
        );

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" href="{cdn}/reveal.css">
  <link rel="stylesheet" href="{cdn}/theme/{theme}.css">
</head>
<body>
  <div class="reveal">
    <div class="slides">
      {slides}
    </div>
  </div>

  <script src="{cdn}/reveal.js"></script>
  <script>
    Reveal.initialize({{
      hash: {hash},
      transition: '{transition}'
    }});
  </script>
</body>
</html>"#,
            cdn = cdn,
            theme = self.config.theme,
            slides = slides.join("\n      "),
            hash = self.config.hash,
            transition = self.config.transition,
        )
    }
}

/// Render the body of one slide.
///
/// Text accumulates into an open paragraph until a line break or a fragment
/// closes it. Paragraphs whose trimmed text is empty are dropped. Fragments
/// always get a block of their own, in document order.
pub fn render_slide_body(ops: &[Operation]) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph = String::new();

    for op in ops {
        match op {
            Operation::TextInsert { content } => {
                let mut lines = content.split('\n');
                if let Some(first) = lines.next() {
                    paragraph.push_str(first);
                }
                for line in lines {
                    close_paragraph(&mut paragraph, &mut blocks);
                    paragraph.push_str(line);
                }
            }
            Operation::AnnotatedInsert { annotation } => {
                close_paragraph(&mut paragraph, &mut blocks);
                blocks.push(fragment_block(annotation));
            }
            Operation::TagInsert { tag } => {
                paragraph.push_str(&format!("<span class=\"tag\">{}</span>", tag.text));
            }
        }
    }
    close_paragraph(&mut paragraph, &mut blocks);

    blocks.join("\n").trim().to_string()
}

/// Render one slide, with a heading when `title` is non-empty.
pub fn render_slide(ops: &[Operation], title: Option<&str>) -> String {
    let body = render_slide_body(ops);

    let mut slide = String::from("<section>\n");
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        slide.push_str(&format!("  <h2>{}</h2>\n", title));
    }
    slide.push_str(&format!("  <div>\n    {}\n  </div>\n</section>", body));
    slide
}

/// Wrap rendered slides into a presentation using the default settings.
pub fn render_presentation(slides: &[String]) -> String {
    RevealExporter::new().render_presentation(slides)
}

/// Sort fragments into reveal order.
///
/// The sort is stable: ties and unordered fragments keep their original
/// relative order. This does not affect rendering, which always follows
/// document position and leaves ordering to `data-fragment-index`.
pub fn order_fragments(mut fragments: Vec<FragmentAnnotation>) -> Vec<FragmentAnnotation> {
    fragments.sort_by_key(|f| f.index.unwrap_or(UNORDERED_FRAGMENT_INDEX));
    fragments
}

/// Fragments of an operation list in reveal order.
pub fn ordered_fragments(ops: &[Operation]) -> Vec<FragmentAnnotation> {
    order_fragments(ops.iter().filter_map(Operation::as_fragment).cloned().collect())
}

fn close_paragraph(paragraph: &mut String, blocks: &mut Vec<String>) {
    let text = paragraph.trim();
    if !text.is_empty() {
        blocks.push(format!("<p>{}</p>", text));
    }
    paragraph.clear();
}

fn fragment_block(fragment: &FragmentAnnotation) -> String {
    let mut classes = String::from("fragment");
    if !fragment.has_default_effect() {
        classes.push(' ');
        classes.push_str(&fragment.effect);
    }

    let index_attr = fragment
        .index
        .map(|index| format!(" data-fragment-index=\"{}\"", index))
        .unwrap_or_default();

    format!("<p class=\"{}\"{}>{}</p>", classes, index_attr, fragment.text)
}
