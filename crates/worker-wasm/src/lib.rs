//! WASM bindings for rendering fragment-annotated documents.
//!
//! This crate exposes slide conversion to JavaScript, so an editor running
//! in the browser can export its Delta contents directly.

use reveal_core::reveal::ordered_fragments as fragments_in_order;
use reveal_core::{
    render_slide as render_slide_markup, Delta, FragmentAnnotation, I18nConfig, RevealConfig,
    RevealExporter, Translator,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of rendering one slide.
#[derive(Debug, Serialize, Deserialize)]
pub struct SlideResult {
    /// The `<section>` markup.
    pub html: String,
    /// Title used for the heading, if any.
    pub title: Option<String>,
    /// Number of fragments on the slide.
    pub fragment_count: usize,
}

/// Render a slide from editor contents.
///
/// # Arguments
/// * `delta` - The editor contents (`{ ops: [...] }`)
/// * `title` - Heading for the slide; overrides a title stored in the delta
///
/// # Returns
/// A JavaScript object with the slide markup, or throws on malformed input.
#[wasm_bindgen]
pub fn render_slide(delta: JsValue, title: Option<String>) -> Result<JsValue, JsValue> {
    let delta: Delta = serde_wasm_bindgen::from_value(delta)
        .map_err(|e| JsValue::from_str(&format!("Invalid delta: {}", e)))?;

    let result = render_slide_impl(delta, title.as_deref());

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn render_slide_impl(delta: Delta, title: Option<&str>) -> SlideResult {
    let title = title
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or(delta.title);

    SlideResult {
        html: render_slide_markup(&delta.ops, title.as_deref()),
        fragment_count: delta.ops.iter().filter(|op| op.as_fragment().is_some()).count(),
        title,
    }
}

/// Wrap rendered slides into a complete reveal.js document.
///
/// # Arguments
/// * `slides` - Array of slide markup strings
/// * `config` - Optional `{ version, theme, transition, hash }` settings
#[wasm_bindgen]
pub fn render_presentation(slides: js_sys::Array, config: JsValue) -> Result<String, JsValue> {
    let slides = slides
        .iter()
        .map(|slide| {
            slide
                .as_string()
                .ok_or_else(|| JsValue::from_str("Slides must be strings"))
        })
        .collect::<Result<Vec<String>, JsValue>>()?;

    let config = if config.is_undefined() || config.is_null() {
        None
    } else {
        Some(
            serde_wasm_bindgen::from_value::<RevealConfig>(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?,
        )
    };

    Ok(render_presentation_impl(&slides, config))
}

fn render_presentation_impl(slides: &[String], config: Option<RevealConfig>) -> String {
    let exporter = match config {
        Some(config) => RevealExporter::with_config(config),
        None => RevealExporter::new(),
    };
    exporter.render_presentation(slides)
}

/// Fragments of editor contents in reveal order.
#[wasm_bindgen]
pub fn ordered_fragments(delta: JsValue) -> Result<JsValue, JsValue> {
    let delta: Delta = serde_wasm_bindgen::from_value(delta)
        .map_err(|e| JsValue::from_str(&format!("Invalid delta: {}", e)))?;

    let fragments: Vec<FragmentAnnotation> = fragments_in_order(&delta.ops);

    serde_wasm_bindgen::to_value(&fragments)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Translate a UI string, falling back to English and then to the key.
#[wasm_bindgen]
pub fn translate(key: &str, language: &str) -> String {
    translate_impl(key, language)
}

fn translate_impl(key: &str, language: &str) -> String {
    let translator = Translator::new(I18nConfig {
        language: language.to_string(),
        ..I18nConfig::default()
    });
    translator.translate(key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::Operation;

    fn sample_delta() -> Delta {
        serde_json::from_value(serde_json::json!({
            "title": "Stored",
            "ops": [
                { "insert": "Hello " },
                { "insert": { "fragment": { "id": "f1", "text": "world", "effect": "fade-up", "index": 1 } } },
                { "insert": "!\n" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_render_slide_uses_stored_title() {
        let result = render_slide_impl(sample_delta(), None);

        assert_eq!(result.title.as_deref(), Some("Stored"));
        assert_eq!(result.fragment_count, 1);
        assert!(result.html.contains("<h2>Stored</h2>"));
        assert!(result
            .html
            .contains("<p class=\"fragment fade-up\" data-fragment-index=\"1\">world</p>"));
    }

    #[test]
    fn test_render_slide_title_override() {
        let result = render_slide_impl(sample_delta(), Some("Given"));
        assert!(result.html.contains("<h2>Given</h2>"));

        let result = render_slide_impl(Delta::new(vec![Operation::text("x")]), None);
        assert_eq!(result.title, None);
        assert!(!result.html.contains("<h2>"));
    }

    #[test]
    fn test_render_presentation_impl() {
        let slides = vec!["<section>A</section>".to_string()];

        let html = render_presentation_impl(&slides, None);
        assert!(html.contains("<section>A</section>"));
        assert!(html.contains("theme/white.css"));

        let config = RevealConfig {
            theme: "league".to_string(),
            ..RevealConfig::default()
        };
        assert!(render_presentation_impl(&slides, Some(config)).contains("theme/league.css"));
    }

    #[test]
    fn test_translate_impl() {
        assert_eq!(translate_impl("button.cancel", "fr"), "Annuler");
        assert_eq!(translate_impl("button.cancel", "xx"), "Cancel");
        assert_eq!(translate_impl("no.such.key", "de"), "no.such.key");
    }
}
