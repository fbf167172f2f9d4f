//! Catalogue of reveal.js fragment effects.
//!
//! Rendering accepts any effect name verbatim. The catalogue is used when
//! reading an annotated run back from its class tokens, and by UIs that
//! offer a list of effects.

/// The base effect. It carries no extra class token in the output.
pub const DEFAULT_EFFECT: &str = "fade-in";

/// A known fragment effect and the localization key of its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    /// Class token understood by reveal.js.
    pub name: &'static str,

    /// Translation key for a display label, when the table has one.
    pub label_key: Option<&'static str>,
}

/// Effects offered for new fragments, in menu order.
pub const KNOWN_EFFECTS: &[Effect] = &[
    Effect { name: "fade-in", label_key: Some("effect.fadeIn") },
    Effect { name: "fade-up", label_key: Some("effect.fadeUp") },
    Effect { name: "fade-down", label_key: Some("effect.fadeDown") },
    Effect { name: "fade-left", label_key: Some("effect.fadeLeft") },
    Effect { name: "fade-right", label_key: Some("effect.fadeRight") },
    Effect { name: "fade-out", label_key: Some("effect.fadeOut") },
    Effect { name: "fade-in-then-out", label_key: Some("effect.fadeInThenOut") },
    Effect { name: "highlight-red", label_key: Some("effect.highlightRed") },
    Effect { name: "highlight-green", label_key: Some("effect.highlightGreen") },
    Effect { name: "highlight-blue", label_key: Some("effect.highlightBlue") },
    Effect { name: "grow", label_key: None },
    Effect { name: "shrink", label_key: None },
    Effect { name: "strike", label_key: None },
];

/// Look up a known effect by its class token.
pub fn find_effect(name: &str) -> Option<&'static Effect> {
    KNOWN_EFFECTS.iter().find(|e| e.name == name)
}

/// Check whether a class token names a known effect.
pub fn is_known_effect(name: &str) -> bool {
    find_effect(name).is_some()
}

/// Substitute the default effect for an empty or blank name.
///
/// Any other name is kept exactly as given.
pub fn normalize_effect(name: &str) -> String {
    if name.trim().is_empty() {
        DEFAULT_EFFECT.to_string()
    } else {
        name.to_string()
    }
}

/// Fallback label for effects without a translation: "fade-in-then-out" -> "Fade In Then Out".
pub fn default_label(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_effect_is_first() {
        assert_eq!(KNOWN_EFFECTS[0].name, DEFAULT_EFFECT);
    }

    #[test]
    fn test_find_effect() {
        assert_eq!(
            find_effect("highlight-red").and_then(|e| e.label_key),
            Some("effect.highlightRed")
        );
        assert!(find_effect("grow").is_some());
        assert!(find_effect("zoom").is_none());
    }

    #[test]
    fn test_normalize_effect() {
        assert_eq!(normalize_effect(""), "fade-in");
        assert_eq!(normalize_effect("   "), "fade-in");
        assert_eq!(normalize_effect("fade-up"), "fade-up");
        // Unknown names flow through untouched
        assert_eq!(normalize_effect("custom-zoom"), "custom-zoom");
        assert_eq!(normalize_effect(" fade-up "), " fade-up ");
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label("fade-in-then-out"), "Fade In Then Out");
        assert_eq!(default_label("grow"), "Grow");
        assert_eq!(default_label(""), "");
    }
}
