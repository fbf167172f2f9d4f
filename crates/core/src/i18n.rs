//! Localized strings for the fragment editor UI.
//!
//! Lookups fall back from the configured language to the fallback language,
//! and finally to the key itself.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// A language with translations in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// Languages with translations, in picker order.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "tr", name: "Türkçe", flag: "🇹🇷" },
    Language { code: "en", name: "English", flag: "🇺🇸" },
    Language { code: "es", name: "Español", flag: "🇪🇸" },
    Language { code: "fr", name: "Français", flag: "🇫🇷" },
    Language { code: "de", name: "Deutsch", flag: "🇩🇪" },
];

/// Check whether a language code has translations.
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.code == code)
}

/// Translator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Preferred language code.
    pub language: String,

    /// Language used when the preferred one lacks a string.
    pub fallback: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            fallback: "en".to_string(),
        }
    }
}

type Table = HashMap<&'static str, HashMap<&'static str, &'static str>>;

/// Translation table, keyed by string key and then language code.
static TRANSLATIONS: LazyLock<Table> = LazyLock::new(|| {
    TRANSLATION_ENTRIES
        .iter()
        .map(|(key, values)| (*key, values.iter().copied().collect()))
        .collect()
});

/// Looks up UI strings for one language.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: I18nConfig,
}

impl Translator {
    /// Create a translator. Unsupported languages fall back to English.
    pub fn new(config: I18nConfig) -> Self {
        let mut config = config;
        if !is_supported_language(&config.language) {
            log::warn!(
                "Unsupported language {:?}, using {:?}",
                config.language,
                config.fallback
            );
            config.language = config.fallback.clone();
        }
        Self { config }
    }

    /// Create a translator for a locale tag such as `de-DE`.
    pub fn from_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        Self::new(I18nConfig {
            language,
            ..I18nConfig::default()
        })
    }

    /// Current language code.
    pub fn language(&self) -> &str {
        &self.config.language
    }

    /// Switch language.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        if !is_supported_language(language) {
            return Err(Error::UnsupportedLanguage(language.to_string()));
        }
        self.config.language = language.to_string();
        Ok(())
    }

    /// Translate `key`, failing if the table has no entry for it.
    pub fn try_translate(&self, key: &str) -> Result<&'static str> {
        let entry = TRANSLATIONS
            .get(key)
            .ok_or_else(|| Error::UnknownTranslationKey(key.to_string()))?;

        entry
            .get(self.config.language.as_str())
            .or_else(|| entry.get(self.config.fallback.as_str()))
            .copied()
            .ok_or_else(|| Error::UnknownTranslationKey(key.to_string()))
    }

    /// Translate `key`, returning the key itself when it has no translation.
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        match self.try_translate(key) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{}", e);
                key
            }
        }
    }

    /// Display label for an effect.
    pub fn effect_label(&self, effect: &str) -> String {
        match crate::effect::find_effect(effect).and_then(|e| e.label_key) {
            Some(key) => self.translate(key).to_string(),
            None => crate::effect::default_label(effect),
        }
    }
}

const TRANSLATION_ENTRIES: &[(&str, &[(&str, &str)])] = &[
    (
        "ui.selectText",
        &[
            ("tr", "Lütfen fragment yapmak istediğiniz metni seçin!"),
            ("en", "Please select the text you want to make a fragment!"),
            ("es", "¡Por favor selecciona el texto que quieres convertir en fragmento!"),
            ("fr", "Veuillez sélectionner le texte que vous voulez transformer en fragment!"),
            ("de", "Bitte wählen Sie den Text aus, den Sie zu einem Fragment machen möchten!"),
        ],
    ),
    (
        "dialog.createFragment",
        &[
            ("tr", "▣ Fragment Oluştur"),
            ("en", "▣ Create Fragment"),
            ("es", "▣ Crear Fragmento"),
            ("fr", "▣ Créer Fragment"),
            ("de", "▣ Fragment Erstellen"),
        ],
    ),
    (
        "dialog.selectedText",
        &[
            ("tr", "Seçili Metin:"),
            ("en", "Selected Text:"),
            ("es", "Texto Seleccionado:"),
            ("fr", "Texte Sélectionné:"),
            ("de", "Ausgewählter Text:"),
        ],
    ),
    (
        "dialog.animationEffect",
        &[
            ("tr", "Animasyon Efekti:"),
            ("en", "Animation Effect:"),
            ("es", "Efecto de Animación:"),
            ("fr", "Effet d'Animation:"),
            ("de", "Animationseffekt:"),
        ],
    ),
    (
        "dialog.fragmentOrder",
        &[
            ("tr", "Fragment Sırası (opsiyonel):"),
            ("en", "Fragment Order (optional):"),
            ("es", "Orden del Fragmento (opcional):"),
            ("fr", "Ordre du Fragment (optionnel):"),
            ("de", "Fragment-Reihenfolge (optional):"),
        ],
    ),
    (
        "button.cancel",
        &[
            ("tr", "İptal"),
            ("en", "Cancel"),
            ("es", "Cancelar"),
            ("fr", "Annuler"),
            ("de", "Abbrechen"),
        ],
    ),
    (
        "button.createFragment",
        &[
            ("tr", "Fragment Oluştur"),
            ("en", "Create Fragment"),
            ("es", "Crear Fragmento"),
            ("fr", "Créer Fragment"),
            ("de", "Fragment Erstellen"),
        ],
    ),
    (
        "button.exportToReveal",
        &[
            ("tr", "📤 Reveal.js'e Aktar"),
            ("en", "📤 Export to Reveal.js"),
            ("es", "📤 Exportar a Reveal.js"),
            ("fr", "📤 Exporter vers Reveal.js"),
            ("de", "📤 Nach Reveal.js Exportieren"),
        ],
    ),
    (
        "effect.fadeIn",
        &[
            ("tr", "Fade In (varsayılan)"),
            ("en", "Fade In (default)"),
            ("es", "Fade In (predeterminado)"),
            ("fr", "Fade In (par défaut)"),
            ("de", "Fade In (Standard)"),
        ],
    ),
    (
        "effect.fadeUp",
        &[
            ("tr", "Yukarı Fade"),
            ("en", "Fade Up"),
            ("es", "Fade Arriba"),
            ("fr", "Fade Vers le Haut"),
            ("de", "Nach Oben Einblenden"),
        ],
    ),
    (
        "effect.fadeDown",
        &[
            ("tr", "Aşağı Fade"),
            ("en", "Fade Down"),
            ("es", "Fade Abajo"),
            ("fr", "Fade Vers le Bas"),
            ("de", "Nach Unten Einblenden"),
        ],
    ),
    (
        "effect.fadeLeft",
        &[
            ("tr", "Sola Fade"),
            ("en", "Fade Left"),
            ("es", "Fade Izquierda"),
            ("fr", "Fade Vers la Gauche"),
            ("de", "Nach Links Einblenden"),
        ],
    ),
    (
        "effect.fadeRight",
        &[
            ("tr", "Sağa Fade"),
            ("en", "Fade Right"),
            ("es", "Fade Derecha"),
            ("fr", "Fade Vers la Droite"),
            ("de", "Nach Rechts Einblenden"),
        ],
    ),
    (
        "effect.highlightRed",
        &[
            ("tr", "Kırmızı Vurgula"),
            ("en", "Highlight Red"),
            ("es", "Resaltar Rojo"),
            ("fr", "Surligner en Rouge"),
            ("de", "Rot Hervorheben"),
        ],
    ),
    (
        "effect.highlightGreen",
        &[
            ("tr", "Yeşil Vurgula"),
            ("en", "Highlight Green"),
            ("es", "Resaltar Verde"),
            ("fr", "Surligner en Vert"),
            ("de", "Grün Hervorheben"),
        ],
    ),
    (
        "effect.highlightBlue",
        &[
            ("tr", "Mavi Vurgula"),
            ("en", "Highlight Blue"),
            ("es", "Resaltar Azul"),
            ("fr", "Surligner en Bleu"),
            ("de", "Blau Hervorheben"),
        ],
    ),
    (
        "language.label",
        &[
            ("tr", "🌐 Dil:"),
            ("en", "🌐 Language:"),
            ("es", "🌐 Idioma:"),
            ("fr", "🌐 Langue:"),
            ("de", "🌐 Sprache:"),
        ],
    ),
    (
        "editor.placeholder",
        &[
            ("tr", "Fragment editörünü test etmek için buraya yazmaya başlayın..."),
            ("en", "Start typing here to test the fragment editor..."),
            ("es", "Comienza a escribir aquí para probar el editor de fragmentos..."),
            ("fr", "Commencez à taper ici pour tester l'éditeur de fragments..."),
            ("de", "Beginnen Sie hier zu tippen, um den Fragment-Editor zu testen..."),
        ],
    ),
    (
        "events.description",
        &[
            ("tr", "Fragment oluşturulduğunda 'fragment-created' event'i tetiklenir."),
            ("en", "The 'fragment-created' event is triggered when a fragment is created."),
            ("es", "El evento 'fragment-created' se activa cuando se crea un fragmento."),
            ("fr", "L'événement 'fragment-created' est déclenché lors de la création d'un fragment."),
            ("de", "Das 'fragment-created' Ereignis wird ausgelöst, wenn ein Fragment erstellt wird."),
        ],
    ),
    // English-only entries exercise the fallback path for other languages
    ("effect.fadeOut", &[("en", "Fade Out")]),
    ("effect.fadeInThenOut", &[("en", "Fade In Then Out")]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(language: &str) -> Translator {
        Translator::new(I18nConfig {
            language: language.to_string(),
            fallback: "en".to_string(),
        })
    }

    #[test]
    fn test_translate_in_language() {
        assert_eq!(translator("de").translate("button.cancel"), "Abbrechen");
        assert_eq!(translator("tr").translate("button.cancel"), "İptal");
        assert_eq!(
            translator("en").translate("ui.selectText"),
            "Please select the text you want to make a fragment!"
        );
    }

    #[test]
    fn test_fallback_language() {
        assert_eq!(translator("fr").translate("effect.fadeOut"), "Fade Out");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let t = translator("es");
        assert_eq!(t.translate("missing.key"), "missing.key");
        assert!(matches!(
            t.try_translate("missing.key"),
            Err(Error::UnknownTranslationKey(_))
        ));
    }

    #[test]
    fn test_fallback_without_entry_returns_key() {
        let t = Translator::new(I18nConfig {
            language: "de".to_string(),
            fallback: "tr".to_string(),
        });
        assert_eq!(t.translate("effect.fadeOut"), "effect.fadeOut");
    }

    #[test]
    fn test_unsupported_language_uses_fallback() {
        let t = translator("ja");
        assert_eq!(t.language(), "en");
        assert_eq!(t.translate("button.cancel"), "Cancel");
    }

    #[test]
    fn test_from_locale() {
        assert_eq!(Translator::from_locale("de-DE").language(), "de");
        assert_eq!(Translator::from_locale("fr_CA").language(), "fr");
        assert_eq!(Translator::from_locale("pt-BR").language(), "en");
    }

    #[test]
    fn test_set_language() {
        let mut t = Translator::default();
        t.set_language("es").unwrap();
        assert_eq!(t.translate("button.cancel"), "Cancelar");

        assert!(matches!(
            t.set_language("xx"),
            Err(Error::UnsupportedLanguage(_))
        ));
        assert_eq!(t.language(), "es");
    }

    #[test]
    fn test_effect_labels() {
        let t = translator("de");
        assert_eq!(t.effect_label("fade-up"), "Nach Oben Einblenden");
        assert_eq!(t.effect_label("grow"), "Grow");
        assert_eq!(t.effect_label("fade-out"), "Fade Out");
    }

    #[test]
    fn test_every_entry_has_fallback_language() {
        for (key, values) in TRANSLATION_ENTRIES {
            assert!(values.iter().any(|(lang, _)| *lang == "en"), "{} lacks en", key);
        }
    }

    #[test]
    fn test_empty_selection_notice() {
        let key = Error::EmptySelection.notice_key().unwrap();
        assert_eq!(
            translator("fr").translate(key),
            "Veuillez sélectionner le texte que vous voulez transformer en fragment!"
        );
    }
}
