//! Fragment annotations for rich-text documents, and conversion of
//! annotated documents into reveal.js slide markup.

pub mod document;
pub mod effect;
pub mod error;
pub mod fragment;
pub mod i18n;
pub mod reveal;
pub mod tags;
pub mod types;

pub use document::Document;
pub use error::{Error, Result};
pub use fragment::{attach, detach, AnnotatedNode, FragmentRequest, Host, Range};
pub use i18n::{I18nConfig, Translator};
pub use reveal::{
    order_fragments, render_presentation, render_slide, render_slide_body, RevealConfig,
    RevealExporter,
};
pub use types::{Delta, FragmentAnnotation, Operation, Tag};
