//! Intro/end bookend documents (`project_intro.json`, `project_end.json`).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::position::PositionDescriptor;
use crate::settings::HexColor;

/// Which bookend a document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookendKind {
    Intro,
    End,
}

impl BookendKind {
    /// Default document file name inside the project directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Intro => "project_intro.json",
            Self::End => "project_end.json",
        }
    }
}

impl fmt::Display for BookendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::End => write!(f, "end"),
        }
    }
}

/// Default bookend length in seconds.
pub const DEFAULT_BOOKEND_DURATION_SECS: f64 = 5.0;

fn default_enabled() -> bool {
    true
}

fn default_duration() -> f64 {
    DEFAULT_BOOKEND_DURATION_SECS
}

/// A bookend document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookendDocument {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Clip length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,

    #[serde(default)]
    pub background: BookendBackground,

    #[serde(default)]
    pub images: Vec<ImageLayerSpec>,

    #[serde(default)]
    pub texts: Vec<TextLayerSpec>,

    /// Settings overrides applied to this clip only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl Default for BookendDocument {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: DEFAULT_BOOKEND_DURATION_SECS,
            background: BookendBackground::default(),
            images: vec![],
            texts: vec![],
            settings: None,
        }
    }
}

/// Bookend background; falls back to the project background colour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookendBackground {
    pub color: Option<HexColor>,
    pub image: Option<PathBuf>,
}

/// Optional explicit timing for a bookend layer, relative to the clip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerTiming {
    pub start: Option<f64>,
    pub duration: Option<f64>,
    /// Fade-in seconds; `0` disables the fade.
    pub fade: Option<f64>,
}

/// An image layer inside a bookend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayerSpec {
    /// Path relative to the project directory or the application root.
    pub path: PathBuf,

    /// Target width; the height follows the aspect ratio.
    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub position: PositionDescriptor,

    #[serde(flatten)]
    pub timing: LayerTiming,
}

/// A free-standing text layer inside a bookend. Unset fields come from
/// the resolved text settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayerSpec {
    pub text: String,

    #[serde(default)]
    pub font: Option<String>,

    #[serde(default)]
    pub size: Option<f64>,

    #[serde(default)]
    pub color: Option<HexColor>,

    #[serde(default)]
    pub position: PositionDescriptor,

    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub height: Option<f64>,

    #[serde(default)]
    pub wrap_width: Option<usize>,

    #[serde(default)]
    pub shadow: Option<bool>,

    #[serde(default)]
    pub outline: Option<bool>,

    #[serde(flatten)]
    pub timing: LayerTiming,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{AxisPosition, NamedPosition};

    #[test]
    fn test_minimal_document_uses_defaults() {
        let doc: BookendDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.enabled);
        assert!((doc.duration - 5.0).abs() < 1e-9);
        assert!(doc.images.is_empty());
        assert!(doc.texts.is_empty());
        assert!(doc.background.image.is_none());
    }

    #[test]
    fn test_disabled_document() {
        let doc: BookendDocument = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!doc.enabled);
    }

    #[test]
    fn test_layer_specs_parse_flattened_timing() {
        let doc: BookendDocument = serde_json::from_str(
            r##"{
                "duration": 4,
                "background": {"color": "#202020", "image": "intro_bg.png"},
                "images": [{"path": "logo.png", "width": 300, "position": {"x": "right", "y": "top", "padding": 30}, "start": 1, "fade": 0}],
                "texts": [{"text": "Welcome!", "size": 90, "color": "FFCC00", "shadow": true, "duration": 3}]
            }"##,
        )
        .unwrap();

        assert!((doc.duration - 4.0).abs() < 1e-9);
        assert_eq!(doc.background.color.as_ref().map(|c| c.as_hex()), Some("202020"));

        let image = &doc.images[0];
        assert_eq!(image.width, Some(300.0));
        assert_eq!(image.position.x, AxisPosition::Named(NamedPosition::Right));
        assert_eq!(image.timing.start, Some(1.0));
        assert_eq!(image.timing.fade, Some(0.0));
        assert_eq!(image.timing.duration, None);

        let text = &doc.texts[0];
        assert_eq!(text.shadow, Some(true));
        assert_eq!(text.outline, None);
        assert_eq!(text.timing.duration, Some(3.0));
    }

    #[test]
    fn test_kind_file_names() {
        assert_eq!(BookendKind::Intro.default_file_name(), "project_intro.json");
        assert_eq!(BookendKind::End.default_file_name(), "project_end.json");
        assert_eq!(BookendKind::End.to_string(), "end");
    }
}
