//! Layer descriptors and clips.
//!
//! A [`LayerDescriptor`] is the composition engine's unit of output: a
//! positioned, timed visual element, optionally carrying a sound. A
//! [`Clip`] owns an ordered set of layers; insertion order is z-order
//! (first pushed is drawn first, i.e. bottom-most).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::position::{LayerPosition, Size};
use crate::settings::{HexColor, Offset, TextAlign, TimerShape};

/// Stroke drawn around text glyphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: HexColor,
    pub thickness: f64,
}

/// A block of wrapped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Text with line breaks already applied.
    pub text: String,
    pub font: String,
    pub font_size: f64,
    pub color: HexColor,
    pub align: TextAlign,
    /// Outline; never set on shadow layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Offset of the glyphs inside the layer box (used by shadows).
    #[serde(default)]
    pub inset: Offset,
}

impl TextContent {
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }
}

/// One countdown tick: a filled shape with a centered numeral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerTickContent {
    pub shape: TimerShape,
    pub fill: HexColor,
    /// Edge length in pixels of the mask square.
    pub size: u32,
    pub numeral: TextContent,
    /// Shadow drawn under the numeral, offset by its inset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeral_shadow: Option<TextContent>,
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    /// Solid fill of the layer box.
    Solid { color: HexColor },
    /// Image scaled to the layer box.
    Image {
        path: PathBuf,
        /// Pixel size of the source file.
        source_size: Size,
    },
    Text(TextContent),
    TimerTick(TimerTickContent),
}

impl LayerContent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Solid { .. } => "solid",
            Self::Image { .. } => "image",
            Self::Text(_) => "text",
            Self::TimerTick(_) => "timer_tick",
        }
    }
}

/// Sound played from the layer's start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerAudio {
    pub path: PathBuf,
    pub volume: f64,
}

/// A positioned, timed element of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Human-readable label for logs and manifests.
    pub label: String,
    pub content: LayerContent,
    pub size: Size,
    pub position: LayerPosition,
    /// Seconds from the owning clip's start.
    pub start_secs: f64,
    pub duration_secs: f64,
    /// Fade-in seconds; 0 means the layer cuts in.
    pub fade_in_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<LayerAudio>,
}

impl LayerDescriptor {
    /// A layer starting at 0 with no fade.
    pub fn new(
        label: impl Into<String>,
        content: LayerContent,
        size: Size,
        position: LayerPosition,
        duration_secs: f64,
    ) -> Self {
        Self {
            label: label.into(),
            content,
            size,
            position,
            start_secs: 0.0,
            duration_secs,
            fade_in_secs: 0.0,
            audio: None,
        }
    }

    pub fn starting_at(mut self, start_secs: f64) -> Self {
        self.start_secs = start_secs;
        self
    }

    pub fn with_fade_in(mut self, fade_in_secs: f64) -> Self {
        self.fade_in_secs = fade_in_secs;
        self
    }

    /// End of the layer's `[start, end)` interval.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }

    /// Whether the layer is visible at any point in `[from, to)`.
    pub fn overlaps(&self, from: f64, to: f64) -> bool {
        self.start_secs < to && self.end_secs() > from
    }

    pub fn is_timer_tick(&self) -> bool {
        matches!(self.content, LayerContent::TimerTick(_))
    }
}

/// What a clip represents in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipKind {
    Intro,
    Question { index: usize },
    End,
}

/// Layers sharing a duration and a coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub label: String,
    #[serde(flatten)]
    pub kind: ClipKind,
    pub duration_secs: f64,
    /// Coordinate space of every layer in the clip.
    pub canvas: Size,
    layers: Vec<LayerDescriptor>,
}

impl Clip {
    pub fn new(label: impl Into<String>, kind: ClipKind, duration_secs: f64, canvas: Size) -> Self {
        Self {
            label: label.into(),
            kind,
            duration_secs,
            canvas,
            layers: vec![],
        }
    }

    /// Append a layer on top of the existing ones.
    pub fn push(&mut self, layer: LayerDescriptor) {
        self.layers.push(layer);
    }

    /// Append a layer, trimmed to the clip window.
    ///
    /// Layers that would start at or after the clip end are dropped and
    /// `false` is returned.
    pub fn push_windowed(&mut self, mut layer: LayerDescriptor) -> bool {
        let start = layer.start_secs.max(0.0);
        if start >= self.duration_secs {
            return false;
        }
        layer.start_secs = start;
        layer.duration_secs = layer.duration_secs.min(self.duration_secs - start);
        layer.fade_in_secs = layer.fade_in_secs.min(layer.duration_secs);
        self.layers.push(layer);
        true
    }

    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<LayerDescriptor> {
        self.layers
    }

    /// Timer tick layers in z-order.
    pub fn timer_ticks(&self) -> impl Iterator<Item = &LayerDescriptor> {
        self.layers.iter().filter(|l| l.is_timer_tick())
    }
}
