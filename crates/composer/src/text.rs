//! Text layers: word wrap, box measurement, shadow and outline.
//!
//! There is no font rasterizer here. A block's height is measured from
//! the wrapped line count as `lines × font_size × line_spacing`, rounded
//! up, unless the role pins a fixed height. Wrapping and shadows both
//! change the measured box, so positions are resolved only after both
//! are known.

use quizreel_common::error::{QuizError, QuizResult};
use quizreel_project_model::bookend::TextLayerSpec;
use quizreel_project_model::layer::{LayerContent, LayerDescriptor, Stroke, TextContent};
use quizreel_project_model::position::{PositionDescriptor, Size};
use quizreel_project_model::settings::{HexColor, Offset, Settings, ShadowSettings, TextAlign};

use crate::geometry::resolve_position;

/// Greedy word wrap at `width` columns.
///
/// Breaks only at whitespace; a word longer than `width` gets a line of
/// its own rather than being split. Runs of whitespace (newlines
/// included) collapse, so re-wrapping wrapped text is a no-op.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = vec![];
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// Fully resolved look and placement of one text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Role name, used for labels.
    pub role: String,
    pub font: String,
    pub font_size: f64,
    pub color: HexColor,
    pub align: TextAlign,
    pub wrap_width: usize,
    pub line_spacing: f64,
    /// Box width in pixels.
    pub width: f64,
    /// Fixed box height; measured from the text when `None`.
    pub height: Option<f64>,
    pub position: PositionDescriptor,
    /// Present only when a shadow should be drawn.
    pub shadow: Option<ShadowSettings>,
    /// Present only when an outline should be drawn.
    pub outline: Option<Stroke>,
}

impl TextStyle {
    /// Style of a named role (`question`, `answer`, ...) from settings.
    pub fn for_role(role: &str, settings: &Settings) -> Self {
        let text = &settings.text;
        let layout = settings.role_layout(role);
        Self {
            role: role.to_string(),
            font: text.font.clone(),
            font_size: settings.font_size(role),
            color: text.color.clone(),
            align: text.alignment,
            wrap_width: text.wrap_width,
            line_spacing: text.line_spacing,
            width: layout.width.unwrap_or(text.max_width),
            height: layout.height,
            position: layout.position,
            shadow: text.shadow.enabled.then(|| text.shadow.clone()),
            outline: outline_stroke(settings, text.outline.enabled),
        }
    }

    /// Style of a free-standing text layer; unset fields fall back to
    /// the text settings.
    pub fn custom(spec: &TextLayerSpec, settings: &Settings) -> Self {
        let text = &settings.text;
        let shadow_enabled = spec.shadow.unwrap_or(text.shadow.enabled);
        Self {
            role: "custom".to_string(),
            font: spec.font.clone().unwrap_or_else(|| text.font.clone()),
            font_size: spec.size.unwrap_or(text.size.question),
            color: spec.color.clone().unwrap_or_else(|| text.color.clone()),
            align: text.alignment,
            wrap_width: spec.wrap_width.unwrap_or(text.wrap_width),
            line_spacing: text.line_spacing,
            width: spec.width.unwrap_or(text.max_width),
            height: spec.height,
            position: spec.position,
            shadow: shadow_enabled.then(|| text.shadow.clone()),
            outline: outline_stroke(settings, spec.outline.unwrap_or(text.outline.enabled)),
        }
    }

    /// Box height for `line_count` wrapped lines.
    pub fn measure_height(&self, line_count: usize) -> f64 {
        self.height.unwrap_or_else(|| {
            let exact = line_count as f64 * self.font_size * self.line_spacing;
            // Ignore float noise below 1e-9 before rounding up.
            (exact - 1e-9).ceil().max(0.0)
        })
    }
}

fn outline_stroke(settings: &Settings, enabled: bool) -> Option<Stroke> {
    enabled.then(|| Stroke {
        color: settings.text.outline.color.clone(),
        thickness: settings.text.outline.thickness,
    })
}

/// Which style a text block takes.
#[derive(Debug, Clone, PartialEq)]
pub enum TextRole {
    Question,
    Answer,
    /// Explicit style, e.g. a bookend text layer.
    Custom(Box<TextStyle>),
}

impl TextRole {
    fn style(&self, settings: &Settings) -> TextStyle {
        match self {
            Self::Question => TextStyle::for_role("question", settings),
            Self::Answer => TextStyle::for_role("answer", settings),
            Self::Custom(style) => style.as_ref().clone(),
        }
    }
}

/// A text block's layers: an optional shadow under the main text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayers {
    pub shadow: Option<LayerDescriptor>,
    pub main: LayerDescriptor,
}

impl TextLayers {
    /// Layers in z-order (shadow first).
    pub fn into_layers(self) -> Vec<LayerDescriptor> {
        self.shadow.into_iter().chain(std::iter::once(self.main)).collect()
    }

    /// Apply the same change to every layer.
    pub fn map(self, mut f: impl FnMut(LayerDescriptor) -> LayerDescriptor) -> Self {
        Self {
            shadow: self.shadow.map(&mut f),
            main: f(self.main),
        }
    }
}

/// Builds positioned, timed text layers against one settings value.
#[derive(Debug, Clone, Copy)]
pub struct TextLayerBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> TextLayerBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the layers for `text` lasting `duration_secs`, starting at 0
    /// and fading in over the transition duration.
    ///
    /// Empty text still yields a (zero-height) layer.
    pub fn build(&self, text: &str, role: &TextRole, duration_secs: f64) -> QuizResult<TextLayers> {
        let style = role.style(self.settings);

        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(QuizError::layer(format!(
                "{} text duration {duration_secs} is not a non-negative number",
                style.role
            )));
        }
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return Err(QuizError::layer(format!(
                "{} text font size {} must be positive",
                style.role, style.font_size
            )));
        }

        let wrapped = wrap_text(text, style.wrap_width);
        let content = TextContent {
            text: wrapped,
            font: style.font.clone(),
            font_size: style.font_size,
            color: style.color.clone(),
            align: style.align,
            stroke: style.outline.clone(),
            inset: Offset::default(),
        };

        // The shadow shares the main box, so the main block's measurement
        // is the combined measurement.
        let size = Size::new(style.width, style.measure_height(content.line_count()));
        let position = resolve_position(&style.position, size, self.settings.canvas());
        let fade = self.settings.transition.duration.min(duration_secs);

        let shadow = style.shadow.as_ref().map(|shadow| {
            let shadow_content = TextContent {
                color: shadow.color.clone(),
                stroke: None,
                inset: shadow.offset,
                ..content.clone()
            };
            LayerDescriptor::new(
                format!("{} text shadow", style.role),
                LayerContent::Text(shadow_content),
                size,
                position,
                duration_secs,
            )
            .with_fade_in(fade)
        });

        let main = LayerDescriptor::new(
            format!("{} text", style.role),
            LayerContent::Text(content),
            size,
            position,
            duration_secs,
        )
        .with_fade_in(fade);

        Ok(TextLayers { shadow, main })
    }
}
