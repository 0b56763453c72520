//! Settings documents and the layered configuration cascade.
//!
//! Settings come from up to three documents: the global settings file,
//! the project file, and optional per-clip overrides carried by bookend
//! documents. Each document becomes one [`SettingsLayer`]; the
//! [`SettingsStack`] merges them in a fixed order on top of the built-in
//! defaults and deserializes a single immutable [`Settings`] value before
//! any layer building starts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::position::{AxisPosition, NamedPosition, PositionDescriptor, Size};

/// Errors raised while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings layer from {source_label} must be a JSON object")]
    NotAnObject { source_label: String },

    #[error("Settings layer from {next} cannot be applied after {previous}")]
    OutOfOrder { previous: String, next: String },

    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{key}`: {message}")]
    Invalid { key: String, message: String },
}

fn invalid(key: &str, message: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        key: key.to_string(),
        message: message.into(),
    }
}

/// A colour stored as six uppercase hex digits (no leading `#`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let digits = raw.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("{raw:?} is not a 6-digit hex colour"));
        }
        Ok(Self(digits.to_ascii_uppercase()))
    }

    /// The six hex digits.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }

    fn literal(digits: &str) -> Self {
        Self(digits.to_string())
    }

    pub fn white() -> Self {
        Self::literal("FFFFFF")
    }

    pub fn black() -> Self {
        Self::literal("000000")
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fully resolved settings for one timeline (or one bookend clip).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub video: VideoSettings,
    pub text: TextSettings,
    pub timer: TimerSettings,
    pub background: BackgroundSettings,
    pub audio: AudioSettings,
    pub transition: TransitionSettings,
    pub timing: TimingSettings,
    pub preview_mode: PreviewSettings,
}

/// Output video parameters. Passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Encoder hint (e.g. `libx264`).
    pub codec: String,
    /// Encoder speed/quality preset.
    pub preset: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            codec: "libx264".to_string(),
            preset: "medium".to_string(),
        }
    }
}

/// Horizontal alignment of wrapped text lines inside their box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl From<String> for TextAlign {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "west" => Self::Left,
            "right" | "east" => Self::Right,
            _ => Self::Center,
        }
    }
}

impl From<TextAlign> for String {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
        .to_string()
    }
}

/// Font sizes per text role. Roles other than the three built-ins can be
/// added as extra keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSizes {
    pub question: f64,
    pub answer: f64,
    pub timer: f64,
    #[serde(flatten)]
    pub custom: BTreeMap<String, f64>,
}

impl Default for RoleSizes {
    fn default() -> Self {
        Self {
            question: 70.0,
            answer: 60.0,
            timer: 60.0,
            custom: BTreeMap::new(),
        }
    }
}

/// Placement and box dimensions for one text role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleLayout {
    pub position: PositionDescriptor,
    /// Fixed box width; `text.max_width` when unset.
    pub width: Option<f64>,
    /// Fixed box height; grows with the wrapped text when unset.
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    pub enabled: bool,
    pub color: HexColor,
    pub offset: Offset,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: HexColor::black(),
            offset: Offset { x: 2.0, y: 2.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    pub enabled: bool,
    pub color: HexColor,
    pub thickness: f64,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: HexColor::black(),
            thickness: 2.0,
        }
    }
}

/// Text defaults shared by all roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub font: String,
    pub size: RoleSizes,
    pub color: HexColor,
    pub alignment: TextAlign,
    /// Greedy wrap width in characters.
    pub wrap_width: usize,
    /// Default text box width in pixels.
    pub max_width: f64,
    /// Line height as a multiple of the font size.
    pub line_spacing: f64,
    pub shadow: ShadowSettings,
    pub outline: OutlineSettings,
    /// Per-role placement, keyed by role name (`question`, `answer`, ...).
    pub roles: BTreeMap<String, RoleLayout>,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            size: RoleSizes::default(),
            color: HexColor::white(),
            alignment: TextAlign::Center,
            wrap_width: 30,
            max_width: 1000.0,
            line_spacing: 1.2,
            shadow: ShadowSettings::default(),
            outline: OutlineSettings::default(),
            roles: BTreeMap::new(),
        }
    }
}

/// Countdown shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimerShape {
    #[default]
    Circle,
    Square,
}

impl From<String> for TimerShape {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "square" => Self::Square,
            _ => Self::Circle,
        }
    }
}

impl From<TimerShape> for String {
    fn from(shape: TimerShape) -> Self {
        match shape {
            TimerShape::Circle => "circle",
            TimerShape::Square => "square",
        }
        .to_string()
    }
}

/// Optional per-tick sound effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSoundSettings {
    pub file: PathBuf,
    pub enabled: bool,
    pub volume: f64,
}

impl Default for TickSoundSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            enabled: true,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub shape: TimerShape,
    /// Edge length of the shape in pixels.
    pub size: u32,
    pub color: HexColor,
    pub position: PositionDescriptor,
    pub text_color: HexColor,
    pub sound: Option<TickSoundSettings>,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            shape: TimerShape::Circle,
            size: 120,
            color: HexColor::literal("FF0000"),
            position: PositionDescriptor::new(
                AxisPosition::CENTER,
                AxisPosition::Named(NamedPosition::Top),
                20.0,
            ),
            text_color: HexColor::white(),
            sound: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub color: HexColor,
    /// Image path; takes priority over `color` when it resolves.
    pub image: Option<PathBuf>,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            color: HexColor::black(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub file: Option<PathBuf>,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Gain multiplier; 1.0 when unset.
    pub volume: Option<f64>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            file: None,
            looped: true,
            volume: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Fade-in applied at the start of text and media layers.
    pub duration: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self { duration: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Whole seconds; the countdown shows one numeral per second.
    pub question_duration: u32,
    pub answer_duration: f64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            question_duration: 5,
            answer_duration: 3.0,
        }
    }
}

impl TimingSettings {
    /// Length of one question clip.
    pub fn clip_duration(&self) -> f64 {
        self.question_duration as f64 + self.answer_duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreviewMode {
    /// Keep the first `limit` questions.
    #[default]
    Count,
    /// Keep questions while the timeline fits in `limit` seconds.
    Duration,
}

impl From<String> for PreviewMode {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "duration" => Self::Duration,
            _ => Self::Count,
        }
    }
}

impl From<PreviewMode> for String {
    fn from(mode: PreviewMode) -> Self {
        match mode {
            PreviewMode::Count => "count",
            PreviewMode::Duration => "duration",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub enabled: bool,
    pub mode: PreviewMode,
    /// Question count (`count` mode) or seconds (`duration` mode).
    pub limit: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: PreviewMode::Count,
            limit: 2.0,
        }
    }
}

impl Settings {
    /// Canvas size in pixels.
    pub fn canvas(&self) -> Size {
        Size::new(self.video.width as f64, self.video.height as f64)
    }

    /// Font size for a role; unknown roles use the question size.
    pub fn font_size(&self, role: &str) -> f64 {
        match role {
            "question" => self.text.size.question,
            "answer" => self.text.size.answer,
            "timer" => self.text.size.timer,
            other => self
                .text
                .size
                .custom
                .get(other)
                .copied()
                .unwrap_or(self.text.size.question),
        }
    }

    /// Placement for a role; centered with no fixed box when unset.
    pub fn role_layout(&self, role: &str) -> RoleLayout {
        self.text.roles.get(role).cloned().unwrap_or_default()
    }

    /// Derive settings for a single clip with `overrides` applied on top.
    pub fn with_overrides(
        &self,
        clip: impl Into<String>,
        overrides: &Value,
    ) -> Result<Settings, SettingsError> {
        SettingsStack::from_settings(self)?
            .with_layer(ConfigSource::Clip(clip.into()), overrides.clone())?
            .resolve()
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.video.width == 0 || self.video.height == 0 {
            return Err(invalid("video", "width and height must be non-zero"));
        }
        if self.video.fps == 0 {
            return Err(invalid("video.fps", "must be non-zero"));
        }
        check_seconds("transition.duration", self.transition.duration)?;
        check_seconds("timing.answer_duration", self.timing.answer_duration)?;
        if self.text.wrap_width == 0 {
            return Err(invalid("text.wrap_width", "must be at least 1"));
        }
        check_positive("text.max_width", self.text.max_width)?;
        check_positive("text.line_spacing", self.text.line_spacing)?;
        check_positive("text.size.question", self.text.size.question)?;
        check_positive("text.size.answer", self.text.size.answer)?;
        check_positive("text.size.timer", self.text.size.timer)?;
        for (role, size) in &self.text.size.custom {
            check_positive(&format!("text.size.{role}"), *size)?;
        }
        if self.timer.size == 0 {
            return Err(invalid("timer.size", "must be non-zero"));
        }
        if self.timer.size > self.video.width.min(self.video.height) {
            return Err(invalid("timer.size", "must fit inside the canvas"));
        }
        if let Some(volume) = self.audio.volume {
            check_seconds("audio.volume", volume)?;
        }
        if let Some(sound) = &self.timer.sound {
            check_seconds("timer.sound.volume", sound.volume)?;
        }
        check_seconds("preview_mode.limit", self.preview_mode.limit)?;
        Ok(())
    }
}

fn check_seconds(key: &str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(key, format!("{value} is not a non-negative number")));
    }
    Ok(())
}

fn check_positive(key: &str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(key, format!("{value} must be positive")));
    }
    Ok(())
}

/// Where a settings layer came from. Layers must be stacked in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    Global,
    Project,
    Clip(String),
}

impl ConfigSource {
    fn rank(&self) -> u8 {
        match self {
            Self::Defaults => 0,
            Self::Global => 1,
            Self::Project => 2,
            Self::Clip(_) => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "built-in defaults"),
            Self::Global => write!(f, "global settings"),
            Self::Project => write!(f, "project settings"),
            Self::Clip(name) => write!(f, "clip '{name}'"),
        }
    }
}

/// One document's contribution to the cascade.
#[derive(Debug, Clone)]
pub struct SettingsLayer {
    pub source: ConfigSource,
    pub values: Value,
}

/// Ordered settings layers; later layers win key by key.
#[derive(Debug, Clone)]
pub struct SettingsStack {
    layers: Vec<SettingsLayer>,
}

impl SettingsStack {
    /// A stack holding only the built-in defaults.
    pub fn new() -> Self {
        let defaults = serde_json::to_value(Settings::default()).unwrap_or(Value::Null);
        Self {
            layers: vec![SettingsLayer {
                source: ConfigSource::Defaults,
                values: defaults,
            }],
        }
    }

    /// A stack whose base is an already resolved settings value.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            layers: vec![SettingsLayer {
                source: ConfigSource::Defaults,
                values: serde_json::to_value(settings)?,
            }],
        })
    }

    /// Push a layer. Legacy keys are normalized first.
    pub fn with_layer(mut self, source: ConfigSource, values: Value) -> Result<Self, SettingsError> {
        let Value::Object(map) = values else {
            return Err(SettingsError::NotAnObject {
                source_label: source.to_string(),
            });
        };
        if let Some(last) = self.layers.last() {
            if source.rank() < last.source.rank() {
                return Err(SettingsError::OutOfOrder {
                    previous: last.source.to_string(),
                    next: source.to_string(),
                });
            }
        }
        self.layers.push(SettingsLayer {
            source,
            values: Value::Object(normalize_legacy_keys(map)),
        });
        Ok(self)
    }

    pub fn layers(&self) -> &[SettingsLayer] {
        &self.layers
    }

    /// Merge every layer in order and produce validated settings.
    pub fn resolve(&self) -> Result<Settings, SettingsError> {
        let merged = self
            .layers
            .iter()
            .fold(Value::Object(Map::new()), |acc, layer| {
                deep_merge(&acc, &layer.values)
            });
        let settings: Settings = serde_json::from_value(merged)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for SettingsStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `overlay` onto `base` without mutating either.
///
/// Objects merge key by key; any other overlay value replaces the base.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Map key spellings used by older documents onto the current schema.
fn normalize_legacy_keys(mut map: Map<String, Value>) -> Map<String, Value> {
    if let Some(transitions) = map.remove("transitions") {
        map.entry("transition").or_insert(transitions);
    }
    if let Some(image) = map.remove("background_image") {
        let background = map
            .entry("background")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(background) = background {
            background.entry("image").or_insert(image);
        }
    }
    if let Some(Value::Object(preview)) = map.get_mut("preview_mode") {
        if let Some(limit) = preview.remove("questions_limit") {
            preview.entry("limit").or_insert(limit);
        }
    }
    map
}
