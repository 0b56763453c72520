//! Countdown timer sequencing.
//!
//! A countdown over `n` seconds is `n` one-second tick layers. Tick `t`
//! covers `[t, t + 1)` and shows the numeral `n − t`, so the first tick
//! shows `n` and the last shows `1`. Only the first tick fades in; the
//! rest cut in, which keeps the sequence contiguous with no overlap.

use quizreel_project_model::layer::{
    LayerAudio, LayerContent, LayerDescriptor, TextContent, TimerTickContent,
};
use quizreel_project_model::position::Size;
use quizreel_project_model::project::ProjectPaths;
use quizreel_project_model::settings::{Offset, Settings, TextAlign, TimerShape};

use crate::geometry::resolve_position;
use crate::media::{first_audio, MediaLookup, MediaResolver};

/// Row-major alpha mask for a `size`×`size` timer shape.
///
/// Circles are opaque (255) where the pixel centre lies within `size / 2`
/// of the square's centre and transparent (0) elsewhere; squares are
/// fully opaque.
pub fn shape_mask(shape: TimerShape, size: u32) -> Vec<u8> {
    let edge = size as usize;
    match shape {
        TimerShape::Square => vec![255; edge * edge],
        TimerShape::Circle => {
            let radius = size as f64 / 2.0;
            let mut mask = Vec::with_capacity(edge * edge);
            for y in 0..edge {
                for x in 0..edge {
                    let dx = x as f64 + 0.5 - radius;
                    let dy = y as f64 + 0.5 - radius;
                    let inside = dx * dx + dy * dy <= radius * radius;
                    mask.push(if inside { 255 } else { 0 });
                }
            }
            mask
        }
    }
}

/// Numeral shown on tick `tick` of a `total_seconds` countdown.
pub fn countdown_numeral(total_seconds: u32, tick: u32) -> String {
    total_seconds.saturating_sub(tick).to_string()
}

/// Produces countdown tick layers for one settings value.
#[derive(Debug, Clone)]
pub struct TimerSequencer<'a> {
    settings: &'a Settings,
    tick_sound: Option<LayerAudio>,
}

impl<'a> TimerSequencer<'a> {
    /// A silent sequencer.
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            tick_sound: None,
        }
    }

    /// A sequencer that attaches the configured tick sound when its file
    /// resolves. A missing or undecodable file leaves the timer silent.
    pub fn with_tick_sound(
        settings: &'a Settings,
        resolver: &dyn MediaResolver,
        paths: &ProjectPaths,
    ) -> Self {
        let tick_sound = settings
            .timer
            .sound
            .as_ref()
            .filter(|sound| sound.enabled && !sound.file.as_os_str().is_empty())
            .and_then(|sound| {
                let candidates = paths.in_project_or_root(&sound.file);
                match first_audio(resolver, &candidates) {
                    MediaLookup::Found(info) => Some(LayerAudio {
                        path: info.path,
                        volume: sound.volume,
                    }),
                    MediaLookup::Missing => {
                        tracing::warn!(
                            path = %sound.file.display(),
                            "Tick sound not found, timer will be silent"
                        );
                        None
                    }
                }
            });

        Self {
            settings,
            tick_sound,
        }
    }

    pub fn tick_sound(&self) -> Option<&LayerAudio> {
        self.tick_sound.as_ref()
    }

    /// One layer per second of a `total_seconds` countdown.
    pub fn sequence(&self, total_seconds: u32) -> Vec<LayerDescriptor> {
        (0..total_seconds)
            .map(|tick| self.tick(total_seconds, tick))
            .collect()
    }

    fn tick(&self, total_seconds: u32, tick: u32) -> LayerDescriptor {
        let timer = &self.settings.timer;
        let size = Size::square(timer.size as f64);
        let position = resolve_position(&timer.position, size, self.settings.canvas());

        let numeral = TextContent {
            text: countdown_numeral(total_seconds, tick),
            font: self.settings.text.font.clone(),
            font_size: self.settings.text.size.timer,
            color: timer.text_color.clone(),
            align: TextAlign::Center,
            stroke: None,
            inset: Offset::default(),
        };
        let shadow = &self.settings.text.shadow;
        let numeral_shadow = shadow.enabled.then(|| TextContent {
            color: shadow.color.clone(),
            inset: shadow.offset,
            ..numeral.clone()
        });

        let fade = if tick == 0 {
            self.settings.transition.duration.min(1.0)
        } else {
            0.0
        };

        let mut layer = LayerDescriptor::new(
            format!("timer tick {}", numeral.text),
            LayerContent::TimerTick(TimerTickContent {
                shape: timer.shape,
                fill: timer.color.clone(),
                size: timer.size,
                numeral,
                numeral_shadow,
            }),
            size,
            position,
            1.0,
        )
        .starting_at(tick as f64)
        .with_fade_in(fade);
        layer.audio = self.tick_sound.clone();
        layer
    }
}
