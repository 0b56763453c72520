//! Generic layer post-processing for bookend media.
//!
//! Steps run in a fixed order: resize, position, fade, start offset.
//! Position depends on the final size, so resizing must come first.

use std::path::PathBuf;

use quizreel_project_model::bookend::LayerTiming;
use quizreel_project_model::layer::{LayerContent, LayerDescriptor};
use quizreel_project_model::position::{LayerPosition, PositionDescriptor, Size};
use quizreel_project_model::settings::HexColor;

use crate::geometry::resolve_position;
use crate::media::{first_image, ImageInfo, MediaLookup, MediaResolver};

/// Content of a layer before post-processing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawContent {
    /// A resolved image at its source size.
    Image(ImageInfo),
    /// Content whose box is already measured.
    Sized { content: LayerContent, size: Size },
}

/// A layer as described by a document, not yet sized, placed or timed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLayer {
    pub label: String,
    pub content: RawContent,
    /// Image target width; the height follows the aspect ratio.
    pub target_width: Option<f64>,
    pub position: PositionDescriptor,
    pub timing: LayerTiming,
}

/// Size an image scaled to `target_width`, keeping its aspect ratio.
///
/// The height is rounded to whole pixels. Degenerate sources keep
/// their own size.
pub fn scale_to_width(source: Size, target_width: f64) -> Size {
    if source.width <= 0.0 || !target_width.is_finite() || target_width <= 0.0 {
        return source;
    }
    let height = (target_width * source.height / source.width).round();
    Size::new(target_width, height)
}

/// Resize, position and time a raw layer inside `container`.
pub fn process_layer(
    raw: RawLayer,
    container: Size,
    default_duration: f64,
    transition: f64,
) -> LayerDescriptor {
    let (content, size) = match raw.content {
        RawContent::Image(info) => {
            let source = Size::new(info.width as f64, info.height as f64);
            let size = match raw.target_width {
                Some(width) => scale_to_width(source, width),
                None => source,
            };
            let content = LayerContent::Image {
                path: info.path,
                source_size: source,
            };
            (content, size)
        }
        RawContent::Sized { content, size } => (content, size),
    };

    let position = resolve_position(&raw.position, size, container);
    let layer = LayerDescriptor::new(raw.label, content, size, position, default_duration);
    apply_timing(layer, &raw.timing, default_duration, transition)
}

/// Apply explicit timing, or the defaults: start 0, run to the end of
/// `default_duration`, fade over `transition`.
///
/// The fade is capped at the layer's duration; an explicit `fade` of 0
/// makes the layer cut in.
pub fn apply_timing(
    layer: LayerDescriptor,
    timing: &LayerTiming,
    default_duration: f64,
    transition: f64,
) -> LayerDescriptor {
    let start = timing.start.unwrap_or(0.0).max(0.0);
    let duration = timing
        .duration
        .unwrap_or(default_duration - start)
        .max(0.0);
    let fade = timing.fade.unwrap_or(transition).clamp(0.0, duration);

    LayerDescriptor {
        duration_secs: duration,
        ..layer
    }
    .with_fade_in(fade)
    .starting_at(start)
}

/// A canvas-filling layer for `content`.
pub fn full_canvas(label: &str, content: LayerContent, canvas: Size, duration: f64) -> LayerDescriptor {
    LayerDescriptor::new(label, content, canvas, LayerPosition::ORIGIN, duration)
}

/// Full-canvas background: the first resolvable image among
/// `image_candidates`, else a solid `color` fill.
pub fn background_layer(
    resolver: &dyn MediaResolver,
    image_candidates: &[PathBuf],
    color: &HexColor,
    canvas: Size,
    duration: f64,
) -> LayerDescriptor {
    if !image_candidates.is_empty() {
        match first_image(resolver, image_candidates) {
            MediaLookup::Found(info) => {
                let source_size = Size::new(info.width as f64, info.height as f64);
                let content = LayerContent::Image {
                    path: info.path,
                    source_size,
                };
                return full_canvas("background", content, canvas, duration);
            }
            MediaLookup::Missing => {
                tracing::warn!(
                    path = %image_candidates[0].display(),
                    "Background image not found, using background color"
                );
            }
        }
    }

    full_canvas(
        "background",
        LayerContent::Solid {
            color: color.clone(),
        },
        canvas,
        duration,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MemoryMediaResolver;
    use quizreel_project_model::position::{AxisPosition, Coordinate, NamedPosition};

    fn logo(width: u32, height: u32) -> RawContent {
        RawContent::Image(ImageInfo {
            path: PathBuf::from("/p/logo.png"),
            width,
            height,
        })
    }

    fn raw(content: RawContent, target_width: Option<f64>, position: PositionDescriptor) -> RawLayer {
        RawLayer {
            label: "logo".to_string(),
            content,
            target_width,
            position,
            timing: LayerTiming::default(),
        }
    }

    #[test]
    fn test_scale_rounds_height() {
        let size = scale_to_width(Size::new(300.0, 200.0), 100.0);
        assert_eq!(size, Size::new(100.0, 67.0));
    }

    #[test]
    fn test_scale_ignores_degenerate_source() {
        let source = Size::new(0.0, 10.0);
        assert_eq!(scale_to_width(source, 50.0), source);
    }

    #[test]
    fn test_position_uses_resized_extent() {
        let position = PositionDescriptor::new(
            AxisPosition::Named(NamedPosition::Right),
            AxisPosition::Named(NamedPosition::Bottom),
            10.0,
        );
        let layer = process_layer(
            raw(logo(800, 400), Some(200.0), position),
            Size::new(1920.0, 1080.0),
            5.0,
            0.5,
        );
        assert_eq!(layer.size, Size::new(200.0, 100.0));
        assert_eq!(layer.position.x, Coordinate::At(1710.0));
        assert_eq!(layer.position.y, Coordinate::At(970.0));
    }

    #[test]
    fn test_default_timing() {
        let layer = process_layer(
            raw(logo(10, 10), None, PositionDescriptor::centered()),
            Size::new(100.0, 100.0),
            5.0,
            0.5,
        );
        assert_eq!(layer.size, Size::new(10.0, 10.0));
        assert_eq!(layer.start_secs, 0.0);
        assert!((layer.duration_secs - 5.0).abs() < 1e-9);
        assert!((layer.fade_in_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_timing_and_zero_fade() {
        let mut layer = raw(logo(10, 10), None, PositionDescriptor::centered());
        layer.timing = LayerTiming {
            start: Some(1.5),
            duration: Some(2.0),
            fade: Some(0.0),
        };
        let layer = process_layer(layer, Size::new(100.0, 100.0), 5.0, 0.5);
        assert!((layer.start_secs - 1.5).abs() < 1e-9);
        assert!((layer.duration_secs - 2.0).abs() < 1e-9);
        assert_eq!(layer.fade_in_secs, 0.0);
    }

    #[test]
    fn test_start_only_runs_to_clip_end() {
        let layer = full_canvas(
            "bg",
            LayerContent::Solid {
                color: HexColor::black(),
            },
            Size::new(100.0, 100.0),
            5.0,
        );
        let timing = LayerTiming {
            start: Some(4.0),
            ..LayerTiming::default()
        };
        let layer = apply_timing(layer, &timing, 5.0, 0.5);
        assert!((layer.duration_secs - 1.0).abs() < 1e-9);
        assert!((layer.fade_in_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sized_content_keeps_its_box() {
        let content = RawContent::Sized {
            content: LayerContent::Solid {
                color: HexColor::white(),
            },
            size: Size::new(40.0, 20.0),
        };
        let layer = process_layer(
            raw(content, Some(400.0), PositionDescriptor::centered()),
            Size::new(100.0, 100.0),
            5.0,
            0.5,
        );
        assert_eq!(layer.size, Size::new(40.0, 20.0));
        assert_eq!(layer.position, LayerPosition::CENTERED);
    }

    #[test]
    fn test_background_prefers_existing_image() {
        let resolver = MemoryMediaResolver::new().with_image("/r/bg.png", 1280, 720);
        let canvas = Size::new(1920.0, 1080.0);
        let candidates = vec![PathBuf::from("/p/bg.png"), PathBuf::from("/r/bg.png")];

        let layer = background_layer(&resolver, &candidates, &HexColor::black(), canvas, 8.0);
        assert_eq!(layer.size, canvas);
        assert_eq!(layer.position, LayerPosition::ORIGIN);
        match layer.content {
            LayerContent::Image { path, source_size } => {
                assert_eq!(path, PathBuf::from("/r/bg.png"));
                assert_eq!(source_size, Size::new(1280.0, 720.0));
            }
            other => panic!("expected image, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_background_falls_back_to_color() {
        let resolver = MemoryMediaResolver::new();
        let color = HexColor::parse("#112233").unwrap();
        let candidates = vec![PathBuf::from("/p/bg.png")];

        let layer = background_layer(&resolver, &candidates, &color, Size::new(10.0, 10.0), 8.0);
        assert_eq!(layer.content, LayerContent::Solid { color });
        assert!((layer.duration_secs - 8.0).abs() < 1e-9);
        assert_eq!(layer.fade_in_secs, 0.0);
    }
}
