//! Timeline manifest backend.
//!
//! Writes `timeline.json` plus one RGBA PNG per distinct timer mask into
//! the job's output directory. An external renderer consumes both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use quizreel_common::error::{QuizError, QuizResult};
use quizreel_composer::timer::shape_mask;
use quizreel_project_model::layer::LayerContent;
use quizreel_project_model::settings::{HexColor, TimerShape, VideoSettings};
use quizreel_project_model::timeline::Timeline;

use crate::export::{ExportJob, ExportProgress, ExportStage, ProgressCallback, RenderBackend};

/// Directory for mask images, relative to the output directory.
pub const MASK_DIR: &str = "masks";

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "timeline.json";

/// A rendered timer mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskAsset {
    pub shape: TimerShape,
    pub size: u32,
    pub fill: HexColor,
    /// Path relative to the output directory.
    pub file: PathBuf,
}

/// Everything the external renderer needs for one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineManifest {
    pub generated_at: String,
    pub video: VideoSettings,
    pub font_paths: Vec<PathBuf>,
    pub masks: Vec<MaskAsset>,
    pub timeline: Timeline,
}

/// Distinct timer masks used anywhere in `timeline`, in a stable order.
pub fn collect_masks(timeline: &Timeline) -> Vec<MaskAsset> {
    let mut masks = BTreeMap::new();
    for layer in timeline.clips().iter().flat_map(|c| c.layers()) {
        if let LayerContent::TimerTick(tick) = &layer.content {
            let key = mask_file_name(tick.shape, tick.size, &tick.fill);
            masks.entry(key.clone()).or_insert_with(|| MaskAsset {
                shape: tick.shape,
                size: tick.size,
                fill: tick.fill.clone(),
                file: Path::new(MASK_DIR).join(key),
            });
        }
    }
    masks.into_values().collect()
}

fn mask_file_name(shape: TimerShape, size: u32, fill: &HexColor) -> String {
    format!(
        "timer_{}_{size}_{}.png",
        String::from(shape),
        fill.as_hex().to_ascii_lowercase()
    )
}

/// The fill colour with the shape's alpha channel.
pub fn mask_image(asset: &MaskAsset) -> RgbaImage {
    let [r, g, b] = asset.fill.rgb();
    let alpha = shape_mask(asset.shape, asset.size);
    let size = asset.size;
    ImageBuffer::from_fn(size, size, |x, y| {
        let a = alpha[(y * size + x) as usize];
        Rgba([r, g, b, a])
    })
}

/// Backend that writes a manifest instead of encoding video.
#[derive(Debug, Default)]
pub struct ManifestBackend;

impl ManifestBackend {
    pub fn new() -> Self {
        Self
    }

    fn write_masks(&self, job: &ExportJob, masks: &[MaskAsset]) -> QuizResult<()> {
        if masks.is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(job.output_dir.join(MASK_DIR))?;
        for asset in masks {
            let path = job.output_dir.join(&asset.file);
            mask_image(asset).save(&path).map_err(|e| {
                QuizError::render(format!("Failed to write mask {}: {e}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), "Wrote timer mask");
        }
        Ok(())
    }
}

impl RenderBackend for ManifestBackend {
    fn render(&mut self, job: &ExportJob, progress: Option<ProgressCallback>) -> QuizResult<()> {
        let report = |stage: ExportStage, progress_value: f64| {
            if let Some(cb) = &progress {
                cb(ExportProgress {
                    progress: progress_value,
                    clips_total: job.timeline.clips().len(),
                    stage,
                });
            }
        };

        report(ExportStage::Preparing, 0.0);
        std::fs::create_dir_all(&job.output_dir)?;

        let masks = collect_masks(&job.timeline);
        report(ExportStage::WritingAssets, 0.25);
        self.write_masks(job, &masks)?;

        report(ExportStage::WritingManifest, 0.75);
        let manifest = TimelineManifest {
            generated_at: chrono::Utc::now().to_rfc3339(),
            video: job.video.clone(),
            font_paths: job.font_paths.clone(),
            masks,
            timeline: job.timeline.clone(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(job.manifest_path(), json)?;

        tracing::info!(
            path = %job.manifest_path().display(),
            masks = manifest.masks.len(),
            clips = manifest.timeline.clips().len(),
            "Wrote timeline manifest"
        );
        report(ExportStage::Complete, 1.0);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "manifest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizreel_composer::media::{MemoryMediaResolver, ProjectContext};
    use quizreel_composer::timeline::TimelineBuilder;
    use quizreel_project_model::project::ProjectPaths;
    use quizreel_project_model::question::Question;
    use quizreel_project_model::settings::Settings;
    use std::sync::{Arc, Mutex};

    fn sample_timeline(settings: &Settings) -> Timeline {
        let resolver = MemoryMediaResolver::new();
        let paths = ProjectPaths::new("/p", "/r");
        TimelineBuilder::new(settings, &resolver, ProjectContext::new(&paths))
            .build(&[
                Question::new("First?", "One"),
                Question::new("Second?", "Two"),
            ])
            .unwrap()
    }

    #[test]
    fn test_masks_are_deduplicated() {
        let settings = Settings::default();
        let masks = collect_masks(&sample_timeline(&settings));
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].file, PathBuf::from("masks/timer_circle_120_ff0000.png"));
    }

    #[test]
    fn test_mask_image_carries_fill_and_alpha() {
        let asset = MaskAsset {
            shape: TimerShape::Circle,
            size: 20,
            fill: HexColor::parse("E94560").unwrap(),
            file: PathBuf::from("masks/x.png"),
        };
        let img = mask_image(&asset);
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(img.get_pixel(0, 0).0, [0xE9, 0x45, 0x60, 0]);
        assert_eq!(img.get_pixel(10, 10).0, [0xE9, 0x45, 0x60, 255]);
    }

    #[test]
    fn test_render_writes_manifest_and_masks() {
        let out = std::env::temp_dir().join(format!("quizreel_manifest_{}", std::process::id()));
        let settings = Settings::default();
        let job = ExportJob {
            timeline: sample_timeline(&settings),
            video: settings.video.clone(),
            font_paths: vec![PathBuf::from("/usr/share/fonts")],
            output_dir: out.clone(),
        };

        let stages = Arc::new(Mutex::new(vec![]));
        let seen = Arc::clone(&stages);
        let callback: ProgressCallback = Box::new(move |p: ExportProgress| {
            seen.lock().unwrap().push(p.stage);
        });

        ManifestBackend::new().render(&job, Some(callback)).unwrap();

        let raw = std::fs::read_to_string(out.join(MANIFEST_FILE)).unwrap();
        let manifest: TimelineManifest = serde_json::from_str(&raw).unwrap();
        assert_eq!(manifest.timeline.clips().len(), 2);
        assert!((manifest.timeline.duration_secs() - 16.0).abs() < 1e-9);
        assert_eq!(manifest.video.codec, "libx264");
        assert!(chrono::DateTime::parse_from_rfc3339(&manifest.generated_at).is_ok());
        assert!(out.join(&manifest.masks[0].file).is_file());
        assert_eq!(stages.lock().unwrap().last(), Some(&ExportStage::Complete));

        let _ = std::fs::remove_dir_all(out);
    }
}
