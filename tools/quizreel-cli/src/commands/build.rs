//! Build a timeline and export it for rendering.

use std::path::PathBuf;

use quizreel_common::config::AppConfig;
use quizreel_composer::TimelineBuilder;
use quizreel_render_engine::export::{export_timeline, ExportJob, ExportProgress};
use quizreel_render_engine::FsMediaResolver;

use super::load_project;

pub async fn run(settings: PathBuf, output: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<()> {
    println!("Building quiz from: {}", settings.display());

    let project = load_project(&settings, config)?;
    let resolver = FsMediaResolver::new();
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .map_err(|e| anyhow::anyhow!("Failed to build timeline: {e}"))?;

    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    println!("  Clips: {}", timeline.clips().len());
    println!("  Duration: {:.1}s", timeline.duration_secs());
    println!("  Output: {}", output_dir.display());

    let job = ExportJob::for_project(&project, timeline, output_dir);
    let progress_cb: Box<dyn Fn(ExportProgress) + Send> = Box::new(|p| {
        print!(
            "\r  Progress: {:.0}% ({:?}, {} clips)  ",
            p.progress * 100.0,
            p.stage,
            p.clips_total,
        );
    });

    let manifest = export_timeline(job, Some(progress_cb))
        .await
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;
    println!("\nExport complete: {}", manifest.display());

    Ok(())
}
