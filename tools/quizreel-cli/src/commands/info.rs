//! Show the timeline a project would produce.

use std::path::PathBuf;

use quizreel_common::config::AppConfig;
use quizreel_composer::TimelineBuilder;
use quizreel_project_model::ClipKind;
use quizreel_render_engine::FsMediaResolver;

use super::load_project;

pub fn run(settings: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let project = load_project(&settings, config)?;
    let resolver = FsMediaResolver::new();
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .map_err(|e| anyhow::anyhow!("Failed to build timeline: {e}"))?;

    let s = &project.settings;
    println!("Project: {}", project.paths.project_dir.display());
    println!(
        "  Video: {}x{} @ {}fps ({}, {})",
        s.video.width, s.video.height, s.video.fps, s.video.codec, s.video.preset
    );
    println!(
        "  Timing: question {}s, answer {}s, transition {}s",
        s.timing.question_duration, s.timing.answer_duration, s.transition.duration
    );
    if s.preview_mode.enabled {
        println!(
            "  Preview: {:?} limit {} ({} of {} questions kept)",
            s.preview_mode.mode,
            s.preview_mode.limit,
            timeline.question_count(),
            project.questions.len()
        );
    }
    println!();

    println!("Clips:");
    for (clip, start) in timeline.clips().iter().zip(timeline.clip_starts()) {
        let kind = match clip.kind {
            ClipKind::Intro => "intro".to_string(),
            ClipKind::Question { index } => format!("question #{index}"),
            ClipKind::End => "end".to_string(),
        };
        println!(
            "  {:>7.2}s  {:<14} {:>5.2}s  {} layers",
            start,
            kind,
            clip.duration_secs,
            clip.layers().len()
        );
    }
    println!();

    println!("Total: {:.2}s, {} layers", timeline.duration_secs(), timeline.layer_count());
    match timeline.audio() {
        Some(audio) => println!(
            "Audio: {} ({:.2}s source, {} repeat(s), volume {})",
            audio.path.display(),
            audio.source_duration_secs,
            audio.repeats,
            audio.volume
        ),
        None => println!("Audio: none"),
    }

    Ok(())
}
