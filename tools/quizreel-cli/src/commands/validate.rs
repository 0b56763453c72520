//! Validate a quiz project's documents and media.

use std::path::PathBuf;

use quizreel_common::config::AppConfig;
use quizreel_composer::validate_media;
use quizreel_project_model::BookendKind;
use quizreel_render_engine::FsMediaResolver;

use super::load_project;

pub fn run(settings: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating project from: {}", settings.display());

    let project = load_project(&settings, config)?;
    let video = &project.settings.video;

    println!("  Project directory: {}", project.paths.project_dir.display());
    println!("  Resolution: {}x{} @ {}fps", video.width, video.height, video.fps);
    println!("  Questions: {}", project.questions.len());
    for kind in [BookendKind::Intro, BookendKind::End] {
        let state = match project.bookend(kind) {
            Some(doc) if doc.enabled => "enabled",
            Some(_) => "disabled",
            None => "none",
        };
        println!("  {kind}: {state}");
    }

    let missing = validate_media(&project, &FsMediaResolver::new());
    if missing.is_empty() {
        println!("  Media: All present");
        println!("\nProject is valid.");
    } else {
        println!("\nMissing media (fallbacks will be used):");
        for reference in &missing {
            let tried = reference
                .candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  - {}: tried {tried}", reference.label);
        }
        println!(
            "\n{} issue(s) found. The video will still build.",
            missing.len()
        );
    }

    Ok(())
}
