//! Initialize a new quiz project.

use std::path::PathBuf;

use quizreel_project_model::LoadedProject;

pub fn run(name: String, output: PathBuf) -> anyhow::Result<()> {
    println!("Creating project '{}' in {}", name, output.display());

    let settings = LoadedProject::create(&output, &name)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Settings: {}", settings.display());
    println!();
    println!("Directory structure:");
    println!("  settings.json              (video, fonts, project pointer)");
    println!("  projects/{name}/");
    println!("  ├── project.json           (background, timer, timing, audio)");
    println!("  ├── questions.json");
    println!("  ├── project_intro.json     (disabled)");
    println!("  └── project_end.json       (disabled)");
    println!();
    println!("Build it with: quizreel build {}", settings.display());

    Ok(())
}
