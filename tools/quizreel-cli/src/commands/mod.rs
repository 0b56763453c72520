pub mod build;
pub mod check;
pub mod info;
pub mod init;
pub mod validate;

use std::path::Path;

use quizreel_common::config::AppConfig;
use quizreel_project_model::LoadedProject;

/// Load a project, honouring a configured application root.
pub fn load_project(settings: &Path, config: &AppConfig) -> anyhow::Result<LoadedProject> {
    LoadedProject::load_with_root(settings, config.app_root.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}
