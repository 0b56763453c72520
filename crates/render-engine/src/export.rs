//! Export jobs and render backends.

use std::path::PathBuf;

use quizreel_common::error::{QuizError, QuizResult};
use quizreel_project_model::project::LoadedProject;
use quizreel_project_model::settings::VideoSettings;
use quizreel_project_model::timeline::Timeline;

use crate::manifest::{ManifestBackend, MANIFEST_FILE};

/// A built timeline ready to hand to a renderer.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub timeline: Timeline,

    /// Pass-through encoder settings.
    pub video: VideoSettings,

    /// Font search paths, passed through to the renderer.
    pub font_paths: Vec<PathBuf>,

    /// Directory receiving the manifest and assets.
    pub output_dir: PathBuf,
}

impl ExportJob {
    pub fn for_project(
        project: &LoadedProject,
        timeline: Timeline,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            timeline,
            video: project.settings.video.clone(),
            font_paths: project.font_paths.clone(),
            output_dir: output_dir.into(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }
}

/// Progress callback for export.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Clips in the job.
    pub clips_total: usize,

    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    WritingAssets,
    WritingManifest,
    Complete,
}

/// Trait for render backends.
pub trait RenderBackend: Send {
    /// Execute the export job.
    fn render(&mut self, job: &ExportJob, progress: Option<ProgressCallback>) -> QuizResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Export a timeline with the manifest backend.
///
/// Returns the path of the written manifest.
pub async fn export_timeline(
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> QuizResult<PathBuf> {
    export_with(Box::new(ManifestBackend::new()), job, progress).await
}

/// Export a timeline with an explicit backend.
pub async fn export_with(
    mut backend: Box<dyn RenderBackend>,
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> QuizResult<PathBuf> {
    tracing::info!(
        output = %job.output_dir.display(),
        clips = job.timeline.clips().len(),
        duration = job.timeline.duration_secs(),
        "Starting export"
    );

    if job.timeline.clips().is_empty() {
        return Err(QuizError::render("Timeline has no clips to export"));
    }
    if !backend.is_available() {
        return Err(QuizError::unsupported(format!(
            "Render backend '{}' is not available",
            backend.name()
        )));
    }

    tokio::fs::create_dir_all(&job.output_dir).await?;
    tracing::info!(backend = backend.name(), "Using render backend");

    let manifest = tokio::task::spawn_blocking(move || {
        backend.render(&job, progress)?;
        Ok::<_, QuizError>(job.manifest_path())
    })
    .await
    .map_err(|e| QuizError::render(format!("Export task failed: {e}")))??;

    tracing::info!(manifest = %manifest.display(), "Export complete");
    Ok(manifest)
}
