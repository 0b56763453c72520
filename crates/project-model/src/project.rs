//! Loading quiz projects from disk.
//!
//! A run starts from the global settings document. Its directory is the
//! application root; its `project` key points at the project document,
//! whose directory is the project directory. The project document in
//! turn points at the questions document and the optional bookends.
//!
//! Pointer keys are stripped before the documents join the settings
//! cascade, so only real settings reach [`SettingsStack`].

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::bookend::{BookendDocument, BookendKind};
use crate::question::{Question, QuestionsDocument};
use crate::settings::{ConfigSource, Settings, SettingsError, SettingsStack};

const PROJECT_POINTER: &str = "project";
const FONT_PATHS_KEY: &str = "font_paths";
const QUESTIONS_POINTER: &str = "questions";
const INTRO_POINTER: &str = "intro";
const END_POINTER: &str = "end";

/// Directories media paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory of the project document.
    pub project_dir: PathBuf,
    /// Directory of the global settings document (or the configured root).
    pub app_root: PathBuf,
}

impl ProjectPaths {
    pub fn new(project_dir: impl Into<PathBuf>, app_root: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            app_root: app_root.into(),
        }
    }

    /// Lookup candidates for project media: the project directory only.
    pub fn in_project(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        vec![self.project_dir.join(path)]
    }

    /// Lookup candidates for shared media: project directory first,
    /// then the application root.
    pub fn in_project_or_root(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        let mut candidates = vec![self.project_dir.join(path)];
        let from_root = self.app_root.join(path);
        if !candidates.contains(&from_root) {
            candidates.push(from_root);
        }
        candidates
    }
}

/// Kind of media a reference expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

/// A media path referenced by the project, with its lookup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub label: String,
    pub kind: MediaKind,
    pub candidates: Vec<PathBuf>,
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub paths: ProjectPaths,

    /// Settings after the global → project cascade.
    pub settings: Settings,

    /// Cleaned, validated questions in document order.
    pub questions: Vec<Question>,

    /// Intro document, if the file exists.
    pub intro: Option<BookendDocument>,

    /// End document, if the file exists.
    pub end: Option<BookendDocument>,

    /// Font search paths passed through to the renderer.
    pub font_paths: Vec<PathBuf>,
}

impl LoadedProject {
    /// Load a project starting from the global settings document.
    pub fn load(global_settings: impl AsRef<Path>) -> Result<Self, ProjectError> {
        Self::load_with_root(global_settings, None)
    }

    /// Load a project, overriding the application root.
    pub fn load_with_root(
        global_settings: impl AsRef<Path>,
        app_root: Option<&Path>,
    ) -> Result<Self, ProjectError> {
        let global_path = global_settings.as_ref().to_path_buf();
        let global_dir = parent_dir(&global_path);
        let app_root = app_root.map(Path::to_path_buf).unwrap_or(global_dir.clone());

        let mut global = read_object(&global_path)?;
        let project_path =
            global_dir.join(take_pointer(&mut global, PROJECT_POINTER, "project.json"));
        let font_paths = take_font_paths(&mut global, &global_path)?;

        let mut project = read_object(&project_path)?;
        let project_dir = parent_dir(&project_path);
        let questions_path =
            project_dir.join(take_pointer(&mut project, QUESTIONS_POINTER, "questions.json"));
        let intro_path = project_dir.join(take_pointer(
            &mut project,
            INTRO_POINTER,
            BookendKind::Intro.default_file_name(),
        ));
        let end_path = project_dir.join(take_pointer(
            &mut project,
            END_POINTER,
            BookendKind::End.default_file_name(),
        ));

        let settings = SettingsStack::new()
            .with_layer(ConfigSource::Global, Value::Object(global))
            .and_then(|stack| stack.with_layer(ConfigSource::Project, Value::Object(project)))
            .and_then(|stack| stack.resolve())
            .map_err(|e| ProjectError::Settings {
                path: project_path.clone(),
                source: e,
            })?;

        let questions = load_questions(&questions_path)?;
        let intro = load_bookend(&intro_path)?;
        let end = load_bookend(&end_path)?;

        Ok(Self {
            paths: ProjectPaths::new(project_dir, app_root),
            settings,
            questions,
            intro,
            end,
            font_paths,
        })
    }

    pub fn bookend(&self, kind: BookendKind) -> Option<&BookendDocument> {
        match kind {
            BookendKind::Intro => self.intro.as_ref(),
            BookendKind::End => self.end.as_ref(),
        }
    }

    /// Every media path the project refers to, with its lookup order.
    pub fn media_references(&self) -> Vec<MediaReference> {
        let mut refs = vec![];
        let settings = &self.settings;

        if let Some(image) = &settings.background.image {
            refs.push(MediaReference {
                label: "Background image".to_string(),
                kind: MediaKind::Image,
                candidates: self.paths.in_project_or_root(image),
            });
        }
        if let Some(file) = &settings.audio.file {
            refs.push(MediaReference {
                label: "Audio".to_string(),
                kind: MediaKind::Audio,
                candidates: self.paths.in_project(file),
            });
        }
        if let Some(sound) = settings.timer.sound.as_ref().filter(|s| s.enabled) {
            refs.push(MediaReference {
                label: "Timer tick sound".to_string(),
                kind: MediaKind::Audio,
                candidates: self.paths.in_project_or_root(&sound.file),
            });
        }

        for kind in [BookendKind::Intro, BookendKind::End] {
            let Some(doc) = self.bookend(kind).filter(|d| d.enabled) else {
                continue;
            };
            if let Some(image) = &doc.background.image {
                refs.push(MediaReference {
                    label: format!("{kind} background image"),
                    kind: MediaKind::Image,
                    candidates: self.paths.in_project_or_root(image),
                });
            }
            for (i, image) in doc.images.iter().enumerate() {
                refs.push(MediaReference {
                    label: format!("{kind} image #{i}"),
                    kind: MediaKind::Image,
                    candidates: self.paths.in_project_or_root(&image.path),
                });
            }
        }

        refs
    }

    /// Write a starter project: global settings at `root/settings.json`,
    /// and `root/projects/<name>/` with project, questions and bookend
    /// documents.
    pub fn create(root: impl AsRef<Path>, name: &str) -> Result<PathBuf, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let project_dir = root.join("projects").join(name);
        std::fs::create_dir_all(&project_dir).map_err(|e| ProjectError::IoError {
            path: project_dir.clone(),
            source: e,
        })?;

        let global_path = root.join("settings.json");
        let documents = [
            (
                global_path.clone(),
                serde_json::json!({
                    "project": format!("projects/{name}/project.json"),
                    "font_paths": [],
                    "video": {"width": 1920, "height": 1080, "fps": 30, "codec": "libx264", "preset": "medium"},
                    "text": {"font": "Arial", "wrap_width": 30},
                    "transition": {"duration": 0.5}
                }),
            ),
            (
                project_dir.join("project.json"),
                serde_json::json!({
                    "questions": "questions.json",
                    "background": {"color": "1A1A2E"},
                    "timing": {"question_duration": 5, "answer_duration": 3},
                    "timer": {"shape": "circle", "size": 120, "color": "E94560"},
                    "audio": {"loop": true, "volume": 0.8}
                }),
            ),
            (
                project_dir.join("questions.json"),
                serde_json::json!({
                    "questions": [
                        {"question": "What is the capital of France?", "answer": "Paris"},
                        {"question": "How many legs does a spider have?", "answer": "Eight"}
                    ]
                }),
            ),
            (
                project_dir.join(BookendKind::Intro.default_file_name()),
                serde_json::json!({"enabled": false, "duration": 5, "texts": [{"text": name}]}),
            ),
            (
                project_dir.join(BookendKind::End.default_file_name()),
                serde_json::json!({"enabled": false, "duration": 5, "texts": [{"text": "Thanks for playing!"}]}),
            ),
        ];

        for (path, doc) in documents {
            let json = serde_json::to_string_pretty(&doc).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            std::fs::write(&path, json).map_err(|e| ProjectError::IoError { path, source: e })?;
        }

        Ok(global_path)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_json(path: &Path) -> Result<Value, ProjectError> {
    if !path.exists() {
        return Err(ProjectError::MissingDocument {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_object(path: &Path) -> Result<Map<String, Value>, ProjectError> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(ProjectError::ValidationError {
            message: format!("{} must contain a JSON object", path.display()),
        }),
    }
}

/// Remove a path pointer from a document, falling back to `default`.
fn take_pointer(doc: &mut Map<String, Value>, key: &str, default: &str) -> PathBuf {
    match doc.remove(key) {
        Some(Value::String(path)) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(default),
    }
}

fn take_font_paths(doc: &mut Map<String, Value>, path: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    match doc.remove(FONT_PATHS_KEY) {
        Some(value) => serde_json::from_value(value).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        }),
        None => Ok(vec![]),
    }
}

/// Load, clean and validate the questions document.
pub fn load_questions(path: &Path) -> Result<Vec<Question>, ProjectError> {
    let value = read_json(path)?;
    let doc: QuestionsDocument =
        serde_json::from_value(value).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    doc.questions
        .iter()
        .enumerate()
        .map(|(index, q)| {
            let cleaned = q.cleaned();
            cleaned
                .check()
                .map(|_| cleaned)
                .map_err(|message| ProjectError::MalformedQuestion { index, message })
        })
        .collect()
}

/// Load a bookend document; a missing file is not an error.
pub fn load_bookend(path: &Path) -> Result<Option<BookendDocument>, ProjectError> {
    if !path.exists() {
        return Ok(None);
    }
    let value = read_json(path)?;
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Errors that can occur when loading projects. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Required document missing: {path}")]
    MissingDocument { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Settings error (resolving {path}): {source}")]
    Settings {
        path: PathBuf,
        source: SettingsError,
    },

    #[error("Malformed question #{index}: {message}")]
    MalformedQuestion { index: usize, message: String },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
