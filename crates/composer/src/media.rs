//! Media lookup seam.
//!
//! Builders never touch the filesystem. They ask a [`MediaResolver`] for
//! an image or audio file and branch on the returned [`MediaLookup`]:
//! `Found` carries the probed metadata, `Missing` covers both absent
//! files and files that could not be decoded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quizreel_project_model::bookend::{BookendDocument, BookendKind};
use quizreel_project_model::project::{LoadedProject, MediaKind, MediaReference, ProjectPaths};

/// Outcome of a media lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaLookup<T> {
    Found(T),
    Missing,
}

impl<T> MediaLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A readable image and its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// A decodable audio file and its length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    pub path: PathBuf,
    pub duration_secs: f64,
}

/// Access to the backing store.
///
/// Implementations attempt each read once and release any handle they
/// open before returning.
pub trait MediaResolver {
    fn probe_image(&self, path: &Path) -> MediaLookup<ImageInfo>;

    fn probe_audio(&self, path: &Path) -> MediaLookup<AudioInfo>;
}

/// Evaluate candidates in order; the first `Found` wins.
pub fn first_found<T>(
    candidates: &[PathBuf],
    probe: impl Fn(&Path) -> MediaLookup<T>,
) -> MediaLookup<T> {
    candidates
        .iter()
        .map(|candidate| probe(candidate))
        .find(MediaLookup::is_found)
        .unwrap_or(MediaLookup::Missing)
}

pub fn first_image(resolver: &dyn MediaResolver, candidates: &[PathBuf]) -> MediaLookup<ImageInfo> {
    first_found(candidates, |p| resolver.probe_image(p))
}

pub fn first_audio(resolver: &dyn MediaResolver, candidates: &[PathBuf]) -> MediaLookup<AudioInfo> {
    first_found(candidates, |p| resolver.probe_audio(p))
}

/// Media references of `project` that resolve to nothing.
///
/// Missing media is never fatal; this only reports it.
pub fn validate_media(project: &LoadedProject, resolver: &dyn MediaResolver) -> Vec<MediaReference> {
    project
        .media_references()
        .into_iter()
        .filter(|reference| {
            let found = match reference.kind {
                MediaKind::Image => first_image(resolver, &reference.candidates).is_found(),
                MediaKind::Audio => first_audio(resolver, &reference.candidates).is_found(),
            };
            if !found {
                tracing::warn!(
                    label = %reference.label,
                    candidates = reference.candidates.len(),
                    "Referenced media does not resolve"
                );
            }
            !found
        })
        .collect()
}

/// Where the current project lives and which bookends it defines.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    pub paths: &'a ProjectPaths,
    pub intro: Option<&'a BookendDocument>,
    pub end: Option<&'a BookendDocument>,
}

impl<'a> ProjectContext<'a> {
    pub fn new(paths: &'a ProjectPaths) -> Self {
        Self {
            paths,
            intro: None,
            end: None,
        }
    }

    pub fn from_project(project: &'a LoadedProject) -> Self {
        Self {
            paths: &project.paths,
            intro: project.intro.as_ref(),
            end: project.end.as_ref(),
        }
    }

    pub fn bookend(&self, kind: BookendKind) -> Option<&'a BookendDocument> {
        match kind {
            BookendKind::Intro => self.intro,
            BookendKind::End => self.end,
        }
    }
}

/// In-memory catalogue of media, for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMediaResolver {
    images: HashMap<PathBuf, (u32, u32)>,
    audio: HashMap<PathBuf, f64>,
}

impl MemoryMediaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.images.insert(path.into(), (width, height));
        self
    }

    pub fn with_audio(mut self, path: impl Into<PathBuf>, duration_secs: f64) -> Self {
        self.audio.insert(path.into(), duration_secs);
        self
    }
}

impl MediaResolver for MemoryMediaResolver {
    fn probe_image(&self, path: &Path) -> MediaLookup<ImageInfo> {
        match self.images.get(path) {
            Some(&(width, height)) => MediaLookup::Found(ImageInfo {
                path: path.to_path_buf(),
                width,
                height,
            }),
            None => MediaLookup::Missing,
        }
    }

    fn probe_audio(&self, path: &Path) -> MediaLookup<AudioInfo> {
        match self.audio.get(path) {
            Some(&duration_secs) => MediaLookup::Found(AudioInfo {
                path: path.to_path_buf(),
                duration_secs,
            }),
            None => MediaLookup::Missing,
        }
    }
}
